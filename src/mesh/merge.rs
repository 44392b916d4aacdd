use slotmap::SecondaryMap;

use super::{EdgeData, Mesh, VertexId};

impl Mesh {
    /// Merges vertices that lie within `tolerance` of an earlier vertex.
    ///
    /// Each merged vertex collapses onto the first surviving vertex in range,
    /// which keeps its own position; positions are never averaged, so running
    /// the merge again removes nothing. Edges that become degenerate or
    /// duplicated are dropped and faces lose collapsed corners.
    ///
    /// Returns the number of vertices removed.
    pub fn merge_by_distance(&mut self, tolerance: f64) -> usize {
        let mut kept: Vec<(VertexId, crate::math::Point3)> = Vec::new();
        let mut remap: SecondaryMap<VertexId, VertexId> = SecondaryMap::new();

        for (id, v) in &self.vertices {
            let target = kept
                .iter()
                .map(|(k, p)| (*k, (p - v.point).norm()))
                .filter(|(_, d)| *d <= tolerance)
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(k, _)| k);
            match target {
                Some(k) => {
                    remap.insert(id, k);
                }
                None => kept.push((id, v.point)),
            }
        }

        if remap.is_empty() {
            return 0;
        }

        let resolve = |v: VertexId| remap.get(v).copied().unwrap_or(v);

        let old_edges: Vec<EdgeData> = self.edges.drain().map(|(_, e)| e).collect();
        self.edge_index.clear();
        for e in old_edges {
            let (a, b) = (resolve(e.a), resolve(e.b));
            if a != b {
                self.add_edge(a, b);
            }
        }

        let mut empty_faces = Vec::new();
        for (fid, face) in &mut self.faces {
            let mut loop_ids: Vec<VertexId> = Vec::with_capacity(face.vertices.len());
            for &v in &face.vertices {
                let v = resolve(v);
                if loop_ids.last() != Some(&v) {
                    loop_ids.push(v);
                }
            }
            if loop_ids.len() > 1 && loop_ids.first() == loop_ids.last() {
                loop_ids.pop();
            }
            if loop_ids.len() < 3 {
                empty_faces.push(fid);
            }
            face.vertices = loop_ids;
        }
        for fid in empty_faces {
            self.faces.remove(fid);
        }

        for members in self.groups.values_mut() {
            let mut merged: Vec<VertexId> = Vec::with_capacity(members.len());
            for &v in members.iter() {
                let v = resolve(v);
                if !merged.contains(&v) {
                    merged.push(v);
                }
            }
            *members = merged;
        }

        let removed = remap.len();
        for (id, _) in &remap {
            self.vertices.remove(id);
        }
        removed
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::math::{Point3, MERGE_TOLERANCE};
    use crate::mesh::Mesh;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn coincident_seam_pair_collapses() {
        let mut mesh = Mesh::new();
        let a = mesh.add_vertex(p(0.0, 0.0, 0.0));
        let b = mesh.add_vertex(p(1.0, 0.0, 0.0));
        let c = mesh.add_vertex(p(1.0, 1.0, 0.0));
        let a2 = mesh.add_vertex(p(0.0, 0.0, 0.0));
        mesh.add_edge(a, b);
        mesh.add_edge(b, c);
        mesh.add_edge(c, a2);

        assert_eq!(mesh.merge_by_distance(MERGE_TOLERANCE), 1);
        assert_eq!(mesh.vertex_count(), 3);
        assert!(mesh.edge_between(c, a).is_some());
    }

    #[test]
    fn merge_is_idempotent() {
        let mut mesh = Mesh::new();
        // A chain where each neighbour is in range but the ends are not.
        for i in 0..5 {
            mesh.add_vertex(p(f64::from(i) * 0.6 * MERGE_TOLERANCE, 0.0, 0.0));
        }
        mesh.add_vertex(p(0.0, 0.0, 0.0));
        let first = mesh.merge_by_distance(MERGE_TOLERANCE);
        let count = mesh.vertex_count();
        assert!(first > 0);
        assert_eq!(mesh.merge_by_distance(MERGE_TOLERANCE), 0);
        assert_eq!(mesh.vertex_count(), count);
    }

    #[test]
    fn points_just_inside_tolerance_merge() {
        let mut mesh = Mesh::new();
        mesh.add_vertex(p(0.0, 0.0, 0.0));
        mesh.add_vertex(p(0.9 * MERGE_TOLERANCE, 0.0, 0.0));
        assert_eq!(mesh.merge_by_distance(MERGE_TOLERANCE), 1);
    }

    #[test]
    fn points_just_outside_tolerance_stay_separate() {
        let mut mesh = Mesh::new();
        mesh.add_vertex(p(0.0, 0.0, 0.0));
        mesh.add_vertex(p(1.1 * MERGE_TOLERANCE, 0.0, 0.0));
        assert_eq!(mesh.merge_by_distance(MERGE_TOLERANCE), 0);
        assert_eq!(mesh.vertex_count(), 2);
    }

    #[test]
    fn collapsed_face_corner_is_removed() {
        let mut mesh = Mesh::new();
        let ids: Vec<_> = [
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(1.0, 1.0, 0.0),
            p(0.0, 1.0, 0.0),
        ]
        .into_iter()
        .map(|pt| mesh.add_vertex(pt))
        .collect();
        let face = mesh.add_face(ids);
        mesh.merge_by_distance(MERGE_TOLERANCE);
        assert_eq!(mesh.face(face).unwrap().vertices.len(), 4);
        assert_eq!(mesh.edge_count(), 4);
    }

    #[test]
    fn groups_follow_merged_vertices() {
        let mut mesh = Mesh::new();
        let a = mesh.add_vertex(p(0.0, 0.0, 0.0));
        let b = mesh.add_vertex(p(0.0, 0.0, 0.0));
        mesh.assign_group("Top", [a, b]);
        mesh.merge_by_distance(MERGE_TOLERANCE);
        assert_eq!(mesh.group("Top").unwrap(), &[a]);
    }
}
