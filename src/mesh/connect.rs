use tracing::warn;

use super::{EdgeId, FaceData, Mesh, VertexId};
use crate::math::Point3;

/// Outcome of looking up a vertex by position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Located {
    /// Exactly one vertex in range.
    Unique(VertexId),
    /// Several vertices in range; the nearest is reported.
    Nearest { vertex: VertexId, candidates: usize },
    /// Nothing in range.
    Missing,
}

impl Mesh {
    /// Finds the vertex nearest to `point` within `tolerance`.
    #[must_use]
    pub fn locate(&self, point: &Point3, tolerance: f64) -> Located {
        let mut candidates = 0;
        let mut best: Option<(VertexId, f64)> = None;
        for (id, v) in &self.vertices {
            let d = (v.point - point).norm();
            if d > tolerance {
                continue;
            }
            candidates += 1;
            if best.is_none_or(|(_, bd)| d < bd) {
                best = Some((id, d));
            }
        }
        match (best, candidates) {
            (None, _) => Located::Missing,
            (Some((vertex, _)), 1) => Located::Unique(vertex),
            (Some((vertex, _)), candidates) => Located::Nearest { vertex, candidates },
        }
    }

    /// Joins two vertices with an edge, splitting the face they share.
    ///
    /// If both vertices lie on the same face and are not already adjacent on
    /// it, the face loop is cut in two along the new edge. Otherwise the edge
    /// is added on its own.
    pub fn connect(&mut self, a: VertexId, b: VertexId) -> EdgeId {
        let shared = self.faces.iter().find_map(|(fid, face)| {
            let ia = face.vertices.iter().position(|&v| v == a)?;
            let ib = face.vertices.iter().position(|&v| v == b)?;
            let n = face.vertices.len();
            let adjacent = (ia + 1) % n == ib || (ib + 1) % n == ia;
            (!adjacent).then_some((fid, ia, ib))
        });

        if let Some((fid, ia, ib)) = shared {
            if let Some(face) = self.faces.get_mut(fid) {
                let (lo, hi) = (ia.min(ib), ia.max(ib));
                let first: Vec<VertexId> = face.vertices[lo..=hi].to_vec();
                let second: Vec<VertexId> = face.vertices[hi..]
                    .iter()
                    .chain(face.vertices[..=lo].iter())
                    .copied()
                    .collect();
                face.vertices = first;
                self.faces.insert(FaceData { vertices: second });
            }
        }
        self.add_edge(a, b)
    }

    /// Connects the vertices found at two positions.
    ///
    /// Ambiguous lookups resolve to the nearest vertex and are logged. Returns
    /// the name of the first position with no vertex in range, leaving the
    /// mesh untouched.
    ///
    /// # Errors
    ///
    /// Returns the tag name that failed to resolve.
    pub fn connect_by_location<'a>(
        &mut self,
        from: (&'a str, &Point3),
        to: (&'a str, &Point3),
        tolerance: f64,
    ) -> Result<EdgeId, &'a str> {
        let a = self.resolve_tag(from.0, from.1, tolerance).ok_or(from.0)?;
        let b = self.resolve_tag(to.0, to.1, tolerance).ok_or(to.0)?;
        Ok(self.connect(a, b))
    }

    fn resolve_tag(&self, tag: &str, point: &Point3, tolerance: f64) -> Option<VertexId> {
        match self.locate(point, tolerance) {
            Located::Unique(v) => Some(v),
            Located::Nearest { vertex, candidates } => {
                warn!(tag, candidates, "ambiguous vertex match, using nearest");
                Some(vertex)
            }
            Located::Missing => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::MERGE_TOLERANCE;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn hexagon() -> Mesh {
        let mut mesh = Mesh::new();
        let ids: Vec<_> = [
            p(0.0, 0.0, 0.0),
            p(2.0, 0.0, 0.0),
            p(3.0, 1.0, 0.0),
            p(2.0, 2.0, 0.0),
            p(0.0, 2.0, 0.0),
            p(-1.0, 1.0, 0.0),
        ]
        .into_iter()
        .map(|pt| mesh.add_vertex(pt))
        .collect();
        mesh.add_face(ids);
        mesh
    }

    #[test]
    fn connect_splits_shared_face() {
        let mut mesh = hexagon();
        mesh.connect_by_location(
            ("a", &p(0.0, 0.0, 0.0)),
            ("b", &p(2.0, 2.0, 0.0)),
            MERGE_TOLERANCE,
        )
        .unwrap();
        assert_eq!(mesh.face_count(), 2);
        let mut sizes: Vec<_> = mesh.faces().map(|(_, f)| f.vertices.len()).collect();
        sizes.sort_unstable();
        assert_eq!(sizes, vec![4, 4]);
        assert_eq!(mesh.edge_count(), 7);
    }

    #[test]
    fn connect_adjacent_vertices_keeps_face() {
        let mut mesh = hexagon();
        mesh.connect_by_location(
            ("a", &p(0.0, 0.0, 0.0)),
            ("b", &p(2.0, 0.0, 0.0)),
            MERGE_TOLERANCE,
        )
        .unwrap();
        assert_eq!(mesh.face_count(), 1);
        assert_eq!(mesh.edge_count(), 6);
    }

    #[test]
    fn missing_match_reports_tag_and_leaves_mesh() {
        let mut mesh = hexagon();
        let err = mesh
            .connect_by_location(
                ("a", &p(0.0, 0.0, 0.0)),
                ("nowhere", &p(5.0, 5.0, 0.0)),
                MERGE_TOLERANCE,
            )
            .unwrap_err();
        assert_eq!(err, "nowhere");
        assert_eq!(mesh.face_count(), 1);
        assert_eq!(mesh.edge_count(), 6);
    }

    #[test]
    fn ambiguous_match_picks_nearest() {
        let mut mesh = Mesh::new();
        let far = mesh.add_vertex(p(0.8 * MERGE_TOLERANCE, 0.0, 0.0));
        let near = mesh.add_vertex(p(0.1 * MERGE_TOLERANCE, 0.0, 0.0));
        assert_eq!(
            mesh.locate(&Point3::origin(), MERGE_TOLERANCE),
            Located::Nearest { vertex: near, candidates: 2 }
        );
        assert_ne!(near, far);
    }

    #[test]
    fn match_beyond_tolerance_is_missing() {
        let mut mesh = Mesh::new();
        mesh.add_vertex(p(1.5 * MERGE_TOLERANCE, 0.0, 0.0));
        assert_eq!(mesh.locate(&Point3::origin(), MERGE_TOLERANCE), Located::Missing);
    }
}
