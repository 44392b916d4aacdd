use std::collections::BTreeMap;

use slotmap::SecondaryMap;

use super::{Mesh, VertexId};
use crate::error::GeometryError;
use crate::math::{Isometry3, Point3};

/// Index-based mesh description exchanged with the host.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    /// Vertex positions.
    pub vertices: Vec<Point3>,
    /// Edges as vertex index pairs.
    pub edges: Vec<[u32; 2]>,
    /// Faces as vertex index loops.
    pub faces: Vec<Vec<u32>>,
    /// Named vertex groups as vertex index lists.
    pub vertex_groups: BTreeMap<String, Vec<u32>>,
}

impl MeshData {
    /// Returns a copy with every vertex moved by `iso`.
    #[must_use]
    pub fn transformed(&self, iso: &Isometry3) -> Self {
        Self {
            vertices: self.vertices.iter().map(|p| iso * p).collect(),
            ..self.clone()
        }
    }
}

impl Mesh {
    /// Position of each vertex in the index form produced by [`Mesh::to_mesh_data`].
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn vertex_indices(&self) -> SecondaryMap<VertexId, u32> {
        self.vertices
            .keys()
            .enumerate()
            .map(|(i, id)| (id, i as u32))
            .collect()
    }

    /// Flattens the mesh into index form.
    #[must_use]
    pub fn to_mesh_data(&self) -> MeshData {
        let index = self.vertex_indices();
        let vertices = self.vertices.values().map(|v| v.point).collect();

        let edges = self.edges.values().map(|e| [index[e.a], index[e.b]]).collect();
        let faces = self
            .faces
            .values()
            .map(|f| f.vertices.iter().map(|&v| index[v]).collect())
            .collect();
        let vertex_groups = self
            .groups
            .iter()
            .map(|(name, members)| {
                let ids = members.iter().filter_map(|&v| index.get(v).copied()).collect();
                (name.clone(), ids)
            })
            .collect();

        MeshData {
            vertices,
            edges,
            faces,
            vertex_groups,
        }
    }

    /// Rebuilds an editable mesh from index form.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::EntityNotFound`] if an edge, face or group
    /// refers to a vertex index that does not exist.
    pub fn from_mesh_data(data: &MeshData) -> Result<Self, GeometryError> {
        let mut mesh = Mesh::new();
        let ids: Vec<VertexId> = data.vertices.iter().map(|&p| mesh.add_vertex(p)).collect();
        let lookup = |i: u32| {
            ids.get(i as usize)
                .copied()
                .ok_or(GeometryError::EntityNotFound("vertex index"))
        };

        for &[a, b] in &data.edges {
            mesh.add_edge(lookup(a)?, lookup(b)?);
        }
        for face in &data.faces {
            let loop_ids = face.iter().map(|&i| lookup(i)).collect::<Result<Vec<_>, _>>()?;
            mesh.add_face(loop_ids);
        }
        for (name, members) in &data.vertex_groups {
            let members = members.iter().map(|&i| lookup(i)).collect::<Result<Vec<_>, _>>()?;
            mesh.assign_group(name, members);
        }
        Ok(mesh)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Vector3;
    use crate::mesh::Extrude;

    #[test]
    fn indices_survive_a_merge() {
        let mut mesh = Mesh::new();
        let ids: Vec<_> = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]
        .into_iter()
        .map(|p| mesh.add_vertex(p))
        .collect();
        mesh.add_face(vec![ids[1], ids[2], ids[3]]);
        mesh.assign_group("All", ids.clone());
        mesh.merge_by_distance(1e-4);

        let data = mesh.to_mesh_data();
        assert_eq!(data.vertices.len(), 3);
        assert_eq!(data.faces, vec![vec![0, 1, 2]]);
        assert_eq!(data.vertex_groups["All"], vec![0, 1, 2]);
    }

    #[test]
    fn extruded_solid_survives_export_and_import() {
        let mut mesh = Mesh::new();
        let ids: Vec<_> = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]
        .into_iter()
        .map(|p| mesh.add_vertex(p))
        .collect();
        mesh.add_face(ids);
        Extrude::new(Vector3::z()).execute(&mut mesh).unwrap();

        let data = mesh.to_mesh_data();
        let rebuilt = Mesh::from_mesh_data(&data).unwrap();
        assert_eq!(rebuilt.vertex_count(), 6);
        assert_eq!(rebuilt.face_count(), 5);
        assert_eq!(rebuilt.edge_count(), 9);
        assert_eq!(rebuilt.to_mesh_data(), data);
    }

    #[test]
    fn bad_index_is_rejected() {
        let data = MeshData {
            vertices: vec![Point3::origin()],
            edges: vec![[0, 3]],
            ..MeshData::default()
        };
        assert!(Mesh::from_mesh_data(&data).is_err());
    }
}
