mod connect;
mod data;
mod extrude;
mod merge;
mod tessellate;

pub use connect::Located;
pub use data::MeshData;
pub use extrude::{Extrude, ExtrudedSolid};
pub use tessellate::TriangleMesh;

use std::collections::{BTreeMap, HashMap};

use slotmap::SlotMap;

use crate::error::GeometryError;
use crate::math::{newell_normal, Isometry3, Point3, Vector3, TOLERANCE};

slotmap::new_key_type! {
    /// Unique identifier for a vertex in a [`Mesh`].
    pub struct VertexId;
    /// Unique identifier for an edge in a [`Mesh`].
    pub struct EdgeId;
    /// Unique identifier for a face in a [`Mesh`].
    pub struct FaceId;
}

/// Data associated with a mesh vertex.
#[derive(Debug, Clone)]
pub struct VertexData {
    /// The 3D position of the vertex.
    pub point: Point3,
}

/// An undirected edge between two vertices.
#[derive(Debug, Clone, Copy)]
pub struct EdgeData {
    pub a: VertexId,
    pub b: VertexId,
}

impl EdgeData {
    /// Returns `true` if the edge joins `u` and `v` in either direction.
    #[must_use]
    pub fn joins(&self, u: VertexId, v: VertexId) -> bool {
        (self.a == u && self.b == v) || (self.a == v && self.b == u)
    }
}

/// A polygon face given as an ordered vertex loop.
#[derive(Debug, Clone)]
pub struct FaceData {
    pub vertices: Vec<VertexId>,
}

/// Editable polygon mesh.
///
/// Entities reference each other via typed IDs, so merging vertices away
/// never invalidates the IDs that survive.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    vertices: SlotMap<VertexId, VertexData>,
    edges: SlotMap<EdgeId, EdgeData>,
    faces: SlotMap<FaceId, FaceData>,
    groups: BTreeMap<String, Vec<VertexId>>,
    edge_index: HashMap<(VertexId, VertexId), EdgeId>,
}

fn edge_key(a: VertexId, b: VertexId) -> (VertexId, VertexId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl Mesh {
    /// Creates a new, empty mesh.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Vertex operations ---

    /// Inserts a vertex and returns its ID.
    pub fn add_vertex(&mut self, point: Point3) -> VertexId {
        self.vertices.insert(VertexData { point })
    }

    /// Returns the position of a vertex.
    ///
    /// # Errors
    ///
    /// Returns an error if the vertex is not in the mesh.
    pub fn point(&self, id: VertexId) -> Result<Point3, GeometryError> {
        self.vertices
            .get(id)
            .map(|v| v.point)
            .ok_or(GeometryError::EntityNotFound("vertex"))
    }

    /// Iterates over all vertices.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &VertexData)> {
        self.vertices.iter()
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    // --- Edge operations ---

    /// Inserts an edge between two vertices, reusing an existing one.
    pub fn add_edge(&mut self, a: VertexId, b: VertexId) -> EdgeId {
        let key = edge_key(a, b);
        if let Some(&existing) = self.edge_index.get(&key) {
            return existing;
        }
        let id = self.edges.insert(EdgeData { a, b });
        self.edge_index.insert(key, id);
        id
    }

    /// Returns the edge joining `a` and `b`, if any.
    #[must_use]
    pub fn edge_between(&self, a: VertexId, b: VertexId) -> Option<EdgeId> {
        self.edge_index.get(&edge_key(a, b)).copied()
    }

    /// Iterates over all edges.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &EdgeData)> {
        self.edges.iter()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    // --- Face operations ---

    /// Inserts a face and the edges along its loop.
    pub fn add_face(&mut self, vertices: Vec<VertexId>) -> FaceId {
        let n = vertices.len();
        for i in 0..n {
            self.add_edge(vertices[i], vertices[(i + 1) % n]);
        }
        self.faces.insert(FaceData { vertices })
    }

    /// Returns a face's vertex loop.
    ///
    /// # Errors
    ///
    /// Returns an error if the face is not in the mesh.
    pub fn face(&self, id: FaceId) -> Result<&FaceData, GeometryError> {
        self.faces.get(id).ok_or(GeometryError::EntityNotFound("face"))
    }

    /// Iterates over all faces.
    pub fn faces(&self) -> impl Iterator<Item = (FaceId, &FaceData)> {
        self.faces.iter()
    }

    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Positions of a face's corners in loop order.
    ///
    /// # Errors
    ///
    /// Returns an error if the face or one of its vertices is missing.
    pub fn face_points(&self, id: FaceId) -> Result<Vec<Point3>, GeometryError> {
        self.face(id)?.vertices.iter().map(|&v| self.point(v)).collect()
    }

    // --- Vertex groups ---

    /// Adds vertices to a named group, creating the group if needed.
    pub fn assign_group(&mut self, name: &str, vertices: impl IntoIterator<Item = VertexId>) {
        let group = self.groups.entry(name.to_owned()).or_default();
        for v in vertices {
            if !group.contains(&v) {
                group.push(v);
            }
        }
    }

    /// Returns the members of a named group.
    #[must_use]
    pub fn group(&self, name: &str) -> Option<&[VertexId]> {
        self.groups.get(name).map(Vec::as_slice)
    }

    /// Iterates over all vertex groups.
    pub fn groups(&self) -> impl Iterator<Item = (&str, &[VertexId])> {
        self.groups.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Vertices whose coordinate on `axis` equals `value` within `tolerance`.
    #[must_use]
    pub fn vertices_on_plane(&self, axis: usize, value: f64, tolerance: f64) -> Vec<VertexId> {
        self.vertices
            .iter()
            .filter(|(_, v)| (v.point[axis] - value).abs() <= tolerance)
            .map(|(id, _)| id)
            .collect()
    }

    // --- Whole-mesh operations ---

    /// Turns the mesh's single closed edge loop into one face.
    ///
    /// The loop is oriented so that its normal agrees with `expected_normal`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::OpenBoundary`] if the edges do not form exactly
    /// one closed loop, or [`GeometryError::Degenerate`] if it has no area.
    pub fn fill_boundary(&mut self, expected_normal: &Vector3) -> Result<FaceId, GeometryError> {
        let mut loop_ids = self.boundary_loop()?;
        let points: Vec<Point3> = loop_ids
            .iter()
            .map(|&v| self.point(v))
            .collect::<Result<_, _>>()?;
        let normal = newell_normal(&points);
        if normal.norm() < TOLERANCE {
            return Err(GeometryError::Degenerate("boundary loop has zero area".into()));
        }
        if normal.dot(expected_normal) < 0.0 {
            loop_ids.reverse();
        }
        Ok(self.add_face(loop_ids))
    }

    /// Walks the edge graph as one closed loop, in edge order.
    fn boundary_loop(&self) -> Result<Vec<VertexId>, GeometryError> {
        let mut adjacency: BTreeMap<VertexId, Vec<VertexId>> = BTreeMap::new();
        for (_, e) in &self.edges {
            adjacency.entry(e.a).or_default().push(e.b);
            adjacency.entry(e.b).or_default().push(e.a);
        }
        if adjacency.len() < 3 {
            return Err(GeometryError::OpenBoundary(format!(
                "{} connected vertices",
                adjacency.len()
            )));
        }
        if let Some((_, n)) = adjacency.iter().find(|(_, n)| n.len() != 2) {
            return Err(GeometryError::OpenBoundary(format!(
                "vertex with {} neighbours",
                n.len()
            )));
        }

        let Some((&start, _)) = adjacency.iter().next() else {
            return Err(GeometryError::OpenBoundary("no edges".into()));
        };
        let mut loop_ids = vec![start];
        let mut prev = start;
        let mut curr = adjacency[&start][0];
        while curr != start {
            loop_ids.push(curr);
            let next = adjacency[&curr]
                .iter()
                .copied()
                .find(|&n| n != prev)
                .unwrap_or(prev);
            prev = curr;
            curr = next;
            if loop_ids.len() > adjacency.len() {
                break;
            }
        }
        if loop_ids.len() != adjacency.len() {
            return Err(GeometryError::OpenBoundary(format!(
                "loop visits {} of {} vertices",
                loop_ids.len(),
                adjacency.len()
            )));
        }
        Ok(loop_ids)
    }

    /// Applies a rigid transform to every vertex.
    pub fn transform(&mut self, iso: &Isometry3) {
        for (_, v) in &mut self.vertices {
            v.point = iso * v.point;
        }
    }

    /// Translates every vertex.
    pub fn translate(&mut self, offset: &Vector3) {
        for (_, v) in &mut self.vertices {
            v.point += offset;
        }
    }

    /// Axis-aligned bounds `(min, max)`, or `None` for an empty mesh.
    #[must_use]
    pub fn bounds(&self) -> Option<(Point3, Point3)> {
        let mut iter = self.vertices.values();
        let first = iter.next()?.point;
        Some(iter.fold((first, first), |(lo, hi), v| {
            (lo.inf(&v.point), hi.sup(&v.point))
        }))
    }
}
