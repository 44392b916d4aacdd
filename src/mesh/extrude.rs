use std::collections::HashSet;

use slotmap::SecondaryMap;

use super::{Mesh, VertexId};
use crate::error::GeometryError;
use crate::math::{newell_normal, Vector3, TOLERANCE};

/// Extrudes every face of a mesh into a closed solid.
///
/// The extrusion may be split into several steps; each step adds a ring of
/// side quads, which gives later texturing passes horizontal bands to target.
#[derive(Debug, Clone)]
pub struct Extrude {
    steps: Vec<Vector3>,
}

/// Vertex sets produced by an extrusion.
#[derive(Debug, Clone, Default)]
pub struct ExtrudedSolid {
    /// One entry per level, from the original profile (index 0) to the cap.
    pub layers: Vec<Vec<VertexId>>,
}

impl ExtrudedSolid {
    /// Vertices of the original profile.
    #[must_use]
    pub fn bottom(&self) -> &[VertexId] {
        self.layers.first().map_or(&[], Vec::as_slice)
    }

    /// Vertices of the translated cap.
    #[must_use]
    pub fn top(&self) -> &[VertexId] {
        self.layers.last().map_or(&[], Vec::as_slice)
    }
}

impl Extrude {
    /// Creates a single-step extrusion along `direction`.
    #[must_use]
    pub fn new(direction: Vector3) -> Self {
        Self {
            steps: vec![direction],
        }
    }

    /// Splits `direction` into `count` equal steps.
    #[must_use]
    pub fn in_layers(direction: Vector3, count: u32) -> Self {
        let count = count.max(1);
        let step = direction / f64::from(count);
        Self {
            steps: vec![step; count as usize],
        }
    }

    /// Extrudes along `axis` by each of `distances` in turn.
    #[must_use]
    pub fn in_steps(axis: Vector3, distances: &[f64]) -> Self {
        let unit = axis.try_normalize(TOLERANCE).unwrap_or_else(Vector3::z);
        Self {
            steps: distances.iter().map(|d| unit * *d).collect(),
        }
    }

    /// Total displacement of the cap relative to the profile.
    #[must_use]
    pub fn total(&self) -> Vector3 {
        self.steps.iter().sum()
    }

    /// Executes the extrusion in place.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`] if any step is zero-length or the
    /// mesh has no faces.
    pub fn execute(&self, mesh: &mut Mesh) -> Result<ExtrudedSolid, GeometryError> {
        if self.steps.is_empty() || self.steps.iter().any(|s| s.norm() < TOLERANCE) {
            return Err(GeometryError::Degenerate(
                "extrude steps must be non-zero".into(),
            ));
        }
        let direction = self.total();

        let face_ids: Vec<_> = mesh.faces.keys().collect();
        if face_ids.is_empty() {
            return Err(GeometryError::Degenerate("no faces to extrude".into()));
        }

        // Orient every profile face so its normal follows the extrusion.
        let mut loops = Vec::with_capacity(face_ids.len());
        for &fid in &face_ids {
            let points = mesh.face_points(fid)?;
            let mut loop_ids = mesh.face(fid)?.vertices.clone();
            if newell_normal(&points).dot(&direction) < 0.0 {
                loop_ids.reverse();
            }
            loops.push(loop_ids);
        }

        let directed: HashSet<(VertexId, VertexId)> = loops
            .iter()
            .flat_map(|l| (0..l.len()).map(move |i| (l[i], l[(i + 1) % l.len()])))
            .collect();
        let boundary: Vec<(VertexId, VertexId)> = loops
            .iter()
            .flat_map(|l| (0..l.len()).map(move |i| (l[i], l[(i + 1) % l.len()])))
            .filter(|&(u, v)| !directed.contains(&(v, u)))
            .collect();

        let mut profile: Vec<VertexId> = Vec::new();
        for &v in loops.iter().flatten() {
            if !profile.contains(&v) {
                profile.push(v);
            }
        }
        let rim: Vec<VertexId> = profile
            .iter()
            .copied()
            .filter(|v| boundary.iter().any(|&(a, _)| a == *v))
            .collect();

        let mut solid = ExtrudedSolid {
            layers: vec![profile.clone()],
        };
        let mut prev: SecondaryMap<VertexId, VertexId> =
            profile.iter().map(|&v| (v, v)).collect();
        let mut offset = Vector3::zeros();

        for (k, step) in self.steps.iter().enumerate() {
            offset += step;
            let is_cap = k + 1 == self.steps.len();
            let copied = if is_cap { &profile } else { &rim };

            let mut next: SecondaryMap<VertexId, VertexId> = SecondaryMap::new();
            let mut layer = Vec::with_capacity(copied.len());
            for &v in copied {
                let point = mesh.point(v)? + offset;
                let id = mesh.add_vertex(point);
                next.insert(v, id);
                layer.push(id);
            }

            for &(u, v) in &boundary {
                let quad = vec![prev[u], prev[v], next[v], next[u]];
                mesh.add_face(quad);
            }

            solid.layers.push(layer);
            prev = next;
        }

        for l in &loops {
            mesh.add_face(l.iter().map(|&v| prev[v]).collect());
        }
        for (&fid, l) in face_ids.iter().zip(&loops) {
            if let Some(face) = mesh.faces.get_mut(fid) {
                face.vertices = l.iter().rev().copied().collect();
            }
        }

        Ok(solid)
    }
}
