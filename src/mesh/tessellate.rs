use std::collections::HashMap;

use spade::{ConstrainedDelaunayTriangulation, InsertionError, Point2 as SpadePoint2, Triangulation};

use super::MeshData;
use crate::error::GeometryError;
use crate::math::{newell_normal, Point3, Vector3, TOLERANCE};

/// A triangle-only view of a mesh, for hosts that cannot take n-gons.
#[derive(Debug, Clone, Default)]
pub struct TriangleMesh {
    /// Vertex positions (shared with the source mesh).
    pub vertices: Vec<Point3>,
    /// Triangle indices (each triple defines a triangle).
    pub indices: Vec<[u32; 3]>,
}

impl MeshData {
    /// Triangulates every face with a constrained Delaunay triangulation.
    ///
    /// Faces are projected onto their own plane, so concave outlines such as
    /// the corner "L" come out without triangles spilling outside the loop.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Triangulation`] if a face is degenerate or the
    /// triangulation rejects a point.
    pub fn triangulate(&self) -> Result<TriangleMesh, GeometryError> {
        let mut indices = Vec::new();
        for face in &self.faces {
            if face.len() == 3 {
                indices.push([face[0], face[1], face[2]]);
                continue;
            }
            indices.extend(self.triangulate_face(face)?);
        }
        Ok(TriangleMesh {
            vertices: self.vertices.clone(),
            indices,
        })
    }

    fn triangulate_face(&self, face: &[u32]) -> Result<Vec<[u32; 3]>, GeometryError> {
        let points: Vec<Point3> = face
            .iter()
            .map(|&i| {
                self.vertices
                    .get(i as usize)
                    .copied()
                    .ok_or(GeometryError::EntityNotFound("vertex index"))
            })
            .collect::<Result<_, _>>()?;
        let normal = newell_normal(&points)
            .try_normalize(TOLERANCE)
            .ok_or_else(|| GeometryError::Triangulation("face has zero area".into()))?;

        let seed = if normal.x.abs() < 0.9 { Vector3::x() } else { Vector3::y() };
        let u_dir = seed.cross(&normal).normalize();
        let v_dir = normal.cross(&u_dir);
        let origin = points[0];
        let project = |p: &Point3| {
            let d = p - origin;
            SpadePoint2::new(d.dot(&u_dir), d.dot(&v_dir))
        };
        let outline: Vec<SpadePoint2<f64>> = points.iter().map(project).collect();

        let mut cdt = ConstrainedDelaunayTriangulation::<SpadePoint2<f64>>::new();
        let mut handles = Vec::with_capacity(outline.len());
        let mut source: HashMap<usize, u32> = HashMap::new();
        for (&pt, &index) in outline.iter().zip(face) {
            let h = cdt
                .insert(pt)
                .map_err(|e: InsertionError| GeometryError::Triangulation(format!("CDT insert: {e}")))?;
            source.entry(h.index()).or_insert(index);
            handles.push(h);
        }
        for i in 0..handles.len() {
            let from = handles[i];
            let to = handles[(i + 1) % handles.len()];
            if from != to {
                cdt.add_constraint(from, to);
            }
        }

        let mut triangles = Vec::new();
        for face_handle in cdt.inner_faces() {
            let verts = face_handle.vertices();
            let centroid = verts
                .iter()
                .fold((0.0, 0.0), |(x, y), v| (x + v.position().x, y + v.position().y));
            let centroid = SpadePoint2::new(centroid.0 / 3.0, centroid.1 / 3.0);
            if !contains(&outline, centroid) {
                continue;
            }
            let mut tri = [0u32; 3];
            for (slot, vh) in tri.iter_mut().zip(verts.iter()) {
                *slot = source[&vh.fix().index()];
            }
            triangles.push(tri);
        }
        Ok(triangles)
    }
}

/// Even-odd point-in-polygon test.
fn contains(polygon: &[SpadePoint2<f64>], p: SpadePoint2<f64>) -> bool {
    let n = polygon.len();
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (polygon[i], polygon[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn l_shape() -> MeshData {
        MeshData {
            vertices: vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(4.0, 0.0, 0.0),
                Point3::new(4.0, 2.0, 0.0),
                Point3::new(2.0, 2.0, 0.0),
                Point3::new(2.0, 4.0, 0.0),
                Point3::new(0.0, 4.0, 0.0),
            ],
            faces: vec![vec![0, 1, 2, 3, 4, 5]],
            ..MeshData::default()
        }
    }

    fn area(mesh: &TriangleMesh, tri: [u32; 3]) -> Vector3 {
        let [a, b, c] = tri.map(|i| mesh.vertices[i as usize]);
        (b - a).cross(&(c - a)) / 2.0
    }

    #[test]
    fn concave_l_yields_four_triangles_inside() {
        let tris = l_shape().triangulate().unwrap();
        assert_eq!(tris.indices.len(), 4);
        let total: f64 = tris.indices.iter().map(|&t| area(&tris, t).z).sum();
        assert!((total - 12.0).abs() < 1e-9, "area {total}");
    }

    #[test]
    fn triangles_keep_face_winding() {
        let tris = l_shape().triangulate().unwrap();
        for &t in &tris.indices {
            assert!(area(&tris, t).z > 0.0);
        }
    }

    #[test]
    fn vertical_face_is_triangulated() {
        let data = MeshData {
            vertices: vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
                Point3::new(0.0, 1.0, 1.0),
                Point3::new(0.0, 0.0, 1.0),
            ],
            faces: vec![vec![0, 1, 2, 3]],
            ..MeshData::default()
        };
        let tris = data.triangulate().unwrap();
        assert_eq!(tris.indices.len(), 2);
        for &t in &tris.indices {
            assert!(area(&tris, t).x > 0.0);
        }
    }
}
