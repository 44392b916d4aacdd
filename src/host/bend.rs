use crate::math::{Point3, TOLERANCE};
use crate::mesh::MeshData;

/// A global coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }
}

/// A bend that wraps a straight mesh around an axis.
///
/// Recorded as a modifier and only evaluated on request. For a bend about Z
/// the mesh's extent along X is wrapped onto an arc of `angle_degrees`;
/// negative angles bend clockwise seen from above.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BendDeformation {
    pub axis: Axis,
    pub angle_degrees: f64,
    /// Whether the bend is visible in final renders.
    pub show_in_render: bool,
}

impl BendDeformation {
    #[must_use]
    pub fn new(axis: Axis, angle_degrees: f64, show_in_render: bool) -> Self {
        Self {
            axis,
            angle_degrees,
            show_in_render,
        }
    }

    /// Evaluates the bend on a copy of `data`.
    ///
    /// The bend starts at the low corner of the mesh bounds: that edge stays
    /// fixed and the mesh length along the bend direction maps onto the full
    /// angle.
    #[must_use]
    pub fn deform(&self, data: &MeshData) -> MeshData {
        let theta = self.angle_degrees.to_radians();
        let a = self.axis.index();
        let (u, v) = ((a + 1) % 3, (a + 2) % 3);

        let Some((lo, hi)) = bounds(&data.vertices) else {
            return data.clone();
        };
        let length = hi[u] - lo[u];
        if theta.abs() < TOLERANCE || length < TOLERANCE {
            return data.clone();
        }

        let radius = length / theta.abs();
        let s = -theta.signum();
        let mut center = lo;
        center[v] -= s * radius;

        let vertices = data
            .vertices
            .iter()
            .map(|p| {
                let phi = (p[u] - lo[u]) / radius;
                let rho = radius + s * (p[v] - lo[v]);
                let mut q = *p;
                q[u] = center[u] + rho * phi.sin();
                q[v] = center[v] + s * rho * phi.cos();
                q
            })
            .collect();
        MeshData {
            vertices,
            ..data.clone()
        }
    }
}

fn bounds(points: &[Point3]) -> Option<(Point3, Point3)> {
    let first = *points.first()?;
    Some(
        points
            .iter()
            .fold((first, first), |(lo, hi), p| (lo.inf(p), hi.sup(p))),
    )
}
