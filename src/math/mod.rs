pub mod arc;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Orientation of a cursor or placed object.
pub type Rotation = nalgebra::UnitQuaternion<f64>;

/// Rigid transform (rotation followed by translation).
pub type Isometry3 = nalgebra::Isometry3<f64>;

/// Global tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Distance under which two vertices are treated as the same vertex.
///
/// Correctness-critical: coincident-vertex merging and connect-by-location
/// both match on this radius. It must stay well below the seam offset used
/// when drawing profiles, otherwise deliberately separate seam vertices
/// collapse into one.
pub const MERGE_TOLERANCE: f64 = 1e-4;

/// Rotation about the global Z axis by `degrees`, counter-clockwise seen from above.
#[must_use]
pub fn rotation_z(degrees: f64) -> Rotation {
    Rotation::from_axis_angle(&Vector3::z_axis(), degrees.to_radians())
}

/// Rotates `point` about the global Z axis through `center`.
#[must_use]
pub fn rotate_about_z(point: &Point3, center: &Point3, degrees: f64) -> Point3 {
    center + rotation_z(degrees) * (point - center)
}

/// Computes the (unnormalised) normal of a polygon using Newell's method.
#[must_use]
pub fn newell_normal(points: &[Point3]) -> Vector3 {
    let n = points.len();
    let mut normal = Vector3::zeros();
    for i in 0..n {
        let curr = &points[i];
        let next = &points[(i + 1) % n];
        normal.x += (curr.y - next.y) * (curr.z + next.z);
        normal.y += (curr.z - next.z) * (curr.x + next.x);
        normal.z += (curr.x - next.x) * (curr.y + next.y);
    }
    normal
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rotate_quarter_turn_about_origin() {
        let p = rotate_about_z(&Point3::new(0.0, 2.0, 1.0), &Point3::origin(), -90.0);
        assert_relative_eq!(p.x, 2.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.z, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn newell_normal_of_ccw_square_points_up() {
        let pts = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let n = newell_normal(&pts);
        // twice the enclosed area, along +Z
        assert_relative_eq!(n, Vector3::new(0.0, 0.0, 2.0), epsilon = 1e-12);
    }
}
