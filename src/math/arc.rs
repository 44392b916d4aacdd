//! Circular arc arithmetic shared by the curved tile generators.
use std::f64::consts::TAU;

/// Length of an arc of `degrees` on a circle of `radius`.
///
/// `(degrees / 360) · 2π · radius`. A zero sweep yields zero length, so
/// callers that divide by the result must reject it first.
#[must_use]
pub fn arc_length(radius: f64, degrees: f64) -> f64 {
    (degrees / 360.0) * TAU * radius
}

/// Central angle in degrees subtended by an arc of `length` at `radius`.
///
/// Returns `0.0` for a degenerate radius.
#[must_use]
pub fn central_angle(length: f64, radius: f64) -> f64 {
    if radius.abs() < super::TOLERANCE {
        return 0.0;
    }
    (length / radius).to_degrees()
}

/// Chord length spanning `degrees` on a circle of `radius`.
#[must_use]
pub fn chord_length(radius: f64, degrees: f64) -> f64 {
    2.0 * radius * (degrees.to_radians() / 2.0).sin()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn quarter_circle_of_radius_two_is_pi() {
        assert_relative_eq!(arc_length(2.0, 90.0), PI, epsilon = 1e-12);
    }

    #[test]
    fn zero_radius_gives_zero_length() {
        assert_relative_eq!(arc_length(0.0, 120.0), 0.0);
        assert_relative_eq!(central_angle(1.0, 0.0), 0.0);
    }

    #[test]
    fn central_angle_inverts_arc_length() {
        let len = arc_length(3.5, 47.0);
        assert_relative_eq!(central_angle(len, 3.5), 47.0, epsilon = 1e-9);
    }

    #[test]
    fn chord_of_sixty_degrees_equals_radius() {
        assert_relative_eq!(chord_length(1.5, 60.0), 1.5, epsilon = 1e-12);
    }
}
