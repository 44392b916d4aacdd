use tracing::warn;

use super::draw_closed_profile;
use crate::error::{Result, ValidationError};
use crate::math::arc::chord_length;
use crate::math::{Point3, Vector3};
use crate::mesh::{Extrude, Mesh};
use crate::settings::GeneratorSettings;
use crate::turtle::CursorState;

/// Radius below which an arc is treated as collapsing onto its centre.
const DEGENERATE_RADIUS: f64 = 1e-6;

/// Builds an annular sector: a cuboid swept along a true arc.
///
/// The arc is centred on the origin, starts on the +Y axis at `radius` and
/// runs clockwise seen from above. The profile is traced as chords, inner
/// arc first, and then extruded up by `height`.
#[derive(Debug, Clone, Copy)]
pub struct MakeCurvedCuboid {
    radius: f64,
    degrees: f64,
    width: f64,
    height: f64,
    segments: u32,
}

impl MakeCurvedCuboid {
    #[must_use]
    pub fn new(radius: f64, degrees: f64, width: f64, height: f64, segments: u32) -> Self {
        Self {
            radius,
            degrees,
            width,
            height,
            segments,
        }
    }

    /// Executes the operation. Chord ends closer than
    /// `settings.merge_tolerance` are merged before the outline is filled.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the arc is not in (0, 360), the radius
    /// is negative, or the width or height is not positive.
    pub fn execute(&self, settings: &GeneratorSettings) -> Result<Mesh> {
        if !(self.degrees > 0.0 && self.degrees < 360.0) {
            return Err(ValidationError::ParameterOutOfRange {
                parameter: "degrees_of_arc",
                value: self.degrees,
                min: 0.0,
                max: 360.0,
            }
            .into());
        }
        if self.radius.is_nan() || self.radius < 0.0 {
            return Err(ValidationError::Negative {
                parameter: "radius",
                value: self.radius,
            }
            .into());
        }
        for (parameter, value) in [("width", self.width), ("height", self.height)] {
            if value.is_nan() || value <= 0.0 {
                return Err(ValidationError::ParameterOutOfRange {
                    parameter,
                    value,
                    min: 0.0,
                    max: f64::INFINITY,
                }
                .into());
            }
        }
        if self.radius < DEGENERATE_RADIUS {
            warn!(radius = self.radius, "curved cuboid radius is close to zero");
        }

        let segments = self.segments.max(1);
        let step = self.degrees / f64::from(segments);
        let inner = chord_length(self.radius, step);
        let outer = chord_length(self.radius + self.width, step);

        let start = CursorState::at(Point3::new(0.0, self.radius, 0.0)).turned_right(90.0);
        let mut mesh = draw_closed_profile(start, &Vector3::z(), settings, |turtle, _| {
            turtle.pen_down();
            for _ in 0..segments {
                turtle.right(step / 2.0);
                turtle.forward(inner);
                turtle.right(step / 2.0);
            }
            turtle.left(90.0);
            turtle.forward(self.width);
            turtle.left(90.0);
            for _ in 0..segments {
                turtle.left(step / 2.0);
                turtle.forward(outer);
                turtle.left(step / 2.0);
            }
            turtle.left(90.0);
            turtle.forward(self.width);
        })?
        .mesh;
        Extrude::new(Vector3::z() * self.height).execute(&mut mesh)?;
        Ok(mesh)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn radial_extent(mesh: &Mesh) -> (f64, f64) {
        mesh.vertices()
            .map(|(_, v)| v.point.xy().coords.norm())
            .fold((f64::INFINITY, 0.0), |(lo, hi), r| (lo.min(r), hi.max(r)))
    }

    #[test]
    fn quarter_sector_spans_inner_and_outer_radius() {
        let mesh = MakeCurvedCuboid::new(2.0, 90.0, 0.5, 0.3, 12)
            .execute(&GeneratorSettings::default())
            .unwrap();
        // 13 points on each arc, top and bottom
        assert_eq!(mesh.vertex_count(), 2 * 26);
        assert_eq!(mesh.face_count(), 2 + 26);
        let (lo, hi) = radial_extent(&mesh);
        // chord endpoints lie on the arcs themselves
        assert_relative_eq!(lo, 2.0, epsilon = 1e-9);
        assert_relative_eq!(hi, 2.5, epsilon = 1e-9);
        let (min, max) = mesh.bounds().unwrap();
        assert_relative_eq!(min.z, 0.0);
        assert_relative_eq!(max.z, 0.3);
    }

    #[test]
    fn sweep_runs_clockwise_from_y_axis() {
        let mesh = MakeCurvedCuboid::new(2.0, 90.0, 0.5, 0.3, 4)
            .execute(&GeneratorSettings::default())
            .unwrap();
        let end = Point3::new(2.0, 0.0, 0.0);
        assert!(mesh
            .vertices()
            .any(|(_, v)| (v.point - end).norm() < 1e-9));
        let (min, _) = mesh.bounds().unwrap();
        assert!(min.x > -1e-9 && min.y > -1e-9);
    }

    #[test]
    fn zero_radius_collapses_to_pie_slice() {
        let mesh = MakeCurvedCuboid::new(0.0, 90.0, 1.0, 0.2, 4)
            .execute(&GeneratorSettings::default())
            .unwrap();
        // apex + 5 outer points, top and bottom
        assert_eq!(mesh.vertex_count(), 12);
    }

    #[test]
    fn coarse_merge_tolerance_collapses_tight_inner_arc() {
        let make = MakeCurvedCuboid::new(0.01, 90.0, 1.0, 0.2, 4);
        let fine = make.execute(&GeneratorSettings::default()).unwrap();
        // 5 points on each arc, top and bottom
        assert_eq!(fine.vertex_count(), 20);

        // the whole inner arc fits inside the tolerance
        let settings = GeneratorSettings {
            merge_tolerance: 0.05,
            ..GeneratorSettings::default()
        };
        let coarse = make.execute(&settings).unwrap();
        assert_eq!(coarse.vertex_count(), 12);
        let (lo, hi) = radial_extent(&coarse);
        assert_relative_eq!(lo, 0.01, epsilon = 1e-9);
        assert_relative_eq!(hi, 1.01, epsilon = 1e-9);
    }

    #[test]
    fn arc_out_of_range_is_rejected() {
        for degrees in [0.0, 360.0, -5.0] {
            assert!(MakeCurvedCuboid::new(2.0, degrees, 0.5, 0.3, 4)
                .execute(&GeneratorSettings::default())
                .is_err());
        }
        assert!(MakeCurvedCuboid::new(-1.0, 90.0, 0.5, 0.3, 4)
            .execute(&GeneratorSettings::default())
            .is_err());
    }
}
