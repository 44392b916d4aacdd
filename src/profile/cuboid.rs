use super::draw_closed_profile;
use crate::error::{Result, ValidationError};
use crate::math::Vector3;
use crate::mesh::{Extrude, Mesh};
use crate::settings::GeneratorSettings;
use crate::subdivision::Subdivisions;
use crate::turtle::CursorState;

/// Vertex groups of a cuboid, as `(name, axis, at_max)`.
///
/// Left/Right sit at the ends along X, Front/Back across Y and Bottom/Top
/// along Z.
pub const CUBOID_GROUPS: [(&str, usize, bool); 6] = [
    ("Left", 0, false),
    ("Right", 0, true),
    ("Front", 1, false),
    ("Back", 1, true),
    ("Bottom", 2, false),
    ("Top", 2, true),
];

/// Builds a subdivided cuboid with one corner at the origin.
///
/// The YZ cross-section is drawn by the turtle with `subdivisions.y` and
/// `subdivisions.z` segments per side, then extruded along +X in
/// `subdivisions.x` layers, so the four long sides come out as quad grids.
#[derive(Debug, Clone, Copy)]
pub struct MakeCuboid {
    size: Vector3,
    subdivisions: Subdivisions,
}

impl MakeCuboid {
    #[must_use]
    pub fn new(size: Vector3, subdivisions: Subdivisions) -> Self {
        Self { size, subdivisions }
    }

    /// Executes the operation. Outline vertices are merged, and side groups
    /// matched, within `settings.merge_tolerance`.
    ///
    /// # Errors
    ///
    /// Returns a validation error if any side is not positive.
    pub fn execute(&self, settings: &GeneratorSettings) -> Result<Mesh> {
        for (parameter, value) in [("length", self.size.x), ("width", self.size.y), ("height", self.size.z)] {
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
        let Subdivisions { x: nx, y: ny, z: nz } = self.subdivisions;
        let (ny, nz) = (ny.max(1), nz.max(1));
        let dy = self.size.y / f64::from(ny);
        let dz = self.size.z / f64::from(nz);

        let mut mesh =
            draw_closed_profile(CursorState::origin(), &Vector3::x(), settings, |turtle, _| {
                turtle.pen_down();
                for (count, step) in [(ny, dy), (nz, dz), (ny, dy), (nz, dz)] {
                    for _ in 0..count {
                        turtle.forward(step);
                    }
                    turtle.pitch_up(90.0);
                }
            })?
            .mesh;
        Extrude::in_layers(Vector3::x() * self.size.x, nx).execute(&mut mesh)?;

        for (name, axis, at_max) in CUBOID_GROUPS {
            let value = if at_max { self.size[axis] } else { 0.0 };
            let members = mesh.vertices_on_plane(axis, value, settings.merge_tolerance);
            mesh.assign_group(name, members);
        }
        Ok(mesh)
    }
}
