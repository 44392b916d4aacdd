//! Mitred corner ("L") walls.
//!
//! Each leg of the corner is split into two right triangles that share the
//! corner's half angle. The outer triangle gives the run of the outer face;
//! the inner triangle gives how far the inner face runs before it meets the
//! mitre line at the requested thickness.

use tracing::debug;

use super::{connect_tags, draw_closed_profile, tag, ProfileDrawing, VertexTags};
use crate::error::{GeometryError, Result, ValidationError};
use crate::host::{MeshHandle, MeshHost};
use crate::mesh::{Extrude, ExtrudedSolid, Located, Mesh};
use crate::settings::GeneratorSettings;
use crate::turtle::{CursorState, Pen, Turtle};

/// Height of the texture band left untextured at the top of a corner wall.
const TOP_BAND: f64 = 0.01;

/// Vertex groups assigned to the sides of an extruded corner, with the tags
/// whose vertices make up each group.
pub const SIDE_GROUPS: [(&str, &[&str]); 6] = [
    ("Leg 1 Outer", &["origin", "x_outer_1", "x_outer_2"]),
    ("Leg 1 End", &["end_1_1", "end_1_2", "end_1_3"]),
    ("Leg 1 Inner", &["x_inner_1", "x_inner_2"]),
    ("Leg 2 Outer", &["origin", "y_outer_1", "y_outer_2"]),
    ("Leg 2 End", &["end_2_1", "end_2_2", "end_2_3"]),
    ("Leg 2 Inner", &["y_inner_1", "x_inner_2"]),
];

/// Groups that receive displacement texture on a corner wall core.
pub const TEXTURED_GROUPS: [&str; 4] = ["Leg 1 Outer", "Leg 1 Inner", "Leg 2 Outer", "Leg 2 Inner"];

/// Run lengths of the four faces of a corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleSet {
    /// Leg 1 outer run.
    pub a_adj: f64,
    /// Leg 1 inner run.
    pub b_adj: f64,
    /// Leg 2 outer run.
    pub c_adj: f64,
    /// Leg 2 inner run.
    pub d_adj: f64,
}

impl TriangleSet {
    /// Solves the corner triangles.
    ///
    /// The outer run of each leg is the leg length itself. The inner run is
    /// `(leg · tan(angle/2) − thickness) · tan(90° − angle/2)`.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the angle is outside (0, 180), a
    /// length is negative, or a leg is too short for the thickness (its inner
    /// run would not be positive).
    pub fn solve(
        leg_1: f64,
        leg_2: f64,
        thickness: f64,
        angle: f64,
    ) -> std::result::Result<Self, ValidationError> {
        if !(angle > 0.0 && angle < 180.0) {
            return Err(ValidationError::ParameterOutOfRange {
                parameter: "angle",
                value: angle,
                min: 0.0,
                max: 180.0,
            });
        }
        for (parameter, value) in [("leg_1", leg_1), ("leg_2", leg_2), ("thickness", thickness)] {
            if value.is_nan() || value < 0.0 {
                return Err(ValidationError::Negative { parameter, value });
            }
        }

        let half = angle / 2.0;
        let inner_run = |leg: f64| {
            let opposite = leg * half.to_radians().tan();
            (opposite - thickness) * (90.0 - half).to_radians().tan()
        };
        let set = Self {
            a_adj: leg_1,
            b_adj: inner_run(leg_1),
            c_adj: leg_2,
            d_adj: inner_run(leg_2),
        };
        for (leg, run) in [("leg_1", set.b_adj), ("leg_2", set.d_adj)] {
            if run <= 0.0 {
                return Err(ValidationError::InvalidInput(format!(
                    "{leg} is too short for thickness {thickness} at {angle}° (inner run {run})"
                )));
            }
        }
        Ok(set)
    }
}

/// A corner cross-section: solved triangles plus the angle and thickness
/// they were solved for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Corner {
    pub triangles: TriangleSet,
    pub angle: f64,
    pub thickness: f64,
}

impl Corner {
    /// Validates the inputs and solves the triangles.
    ///
    /// # Errors
    ///
    /// See [`TriangleSet::solve`].
    pub fn new(leg_1: f64, leg_2: f64, thickness: f64, angle: f64) -> Result<Self> {
        Ok(Self {
            triangles: TriangleSet::solve(leg_1, leg_2, thickness, angle)?,
            angle,
            thickness,
        })
    }

    /// Draws the flat corner outline at `start`.
    ///
    /// Every run is bracketed by seam-width segments so the ends of the legs
    /// can be told apart from their faces. The outline is merged, filled and
    /// cut into four faces by three connects: the mitre from the origin to
    /// the inner corner, and one across each leg end.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the thickness is not wider than two
    /// seams, and a geometry error if the outline does not close or a tagged
    /// vertex cannot be found.
    pub fn draw_2d(&self, start: CursorState, settings: &GeneratorSettings) -> Result<ProfileDrawing> {
        let s = settings.seam_offset;
        let t = self.thickness;
        if t <= 2.0 * s {
            return Err(ValidationError::ParameterOutOfRange {
                parameter: "thickness",
                value: t,
                min: 2.0 * s,
                max: f64::INFINITY,
            }
            .into());
        }
        let TriangleSet {
            a_adj,
            b_adj,
            c_adj,
            d_adj,
        } = self.triangles;

        let mut drawing = draw_closed_profile(
            CursorState { pen: Pen::Up, ..start },
            &start.up(),
            settings,
            |turtle, tags| {
                tag(tags, "origin", turtle);
                turtle.pen_down();

                // leg 1
                turtle.right(self.angle);
                run(turtle, tags, &[(a_adj - s, "x_outer_1"), (s, "x_outer_2")]);
                turtle.left(90.0);
                run(
                    turtle,
                    tags,
                    &[(s, "end_1_1"), (t - 2.0 * s, "end_1_2"), (s, "end_1_3")],
                );
                turtle.left(90.0);
                run(turtle, tags, &[(s, "x_inner_1"), (b_adj - s, "x_inner_2")]);

                // leg 2, starting again from the origin
                turtle.pen_up();
                turtle.home();
                turtle.pen_down();
                run(turtle, tags, &[(c_adj - s, "y_outer_1"), (s, "y_outer_2")]);
                turtle.right(90.0);
                run(
                    turtle,
                    tags,
                    &[(s, "end_2_1"), (t - 2.0 * s, "end_2_2"), (s, "end_2_3")],
                );
                turtle.right(90.0);
                run(turtle, tags, &[(s, "y_inner_1")]);
                // lands on x_inner_2
                turtle.forward(d_adj - s);

                turtle.pen_up();
                turtle.home();
            },
        )?;

        for (from, to) in [
            ("origin", "x_inner_2"),
            ("y_inner_1", "y_outer_1"),
            ("x_inner_1", "x_outer_1"),
        ] {
            connect_tags(&mut drawing.mesh, &drawing.tags, from, to, settings.merge_tolerance)?;
        }
        debug!(faces = drawing.mesh.face_count(), "corner outline split");
        Ok(drawing)
    }

    /// Draws a corner wall of `wall_height − base_height`.
    ///
    /// The wall is extruded along the start cursor's up axis in three steps
    /// (a seam, the body, a thin top band) so texturing can leave the bottom
    /// and top edges alone. Side groups from [`SIDE_GROUPS`] plus `Bottom`
    /// and `Top` are assigned.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the wall is not taller than the seam and
    /// top band together, plus any error from [`Corner::draw_2d`].
    pub fn draw_wall(
        &self,
        wall_height: f64,
        base_height: f64,
        start: CursorState,
        settings: &GeneratorSettings,
    ) -> Result<(ProfileDrawing, ExtrudedSolid)> {
        let seam = settings.seam_offset;
        let body = wall_height - base_height - seam - TOP_BAND;
        if body.is_nan() || body <= 0.0 {
            return Err(ValidationError::ParameterOutOfRange {
                parameter: "wall_height",
                value: wall_height,
                min: base_height + seam + TOP_BAND,
                max: f64::INFINITY,
            }
            .into());
        }

        let mut drawing = self.draw_2d(start, settings)?;
        let solid =
            Extrude::in_steps(start.up(), &[seam, body, TOP_BAND]).execute(&mut drawing.mesh)?;
        assign_side_groups(&mut drawing.mesh, &solid, &drawing.tags, settings.merge_tolerance)?;
        Ok((drawing, solid))
    }

    /// Draws a solid corner of `height` and hands it to the host, which
    /// extrudes it in one step.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a non-positive height, plus any error
    /// from drawing or from the host.
    pub fn draw_3d(
        &self,
        host: &mut dyn MeshHost,
        name: &str,
        height: f64,
        start: CursorState,
        settings: &GeneratorSettings,
    ) -> Result<(MeshHandle, VertexTags)> {
        if height.is_nan() || height <= 0.0 {
            return Err(ValidationError::ParameterOutOfRange {
                parameter: "height",
                value: height,
                min: 0.0,
                max: f64::INFINITY,
            }
            .into());
        }
        let drawing = self.draw_2d(start, settings)?;
        let handle = host.create_mesh(name, drawing.mesh.to_mesh_data())?;
        host.extrude(handle, start.up() * height)?;
        Ok((handle, drawing.tags))
    }

    /// Cursor at the inner end of leg 1, raised by `base_height`, with the
    /// start orientation.
    #[must_use]
    pub fn wall_start(&self, start: CursorState, base_height: f64) -> CursorState {
        let mut scratch = Mesh::new();
        let mut turtle = Turtle::new(&mut scratch, CursorState { pen: Pen::Up, ..start });
        turtle.rise(base_height);
        turtle.right(self.angle);
        turtle.forward(self.triangles.a_adj);
        turtle.left(90.0);
        turtle.forward(self.thickness);
        turtle.left(90.0);
        turtle.forward(self.triangles.b_adj);
        CursorState {
            position: turtle.position(),
            ..start
        }
    }

    /// Cursor moved into the corner so that a thinner corner drawn from it
    /// keeps `inset` between its outer faces and this corner's outer faces.
    #[must_use]
    pub fn inset_start(&self, start: CursorState, inset: f64) -> CursorState {
        let half = self.angle / 2.0;
        let mut scratch = Mesh::new();
        let mut turtle = Turtle::new(&mut scratch, CursorState { pen: Pen::Up, ..start });
        turtle.right(half);
        turtle.forward(inset / half.to_radians().sin());
        CursorState {
            position: turtle.position(),
            ..start
        }
    }

    /// Distance along each leg between this corner's outer corner and the
    /// outer corner of one inset by `inset`.
    #[must_use]
    pub fn inset_run(&self, inset: f64) -> f64 {
        inset / (self.angle / 2.0).to_radians().tan()
    }
}

/// Moves forward by each distance in turn, tagging the position reached.
fn run(turtle: &mut Turtle<'_>, tags: &mut VertexTags, steps: &[(f64, &str)]) {
    for &(distance, name) in steps {
        turtle.forward(distance);
        tag(tags, name, turtle);
    }
}

/// Assigns `Bottom`, `Top` and the leg side groups to an extruded corner.
///
/// Side groups span every level above the profile, so the seam band at the
/// bottom is left out of them.
fn assign_side_groups(
    mesh: &mut Mesh,
    solid: &ExtrudedSolid,
    tags: &VertexTags,
    tolerance: f64,
) -> std::result::Result<(), GeometryError> {
    let bottom = solid.bottom().to_vec();
    let top = solid.top().to_vec();
    mesh.assign_group("Bottom", bottom.iter().copied());
    mesh.assign_group("Top", top);

    for (group, names) in SIDE_GROUPS {
        let mut members = Vec::new();
        for &name in names {
            let column = tags
                .get(name)
                .and_then(|p| match mesh.locate(p, tolerance) {
                    Located::Unique(v) | Located::Nearest { vertex: v, .. } => Some(v),
                    Located::Missing => None,
                })
                .and_then(|v| bottom.iter().position(|&b| b == v))
                .ok_or_else(|| GeometryError::ProfileInconsistency {
                    tag: name.to_owned(),
                    mesh: Box::new(mesh.clone()),
                })?;
            members.extend(
                solid.layers[1..]
                    .iter()
                    .filter_map(|layer| layer.get(column).copied()),
            );
        }
        mesh.assign_group(group, members);
    }
    Ok(())
}

/// Draws the flat corner outline and hands it to the host.
///
/// # Errors
///
/// Returns a validation error for bad legs, thickness or angle, and a
/// geometry error if the outline cannot be built.
pub fn generate_corner_wall_profile(
    host: &mut dyn MeshHost,
    leg_1: f64,
    leg_2: f64,
    thickness: f64,
    angle: f64,
    settings: &GeneratorSettings,
) -> Result<(MeshHandle, VertexTags)> {
    let corner = Corner::new(leg_1, leg_2, thickness, angle)?;
    let drawing = corner.draw_2d(CursorState::origin(), settings)?;
    let handle = host.create_mesh("corner_profile", drawing.mesh.to_mesh_data())?;
    Ok((handle, drawing.tags))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::TileError;
    use crate::host::SceneStore;
    use crate::math::{newell_normal, Point3, Vector3};
    use approx::assert_relative_eq;

    fn settings() -> GeneratorSettings {
        GeneratorSettings::default()
    }

    // ── Triangle solver ────────────────────────────────────────

    #[test]
    fn right_angle_corner_runs() {
        let t = TriangleSet::solve(2.0, 2.0, 0.3, 90.0).unwrap();
        assert_relative_eq!(t.a_adj, 2.0);
        assert_relative_eq!(t.b_adj, 1.7, epsilon = 1e-12);
        assert_relative_eq!(t.c_adj, 2.0);
        assert_relative_eq!(t.d_adj, 1.7, epsilon = 1e-12);
    }

    #[test]
    fn inner_run_never_exceeds_outer_run() {
        for angle in [5.0, 30.0, 60.0, 90.0, 120.0, 150.0, 175.0] {
            let t = TriangleSet::solve(3.0, 4.0, 0.1, angle).unwrap();
            assert!(t.b_adj <= t.a_adj, "angle {angle}");
            assert!(t.d_adj <= t.c_adj, "angle {angle}");
            // the outer run minus the inner run is the mitre's reach along the leg
            let reach = 0.1 / (angle / 2.0_f64).to_radians().tan();
            assert_relative_eq!(t.a_adj - t.b_adj, reach, epsilon = 1e-9);
        }
    }

    #[test]
    fn zero_thickness_keeps_runs_equal() {
        let t = TriangleSet::solve(2.0, 1.0, 0.0, 70.0).unwrap();
        assert_relative_eq!(t.b_adj, t.a_adj, epsilon = 1e-12);
        assert_relative_eq!(t.d_adj, t.c_adj, epsilon = 1e-12);
    }

    #[test]
    fn angles_outside_open_interval_are_rejected() {
        for angle in [0.0, 180.0, -10.0, 200.0, f64::NAN] {
            assert!(matches!(
                TriangleSet::solve(2.0, 2.0, 0.3, angle),
                Err(ValidationError::ParameterOutOfRange { parameter: "angle", .. })
            ));
        }
    }

    #[test]
    fn leg_too_short_for_thickness_is_rejected() {
        assert!(matches!(
            TriangleSet::solve(0.2, 2.0, 0.3, 90.0),
            Err(ValidationError::InvalidInput(_))
        ));
        assert!(matches!(
            TriangleSet::solve(2.0, -1.0, 0.3, 90.0),
            Err(ValidationError::Negative { parameter: "leg_2", .. })
        ));
    }

    // ── Flat outline ───────────────────────────────────────────

    #[test]
    fn outline_has_fourteen_vertices_and_four_faces() {
        let corner = Corner::new(2.0, 2.0, 0.3, 90.0).unwrap();
        let drawing = corner.draw_2d(CursorState::origin(), &settings()).unwrap();
        assert_eq!(drawing.mesh.vertex_count(), 14);
        assert_eq!(drawing.mesh.face_count(), 4);
        assert_eq!(drawing.mesh.edge_count(), 17);
        assert_eq!(drawing.tags.len(), 15);
        for (fid, _) in drawing.mesh.faces() {
            let n = newell_normal(&drawing.mesh.face_points(fid).unwrap());
            assert!(n.z > 0.0);
        }
        // the turtle ends where it started
        assert_eq!(drawing.cursor.position, Point3::origin());
    }

    #[test]
    fn tagged_positions_match_right_angle_layout() {
        let corner = Corner::new(2.0, 2.0, 0.3, 90.0).unwrap();
        let tags = corner.draw_2d(CursorState::origin(), &settings()).unwrap().tags;
        assert_relative_eq!(tags["x_outer_2"], Point3::new(2.0, 0.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(tags["end_1_3"], Point3::new(2.0, 0.3, 0.0), epsilon = 1e-12);
        assert_relative_eq!(tags["x_inner_2"], Point3::new(0.3, 0.3, 0.0), epsilon = 1e-12);
        assert_relative_eq!(tags["y_outer_2"], Point3::new(0.0, 2.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(tags["end_2_3"], Point3::new(0.3, 2.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(tags["y_inner_1"], Point3::new(0.3, 1.999, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn oblique_corner_closes() {
        let corner = Corner::new(3.0, 2.5, 0.25, 60.0).unwrap();
        let drawing = corner.draw_2d(CursorState::origin(), &settings()).unwrap();
        assert_eq!(drawing.mesh.vertex_count(), 14);
        assert_eq!(drawing.mesh.face_count(), 4);
    }

    #[test]
    fn thickness_must_exceed_two_seams() {
        let corner = Corner::new(2.0, 2.0, 0.0015, 90.0).unwrap();
        assert!(matches!(
            corner.draw_2d(CursorState::origin(), &settings()),
            Err(TileError::Validation(_))
        ));
    }

    // ── Walls and solids ───────────────────────────────────────

    #[test]
    fn wall_is_extruded_in_three_bands() {
        let corner = Corner::new(2.0, 2.0, 0.3, 90.0).unwrap();
        let (drawing, solid) = corner
            .draw_wall(2.0, 0.3, CursorState::origin(), &settings())
            .unwrap();
        assert_eq!(solid.layers.len(), 4);
        let (lo, hi) = drawing.mesh.bounds().unwrap();
        assert_relative_eq!(lo.z, 0.0);
        assert_relative_eq!(hi.z, 1.7, epsilon = 1e-12);
        // 4 bottom + 4 top + 14 sides per band
        assert_eq!(drawing.mesh.face_count(), 8 + 3 * 14);
        assert_eq!(drawing.mesh.group("Top").unwrap().len(), 14);
        assert_eq!(drawing.mesh.group("Leg 1 Outer").unwrap().len(), 9);
        assert_eq!(drawing.mesh.group("Leg 2 Inner").unwrap().len(), 6);
    }

    #[test]
    fn wall_must_clear_seam_and_top_band() {
        let corner = Corner::new(2.0, 2.0, 0.3, 90.0).unwrap();
        assert!(corner
            .draw_wall(0.31, 0.3, CursorState::origin(), &settings())
            .is_err());
    }

    #[test]
    fn solid_corner_goes_through_host_extrude() {
        let mut scene = SceneStore::new();
        let corner = Corner::new(2.0, 2.0, 0.5, 90.0).unwrap();
        let (handle, tags) = corner
            .draw_3d(&mut scene, "corner_base", 0.3, CursorState::origin(), &settings())
            .unwrap();
        let data = &scene.mesh(handle).unwrap().data;
        assert_eq!(data.vertices.len(), 28);
        assert_eq!(data.faces.len(), 8 + 14);
        assert_eq!(tags.len(), 15);
    }

    #[test]
    fn wall_start_sits_on_inner_corner() {
        let corner = Corner::new(2.0, 2.0, 0.3, 90.0).unwrap();
        let start = corner.wall_start(CursorState::origin(), 0.3);
        assert_relative_eq!(start.position, Point3::new(0.3, 0.3, 0.3), epsilon = 1e-12);
        assert_relative_eq!(start.heading(), Vector3::y(), epsilon = 1e-12);
    }

    #[test]
    fn inset_start_is_equidistant_from_both_legs() {
        let corner = Corner::new(2.0, 2.0, 0.5, 90.0).unwrap();
        let start = corner.inset_start(CursorState::origin(), 0.1);
        assert_relative_eq!(start.position, Point3::new(0.1, 0.1, 0.0), epsilon = 1e-12);
        assert_relative_eq!(corner.inset_run(0.1), 0.1, epsilon = 1e-12);
    }

    #[test]
    fn profile_is_published_with_tags() {
        let mut scene = SceneStore::new();
        let (handle, tags) =
            generate_corner_wall_profile(&mut scene, 2.0, 2.0, 0.3, 90.0, &settings()).unwrap();
        assert_eq!(scene.mesh(handle).unwrap().data.vertices.len(), 14);
        assert!(tags.contains_key("origin"));
        assert!(matches!(
            generate_corner_wall_profile(&mut scene, 2.0, 2.0, 0.3, 180.0, &settings()),
            Err(TileError::Validation(_))
        ));
    }
}
