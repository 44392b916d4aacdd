//! Closed cross-sections drawn with the turtle, and the solids built from them.

pub mod corner;
pub mod cuboid;
pub mod curved_cuboid;

pub use corner::{Corner, TriangleSet};
pub use cuboid::{MakeCuboid, CUBOID_GROUPS};
pub use curved_cuboid::MakeCurvedCuboid;

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::GeometryError;
use crate::math::{Point3, Vector3};
use crate::mesh::Mesh;
use crate::settings::GeneratorSettings;
use crate::turtle::{CursorState, Turtle};

/// Positions captured by name while a profile is drawn.
pub type VertexTags = BTreeMap<String, Point3>;

/// A drawn profile together with the positions tagged along the way.
#[derive(Debug, Clone)]
pub struct ProfileDrawing {
    pub mesh: Mesh,
    pub tags: VertexTags,
    /// Cursor state when drawing finished.
    pub cursor: CursorState,
}

/// Draws a closed outline with the turtle and fills it.
///
/// `draw` gets a turtle at `start` on a fresh mesh and the tag table. Once it
/// returns, vertices within `settings.merge_tolerance` are merged and the
/// single boundary loop is filled as a face facing `normal`.
///
/// # Errors
///
/// Returns a geometry error if the merged outline is not one closed loop.
pub fn draw_closed_profile<F>(
    start: CursorState,
    normal: &Vector3,
    settings: &GeneratorSettings,
    draw: F,
) -> crate::Result<ProfileDrawing>
where
    F: FnOnce(&mut Turtle<'_>, &mut VertexTags),
{
    let mut mesh = Mesh::new();
    let mut tags = VertexTags::new();
    let cursor = {
        let mut turtle = Turtle::new(&mut mesh, start);
        draw(&mut turtle, &mut tags);
        turtle.finish()
    };
    let merged = mesh.merge_by_distance(settings.merge_tolerance);
    debug!(merged, vertices = mesh.vertex_count(), "profile outline closed");
    mesh.fill_boundary(normal)?;
    Ok(ProfileDrawing { mesh, tags, cursor })
}

/// Records the turtle's current position under `name`.
pub(crate) fn tag(tags: &mut VertexTags, name: &str, turtle: &Turtle<'_>) {
    tags.insert(name.to_owned(), turtle.position());
}

/// Connects the vertices found at two tagged positions.
///
/// # Errors
///
/// Returns [`GeometryError::ProfileInconsistency`] naming the first tag with
/// no vertex in range. The error carries a copy of the mesh as it was before
/// the connect was attempted.
pub(crate) fn connect_tags(
    mesh: &mut Mesh,
    tags: &VertexTags,
    from: &str,
    to: &str,
    tolerance: f64,
) -> Result<(), GeometryError> {
    let inconsistency = |tag: &str, mesh: &Mesh| GeometryError::ProfileInconsistency {
        tag: tag.to_owned(),
        mesh: Box::new(mesh.clone()),
    };
    let Some(p) = tags.get(from) else {
        return Err(inconsistency(from, mesh));
    };
    let Some(q) = tags.get(to) else {
        return Err(inconsistency(to, mesh));
    };
    match mesh.connect_by_location((from, p), (to, q), tolerance) {
        Ok(_) => Ok(()),
        Err(missing) => Err(inconsistency(missing, mesh)),
    }
}
