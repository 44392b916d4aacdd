//! Built-in part generators.

use tracing::debug;

use super::{PartContext, WallPosition};
use crate::curved::{openlock, CoreKind, CurvedCore, MakeCurvedBase, MakeCurvedCore};
use crate::displacement::convert_to_displacement_core;
use crate::error::Result;
use crate::host::{apply_placements, MeshHandle, MeshHost};
use crate::profile::{corner, Corner};
use crate::turtle::CursorState;

const WALL_TEXTURED_GROUPS: [&str; 2] = ["Front", "Back"];
const FLOOR_TEXTURED_GROUPS: [&str; 1] = ["Top"];

pub(super) fn empty(_: &mut dyn MeshHost, _: &PartContext<'_>) -> Result<Option<MeshHandle>> {
    Ok(None)
}

pub(super) fn plain_curved_base(
    host: &mut dyn MeshHost,
    ctx: &PartContext<'_>,
) -> Result<Option<MeshHandle>> {
    let request = ctx.request;
    let dims = &request.dimensions;
    let base = MakeCurvedBase::new(
        dims.radius,
        dims.degrees_of_arc,
        dims.base_size.y,
        dims.base_size.z,
        request.density,
    )
    .named(&format!("{}.base", request.name))
    .execute(host, ctx.settings)?;
    Ok(Some(base.handle))
}

pub(super) fn openlock_curved_base(
    host: &mut dyn MeshHost,
    ctx: &PartContext<'_>,
) -> Result<Option<MeshHandle>> {
    let Some(base) = plain_curved_base(host, ctx)? else {
        return Ok(None);
    };
    let dims = &ctx.request.dimensions;
    openlock::slot_cutter(host, base, dims, ctx.request.density, ctx.settings)?;
    let clips = openlock::clip_cutters(host, base, dims, ctx.settings.connector_step_degrees)?;
    apply_placements(host, &clips)?;
    Ok(Some(base))
}

fn wall_core(host: &mut dyn MeshHost, ctx: &PartContext<'_>) -> Result<CurvedCore> {
    let request = ctx.request;
    let dims = &request.dimensions;
    let mut make = MakeCurvedCore::new(
        CoreKind::Wall,
        dims.wall_core_radius(),
        dims.degrees_of_arc,
        dims.tile_size.y,
        dims.core_height(),
        request.density,
    )
    .named(&format!("{}.core", request.name))
    .elevated(dims.base_size.z);
    if request.wall_position == WallPosition::Side {
        make = make.shifted(dims.side_offset());
    }
    make.execute(host, ctx.settings)
}

pub(super) fn plain_wall_core(
    host: &mut dyn MeshHost,
    ctx: &PartContext<'_>,
) -> Result<Option<MeshHandle>> {
    let core = wall_core(host, ctx)?;
    convert_to_displacement_core(host, core.handle, &WALL_TEXTURED_GROUPS, ctx.settings)?;
    Ok(Some(core.handle))
}

pub(super) fn openlock_wall_core(
    host: &mut dyn MeshHost,
    ctx: &PartContext<'_>,
) -> Result<Option<MeshHandle>> {
    let core = wall_core(host, ctx)?;
    let dims = &ctx.request.dimensions;
    let position = ctx.request.wall_position;
    let cutters = openlock::side_cutters(host, core.handle, dims, position)?;
    apply_placements(host, &cutters)?;
    let pegs = openlock::top_pegs(host, core.handle, dims, position)?;
    apply_placements(host, &pegs)?;
    convert_to_displacement_core(host, core.handle, &WALL_TEXTURED_GROUPS, ctx.settings)?;
    Ok(Some(core.handle))
}

pub(super) fn floor_core(
    host: &mut dyn MeshHost,
    ctx: &PartContext<'_>,
) -> Result<Option<MeshHandle>> {
    let request = ctx.request;
    let dims = &request.dimensions;
    let core = MakeCurvedCore::new(
        CoreKind::Floor,
        dims.radius,
        dims.degrees_of_arc,
        dims.tile_size.y,
        dims.core_height(),
        request.density,
    )
    .named(&format!("{}.floor", request.name))
    .elevated(dims.base_size.z)
    .execute(host, ctx.settings)?;
    convert_to_displacement_core(host, core.handle, &FLOOR_TEXTURED_GROUPS, ctx.settings)?;
    Ok(Some(core.handle))
}

pub(super) fn corner_base(
    host: &mut dyn MeshHost,
    ctx: &PartContext<'_>,
) -> Result<Option<MeshHandle>> {
    let request = ctx.request;
    let dims = &request.dimensions;
    let legs = request.corner;
    let base = Corner::new(legs.leg_1, legs.leg_2, dims.base_size.y, legs.angle)?;
    let (handle, _) = base.draw_3d(
        host,
        &format!("{}.base", request.name),
        dims.base_size.z,
        CursorState::origin(),
        ctx.settings,
    )?;
    Ok(Some(handle))
}

pub(super) fn corner_wall_core(
    host: &mut dyn MeshHost,
    ctx: &PartContext<'_>,
) -> Result<Option<MeshHandle>> {
    let request = ctx.request;
    let dims = &request.dimensions;
    let legs = request.corner;
    let base = Corner::new(legs.leg_1, legs.leg_2, dims.base_size.y, legs.angle)?;
    let inset = dims.wall_inset();
    let run = base.inset_run(inset);
    let wall = Corner::new(legs.leg_1 - run, legs.leg_2 - run, dims.tile_size.y, legs.angle)?;

    let start = base.inset_start(CursorState::origin(), inset);
    let start = CursorState {
        position: start.position + start.up() * dims.base_size.z,
        ..start
    };
    let (drawing, _) = wall.draw_wall(dims.tile_size.z, dims.base_size.z, start, ctx.settings)?;
    let handle = host.create_mesh(&format!("{}.core", request.name), drawing.mesh.to_mesh_data())?;
    host.project_uv(handle, ctx.settings.uv_island_margin)?;
    convert_to_displacement_core(host, handle, &corner::TEXTURED_GROUPS, ctx.settings)?;
    debug!(inset, run, "corner wall core built");
    Ok(Some(handle))
}
