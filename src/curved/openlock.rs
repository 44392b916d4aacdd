//! OpenLOCK connector cutters for curved bases and wall cores.
//!
//! Positions are given for a tile whose base starts on the +Y axis at the
//! base radius and sweeps clockwise by the arc.

use nalgebra::Translation3;
use tracing::{debug, warn};

use super::connectors::{array_count, swept, PlaceConnectorArray};
use crate::error::Result;
use crate::host::{BooleanOp, CutterPlacement, MeshHandle, MeshHost};
use crate::math::arc::{arc_length, central_angle};
use crate::math::{rotation_z, Isometry3, Vector3};
use crate::profile::MakeCurvedCuboid;
use crate::settings::GeneratorSettings;
use crate::subdivision::SubdivisionDensity;
use crate::tile::{SocketSide, TileDimensions, WallPosition};

pub const CLIP_CUTTER: &str = "openlock.wall.base.cutter.clip_single";
pub const SIDE_CUTTER: &str = "openlock.wall.cutter.side";
pub const TOP_PEG: &str = "openlock.top_peg";

const SLOT_WIDTH: f64 = 0.181;
const SLOT_HEIGHT: f64 = 0.24;
/// Uncut length left at each end of the slot.
const SLOT_END_MARGIN: f64 = 0.236;
const SLOT_OUTER_CLEARANCE: f64 = 0.18;
/// Distance from the socket face to the clip and slot cutters.
const SOCKET_INSET: f64 = 0.25;
/// Overlap that keeps boolean faces from being coplanar.
const OVERLAP: f64 = 0.001;

const SIDE_CUTTER_Z: f64 = 0.63;
const SIDE_CUTTER_ROW_GAP: f64 = 0.75;
const SIDE_CUTTER_SPACING: f64 = 2.0;

const PEG_X: f64 = -0.25;
const PEG_SPACING: f64 = 0.505;
const PEG_CENTER_OFFSET: f64 = 0.075;
const PEG_SIDE_INSET: f64 = 0.33;
/// Smallest base radius with room for top pegs.
const PEG_MIN_RADIUS: f64 = 1.0;

/// Cuts the clip slot into the underside of a base.
///
/// The slot is a curved cuboid concentric with the base, shortened at both
/// ends and centred on the arc. Returns `None` when the arc is too short to
/// leave any slot.
///
/// # Errors
///
/// Returns an error if the slot mesh cannot be built or the host rejects it.
pub fn slot_cutter(
    host: &mut dyn MeshHost,
    base: MeshHandle,
    dims: &TileDimensions,
    density: SubdivisionDensity,
    settings: &GeneratorSettings,
) -> Result<Option<MeshHandle>> {
    let radius = match dims.socket_side {
        SocketSide::Inner => dims.radius + SOCKET_INSET,
        SocketSide::Outer => {
            dims.radius + dims.base_size.y - SLOT_OUTER_CLEARANCE - SOCKET_INSET
        }
    };
    let length = arc_length(radius, dims.degrees_of_arc) - 2.0 * SLOT_END_MARGIN;
    let degrees = central_angle(length, radius);
    if !(length > 0.0 && degrees > 0.0) {
        warn!(radius, degrees_of_arc = dims.degrees_of_arc, "arc too short for a clip slot");
        return Ok(None);
    }

    let segments = density.resolve(length);
    let mut mesh =
        MakeCurvedCuboid::new(radius, degrees, SLOT_WIDTH, SLOT_HEIGHT + OVERLAP, segments)
            .execute(settings)?;
    mesh.transform(&Isometry3::from_parts(
        Translation3::new(0.0, 0.0, -OVERLAP),
        rotation_z(-(dims.degrees_of_arc - degrees) / 2.0),
    ));

    let slot = host.create_mesh("slot_cutter", mesh.to_mesh_data())?;
    host.boolean_combine(base, slot, BooleanOp::Difference)?;
    debug!(radius, length, degrees, "clip slot cut");
    Ok(Some(slot))
}

/// Clip cutters spaced around the socket side of a base.
///
/// # Errors
///
/// See [`PlaceConnectorArray::execute`].
pub fn clip_cutters(
    host: &mut dyn MeshHost,
    base: MeshHandle,
    dims: &TileDimensions,
    step_degrees: f64,
) -> Result<Vec<CutterPlacement>> {
    let (radius, spin) = match dims.socket_side {
        SocketSide::Inner => (dims.radius + SOCKET_INSET, 0.0),
        SocketSide::Outer => (dims.radius + dims.base_size.y - SOCKET_INSET, 180.0),
    };
    PlaceConnectorArray::new(base, CLIP_CUTTER, radius, dims.degrees_of_arc, step_degrees)
        .spun(spin)
        .execute(host)
}

/// Cutters for the clip holes at both ends of a wall core.
///
/// Two columns at each end: one from just above the base, one offset
/// upwards, each repeated every two units while it fits the wall height.
/// The far end copies are turned round and swept by the full arc.
///
/// # Errors
///
/// Returns an error if the side cutter asset cannot be loaded.
pub fn side_cutters(
    host: &mut dyn MeshHost,
    core: MeshHandle,
    dims: &TileDimensions,
    position: WallPosition,
) -> Result<Vec<CutterPlacement>> {
    let source = host.load_named_asset(SIDE_CUTTER)?;
    let mut y = dims.wall_core_radius() + dims.tile_size.y / 2.0;
    if position == WallPosition::Side {
        y += dims.side_offset();
    }
    let columns = [
        (SIDE_CUTTER_Z, dims.tile_size.z - 1.0),
        (SIDE_CUTTER_Z + SIDE_CUTTER_ROW_GAP, dims.tile_size.z - 1.8),
    ];

    let mut placements = Vec::new();
    for (spin, sweep) in [(0.0, 0.0), (180.0, dims.degrees_of_arc)] {
        for (z, fit) in columns {
            for i in 0..array_count(fit, SIDE_CUTTER_SPACING) {
                let offset = Vector3::new(0.0, y, z + SIDE_CUTTER_SPACING * f64::from(i));
                placements.push(CutterPlacement {
                    source,
                    target: core,
                    operation: BooleanOp::Difference,
                    transform: swept(offset, spin, sweep),
                });
            }
        }
    }
    debug!(count = placements.len(), "side cutters placed");
    Ok(placements)
}

/// Pegs on top of a wall core, at the middle of the arc.
///
/// Bases tighter than a unit radius have no room for pegs and get none.
///
/// # Errors
///
/// Returns an error if the peg asset cannot be loaded.
pub fn top_pegs(
    host: &mut dyn MeshHost,
    core: MeshHandle,
    dims: &TileDimensions,
    position: WallPosition,
) -> Result<Vec<CutterPlacement>> {
    if dims.radius < PEG_MIN_RADIUS {
        debug!(radius = dims.radius, "no room for top pegs");
        return Ok(Vec::new());
    }
    let source = host.load_named_asset(TOP_PEG)?;
    let y = match position {
        WallPosition::Center => {
            let centre = dims.radius + dims.base_size.y / 2.0;
            match dims.socket_side {
                SocketSide::Inner => centre + PEG_CENTER_OFFSET,
                SocketSide::Outer => centre - PEG_CENTER_OFFSET,
            }
        }
        WallPosition::Side => dims.radius + dims.base_size.y - PEG_SIDE_INSET,
    };
    Ok((0..2)
        .map(|i| {
            let offset = Vector3::new(PEG_X + PEG_SPACING * f64::from(i), y, dims.tile_size.z);
            CutterPlacement {
                source,
                target: core,
                operation: BooleanOp::Union,
                transform: swept(offset, 0.0, dims.degrees_of_arc / 2.0),
            }
        })
        .collect())
}
