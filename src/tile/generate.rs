use tracing::{debug, info_span, warn};

use super::{Blueprint, GeneratorRegistry, PartContext, PartKind, TileDimensions, TileKind, TileRequest};
use crate::error::Result;
use crate::host::{MeshHandle, MeshHost, TrackingHost};
use crate::math::Vector3;
use crate::settings::GeneratorSettings;

/// Meshes produced for one tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedTile {
    pub name: String,
    pub base: Option<MeshHandle>,
    /// Core meshes in build order: the wall or floor, then any S-wall floor.
    pub cores: Vec<MeshHandle>,
    /// Every mesh created for the tile, cutters included, oldest first.
    pub created: Vec<MeshHandle>,
}

/// Generates a tile through the registry.
///
/// The base is built first, then the core, then the extra floor of an S-wall
/// base. Either every part is built or, on the first error, everything
/// created so far is removed from the host again.
///
/// # Errors
///
/// Returns validation errors before anything is created, and otherwise the
/// first error raised by a part generator.
pub fn generate_tile(
    host: &mut dyn MeshHost,
    registry: &GeneratorRegistry,
    request: &TileRequest,
    settings: &GeneratorSettings,
) -> Result<GeneratedTile> {
    let _span = info_span!("generate_tile", name = %request.name).entered();
    request.validate()?;

    let mut tracking = TrackingHost::new(host);
    match build(&mut tracking, registry, request, settings) {
        Ok((base, cores)) => {
            let created = tracking.commit();
            debug!(meshes = created.len(), "tile generated");
            Ok(GeneratedTile {
                name: request.name.clone(),
                base,
                cores,
                created,
            })
        }
        Err(err) => {
            warn!(error = %err, "tile generation failed");
            tracking.rollback();
            Err(err)
        }
    }
}

fn build(
    host: &mut dyn MeshHost,
    registry: &GeneratorRegistry,
    request: &TileRequest,
    settings: &GeneratorSettings,
) -> Result<(Option<MeshHandle>, Vec<MeshHandle>)> {
    let (base_part, core_part) = request.kind.parts();
    let mut context = PartContext {
        request,
        settings,
        base: None,
    };
    let base = registry.generate(request.base_blueprint, base_part, host, &context)?;
    context.base = base;

    let mut cores = Vec::new();
    cores.extend(registry.generate(request.core_blueprint, core_part, host, &context)?);

    if request.kind == TileKind::CurvedWall && request.base_blueprint.has_side_floor() {
        let floor = side_floor_request(request);
        let context = PartContext {
            request: &floor,
            ..context
        };
        cores.extend(registry.generate(Blueprint::Plain, PartKind::CurvedFloorCore, host, &context)?);
    }
    Ok((base, cores))
}

/// Request for the floor laid over an S-wall base next to its wall.
fn side_floor_request(request: &TileRequest) -> TileRequest {
    let base = request.dimensions.base_size;
    TileRequest {
        name: format!("{}.side", request.name),
        dimensions: TileDimensions {
            tile_size: Vector3::new(base.x, base.y, base.z + request.floor_thickness),
            ..request.dimensions
        },
        ..request.clone()
    }
}
