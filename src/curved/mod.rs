//! Arc-shaped tile parts.
//!
//! Cores are built straight and bent by the host afterwards, so that UVs can
//! be projected onto the flat mesh. Bases carry no texture and are swept
//! along a true arc instead.

pub mod connectors;
pub mod openlock;

pub use connectors::{connector_angles, PlaceConnectorArray};

use tracing::debug;

use crate::error::{Result, ValidationError};
use crate::host::{Axis, BendDeformation, CutterPlacement, MeshHandle, MeshHost};
use crate::math::arc::arc_length;
use crate::math::{Vector3, TOLERANCE};
use crate::profile::{MakeCuboid, MakeCurvedCuboid};
use crate::settings::GeneratorSettings;
use crate::subdivision::{SubdivisionDensity, Subdivisions};

/// Whether a core forms a wall or a floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoreKind {
    Wall,
    Floor,
}

/// A core handed to the host, with the figures it was built from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvedCore {
    pub handle: MeshHandle,
    /// Length of the straight cuboid before bending.
    pub arc_length: f64,
    pub subdivisions: Subdivisions,
    pub bend: BendDeformation,
}

/// Builds a curved core: a straight subdivided cuboid as long as the arc,
/// UV-projected and then bent clockwise about Z by the arc angle.
///
/// The cuboid runs along +X from `(0, radius + side_offset, elevation)`.
#[derive(Debug, Clone)]
pub struct MakeCurvedCore {
    kind: CoreKind,
    name: String,
    radius: f64,
    degrees: f64,
    width: f64,
    height: f64,
    elevation: f64,
    side_offset: f64,
    density: SubdivisionDensity,
}

impl MakeCurvedCore {
    #[must_use]
    pub fn new(
        kind: CoreKind,
        radius: f64,
        degrees: f64,
        width: f64,
        height: f64,
        density: SubdivisionDensity,
    ) -> Self {
        let name = match kind {
            CoreKind::Wall => "wall_core",
            CoreKind::Floor => "floor_core",
        };
        Self {
            kind,
            name: name.to_owned(),
            radius,
            degrees,
            width,
            height,
            elevation: 0.0,
            side_offset: 0.0,
            density,
        }
    }

    #[must_use]
    pub fn named(mut self, name: &str) -> Self {
        name.clone_into(&mut self.name);
        self
    }

    /// Lifts the core so its bottom sits at `z`.
    #[must_use]
    pub fn elevated(mut self, z: f64) -> Self {
        self.elevation = z;
        self
    }

    /// Moves the core outwards by `offset` without changing its length.
    #[must_use]
    pub fn shifted(mut self, offset: f64) -> Self {
        self.side_offset = offset;
        self
    }

    /// Executes the operation.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an arc outside (0, 360), a negative
    /// radius, an arc of zero length or a non-positive width or height, and
    /// any error the host raises.
    pub fn execute(
        &self,
        host: &mut dyn MeshHost,
        settings: &GeneratorSettings,
    ) -> Result<CurvedCore> {
        validate_arc(self.radius, self.degrees)?;
        let length = arc_length(self.radius, self.degrees);
        if length <= TOLERANCE {
            return Err(ValidationError::InvalidInput(format!(
                "core at radius {} has no length to bend",
                self.radius
            ))
            .into());
        }

        let size = Vector3::new(length, self.width, self.height);
        let subdivisions = Subdivisions::from_dimensions(self.density, &size);
        let mut mesh = MakeCuboid::new(size, subdivisions).execute(settings)?;
        mesh.translate(&Vector3::new(0.0, self.radius + self.side_offset, self.elevation));

        let handle = host.create_mesh(&self.name, mesh.to_mesh_data())?;
        host.project_uv(handle, settings.uv_island_margin)?;
        let show_in_render = match self.kind {
            CoreKind::Wall => false,
            CoreKind::Floor => !settings.curve_texture,
        };
        let bend = BendDeformation::new(Axis::Z, -self.degrees, show_in_render);
        host.apply_bend_deformation(handle, bend)?;

        debug!(
            name = %self.name,
            arc_length = length,
            x = subdivisions.x,
            y = subdivisions.y,
            z = subdivisions.z,
            "curved core built"
        );
        Ok(CurvedCore {
            handle,
            arc_length: length,
            subdivisions,
            bend,
        })
    }
}

/// A base handed to the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvedBase {
    pub handle: MeshHandle,
    /// Length of the inner arc.
    pub arc_length: f64,
    pub segments: u32,
}

/// Builds a curved base swept along a true arc, one chord per subdivision
/// of the inner arc.
#[derive(Debug, Clone)]
pub struct MakeCurvedBase {
    name: String,
    radius: f64,
    degrees: f64,
    width: f64,
    height: f64,
    density: SubdivisionDensity,
}

impl MakeCurvedBase {
    #[must_use]
    pub fn new(
        radius: f64,
        degrees: f64,
        width: f64,
        height: f64,
        density: SubdivisionDensity,
    ) -> Self {
        Self {
            name: "base".to_owned(),
            radius,
            degrees,
            width,
            height,
            density,
        }
    }

    #[must_use]
    pub fn named(mut self, name: &str) -> Self {
        name.clone_into(&mut self.name);
        self
    }

    /// Executes the operation.
    ///
    /// # Errors
    ///
    /// See [`MakeCurvedCuboid::execute`]; host errors are passed through.
    pub fn execute(
        &self,
        host: &mut dyn MeshHost,
        settings: &GeneratorSettings,
    ) -> Result<CurvedBase> {
        validate_arc(self.radius, self.degrees)?;
        let length = arc_length(self.radius, self.degrees);
        let segments = self.density.resolve(length);
        let mesh =
            MakeCurvedCuboid::new(self.radius, self.degrees, self.width, self.height, segments)
                .execute(settings)?;
        let handle = host.create_mesh(&self.name, mesh.to_mesh_data())?;
        debug!(name = %self.name, arc_length = length, segments, "curved base built");
        Ok(CurvedBase {
            handle,
            arc_length: length,
            segments,
        })
    }
}

fn validate_arc(radius: f64, degrees: f64) -> std::result::Result<(), ValidationError> {
    if !(degrees > 0.0 && degrees < 360.0) {
        return Err(ValidationError::ParameterOutOfRange {
            parameter: "degrees_of_arc",
            value: degrees,
            min: 0.0,
            max: 360.0,
        });
    }
    if radius.is_nan() || radius < 0.0 {
        return Err(ValidationError::Negative {
            parameter: "radius",
            value: radius,
        });
    }
    Ok(())
}

/// Builds a wall core of the given size and returns its handle.
///
/// # Errors
///
/// See [`MakeCurvedCore::execute`].
pub fn generate_curved_core(
    host: &mut dyn MeshHost,
    radius: f64,
    degrees: f64,
    width: f64,
    height: f64,
    density: SubdivisionDensity,
    settings: &GeneratorSettings,
) -> Result<MeshHandle> {
    let core = MakeCurvedCore::new(CoreKind::Wall, radius, degrees, width, height, density)
        .execute(host, settings)?;
    Ok(core.handle)
}

/// Builds a curved base of the given size and returns its handle.
///
/// # Errors
///
/// See [`MakeCurvedBase::execute`].
pub fn generate_curved_base(
    host: &mut dyn MeshHost,
    radius: f64,
    degrees: f64,
    width: f64,
    height: f64,
    density: SubdivisionDensity,
    settings: &GeneratorSettings,
) -> Result<MeshHandle> {
    let base =
        MakeCurvedBase::new(radius, degrees, width, height, density).execute(host, settings)?;
    Ok(base.handle)
}

/// Places copies of `asset_key` around the arc of `base`.
///
/// # Errors
///
/// See [`PlaceConnectorArray::execute`].
pub fn place_connector_array(
    host: &mut dyn MeshHost,
    base: MeshHandle,
    asset_key: &str,
    radius: f64,
    degrees: f64,
    step_degrees: f64,
) -> Result<Vec<CutterPlacement>> {
    PlaceConnectorArray::new(base, asset_key, radius, degrees, step_degrees).execute(host)
}
