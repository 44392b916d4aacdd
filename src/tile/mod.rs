//! Tile requests and the pipeline that turns them into host meshes.

mod generate;
mod parts;
mod registry;

pub use generate::{generate_tile, GeneratedTile};
pub use registry::{GeneratorRegistry, PartContext, PartGenerator};

use crate::error::ValidationError;
use crate::math::Vector3;
use crate::subdivision::SubdivisionDensity;

/// Which side of a curved base its clip sockets open onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SocketSide {
    #[default]
    Inner,
    Outer,
}

/// Where a wall stands across its base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WallPosition {
    #[default]
    Center,
    Side,
}

/// Construction style of a base or core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Blueprint {
    Plain,
    OpenLock,
    /// Plain base carrying an extra floor next to the wall.
    PlainSWall,
    /// OpenLOCK base carrying an extra floor next to the wall.
    OpenLockSWall,
    /// No mesh at all.
    None,
}

impl Blueprint {
    /// Whether the blueprint adds a floor core beside the wall.
    #[must_use]
    pub fn has_side_floor(self) -> bool {
        matches!(self, Self::PlainSWall | Self::OpenLockSWall)
    }
}

/// One part of a tile that a generator can build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartKind {
    CurvedBase,
    CurvedWallCore,
    CurvedFloorCore,
    CornerBase,
    CornerWallCore,
}

/// The overall shape being generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileKind {
    CurvedWall,
    CurvedFloor,
    CornerWall,
}

impl TileKind {
    /// Part kinds for the base and the core, in that order.
    #[must_use]
    pub fn parts(self) -> (PartKind, PartKind) {
        match self {
            Self::CurvedWall => (PartKind::CurvedBase, PartKind::CurvedWallCore),
            Self::CurvedFloor => (PartKind::CurvedBase, PartKind::CurvedFloorCore),
            Self::CornerWall => (PartKind::CornerBase, PartKind::CornerWallCore),
        }
    }
}

/// Overall tile and base sizes plus the arc they follow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileDimensions {
    /// Tile length, width and height; the height includes the base.
    pub tile_size: Vector3,
    pub base_size: Vector3,
    /// Inner radius of the base.
    pub radius: f64,
    pub degrees_of_arc: f64,
    pub socket_side: SocketSide,
}

impl Default for TileDimensions {
    fn default() -> Self {
        Self {
            tile_size: Vector3::new(2.0, 0.3, 2.0),
            base_size: Vector3::new(2.0, 0.5, 0.3),
            radius: 2.0,
            degrees_of_arc: 90.0,
            socket_side: SocketSide::Inner,
        }
    }
}

impl TileDimensions {
    /// Checks sizes, radius and arc.
    ///
    /// # Errors
    ///
    /// Returns the first offending parameter.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let sizes = [
            ("tile_size.x", self.tile_size.x),
            ("tile_size.y", self.tile_size.y),
            ("tile_size.z", self.tile_size.z),
            ("base_size.x", self.base_size.x),
            ("base_size.y", self.base_size.y),
            ("base_size.z", self.base_size.z),
            ("radius", self.radius),
        ];
        for (parameter, value) in sizes {
            if value.is_nan() || value < 0.0 {
                return Err(ValidationError::Negative { parameter, value });
            }
        }
        if self.tile_size.z < self.base_size.z {
            return Err(ValidationError::ParameterOutOfRange {
                parameter: "tile_size.z",
                value: self.tile_size.z,
                min: self.base_size.z,
                max: f64::INFINITY,
            });
        }
        if !(self.degrees_of_arc > 0.0 && self.degrees_of_arc < 360.0) {
            return Err(ValidationError::ParameterOutOfRange {
                parameter: "degrees_of_arc",
                value: self.degrees_of_arc,
                min: 0.0,
                max: 360.0,
            });
        }
        Ok(())
    }

    /// Gap between the base edge and the wall face on either side.
    #[must_use]
    pub fn wall_inset(&self) -> f64 {
        (self.base_size.y - self.tile_size.y) / 2.0
    }

    /// Inner radius of a centred wall core.
    #[must_use]
    pub fn wall_core_radius(&self) -> f64 {
        self.radius + self.wall_inset()
    }

    /// Outward shift of a wall standing at the side of its base.
    #[must_use]
    pub fn side_offset(&self) -> f64 {
        self.base_size.y / 2.0 - self.tile_size.y / 2.0 - 0.09
    }

    /// Height of the core above the base.
    #[must_use]
    pub fn core_height(&self) -> f64 {
        self.tile_size.z - self.base_size.z
    }
}

/// Legs and angle of a corner tile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CornerLegs {
    pub leg_1: f64,
    pub leg_2: f64,
    pub angle: f64,
}

impl Default for CornerLegs {
    fn default() -> Self {
        Self {
            leg_1: 2.0,
            leg_2: 2.0,
            angle: 90.0,
        }
    }
}

/// Everything needed to generate one tile.
#[derive(Debug, Clone, PartialEq)]
pub struct TileRequest {
    pub name: String,
    pub kind: TileKind,
    pub base_blueprint: Blueprint,
    pub core_blueprint: Blueprint,
    pub dimensions: TileDimensions,
    pub corner: CornerLegs,
    pub density: SubdivisionDensity,
    pub wall_position: WallPosition,
    /// Thickness of the extra floor on S-wall bases.
    pub floor_thickness: f64,
}

impl TileRequest {
    #[must_use]
    pub fn new(name: &str, kind: TileKind, blueprint: Blueprint) -> Self {
        Self {
            name: name.to_owned(),
            kind,
            base_blueprint: blueprint,
            core_blueprint: blueprint,
            dimensions: TileDimensions::default(),
            corner: CornerLegs::default(),
            density: SubdivisionDensity::default(),
            wall_position: WallPosition::default(),
            floor_thickness: 0.05,
        }
    }

    /// Checks the dimensions and the fields that only some tiles use.
    ///
    /// # Errors
    ///
    /// Returns the first offending parameter.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.dimensions.validate()?;
        if self.base_blueprint.has_side_floor() && !(self.floor_thickness > 0.0) {
            return Err(ValidationError::ParameterOutOfRange {
                parameter: "floor_thickness",
                value: self.floor_thickness,
                min: 0.0,
                max: f64::INFINITY,
            });
        }
        if self.kind == TileKind::CornerWall
            && !(self.corner.angle > 0.0 && self.corner.angle < 180.0)
        {
            return Err(ValidationError::ParameterOutOfRange {
                parameter: "angle",
                value: self.corner.angle,
                min: 0.0,
                max: 180.0,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_dimensions_are_valid() {
        let dims = TileDimensions::default();
        dims.validate().unwrap();
        assert_relative_eq!(dims.wall_inset(), 0.1, epsilon = 1e-12);
        assert_relative_eq!(dims.wall_core_radius(), 2.1, epsilon = 1e-12);
        assert_relative_eq!(dims.core_height(), 1.7, epsilon = 1e-12);
        assert_relative_eq!(dims.side_offset(), 0.01, epsilon = 1e-12);
    }

    #[test]
    fn tile_lower_than_base_is_rejected() {
        let dims = TileDimensions {
            tile_size: Vector3::new(2.0, 0.3, 0.2),
            ..TileDimensions::default()
        };
        assert!(matches!(
            dims.validate(),
            Err(ValidationError::ParameterOutOfRange { parameter: "tile_size.z", .. })
        ));
    }

    #[test]
    fn arc_and_radius_are_checked() {
        for degrees_of_arc in [0.0, 360.0, f64::NAN] {
            let dims = TileDimensions {
                degrees_of_arc,
                ..TileDimensions::default()
            };
            assert!(dims.validate().is_err());
        }
        let dims = TileDimensions {
            radius: -1.0,
            ..TileDimensions::default()
        };
        assert!(matches!(
            dims.validate(),
            Err(ValidationError::Negative { parameter: "radius", .. })
        ));
    }

    #[test]
    fn corner_angle_is_checked_for_corner_tiles_only() {
        let mut request = TileRequest::new("corner", TileKind::CornerWall, Blueprint::Plain);
        request.corner.angle = 180.0;
        assert!(request.validate().is_err());
        request.kind = TileKind::CurvedWall;
        request.validate().unwrap();
    }

    #[test]
    fn tile_kinds_map_to_parts() {
        assert_eq!(
            TileKind::CornerWall.parts(),
            (PartKind::CornerBase, PartKind::CornerWallCore)
        );
        assert!(Blueprint::OpenLockSWall.has_side_floor());
        assert!(!Blueprint::OpenLock.has_side_floor());
    }
}
