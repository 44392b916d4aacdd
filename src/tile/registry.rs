use std::collections::HashMap;

use tracing::debug;

use super::{parts, Blueprint, PartKind, TileRequest};
use crate::error::{Result, ValidationError};
use crate::host::{MeshHandle, MeshHost};
use crate::settings::GeneratorSettings;

/// What a part generator gets to look at.
#[derive(Debug, Clone, Copy)]
pub struct PartContext<'a> {
    pub request: &'a TileRequest,
    pub settings: &'a GeneratorSettings,
    /// The base built for this tile, once there is one.
    pub base: Option<MeshHandle>,
}

/// Builds one part of a tile. `None` means the part has no mesh.
pub type PartGenerator = fn(&mut dyn MeshHost, &PartContext<'_>) -> Result<Option<MeshHandle>>;

/// Static lookup from `(blueprint, part)` to the generator that builds it.
#[derive(Clone, Default)]
pub struct GeneratorRegistry {
    generators: HashMap<(Blueprint, PartKind), PartGenerator>,
}

impl std::fmt::Debug for GeneratorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.generators.keys()).finish()
    }
}

impl GeneratorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in generator.
    #[must_use]
    pub fn with_defaults() -> Self {
        use Blueprint::{None as Empty, OpenLock, OpenLockSWall, Plain, PlainSWall};
        use PartKind::{CornerBase, CornerWallCore, CurvedBase, CurvedFloorCore, CurvedWallCore};

        let mut registry = Self::new();
        registry.register(Plain, CurvedBase, parts::plain_curved_base);
        registry.register(PlainSWall, CurvedBase, parts::plain_curved_base);
        registry.register(OpenLock, CurvedBase, parts::openlock_curved_base);
        registry.register(OpenLockSWall, CurvedBase, parts::openlock_curved_base);
        registry.register(Plain, CurvedWallCore, parts::plain_wall_core);
        registry.register(OpenLock, CurvedWallCore, parts::openlock_wall_core);
        registry.register(Plain, CurvedFloorCore, parts::floor_core);
        registry.register(OpenLock, CurvedFloorCore, parts::floor_core);
        registry.register(Plain, CornerBase, parts::corner_base);
        registry.register(Plain, CornerWallCore, parts::corner_wall_core);
        for part in [CurvedBase, CurvedWallCore, CurvedFloorCore, CornerBase, CornerWallCore] {
            registry.register(Empty, part, parts::empty);
        }
        registry
    }

    /// Adds or replaces the generator for a key.
    pub fn register(&mut self, blueprint: Blueprint, part: PartKind, generator: PartGenerator) {
        self.generators.insert((blueprint, part), generator);
    }

    #[must_use]
    pub fn get(&self, blueprint: Blueprint, part: PartKind) -> Option<PartGenerator> {
        self.generators.get(&(blueprint, part)).copied()
    }

    /// Looks up and runs the generator for a key.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidInput`] if nothing is registered for
    /// the key, and any error the generator raises.
    pub fn generate(
        &self,
        blueprint: Blueprint,
        part: PartKind,
        host: &mut dyn MeshHost,
        context: &PartContext<'_>,
    ) -> Result<Option<MeshHandle>> {
        let generator = self.get(blueprint, part).ok_or_else(|| {
            ValidationError::InvalidInput(format!("no {part:?} generator for {blueprint:?}"))
        })?;
        debug!(?blueprint, ?part, "generating part");
        generator(host, context)
    }
}
