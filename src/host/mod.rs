//! The narrow interface through which generators talk to the host scene.
//!
//! Generators never hold scene objects directly. They hand the host plain
//! [`MeshData`] and receive opaque [`MeshHandle`]s back; every later step
//! (booleans, UV projection, bends, displacement) is requested by handle.

mod bend;
mod scene;
mod tracking;

pub use bend::{Axis, BendDeformation};
pub use scene::{MeshObject, Modifier, SceneStore};
pub use tracking::TrackingHost;

use crate::error::{HostError, Result};
use crate::math::{Isometry3, Vector3};
use crate::mesh::MeshData;

/// Result of a host call.
pub type HostResult<T> = std::result::Result<T, HostError>;

slotmap::new_key_type! {
    /// Opaque reference to a mesh object owned by the host.
    pub struct MeshHandle;
}

/// Set operation used when combining a cutter with a mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BooleanOp {
    Union,
    Difference,
    Intersect,
}

/// Displacement texturing request for a core mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplacementSpec {
    /// Vertex groups that receive the displacement texture.
    pub textured_groups: Vec<String>,
    /// Subdivision surface levels applied before displacing.
    pub subsurf_levels: u32,
    /// Initial displacement strength; the host raises it when baking.
    pub strength: f64,
}

/// Mesh scene services consumed by the generators.
///
/// Implementations own every mesh they hand out. Boolean combines, bends and
/// displacement are recorded against the target rather than baked, so UV
/// projection and texturing can still see the undeformed geometry.
pub trait MeshHost {
    /// Creates a named mesh object from index data.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Failed`] if the data refers to missing vertices.
    fn create_mesh(&mut self, name: &str, data: MeshData) -> HostResult<MeshHandle>;

    /// Deletes a mesh object.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::MeshNotFound`] for an unknown handle.
    fn remove_mesh(&mut self, handle: MeshHandle) -> HostResult<()>;

    /// Extrudes every face of the mesh by `height` and returns the indices of
    /// the new top vertices.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown handle or a mesh with nothing to extrude.
    fn extrude(&mut self, handle: MeshHandle, height: Vector3) -> HostResult<Vec<u32>>;

    /// Combines `source` into `target` and returns the handle of the result.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::MeshNotFound`] if either handle is unknown.
    fn boolean_combine(
        &mut self,
        target: MeshHandle,
        source: MeshHandle,
        operation: BooleanOp,
    ) -> HostResult<MeshHandle>;

    /// Loads a pre-built mesh asset by key.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::AssetNotFound`] if no asset has that key.
    fn load_named_asset(&mut self, key: &str) -> HostResult<MeshHandle>;

    /// Creates a transformed copy of an existing mesh.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::MeshNotFound`] for an unknown source.
    fn place_instance(
        &mut self,
        source: MeshHandle,
        transform: &Isometry3,
    ) -> HostResult<MeshHandle>;

    /// Projects UVs onto the mesh as it currently stands.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::ProjectionAfterDeformation`] once a bend has been
    /// applied to the mesh.
    fn project_uv(&mut self, handle: MeshHandle, island_margin: f64) -> HostResult<()>;

    /// Attaches a non-destructive bend to the mesh.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::MeshNotFound`] for an unknown handle.
    fn apply_bend_deformation(
        &mut self,
        handle: MeshHandle,
        bend: BendDeformation,
    ) -> HostResult<()>;

    /// Names of the mesh's vertex groups, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::MeshNotFound`] for an unknown handle.
    fn vertex_groups(&self, handle: MeshHandle) -> HostResult<Vec<String>>;

    /// Adds (or extends) a vertex group. `None` adds every vertex.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown handle or an out-of-range index.
    fn add_vertex_group(
        &mut self,
        handle: MeshHandle,
        name: &str,
        members: Option<&[u32]>,
    ) -> HostResult<()>;

    /// Flags the mesh as a displacement core.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::MeshNotFound`] for an unknown handle.
    fn mark_displacement(
        &mut self,
        handle: MeshHandle,
        spec: DisplacementSpec,
    ) -> HostResult<()>;
}

/// One boolean cutter to be instanced and combined with a target mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct CutterPlacement {
    pub source: MeshHandle,
    pub target: MeshHandle,
    pub operation: BooleanOp,
    pub transform: Isometry3,
}

impl CutterPlacement {
    /// Instances the cutter and combines it with its target.
    ///
    /// Returns the handle of the placed cutter instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the host cannot place or combine the cutter.
    pub fn apply(&self, host: &mut dyn MeshHost) -> Result<MeshHandle> {
        let instance = host.place_instance(self.source, &self.transform)?;
        host.boolean_combine(self.target, instance, self.operation)?;
        Ok(instance)
    }
}

/// Applies a batch of placements in order.
///
/// # Errors
///
/// Stops at the first placement the host rejects.
pub fn apply_placements(
    host: &mut dyn MeshHost,
    placements: &[CutterPlacement],
) -> Result<Vec<MeshHandle>> {
    placements.iter().map(|p| p.apply(host)).collect()
}
