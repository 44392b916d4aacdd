use tracing::{debug, warn};

use super::{BendDeformation, BooleanOp, DisplacementSpec, HostResult, MeshHandle, MeshHost};
use crate::math::{Isometry3, Vector3};
use crate::mesh::MeshData;

/// Wraps a host and remembers every mesh created through it.
///
/// A generation request either commits all of those meshes or rolls them
/// all back, so a failed request never leaves partial geometry behind.
pub struct TrackingHost<'h> {
    inner: &'h mut dyn MeshHost,
    created: Vec<MeshHandle>,
}

impl<'h> TrackingHost<'h> {
    #[must_use]
    pub fn new(inner: &'h mut dyn MeshHost) -> Self {
        Self {
            inner,
            created: Vec::new(),
        }
    }

    /// Handles created so far, oldest first.
    #[must_use]
    pub fn created(&self) -> &[MeshHandle] {
        &self.created
    }

    /// Keeps everything that was created.
    #[must_use]
    pub fn commit(self) -> Vec<MeshHandle> {
        self.created
    }

    /// Removes everything that was created, newest first.
    pub fn rollback(mut self) {
        debug!(meshes = self.created.len(), "rolling back partial tile");
        while let Some(handle) = self.created.pop() {
            if let Err(err) = self.inner.remove_mesh(handle) {
                warn!(%err, "could not remove mesh during rollback");
            }
        }
    }

    fn record(&mut self, handle: MeshHandle) -> MeshHandle {
        self.created.push(handle);
        handle
    }
}

impl MeshHost for TrackingHost<'_> {
    fn create_mesh(&mut self, name: &str, data: MeshData) -> HostResult<MeshHandle> {
        let handle = self.inner.create_mesh(name, data)?;
        Ok(self.record(handle))
    }

    fn remove_mesh(&mut self, handle: MeshHandle) -> HostResult<()> {
        self.inner.remove_mesh(handle)?;
        self.created.retain(|&h| h != handle);
        Ok(())
    }

    fn extrude(&mut self, handle: MeshHandle, height: Vector3) -> HostResult<Vec<u32>> {
        self.inner.extrude(handle, height)
    }

    fn boolean_combine(
        &mut self,
        target: MeshHandle,
        source: MeshHandle,
        operation: BooleanOp,
    ) -> HostResult<MeshHandle> {
        let result = self.inner.boolean_combine(target, source, operation)?;
        if result != target && !self.created.contains(&result) {
            self.record(result);
        }
        Ok(result)
    }

    fn load_named_asset(&mut self, key: &str) -> HostResult<MeshHandle> {
        let handle = self.inner.load_named_asset(key)?;
        Ok(self.record(handle))
    }

    fn place_instance(&mut self, source: MeshHandle, transform: &Isometry3) -> HostResult<MeshHandle> {
        let handle = self.inner.place_instance(source, transform)?;
        Ok(self.record(handle))
    }

    fn project_uv(&mut self, handle: MeshHandle, island_margin: f64) -> HostResult<()> {
        self.inner.project_uv(handle, island_margin)
    }

    fn apply_bend_deformation(&mut self, handle: MeshHandle, bend: BendDeformation) -> HostResult<()> {
        self.inner.apply_bend_deformation(handle, bend)
    }

    fn vertex_groups(&self, handle: MeshHandle) -> HostResult<Vec<String>> {
        self.inner.vertex_groups(handle)
    }

    fn add_vertex_group(
        &mut self,
        handle: MeshHandle,
        name: &str,
        members: Option<&[u32]>,
    ) -> HostResult<()> {
        self.inner.add_vertex_group(handle, name, members)
    }

    fn mark_displacement(&mut self, handle: MeshHandle, spec: DisplacementSpec) -> HostResult<()> {
        self.inner.mark_displacement(handle, spec)
    }
}
