use std::collections::HashMap;

use slotmap::SlotMap;
use tracing::debug;

use super::{BendDeformation, BooleanOp, DisplacementSpec, HostResult, MeshHandle, MeshHost};
use crate::error::HostError;
use crate::math::{Isometry3, Vector3};
use crate::mesh::{Extrude, Mesh, MeshData, TriangleMesh};

/// A non-destructive operation recorded on a mesh object.
#[derive(Debug, Clone, PartialEq)]
pub enum Modifier {
    Boolean {
        source: MeshHandle,
        operation: BooleanOp,
    },
    Bend(BendDeformation),
    Displacement(DisplacementSpec),
}

/// A mesh owned by the [`SceneStore`].
#[derive(Debug, Clone, PartialEq)]
pub struct MeshObject {
    pub name: String,
    /// Base geometry; modifiers are never baked into it.
    pub data: MeshData,
    /// Modifier stack in the order it was built.
    pub modifiers: Vec<Modifier>,
    /// Island margin of the last UV projection, if any.
    pub uv_margin: Option<f64>,
}

impl MeshObject {
    fn new(name: &str, data: MeshData) -> Self {
        Self {
            name: name.to_owned(),
            data,
            modifiers: Vec::new(),
            uv_margin: None,
        }
    }

    /// Boolean modifiers as `(source, operation)` pairs.
    pub fn booleans(&self) -> impl Iterator<Item = (MeshHandle, BooleanOp)> + '_ {
        self.modifiers.iter().filter_map(|m| match m {
            Modifier::Boolean { source, operation } => Some((*source, *operation)),
            _ => None,
        })
    }

    /// Bend modifiers in stack order.
    pub fn bends(&self) -> impl Iterator<Item = &BendDeformation> {
        self.modifiers.iter().filter_map(|m| match m {
            Modifier::Bend(b) => Some(b),
            _ => None,
        })
    }

    /// The displacement request, if the mesh has been converted.
    #[must_use]
    pub fn displacement(&self) -> Option<&DisplacementSpec> {
        self.modifiers.iter().find_map(|m| match m {
            Modifier::Displacement(d) => Some(d),
            _ => None,
        })
    }

    /// Geometry with every bend evaluated. Booleans are not evaluated.
    #[must_use]
    pub fn deformed(&self) -> MeshData {
        self.bends().fold(self.data.clone(), |data, bend| bend.deform(&data))
    }
}

/// In-memory [`MeshHost`] that records every request.
///
/// Useful as a reference host and for inspecting what a generator asked for.
#[derive(Debug, Default)]
pub struct SceneStore {
    meshes: SlotMap<MeshHandle, MeshObject>,
    assets: HashMap<String, MeshData>,
}

impl SceneStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `data` available to [`MeshHost::load_named_asset`] under `key`.
    pub fn register_asset(&mut self, key: &str, data: MeshData) {
        self.assets.insert(key.to_owned(), data);
    }

    /// Returns a mesh object.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::MeshNotFound`] for an unknown handle.
    pub fn mesh(&self, handle: MeshHandle) -> HostResult<&MeshObject> {
        self.meshes.get(handle).ok_or(HostError::MeshNotFound)
    }

    fn mesh_mut(&mut self, handle: MeshHandle) -> HostResult<&mut MeshObject> {
        self.meshes.get_mut(handle).ok_or(HostError::MeshNotFound)
    }

    /// Triangulated geometry of a mesh with its bends evaluated, for writers
    /// that only take triangles. Booleans are not evaluated.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::MeshNotFound`] for an unknown handle and a
    /// geometry error if a face cannot be triangulated.
    pub fn export_triangles(&self, handle: MeshHandle) -> crate::Result<TriangleMesh> {
        let triangles = self.mesh(handle)?.deformed().triangulate()?;
        debug!(triangles = triangles.indices.len(), "mesh exported as triangles");
        Ok(triangles)
    }

    /// Iterates over all mesh objects.
    pub fn meshes(&self) -> impl Iterator<Item = (MeshHandle, &MeshObject)> {
        self.meshes.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}

fn index_out_of_range(index: u32) -> HostError {
    HostError::Failed(format!("vertex index {index} out of range"))
}

impl MeshHost for SceneStore {
    fn create_mesh(&mut self, name: &str, data: MeshData) -> HostResult<MeshHandle> {
        let n = data.vertices.len();
        let mut referenced = data
            .edges
            .iter()
            .flatten()
            .chain(data.faces.iter().flatten())
            .chain(data.vertex_groups.values().flatten());
        if let Some(&bad) = referenced.find(|&&i| i as usize >= n) {
            return Err(index_out_of_range(bad));
        }
        let handle = self.meshes.insert(MeshObject::new(name, data));
        debug!(name, vertices = n, "mesh created");
        Ok(handle)
    }

    fn remove_mesh(&mut self, handle: MeshHandle) -> HostResult<()> {
        self.meshes
            .remove(handle)
            .map(|_| ())
            .ok_or(HostError::MeshNotFound)
    }

    fn extrude(&mut self, handle: MeshHandle, height: Vector3) -> HostResult<Vec<u32>> {
        let object = self.mesh_mut(handle)?;
        let mut mesh =
            Mesh::from_mesh_data(&object.data).map_err(|e| HostError::Failed(e.to_string()))?;
        let solid = Extrude::new(height)
            .execute(&mut mesh)
            .map_err(|e| HostError::Failed(e.to_string()))?;
        let index = mesh.vertex_indices();
        let top = solid.top().iter().map(|&v| index[v]).collect();
        object.data = mesh.to_mesh_data();
        Ok(top)
    }

    fn boolean_combine(
        &mut self,
        target: MeshHandle,
        source: MeshHandle,
        operation: BooleanOp,
    ) -> HostResult<MeshHandle> {
        self.mesh(source)?;
        self.mesh_mut(target)?
            .modifiers
            .push(Modifier::Boolean { source, operation });
        Ok(target)
    }

    fn load_named_asset(&mut self, key: &str) -> HostResult<MeshHandle> {
        let data = self
            .assets
            .get(key)
            .cloned()
            .ok_or_else(|| HostError::AssetNotFound(key.to_owned()))?;
        Ok(self.meshes.insert(MeshObject::new(key, data)))
    }

    fn place_instance(&mut self, source: MeshHandle, transform: &Isometry3) -> HostResult<MeshHandle> {
        let object = self.mesh(source)?;
        let placed = MeshObject::new(&object.name, object.data.transformed(transform));
        Ok(self.meshes.insert(placed))
    }

    fn project_uv(&mut self, handle: MeshHandle, island_margin: f64) -> HostResult<()> {
        let object = self.mesh_mut(handle)?;
        if object.bends().next().is_some() {
            return Err(HostError::ProjectionAfterDeformation);
        }
        object.uv_margin = Some(island_margin);
        Ok(())
    }

    fn apply_bend_deformation(&mut self, handle: MeshHandle, bend: BendDeformation) -> HostResult<()> {
        self.mesh_mut(handle)?.modifiers.push(Modifier::Bend(bend));
        Ok(())
    }

    fn vertex_groups(&self, handle: MeshHandle) -> HostResult<Vec<String>> {
        Ok(self.mesh(handle)?.data.vertex_groups.keys().cloned().collect())
    }

    fn add_vertex_group(
        &mut self,
        handle: MeshHandle,
        name: &str,
        members: Option<&[u32]>,
    ) -> HostResult<()> {
        let object = self.mesh_mut(handle)?;
        let n = object.data.vertices.len();
        #[allow(clippy::cast_possible_truncation)]
        let members: Vec<u32> = match members {
            Some(ids) => {
                if let Some(&bad) = ids.iter().find(|&&i| i as usize >= n) {
                    return Err(index_out_of_range(bad));
                }
                ids.to_vec()
            }
            None => (0..n as u32).collect(),
        };
        let group = object.data.vertex_groups.entry(name.to_owned()).or_default();
        for i in members {
            if !group.contains(&i) {
                group.push(i);
            }
        }
        Ok(())
    }

    fn mark_displacement(&mut self, handle: MeshHandle, spec: DisplacementSpec) -> HostResult<()> {
        let object = self.mesh_mut(handle)?;
        object
            .modifiers
            .retain(|m| !matches!(m, Modifier::Displacement(_)));
        object.modifiers.push(Modifier::Displacement(spec));
        Ok(())
    }
}
