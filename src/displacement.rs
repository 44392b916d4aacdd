//! Converting finished cores into displacement-textured tile objects.

use tracing::debug;

use crate::error::{HostError, Result};
use crate::host::{DisplacementSpec, MeshHandle, MeshHost};
use crate::settings::GeneratorSettings;

/// Group created when a converted mesh has none of its own.
pub const DEFAULT_GROUP: &str = "All";

/// UV island margin used when converting arbitrary meshes.
const CONVERT_UV_MARGIN: f64 = 0.01;

/// Flags `mesh` as a displacement core textured on `groups`.
///
/// # Errors
///
/// Returns [`HostError::UnknownVertexGroup`] for the first group the mesh
/// does not have, and any error the host raises.
pub fn convert_to_displacement_core(
    host: &mut dyn MeshHost,
    mesh: MeshHandle,
    groups: &[&str],
    settings: &GeneratorSettings,
) -> Result<()> {
    let existing = host.vertex_groups(mesh)?;
    if let Some(missing) = groups
        .iter()
        .find(|g| !existing.iter().any(|e| e == *g))
    {
        return Err(HostError::UnknownVertexGroup((*missing).to_owned()).into());
    }
    let spec = DisplacementSpec {
        textured_groups: groups.iter().map(|&g| g.to_owned()).collect(),
        subsurf_levels: settings.subsurf_levels,
        strength: 0.0,
    };
    debug!(groups = ?spec.textured_groups, "displacement core");
    host.mark_displacement(mesh, spec)?;
    Ok(())
}

/// Turns an arbitrary mesh into a displacement-textured tile object.
#[derive(Debug, Clone, Copy)]
pub struct ConvertToTileObject {
    mesh: MeshHandle,
}

impl ConvertToTileObject {
    #[must_use]
    pub fn new(mesh: MeshHandle) -> Self {
        Self { mesh }
    }

    /// Textures the mesh's first vertex group, or a new `All` group over
    /// every vertex if it has none. UVs are projected before converting.
    ///
    /// "First" means first by name as [`MeshHost::vertex_groups`] lists them,
    /// not first created: [`MeshData`](crate::mesh::MeshData) keys its groups
    /// by name and keeps no creation order. Name the group to texture so it
    /// sorts first, or call [`convert_to_displacement_core`] with it directly.
    ///
    /// Returns the textured group name.
    ///
    /// # Errors
    ///
    /// Returns any error the host raises, including
    /// [`HostError::ProjectionAfterDeformation`] for an already bent mesh.
    pub fn execute(&self, host: &mut dyn MeshHost, settings: &GeneratorSettings) -> Result<String> {
        let group = match host.vertex_groups(self.mesh)?.into_iter().next() {
            Some(first) => first,
            None => {
                host.add_vertex_group(self.mesh, DEFAULT_GROUP, None)?;
                DEFAULT_GROUP.to_owned()
            }
        };
        host.project_uv(self.mesh, CONVERT_UV_MARGIN)?;
        convert_to_displacement_core(host, self.mesh, &[group.as_str()], settings)?;
        Ok(group)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::TileError;
    use crate::host::SceneStore;
    use crate::math::Point3;
    use crate::mesh::MeshData;
    use std::collections::BTreeMap;

    fn triangle(groups: &[&str]) -> MeshData {
        MeshData {
            vertices: vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            faces: vec![vec![0, 1, 2]],
            vertex_groups: groups
                .iter()
                .map(|&g| (g.to_owned(), vec![0, 1]))
                .collect::<BTreeMap<_, _>>(),
            ..MeshData::default()
        }
    }

    #[test]
    fn core_keeps_requested_groups() {
        let mut scene = SceneStore::new();
        let mesh = scene.create_mesh("core", triangle(&["Front", "Back"])).unwrap();
        convert_to_displacement_core(&mut scene, mesh, &["Front", "Back"], &GeneratorSettings::default())
            .unwrap();
        let spec = scene.mesh(mesh).unwrap().displacement().unwrap();
        assert_eq!(spec.textured_groups, vec!["Front", "Back"]);
        assert_eq!(spec.subsurf_levels, 3);
        assert!(spec.strength.abs() < f64::EPSILON);
    }

    #[test]
    fn missing_group_is_reported() {
        let mut scene = SceneStore::new();
        let mesh = scene.create_mesh("core", triangle(&["Front"])).unwrap();
        let err = convert_to_displacement_core(&mut scene, mesh, &["Front", "Back"], &GeneratorSettings::default())
            .unwrap_err();
        assert!(matches!(err, TileError::Host(HostError::UnknownVertexGroup(ref g)) if g == "Back"));
        assert!(scene.mesh(mesh).unwrap().displacement().is_none());
    }

    #[test]
    fn convert_uses_first_group_by_name() {
        let mut scene = SceneStore::new();
        let mesh = scene.create_mesh("rock", triangle(&["Top", "Side"])).unwrap();
        let group = ConvertToTileObject::new(mesh)
            .execute(&mut scene, &GeneratorSettings::default())
            .unwrap();
        assert_eq!(group, "Side");
        assert_eq!(scene.mesh(mesh).unwrap().uv_margin, Some(0.01));
    }

    #[test]
    fn group_added_later_wins_when_it_sorts_first() {
        let mut scene = SceneStore::new();
        let mesh = scene.create_mesh("rock", triangle(&["Top"])).unwrap();
        scene.add_vertex_group(mesh, "Edge", Some(&[0])).unwrap();
        let group = ConvertToTileObject::new(mesh)
            .execute(&mut scene, &GeneratorSettings::default())
            .unwrap();
        assert_eq!(group, "Edge");
        assert_eq!(
            scene.mesh(mesh).unwrap().displacement().unwrap().textured_groups,
            vec!["Edge"]
        );
    }

    #[test]
    fn convert_adds_all_group_when_none() {
        let mut scene = SceneStore::new();
        let mesh = scene.create_mesh("rock", triangle(&[])).unwrap();
        let group = ConvertToTileObject::new(mesh)
            .execute(&mut scene, &GeneratorSettings::default())
            .unwrap();
        assert_eq!(group, DEFAULT_GROUP);
        let object = scene.mesh(mesh).unwrap();
        assert_eq!(object.data.vertex_groups[DEFAULT_GROUP], vec![0, 1, 2]);
        assert_eq!(object.displacement().unwrap().textured_groups, vec!["All"]);
    }
}
