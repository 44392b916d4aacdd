use crate::math::MERGE_TOLERANCE;

/// Parameters shared by every generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneratorSettings {
    /// Radius under which vertices are merged or matched by location.
    pub merge_tolerance: f64,
    /// Width of the zero-width seams bracketed while drawing profiles.
    pub seam_offset: f64,
    /// Island margin passed to UV projection of cores.
    pub uv_island_margin: f64,
    /// Angular spacing of connector cutters around an arc.
    pub connector_step_degrees: f64,
    /// Subdivision surface levels requested for displacement cores.
    pub subsurf_levels: u32,
    /// Keep the bend visible at render time so textures follow the curve.
    pub curve_texture: bool,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            merge_tolerance: MERGE_TOLERANCE,
            seam_offset: 0.001,
            uv_island_margin: 0.012,
            connector_step_degrees: 22.5,
            subsurf_levels: 3,
            curve_texture: false,
        }
    }
}
