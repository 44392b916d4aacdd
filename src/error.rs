use thiserror::Error;

use crate::mesh::Mesh;

/// Top-level error type for tile generation.
#[derive(Debug, Error)]
pub enum TileError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Host(#[from] HostError),
}

/// Parameter errors, raised before any drawing begins.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("parameter {parameter} = {value} is out of range ({min}, {max})")]
    ParameterOutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("parameter {parameter} = {value} must not be negative")]
    Negative { parameter: &'static str, value: f64 },

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Errors raised while building mesh geometry.
#[derive(Debug, Error)]
pub enum GeometryError {
    /// No vertex lies within tolerance of a tagged position.
    ///
    /// The mesh is returned in its pre-connect state for inspection.
    #[error("profile inconsistency: no vertex within tolerance of `{tag}`")]
    ProfileInconsistency { tag: String, mesh: Box<Mesh> },

    #[error("boundary is not a single closed loop: {0}")]
    OpenBoundary(String),

    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("entity not found: {0}")]
    EntityNotFound(&'static str),

    #[error("triangulation failed: {0}")]
    Triangulation(String),
}

/// Errors surfaced by the host mesh collaborator.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("mesh handle not found")]
    MeshNotFound,

    #[error("named asset `{0}` not found")]
    AssetNotFound(String),

    #[error("UV projection requested after a bend deformation was applied")]
    ProjectionAfterDeformation,

    #[error("vertex group `{0}` not found")]
    UnknownVertexGroup(String),

    #[error("host operation failed: {0}")]
    Failed(String),
}

/// Convenience type alias for results using [`TileError`].
pub type Result<T> = std::result::Result<T, TileError>;
