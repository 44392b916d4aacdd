pub mod curved;
pub mod displacement;
pub mod error;
pub mod host;
pub mod math;
pub mod mesh;
pub mod profile;
pub mod settings;
pub mod subdivision;
pub mod tile;
pub mod turtle;

pub use error::{Result, TileError};
