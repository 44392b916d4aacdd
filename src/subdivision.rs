//! Maps a qualitative density setting to per-axis subdivision counts.

use std::collections::BTreeMap;

use crate::math::Vector3;

/// How finely tile geometry is subdivided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SubdivisionDensity {
    Low,
    #[default]
    Medium,
    High,
}

impl SubdivisionDensity {
    /// Subdivisions per unit of length.
    #[must_use]
    pub fn multiplier(self) -> u32 {
        match self {
            Self::Low => 4,
            Self::Medium => 8,
            Self::High => 16,
        }
    }

    /// Subdivision count for one dimension: `floor(dimension · multiplier)`,
    /// never less than 1.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn resolve(self, dimension: f64) -> u32 {
        let n = (dimension * f64::from(self.multiplier())).floor();
        if n.is_nan() || n < 1.0 {
            1
        } else if n >= f64::from(u32::MAX) {
            u32::MAX
        } else {
            n as u32
        }
    }

    /// Resolves each dimension of an ordered set independently.
    pub fn resolve_each<I>(self, dimensions: I) -> Vec<u32>
    where
        I: IntoIterator<Item = f64>,
    {
        dimensions.into_iter().map(|d| self.resolve(d)).collect()
    }

    /// Resolves each dimension of a named set independently.
    #[must_use]
    pub fn resolve_named<K: Ord + Clone>(self, dimensions: &BTreeMap<K, f64>) -> BTreeMap<K, u32> {
        dimensions
            .iter()
            .map(|(k, &d)| (k.clone(), self.resolve(d)))
            .collect()
    }
}

/// Subdivision counts along the three axes of a part.
///
/// For curved parts `x` runs along the arc.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subdivisions {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl Subdivisions {
    /// Resolves all three axes of `dimensions` with one density.
    #[must_use]
    pub fn from_dimensions(density: SubdivisionDensity, dimensions: &Vector3) -> Self {
        Self {
            x: density.resolve(dimensions.x),
            y: density.resolve(dimensions.y),
            z: density.resolve(dimensions.z),
        }
    }
}
