//! Rotational arrays of connector cutters around an arc.

use nalgebra::Translation3;
use tracing::debug;

use crate::error::{Result, ValidationError};
use crate::host::{BooleanOp, CutterPlacement, MeshHandle, MeshHost};
use crate::math::{rotation_z, Isometry3, Vector3};

/// Quotients this close to a whole number count as an exact fit.
const FIT_EPSILON: f64 = 1e-9;

/// Angles, clockwise from the +Y axis, at which connectors sit on an arc.
///
/// The count comes from the whole part of `(arc − step) / step`. A count of
/// one centres the single connector at half the arc; larger counts start one
/// step in and repeat every step. An arc too short for even one period also
/// falls back to a single centred connector. Quotients within `1e-9` of a
/// whole number are snapped to it before the whole part is taken.
///
/// `step_degrees` must be positive.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn connector_angles(arc_degrees: f64, step_degrees: f64) -> Vec<f64> {
    let quotient = (arc_degrees - step_degrees) / step_degrees;
    let nearest = quotient.round();
    let quotient = if (quotient - nearest).abs() < FIT_EPSILON {
        nearest
    } else {
        quotient
    };
    let count = quotient.floor();
    if !(count >= 2.0) {
        return vec![arc_degrees / 2.0];
    }
    (1..=count as u32)
        .map(|i| step_degrees * f64::from(i))
        .collect()
}

/// Transform that spins an object about its own Z axis, moves it to
/// `offset` and then sweeps it clockwise about the world Z axis.
#[must_use]
pub fn swept(offset: Vector3, spin_degrees: f64, sweep_degrees: f64) -> Isometry3 {
    Isometry3::from_parts(Translation3::identity(), rotation_z(-sweep_degrees))
        * Isometry3::from_parts(Translation3::from(offset), rotation_z(spin_degrees))
}

/// Number of copies a fixed-spacing array fits into `fit_length`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn array_count(fit_length: f64, spacing: f64) -> u32 {
    if fit_length > 0.0 && spacing > 0.0 {
        (fit_length / spacing).floor() as u32 + 1
    } else {
        1
    }
}

/// Places copies of a named cutter asset evenly around an arc.
#[derive(Debug, Clone)]
pub struct PlaceConnectorArray {
    target: MeshHandle,
    asset_key: String,
    radius: f64,
    arc_degrees: f64,
    step_degrees: f64,
    elevation: f64,
    spin_degrees: f64,
    operation: BooleanOp,
}

impl PlaceConnectorArray {
    /// Creates a new `PlaceConnectorArray` operation that cuts `target`.
    #[must_use]
    pub fn new(
        target: MeshHandle,
        asset_key: &str,
        radius: f64,
        arc_degrees: f64,
        step_degrees: f64,
    ) -> Self {
        Self {
            target,
            asset_key: asset_key.to_owned(),
            radius,
            arc_degrees,
            step_degrees,
            elevation: 0.0,
            spin_degrees: 0.0,
            operation: BooleanOp::Difference,
        }
    }

    /// Spins every copy about its own Z axis before it is swept into place.
    #[must_use]
    pub fn spun(mut self, degrees: f64) -> Self {
        self.spin_degrees = degrees;
        self
    }

    #[must_use]
    pub fn elevated(mut self, z: f64) -> Self {
        self.elevation = z;
        self
    }

    #[must_use]
    pub fn with_operation(mut self, operation: BooleanOp) -> Self {
        self.operation = operation;
        self
    }

    /// Loads the asset once and computes one placement per connector.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a non-positive step or an arc outside
    /// (0, 360), and a host error if the asset cannot be loaded.
    pub fn execute(&self, host: &mut dyn MeshHost) -> Result<Vec<CutterPlacement>> {
        if !(self.step_degrees > 0.0) {
            return Err(ValidationError::ParameterOutOfRange {
                parameter: "step_degrees",
                value: self.step_degrees,
                min: 0.0,
                max: 360.0,
            }
            .into());
        }
        if !(self.arc_degrees > 0.0 && self.arc_degrees < 360.0) {
            return Err(ValidationError::ParameterOutOfRange {
                parameter: "degrees_of_arc",
                value: self.arc_degrees,
                min: 0.0,
                max: 360.0,
            }
            .into());
        }

        let source = host.load_named_asset(&self.asset_key)?;
        let offset = Vector3::new(0.0, self.radius, self.elevation);
        let placements: Vec<_> = connector_angles(self.arc_degrees, self.step_degrees)
            .into_iter()
            .map(|angle| CutterPlacement {
                source,
                target: self.target,
                operation: self.operation,
                transform: swept(offset, self.spin_degrees, angle),
            })
            .collect();
        debug!(
            asset = %self.asset_key,
            count = placements.len(),
            "connector array placed"
        );
        Ok(placements)
    }
}
