use crate::math::{Point3, Rotation, Vector3};

/// Whether moves emit geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pen {
    #[default]
    Up,
    Down,
}

/// Position and orientation of the drawing cursor.
///
/// The local frame follows the turtle convention: the heading is local +Y,
/// local +Z points up and local +X points to the right of the heading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorState {
    pub position: Point3,
    pub frame: Rotation,
    pub pen: Pen,
}

impl Default for CursorState {
    fn default() -> Self {
        Self::origin()
    }
}

impl CursorState {
    /// Cursor at the world origin, heading along +Y, pen up.
    #[must_use]
    pub fn origin() -> Self {
        Self {
            position: Point3::origin(),
            frame: Rotation::identity(),
            pen: Pen::Up,
        }
    }

    /// Cursor at `position` with the default frame.
    #[must_use]
    pub fn at(position: Point3) -> Self {
        Self {
            position,
            ..Self::origin()
        }
    }

    /// Returns the same cursor turned right by `degrees` about its up axis.
    #[must_use]
    pub fn turned_right(mut self, degrees: f64) -> Self {
        self.rotate_local(&Vector3::z_axis(), -degrees);
        self
    }

    #[must_use]
    pub fn heading(&self) -> Vector3 {
        self.frame * Vector3::y()
    }

    #[must_use]
    pub fn up(&self) -> Vector3 {
        self.frame * Vector3::z()
    }

    #[must_use]
    pub fn right(&self) -> Vector3 {
        self.frame * Vector3::x()
    }

    /// Rotates the frame about one of its own axes.
    pub(crate) fn rotate_local(&mut self, axis: &nalgebra::Unit<Vector3>, degrees: f64) {
        self.frame *= Rotation::from_axis_angle(axis, degrees.to_radians());
        self.frame.renormalize();
    }
}
