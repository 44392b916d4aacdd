//! Turtle-graphics cursor that draws into a [`Mesh`].
//!
//! All moves are relative to the cursor's own frame. While the pen is down
//! each move appends a vertex at the new position and an edge back to the
//! previous vertex of the current path.

mod cursor;

pub use cursor::{CursorState, Pen};

use tracing::trace;

use crate::math::{Point3, Vector3, TOLERANCE};
use crate::mesh::{Mesh, VertexId};

/// A drawing cursor bound to the mesh it draws into.
///
/// The borrow makes the active mesh explicit: a turtle cannot exist, let
/// alone move, without one.
#[derive(Debug)]
pub struct Turtle<'m> {
    mesh: &'m mut Mesh,
    state: CursorState,
    home: CursorState,
    head: Option<VertexId>,
}

impl<'m> Turtle<'m> {
    /// Places a turtle at `start`, which also becomes its home.
    pub fn new(mesh: &'m mut Mesh, start: CursorState) -> Self {
        let mut turtle = Self {
            mesh,
            state: start,
            home: start,
            head: None,
        };
        if start.pen == Pen::Down {
            turtle.pen_down();
        }
        turtle
    }

    /// Current cursor state.
    #[must_use]
    pub fn state(&self) -> CursorState {
        self.state
    }

    #[must_use]
    pub fn position(&self) -> Point3 {
        self.state.position
    }

    /// Read access to the mesh being drawn.
    #[must_use]
    pub fn mesh(&self) -> &Mesh {
        self.mesh
    }

    // --- Pen ---

    /// Lowers the pen, starting a new path at the current position.
    ///
    /// Reuses the path head if the pen is already down.
    pub fn pen_down(&mut self) -> VertexId {
        self.state.pen = Pen::Down;
        match self.head {
            Some(v) => v,
            None => {
                let v = self.mesh.add_vertex(self.state.position);
                self.head = Some(v);
                v
            }
        }
    }

    /// Lifts the pen, ending the current path.
    pub fn pen_up(&mut self) {
        self.state.pen = Pen::Up;
        self.head = None;
    }

    // --- Moves ---

    /// Moves along the heading. Returns the new vertex if the pen is down.
    ///
    /// A zero distance is legal and leaves a coincident vertex behind, which
    /// is how seams are bracketed before merging.
    pub fn forward(&mut self, distance: f64) -> Option<VertexId> {
        let delta = self.state.heading() * distance;
        self.translate(delta)
    }

    /// Moves against the heading.
    pub fn back(&mut self, distance: f64) -> Option<VertexId> {
        self.forward(-distance)
    }

    /// Moves along the local up axis without turning.
    pub fn rise(&mut self, distance: f64) -> Option<VertexId> {
        let delta = self.state.up() * distance;
        self.translate(delta)
    }

    /// Moves against the local up axis.
    pub fn descend(&mut self, distance: f64) -> Option<VertexId> {
        self.rise(-distance)
    }

    /// Jumps to an absolute position.
    ///
    /// With the pen down this draws a straight edge to the new position.
    pub fn set_position(&mut self, position: Point3) -> Option<VertexId> {
        let delta = position - self.state.position;
        self.translate(delta)
    }

    fn translate(&mut self, delta: Vector3) -> Option<VertexId> {
        if delta.norm() < TOLERANCE {
            trace!(position = ?self.state.position, "zero-length move");
        }
        self.state.position += delta;
        let prev = self.head?;
        let v = self.mesh.add_vertex(self.state.position);
        self.mesh.add_edge(prev, v);
        self.head = Some(v);
        Some(v)
    }

    // --- Turns ---

    /// Turns left (counter-clockwise seen from above) about the local up axis.
    pub fn left(&mut self, degrees: f64) {
        self.state.rotate_local(&Vector3::z_axis(), degrees);
    }

    /// Turns right about the local up axis.
    pub fn right(&mut self, degrees: f64) {
        self.left(-degrees);
    }

    /// Pitches the heading up about the local right axis.
    pub fn pitch_up(&mut self, degrees: f64) {
        self.state.rotate_local(&Vector3::x_axis(), degrees);
    }

    pub fn pitch_down(&mut self, degrees: f64) {
        self.pitch_up(-degrees);
    }

    /// Rolls about the heading; the right axis moves downwards.
    pub fn roll_right(&mut self, degrees: f64) {
        self.state.rotate_local(&Vector3::y_axis(), degrees);
    }

    pub fn roll_left(&mut self, degrees: f64) {
        self.roll_right(-degrees);
    }

    // --- Home ---

    /// Makes the current position and orientation the new home.
    pub fn save_home(&mut self) {
        self.home = self.state;
    }

    /// Restores the saved position and orientation without drawing.
    ///
    /// The pen state is kept, but the current path ends.
    pub fn home(&mut self) {
        let pen = self.state.pen;
        self.state = CursorState { pen, ..self.home };
        self.head = None;
        if pen == Pen::Down {
            self.pen_down();
        }
    }

    /// Releases the mesh and returns the final cursor state.
    #[must_use]
    pub fn finish(self) -> CursorState {
        self.state
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn pen_up_moves_draw_nothing() {
        let mut mesh = Mesh::new();
        let mut t = Turtle::new(&mut mesh, CursorState::origin());
        assert!(t.forward(2.0).is_none());
        assert_relative_eq!(t.position(), Point3::new(0.0, 2.0, 0.0));
        drop(t);
        assert_eq!(mesh.vertex_count(), 0);
    }

    #[test]
    fn square_path_closes_on_start() {
        let mut mesh = Mesh::new();
        let mut t = Turtle::new(&mut mesh, CursorState::origin());
        t.pen_down();
        for _ in 0..4 {
            t.forward(1.0);
            t.right(90.0);
        }
        assert_relative_eq!(t.position(), Point3::origin(), epsilon = 1e-12);
        let end = t.finish();
        assert_relative_eq!(end.heading(), Vector3::y(), epsilon = 1e-12);
        assert_eq!(mesh.vertex_count(), 5);
        assert_eq!(mesh.edge_count(), 4);
        assert_eq!(mesh.merge_by_distance(crate::math::MERGE_TOLERANCE), 1);
        assert_eq!(mesh.edge_count(), 4);
    }

    #[test]
    fn zero_length_move_leaves_coincident_vertex() {
        let mut mesh = Mesh::new();
        let mut t = Turtle::new(&mut mesh, CursorState::origin());
        let a = t.pen_down();
        let b = t.forward(0.0).unwrap();
        assert_ne!(a, b);
        drop(t);
        assert_eq!(mesh.point(a).unwrap(), mesh.point(b).unwrap());
    }

    #[test]
    fn home_restores_position_and_frame() {
        let mut mesh = Mesh::new();
        let mut t = Turtle::new(&mut mesh, CursorState::at(Point3::new(1.0, 1.0, 0.0)));
        t.pen_down();
        t.right(37.0);
        t.forward(3.0);
        t.pitch_up(10.0);
        t.home();
        assert_eq!(t.position(), Point3::new(1.0, 1.0, 0.0));
        assert_relative_eq!(t.state().heading(), Vector3::y(), epsilon = 1e-12);
        // pen stays down and starts a fresh path
        assert_eq!(t.state().pen, Pen::Down);
        drop(t);
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.edge_count(), 1);
    }

    #[test]
    fn pitch_and_roll_keep_frame_orthonormal() {
        let mut mesh = Mesh::new();
        let mut t = Turtle::new(&mut mesh, CursorState::origin());
        for i in 0..500 {
            t.pitch_up(13.0 + f64::from(i));
            t.roll_left(7.0);
            t.left(3.0);
        }
        let s = t.state();
        assert_relative_eq!(s.heading().norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(s.heading().dot(&s.up()), 0.0, epsilon = 1e-12);
        assert_relative_eq!(s.right().cross(&s.heading()), s.up(), epsilon = 1e-12);
    }

    #[test]
    fn pitch_up_heads_upwards() {
        let mut mesh = Mesh::new();
        let mut t = Turtle::new(&mut mesh, CursorState::origin());
        t.pitch_up(90.0);
        t.forward(1.0);
        assert_relative_eq!(t.position(), Point3::new(0.0, 0.0, 1.0), epsilon = 1e-12);
        t.pitch_down(90.0);
        t.rise(2.0);
        assert_relative_eq!(t.position(), Point3::new(0.0, 0.0, 3.0), epsilon = 1e-12);
    }
}
