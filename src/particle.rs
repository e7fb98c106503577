//! Verlet particles: position plus the position from the end of the previous step.

use crate::float::Float;
use crate::vec::Vec2;

/// Something the pointer can grab: read the current position, or overwrite it.
pub trait Draggable<F: Float> {
    fn position(&self) -> Vec2<F>;
    fn set_position(&mut self, pos: Vec2<F>);
}

/// A Verlet particle. Velocity is implicit: `pos - prev_pos`.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle<F: Float> {
    pub pos: Vec2<F>,
    pub prev_pos: Vec2<F>,
}

impl<F: Float> Particle<F> {
    /// A particle at rest at `pos`.
    pub fn new(pos: Vec2<F>) -> Self {
        Particle { pos, prev_pos: pos }
    }

    /// A particle at `pos` already moving by `velocity` per frame.
    pub fn with_velocity(pos: Vec2<F>, velocity: Vec2<F>) -> Self {
        Particle { pos, prev_pos: pos - velocity }
    }

    pub fn velocity(&self) -> Vec2<F> {
        self.pos - self.prev_pos
    }

    /// Move the particle and its history together, discarding any velocity.
    pub fn teleport(&mut self, pos: Vec2<F>) {
        self.pos = pos;
        self.prev_pos = pos;
    }
}

impl<F: Float> Draggable<F> for Particle<F> {
    fn position(&self) -> Vec2<F> {
        self.pos
    }

    /// Sets only the current position, so the jump shows up as velocity on the next frame.
    fn set_position(&mut self, pos: Vec2<F>) {
        self.pos = pos;
    }
}
