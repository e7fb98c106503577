//! Per-composite update hooks.

use crate::composite::CompositeId;
use crate::float::Float;
use crate::world::Composites;

/// A hook run once per frame, before integration, for the composite it is attached to.
///
/// The hook may reshape any composite's constraint set between frames, for example to release a tether and
/// attach a new one somewhere else. While it runs, the owning composite is reachable through
/// `composites.get_mut(this)`.
pub trait Behavior<F: Float> {
    fn update(&mut self, this: CompositeId, dt: F, composites: &mut Composites<F>);
}

/// Closures are behaviors.
impl<F, T> Behavior<F> for T
where
    F: Float,
    T: FnMut(CompositeId, F, &mut Composites<F>),
{
    fn update(&mut self, this: CompositeId, dt: F, composites: &mut Composites<F>) {
        self(this, dt, composites)
    }
}
