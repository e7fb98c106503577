//! Step observer trait for monitoring the per-frame pipeline.

use crate::composite::CompositeId;

/// Trait for observing simulation frames.
///
/// Implement this trait to monitor the update pipeline (debug overlays, profiling, tests that check ordering).
/// All methods have default no-op implementations.
pub trait StepObserver {
    /// Called after every composite's behavior hook has run.
    fn on_hooks(&mut self) {}

    /// Called after all particles have been integrated.
    fn on_integrate(&mut self) {}

    /// Called after one sweep over a composite's constraints during sub-step `substep`.
    fn on_relax(&mut self, _composite: CompositeId, _substep: usize) {}

    /// Called after all particles have been clamped to the bounds.
    fn on_clamp(&mut self) {}

    /// Called when a frame is fully complete.
    fn on_step_complete(&mut self) {}
}

/// A no-op observer that does nothing. Use as default when no observation needed.
pub struct NoOpStepObserver;

impl StepObserver for NoOpStepObserver {}
