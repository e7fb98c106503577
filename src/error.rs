//! Error types for simulation setup.

/// Errors raised while building composites or configuring a world.
///
/// The per-frame update never fails; these all surface at construction time.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Particle index is out of range for its composite.
    #[error("particle index {index} out of range (count: {count})")]
    ParticleOutOfRange { index: usize, count: usize },
    /// The composite id does not name a live composite.
    #[error("composite is not registered with this world")]
    UnknownComposite,
    /// Stiffness must be finite and in [0, 1].
    #[error("stiffness {0} must be finite and in [0, 1]")]
    InvalidStiffness(f32),
    /// Relaxation needs at least one sub-step.
    #[error("at least one relaxation sub-step is required")]
    InvalidSubsteps,
    /// Simulation bounds must be finite and at least 1x1.
    #[error("bounds {width}x{height} must be finite and at least 1x1")]
    InvalidBounds { width: f32, height: f32 },
    /// Friction coefficients must be finite and non-negative.
    #[error("friction {0} must be finite and non-negative")]
    InvalidFriction(f32),
    /// A scene builder was asked for fewer segments than its shape needs.
    #[error("need at least {min} segments, got {got}")]
    InsufficientSegments { min: usize, got: usize },
}

pub type Result<T> = core::result::Result<T, Error>;
