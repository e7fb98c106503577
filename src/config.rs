//! Configuration types for the simulation.

use crate::error::{Error, Result};
use crate::float::Float;
use crate::vec::Vec2;

/// The simulated area. `(0, 0)` is the top-left corner and `y` grows downward, so `height - 1` is the floor.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds<F: Float> {
    pub width: F,
    pub height: F,
}

impl<F: Float> Bounds<F> {
    pub fn new(width: F, height: F) -> Self {
        Bounds { width, height }
    }

    /// The `y` coordinate particles rest on.
    pub fn floor(&self) -> F {
        self.height - F::one()
    }

    /// Whether `pos` is touching or below the floor.
    pub fn on_floor(&self, pos: Vec2<F>) -> bool {
        pos.y >= self.floor()
    }

    /// Clamp `y` to at most the floor and `x` into `[0, width - 1]`. There is no ceiling.
    pub fn clamp(&self, pos: Vec2<F>) -> Vec2<F> {
        Vec2 {
            x: pos.x.clamp(F::zero(), self.width - F::one()),
            y: pos.y.min(self.floor()),
        }
    }
}

/// How the relaxation pass walks composites and sub-steps.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RelaxOrder {
    /// Each composite runs all of its sub-steps before the next composite starts.
    #[default]
    PerComposite,
    /// Sub-steps are outermost; every sub-step sweeps all composites in order.
    Interleaved,
}

/// Global simulation parameters.
///
/// # Builder Pattern
/// ```
/// use taut::config::SimConfig;
/// use taut::vec::Vec2;
///
/// let config: SimConfig<f32> = SimConfig::new()
///     .with_gravity(Vec2::new(0.0, 0.2))
///     .with_friction(0.99)
///     .with_ground_friction(0.8)
///     .with_substeps(16);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig<F: Float> {
    /// Gravity per frame at 60 Hz; scaled by `60 * dt` when integrating. Default: (0, 0.2).
    pub gravity: Vec2<F>,
    /// Velocity multiplier applied every frame. 1.0 = no damping. Default: 0.99.
    pub friction: F,
    /// Extra velocity multiplier for particles resting on the floor. Default: 0.8.
    pub ground_friction: F,
    /// Relaxation sub-steps per frame. More = stiffer and more stable, but slower. Default: 16.
    pub substeps: usize,
    /// Simulated area. Default: 800 x 500.
    pub bounds: Bounds<F>,
    /// Picking radius around the pointer. Default: 20.
    pub selection_radius: F,
    /// Default: [`RelaxOrder::PerComposite`].
    pub relax_order: RelaxOrder,
}

impl<F: Float> SimConfig<F> {
    /// Create a new config with default values.
    pub fn new() -> Self {
        SimConfig {
            gravity: Vec2::new(F::zero(), F::from_f32(0.2)),
            friction: F::from_f32(0.99),
            ground_friction: F::from_f32(0.8),
            substeps: 16,
            bounds: Bounds::new(F::from_f32(800.0), F::from_f32(500.0)),
            selection_radius: F::from_f32(20.0),
            relax_order: RelaxOrder::PerComposite,
        }
    }

    pub fn with_gravity(mut self, gravity: Vec2<F>) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_friction(mut self, friction: F) -> Self {
        self.friction = friction;
        self
    }

    pub fn with_ground_friction(mut self, ground_friction: F) -> Self {
        self.ground_friction = ground_friction;
        self
    }

    /// Set the number of sub-steps (at least 1).
    pub fn with_substeps(mut self, substeps: usize) -> Self {
        self.substeps = substeps.max(1);
        self
    }

    pub fn with_bounds(mut self, width: F, height: F) -> Self {
        self.bounds = Bounds::new(width, height);
        self
    }

    pub fn with_selection_radius(mut self, radius: F) -> Self {
        self.selection_radius = radius;
        self
    }

    pub fn with_relax_order(mut self, order: RelaxOrder) -> Self {
        self.relax_order = order;
        self
    }

    /// Check the parameters a world relies on.
    pub fn validate(&self) -> Result<()> {
        if self.substeps == 0 {
            return Err(Error::InvalidSubsteps);
        }
        let Bounds { width, height } = self.bounds;
        if !(width.is_finite() && height.is_finite() && width >= F::one() && height >= F::one()) {
            return Err(Error::InvalidBounds { width: width.to_f32(), height: height.to_f32() });
        }
        for f in [self.friction, self.ground_friction] {
            if !(f.is_finite() && f >= F::zero()) {
                return Err(Error::InvalidFriction(f.to_f32()));
            }
        }
        Ok(())
    }
}

impl<F: Float> Default for SimConfig<F> {
    fn default() -> Self {
        Self::new()
    }
}
