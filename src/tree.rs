//! Trees: recursively forking branches held in shape by angle constraints at every joint.

use crate::composite::Composite;
use crate::error::{Error, Result};
use crate::float::Float;
use crate::vec::Vec2;
use alloc::vec::Vec;
use rand::Rng;

/// Configuration for a tree.
pub struct TreeConfig<F: Float> {
    /// Number of forks between trunk and leaves.
    pub depth: usize,
    /// Length of the trunk. Each level multiplies it by the square of the previous coefficient.
    pub branch_length: F,
    pub segment_coef: F,
    /// Half the opening angle of each fork, in radians.
    pub theta: F,
    /// Stiffness of every branch.
    pub branch_stiffness: F,
    /// Joint stiffness at the trunk; it falls linearly to zero at the leaves.
    pub joint_stiffness: F,
    /// Up to this many units of random displacement per axis, applied once after building.
    pub noise: F,
}

impl<F: Float> Default for TreeConfig<F> {
    fn default() -> Self {
        TreeConfig {
            depth: 5,
            branch_length: F::from_f32(70.0),
            segment_coef: F::from_f32(0.95),
            theta: F::pi() / F::from_f32(6.0),
            branch_stiffness: F::from_f32(0.7),
            joint_stiffness: F::from_f32(0.7),
            noise: F::from_f32(10.0),
        }
    }
}

/// A built tree: the composite plus which particles are leaves.
pub struct Tree<F: Float> {
    pub composite: Composite<F>,
    pub leaves: Vec<usize>,
}

/// Grow a tree upward (toward -y) from `origin`.
///
/// Particle 0 is the base and particle 1 the root just below it; both are pinned, and the trunk's angle
/// against them is held at full stiffness.
pub fn tree<F: Float, R: Rng + ?Sized>(origin: Vec2<F>, config: &TreeConfig<F>, rng: &mut R) -> Result<Tree<F>> {
    if config.depth == 0 {
        return Err(Error::InsufficientSegments { min: 1, got: 0 });
    }
    let mut builder = Builder { config, composite: Composite::named("tree"), leaves: Vec::new() };

    let base = builder.composite.add_particle(origin);
    let root = builder.composite.add_particle(origin + Vec2::new(F::zero(), F::from_f32(10.0)));
    builder.composite.pin(base)?;
    builder.composite.pin(root)?;

    let up = Vec2::new(F::zero(), -F::one());
    let trunk = builder.branch(base, 0, config.segment_coef, up)?;
    builder.composite.add_angle(root, base, trunk, F::one())?;

    let Builder { mut composite, leaves, .. } = builder;

    // Every particle is shaken, base and root included; their pins keep the unshaken positions.
    for p in composite.particles_mut() {
        let jitter = Vec2::new(
            (F::from_f32(rng.gen::<f32>()) * config.noise).floor(),
            (F::from_f32(rng.gen::<f32>()) * config.noise).floor(),
        );
        p.pos = p.pos + jitter;
    }

    Ok(Tree { composite, leaves })
}

struct Builder<'a, F: Float> {
    config: &'a TreeConfig<F>,
    composite: Composite<F>,
    leaves: Vec<usize>,
}

impl<F: Float> Builder<'_, F> {
    fn branch(&mut self, parent: usize, level: usize, coef: F, normal: Vec2<F>) -> Result<usize> {
        let config = self.config;
        let pos = self.composite.particle(parent).pos + normal.scale(config.branch_length * coef);
        let particle = self.composite.add_particle(pos);
        self.composite.add_distance(parent, particle, config.branch_stiffness)?;

        if level < config.depth {
            let origin = Vec2::zero();
            let a = self.branch(particle, level + 1, coef * coef, normal.rotate(origin, -config.theta))?;
            let b = self.branch(particle, level + 1, coef * coef, normal.rotate(origin, config.theta))?;

            let t = F::from_f32(level as f32) / F::from_f32(config.depth as f32);
            let joint = config.joint_stiffness.lerp(F::zero(), t);
            self.composite.add_angle(parent, particle, a, joint)?;
            self.composite.add_angle(parent, particle, b, joint)?;
        } else {
            self.leaves.push(particle);
        }
        Ok(particle)
    }
}
