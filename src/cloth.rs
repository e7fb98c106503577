//! Cloth: a square grid of particles with structural distance constraints and a pinned top edge.

use crate::composite::Composite;
use crate::constraint::ParticleRef;
use crate::error::{Error, Result};
use crate::float::Float;
use crate::vec::Vec2;

/// Configuration for a cloth sheet.
pub struct ClothConfig<F: Float> {
    pub width: F,
    pub height: F,
    /// Particles per row and per column.
    pub segments: usize,
    /// Pin every `pin_every`-th particle of the top row. Zero pins nothing.
    pub pin_every: usize,
    pub stiffness: F,
}

impl<F: Float> ClothConfig<F> {
    /// Index of the particle at (`col`, `row`).
    pub fn index(&self, col: usize, row: usize) -> usize {
        row * self.segments + col
    }
}

/// Create a cloth centred on `origin`.
///
/// Particle (col, row) has index `row * segments + col`. Each particle is tied to its left neighbour and then
/// to the one above it, as it is created.
pub fn cloth<F: Float>(origin: Vec2<F>, config: &ClothConfig<F>) -> Result<Composite<F>> {
    let segments = config.segments;
    if segments == 0 {
        return Err(Error::InsufficientSegments { min: 1, got: 0 });
    }
    let mut composite = Composite::named("cloth");
    let n = F::from_f32(segments as f32);
    let x_stride = config.width / n;
    let y_stride = config.height / n;
    let half = F::from_f32(0.5);

    for y in 0..segments {
        for x in 0..segments {
            let px = origin.x + F::from_f32(x as f32) * x_stride - config.width * half + x_stride * half;
            let py = origin.y + F::from_f32(y as f32) * y_stride - config.height * half + y_stride * half;
            let index = composite.add_particle(Vec2::new(px, py));

            if x > 0 {
                composite.add_distance(index, index - 1, config.stiffness)?;
            }
            if y > 0 {
                composite.add_distance(index, index - segments, config.stiffness)?;
            }
        }
    }

    if config.pin_every > 0 {
        for x in (0..segments).step_by(config.pin_every) {
            composite.pin(x)?;
        }
    }
    Ok(composite)
}

/// Cut every constraint attached to the particle at (`col`, `row`). Returns how many were removed.
pub fn tear_at<F: Float>(composite: &mut Composite<F>, config: &ClothConfig<F>, col: usize, row: usize) -> usize {
    let target = ParticleRef::Local(config.index(col, row));
    let before = composite.constraint_count();
    composite.retain_constraints(|c| c.refs().all(|r| r != target));
    before - composite.constraint_count()
}
