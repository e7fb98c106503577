//! Tires: a rim of particles braced by spokes to a centre particle.

use crate::composite::Composite;
use crate::error::{Error, Result};
use crate::float::Float;
use crate::vec::Vec2;

/// Rim particles are tied to their neighbour and to the one five places on, which keeps low-segment
/// tires from folding.
const BRACE_SKIP: usize = 5;

/// Create a tire of `segments` rim particles around `origin`.
///
/// Particle `segments` is the centre. Per rim particle, constraints are added in the order
/// tread (next neighbour), spoke (centre), brace (five on).
pub fn tire<F: Float>(
    origin: Vec2<F>,
    radius: F,
    segments: usize,
    spoke_stiffness: F,
    tread_stiffness: F,
) -> Result<Composite<F>> {
    if segments < 3 {
        return Err(Error::InsufficientSegments { min: 3, got: segments });
    }
    let mut composite = Composite::named("tire");
    let stride = F::two() * F::pi() / F::from_f32(segments as f32);

    for i in 0..segments {
        let theta = F::from_f32(i as f32) * stride;
        composite.add_particle(Vec2::new(
            origin.x + theta.cos() * radius,
            origin.y + theta.sin() * radius,
        ));
    }
    let center = composite.add_particle(origin);

    for i in 0..segments {
        composite.add_distance(i, (i + 1) % segments, tread_stiffness)?;
        composite.add_distance(i, center, spoke_stiffness)?;
        composite.add_distance(i, (i + BRACE_SKIP) % segments, tread_stiffness)?;
    }
    Ok(composite)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centre_is_last_particle() {
        let tire = tire(Vec2::new(200.0f32, 50.0), 50.0, 30, 0.3, 0.9).unwrap();
        assert_eq!(tire.particle_count(), 31);
        assert_eq!(tire.particle(30).pos, Vec2::new(200.0, 50.0));
        assert_eq!(tire.constraint_count(), 90);
    }

    #[test]
    fn rejects_degenerate_rim() {
        assert_eq!(
            tire(Vec2::new(0.0f32, 0.0), 10.0, 2, 1.0, 1.0).unwrap_err(),
            Error::InsufficientSegments { min: 3, got: 2 }
        );
    }
}
