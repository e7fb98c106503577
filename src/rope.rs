//! Ropes and free points built from particles and distance constraints.

use crate::composite::Composite;
use crate::error::{Error, Result};
use crate::float::Float;
use crate::vec::Vec2;

/// A single free particle.
pub fn point<F: Float>(pos: Vec2<F>) -> Composite<F> {
    let mut composite = Composite::named("point");
    composite.add_particle(pos);
    composite
}

/// A polyline: one particle per vertex, each tied to the previous one at its current distance.
pub fn line_segments<F: Float>(vertices: &[Vec2<F>], stiffness: F) -> Result<Composite<F>> {
    let mut composite = Composite::named("line segments");
    for (i, &v) in vertices.iter().enumerate() {
        let index = composite.add_particle(v);
        if i > 0 {
            composite.add_distance(index, index - 1, stiffness)?;
        }
    }
    Ok(composite)
}

/// A straight rope from `start` to `end` with `segments` equal links.
pub fn rope<F: Float>(start: Vec2<F>, end: Vec2<F>, segments: usize, stiffness: F) -> Result<Composite<F>> {
    if segments == 0 {
        return Err(Error::InsufficientSegments { min: 1, got: 0 });
    }
    let mut composite = Composite::named("rope");
    let segment_length = start.distance(end) / F::from_f32(segments as f32);

    for i in 0..=segments {
        let t = F::from_f32(i as f32) / F::from_f32(segments as f32);
        composite.add_particle(start.lerp(end, t));
    }
    for i in 0..segments {
        composite.add_distance_with_length(i, i + 1, stiffness, segment_length)?;
    }
    Ok(composite)
}
