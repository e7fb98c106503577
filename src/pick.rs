//! Picking and dragging: find the entity nearest the pointer and move it each frame.

use crate::composite::{CompositeId, ParticleHandle};
use crate::float::Float;
use crate::particle::Draggable;
use crate::vec::Vec2;
use crate::world::World;

/// Something the pointer can hold.
///
/// A pinned particle is grabbed through its pin, since relaxation would overwrite the particle's own position.
/// Pins are identified by the particle they anchor, so the target survives constraints being added or removed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DragTarget {
    /// A free particle.
    Particle(ParticleHandle),
    /// The last pin in the particle's own composite that anchors it.
    Pin(ParticleHandle),
}

impl DragTarget {
    pub fn handle(&self) -> ParticleHandle {
        match *self {
            DragTarget::Particle(handle) | DragTarget::Pin(handle) => handle,
        }
    }

    pub fn composite(&self) -> CompositeId {
        self.handle().composite
    }

    pub fn is_pin(&self) -> bool {
        matches!(self, DragTarget::Pin(_))
    }
}

impl<F: Float> World<F> {
    /// The entity nearest `point` within `radius`, or `None`.
    ///
    /// Equidistant candidates resolve to the first one found, walking composites in registration order and
    /// particles in insertion order.
    pub fn nearest_entity(&self, point: Vec2<F>, radius: F) -> Option<DragTarget> {
        let radius_sq = radius * radius;
        let mut nearest: Option<(ParticleHandle, F)> = None;

        for (id, composite) in self.composites.iter() {
            for (index, p) in composite.particles().iter().enumerate() {
                let d2 = p.pos.distance_sq(point);
                if d2 <= radius_sq && nearest.map_or(true, |(_, best)| d2 < best) {
                    nearest = Some((ParticleHandle::new(id, index), d2));
                }
            }
        }

        let (handle, _) = nearest?;
        let pinned = self
            .composites
            .get(handle.composite)
            .and_then(|c| c.pin_for(handle.index))
            .is_some();
        Some(if pinned { DragTarget::Pin(handle) } else { DragTarget::Particle(handle) })
    }

    /// Current position of a drag target: the pin's target for pins, the particle's position otherwise.
    pub fn drag_position(&self, target: DragTarget) -> Option<Vec2<F>> {
        let composite = self.composites.get(target.composite())?;
        match target {
            DragTarget::Particle(handle) => composite.particles().get(handle.index).map(|p| p.position()),
            DragTarget::Pin(handle) => composite
                .pin_for(handle.index)
                .and_then(|i| composite.constraint(i))
                .and_then(|c| c.as_pin())
                .map(|pin| pin.position()),
        }
    }

    /// Move a drag target unconditionally. Returns `false` if it no longer resolves.
    pub fn set_drag_position(&mut self, target: DragTarget, pos: Vec2<F>) -> bool {
        let Some(composite) = self.composites.get_mut(target.composite()) else {
            return false;
        };
        match target {
            DragTarget::Particle(handle) => match composite.particles_mut().get_mut(handle.index) {
                Some(p) => {
                    p.set_position(pos);
                    true
                }
                None => false,
            },
            DragTarget::Pin(handle) => {
                let Some(index) = composite.pin_for(handle.index) else {
                    return false;
                };
                match composite.constraints_mut()[index].as_pin_mut() {
                    Some(pin) => {
                        pin.set_position(pos);
                        true
                    }
                    None => false,
                }
            }
        }
    }

    pub fn pointer(&self) -> Vec2<F> {
        self.pointer
    }

    /// Move the pointer. A held entity follows on the next [`update`](World::update).
    pub fn set_pointer(&mut self, point: Vec2<F>) {
        self.pointer = point;
    }

    /// Press at `point`: grab the nearest entity within the selection radius, if any.
    pub fn begin_drag(&mut self, point: Vec2<F>) -> Option<DragTarget> {
        self.pointer = point;
        let target = self.nearest_entity(point, self.config.selection_radius);
        if target.is_some() {
            log::debug!("begin drag: {:?}", target);
            self.dragged = target;
        }
        target
    }

    /// Release whatever is held.
    pub fn end_drag(&mut self) {
        if let Some(target) = self.dragged.take() {
            log::debug!("end drag: {:?}", target);
        }
    }

    pub fn dragged(&self) -> Option<DragTarget> {
        self.dragged
    }

    /// What a renderer should highlight: the held entity, or else the nearest one under the pointer.
    pub fn highlighted(&self) -> Option<DragTarget> {
        self.dragged
            .or_else(|| self.nearest_entity(self.pointer, self.config.selection_radius))
    }
}
