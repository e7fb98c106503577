//! Composites: one logical object (rope, tire, cloth...) owning its particles and constraints.

use crate::behavior::Behavior;
use crate::constraint::{AngleConstraint, Constraint, DistanceConstraint, ParticleRef, PinConstraint};
use crate::error::{Error, Result};
use crate::float::Float;
use crate::particle::Particle;
use crate::vec::Vec2;
use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

/// Stable identifier of a composite registered with a [`World`](crate::World).
///
/// Ids are generational: an id whose composite was removed never resolves again.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CompositeId(pub(crate) thunderdome::Index);

/// A particle addressed across composites.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParticleHandle {
    pub composite: CompositeId,
    pub index: usize,
}

impl ParticleHandle {
    pub fn new(composite: CompositeId, index: usize) -> Self {
        ParticleHandle { composite, index }
    }
}

/// Particles and the constraints between them.
///
/// Constraint order is relaxation order: a constraint sees the positions left by the ones before it in the
/// same sub-step.
pub struct Composite<F: Float> {
    name: &'static str,
    pub(crate) particles: Vec<Particle<F>>,
    pub(crate) constraints: Vec<Constraint<F>>,
    pub(crate) behavior: Option<Box<dyn Behavior<F>>>,
}

impl<F: Float> Composite<F> {
    pub fn new() -> Self {
        Self::named("composite")
    }

    /// An empty composite with a label used in log output.
    pub fn named(name: &'static str) -> Self {
        Composite {
            name,
            particles: Vec::new(),
            constraints: Vec::new(),
            behavior: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Attach a per-frame hook, run by the world before integration.
    pub fn with_behavior(mut self, behavior: impl Behavior<F> + 'static) -> Self {
        self.behavior = Some(Box::new(behavior));
        self
    }

    pub fn set_behavior(&mut self, behavior: Option<Box<dyn Behavior<F>>>) {
        self.behavior = behavior;
    }

    pub fn has_behavior(&self) -> bool {
        self.behavior.is_some()
    }

    /// Append a particle at rest and return its index.
    pub fn add_particle(&mut self, pos: Vec2<F>) -> usize {
        self.push_particle(Particle::new(pos))
    }

    pub fn push_particle(&mut self, particle: Particle<F>) -> usize {
        let index = self.particles.len();
        self.particles.push(particle);
        index
    }

    /// Validate a local particle index.
    pub fn check_index(&self, index: usize) -> Result<usize> {
        if index < self.particles.len() {
            Ok(index)
        } else {
            Err(Error::ParticleOutOfRange { index, count: self.particles.len() })
        }
    }

    /// Pin particle `index` where it currently is. Returns the new constraint's index.
    pub fn pin(&mut self, index: usize) -> Result<usize> {
        let pos = self.particles[self.check_index(index)?].pos;
        self.pin_at(index, pos)
    }

    /// Pin particle `index` to `target`.
    pub fn pin_at(&mut self, index: usize, target: Vec2<F>) -> Result<usize> {
        self.check_index(index)?;
        Ok(self.push_constraint(PinConstraint::new(index, target).into()))
    }

    /// Distance constraint whose rest length is the current separation of `a` and `b`.
    pub fn add_distance(&mut self, a: usize, b: usize, stiffness: F) -> Result<usize> {
        let (a, b) = (self.check_index(a)?, self.check_index(b)?);
        let distance = self.particles[a].pos.distance(self.particles[b].pos);
        self.add_distance_with_length(a, b, stiffness, distance)
    }

    pub fn add_distance_with_length(&mut self, a: usize, b: usize, stiffness: F, distance: F) -> Result<usize> {
        self.add_constraint(DistanceConstraint::new(a, b, distance, stiffness).into())
    }

    /// Angle constraint holding the current angle `a -> b -> c` around pivot `b`.
    pub fn add_angle(&mut self, a: usize, b: usize, c: usize, stiffness: F) -> Result<usize> {
        let (a, b, c) = (self.check_index(a)?, self.check_index(b)?, self.check_index(c)?);
        let angle = self.particles[b]
            .pos
            .angle_between(self.particles[a].pos, self.particles[c].pos);
        self.add_constraint(AngleConstraint::new(a, b, c, angle, stiffness).into())
    }

    /// Append an arbitrary constraint after checking its local indices and stiffness.
    ///
    /// Foreign references are not checked here; the world checks them in
    /// [`World::link_distance`](crate::World::link_distance).
    pub fn add_constraint(&mut self, constraint: Constraint<F>) -> Result<usize> {
        for r in constraint.refs() {
            if let ParticleRef::Local(index) = r {
                self.check_index(index)?;
            }
        }
        let stiffness = match &constraint {
            Constraint::Distance(c) => Some(c.stiffness),
            Constraint::Angle(c) => Some(c.stiffness),
            Constraint::Pin(_) => None,
        };
        if let Some(s) = stiffness {
            check_stiffness(s)?;
        }
        Ok(self.push_constraint(constraint))
    }

    fn push_constraint(&mut self, constraint: Constraint<F>) -> usize {
        let index = self.constraints.len();
        self.constraints.push(constraint);
        index
    }

    /// Remove a constraint, keeping the relative order of the rest.
    pub fn remove_constraint(&mut self, index: usize) -> Option<Constraint<F>> {
        (index < self.constraints.len()).then(|| self.constraints.remove(index))
    }

    pub fn retain_constraints(&mut self, f: impl FnMut(&Constraint<F>) -> bool) {
        self.constraints.retain(f);
    }

    /// Multiply every distance constraint's rest length by `factor`, e.g. to pre-tension a web.
    pub fn scale_distances(&mut self, factor: F) {
        for c in self.constraints.iter_mut() {
            if let Constraint::Distance(d) = c {
                d.distance = d.distance * factor;
            }
        }
    }

    /// Index of the pin anchored at local particle `index`. The last such pin wins, since it relaxes last.
    pub fn pin_for(&self, index: usize) -> Option<usize> {
        self.constraints
            .iter()
            .rposition(|c| c.as_pin().is_some_and(|pin| pin.particle == ParticleRef::Local(index)))
    }

    pub fn particles(&self) -> &[Particle<F>] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle<F>] {
        &mut self.particles
    }

    pub fn constraints(&self) -> &[Constraint<F>] {
        &self.constraints
    }

    pub fn constraints_mut(&mut self) -> &mut [Constraint<F>] {
        &mut self.constraints
    }

    /// Panics if `index` is out of range.
    pub fn particle(&self, index: usize) -> &Particle<F> {
        &self.particles[index]
    }

    /// Panics if `index` is out of range.
    pub fn particle_mut(&mut self, index: usize) -> &mut Particle<F> {
        &mut self.particles[index]
    }

    pub fn constraint(&self, index: usize) -> Option<&Constraint<F>> {
        self.constraints.get(index)
    }

    pub fn positions(&self) -> Vec<Vec2<F>> {
        self.particles.iter().map(|p| p.pos).collect()
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }
}

impl<F: Float> Default for Composite<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float> fmt::Debug for Composite<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Composite")
            .field("name", &self.name)
            .field("particles", &self.particles.len())
            .field("constraints", &self.constraints.len())
            .field("behavior", &self.behavior.is_some())
            .finish()
    }
}

pub(crate) fn check_stiffness<F: Float>(stiffness: F) -> Result<()> {
    if stiffness.is_finite() && stiffness >= F::zero() && stiffness <= F::one() {
        Ok(())
    } else {
        Err(Error::InvalidStiffness(stiffness.to_f32()))
    }
}
