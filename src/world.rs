//! The simulation engine: registered composites, the per-frame pipeline and the boundary clamp.

use crate::composite::{check_stiffness, Composite, CompositeId, ParticleHandle};
use crate::config::{RelaxOrder, SimConfig};
use crate::constraint::{Constraint, DistanceConstraint, ParticleAccess, ParticleRef};
use crate::error::{Error, Result};
use crate::float::Float;
use crate::observer::{NoOpStepObserver, StepObserver};
use crate::particle::Particle;
use crate::pick::DragTarget;
use crate::vec::Vec2;
use alloc::vec::Vec;
use thunderdome::Arena;

/// Squared speed below which ground friction is not applied.
const GROUND_SPEED_SQ: f32 = 1e-6;

/// Gravity is expressed per frame at this rate and rescaled by `dt`.
const REFERENCE_HZ: f32 = 60.0;

/// The composite table: generational storage plus registration order.
///
/// Every order-sensitive walk (hooks, relaxation, picking) follows registration order.
pub struct Composites<F: Float> {
    arena: Arena<Composite<F>>,
    order: Vec<CompositeId>,
}

impl<F: Float> Composites<F> {
    pub fn new() -> Self {
        Composites { arena: Arena::new(), order: Vec::new() }
    }

    pub fn insert(&mut self, composite: Composite<F>) -> CompositeId {
        let id = CompositeId(self.arena.insert(composite));
        self.order.push(id);
        id
    }

    pub fn remove(&mut self, id: CompositeId) -> Option<Composite<F>> {
        let composite = self.arena.remove(id.0)?;
        self.order.retain(|&other| other != id);
        Some(composite)
    }

    pub fn get(&self, id: CompositeId) -> Option<&Composite<F>> {
        self.arena.get(id.0)
    }

    pub fn get_mut(&mut self, id: CompositeId) -> Option<&mut Composite<F>> {
        self.arena.get_mut(id.0)
    }

    pub fn contains(&self, id: CompositeId) -> bool {
        self.arena.contains(id.0)
    }

    pub fn particle(&self, handle: ParticleHandle) -> Option<&Particle<F>> {
        self.get(handle.composite)?.particles.get(handle.index)
    }

    pub fn particle_mut(&mut self, handle: ParticleHandle) -> Option<&mut Particle<F>> {
        self.get_mut(handle.composite)?.particles.get_mut(handle.index)
    }

    /// Ids in registration order.
    pub fn ids(&self) -> &[CompositeId] {
        &self.order
    }

    /// Composites in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (CompositeId, &Composite<F>)> + '_ {
        self.order
            .iter()
            .filter_map(move |&id| self.arena.get(id.0).map(|c| (id, c)))
    }

    /// Composites in storage order, which differs from registration order once slots are reused.
    fn iter_unordered_mut(&mut self) -> impl Iterator<Item = &mut Composite<F>> + '_ {
        self.arena.iter_mut().map(|(_, c)| c)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl<F: Float> Default for Composites<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves references for the constraints of `current` while they relax.
///
/// The constraints being relaxed are moved out of the composite for the duration, so every composite's
/// particles stay reachable through the table.
struct Resolver<'a, F: Float> {
    current: CompositeId,
    composites: &'a mut Composites<F>,
}

impl<F: Float> Resolver<'_, F> {
    fn handle(&self, r: ParticleRef) -> ParticleHandle {
        match r {
            ParticleRef::Local(index) => ParticleHandle::new(self.current, index),
            ParticleRef::Foreign(handle) => handle,
        }
    }
}

impl<F: Float> ParticleAccess<F> for Resolver<'_, F> {
    fn position_of(&self, r: ParticleRef) -> Option<Vec2<F>> {
        self.composites.particle(self.handle(r)).map(|p| p.pos)
    }

    fn set_position_of(&mut self, r: ParticleRef, pos: Vec2<F>) {
        let handle = self.handle(r);
        if let Some(p) = self.composites.particle_mut(handle) {
            p.pos = pos;
        }
    }
}

/// Read access across the whole table, used to measure constraints from outside a relax pass.
impl<F: Float> ParticleAccess<F> for Composites<F> {
    fn position_of(&self, r: ParticleRef) -> Option<Vec2<F>> {
        match r {
            ParticleRef::Foreign(handle) => self.particle(handle).map(|p| p.pos),
            ParticleRef::Local(_) => None,
        }
    }

    fn set_position_of(&mut self, r: ParticleRef, pos: Vec2<F>) {
        if let ParticleRef::Foreign(handle) = r {
            if let Some(p) = self.particle_mut(handle) {
                p.pos = pos;
            }
        }
    }
}

/// A 2D Verlet world: composites, global parameters and pointer/drag state.
pub struct World<F: Float> {
    pub(crate) composites: Composites<F>,
    pub(crate) config: SimConfig<F>,
    pub(crate) pointer: Vec2<F>,
    pub(crate) dragged: Option<DragTarget>,
}

impl<F: Float> World<F> {
    /// Build a world around `config`. The config is not validated in release builds; use
    /// [`World::try_new`] for configs that come from outside.
    pub fn new(config: SimConfig<F>) -> Self {
        debug_assert!(config.validate().is_ok(), "invalid world config");
        World {
            composites: Composites::new(),
            config,
            pointer: Vec2::zero(),
            dragged: None,
        }
    }

    pub fn try_new(config: SimConfig<F>) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &SimConfig<F> {
        &self.config
    }

    /// Replace the global parameters after validating them.
    pub fn configure(&mut self, config: SimConfig<F>) -> Result<()> {
        config.validate()?;
        log::debug!(
            "configure: gravity=({:?}, {:?}) friction={:?} ground_friction={:?} substeps={}",
            config.gravity.x,
            config.gravity.y,
            config.friction,
            config.ground_friction,
            config.substeps
        );
        self.config = config;
        Ok(())
    }

    /// Register a composite. It is updated after every composite registered before it.
    pub fn add_composite(&mut self, composite: Composite<F>) -> CompositeId {
        log::debug!(
            "add composite '{}': {} particles, {} constraints",
            composite.name(),
            composite.particle_count(),
            composite.constraint_count()
        );
        self.composites.insert(composite)
    }

    /// Unregister a composite and hand it back.
    ///
    /// Constraints in other composites that reference its particles are dropped, and a drag on one of its
    /// particles or pins ends.
    pub fn remove_composite(&mut self, id: CompositeId) -> Option<Composite<F>> {
        let composite = self.composites.remove(id)?;

        let mut purged = 0;
        for other in self.composites.iter_unordered_mut() {
            let before = other.constraints.len();
            other.constraints.retain(|c| !c.references_composite(id));
            purged += before - other.constraints.len();
        }
        if purged > 0 {
            log::warn!(
                "removed composite '{}': dropped {} constraints that referenced it",
                composite.name(),
                purged
            );
        }

        if self.dragged.is_some_and(|d| d.composite() == id) {
            self.dragged = None;
        }
        log::debug!("removed composite '{}'", composite.name());
        Some(composite)
    }

    pub fn composite(&self, id: CompositeId) -> Option<&Composite<F>> {
        self.composites.get(id)
    }

    pub fn composite_mut(&mut self, id: CompositeId) -> Option<&mut Composite<F>> {
        self.composites.get_mut(id)
    }

    pub fn composites(&self) -> &Composites<F> {
        &self.composites
    }

    pub fn composites_mut(&mut self) -> &mut Composites<F> {
        &mut self.composites
    }

    pub fn particle(&self, handle: ParticleHandle) -> Option<&Particle<F>> {
        self.composites.particle(handle)
    }

    /// Validate a particle handle against the table.
    pub fn check_handle(&self, handle: ParticleHandle) -> Result<ParticleHandle> {
        let composite = self.composites.get(handle.composite).ok_or(Error::UnknownComposite)?;
        composite.check_index(handle.index)?;
        Ok(handle)
    }

    /// Tie particle `a` to particle `b` with a distance constraint owned by `a`'s composite.
    ///
    /// `distance` defaults to the current separation. Returns the constraint's index in `a`'s composite.
    pub fn link_distance(
        &mut self,
        a: ParticleHandle,
        b: ParticleHandle,
        stiffness: F,
        distance: Option<F>,
    ) -> Result<usize> {
        self.check_handle(a)?;
        self.check_handle(b)?;
        check_stiffness(stiffness)?;

        let distance = match distance {
            Some(d) => d,
            None => self
                .composites
                .position_of(b.into())
                .zip(self.composites.position_of(a.into()))
                .map(|(pb, pa)| pa.distance(pb))
                .ok_or(Error::UnknownComposite)?,
        };
        let b_ref = if b.composite == a.composite {
            ParticleRef::Local(b.index)
        } else {
            ParticleRef::Foreign(b)
        };
        let composite = self.composites.get_mut(a.composite).ok_or(Error::UnknownComposite)?;
        composite.add_constraint(DistanceConstraint::new(a.index, b_ref, distance, stiffness).into())
    }

    /// Advance one frame using the configured sub-step count.
    pub fn update(&mut self, dt: F) {
        let substeps = self.config.substeps;
        self.update_with(dt, substeps, &mut NoOpStepObserver);
    }

    /// Advance one frame: hooks, integration, drag override, relaxation, boundary clamp.
    pub fn update_with<O: StepObserver>(&mut self, dt: F, substeps: usize, observer: &mut O) {
        let substeps = substeps.max(1);

        self.run_behaviors(dt);
        observer.on_hooks();

        self.integrate(dt);
        observer.on_integrate();

        if let Some(target) = self.dragged {
            let pointer = self.pointer;
            self.set_drag_position(target, pointer);
        }

        let relaxed = self.relax(substeps, observer);

        self.apply_bounds();
        observer.on_clamp();

        log::trace!(
            "frame: {} composites, {} constraint relaxations over {} sub-steps",
            self.composites.len(),
            relaxed,
            substeps
        );
        observer.on_step_complete();
    }

    fn run_behaviors(&mut self, dt: F) {
        // Hooks may add or remove composites, so walk a snapshot of the ids.
        let ids: Vec<CompositeId> = self.composites.ids().to_vec();
        for id in ids {
            let Some(mut behavior) = self.composites.get_mut(id).and_then(|c| c.behavior.take()) else {
                continue;
            };
            behavior.update(id, dt, &mut self.composites);
            if let Some(c) = self.composites.get_mut(id) {
                if c.behavior.is_none() {
                    c.behavior = Some(behavior);
                }
            }
        }
    }

    /// Verlet step for every particle: damped implicit velocity, ground drag, gravity.
    fn integrate(&mut self, dt: F) {
        let SimConfig { gravity, friction, ground_friction, bounds, .. } = self.config;
        let gravity_step = gravity.scale(F::from_f32(REFERENCE_HZ) * dt);
        let min_speed_sq = F::from_f32(GROUND_SPEED_SQ);

        for composite in self.composites.iter_unordered_mut() {
            for p in composite.particles.iter_mut() {
                let mut velocity = (p.pos - p.prev_pos).scale(friction);
                if bounds.on_floor(p.pos) && velocity.length_sq() > min_speed_sq {
                    velocity = velocity.scale(ground_friction);
                }
                p.prev_pos = p.pos;
                p.pos = p.pos + gravity_step + velocity;
            }
        }
    }

    fn relax<O: StepObserver>(&mut self, substeps: usize, observer: &mut O) -> usize {
        let step = F::one() / F::from_f32(substeps as f32);
        let ids: Vec<CompositeId> = self.composites.ids().to_vec();
        let mut relaxed = 0;

        match self.config.relax_order {
            RelaxOrder::PerComposite => {
                for &id in &ids {
                    relaxed += self.relax_composite(id, step, 0..substeps, observer);
                }
            }
            RelaxOrder::Interleaved => {
                for substep in 0..substeps {
                    for &id in &ids {
                        relaxed += self.relax_composite(id, step, substep..substep + 1, observer);
                    }
                }
            }
        }
        relaxed
    }

    fn relax_composite<O: StepObserver>(
        &mut self,
        id: CompositeId,
        step: F,
        substeps: core::ops::Range<usize>,
        observer: &mut O,
    ) -> usize {
        let Some(composite) = self.composites.get_mut(id) else {
            return 0;
        };
        let constraints: Vec<Constraint<F>> = core::mem::take(&mut composite.constraints);

        let mut relaxed = 0;
        {
            let mut resolver = Resolver { current: id, composites: &mut self.composites };
            for substep in substeps {
                for c in constraints.iter() {
                    c.relax(step, &mut resolver);
                }
                relaxed += constraints.len();
                observer.on_relax(id, substep);
            }
        }

        if let Some(composite) = self.composites.get_mut(id) {
            composite.constraints = constraints;
        }
        relaxed
    }

    /// Clamp every particle into the bounds. Idempotent.
    pub fn apply_bounds(&mut self) {
        let bounds = self.config.bounds;
        for composite in self.composites.iter_unordered_mut() {
            for p in composite.particles.iter_mut() {
                p.pos = bounds.clamp(p.pos);
            }
        }
    }

    /// Every particle position, composite by composite in registration order.
    pub fn positions(&self) -> Vec<Vec2<F>> {
        self.composites
            .iter()
            .flat_map(|(_, c)| c.particles.iter().map(|p| p.pos))
            .collect()
    }

    pub fn particle_count(&self) -> usize {
        self.composites.iter().map(|(_, c)| c.particle_count()).sum()
    }

    pub fn constraint_count(&self) -> usize {
        self.composites.iter().map(|(_, c)| c.constraint_count()).sum()
    }
}

impl<F: Float> Default for World<F> {
    fn default() -> Self {
        Self::new(SimConfig::new())
    }
}
