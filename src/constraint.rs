//! Geometric constraints relaxed between integration steps: distance, pin, angle.
//!
//! Constraints never own particles. They name them through [`ParticleRef`], which is either an index into the
//! owning composite or a [`ParticleHandle`] into another composite, and resolve those names through a
//! [`ParticleAccess`] at every relax call.

use crate::composite::{CompositeId, ParticleHandle};
use crate::float::Float;
use crate::particle::{Draggable, Particle};
use crate::vec::Vec2;

/// Squared separation below which a distance constraint has no usable direction.
const MIN_DISTANCE_SQ: f32 = 1e-10;

/// A constraint's non-owning reference to a particle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ParticleRef {
    /// Index into the particles of the composite that owns the constraint.
    Local(usize),
    /// A particle owned by another composite.
    Foreign(ParticleHandle),
}

impl ParticleRef {
    pub fn local_index(self) -> Option<usize> {
        match self {
            ParticleRef::Local(index) => Some(index),
            ParticleRef::Foreign(_) => None,
        }
    }

    /// Whether this reference points into composite `id`.
    pub fn targets(self, id: CompositeId) -> bool {
        matches!(self, ParticleRef::Foreign(handle) if handle.composite == id)
    }
}

impl From<usize> for ParticleRef {
    fn from(index: usize) -> Self {
        ParticleRef::Local(index)
    }
}

impl From<ParticleHandle> for ParticleRef {
    fn from(handle: ParticleHandle) -> Self {
        ParticleRef::Foreign(handle)
    }
}

/// Resolves particle references to positions while a constraint relaxes.
///
/// Unresolvable references return `None` and the constraint skips its correction.
pub trait ParticleAccess<F: Float> {
    fn position_of(&self, r: ParticleRef) -> Option<Vec2<F>>;
    fn set_position_of(&mut self, r: ParticleRef, pos: Vec2<F>);
}

/// A bare particle slice resolves local references only.
impl<F: Float> ParticleAccess<F> for [Particle<F>] {
    fn position_of(&self, r: ParticleRef) -> Option<Vec2<F>> {
        r.local_index().and_then(|i| self.get(i)).map(|p| p.pos)
    }

    fn set_position_of(&mut self, r: ParticleRef, pos: Vec2<F>) {
        if let Some(p) = r.local_index().and_then(|i| self.get_mut(i)) {
            p.pos = pos;
        }
    }
}

/// Discriminant of a [`Constraint`], for renderers and filters.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    Distance,
    Pin,
    Angle,
}

/// A constraint that can be relaxed against a set of particles.
#[derive(Clone, Debug, PartialEq)]
pub enum Constraint<F: Float> {
    Distance(DistanceConstraint<F>),
    Pin(PinConstraint<F>),
    Angle(AngleConstraint<F>),
}

/// Keeps two particles `distance` apart.
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceConstraint<F: Float> {
    pub a: ParticleRef,
    pub b: ParticleRef,
    pub distance: F,
    pub stiffness: F,
}

/// Holds a particle at `target`. Dragging a pin moves the target.
#[derive(Clone, Debug, PartialEq)]
pub struct PinConstraint<F: Float> {
    pub particle: ParticleRef,
    pub target: Vec2<F>,
}

/// Keeps the signed angle `a -> b -> c` (pivot `b`) at `angle`.
#[derive(Clone, Debug, PartialEq)]
pub struct AngleConstraint<F: Float> {
    pub a: ParticleRef,
    pub b: ParticleRef,
    pub c: ParticleRef,
    pub angle: F,
    pub stiffness: F,
}

impl<F: Float> Constraint<F> {
    /// Nudge the referenced particles toward satisfying the constraint.
    ///
    /// `step` is the fraction of the correction applied per call, `1 / substeps` inside the engine.
    /// A step of zero does nothing.
    pub fn relax<A>(&self, step: F, particles: &mut A)
    where
        A: ParticleAccess<F> + ?Sized,
    {
        debug_assert!(!(step < F::zero()), "relax step must not be negative");
        if !(step > F::zero()) {
            return;
        }
        match self {
            Constraint::Distance(c) => c.relax(step, particles),
            Constraint::Pin(c) => c.relax(particles),
            Constraint::Angle(c) => c.relax(step, particles),
        }
    }

    pub fn kind(&self) -> ConstraintKind {
        match self {
            Constraint::Distance(_) => ConstraintKind::Distance,
            Constraint::Pin(_) => ConstraintKind::Pin,
            Constraint::Angle(_) => ConstraintKind::Angle,
        }
    }

    /// The particles this constraint reads and writes, in declaration order.
    pub fn refs(&self) -> impl Iterator<Item = ParticleRef> {
        let refs = match self {
            Constraint::Distance(c) => [Some(c.a), Some(c.b), None],
            Constraint::Pin(c) => [Some(c.particle), None, None],
            Constraint::Angle(c) => [Some(c.a), Some(c.b), Some(c.c)],
        };
        refs.into_iter().flatten()
    }

    /// Whether any reference points into composite `id`.
    pub fn references_composite(&self, id: CompositeId) -> bool {
        self.refs().any(|r| r.targets(id))
    }

    pub fn as_pin(&self) -> Option<&PinConstraint<F>> {
        match self {
            Constraint::Pin(pin) => Some(pin),
            _ => None,
        }
    }

    pub fn as_pin_mut(&mut self) -> Option<&mut PinConstraint<F>> {
        match self {
            Constraint::Pin(pin) => Some(pin),
            _ => None,
        }
    }

    pub fn as_distance(&self) -> Option<&DistanceConstraint<F>> {
        match self {
            Constraint::Distance(c) => Some(c),
            _ => None,
        }
    }
}

impl<F: Float> From<DistanceConstraint<F>> for Constraint<F> {
    fn from(c: DistanceConstraint<F>) -> Self {
        Constraint::Distance(c)
    }
}

impl<F: Float> From<PinConstraint<F>> for Constraint<F> {
    fn from(c: PinConstraint<F>) -> Self {
        Constraint::Pin(c)
    }
}

impl<F: Float> From<AngleConstraint<F>> for Constraint<F> {
    fn from(c: AngleConstraint<F>) -> Self {
        Constraint::Angle(c)
    }
}

impl<F: Float> DistanceConstraint<F> {
    pub fn new(a: impl Into<ParticleRef>, b: impl Into<ParticleRef>, distance: F, stiffness: F) -> Self {
        DistanceConstraint { a: a.into(), b: b.into(), distance, stiffness }
    }

    /// Rest distance taken from the current separation of `a` and `b`.
    ///
    /// Returns `None` if either reference does not resolve.
    pub fn from_particles<A>(a: impl Into<ParticleRef>, b: impl Into<ParticleRef>, particles: &A, stiffness: F) -> Option<Self>
    where
        A: ParticleAccess<F> + ?Sized,
    {
        let (a, b) = (a.into(), b.into());
        let distance = particles.position_of(a)?.distance(particles.position_of(b)?);
        Some(DistanceConstraint { a, b, distance, stiffness })
    }

    /// Moves `a` and `b` symmetrically along their axis by an amount proportional to the squared-length error.
    pub fn relax<A>(&self, step: F, particles: &mut A)
    where
        A: ParticleAccess<F> + ?Sized,
    {
        let (Some(a), Some(b)) = (particles.position_of(self.a), particles.position_of(self.b)) else {
            return;
        };
        let normal = a - b;
        let m = normal.length_sq();
        if !(m >= F::from_f32(MIN_DISTANCE_SQ)) {
            return;
        }
        let k = ((self.distance * self.distance - m) / m) * self.stiffness * step;
        let correction = normal.scale(k);
        particles.set_position_of(self.a, a + correction);
        particles.set_position_of(self.b, b - correction);
    }

    /// Current signed error `|a - b| - distance`, if both ends resolve.
    pub fn error<A>(&self, particles: &A) -> Option<F>
    where
        A: ParticleAccess<F> + ?Sized,
    {
        let a = particles.position_of(self.a)?;
        let b = particles.position_of(self.b)?;
        Some(a.distance(b) - self.distance)
    }
}

impl<F: Float> PinConstraint<F> {
    pub fn new(particle: impl Into<ParticleRef>, target: Vec2<F>) -> Self {
        PinConstraint { particle: particle.into(), target }
    }

    pub fn relax<A>(&self, particles: &mut A)
    where
        A: ParticleAccess<F> + ?Sized,
    {
        particles.set_position_of(self.particle, self.target);
    }
}

impl<F: Float> Draggable<F> for PinConstraint<F> {
    fn position(&self) -> Vec2<F> {
        self.target
    }

    fn set_position(&mut self, pos: Vec2<F>) {
        self.target = pos;
    }
}

impl<F: Float> AngleConstraint<F> {
    pub fn new(
        a: impl Into<ParticleRef>,
        b: impl Into<ParticleRef>,
        c: impl Into<ParticleRef>,
        angle: F,
        stiffness: F,
    ) -> Self {
        AngleConstraint { a: a.into(), b: b.into(), c: c.into(), angle, stiffness }
    }

    /// Target angle taken from the current configuration of `a`, `b`, `c`.
    pub fn from_particles<A>(
        a: impl Into<ParticleRef>,
        b: impl Into<ParticleRef>,
        c: impl Into<ParticleRef>,
        particles: &A,
        stiffness: F,
    ) -> Option<Self>
    where
        A: ParticleAccess<F> + ?Sized,
    {
        let (a, b, c) = (a.into(), b.into(), c.into());
        let angle = particles
            .position_of(b)?
            .angle_between(particles.position_of(a)?, particles.position_of(c)?);
        Some(AngleConstraint { a, b, c, angle, stiffness })
    }

    /// Angular error scaled by `step * stiffness`, wrapped onto the short path.
    pub fn correction<A>(&self, step: F, particles: &A) -> Option<F>
    where
        A: ParticleAccess<F> + ?Sized,
    {
        let a = particles.position_of(self.a)?;
        let b = particles.position_of(self.b)?;
        let c = particles.position_of(self.c)?;
        let diff = (b.angle_between(a, c) - self.angle).wrap_angle();
        Some(diff * step * self.stiffness)
    }

    /// Rotates the arms around the pivot, then the pivot around each updated arm, strictly in that order.
    pub fn relax<A>(&self, step: F, particles: &mut A)
    where
        A: ParticleAccess<F> + ?Sized,
    {
        let Some(diff) = self.correction(step, particles) else {
            return;
        };
        let (Some(mut a), Some(mut b), Some(mut c)) = (
            particles.position_of(self.a),
            particles.position_of(self.b),
            particles.position_of(self.c),
        ) else {
            return;
        };

        a = a.rotate(b, diff);
        c = c.rotate(b, -diff);
        b = b.rotate(a, diff);
        b = b.rotate(c, -diff);

        particles.set_position_of(self.a, a);
        particles.set_position_of(self.c, c);
        particles.set_position_of(self.b, b);
    }
}
