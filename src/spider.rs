//! A spider web, and a spider that walks it by re-tethering its feet to web particles.
//!
//! The spider and the web are separate composites. Feet attach to the web with distance constraints owned by
//! the spider that reference web particles across composites.

use crate::behavior::Behavior;
use crate::composite::{Composite, CompositeId, ParticleHandle};
use crate::constraint::{Constraint, DistanceConstraint, ParticleRef};
use crate::error::{Error, Result};
use crate::float::Float;
use crate::vec::Vec2;
use crate::world::Composites;
use alloc::vec::Vec;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

const WEB_STIFFNESS: f32 = 0.6;
/// Rest lengths are shrunk to this fraction after building, so the web hangs taut between its pins.
const WEB_TENSION: f32 = 0.3;

/// Build a spiral web of `segments * depth` particles around `origin`, pinning every fourth particle of the
/// outer ring.
pub fn spiderweb<F: Float>(origin: Vec2<F>, radius: F, segments: usize, depth: usize) -> Result<Composite<F>> {
    if segments < 2 {
        return Err(Error::InsufficientSegments { min: 2, got: segments });
    }
    if depth == 0 {
        return Err(Error::InsufficientSegments { min: 1, got: depth });
    }
    let n = segments * depth;
    let f = |v: f32| F::from_f32(v);
    let stiffness = f(WEB_STIFFNESS);
    let stride = F::two() * F::pi() / f(segments as f32);
    let radius_stride = radius / f(n as f32);
    let mut web = Composite::named("spiderweb");

    for i in 0..n {
        let fi = f(i as f32);
        let theta = fi * stride + (fi * f(0.4)).cos() * f(0.05) + (fi * f(0.05)).cos() * f(0.2);
        let shrinking_radius = radius - radius_stride * fi + (fi * f(0.1)).cos() * f(20.0);
        let off_y = (theta * f(2.1)).cos() * (radius / f(depth as f32)) * f(0.2);
        web.add_particle(Vec2::new(
            origin.x + theta.cos() * shrinking_radius,
            origin.y + theta.sin() * shrinking_radius + off_y,
        ));
    }

    for i in (0..segments).step_by(4) {
        web.pin(i)?;
    }

    for i in 0..n - 1 {
        // spiral neighbour
        web.add_distance(i, i + 1, stiffness)?;
        // next ring inward
        let across = (i + segments).min(n - 1);
        web.add_distance(i, across, stiffness)?;
    }
    web.add_distance(0, segments - 1, stiffness)?;

    web.scale_distances(f(WEB_TENSION));
    Ok(web)
}

/// A built spider: the composite plus the indices of its eight feet.
pub struct Spider<F: Float> {
    pub composite: Composite<F>,
    pub feet: [usize; 8],
}

impl<F: Float> Spider<F> {
    /// Particle 0: thorax.
    pub const THORAX: usize = 0;
    /// Particle 1: head.
    pub const HEAD: usize = 1;
    /// Particle 2: abdomen.
    pub const ABDOMEN: usize = 2;

    /// Attach a [`Crawl`] behavior walking `web`, and return the composite ready to register.
    pub fn crawling_on(self, web: CompositeId, seed: u64) -> Composite<F> {
        let crawl = Crawl::new(web, self.feet, seed);
        self.composite.with_behavior(crawl)
    }
}

/// Build a spider centred on `origin`: body, and four pairs of four-segment legs with angle-held joints.
pub fn spider<F: Float>(origin: Vec2<F>) -> Result<Spider<F>> {
    let f = |v: f32| F::from_f32(v);
    let leg_seg_stiffness = f(0.99);
    let joint1_stiffness = f(1.0);
    let joint2_stiffness = f(0.4);
    let joint3_stiffness = f(0.9);
    let body_stiffness = f(1.0);
    let body_joint_stiffness = f(1.0);

    let mut s = Composite::named("spider");
    let thorax = s.add_particle(origin);
    let head = s.add_particle(origin + Vec2::new(f(0.0), f(-5.0)));
    let abdomen = s.add_particle(origin + Vec2::new(f(0.0), f(10.0)));

    s.add_distance(head, thorax, body_stiffness)?;
    s.add_distance(abdomen, thorax, body_stiffness)?;
    s.add_angle(abdomen, thorax, head, f(0.4))?;

    let mut feet = [0usize; 8];
    for i in 0..4 {
        let spread = f(i as f32 - 1.5);
        let len_coef = f(match i {
            1 | 2 => 0.7,
            3 => 0.9,
            _ => 1.0,
        });
        let thorax_pos = s.particle(thorax).pos;

        let hip_r = s.add_particle(thorax_pos + Vec2::new(f(3.0), spread * f(3.0)));
        let hip_l = s.add_particle(thorax_pos + Vec2::new(f(-3.0), spread * f(3.0)));
        s.add_distance(hip_r, thorax, leg_seg_stiffness)?;
        s.add_distance(hip_l, thorax, leg_seg_stiffness)?;

        // Each joint extends the previous one outward along a progressively steeper direction.
        let grow = |s: &mut Composite<F>, from: usize, dir: Vec2<F>, length: f32| {
            let pos = s.particle(from).pos + dir.normalize().scale(f(length) * len_coef);
            s.add_particle(pos)
        };

        let knee_r = grow(&mut s, hip_r, Vec2::new(f(20.0), spread * f(30.0)), 20.0);
        let knee_l = grow(&mut s, hip_l, Vec2::new(f(-20.0), spread * f(30.0)), 20.0);
        s.add_distance(hip_r, knee_r, leg_seg_stiffness)?;
        s.add_distance(hip_l, knee_l, leg_seg_stiffness)?;

        let ankle_r = grow(&mut s, knee_r, Vec2::new(f(20.0), spread * f(50.0)), 20.0);
        let ankle_l = grow(&mut s, knee_l, Vec2::new(f(-20.0), spread * f(50.0)), 20.0);
        s.add_distance(knee_r, ankle_r, leg_seg_stiffness)?;
        s.add_distance(knee_l, ankle_l, leg_seg_stiffness)?;

        let foot_r = grow(&mut s, ankle_r, Vec2::new(f(20.0), spread * f(100.0)), 12.0);
        let foot_l = grow(&mut s, ankle_l, Vec2::new(f(-20.0), spread * f(100.0)), 12.0);
        s.add_distance(ankle_r, foot_r, leg_seg_stiffness)?;
        s.add_distance(ankle_l, foot_l, leg_seg_stiffness)?;
        feet[2 * i] = foot_r;
        feet[2 * i + 1] = foot_l;

        s.add_angle(knee_r, ankle_r, foot_r, joint3_stiffness)?;
        s.add_angle(knee_l, ankle_l, foot_l, joint3_stiffness)?;
        s.add_angle(hip_r, knee_r, ankle_r, joint2_stiffness)?;
        s.add_angle(hip_l, knee_l, ankle_l, joint2_stiffness)?;
        s.add_angle(thorax, hip_r, knee_r, joint1_stiffness)?;
        s.add_angle(thorax, hip_l, knee_l, joint1_stiffness)?;
        s.add_angle(head, thorax, hip_r, body_joint_stiffness)?;
        s.add_angle(head, thorax, hip_l, body_joint_stiffness)?;
    }

    Ok(Spider { composite: s, feet })
}

/// Walks a spider over a web: on average every fourth frame, one foot lets go and re-attaches to a random
/// web particle within reach on that foot's side of the body.
pub struct Crawl {
    web: CompositeId,
    feet: [usize; 8],
    next_leg: usize,
    rng: SmallRng,
    /// Web particles closer than this to the thorax are not stepped on.
    pub min_step_radius: f32,
    /// Web particles farther than this from the thorax are out of reach.
    pub step_radius: f32,
}

impl Crawl {
    pub fn new(web: CompositeId, feet: [usize; 8], seed: u64) -> Self {
        Crawl {
            web,
            feet,
            next_leg: 0,
            rng: SmallRng::seed_from_u64(seed),
            min_step_radius: 35.0,
            step_radius: 100.0,
        }
    }

    /// Release foot `leg` (0..8) and, if any web particle qualifies, tether it there at zero length.
    ///
    /// Returns the web particle the foot now holds.
    pub fn crawl<F: Float>(&mut self, this: CompositeId, leg: usize, composites: &mut Composites<F>) -> Option<usize> {
        let foot = ParticleRef::Local(*self.feet.get(leg)?);
        let web_id = self.web;
        let candidates = self.reachable(this, leg, composites)?;

        let spider = composites.get_mut(this)?;
        if let Some(i) = spider.constraints().iter().position(|c| is_tether(c, foot, web_id)) {
            spider.remove_constraint(i);
        }

        let &target = candidates.choose(&mut self.rng)?;
        let tether = DistanceConstraint::new(foot, ParticleHandle::new(web_id, target), F::zero(), F::one());
        spider.add_constraint(tether.into()).ok()?;
        Some(target)
    }

    /// Web particles in reach of `leg` that no foot currently holds.
    fn reachable<F: Float>(&self, this: CompositeId, leg: usize, composites: &Composites<F>) -> Option<Vec<usize>> {
        let spider = composites.get(this)?;
        let web = composites.get(self.web)?;
        let thorax = spider.particle(Spider::<F>::THORAX).pos;
        let head = spider.particle(Spider::<F>::HEAD).pos;

        let theta = thorax.angle_between(thorax + Vec2::new(F::one(), F::zero()), head);
        let half_turn = F::pi() / F::two();
        let forward = Vec2::new(theta.cos(), theta.sin());
        let side = Vec2::new((theta + half_turn).cos(), (theta + half_turn).sin());
        let front_flag = if leg < 4 { F::one() } else { -F::one() };
        let side_flag = if leg % 2 == 0 { F::one() } else { F::zero() };

        let min_sq = F::from_f32(self.min_step_radius * self.min_step_radius);
        let max_sq = F::from_f32(self.step_radius * self.step_radius);

        let held = |index: usize| {
            spider.constraints().iter().any(|c| {
                self.feet
                    .iter()
                    .any(|&foot| is_tether(c, ParticleRef::Local(foot), self.web) && tether_target(c) == Some(index))
            })
        };

        let candidates = web
            .particles()
            .iter()
            .enumerate()
            .filter(|(_, p)| {
                let rel = p.pos - thorax;
                rel.dot(forward) * front_flag >= F::zero() && rel.dot(side) * side_flag >= F::zero()
            })
            .filter(|(_, p)| {
                let d2 = p.pos.distance_sq(thorax);
                d2 >= min_sq && d2 <= max_sq
            })
            .map(|(i, _)| i)
            .filter(|&i| !held(i))
            .collect();
        Some(candidates)
    }
}

fn is_tether<F: Float>(c: &Constraint<F>, foot: ParticleRef, web: CompositeId) -> bool {
    c.as_distance().is_some_and(|d| d.a == foot && d.b.targets(web))
}

fn tether_target<F: Float>(c: &Constraint<F>) -> Option<usize> {
    match c.as_distance()?.b {
        ParticleRef::Foreign(handle) => Some(handle.index),
        ParticleRef::Local(_) => None,
    }
}

impl<F: Float> Behavior<F> for Crawl {
    fn update(&mut self, this: CompositeId, _dt: F, composites: &mut Composites<F>) {
        if self.rng.gen_range(0..4) == 0 {
            let leg = (self.next_leg * 3) % 8;
            self.next_leg += 1;
            self.crawl(this, leg, composites);
        }
    }
}
