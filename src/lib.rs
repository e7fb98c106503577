//! Verlet particles and constraint relaxation for 2D ropes, cloth and soft bodies.
//!
//! `taut` integrates point masses with Verlet integration and keeps them in shape with distance, pin and
//! angle constraints that are relaxed one at a time over several sub-steps per frame. It is the classic
//! interactive rope/cloth demo engine, with picking and dragging built in.
//!
//! # Features
//!
//! - **Verlet integration**: implicit velocity, friction, ground friction, frame-rate-normalized gravity
//! - **Constraint relaxation**: distance, pin, angle; sequential (Gauss-Seidel) sweeps over sub-steps
//! - **Composites**: each object owns its particles and constraints; references are indices, not pointers
//! - **Cross-composite constraints**: tether a particle to one owned by another composite
//! - **Picking and dragging**: grab the nearest particle or pin under the pointer
//! - **Scenes**: ropes, tires, cloth, trees, spider webs and a crawling spider
//! - **Observable**: Monitor the frame pipeline via the `StepObserver` trait
//! - **`no_std` compatible**: Works in embedded and WASM environments
//!
//! # Example
//! ```
//! use taut::{rope, SimConfig, Vec2, World};
//!
//! let mut world: World<f32> = World::new(SimConfig::new());
//! let mut line = rope::line_segments(
//!     &[Vec2::new(20.0, 10.0), Vec2::new(40.0, 10.0), Vec2::new(60.0, 10.0)],
//!     0.5,
//! ).unwrap();
//! line.pin(0).unwrap();
//! let id = world.add_composite(line);
//!
//! for _ in 0..60 {
//!     world.update(1.0 / 60.0);
//! }
//! assert_eq!(world.composite(id).unwrap().particle(0).pos, Vec2::new(20.0, 10.0));
//! ```

#![no_std]

extern crate alloc;

pub mod float;
pub mod vec;
pub mod particle;
pub mod constraint;
pub mod composite;
pub mod behavior;
pub mod world;
pub mod pick;
pub mod observer;
pub mod config;
pub mod error;

pub mod rope;
pub mod tire;
pub mod cloth;
pub mod tree;
pub mod spider;

// Re-export primary API
pub use float::Float;
pub use vec::Vec2;
pub use particle::{Draggable, Particle};
pub use constraint::{
    AngleConstraint, Constraint, ConstraintKind, DistanceConstraint, ParticleAccess, ParticleRef, PinConstraint,
};
pub use composite::{Composite, CompositeId, ParticleHandle};
pub use behavior::Behavior;
pub use world::{Composites, World};
pub use pick::DragTarget;
pub use config::{Bounds, RelaxOrder, SimConfig};
pub use observer::{NoOpStepObserver, StepObserver};
pub use error::{Error, Result};
