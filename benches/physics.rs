//! Benchmarks for taut physics simulation.

use criterion::{criterion_group, criterion_main, Criterion};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use taut::cloth::{self, ClothConfig};
use taut::tree::{self, TreeConfig};
use taut::{rope, spider, tire, RelaxOrder, SimConfig, Vec2, World};

fn bench_rope_simulation(c: &mut Criterion) {
    c.bench_function("rope_50_segments_60_frames", |b| {
        b.iter(|| {
            let mut world: World<f32> = World::default();
            let mut line = rope::rope(Vec2::new(100.0, 50.0), Vec2::new(600.0, 50.0), 50, 0.9).unwrap();
            line.pin(0).unwrap();
            world.add_composite(line);
            for _ in 0..60 {
                world.update(1.0 / 60.0);
            }
            world.positions()
        });
    });
}

fn bench_cloth_simulation(c: &mut Criterion) {
    c.bench_function("cloth_20x20_60_frames", |b| {
        b.iter(|| {
            let config = ClothConfig { width: 250.0, height: 250.0, segments: 20, pin_every: 4, stiffness: 0.6 };
            let mut world: World<f32> = World::default();
            world.add_composite(cloth::cloth(Vec2::new(400.0, 166.0), &config).unwrap());
            for _ in 0..60 {
                world.update(1.0 / 60.0);
            }
            world.positions()
        });
    });
}

fn bench_shapes_scene(c: &mut Criterion) {
    c.bench_function("tires_and_trees_60_frames", |b| {
        b.iter(|| {
            let mut world: World<f32> = World::default();
            let mut rng = SmallRng::seed_from_u64(1);
            world.add_composite(tire::tire(Vec2::new(200.0, 50.0), 50.0, 30, 0.3, 0.9).unwrap());
            world.add_composite(tire::tire(Vec2::new(400.0, 50.0), 70.0, 7, 0.1, 0.2).unwrap());
            world.add_composite(tree::tree(Vec2::new(600.0, 480.0), &TreeConfig::default(), &mut rng).unwrap().composite);
            for _ in 0..60 {
                world.update(1.0 / 60.0);
            }
            world.positions()
        });
    });
}

fn bench_spider_scene(c: &mut Criterion) {
    for (name, order) in [
        ("spider_web_60_frames_per_composite", RelaxOrder::PerComposite),
        ("spider_web_60_frames_interleaved", RelaxOrder::Interleaved),
    ] {
        c.bench_function(name, |b| {
            b.iter(|| {
                let mut world: World<f32> = World::new(SimConfig::new().with_relax_order(order));
                let web = world.add_composite(spider::spiderweb(Vec2::new(400.0, 250.0), 250.0, 20, 7).unwrap());
                world.add_composite(spider::spider(Vec2::new(400.0, 250.0)).unwrap().crawling_on(web, 5));
                for _ in 0..60 {
                    world.update(1.0 / 60.0);
                }
                world.positions()
            });
        });
    }
}

criterion_group!(
    benches,
    bench_rope_simulation,
    bench_cloth_simulation,
    bench_shapes_scene,
    bench_spider_scene
);
criterion_main!(benches);
