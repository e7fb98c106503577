use rand::rngs::SmallRng;
use rand::SeedableRng;
use taut::cloth::{self, ClothConfig};
use taut::spider::{self, Spider};
use taut::tree::{self, TreeConfig};
use taut::{rope, tire, ConstraintKind, Error, ParticleRef, SimConfig, Vec2, World};

const DT: f32 = 1.0 / 60.0;

fn run(world: &mut World<f32>, frames: usize) {
    for _ in 0..frames {
        world.update(DT);
    }
}

#[test]
fn straight_rope_has_equal_links() {
    let rope = rope::rope(Vec2::new(100.0f32, 50.0), Vec2::new(200.0, 50.0), 10, 0.9).unwrap();
    assert_eq!(rope.particle_count(), 11);
    assert_eq!(rope.constraint_count(), 10);
    for c in rope.constraints() {
        assert!((c.as_distance().unwrap().distance - 10.0).abs() < 1e-4);
    }
    assert!(rope::rope(Vec2::new(0.0f32, 0.0), Vec2::new(1.0, 0.0), 0, 1.0).is_err());
}

#[test]
fn rope_pinned_at_both_ends_sags() {
    let mut world: World<f32> = World::default();
    let vertices: Vec<_> = (0..5).map(|i| Vec2::new(300.0 + 50.0 * i as f32, 100.0)).collect();
    let mut line = rope::line_segments(&vertices, 1.0).unwrap();
    line.pin(0).unwrap();
    line.pin(4).unwrap();
    let id = world.add_composite(line);

    run(&mut world, 60);
    let c = world.composite(id).unwrap();
    assert_eq!(c.particle(0).pos, Vec2::new(300.0, 100.0));
    assert_eq!(c.particle(4).pos, Vec2::new(500.0, 100.0));
    assert!(c.particle(2).pos.y > 100.5, "middle y = {}", c.particle(2).pos.y);
}

#[test]
fn single_point_falls_to_floor() {
    let mut world: World<f32> = World::default();
    let id = world.add_composite(rope::point(Vec2::new(400.0, 10.0)));
    run(&mut world, 600);
    assert_eq!(world.composite(id).unwrap().particle(0).pos.y, 499.0);
}

#[test]
fn tire_lands_in_one_piece() {
    let mut world: World<f32> = World::default();
    let id = world.add_composite(tire::tire(Vec2::new(200.0, 50.0), 50.0, 30, 0.3, 0.9).unwrap());
    run(&mut world, 300);

    let c = world.composite(id).unwrap();
    assert!(c.positions().iter().all(|p| p.is_finite() && p.y <= 499.0));
    let center = c.particle(30).pos;
    assert!(center.y > 380.0, "center y = {}", center.y);
}

fn cloth_config() -> ClothConfig<f32> {
    ClothConfig { width: 200.0, height: 200.0, segments: 10, pin_every: 2, stiffness: 1.0 }
}

#[test]
fn cloth_hangs_from_pinned_columns() {
    let config = cloth_config();
    let c = cloth::cloth(Vec2::new(400.0, 150.0), &config).unwrap();
    let pinned: Vec<Vec2<f32>> = (0..10).step_by(2).map(|x| c.particle(x).pos).collect();
    let bottom_before = c.particle(config.index(5, 9)).pos.y;

    let mut world: World<f32> = World::default();
    let id = world.add_composite(c);
    run(&mut world, 60);

    let c = world.composite(id).unwrap();
    for (x, pos) in (0..10).step_by(2).zip(&pinned) {
        assert_eq!(c.particle(x).pos, *pos);
    }
    assert!(c.particle(config.index(5, 9)).pos.y > bottom_before);
    assert!(c.positions().iter().all(|p| p.is_finite()));
}

#[test]
fn torn_cloth_keeps_running() {
    let config = cloth_config();
    let mut world: World<f32> = World::default();
    let id = world.add_composite(cloth::cloth(Vec2::new(400.0, 150.0), &config).unwrap());
    run(&mut world, 10);

    let c = world.composite_mut(id).unwrap();
    let before = c.constraint_count();
    let removed = cloth::tear_at(c, &config, 5, 5);
    assert_eq!(removed, 4);
    assert_eq!(c.constraint_count(), before - 4);

    run(&mut world, 60);
    let c = world.composite(id).unwrap();
    assert!(c.positions().iter().all(|p| p.is_finite()));
}

#[test]
fn tree_stays_rooted() {
    let mut rng = SmallRng::seed_from_u64(3);
    let tree = tree::tree(Vec2::new(400.0, 480.0), &TreeConfig::default(), &mut rng).unwrap();
    assert_eq!(tree.leaves.len(), 32);
    // Noise shakes every particle, pinned ones included; the pins keep the unshaken anchors.
    let anchor = |i: usize| tree.composite.constraint(i).unwrap().as_pin().unwrap().target;
    let (base, root) = (anchor(0), anchor(1));

    let mut world: World<f32> = World::default();
    let id = world.add_composite(tree.composite);
    run(&mut world, 120);

    let c = world.composite(id).unwrap();
    // The trunk angle relaxes after both pins, so the anchors end each frame slightly off target.
    assert!(c.particle(0).pos.distance(base) < 2.0, "base at {:?}", c.particle(0).pos);
    assert!(c.particle(1).pos.distance(root) < 2.0, "root at {:?}", c.particle(1).pos);
    // The trunk stands above the base.
    assert!(c.particle(2).pos.y < base.y);
    assert!(c.positions().iter().all(|p| p.is_finite()));
}

#[test]
fn web_is_pre_tensioned() {
    let web = spider::spiderweb(Vec2::new(400.0f32, 250.0), 250.0, 20, 7).unwrap();
    assert_eq!(web.particle_count(), 140);
    let count = |kind: ConstraintKind| web.constraints().iter().filter(|c| c.kind() == kind).count();
    assert_eq!(count(ConstraintKind::Pin), 5);
    // Two per particle except the last, plus the closing link.
    assert_eq!(count(ConstraintKind::Distance), 2 * 139 + 1);

    let first = web.constraints().iter().find_map(|c| c.as_distance()).unwrap();
    let actual = web.particle(0).pos.distance(web.particle(1).pos);
    assert!((first.distance - actual * 0.3).abs() < 1e-3);
}

#[test]
fn spider_has_eight_distinct_feet() {
    let spider = spider::spider(Vec2::new(400.0f32, 250.0)).unwrap();
    let mut feet = spider.feet.to_vec();
    feet.sort_unstable();
    feet.dedup();
    assert_eq!(feet.len(), 8);
    assert!(feet.iter().all(|&f| f < spider.composite.particle_count()));
    assert_eq!(spider.composite.particle(Spider::<f32>::THORAX).pos, Vec2::new(400.0, 250.0));
}

#[test]
fn spider_crawls_onto_web() {
    let mut world: World<f32> = World::new(SimConfig::new());
    let web = world.add_composite(spider::spiderweb(Vec2::new(400.0, 250.0), 250.0, 20, 7).unwrap());
    let spider = spider::spider(Vec2::new(400.0, 250.0)).unwrap();
    let feet = spider.feet;
    let id = world.add_composite(spider.crawling_on(web, 42));

    run(&mut world, 200);

    let c = world.composite(id).unwrap();
    let tethers: Vec<_> = c
        .constraints()
        .iter()
        .filter_map(|c| c.as_distance())
        .filter(|d| matches!(d.b, ParticleRef::Foreign(_)))
        .collect();
    assert!(!tethers.is_empty());
    assert!(tethers.len() <= 8);
    for t in &tethers {
        assert!(t.b.targets(web));
        assert!(feet.iter().any(|&f| t.a == ParticleRef::Local(f)));
        assert_eq!(t.distance, 0.0);
    }
    assert!(world.positions().iter().all(|p| p.is_finite()));
}

#[test]
fn spider_survives_web_removal() {
    let mut world: World<f32> = World::new(SimConfig::new());
    let web = world.add_composite(spider::spiderweb(Vec2::new(400.0, 250.0), 250.0, 20, 7).unwrap());
    let id = world.add_composite(spider::spider(Vec2::new(400.0, 250.0)).unwrap().crawling_on(web, 42));
    run(&mut world, 100);

    world.remove_composite(web);
    let c = world.composite(id).unwrap();
    assert!(c.constraints().iter().all(|c| !c.references_composite(web)));

    // With the web gone the crawl finds nothing to hold.
    run(&mut world, 100);
    let c = world.composite(id).unwrap();
    assert!(c.constraints().iter().all(|c| !c.references_composite(web)));
}

#[test]
fn web_reports_the_short_dimension() {
    assert_eq!(
        spider::spiderweb(Vec2::new(0.0f32, 0.0), 100.0, 1, 7).err(),
        Some(Error::InsufficientSegments { min: 2, got: 1 })
    );
    assert_eq!(
        spider::spiderweb(Vec2::new(0.0f32, 0.0), 100.0, 20, 0).err(),
        Some(Error::InsufficientSegments { min: 1, got: 0 })
    );
}
