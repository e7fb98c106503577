use rand::rngs::SmallRng;
use rand::SeedableRng;
use taut::cloth::{self, ClothConfig};
use taut::spider;
use taut::tree::{self, TreeConfig};
use taut::{rope, tire, Composite, CompositeId, ParticleRef, SimConfig, Vec2, World};
use wasm_bindgen::prelude::*;

const SIM_W: f32 = 800.0;
const SIM_H: f32 = 500.0;

/// Route `log` output to the browser console and panics to `console.error`.
#[wasm_bindgen]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    // A second call finds the logger already installed.
    let _ = console_log::init_with_level(log::Level::Debug);
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Scene {
    Shapes,
    Trees,
    Cloth,
    Spider,
}

impl Scene {
    const ALL: [Scene; 4] = [Scene::Shapes, Scene::Trees, Scene::Cloth, Scene::Spider];

    fn index(self) -> usize {
        Scene::ALL.iter().position(|&s| s == self).unwrap_or(0)
    }

    fn name(self) -> &'static str {
        match self {
            Scene::Shapes => "shapes",
            Scene::Trees => "trees",
            Scene::Cloth => "cloth",
            Scene::Spider => "spider",
        }
    }
}

struct Tearable {
    id: CompositeId,
    config: ClothConfig<f32>,
}

fn base_config() -> SimConfig<f32> {
    SimConfig::new().with_bounds(SIM_W, SIM_H)
}

fn shapes() -> taut::Result<World<f32>> {
    let mut world = World::new(base_config().with_friction(1.0));

    let vertices = [
        Vec2::new(20.0, 10.0),
        Vec2::new(40.0, 10.0),
        Vec2::new(60.0, 10.0),
        Vec2::new(80.0, 10.0),
        Vec2::new(100.0, 10.0),
    ];
    let mut segment = rope::line_segments(&vertices, 0.02)?;
    segment.pin(0)?;
    segment.pin(4)?;
    world.add_composite(segment);

    world.add_composite(tire::tire(Vec2::new(200.0, 50.0), 50.0, 30, 0.3, 0.9)?);
    world.add_composite(tire::tire(Vec2::new(400.0, 50.0), 70.0, 7, 0.1, 0.2)?);
    world.add_composite(tire::tire(Vec2::new(600.0, 50.0), 70.0, 3, 1.0, 1.0)?);
    Ok(world)
}

fn trees(rng: &mut SmallRng) -> taut::Result<World<f32>> {
    let mut world = World::new(base_config().with_gravity(Vec2::zero()).with_friction(0.98));
    let config = TreeConfig::default();
    for x in [SIM_W / 4.0, SIM_W - SIM_W / 4.0] {
        let tree = tree::tree(Vec2::new(x, SIM_H - 120.0), &config, rng)?;
        world.add_composite(tree.composite);
    }
    Ok(world)
}

fn cloth_scene() -> taut::Result<(World<f32>, Tearable)> {
    let mut world = World::new(base_config().with_friction(1.0));
    let size = SIM_W.min(SIM_H) * 0.5;
    let config = ClothConfig { width: size, height: size, segments: 20, pin_every: 6, stiffness: 0.9 };
    let id = world.add_composite(cloth::cloth(Vec2::new(SIM_W / 2.0, SIM_H / 3.0), &config)?);
    Ok((world, Tearable { id, config }))
}

fn spider_scene(seed: u64) -> taut::Result<World<f32>> {
    let mut world = World::new(base_config());
    let web = spider::spiderweb(Vec2::new(SIM_W / 2.0, SIM_H / 2.0), SIM_W.min(SIM_H) / 2.0, 20, 7)?;
    let web = world.add_composite(web);
    let spider = spider::spider(Vec2::new(SIM_W / 2.0, -300.0))?;
    world.add_composite(spider.crawling_on(web, seed));
    Ok(world)
}

/// Flatten points into `[x0, y0, x1, y1, ...]`.
fn flatten(points: impl IntoIterator<Item = Vec2<f32>>) -> Vec<f32> {
    points.into_iter().flat_map(|p| [p.x, p.y]).collect()
}

fn resolve(world: &World<f32>, owner: &Composite<f32>, r: ParticleRef) -> Option<Vec2<f32>> {
    match r {
        ParticleRef::Local(index) => owner.particles().get(index).map(|p| p.pos),
        ParticleRef::Foreign(handle) => world.particle(handle).map(|p| p.pos),
    }
}

/// The four demo scenes behind one world, switchable at runtime.
#[wasm_bindgen]
pub struct Demo {
    world: World<f32>,
    scene: Scene,
    rng: SmallRng,
    seed: u64,
    cloth: Option<Tearable>,
}

impl Demo {
    fn load(&mut self, scene: Scene) {
        self.cloth = None;
        let built = match scene {
            Scene::Shapes => shapes(),
            Scene::Trees => trees(&mut self.rng),
            Scene::Cloth => cloth_scene().map(|(world, tearable)| {
                self.cloth = Some(tearable);
                world
            }),
            Scene::Spider => spider_scene(self.seed),
        };
        self.world = match built {
            Ok(world) => world,
            Err(err) => {
                log::error!("failed to build scene '{}': {}", scene.name(), err);
                World::new(base_config())
            }
        };
        self.scene = scene;
        log::info!(
            "scene '{}': {} particles, {} constraints",
            scene.name(),
            self.world.particle_count(),
            self.world.constraint_count()
        );
    }
}

#[wasm_bindgen]
impl Demo {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> Self {
        let mut demo = Demo {
            world: World::default(),
            scene: Scene::Spider,
            rng: SmallRng::seed_from_u64(seed),
            seed,
            cloth: None,
        };
        demo.load(Scene::Spider);
        demo
    }

    /// Step to the next (`+1`) or previous (`-1`) scene, or rebuild the current one (`0`).
    pub fn switch_scene(&mut self, count: i32) {
        let n = Scene::ALL.len() as i32;
        let index = (self.scene.index() as i32 + count.clamp(-1, 1)).rem_euclid(n);
        self.load(Scene::ALL[index as usize]);
    }

    pub fn reset(&mut self) {
        self.switch_scene(0);
    }

    pub fn scene_index(&self) -> usize {
        self.scene.index()
    }

    pub fn scene_name(&self) -> String {
        self.scene.name().to_string()
    }

    pub fn update(&mut self, dt: f32) {
        self.world.update(dt);
    }

    /// Press: returns whether something was grabbed.
    pub fn pointer_down(&mut self, x: f32, y: f32) -> bool {
        self.world.begin_drag(Vec2::new(x, y)).is_some()
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.world.set_pointer(Vec2::new(x, y));
    }

    pub fn pointer_up(&mut self) {
        self.world.end_drag();
    }

    /// Cut the cloth at the particle nearest `(x, y)`. Other scenes ignore this.
    pub fn tear(&mut self, x: f32, y: f32) -> usize {
        let Some(tearable) = &self.cloth else {
            return 0;
        };
        let radius = self.world.config().selection_radius;
        let Some(target) = self.world.nearest_entity(Vec2::new(x, y), radius) else {
            return 0;
        };
        if target.composite() != tearable.id {
            return 0;
        }
        let index = target.handle().index;
        let segments = tearable.config.segments;
        match self.world.composite_mut(tearable.id) {
            Some(c) => cloth::tear_at(c, &tearable.config, index % segments, index / segments),
            None => 0,
        }
    }

    /// Returns flat [x0, y0, x1, y1, ...] positions of every particle
    pub fn positions(&self) -> Vec<f32> {
        flatten(self.world.positions())
    }

    /// Returns flat [ax, ay, bx, by, ...] endpoints of every distance constraint
    pub fn segments(&self) -> Vec<f32> {
        let mut out = Vec::new();
        for (_, composite) in self.world.composites().iter() {
            for d in composite.constraints().iter().filter_map(|c| c.as_distance()) {
                if let (Some(a), Some(b)) = (resolve(&self.world, composite, d.a), resolve(&self.world, composite, d.b)) {
                    out.extend_from_slice(&[a.x, a.y, b.x, b.y]);
                }
            }
        }
        out
    }

    /// Returns flat [x0, y0, ...] pin targets
    pub fn pins(&self) -> Vec<f32> {
        flatten(
            self.world
                .composites()
                .iter()
                .flat_map(|(_, c)| c.constraints().iter().filter_map(|c| c.as_pin()).map(|pin| pin.target)),
        )
    }

    /// Returns [x, y] of the entity under the pointer or being dragged, or an empty array.
    pub fn highlighted(&self) -> Vec<f32> {
        self.world
            .highlighted()
            .and_then(|target| self.world.drag_position(target))
            .map(|p| vec![p.x, p.y])
            .unwrap_or_default()
    }

    pub fn particle_count(&self) -> usize {
        self.world.particle_count()
    }

    pub fn width(&self) -> f32 {
        self.world.config().bounds.width
    }

    pub fn height(&self) -> f32 {
        self.world.config().bounds.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_scene_builds() {
        let mut demo = Demo::new(1);
        assert_eq!(demo.scene_name(), "spider");
        for _ in 0..Scene::ALL.len() {
            assert!(demo.particle_count() > 0, "scene {} is empty", demo.scene_name());
            demo.update(1.0 / 60.0);
            demo.switch_scene(1);
        }
        assert_eq!(demo.scene_name(), "spider");
    }

    #[test]
    fn switching_wraps_both_ways() {
        let mut demo = Demo::new(1);
        demo.switch_scene(1);
        assert_eq!(demo.scene_name(), "shapes");
        demo.switch_scene(-1);
        assert_eq!(demo.scene_name(), "spider");
    }

    #[test]
    fn tearing_only_applies_to_cloth() {
        let mut demo = Demo::new(1);
        assert_eq!(demo.tear(400.0, 250.0), 0);

        demo.switch_scene(-1);
        assert_eq!(demo.scene_name(), "cloth");
        let p = demo.positions();
        // A particle in the middle of the sheet.
        let (x, y) = (p[2 * 210], p[2 * 210 + 1]);
        assert_eq!(demo.tear(x, y), 4);
    }

    #[test]
    fn segment_export_covers_tethers() {
        let mut demo = Demo::new(9);
        for _ in 0..200 {
            demo.update(1.0 / 60.0);
        }
        assert_eq!(demo.segments().len() % 4, 0);
        assert!(demo.segments().iter().all(|v| v.is_finite()));
    }
}
