use taut::{Bounds, Error, RelaxOrder, SimConfig, Vec2};

#[test]
fn defaults_match_demo_world() {
    let config: SimConfig<f32> = SimConfig::default();
    assert_eq!(config.gravity, Vec2::new(0.0, 0.2));
    assert_eq!(config.friction, 0.99);
    assert_eq!(config.ground_friction, 0.8);
    assert_eq!(config.substeps, 16);
    assert_eq!(config.bounds, Bounds::new(800.0, 500.0));
    assert_eq!(config.selection_radius, 20.0);
    assert_eq!(config.relax_order, RelaxOrder::PerComposite);
    assert_eq!(config.validate(), Ok(()));
}

#[test]
fn builder_clamps_substeps() {
    let config: SimConfig<f32> = SimConfig::new().with_substeps(0);
    assert_eq!(config.substeps, 1);
}

#[test]
fn validate_rejects_bad_values() {
    let nan_bounds: SimConfig<f32> = SimConfig::new().with_bounds(f32::NAN, 10.0);
    assert!(matches!(nan_bounds.validate(), Err(Error::InvalidBounds { .. })));

    let ground: SimConfig<f32> = SimConfig::new().with_ground_friction(f32::INFINITY);
    assert!(matches!(ground.validate(), Err(Error::InvalidFriction(_))));

    // Friction above one is accepted.
    let bouncy: SimConfig<f32> = SimConfig::new().with_friction(1.01);
    assert_eq!(bouncy.validate(), Ok(()));
}

#[test]
fn floor_is_one_above_height() {
    let bounds: Bounds<f32> = Bounds::new(800.0, 500.0);
    assert_eq!(bounds.floor(), 499.0);
    assert!(bounds.on_floor(Vec2::new(10.0, 499.0)));
    assert!(!bounds.on_floor(Vec2::new(10.0, 498.9)));
    assert_eq!(bounds.clamp(Vec2::new(1000.0, 1000.0)), Vec2::new(799.0, 499.0));
}

#[test]
fn error_messages() {
    assert_eq!(
        Error::ParticleOutOfRange { index: 4, count: 2 }.to_string(),
        "particle index 4 out of range (count: 2)"
    );
    assert_eq!(
        Error::InsufficientSegments { min: 3, got: 1 }.to_string(),
        "need at least 3 segments, got 1"
    );
}

#[cfg(feature = "serde")]
mod serde_config {
    use super::*;

    #[test]
    fn ron_round_trip() {
        let config: SimConfig<f32> = SimConfig::new()
            .with_gravity(Vec2::new(0.0, 0.5))
            .with_substeps(8)
            .with_relax_order(RelaxOrder::Interleaved);
        let text = ron::to_string(&config).unwrap();
        let back: SimConfig<f32> = ron::from_str(&text).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config: SimConfig<f32> = ron::from_str("(substeps: 4, relax_order: Interleaved)").unwrap();
        assert_eq!(config.substeps, 4);
        assert_eq!(config.relax_order, RelaxOrder::Interleaved);
        assert_eq!(config.friction, 0.99);
        assert_eq!(config.bounds, Bounds::new(800.0, 500.0));
    }
}
