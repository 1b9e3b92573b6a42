use orrery::{
    BodyId, CameraMode, LoadError, NoTextures, OrbitHierarchy, Orrery, OrreryConfig, TickContext,
};
use std::f32::consts::PI;

const SUN_AND_EARTH: &str = r#"[
    { "name": "Sun", "radius": 1, "self_rotation_period": 27, "solar_tilt": 0,
      "color": [255, 77, 0] },
    { "name": "Earth", "radius": 0.01, "orbital_period": 365, "parent": "Sun",
      "parent_distance": 1.0, "solar_tilt": 10, "color": [0, 0, 255],
      "self_rotation_period": 1 }
]"#;

#[test]
fn half_an_orbit_puts_earth_opposite_its_start() {
    let mut h = OrbitHierarchy::from_json(SUN_AND_EARTH, &mut NoTextures, 200.0).unwrap();
    let earth = h.find("Earth").unwrap();
    let start = h[earth].position();
    assert_eq!(h[earth].parametric_angle(), -PI);

    h.advance(&TickContext { speed_factor: 1.0, elapsed_hours: 365.0 * 24.0 / 2.0 });

    let angle = h[earth].parametric_angle();
    assert!(angle.abs() < 1e-4, "angle was {angle}");

    let sun = h[BodyId(0)].position();
    let now = h[earth].position();
    assert!(((now - sun) + (start - sun)).norm() < 1e-2);
    assert!(((now - sun).norm() - 200.0).abs() < 1e-2);

    let tilt = 10f32.to_radians();
    assert!((now.x - 200.0 * tilt.cos()).abs() < 1e-2);
    assert!((now.y - 200.0 * tilt.sin()).abs() < 1e-2);
}

#[test]
fn angles_stay_wrapped_over_many_ticks() {
    let text = include_str!("../assets/bodies.json");
    let mut h = OrbitHierarchy::from_json(text, &mut NoTextures, 200.0).unwrap();
    let steps = [0.4, 13.0, 0.01, 250.0, 4000.0, 1.5];
    for i in 0..600 {
        let ctx = TickContext { speed_factor: 1.0 + (i % 7) as f32, elapsed_hours: steps[i % steps.len()] };
        h.advance(&ctx);
        for (_, body) in h.iter() {
            assert!(body.parametric_angle() > -PI && body.parametric_angle() <= PI);
            assert!(body.self_parametric_angle() > -PI && body.self_parametric_angle() <= PI);
        }
    }
}

#[test]
fn bundled_description_loads_cleanly() {
    let text = include_str!("../assets/bodies.json");
    let h = OrbitHierarchy::from_json(text, &mut NoTextures, 200.0).unwrap();
    assert!(h.warnings().is_empty());
    let moon = h.find("Moon").unwrap();
    let chain: Vec<&str> = h.ancestors(moon).iter().map(|&id| h[id].name()).collect();
    assert_eq!(chain, vec!["Earth", "Sun"]);
}

#[test]
fn forward_reference_loads_with_a_root() {
    let text = r#"[
        { "name": "Earth", "radius": 0.01, "orbital_period": 365, "parent": "Sun",
          "parent_distance": 1.0, "solar_tilt": 10, "color": [0, 0, 255],
          "self_rotation_period": 1 },
        { "name": "Sun", "radius": 1, "self_rotation_period": 27, "solar_tilt": 0,
          "color": [255, 77, 0] }
    ]"#;
    let h = OrbitHierarchy::from_json(text, &mut NoTextures, 200.0).unwrap();
    assert_eq!(h[BodyId(0)].parent(), None);
    assert_eq!(h[BodyId(0)].global_solar_tilt(), 10.0);
    assert!(h.ancestors(BodyId(0)).is_empty());
    assert_eq!(h.warnings().len(), 1);
}

#[test]
fn missing_parent_distance_is_fatal() {
    let text = SUN_AND_EARTH.replace(r#""parent_distance": 1.0,"#, "");
    match OrbitHierarchy::from_json(&text, &mut NoTextures, 200.0) {
        Err(LoadError::InvalidField { index, field, name, .. }) => {
            assert_eq!(index, 1);
            assert_eq!(field, "parent_distance");
            assert_eq!(name.as_deref(), Some("Earth"));
        }
        other => panic!("expected a fatal load error, got {other:?}"),
    }
}

#[test]
fn anchored_view_tracks_the_body_through_ticks() {
    let h = OrbitHierarchy::from_json(SUN_AND_EARTH, &mut NoTextures, 200.0).unwrap();
    let config = OrreryConfig { star_count: 0, ..OrreryConfig::default() };
    let mut orrery = Orrery::new(&config, h);

    assert!(orrery.anchor_camera("Earth"));
    assert_eq!(orrery.camera().mode(), CameraMode::Anchored(BodyId(1)));

    let mut now = 0.0;
    for _ in 0..30 {
        orrery.tick(now);
        now += 100.0;
        let earth = &orrery.hierarchy()[BodyId(1)];
        let distance = (earth.position() - orrery.camera().position()).norm();
        let expected = earth.radius() * config.camera.anchor_distance;
        assert!((distance - expected).abs() < 1e-3);
    }
    assert!(orrery.simulated_days() > 2.8);
}

#[test]
fn runaway_speed_factor_keeps_ticking() {
    let h = OrbitHierarchy::from_json(SUN_AND_EARTH, &mut NoTextures, 200.0).unwrap();
    let config = OrreryConfig { star_count: 0, ..OrreryConfig::default() };
    let mut orrery = Orrery::new(&config, h);

    let mut now = 0.0;
    for presses in 0..200 {
        orrery.controls_mut().faster();
        assert!(orrery.tick(now), "tick {presses} was skipped");
        now += 400.0;
        for (_, body) in orrery.hierarchy().iter() {
            assert!(body.parametric_angle() > -PI && body.parametric_angle() <= PI);
            assert!(body.self_parametric_angle() > -PI && body.self_parametric_angle() <= PI);
            assert!(body.position().iter().all(|c| c.is_finite()));
        }
    }
    assert!(orrery.controls().speed_factor().is_infinite());
}

#[test]
fn negative_period_is_fatal() {
    let text = SUN_AND_EARTH.replace(r#""orbital_period": 365"#, r#""orbital_period": -365"#);
    match OrbitHierarchy::from_json(&text, &mut NoTextures, 200.0) {
        Err(LoadError::InvalidField { index, field, .. }) => {
            assert_eq!(index, 1);
            assert_eq!(field, "orbital_period");
        }
        other => panic!("expected a fatal load error, got {other:?}"),
    }
}
