use glam::Vec3;
use liquid_scene::animation::AnimationDriver;
use liquid_scene::config::{AnimationConfig, SceneConfig};
use liquid_scene::core::Viewport;
use liquid_scene::environment::{EnvironmentLoader, EnvironmentStatus};
use liquid_scene::{build_scene, SceneError, ScenePreset, SceneState};

fn state_for(preset: ScenePreset, width: u32, height: u32) -> SceneState {
    SceneState::with_environment(
        preset.config(),
        Viewport::new(width, height),
        EnvironmentLoader::disabled(),
    )
    .unwrap()
}

#[cfg(test)]
mod animation_tests {
    use super::*;

    #[test]
    fn test_rotation_is_ticks_times_step() {
        let mut driver = AnimationDriver::default();
        for _ in 0..100 {
            driver.tick();
        }
        let rotation = driver.rotation();
        assert_eq!(rotation.y, 100.0_f32 * 0.0099, "y = {}", rotation.y);
        assert_eq!(rotation.x, 100.0_f32 * 0.0005, "x = {}", rotation.x);
        assert_eq!(rotation.z, 0.0);
    }

    #[test]
    fn test_two_ticks_advance_twice_one() {
        let mut one = AnimationDriver::default();
        one.tick();
        let mut two = AnimationDriver::default();
        two.tick();
        two.tick();

        assert!((two.liquid_time() - 2.0 * one.liquid_time()).abs() < 1e-7);
        assert!((two.background_time() - 2.0 * one.background_time()).abs() < 1e-7);
        assert!((two.rotation() - 2.0 * one.rotation()).length() < 1e-7);
    }

    #[test]
    fn test_clock_steps() {
        let mut driver = AnimationDriver::default();
        let frame = driver.tick();
        assert!((frame.liquid_time - 0.05).abs() < 1e-7);
        assert!((frame.background_time - 0.01).abs() < 1e-7);
        assert_eq!(frame.number, 1);
    }

    #[test]
    fn test_advance_matches_repeated_ticks() {
        let mut stepped = AnimationDriver::default();
        for _ in 0..250 {
            stepped.tick();
        }
        let mut jumped = AnimationDriver::default();
        jumped.advance(250);
        assert_eq!(stepped.frame(), jumped.frame());
    }

    #[test]
    fn test_time_wrap_bounds_clock() {
        let config = AnimationConfig {
            time_wrap: Some(10.0),
            ..AnimationConfig::default()
        };
        let mut driver = AnimationDriver::new(&config);
        driver.advance(1000);
        // 1000 * 0.05 = 50, a whole number of periods
        assert!(driver.liquid_time() < 10.0);
        assert!(driver.liquid_time().abs() < 1e-3);
    }
}

#[cfg(test)]
mod state_tests {
    use super::*;

    #[test]
    fn test_resize_sets_exact_aspect() {
        let mut state = state_for(ScenePreset::Minimal, 800, 600);
        for (w, h) in [(1920u32, 1080u32), (1, 1000), (1000, 1), (333, 777)] {
            state.on_resize(w, h);
            assert_eq!(state.camera().aspect(), w as f32 / h as f32);
            assert_eq!(state.viewport(), Viewport::new(w, h));
        }
    }

    #[test]
    fn test_zero_resize_keeps_aspect() {
        let mut state = state_for(ScenePreset::Minimal, 800, 600);
        state.on_resize(0, 600);
        assert_eq!(state.camera().aspect(), 800.0 / 600.0);
    }

    #[test]
    fn test_tick_drives_liquid_model() {
        let mut state = state_for(ScenePreset::Minimal, 64, 64);
        let before = state.liquid_model();
        let tick = state.tick();
        assert_eq!(tick.frame.number, 1);
        assert!(!tick.environment_ready);
        assert_ne!(state.liquid_model(), before);
        assert_eq!(state.liquid_uniforms().time, tick.frame.liquid_time);
    }

    #[test]
    fn test_ready_environment_is_available_immediately() {
        let map = liquid_scene::environment::EnvironmentMap::solid(Vec3::ONE);
        let state = SceneState::with_environment(
            ScenePreset::Lakeside.config(),
            Viewport::new(32, 32),
            EnvironmentLoader::ready(map),
        )
        .unwrap();
        assert_eq!(state.environment_status(), EnvironmentStatus::Ready);
    }
}

#[cfg(test)]
mod config_tests {
    use super::*;

    #[test]
    fn test_every_preset_builds_a_scene() {
        for preset in ScenePreset::ALL {
            let scene = build_scene(&preset.config()).unwrap();
            assert!(scene.triangle_count() > 0, "{} has no triangles", preset);
        }
    }

    #[test]
    fn test_minimal_has_no_backdrop() {
        let scene = build_scene(&ScenePreset::Minimal.config()).unwrap();
        assert!(scene.backdrop.is_none());
    }

    #[test]
    fn test_config_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("studio.json");

        let config = ScenePreset::Studio.config();
        std::fs::write(&path, config.to_json()).unwrap();

        let loaded = SceneConfig::load(&path).unwrap();
        assert_eq!(loaded.name, "studio");
        assert_eq!(loaded.lights, config.lights);
        assert_eq!(loaded.backdrop.glass, config.backdrop.glass);
    }

    #[test]
    fn test_invalid_config_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{ "sphere": { "radius": -1.0 } }"#).unwrap();

        assert!(matches!(SceneConfig::load(&path), Err(SceneError::InvalidConfig(_))));
    }

    #[test]
    fn test_malformed_config_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        match SceneConfig::load(&path) {
            Err(SceneError::Parse { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected parse error, got {:?}", other.map(|c| c.name)),
        }
    }

    #[test]
    fn test_missing_config_file() {
        let result = SceneConfig::load(std::path::Path::new("no/such/scene.json"));
        assert!(matches!(result, Err(SceneError::Io { .. })));
    }
}
