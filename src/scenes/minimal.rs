use crate::config::{EnvironmentConfig, SceneConfig};

/// Cheap variant for weak GPUs and previews: coarse sphere, no backdrop.
pub fn create_minimal_config() -> SceneConfig {
    let mut config = SceneConfig {
        name: "minimal".to_string(),
        environment: EnvironmentConfig { path: None },
        ..SceneConfig::default()
    };
    config.sphere.width_segments = 48;
    config.sphere.height_segments = 32;
    config.backdrop.enabled = false;
    config
}
