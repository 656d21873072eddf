use crate::config::{EnvironmentConfig, SceneConfig};
use crate::lights::LightRig;

/// Lakeside layout without the HDR; a key/fill rig lights the glass instead.
pub fn create_studio_config() -> SceneConfig {
    let mut config = SceneConfig {
        name: "studio".to_string(),
        lights: LightRig::studio(),
        environment: EnvironmentConfig { path: None },
        ..SceneConfig::default()
    };
    config.backdrop.glass.roughness = 0.45;
    config.backdrop.glass.transmission = 0.8;
    config
}
