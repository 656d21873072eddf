use crate::config::SceneConfig;
use crate::shading::BackgroundShading;

/// Lakeside layout over the linear blue gradient.
pub fn create_ocean_config() -> SceneConfig {
    let mut config = SceneConfig {
        name: "ocean".to_string(),
        ..SceneConfig::default()
    };
    config.background.shading = BackgroundShading::blue();
    config
}
