use crate::config::SceneConfig;

/// The reference scene: 2.0 radius liquid sphere at the origin, a 10.0
/// radius inverted glass sphere at z = -6, the gradient plane at z = -12,
/// and the lakeside HDR applied to the glass only.
pub fn create_lakeside_config() -> SceneConfig {
    SceneConfig::default()
}
