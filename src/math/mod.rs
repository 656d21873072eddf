mod color;
mod glsl;

pub use color::{hex_to_rgb, quantize, to_rgba8};
pub use glsl::{mix, mix_vec3, smoothstep};
