use glam::Vec3;

/// Convert a `0xRRGGBB` literal into a colour in [0, 1].
pub fn hex_to_rgb(hex: u32) -> Vec3 {
    Vec3::new(
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    )
}

/// Clamp and round a channel to 8 bits.
pub fn quantize(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

pub fn to_rgba8(color: Vec3, alpha: f32) -> [u8; 4] {
    [
        quantize(color.x),
        quantize(color.y),
        quantize(color.z),
        quantize(alpha),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_to_rgb_white() {
        let rgb = hex_to_rgb(0xffffff);
        assert!((rgb - Vec3::ONE).length() < 1e-6);
    }

    #[test]
    fn test_hex_to_rgb_channels() {
        let rgb = hex_to_rgb(0xff8000);
        assert!((rgb.x - 1.0).abs() < 0.01);
        assert!((rgb.y - 0.502).abs() < 0.01);
        assert!(rgb.z.abs() < 0.01);
    }

    #[test]
    fn test_quantize_clamps_out_of_range() {
        assert_eq!(quantize(1.4), 255);
        assert_eq!(quantize(-0.2), 0);
        assert_eq!(quantize(0.5), 128);
    }
}
