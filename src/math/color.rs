use glam::Vec3;

/// Converts one sRGB-encoded channel to linear light
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// `0xRRGGBB` to a linear RGB triple, the space all shading happens in
pub fn hex_to_rgb(hex: u32) -> Vec3 {
    let channel = |shift: u32| srgb_to_linear(((hex >> shift) & 0xff) as f32 / 255.0);
    Vec3::new(channel(16), channel(8), channel(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_white_and_black() {
        let white = hex_to_rgb(0xffffff);
        assert!((white - Vec3::ONE).abs().max_element() < 1e-6);

        let black = hex_to_rgb(0x000000);
        assert_eq!(black, Vec3::ZERO);
    }

    #[test]
    fn test_hex_channel_order() {
        let red = hex_to_rgb(0xff0000);
        assert!((red.x - 1.0).abs() < 1e-6);
        assert!(red.y.abs() < 1e-6);
        assert!(red.z.abs() < 1e-6);

        let blue = hex_to_rgb(0x0000ff);
        assert!((blue.z - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_srgb_midpoint_darkens() {
        // 0.5 encoded is roughly 0.214 linear
        let mid = srgb_to_linear(0.5);
        assert!((mid - 0.214).abs() < 0.01);
    }
}
