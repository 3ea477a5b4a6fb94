//! Color helpers: hex conversion and HSL offsets for animated lights.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Convert a 0xRRGGBB value to linear-ish RGB in 0.0-1.0
pub fn rgb_from_hex(hex: u32) -> Vec3 {
    Vec3::new(
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    )
}

/// Hue/saturation/lightness deltas applied on top of a light's base color.
///
/// Hue is expressed in turns (1.0 = 360 degrees).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HslOffset {
    pub hue: f32,
    pub saturation: f32,
    pub lightness: f32,
}

/// RGB (0-1) to HSL, hue in turns
pub fn rgb_to_hsl(rgb: Vec3) -> Vec3 {
    let max = rgb.max_element();
    let min = rgb.min_element();
    let lightness = (max + min) / 2.0;
    let delta = max - min;

    if delta <= f32::EPSILON {
        return Vec3::new(0.0, 0.0, lightness);
    }

    let saturation = if lightness > 0.5 {
        delta / (2.0 - max - min)
    } else {
        delta / (max + min)
    };

    let hue = if max == rgb.x {
        (rgb.y - rgb.z) / delta + if rgb.y < rgb.z { 6.0 } else { 0.0 }
    } else if max == rgb.y {
        (rgb.z - rgb.x) / delta + 2.0
    } else {
        (rgb.x - rgb.y) / delta + 4.0
    };

    Vec3::new(hue / 6.0, saturation, lightness)
}

/// HSL (hue in turns) to RGB (0-1)
pub fn hsl_to_rgb(hsl: Vec3) -> Vec3 {
    let (h, s, l) = (hsl.x.rem_euclid(1.0), hsl.y, hsl.z);
    if s <= 0.0 {
        return Vec3::splat(l);
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    Vec3::new(
        hue_channel(p, q, h + 1.0 / 3.0),
        hue_channel(p, q, h),
        hue_channel(p, q, h - 1.0 / 3.0),
    )
}

fn hue_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

/// Shift a color by an HSL offset. Saturation and lightness are clamped to
/// 0-1 and hue wraps, so the result is always a valid non-negative color.
pub fn apply_hsl_offset(color: Vec3, offset: HslOffset) -> Vec3 {
    if offset == HslOffset::default() {
        return color;
    }
    let hsl = rgb_to_hsl(color.clamp(Vec3::ZERO, Vec3::ONE));
    let shifted = Vec3::new(
        hsl.x + offset.hue,
        (hsl.y + offset.saturation).clamp(0.0, 1.0),
        (hsl.z + offset.lightness).clamp(0.0, 1.0),
    );
    hsl_to_rgb(shifted).clamp(Vec3::ZERO, Vec3::ONE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < 1e-4
    }

    #[test]
    fn test_hex_conversion() {
        assert!(close(rgb_from_hex(0xff0000), Vec3::new(1.0, 0.0, 0.0)));
        assert!(close(rgb_from_hex(0xffffff), Vec3::ONE));
        let warm = rgb_from_hex(0xfff4e5);
        assert!(warm.x > warm.y && warm.y > warm.z);
    }

    #[test]
    fn test_hsl_known_values() {
        let red = rgb_to_hsl(Vec3::new(1.0, 0.0, 0.0));
        assert!(close(red, Vec3::new(0.0, 1.0, 0.5)));

        let blue = hsl_to_rgb(Vec3::new(2.0 / 3.0, 1.0, 0.5));
        assert!(close(blue, Vec3::new(0.0, 0.0, 1.0)));

        let gray = rgb_to_hsl(Vec3::splat(0.4));
        assert_eq!(gray.y, 0.0);
    }

    #[test]
    fn test_zero_offset_is_identity() {
        let color = rgb_from_hex(0xd4c4b0);
        assert_eq!(apply_hsl_offset(color, HslOffset::default()), color);
    }

    #[test]
    fn test_offset_stays_in_gamut() {
        let color = rgb_from_hex(0xfff4e5);
        let shifted = apply_hsl_offset(
            color,
            HslOffset {
                hue: 0.7,
                saturation: 2.0,
                lightness: -3.0,
            },
        );
        assert!(shifted.min_element() >= 0.0);
        assert!(shifted.max_element() <= 1.0);
    }
}
