//! Painterly reflectance model (chiaroscuro + sfumato).
//!
//! This is the CPU reference of the shading equation. The WGSL material in
//! the scene crate evaluates the same terms in the same order, so values
//! produced here are what a fragment should output for the same inputs.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::color::rgb_from_hex;
use crate::constants::{FOG_COLOR, LIGHT_STONE_COLOR, STONE_COLOR};

/// GLSL-style smoothstep
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// User-tunable parameters of the painterly material
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PainterlyParams {
    /// Exponent of the tone curve, ~1-4
    pub shadow_contrast: f32,
    /// ~0-3
    pub light_intensity: f32,
    /// Narrows the light/shadow transition, 0-1
    pub shadow_hardness: f32,
    /// Atmospheric haze, 0-~0.3
    pub scatter_amount: f32,
    /// Sfumato edge softening, 0-1
    pub edge_softness: f32,
    /// Subsurface scattering strength, 0-~1
    pub sss_intensity: f32,
    pub base_color: Vec3,
    pub light_color: Vec3,
}

impl Default for PainterlyParams {
    fn default() -> Self {
        Self {
            shadow_contrast: 2.5,
            light_intensity: 1.5,
            shadow_hardness: 0.7,
            scatter_amount: 0.15,
            edge_softness: 0.3,
            sss_intensity: 0.4,
            base_color: rgb_from_hex(STONE_COLOR),
            light_color: rgb_from_hex(0xffffee),
        }
    }
}

/// Named painter styles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PainterlyPreset {
    /// Soft edges, strong subsurface scattering, low contrast
    DaVinci,
    /// Hard, high-contrast tenebrism with little scattering
    Caravaggio,
    /// Balanced
    Rembrandt,
}

impl PainterlyPreset {
    pub const ALL: [PainterlyPreset; 3] = [
        PainterlyPreset::DaVinci,
        PainterlyPreset::Caravaggio,
        PainterlyPreset::Rembrandt,
    ];

    /// Apply the preset's tuple on top of existing colors
    pub fn apply(self, params: &PainterlyParams) -> PainterlyParams {
        let (contrast, intensity, hardness, scatter, softness, sss) = match self {
            PainterlyPreset::DaVinci => (1.8, 1.2, 0.3, 0.25, 0.6, 0.7),
            PainterlyPreset::Caravaggio => (3.5, 2.2, 0.9, 0.05, 0.1, 0.2),
            PainterlyPreset::Rembrandt => (2.2, 1.6, 0.6, 0.15, 0.4, 0.5),
        };
        PainterlyParams {
            shadow_contrast: contrast,
            light_intensity: intensity,
            shadow_hardness: hardness,
            scatter_amount: scatter,
            edge_softness: softness,
            sss_intensity: sss,
            ..*params
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PainterlyPreset::DaVinci => "davinci",
            PainterlyPreset::Caravaggio => "caravaggio",
            PainterlyPreset::Rembrandt => "rembrandt",
        }
    }
}

/// Geometry of one shaded point
#[derive(Debug, Clone, Copy)]
pub struct ShadingPoint {
    /// Surface normal (normalized internally)
    pub normal: Vec3,
    /// Direction from the point towards the light
    pub light_dir: Vec3,
    /// Direction from the point towards the camera
    pub view_dir: Vec3,
    pub world_pos: Vec3,
    pub light_pos: Vec3,
    /// Distance from the point to the camera
    pub view_distance: f32,
}

impl ShadingPoint {
    /// Build a shading point from positions, the way the vertex stage does
    pub fn from_positions(normal: Vec3, world_pos: Vec3, light_pos: Vec3, camera_pos: Vec3) -> Self {
        let to_camera = camera_pos - world_pos;
        Self {
            normal,
            light_dir: (light_pos - world_pos).normalize_or_zero(),
            view_dir: to_camera.normalize_or_zero(),
            world_pos,
            light_pos,
            view_distance: to_camera.length(),
        }
    }
}

/// Diffuse term with controlled penumbra, tone curve, deep-shadow
/// compression and highlight lift. Monotonic non-decreasing in `n_dot_l`.
pub fn chiaroscuro(n_dot_l: f32, contrast: f32, hardness: f32) -> f32 {
    let penumbra = mix(0.15, 0.35, hardness);
    let band = smoothstep(-penumbra, penumbra, n_dot_l);
    let mut toned = band.powf(contrast);

    // Tenebrism: almost nothing survives below 0.15
    let deep = smoothstep(0.0, 0.15, toned);
    toned = mix(toned * 0.05, toned, deep);

    let highlight = smoothstep(0.7, 1.0, toned);
    toned = mix(toned, toned * 1.3, highlight * 0.5);

    toned.max(0.0)
}

/// Light transmitted through the back side plus a soft directional lobe
pub fn subsurface_scattering(point: &ShadingPoint, normal: Vec3, sss_intensity: f32) -> f32 {
    let n_dot_l = normal.dot(point.light_dir);
    let transmission = (-n_dot_l).max(0.0);
    let dist_factor = 1.0 / (1.0 + point.world_pos.distance(point.light_pos) * 0.1);
    let rim = (1.0 - normal.dot(point.view_dir).max(0.0)).powi(3);

    let half_vec = (point.light_dir + point.view_dir).normalize_or_zero();
    let lobe = normal.dot(half_vec).max(0.0).powi(8) * 0.3;

    (transmission * dist_factor * rim + lobe) * sss_intensity
}

/// Sfumato softening of silhouettes
pub fn edge_softening(normal: Vec3, view_dir: Vec3, softness: f32) -> f32 {
    let edge = 1.0 - normal.dot(view_dir).abs();
    edge.powf(2.0 + softness * 3.0) * softness
}

/// Fresnel rim glow
pub fn fresnel_glow(normal: Vec3, view_dir: Vec3, softness: f32) -> f32 {
    let fresnel = (1.0 - view_dir.dot(normal).max(0.0)).powf(1.5 + softness);
    fresnel * softness * 0.4
}

/// Blend towards the cool fog color with exponential density
pub fn atmospheric_scattering(color: Vec3, distance: f32, amount: f32) -> Vec3 {
    let density = 1.0 - (-distance * amount * 0.03).exp();
    color.lerp(FOG_COLOR, density * amount)
}

/// Reinhard tone map and mid-tone contrast trim, still linear. This is what
/// the GPU shader writes; an sRGB target does the gamma step.
pub fn linear_tone_map(color: Vec3) -> Vec3 {
    let color = color.max(Vec3::ZERO);
    let mapped = color / (color + Vec3::ONE);
    mapped.powf(0.95)
}

/// Reinhard tone map, mid-tone contrast trim and gamma encoding
pub fn tone_map(color: Vec3) -> Vec3 {
    linear_tone_map(color).powf(1.0 / 2.2)
}

/// Evaluate the full painterly shading equation for one point
pub fn evaluate(point: &ShadingPoint, params: &PainterlyParams) -> Vec3 {
    let normal = point.normal.normalize_or_zero();
    let n_dot_l = normal.dot(point.light_dir);

    let toned = chiaroscuro(n_dot_l, params.shadow_contrast, params.shadow_hardness);
    let sss = subsurface_scattering(point, normal, params.sss_intensity);
    let soft = edge_softening(normal, point.view_dir, params.edge_softness);
    let glow = fresnel_glow(normal, point.view_dir, params.edge_softness);

    let light = params.light_color * params.light_intensity;

    let mut color = params.base_color * light * toned;
    color += Vec3::splat(sss) * light * 0.6;

    let edge_color = color.lerp(params.base_color * 0.4, soft * 0.3);
    color = color.lerp(edge_color, soft);

    color += light * glow * 0.2;
    color += params.base_color * 0.08;

    color = atmospheric_scattering(color, point.view_distance, params.scatter_amount);
    tone_map(color)
}

/// Fixed PBR-style surface used when the painterly shader is not in play
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceMaterial {
    pub base_color: Vec3,
    pub roughness: f32,
    pub metalness: f32,
}

/// Which material the object is drawn with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialChoice {
    #[default]
    Painterly,
    /// Effects disabled by the user
    Standard,
    /// Painterly shader failed to compile
    Flat,
}

impl MaterialChoice {
    /// Resolve the material from user and pipeline state. A shader failure
    /// always wins.
    pub fn resolve(effects_enabled: bool, shader_failed: bool) -> Self {
        match (shader_failed, effects_enabled) {
            (true, _) => MaterialChoice::Flat,
            (false, true) => MaterialChoice::Painterly,
            (false, false) => MaterialChoice::Standard,
        }
    }

    /// Surface parameters for the non-shader materials
    pub fn surface(self) -> Option<SurfaceMaterial> {
        match self {
            MaterialChoice::Painterly => None,
            MaterialChoice::Standard => Some(SurfaceMaterial {
                base_color: rgb_from_hex(LIGHT_STONE_COLOR),
                roughness: 0.6,
                metalness: 0.05,
            }),
            MaterialChoice::Flat => Some(SurfaceMaterial {
                base_color: rgb_from_hex(STONE_COLOR),
                roughness: 0.7,
                metalness: 0.1,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facing_point(n_dot_l: f32) -> ShadingPoint {
        // Light rotated in the XZ plane so that dot(normal, light_dir) == n_dot_l
        let sin = (1.0 - n_dot_l * n_dot_l).max(0.0).sqrt();
        ShadingPoint {
            normal: Vec3::Z,
            light_dir: Vec3::new(sin, 0.0, n_dot_l),
            view_dir: Vec3::Z,
            world_pos: Vec3::ZERO,
            light_pos: Vec3::new(sin, 0.0, n_dot_l) * 5.0,
            view_distance: 5.0,
        }
    }

    #[test]
    fn test_chiaroscuro_monotonic() {
        for h in 0..=10 {
            let hardness = h as f32 / 10.0;
            for c in 0..=12 {
                let contrast = 1.0 + c as f32 * 0.25;
                let mut previous = chiaroscuro(-1.0, contrast, hardness);
                for i in 1..=400 {
                    let n_dot_l = -1.0 + i as f32 * 0.005;
                    let value = chiaroscuro(n_dot_l, contrast, hardness);
                    assert!(
                        value + 1e-6 >= previous,
                        "inversion at n_dot_l={n_dot_l} contrast={contrast} hardness={hardness}"
                    );
                    previous = value;
                }
            }
        }
    }

    #[test]
    fn test_chiaroscuro_extremes() {
        assert_eq!(chiaroscuro(-1.0, 2.5, 0.7), 0.0);
        // Fully lit: band 1 -> highlight lift of 15%
        assert!((chiaroscuro(1.0, 2.5, 0.7) - 1.15).abs() < 1e-5);
        // Terminator sits at half band before the tone curve
        let mid = chiaroscuro(0.0, 1.0, 0.5);
        assert!(mid > 0.4 && mid < 0.6);
    }

    #[test]
    fn test_deep_shadow_compression() {
        // A toned value well below 0.15 keeps only a small fraction
        let penumbra = 0.15;
        let n_dot_l = -penumbra * 0.85;
        let band = smoothstep(-penumbra, penumbra, n_dot_l);
        let value = chiaroscuro(n_dot_l, 1.0, 0.0);
        assert!(value < band * 0.5);
    }

    #[test]
    fn test_evaluate_is_finite_and_in_range() {
        let params = PainterlyParams::default();
        for i in 0..=20 {
            let n_dot_l = -1.0 + i as f32 * 0.1;
            let color = evaluate(&facing_point(n_dot_l), &params);
            assert!(color.is_finite());
            assert!(color.min_element() >= 0.0);
            assert!(color.max_element() < 1.0);
        }
    }

    #[test]
    fn test_lit_side_is_brighter() {
        let params = PainterlyParams::default();
        let lit = evaluate(&facing_point(0.9), &params);
        let dark = evaluate(&facing_point(-0.9), &params);
        assert!(lit.element_sum() > dark.element_sum());
    }

    #[test]
    fn test_shadow_keeps_ambient_floor() {
        let params = PainterlyParams {
            sss_intensity: 0.0,
            edge_softness: 0.0,
            scatter_amount: 0.0,
            ..Default::default()
        };
        let color = evaluate(&facing_point(-1.0), &params);
        let expected = tone_map(params.base_color * 0.08);
        assert!((color - expected).abs().max_element() < 1e-5);
    }

    #[test]
    fn test_linear_tone_map_keeps_trim() {
        let c = Vec3::new(1.0, 3.0, 0.0);
        let linear = linear_tone_map(c);
        // Reinhard then the 0.95 trim
        assert!((linear.x - 0.5f32.powf(0.95)).abs() < 1e-6);
        assert!((linear.y - 0.75f32.powf(0.95)).abs() < 1e-6);
        assert_eq!(linear.z, 0.0);
        assert!((tone_map(c) - linear.powf(1.0 / 2.2)).abs().max_element() < 1e-6);
        assert_eq!(linear_tone_map(Vec3::splat(-1.0)), Vec3::ZERO);
    }

    #[test]
    fn test_presets_are_fixed() {
        let base = PainterlyParams::default();
        let davinci = PainterlyPreset::DaVinci.apply(&base);
        let caravaggio = PainterlyPreset::Caravaggio.apply(&base);
        assert_eq!(davinci.shadow_contrast, 1.8);
        assert_eq!(davinci.sss_intensity, 0.7);
        assert_eq!(caravaggio.shadow_hardness, 0.9);
        assert!(caravaggio.shadow_contrast > davinci.shadow_contrast);
        assert!(davinci.edge_softness > caravaggio.edge_softness);
        assert_eq!(davinci.base_color, base.base_color);
        assert_eq!(PainterlyPreset::Rembrandt.apply(&base).light_intensity, 1.6);
    }

    #[test]
    fn test_fog_pulls_towards_fog_color() {
        let white = Vec3::ONE;
        let near = atmospheric_scattering(white, 1.0, 0.3);
        let far = atmospheric_scattering(white, 1000.0, 0.3);
        assert!(far.x < near.x);
        assert_eq!(atmospheric_scattering(white, 100.0, 0.0), white);
    }

    #[test]
    fn test_material_fallbacks() {
        assert_eq!(MaterialChoice::resolve(true, false), MaterialChoice::Painterly);
        assert_eq!(MaterialChoice::resolve(false, false), MaterialChoice::Standard);
        assert_eq!(MaterialChoice::resolve(true, true), MaterialChoice::Flat);
        assert!(MaterialChoice::Painterly.surface().is_none());
        let flat = MaterialChoice::Flat.surface().map(|m| (m.roughness, m.metalness));
        assert_eq!(flat, Some((0.7, 0.1)));
    }
}
