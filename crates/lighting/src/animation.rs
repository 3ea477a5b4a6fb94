//! Light animation styles.
//!
//! Every offset is a pure function of `(time, index, count, seed)`, so an
//! animation can be restarted, scrubbed or replayed by feeding a clock value.
//! [`AnimationScheduler::tick`] threads the clock through explicitly.

use std::f32::consts::TAU;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::catalog::AnimationStyle;
use crate::color::HslOffset;
use crate::constants::{
    ORBIT_INTENSITY_FLOOR, ORBIT_MAX_AMPLITUDE, ORBIT_MAX_SPEED, ORBIT_MIN_AMPLITUDE,
    ORBIT_MIN_SPEED, SWEEP_CYCLE_SECONDS, SWEEP_HOLD_END, SWEEP_RAMP_DOWN_END, SWEEP_RAMP_UP_END,
};

/// Per-light modulation for one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightOffset {
    pub intensity_multiplier: f32,
    pub color_offset: HslOffset,
    pub position_offset: Vec3,
}

impl LightOffset {
    /// No modulation
    pub const NEUTRAL: LightOffset = LightOffset {
        intensity_multiplier: 1.0,
        color_offset: HslOffset {
            hue: 0.0,
            saturation: 0.0,
            lightness: 0.0,
        },
        position_offset: Vec3::ZERO,
    };

    /// Offset to apply to a light's target: horizontal part of the position
    /// offset, so a wandering spot keeps its beam parallel
    pub fn target_offset(&self) -> Vec3 {
        Vec3::new(self.position_offset.x, 0.0, self.position_offset.z)
    }
}

impl Default for LightOffset {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationFrame {
    pub time: f32,
    pub lights: Vec<LightOffset>,
}

/// Trapezoid envelope over one cycle, input in cycle fractions [0, 1)
pub fn sweep_envelope(fraction: f32) -> f32 {
    let f = fraction.rem_euclid(1.0);
    if f < SWEEP_RAMP_UP_END {
        f / SWEEP_RAMP_UP_END
    } else if f < SWEEP_HOLD_END {
        1.0
    } else if f < SWEEP_RAMP_DOWN_END {
        1.0 - (f - SWEEP_HOLD_END) / (SWEEP_RAMP_DOWN_END - SWEEP_HOLD_END)
    } else {
        0.0
    }
}

/// Sweep modulation of light `index` out of `count`
pub fn sweep_offset(time: f32, index: usize, count: usize) -> LightOffset {
    let count = count.max(1);
    let phase = (time + index as f32 / count as f32 * SWEEP_CYCLE_SECONDS).rem_euclid(SWEEP_CYCLE_SECONDS);
    let envelope = sweep_envelope(phase / SWEEP_CYCLE_SECONDS);

    LightOffset {
        intensity_multiplier: envelope,
        color_offset: HslOffset {
            hue: 0.02 * envelope,
            saturation: 0.0,
            lightness: 0.0,
        },
        position_offset: Vec3::ZERO,
    }
}

/// Orbit modulation of light `index` out of `count`. Even lights trace an
/// ellipse, odd lights a figure-eight.
pub fn orbit_offset(time: f32, index: usize, count: usize, seed: f32) -> LightOffset {
    let count = count.max(1);
    let i = index as f32;
    let spread = i / (count.saturating_sub(1).max(1)) as f32;

    let speed = ORBIT_MIN_SPEED + (ORBIT_MAX_SPEED - ORBIT_MIN_SPEED) * spread;
    let amplitude = if index % 2 == 0 {
        ORBIT_MIN_AMPLITUDE
    } else {
        ORBIT_MAX_AMPLITUDE
    };
    let angle = time * speed + i / count as f32 * TAU + seed;

    let (sin, cos) = angle.sin_cos();
    let (x, z) = if index % 2 == 0 {
        (amplitude * cos, amplitude * 0.6 * sin)
    } else {
        (amplitude * sin, amplitude * sin * cos)
    };
    let bob = 0.3 * (1.3 * time + seed).sin() + 0.15 * (2.7 * time + 2.0 * seed).sin();

    let wave = 1.0 + 0.3 * (2.0 * time + seed).sin() + 0.1 * (0.5 * time - seed).sin();

    LightOffset {
        intensity_multiplier: wave.max(ORBIT_INTENSITY_FLOOR),
        color_offset: HslOffset {
            hue: 0.05 * (0.2 * time + i).sin(),
            saturation: 0.1 * (0.3 * time + 1.7 * i).sin(),
            lightness: 0.05 * (0.25 * time + 2.3 * i).sin(),
        },
        position_offset: Vec3::new(x, bob, z),
    }
}

/// Deterministic phase seed for light `index`
pub fn phase_seed(index: usize) -> f32 {
    (index as f32 * 0.618_034).fract() * TAU
}

/// Produces animation frames for one style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationScheduler {
    pub style: AnimationStyle,
}

impl AnimationScheduler {
    pub fn new(style: AnimationStyle) -> Self {
        Self { style }
    }

    /// Frame at an absolute time for lights with the given seeds
    pub fn frame(&self, time: f32, seeds: &[f32]) -> AnimationFrame {
        let count = seeds.len();
        let lights = seeds
            .iter()
            .enumerate()
            .map(|(index, &seed)| match self.style {
                AnimationStyle::Sweep => sweep_offset(time, index, count),
                AnimationStyle::Orbit => orbit_offset(time, index, count, seed),
            })
            .collect();
        AnimationFrame { time, lights }
    }

    /// Advance a clock by `dt` (negative steps are ignored) and return the
    /// new clock with its frame
    pub fn tick(&self, clock: f32, dt: f32, seeds: &[f32]) -> (f32, AnimationFrame) {
        let clock = clock + dt.max(0.0);
        (clock, self.frame(clock, seeds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{apply_hsl_offset, rgb_from_hex};
    use crate::constants::GALLERY_WHITE;

    #[test]
    fn test_sweep_reference_values() {
        let at = |t: f32| sweep_offset(t, 0, 4).intensity_multiplier;
        assert!(at(0.0).abs() < 1e-6);
        assert!((at(0.25) - 0.5).abs() < 1e-6);
        assert!((at(1.0) - 1.0).abs() < 1e-6);
        assert!((at(1.75) - 0.5).abs() < 1e-5);
        assert_eq!(at(3.0), 0.0);
    }

    #[test]
    fn test_sweep_staggers_lights() {
        // Light 1 of 4 is a quarter cycle ahead of light 0
        let ahead = sweep_offset(0.0, 1, 4).intensity_multiplier;
        let reference = sweep_offset(1.0, 0, 4).intensity_multiplier;
        assert!((ahead - reference).abs() < 1e-6);
    }

    #[test]
    fn test_sweep_hue_follows_envelope() {
        let dark = sweep_offset(3.0, 0, 1);
        let bright = sweep_offset(1.0, 0, 1);
        assert_eq!(dark.color_offset.hue, 0.0);
        assert!(bright.color_offset.hue > 0.0);
    }

    #[test]
    fn test_orbit_stays_above_floor() {
        let base = rgb_from_hex(GALLERY_WHITE);
        let count = 6;
        for step in 0..=10_000 {
            let t = step as f32 * 0.01;
            for index in 0..count {
                let offset = orbit_offset(t, index, count, phase_seed(index));
                assert!(offset.intensity_multiplier >= ORBIT_INTENSITY_FLOOR);
                assert!(offset.intensity_multiplier.is_finite());
                assert!(offset.position_offset.is_finite());
                let color = apply_hsl_offset(base, offset.color_offset);
                assert!(color.is_finite() && color.min_element() >= 0.0);
            }
        }
    }

    #[test]
    fn test_orbit_amplitude_bounds() {
        for step in 0..2000 {
            let t = step as f32 * 0.05;
            for index in 0..4 {
                let offset = orbit_offset(t, index, 4, phase_seed(index));
                let horizontal = offset.target_offset().length();
                assert!(horizontal <= ORBIT_MAX_AMPLITUDE + 1e-4);
            }
        }
    }

    #[test]
    fn test_single_light_has_finite_speed() {
        let offset = orbit_offset(12.0, 0, 1, 0.0);
        assert!(offset.position_offset.is_finite());
    }

    #[test]
    fn test_tick_is_restartable() {
        let scheduler = AnimationScheduler::new(AnimationStyle::Orbit);
        let seeds: Vec<f32> = (0..3).map(phase_seed).collect();

        let (clock, _) = scheduler.tick(0.0, 0.5, &seeds);
        let (clock, stepped) = scheduler.tick(clock, 0.75, &seeds);
        assert!((clock - 1.25).abs() < 1e-6);
        assert_eq!(stepped, scheduler.frame(1.25, &seeds));

        let (same, _) = scheduler.tick(clock, -1.0, &seeds);
        assert_eq!(same, clock);
    }
}
