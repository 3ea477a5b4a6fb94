//! Museum-style spot placement.
//!
//! Spots hang just below the ceiling in front of a target surface and hit its
//! centre at a fixed incidence angle from the vertical. When several spots
//! light one surface they are spread symmetrically along the surface tangent.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use sfumato_config::LightingTuning;
use tracing::{debug, warn};

use crate::color::rgb_from_hex;
use crate::constants::GALLERY_WHITE;
use crate::types::{LightSpec, SpotBeam, TargetSurface};

/// How spots are generated for each target surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpotTemplate {
    pub color: Vec3,
    pub intensity: f32,
    pub count_per_target: usize,
    pub beam: SpotBeam,
    /// Fraction of the lateral offset kept when aiming; 0 aims every spot at
    /// the surface centre
    #[serde(default)]
    pub aim_spread: f32,
}

impl Default for SpotTemplate {
    fn default() -> Self {
        Self {
            color: rgb_from_hex(GALLERY_WHITE),
            intensity: 1.0,
            count_per_target: 2,
            beam: SpotBeam {
                falloff_distance: 20.0,
                ..Default::default()
            },
            aim_spread: 0.0,
        }
    }
}

/// Places spots for target surfaces under a flat ceiling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotPlacementPlanner {
    pub ceiling_height: f32,
    pub incidence_angle_deg: f32,
    /// Minimum gap kept between a spot and the ceiling
    pub clearance: f32,
}

impl SpotPlacementPlanner {
    pub fn new(ceiling_height: f32, tuning: &LightingTuning) -> Self {
        Self {
            ceiling_height,
            incidence_angle_deg: tuning.incidence_angle_deg,
            clearance: tuning.ceiling_clearance,
        }
    }

    /// Spots for one target surface. Deterministic: the same inputs always
    /// produce the same lights in the same order.
    pub fn plan(&self, target: &TargetSurface, template: &SpotTemplate) -> Vec<LightSpec> {
        let width = sanitize_extent(target.width, "width");
        let _height = sanitize_extent(target.height, "height");

        let angle = self.incidence_angle_deg.clamp(1.0, 89.0).to_radians();
        let center = target.position;
        let ceiling_limit = self.ceiling_height - self.clearance;

        let drop = (self.ceiling_height - center.y).max(0.0);
        let distance_from_center = drop * angle.tan();
        let horizontal_offset = (width * 0.4).max(distance_from_center * 0.8);
        let spot_y = (center.y + drop).min(ceiling_limit);

        let normal = target.facing.normal();
        let tangent = target.facing.tangent();
        let count = template.count_per_target;

        let spots: Vec<LightSpec> = (0..count)
            .map(|i| {
                let lateral = lateral_offset(i, count, horizontal_offset);
                let mut position = center + normal * distance_from_center + tangent * lateral;
                position.y = spot_y;
                let aim = center + tangent * lateral * template.aim_spread;
                LightSpec::spot(template.color, template.intensity, position, aim, template.beam)
            })
            .collect();

        debug!(
            "Planned {} spots at y={:.2}, {:.2} m out from surface at {:?}",
            spots.len(),
            spot_y,
            distance_from_center,
            center
        );
        spots
    }

    /// Spots for every target, in target order. The first `max_shadow_spots`
    /// spots cast shadows.
    pub fn plan_all(
        &self,
        targets: &[TargetSurface],
        template: &SpotTemplate,
        max_shadow_spots: usize,
    ) -> Vec<LightSpec> {
        let mut spots: Vec<LightSpec> = targets
            .iter()
            .flat_map(|target| self.plan(target, template))
            .collect();
        for (i, spot) in spots.iter_mut().enumerate() {
            spot.casts_shadow = i < max_shadow_spots;
        }
        spots
    }
}

/// Evenly spaced offset in [-half_span, half_span]; a single spot sits at 0
fn lateral_offset(index: usize, count: usize, half_span: f32) -> f32 {
    if count <= 1 {
        return 0.0;
    }
    let t = index as f32 / (count - 1) as f32;
    -half_span + 2.0 * half_span * t
}

fn sanitize_extent(value: f32, label: &str) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        warn!("Target surface has degenerate {} {}, using 1.0", label, value);
        1.0
    }
}
