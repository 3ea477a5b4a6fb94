//! Gallery orchestrator.
//!
//! Owns every piece of gallery state and drives one frame at a time:
//! input → interaction/inertia → camera transition → animation → render.
//! Nothing here talks to an engine directly; rendering goes through the
//! [`RenderEngine`] trait, and every derived visual object is recorded in
//! [`SceneArtifacts`] so it can be released when the scene is rebuilt.
//!
//! Initialization is two-phase: construct the orchestrator, then feed it
//! assets as they finish loading (`load_object`, `begin_gallery`,
//! `painting_ready`, `asset_failed`).

use glam::{Affine3A, Vec2, Vec3};
use serde::{Deserialize, Serialize};
use sfumato_config::GalleryConfig;
use tracing::{debug, info, warn};

use crate::camera::{CameraTransition, OrbitCamera};
use crate::error::GalleryError;
use crate::helpers::{LightHelper, helpers_for};
use crate::interaction::{InteractionController, PointerInput, RotationMode};
use crate::reflectance::{MaterialChoice, PainterlyParams, PainterlyPreset};
use crate::rig::{LightId, LightingRig, LightingRigState, LiveLight};
use crate::room::{RoomLayout, WallSlot, fit_painting_size};
use crate::transform::{NormalizedTransform, ObjectPivot, ObjectTransformPlanner};
use crate::types::{BoundingBox, TargetSurface};

/// Configuration applied when a single object is loaded
pub const OBJECT_CONFIGURATION: &str = "studio";

/// Configuration applied when a gallery of paintings is opened
pub const GALLERY_CONFIGURATION: &str = "gallery-spots";

/// A visual object derived from gallery state that the engine may hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum SceneArtifact {
    Light(LightId),
    Helper(LightId),
    /// Gray stand-in for the painting at this index
    Placeholder(usize),
    /// Gray stand-in for an object that failed to load
    PlaceholderObject,
}

/// Owned list of artifacts currently in the scene plus those waiting to be
/// released by the engine
#[derive(Debug, Clone, Default)]
pub struct SceneArtifacts {
    live: Vec<SceneArtifact>,
    retired: Vec<SceneArtifact>,
}

impl SceneArtifacts {
    pub fn live(&self) -> &[SceneArtifact] {
        &self.live
    }

    pub fn pending_release(&self) -> &[SceneArtifact] {
        &self.retired
    }

    pub fn insert(&mut self, artifact: SceneArtifact) {
        if !self.live.contains(&artifact) {
            self.live.push(artifact);
        }
    }

    /// Move matching artifacts to the release queue
    pub fn retire_where(&mut self, mut predicate: impl FnMut(&SceneArtifact) -> bool) {
        let (retire, keep): (Vec<_>, Vec<_>) = self.live.drain(..).partition(|a| predicate(a));
        self.live = keep;
        self.retired.extend(retire);
    }

    pub fn retire_all(&mut self) {
        self.retire_where(|_| true);
    }

    /// Hand every retired artifact to the engine
    pub fn flush(&mut self, engine: &mut impl RenderEngine) {
        for artifact in self.retired.drain(..) {
            engine.release(&artifact);
        }
    }
}

/// The engine side of the gallery
pub trait RenderEngine {
    fn render(&mut self, frame: &RenderFrame<'_>);

    /// Drop whatever the engine built for an artifact
    fn release(&mut self, artifact: &SceneArtifact);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaintingStatus {
    Pending,
    Ready,
    Placeholder,
}

/// One hanging position in the gallery
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Painting {
    pub slot: WallSlot,
    /// Width and height in meters
    pub size: Vec2,
    pub status: PaintingStatus,
}

impl Painting {
    pub fn surface(&self) -> TargetSurface {
        self.slot.surface(self.size)
    }

    pub fn is_hung(&self) -> bool {
        self.status != PaintingStatus::Pending
    }
}

/// A loaded, normalized object on its pivot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadedObject {
    pub source_bounds: BoundingBox,
    pub normalized: NormalizedTransform,
    pub pivot: ObjectPivot,
    /// Gray cube shown because the object asset failed
    pub placeholder: bool,
}

impl LoadedObject {
    pub fn model_matrix(&self) -> Affine3A {
        self.pivot.model_matrix(&self.normalized)
    }

    /// Bounds after normalization, before pivot rotation
    pub fn world_bounds(&self) -> BoundingBox {
        self.normalized.world_bounds(&self.source_bounds)
    }
}

/// Material inputs for the object this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialFrame {
    pub choice: MaterialChoice,
    pub params: PainterlyParams,
    /// Position of the brightest key light, the painterly light source
    pub light_position: Option<Vec3>,
}

/// Everything the engine needs to draw one frame
#[derive(Debug, Clone)]
pub struct RenderFrame<'a> {
    pub animation_time: f32,
    pub lights: &'a [LiveLight],
    pub helpers: Vec<LightHelper>,
    pub camera: OrbitCamera,
    pub object: Option<&'a LoadedObject>,
    pub paintings: &'a [Painting],
    pub material: MaterialFrame,
}

/// UI-facing summary of the gallery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GallerySnapshot {
    pub active_configuration: Option<String>,
    pub spot_only_mode: bool,
    pub user_intensity: f32,
    pub effects_enabled: bool,
    pub material: MaterialChoice,
    pub rotation_mode: RotationMode,
    pub auto_rotate: bool,
    pub show_helpers: bool,
    pub preset: Option<PainterlyPreset>,
    pub params: PainterlyParams,
    pub light_count: usize,
    pub painting_count: usize,
}

/// Notifications for the UI layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GalleryEvent {
    StateChanged(GallerySnapshot),
    AssetLoadFailed { painting: Option<usize>, reason: String },
    Warning(String),
}

pub struct GalleryOrchestrator {
    rig: LightingRig,
    rig_state: LightingRigState,
    transform_planner: ObjectTransformPlanner,
    layout: RoomLayout,
    interaction: InteractionController,
    camera: OrbitCamera,
    transition: Option<CameraTransition>,
    object: Option<LoadedObject>,
    paintings: Vec<Painting>,
    params: PainterlyParams,
    preset: Option<PainterlyPreset>,
    effects_enabled: bool,
    shader_failed: bool,
    show_helpers: bool,
    artifacts: SceneArtifacts,
    events: Vec<GalleryEvent>,
}

impl GalleryOrchestrator {
    /// Phase one: state without any scene content
    pub fn new(config: &GalleryConfig) -> Self {
        Self {
            rig: LightingRig::from_config(config),
            rig_state: LightingRigState::default(),
            transform_planner: ObjectTransformPlanner::new(config.room.hang_height),
            layout: RoomLayout::new(config.room.clone()),
            interaction: InteractionController::new(config.interaction.clone()),
            camera: OrbitCamera::default(),
            transition: None,
            object: None,
            paintings: Vec::new(),
            params: PainterlyParams::default(),
            preset: None,
            effects_enabled: true,
            shader_failed: false,
            show_helpers: false,
            artifacts: SceneArtifacts::default(),
            events: Vec::new(),
        }
    }

    pub fn rig(&self) -> &LightingRig {
        &self.rig
    }

    pub fn rig_mut(&mut self) -> &mut LightingRig {
        &mut self.rig
    }

    pub fn rig_state(&self) -> &LightingRigState {
        &self.rig_state
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn object(&self) -> Option<&LoadedObject> {
        self.object.as_ref()
    }

    pub fn paintings(&self) -> &[Painting] {
        &self.paintings
    }

    pub fn artifacts(&self) -> &SceneArtifacts {
        &self.artifacts
    }

    pub fn interaction(&self) -> &InteractionController {
        &self.interaction
    }

    pub fn material(&self) -> MaterialChoice {
        MaterialChoice::resolve(self.effects_enabled, self.shader_failed)
    }

    /// Names and labels of every configuration, in catalog order
    pub fn configurations(&self) -> Vec<(String, String)> {
        self.rig
            .catalog()
            .entries()
            .iter()
            .map(|c| (c.name.clone(), c.label.clone()))
            .collect()
    }

    pub fn snapshot(&self) -> GallerySnapshot {
        GallerySnapshot {
            active_configuration: self.rig_state.active_config_name.clone(),
            spot_only_mode: self.rig_state.spot_only_mode,
            user_intensity: self.rig_state.user_intensity,
            effects_enabled: self.effects_enabled,
            material: self.material(),
            rotation_mode: self.interaction.mode,
            auto_rotate: self.interaction.auto_rotate,
            show_helpers: self.show_helpers,
            preset: self.preset,
            params: self.params,
            light_count: self.rig_state.live_lights.len(),
            painting_count: self.paintings.len(),
        }
    }

    /// Take queued UI notifications
    pub fn drain_events(&mut self) -> Vec<GalleryEvent> {
        std::mem::take(&mut self.events)
    }

    fn state_changed(&mut self) {
        let snapshot = self.snapshot();
        self.events.push(GalleryEvent::StateChanged(snapshot));
    }

    fn warn_ui(&mut self, err: &GalleryError) {
        warn!("{}", err);
        self.events.push(GalleryEvent::Warning(err.to_string()));
    }

    /// Surfaces the spots should light right now
    pub fn targets(&self) -> Vec<TargetSurface> {
        if let Some(object) = &self.object {
            let yaw = object.pivot.rotation.y;
            return vec![TargetSurface::from_object_bounds(&object.world_bounds(), yaw)];
        }
        self.paintings
            .iter()
            .filter(|p| p.is_hung())
            .map(Painting::surface)
            .collect()
    }

    /// Forget the current exhibit: paintings, object, pivot and clock
    fn discard_exhibit(&mut self) {
        self.artifacts.retire_all();
        self.object = None;
        self.paintings.clear();
        self.transition = None;
        self.interaction.velocity = Vec3::ZERO;
        self.rig_state.animation_clock = 0.0;
    }

    /// Re-plan lights for the current targets, falling back to `default`
    /// when nothing is active yet
    fn rebuild_lights(&mut self, default: &str) -> Result<(), GalleryError> {
        let name = self
            .rig_state
            .active_config_name
            .clone()
            .unwrap_or_else(|| default.to_string());
        let targets = self.targets();

        self.rig.apply_configuration(&mut self.rig_state, &name, &targets)?;
        self.artifacts
            .retire_where(|a| matches!(a, SceneArtifact::Light(_) | SceneArtifact::Helper(_)));
        self.register_light_artifacts();
        Ok(())
    }

    fn register_light_artifacts(&mut self) {
        for light in &self.rig_state.live_lights {
            self.artifacts.insert(SceneArtifact::Light(light.id));
        }
        if self.show_helpers {
            for helper in helpers_for(&self.rig_state.live_lights) {
                self.artifacts.insert(SceneArtifact::Helper(helper.light));
            }
        }
    }

    /// Asset ready: a single object with the given model-space bounds
    pub fn load_object(&mut self, bounds: BoundingBox) {
        self.discard_exhibit();
        self.place_object(bounds, false);
        self.state_changed();
    }

    fn place_object(&mut self, bounds: BoundingBox, placeholder: bool) {

        let normalized = match self.transform_planner.try_normalize(&bounds) {
            Ok(normalized) => normalized,
            Err(err) => {
                self.warn_ui(&err);
                self.transform_planner.normalize(&bounds)
            }
        };
        let pivot = ObjectPivot::at(normalized.world_center());
        self.object = Some(LoadedObject {
            source_bounds: bounds,
            normalized,
            pivot,
            placeholder,
        });
        if placeholder {
            self.artifacts.insert(SceneArtifact::PlaceholderObject);
        }
        self.camera.target = pivot.center;
        info!("Object placed, scale {:.3}, pivot {:?}", normalized.scale, pivot.center);

        if let Err(err) = self.rebuild_lights(OBJECT_CONFIGURATION) {
            self.warn_ui(&err);
        }
    }

    /// Start a gallery with `count` paintings still loading
    pub fn begin_gallery(&mut self, count: usize) {
        self.discard_exhibit();
        self.paintings = self
            .layout
            .place(count)
            .into_iter()
            .map(|slot| Painting {
                slot,
                size: fit_painting_size(None, None),
                status: PaintingStatus::Pending,
            })
            .collect();
        self.camera = OrbitCamera::default();
        info!("Gallery opened with {} slots", count);

        if let Err(err) = self.rebuild_lights(GALLERY_CONFIGURATION) {
            self.warn_ui(&err);
        }
        self.state_changed();
    }

    /// Asset ready: painting `index` with optional dimensions in centimetres
    /// and its image size in pixels
    pub fn painting_ready(&mut self, index: usize, dimensions_cm: Option<Vec2>, image_size: Option<(u32, u32)>) {
        let Some(painting) = self.paintings.get_mut(index) else {
            warn!("Painting {} is not part of the gallery", index);
            return;
        };
        painting.size = fit_painting_size(dimensions_cm, image_size);
        painting.status = PaintingStatus::Ready;
        debug!("Painting {} ready, {:?} m", index, painting.size);

        self.artifacts
            .retire_where(|a| *a == SceneArtifact::Placeholder(index));
        if let Err(err) = self.rebuild_lights(GALLERY_CONFIGURATION) {
            self.warn_ui(&err);
        }
    }

    /// Asset failed: a gray placeholder takes the painting's or the object's
    /// place and stays lit
    pub fn asset_failed(&mut self, painting: Option<usize>, reason: &str) {
        let err = GalleryError::AssetLoad(reason.to_string());
        warn!("{}", err);
        self.events.push(GalleryEvent::AssetLoadFailed {
            painting,
            reason: reason.to_string(),
        });

        let Some(index) = painting else {
            self.discard_exhibit();
            let unit = BoundingBox::from_center_size(Vec3::ZERO, Vec3::ONE);
            self.place_object(unit, true);
            self.state_changed();
            return;
        };
        let Some(slot) = self.paintings.get_mut(index) else {
            return;
        };
        slot.size = fit_painting_size(None, None);
        slot.status = PaintingStatus::Placeholder;
        self.artifacts.insert(SceneArtifact::Placeholder(index));

        if let Err(err) = self.rebuild_lights(GALLERY_CONFIGURATION) {
            self.warn_ui(&err);
        }
    }

    pub fn select_configuration(&mut self, name: &str) -> Result<(), GalleryError> {
        let targets = self.targets();
        if let Err(err) = self.rig.apply_configuration(&mut self.rig_state, name, &targets) {
            self.events.push(GalleryEvent::Warning(err.to_string()));
            return Err(err);
        }
        self.artifacts
            .retire_where(|a| matches!(a, SceneArtifact::Light(_) | SceneArtifact::Helper(_)));
        self.register_light_artifacts();
        self.state_changed();
        Ok(())
    }

    pub fn set_user_intensity(&mut self, value: f32) {
        self.rig.set_user_intensity(&mut self.rig_state, value);
        self.state_changed();
    }

    pub fn set_spot_only_mode(&mut self, enabled: bool) {
        self.rig.set_spot_only_mode(&mut self.rig_state, enabled);
        self.state_changed();
    }

    pub fn set_effects_enabled(&mut self, enabled: bool) {
        self.effects_enabled = enabled;
        self.state_changed();
    }

    pub fn set_rotation_mode(&mut self, mode: RotationMode) {
        self.interaction.set_mode(mode);
        self.state_changed();
    }

    pub fn set_auto_rotate(&mut self, enabled: bool) {
        self.interaction.set_auto_rotate(enabled);
        self.state_changed();
    }

    pub fn set_show_helpers(&mut self, enabled: bool) {
        self.show_helpers = enabled;
        if enabled {
            self.register_light_artifacts();
        } else {
            self.artifacts
                .retire_where(|a| matches!(a, SceneArtifact::Helper(_)));
        }
        self.state_changed();
    }

    pub fn apply_preset(&mut self, preset: PainterlyPreset) {
        self.params = preset.apply(&self.params);
        self.preset = Some(preset);
        info!("Applied painterly preset {}", preset.name());
        self.state_changed();
    }

    pub fn set_painterly_params(&mut self, params: PainterlyParams) {
        self.params = params;
        self.preset = None;
        self.state_changed();
    }

    /// The painterly shader could not be built; fall back to the flat material
    pub fn report_shader_failure(&mut self, message: &str) {
        if self.shader_failed {
            return;
        }
        self.shader_failed = true;
        self.warn_ui(&GalleryError::ShaderCompile(message.to_string()));
        self.state_changed();
    }

    pub fn pointer(&mut self, input: PointerInput) {
        self.transition = None;
        let pivot = self.object.as_mut().map(|o| &mut o.pivot);
        self.interaction.handle(input, pivot, &mut self.camera);
    }

    pub fn recenter(&mut self) {
        self.transition = None;
        let pivot = self.object.as_mut().map(|o| &mut o.pivot);
        self.interaction.recenter(pivot, &mut self.camera);
    }

    /// Start a camera move to painting `index`. Returns false when there is
    /// no such painting.
    pub fn focus_painting(&mut self, index: usize) -> bool {
        let Some(painting) = self.paintings.get(index) else {
            warn!("Cannot focus painting {}, gallery has {}", index, self.paintings.len());
            return false;
        };
        self.transition = Some(CameraTransition::to_surface(&self.camera, &painting.surface()));
        true
    }

    /// Run one frame and hand it to the engine
    pub fn frame(&mut self, dt: f32, engine: &mut impl RenderEngine) {
        self.artifacts.flush(engine);

        let pivot = self.object.as_mut().map(|o| &mut o.pivot);
        self.interaction.tick(pivot, &mut self.camera);

        if let Some(transition) = &mut self.transition
            && transition.advance(dt, &mut self.camera)
        {
            self.transition = None;
        }

        self.rig.tick(&mut self.rig_state, dt);

        let helpers = if self.show_helpers {
            helpers_for(&self.rig_state.live_lights)
        } else {
            Vec::new()
        };
        let key = self.rig_state.key_light();
        let material = MaterialFrame {
            choice: self.material(),
            params: self.params,
            light_position: key.and_then(|l| l.shape.position()),
        };

        let frame = RenderFrame {
            animation_time: self.rig_state.animation_clock,
            lights: &self.rig_state.live_lights,
            helpers,
            camera: self.camera,
            object: self.object.as_ref(),
            paintings: &self.paintings,
            material,
        };
        engine.render(&frame);
    }

    /// Release everything the engine holds for this gallery
    pub fn shutdown(&mut self, engine: &mut impl RenderEngine) {
        self.artifacts.retire_all();
        self.artifacts.flush(engine);
        self.rig_state = LightingRigState::default();
        self.object = None;
        self.paintings.clear();
        info!("Gallery shut down");
    }
}
