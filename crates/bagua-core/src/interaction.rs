//! Pointer, touch and wheel handling for the ring drive, morph toggling and zoom.
//!
//! Input handlers only mutate this struct; [`InteractionController::update`] is
//! called once per frame and advances inertia, morph easing, camera zoom and the
//! ring scale coupling. Anything that other parts of the scene must react to is
//! reported as an [`InteractionEvent`].

use crate::camera::{ray_sphere, Camera, OrbitCamera};
use crate::constants::*;
use glam::{Vec2, Vec3};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerSource {
    Mouse,
    Touch,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractionEvent {
    /// Pick the next model point cloud; emitted just before morphing away from the sphere.
    SelectModel,
    /// The morph target state flipped; `to_model` is the new state.
    MorphToggled { to_model: bool },
    /// A full turn was drawn in one drag.
    Submit,
}

#[derive(Clone, Debug)]
pub struct InteractionConfig {
    pub click_threshold_px: f32,
    pub center_dead_zone_px: f32,
    pub rotate_sensitivity: f32,
    pub touch_mouse_guard_ms: f64,
    pub inertia_decay: f32,
    pub velocity_epsilon: f32,
    pub submit_turn: f32,
    pub sphere_radius: f32,
    pub morph_ease: f32,
    pub zoom_step: f32,
    pub zoom_ease: f32,
    pub base_distance: f32,
    pub scale_ease_shrink: f32,
    pub scale_ease_grow: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            click_threshold_px: CLICK_THRESHOLD_PX,
            center_dead_zone_px: CENTER_DEAD_ZONE_PX,
            rotate_sensitivity: ROTATE_SENSITIVITY,
            touch_mouse_guard_ms: TOUCH_MOUSE_GUARD_MS,
            inertia_decay: INERTIA_DECAY,
            velocity_epsilon: VELOCITY_EPSILON,
            submit_turn: SUBMIT_TURN,
            sphere_radius: INTERACTION_SPHERE_RADIUS,
            morph_ease: MORPH_EASE,
            zoom_step: ZOOM_STEP,
            zoom_ease: ZOOM_EASE,
            base_distance: BASE_CAMERA_DISTANCE,
            scale_ease_shrink: SCALE_EASE_SHRINK,
            scale_ease_grow: SCALE_EASE_GROW,
        }
    }
}

/// Cumulative rotation of the current drag; fires once per drag past a full turn.
#[derive(Clone, Copy, Debug, Default)]
pub struct GestureAccumulator {
    pub cumulative_rotation: f32,
    pub has_triggered: bool,
}

impl GestureAccumulator {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Add a rotation delta; `true` exactly once when `|sum|` reaches `turn`.
    pub fn accumulate(&mut self, delta: f32, turn: f32) -> bool {
        self.cumulative_rotation += delta;
        if !self.has_triggered && self.cumulative_rotation.abs() >= turn {
            self.has_triggered = true;
            return true;
        }
        false
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ZoomState {
    pub target_distance: f32,
    pub initialized: bool,
    pub wheel_driven: bool,
}

#[derive(Clone, Copy, Debug)]
struct DragTrack {
    source: PointerSource,
    start: Vec2,
    last: Vec2,
    multi_touch: bool,
}

#[derive(Clone, Copy, Debug)]
enum PointerPhase {
    Idle,
    Dragging(DragTrack),
}

pub struct InteractionController {
    pub config: InteractionConfig,
    viewport: Vec2,
    phase: PointerPhase,
    gesture: GestureAccumulator,
    zoom: ZoomState,
    drive_rotation: f32,
    velocity: f32,
    to_model: bool,
    morph_factor: f32,
    smoothed_scale: f32,
    last_touch_ms: Option<f64>,
}

impl InteractionController {
    pub fn new(config: InteractionConfig, viewport: Vec2) -> Self {
        Self {
            config,
            viewport,
            phase: PointerPhase::Idle,
            gesture: GestureAccumulator::default(),
            zoom: ZoomState::default(),
            drive_rotation: 0.0,
            velocity: 0.0,
            to_model: false,
            morph_factor: 0.0,
            smoothed_scale: 1.0,
            last_touch_ms: None,
        }
    }

    pub fn set_viewport(&mut self, viewport: Vec2) {
        self.viewport = viewport;
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, PointerPhase::Dragging(_))
    }

    pub fn drive_rotation(&self) -> f32 {
        self.drive_rotation
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn morph_factor(&self) -> f32 {
        self.morph_factor
    }

    pub fn is_morphed(&self) -> bool {
        self.to_model
    }

    pub fn gesture(&self) -> GestureAccumulator {
        self.gesture
    }

    pub fn zoom(&self) -> ZoomState {
        self.zoom
    }

    pub fn smoothed_scale(&self) -> f32 {
        self.smoothed_scale
    }

    /// Mouse events that are really touch emulation arrive shortly after a touch.
    fn is_emulated(&mut self, source: PointerSource, now_ms: f64) -> bool {
        match source {
            PointerSource::Touch => {
                self.last_touch_ms = Some(now_ms);
                false
            }
            PointerSource::Mouse => self
                .last_touch_ms
                .is_some_and(|t| now_ms - t < self.config.touch_mouse_guard_ms),
        }
    }

    pub fn pointer_down(&mut self, pos: Vec2, source: PointerSource, now_ms: f64) {
        if self.is_emulated(source, now_ms) {
            return;
        }
        self.phase = PointerPhase::Dragging(DragTrack {
            source,
            start: pos,
            last: pos,
            multi_touch: false,
        });
        self.velocity = 0.0;
        self.gesture.reset();
    }

    /// Number of active touches changed; a second finger cancels the ring gesture.
    pub fn touch_count_changed(&mut self, touches: usize) {
        if touches > 1 {
            if let PointerPhase::Dragging(track) = &mut self.phase {
                if !track.multi_touch {
                    log::info!("[input] multi-touch, ring gesture discarded");
                }
                track.multi_touch = true;
                self.velocity = 0.0;
            }
        }
    }

    /// Track a drag step. Returns the accepted pointer step so the caller can
    /// also orbit the camera with it; `None` when the move is not part of the
    /// current single-pointer drag.
    pub fn pointer_move(
        &mut self,
        pos: Vec2,
        source: PointerSource,
        now_ms: f64,
        out: &mut Vec<InteractionEvent>,
    ) -> Option<Vec2> {
        if self.is_emulated(source, now_ms) {
            return None;
        }
        let PointerPhase::Dragging(track) = &mut self.phase else {
            return None;
        };
        if track.multi_touch || track.source != source {
            return None;
        }
        let prev = track.last;
        track.last = pos;

        if let Some(delta) = rotation_delta(
            self.viewport * 0.5,
            prev,
            pos,
            self.config.center_dead_zone_px,
            self.config.rotate_sensitivity,
        ) {
            self.drive_rotation += delta;
            self.velocity = delta;
            if self.gesture.accumulate(delta, self.config.submit_turn) {
                log::info!("[input] full turn, submit");
                out.push(InteractionEvent::Submit);
            }
        }
        Some(pos - prev)
    }

    /// Orbit the camera by hand. This is a manual camera move, so the zoom
    /// target follows the camera instead of pulling it back.
    pub fn orbit(&mut self, step_px: Vec2, camera: &mut OrbitCamera) {
        if step_px == Vec2::ZERO {
            return;
        }
        camera.orbit_by(step_px, self.viewport.y);
        self.resync_zoom(camera.distance());
    }

    pub fn pointer_up(
        &mut self,
        pos: Vec2,
        source: PointerSource,
        now_ms: f64,
        camera: &Camera,
        out: &mut Vec<InteractionEvent>,
    ) {
        if self.is_emulated(source, now_ms) {
            return;
        }
        let PointerPhase::Dragging(track) = self.phase else {
            return;
        };
        if track.source != source {
            return;
        }
        self.phase = PointerPhase::Idle;
        if track.multi_touch {
            return;
        }
        if pos.distance(track.start) < self.config.click_threshold_px {
            self.resolve_click(pos, camera, out);
        }
    }

    /// Drop the current drag without resolving a click (pointer lost, cancel).
    pub fn pointer_cancel(&mut self) {
        self.phase = PointerPhase::Idle;
    }

    fn resolve_click(&mut self, pos: Vec2, camera: &Camera, out: &mut Vec<InteractionEvent>) {
        let Some((ro, rd)) = camera.screen_ray(pos, self.viewport) else {
            return;
        };
        if ray_sphere(ro, rd, Vec3::ZERO, self.config.sphere_radius).is_none() {
            return;
        }
        if !self.to_model {
            out.push(InteractionEvent::SelectModel);
        }
        self.to_model = !self.to_model;
        log::info!("[input] sphere clicked, morph to model: {}", self.to_model);
        out.push(InteractionEvent::MorphToggled {
            to_model: self.to_model,
        });
    }

    /// Multiply the zoom target by a fixed step; only the sign of `delta_y` matters.
    pub fn wheel(&mut self, delta_y: f32, current_distance: f32, limits: (f32, f32)) {
        if delta_y == 0.0 || !delta_y.is_finite() {
            return;
        }
        if !self.zoom.initialized {
            self.zoom.target_distance = current_distance;
            self.zoom.initialized = true;
        }
        let step = self.config.zoom_step;
        let next = if delta_y > 0.0 {
            self.zoom.target_distance * step
        } else {
            self.zoom.target_distance / step
        };
        self.zoom.target_distance = next.clamp(limits.0, limits.1);
        self.zoom.wheel_driven = true;
    }

    /// Manual camera moves (pinch, rotate) take over the zoom target.
    pub fn resync_zoom(&mut self, current_distance: f32) {
        self.zoom.target_distance = current_distance;
        self.zoom.initialized = true;
        self.zoom.wheel_driven = false;
    }

    /// Per-frame advance. Returns the ring system scale for this frame.
    pub fn update(&mut self, dt_sec: f32, time: f32, camera: &mut OrbitCamera, base_scale: f32) -> f32 {
        self.step_morph(dt_sec);
        self.step_inertia(dt_sec, time);
        self.step_zoom(dt_sec, camera);
        self.step_scale(dt_sec, camera.distance());
        base_scale * self.smoothed_scale
    }

    fn step_morph(&mut self, dt_sec: f32) {
        let target = if self.to_model { 1.0 } else { 0.0 };
        let diff = target - self.morph_factor;
        if diff.abs() > MORPH_SETTLE_EPS {
            self.morph_factor += diff * ease_alpha(self.config.morph_ease, dt_sec);
        }
    }

    fn step_inertia(&mut self, dt_sec: f32, time: f32) {
        if self.is_dragging() {
            return;
        }
        let frames = dt_sec * REFERENCE_FPS;
        self.drive_rotation += self.velocity * frames;
        self.velocity *= decay_factor(self.config.inertia_decay, dt_sec);
        if self.velocity.abs() < self.config.velocity_epsilon {
            self.velocity = 0.0;
            self.drive_rotation +=
                (time * IDLE_WOBBLE_FREQUENCY).sin() * IDLE_WOBBLE_AMPLITUDE * frames;
        }
    }

    fn step_zoom(&mut self, dt_sec: f32, camera: &mut OrbitCamera) {
        if !self.zoom.initialized {
            return;
        }
        let current = camera.distance();
        let diff = self.zoom.target_distance - current;
        if diff.abs() > ZOOM_SETTLE_EPS {
            camera.set_distance(current + diff * ease_alpha(self.config.zoom_ease, dt_sec));
        }
    }

    fn step_scale(&mut self, dt_sec: f32, distance: f32) {
        let target = self.config.base_distance / distance.max(MIN_SCALE_DISTANCE);
        let rate = if target < self.smoothed_scale {
            self.config.scale_ease_shrink
        } else {
            self.config.scale_ease_grow
        };
        self.smoothed_scale += (target - self.smoothed_scale) * ease_alpha(rate, dt_sec);
    }
}

/// Tangential rotation for a pointer step around `center`.
///
/// Uses the 2D cross product of the radius vector and the displacement divided by
/// the squared radius, so the angular rate does not depend on distance from the
/// centre. Screen space is y-down, hence the sign flip for a counter-clockwise
/// positive world rotation. `None` inside the dead zone.
#[inline]
pub fn rotation_delta(
    center: Vec2,
    prev: Vec2,
    pos: Vec2,
    dead_zone_px: f32,
    sensitivity: f32,
) -> Option<f32> {
    let r = pos - center;
    let len_sq = r.length_squared();
    if len_sq < dead_zone_px * dead_zone_px {
        return None;
    }
    let d = pos - prev;
    Some(-r.perp_dot(d) / len_sq * sensitivity)
}
