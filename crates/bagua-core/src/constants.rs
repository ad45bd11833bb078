// Shared tuning constants for the particle field, the bagua rings and input handling.
//
// Rates named `*_EASE`, `*_DECAY` or `*_RETURN` are fractions per reference frame
// (see `REFERENCE_FPS`); `ease_alpha` converts them for arbitrary frame times.

// Timing
pub const REFERENCE_FPS: f32 = 60.0; // frame rate the per-frame rates were tuned at

// Particle field
pub const PARTICLE_COUNT_DESKTOP: usize = 400_000;
pub const PARTICLE_COUNT_MOBILE: usize = 150_000;
pub const MOBILE_WIDTH_PX: f32 = 768.0; // CSS width below which a viewport counts as mobile
pub const SHELL_RADIUS: f32 = 1.2; // inner radius of the idle sphere shell
pub const SHELL_THICKNESS: f32 = 0.3; // extra radius, biased toward the inner surface
pub const NOISE_STRENGTH_SPHERE: f32 = 0.2; // radial noise amplitude at morph 0
pub const NOISE_STRENGTH_MODEL: f32 = 0.05; // radial noise amplitude at morph 1
pub const POINT_WORLD_SIZE: f32 = 0.0075; // sprite half-size in world units

// Model sampling
pub const MODEL_TARGET_SIZE: f32 = 4.0; // longest bounding-box side after normalization

// Morphing
pub const MORPH_EASE: f32 = 0.02;
pub const MORPH_SETTLE_EPS: f32 = 0.001; // stop easing once this close to the target

// Bagua rings
pub const RING_COUNT: usize = 9;
pub const MAX_RING_COUNT: usize = 16; // size of the shader's ring uniform array
pub const RING_BASE_GLYPHS: usize = 8;
pub const RING_BASE_RADIUS: f32 = 5.0;
pub const RING_SPACING: f32 = 1.6; // radial distance between consecutive rings
pub const GLYPH_LINE_WIDTH: f32 = 1.2;
pub const GLYPH_LINE_HEIGHT: f32 = 0.15;
pub const GLYPH_LINE_GAP: f32 = 0.25; // vertical gap between stacked lines
pub const GLYPH_BROKEN_GAP: f32 = 0.2; // horizontal gap inside a broken line
pub const GLYPH_ARC_FILL: f32 = 0.8; // max share of the arc per glyph a glyph may cover
pub const RING_BASE_RATE: f32 = 0.15; // ring 0 approach rate toward the drive rotation
pub const RING_RATE_FALLOFF: f32 = 0.6; // each outer ring approaches this much slower
pub const RING_WAKE_SPEED: f32 = 0.03; // rad/s of the inner ring that keeps a ring visible
pub const RING_FADE_IN: f32 = 0.08;
pub const RING_FADE_OUT: f32 = 0.02;
pub const RING_DORMANT_OPACITY: f32 = 0.001; // below this a ring is not drawn
pub const BREATHE_AMPLITUDE: f32 = 0.01; // radians
pub const BREATHE_FREQUENCY: f32 = 0.3; // rad/s of the breathing sine
pub const BREATHE_PHASE_STEP: f32 = 0.7; // phase offset between consecutive rings
pub const RING_BASE_SCALE: f32 = 1.5;
pub const RING_PORTRAIT_FACTOR: f32 = 0.55;
pub const RING_DEPTH: f32 = -20.0; // camera-space z of the ring plane

// Pointer interaction
pub const CLICK_THRESHOLD_PX: f32 = 10.0;
pub const CENTER_DEAD_ZONE_PX: f32 = 10.0;
pub const ROTATE_SENSITIVITY: f32 = 1.0; // 1.0 = ring follows the pointer angle exactly
pub const TOUCH_MOUSE_GUARD_MS: f64 = 600.0;
pub const INERTIA_DECAY: f32 = 0.97;
pub const VELOCITY_EPSILON: f32 = 1e-5; // rad per frame
pub const IDLE_WOBBLE_AMPLITUDE: f32 = 0.001;
pub const IDLE_WOBBLE_FREQUENCY: f32 = 0.5;
pub const SUBMIT_TURN: f32 = std::f32::consts::TAU;
pub const INTERACTION_SPHERE_RADIUS: f32 = 2.5;

// Camera and zoom
pub const CAMERA_FOVY_DEG: f32 = 50.0;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 100.0;
pub const BASE_CAMERA_DISTANCE: f32 = 4.5;
pub const PORTRAIT_DISTANCE_FACTOR: f32 = 1.8;
pub const MIN_CAMERA_DISTANCE: f32 = 0.5;
pub const MAX_CAMERA_DISTANCE: f32 = 20.0;
pub const ZOOM_STEP: f32 = 1.1;
pub const ZOOM_EASE: f32 = 0.08;
pub const ZOOM_SETTLE_EPS: f32 = 0.01;
pub const AUTO_ROTATE_SPEED: f32 = 0.15; // 1.0 = one orbit per minute
pub const ORBIT_ROTATE_SPEED: f32 = 1.0; // a drag across the viewport height turns 2π
pub const ORBIT_DAMPING: f32 = 0.03; // share of the pending orbit applied per frame
pub const ORBIT_SETTLE_EPS: f32 = 1e-5; // rad
pub const POLAR_MIN: f32 = 0.05; // rad from the pole
pub const POLAR_MAX: f32 = std::f32::consts::PI - 0.05;
pub const SCALE_EASE_SHRINK: f32 = 0.02;
pub const SCALE_EASE_GROW: f32 = 0.008;
pub const MIN_SCALE_DISTANCE: f32 = 0.1;

// Elastic drag
pub const ELASTIC_RETURN: f32 = 0.05;
pub const DRAG_RADIUS: f32 = 1.0; // world-space radius of influence in the shader
pub const MAX_DRAG_OFFSET: f32 = 1.0;
pub const DRAG_RESISTANCE: f32 = 0.4;
pub const SLOT_ACTIVE_EPS: f32 = 0.001; // squared length
pub const SLOT_REST_EPS: f32 = 0.0001; // squared length

// Orientation parallax
pub const TILT_SENSITIVITY: f32 = 0.005; // radians per degree of tilt
pub const RING_TILT_ATTENUATION: f32 = 0.5;
pub const TILT_EASE: f32 = 0.05;

// Ticker timings (seconds)
pub const TICKER_FADE_SEC: f32 = 1.5;
pub const TICKER_HOLD_SEC: f32 = 5.0;
pub const TICKER_GAP_SEC: f32 = 0.1;
pub const RESPONSE_HOLD_MIN_SEC: f32 = 2.5;
pub const RESPONSE_HOLD_MAX_SEC: f32 = 8.0;
pub const RESPONSE_HOLD_PER_CHAR_SEC: f32 = 0.12;

// Oracle
pub const DAILY_REQUEST_CAP: u32 = 5;
pub const ORACLE_TIMEOUT_MS: u32 = 10_000;
pub const DEFAULT_ORACLE_ENDPOINT: &str = "/api";

// Rotation hum
pub const HUM_ATTACK: f32 = 0.3;
pub const HUM_RELEASE_SEC: f32 = 0.5;
pub const HUM_FULL_SPEED: f32 = 2.0; // rad/s at which the hum reaches full gain
pub const HUM_SILENCE: f32 = 0.01; // speeds below this (rad/s) release the hum

/// Convert a per-reference-frame easing rate into the blend factor for `dt_sec`.
///
/// At exactly one reference frame this returns `rate`; longer frames ease further,
/// so motion speed does not depend on the display refresh rate.
#[inline]
pub fn ease_alpha(rate: f32, dt_sec: f32) -> f32 {
    let frames = (dt_sec * REFERENCE_FPS).max(0.0);
    1.0 - (1.0 - rate.clamp(0.0, 1.0)).powf(frames)
}

/// Geometric per-frame decay factor scaled to `dt_sec`.
#[inline]
pub fn decay_factor(per_frame: f32, dt_sec: f32) -> f32 {
    per_frame.clamp(0.0, 1.0).powf((dt_sec * REFERENCE_FPS).max(0.0))
}
