use crate::constants::*;
use glam::Vec2;

#[derive(Clone, Debug)]
pub struct ParallaxConfig {
    pub sensitivity: f32,
    pub ring_attenuation: f32,
    pub ease: f32,
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        Self {
            sensitivity: TILT_SENSITIVITY,
            ring_attenuation: RING_TILT_ATTENUATION,
            ease: TILT_EASE,
        }
    }
}

/// Device tilt mapped to small eased rotations of the particle field and the rings.
///
/// Rotations are `(x, y)` pairs in radians: `x` from front/back tilt (beta),
/// `y` from left/right tilt (gamma), both relative to the first reading.
#[derive(Clone, Debug, Default)]
pub struct OrientationParallax {
    pub config: ParallaxConfig,
    baseline: Option<Vec2>,
    target: Vec2,
    particle_rotation: Vec2,
    ring_rotation: Vec2,
}

impl OrientationParallax {
    pub fn new(config: ParallaxConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Feed one orientation reading in degrees.
    pub fn on_orientation(&mut self, beta: f32, gamma: f32) {
        if !beta.is_finite() || !gamma.is_finite() {
            return;
        }
        let reading = Vec2::new(beta, gamma);
        let baseline = *self.baseline.get_or_insert(reading);
        self.target = (reading - baseline) * self.config.sensitivity;
    }

    /// Next reading becomes the new baseline; current rotations ease back to it.
    pub fn reset_baseline(&mut self) {
        self.baseline = None;
        self.target = Vec2::ZERO;
    }

    pub fn update(&mut self, dt_sec: f32) {
        let alpha = ease_alpha(self.config.ease, dt_sec);
        self.particle_rotation += (self.target - self.particle_rotation) * alpha;
        let ring_target = self.target * self.config.ring_attenuation;
        self.ring_rotation += (ring_target - self.ring_rotation) * alpha;
    }

    pub fn target(&self) -> Vec2 {
        self.target
    }

    pub fn particle_rotation(&self) -> Vec2 {
        self.particle_rotation
    }

    pub fn ring_rotation(&self) -> Vec2 {
        self.ring_rotation
    }
}
