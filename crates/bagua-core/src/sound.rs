use crate::constants::*;

/// Gain of the rotation loop, following how fast the rings turn.
///
/// Rises quickly towards a speed-proportional target and falls linearly, so
/// a full-gain hum fades to silence over `release_sec` once the rings stop.
#[derive(Clone, Debug)]
pub struct HumEnvelope {
    pub attack: f32,
    pub release_sec: f32,
    pub full_speed: f32,
    gain: f32,
}

impl Default for HumEnvelope {
    fn default() -> Self {
        Self {
            attack: HUM_ATTACK,
            release_sec: HUM_RELEASE_SEC,
            full_speed: HUM_FULL_SPEED,
            gain: 0.0,
        }
    }
}

impl HumEnvelope {
    pub fn gain(&self) -> f32 {
        self.gain
    }

    pub fn is_audible(&self) -> bool {
        self.gain > 0.0
    }

    /// Advance with the current angular speed (rad/s); returns the new gain.
    pub fn update(&mut self, angular_speed: f32, dt_sec: f32) -> f32 {
        let speed = angular_speed.abs();
        let target = if speed > HUM_SILENCE {
            (speed / self.full_speed.max(1e-3)).min(1.0)
        } else {
            0.0
        };
        if target > self.gain {
            self.gain += (target - self.gain) * ease_alpha(self.attack, dt_sec);
        } else {
            let step = dt_sec.max(0.0) / self.release_sec.max(1e-3);
            self.gain = (self.gain - step).max(target);
        }
        self.gain
    }
}
