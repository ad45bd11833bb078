use crate::constants::*;
use glam::Vec3;

/// Centre and offset of one localized distortion fed to the particle shader.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DragSlot {
    pub center: Vec3,
    pub offset: Vec3,
}

impl DragSlot {
    fn decay(&mut self, alpha: f32) {
        self.offset = self.offset.lerp(Vec3::ZERO, alpha);
        if self.offset.length_squared() < SLOT_REST_EPS {
            self.offset = Vec3::ZERO;
        }
    }
}

#[derive(Clone, Debug)]
pub struct ElasticConfig {
    pub resistance: f32,
    pub max_offset: f32,
    pub return_rate: f32,
    pub radius: f32,
}

impl Default for ElasticConfig {
    fn default() -> Self {
        Self {
            resistance: DRAG_RESISTANCE,
            max_offset: MAX_DRAG_OFFSET,
            return_rate: ELASTIC_RETURN,
            radius: DRAG_RADIUS,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragMove {
    Ignored,
    Updated,
    /// Pulled past the maximum offset; the drag was released.
    Released,
}

/// Secondary-button rubber-band distortion with two independently decaying slots.
///
/// Slot 1 follows the active drag. Starting a new drag while slot 1 is still
/// displaced moves it into slot 2, which then relaxes on its own.
#[derive(Clone, Debug, Default)]
pub struct ElasticDrag {
    pub config: ElasticConfig,
    slots: [DragSlot; 2],
    start: Vec3,
    dragging: bool,
}

impl ElasticDrag {
    pub fn new(config: ElasticConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn slots(&self) -> &[DragSlot; 2] {
        &self.slots
    }

    pub fn drag_start(&mut self, point: Vec3) {
        if self.slots[0].offset.length_squared() > SLOT_ACTIVE_EPS {
            self.slots[1] = self.slots[0];
        }
        self.slots[0] = DragSlot {
            center: point,
            offset: Vec3::ZERO,
        };
        self.start = point;
        self.dragging = true;
    }

    pub fn drag_move(&mut self, point: Vec3) -> DragMove {
        if !self.dragging {
            return DragMove::Ignored;
        }
        let offset = (point - self.start) * self.config.resistance;
        self.slots[0].offset = offset;
        if offset.length() > self.config.max_offset {
            self.drag_end();
            return DragMove::Released;
        }
        DragMove::Updated
    }

    pub fn drag_end(&mut self) {
        self.dragging = false;
    }

    pub fn update(&mut self, dt_sec: f32) {
        let alpha = ease_alpha(self.config.return_rate, dt_sec);
        if !self.dragging {
            self.slots[0].decay(alpha);
        }
        self.slots[1].decay(alpha);
    }
}
