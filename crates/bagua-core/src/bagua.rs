//! Concentric trigram rings with chained, alternating-direction inertia.
//!
//! Ring 0 follows the drive rotation produced by pointer input. Every outer ring
//! chases the negated rotation its inner neighbour had on the previous frame, at
//! a rate that falls off with the layer index, so a spin unwinds outward in
//! alternating directions. Outer rings only become visible while their inner
//! neighbour is moving.

use crate::constants::*;
use glam::Vec2;
use rand::Rng;
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Line {
    Solid,
    Broken,
}

/// Three stacked lines, listed top to bottom.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Trigram {
    pub lines: [Line; 3],
}

impl Trigram {
    /// Build from three bits, top line first; `1` is a solid line.
    pub const fn from_bits(top: u8, middle: u8, bottom: u8) -> Self {
        const fn line(bit: u8) -> Line {
            if bit == 1 {
                Line::Solid
            } else {
                Line::Broken
            }
        }
        Self {
            lines: [line(top), line(middle), line(bottom)],
        }
    }
}

/// The eight trigrams in the fixed order used by the innermost ring.
pub const CANONICAL_TRIGRAMS: [Trigram; 8] = [
    Trigram::from_bits(1, 1, 1), // qian
    Trigram::from_bits(0, 1, 1), // dui
    Trigram::from_bits(1, 0, 1), // li
    Trigram::from_bits(0, 0, 1), // zhen
    Trigram::from_bits(1, 1, 0), // xun
    Trigram::from_bits(0, 1, 0), // kan
    Trigram::from_bits(1, 0, 0), // gen
    Trigram::from_bits(0, 0, 0), // kun
];

/// Axis-aligned rectangle in glyph-local space, centred glyph at the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineRect {
    pub center: Vec2,
    pub half_size: Vec2,
}

/// Rectangles making up one glyph: a solid line is one rect, a broken line two.
pub fn trigram_rects(trigram: &Trigram) -> SmallVec<[LineRect; 6]> {
    let mut rects = SmallVec::new();
    let pitch = GLYPH_LINE_HEIGHT + GLYPH_LINE_GAP;
    let half_h = GLYPH_LINE_HEIGHT * 0.5;
    for (i, line) in trigram.lines.iter().enumerate() {
        let y = (1.0 - i as f32) * pitch;
        match line {
            Line::Solid => rects.push(LineRect {
                center: Vec2::new(0.0, y),
                half_size: Vec2::new(GLYPH_LINE_WIDTH * 0.5, half_h),
            }),
            Line::Broken => {
                let segment = (GLYPH_LINE_WIDTH - GLYPH_BROKEN_GAP) * 0.5;
                let dx = (segment + GLYPH_BROKEN_GAP) * 0.5;
                for sign in [-1.0, 1.0] {
                    rects.push(LineRect {
                        center: Vec2::new(sign * dx, y),
                        half_size: Vec2::new(segment * 0.5, half_h),
                    });
                }
            }
        }
    }
    rects
}

#[derive(Clone, Debug)]
pub struct RingConfig {
    pub ring_count: usize,
    pub base_radius: f32,
    pub spacing: f32,
    pub base_rate: f32,
    pub rate_falloff: f32,
    pub wake_speed: f32,
    pub fade_in: f32,
    pub fade_out: f32,
    pub breathe_amplitude: f32,
    pub breathe_frequency: f32,
    pub base_scale: f32,
    pub portrait_factor: f32,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            ring_count: RING_COUNT,
            base_radius: RING_BASE_RADIUS,
            spacing: RING_SPACING,
            base_rate: RING_BASE_RATE,
            rate_falloff: RING_RATE_FALLOFF,
            wake_speed: RING_WAKE_SPEED,
            fade_in: RING_FADE_IN,
            fade_out: RING_FADE_OUT,
            breathe_amplitude: BREATHE_AMPLITUDE,
            breathe_frequency: BREATHE_FREQUENCY,
            base_scale: RING_BASE_SCALE,
            portrait_factor: RING_PORTRAIT_FACTOR,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Ring {
    pub layer: usize,
    pub radius: f32,
    pub glyph_scale: f32,
    pub glyphs: Vec<Trigram>,
    /// Approach rate per reference frame; decreases with the layer index.
    pub rate: f32,
    rotation: f32,
    opacity: f32,
    angular_speed: f32,
    breathe_phase: f32,
}

impl Ring {
    /// Inertial rotation, unbounded.
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Angular speed over the last update, rad/s.
    pub fn angular_speed(&self) -> f32 {
        self.angular_speed
    }

    pub fn is_dormant(&self) -> bool {
        self.opacity < RING_DORMANT_OPACITY
    }

    /// Rotation as drawn: inertial rotation plus the idle breathing wobble.
    pub fn display_rotation(&self, time: f32, config: &RingConfig) -> f32 {
        self.rotation
            + (time * config.breathe_frequency + self.breathe_phase).sin()
                * config.breathe_amplitude
    }

    /// Glyph angle on the ring for glyph `index`.
    pub fn glyph_angle(&self, index: usize) -> f32 {
        index as f32 / self.glyphs.len().max(1) as f32 * std::f32::consts::TAU
    }
}

/// One rectangle instance for the ring renderer.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct RingRectInstance {
    pub offset: [f32; 2],
    pub half_size: [f32; 2],
    pub angle: f32,
    pub radius: f32,
    pub ring: u32,
    pub _pad: u32,
}

pub struct RingSystem {
    pub config: RingConfig,
    rings: Vec<Ring>,
    base_scale: f32,
    time: f32,
}

impl RingSystem {
    pub fn build<R: Rng + ?Sized>(config: RingConfig, rng: &mut R) -> Self {
        let ring_count = config.ring_count.min(MAX_RING_COUNT);
        let rings = (0..ring_count)
            .map(|layer| {
                let count = RING_BASE_GLYPHS << layer;
                let glyphs: Vec<Trigram> = if layer == 0 {
                    CANONICAL_TRIGRAMS.iter().copied().cycle().take(count).collect()
                } else {
                    (0..count)
                        .map(|_| CANONICAL_TRIGRAMS[rng.gen_range(0..CANONICAL_TRIGRAMS.len())])
                        .collect()
                };
                let radius = config.base_radius + layer as f32 * config.spacing;
                let arc = std::f32::consts::TAU * radius / count as f32;
                Ring {
                    layer,
                    radius,
                    glyph_scale: (arc * GLYPH_ARC_FILL / GLYPH_LINE_WIDTH).min(1.0),
                    glyphs,
                    rate: config.base_rate * config.rate_falloff.powi(layer as i32),
                    rotation: 0.0,
                    opacity: if layer == 0 { 1.0 } else { 0.0 },
                    angular_speed: 0.0,
                    breathe_phase: layer as f32 * BREATHE_PHASE_STEP,
                }
            })
            .collect::<Vec<_>>();
        log::info!(
            "[bagua] built {} rings, {} glyphs",
            rings.len(),
            rings.iter().map(|r| r.glyphs.len()).sum::<usize>()
        );
        let base_scale = config.base_scale;
        Self {
            config,
            rings,
            base_scale,
            time: 0.0,
        }
    }

    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    pub fn base_scale(&self) -> f32 {
        self.base_scale
    }

    pub fn update(&mut self, drive_rotation: f32, time: f32, dt_sec: f32) {
        self.time = time;
        let config = &self.config;
        let dt = dt_sec.max(1e-4);
        // inner neighbour's rotation before this frame's update, and its speed this frame
        let mut inner: Option<(f32, f32)> = None;

        for ring in &mut self.rings {
            let before = ring.rotation;
            let target = inner.map_or(drive_rotation, |(prev, _)| -prev);
            ring.rotation += (target - ring.rotation) * ease_alpha(ring.rate, dt_sec);
            ring.angular_speed = (ring.rotation - before).abs() / dt;

            let goal = match inner {
                None => 1.0,
                Some((_, inner_speed)) if inner_speed > config.wake_speed => 1.0,
                Some(_) => 0.0,
            };
            let rate = if goal > ring.opacity {
                config.fade_in
            } else {
                config.fade_out
            };
            ring.opacity += (goal - ring.opacity) * ease_alpha(rate, dt_sec);
            if ring.opacity < RING_DORMANT_OPACITY {
                ring.opacity = 0.0;
            }

            inner = Some((before, ring.angular_speed));
        }
    }

    /// Shrink the whole system on portrait viewports.
    pub fn resize(&mut self, aspect: f32) {
        self.base_scale = if aspect < 1.0 {
            self.config.base_scale * self.config.portrait_factor
        } else {
            self.config.base_scale
        };
    }

    /// `(display_rotation, opacity)` per ring, for the shader uniform array.
    pub fn ring_states(&self) -> impl Iterator<Item = (f32, f32)> + '_ {
        self.rings
            .iter()
            .map(|r| (r.display_rotation(self.time, &self.config), r.opacity))
    }

    pub fn rect_instances(&self) -> Vec<RingRectInstance> {
        let mut out = Vec::new();
        for ring in &self.rings {
            for (j, glyph) in ring.glyphs.iter().enumerate() {
                let angle = ring.glyph_angle(j);
                for rect in trigram_rects(glyph) {
                    out.push(RingRectInstance {
                        offset: (rect.center * ring.glyph_scale).to_array(),
                        half_size: (rect.half_size * ring.glyph_scale).to_array(),
                        angle,
                        radius: ring.radius,
                        ring: ring.layer as u32,
                        _pad: 0,
                    });
                }
            }
        }
        out
    }
}
