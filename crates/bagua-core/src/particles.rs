use crate::constants::*;
use glam::Vec3;
use rand::Rng;

/// Per-particle data as uploaded to the GPU instance buffer.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ParticleVertex {
    pub base: [f32; 3],
    pub seed: f32,
    pub target: [f32; 3],
    pub _pad: f32,
}

/// Fixed-size point cloud that blends between an idle sphere shell and a morph target.
///
/// Base positions are written once in [`ParticleField::create`]; only targets and the
/// global morph factor change afterwards. Displacement and colour are evaluated in
/// the particle shader from `time` and `morph_factor`.
pub struct ParticleField {
    base: Vec<Vec3>,
    targets: Vec<Vec3>,
    seeds: Vec<f32>,
    morph_factor: f32,
    time: f32,
    targets_dirty: bool,
}

impl ParticleField {
    pub fn create<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Self {
        let mut base = Vec::with_capacity(count);
        let mut seeds = Vec::with_capacity(count);
        for _ in 0..count {
            base.push(shell_point(rng));
            seeds.push(rng.gen::<f32>());
        }
        let targets = base.clone();
        Self {
            base,
            targets,
            seeds,
            morph_factor: 0.0,
            time: 0.0,
            targets_dirty: true,
        }
    }

    pub fn len(&self) -> usize {
        self.base.len()
    }

    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
    }

    /// Re-point every particle at `points[i mod (points.len() / 3)]`.
    ///
    /// Returns `false` (and leaves targets untouched) when the buffer holds no
    /// complete point.
    pub fn set_morph_target(&mut self, points: &[f32]) -> bool {
        let available = points.len() / 3;
        if available == 0 {
            return false;
        }
        for (i, target) in self.targets.iter_mut().enumerate() {
            let src = (i % available) * 3;
            *target = Vec3::new(points[src], points[src + 1], points[src + 2]);
        }
        self.targets_dirty = true;
        true
    }

    pub fn set_morph_factor(&mut self, factor: f32) {
        self.morph_factor = factor;
    }

    pub fn morph_factor(&self) -> f32 {
        self.morph_factor
    }

    pub fn advance(&mut self, time: f32) {
        self.time = time;
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn base_positions(&self) -> &[Vec3] {
        &self.base
    }

    pub fn targets(&self) -> &[Vec3] {
        &self.targets
    }

    /// Undisplaced position of particle `i` at the current morph factor.
    pub fn blended_position(&self, i: usize) -> Option<Vec3> {
        Some(self.base.get(i)?.lerp(*self.targets.get(i)?, self.morph_factor))
    }

    /// Packed vertices, clearing the dirty flag. `None` when nothing changed.
    pub fn take_gpu_update(&mut self) -> Option<Vec<ParticleVertex>> {
        if !self.targets_dirty {
            return None;
        }
        self.targets_dirty = false;
        Some(self.gpu_vertices())
    }

    pub fn gpu_vertices(&self) -> Vec<ParticleVertex> {
        self.base
            .iter()
            .zip(&self.targets)
            .zip(&self.seeds)
            .map(|((b, t), s)| ParticleVertex {
                base: b.to_array(),
                seed: *s,
                target: t.to_array(),
                _pad: 0.0,
            })
            .collect()
    }
}

/// Radial noise amplitude for a morph factor: shapes read cleaner than the idle sphere.
#[inline]
pub fn noise_strength(morph_factor: f32) -> f32 {
    NOISE_STRENGTH_SPHERE + (NOISE_STRENGTH_MODEL - NOISE_STRENGTH_SPHERE) * morph_factor
}

fn shell_point<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let r = SHELL_RADIUS + rng.gen::<f32>().powi(2) * SHELL_THICKNESS;
    let theta = rng.gen::<f32>() * std::f32::consts::TAU;
    let phi = (2.0 * rng.gen::<f32>() - 1.0).clamp(-1.0, 1.0).acos();
    Vec3::new(
        r * phi.sin() * theta.cos(),
        r * phi.sin() * theta.sin(),
        r * phi.cos(),
    )
}
