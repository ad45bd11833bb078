//! Camera description and picking math shared by input handling and rendering.

use crate::constants::*;
use glam::{Mat4, Vec2, Vec3, Vec4};

/// Right-handed perspective camera looking at the particle sphere.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    /// Clip-space projection.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }
    /// World to view transform.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.eye).normalize_or_zero()
    }

    /// World-space ray through a pointer position.
    ///
    /// - `px`: pointer position in CSS pixels, origin top-left
    /// - `viewport`: viewport size in the same units
    ///
    /// Returns `(ray_origin, ray_direction)`, or `None` for an empty viewport.
    pub fn screen_ray(&self, px: Vec2, viewport: Vec2) -> Option<(Vec3, Vec3)> {
        if viewport.x <= 0.0 || viewport.y <= 0.0 {
            return None;
        }
        let ndc_x = (2.0 * px.x / viewport.x) - 1.0;
        let ndc_y = 1.0 - (2.0 * px.y / viewport.y);
        let inv = (self.projection_matrix() * self.view_matrix()).inverse();
        let p_far = inv * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);
        if p_far.w.abs() < f32::EPSILON {
            return None;
        }
        let p1: Vec3 = p_far.truncate() / p_far.w;
        let rd = (p1 - self.eye).try_normalize()?;
        Some((self.eye, rd))
    }
}

/// Nearest non-negative hit distance of a ray against a sphere.
///
/// A ray starting inside the sphere reports the exit point.
#[inline]
pub fn ray_sphere(ray_origin: Vec3, ray_dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray_origin - center;
    let b = oc.dot(ray_dir);
    let c = oc.dot(oc) - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let root = disc.sqrt();
    let near = -b - root;
    if near >= 0.0 {
        return Some(near);
    }
    let far = -b + root;
    (far >= 0.0).then_some(far)
}

/// Intersection of a ray with the plane through `point` with normal `normal`.
#[inline]
pub fn ray_plane(ray_origin: Vec3, ray_dir: Vec3, normal: Vec3, point: Vec3) -> Option<Vec3> {
    let denom = normal.dot(ray_dir);
    if denom.abs() < 1e-6 {
        return None;
    }
    let t = (point - ray_origin).dot(normal) / denom;
    (t >= 0.0).then(|| ray_origin + ray_dir * t)
}

/// Plane an elastic drag is measured on. Fixed when the drag starts, so an
/// auto-rotating camera does not drag the pinned point along with it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragPlane {
    pub normal: Vec3,
    pub point: Vec3,
}

impl DragPlane {
    /// Plane through `point` facing `camera`.
    pub fn facing(camera: &Camera, point: Vec3) -> Self {
        Self {
            normal: -camera.forward(),
            point,
        }
    }

    /// Where the pointer ray at `pos` (CSS px) meets the plane.
    pub fn pick(&self, camera: &Camera, pos: Vec2, viewport: Vec2) -> Option<Vec3> {
        let (origin, dir) = camera.screen_ray(pos, viewport)?;
        ray_plane(origin, dir, self.normal, self.point)
    }
}

/// Orbit camera around a fixed target: slow auto-rotation, damped drag orbit,
/// distance owned by zoom.
#[derive(Clone, Debug)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub azimuth: f32,
    pub polar: f32,
    pub aspect: f32,
    pub auto_rotate: bool,
    /// Orbit still to be applied, (azimuth, polar) in radians.
    pending: Vec2,
    distance: f32,
    min_distance: f32,
    max_distance: f32,
}

impl OrbitCamera {
    pub fn new(distance: f32, aspect: f32) -> Self {
        Self {
            target: Vec3::ZERO,
            azimuth: 0.0,
            polar: std::f32::consts::FRAC_PI_2,
            aspect,
            auto_rotate: true,
            pending: Vec2::ZERO,
            distance: distance.clamp(MIN_CAMERA_DISTANCE, MAX_CAMERA_DISTANCE),
            min_distance: MIN_CAMERA_DISTANCE,
            max_distance: MAX_CAMERA_DISTANCE,
        }
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn distance_limits(&self) -> (f32, f32) {
        (self.min_distance, self.max_distance)
    }

    pub fn set_distance(&mut self, distance: f32) {
        if distance.is_finite() {
            self.distance = distance.clamp(self.min_distance, self.max_distance);
        }
    }

    /// Scale the distance by a pinch ratio (`previous_span / current_span`).
    pub fn pinch(&mut self, ratio: f32) {
        if ratio.is_finite() && ratio > 0.0 {
            self.set_distance(self.distance * ratio);
        }
    }

    /// Queue an orbit for a pointer step of `delta_px`. Dragging right turns the
    /// camera left around the target, dragging down lifts it.
    pub fn orbit_by(&mut self, delta_px: Vec2, viewport_height: f32) {
        if !delta_px.is_finite() || viewport_height <= 0.0 {
            return;
        }
        let per_px = std::f32::consts::TAU / viewport_height * ORBIT_ROTATE_SPEED;
        self.pending -= delta_px * per_px;
    }

    pub fn is_orbiting(&self) -> bool {
        self.pending.abs().max_element() > ORBIT_SETTLE_EPS
    }

    pub fn advance(&mut self, dt_sec: f32) {
        if self.auto_rotate {
            // one full orbit per minute at speed 1.0
            self.azimuth -= std::f32::consts::TAU / 60.0 * AUTO_ROTATE_SPEED * dt_sec;
        }
        if self.is_orbiting() {
            let step = self.pending * ease_alpha(ORBIT_DAMPING, dt_sec);
            self.azimuth += step.x;
            self.polar = (self.polar + step.y).clamp(POLAR_MIN, POLAR_MAX);
            self.pending -= step;
        } else {
            self.pending = Vec2::ZERO;
        }
    }

    pub fn eye(&self) -> Vec3 {
        let (sp, cp) = self.polar.sin_cos();
        let (sa, ca) = self.azimuth.sin_cos();
        self.target + Vec3::new(sp * sa, cp, sp * ca) * self.distance
    }

    pub fn camera(&self) -> Camera {
        Camera {
            eye: self.eye(),
            target: self.target,
            up: Vec3::Y,
            aspect: self.aspect.max(1e-3),
            fovy_radians: CAMERA_FOVY_DEG.to_radians(),
            znear: CAMERA_ZNEAR,
            zfar: CAMERA_ZFAR,
        }
    }
}

/// Initial camera distance for a viewport aspect ratio; portrait screens start further away.
#[inline]
pub fn distance_for_aspect(aspect: f32) -> f32 {
    if aspect < 1.0 {
        BASE_CAMERA_DISTANCE * PORTRAIT_DISTANCE_FACTOR
    } else {
        BASE_CAMERA_DISTANCE
    }
}
