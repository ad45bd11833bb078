use bagua_core::constants::*;
use bagua_core::parallax::*;
use glam::Vec2;

const DT: f32 = 1.0 / 60.0;

#[test]
fn first_reading_is_the_baseline() {
    let mut p = OrientationParallax::default();
    p.on_orientation(45.0, -10.0);
    assert_eq!(p.target(), Vec2::ZERO);
    p.on_orientation(55.0, -10.0);
    assert!((p.target().x - 10.0 * TILT_SENSITIVITY).abs() < 1e-6);
    assert_eq!(p.target().y, 0.0);
}

#[test]
fn rotations_ease_towards_target_and_rings_move_less() {
    let mut p = OrientationParallax::default();
    p.on_orientation(0.0, 0.0);
    p.on_orientation(20.0, 20.0);
    p.update(DT);
    let first = p.particle_rotation();
    assert!(first.x > 0.0 && first.x < p.target().x);
    for _ in 0..1200 {
        p.update(DT);
    }
    assert!((p.particle_rotation() - p.target()).length() < 1e-4);
    let rings = p.ring_rotation();
    assert!((rings - p.target() * RING_TILT_ATTENUATION).length() < 1e-4);
    assert!(rings.length() < p.particle_rotation().length());
}

#[test]
fn reset_takes_next_reading_as_baseline() {
    let mut p = OrientationParallax::default();
    p.on_orientation(0.0, 0.0);
    p.on_orientation(30.0, 0.0);
    p.reset_baseline();
    assert_eq!(p.target(), Vec2::ZERO);
    p.on_orientation(30.0, 0.0);
    assert_eq!(p.target(), Vec2::ZERO);
}

#[test]
fn non_finite_readings_are_dropped() {
    let mut p = OrientationParallax::default();
    p.on_orientation(f32::NAN, 0.0);
    p.on_orientation(10.0, 10.0);
    assert_eq!(p.target(), Vec2::ZERO);
}
