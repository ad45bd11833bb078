use bagua_core::camera::OrbitCamera;
use bagua_core::constants::*;
use bagua_core::interaction::*;
use glam::Vec2;

const DT: f32 = 1.0 / 60.0;
const VIEWPORT: Vec2 = Vec2::new(800.0, 600.0);

fn setup() -> (InteractionController, OrbitCamera) {
    (
        InteractionController::new(InteractionConfig::default(), VIEWPORT),
        OrbitCamera::new(BASE_CAMERA_DISTANCE, VIEWPORT.x / VIEWPORT.y),
    )
}

fn click(
    ctl: &mut InteractionController,
    orbit: &OrbitCamera,
    pos: Vec2,
    source: PointerSource,
    now_ms: f64,
) -> Vec<InteractionEvent> {
    let mut out = Vec::new();
    ctl.pointer_down(pos, source, now_ms);
    ctl.pointer_up(pos, source, now_ms + 80.0, &orbit.camera(), &mut out);
    out
}

/// Drag around the viewport centre, `degrees` in one-degree steps.
fn circle_drag(ctl: &mut InteractionController, degrees: usize) -> Vec<InteractionEvent> {
    let center = VIEWPORT * 0.5;
    let at = |deg: usize| {
        let a = (deg as f32).to_radians();
        center + Vec2::new(a.cos(), a.sin()) * 200.0
    };
    let mut out = Vec::new();
    ctl.pointer_down(at(0), PointerSource::Mouse, 0.0);
    for deg in 1..=degrees {
        ctl.pointer_move(at(deg), PointerSource::Mouse, deg as f64, &mut out);
    }
    ctl.pointer_cancel();
    out
}

#[test]
fn click_on_sphere_selects_model_then_toggles() {
    let (mut ctl, orbit) = setup();
    let events = click(&mut ctl, &orbit, Vec2::new(600.0, 300.0), PointerSource::Mouse, 0.0);
    assert_eq!(
        events,
        vec![
            InteractionEvent::SelectModel,
            InteractionEvent::MorphToggled { to_model: true }
        ]
    );
    assert!(ctl.is_morphed());

    let events = click(&mut ctl, &orbit, Vec2::new(400.0, 300.0), PointerSource::Mouse, 1000.0);
    assert_eq!(events, vec![InteractionEvent::MorphToggled { to_model: false }]);
    assert!(!ctl.is_morphed());
}

#[test]
fn click_outside_sphere_does_nothing() {
    let (mut ctl, orbit) = setup();
    let events = click(&mut ctl, &orbit, Vec2::new(799.0, 599.0), PointerSource::Mouse, 0.0);
    assert!(events.is_empty());
    assert!(!ctl.is_morphed());
}

#[test]
fn drag_beyond_threshold_is_not_a_click() {
    let (mut ctl, orbit) = setup();
    let mut out = Vec::new();
    ctl.pointer_down(Vec2::new(600.0, 300.0), PointerSource::Mouse, 0.0);
    ctl.pointer_move(Vec2::new(600.0, 400.0), PointerSource::Mouse, 10.0, &mut out);
    ctl.pointer_up(Vec2::new(600.0, 400.0), PointerSource::Mouse, 20.0, &orbit.camera(), &mut out);
    assert!(out.is_empty());
    assert!(!ctl.is_morphed());
    assert!(!ctl.is_dragging());
}

#[test]
fn small_jitter_still_counts_as_click() {
    let (mut ctl, orbit) = setup();
    let mut out = Vec::new();
    ctl.pointer_down(Vec2::new(400.0, 300.0), PointerSource::Mouse, 0.0);
    ctl.pointer_move(Vec2::new(404.0, 303.0), PointerSource::Mouse, 10.0, &mut out);
    ctl.pointer_up(Vec2::new(404.0, 303.0), PointerSource::Mouse, 20.0, &orbit.camera(), &mut out);
    assert!(out.contains(&InteractionEvent::MorphToggled { to_model: true }));
}

#[test]
fn full_turn_submits_once_per_drag() {
    let (mut ctl, _) = setup();
    let events = circle_drag(&mut ctl, 370);
    assert_eq!(events, vec![InteractionEvent::Submit]);
    assert!(ctl.gesture().has_triggered);

    let events = circle_drag(&mut ctl, 740);
    assert_eq!(events, vec![InteractionEvent::Submit]);
}

#[test]
fn partial_turn_does_not_submit() {
    let (mut ctl, _) = setup();
    let events = circle_drag(&mut ctl, 300);
    assert!(events.is_empty());
    assert!(ctl.gesture().cumulative_rotation.abs() > 4.0);
}

#[test]
fn gesture_accumulator_counts_either_direction() {
    let mut acc = GestureAccumulator::default();
    assert!(!acc.accumulate(-3.0, SUBMIT_TURN));
    assert!(acc.accumulate(-3.5, SUBMIT_TURN));
    assert!(!acc.accumulate(-3.5, SUBMIT_TURN));
    acc.reset();
    assert_eq!(acc.cumulative_rotation, 0.0);
    assert!(!acc.has_triggered);
}

#[test]
fn second_finger_discards_the_gesture() {
    let (mut ctl, orbit) = setup();
    let pos = Vec2::new(400.0, 300.0);
    let mut out = Vec::new();
    ctl.pointer_down(pos, PointerSource::Touch, 0.0);
    ctl.touch_count_changed(2);
    ctl.pointer_move(Vec2::new(600.0, 500.0), PointerSource::Touch, 10.0, &mut out);
    ctl.pointer_up(pos, PointerSource::Touch, 20.0, &orbit.camera(), &mut out);
    assert!(out.is_empty());
    assert_eq!(ctl.drive_rotation(), 0.0);
}

#[test]
fn emulated_mouse_after_touch_is_ignored() {
    let (mut ctl, orbit) = setup();
    let pos = Vec2::new(400.0, 300.0);
    let events = click(&mut ctl, &orbit, pos, PointerSource::Touch, 0.0);
    assert_eq!(events.len(), 2);
    let events = click(&mut ctl, &orbit, pos, PointerSource::Mouse, 150.0);
    assert!(events.is_empty());
    assert!(ctl.is_morphed());

    let events = click(&mut ctl, &orbit, pos, PointerSource::Mouse, 5_000.0);
    assert_eq!(events, vec![InteractionEvent::MorphToggled { to_model: false }]);
}

#[test]
fn rotation_delta_ignores_dead_zone_and_radius() {
    let center = Vec2::new(400.0, 300.0);
    assert!(rotation_delta(center, center, center + Vec2::new(3.0, 4.0), 10.0, 1.0).is_none());

    let step = |radius: f32| {
        let a0 = 0.0f32;
        let a1 = 0.05f32;
        let prev = center + Vec2::new(a0.cos(), a0.sin()) * radius;
        let pos = center + Vec2::new(a1.cos(), a1.sin()) * radius;
        rotation_delta(center, prev, pos, 10.0, 1.0).expect("outside dead zone")
    };
    assert!((step(50.0) - step(300.0)).abs() < 1e-5);
    // clockwise on a y-down screen is a negative world rotation
    assert!(step(100.0) < 0.0);
}

#[test]
fn released_drag_coasts_and_settles() {
    let (mut ctl, mut orbit) = setup();
    let mut out = Vec::new();
    ctl.pointer_down(Vec2::new(600.0, 300.0), PointerSource::Mouse, 0.0);
    ctl.pointer_move(Vec2::new(600.0, 320.0), PointerSource::Mouse, 16.0, &mut out);
    ctl.pointer_up(Vec2::new(600.0, 320.0), PointerSource::Mouse, 32.0, &orbit.camera(), &mut out);
    let velocity = ctl.velocity();
    assert!(velocity != 0.0);
    let released_at = ctl.drive_rotation();

    ctl.update(DT, 0.0, &mut orbit, 1.0);
    let after_one = ctl.drive_rotation();
    assert_eq!((after_one - released_at).signum(), velocity.signum());

    for f in 0..900 {
        ctl.update(DT, f as f32 * DT, &mut orbit, 1.0);
    }
    assert_eq!(ctl.velocity(), 0.0);
}

#[test]
fn wheel_step_ignores_delta_magnitude() {
    let (mut a, orbit) = setup();
    let (mut b, _) = setup();
    let limits = orbit.distance_limits();
    a.wheel(1.0, orbit.distance(), limits);
    b.wheel(480.0, orbit.distance(), limits);
    assert_eq!(a.zoom().target_distance, b.zoom().target_distance);
    assert!((a.zoom().target_distance - BASE_CAMERA_DISTANCE * ZOOM_STEP).abs() < 1e-5);

    a.wheel(-3.0, orbit.distance(), limits);
    assert!((a.zoom().target_distance - BASE_CAMERA_DISTANCE).abs() < 1e-4);
    assert!(a.zoom().wheel_driven);
}

#[test]
fn wheel_target_is_clamped() {
    let (mut ctl, orbit) = setup();
    for _ in 0..200 {
        ctl.wheel(1.0, orbit.distance(), orbit.distance_limits());
    }
    assert_eq!(ctl.zoom().target_distance, MAX_CAMERA_DISTANCE);
    for _ in 0..400 {
        ctl.wheel(-1.0, orbit.distance(), orbit.distance_limits());
    }
    assert_eq!(ctl.zoom().target_distance, MIN_CAMERA_DISTANCE);
}

#[test]
fn zoom_eases_camera_without_overshoot() {
    let (mut ctl, mut orbit) = setup();
    ctl.wheel(1.0, orbit.distance(), orbit.distance_limits());
    let target = ctl.zoom().target_distance;
    let mut last = orbit.distance();
    for f in 0..600 {
        ctl.update(DT, f as f32 * DT, &mut orbit, 1.0);
        assert!(orbit.distance() >= last);
        assert!(orbit.distance() <= target + 1e-5);
        last = orbit.distance();
    }
    assert!((orbit.distance() - target).abs() <= ZOOM_SETTLE_EPS);
}

#[test]
fn manual_move_resyncs_zoom_target() {
    let (mut ctl, mut orbit) = setup();
    ctl.wheel(1.0, orbit.distance(), orbit.distance_limits());
    orbit.pinch(1.5);
    ctl.resync_zoom(orbit.distance());
    assert_eq!(ctl.zoom().target_distance, orbit.distance());
    assert!(!ctl.zoom().wheel_driven);
    let d = orbit.distance();
    ctl.update(DT, 0.0, &mut orbit, 1.0);
    assert_eq!(orbit.distance(), d);
}

#[test]
fn morph_factor_rises_monotonically_to_one() {
    let (mut ctl, mut orbit) = setup();
    click(&mut ctl, &orbit, Vec2::new(400.0, 300.0), PointerSource::Mouse, 0.0);
    let mut last = 0.0;
    for f in 0..2000 {
        ctl.update(DT, f as f32 * DT, &mut orbit, 1.0);
        let m = ctl.morph_factor();
        assert!(m >= last && m <= 1.0);
        last = m;
    }
    assert!(last > 1.0 - 2.0 * MORPH_SETTLE_EPS);
}

#[test]
fn ring_scale_shrinks_when_zoomed_out() {
    let (mut ctl, mut orbit) = setup();
    for _ in 0..5 {
        ctl.wheel(1.0, orbit.distance(), orbit.distance_limits());
    }
    let mut scale = 1.0;
    for f in 0..600 {
        scale = ctl.update(DT, f as f32 * DT, &mut orbit, 1.5);
    }
    let expected = 1.5 * BASE_CAMERA_DISTANCE / orbit.distance();
    assert!(scale < 1.5);
    assert!((scale - expected).abs() < 0.05);
}

#[test]
fn drag_orbit_takes_over_a_running_wheel_zoom() {
    let (mut ctl, mut orbit) = setup();
    orbit.auto_rotate = false;
    let limits = orbit.distance_limits();
    ctl.wheel(1.0, orbit.distance(), limits);
    for f in 0..5 {
        ctl.update(DT, f as f32 * DT, &mut orbit, 1.0);
    }
    let mid = orbit.distance();
    assert!(mid > BASE_CAMERA_DISTANCE && mid < BASE_CAMERA_DISTANCE * ZOOM_STEP - ZOOM_SETTLE_EPS);

    let mut out = Vec::new();
    ctl.pointer_down(Vec2::new(600.0, 300.0), PointerSource::Mouse, 0.0);
    let step = ctl
        .pointer_move(Vec2::new(640.0, 300.0), PointerSource::Mouse, 10.0, &mut out)
        .expect("part of the drag");
    assert_eq!(step, Vec2::new(40.0, 0.0));
    ctl.orbit(step, &mut orbit);
    assert!(orbit.is_orbiting());
    assert_eq!(ctl.zoom().target_distance, mid);
    assert!(!ctl.zoom().wheel_driven);

    // the old wheel target no longer pulls the camera
    ctl.update(DT, 0.0, &mut orbit, 1.0);
    assert_eq!(orbit.distance(), mid);

    ctl.wheel(1.0, orbit.distance(), limits);
    let target = ctl.zoom().target_distance;
    assert!((target - mid * ZOOM_STEP).abs() < 1e-5);
    ctl.update(DT, 0.0, &mut orbit, 1.0);
    let eased = orbit.distance();
    let expected = mid + (target - mid) * ease_alpha(ZOOM_EASE, DT);
    assert!((eased - expected).abs() < 1e-4, "eased {eased}, expected {expected}");
}

#[test]
fn ignored_moves_report_no_drag_step() {
    let (mut ctl, _) = setup();
    let mut out = Vec::new();
    assert!(ctl
        .pointer_move(Vec2::new(10.0, 10.0), PointerSource::Mouse, 0.0, &mut out)
        .is_none());
    ctl.pointer_down(Vec2::new(400.0, 300.0), PointerSource::Touch, 0.0);
    ctl.touch_count_changed(2);
    assert!(ctl
        .pointer_move(Vec2::new(450.0, 300.0), PointerSource::Touch, 5.0, &mut out)
        .is_none());
}

#[test]
fn ring_scale_shrinks_faster_than_it_grows() {
    let (mut ctl, mut orbit) = setup();
    let rest = ctl.update(DT, 0.0, &mut orbit, 1.0);

    // zoom out to twice the base distance: target scale halves
    orbit.set_distance(BASE_CAMERA_DISTANCE * 2.0);
    let shrunk = ctl.update(DT, 0.0, &mut orbit, 1.0);
    let shrink_share = (rest - shrunk) / (rest - 0.5);

    let mut settled = shrunk;
    for f in 0..3000 {
        settled = ctl.update(DT, f as f32 * DT, &mut orbit, 1.0);
    }
    assert!((settled - 0.5).abs() < 1e-3);

    // and back in: target scale returns to one
    orbit.set_distance(BASE_CAMERA_DISTANCE);
    let grown = ctl.update(DT, 0.0, &mut orbit, 1.0);
    let grow_share = (grown - settled) / (1.0 - settled);

    assert!((shrink_share - ease_alpha(SCALE_EASE_SHRINK, DT)).abs() < 1e-3);
    assert!((grow_share - ease_alpha(SCALE_EASE_GROW, DT)).abs() < 1e-3);
    assert!(shrink_share > grow_share * 2.0);
}
