use bagua_core::constants::*;
use bagua_core::elastic::*;
use glam::Vec3;

const DT: f32 = 1.0 / 60.0;

#[test]
fn drag_offsets_with_resistance() {
    let mut drag = ElasticDrag::default();
    drag.drag_start(Vec3::ZERO);
    assert_eq!(drag.drag_move(Vec3::new(1.0, 0.0, 0.0)), DragMove::Updated);
    let slot = drag.slots()[0];
    assert_eq!(slot.center, Vec3::ZERO);
    assert!((slot.offset.x - DRAG_RESISTANCE).abs() < 1e-6);
}

#[test]
fn moves_without_a_drag_are_ignored() {
    let mut drag = ElasticDrag::default();
    assert_eq!(drag.drag_move(Vec3::ONE), DragMove::Ignored);
    assert_eq!(drag.slots()[0].offset, Vec3::ZERO);
}

#[test]
fn overstretch_releases_the_drag() {
    let mut drag = ElasticDrag::default();
    drag.drag_start(Vec3::ZERO);
    let far = Vec3::X * (MAX_DRAG_OFFSET / DRAG_RESISTANCE + 0.5);
    assert_eq!(drag.drag_move(far), DragMove::Released);
    assert!(!drag.is_dragging());
    assert_eq!(drag.drag_move(Vec3::ZERO), DragMove::Ignored);
}

#[test]
fn held_slot_does_not_decay_until_release() {
    let mut drag = ElasticDrag::default();
    drag.drag_start(Vec3::ZERO);
    drag.drag_move(Vec3::Y);
    let held = drag.slots()[0].offset;
    for _ in 0..120 {
        drag.update(DT);
    }
    assert_eq!(drag.slots()[0].offset, held);

    drag.drag_end();
    for _ in 0..600 {
        drag.update(DT);
    }
    assert_eq!(drag.slots()[0].offset, Vec3::ZERO);
}

#[test]
fn new_drag_demotes_a_displaced_slot() {
    let mut drag = ElasticDrag::default();
    drag.drag_start(Vec3::ZERO);
    drag.drag_move(Vec3::X);
    drag.drag_end();
    let first = drag.slots()[0];

    drag.drag_start(Vec3::new(0.0, 1.0, 0.0));
    assert_eq!(drag.slots()[1], first);
    assert_eq!(drag.slots()[0].offset, Vec3::ZERO);
    assert_eq!(drag.slots()[0].center, Vec3::Y);

    // the demoted slot relaxes while the new one is held
    drag.drag_move(Vec3::new(0.5, 1.0, 0.0));
    for _ in 0..600 {
        drag.update(DT);
    }
    assert_eq!(drag.slots()[1].offset, Vec3::ZERO);
    assert!(drag.slots()[0].offset.length() > 0.0);
}

#[test]
fn settled_slot_is_not_demoted() {
    let mut drag = ElasticDrag::default();
    drag.drag_start(Vec3::ZERO);
    drag.drag_move(Vec3::X * 0.01);
    drag.drag_end();
    drag.drag_start(Vec3::Y);
    assert_eq!(drag.slots()[1], DragSlot::default());
}
