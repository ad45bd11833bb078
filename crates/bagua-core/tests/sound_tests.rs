use bagua_core::sound::HumEnvelope;

const DT: f32 = 1.0 / 60.0;

#[test]
fn hum_rises_with_ring_speed() {
    let mut hum = HumEnvelope::default();
    assert_eq!(hum.update(0.0, DT), 0.0);
    let mut gain = 0.0;
    for _ in 0..60 {
        gain = hum.update(hum.full_speed, DT);
    }
    assert!(gain > 0.99 && gain <= 1.0);

    let mut slow = HumEnvelope::default();
    for _ in 0..120 {
        slow.update(slow.full_speed * 0.25, DT);
    }
    assert!((slow.gain() - 0.25).abs() < 1e-3);
}

#[test]
fn hum_releases_linearly_when_rings_stop() {
    let mut hum = HumEnvelope::default();
    for _ in 0..120 {
        hum.update(10.0, DT);
    }
    let start = hum.gain();
    assert!((start - 1.0).abs() < 1e-4);

    let half = (hum.release_sec * 0.5 / DT).round() as usize;
    for _ in 0..half {
        hum.update(0.0, DT);
    }
    assert!((hum.gain() - 0.5).abs() < 0.05);
    for _ in 0..half + 2 {
        hum.update(0.0, DT);
    }
    assert_eq!(hum.gain(), 0.0);
    assert!(!hum.is_audible());
}
