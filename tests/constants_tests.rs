// Host-side checks on the page constants. The main crate is wasm-only, so the
// pure-Rust constants file is included directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}

use constants::*;

#[test]
#[allow(clippy::assertions_on_constants)]
fn audio_levels_are_valid_media_volumes() {
    assert!(BGM_VOLUME > 0.0 && BGM_VOLUME <= 1.0);
    assert!(HUM_MAX_VOLUME > 0.0 && HUM_MAX_VOLUME <= 1.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn display_constants_are_sane() {
    assert!(MAX_DEVICE_PIXEL_RATIO >= 1.0);
    assert!(RING_ALPHA > 0.0 && RING_ALPHA <= 1.0);
    assert!(CLEAR_COLOR_HEX <= 0xffffff);
    assert!(RING_COLOR_HEX <= 0xffffff);
    // rings read as darker strokes on the paper background
    assert!(RING_COLOR_HEX < CLEAR_COLOR_HEX);
    assert!(MAX_FRAME_DT_SEC > 0.0 && MAX_FRAME_DT_SEC < 1.0);
}

#[test]
fn element_ids_are_distinct_and_non_empty() {
    let ids = [CANVAS_ID, TICKER_ID, QUESTION_INPUT_ID, BGM_ID, GYRO_BUTTON_ID];
    for (i, a) in ids.iter().enumerate() {
        assert!(!a.is_empty());
        assert!(!a.contains(' '), "{a}");
        for b in &ids[i + 1..] {
            assert_ne!(a, b);
        }
    }
    assert!(!GYRO_BUTTON_LABEL.is_empty());
}

#[test]
fn asset_urls_point_at_expected_formats() {
    assert!(MODEL_URLS.len() >= 2, "catalogue needs a choice to avoid repeats");
    for url in MODEL_URLS {
        assert!(url.ends_with(".glb"), "{url}");
    }
    assert!(ROTATING_AUDIO_URL.ends_with(".mp3"));
    assert!(!USAGE_STORAGE_KEY.is_empty());
}

#[test]
fn ticker_lines_are_plain_text() {
    assert!(!TICKER_LINES.is_empty());
    for line in TICKER_LINES {
        assert!(!line.trim().is_empty());
        assert!(!line.contains('<'), "markup left in {line}");
    }
}
