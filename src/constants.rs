// Page wiring and presentation constants for the web front-end.
//
// Engine tuning lives in `bagua_core::constants`; this file only holds what
// depends on the host page (element ids, asset paths, colours).
// Element ids
pub const CANVAS_ID: &str = "app-canvas";
pub const TICKER_ID: &str = "dynamic-text";
pub const QUESTION_INPUT_ID: &str = "question-input";
pub const BGM_ID: &str = "bgm";
pub const GYRO_BUTTON_ID: &str = "gyro-permission";
pub const GYRO_BUTTON_LABEL: &str = "開啟沉浸體驗";

// Assets
pub const ROTATING_AUDIO_URL: &str = "./music/rotating.mp3";
pub const MODEL_URLS: &[&str] = &[
    "./models/lotus.glb",
    "./models/crane.glb",
    "./models/mountain.glb",
    "./models/incense.glb",
];

// Audio levels (HTMLMediaElement volume, 0..1)
pub const BGM_VOLUME: f64 = 0.4;
pub const HUM_MAX_VOLUME: f64 = 0.6;

// Persistence
pub const USAGE_STORAGE_KEY: &str = "bagua.oracle.usage";

// Display
pub const MAX_DEVICE_PIXEL_RATIO: f64 = 2.0;
pub const CLEAR_COLOR_HEX: u32 = 0xd1d1d1;
pub const RING_COLOR_HEX: u32 = 0x666666;
pub const RING_ALPHA: f32 = 0.1;

// Frame clock
pub const MAX_FRAME_DT_SEC: f32 = 0.1; // longer gaps (tab in background) are clamped

pub const TICKER_LINES: &[&str] = &[
    "本产品基于传统周易哲学与现代随机算法生成，内容仅供娱乐与心理舒缓，不作为现实决策依据。",
    "请相信科学，理性生活。",
    "想象焦虑是一滴墨入水，被巨大的空白稀释、消解...",
    "知其白，守其黑，为天下式。",
    "既济 · Completion 黑白咬合，阴阳归位。能量处于完美的平衡。",
    "在这一张巨大的灰色宣纸上，当下的困扰不过是一个噪点。",
    "屯 · Beginnings 混沌之中，秩序正在萌芽。",
    "万物负阴而抱阳，冲气以为和。",
];
