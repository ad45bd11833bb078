use crate::bagua::RingConfig;
use crate::camera::distance_for_aspect;
use crate::constants::*;
use crate::elastic::ElasticConfig;
use crate::error::{Result, SceneError};
use crate::interaction::InteractionConfig;
use crate::oracle::OracleConfig;
use crate::parallax::ParallaxConfig;
use crate::ticker::TickerTimings;
use url::form_urlencoded;

pub const MAX_PARTICLE_COUNT: usize = 2_000_000;

/// Everything the scene needs at construction time.
#[derive(Clone, Debug)]
pub struct SceneConfig {
    pub particle_count: usize,
    pub camera_distance: f32,
    pub model_target_size: f32,
    pub interaction: InteractionConfig,
    pub rings: RingConfig,
    pub elastic: ElasticConfig,
    pub parallax: ParallaxConfig,
    pub ticker: TickerTimings,
    pub oracle: OracleConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            particle_count: PARTICLE_COUNT_DESKTOP,
            camera_distance: BASE_CAMERA_DISTANCE,
            model_target_size: MODEL_TARGET_SIZE,
            interaction: InteractionConfig::default(),
            rings: RingConfig::default(),
            elastic: ElasticConfig::default(),
            parallax: ParallaxConfig::default(),
            ticker: TickerTimings::default(),
            oracle: OracleConfig::default(),
        }
    }
}

impl SceneConfig {
    /// Viewport-dependent defaults: fewer particles on narrow screens, camera
    /// pulled back on portrait ones.
    pub fn for_viewport(css_width: f32, aspect: f32) -> Self {
        let particle_count = if css_width < MOBILE_WIDTH_PX {
            PARTICLE_COUNT_MOBILE
        } else {
            PARTICLE_COUNT_DESKTOP
        };
        Self {
            particle_count,
            camera_distance: distance_for_aspect(aspect),
            ..Default::default()
        }
    }

    /// Apply `key=value` pairs from a raw (still percent-encoded) query string.
    ///
    /// Recognised keys are `particles` and `endpoint`; others are ignored. Pairs
    /// are split before decoding, so an encoded `&` or `=` stays inside its
    /// value. A bad pair is logged and skipped; the rest still apply. Returns
    /// the rejected pairs.
    pub fn apply_overrides(&mut self, query: &str) -> Vec<SceneError> {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut rejected = Vec::new();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            if let Err(e) = self.apply_override(&key, &value) {
                log::warn!("[config] skipping query override: {}", e);
                rejected.push(e);
            }
        }
        rejected
    }

    fn apply_override(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "particles" => {
                let count: usize = value.parse().map_err(|_| {
                    SceneError::Config(format!("particles: not a count: {value:?}"))
                })?;
                if count == 0 || count > MAX_PARTICLE_COUNT {
                    return Err(SceneError::Config(format!(
                        "particles: {count} outside 1..={MAX_PARTICLE_COUNT}"
                    )));
                }
                self.particle_count = count;
            }
            "endpoint" => {
                if value.is_empty() {
                    return Err(SceneError::Config("endpoint: empty".into()));
                }
                self.oracle.endpoint = value.to_string();
            }
            other => log::debug!("[config] ignoring query key {:?}", other),
        }
        Ok(())
    }
}
