//! Background music and the rotation hum.
//!
//! The hum is a looping media element routed through a WebAudio gain node so
//! its level can follow the rings every frame; browsers only start playback
//! after a user gesture, so everything waits for `unlock`.

use crate::constants::{BGM_ID, BGM_VOLUME, HUM_MAX_VOLUME, ROTATING_AUDIO_URL};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

const UNLOCK_EVENTS: [&str; 5] = ["click", "touchstart", "touchend", "pointerdown", "keydown"];

pub struct AudioRig {
    ctx: web::AudioContext,
    bgm: Option<web::HtmlAudioElement>,
    hum: web::HtmlAudioElement,
    hum_gain: web::GainNode,
    hum_playing: bool,
    unlocked: bool,
}

fn create_gain(audio_ctx: &web::AudioContext, value: f32, label: &str) -> anyhow::Result<web::GainNode> {
    let gain = web::GainNode::new(audio_ctx)
        .map_err(|e| anyhow::anyhow!("{} GainNode error: {:?}", label, e))?;
    gain.gain().set_value(value);
    Ok(gain)
}

impl AudioRig {
    pub fn new(document: &web::Document) -> anyhow::Result<Self> {
        let ctx = web::AudioContext::new().map_err(|e| anyhow::anyhow!("{:?}", e))?;

        let bgm = document
            .get_element_by_id(BGM_ID)
            .and_then(|el| el.dyn_into::<web::HtmlAudioElement>().ok());
        match &bgm {
            Some(el) => {
                el.set_volume(BGM_VOLUME);
                el.set_muted(false);
            }
            None => log::warn!("[audio] #{} not found, no background music", BGM_ID),
        }

        let hum = web::HtmlAudioElement::new_with_src(ROTATING_AUDIO_URL)
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        hum.set_loop(true);
        let source = ctx
            .create_media_element_source(&hum)
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        let hum_gain = create_gain(&ctx, 0.0, "hum")?;
        source
            .connect_with_audio_node(&hum_gain)
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        hum_gain
            .connect_with_audio_node(&ctx.destination())
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;

        Ok(Self {
            ctx,
            bgm,
            hum,
            hum_gain,
            hum_playing: false,
            unlocked: false,
        })
    }

    /// Set the hum level from the envelope gain (0..1). Playback is paused
    /// while silent.
    pub fn set_hum(&mut self, gain: f32) {
        self.hum_gain
            .gain()
            .set_value(gain.clamp(0.0, 1.0) * HUM_MAX_VOLUME as f32);
        if !self.unlocked {
            return;
        }
        let audible = gain > 0.0;
        if audible && !self.hum_playing {
            if let Ok(p) = self.hum.play() {
                spawn_local(async move {
                    if let Err(e) = JsFuture::from(p).await {
                        log::warn!("[audio] hum play failed: {:?}", e);
                    }
                });
            }
            self.hum_playing = true;
        } else if !audible && self.hum_playing {
            _ = self.hum.pause();
            self.hum_playing = false;
        }
    }
}

/// Retry starting playback on every gesture until one succeeds.
pub fn wire_unlock(document: &web::Document, rig: Rc<RefCell<AudioRig>>) {
    let closure = Closure::wrap(Box::new(move || {
        let (ctx, bgm) = {
            let r = rig.borrow();
            if r.unlocked {
                return;
            }
            (r.ctx.clone(), r.bgm.clone())
        };
        _ = ctx.resume();
        let rig = rig.clone();
        let Some(bgm) = bgm else {
            rig.borrow_mut().unlocked = true;
            return;
        };
        let Ok(promise) = bgm.play() else {
            return;
        };
        spawn_local(async move {
            match JsFuture::from(promise).await {
                Ok(_) => {
                    log::info!("[audio] unlocked by user gesture");
                    rig.borrow_mut().unlocked = true;
                }
                Err(e) => log::warn!("[audio] unlock failed, will retry: {:?}", e),
            }
        });
    }) as Box<dyn FnMut()>);
    let options = web::AddEventListenerOptions::new();
    options.set_capture(true);
    for name in UNLOCK_EVENTS {
        _ = document.add_event_listener_with_callback_and_add_event_listener_options(
            name,
            closure.as_ref().unchecked_ref(),
            &options,
        );
    }
    closure.forget();
}
