#![cfg(target_arch = "wasm32")]
use crate::constants::*;
use crate::scene::Scene;
use bagua_core::SceneConfig;
use glam::Vec2;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod audio;
mod constants;
mod dom;
mod events;
mod frame;
mod models;
mod oracle;
mod render;
mod scene;

fn wire_canvas_resize(canvas: &web::HtmlCanvasElement, scene: Rc<RefCell<Scene>>) {
    let canvas_resize = canvas.clone();
    let resize_closure = Closure::wrap(Box::new(move || {
        dom::sync_canvas_backing_size(&canvas_resize);
        let (w, h) = dom::css_size(&canvas_resize);
        scene.borrow_mut().resize(w, h);
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window
            .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref());
    }
    resize_closure.forget();
}

fn build_scene(canvas: &web::HtmlCanvasElement) -> Scene {
    let (css_w, css_h) = dom::css_size(canvas);
    let aspect = css_w / css_h.max(1.0);
    let mut config = SceneConfig::for_viewport(css_w, aspect);
    let query = dom::query_string();
    let rejected = config.apply_overrides(&query);
    if !rejected.is_empty() {
        log::warn!("[config] {} query override(s) ignored", rejected.len());
    }
    let stored_usage = dom::storage_get(USAGE_STORAGE_KEY);
    Scene::new(
        config,
        Vec2::new(css_w, css_h),
        TICKER_LINES.iter().map(|s| s.to_string()).collect(),
        MODEL_URLS.iter().map(|s| s.to_string()).collect(),
        stored_usage.as_deref(),
    )
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("bagua-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", CANVAS_ID))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    // backing store follows CSS size times the capped pixel ratio
    dom::sync_canvas_backing_size(&canvas);
    let scene = Rc::new(RefCell::new(build_scene(&canvas)));
    wire_canvas_resize(&canvas, scene.clone());

    events::wire_input_handlers(events::InputWiring::new(canvas.clone(), scene.clone()));
    events::wire_orientation(scene.clone());

    let audio = match audio::AudioRig::new(&document) {
        Ok(rig) => {
            let rig = Rc::new(RefCell::new(rig));
            audio::wire_unlock(&document, rig.clone());
            Some(rig)
        }
        Err(e) => {
            log::warn!("[audio] disabled: {:?}", e);
            None
        }
    };

    let ticker_el = document
        .get_element_by_id(TICKER_ID)
        .and_then(|el| el.dyn_into::<web::HtmlElement>().ok());
    if ticker_el.is_none() {
        log::warn!("[ticker] #{} not found, text hidden", TICKER_ID);
    }

    let gpu = frame::init_gpu(&canvas, &scene).await;

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        scene,
        canvas,
        ticker_el,
        audio,
        gpu,
        last_instant: Instant::now(),
    }));
    frame::start_loop(frame_ctx);
    Ok(())
}
