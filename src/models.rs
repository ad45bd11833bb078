use crate::scene::Scene;
use bagua_core::sample_model;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

/// Pick the next model and morph toward it once it has been fetched and
/// sampled. Failures keep the previous target.
pub fn select_next(scene: Rc<RefCell<Scene>>) {
    let url = {
        let mut guard = scene.borrow_mut();
        let s = &mut *guard;
        match s.catalogue.pick_next(&mut s.rng) {
            Some(url) => url.to_string(),
            None => {
                log::warn!("[models] catalogue is empty");
                return;
            }
        }
    };
    spawn_local(async move {
        match fetch_bytes(&url).await {
            Ok(bytes) => apply_model(&scene, &url, &bytes),
            Err(e) => log::warn!("[models] {} not loaded: {:?}", url, e),
        }
    });
}

fn apply_model(scene: &Rc<RefCell<Scene>>, url: &str, bytes: &[u8]) {
    let mut guard = scene.borrow_mut();
    let s = &mut *guard;
    let count = s.particles.len();
    let size = s.config.model_target_size;
    match sample_model(bytes, count, size, &mut s.rng) {
        Ok(points) => {
            if s.particles.set_morph_target(&points) {
                log::info!("[models] {} sampled ({} points)", url, points.len() / 3);
            } else {
                log::warn!("[models] {} has no renderable surface", url);
            }
        }
        Err(e) => log::warn!("[models] {} unreadable: {}", url, e),
    }
}

async fn fetch_bytes(url: &str) -> anyhow::Result<Vec<u8>> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let response: web::Response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| anyhow::anyhow!("{:?}", e))?
        .dyn_into()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    if !response.ok() {
        anyhow::bail!("HTTP {}", response.status());
    }
    let buffer = JsFuture::from(
        response
            .array_buffer()
            .map_err(|e| anyhow::anyhow!("{:?}", e))?,
    )
    .await
    .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}
