use crate::constants::MAX_DEVICE_PIXEL_RATIO;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

#[inline]
pub fn add_click_listener(
    document: &web::Document,
    element_id: &str,
    mut handler: impl FnMut() + 'static,
) {
    if let Some(el) = document.get_element_by_id(element_id) {
        let closure =
            wasm_bindgen::closure::Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
        _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

/// Device pixel ratio, capped so 3x phones don't render 9x the fragments.
pub fn pixel_ratio() -> f64 {
    web::window()
        .map(|w| w.device_pixel_ratio())
        .unwrap_or(1.0)
        .clamp(1.0, MAX_DEVICE_PIXEL_RATIO)
}

/// CSS-pixel size of the canvas.
pub fn css_size(canvas: &web::HtmlCanvasElement) -> (f32, f32) {
    let rect = canvas.get_bounding_client_rect();
    (rect.width() as f32, rect.height() as f32)
}

pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) {
    let dpr = pixel_ratio();
    let rect = canvas.get_bounding_client_rect();
    let w_px = (rect.width() * dpr) as u32;
    let h_px = (rect.height() * dpr) as u32;
    canvas.set_width(w_px.max(1));
    canvas.set_height(h_px.max(1));
}

/// Raw query string of the page, without the leading `?`. Decoding happens per
/// pair in `SceneConfig::apply_overrides`.
pub fn query_string() -> String {
    web::window()
        .and_then(|w| w.location().search().ok())
        .unwrap_or_default()
        .trim_start_matches('?')
        .to_string()
}

pub fn set_ticker(el: &web::HtmlElement, text: &str, opacity: f32) {
    if el.text_content().as_deref() != Some(text) {
        el.set_text_content(Some(text));
    }
    _ = el
        .style()
        .set_property("opacity", &format!("{:.3}", opacity.clamp(0.0, 1.0)));
}

pub fn hide_ticker(el: &web::HtmlElement) {
    _ = el.style().set_property("opacity", "0");
}

/// Question typed so far. `None` when the element is missing.
pub fn read_question(document: &web::Document, input_id: &str) -> Option<String> {
    let el = document.get_element_by_id(input_id)?;
    if let Some(area) = el.dyn_ref::<web::HtmlTextAreaElement>() {
        return Some(area.value());
    }
    el.dyn_ref::<web::HtmlInputElement>().map(|input| input.value())
}

pub fn clear_question(document: &web::Document, input_id: &str) {
    let Some(el) = document.get_element_by_id(input_id) else {
        return;
    };
    if let Some(area) = el.dyn_ref::<web::HtmlTextAreaElement>() {
        area.set_value("");
    } else if let Some(input) = el.dyn_ref::<web::HtmlInputElement>() {
        input.set_value("");
    }
}

pub fn storage_get(key: &str) -> Option<String> {
    let storage = web::window()?.local_storage().ok()??;
    storage.get_item(key).ok()?
}

pub fn storage_set(key: &str, value: &str) -> anyhow::Result<()> {
    let storage = web::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .ok_or_else(|| anyhow::anyhow!("localStorage unavailable"))?;
    storage
        .set_item(key, value)
        .map_err(|e| anyhow::anyhow!("{:?}", e))
}

/// Today's date in the browser's local time zone.
pub fn local_today() -> Option<chrono::NaiveDate> {
    let now = js_sys::Date::new_0();
    chrono::NaiveDate::from_ymd_opt(now.get_full_year() as i32, now.get_month() + 1, now.get_date())
}

pub fn now_ms() -> f64 {
    js_sys::Date::now()
}
