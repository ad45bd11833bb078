use crate::constants::{GYRO_BUTTON_ID, GYRO_BUTTON_LABEL};
use crate::dom;
use crate::scene::Scene;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

/// Feed device tilt into the parallax, asking for permission first where the
/// platform requires it.
pub fn wire_orientation(scene: Rc<RefCell<Scene>>) {
    let Some(window) = web::window() else {
        return;
    };
    let ctor = js_sys::Reflect::get(&window, &JsValue::from_str("DeviceOrientationEvent"))
        .unwrap_or(JsValue::UNDEFINED);
    if ctor.is_undefined() {
        log::info!("[gyro] DeviceOrientationEvent not supported");
        return;
    }
    let request = js_sys::Reflect::get(&ctor, &JsValue::from_str("requestPermission"))
        .ok()
        .and_then(|f| f.dyn_into::<js_sys::Function>().ok());
    match request {
        Some(request) => create_permission_button(scene, ctor, request),
        None => add_orientation_listener(scene),
    }
}

fn add_orientation_listener(scene: Rc<RefCell<Scene>>) {
    let Some(window) = web::window() else {
        return;
    };
    let closure = Closure::wrap(Box::new(move |ev: web::DeviceOrientationEvent| {
        if let (Some(beta), Some(gamma)) = (ev.beta(), ev.gamma()) {
            scene
                .borrow_mut()
                .parallax
                .on_orientation(beta as f32, gamma as f32);
        }
    }) as Box<dyn FnMut(_)>);
    _ = window
        .add_event_listener_with_callback("deviceorientation", closure.as_ref().unchecked_ref());
    closure.forget();
    log::info!("[gyro] orientation listener attached");
}

fn create_permission_button(scene: Rc<RefCell<Scene>>, ctor: JsValue, request: js_sys::Function) {
    let Some(document) = dom::window_document() else {
        return;
    };
    if document.get_element_by_id(GYRO_BUTTON_ID).is_none() {
        let Ok(el) = document.create_element("button") else {
            return;
        };
        el.set_id(GYRO_BUTTON_ID);
        el.set_text_content(Some(GYRO_BUTTON_LABEL));
        if let Some(body) = document.body() {
            _ = body.append_child(&el);
        }
    }

    dom::add_click_listener(&document, GYRO_BUTTON_ID, move || {
        let scene = scene.clone();
        let promise = match request.call0(&ctor) {
            Ok(p) => js_sys::Promise::from(p),
            Err(e) => {
                log::warn!("[gyro] requestPermission threw: {:?}", e);
                return;
            }
        };
        spawn_local(async move {
            match JsFuture::from(promise).await {
                Ok(state) if state.as_string().as_deref() == Some("granted") => {
                    add_orientation_listener(scene);
                    let button = dom::window_document()
                        .and_then(|d| d.get_element_by_id(GYRO_BUTTON_ID))
                        .and_then(|el| el.dyn_into::<web::HtmlElement>().ok());
                    if let Some(el) = button {
                        _ = el.style().set_property("display", "none");
                    }
                }
                Ok(state) => log::warn!("[gyro] permission not granted: {:?}", state),
                Err(e) => log::warn!("[gyro] permission request failed: {:?}", e),
            }
        });
    });
}
