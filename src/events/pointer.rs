use crate::dom;
use crate::scene::Scene;
use bagua_core::{DragMove, PointerSource};
use glam::Vec2;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

const BUTTON_PRIMARY: i16 = 0;
const BUTTON_SECONDARY: i16 = 2;

#[derive(Default)]
struct TouchState {
    /// Finger distance at the previous move of a two-finger pinch.
    pinch_span: Option<f32>,
}

#[derive(Clone)]
pub struct InputWiring {
    pub canvas: web::HtmlCanvasElement,
    pub scene: Rc<RefCell<Scene>>,
    touch: Rc<RefCell<TouchState>>,
}

impl InputWiring {
    pub fn new(canvas: web::HtmlCanvasElement, scene: Rc<RefCell<Scene>>) -> Self {
        Self {
            canvas,
            scene,
            touch: Rc::new(RefCell::new(TouchState::default())),
        }
    }
}

pub fn wire_input_handlers(w: InputWiring) {
    wire_mouse(&w);
    wire_touch(&w);
    wire_wheel(&w);
    wire_contextmenu(&w);
}

#[inline]
fn client_to_css_px(canvas: &web::HtmlCanvasElement, client_x: f32, client_y: f32) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    Vec2::new(client_x - rect.left() as f32, client_y - rect.top() as f32)
}

#[inline]
fn mouse_css_px(ev: &web::MouseEvent, canvas: &web::HtmlCanvasElement) -> Vec2 {
    client_to_css_px(canvas, ev.client_x() as f32, ev.client_y() as f32)
}

#[inline]
fn touch_css_px(touch: &web::Touch, canvas: &web::HtmlCanvasElement) -> Vec2 {
    client_to_css_px(canvas, touch.client_x() as f32, touch.client_y() as f32)
}

fn touch_span(list: &web::TouchList) -> Option<f32> {
    let a = list.item(0)?;
    let b = list.item(1)?;
    let d = Vec2::new(
        (a.client_x() - b.client_x()) as f32,
        (a.client_y() - b.client_y()) as f32,
    );
    Some(d.length())
}

fn listen<E: wasm_bindgen::convert::FromWasmAbi + 'static>(
    target: &web::EventTarget,
    name: &str,
    passive: bool,
    handler: impl FnMut(E) + 'static,
) {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(E)>);
    let options = web::AddEventListenerOptions::new();
    options.set_passive(passive);
    _ = target.add_event_listener_with_callback_and_add_event_listener_options(
        name,
        closure.as_ref().unchecked_ref(),
        &options,
    );
    closure.forget();
}

fn wire_mouse(w: &InputWiring) {
    let Some(window) = web::window() else {
        return;
    };

    let wd = w.clone();
    listen(&w.canvas, "mousedown", true, move |ev: web::MouseEvent| {
        let pos = mouse_css_px(&ev, &wd.canvas);
        let mut scene = wd.scene.borrow_mut();
        match ev.button() {
            BUTTON_PRIMARY => {
                scene
                    .interaction
                    .pointer_down(pos, PointerSource::Mouse, dom::now_ms());
            }
            BUTTON_SECONDARY => scene.begin_elastic_drag(pos),
            _ => {}
        }
    });

    // move/up on the window so drags that leave the canvas still finish
    let wm = w.clone();
    listen(&window, "mousemove", true, move |ev: web::MouseEvent| {
        let pos = mouse_css_px(&ev, &wm.canvas);
        let mut guard = wm.scene.borrow_mut();
        let scene = &mut *guard;
        let step = scene.interaction.pointer_move(
            pos,
            PointerSource::Mouse,
            dom::now_ms(),
            &mut scene.events,
        );
        if let Some(step) = step {
            scene.interaction.orbit(step, &mut scene.orbit);
        }
        if scene.move_elastic_drag(pos) == Some(DragMove::Released) {
            log::info!("[input] elastic drag overstretched, released");
        }
    });

    let wu = w.clone();
    listen(&window, "mouseup", true, move |ev: web::MouseEvent| {
        let pos = mouse_css_px(&ev, &wu.canvas);
        let mut guard = wu.scene.borrow_mut();
        let scene = &mut *guard;
        match ev.button() {
            BUTTON_PRIMARY => {
                let camera = scene.orbit.camera();
                scene.interaction.pointer_up(
                    pos,
                    PointerSource::Mouse,
                    dom::now_ms(),
                    &camera,
                    &mut scene.events,
                );
            }
            BUTTON_SECONDARY => scene.end_elastic_drag(),
            _ => {}
        }
    });
}

fn wire_touch(w: &InputWiring) {
    let ws = w.clone();
    listen(&w.canvas, "touchstart", false, move |ev: web::TouchEvent| {
        ev.prevent_default();
        let touches = ev.touches();
        let mut guard = ws.scene.borrow_mut();
        let scene = &mut *guard;
        match touches.length() {
            0 => {}
            1 => {
                if let Some(t) = touches.item(0) {
                    let pos = touch_css_px(&t, &ws.canvas);
                    scene
                        .interaction
                        .pointer_down(pos, PointerSource::Touch, dom::now_ms());
                }
            }
            n => {
                scene.interaction.touch_count_changed(n as usize);
                ws.touch.borrow_mut().pinch_span = touch_span(&touches);
            }
        }
    });

    let wm = w.clone();
    listen(&w.canvas, "touchmove", false, move |ev: web::TouchEvent| {
        ev.prevent_default();
        let touches = ev.touches();
        let mut guard = wm.scene.borrow_mut();
        let scene = &mut *guard;
        if touches.length() >= 2 {
            let mut touch = wm.touch.borrow_mut();
            if let (Some(prev), Some(span)) = (touch.pinch_span, touch_span(&touches)) {
                if span > 1.0 {
                    scene.orbit.pinch(prev / span);
                    let distance = scene.orbit.distance();
                    scene.interaction.resync_zoom(distance);
                }
            }
            touch.pinch_span = touch_span(&touches);
            return;
        }
        if let Some(t) = touches.item(0) {
            let pos = touch_css_px(&t, &wm.canvas);
            let step = scene.interaction.pointer_move(
                pos,
                PointerSource::Touch,
                dom::now_ms(),
                &mut scene.events,
            );
            if let Some(step) = step {
                scene.interaction.orbit(step, &mut scene.orbit);
            }
        }
    });

    let we = w.clone();
    listen(&w.canvas, "touchend", false, move |ev: web::TouchEvent| {
        ev.prevent_default();
        if ev.touches().length() >= 2 {
            return;
        }
        we.touch.borrow_mut().pinch_span = None;
        if ev.touches().length() > 0 {
            return;
        }
        let Some(t) = ev.changed_touches().item(0) else {
            return;
        };
        let pos = touch_css_px(&t, &we.canvas);
        let mut guard = we.scene.borrow_mut();
        let scene = &mut *guard;
        let camera = scene.orbit.camera();
        scene.interaction.pointer_up(
            pos,
            PointerSource::Touch,
            dom::now_ms(),
            &camera,
            &mut scene.events,
        );
    });

    let wc = w.clone();
    listen(&w.canvas, "touchcancel", true, move |_ev: web::TouchEvent| {
        wc.touch.borrow_mut().pinch_span = None;
        wc.scene.borrow_mut().interaction.pointer_cancel();
    });
}

fn wire_wheel(w: &InputWiring) {
    let ww = w.clone();
    listen(&w.canvas, "wheel", false, move |ev: web::WheelEvent| {
        ev.prevent_default();
        let mut scene = ww.scene.borrow_mut();
        let distance = scene.orbit.distance();
        let limits = scene.orbit.distance_limits();
        scene.interaction.wheel(ev.delta_y() as f32, distance, limits);
    });
}

fn wire_contextmenu(w: &InputWiring) {
    // the secondary button is the elastic drag, not a menu
    listen(&w.canvas, "contextmenu", false, move |ev: web::Event| {
        ev.prevent_default();
    });
}
