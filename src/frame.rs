use crate::audio::AudioRig;
use crate::constants::MAX_FRAME_DT_SEC;
use crate::scene::Scene;
use crate::{dom, models, oracle, render};
use bagua_core::InteractionEvent;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext<'a> {
    pub scene: Rc<RefCell<Scene>>,
    pub canvas: web::HtmlCanvasElement,
    pub ticker_el: Option<web::HtmlElement>,
    pub audio: Option<Rc<RefCell<AudioRig>>>,
    pub gpu: Option<render::GpuState<'a>>,
    pub last_instant: Instant,
}

impl<'a> FrameContext<'a> {
    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt_sec = (now - self.last_instant)
            .as_secs_f32()
            .min(MAX_FRAME_DT_SEC);
        self.last_instant = now;

        let events = {
            let mut scene = self.scene.borrow_mut();
            scene.step(dt_sec);
            scene.take_events()
        };
        for event in events {
            self.handle_event(event);
        }

        let mut scene = self.scene.borrow_mut();
        if let Some(el) = &self.ticker_el {
            match scene.ticker.frame() {
                Some(f) => dom::set_ticker(el, f.text, f.opacity),
                None => dom::hide_ticker(el),
            }
        }
        if let Some(audio) = &self.audio {
            audio.borrow_mut().set_hum(scene.hum.gain());
        }

        if let Some(g) = &mut self.gpu {
            g.resize_if_needed(self.canvas.width(), self.canvas.height());
            match g.render(&mut scene) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => g.reconfigure(),
                Err(e) => log::error!("render error: {:?}", e),
            }
        }
    }

    fn handle_event(&mut self, event: InteractionEvent) {
        match event {
            InteractionEvent::SelectModel => models::select_next(self.scene.clone()),
            InteractionEvent::MorphToggled { to_model } => {
                log::info!("[scene] morph toward {}", if to_model { "model" } else { "sphere" });
            }
            InteractionEvent::Submit => oracle::submit(self.scene.clone()),
        }
    }
}

pub async fn init_gpu(
    canvas: &web::HtmlCanvasElement,
    scene: &Rc<RefCell<Scene>>,
) -> Option<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    let (particle_count, ring_instances) = {
        let scene = scene.borrow();
        (scene.particles.len(), scene.rings.rect_instances())
    };
    match render::GpuState::new(leaked_canvas, particle_count, &ring_instances).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext<'static>>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx.borrow_mut().frame();
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
