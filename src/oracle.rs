//! Browser side of the oracle: POST the question, stream the answer into the
//! ticker, enforce the daily cap and a request timeout.

use crate::constants::{QUESTION_INPUT_ID, USAGE_STORAGE_KEY};
use crate::dom;
use crate::scene::Scene;
use bagua_core::{
    decide_submit, OracleAnswer, OracleFailure, OracleRequest, StreamEvent, SubmitDecision,
    Utf8ChunkDecoder, EMPTY_QUESTION_MESSAGE, RATE_LIMIT_MESSAGE,
};
use chrono::NaiveDate;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

/// Handle a completed circle gesture.
pub fn submit(scene: Rc<RefCell<Scene>>) {
    let document = dom::window_document();
    let typed = document
        .as_ref()
        .and_then(|d| dom::read_question(d, QUESTION_INPUT_ID));
    let Some(today) = dom::local_today() else {
        log::error!("[oracle] could not read the local date");
        return;
    };

    let mut s = scene.borrow_mut();
    let busy = s.oracle_busy;
    let decision = decide_submit(busy, typed.as_deref(), &mut s.limiter, today);
    if decision.clears_input() {
        if let Some(d) = &document {
            dom::clear_question(d, QUESTION_INPUT_ID);
        }
    }
    let question = match decision {
        SubmitDecision::Busy => {
            log::info!("[oracle] request already in flight, gesture ignored");
            return;
        }
        SubmitDecision::Empty => {
            s.ticker.show_message(EMPTY_QUESTION_MESSAGE);
            return;
        }
        SubmitDecision::CapReached => {
            log::info!("[oracle] daily cap reached");
            s.ticker.show_message(RATE_LIMIT_MESSAGE);
            return;
        }
        SubmitDecision::Ask(question) => question,
    };

    s.oracle_busy = true;
    s.ticker.begin_response();
    let endpoint = s.config.oracle.endpoint.clone();
    let timeout_ms = s.config.oracle.timeout_ms;
    drop(s);

    log::info!("[oracle] asking ({} chars)", question.chars().count());
    spawn_local(async move {
        let result = stream_answer(&scene, &endpoint, &question, timeout_ms).await;
        finish(&scene, today, result);
    });
}

fn finish(scene: &Rc<RefCell<Scene>>, today: NaiveDate, result: Result<(), OracleFailure>) {
    let mut s = scene.borrow_mut();
    s.oracle_busy = false;
    match result {
        Ok(()) => {
            s.limiter.record_success(today);
            match s.limiter.to_json() {
                Ok(Some(json)) => {
                    if let Err(e) = dom::storage_set(USAGE_STORAGE_KEY, &json) {
                        log::warn!("[oracle] usage not persisted: {:?}", e);
                    }
                }
                Ok(None) => {}
                Err(e) => log::warn!("[oracle] usage not serialized: {}", e),
            }
        }
        Err(failure) => {
            log::error!("[oracle] request failed: {:?}", failure);
            s.ticker
                .apply(StreamEvent::Failed(failure.message().to_string()));
        }
    }
}

fn forward(scene: &Rc<RefCell<Scene>>, event: StreamEvent) {
    scene.borrow_mut().ticker.apply(event);
}

/// Aborts the request when the deadline passes; cleared on drop.
struct Deadline {
    handle: i32,
    fired: Rc<Cell<bool>>,
    _closure: Closure<dyn FnMut()>,
}

impl Deadline {
    fn arm(controller: &web::AbortController, timeout_ms: u32) -> Option<Self> {
        let window = web::window()?;
        let fired = Rc::new(Cell::new(false));
        let fired_cb = fired.clone();
        let controller = controller.clone();
        let closure = Closure::wrap(Box::new(move || {
            fired_cb.set(true);
            controller.abort();
        }) as Box<dyn FnMut()>);
        let handle = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                timeout_ms as i32,
            )
            .ok()?;
        Some(Self {
            handle,
            fired,
            _closure: closure,
        })
    }

    fn fired(&self) -> bool {
        self.fired.get()
    }
}

impl Drop for Deadline {
    fn drop(&mut self) {
        if let Some(w) = web::window() {
            w.clear_timeout_with_handle(self.handle);
        }
    }
}

fn failure_from_js(deadline: Option<&Deadline>, e: &JsValue) -> OracleFailure {
    if deadline.is_some_and(Deadline::fired) {
        return OracleFailure::Timeout;
    }
    OracleFailure::classify(&format!("{:?}", e))
}

async fn stream_answer(
    scene: &Rc<RefCell<Scene>>,
    endpoint: &str,
    question: &str,
    timeout_ms: u32,
) -> Result<(), OracleFailure> {
    let window = web::window().ok_or(OracleFailure::Unknown)?;
    let controller = web::AbortController::new().map_err(|e| failure_from_js(None, &e))?;
    let deadline = Deadline::arm(&controller, timeout_ms);
    let deadline = deadline.as_ref();

    let body = serde_json::to_string(&OracleRequest {
        question: question.to_string(),
    })
    .map_err(|_| OracleFailure::Unknown)?;
    let headers = web::Headers::new().map_err(|e| failure_from_js(None, &e))?;
    headers
        .set("Content-Type", "application/json")
        .map_err(|e| failure_from_js(None, &e))?;
    let init = web::RequestInit::new();
    init.set_method("POST");
    init.set_headers(&headers);
    init.set_body(&JsValue::from_str(&body));
    init.set_signal(Some(&controller.signal()));
    let request = web::Request::new_with_str_and_init(endpoint, &init)
        .map_err(|e| failure_from_js(None, &e))?;

    let response: web::Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| failure_from_js(deadline, &e))?
        .dyn_into()
        .map_err(|e| failure_from_js(None, &e))?;

    if !response.ok() {
        let text = read_text(&response, deadline).await.unwrap_or_default();
        return Err(OracleFailure::from_response(response.status(), &text));
    }

    let is_json = response
        .headers()
        .get("content-type")
        .ok()
        .flatten()
        .is_some_and(|t| t.contains("application/json"));
    let stream = if is_json { None } else { response.body() };
    let Some(stream) = stream else {
        // batch answer
        let text = read_text(&response, deadline).await?;
        forward(scene, StreamEvent::Chunk(OracleAnswer::text_from_body(&text)));
        forward(scene, StreamEvent::End);
        return Ok(());
    };

    let reader: web::ReadableStreamDefaultReader = stream
        .get_reader()
        .dyn_into()
        .map_err(|e| failure_from_js(None, &e))?;
    let mut decoder = Utf8ChunkDecoder::new();
    loop {
        let chunk = JsFuture::from(reader.read())
            .await
            .map_err(|e| failure_from_js(deadline, &e))?;
        let done = js_sys::Reflect::get(&chunk, &JsValue::from_str("done"))
            .ok()
            .and_then(|v| v.as_bool())
            .unwrap_or(true);
        if done {
            break;
        }
        let value = js_sys::Reflect::get(&chunk, &JsValue::from_str("value"))
            .map_err(|e| failure_from_js(None, &e))?;
        let bytes = js_sys::Uint8Array::new(&value).to_vec();
        let text = decoder.push(&bytes);
        if !text.is_empty() {
            forward(scene, StreamEvent::Chunk(text));
        }
    }
    let tail = decoder.finish();
    if !tail.is_empty() {
        forward(scene, StreamEvent::Chunk(tail));
    }
    forward(scene, StreamEvent::End);
    log::info!("[oracle] response complete");
    Ok(())
}

async fn read_text(
    response: &web::Response,
    deadline: Option<&Deadline>,
) -> Result<String, OracleFailure> {
    let promise = response.text().map_err(|e| failure_from_js(None, &e))?;
    JsFuture::from(promise)
        .await
        .map_err(|e| failure_from_js(deadline, &e))
        .map(|v| v.as_string().unwrap_or_default())
}
