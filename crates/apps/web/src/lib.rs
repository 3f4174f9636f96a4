use console_error_panic_hook::set_once;
use gloo_net::http::Request;
use std::cell::RefCell;
use std::sync::atomic::{AtomicBool, Ordering};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use foundation::math::Vec2;
use globe::{GlobeConfig, GlobeFrame, GlobeSession, Mode, paint_frame};

mod canvas;
use canvas::CanvasSurface;

// Guard against double initialization during hot reload.
static INITIALIZED: AtomicBool = AtomicBool::new(false);

#[derive(Default)]
struct WebState {
    config: GlobeConfig,
    session: Option<GlobeSession>,
    canvas: Option<HtmlCanvasElement>,
    ctx: Option<CanvasRenderingContext2d>,
}

impl WebState {
    fn paint(&self, frame: &GlobeFrame) {
        let Some(ctx) = &self.ctx else {
            return;
        };
        let mut surface = CanvasSurface::new(ctx, self.config.width, self.config.height);
        if let Err(err) = paint_frame(&mut surface, frame) {
            log(&format!("paint error: {err:?}"));
        }
    }
}

thread_local! {
    static STATE: RefCell<WebState> = RefCell::new(WebState::default());
}

fn with_state<R>(f: impl FnOnce(&mut WebState) -> R) -> R {
    STATE.with(|state| f(&mut state.borrow_mut()))
}

fn log(message: &str) {
    web_sys::console::log_1(&JsValue::from_str(message));
}

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    if INITIALIZED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }
    set_once();
    Ok(())
}

/// Replaces the configuration. Takes effect on the next `load_world`.
#[wasm_bindgen]
pub fn configure(json: &str) -> Result<(), JsValue> {
    let config = GlobeConfig::from_json_str(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    with_state(|s| s.config = config);
    Ok(())
}

#[wasm_bindgen]
pub fn init_canvas(canvas_id: &str) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let canvas = document
        .get_element_by_id(canvas_id)
        .ok_or_else(|| JsValue::from_str(&format!("missing {canvas_id}")))?
        .dyn_into::<HtmlCanvasElement>()?;
    let ctx = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
        .dyn_into::<CanvasRenderingContext2d>()?;

    with_state(|s| {
        canvas.set_width(s.config.width as u32);
        canvas.set_height(s.config.height as u32);
        s.canvas = Some(canvas);
        s.ctx = Some(ctx);
        if let Some(session) = s.session.as_mut() {
            let frame = session.render(now_ms());
            s.paint(&frame);
        }
    });
    Ok(())
}

/// Fetches the world document (the configured URL when `url` is omitted)
/// and starts the globe once it has loaded.
#[wasm_bindgen]
pub fn load_world(url: Option<String>) {
    let url = url.unwrap_or_else(|| with_state(|s| s.config.world_url.clone()));
    spawn_local(async move {
        let payload = match fetch_text(&url).await {
            Ok(payload) => payload,
            Err(err) => {
                web_sys::console::error_1(&JsValue::from_str(&format!(
                    "world fetch error ({url}): {err:?}"
                )));
                return;
            }
        };
        with_state(|s| match GlobeSession::from_world_json(s.config.clone(), &payload) {
            Ok(mut session) => {
                let frame = session.start(now_ms());
                s.session = Some(session);
                s.paint(&frame);
            }
            Err(err) => {
                web_sys::console::error_1(&JsValue::from_str(&format!("world data error: {err}")));
            }
        });
    });
}

async fn fetch_text(url: &str) -> Result<String, JsValue> {
    let resp = Request::get(url)
        .send()
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    if !resp.ok() {
        return Err(JsValue::from_str(&format!("HTTP {}", resp.status())));
    }
    resp.text()
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen]
pub fn is_loaded() -> bool {
    with_state(|s| s.session.is_some())
}

/// `"auto"` or `"manual"`.
#[wasm_bindgen]
pub fn set_mode(mode: &str) -> Result<(), JsValue> {
    let mode: Mode = mode.parse().map_err(|e: globe::GlobeError| JsValue::from_str(&e.to_string()))?;
    with_state(|s| {
        match s.session.as_mut() {
            Some(session) => {
                if let Some(frame) = session.set_mode(mode, now_ms()) {
                    s.paint(&frame);
                }
            }
            None => s.config.start_mode = mode,
        }
    });
    Ok(())
}

#[wasm_bindgen]
pub fn current_mode() -> String {
    with_state(|s| {
        s.session
            .as_ref()
            .map_or(s.config.start_mode, GlobeSession::mode)
            .to_string()
    })
}

#[wasm_bindgen]
pub fn select_country(index: usize) {
    with_state(|s| {
        let Some(session) = s.session.as_mut() else {
            return;
        };
        // A bad index is recorded on the session's event bus and reported by `tick`.
        if let Ok(frame) = session.select_country(index, now_ms()) {
            s.paint(&frame);
        }
    });
}

/// Display names in selection order, for populating a dropdown.
#[wasm_bindgen]
pub fn country_names() -> js_sys::Array {
    with_state(|s| {
        s.session
            .as_ref()
            .map(|session| {
                session
                    .country_names()
                    .into_iter()
                    .map(JsValue::from)
                    .collect::<js_sys::Array>()
            })
            .unwrap_or_else(js_sys::Array::new)
    })
}

#[wasm_bindgen]
pub fn highlighted_country() -> Option<usize> {
    with_state(|s| s.session.as_ref().and_then(GlobeSession::highlight))
}

#[wasm_bindgen]
pub fn pointer_down(x: f64, y: f64) {
    with_state(|s| {
        if let Some(session) = s.session.as_mut() {
            session.pointer_down(Vec2::new(x, y));
        }
    });
}

#[wasm_bindgen]
pub fn pointer_move(x: f64, y: f64) {
    with_state(|s| {
        let Some(session) = s.session.as_mut() else {
            return;
        };
        if let Some(frame) = session.pointer_move(Vec2::new(x, y), now_ms()) {
            s.paint(&frame);
        }
    });
}

#[wasm_bindgen]
pub fn pointer_up() {
    with_state(|s| {
        if let Some(session) = s.session.as_mut() {
            session.pointer_up();
        }
    });
}

#[wasm_bindgen]
pub fn pointer_leave() {
    with_state(|s| {
        if let Some(session) = s.session.as_mut() {
            session.pointer_leave();
        }
    });
}

/// Drive from `requestAnimationFrame`, passing its timestamp.
#[wasm_bindgen]
pub fn tick(now_ms: f64) {
    with_state(|s| {
        let Some(session) = s.session.as_mut() else {
            return;
        };
        let frame = session.tick(now_ms);
        let events = session.events_mut().drain();
        if let Some(frame) = frame {
            s.paint(&frame);
        }
        for event in events {
            if event.severity == runtime::Severity::Error {
                web_sys::console::error_1(&JsValue::from_str(&event.message));
            }
        }
    });
}
