mod engine;
pub mod orrery;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    HtmlCanvasElement, KeyboardEvent, MouseEvent, Request, RequestInit, RequestMode, Response,
    WebGlRenderingContext, Window,
};
use std::cell::RefCell;
use std::rc::Rc;
use crate::engine::renderer::Renderer;
use crate::engine::textures::{TextureBank, TextureUploader};

pub use crate::orrery::{
    BodyId, Camera, CameraMode, CelestialBody, LoadError, LoadWarning, NoTextures,
    OrbitHierarchy, Orrery, OrreryConfig, SimulationControls, TextureLoader, TickContext,
};

struct App {
    orrery: Orrery,
    renderer: Renderer,
    textures: TextureBank,
    canvas: HtmlCanvasElement,
}

thread_local! {
    static APP: RefCell<Option<App>> = RefCell::new(None);
}

fn with_app<R>(f: impl FnOnce(&mut App) -> R) -> Option<R> {
    APP.with(|app| app.borrow_mut().as_mut().map(f))
}

#[wasm_bindgen]
pub async fn init_orrery() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("No window")?;
    let document = window.document().ok_or("No document")?;
    let canvas = document.get_element_by_id("canvas")
        .ok_or("No canvas")?
        .dyn_into::<HtmlCanvasElement>()?;

    let gl = canvas
        .get_context("webgl")?
        .ok_or("No WebGL")?
        .dyn_into::<WebGlRenderingContext>()?;

    let mut renderer = Renderer::new(gl)?;

    let config = match fetch_text(&window, "/assets/config.json").await {
        Ok(text) => OrreryConfig::from_json(&text).unwrap_or_else(|err| {
            web_sys::console::warn_1(&format!("Ignoring malformed config.json: {err}").into());
            OrreryConfig::default()
        }),
        Err(_) => OrreryConfig::default(),
    };

    // The body description is the one asset the orrery cannot run without.
    let description = fetch_text(&window, &config.bodies_path).await.map_err(|err| {
        web_sys::console::error_2(&format!("Unable to read {}", config.bodies_path).into(), &err);
        err
    })?;

    let mut textures = TextureBank::default();
    let hierarchy = {
        let mut uploader = TextureUploader { renderer: &renderer, bank: &mut textures };
        OrbitHierarchy::from_json(&description, &mut uploader, config.au_to_world)
    }
    .map_err(|err| {
        let message = format!("Error: {err}; inspect \"{}\"", config.bodies_path);
        web_sys::console::error_1(&message.as_str().into());
        JsValue::from_str(&message)
    })?;

    for warning in hierarchy.warnings() {
        web_sys::console::warn_1(&format!("Warning: {warning}").into());
    }
    web_sys::console::log_1(
        &format!("Loaded {} bodies, {} textures", hierarchy.len(), textures.len()).into(),
    );

    let orrery = Orrery::new(&config, hierarchy);
    renderer.upload_unit_circle(&orrery.ring().vertices());

    APP.with(|app| *app.borrow_mut() = Some(App { orrery, renderer, textures, canvas: canvas.clone() }));

    // Input handling
    let keydown = Closure::wrap(Box::new(move |event: KeyboardEvent| {
        if with_app(|app| app.orrery.handle_key(&event.key(), true)).unwrap_or(false) {
            event.prevent_default();
        }
    }) as Box<dyn FnMut(_)>);
    window.add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref())?;
    keydown.forget();

    let keyup = Closure::wrap(Box::new(move |event: KeyboardEvent| {
        with_app(|app| app.orrery.handle_key(&event.key(), false));
    }) as Box<dyn FnMut(_)>);
    window.add_event_listener_with_callback("keyup", keyup.as_ref().unchecked_ref())?;
    keyup.forget();

    let mousedown = Closure::wrap(Box::new(move |event: MouseEvent| {
        with_app(|app| app.orrery.handle_mouse_down(event.client_x(), event.client_y()));
    }) as Box<dyn FnMut(_)>);
    canvas.add_event_listener_with_callback("mousedown", mousedown.as_ref().unchecked_ref())?;
    mousedown.forget();

    let mouseup = Closure::wrap(Box::new(move |_event: MouseEvent| {
        with_app(|app| app.orrery.handle_mouse_up());
    }) as Box<dyn FnMut(_)>);
    window.add_event_listener_with_callback("mouseup", mouseup.as_ref().unchecked_ref())?;
    mouseup.forget();

    let mousemove = Closure::wrap(Box::new(move |event: MouseEvent| {
        with_app(|app| app.orrery.handle_mouse_move(event.client_x(), event.client_y()));
    }) as Box<dyn FnMut(_)>);
    window.add_event_listener_with_callback("mousemove", mousemove.as_ref().unchecked_ref())?;
    mousemove.forget();

    // Frame loop: ticks the frame cap turns down are skipped, the loop just waits for the next frame.
    let f = Rc::new(RefCell::new(None));
    let g = f.clone();

    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |now_ms: f64| {
        with_app(|app| {
            if app.orrery.tick(now_ms) {
                let (width, height) = (app.canvas.width() as i32, app.canvas.height() as i32);
                app.orrery.render(&app.renderer, &app.textures, width, height);
                update_ui(&app.orrery);
            }
        });
        if let Some(callback) = f.borrow().as_ref() {
            request_animation_frame(callback);
        }
    }) as Box<dyn FnMut(f64)>));

    if let Some(callback) = g.borrow().as_ref() {
        request_animation_frame(callback);
    }

    Ok(())
}

async fn fetch_text(window: &Window, url: &str) -> Result<String, JsValue> {
    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::Cors);

    let request = Request::new_with_str_and_init(url, &opts)?;
    let resp: Response = JsFuture::from(window.fetch_with_request(&request)).await?.dyn_into()?;
    if !resp.ok() {
        return Err(JsValue::from_str(&format!("{url}: HTTP {}", resp.status())));
    }
    let text = JsFuture::from(resp.text()?).await?;
    text.as_string().ok_or_else(|| JsValue::from_str("Response body is not text"))
}

fn request_animation_frame(f: &Closure<dyn FnMut(f64)>) {
    if let Some(window) = web_sys::window() {
        window.request_animation_frame(f.as_ref().unchecked_ref()).ok();
    }
}

fn update_ui(orrery: &Orrery) {
    if let Some(window) = web_sys::window() {
        if let Some(document) = window.document() {
            if let Some(hud) = document.get_element_by_id("hud") {
                hud.set_text_content(Some(&orrery.hud_text()));
            }
        }
    }
}

/// Body names in declaration order, for populating the selection menu.
#[wasm_bindgen]
pub fn body_names() -> Result<JsValue, JsValue> {
    let names: Vec<String> = with_app(|app| {
        app.orrery.hierarchy().names().into_iter().map(String::from).collect()
    })
    .unwrap_or_default();
    Ok(serde_wasm_bindgen::to_value(&names)?)
}

#[wasm_bindgen]
pub fn anchor_camera(name: &str) -> bool {
    with_app(|app| app.orrery.anchor_camera(name)).unwrap_or(false)
}

#[wasm_bindgen]
pub fn free_fly() {
    with_app(|app| app.orrery.free_fly());
}

#[wasm_bindgen]
pub fn speed_up() {
    with_app(|app| app.orrery.controls_mut().faster());
}

#[wasm_bindgen]
pub fn slow_down() {
    with_app(|app| app.orrery.controls_mut().slower());
}

#[wasm_bindgen]
pub fn toggle_pause() {
    with_app(|app| app.orrery.controls_mut().toggle_pause());
}

#[wasm_bindgen]
pub fn toggle_trajectories() {
    with_app(|app| app.orrery.toggle_trajectories());
}
