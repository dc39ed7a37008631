pub mod clock;
pub mod runner;
pub mod source;

use std::cell::RefCell;

use skyscope_engine::{InputEvent, PlaybackMode, PointerKind, TimeUnit, ViewConfig};
use wasm_bindgen::prelude::*;

pub use runner::ViewRunner;

thread_local! {
    static RUNNER: RefCell<Option<ViewRunner>> = const { RefCell::new(None) };
}

/// Run `f` on the runner. `None` before `sky_init` (or if the runner is
/// already borrowed further up the stack).
pub(crate) fn with_runner<R>(f: impl FnOnce(&mut ViewRunner) -> R) -> Option<R> {
    RUNNER.with(|cell| cell.try_borrow_mut().ok()?.as_mut().map(f))
}

fn time_unit(code: u32) -> Option<TimeUnit> {
    match code {
        1 => Some(TimeUnit::Day),
        2 => Some(TimeUnit::Month),
        3 => Some(TimeUnit::Year),
        _ => None,
    }
}

/// Create the view and fetch the first snapshot.
///
/// `config_json` may be empty; missing fields take their defaults. An
/// invalid config is logged and replaced by the defaults.
#[wasm_bindgen]
pub fn sky_init(config_json: &str, endpoint: &str) {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let config = if config_json.trim().is_empty() {
        ViewConfig::default()
    } else {
        ViewConfig::from_json(config_json).unwrap_or_else(|e| {
            log::error!("invalid view config: {e}; using defaults");
            ViewConfig::default()
        })
    };
    let runner = ViewRunner::new(config, endpoint.to_string());

    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(runner);
    });

    with_runner(|r| r.init());
    log::info!("skyscope: initialized ({endpoint})");
}

#[wasm_bindgen]
pub fn sky_tick(dt_ms: f64) {
    with_runner(|r| r.tick(dt_ms));
}

// ---- Pointer input ----

#[wasm_bindgen]
pub fn sky_pointer_down(x: f32, y: f32, time_ms: f64, pointer: u32, touches: u32) {
    let pointer = PointerKind::from_code(pointer);
    with_runner(|r| r.push_input(InputEvent::PointerDown { x, y, time_ms, pointer, touches }));
}

#[wasm_bindgen]
pub fn sky_pointer_move(x: f32, y: f32, time_ms: f64, pointer: u32, touches: u32) {
    let pointer = PointerKind::from_code(pointer);
    with_runner(|r| r.push_input(InputEvent::PointerMove { x, y, time_ms, pointer, touches }));
}

#[wasm_bindgen]
pub fn sky_pointer_up(x: f32, y: f32, time_ms: f64, pointer: u32, touches: u32) {
    let pointer = PointerKind::from_code(pointer);
    with_runner(|r| r.push_input(InputEvent::PointerUp { x, y, time_ms, pointer, touches }));
}

#[wasm_bindgen]
pub fn sky_pointer_leave() {
    with_runner(|r| r.push_input(InputEvent::Leave));
}

#[wasm_bindgen]
pub fn sky_pointer_cancel() {
    with_runner(|r| r.push_input(InputEvent::Cancel));
}

// ---- View commands ----

#[wasm_bindgen]
pub fn sky_change_zoom(delta: i32) {
    with_runner(|r| r.view_mut().change_zoom(delta));
}

#[wasm_bindgen]
pub fn sky_plus_zoom() {
    with_runner(|r| r.view_mut().plus_zoom());
}

#[wasm_bindgen]
pub fn sky_set_zoom_preset(level: i32) {
    with_runner(|r| r.view_mut().set_zoom_preset(level));
}

#[wasm_bindgen]
pub fn sky_center_button() {
    with_runner(|r| r.view_mut().center_button());
}

#[wasm_bindgen]
pub fn sky_center_on_selection() {
    with_runner(|r| r.view_mut().center_on_selection());
}

#[wasm_bindgen]
pub fn sky_clear_selection() {
    with_runner(|r| r.view_mut().clear_selection());
}

/// `mode`: 1 realtime, 2 day, 3 month, 4 year.
#[wasm_bindgen]
pub fn sky_toggle_playback(mode: u32, rate: i32) {
    let Some(mode) = PlaybackMode::from_code(mode) else {
        log::warn!("unknown playback mode {mode}");
        return;
    };
    with_runner(|r| r.view_mut().toggle_playback(mode, rate));
}

#[wasm_bindgen]
pub fn sky_stop_playback() {
    with_runner(|r| r.view_mut().stop_playback());
}

/// `unit`: 1 day, 2 month, 3 year.
#[wasm_bindgen]
pub fn sky_adjust_time(unit: u32, amount: i32) {
    let Some(unit) = time_unit(unit) else {
        log::warn!("unknown time unit {unit}");
        return;
    };
    with_runner(|r| r.view_mut().adjust_time(unit, amount));
}

/// Take the text of the time input and sync right away.
#[wasm_bindgen]
pub fn sky_submit_time(text: &str) {
    with_runner(|r| r.view_mut().submit_time_text(text));
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_events_ptr() -> *const f32 {
    with_runner(|r| r.events_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_events_len() -> u32 {
    with_runner(|r| r.events_len()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_labels_json() -> String {
    with_runner(|r| r.labels_json().to_string()).unwrap_or_else(|| "[]".to_string())
}

#[wasm_bindgen]
pub fn get_status_text() -> String {
    with_runner(|r| r.status_text()).unwrap_or_default()
}

#[wasm_bindgen]
pub fn get_zoom_text() -> String {
    with_runner(|r| r.zoom_text()).unwrap_or_default()
}

#[wasm_bindgen]
pub fn get_zoom_level() -> i32 {
    with_runner(|r| r.view().state().zoom_level()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_time_text() -> String {
    with_runner(|r| r.view().time_text().to_string()).unwrap_or_default()
}

/// Name of the active selection, if any.
#[wasm_bindgen]
pub fn get_selection() -> Option<String> {
    with_runner(|r| r.view().state().active_selection().map(|id| id.to_string())).flatten()
}

#[wasm_bindgen]
pub fn get_entity_info_json() -> String {
    with_runner(|r| r.entity_info_json()).unwrap_or_else(|| "null".to_string())
}

#[wasm_bindgen]
pub fn get_playback_mode() -> u32 {
    with_runner(|r| r.playback_code()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_last_error() -> Option<String> {
    with_runner(|r| r.view().last_error().map(|e| e.to_string())).flatten()
}

#[wasm_bindgen]
pub fn is_dragging() -> bool {
    with_runner(|r| r.view().is_dragging()).unwrap_or(false)
}

// ---- Vector accessors (only when vectors feature is enabled) ----

#[cfg(feature = "vectors")]
#[wasm_bindgen]
pub fn get_vector_vertices_ptr() -> *const f32 {
    with_runner(|r| r.vector_vertices_ptr()).unwrap_or(std::ptr::null())
}

#[cfg(feature = "vectors")]
#[wasm_bindgen]
pub fn get_vector_vertex_count() -> u32 {
    with_runner(|r| r.vector_vertex_count()).unwrap_or(0)
}
