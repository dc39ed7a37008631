#[cfg(feature = "vectors")]
use serde::Serialize;
use skyscope_engine::{
    InputEvent, InputQueue, PlaybackState, SkyView, SyncError, SyncResponse, ViewConfig, ViewEvent,
};
#[cfg(feature = "vectors")]
use skyscope_engine::{Label, VectorColor, VectorState};

use crate::clock::JsClock;
use crate::source::HttpSource;

/// Label as handed to the page, colors as CSS strings.
#[cfg(feature = "vectors")]
#[derive(Serialize)]
struct LabelOut<'a> {
    text: &'a str,
    x: f32,
    y: f32,
    size: f32,
    bold: bool,
    color: String,
    rotation: f32,
    centered: bool,
}

#[cfg(feature = "vectors")]
fn css(color: VectorColor) -> String {
    let c = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!("rgba({}, {}, {}, {})", c(color.r), c(color.g), c(color.b), color.a)
}

#[cfg(feature = "vectors")]
fn labels_to_json(labels: &[Label]) -> String {
    let out: Vec<LabelOut> = labels
        .iter()
        .map(|l| LabelOut {
            text: &l.text,
            x: l.position.x,
            y: l.position.y,
            size: l.size_px,
            bold: l.bold,
            color: css(l.color),
            rotation: l.rotation,
            centered: l.centered,
        })
        .collect();
    serde_json::to_string(&out).unwrap_or_else(|e| {
        log::warn!("label encoding failed: {e}");
        "[]".to_string()
    })
}

/// Wires the view controller to the page's frame loop.
///
/// The page keeps one `ViewRunner` in a `thread_local!` and calls the free
/// functions exported from `lib.rs`, because wasm-bindgen cannot export
/// generic structs directly.
pub struct ViewRunner {
    view: SkyView<HttpSource>,
    input: InputQueue,
    /// Events of the last frame, read by the page as flat floats.
    events: Vec<ViewEvent>,
    #[cfg(feature = "vectors")]
    vectors: VectorState,
    labels_json: String,
}

impl ViewRunner {
    pub fn new(config: ViewConfig, endpoint: String) -> Self {
        Self {
            view: SkyView::new(config, HttpSource::new(endpoint), Box::new(JsClock)),
            input: InputQueue::new(),
            events: Vec::with_capacity(32),
            #[cfg(feature = "vectors")]
            vectors: VectorState::new(),
            labels_json: "[]".to_string(),
        }
    }

    /// Fetch the first snapshot.
    pub fn init(&mut self) {
        self.view.start();
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// One frame: feed input, advance timers, redraw, collect events.
    pub fn tick(&mut self, dt_ms: f64) {
        for event in self.input.drain() {
            self.view.handle_input(&event);
        }
        self.view.tick(dt_ms);

        #[cfg(feature = "vectors")]
        {
            let labels = self.view.render(&mut self.vectors);
            self.labels_json = labels_to_json(&labels);
        }

        self.events.clear();
        self.events.extend(self.view.drain_events());
    }

    pub fn complete_sync(&mut self, seq: u64, result: Result<SyncResponse, SyncError>) {
        self.view.complete_sync(seq, result);
    }

    pub fn view(&self) -> &SkyView<HttpSource> {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut SkyView<HttpSource> {
        &mut self.view
    }

    // ---- Pointer accessors for direct memory reads ----

    pub fn events_ptr(&self) -> *const f32 {
        self.events.as_ptr() as *const f32
    }

    pub fn events_len(&self) -> u32 {
        self.events.len() as u32
    }

    #[cfg(feature = "vectors")]
    pub fn vector_vertices_ptr(&self) -> *const f32 {
        self.vectors.buffer_ptr()
    }

    #[cfg(feature = "vectors")]
    pub fn vector_vertex_count(&self) -> u32 {
        self.vectors.vertex_count() as u32
    }

    pub fn labels_json(&self) -> &str {
        &self.labels_json
    }

    // ---- Text surfaces ----

    pub fn status_text(&self) -> String {
        self.view.status().text()
    }

    pub fn zoom_text(&self) -> String {
        self.view.status().zoom_text()
    }

    pub fn entity_info_json(&self) -> String {
        match self.view.entity_info() {
            Some(info) => serde_json::to_string(info).unwrap_or_else(|e| {
                log::warn!("entity info encoding failed: {e}");
                "null".to_string()
            }),
            None => "null".to_string(),
        }
    }

    pub fn playback_code(&self) -> u32 {
        match self.view.playback() {
            PlaybackState::Stopped => 0,
            PlaybackState::Playing { mode, .. } => mode.code(),
        }
    }
}
