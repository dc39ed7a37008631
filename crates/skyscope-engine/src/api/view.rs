//! The view controller: owns the viewport state and drives every
//! interaction, timer and sync round trip.

use glam::Vec2;

use crate::api::config::ViewConfig;
use crate::api::types::{EntityId, PointerKind, ViewEvent};
use crate::bridge::protocol::{EntityInfo, PanOffset, SyncError, SyncRequest, SyncResponse};
use crate::core::scale::LevelParams;
use crate::core::snapshot::SnapshotFrame;
use crate::core::state::ViewportState;
use crate::core::time::{ClockTime, TimeInput, TimeUnit, WallClock};
use crate::input::gesture::{Gesture, InputController};
use crate::input::queue::InputEvent;
use crate::systems::auto_center::{AutoCenter, AutoCenterDriver};
use crate::systems::feedback::TapPulse;
use crate::systems::playback::{PlaybackController, PlaybackMode, PlaybackState};
use crate::systems::selection::hit_test;
use crate::systems::sync::{StatusLine, UpdateScheduler};

/// Where snapshots come from.
///
/// `send` starts a round trip and returns immediately. The host reports the
/// outcome through [`SkyView::complete_sync`] with the same `seq`.
pub trait DataSource {
    fn send(&mut self, seq: u64, request: SyncRequest);
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
    seq: u64,
    pan_basis: Vec2,
}

pub struct SkyView<S: DataSource> {
    config: ViewConfig,
    state: ViewportState,
    time_input: TimeInput,
    wall: Box<dyn WallClock>,
    source: S,
    scheduler: UpdateScheduler,
    input: InputController,
    auto_center: Option<AutoCenterDriver>,
    playback: PlaybackController,
    pulse: Option<TapPulse>,
    status: StatusLine,
    entity_info: Option<EntityInfo>,
    last_error: Option<SyncError>,
    in_flight: Option<InFlight>,
    events: Vec<ViewEvent>,
    now_ms: f64,
}

impl<S: DataSource> SkyView<S> {
    pub fn new(config: ViewConfig, source: S, wall: Box<dyn WallClock>) -> Self {
        let clock = wall.now();
        let state = ViewportState::new(config.initial_zoom, clock);
        let time_input = TimeInput::new(clock);
        let status = StatusLine::local(
            state.zoom_level(),
            LevelParams::for_zoom(state.zoom_level()).mode.label(),
            time_input.text(),
            None,
        );
        Self {
            scheduler: UpdateScheduler::new(config.debounce_ms),
            input: InputController::new(config.drag_threshold, config.tap_window_ms),
            playback: PlaybackController::new(config.max_playback_ticks_per_frame),
            config,
            state,
            time_input,
            wall,
            source,
            auto_center: None,
            pulse: None,
            status,
            entity_info: None,
            last_error: None,
            in_flight: None,
            events: Vec::with_capacity(16),
            now_ms: 0.0,
        }
    }

    /// Fetch the first snapshot.
    pub fn start(&mut self) {
        self.sync_now();
    }

    // ---- Frame loop ----

    /// Advance all timers by `dt_ms` and issue a sync if one is due.
    pub fn tick(&mut self, dt_ms: f64) {
        let dt_ms = dt_ms.max(0.0);
        self.now_ms += dt_ms;

        if let Some(pulse) = self.pulse.as_mut() {
            if !pulse.tick(dt_ms) {
                self.pulse = None;
            }
            self.emit_redraw();
        }

        self.step_auto_center(dt_ms);

        let ticks = self.playback.advance(dt_ms);
        for _ in 0..ticks {
            let base = self.time_input.resolve(self.wall.as_ref());
            let next = self.playback.step(base, self.wall.as_ref());
            self.set_clock(next);
            self.request_sync();
        }

        if let Some(seq) = self.scheduler.poll(self.now_ms) {
            self.dispatch(seq);
        }
    }

    /// Feed one pointer event through the gesture recognizer.
    pub fn handle_input(&mut self, event: &InputEvent) {
        match self.input.handle(event) {
            Some(Gesture::Press) => self.cancel_auto_center(),
            Some(Gesture::Pan(delta)) => {
                self.state.pan_by(delta);
                self.emit_redraw();
            }
            Some(Gesture::DragEnd) => self.request_sync(),
            Some(Gesture::Tap { at, pointer }) => self.select_at(at, pointer),
            None => {}
        }
    }

    // ---- Sync ----

    /// Restart the debounce window.
    pub fn request_sync(&mut self) {
        self.scheduler.request(self.now_ms);
    }

    /// Issue a request immediately, dropping any pending debounce.
    pub fn sync_now(&mut self) {
        let seq = self.scheduler.issue_now();
        self.dispatch(seq);
    }

    fn dispatch(&mut self, seq: u64) {
        let clock = self.time_input.resolve(self.wall.as_ref());
        if clock != self.state.clock() {
            self.state.set_clock(clock);
            self.emit_clock();
        }
        let pan = self.state.pan();
        let request = SyncRequest {
            clock: clock.to_string(),
            zoom_level: self.state.zoom_level(),
            pan: PanOffset { x: pan.x, y: pan.y },
            selection: self.state.active_selection().map(|id| id.as_str().to_string()),
        };
        self.in_flight = Some(InFlight { seq, pan_basis: pan });
        self.source.send(seq, request);
    }

    /// Deliver the outcome of request `seq`. Anything but the latest
    /// request is discarded.
    pub fn complete_sync(&mut self, seq: u64, result: Result<SyncResponse, SyncError>) {
        if !self.scheduler.accept(seq) {
            return;
        }
        let pan_basis = self
            .in_flight
            .filter(|f| f.seq == seq)
            .map_or(self.state.pan(), |f| f.pan_basis);
        self.in_flight = None;

        match result {
            Ok(response) => {
                log::debug!("sync #{seq} applied ({})", response.snapshot.level.as_str());
                self.state
                    .replace_snapshot(SnapshotFrame::new(response.snapshot, pan_basis, seq));
                let local = self.local_status();
                self.status = match &response.status {
                    Some(summary) => StatusLine::confirmed(summary, local),
                    None => StatusLine::unknown(local),
                };
                self.entity_info = response.selected_entity_info;
                self.last_error = None;
                self.emit_status();
                self.emit_redraw();
            }
            Err(err) => {
                log::warn!("sync #{seq} failed: {err}");
                self.status = StatusLine::error(self.local_status());
                self.last_error = Some(err);
                self.emit(ViewEvent::SYNC_FAILED, seq as f32, 0.0, 0.0);
                self.emit_status();
            }
        }
    }

    // ---- Selection ----

    /// Hit-test a tap at canvas position `at` and select what is there.
    pub fn select_at(&mut self, at: Vec2, pointer: PointerKind) {
        let Some(snapshot) = self.state.current_snapshot() else {
            log::debug!("tap ignored: no snapshot for the active level");
            return;
        };
        let point = at - self.state.predicted_translation();
        let Some(id) = hit_test(snapshot, point, pointer, &self.config.hit_margins) else {
            return;
        };
        log::info!("selected {id}");
        if self.state.select(id) {
            self.emit(ViewEvent::SELECTION, 1.0, 0.0, 0.0);
        }
        self.pulse = Some(TapPulse::new(
            at,
            self.config.feedback_radius,
            self.config.feedback_opacity,
            self.config.feedback_frame_ms,
        ));
        self.emit(ViewEvent::TOUCH_FEEDBACK, at.x, at.y, 0.0);
        self.sync_now();
    }

    /// Explicitly drop the selection.
    pub fn clear_selection(&mut self) {
        if self.state.clear_selection() {
            log::info!("selection cleared");
            self.emit(ViewEvent::SELECTION, 0.0, 0.0, 0.0);
        }
        self.entity_info = None;
        self.sync_now();
    }

    // ---- Zoom & centering ----

    pub fn change_zoom(&mut self, delta: i32) {
        if self.state.try_change_zoom(delta) {
            self.request_sync();
        }
    }

    /// Zoom in one level and, with a selection, keep it centered.
    pub fn plus_zoom(&mut self) {
        self.change_zoom(1);
        if self.state.active_selection().is_some() {
            self.center_on_selection();
        }
    }

    /// Pan so the selected body lands on the canvas center, or back to the
    /// origin without a selection.
    pub fn center_on_selection(&mut self) {
        self.cancel_auto_center();
        match self.state.active_selection().cloned() {
            Some(id) => match self.selection_target(&id) {
                Some((pos, basis)) => self.state.set_pan(basis + (self.config.canvas_center() - pos)),
                None => log::debug!("cannot center on {id}: not in the current snapshot"),
            },
            None => self.state.set_pan(Vec2::ZERO),
        }
        self.emit_redraw();
        self.request_sync();
    }

    /// Drawn position of `id` and the pan basis of the snapshot it came from.
    fn selection_target(&self, id: &EntityId) -> Option<(Vec2, Vec2)> {
        let frame = self.state.snapshot()?;
        let snapshot = self.state.current_snapshot()?;
        snapshot.position_of(id.as_str()).map(|pos| (pos, frame.pan_basis))
    }

    /// Zoom to level 3 and center on the selection if there is one.
    pub fn center_button(&mut self) {
        self.state.set_zoom(3);
        if self.state.active_selection().is_some() {
            self.center_on_selection();
        } else {
            self.request_sync();
        }
    }

    /// Jump to a fixed zoom level. Pauses playback.
    pub fn set_zoom_preset(&mut self, level: i32) {
        if !self.state.set_zoom(level) {
            return;
        }
        self.stop_playback();
        let selected = self.state.active_selection().is_some();
        if selected && (level == 20 || level == 3) {
            self.center_on_selection();
        } else if !selected && level <= 0 {
            self.start_auto_center();
        } else {
            self.request_sync();
        }
    }

    /// Glide the pan offset back to the origin, then sync once.
    pub fn start_auto_center(&mut self) {
        let steps = AutoCenter::new(
            self.state.pan(),
            self.config.auto_center_steps,
            self.config.auto_center_epsilon,
        );
        self.auto_center = Some(AutoCenterDriver::new(steps, self.config.auto_center_frame_ms));
        self.step_auto_center(0.0);
    }

    pub fn cancel_auto_center(&mut self) {
        if let Some(driver) = self.auto_center.as_mut() {
            driver.cancel();
        }
        self.auto_center = None;
    }

    pub fn is_auto_centering(&self) -> bool {
        self.auto_center.is_some()
    }

    fn step_auto_center(&mut self, dt_ms: f64) {
        let Some(driver) = self.auto_center.as_mut() else {
            return;
        };
        let Some(step) = driver.tick(dt_ms) else {
            return;
        };
        self.state.set_pan(step.pan);
        self.emit_redraw();
        if step.last {
            self.auto_center = None;
            self.request_sync();
        }
    }

    // ---- Time ----

    /// Shift the clock shown in the time input.
    pub fn adjust_time(&mut self, unit: TimeUnit, amount: i32) {
        let base = self.time_input.resolve(self.wall.as_ref());
        self.set_clock(base.advance(unit, amount));
        self.sync_now();
    }

    /// Take a user-typed clock. Invalid text falls back to the wall clock.
    pub fn submit_time_text(&mut self, text: &str) {
        self.time_input.set_text(text);
        let clock = self.time_input.resolve(self.wall.as_ref());
        self.set_clock(clock);
        self.sync_now();
    }

    pub fn toggle_playback(&mut self, mode: PlaybackMode, rate: i32) {
        let state = self.playback.toggle(mode, rate);
        self.emit_playback(state);
    }

    pub fn stop_playback(&mut self) {
        if self.playback.is_playing() {
            self.playback.stop();
            self.emit_playback(PlaybackState::Stopped);
        }
    }

    fn set_clock(&mut self, clock: ClockTime) {
        self.state.set_clock(clock);
        self.time_input.show(clock);
        self.emit_clock();
    }

    // ---- Events ----

    fn emit(&mut self, kind: f32, a: f32, b: f32, c: f32) {
        self.events.push(ViewEvent::new(kind, a, b, c));
    }

    fn emit_redraw(&mut self) {
        let t = self.state.predicted_translation();
        self.emit(ViewEvent::REDRAW, t.x, t.y, 0.0);
    }

    fn emit_status(&mut self) {
        let fallback = if self.status.is_fallback() { 1.0 } else { 0.0 };
        self.emit(ViewEvent::STATUS, self.status.zoom_level as f32, fallback, 0.0);
    }

    fn emit_clock(&mut self) {
        let (year, month, day) = self.state.clock().date();
        self.emit(ViewEvent::CLOCK, year as f32, month as f32, day as f32);
    }

    fn emit_playback(&mut self, state: PlaybackState) {
        match state {
            PlaybackState::Stopped => self.emit(ViewEvent::PLAYBACK, 0.0, 0.0, 0.0),
            PlaybackState::Playing { mode, rate } => {
                self.emit(ViewEvent::PLAYBACK, mode.code() as f32, rate as f32, 0.0)
            }
        }
    }

    /// Take the events emitted since the last call.
    pub fn drain_events(&mut self) -> Vec<ViewEvent> {
        std::mem::take(&mut self.events)
    }

    fn local_status(&self) -> StatusLine {
        let zoom = self.state.zoom_level();
        StatusLine::local(
            zoom,
            LevelParams::for_zoom(zoom).mode.label(),
            self.time_input.text(),
            self.state.active_selection().map(EntityId::as_str),
        )
    }

    // ---- Accessors ----

    pub fn state(&self) -> &ViewportState {
        &self.state
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn status(&self) -> &StatusLine {
        &self.status
    }

    pub fn entity_info(&self) -> Option<&EntityInfo> {
        self.entity_info.as_ref()
    }

    pub fn last_error(&self) -> Option<&SyncError> {
        self.last_error.as_ref()
    }

    pub fn time_text(&self) -> &str {
        self.time_input.text()
    }

    pub fn playback(&self) -> PlaybackState {
        self.playback.state()
    }

    pub fn pulse(&self) -> Option<&TapPulse> {
        self.pulse.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.input.is_dragging()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Tessellate the live snapshot at the predicted translation.
    #[cfg(feature = "vectors")]
    pub fn render(&self, vectors: &mut crate::systems::vector::VectorState) -> Vec<crate::renderer::Label> {
        crate::renderer::SkyRenderer::new(
            vectors,
            LevelParams::for_zoom(self.state.zoom_level()),
            self.config.canvas_center(),
            self.state.predicted_translation(),
        )
        .draw(self.state.snapshot().map(|f| &f.snapshot), self.pulse.as_ref())
    }
}
