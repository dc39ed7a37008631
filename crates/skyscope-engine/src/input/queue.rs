use crate::api::types::PointerKind;

/// Pointer events the view understands, in canvas coordinates.
///
/// `time_ms` is the host's event timestamp. `touches` is the number of
/// touch points still on the screen after the event (always 0 or 1 for a
/// mouse).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A touch/click began at (x, y).
    PointerDown { x: f32, y: f32, time_ms: f64, pointer: PointerKind, touches: u32 },
    /// A touch/cursor moved to (x, y).
    PointerMove { x: f32, y: f32, time_ms: f64, pointer: PointerKind, touches: u32 },
    /// A touch/click ended at (x, y).
    PointerUp { x: f32, y: f32, time_ms: f64, pointer: PointerKind, touches: u32 },
    /// The pointer left the canvas.
    Leave,
    /// The platform aborted the pointer stream.
    Cancel,
}

impl InputEvent {
    pub fn down(x: f32, y: f32, time_ms: f64, pointer: PointerKind) -> Self {
        InputEvent::PointerDown { x, y, time_ms, pointer, touches: 1 }
    }

    pub fn moved(x: f32, y: f32, time_ms: f64, pointer: PointerKind) -> Self {
        InputEvent::PointerMove { x, y, time_ms, pointer, touches: 1 }
    }

    pub fn up(x: f32, y: f32, time_ms: f64, pointer: PointerKind) -> Self {
        InputEvent::PointerUp { x, y, time_ms, pointer, touches: 0 }
    }
}

/// A queue of input events.
/// JS writes events into the queue; Rust reads and drains them each frame.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    /// Push a new input event (called from JS via wasm-bindgen).
    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
