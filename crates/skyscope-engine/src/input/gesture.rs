//! Pointer stream → gesture discrimination.
//!
//! `Idle → Pressed → {Dragging | Tapped} → Idle`, one pointer stream at a
//! time. Additional touch points never start a second stream.

use glam::Vec2;

use crate::api::types::PointerKind;
use crate::input::queue::InputEvent;

/// What the view should do in response to a pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    /// A new stream began.
    Press,
    /// Move the view by this many pixels and redraw locally.
    Pan(Vec2),
    /// A drag finished (or was cut short). Reconcile once.
    DragEnd,
    /// Press and release without a drag.
    Tap { at: Vec2, pointer: PointerKind },
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Idle,
    Pressed { origin: Vec2, started_ms: f64, pointer: PointerKind },
    Dragging { last: Vec2 },
    /// Multi-touch in progress. Waits for every finger to lift.
    Ignored,
}

#[derive(Debug, Clone)]
pub struct InputController {
    phase: Phase,
    drag_threshold: f32,
    tap_window_ms: f64,
}

impl InputController {
    pub fn new(drag_threshold: f32, tap_window_ms: f64) -> Self {
        Self {
            phase: Phase::Idle,
            drag_threshold,
            tap_window_ms,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging { .. })
    }

    pub fn is_idle(&self) -> bool {
        self.phase == Phase::Idle
    }

    pub fn handle(&mut self, event: &InputEvent) -> Option<Gesture> {
        match *event {
            InputEvent::PointerDown { x, y, time_ms, pointer, touches } => {
                self.press(Vec2::new(x, y), time_ms, pointer, touches)
            }
            InputEvent::PointerMove { x, y, touches, pointer, .. } => {
                if pointer == PointerKind::Touch && touches != 1 {
                    return None;
                }
                self.drag_to(Vec2::new(x, y))
            }
            InputEvent::PointerUp { x, y, time_ms, touches, .. } => {
                self.release(Vec2::new(x, y), time_ms, touches)
            }
            InputEvent::Leave | InputEvent::Cancel => {
                let was_dragging = self.is_dragging();
                self.phase = Phase::Idle;
                was_dragging.then_some(Gesture::DragEnd)
            }
        }
    }

    fn press(&mut self, at: Vec2, time_ms: f64, pointer: PointerKind, touches: u32) -> Option<Gesture> {
        match self.phase {
            Phase::Idle | Phase::Ignored | Phase::Pressed { .. } if touches <= 1 => {
                self.phase = Phase::Pressed { origin: at, started_ms: time_ms, pointer };
                Some(Gesture::Press)
            }
            Phase::Pressed { .. } | Phase::Idle | Phase::Ignored => {
                // A second finger landed before the first one moved.
                self.phase = Phase::Ignored;
                None
            }
            Phase::Dragging { .. } => None,
        }
    }

    fn drag_to(&mut self, at: Vec2) -> Option<Gesture> {
        match self.phase {
            Phase::Pressed { origin, .. } => {
                let moved = at - origin;
                if moved.length() > self.drag_threshold {
                    self.phase = Phase::Dragging { last: at };
                    Some(Gesture::Pan(moved))
                } else {
                    None
                }
            }
            Phase::Dragging { last } => {
                self.phase = Phase::Dragging { last: at };
                let delta = at - last;
                (delta != Vec2::ZERO).then_some(Gesture::Pan(delta))
            }
            Phase::Idle | Phase::Ignored => None,
        }
    }

    fn release(&mut self, at: Vec2, time_ms: f64, touches: u32) -> Option<Gesture> {
        let phase = self.phase;
        self.phase = if touches == 0 { Phase::Idle } else { Phase::Ignored };
        match phase {
            Phase::Dragging { .. } => Some(Gesture::DragEnd),
            Phase::Pressed { started_ms, pointer, .. } if touches == 0 => {
                let quick = match pointer {
                    PointerKind::Mouse => true,
                    PointerKind::Touch => time_ms - started_ms < self.tap_window_ms,
                };
                quick.then_some(Gesture::Tap { at, pointer })
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOUSE: PointerKind = PointerKind::Mouse;
    const TOUCH: PointerKind = PointerKind::Touch;

    fn controller() -> InputController {
        InputController::new(10.0, 300.0)
    }

    #[test]
    fn small_motion_is_a_tap() {
        let mut c = controller();
        assert_eq!(c.handle(&InputEvent::down(100.0, 100.0, 0.0, MOUSE)), Some(Gesture::Press));
        assert_eq!(c.handle(&InputEvent::moved(104.0, 103.0, 10.0, MOUSE)), None);
        assert_eq!(
            c.handle(&InputEvent::up(104.0, 103.0, 20.0, MOUSE)),
            Some(Gesture::Tap { at: Vec2::new(104.0, 103.0), pointer: MOUSE })
        );
        assert!(c.is_idle());
    }

    #[test]
    fn drag_applies_accumulated_displacement_then_deltas() {
        let mut c = controller();
        c.handle(&InputEvent::down(100.0, 100.0, 0.0, MOUSE));
        assert_eq!(c.handle(&InputEvent::moved(106.0, 100.0, 5.0, MOUSE)), None);
        assert_eq!(
            c.handle(&InputEvent::moved(112.0, 100.0, 10.0, MOUSE)),
            Some(Gesture::Pan(Vec2::new(12.0, 0.0)))
        );
        assert_eq!(
            c.handle(&InputEvent::moved(115.0, 98.0, 15.0, MOUSE)),
            Some(Gesture::Pan(Vec2::new(3.0, -2.0)))
        );
        assert_eq!(c.handle(&InputEvent::up(115.0, 98.0, 20.0, MOUSE)), Some(Gesture::DragEnd));
    }

    #[test]
    fn slow_touch_is_not_a_tap_but_slow_click_is() {
        let mut c = controller();
        c.handle(&InputEvent::down(0.0, 0.0, 0.0, TOUCH));
        assert_eq!(c.handle(&InputEvent::up(0.0, 0.0, 300.0, TOUCH)), None);

        c.handle(&InputEvent::down(0.0, 0.0, 0.0, MOUSE));
        assert!(matches!(c.handle(&InputEvent::up(0.0, 0.0, 5_000.0, MOUSE)), Some(Gesture::Tap { .. })));
    }

    #[test]
    fn second_finger_prevents_tap() {
        let mut c = controller();
        c.handle(&InputEvent::down(0.0, 0.0, 0.0, TOUCH));
        let second = InputEvent::PointerDown { x: 50.0, y: 50.0, time_ms: 10.0, pointer: TOUCH, touches: 2 };
        assert_eq!(c.handle(&second), None);
        let lift = InputEvent::PointerUp { x: 0.0, y: 0.0, time_ms: 50.0, pointer: TOUCH, touches: 1 };
        assert_eq!(c.handle(&lift), None);
        assert_eq!(c.handle(&InputEvent::up(50.0, 50.0, 60.0, TOUCH)), None);
        assert!(c.is_idle());
    }

    #[test]
    fn multi_touch_moves_do_not_pan() {
        let mut c = controller();
        c.handle(&InputEvent::down(0.0, 0.0, 0.0, TOUCH));
        let pinch = InputEvent::PointerMove { x: 80.0, y: 0.0, time_ms: 10.0, pointer: TOUCH, touches: 2 };
        assert_eq!(c.handle(&pinch), None);
        assert!(!c.is_dragging());
    }

    #[test]
    fn leave_and_cancel_end_drag_once() {
        for end in [InputEvent::Leave, InputEvent::Cancel] {
            let mut c = controller();
            c.handle(&InputEvent::down(0.0, 0.0, 0.0, MOUSE));
            c.handle(&InputEvent::moved(30.0, 0.0, 5.0, MOUSE));
            assert_eq!(c.handle(&end), Some(Gesture::DragEnd));
            assert_eq!(c.handle(&end), None);
            assert_eq!(c.handle(&InputEvent::up(30.0, 0.0, 9.0, MOUSE)), None);
        }
    }

    #[test]
    fn cancel_before_drag_is_silent() {
        let mut c = controller();
        c.handle(&InputEvent::down(0.0, 0.0, 0.0, TOUCH));
        assert_eq!(c.handle(&InputEvent::Cancel), None);
        assert!(c.is_idle());
    }
}
