use egui::{PointerButton, Rect};

use super::InputEvent;
use crate::canvas::Canvas;

/// Where the controller is in a press-drag-release interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControllerState {
    #[default]
    Idle,
    /// A stroke started by `button` is running
    Stroking { button: PointerButton },
}

/// Turns pointer events into stroke calls on a [`Canvas`].
///
/// Only one stroke runs at a time. While it does, presses of any button and
/// releases of other buttons are ignored, and moves only count while the
/// initiating button is held.
#[derive(Debug, Default)]
pub struct StrokeController {
    state: ControllerState,
}

impl StrokeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn is_stroking(&self) -> bool {
        matches!(self.state, ControllerState::Stroking { .. })
    }

    /// Feed one event. Returns the region the canvas damaged, if any.
    pub fn handle_event(&mut self, event: &InputEvent, canvas: &mut Canvas) -> Option<Rect> {
        match (self.state, event) {
            (ControllerState::Idle, InputEvent::PointerDown { position, button }) => {
                if canvas.begin_stroke(*position, *button) {
                    self.state = ControllerState::Stroking { button: *button };
                }
                None
            }
            (
                ControllerState::Stroking { button },
                InputEvent::PointerMove {
                    position,
                    held_buttons,
                },
            ) if held_buttons.contains(&button) => canvas.extend_stroke(*position),
            (ControllerState::Stroking { button }, InputEvent::PointerUp { position, button: released })
                if *released == button =>
            {
                self.state = ControllerState::Idle;
                canvas.end_stroke(*position)
            }
            (ControllerState::Stroking { button }, InputEvent::PointerDown { button: pressed, .. }) => {
                log::debug!("Ignoring {:?} press while {:?} stroke is active", pressed, button);
                None
            }
            _ => None,
        }
    }

    /// Feed a batch of events in order. Returns the union of the damage.
    pub fn handle_events(&mut self, events: &[InputEvent], canvas: &mut Canvas) -> Option<Rect> {
        events
            .iter()
            .filter_map(|event| self.handle_event(event, canvas))
            .reduce(|a, b| a.union(b))
    }

    /// Forget the running interaction without committing anything
    pub fn cancel(&mut self) {
        self.state = ControllerState::Idle;
    }
}
