use egui::{Context, PointerButton, Pos2, Rect, Response};

mod controller;
pub use controller::{ControllerState, StrokeController};

const BUTTONS: [PointerButton; 3] = [
    PointerButton::Primary,
    PointerButton::Secondary,
    PointerButton::Middle,
];

/// Pointer input in canvas coordinates, independent of the windowing system
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Mouse button was pressed
    PointerDown {
        position: Pos2,
        button: PointerButton,
    },
    /// Mouse button was released
    PointerUp {
        position: Pos2,
        button: PointerButton,
    },
    /// Mouse moved (with or without buttons pressed)
    PointerMove {
        position: Pos2,
        /// Buttons that are currently held down
        held_buttons: Vec<PointerButton>,
    },
}

impl InputEvent {
    pub fn position(&self) -> Pos2 {
        match self {
            InputEvent::PointerDown { position, .. }
            | InputEvent::PointerUp { position, .. }
            | InputEvent::PointerMove { position, .. } => *position,
        }
    }
}

fn buttons_where(test: impl Fn(PointerButton) -> bool) -> Vec<PointerButton> {
    BUTTONS.into_iter().filter(|button| test(*button)).collect()
}

/// Pointer state read from egui for one frame, in screen coordinates
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointerFrame {
    /// Latest pointer position, if the pointer is over the window
    pub position: Option<Pos2>,
    pub pressed: Vec<PointerButton>,
    pub released: Vec<PointerButton>,
    pub held: Vec<PointerButton>,
    /// Whether the canvas widget itself is under the pointer, i.e. not
    /// clipped away or covered by a popup, window or panel
    pub canvas_hovered: bool,
}

impl PointerFrame {
    /// Read this frame's pointer state. `canvas` is the response of the
    /// widget the canvas is painted into.
    pub fn read(ctx: &Context, canvas: &Response) -> Self {
        ctx.input(|input| {
            let pointer = &input.pointer;
            Self {
                position: pointer.latest_pos(),
                pressed: buttons_where(|button| pointer.button_pressed(button)),
                released: buttons_where(|button| pointer.button_released(button)),
                held: buttons_where(|button| pointer.button_down(button)),
                canvas_hovered: canvas.hovered(),
            }
        })
    }
}

/// Handles converting raw egui input into canvas-local [`InputEvent`]s
#[derive(Debug, Default)]
pub struct InputHandler {
    last_pointer_pos: Option<Pos2>,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process this frame's egui input for the canvas widget `canvas`
    pub fn process_input(&mut self, ctx: &Context, canvas: &Response) -> Vec<InputEvent> {
        let frame = PointerFrame::read(ctx, canvas);
        self.translate(&frame, canvas.rect)
    }

    /// Turn one frame of pointer state into events. `canvas_rect` is where
    /// the canvas' top-left pixel is drawn on screen.
    ///
    /// Presses only count when they land on the canvas widget; moves and
    /// releases are reported anywhere so a drag can leave the canvas and
    /// still finish.
    pub fn translate(&mut self, frame: &PointerFrame, canvas_rect: Rect) -> Vec<InputEvent> {
        let mut events = Vec::new();
        let to_canvas = |pos: Pos2| Pos2::new(pos.x - canvas_rect.min.x, pos.y - canvas_rect.min.y);
        let previous_pos = self.last_pointer_pos;

        if let Some(pos) = frame.position {
            if Some(pos) != previous_pos {
                events.push(InputEvent::PointerMove {
                    position: to_canvas(pos),
                    held_buttons: frame.held.clone(),
                });
            }
        }
        self.last_pointer_pos = frame.position;

        // A release outside the window still has to end the stroke
        let Some(pos) = frame.position.or(previous_pos) else {
            return events;
        };
        let on_canvas = frame.canvas_hovered && canvas_rect.contains(pos);
        for button in BUTTONS {
            if on_canvas && frame.pressed.contains(&button) {
                events.push(InputEvent::PointerDown {
                    position: to_canvas(pos),
                    button,
                });
            }
            if frame.released.contains(&button) {
                events.push(InputEvent::PointerUp {
                    position: to_canvas(pos),
                    button,
                });
            }
        }

        events
    }
}
