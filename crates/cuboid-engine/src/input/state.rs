use super::types::{ButtonState, InputEvent, MouseButton};

/// Pointer movement while the primary button is held, in logical pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DragDelta {
    pub dx: f32,
    pub dy: f32,
}

/// Tracks pointer position and the primary button to turn moves into drags.
#[derive(Debug, Default)]
pub struct PointerState {
    /// Last known pointer position in logical pixels.
    pub position: Option<(f32, f32)>,

    /// Whether the left button is currently held.
    pub dragging: bool,
}

impl PointerState {
    /// Applies `ev` and returns the drag delta it produced, if any.
    pub fn apply(&mut self, ev: &InputEvent) -> Option<DragDelta> {
        match *ev {
            InputEvent::PointerMoved { x, y } => {
                let prev = self.position.replace((x, y));
                match prev {
                    Some((px, py)) if self.dragging => Some(DragDelta { dx: x - px, dy: y - py }),
                    _ => None,
                }
            }

            InputEvent::PointerButton { button: MouseButton::Left, state } => {
                self.dragging = state == ButtonState::Pressed;
                None
            }

            InputEvent::PointerLeft => {
                self.position = None;
                None
            }

            // On focus loss, drop the held button so a release outside the window
            // does not leave a stuck drag.
            InputEvent::Focused(false) => {
                self.dragging = false;
                None
            }

            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moved(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerMoved { x, y }
    }

    fn left(state: ButtonState) -> InputEvent {
        InputEvent::PointerButton { button: MouseButton::Left, state }
    }

    #[test]
    fn moves_without_button_are_not_drags() {
        let mut p = PointerState::default();
        assert_eq!(p.apply(&moved(1.0, 1.0)), None);
        assert_eq!(p.apply(&moved(5.0, 3.0)), None);
    }

    #[test]
    fn held_button_yields_deltas() {
        let mut p = PointerState::default();
        p.apply(&moved(10.0, 10.0));
        p.apply(&left(ButtonState::Pressed));

        assert_eq!(p.apply(&moved(14.0, 7.0)), Some(DragDelta { dx: 4.0, dy: -3.0 }));

        p.apply(&left(ButtonState::Released));
        assert_eq!(p.apply(&moved(20.0, 7.0)), None);
    }

    #[test]
    fn leaving_resets_anchor() {
        let mut p = PointerState::default();
        p.apply(&moved(10.0, 10.0));
        p.apply(&left(ButtonState::Pressed));
        p.apply(&InputEvent::PointerLeft);

        // first move after re-entry only anchors
        assert_eq!(p.apply(&moved(50.0, 50.0)), None);
        assert!(p.apply(&moved(51.0, 50.0)).is_some());
    }

    #[test]
    fn focus_loss_ends_drag() {
        let mut p = PointerState::default();
        p.apply(&moved(0.0, 0.0));
        p.apply(&left(ButtonState::Pressed));
        p.apply(&InputEvent::Focused(false));
        assert_eq!(p.apply(&moved(3.0, 0.0)), None);
    }

    #[test]
    fn other_buttons_do_not_drag() {
        let mut p = PointerState::default();
        p.apply(&moved(0.0, 0.0));
        p.apply(&InputEvent::PointerButton { button: MouseButton::Right, state: ButtonState::Pressed });
        assert_eq!(p.apply(&moved(3.0, 0.0)), None);
    }
}
