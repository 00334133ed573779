use crate::intent::Intent;

/// Turns mouse drags into intents.
///
/// Horizontal motion turns, vertical motion steps: dragging up steps forward,
/// dragging down steps backward. Each motion event yields at most one intent
/// per axis regardless of distance.
#[derive(Debug, Clone, Default)]
pub struct MouseDrag {
    last: Option<(f32, f32)>,
}

impl MouseDrag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Button pressed at `(x, y)` (screen coordinates, y grows downward).
    pub fn press(&mut self, x: f32, y: f32) {
        self.last = Some((x, y));
    }

    pub fn release(&mut self) {
        self.last = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.last.is_some()
    }

    /// Pointer moved to `(x, y)` while the button is held.
    pub fn motion(&mut self, x: f32, y: f32) -> Vec<Intent> {
        let Some((last_x, last_y)) = self.last else {
            return Vec::new();
        };
        let mut intents = Vec::with_capacity(2);
        if x > last_x {
            intents.push(Intent::TurnRight);
        } else if x < last_x {
            intents.push(Intent::TurnLeft);
        }
        if y > last_y {
            intents.push(Intent::StepBackward);
        } else if y < last_y {
            intents.push(Intent::StepForward);
        }
        self.last = Some((x, y));
        intents
    }
}
