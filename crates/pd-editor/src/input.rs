//! Platform-neutral input events.
//!
//! The host (browser bridge or native shell) translates its own pointer and
//! keyboard events into `InputEvent`s. Positions are canvas pixels, origin
//! top-left.

use kurbo::Point;

/// Keyboard modifiers held during an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// ⌘ on macOS, Ctrl elsewhere.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown { position: Point, modifiers: Modifiers },
    PointerMove { position: Point, modifiers: Modifiers },
    PointerUp { position: Point, modifiers: Modifiers },
    /// `key` is the `KeyboardEvent.key` value (e.g. `"b"`, `"Escape"`).
    Key { key: String, modifiers: Modifiers },
}

impl InputEvent {
    pub fn from_pointer_down(x: f64, y: f64, modifiers: Modifiers) -> Self {
        InputEvent::PointerDown {
            position: Point::new(x, y),
            modifiers,
        }
    }

    pub fn from_pointer_move(x: f64, y: f64, modifiers: Modifiers) -> Self {
        InputEvent::PointerMove {
            position: Point::new(x, y),
            modifiers,
        }
    }

    pub fn from_pointer_up(x: f64, y: f64, modifiers: Modifiers) -> Self {
        InputEvent::PointerUp {
            position: Point::new(x, y),
            modifiers,
        }
    }

    pub fn from_key(key: impl Into<String>, modifiers: Modifiers) -> Self {
        InputEvent::Key {
            key: key.into(),
            modifiers,
        }
    }

    /// Screen position for pointer events.
    pub fn position(&self) -> Option<Point> {
        match self {
            InputEvent::PointerDown { position, .. }
            | InputEvent::PointerMove { position, .. }
            | InputEvent::PointerUp { position, .. } => Some(*position),
            InputEvent::Key { .. } => None,
        }
    }
}
