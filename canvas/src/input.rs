//! Input model: modifier keys, mouse buttons, and the gesture state machine.
//!
//! `InputState` is the active gesture tracked between pointer-down and
//! pointer-up. Each active variant carries the pre-gesture snapshot of the
//! property it edits, so every pointer-move recomputes the transform from the
//! gesture origin rather than accumulating per-event deltas.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::doc::ElementId;
use crate::geometry::{Point, ResizeHandle, Size};

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Cmd on macOS. Either one counts.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// A keyboard key as reported by the browser (e.g. `"z"`, `"Z"`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    /// Whether this key is the letter `letter`, ignoring case (Shift turns
    /// `"z"` into `"Z"`).
    #[must_use]
    pub fn is_letter(&self, letter: char) -> bool {
        let mut chars = self.0.chars();
        matches!((chars.next(), chars.next()), (Some(c), None) if c.eq_ignore_ascii_case(&letter))
    }
}

/// Ephemeral UI state. Never recorded in history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    /// The id of the currently selected element, if any.
    pub selected_id: Option<ElementId>,
    /// CSS cursor last requested from the host.
    pub cursor: String,
}

/// Internal state for the input state machine.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// Moving an element by its body.
    Dragging {
        id: ElementId,
        /// Canvas-space pointer position at pointer-down.
        start: Point,
        /// Element position at pointer-down.
        orig: Point,
        /// Whether any pointer-move changed the position. A release without
        /// movement is a click and selects the element.
        moved: bool,
    },
    /// Resizing an element by one of its eight handles.
    Resizing {
        id: ElementId,
        handle: ResizeHandle,
        start: Point,
        /// Element size at pointer-down.
        orig: Size,
    },
    /// Rotating an element by the rotate handle.
    Rotating {
        id: ElementId,
        /// Visual center of the element; the rotation pivot.
        center: Point,
        /// Pointer angle (degrees) relative to `center` at pointer-down.
        start_angle: f64,
        /// Rotation at pointer-down.
        orig_rotation: f64,
    },
}

impl InputState {
    /// Whether a gesture is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// Id of the element the active gesture is editing.
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Dragging { id, .. } | Self::Resizing { id, .. } | Self::Rotating { id, .. } => Some(id),
        }
    }
}
