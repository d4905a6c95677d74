//! Input payloads the host forwards with each canvas event.
//!
//! The gesture state machine they drive lives in [`crate::selection`].

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

/// Modifier state the host samples alongside a pointer or key event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Clicking a layer toggles it in the selection instead of replacing it.
    pub shift: bool,
    /// With `D`, duplicates the selection on Windows and Linux.
    pub ctrl: bool,
    /// Forwarded for hosts; the canvas does not bind it.
    pub alt: bool,
    /// Command on macOS. With `D`, duplicates the selection.
    pub meta: bool,
}

impl Modifiers {
    /// The platform shortcut key: either Ctrl or Meta.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Pointer button that started a press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Selects, drags, marquees and triggers the overlay handles.
    Primary,
    /// Ignored by the canvas.
    Middle,
    /// Ignored by the canvas; hosts use it for context menus.
    Secondary,
}

/// A keyboard key as reported by the host (e.g. `"Delete"`, `"Escape"`, `"d"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// `Delete` or `Backspace`.
    #[must_use]
    pub fn is_delete(&self) -> bool {
        matches!(self.0.as_str(), "Delete" | "Backspace")
    }

    #[must_use]
    pub fn is_escape(&self) -> bool {
        self.0 == "Escape"
    }

    /// Case-insensitive single-character match.
    #[must_use]
    pub fn is_char(&self, c: char) -> bool {
        let mut chars = self.0.chars();
        matches!((chars.next(), chars.next()), (Some(k), None) if k.eq_ignore_ascii_case(&c))
    }
}
