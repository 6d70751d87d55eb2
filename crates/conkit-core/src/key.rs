//! Key definitions and input event structures.
//!
//! Events are what an [`EventSource`](crate::surface::EventSource) produces and
//! what the router forwards into each component's queue. Printable input is
//! carried as [`Key::Char`] with the character attached.

/// Key represents the key classes a console distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A printable character; the character itself is in [`KeyEvent::ch`]
    Char,
    /// Escape key
    Escape,

    // Control characters (Ctrl+A through Ctrl+Z)
    ControlA,
    ControlB,
    ControlC,
    ControlD,
    ControlE,
    ControlF,
    ControlG,
    ControlH,
    ControlK,
    ControlL,
    ControlN,
    ControlO,
    ControlP,
    ControlQ,
    ControlR,
    ControlS,
    ControlT,
    ControlU,
    ControlV,
    ControlW,
    ControlX,
    ControlY,
    ControlZ,

    // Navigation keys (arrow keys)
    Up,
    Down,
    Right,
    Left,

    // Navigation and editing keys
    Home,
    End,
    Delete,
    PageUp,
    PageDown,
    Insert,
    Backspace,
    Space,
    Tab,
    Enter,

    // Function keys F1-F12
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,

    /// Key is not defined or unknown sequence
    NotDefined,
}

/// KeyEvent represents a decoded key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The decoded key class
    pub key: Key,
    /// The character for [`Key::Char`] events
    pub ch: Option<char>,
}

impl KeyEvent {
    /// Create a KeyEvent for a non-character key
    pub fn simple(key: Key) -> Self {
        Self { key, ch: None }
    }

    /// Create a KeyEvent for a printable character
    pub fn char(ch: char) -> Self {
        Self {
            key: Key::Char,
            ch: Some(ch),
        }
    }

    /// The character this event inserts, if any. Space is reported as `' '`.
    pub fn printable(&self) -> Option<char> {
        match self.key {
            Key::Char => self.ch,
            Key::Space => Some(' '),
            _ => None,
        }
    }
}

impl Default for KeyEvent {
    fn default() -> Self {
        Self::simple(Key::NotDefined)
    }
}

impl From<Key> for KeyEvent {
    fn from(key: Key) -> Self {
        Self::simple(key)
    }
}

/// A single input event from the physical input source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A key was pressed by the user
    Key(KeyEvent),
    /// The terminal window was resized
    Resize { width: usize, height: usize },
}

impl Event {
    /// Shorthand for a key event without a character
    pub fn key(key: Key) -> Self {
        Event::Key(KeyEvent::simple(key))
    }

    /// Shorthand for a printable character event
    pub fn char(ch: char) -> Self {
        Event::Key(KeyEvent::char(ch))
    }

    /// One character event per char of `text`
    pub fn text(text: &str) -> Vec<Event> {
        text.chars().map(Event::char).collect()
    }
}
