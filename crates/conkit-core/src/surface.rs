//! Cell surface and input source abstractions.
//!
//! A [`CellSurface`] is a grid of character cells that widgets draw into and
//! that is presented on [`CellSurface::flush`]. An [`EventSource`] yields the
//! physical input stream. Backends live in `conkit-io`.

use crate::error::ConsoleResult;
use crate::key::Event;

/// Foreground/background colors understood by every backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    #[default]
    Default,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

/// Color plus text attributes of one cell side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Attribute {
    pub color: Color,
    pub bold: bool,
    pub underline: bool,
    pub reverse: bool,
}

impl Attribute {
    /// Terminal default color, no attributes
    pub const NORMAL: Attribute = Attribute {
        color: Color::Default,
        bold: false,
        underline: false,
        reverse: false,
    };

    /// Reverse video, used to highlight the cursor cell
    pub const CURSOR: Attribute = Attribute {
        color: Color::Default,
        bold: false,
        underline: false,
        reverse: true,
    };

    pub fn new(color: Color) -> Self {
        Self {
            color,
            ..Self::NORMAL
        }
    }
}

/// One character cell of a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Attribute,
    pub bg: Attribute,
}

impl Cell {
    pub const BLANK: Cell = Cell {
        ch: ' ',
        fg: Attribute::NORMAL,
        bg: Attribute::NORMAL,
    };
}

impl Default for Cell {
    fn default() -> Self {
        Self::BLANK
    }
}

/// Rectangle of cells owned by a widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub top: usize,
    pub left: usize,
    pub width: usize,
    pub height: usize,
}

impl Rect {
    pub fn new(left: usize, top: usize, width: usize, height: usize) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    /// The whole of a `(width, height)` surface
    pub fn full(size: (usize, usize)) -> Self {
        Self::new(0, 0, size.0, size.1)
    }

    /// Last column inside the rectangle
    pub fn right(&self) -> usize {
        self.left + self.width.saturating_sub(1)
    }

    /// Last row inside the rectangle
    pub fn bottom(&self) -> usize {
        self.top + self.height.saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        !self.is_empty()
            && x >= self.left
            && x <= self.right()
            && y >= self.top
            && y <= self.bottom()
    }
}

/// Character-cell output surface.
///
/// Methods take `&self`; implementations keep their grid behind interior
/// mutability so the surface can be shared as `Arc<dyn CellSurface>`.
pub trait CellSurface: Send + Sync {
    /// Prepare the surface for drawing (raw mode, alternate screen, ...)
    fn init(&self) -> ConsoleResult<()>;

    /// Restore the terminal. Safe to call more than once.
    fn close(&self);

    /// Surface size as (width, height) in cells
    fn size(&self) -> (usize, usize);

    /// Set one cell. Coordinates outside the surface are ignored.
    fn set_cell(&self, x: usize, y: usize, ch: char, fg: Attribute, bg: Attribute);

    /// Snapshot of every cell, row-major, row width `size().0`
    fn cell_buffer(&self) -> Vec<Cell>;

    /// Present pending cell changes
    fn flush(&self) -> ConsoleResult<()>;
}

/// Blocking source of physical input events
pub trait EventSource: Send + Sync {
    /// Block until the next event is available
    fn poll_event(&self) -> ConsoleResult<Event>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_bounds() {
        let rect = Rect::new(2, 1, 10, 3);
        assert_eq!(rect.right(), 11);
        assert_eq!(rect.bottom(), 3);
        assert!(rect.contains(2, 1));
        assert!(rect.contains(11, 3));
        assert!(!rect.contains(12, 3));
        assert!(!rect.contains(2, 0));
    }

    #[test]
    fn test_empty_rect_contains_nothing() {
        let rect = Rect::new(0, 0, 0, 5);
        assert!(rect.is_empty());
        assert!(!rect.contains(0, 0));
    }

    #[test]
    fn test_attribute_constants() {
        assert!(Attribute::CURSOR.reverse);
        assert_eq!(Attribute::default(), Attribute::NORMAL);
        assert_eq!(Attribute::new(Color::Red).color, Color::Red);
        assert_eq!(Cell::default().ch, ' ');
    }
}
