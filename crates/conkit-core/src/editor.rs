//! Single-line editor drawing directly into a cell surface.
//!
//! The editor owns a rectangle of the surface. It keeps three views in step:
//! the cursor cell, the logical cursor offset into the line, and the cells
//! showing the line. The line starts right after the prompt and wraps at the
//! rectangle's right edge; reaching past the bottom row scrolls the
//! rectangle up by one row.
//!
//! Rows are tracked as signed numbers so that a line taller than the
//! rectangle keeps an exact offset mapping after its first rows have
//! scrolled out. Cells outside the rectangle are never drawn.

use crate::executer::ConsoleWriter;
use crate::surface::{Attribute, Cell, CellSurface, Rect};
use log::{debug, trace};
use std::sync::Arc;

pub struct LineEditor {
    surface: Arc<dyn CellSurface>,
    rect: Rect,
    cursor_x: usize,
    cursor_y: isize,
    /// Row the prompt of the current line was printed on
    prompt_row: isize,
    /// Cells taken by the prompt before the first line character
    prompt_len: usize,
    prompt: Vec<char>,
    line: Vec<char>,
    /// The cursor sits at the left column because the row above filled up
    wrapped: bool,
}

impl LineEditor {
    /// Create an editor with the cursor at the top-left cell of `rect`
    pub fn new(surface: Arc<dyn CellSurface>, rect: Rect) -> Self {
        Self {
            surface,
            rect,
            cursor_x: rect.left,
            cursor_y: rect.top as isize,
            prompt_row: rect.top as isize,
            prompt_len: 0,
            prompt: Vec::new(),
            line: Vec::new(),
            wrapped: false,
        }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn surface(&self) -> &Arc<dyn CellSurface> {
        &self.surface
    }

    /// The line being edited
    pub fn line(&self) -> String {
        self.line.iter().collect()
    }

    pub fn len(&self) -> usize {
        self.line.len()
    }

    pub fn is_empty(&self) -> bool {
        self.line.is_empty()
    }

    /// Cursor position as (column, row)
    pub fn cursor_cell(&self) -> (usize, isize) {
        (self.cursor_x, self.cursor_y)
    }

    pub fn prompt_row(&self) -> isize {
        self.prompt_row
    }

    fn width(&self) -> usize {
        self.rect.width.max(1)
    }

    /// Cell showing the character at `offset`; `offset == len` is the cell
    /// just past the end of the line.
    pub fn cell_for_offset(&self, offset: usize) -> (usize, isize) {
        let linear = self.prompt_len + offset;
        let x = self.rect.left + linear % self.width();
        let y = self.prompt_row + (linear / self.width()) as isize;
        (x, y)
    }

    /// Logical offset of the cursor into the line, in `[0, len]`
    pub fn cursor_offset(&self) -> usize {
        let offset = self.offset_of_cell(self.cursor_x, self.cursor_y);
        debug_assert!(
            offset >= 0 && offset as usize <= self.line.len(),
            "cursor offset {offset} outside line of length {}",
            self.line.len()
        );
        offset.clamp(0, self.line.len() as isize) as usize
    }

    fn offset_of_cell(&self, x: usize, y: isize) -> isize {
        (y - self.prompt_row) * self.width() as isize + x as isize
            - self.rect.left as isize
            - self.prompt_len as isize
    }

    /// Print the prompt at the start of a fresh row and begin an empty line
    pub fn begin_prompt(&mut self, prompt: &str) {
        if self.cursor_x != self.rect.left {
            self.new_row();
        }
        self.line.clear();
        self.prompt_row = self.cursor_y;
        self.prompt_len = 0;
        self.prompt = prompt.chars().collect();
        for ch in prompt.chars() {
            self.put_char(ch);
        }
        self.prompt_len = self.offset_of_cell(self.cursor_x, self.cursor_y).max(0) as usize;
        self.highlight();
    }

    /// Insert `ch` before `offset`; the cursor ends up just after it
    pub fn insert_at(&mut self, offset: usize, ch: char) {
        debug_assert!(offset <= self.line.len());
        let offset = offset.min(self.line.len());

        self.unhighlight();
        self.line.insert(offset, ch);
        self.scroll_to_row(self.cell_for_offset(self.line.len()).1);
        self.redraw_from(offset);
        self.place_cursor(offset + 1);
    }

    /// Remove the character before `offset`; no-op at the start of the line
    pub fn delete_before(&mut self, offset: usize) {
        debug_assert!(offset <= self.line.len());
        let offset = offset.min(self.line.len());
        if offset == 0 {
            return;
        }

        self.unhighlight();
        self.line.remove(offset - 1);
        self.redraw_from(offset - 1);
        let (x, y) = self.cell_for_offset(self.line.len());
        self.draw(x, y, ' ', Attribute::NORMAL);
        self.place_cursor(offset - 1);
    }

    /// Move the cursor by `delta` characters, clamped to the line
    pub fn move_cursor(&mut self, delta: isize) {
        let current = self.cursor_offset() as isize;
        let target = (current + delta).clamp(0, self.line.len() as isize) as usize;
        if target as isize == current {
            return;
        }
        self.unhighlight();
        self.place_cursor(target);
    }

    pub fn move_to_end(&mut self) {
        let delta = self.line.len() as isize - self.cursor_offset() as isize;
        self.move_cursor(delta);
    }

    /// Blank every cell of the line and leave the cursor after the prompt.
    ///
    /// A prompt that scrolled above the rectangle is reprinted on the top
    /// row so the emptied line starts in view.
    pub fn clear_line(&mut self) {
        self.unhighlight();
        for offset in 0..=self.line.len() {
            let (x, y) = self.cell_for_offset(offset);
            self.draw(x, y, ' ', Attribute::NORMAL);
        }
        self.line.clear();
        if self.prompt_row < self.rect.top as isize {
            self.reanchor();
        }
        self.place_cursor(0);
    }

    fn reanchor(&mut self) {
        self.prompt_row = self.rect.top as isize;
        for linear in 0..self.prompt_len {
            let ch = self.prompt.get(linear).copied().unwrap_or(' ');
            let x = self.rect.left + linear % self.width();
            let y = self.prompt_row + (linear / self.width()) as isize;
            self.draw(x, y, ch, Attribute::NORMAL);
        }
        debug!("LineEditor: prompt reprinted at row {}", self.prompt_row);
    }

    /// Replace the whole line with `text`, cursor at the end
    pub fn replace_line(&mut self, text: &str) {
        self.clear_line();
        self.unhighlight();
        self.line = text.chars().collect();
        self.scroll_to_row(self.cell_for_offset(self.line.len()).1);
        self.redraw_from(0);
        self.place_cursor(self.line.len());
    }

    /// Empty the line and return its text. The cells are left as drawn.
    pub fn take_line(&mut self) -> String {
        let text = self.line.drain(..).collect();
        // The line now starts where the cursor is
        let offset = self.offset_of_cell(self.cursor_x, self.cursor_y);
        self.prompt_len = (self.prompt_len as isize + offset).max(0) as usize;
        text
    }

    /// Terminate the current row and move to the left column of the next
    pub fn new_row(&mut self) {
        self.unhighlight();
        if self.wrapped {
            // Already on a fresh row
            self.wrapped = false;
            return;
        }
        self.cursor_x = self.rect.left;
        self.next_row();
    }

    /// Shift every row of the rectangle up by one and blank the bottom row
    pub fn scroll_down(&mut self) {
        if self.rect.is_empty() {
            return;
        }
        let (surface_width, _) = self.surface.size();
        let cells = self.surface.cell_buffer();

        for y in self.rect.top..self.rect.bottom() {
            for x in self.rect.left..=self.rect.right() {
                let cell = cells
                    .get((y + 1) * surface_width + x)
                    .copied()
                    .unwrap_or(Cell::BLANK);
                self.surface.set_cell(x, y, cell.ch, cell.fg, cell.bg);
            }
        }
        let bottom = self.rect.bottom();
        for x in self.rect.left..=self.rect.right() {
            self.surface
                .set_cell(x, bottom, ' ', Attribute::NORMAL, Attribute::NORMAL);
        }

        self.prompt_row -= 1;
        self.cursor_y -= 1;
        debug!(
            "LineEditor: scrolled, prompt row now {}, cursor row {}",
            self.prompt_row, self.cursor_y
        );
    }

    /// Scroll until `row` is no lower than the bottom of the rectangle
    fn scroll_to_row(&mut self, mut row: isize) {
        if self.rect.is_empty() {
            return;
        }
        while row > self.rect.bottom() as isize {
            self.scroll_down();
            row -= 1;
        }
    }

    fn next_row(&mut self) {
        self.cursor_y += 1;
        if self.cursor_y > self.rect.bottom() as isize {
            self.scroll_down();
        }
    }

    fn put_char(&mut self, ch: char) {
        self.draw(self.cursor_x, self.cursor_y, ch, Attribute::NORMAL);
        self.cursor_x += 1;
        self.wrapped = false;
        if self.cursor_x > self.rect.right() {
            self.cursor_x = self.rect.left;
            self.next_row();
            self.wrapped = true;
        }
    }

    fn redraw_from(&self, offset: usize) {
        for (i, ch) in self.line.iter().enumerate().skip(offset) {
            let (x, y) = self.cell_for_offset(i);
            self.draw(x, y, *ch, Attribute::NORMAL);
        }
    }

    fn place_cursor(&mut self, offset: usize) {
        let (x, y) = self.cell_for_offset(offset);
        let linear = self.prompt_len + offset;
        self.cursor_x = x;
        self.cursor_y = y;
        self.wrapped = linear > 0 && linear % self.width() == 0;
        trace!("LineEditor: cursor at offset {offset} cell ({x}, {y})");
        self.highlight();
    }

    /// Character currently shown at a cell of the line, blank elsewhere
    fn char_at(&self, x: usize, y: isize) -> char {
        let offset = self.offset_of_cell(x, y);
        if offset >= 0 {
            if let Some(ch) = self.line.get(offset as usize) {
                return *ch;
            }
        }
        ' '
    }

    fn highlight(&self) {
        let ch = self.char_at(self.cursor_x, self.cursor_y);
        self.draw(self.cursor_x, self.cursor_y, ch, Attribute::CURSOR);
    }

    fn unhighlight(&self) {
        let ch = self.char_at(self.cursor_x, self.cursor_y);
        self.draw(self.cursor_x, self.cursor_y, ch, Attribute::NORMAL);
    }

    fn draw(&self, x: usize, y: isize, ch: char, fg: Attribute) {
        if y < 0 || !self.rect.contains(x, y as usize) {
            return;
        }
        self.surface.set_cell(x, y as usize, ch, fg, Attribute::NORMAL);
    }
}

impl ConsoleWriter for LineEditor {
    fn write(&mut self, text: &str) {
        self.unhighlight();
        for ch in text.chars() {
            self.put_char(ch);
        }
        self.highlight();
    }

    fn write_line(&mut self, text: &str) {
        self.write(text);
        self.new_row();
        self.highlight();
    }
}
