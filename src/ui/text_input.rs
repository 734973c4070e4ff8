//! Single-line text field, used for design names

use super::{Rect, ACCENT_COLOR, TEXT_COLOR};
use macroquad::prelude::*;

/// Design names longer than this are cut off when typing
pub const DEFAULT_MAX_CHARS: usize = 80;

/// State for a text input field
#[derive(Debug, Clone)]
pub struct TextInputState {
    /// The text content
    pub text: String,
    /// Cursor position (byte index)
    pub cursor: usize,
    /// Selection start (byte index), if selecting
    pub selection_start: Option<usize>,
    /// Blink timer for cursor
    pub blink_timer: f32,
    /// Whether the input has focus
    pub focused: bool,
    pub max_chars: usize,
}

impl TextInputState {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.len();
        Self {
            text,
            cursor,
            selection_start: None,
            blink_timer: 0.0,
            focused: true,
            max_chars: DEFAULT_MAX_CHARS,
        }
    }

    /// Get selected text range (start, end) in sorted order
    pub fn selection_range(&self) -> Option<(usize, usize)> {
        self.selection_start.map(|start| {
            if start < self.cursor {
                (start, self.cursor)
            } else {
                (self.cursor, start)
            }
        })
    }

    /// Delete selected text and return cursor to selection start
    pub fn delete_selection(&mut self) {
        if let Some((start, end)) = self.selection_range() {
            self.text.drain(start..end);
            self.cursor = start;
            self.selection_start = None;
        }
    }

    /// Check if there's a selection
    pub fn has_selection(&self) -> bool {
        self.selection_start.is_some() && self.selection_start != Some(self.cursor)
    }

    /// Move cursor left, optionally extending selection
    pub fn move_left(&mut self, extend_selection: bool) {
        if extend_selection {
            if self.selection_start.is_none() {
                self.selection_start = Some(self.cursor);
            }
        } else {
            // If we have a selection, move to the start of it
            if let Some((start, _)) = self.selection_range() {
                self.cursor = start;
                self.selection_start = None;
                return;
            }
        }

        if self.cursor > 0 {
            // Move back one character (handle UTF-8)
            let prev = self.text[..self.cursor]
                .char_indices()
                .rev()
                .next()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.cursor = prev;
        }

        if !extend_selection {
            self.selection_start = None;
        }
    }

    /// Move cursor right, optionally extending selection
    pub fn move_right(&mut self, extend_selection: bool) {
        if extend_selection {
            if self.selection_start.is_none() {
                self.selection_start = Some(self.cursor);
            }
        } else {
            // If we have a selection, move to the end of it
            if let Some((_, end)) = self.selection_range() {
                self.cursor = end;
                self.selection_start = None;
                return;
            }
        }

        if self.cursor < self.text.len() {
            // Move forward one character (handle UTF-8)
            let next = self.text[self.cursor..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor + i)
                .unwrap_or(self.text.len());
            self.cursor = next;
        }

        if !extend_selection {
            self.selection_start = None;
        }
    }

    /// Move cursor to start
    pub fn move_home(&mut self, extend_selection: bool) {
        if extend_selection && self.selection_start.is_none() {
            self.selection_start = Some(self.cursor);
        }
        self.cursor = 0;
        if !extend_selection {
            self.selection_start = None;
        }
    }

    /// Move cursor to end
    pub fn move_end(&mut self, extend_selection: bool) {
        if extend_selection && self.selection_start.is_none() {
            self.selection_start = Some(self.cursor);
        }
        self.cursor = self.text.len();
        if !extend_selection {
            self.selection_start = None;
        }
    }

    /// Select all text
    pub fn select_all(&mut self) {
        self.selection_start = Some(0);
        self.cursor = self.text.len();
    }

    /// Insert a character at cursor
    pub fn insert_char(&mut self, ch: char) {
        if self.has_selection() {
            self.delete_selection();
        }
        self.text.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    /// Delete character before cursor (backspace)
    pub fn backspace(&mut self) {
        if self.has_selection() {
            self.delete_selection();
            return;
        }
        if self.cursor > 0 {
            // Find previous character boundary
            let prev = self.text[..self.cursor]
                .char_indices()
                .rev()
                .next()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.text.drain(prev..self.cursor);
            self.cursor = prev;
        }
    }

    /// Delete character after cursor (delete key)
    pub fn delete(&mut self) {
        if self.has_selection() {
            self.delete_selection();
            return;
        }
        if self.cursor < self.text.len() {
            // Find next character boundary
            let next = self.text[self.cursor..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor + i)
                .unwrap_or(self.text.len());
            self.text.drain(self.cursor..next);
        }
    }

    /// Apply one key. Returns true when the text changed.
    pub fn apply(&mut self, key: TextKey, shift: bool) -> bool {
        let before = self.text.clone();
        self.blink_timer = 0.0;
        match key {
            TextKey::Left => self.move_left(shift),
            TextKey::Right => self.move_right(shift),
            TextKey::Home => self.move_home(shift),
            TextKey::End => self.move_end(shift),
            TextKey::SelectAll => self.select_all(),
            TextKey::Backspace => self.backspace(),
            TextKey::Delete => self.delete(),
            TextKey::Char(ch) => {
                // Control characters never reach the text
                if ch < ' ' || ch == '\u{7f}' {
                    return false;
                }
                if self.text.chars().count() >= self.max_chars && !self.has_selection() {
                    return false;
                }
                self.insert_char(ch);
                return true;
            }
        }
        self.text != before
    }

    /// Poll macroquad's keyboard for this frame
    pub fn handle_input(&mut self) -> TextInputOutcome {
        self.blink_timer += get_frame_time();

        if is_key_pressed(KeyCode::Enter) || is_key_pressed(KeyCode::KpEnter) {
            return TextInputOutcome::Submitted(self.text.trim().to_string());
        }
        if is_key_pressed(KeyCode::Escape) {
            return TextInputOutcome::Cancelled;
        }

        let shift = is_key_down(KeyCode::LeftShift) || is_key_down(KeyCode::RightShift);
        let ctrl = is_key_down(KeyCode::LeftControl)
            || is_key_down(KeyCode::RightControl)
            || is_key_down(KeyCode::LeftSuper)
            || is_key_down(KeyCode::RightSuper);

        let mut keys = Vec::new();
        for (code, key) in [
            (KeyCode::Left, TextKey::Left),
            (KeyCode::Right, TextKey::Right),
            (KeyCode::Home, TextKey::Home),
            (KeyCode::End, TextKey::End),
            (KeyCode::Backspace, TextKey::Backspace),
            (KeyCode::Delete, TextKey::Delete),
        ] {
            if is_key_pressed(code) {
                keys.push(key);
            }
        }
        if ctrl && is_key_pressed(KeyCode::A) {
            keys.push(TextKey::SelectAll);
        }
        while let Some(ch) = get_char_pressed() {
            if !ctrl {
                keys.push(TextKey::Char(ch));
            }
        }

        let mut changed = false;
        for key in keys {
            changed |= self.apply(key, shift);
        }
        if changed {
            TextInputOutcome::Changed
        } else {
            TextInputOutcome::Idle
        }
    }
}

/// Editing keys, decoupled from the windowing backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextKey {
    Left,
    Right,
    Home,
    End,
    SelectAll,
    Backspace,
    Delete,
    Char(char),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TextInputOutcome {
    Idle,
    Changed,
    /// Enter pressed; carries the trimmed text
    Submitted(String),
    Cancelled,
}

const INPUT_BG: Color = Color::new(1.0, 1.0, 1.0, 1.0);
const INPUT_SELECTION: Color = Color::new(0.15, 0.39, 0.92, 0.3);

/// Draw a focused text field and feed it this frame's keys
pub fn draw_text_input(rect: Rect, state: &mut TextInputState, font_size: f32) -> TextInputOutcome {
    draw_rectangle(rect.x, rect.y, rect.w, rect.h, INPUT_BG);
    draw_rectangle_lines(rect.x, rect.y, rect.w, rect.h, 1.0, ACCENT_COLOR);

    let padding = 6.0;
    let text_x = rect.x + padding;
    let text_y = rect.y + (rect.h + font_size * 0.7) / 2.0;

    let outcome = state.handle_input();

    if let Some((start, end)) = state.selection_range() {
        let start_x = text_x + measure_text(&state.text[..start], None, font_size as u16, 1.0).width;
        let sel_width = measure_text(&state.text[start..end], None, font_size as u16, 1.0).width;
        draw_rectangle(start_x, rect.y + 4.0, sel_width, rect.h - 8.0, INPUT_SELECTION);
    }

    draw_text(&state.text, text_x, text_y, font_size, TEXT_COLOR);

    if state.focused && (state.blink_timer % 1.0) < 0.5 {
        let cursor_x = text_x + measure_text(&state.text[..state.cursor], None, font_size as u16, 1.0).width;
        draw_line(cursor_x, rect.y + 5.0, cursor_x, rect.bottom() - 5.0, 1.5, TEXT_COLOR);
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(state: &mut TextInputState, text: &str) {
        for ch in text.chars() {
            state.apply(TextKey::Char(ch), false);
        }
    }

    #[test]
    fn test_typing_and_backspace() {
        let mut state = TextInputState::new("Kitchen");
        typed(&mut state, " v2");
        assert_eq!(state.text, "Kitchen v2");
        assert!(state.apply(TextKey::Backspace, false));
        assert_eq!(state.text, "Kitchen v");
    }

    #[test]
    fn test_shift_selection_replaced_by_typing() {
        let mut state = TextInputState::new("Living Room");
        for _ in 0..4 {
            state.apply(TextKey::Left, true);
        }
        typed(&mut state, "Area");
        assert_eq!(state.text, "Living Area");
    }

    #[test]
    fn test_select_all_then_delete() {
        let mut state = TextInputState::new("Old name");
        state.apply(TextKey::SelectAll, false);
        assert!(state.apply(TextKey::Delete, false));
        assert!(state.text.is_empty());
        assert_eq!(state.cursor, 0);
    }

    #[test]
    fn test_multibyte_cursor_moves() {
        let mut state = TextInputState::new("Café");
        state.apply(TextKey::Left, false);
        assert_eq!(state.cursor, 3);
        state.apply(TextKey::Delete, false);
        assert_eq!(state.text, "Caf");
    }

    #[test]
    fn test_length_limit_and_control_chars() {
        let mut state = TextInputState::new("");
        state.max_chars = 3;
        typed(&mut state, "abcd");
        assert_eq!(state.text, "abc");
        assert!(!state.apply(TextKey::Char('\u{8}'), false));
    }
}
