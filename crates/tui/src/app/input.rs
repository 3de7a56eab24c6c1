use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Multi-line prompt editor. The cursor is a grapheme index into `text`.
#[derive(Clone, Debug, Default)]
pub struct InputBuffer {
    text: String,
    cursor: usize,
}

impl InputBuffer {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    fn graphemes(&self) -> Vec<&str> {
        self.text.graphemes(true).collect()
    }

    pub fn insert_text(&mut self, s: &str) {
        let parts = self.graphemes();
        let idx = self.cursor.min(parts.len());
        let mut out = parts[..idx].concat();
        out.push_str(s);
        out.push_str(&parts[idx..].concat());
        self.text = out;
        self.cursor = (idx + s.graphemes(true).count()).min(self.text.graphemes(true).count());
    }

    pub fn delete_left(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let mut parts = self.graphemes();
        parts.remove(self.cursor - 1);
        self.text = parts.concat();
        self.cursor -= 1;
    }

    pub fn delete_right(&mut self) {
        let mut parts = self.graphemes();
        if self.cursor < parts.len() {
            parts.remove(self.cursor);
            self.text = parts.concat();
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.graphemes().len());
    }

    pub fn move_line_start(&mut self) {
        let parts = self.graphemes();
        let mut i = self.cursor.min(parts.len());
        while i > 0 && parts[i - 1] != "\n" {
            i -= 1;
        }
        self.cursor = i;
    }

    pub fn move_line_end(&mut self) {
        let parts = self.graphemes();
        let mut i = self.cursor.min(parts.len());
        while i < parts.len() && parts[i] != "\n" {
            i += 1;
        }
        self.cursor = i;
    }

    pub fn delete_prev_word(&mut self) {
        let parts = self.graphemes();
        let mut i = self.cursor.min(parts.len());
        while i > 0 && parts[i - 1].trim().is_empty() {
            i -= 1;
        }
        while i > 0 && !parts[i - 1].trim().is_empty() {
            i -= 1;
        }
        self.text = [parts[..i].concat(), parts[self.cursor..].concat()].concat();
        self.cursor = i;
    }

    pub fn kill_to_line_start(&mut self) {
        let end = self.cursor;
        self.move_line_start();
        let parts = self.graphemes();
        self.text = [parts[..self.cursor].concat(), parts[end..].concat()].concat();
    }

    pub fn line_count(&self) -> usize {
        self.text.split('\n').count()
    }

    /// Row and display column of the cursor, both zero based.
    pub fn cursor_row_col(&self) -> (usize, usize) {
        let before = self.graphemes()[..self.cursor].concat();
        let row = before.matches('\n').count();
        let line = before.rsplit('\n').next().unwrap_or("");
        (row, UnicodeWidthStr::width(line))
    }
}
