//! Multi-line text buffer with a cursor, used by the raw request view and the
//! single-line inputs (field text, search, login)

/// Editing operation on a [`TextBuffer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEdit {
    Insert(char),
    Newline,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
}

/// Lines of text plus a cursor position. `col` counts chars, not bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBuffer {
    lines: Vec<String>,
    row: usize,
    col: usize,
    single_line: bool,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new("")
    }
}

impl TextBuffer {
    pub fn new(text: &str) -> Self {
        let mut lines: Vec<String> = text.split('\n').map(str::to_string).collect();
        if lines.is_empty() {
            lines.push(String::new());
        }
        let row = lines.len() - 1;
        let col = lines[row].chars().count();
        Self {
            lines,
            row,
            col,
            single_line: false,
        }
    }

    /// A buffer that ignores `Newline`, cursor at the end.
    pub fn single_line(text: &str) -> Self {
        let mut buffer = Self::new(&text.replace('\n', " "));
        buffer.single_line = true;
        buffer
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Cursor as (row, char column)
    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    pub fn move_to_start(&mut self) {
        self.row = 0;
        self.col = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.lines.len() == 1 && self.lines[0].is_empty()
    }

    fn line_len(&self, row: usize) -> usize {
        self.lines[row].chars().count()
    }

    fn byte_offset(&self) -> usize {
        let line = &self.lines[self.row];
        line.char_indices()
            .nth(self.col)
            .map(|(i, _)| i)
            .unwrap_or(line.len())
    }

    /// Apply one edit. Returns true when the text changed.
    pub fn apply(&mut self, edit: TextEdit) -> bool {
        match edit {
            TextEdit::Insert(c) => {
                let at = self.byte_offset();
                self.lines[self.row].insert(at, c);
                self.col += 1;
                true
            }
            TextEdit::Newline if self.single_line => false,
            TextEdit::Newline => {
                let at = self.byte_offset();
                let rest = self.lines[self.row].split_off(at);
                self.lines.insert(self.row + 1, rest);
                self.row += 1;
                self.col = 0;
                true
            }
            TextEdit::Backspace => {
                if self.col > 0 {
                    self.col -= 1;
                    let at = self.byte_offset();
                    self.lines[self.row].remove(at);
                    true
                } else if self.row > 0 {
                    let line = self.lines.remove(self.row);
                    self.row -= 1;
                    self.col = self.line_len(self.row);
                    self.lines[self.row].push_str(&line);
                    true
                } else {
                    false
                }
            }
            TextEdit::Delete => {
                if self.col < self.line_len(self.row) {
                    let at = self.byte_offset();
                    self.lines[self.row].remove(at);
                    true
                } else if self.row + 1 < self.lines.len() {
                    let next = self.lines.remove(self.row + 1);
                    self.lines[self.row].push_str(&next);
                    true
                } else {
                    false
                }
            }
            TextEdit::Left => {
                if self.col > 0 {
                    self.col -= 1;
                } else if self.row > 0 {
                    self.row -= 1;
                    self.col = self.line_len(self.row);
                }
                false
            }
            TextEdit::Right => {
                if self.col < self.line_len(self.row) {
                    self.col += 1;
                } else if self.row + 1 < self.lines.len() {
                    self.row += 1;
                    self.col = 0;
                }
                false
            }
            TextEdit::Up => {
                if self.row > 0 {
                    self.row -= 1;
                    self.col = self.col.min(self.line_len(self.row));
                }
                false
            }
            TextEdit::Down => {
                if self.row + 1 < self.lines.len() {
                    self.row += 1;
                    self.col = self.col.min(self.line_len(self.row));
                }
                false
            }
            TextEdit::Home => {
                self.col = 0;
                false
            }
            TextEdit::End => {
                self.col = self.line_len(self.row);
                false
            }
        }
    }
}
