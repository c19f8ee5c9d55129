//! Line/column positions for byte offsets.
//!
//! Nodes store byte offsets only. The `LineMap` built once per file converts
//! them to line/column on demand. Lines are 1-based, columns are 0-based and
//! counted in UTF-8 bytes from the start of the line.

use serde::Serialize;

/// A line/column pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// Location of a token: start/end positions plus its source text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TokenLocation {
    pub start: Position,
    pub end: Position,
    pub text: String,
}

impl TokenLocation {
    /// Length of the token text in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Byte offsets of every line start in a source file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LineMap {
    line_starts: Vec<u32>,
}

impl LineMap {
    /// Build the line map for `text`. `\r\n`, `\n` and `\r` all end a line.
    pub fn build(text: &str) -> LineMap {
        let bytes = text.as_bytes();
        let mut line_starts = vec![0];
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\r' => {
                    if bytes.get(i + 1) == Some(&b'\n') {
                        i += 1;
                    }
                    line_starts.push((i + 1) as u32);
                }
                b'\n' => line_starts.push((i + 1) as u32),
                _ => {}
            }
            i += 1;
        }
        LineMap { line_starts }
    }

    /// Number of lines in the file (an empty file has one line).
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Convert a byte offset into a position.
    pub fn position_of(&self, offset: u32) -> Position {
        let line_index = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert_at) => insert_at.saturating_sub(1),
        };
        let line_start = self.line_starts.get(line_index).copied().unwrap_or(0);
        Position::new(line_index as u32 + 1, offset.saturating_sub(line_start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_of_first_line() {
        let map = LineMap::build("var x = 1;");
        assert_eq!(map.position_of(0), Position::new(1, 0));
        assert_eq!(map.position_of(4), Position::new(1, 4));
    }

    #[test]
    fn test_position_of_handles_mixed_line_endings() {
        let map = LineMap::build("a\nb\r\nc\rd");
        assert_eq!(map.line_count(), 4);
        assert_eq!(map.position_of(2), Position::new(2, 0));
        assert_eq!(map.position_of(5), Position::new(3, 0));
        assert_eq!(map.position_of(7), Position::new(4, 0));
    }

    #[test]
    fn test_position_at_line_start_boundary() {
        let map = LineMap::build("ab\ncd");
        assert_eq!(map.position_of(3), Position::new(2, 0));
        assert_eq!(map.position_of(4), Position::new(2, 1));
    }
}
