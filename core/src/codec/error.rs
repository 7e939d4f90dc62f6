use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub line: u32,
    pub column: u32,
    pub offset: usize,
}

impl Position {
    pub fn new(line: u32, column: u32, offset: usize) -> Self {
        Self { line, column, offset }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Failure to decode a history file, positioned in the original text.
#[derive(Debug)]
pub struct DecodeError {
    pub message: String,
    pub position: Option<Position>,
}

impl DecodeError {
    pub fn with_position(message: impl Into<String>, position: Position) -> Self {
        Self {
            message: message.into(),
            position: Some(position),
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(position) = &self.position {
            write!(f, "{} at {}", self.message, position)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for DecodeError {}

/// Convert a byte offset into a 1-based line/column position
pub fn offset_to_position(text: &str, offset: usize) -> Position {
    let mut line = 1;
    let mut column = 1;

    for (i, ch) in text.char_indices() {
        if i >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }

    Position::new(line, column, offset)
}

/// Byte offset of a 1-based line/column pair as reported by serde_json.
pub(crate) fn line_column_to_offset(text: &str, line: usize, column: usize) -> usize {
    let mut current_line = 1;
    let mut line_start = 0;
    if line > 1 {
        let found = text.char_indices().find(|&(_, ch)| {
            if ch == '\n' {
                current_line += 1;
            }
            current_line == line
        });
        match found {
            Some((i, _)) => line_start = i + 1,
            None => return text.len(),
        }
    }
    // serde_json reports the column of the last consumed byte
    (line_start + column.saturating_sub(1)).min(text.len())
}
