//! Whitespace-delimited tokenizer for ASCII STL text.
//!
//! ASCII STL has no punctuation, quoting or escaping: a token is any maximal
//! run of bytes that are not space, tab, carriage return or line feed. The
//! lexer tracks a [`Cursor`] (byte offset plus 1-indexed line) that callers
//! can save and [`rewind`](Lexer::rewind) to for lookahead.

/// Position in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// Byte offset into the content.
    pub offset: usize,
    /// Line number (1-indexed). A CRLF pair counts as one line break.
    pub line: usize,
}

impl Default for Cursor {
    fn default() -> Self {
        Self { offset: 0, line: 1 }
    }
}

/// Tokenizer over ASCII STL content.
pub struct Lexer<'a> {
    input: &'a str,
    cursor: Cursor,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer positioned at the start of `input`.
    pub fn new(input: &'a str) -> Self {
        Self::with_cursor(input, Cursor::default())
    }

    /// Create a lexer that continues from a previously saved cursor.
    ///
    /// An offset past the end of `input` is clamped to its length, and one
    /// inside a UTF-8 character moves back to the start of that character.
    pub fn with_cursor(input: &'a str, cursor: Cursor) -> Self {
        let mut lexer = Self {
            input,
            cursor: Cursor::default(),
        };
        lexer.rewind(cursor);
        lexer
    }

    /// Current position.
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Restore a position saved with [`cursor`](Self::cursor).
    ///
    /// The offset is clamped the same way as in [`with_cursor`](Self::with_cursor).
    pub fn rewind(&mut self, mut cursor: Cursor) {
        cursor.offset = cursor.offset.min(self.input.len());
        while !self.input.is_char_boundary(cursor.offset) {
            cursor.offset -= 1;
        }
        self.cursor = cursor;
    }

    /// Current line number (1-indexed).
    pub fn line(&self) -> usize {
        self.cursor.line
    }

    /// Tokenize the rest of the input.
    pub fn tokenize(&mut self) -> Vec<&'a str> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            if token.is_empty() {
                return tokens;
            }
            tokens.push(token);
        }
    }

    /// Read the next token, skipping leading whitespace.
    ///
    /// Returns an empty string once the content is exhausted; the cursor
    /// offset is then equal to the content length.
    pub fn next_token(&mut self) -> &'a str {
        self.skip_whitespace();
        let bytes = self.input.as_bytes();
        let start = self.cursor.offset;
        while bytes
            .get(self.cursor.offset)
            .is_some_and(|&ch| !is_whitespace(ch))
        {
            self.cursor.offset += 1;
        }
        // Token boundaries sit on ASCII whitespace, so they are always char boundaries.
        &self.input[start..self.cursor.offset]
    }

    fn skip_whitespace(&mut self) {
        let bytes = self.input.as_bytes();
        while let Some(&ch) = bytes.get(self.cursor.offset) {
            match ch {
                b'\n' => self.cursor.line += 1,
                // CRLF counts as a single line break
                b'\r' if bytes.get(self.cursor.offset + 1) != Some(&b'\n') => {
                    self.cursor.line += 1
                }
                b'\r' | b' ' | b'\t' => {}
                _ => break,
            }
            self.cursor.offset += 1;
        }
    }
}

/// STL whitespace: space, tab, carriage return, line feed.
fn is_whitespace(ch: u8) -> bool {
    matches!(ch, b' ' | b'\t' | b'\r' | b'\n')
}
