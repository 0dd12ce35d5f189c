use crate::lexer::Token;

/// Running `{`/`}` balance shared by the extractor and the splitter.
///
/// Depth starts unopened: closing braces seen before the first `{` are ignored,
/// so stray closers in front of a body can never end it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BraceDepth {
    depth: i64,
    opened: bool,
}

impl BraceDepth {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn depth(&self) -> i64 {
        self.depth
    }

    #[must_use]
    pub const fn opened(&self) -> bool {
        self.opened
    }

    /// Feed one character; true when a `}` returns an opened block to depth zero
    pub fn push(&mut self, ch: char) -> bool {
        match ch {
            '{' => {
                self.opened = true;
                self.depth += 1;
                false
            }
            '}' if self.opened => {
                self.depth -= 1;
                self.depth == 0
            }
            _ => false,
        }
    }

    /// Feed every brace of a line of raw text
    pub fn observe_line(&mut self, line: &str) {
        for ch in line.chars() {
            self.push(ch);
        }
    }
}

/// Index of the `}` closing the first block opened at or after `start`.
///
/// Only punctuation tokens count; braces inside strings and comments were already
/// absorbed by the lexer.
#[must_use]
pub fn find_matching_close(tokens: &[Token<'_>], start: usize) -> Option<usize> {
    let mut depth = BraceDepth::new();
    for (idx, token) in tokens.iter().enumerate().skip(start) {
        let closes = if token.is_punct('{') {
            depth.push('{')
        } else if token.is_punct('}') {
            depth.push('}')
        } else {
            false
        };
        if closes {
            return Some(idx);
        }
    }
    None
}

/// Index of the `)` balancing the `(` at `open`
#[must_use]
pub fn find_matching_paren(tokens: &[Token<'_>], open: usize) -> Option<usize> {
    if !tokens.get(open)?.is_punct('(') {
        return None;
    }

    let mut depth = 0usize;
    for (idx, token) in tokens.iter().enumerate().skip(open) {
        if token.is_punct('(') {
            depth += 1;
        } else if token.is_punct(')') {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return Some(idx);
            }
        }
    }
    None
}
