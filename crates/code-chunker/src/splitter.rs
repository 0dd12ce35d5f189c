use crate::blocks::BraceDepth;
use crate::error::{ChunkerError, Result};

/// Characters a long line may be broken after
const SPLIT_CHARS: &[char] = &[' ', ',', ';', '.', '(', ')', '{', '}', '[', ']'];

/// Words allowed in front of a type declaration keyword
const DECLARATION_MODIFIERS: &[&str] = &[
    "public", "private", "protected", "internal", "static", "abstract", "sealed", "partial",
    "readonly", "unsafe", "new", "export", "default",
];

const DECLARATION_KEYWORDS: &[&str] = &["class ", "interface ", "struct ", "enum ", "record "];

const SIGNATURE_MARKERS: &[&str] = &["public ", "private ", "protected ", "internal ", "void "];

/// Line-oriented splitter producing size-bounded pieces for an embedding backend.
///
/// Pieces follow source order. Lines that start a declaration begin a new piece, and
/// a piece is closed early once it is at least half full and back at brace depth 0.
/// Pieces longer than the limit only come from single lines kept whole because they
/// hold a string literal or a block comment.
#[derive(Debug, Clone, Copy)]
pub struct SemanticSplitter {
    max_size: usize,
}

impl SemanticSplitter {
    pub fn new(max_size: usize) -> Result<Self> {
        if max_size == 0 {
            return Err(ChunkerError::invalid_config("max text size must be positive"));
        }
        Ok(Self { max_size })
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn split(&self, text: &str) -> Vec<String> {
        let mut pieces = Vec::new();
        let mut current = PieceBuilder::default();
        let mut depth = BraceDepth::new();

        for line in text.split('\n') {
            depth.observe_line(line);

            if !current.is_empty()
                && (is_structural_boundary(line) || current.len_with(line) > self.max_size)
            {
                current.flush_into(&mut pieces);
            }

            if line.len() > self.max_size {
                current.flush_into(&mut pieces);
                pieces.extend(
                    split_long_line(line, self.max_size)
                        .into_iter()
                        .map(str::to_string),
                );
                continue;
            }

            current.push_line(line);
            if depth.depth() == 0 && current.len() >= self.max_size / 2 {
                current.flush_into(&mut pieces);
            }
        }

        current.flush_into(&mut pieces);
        pieces
    }
}

/// Split `text` into pieces of at most `max_size` bytes where possible
pub fn split_text(text: &str, max_size: usize) -> Result<Vec<String>> {
    Ok(SemanticSplitter::new(max_size)?.split(text))
}

#[derive(Default)]
struct PieceBuilder {
    text: String,
    lines: usize,
}

impl PieceBuilder {
    fn is_empty(&self) -> bool {
        self.lines == 0
    }

    fn len(&self) -> usize {
        self.text.len()
    }

    /// Length after appending `line` with its separator
    fn len_with(&self, line: &str) -> usize {
        let separator = usize::from(self.lines > 0);
        self.text.len() + separator + line.len()
    }

    fn push_line(&mut self, line: &str) {
        if self.lines > 0 {
            self.text.push('\n');
        }
        self.text.push_str(line);
        self.lines += 1;
    }

    /// Emit the accumulated piece unless it is only whitespace
    fn flush_into(&mut self, pieces: &mut Vec<String>) {
        let text = std::mem::take(&mut self.text);
        self.lines = 0;
        if !text.trim().is_empty() {
            pieces.push(text);
        }
    }
}

/// Heuristic check for a line starting a type or member declaration
pub fn is_structural_boundary(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return false;
    }

    let declaration = strip_declaration_modifiers(trimmed);
    if DECLARATION_KEYWORDS
        .iter()
        .any(|keyword| declaration.starts_with(keyword))
    {
        return true;
    }

    if trimmed.contains('(')
        && trimmed.contains(')')
        && (SIGNATURE_MARKERS.iter().any(|marker| trimmed.contains(marker))
            || trimmed.ends_with(')'))
    {
        return true;
    }

    trimmed.contains("get") && trimmed.contains("set")
}

fn strip_declaration_modifiers(mut line: &str) -> &str {
    loop {
        let Some((word, rest)) = line.split_once(char::is_whitespace) else {
            return line;
        };
        if !DECLARATION_MODIFIERS.contains(&word) {
            return line;
        }
        line = rest.trim_start();
    }
}

/// Break one over-long line into pieces of at most `max_size` bytes.
///
/// Line comments and lines holding a string literal or block comment are kept whole.
fn split_long_line(line: &str, max_size: usize) -> Vec<&str> {
    if line.trim_start().starts_with("//") || line.contains('"') || line.contains("/*") {
        return vec![line];
    }

    let mut pieces = Vec::new();
    let mut rest = line;
    while rest.len() > max_size {
        let window = floor_char_boundary(rest, max_size);
        let cut = rest[..window]
            .rfind(SPLIT_CHARS)
            .map(|idx| idx + 1)
            .unwrap_or(window);
        let cut = if cut == 0 {
            rest.chars().next().map_or(rest.len(), char::len_utf8)
        } else {
            cut
        };
        pieces.push(&rest[..cut]);
        rest = &rest[cut..];
    }
    if !rest.is_empty() {
        pieces.push(rest);
    }
    pieces
}

fn floor_char_boundary(text: &str, index: usize) -> usize {
    let mut end = index.min(text.len());
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    end
}
