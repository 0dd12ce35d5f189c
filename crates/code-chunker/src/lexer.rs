use crate::language::{Language, LanguageProfile};
use std::iter::Peekable;
use std::str::CharIndices;

/// Token category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Identifier,
    Keyword,
    String,
    Number,
    Operator,
    Punctuation,
    Comment,
    Whitespace,
}

/// A lexed slice of the source with its position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    /// 1-indexed line of the first character
    pub line: usize,
    /// 1-indexed column (in characters) of the first character
    pub column: usize,
    pub byte_start: usize,
    pub byte_end: usize,
}

impl Token<'_> {
    /// Punctuation token with exactly this character
    pub fn is_punct(&self, ch: char) -> bool {
        self.kind == TokenKind::Punctuation && self.text.starts_with(ch) && self.text.len() == 1
    }

    pub fn is_keyword(&self, word: &str) -> bool {
        self.kind == TokenKind::Keyword && self.text == word
    }

    /// Identifier or keyword
    pub fn is_word(&self) -> bool {
        matches!(self.kind, TokenKind::Identifier | TokenKind::Keyword)
    }

    /// Anything except whitespace and comments
    pub fn is_significant(&self) -> bool {
        !matches!(self.kind, TokenKind::Whitespace | TokenKind::Comment)
    }
}

/// Tokenize with the C# tables
pub fn tokenize(source: &str) -> Vec<Token<'_>> {
    Lexer::new(source, Language::CSharp.profile()).tokenize()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    InString { quote: char, verbatim: bool },
    InChar,
    InLineComment,
    InBlockComment,
}

/// Single-pass character state machine.
///
/// Never fails: characters outside every token class are skipped, and a string,
/// char or comment still open at end of input is flushed as the final token.
pub struct Lexer<'a> {
    source: &'a str,
    profile: &'static LanguageProfile,
    chars: Peekable<CharIndices<'a>>,
    line: usize,
    column: usize,
    tokens: Vec<Token<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, profile: &'static LanguageProfile) -> Self {
        Self {
            source,
            profile,
            chars: source.char_indices().peekable(),
            line: 1,
            column: 1,
            tokens: Vec::new(),
        }
    }

    pub fn tokenize(mut self) -> Vec<Token<'a>> {
        while let Some((start, ch, line, column)) = self.bump() {
            let state = self.classify(start, ch);
            let kind = match state {
                State::Normal => {
                    self.scan_normal(start, ch, line, column);
                    continue;
                }
                State::InString { quote, verbatim } => {
                    self.scan_quoted(quote, verbatim);
                    TokenKind::String
                }
                State::InChar => {
                    self.scan_quoted('\'', false);
                    TokenKind::String
                }
                State::InLineComment => {
                    self.scan_line_comment();
                    TokenKind::Comment
                }
                State::InBlockComment => {
                    self.scan_block_comment();
                    TokenKind::Comment
                }
            };
            self.emit(kind, start, line, column);
        }

        self.tokens
    }

    /// State entered by the character just consumed
    fn classify(&mut self, start: usize, ch: char) -> State {
        match ch {
            '"' => State::InString {
                quote: '"',
                verbatim: self.profile.verbatim_strings && self.is_verbatim_prefix(start),
            },
            '`' if self.profile.template_literals => State::InString {
                quote: '`',
                verbatim: false,
            },
            '\'' => State::InChar,
            '/' if self.peek_char() == Some('/') => State::InLineComment,
            '/' if self.peek_char() == Some('*') => State::InBlockComment,
            _ => State::Normal,
        }
    }

    fn scan_normal(&mut self, start: usize, ch: char, line: usize, column: usize) {
        if ch.is_alphabetic() || ch == '_' {
            self.bump_while(|c| c.is_alphanumeric() || c == '_');
            let end = self.offset();
            let kind = if self.profile.is_keyword(&self.source[start..end]) {
                TokenKind::Keyword
            } else {
                TokenKind::Identifier
            };
            self.emit(kind, start, line, column);
        } else if ch.is_ascii_digit() {
            self.bump_while(|c| c.is_ascii_digit() || c == '.');
            self.emit(TokenKind::Number, start, line, column);
        } else if is_operator(ch) {
            while let Some(next) = self.peek_char() {
                if !is_operator(next) || self.at_comment_opener() {
                    break;
                }
                self.bump();
            }
            self.emit(TokenKind::Operator, start, line, column);
        } else if is_punctuation(ch) {
            self.emit(TokenKind::Punctuation, start, line, column);
        } else if ch.is_whitespace() {
            self.emit(TokenKind::Whitespace, start, line, column);
        }
    }

    /// Consume up to and including the closing quote
    fn scan_quoted(&mut self, quote: char, verbatim: bool) {
        let mut escaped = false;
        while let Some((_, ch, _, _)) = self.bump() {
            if verbatim {
                if ch == quote {
                    if self.peek_char() == Some(quote) {
                        self.bump();
                        continue;
                    }
                    return;
                }
                continue;
            }

            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == quote {
                return;
            }
        }
    }

    /// Consume the rest of the line, leaving the newline for the next token
    fn scan_line_comment(&mut self) {
        self.bump_while(|c| c != '\n');
    }

    fn scan_block_comment(&mut self) {
        // opener's '*'
        self.bump();
        let mut prev = '\0';
        while let Some((_, ch, _, _)) = self.bump() {
            if prev == '*' && ch == '/' {
                return;
            }
            prev = ch;
        }
    }

    /// `@"`, `$@"` and `@$"`
    fn is_verbatim_prefix(&self, quote_offset: usize) -> bool {
        let before = &self.source[..quote_offset];
        before.ends_with('@') || before.ends_with("@$")
    }

    fn at_comment_opener(&mut self) -> bool {
        let offset = self.offset();
        let rest = &self.source[offset..];
        rest.starts_with("//") || rest.starts_with("/*")
    }

    fn emit(&mut self, kind: TokenKind, start: usize, line: usize, column: usize) {
        let end = self.offset();
        let source = self.source;
        self.tokens.push(Token {
            kind,
            text: &source[start..end],
            line,
            column,
            byte_start: start,
            byte_end: end,
        });
    }

    /// Consume one character, returning it with its offset and position
    fn bump(&mut self) -> Option<(usize, char, usize, usize)> {
        let (offset, ch) = self.chars.next()?;
        let position = (offset, ch, self.line, self.column);
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(position)
    }

    fn bump_while(&mut self, mut keep: impl FnMut(char) -> bool) {
        while let Some(next) = self.peek_char() {
            if !keep(next) {
                break;
            }
            self.bump();
        }
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, ch)| ch)
    }

    /// Byte offset of the next unconsumed character
    fn offset(&mut self) -> usize {
        self.chars
            .peek()
            .map_or(self.source.len(), |&(offset, _)| offset)
    }
}

fn is_operator(ch: char) -> bool {
    "+-*/%=<>!&|^~".contains(ch)
}

fn is_punctuation(ch: char) -> bool {
    "(){}[];,.".contains(ch)
}
