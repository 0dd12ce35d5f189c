//! Heuristic structural extraction over a lexed token stream.
//!
//! Every matcher is a small function over an index into an immutable slice of
//! significant tokens (whitespace and comments removed). Matchers return what they
//! recognised together with the token index needed to continue, so forward scans
//! compose and can be tested in isolation.

use crate::blocks::{find_matching_close, find_matching_paren};
use crate::error::{ChunkerError, Result};
use crate::language::LanguageProfile;
use crate::lexer::{Token, TokenKind};
use crate::types::{Chunk, Extraction, Member, NodeKind, SkeletonNode};
use std::collections::HashSet;

/// Tokens after a property's `{` searched for an accessor keyword
const ACCESSOR_WINDOW: usize = 4;

/// Builds the skeleton and per-member chunks for one file
pub struct Extractor {
    profile: &'static LanguageProfile,
}

/// Header of a structural unit: `class Name`
#[derive(Debug, Clone, PartialEq, Eq)]
struct UnitHeader<'a> {
    kind: NodeKind,
    name: &'a str,
    name_index: usize,
}

/// Where a unit's declaration ends up after its name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UnitBody {
    /// `{` at this index
    Block(usize),
    /// Declaration without a body (`record Point(int X);`), ends at this index
    Bodiless(usize),
}

/// A member signature whose body opens at `body_open`
#[derive(Debug, Clone, PartialEq, Eq)]
struct Signature {
    name: String,
    body_open: usize,
}

/// Byte offsets of line starts, for cutting whole-line slices out of the source
struct LineIndex<'a> {
    source: &'a str,
    starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    fn new(source: &'a str) -> Self {
        let mut starts = vec![0];
        starts.extend(source.match_indices('\n').map(|(idx, _)| idx + 1));
        Self { source, starts }
    }

    /// Text of a 0-indexed line, without its newline
    fn line(&self, idx: usize) -> &'a str {
        let start = self.starts[idx];
        let end = self
            .starts
            .get(idx + 1)
            .map_or(self.source.len(), |next| next - 1);
        &self.source[start..end]
    }

    /// Lines `first..=last` (1-indexed), extended upward over blank and `//` lines
    fn chunk_text(&self, first: usize, last: usize) -> Option<&'a str> {
        if first == 0 || first > last || last > self.starts.len() {
            return None;
        }

        let mut start_idx = first - 1;
        while start_idx > 0 && is_blank_or_line_comment(self.line(start_idx - 1)) {
            start_idx -= 1;
        }

        let start = self.starts[start_idx];
        let end = self
            .starts
            .get(last)
            .map_or(self.source.len(), |next| next - 1);
        Some(&self.source[start..end])
    }
}

fn is_blank_or_line_comment(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with("//")
}

impl Extractor {
    pub fn new(profile: &'static LanguageProfile) -> Self {
        Self { profile }
    }

    /// Scan `tokens` (as produced by the lexer for `source`) into skeleton and chunks.
    ///
    /// Files without any recognisable unit fall back to a single whole-file chunk.
    pub fn extract(&self, tokens: &[Token<'_>], source: &str) -> Result<Extraction> {
        let tokens: Vec<Token<'_>> = tokens.iter().copied().filter(Token::is_significant).collect();
        let lines = LineIndex::new(source);
        let mut out = ChunkSink::default();

        let mut idx = 0;
        while idx < tokens.len() {
            if let Some(header) = self.match_unit_header(&tokens, idx) {
                idx = self.extract_unit(&tokens, &lines, header, idx, &mut out)?;
            } else if let Some(signature) = self.match_function_declaration(&tokens, idx) {
                idx = self.extract_function(&tokens, &lines, signature, idx, &mut out)?;
            } else {
                idx += 1;
            }
        }

        let ChunkSink { skeleton, chunks, .. } = out;
        if skeleton.is_empty() {
            return Ok(Extraction::whole_file(source));
        }
        if chunks.is_empty() {
            log::debug!(
                "{} structural units without members, keeping whole file as chunk",
                skeleton.len()
            );
            return Ok(Extraction {
                skeleton,
                chunks: vec![Chunk::new(source)],
            });
        }

        Ok(Extraction { skeleton, chunks })
    }

    /// Handle one unit starting at `start`; returns the index to resume scanning at
    fn extract_unit(
        &self,
        tokens: &[Token<'_>],
        lines: &LineIndex<'_>,
        header: UnitHeader<'_>,
        start: usize,
        out: &mut ChunkSink,
    ) -> Result<usize> {
        let mut node = SkeletonNode::new(header.kind, header.name);

        let open = match find_unit_body(tokens, header.name_index) {
            Some(UnitBody::Block(open)) => open,
            Some(UnitBody::Bodiless(end)) => {
                out.skeleton.push(node);
                return Ok(end + 1);
            }
            None => {
                log::debug!(
                    "{} {} has no body, skipping",
                    header.kind.as_str(),
                    header.name
                );
                return Ok(start + 1);
            }
        };

        let Some(close) = find_matching_close(tokens, open) else {
            log::debug!(
                "{} {} is never closed, skipping",
                header.kind.as_str(),
                header.name
            );
            return Ok(start + 1);
        };

        let mut idx = open + 1;
        while idx < close {
            let Some(signature) = self.match_member(tokens, idx) else {
                idx += 1;
                continue;
            };
            let Some(body_close) = find_matching_close(tokens, signature.body_open) else {
                idx += 1;
                continue;
            };
            if body_close >= close {
                idx += 1;
                continue;
            }

            let text = member_text(tokens, lines, idx, body_close)?;
            let chunk = Chunk::new(text);
            node.members
                .push(Member::method(signature.name, chunk.content_hash.clone()));
            out.push_chunk(chunk);
            idx = body_close + 1;
        }

        out.skeleton.push(node);
        Ok(close + 1)
    }

    /// Handle a free-standing function; it becomes a member-less node with its own chunk
    fn extract_function(
        &self,
        tokens: &[Token<'_>],
        lines: &LineIndex<'_>,
        signature: Signature,
        start: usize,
        out: &mut ChunkSink,
    ) -> Result<usize> {
        let Some(close) = find_matching_close(tokens, signature.body_open) else {
            return Ok(start + 1);
        };

        let chunk = Chunk::new(member_text(tokens, lines, start, close)?);
        let mut node = SkeletonNode::new(NodeKind::Function, signature.name);
        node.content_hash = Some(chunk.content_hash.clone());
        out.skeleton.push(node);
        out.push_chunk(chunk);
        Ok(close + 1)
    }

    /// `class Name`: a structural keyword followed (eventually) by an identifier
    fn match_unit_header<'a>(&self, tokens: &[Token<'a>], idx: usize) -> Option<UnitHeader<'a>> {
        let kind = self.profile.structural_kind(tokens.get(idx)?)?;
        let (name_index, name) = tokens
            .iter()
            .enumerate()
            .skip(idx + 1)
            .find(|(_, token)| token.kind == TokenKind::Identifier)?;
        Some(UnitHeader {
            kind,
            name: name.text,
            name_index,
        })
    }

    /// Index of the first token past any modifier keywords
    fn skip_modifiers(&self, tokens: &[Token<'_>], mut idx: usize) -> usize {
        while tokens
            .get(idx)
            .is_some_and(|token| self.profile.is_modifier(token))
        {
            idx += 1;
        }
        idx
    }

    /// Recognise a method-like member beginning at `idx`
    fn match_member(&self, tokens: &[Token<'_>], idx: usize) -> Option<Signature> {
        let i = self.skip_modifiers(tokens, idx);
        let first = tokens.get(i)?;
        let type_end = skip_type(tokens, i);

        // operator overload: `operator +(` or `Type operator +(`
        let operator_at = if first.is_keyword("operator") {
            Some(i)
        } else if type_end
            .and_then(|end| tokens.get(end))
            .is_some_and(|t| t.is_keyword("operator"))
        {
            type_end
        } else {
            None
        };
        if let Some(op) = operator_at {
            return match_operator(tokens, op);
        }

        let is_type = self.profile.structural_kind(first).is_none();
        let typed_name = type_end
            .filter(|_| is_type)
            .and_then(|end| Some((end, tokens.get(end)?)))
            .filter(|(_, t)| t.kind == TokenKind::Identifier);

        if let Some((name_at, name)) = typed_name {
            let name = name.text;
            // `Type Name (` and `Type Name<T> (`
            let paren = skip_type_arguments(tokens, name_at + 1).unwrap_or(name_at + 1);
            if tokens.get(paren).is_some_and(|t| t.is_punct('(')) {
                return Some(Signature {
                    name: name.to_string(),
                    body_open: find_body_open(tokens, paren)?,
                });
            }

            // `Type Name { get; set; }`
            if tokens.get(name_at + 1).is_some_and(|t| t.is_punct('{')) {
                let accessor = self.skip_modifiers(tokens, name_at + 2);
                let window_end = (name_at + 2 + ACCESSOR_WINDOW).min(tokens.len());
                if accessor < window_end && self.profile.is_accessor(&tokens[accessor]) {
                    return Some(Signature {
                        name: name.to_string(),
                        body_open: name_at + 1,
                    });
                }
            }
        }

        // `Name (`: constructors, and plain methods in languages without return types.
        // `new Name(..) { .. }` is an object initializer.
        let after_new = i > 0 && tokens[i - 1].is_keyword("new");
        if first.kind == TokenKind::Identifier && !after_new {
            let paren = skip_type_arguments(tokens, i + 1).unwrap_or(i + 1);
            if tokens.get(paren).is_some_and(|t| t.is_punct('(')) {
                return Some(Signature {
                    name: first.text.to_string(),
                    body_open: find_body_open(tokens, paren)?,
                });
            }
        }

        None
    }

    /// `function name (`, `const name = (...) =>`, `const name = function (`
    fn match_function_declaration(&self, tokens: &[Token<'_>], idx: usize) -> Option<Signature> {
        if !self.profile.function_declarations {
            return None;
        }

        let first = tokens.get(idx)?;
        if first.is_keyword("function") {
            let name = tokens.get(idx + 1)?;
            if name.kind != TokenKind::Identifier || !tokens.get(idx + 2)?.is_punct('(') {
                return None;
            }
            return Some(Signature {
                name: name.text.to_string(),
                body_open: find_body_open(tokens, idx + 2)?,
            });
        }

        if !(first.is_keyword("const") || first.is_keyword("let") || first.is_keyword("var")) {
            return None;
        }
        let name = tokens.get(idx + 1)?;
        let assign = tokens.get(idx + 2)?;
        if name.kind != TokenKind::Identifier
            || assign.kind != TokenKind::Operator
            || assign.text != "="
        {
            return None;
        }

        let mut value = idx + 3;
        if tokens.get(value)?.is_keyword("async") {
            value += 1;
        }
        let body_open = match_function_value(tokens, value)?;
        Some(Signature {
            name: name.text.to_string(),
            body_open,
        })
    }
}

/// Collected output with chunk de-duplication by content hash
#[derive(Default)]
struct ChunkSink {
    skeleton: Vec<SkeletonNode>,
    chunks: Vec<Chunk>,
    seen: HashSet<String>,
}

impl ChunkSink {
    fn push_chunk(&mut self, chunk: Chunk) {
        if self.seen.insert(chunk.content_hash.clone()) {
            self.chunks.push(chunk);
        }
    }
}

/// Source lines from the token at `first` through the token at `last`
fn member_text(
    tokens: &[Token<'_>],
    lines: &LineIndex<'_>,
    first: usize,
    last: usize,
) -> Result<String> {
    let (start_line, end_line) = (tokens[first].line, tokens[last].line);
    lines
        .chunk_text(start_line, end_line)
        .map(str::to_string)
        .ok_or_else(|| {
            ChunkerError::parse(format!(
                "token lines {start_line}..={end_line} outside source of {} lines",
                lines.starts.len()
            ))
        })
}

/// Locate the `{` opening a unit after its name, or the `;` ending a bodiless one
fn find_unit_body(tokens: &[Token<'_>], name_index: usize) -> Option<UnitBody> {
    for (idx, token) in tokens.iter().enumerate().skip(name_index + 1) {
        if token.is_punct('{') {
            return Some(UnitBody::Block(idx));
        }
        if token.is_punct(';') {
            return Some(UnitBody::Bodiless(idx));
        }
        if token.is_punct('}') {
            return None;
        }
    }
    None
}

/// From a parameter list's `(`, find the `{` opening the body.
///
/// Gives up on `;`, `}`, `]` or an assignment/arrow after the closing `)`, which
/// rejects call expressions, attributes and declarations without a block body.
fn find_body_open(tokens: &[Token<'_>], paren: usize) -> Option<usize> {
    let close = find_matching_paren(tokens, paren)?;
    for (idx, token) in tokens.iter().enumerate().skip(close + 1) {
        if token.is_punct('{') {
            return Some(idx);
        }
        if token.is_punct(';') || token.is_punct('}') || token.is_punct(']') {
            return None;
        }
        if token.kind == TokenKind::Operator && token.text.contains('=') {
            return None;
        }
    }
    None
}

/// Index past a type starting at `idx`: `Name`, `Ns.Name`, `Name<T, U>`, `Name[]`
fn skip_type(tokens: &[Token<'_>], idx: usize) -> Option<usize> {
    if !tokens.get(idx)?.is_word() {
        return None;
    }

    let mut end = idx + 1;
    loop {
        if let Some(after) = skip_type_arguments(tokens, end) {
            end = after;
        } else if tokens.get(end).is_some_and(|t| t.is_punct('.'))
            && tokens.get(end + 1).is_some_and(Token::is_word)
        {
            end += 2;
        } else if tokens.get(end).is_some_and(|t| t.is_punct('[')) {
            let mut close = end + 1;
            while tokens.get(close).is_some_and(|t| t.is_punct(',')) {
                close += 1;
            }
            if !tokens.get(close).is_some_and(|t| t.is_punct(']')) {
                break;
            }
            end = close + 1;
        } else {
            break;
        }
    }
    Some(end)
}

/// Tokens searched for the end of a `<...>` type argument list
const TYPE_ARGUMENT_WINDOW: usize = 32;

/// Index past a balanced `<...>` starting at `idx`; `>>` closes two levels
fn skip_type_arguments(tokens: &[Token<'_>], idx: usize) -> Option<usize> {
    if !tokens
        .get(idx)
        .is_some_and(|t| t.kind == TokenKind::Operator && t.text.starts_with('<'))
    {
        return None;
    }

    let mut depth = 0usize;
    for (pos, token) in tokens.iter().enumerate().skip(idx).take(TYPE_ARGUMENT_WINDOW) {
        match token.kind {
            TokenKind::Operator => {
                let mut chars = token.text.chars().peekable();
                while let Some(ch) = chars.next() {
                    match ch {
                        '<' => depth += 1,
                        '>' => depth = depth.checked_sub(1)?,
                        _ => return None,
                    }
                    if depth == 0 {
                        return chars.peek().is_none().then_some(pos + 1);
                    }
                }
            }
            TokenKind::Identifier | TokenKind::Keyword => {}
            TokenKind::Punctuation if matches!(token.text, "," | "." | "[" | "]" | "(" | ")") => {}
            _ => return None,
        }
    }
    None
}

fn match_operator(tokens: &[Token<'_>], op: usize) -> Option<Signature> {
    let symbol = tokens.get(op + 1)?;
    let paren = tokens
        .iter()
        .enumerate()
        .skip(op + 1)
        .take_while(|(_, token)| !token.is_punct('{') && !token.is_punct(';'))
        .find(|(_, token)| token.is_punct('('))
        .map(|(idx, _)| idx)?;
    Some(Signature {
        name: format!("operator{}", symbol.text),
        body_open: find_body_open(tokens, paren)?,
    })
}

/// Body `{` of a function value: `function (..) {`, `(..) => {`, `x => {`
fn match_function_value(tokens: &[Token<'_>], idx: usize) -> Option<usize> {
    let first = tokens.get(idx)?;
    if first.is_keyword("function") {
        let mut paren = idx + 1;
        if tokens.get(paren)?.kind == TokenKind::Identifier {
            paren += 1;
        }
        if !tokens.get(paren)?.is_punct('(') {
            return None;
        }
        return find_body_open(tokens, paren);
    }

    let arrow = if first.is_punct('(') {
        find_matching_paren(tokens, idx)? + 1
    } else if first.kind == TokenKind::Identifier {
        idx + 1
    } else {
        return None;
    };

    let is_arrow = tokens
        .get(arrow)
        .is_some_and(|t| t.kind == TokenKind::Operator && t.text == "=>");
    let body = arrow + 1;
    (is_arrow && tokens.get(body)?.is_punct('{')).then_some(body)
}
