//! # Skel Code Chunker
//!
//! Heuristic structural analysis of C-family source files.
//!
//! The chunker turns a file into:
//! - a **skeleton**: declared types (class, interface, struct, record, or
//!   free-standing function) with their member names and content hashes
//! - **chunks**: exact, hash-identified slices of the source, one per member,
//!   or the whole file when no structure is found
//!
//! ## Architecture
//!
//! ```text
//! Source Code
//!     │
//!     ├──> Language Detection (from extension)
//!     │
//!     ├──> Lexer → Token[] (strings and comments absorbed)
//!     │
//!     ├──> Structural Extractor
//!     │    ├─> Find structural keywords and unit names
//!     │    ├─> Brace-depth matching for unit and member bodies
//!     │    └─> Cut whole-line chunks, pulling in leading comments
//!     │
//!     └──> Semantic Splitter (optional, for size-limited consumers)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use skel_code_chunker::ParserRegistry;
//!
//! let registry = ParserRegistry::with_defaults();
//! let parser = registry.get("cs").unwrap();
//!
//! let code = "class Foo {\n  public void Bar() {\n    var x = 1;\n  }\n}";
//! let extraction = parser.parse(code).unwrap();
//!
//! assert_eq!(extraction.skeleton[0].name, "Foo");
//! assert_eq!(extraction.skeleton[0].members[0].name, "Bar");
//! assert_eq!(extraction.chunks[0].text, "  public void Bar() {\n    var x = 1;\n  }");
//! ```

mod blocks;
mod error;
mod extractor;
mod hasher;
mod language;
mod lexer;
mod parser;
mod registry;
mod splitter;
mod types;

pub use blocks::{find_matching_close, find_matching_paren, BraceDepth};
pub use error::{ChunkerError, Result};
pub use extractor::Extractor;
pub use hasher::content_hash;
pub use language::{Language, LanguageProfile};
pub use lexer::{tokenize, Lexer, Token, TokenKind};
pub use parser::{HeuristicParser, Parser};
pub use registry::ParserRegistry;
pub use splitter::{is_structural_boundary, split_text, SemanticSplitter};
pub use types::{AnalysisResult, Chunk, Extraction, Member, MemberKind, NodeKind, SkeletonNode};
