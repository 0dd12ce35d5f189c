use crate::hasher::content_hash;
use serde::{Deserialize, Serialize};

/// Kind of structural unit found in a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Class,
    Interface,
    Struct,
    Record,
    /// Free-standing function (JavaScript)
    Function,
}

impl NodeKind {
    /// Map a declaration keyword to its node kind
    #[must_use]
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "class" => Some(Self::Class),
            "interface" => Some(Self::Interface),
            "struct" => Some(Self::Struct),
            "record" => Some(Self::Record),
            "function" => Some(Self::Function),
            _ => None,
        }
    }

    /// Get human-readable name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Struct => "struct",
            Self::Record => "record",
            Self::Function => "function",
        }
    }
}

/// Kind of member owned by a skeleton node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    Method,
}

/// A method-like member of a structural unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    #[serde(rename = "type")]
    pub kind: MemberKind,

    pub name: String,

    /// Digest of the member's chunk text
    #[serde(rename = "md5")]
    pub content_hash: String,
}

impl Member {
    #[must_use]
    pub fn method(name: impl Into<String>, content_hash: impl Into<String>) -> Self {
        Self {
            kind: MemberKind::Method,
            name: name.into(),
            content_hash: content_hash.into(),
        }
    }
}

/// One structural unit found in a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkeletonNode {
    #[serde(rename = "type")]
    pub kind: NodeKind,

    pub name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<Member>,

    #[serde(rename = "md5", default, skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
}

impl SkeletonNode {
    #[must_use]
    pub fn new(kind: NodeKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            members: Vec::new(),
            content_hash: None,
        }
    }
}

/// A contiguous, hash-identified slice of original source text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    #[serde(rename = "md5")]
    pub content_hash: String,

    pub text: String,

    /// Owned by the embedding step; the structural core never sets it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embeddings: Option<Vec<f32>>,
}

impl Chunk {
    /// Create a chunk, hashing its text
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            content_hash: content_hash(text.as_bytes()),
            text,
            embeddings: None,
        }
    }
}

/// Skeleton and chunks produced by one parse
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub skeleton: Vec<SkeletonNode>,
    pub chunks: Vec<Chunk>,
}

impl Extraction {
    /// The whole-file fallback: no skeleton, one chunk holding the entire source
    #[must_use]
    pub fn whole_file(source: &str) -> Self {
        Self {
            skeleton: Vec::new(),
            chunks: vec![Chunk::new(source)],
        }
    }

    /// Find the chunk backing a member
    #[must_use]
    pub fn chunk_for(&self, member: &Member) -> Option<&Chunk> {
        self.chunks
            .iter()
            .find(|chunk| chunk.content_hash == member.content_hash)
    }
}

/// Analysis of one source file, persisted next to it as a sidecar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Directory containing the source file
    #[serde(rename = "path")]
    pub directory: String,

    pub filename: String,

    /// Digest of the exact file bytes
    #[serde(rename = "md5")]
    pub file_content_hash: String,

    /// One vector per embedded piece of the whole file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embeddings: Option<Vec<Vec<f32>>>,

    #[serde(default)]
    pub skeleton: Vec<SkeletonNode>,

    #[serde(default)]
    pub chunks: Vec<Chunk>,
}

impl AnalysisResult {
    /// Assemble a fresh result, enforcing that chunks are never empty
    #[must_use]
    pub fn new(
        directory: impl Into<String>,
        filename: impl Into<String>,
        source: &str,
        extraction: Extraction,
    ) -> Self {
        let Extraction { skeleton, mut chunks } = extraction;
        if chunks.is_empty() {
            chunks.push(Chunk::new(source));
        }

        Self {
            directory: directory.into(),
            filename: filename.into(),
            file_content_hash: content_hash(source.as_bytes()),
            embeddings: None,
            skeleton,
            chunks,
        }
    }
}
