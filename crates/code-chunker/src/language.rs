use crate::lexer::{Token, TokenKind};
use crate::types::NodeKind;
use std::path::Path;

/// Supported source language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    CSharp,
    JavaScript,
}

impl Language {
    /// Detect language from file extension (leading dot optional)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_lowercase().as_str() {
            "cs" => Some(Language::CSharp),
            "js" | "mjs" | "cjs" | "jsx" => Some(Language::JavaScript),
            _ => None,
        }
    }

    /// Detect language from file path
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Resolve a configured language name
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "csharp" | "c#" | "cs" => Some(Language::CSharp),
            "javascript" | "js" => Some(Language::JavaScript),
            _ => None,
        }
    }

    /// Get language name as string
    pub fn as_str(self) -> &'static str {
        match self {
            Language::CSharp => "csharp",
            Language::JavaScript => "javascript",
        }
    }

    /// File extensions handled by this language
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Language::CSharp => &["cs"],
            Language::JavaScript => &["js", "mjs", "cjs", "jsx"],
        }
    }

    /// Static lexing and extraction tables
    pub fn profile(self) -> &'static LanguageProfile {
        match self {
            Language::CSharp => &CSHARP,
            Language::JavaScript => &JAVASCRIPT,
        }
    }
}

/// Fixed tables driving the lexer and the structural extractor for one language
#[derive(Debug)]
pub struct LanguageProfile {
    /// Reserved words; identifier runs matching one become `Keyword` tokens
    pub keywords: &'static [&'static str],

    /// Keywords skipped in front of a member signature
    pub modifiers: &'static [&'static str],

    /// Keywords opening a structural unit
    pub structural_keywords: &'static [&'static str],

    /// Accessor keywords marking a property block (`{ get; set; }`)
    pub accessor_keywords: &'static [&'static str],

    /// Top-level `function` declarations become skeleton nodes
    pub function_declarations: bool,

    /// Backtick template literals are string delimiters
    pub template_literals: bool,

    /// `@"..."` verbatim strings, where `""` escapes a quote and `\` is literal
    pub verbatim_strings: bool,
}

impl LanguageProfile {
    pub fn is_keyword(&self, word: &str) -> bool {
        self.keywords.contains(&word)
    }

    pub fn is_modifier(&self, token: &Token<'_>) -> bool {
        token.kind == TokenKind::Keyword && self.modifiers.contains(&token.text)
    }

    pub fn is_accessor(&self, token: &Token<'_>) -> bool {
        token.kind == TokenKind::Keyword && self.accessor_keywords.contains(&token.text)
    }

    /// Node kind opened by this token, if it is a structural keyword
    pub fn structural_kind(&self, token: &Token<'_>) -> Option<NodeKind> {
        if token.kind != TokenKind::Keyword || !self.structural_keywords.contains(&token.text) {
            return None;
        }
        NodeKind::from_keyword(token.text)
    }
}

static CSHARP: LanguageProfile = LanguageProfile {
    keywords: &[
        "class", "interface", "struct", "record", "enum", "public", "private", "protected",
        "internal", "static", "virtual", "override", "abstract", "sealed", "partial", "async",
        "extern", "unsafe", "get", "set", "operator", "namespace", "using", "readonly", "const",
        "new", "return", "void", "if", "else", "for", "foreach", "while", "do", "switch",
        "case", "default", "break", "continue", "goto", "try", "catch", "finally", "throw",
        "init", "lock", "fixed", "checked", "unchecked", "typeof", "sizeof", "stackalloc",
        "this", "base", "event", "delegate", "implicit", "explicit", "params", "ref", "out",
        "in", "is", "as", "null", "true", "false", "volatile",
    ],
    modifiers: &[
        "public",
        "private",
        "protected",
        "internal",
        "static",
        "virtual",
        "override",
        "abstract",
        "sealed",
        "readonly",
        "async",
        "extern",
        "unsafe",
        "new",
        "partial",
    ],
    structural_keywords: &["class", "interface", "struct", "record"],
    accessor_keywords: &["get", "set", "init"],
    function_declarations: false,
    template_literals: false,
    verbatim_strings: true,
};

static JAVASCRIPT: LanguageProfile = LanguageProfile {
    keywords: &[
        "class", "function", "const", "let", "var", "static", "async", "await", "get", "set",
        "export", "default", "import", "from", "extends", "new", "return", "if", "else", "for",
        "while", "do", "switch", "case", "break", "continue", "try", "catch", "finally", "throw",
        "typeof", "instanceof", "this", "super", "yield",
    ],
    modifiers: &["static", "async", "get", "set", "export", "default"],
    structural_keywords: &["class"],
    accessor_keywords: &[],
    function_declarations: true,
    template_literals: true,
    verbatim_strings: false,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(Language::from_extension(".cs"), Some(Language::CSharp));
        assert_eq!(Language::from_extension("CS"), Some(Language::CSharp));
        assert_eq!(Language::from_extension("mjs"), Some(Language::JavaScript));
        assert_eq!(Language::from_extension(".go"), None);
    }

    #[test]
    fn test_from_path_and_name() {
        assert_eq!(
            Language::from_path("src/Models/User.cs"),
            Some(Language::CSharp)
        );
        assert_eq!(Language::from_path("Makefile"), None);
        assert_eq!(Language::from_name("C#"), Some(Language::CSharp));
        assert_eq!(Language::from_name("javascript"), Some(Language::JavaScript));
        assert_eq!(Language::from_name("cobol"), None);
    }

    #[test]
    fn test_modifiers_are_keywords() {
        for language in [Language::CSharp, Language::JavaScript] {
            let profile = language.profile();
            for modifier in profile.modifiers {
                assert!(
                    profile.is_keyword(modifier),
                    "{modifier} must lex as a keyword for {}",
                    language.as_str()
                );
            }
            for keyword in profile.structural_keywords {
                assert!(profile.is_keyword(keyword));
            }
        }
    }
}
