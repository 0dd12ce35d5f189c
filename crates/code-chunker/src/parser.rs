use crate::error::Result;
use crate::extractor::Extractor;
use crate::language::Language;
use crate::lexer::Lexer;
use crate::types::Extraction;

/// A language-specific source parser producing skeleton and chunks
pub trait Parser: Send + Sync {
    /// Parse source text into skeleton and chunks
    fn parse(&self, source: &str) -> Result<Extraction>;

    /// Language name, e.g. `csharp`
    fn language(&self) -> &str;

    /// Extensions (without leading dot) this parser handles
    fn file_extensions(&self) -> &[&'static str];
}

/// Lexer plus brace-depth extractor, driven by a language's static profile
#[derive(Debug, Clone, Copy)]
pub struct HeuristicParser {
    language: Language,
}

impl HeuristicParser {
    #[must_use]
    pub const fn new(language: Language) -> Self {
        Self { language }
    }

    #[must_use]
    pub const fn csharp() -> Self {
        Self::new(Language::CSharp)
    }

    #[must_use]
    pub const fn javascript() -> Self {
        Self::new(Language::JavaScript)
    }
}

impl Parser for HeuristicParser {
    fn parse(&self, source: &str) -> Result<Extraction> {
        let profile = self.language.profile();
        let tokens = Lexer::new(source, profile).tokenize();
        log::debug!(
            "{}: {} tokens from {} bytes",
            self.language.as_str(),
            tokens.len(),
            source.len()
        );
        Extractor::new(profile).extract(&tokens, source)
    }

    fn language(&self) -> &str {
        self.language.as_str()
    }

    fn file_extensions(&self) -> &[&'static str] {
        self.language.extensions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NodeKind;

    #[test]
    fn test_csharp_parser() {
        let parser = HeuristicParser::csharp();
        assert_eq!(parser.language(), "csharp");
        assert_eq!(parser.file_extensions(), &["cs"]);

        let extraction = parser
            .parse("namespace App {\n  public interface IClock {\n    DateTime Now { get; }\n  }\n}")
            .unwrap();
        assert_eq!(extraction.skeleton.len(), 1);
        assert_eq!(extraction.skeleton[0].kind, NodeKind::Interface);
        assert_eq!(extraction.skeleton[0].members[0].name, "Now");
    }

    #[test]
    fn test_parse_is_idempotent() {
        let parser = HeuristicParser::javascript();
        let source = "class A {\n  run() { return 1; }\n}\nfunction b() {}\n";
        assert_eq!(parser.parse(source).unwrap(), parser.parse(source).unwrap());
    }
}
