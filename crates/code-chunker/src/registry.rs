use crate::error::{ChunkerError, Result};
use crate::language::Language;
use crate::parser::{HeuristicParser, Parser};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Extension to parser lookup, built once at startup and shared by reference
#[derive(Clone, Default)]
pub struct ParserRegistry {
    parsers: HashMap<String, Arc<dyn Parser>>,
}

impl ParserRegistry {
    /// Empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in C# and JavaScript parsers
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(HeuristicParser::csharp()));
        registry.register(Arc::new(HeuristicParser::javascript()));
        registry
    }

    /// Registry mapping each configured extension to the parser for its language name
    pub fn from_extension_map<'a>(
        entries: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self> {
        let mut registry = Self::new();
        for (extension, language_name) in entries {
            let language = Language::from_name(language_name).ok_or_else(|| {
                ChunkerError::invalid_config(format!(
                    "unknown parser language '{language_name}' for extension '{extension}'"
                ))
            })?;
            registry.register_extension(extension, Arc::new(HeuristicParser::new(language)));
        }
        Ok(registry)
    }

    /// Register a parser for all of its extensions; the last registration wins
    pub fn register(&mut self, parser: Arc<dyn Parser>) {
        for extension in parser.file_extensions() {
            self.register_extension(extension, Arc::clone(&parser));
        }
    }

    /// Register a parser for one extension; the last registration wins
    pub fn register_extension(&mut self, extension: &str, parser: Arc<dyn Parser>) {
        let key = normalize_extension(extension);
        let language = parser.language().to_string();
        if let Some(previous) = self.parsers.insert(key.clone(), parser) {
            log::debug!(
                "Parser for .{key} replaced: {} -> {language}",
                previous.language()
            );
        }
    }

    /// Parser registered for an extension (leading dot optional, case-insensitive)
    pub fn get(&self, extension: &str) -> Result<Arc<dyn Parser>> {
        let key = normalize_extension(extension);
        self.parsers
            .get(&key)
            .cloned()
            .ok_or_else(|| ChunkerError::unsupported_extension(key))
    }

    /// Parser for a file path, by its extension
    pub fn for_path(&self, path: impl AsRef<Path>) -> Result<Arc<dyn Parser>> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| ChunkerError::unsupported_extension(path.display().to_string()))?;
        self.get(extension)
    }

    /// Registered extensions, sorted
    #[must_use]
    pub fn extensions(&self) -> Vec<String> {
        let mut extensions: Vec<String> = self.parsers.keys().cloned().collect();
        extensions.sort();
        extensions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }
}

impl std::fmt::Debug for ParserRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParserRegistry")
            .field("extensions", &self.extensions())
            .finish()
    }
}

fn normalize_extension(extension: &str) -> String {
    extension.trim_start_matches('.').to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Extraction;

    struct FixedParser(&'static str);

    impl Parser for FixedParser {
        fn parse(&self, source: &str) -> Result<Extraction> {
            Ok(Extraction::whole_file(source))
        }

        fn language(&self) -> &str {
            self.0
        }

        fn file_extensions(&self) -> &[&'static str] {
            &["cs"]
        }
    }

    #[test]
    fn test_defaults() {
        let registry = ParserRegistry::with_defaults();
        assert_eq!(registry.get(".CS").unwrap().language(), "csharp");
        assert_eq!(registry.get("jsx").unwrap().language(), "javascript");
        assert_eq!(
            registry.for_path("src/app/main.mjs").unwrap().language(),
            "javascript"
        );
        assert_eq!(registry.len(), 5);
    }

    #[test]
    fn test_unknown_extension() {
        let registry = ParserRegistry::with_defaults();
        assert!(matches!(
            registry.get(".go"),
            Err(ChunkerError::UnsupportedExtension(ext)) if ext == "go"
        ));
        assert!(matches!(
            registry.for_path("Makefile"),
            Err(ChunkerError::UnsupportedExtension(_))
        ));
    }

    #[test]
    fn test_last_registration_wins() {
        let mut registry = ParserRegistry::with_defaults();
        registry.register(Arc::new(FixedParser("custom")));
        assert_eq!(registry.get("cs").unwrap().language(), "custom");
        assert_eq!(registry.get("js").unwrap().language(), "javascript");
    }

    #[test]
    fn test_from_extension_map() {
        let registry =
            ParserRegistry::from_extension_map([(".cs", "csharp"), (".js", "javascript")])
                .unwrap();
        assert_eq!(registry.extensions(), vec!["cs", "js"]);

        let err = ParserRegistry::from_extension_map([(".rs", "rust")]).unwrap_err();
        assert!(matches!(err, ChunkerError::InvalidConfig(_)));
    }
}
