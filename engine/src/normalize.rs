use rust_stemmers::{Algorithm, Stemmer};
use unicode_normalization::UnicodeNormalization;

/// Token-to-term mapping, applied identically at index and query time.
/// Implementations must be deterministic; the engine relies on equal inputs
/// producing equal terms across both sides.
pub trait TermNormalizer: Send + Sync {
    fn normalize(&self, token: &str) -> String;
}

/// NFKC fold, lowercase, then Snowball English stemming.
pub struct EnglishNormalizer {
    stemmer: Stemmer,
}

impl EnglishNormalizer {
    pub fn new() -> Self {
        Self {
            stemmer: Stemmer::create(Algorithm::English),
        }
    }
}

impl Default for EnglishNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TermNormalizer for EnglishNormalizer {
    fn normalize(&self, token: &str) -> String {
        let folded: String = token.nfkc().collect::<String>().to_lowercase();
        self.stemmer.stem(&folded).into_owned()
    }
}

/// NFKC fold and lowercase only, no stemming. Useful where exact word forms
/// matter and as a lighter drop-in for tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct CaseFolder;

impl TermNormalizer for CaseFolder {
    fn normalize(&self, token: &str) -> String {
        token.nfkc().collect::<String>().to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_stems_inflected_forms() {
        let norm = EnglishNormalizer::new();
        assert_eq!(norm.normalize("running"), "run");
        assert_eq!(norm.normalize("walked"), "walk");
        assert_eq!(norm.normalize("cats"), "cat");
    }

    #[test]
    fn english_folds_case_before_stemming() {
        let norm = EnglishNormalizer::new();
        assert_eq!(norm.normalize("RUNNING"), "run");
        assert_eq!(norm.normalize("Alpha"), "alpha");
    }

    #[test]
    fn case_folder_keeps_word_shape() {
        let norm = CaseFolder;
        assert_eq!(norm.normalize("Running"), "running");
        assert_eq!(norm.normalize("CATS"), "cats");
    }

    #[test]
    fn nfkc_expands_compatibility_forms() {
        // U+FB01 LATIN SMALL LIGATURE FI
        assert_eq!(CaseFolder.normalize("\u{fb01}sh"), "fish");
    }
}
