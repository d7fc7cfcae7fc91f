//! Stopword sets
//!
//! The built-in Russian list is the 151-word NLTK list, embedded from
//! `data/russian_stopwords.txt`. Other built-in lists come from the
//! `stop-words` crate. Custom lists can be injected directly or read from a
//! file. Every word is stored lower-cased
//! and lookups lower-case the query, so matching is case-insensitive while
//! the caller keeps the original token.

use std::fs;
use std::path::Path;

use rustc_hash::FxHashSet;
use stop_words::{get, LANGUAGE};
use tracing::warn;

use crate::error::{PreprocessError, Result};

/// NLTK Russian stopwords, one per line.
const RUSSIAN: &str = include_str!("../../data/russian_stopwords.txt");

/// Immutable-after-construction set of lower-cased stopwords.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopwordSet {
    words: FxHashSet<String>,
}

impl StopwordSet {
    /// Empty set, filters nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Built-in list for a language, by ISO code or English name.
    ///
    /// # Errors
    ///
    /// Returns [`PreprocessError::UnknownLanguage`] when no list exists.
    pub fn for_language(language: &str) -> Result<Self> {
        let lang = match language.trim().to_lowercase().as_str() {
            "ru" | "russian" => return Ok(Self::from_words(RUSSIAN.lines())),
            "en" | "english" => LANGUAGE::English,
            "de" | "german" => LANGUAGE::German,
            "fr" | "french" => LANGUAGE::French,
            "es" | "spanish" => LANGUAGE::Spanish,
            "it" | "italian" => LANGUAGE::Italian,
            "pt" | "portuguese" => LANGUAGE::Portuguese,
            "nl" | "dutch" => LANGUAGE::Dutch,
            "sv" | "swedish" => LANGUAGE::Swedish,
            "no" | "norwegian" => LANGUAGE::Norwegian,
            "da" | "danish" => LANGUAGE::Danish,
            "fi" | "finnish" => LANGUAGE::Finnish,
            "hu" | "hungarian" => LANGUAGE::Hungarian,
            "tr" | "turkish" => LANGUAGE::Turkish,
            "pl" | "polish" => LANGUAGE::Polish,
            "ar" | "arabic" => LANGUAGE::Arabic,
            _ => return Err(PreprocessError::UnknownLanguage(language.to_string())),
        };

        Ok(Self::from_words(get(lang).iter().map(|s| s.to_string())))
    }

    /// Builds a set from arbitrary words.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::empty();
        set.extend(words);
        set
    }

    /// Reads one stopword per line.
    ///
    /// Blank lines and lines starting with `#` are skipped. A line holding
    /// more than one whitespace-separated word can never match a single
    /// token; it is skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`PreprocessError::StopwordFile`] if the file cannot be read
    /// (including invalid UTF-8).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| PreprocessError::StopwordFile {
            path: path.to_path_buf(),
            source,
        })?;

        let mut set = Self::empty();
        for (lineno, line) in contents.lines().enumerate() {
            let word = line.trim();
            if word.is_empty() || word.starts_with('#') {
                continue;
            }
            if word.split_whitespace().nth(1).is_some() {
                warn!(path = %path.display(), line = lineno + 1, "skipping multi-word stopword entry");
                continue;
            }
            set.insert(word);
        }
        Ok(set)
    }

    /// Adds words, lower-casing each.
    pub fn extend<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for word in words {
            self.insert(word.as_ref());
        }
    }

    fn insert(&mut self, word: &str) {
        self.words.insert(word.to_lowercase());
    }

    /// Case-insensitive membership test.
    pub fn contains(&self, word: &str) -> bool {
        if self.words.is_empty() {
            return false;
        }
        self.contains_lowercase(&word.to_lowercase())
    }

    /// Membership test for a word the caller already lower-cased.
    #[inline]
    pub fn contains_lowercase(&self, lowered: &str) -> bool {
        self.words.contains(lowered)
    }

    /// Number of distinct stopwords.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// True if the set filters nothing.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Iterates the stored (lower-cased) words in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn russian_builtin_list() {
        let set = StopwordSet::for_language("russian").unwrap();
        assert!(!set.is_empty());
        assert!(set.contains("и"));
        assert!(set.contains("И"));
        assert!(!set.contains("программист"));
    }

    #[test]
    fn russian_list_keeps_content_words() {
        let set = StopwordSet::for_language("ru").unwrap();
        assert_eq!(set.len(), 151);
        for word in ["и", "я", "два", "хорошо", "между"] {
            assert!(set.contains(word), "{word} should be a stopword");
        }
        for word in ["мир", "работа", "год", "человек", "привет"] {
            assert!(!set.contains(word), "{word} should survive");
        }
    }

    #[test]
    fn language_aliases() {
        let by_code = StopwordSet::for_language("ru").unwrap();
        let by_name = StopwordSet::for_language(" Russian ").unwrap();
        assert_eq!(by_code, by_name);
        assert!(StopwordSet::for_language("en").unwrap().contains("The"));
    }

    #[test]
    fn unknown_language_is_an_error() {
        assert!(matches!(
            StopwordSet::for_language("klingon"),
            Err(PreprocessError::UnknownLanguage(lang)) if lang == "klingon"
        ));
    }

    #[test]
    fn from_words_lowercases() {
        let set = StopwordSet::from_words(["И", "Я", "the"]);
        assert_eq!(set.len(), 3);
        assert!(set.contains("и"));
        assert!(set.contains("я"));
        assert!(set.contains("THE"));
        assert!(set.contains_lowercase("the"));
        assert!(!set.contains_lowercase("THE"));
    }

    #[test]
    fn duplicates_collapse() {
        let set = StopwordSet::from_words(["и", "И", "и"]);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn empty_set_filters_nothing() {
        let set = StopwordSet::empty();
        assert!(set.is_empty());
        assert!(!set.contains("и"));
        assert!(!set.contains(""));
    }

    #[test]
    fn extend_adds_words() {
        let mut set = StopwordSet::from_words(["и"]);
        set.extend(vec!["ЭТО".to_string()]);
        assert!(set.contains("это"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn from_file_skips_comments_blanks_and_phrases() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "# russian extras").unwrap();
        writeln!(file, "и").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "  Я  ").unwrap();
        writeln!(file, "два слова").unwrap();

        let set = StopwordSet::from_file(file.path()).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains("и"));
        assert!(set.contains("я"));
        assert!(!set.contains("два"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = StopwordSet::from_file(dir.path().join("absent.txt")).unwrap_err();
        assert!(matches!(err, PreprocessError::StopwordFile { .. }));
    }
}
