//! The text preprocessor.
//!
//! [`TextPreprocessor::clean`] maps raw post text to cleaned text in five
//! fixed steps:
//!
//! 1. delete emoji runs
//! 2. delete `http(s)://` links
//! 3. tokenize into words and punctuation
//! 4. drop tokens whose lower-cased form is a stopword
//! 5. join the survivors with single spaces
//!
//! Stripping must precede tokenization, otherwise a link would fall apart
//! into `https`, `:`, `//` and path fragments. Surviving tokens keep their
//! original casing.
//!
//! The preprocessor owns its stopword set and compiled patterns and never
//! changes them after construction, so a single instance can be shared by
//! reference across threads.

use postclean_types::{CodepointRange, PreprocessorConfig, DEFAULT_EMOJI_RANGES};
use tracing::info;

use crate::analyzer::{Scrubber, StopwordSet, WordTokenizer};
use crate::error::Result;

/// Emoji/URL stripping, tokenization and stopword filtering.
///
/// # Examples
///
/// ```
/// use postclean_core::{StopwordSet, TextPreprocessor};
///
/// let pre = TextPreprocessor::new(StopwordSet::from_words(["и", "я"])).unwrap();
/// assert_eq!(pre.clean("Привет 😀 https://t.me/x мир и я"), "Привет мир");
/// ```
#[derive(Debug, Clone)]
pub struct TextPreprocessor {
    scrubber: Scrubber,
    tokenizer: WordTokenizer,
    stopwords: StopwordSet,
}

impl TextPreprocessor {
    /// Builds a preprocessor with the default emoji ranges.
    ///
    /// # Errors
    ///
    /// Fails only if the URL or emoji pattern does not compile.
    pub fn new(stopwords: StopwordSet) -> Result<Self> {
        Self::with_ranges(stopwords, &DEFAULT_EMOJI_RANGES)
    }

    /// Builds a preprocessor with custom emoji ranges.
    pub fn with_ranges(stopwords: StopwordSet, ranges: &[CodepointRange]) -> Result<Self> {
        Ok(Self {
            scrubber: Scrubber::new(ranges)?,
            tokenizer: WordTokenizer::new(),
            stopwords,
        })
    }

    /// Builds a preprocessor from configuration.
    ///
    /// The stopword file, when set, replaces the built-in list for
    /// `language`. `extra_stopwords` are added on top of either.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown language, an unreadable stopword
    /// file, or a malformed emoji range. All of these are startup failures.
    pub fn from_config(config: &PreprocessorConfig) -> Result<Self> {
        config.validate()?;

        let mut stopwords = match &config.stopwords_file {
            Some(path) => StopwordSet::from_file(path)?,
            None => StopwordSet::for_language(&config.language)?,
        };
        stopwords.extend(&config.extra_stopwords);

        let preprocessor = Self::with_ranges(stopwords, &config.emoji_ranges)?;
        info!(
            language = %config.language,
            stopwords_file = ?config.stopwords_file,
            stopwords = preprocessor.stopwords.len(),
            emoji_ranges = config.emoji_ranges.len(),
            "text preprocessor ready"
        );
        Ok(preprocessor)
    }

    /// Stopwords this preprocessor filters.
    #[inline]
    pub fn stopwords(&self) -> &StopwordSet {
        &self.stopwords
    }

    /// Emoji/URL scrubber used for the first two steps.
    #[inline]
    pub fn scrubber(&self) -> &Scrubber {
        &self.scrubber
    }

    /// Cleans text into an existing buffer.
    ///
    /// Clears `out` first and reuses its capacity.
    pub fn clean_into(&self, text: &str, out: &mut String) {
        out.clear();

        let scrubbed = self.scrubber.scrub(text);
        let mut lowered = String::new();

        self.tokenizer.tokenize(&scrubbed, |token, _, _| {
            if self.is_stopword(token, &mut lowered) {
                return;
            }
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(token);
        });
    }

    /// Cleans text and returns a new String.
    #[inline]
    pub fn clean(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        self.clean_into(text, &mut out);
        out
    }

    /// Lower-cases into `scratch` only when the token is not already lower-case ASCII.
    fn is_stopword(&self, token: &str, scratch: &mut String) -> bool {
        if self.stopwords.is_empty() {
            return false;
        }
        if token.bytes().all(|b| b.is_ascii() && !b.is_ascii_uppercase()) {
            return self.stopwords.contains_lowercase(token);
        }
        scratch.clear();
        scratch.extend(token.chars().flat_map(char::to_lowercase));
        self.stopwords.contains_lowercase(scratch)
    }
}
