//! Emoji and URL span deletion.
//!
//! First stage of the pipeline. Raw post text goes in, the same text with
//! every emoji run and every `http(s)://` link deleted comes out. Nothing
//! else is touched: whitespace around a deleted span stays where it was and
//! is collapsed later, when tokens are rejoined.
//!
//! Both passes return a [`Cow`], so text without emoji or links is passed
//! through without allocating. Two cheap pre-checks avoid running the
//! regexes at all on the common case:
//!
//! - the emoji pass is skipped for pure-ASCII input when no configured range
//!   reaches into ASCII
//! - the URL pass is skipped unless the bytes `://` occur in the input

use std::borrow::Cow;
use std::fmt::Write as _;

use memchr::memmem;
use postclean_types::CodepointRange;
use regex::Regex;

use crate::error::Result;

const URL_PATTERN: &str = r"https?://\S+";

/// Deletes emoji runs and URLs from text.
///
/// Compiled once, then shared read-only. `Scrubber` is `Send + Sync`.
#[derive(Debug, Clone)]
pub struct Scrubber {
    ranges: Vec<CodepointRange>,
    emoji: Option<Regex>,
    emoji_skips_ascii: bool,
    url: Regex,
    url_marker: memmem::Finder<'static>,
}

impl Scrubber {
    /// Compiles a scrubber for the given emoji ranges.
    ///
    /// An empty range list disables the emoji pass.
    ///
    /// # Errors
    ///
    /// Returns [`PreprocessError::InvalidRange`](crate::PreprocessError::InvalidRange)
    /// for a malformed range and
    /// [`PreprocessError::Pattern`](crate::PreprocessError::Pattern) if the
    /// resulting pattern does not compile.
    pub fn new(ranges: &[CodepointRange]) -> Result<Self> {
        for range in ranges {
            range.validate()?;
        }

        let emoji = if ranges.is_empty() {
            None
        } else {
            Some(Regex::new(&emoji_class(ranges))?)
        };

        Ok(Self {
            ranges: ranges.to_vec(),
            emoji,
            emoji_skips_ascii: ranges.iter().all(|r| r.start > 0x7F),
            url: Regex::new(URL_PATTERN)?,
            url_marker: memmem::Finder::new(b"://").into_owned(),
        })
    }

    /// Emoji ranges this scrubber deletes.
    #[inline]
    pub fn ranges(&self) -> &[CodepointRange] {
        &self.ranges
    }

    /// Deletes every run of code points inside the emoji ranges.
    pub fn strip_emoji<'a>(&self, text: &'a str) -> Cow<'a, str> {
        match &self.emoji {
            Some(_) if self.emoji_skips_ascii && text.is_ascii() => Cow::Borrowed(text),
            Some(re) => re.replace_all(text, ""),
            None => Cow::Borrowed(text),
        }
    }

    /// Deletes every `http://` or `https://` link up to the next whitespace.
    pub fn strip_urls<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if self.url_marker.find(text.as_bytes()).is_none() {
            return Cow::Borrowed(text);
        }
        self.url.replace_all(text, "")
    }

    /// Runs both passes, emoji first.
    ///
    /// Emoji go first so that a pictograph glued to the end of a link does
    /// not survive as part of the link's non-whitespace tail.
    pub fn scrub<'a>(&self, text: &'a str) -> Cow<'a, str> {
        match self.strip_emoji(text) {
            Cow::Borrowed(s) => self.strip_urls(s),
            Cow::Owned(s) => {
                if self.url_marker.find(s.as_bytes()).is_none() {
                    Cow::Owned(s)
                } else {
                    Cow::Owned(self.url.replace_all(&s, "").into_owned())
                }
            }
        }
    }
}

/// Builds `[\x{..}-\x{..}...]+` from the range list.
fn emoji_class(ranges: &[CodepointRange]) -> String {
    let mut pattern = String::with_capacity(2 + ranges.len() * 20);
    pattern.push('[');
    for range in ranges {
        // Writing to a String cannot fail.
        let _ = write!(pattern, "\\x{{{:X}}}-\\x{{{:X}}}", range.start, range.end);
    }
    pattern.push_str("]+");
    pattern
}
