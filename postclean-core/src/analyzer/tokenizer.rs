//! Streaming Word Tokenizer
//!
//! Splits scrubbed post text into word and punctuation tokens. This is the
//! second stage of the pipeline: emoji and links are already gone, and what
//! remains is free text in any script.
//!
//! ## What It Does
//!
//! Given `"Привет, мир... 3.14 кто-то"` it emits:
//!
//! ```ignore
//! ("Привет", TokenKind::Word, 0)
//! (",",      TokenKind::Punct, 1)
//! ("мир",    TokenKind::Word, 2)
//! ("...",    TokenKind::Punct, 3)
//! ("3.14",   TokenKind::Word, 4)
//! ("кто-то", TokenKind::Word, 5)
//! ```
//!
//! ## Boundary Rules
//!
//! - Unicode whitespace separates tokens and never appears inside one
//! - A **word** is a run of alphanumeric characters and combining marks
//! - `-`, `_`, `'` and `’` stay inside a word when both neighbours are word characters
//! - `.` and `,` stay inside a word when both neighbours are digits
//! - Anything else is **punctuation**; a run of the same punctuation character
//!   is one token (`...`, `!!`), different characters are separate tokens
//!
//! ## Zero Allocation
//!
//! Tokens are `&str` slices of the input handed to a callback. Nothing is
//! copied and nothing is collected unless the caller does it.
//!
//! ## Usage
//!
//! ```rust
//! use postclean_core::analyzer::tokenizer::WordTokenizer;
//!
//! let mut words = Vec::new();
//! WordTokenizer::new().tokenize("Hello, world!", |text, _kind, _pos| words.push(text));
//! assert_eq!(words, ["Hello", ",", "world", "!"]);
//! ```

/// What a token is made of.
///
/// `#[repr(u8)]` keeps it one byte so it can ride along with each token for free.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TokenKind {
    /// Letters, digits and the joiners between them.
    Word = 0,
    /// A run of one repeated punctuation or symbol character.
    Punct = 1,
}

/// Streaming word tokenizer.
///
/// Stateless; one instance can be reused and shared across threads.
///
/// ## Example
///
/// ```
/// use postclean_core::analyzer::tokenizer::{TokenKind, WordTokenizer};
///
/// let mut punct = 0;
/// WordTokenizer::new().tokenize("wait... what?!", |_, kind, _| {
///     if kind == TokenKind::Punct {
///         punct += 1;
///     }
/// });
///
/// assert_eq!(punct, 3); // "...", "?", "!"
/// ```
#[derive(Debug, Default, Copy, Clone)]
pub struct WordTokenizer;

impl WordTokenizer {
    /// Creates a tokenizer.
    #[inline]
    pub const fn new() -> Self {
        Self
    }

    /// Tokenizes `text` and emits `(text, kind, position)` left to right.
    ///
    /// Position is `u32`. After emitting a token at position `u32::MAX`,
    /// further emissions stop (overflow protection).
    #[inline]
    #[allow(clippy::needless_lifetimes)]
    pub fn tokenize<'n, F>(&self, text: &'n str, mut emit: F)
    where
        F: FnMut(&'n str, TokenKind, u32),
    {
        let mut chars = text.char_indices().peekable();
        let mut pos = 0u32;

        while let Some((start, c)) = chars.next() {
            if c.is_whitespace() {
                continue;
            }

            let mut end = start + c.len_utf8();
            let kind = if is_word_char(c) {
                let mut prev = c;
                while let Some(&(i, next)) = chars.peek() {
                    if is_word_char(next) {
                        chars.next();
                        end = i + next.len_utf8();
                        prev = next;
                        continue;
                    }

                    // A joiner is only consumed when a word character follows it;
                    // that character is taken on the next turn and extends `end`.
                    let after = text[i + next.len_utf8()..].chars().next();
                    match after {
                        Some(after) if joins(prev, next, after) => {
                            chars.next();
                        }
                        _ => break,
                    }
                }
                TokenKind::Word
            } else {
                while let Some(&(i, next)) = chars.peek() {
                    if next != c {
                        break;
                    }
                    chars.next();
                    end = i + next.len_utf8();
                }
                TokenKind::Punct
            };

            emit(&text[start..end], kind, pos);
            if pos == u32::MAX {
                return;
            }
            pos += 1;
        }
    }
}

/// Letters, digits and combining marks.
#[inline]
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || is_combining_mark(c)
}

#[inline]
fn is_combining_mark(c: char) -> bool {
    matches!(
        c,
        '\u{0300}'..='\u{036F}'
            | '\u{0483}'..='\u{0489}'
            | '\u{1AB0}'..='\u{1AFF}'
            | '\u{1DC0}'..='\u{1DFF}'
            | '\u{20D0}'..='\u{20FF}'
            | '\u{FE20}'..='\u{FE2F}'
    )
}

/// Whether `joiner` between `prev` and `next` keeps the word together.
#[inline]
fn joins(prev: char, joiner: char, next: char) -> bool {
    match joiner {
        '-' | '_' | '\'' | '\u{2019}' => is_word_char(next),
        '.' | ',' => prev.is_numeric() && next.is_numeric(),
        _ => false,
    }
}
