//! Text analysis pipeline.
//!
//! This module provides the stages behind [`TextPreprocessor`](crate::TextPreprocessor):
//! - **Scrubber**: Deletes emoji runs and links from raw text
//! - **Tokenizer**: Splits scrubbed text into word and punctuation tokens
//! - **Stopwords**: Case-insensitive set of tokens to drop

pub mod scrubber;
pub mod stopwords;
pub mod tokenizer;

pub use scrubber::Scrubber;
pub use stopwords::StopwordSet;
pub use tokenizer::{TokenKind, WordTokenizer};
