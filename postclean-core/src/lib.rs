//! Post text preprocessing.
//!
//! Strips emoji and links from free-form post text, tokenizes what is left,
//! drops stopwords and rejoins the survivors with single spaces. The same
//! cleaning can be applied to a whole table column at once.
//!
//! ```
//! use postclean_core::{posts_preprocessing, StopwordSet, TextPreprocessor};
//! use postclean_types::{Column, Table};
//!
//! let pre = TextPreprocessor::new(StopwordSet::from_words(["и"])).unwrap();
//! let mut posts = Table::from_columns(vec![
//!     Column::new("url", vec!["https://t.me/s/jobs/1".into()]),
//!     Column::new("content", vec!["Rust и Go 🚀".into()]),
//! ])
//! .unwrap();
//!
//! posts_preprocessing(&pre, &mut posts).unwrap();
//! assert_eq!(posts.column("content").unwrap().values(), ["Rust Go"]);
//! ```

pub mod analyzer;
pub mod batch;
pub mod error;
pub mod preprocess;
pub mod table_io;

pub use analyzer::{Scrubber, StopwordSet, TokenKind, WordTokenizer};
pub use batch::{posts_preprocessing, preprocess_column, BatchOptions};
pub use error::{PreprocessError, Result};
pub use preprocess::TextPreprocessor;
pub use table_io::{read_csv, read_csv_path, write_csv, write_csv_path};
