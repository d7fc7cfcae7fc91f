//! Core types and configuration for the postclean text preprocessor.
//!
//! This crate holds the plain data shared across the postclean workspace:
//!
//! - **Table**: column-oriented rows of text, the shape batch preprocessing runs over
//! - **CodepointRange**: an inclusive Unicode range used to describe emoji blocks
//! - **PreprocessorConfig**: the serde-loadable knobs of a preprocessor
//!
//! Nothing here performs text processing; see `postclean-core` for that.

#![warn(missing_docs)]

use core::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Column the posts pipeline preprocesses by default.
pub const DEFAULT_COLUMN: &str = "content";

/// Language whose stopword list is used when nothing else is configured.
pub const DEFAULT_LANGUAGE: &str = "russian";

/// Tables with at least this many rows are preprocessed in parallel.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 1024;

/// Emoji and pictograph blocks removed before tokenization.
///
/// The last range spans `U+24C2..=U+1F251` and therefore also covers CJK,
/// Hangul and other scripts above the enclosed alphanumerics. That is the
/// observed behaviour of the posts pipeline and is kept as-is.
pub const DEFAULT_EMOJI_RANGES: [CodepointRange; 6] = [
    // emoticons
    CodepointRange::new_unchecked(0x1F600, 0x1F64F),
    // symbols & pictographs
    CodepointRange::new_unchecked(0x1F300, 0x1F5FF),
    // transport & map symbols
    CodepointRange::new_unchecked(0x1F680, 0x1F6FF),
    // flags
    CodepointRange::new_unchecked(0x1F1E0, 0x1F1FF),
    // dingbats
    CodepointRange::new_unchecked(0x2702, 0x27B0),
    // enclosed characters
    CodepointRange::new_unchecked(0x24C2, 0x1F251),
];

/// Errors raised while building or mutating a [`Table`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    /// Two columns share a name.
    #[error("duplicate column name: {0}")]
    DuplicateColumn(String),
    /// A column was given an empty name.
    #[error("column name must not be empty")]
    EmptyColumnName,
    /// A column's length differs from the table's row count.
    #[error("column `{column}` has {actual} rows, expected {expected}")]
    RaggedColumn {
        /// Offending column.
        column: String,
        /// Row count of the table.
        expected: usize,
        /// Row count of the column.
        actual: usize,
    },
    /// A row's width differs from the table's column count.
    #[error("row has {actual} fields, expected {expected}")]
    RowWidth {
        /// Column count of the table.
        expected: usize,
        /// Field count of the row.
        actual: usize,
    },
}

/// Errors raised when validating a [`CodepointRange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    /// `start` is greater than `end`.
    #[error("range start U+{start:04X} is after end U+{end:04X}")]
    Reversed {
        /// Lower bound as given.
        start: u32,
        /// Upper bound as given.
        end: u32,
    },
    /// A bound is a surrogate or lies above `U+10FFFF`.
    #[error("U+{0:04X} is not a Unicode scalar value")]
    NotScalar(u32),
}

/// Inclusive range of Unicode scalar values.
///
/// Deserializes from `{ start = 0x1F600, end = 0x1F64F }`. Deserialized
/// values are not checked until [`CodepointRange::validate`] runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CodepointRange {
    /// First code point in the range.
    pub start: u32,
    /// Last code point in the range (inclusive).
    pub end: u32,
}

impl CodepointRange {
    /// Creates a validated range.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError`] if a bound is not a scalar value or the
    /// bounds are reversed.
    pub fn new(start: u32, end: u32) -> Result<Self, RangeError> {
        let range = Self { start, end };
        range.validate()?;
        Ok(range)
    }

    /// Creates a range without validation. Used for compile-time tables.
    #[inline(always)]
    pub const fn new_unchecked(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Checks that both bounds are scalar values and `start <= end`.
    pub fn validate(&self) -> Result<(), RangeError> {
        for bound in [self.start, self.end] {
            if char::from_u32(bound).is_none() {
                return Err(RangeError::NotScalar(bound));
            }
        }
        if self.start > self.end {
            return Err(RangeError::Reversed {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    /// Returns true if `c` lies inside the range.
    #[inline(always)]
    pub const fn contains(&self, c: char) -> bool {
        let cp = c as u32;
        self.start <= cp && cp <= self.end
    }
}

impl fmt::Display for CodepointRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U+{:04X}..=U+{:04X}", self.start, self.end)
    }
}

/// A named column of text values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    name: String,
    values: Vec<String>,
}

impl Column {
    /// Creates a column.
    pub fn new(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Column name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column values in row order.
    #[inline]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Mutable access to the values.
    ///
    /// A slice rather than the `Vec`: callers may rewrite cells but cannot
    /// change the row count.
    #[inline]
    pub fn values_mut(&mut self) -> &mut [String] {
        &mut self.values
    }

    /// Number of rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if the column has no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// In-memory table of text columns.
///
/// Column names are unique and non-empty, and every column holds the same
/// number of rows. A table without columns has zero rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Creates an empty table with no columns.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table with the given headers and no rows.
    ///
    /// # Errors
    ///
    /// Returns [`TableError`] for empty or duplicate names.
    pub fn with_headers<I, S>(headers: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::new();
        for name in headers {
            table.push_column(Column::new(name, Vec::new()))?;
        }
        Ok(table)
    }

    /// Builds a table from columns.
    ///
    /// # Errors
    ///
    /// Returns [`TableError`] if names collide or lengths differ.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self, TableError> {
        let mut table = Self::new();
        for column in columns {
            table.push_column(column)?;
        }
        Ok(table)
    }

    /// Appends a column.
    ///
    /// The first column fixes the row count; later columns must match it.
    pub fn push_column(&mut self, column: Column) -> Result<(), TableError> {
        if column.name.is_empty() {
            return Err(TableError::EmptyColumnName);
        }
        if self.columns.iter().any(|c| c.name == column.name) {
            return Err(TableError::DuplicateColumn(column.name));
        }
        if let Some(first) = self.columns.first() {
            if first.len() != column.len() {
                let actual = column.len();
                return Err(TableError::RaggedColumn {
                    column: column.name,
                    expected: first.len(),
                    actual,
                });
            }
        }
        self.columns.push(column);
        Ok(())
    }

    /// Appends one row, one value per column in column order.
    pub fn push_row(&mut self, row: Vec<String>) -> Result<(), TableError> {
        if row.len() != self.columns.len() {
            return Err(TableError::RowWidth {
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        for (column, value) in self.columns.iter_mut().zip(row) {
            column.values.push(value);
        }
        Ok(())
    }

    /// Number of rows.
    #[inline]
    pub fn num_rows(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    /// Number of columns.
    #[inline]
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// True if the table has no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.num_rows() == 0
    }

    /// Column names in order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(Column::name)
    }

    /// All columns in order.
    #[inline]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Looks up a column by name for in-place rewriting.
    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    /// Returns row `index` as borrowed fields in column order.
    pub fn row(&self, index: usize) -> Option<Vec<&str>> {
        if index >= self.num_rows() {
            return None;
        }
        Some(
            self.columns
                .iter()
                .map(|c| c.values[index].as_str())
                .collect(),
        )
    }

    /// Iterates rows in order.
    pub fn rows(&self) -> impl Iterator<Item = Vec<&str>> + '_ {
        (0..self.num_rows()).filter_map(move |i| self.row(i))
    }
}

/// Configuration for building a text preprocessor.
///
/// Every field has a default, so a config file only needs the keys it
/// changes.
///
/// ```toml
/// language = "russian"
/// extra_stopwords = ["это"]
/// column = "content"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessorConfig {
    /// Stopword language, ISO code or English name.
    pub language: String,
    /// Optional file with one stopword per line. Replaces the built-in list.
    pub stopwords_file: Option<PathBuf>,
    /// Words added on top of the loaded list.
    pub extra_stopwords: Vec<String>,
    /// Code point ranges deleted before tokenization.
    pub emoji_ranges: Vec<CodepointRange>,
    /// Table column batch preprocessing rewrites.
    pub column: String,
    /// Whether batch preprocessing may use multiple threads.
    pub parallel: bool,
    /// Minimum row count before batch preprocessing goes parallel.
    pub parallel_threshold: usize,
}

impl Default for PreprocessorConfig {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            stopwords_file: None,
            extra_stopwords: Vec::new(),
            emoji_ranges: DEFAULT_EMOJI_RANGES.to_vec(),
            column: DEFAULT_COLUMN.to_string(),
            parallel: true,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl PreprocessorConfig {
    /// Validates every configured emoji range.
    pub fn validate(&self) -> Result<(), RangeError> {
        self.emoji_ranges.iter().try_for_each(CodepointRange::validate)
    }
}
