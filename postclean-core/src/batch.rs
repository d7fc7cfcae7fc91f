//! Row-wise preprocessing of a table column.
//!
//! Each cell is cleaned independently, so rows can be processed in any
//! order and on any thread. The column is rewritten in place through a
//! slice, which keeps the row count and every other column untouched.

use postclean_types::{Table, DEFAULT_COLUMN, DEFAULT_PARALLEL_THRESHOLD};
use rayon::prelude::*;
use tracing::debug;

use crate::error::{PreprocessError, Result};
use crate::preprocess::TextPreprocessor;

/// How a batch run spreads rows across threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    /// Allow the rayon pool to be used.
    pub parallel: bool,
    /// Minimum row count before going parallel.
    pub parallel_threshold: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl BatchOptions {
    /// Always single-threaded.
    pub const fn serial() -> Self {
        Self {
            parallel: false,
            parallel_threshold: usize::MAX,
        }
    }

    fn use_parallel(&self, rows: usize) -> bool {
        self.parallel && rows >= self.parallel_threshold
    }
}

/// Cleans every value of `column` in place.
///
/// # Errors
///
/// Returns [`PreprocessError::ColumnNotFound`] if the table has no such column.
pub fn preprocess_column(
    preprocessor: &TextPreprocessor,
    table: &mut Table,
    column: &str,
    options: BatchOptions,
) -> Result<()> {
    let values = table
        .column_mut(column)
        .ok_or_else(|| PreprocessError::ColumnNotFound(column.to_string()))?
        .values_mut();

    let parallel = options.use_parallel(values.len());
    debug!(column, rows = values.len(), parallel, "preprocessing column");

    if parallel {
        values
            .par_iter_mut()
            .for_each(|value| *value = preprocessor.clean(value));
    } else {
        let mut buf = String::new();
        for value in values.iter_mut() {
            preprocessor.clean_into(value, &mut buf);
            std::mem::swap(value, &mut buf);
        }
    }

    Ok(())
}

/// Cleans the `content` column of a posts table.
pub fn posts_preprocessing(preprocessor: &TextPreprocessor, table: &mut Table) -> Result<()> {
    preprocess_column(preprocessor, table, DEFAULT_COLUMN, BatchOptions::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::StopwordSet;
    use postclean_types::Column;

    fn preprocessor() -> TextPreprocessor {
        TextPreprocessor::new(StopwordSet::from_words(["и", "я"])).unwrap()
    }

    fn posts(contents: &[&str]) -> Table {
        let n = contents.len();
        Table::from_columns(vec![
            Column::new(
                "url",
                (0..n).map(|i| format!("https://t.me/s/jobs/{i}")).collect(),
            ),
            Column::new("content", contents.iter().map(|s| s.to_string()).collect()),
            Column::new("outlinks", vec!["none".to_string(); n]),
            Column::new("linkPreview", vec!["none".to_string(); n]),
        ])
        .unwrap()
    }

    #[test]
    fn content_column_is_cleaned() {
        let mut table = posts(&["Привет 😀 https://t.me/x мир и я", "some information"]);
        posts_preprocessing(&preprocessor(), &mut table).unwrap();

        assert_eq!(
            table.column("content").unwrap().values(),
            ["Привет мир", "some information"]
        );
    }

    #[test]
    fn other_columns_and_row_count_unchanged() {
        let original = posts(&["a 😀 b", "", "и я", "https://x.y"]);
        let mut table = original.clone();
        posts_preprocessing(&preprocessor(), &mut table).unwrap();

        assert_eq!(table.num_rows(), original.num_rows());
        assert_eq!(
            table.column_names().collect::<Vec<_>>(),
            original.column_names().collect::<Vec<_>>()
        );
        for name in ["url", "outlinks", "linkPreview"] {
            assert_eq!(table.column(name), original.column(name));
        }
        assert_eq!(
            table.column("content").unwrap().values(),
            ["a b", "", "", ""]
        );
    }

    #[test]
    fn missing_column_is_an_error() {
        let mut table = posts(&["x"]);
        let err = preprocess_column(&preprocessor(), &mut table, "body", BatchOptions::default())
            .unwrap_err();
        assert!(matches!(err, PreprocessError::ColumnNotFound(c) if c == "body"));
    }

    #[test]
    fn custom_column() {
        let mut table = Table::from_columns(vec![Column::new(
            "body",
            vec!["мир и я".to_string()],
        )])
        .unwrap();
        preprocess_column(&preprocessor(), &mut table, "body", BatchOptions::serial()).unwrap();
        assert_eq!(table.column("body").unwrap().values(), ["мир"]);
    }

    #[test]
    fn empty_table_is_fine() {
        let mut table = posts(&[]);
        posts_preprocessing(&preprocessor(), &mut table).unwrap();
        assert_eq!(table.num_rows(), 0);
    }

    #[test]
    fn parallel_matches_serial() {
        let rows: Vec<String> = (0..500)
            .map(|i| format!("пост {i} 😀 и https://t.me/{i} я Текст-{i}!"))
            .collect();
        let refs: Vec<&str> = rows.iter().map(String::as_str).collect();

        let pre = preprocessor();
        let mut serial = posts(&refs);
        let mut parallel = posts(&refs);

        preprocess_column(&pre, &mut serial, "content", BatchOptions::serial()).unwrap();
        preprocess_column(
            &pre,
            &mut parallel,
            "content",
            BatchOptions {
                parallel: true,
                parallel_threshold: 1,
            },
        )
        .unwrap();

        assert_eq!(serial, parallel);
        assert_eq!(
            serial.column("content").unwrap().values()[7],
            "пост 7 Текст-7 !"
        );
    }

    #[test]
    fn rows_are_independent_and_idempotent() {
        let pre = preprocessor();
        let mut table = posts(&["и мир", "мир и"]);
        posts_preprocessing(&pre, &mut table).unwrap();
        let once = table.clone();
        posts_preprocessing(&pre, &mut table).unwrap();
        assert_eq!(table, once);
    }

    #[test]
    fn threshold_decides_parallelism() {
        let opts = BatchOptions {
            parallel: true,
            parallel_threshold: 10,
        };
        assert!(!opts.use_parallel(9));
        assert!(opts.use_parallel(10));
        assert!(!BatchOptions::serial().use_parallel(usize::MAX));
    }
}
