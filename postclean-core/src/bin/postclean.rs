//! postclean command-line tool
//!
//! Cleans post text from the terminal, rewrites the content column of a CSV
//! table, or measures pipeline throughput on a large text file.
//!
//! ## Usage
//!
//! ```bash
//! # Clean one string
//! postclean clean "Привет 😀 https://t.me/x мир и я"
//!
//! # Clean stdin line by line
//! cat posts.txt | postclean clean
//!
//! # Rewrite the `content` column of a posts table
//! postclean batch --input new_posts.csv --output clean_posts.csv
//!
//! # Per-post throughput of scrub / tokenize / full clean (one post per line)
//! postclean bench /path/to/posts.txt
//! ```
//!
//! Global flags `--config`, `--language` and `--stopwords` select the
//! stopword list; flags override values from the TOML config file.
//! Logs go to stderr and honour `RUST_LOG` (default `info`).

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{Parser, Subcommand};
use postclean_core::{
    preprocess_column, read_csv_path, write_csv_path, BatchOptions, TextPreprocessor,
    WordTokenizer,
};
use postclean_types::PreprocessorConfig;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Timed passes per bench stage, after one untimed warmup pass.
const BENCH_RUNS: usize = 5;

#[derive(Debug, Parser)]
#[command(name = "postclean", version, about = "Emoji/URL stripping and stopword filtering for post text")]
struct Cli {
    /// TOML file with preprocessor settings.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Stopword language (ISO code or English name).
    #[arg(long, global = true)]
    language: Option<String>,

    /// File with one stopword per line; replaces the built-in list.
    #[arg(long, global = true)]
    stopwords: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Clean TEXT, or every line of stdin when TEXT is omitted.
    Clean {
        text: Option<String>,
    },
    /// Clean one column of a CSV table.
    Batch {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output: PathBuf,
        /// Column to rewrite (defaults to the configured column).
        #[arg(long)]
        column: Option<String>,
        /// Process rows on the current thread only.
        #[arg(long)]
        serial: bool,
    },
    /// Measure scrub, tokenize and clean throughput, one post per line.
    Bench {
        path: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    let preprocessor =
        TextPreprocessor::from_config(&config).context("failed to build text preprocessor")?;

    match cli.command {
        Command::Clean { text: Some(text) } => {
            println!("{}", preprocessor.clean(&text));
        }
        Command::Clean { text: None } => {
            let stdout = io::stdout();
            clean_lines(&preprocessor, io::stdin().lock(), stdout.lock())?;
        }
        Command::Batch {
            input,
            output,
            column,
            serial,
        } => {
            let column = column.unwrap_or_else(|| config.column.clone());
            let options = BatchOptions {
                parallel: config.parallel && !serial,
                parallel_threshold: config.parallel_threshold,
            };
            run_batch(&preprocessor, &input, &output, &column, options)?;
        }
        Command::Bench { path } => {
            let input = fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            bench(&preprocessor, &input);
        }
    }

    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<PreprocessorConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            toml::from_str(&raw).with_context(|| format!("invalid config {}", path.display()))?
        }
        None => PreprocessorConfig::default(),
    };

    if let Some(language) = &cli.language {
        config.language = language.clone();
        // A stopword file replaces the language list, so an explicit
        // language only takes effect once the file from the config is dropped.
        if cli.stopwords.is_none() {
            if let Some(file) = config.stopwords_file.take() {
                warn!(
                    language = %language,
                    ignored = %file.display(),
                    "--language given, ignoring stopwords_file from config"
                );
            }
        }
    }
    if let Some(stopwords) = &cli.stopwords {
        config.stopwords_file = Some(stopwords.clone());
    }
    Ok(config)
}

/// Cleans every line of `reader`, writing one cleaned line per input line.
/// Returns the number of lines written.
fn clean_lines<R: BufRead, W: Write>(
    preprocessor: &TextPreprocessor,
    reader: R,
    writer: W,
) -> anyhow::Result<usize> {
    let mut out = io::BufWriter::new(writer);
    let mut buf = String::new();
    let mut lines = 0;

    for line in reader.lines() {
        let line = line.context("failed to read input line")?;
        preprocessor.clean_into(&line, &mut buf);
        writeln!(out, "{buf}")?;
        lines += 1;
    }
    out.flush()?;
    Ok(lines)
}

/// Reads `input`, cleans `column` and writes the whole table to `output`.
/// Returns the row count.
fn run_batch(
    preprocessor: &TextPreprocessor,
    input: &Path,
    output: &Path,
    column: &str,
    options: BatchOptions,
) -> anyhow::Result<usize> {
    let mut table =
        read_csv_path(input).with_context(|| format!("failed to read {}", input.display()))?;

    let started = Instant::now();
    preprocess_column(preprocessor, &mut table, column, options)
        .with_context(|| format!("failed to preprocess {}", input.display()))?;
    let elapsed = started.elapsed();

    write_csv_path(&table, output)
        .with_context(|| format!("failed to write {}", output.display()))?;

    info!(
        rows = table.num_rows(),
        column,
        parallel = options.parallel,
        elapsed_ms = elapsed.as_millis() as u64,
        output = %output.display(),
        "batch preprocessing done"
    );
    Ok(table.num_rows())
}

/// Best and mean wall time over the timed runs of one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Timing {
    best: Duration,
    mean: Duration,
}

impl Timing {
    fn from_samples(samples: &[Duration]) -> Self {
        if samples.is_empty() {
            return Self {
                best: Duration::ZERO,
                mean: Duration::ZERO,
            };
        }
        let total: Duration = samples.iter().sum();
        Self {
            best: samples.iter().copied().min().unwrap_or_default(),
            mean: total / samples.len() as u32,
        }
    }

    /// Items per second at the best run.
    fn rate(&self, items: usize) -> f64 {
        items as f64 / self.best.as_secs_f64().max(f64::EPSILON)
    }
}

/// Runs `pass` once untimed, then `BENCH_RUNS` timed passes.
fn time_stage<F: FnMut()>(mut pass: F) -> Timing {
    pass();
    let samples: Vec<Duration> = (0..BENCH_RUNS)
        .map(|_| {
            let started = Instant::now();
            pass();
            started.elapsed()
        })
        .collect();
    Timing::from_samples(&samples)
}

/// Non-blank lines of the bench file, each treated as one post.
fn bench_posts(input: &str) -> Vec<&str> {
    input.lines().filter(|line| !line.trim().is_empty()).collect()
}

fn bench(preprocessor: &TextPreprocessor, input: &str) {
    let posts = bench_posts(input);
    let bytes: usize = posts.iter().map(|post| post.len()).sum();
    println!(
        "{} posts, {:.2} MiB, {BENCH_RUNS} timed runs per stage\n",
        posts.len(),
        bytes as f64 / (1024.0 * 1024.0)
    );

    let scrubber = preprocessor.scrubber();
    let scrub = time_stage(|| {
        for post in &posts {
            std::hint::black_box(scrubber.scrub(post));
        }
    });
    report("scrub", scrub, posts.len(), bytes);

    let tokenizer = WordTokenizer::new();
    let mut tokens = 0usize;
    let tokenize = time_stage(|| {
        tokens = 0;
        for post in &posts {
            tokenizer.tokenize(post, |_, _, _| tokens += 1);
        }
    });
    report("tokenize", tokenize, posts.len(), bytes);

    let mut buf = String::new();
    let mut kept = 0usize;
    let clean = time_stage(|| {
        kept = 0;
        for post in &posts {
            preprocessor.clean_into(post, &mut buf);
            if !buf.is_empty() {
                kept += buf.split(' ').count();
            }
        }
    });
    report("clean", clean, posts.len(), bytes);

    if tokens > 0 {
        println!(
            "\ntokens in raw posts: {tokens}, kept after clean: {kept} ({:.1}%)",
            kept as f64 * 100.0 / tokens as f64
        );
    }
}

fn report(stage: &str, timing: Timing, posts: usize, bytes: usize) {
    println!(
        "{stage:<9} best {:>9.3} ms  mean {:>9.3} ms  {:>12.0} posts/s  {:>8.1} MiB/s",
        timing.best.as_secs_f64() * 1e3,
        timing.mean.as_secs_f64() * 1e3,
        timing.rate(posts),
        timing.rate(bytes) / (1024.0 * 1024.0),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn preprocessor() -> TextPreprocessor {
        TextPreprocessor::from_config(&PreprocessorConfig::default()).unwrap()
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_override_config_defaults() {
        let cli = Cli::parse_from(["postclean", "--language", "en", "clean", "hello"]);
        let config = load_config(&cli).unwrap();
        assert_eq!(config.language, "en");
        assert_eq!(config.column, "content");
    }

    #[test]
    fn config_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("postclean.toml");
        fs::write(&path, "language = \"de\"\ncolumn = \"body\"\nparallel = false\n").unwrap();

        let cli = Cli::parse_from([
            "postclean",
            "--config",
            path.to_str().unwrap(),
            "batch",
            "--input",
            "in.csv",
            "--output",
            "out.csv",
        ]);
        let config = load_config(&cli).unwrap();
        assert_eq!(config.language, "de");
        assert_eq!(config.column, "body");
        assert!(!config.parallel);
    }

    #[test]
    fn language_flag_drops_config_stopwords_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("postclean.toml");
        fs::write(&path, "language = \"ru\"\nstopwords_file = \"ru.txt\"\n").unwrap();
        let config_arg = path.to_str().unwrap();

        let cli = Cli::parse_from([
            "postclean",
            "--config",
            config_arg,
            "--language",
            "en",
            "clean",
            "x",
        ]);
        let config = load_config(&cli).unwrap();
        assert_eq!(config.language, "en");
        assert_eq!(config.stopwords_file, None);

        let cli = Cli::parse_from(["postclean", "--config", config_arg, "clean", "x"]);
        assert_eq!(
            load_config(&cli).unwrap().stopwords_file,
            Some(PathBuf::from("ru.txt"))
        );

        let cli = Cli::parse_from([
            "postclean",
            "--config",
            config_arg,
            "--language",
            "en",
            "--stopwords",
            "en.txt",
            "clean",
            "x",
        ]);
        assert_eq!(
            load_config(&cli).unwrap().stopwords_file,
            Some(PathBuf::from("en.txt"))
        );
    }

    #[test]
    fn clean_lines_writes_one_line_per_input_line() {
        let input = "Привет 😀 https://t.me/x мир и я\n\nhttps://t.me/only\nработа для всех\n";
        let mut out = Vec::new();

        let lines = clean_lines(&preprocessor(), input.as_bytes(), &mut out).unwrap();

        assert_eq!(lines, 4);
        assert_eq!(String::from_utf8(out).unwrap(), "Привет мир\n\n\nработа\n");
    }

    #[test]
    fn batch_rewrites_chosen_column_only() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("posts.csv");
        let output = dir.path().join("clean.csv");
        fs::write(
            &input,
            "url,body\nhttps://t.me/s/jobs/1,\"Привет 😀 https://t.me/x мир и я\"\nhttps://t.me/s/jobs/2,и я\n",
        )
        .unwrap();

        let rows =
            run_batch(&preprocessor(), &input, &output, "body", BatchOptions::serial()).unwrap();

        assert_eq!(rows, 2);
        let table = read_csv_path(&output).unwrap();
        assert_eq!(table.column("body").unwrap().values(), ["Привет мир", ""]);
        assert_eq!(
            table.column("url").unwrap().values(),
            ["https://t.me/s/jobs/1", "https://t.me/s/jobs/2"]
        );
    }

    #[test]
    fn batch_command_uses_column_and_serial_flags() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("posts.csv");
        let output = dir.path().join("clean.csv");
        fs::write(&input, "body,content\nмир и я,и\n").unwrap();

        let cli = Cli::parse_from([
            "postclean",
            "batch",
            "--input",
            input.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
            "--column",
            "body",
            "--serial",
        ]);
        run(cli).unwrap();

        let table = read_csv_path(&output).unwrap();
        assert_eq!(table.column("body").unwrap().values(), ["мир"]);
        assert_eq!(table.column("content").unwrap().values(), ["и"]);
    }

    #[test]
    fn batch_missing_column_fails() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("posts.csv");
        fs::write(&input, "url\nx\n").unwrap();

        let err = run_batch(
            &preprocessor(),
            &input,
            &dir.path().join("out.csv"),
            "content",
            BatchOptions::default(),
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("column `content` not found"));
        assert!(!dir.path().join("out.csv").exists());
    }

    #[test]
    fn unknown_language_fails_at_startup() {
        let cli = Cli::parse_from(["postclean", "--language", "klingon", "clean", "x"]);
        let err = run(cli).unwrap_err();
        assert!(format!("{err:#}").contains("no stopword list for language `klingon`"));
    }

    #[test]
    fn missing_config_file_fails_at_startup() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        let cli = Cli::parse_from([
            "postclean",
            "--config",
            missing.to_str().unwrap(),
            "clean",
            "x",
        ]);
        assert!(run(cli).is_err());
    }

    #[test]
    fn timing_reports_best_and_mean() {
        let timing = Timing::from_samples(&[
            Duration::from_millis(30),
            Duration::from_millis(10),
            Duration::from_millis(20),
        ]);
        assert_eq!(timing.best, Duration::from_millis(10));
        assert_eq!(timing.mean, Duration::from_millis(20));
        assert!((timing.rate(50) - 5000.0).abs() < 1e-6);

        let empty = Timing::from_samples(&[]);
        assert_eq!(empty.best, Duration::ZERO);
        assert!(empty.rate(1).is_finite());
    }

    #[test]
    fn bench_treats_non_blank_lines_as_posts() {
        assert_eq!(bench_posts("a b\n\n  \nc\n"), ["a b", "c"]);
        assert!(bench_posts("").is_empty());
    }
}
