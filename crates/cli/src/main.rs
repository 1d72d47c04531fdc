//! # pagegrid-cli
//!
//! Command-line interface for recovering tables from positioned text.
//!
//! Input is a JSON array of pages, each an array of
//! `{"text": .., "bbox": {"x", "y", "width", "height"}}` fragments as
//! produced by a PDF text-layer reader.

use anyhow::{bail, Context, Result};
use clap::Parser;
use pagegrid_layout::{ExtractionOptions, Table, TableExtractor, TextFragment};
use pagegrid_records::to_object_sets;
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// pagegrid - recover tables from positioned text fragments
#[derive(Parser)]
#[command(name = "pagegrid")]
#[command(author, version, about = "Recover tables from positioned text fragments", long_about = None)]
struct Cli {
    /// JSON file with pages of text fragments ("-" for stdin)
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// YAML file with extraction options
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Column clustering tolerance
    #[arg(long = "x-tolerance")]
    x_tolerance: Option<f64>,

    /// Row clustering tolerance
    #[arg(long = "y-tolerance")]
    y_tolerance: Option<f64>,

    /// Smallest column count to consider
    #[arg(long = "min-columns")]
    min_columns: Option<usize>,

    /// Largest column count to consider
    #[arg(long = "max-columns")]
    max_columns: Option<usize>,

    /// Header label, repeat per column; a literal \n separates stacked parts
    #[arg(long = "header", value_name = "LABEL")]
    headers: Vec<String>,

    /// Vertical gap that ends a header-guided table
    #[arg(long = "end-of-table-whitespace")]
    end_of_table_whitespace: Option<f64>,

    /// Decimal separator for records output
    #[arg(long = "decimal-separator")]
    decimal_separator: Option<char>,

    /// Output format (json, records, csv)
    #[arg(short = 'f', long = "format", default_value = "json")]
    format: OutputFormat,

    /// Write output to a file instead of stdout
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Output format for results.
#[derive(Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    /// Tables with cell geometry as JSON (default)
    #[default]
    Json,
    /// Header-keyed records as JSON
    Records,
    /// Cell texts as CSV, one block per table
    Csv,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_writer(io::stderr)
            .init();
    }

    let options = resolve_options(&cli)?;
    let separator = options.decimal_separator;
    let pages = read_pages(&cli.input)?;
    tracing::info!(pages = pages.len(), "loaded fragments");

    let extractor = TableExtractor::new(options)?;
    let tables = extractor.extract_tables(&pages)?;
    if tables.is_empty() {
        bail!("No tables found in {}", cli.input.display());
    }
    tracing::info!(tables = tables.len(), "extracted tables");

    match &cli.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            let mut out = BufWriter::new(file);
            write_tables(&mut out, &tables, cli.format, separator)?;
            out.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            write_tables(&mut out, &tables, cli.format, separator)?;
        }
    }

    Ok(())
}

/// Options from the config file (if any) with command-line overrides applied.
fn resolve_options(cli: &Cli) -> Result<ExtractionOptions> {
    let mut options = match &cli.config {
        Some(path) => load_config(path)?,
        None => ExtractionOptions::default(),
    };

    if let Some(x) = cli.x_tolerance {
        options.x_tolerance = x;
    }
    if let Some(y) = cli.y_tolerance {
        options.y_tolerance = y;
    }
    if let Some(min) = cli.min_columns {
        options.min_column_count = min;
    }
    if let Some(max) = cli.max_columns {
        options.max_column_count = max;
    }
    if !cli.headers.is_empty() {
        options.column_headers = Some(cli.headers.iter().map(|h| unescape_label(h)).collect());
    }
    if let Some(gap) = cli.end_of_table_whitespace {
        options.end_of_table_whitespace = Some(gap);
    }
    if let Some(separator) = cli.decimal_separator {
        options.decimal_separator = separator;
    }

    Ok(options)
}

fn load_config(path: &Path) -> Result<ExtractionOptions> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    serde_yaml::from_str(&source)
        .with_context(|| format!("Invalid config file: {}", path.display()))
}

/// Turn the two-character sequence `\n` into a line break.
fn unescape_label(label: &str) -> String {
    label.replace("\\n", "\n")
}

fn read_pages(path: &Path) -> Result<Vec<Vec<TextFragment>>> {
    let source = if path == Path::new("-") {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read stdin")?;
        buffer
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?
    };
    serde_json::from_str(&source).with_context(|| format!("Invalid fragment JSON: {}", path.display()))
}

/// Write `tables` to `out` in the requested format.
fn write_tables<W: Write>(
    out: &mut W,
    tables: &[Table],
    format: OutputFormat,
    separator: char,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, tables)?;
            writeln!(out)?;
        }
        OutputFormat::Records => {
            let sets = to_object_sets(tables, separator);
            serde_json::to_writer_pretty(&mut *out, &sets)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => {
            for (index, table) in tables.iter().enumerate() {
                if index > 0 {
                    writeln!(out)?;
                }
                let mut writer = csv::Writer::from_writer(&mut *out);
                for row in table.row_texts() {
                    writer.write_record(&row)?;
                }
                writer.flush()?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagegrid_layout::{extract_tables, Rect};

    fn sample_tables() -> Vec<Table> {
        let fragment = |text: &str, left: f64, bottom: f64| {
            TextFragment::new(text, Rect::new(left, bottom, 10.0, 10.0))
        };
        let page = vec![
            fragment("Item", 0.0, 100.0),
            fragment("Qty", 40.0, 100.0),
            fragment("Pen", 0.0, 88.0),
            fragment("3", 40.0, 88.0),
        ];
        extract_tables(&[page]).expect("tables")
    }

    #[test]
    fn test_unescape_label() {
        assert_eq!(unescape_label(r"Endex\n101"), "Endex\n101");
        assert_eq!(unescape_label("Plain"), "Plain");
    }

    #[test]
    fn test_cli_overrides_config() {
        let mut config = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(config, "x_tolerance: 7.5\nmax_column_count: 4").expect("write config");

        let cli = Cli::parse_from([
            "pagegrid",
            "pages.json",
            "--config",
            config.path().to_str().expect("utf-8 path"),
            "--max-columns",
            "6",
            "--header",
            r"Unit\nCost",
        ]);
        let options = resolve_options(&cli).expect("options");
        assert_eq!(options.x_tolerance, 7.5);
        assert_eq!(options.y_tolerance, 3.0);
        assert_eq!(options.max_column_count, 6);
        assert_eq!(options.column_headers, Some(vec!["Unit\nCost".to_string()]));
    }

    #[test]
    fn test_read_pages_from_file() {
        let mut input = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            input,
            r#"[[{{"text": "A", "bbox": {{"x": 0, "y": 0, "width": 5, "height": 10}}}}], []]"#
        )
        .expect("write input");

        let pages = read_pages(input.path()).expect("pages");
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0][0].text, "A");
        assert!(pages[1].is_empty());
    }

    #[test]
    fn test_csv_output() {
        let mut out = Vec::new();
        write_tables(&mut out, &sample_tables(), OutputFormat::Csv, '.').expect("csv");
        assert_eq!(String::from_utf8(out).expect("utf-8"), "Item,Qty\nPen,3\n");
    }

    #[test]
    fn test_records_output() {
        let mut out = Vec::new();
        write_tables(&mut out, &sample_tables(), OutputFormat::Records, '.').expect("records");
        let json: serde_json::Value = serde_json::from_slice(&out).expect("json");
        assert_eq!(json[0]["rows"][0]["Qty"], 3.0);
    }
}
