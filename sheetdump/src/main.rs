use anyhow::{Context, Result};
use clap::Parser;
use sheetdump_core::{DumpConfig, DumpError, Dumper};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: sheetdump <path_to_spreadsheet_file> <sheet_selector>";
const DEFAULT_CONFIG_FILE: &str = "sheetdump.toml";

#[derive(Parser, Debug)]
#[command(name = "sheetdump")]
#[command(about = "Dump spreadsheet sheets as diffable tab-delimited text", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the Excel/ODS file
    #[arg(value_name = "FILE", allow_hyphen_values = true)]
    file: Option<PathBuf>,

    /// Sheet to dump: the all-sheets keyword, a 0-based index, or part of a sheet name
    #[arg(value_name = "SHEET", allow_hyphen_values = true)]
    selector: Option<String>,

    /// Anything after the selector is ignored
    #[arg(hide = true, trailing_var_arg = true, allow_hyphen_values = true)]
    _rest: Vec<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Maximum number of columns dumped per sheet
    #[arg(long, value_name = "N")]
    max_columns: Option<u32>,

    /// Keyword that selects every sheet
    #[arg(long, value_name = "WORD")]
    all_keyword: Option<String>,

    /// Log more to stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    run(&cli, &mut out)?;
    out.flush()?;
    Ok(())
}

/// Dump according to `cli`, writing the dump or the user-facing error to `out`.
///
/// Only failures of `out` itself are returned as errors.
fn run<W: Write>(cli: &Cli, out: &mut W) -> Result<()> {
    let (Some(file), Some(selector)) = (&cli.file, &cli.selector) else {
        writeln!(out, "{}", USAGE)?;
        return Ok(());
    };

    let config = match load_config(cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::debug!(error = ?e, "configuration rejected");
            writeln!(out, "Error: {:#}", e)?;
            return Ok(());
        }
    };
    let dumper = Dumper::with_config(config);

    match dumper.dump_file(file, selector, out) {
        Ok(_) => {}
        Err(DumpError::Output(e)) => {
            return Err(e).context("Failed to write dump to stdout");
        }
        Err(e) => {
            tracing::debug!(error = ?e, "dump failed");
            writeln!(out, "{}", e)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Resolve configuration: `--config`, then `sheetdump.toml` in the current
/// directory, then defaults. Command-line flags override file values.
fn load_config(cli: &Cli) -> Result<DumpConfig> {
    let mut config = if let Some(config_path) = &cli.config {
        read_config(config_path)?
    } else {
        let default_config_path = Path::new(DEFAULT_CONFIG_FILE);
        if default_config_path.exists() {
            read_config(default_config_path)?
        } else {
            DumpConfig::default()
        }
    };

    if let Some(max_columns) = cli.max_columns {
        config.max_columns = max_columns;
    }
    if let Some(keyword) = &cli.all_keyword {
        config.all_keyword = keyword.clone();
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn read_config(path: &Path) -> Result<DumpConfig> {
    DumpConfig::from_file(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_missing_arguments_still_parse() {
        let cli = Cli::try_parse_from(["sheetdump"]).unwrap();
        assert!(cli.file.is_none());
        assert!(cli.selector.is_none());

        let cli = Cli::try_parse_from(["sheetdump", "book.xlsx"]).unwrap();
        assert_eq!(cli.file, Some(PathBuf::from("book.xlsx")));
        assert!(cli.selector.is_none());
    }

    #[test]
    fn test_hyphenated_selector_is_a_value() {
        let cli = Cli::try_parse_from(["sheetdump", "book.xlsx", "-1"]).unwrap();
        assert_eq!(cli.selector.as_deref(), Some("-1"));

        let cli = Cli::try_parse_from(["sheetdump", "-v", "book.xlsx", "-Draft"]).unwrap();
        assert_eq!(cli.verbose, 1);
        assert_eq!(cli.selector.as_deref(), Some("-Draft"));
    }

    #[test]
    fn test_extra_arguments_are_ignored() {
        let cli = Cli::try_parse_from(["sheetdump", "book.xlsx", "0", "extra", "-x"]).unwrap();
        assert_eq!(cli.file, Some(PathBuf::from("book.xlsx")));
        assert_eq!(cli.selector.as_deref(), Some("0"));
    }

    #[test]
    fn test_run_prints_usage() {
        let cli = Cli::try_parse_from(["sheetdump", "book.xlsx"]).unwrap();
        assert_eq!(run_to_string(&cli), format!("{}\n", USAGE));
    }

    #[test]
    fn test_run_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.xlsx");
        let cli = Cli::try_parse_from(["sheetdump", missing.to_str().unwrap(), "-1"]).unwrap();

        assert_eq!(
            run_to_string(&cli),
            format!("Error: File not found at '{}'\n", missing.display())
        );
    }

    #[test]
    fn test_run_reports_bad_config() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("broken.toml");
        std::fs::write(&config_path, "max_columns = \"wide\"").unwrap();

        let cli = Cli::try_parse_from([
            "sheetdump",
            "--config",
            config_path.to_str().unwrap(),
            "book.xlsx",
            "0",
        ])
        .unwrap();

        let output = run_to_string(&cli);
        assert!(output.starts_with("Error: Failed to load config from "));
        assert_eq!(output.lines().count(), 1);
    }

    fn run_to_string(cli: &Cli) -> String {
        let mut out = Vec::new();
        run(cli, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from([
            "sheetdump",
            "-vv",
            "--max-columns",
            "10",
            "--all-keyword",
            "every",
            "book.xlsx",
            "Sales",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.max_columns, Some(10));
        assert_eq!(cli.all_keyword.as_deref(), Some("every"));
        assert_eq!(cli.selector.as_deref(), Some("Sales"));
    }

    #[test]
    fn test_config_file_with_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("custom.toml");
        std::fs::write(&config_path, "max_columns = 5\nall_keyword = \"every\"\n").unwrap();

        let cli = Cli::try_parse_from([
            "sheetdump",
            "--config",
            config_path.to_str().unwrap(),
            "--max-columns",
            "7",
            "book.xlsx",
            "0",
        ])
        .unwrap();

        let config = load_config(&cli).unwrap();
        assert_eq!(config.max_columns, 7);
        assert_eq!(config.all_keyword, "every");
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let cli = Cli::try_parse_from([
            "sheetdump",
            "--config",
            "does-not-exist.toml",
            "book.xlsx",
            "0",
        ])
        .unwrap();
        assert!(load_config(&cli).is_err());

        let cli =
            Cli::try_parse_from(["sheetdump", "--max-columns", "0", "book.xlsx", "0"]).unwrap();
        let err = load_config(&cli).unwrap_err();
        assert!(format!("{:#}", err).contains("max_columns"));
    }
}
