//! `stockscan`: feed barcode scans into a stock item table.
//!
//! Usage:
//!   stockscan [--config FILE] --table FILE [--warehouse NAME] [--increment N] [--dry-run] [--output FILE]
//!
//! Reads one scan per line from standard input and reconciles each into the
//! item table stored as a JSON array of row objects. The table is written
//! back (or to `--output`) once input ends.

mod error;
mod summary;

use crate::error::{ErrorKind, Result};
use crate::summary::Summary;
use clap::Parser;
use exn::ResultExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use stockscan_config::Config;
use stockscan_form::table::{DefaultsHook, MemoryTable, ReadOnlyTable};
use stockscan_form::{FormField, HookHandle, MemoryField, TableHandle};
use stockscan_resolve::lookup::{HttpLookup, LookupHandle};
use stockscan_scanner::{Form, Scanner, Strategy};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

/// Reconcile barcode and serial-number scans into a stock item table.
#[derive(Parser, Debug)]
#[command(name = "stockscan", version, about)]
struct Cli {
    /// Configuration file (TOML, YAML or JSON).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Item table, as a JSON array of row objects. Created if missing.
    #[arg(short, long)]
    table: PathBuf,

    /// Warehouse stamped onto the rows scans touch.
    #[arg(short, long)]
    warehouse: Option<String>,

    /// Quantity added per scan.
    #[arg(long, default_value_t = 1.0)]
    increment: f64,

    /// Process scans without changing the table.
    #[arg(long)]
    dry_run: bool,

    /// Write the table here instead of back to `--table`.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).map_err(report)?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log.level)))
        .with_writer(std::io::stderr)
        .init();

    let summary = run(&cli, config, BufReader::new(tokio::io::stdin())).await.map_err(report)?;
    println!("{summary}");
    Ok(())
}

/// Feeds each line of `scans` through the scanner, then writes the table if
/// anything changed.
async fn run(cli: &Cli, config: Config, scans: impl AsyncBufRead + Unpin) -> Result<Summary> {
    let scanner_config = config.scanner.clone();
    let lookup = match scanner_config.strategy {
        Strategy::Heuristic => None,
        Strategy::Lookup => Some(http_lookup(&config)?),
    };
    let resolver = scanner_config.resolver(lookup).or_raise(|| ErrorKind::Config("cannot build resolver"))?;

    let table = Arc::new(load_table(&cli.table, &config).await?);
    let handle: TableHandle = if cli.dry_run {
        tracing::info!("Dry run; the item table will not be changed");
        Arc::new(ReadOnlyTable::new(table.clone()))
    } else {
        table.clone()
    };
    let hook: Option<HookHandle> = if config.table.defaults.is_empty() {
        None
    } else {
        Some(Arc::new(DefaultsHook::new(config.table.defaults.clone())))
    };
    let input = Arc::new(MemoryField::new(scanner_config.scan_field.as_str()));
    let warehouse = MemoryField::new(scanner_config.warehouse_field.as_str())
        .with_value(cli.warehouse.clone().unwrap_or_default());
    let form = Form { input: input.clone(), warehouse: Arc::new(warehouse), table: handle, hook };
    let scanner = Scanner::new(scanner_config, resolver, form);

    let mut summary = Summary::default();
    let mut lines = scans.lines();
    while let Some(line) = lines.next_line().await.or_raise(|| ErrorKind::Input)? {
        input.set_value(line.trim_end_matches('\r')).await.or_raise(|| ErrorKind::Input)?;
        match scanner.process_scan_with(cli.increment).await {
            Ok(outcome) => summary.scanned(&outcome),
            Err(err) => summary.failed(&err),
        }
    }

    if cli.dry_run || !summary.changed() {
        tracing::debug!("Item table unchanged; not writing");
        return Ok(summary);
    }
    let path = cli.output.as_ref().unwrap_or(&cli.table);
    let json = table.to_json().await.or_raise(|| ErrorKind::WriteTable(path.clone()))?;
    tokio::fs::write(path, json).await.or_raise(|| ErrorKind::WriteTable(path.clone()))?;
    tracing::info!(path = %path.display(), "Item table written");
    Ok(summary)
}

fn http_lookup(config: &Config) -> Result<LookupHandle> {
    let Some(base_url) = config.lookup.base_url.as_deref() else {
        exn::bail!(ErrorKind::Config("lookup strategy requires lookup.base_url"));
    };
    let mut lookup = HttpLookup::new(base_url, config.scanner.lookup_method.as_str());
    if let Some((key, secret)) = config.lookup.token() {
        lookup = lookup.with_token(key, secret);
    }
    Ok(Arc::new(lookup))
}

async fn load_table(path: &Path, config: &Config) -> Result<MemoryTable> {
    let table = MemoryTable::new(config.scanner.table.as_str(), config.table.schema(&config.scanner));
    if !tokio::fs::try_exists(path).await.or_raise(|| ErrorKind::ReadTable(path.to_path_buf()))? {
        tracing::info!(path = %path.display(), "Item table not found; starting empty");
        return Ok(table);
    }
    let json = tokio::fs::read_to_string(path).await.or_raise(|| ErrorKind::ReadTable(path.to_path_buf()))?;
    table.with_json(&json).or_raise(|| ErrorKind::ReadTable(path.to_path_buf()))
}

fn report(err: impl std::fmt::Debug) -> miette::Report {
    miette::miette!("{err:?}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rstest::rstest;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[rstest]
    #[case(&["stockscan", "--table", "items.json"], 1.0, false)]
    #[case(&["stockscan", "-t", "items.json", "--increment", "5", "--dry-run"], 5.0, true)]
    fn test_parses_arguments(#[case] args: &[&str], #[case] increment: f64, #[case] dry_run: bool) {
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.table, PathBuf::from("items.json"));
        assert_eq!(cli.increment, increment);
        assert_eq!(cli.dry_run, dry_run);
    }

    #[test]
    fn test_table_is_required() {
        assert!(Cli::try_parse_from(["stockscan"]).is_err());
    }

    #[test]
    fn test_lookup_needs_base_url() {
        let err = http_lookup(&Config::default()).err().unwrap();
        assert!(matches!(*err, ErrorKind::Config(_)));

        let mut config = Config::default();
        config.lookup.base_url = Some("https://erp.example.com".to_string());
        assert!(http_lookup(&config).is_ok());
    }

    #[tokio::test]
    async fn test_missing_table_starts_empty() {
        use stockscan_form::RowStore;

        let dir = tempfile::tempdir().unwrap();
        let table = load_table(&dir.path().join("items.json"), &Config::default()).await.unwrap();
        assert!(table.rows().await.unwrap().is_empty());
        assert!(table.has_field("serial_no"));
    }

    fn cli(table: &Path) -> Cli {
        Cli {
            config: None,
            table: table.to_path_buf(),
            warehouse: Some("Stores".to_string()),
            increment: 1.0,
            dry_run: false,
            output: None,
        }
    }

    fn heuristic() -> Config {
        let mut config = Config::default();
        config.scanner.strategy = Strategy::Heuristic;
        config
    }

    async fn read_rows(path: &Path) -> serde_json::Value {
        serde_json::from_str(&tokio::fs::read_to_string(path).await.unwrap()).unwrap()
    }

    const SCANS: &[u8] = b"AB123456XXXXXXXXXXXXXXXX\r\nAB123456YYYYYYYYYYYYYYYY\r\n";

    #[tokio::test]
    async fn test_scans_create_missing_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.json");

        let summary = run(&cli(&path), heuristic(), SCANS).await.unwrap();
        assert_eq!((summary.added, summary.updated, summary.rejected), (1, 1, 0));

        let rows = read_rows(&path).await;
        assert_eq!(rows.as_array().unwrap().len(), 1);
        assert_eq!(rows[0]["item_code"], "XXAB1234");
        assert_eq!(rows[0]["qty"], 2);
        // Carriage returns are not part of the serial.
        assert_eq!(rows[0]["serial_no"], "AB123456XXXXXXXXXXXXXXXX\nAB123456YYYYYYYYYYYYYYYY");
    }

    #[tokio::test]
    async fn test_output_leaves_table_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.json");
        let output = dir.path().join("out.json");
        tokio::fs::write(&path, "[]").await.unwrap();

        let cli = Cli { output: Some(output.clone()), ..cli(&path) };
        run(&cli, heuristic(), SCANS).await.unwrap();

        assert_eq!(tokio::fs::read_to_string(&path).await.unwrap(), "[]");
        assert_eq!(read_rows(&output).await[0]["qty"], 2);
    }

    #[tokio::test]
    async fn test_dry_run_never_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.json");

        let cli = Cli { dry_run: true, ..cli(&path) };
        let summary = run(&cli, heuristic(), SCANS).await.unwrap();

        assert!(summary.changed());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_unchanged_table_is_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.json");

        let summary = run(&cli(&path), heuristic(), &b"short\n\n"[..]).await.unwrap();

        assert_eq!(summary.added + summary.updated, 0);
        assert!(!summary.changed());
        assert!(!path.exists());
    }
}
