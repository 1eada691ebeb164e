//! `placement`: command-line tool for the placement portal's student import.
//!
//! # Usage
//!
//! ```text
//! placement import students.xlsx --dry-run
//! placement import students.xlsx --clear --strategy concurrent --store students.db
//! placement template student_import_template.xlsx
//! placement upload students.xlsx --url http://localhost:5000 --user admin --password secret
//! placement --config ~/.config/placement/config.toml upload students.xlsx
//! ```

mod client;
mod report;

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use client::{ApiClient, ApiConfig};
use placement_import::{
  ImportOptions, ReconcileStrategy, SheetOptions, decode_workbook, run_import_with_progress,
  template_workbook,
};
use placement_store_sqlite::SqliteStore;
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

const DEFAULT_URL: &str = "http://localhost:5000";
const DEFAULT_STORE: &str = "students.db";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "placement", version, about = "Student import tool for the placement portal")]
struct Cli {
  /// Path to a TOML config file (url, username, password, store_path).
  #[arg(short, long, value_name = "FILE", global = true)]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Import a spreadsheet straight into a local store.
  Import(ImportArgs),
  /// Write the example import workbook.
  Template {
    /// Where to write the .xlsx file.
    out: PathBuf,
  },
  /// Send a spreadsheet to a running server's import endpoint.
  Upload(UploadArgs),
}

#[derive(Args, Debug)]
struct ImportArgs {
  /// The .xlsx/.xls workbook to import.
  file: PathBuf,

  /// Worksheet to read (default: the first).
  #[arg(long)]
  sheet: Option<String>,

  /// Rows above the header row.
  #[arg(long, default_value_t = 0)]
  skip: usize,

  /// Delete every stored student first.
  #[arg(long)]
  clear: bool,

  /// Normalize and validate only; write nothing.
  #[arg(long)]
  dry_run: bool,

  /// `sequential` or `concurrent`.
  #[arg(long, default_value_t = ReconcileStrategy::Sequential)]
  strategy: ReconcileStrategy,

  /// SQLite database file.
  #[arg(long, env = "PLACEMENT_STORE")]
  store: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct UploadArgs {
  /// The .xlsx/.xls workbook to upload.
  file: PathBuf,

  /// Ask the server to delete every stored student first.
  #[arg(long)]
  clear: bool,

  /// Base URL of the server (default: http://localhost:5000).
  #[arg(long, env = "PLACEMENT_URL")]
  url: Option<String>,

  /// Admin username.
  #[arg(long, env = "PLACEMENT_USER")]
  user: Option<String>,

  /// Admin password (plaintext).
  #[arg(long, env = "PLACEMENT_PASSWORD")]
  password: Option<String>,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default, Debug)]
struct ConfigFile {
  #[serde(default)]
  url:        String,
  #[serde(default)]
  username:   String,
  #[serde(default)]
  password:   String,
  #[serde(default)]
  store_path: Option<PathBuf>,
}

impl ConfigFile {
  fn load(path: Option<&Path>) -> Result<Self> {
    let Some(path) = path else {
      return Ok(Self::default());
    };
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")
  }
}

/// A flag wins over the config file; blanks in the file count as unset.
fn pick(flag: Option<String>, file: &str, default: &str) -> String {
  flag
    .or_else(|| (!file.is_empty()).then(|| file.to_string()))
    .unwrap_or_else(|| default.to_string())
}

/// The database file an import writes to. A dry run never touches the
/// store, so it gets `None` and runs against an in-memory one instead.
fn store_path(dry_run: bool, flag: Option<PathBuf>, file_cfg: &ConfigFile) -> Option<PathBuf> {
  if dry_run {
    return None;
  }
  Some(
    flag
      .or_else(|| file_cfg.store_path.clone())
      .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE)),
  )
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let file_cfg = ConfigFile::load(cli.config.as_deref())?;

  match cli.command {
    Command::Import(args) => import(args, &file_cfg).await,
    Command::Template { out } => template(&out),
    Command::Upload(args) => upload(args, &file_cfg).await,
  }
}

// ─── Commands ─────────────────────────────────────────────────────────────────

async fn import(args: ImportArgs, file_cfg: &ConfigFile) -> Result<()> {
  let bytes = std::fs::read(&args.file)
    .with_context(|| format!("reading {}", args.file.display()))?;
  let sheet = decode_workbook(&bytes, &SheetOptions {
    sheet_name: args.sheet,
    skip_rows:  args.skip,
  })
  .with_context(|| format!("decoding {}", args.file.display()))?;

  println!("Sheet \"{}\": {} data rows", sheet.name, sheet.rows.len());
  println!("Headers: {}", sheet.headers.join(", "));

  let store = match store_path(args.dry_run, args.store, file_cfg) {
    Some(path) => SqliteStore::open(&path)
      .await
      .with_context(|| format!("failed to open store at {path:?}"))?,
    None => SqliteStore::open_in_memory()
      .await
      .context("failed to open in-memory store")?,
  };

  let options = ImportOptions {
    clear_existing: args.clear,
    dry_run:        args.dry_run,
    strategy:       args.strategy,
  };
  let result = run_import_with_progress(
    Arc::new(store),
    sheet.rows,
    options,
    |row, name, outcome| println!("{}", report::outcome_line(row, name, outcome)),
  )
  .await
  .context("import failed")?;

  print!("{}", report::summary(&result));
  Ok(())
}

fn template(out: &Path) -> Result<()> {
  let bytes = template_workbook().context("building template workbook")?;
  std::fs::write(out, bytes).with_context(|| format!("writing {}", out.display()))?;
  println!("Wrote {}", out.display());
  Ok(())
}

async fn upload(args: UploadArgs, file_cfg: &ConfigFile) -> Result<()> {
  let api_config = ApiConfig {
    base_url: pick(args.url, &file_cfg.url, DEFAULT_URL),
    username: pick(args.user, &file_cfg.username, ""),
    password: pick(args.password, &file_cfg.password, ""),
  };
  tracing::info!(url = %api_config.base_url, file = %args.file.display(), "uploading");

  let client = ApiClient::new(api_config)?;
  let result = client.upload_spreadsheet(&args.file, args.clear).await?;

  print!("{}", report::summary(&result));
  Ok(())
}
