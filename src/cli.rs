//! CLI definition and dispatch.

use chrono::{Local, NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::adapters::cache_dir_adapter::{source_id_from_stem, CacheDirAdapter};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::html_pre::extract_pre_text;
use crate::adapters::json_report_adapter::JsonReportAdapter;
use crate::adapters::symbols_json_adapter::SymbolsJsonAdapter;
use crate::domain::assembler::{
    assemble, assemble_full, assemble_symbol, entries_from_text, Assembly, MarketFilter,
};
use crate::domain::error::CotError;
use crate::domain::market::FULL_REPORT_SYMBOL;
use crate::domain::symbol::select_symbols;
use crate::ports::config_port::ConfigPort;
use crate::ports::report_port::ReportSink;
use crate::ports::source_port::SourcePort;
use crate::ports::symbol_port::SymbolPort;

pub const DEFAULT_OUTPUT_DIR: &str = "data/ai";
pub const DEFAULT_TIMEOUT_SECS: i64 = 60;
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";

#[derive(Parser, Debug)]
#[command(name = "cotreport", about = "Commitment of Traders report parser")]
pub struct Cli {
    /// Log filter, e.g. `debug` or `cotreport=trace` (overrides RUST_LOG)
    #[arg(long, global = true)]
    pub log_level: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build COT reports for one or more symbols (comma separated, or ALL)
    Symbol {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        symbol: String,
        /// Only read pages cached on this date
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Build the full COT report over every market of every source
    Full {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Download configured sources into the cache first
        #[arg(long)]
        fetch: bool,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// List configured symbols and their report names
    Symbols {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Parse one HTML or plain-text report file and print the JSON report
    Inspect {
        #[arg(short, long)]
        file: PathBuf,
        #[arg(long)]
        report_name: Option<String>,
    },
}

/// Everything a run needs, resolved from the INI file up front.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub cache_dir: PathBuf,
    pub output_dir: PathBuf,
    pub symbols_config: Option<PathBuf>,
    /// `(source id, url)` pairs in id order.
    pub sources: Vec<(String, String)>,
    pub user_agent: String,
    pub timeout_secs: u64,
    /// Download again even when today's page is already cached.
    pub refresh: bool,
}

/// Install the stderr subscriber once per process. `level` wins over
/// `RUST_LOG`; `info` otherwise.
pub fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Symbol {
            config,
            symbol,
            date,
        } => run_symbol(&config, &symbol, date),
        Command::Full {
            config,
            output,
            fetch,
            date,
        } => run_full(&config, output, fetch, date),
        Command::Symbols { config } => run_list_symbols(&config),
        Command::Inspect { file, report_name } => run_inspect(&file, report_name.as_deref()),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = CotError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

pub fn build_run_config(adapter: &dyn ConfigPort) -> Result<RunConfig, CotError> {
    let cache_dir = adapter
        .get_string("paths", "cache_dir")
        .ok_or_else(|| CotError::ConfigMissing {
            section: "paths".into(),
            key: "cache_dir".into(),
        })?;

    let timeout = adapter.get_int("fetch", "timeout_secs", DEFAULT_TIMEOUT_SECS);
    if timeout <= 0 {
        return Err(CotError::ConfigInvalid {
            section: "fetch".into(),
            key: "timeout_secs".into(),
            reason: "must be positive".into(),
        });
    }

    let sources = adapter
        .keys("sources")
        .into_iter()
        .filter_map(|id| adapter.get_string("sources", &id).map(|url| (id, url)))
        .collect();

    Ok(RunConfig {
        cache_dir: PathBuf::from(cache_dir),
        output_dir: adapter
            .get_string("paths", "output_dir")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
        symbols_config: adapter.get_string("paths", "symbols_config").map(PathBuf::from),
        sources,
        user_agent: adapter
            .get_string("fetch", "user_agent")
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        timeout_secs: timeout as u64,
        refresh: adapter.get_bool("fetch", "refresh", false),
    })
}

fn load_run_config(path: &Path) -> Result<RunConfig, ExitCode> {
    info!("Loading config from {}", path.display());
    let adapter = load_config(path)?;
    build_run_config(&adapter).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

fn load_symbols(config: &RunConfig) -> Result<SymbolsJsonAdapter, ExitCode> {
    let path = config.symbols_config.as_ref().ok_or_else(|| {
        let err = CotError::ConfigMissing {
            section: "paths".into(),
            key: "symbols_config".into(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })?;
    SymbolsJsonAdapter::from_file(path).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

fn cache_sources(config: &RunConfig, date: Option<NaiveDate>) -> CacheDirAdapter {
    match date {
        Some(date) => CacheDirAdapter::for_date(config.cache_dir.clone(), date),
        None => CacheDirAdapter::new(config.cache_dir.clone()),
    }
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// What happened to each requested symbol.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SymbolRunSummary {
    /// `(symbol, location)` of every report written.
    pub written: Vec<(String, String)>,
    pub no_data: Vec<String>,
    pub unmapped: Vec<String>,
    pub failed: Vec<(String, String)>,
}

impl SymbolRunSummary {
    pub fn exit_code(&self) -> ExitCode {
        if !self.failed.is_empty() {
            ExitCode::from(1)
        } else if self.written.is_empty() {
            ExitCode::from(5)
        } else {
            ExitCode::SUCCESS
        }
    }
}

/// Assemble and persist one report per selected symbol.
///
/// Symbols without a mapping and symbols with no matching market are
/// recorded and skipped; nothing is written for them.
pub fn run_symbol_pipeline(
    sources: &dyn SourcePort,
    symbols: &dyn SymbolPort,
    sink: &dyn ReportSink,
    selection: &[String],
    collected_at: NaiveDateTime,
) -> SymbolRunSummary {
    let mut summary = SymbolRunSummary::default();

    for symbol in selection {
        let mapping = match symbols.resolve(symbol) {
            Ok(m) => m,
            Err(e) => {
                warn!("{e}");
                summary.unmapped.push(symbol.clone());
                continue;
            }
        };

        info!(symbol = %mapping.symbol, "searching sources for {}", mapping.report_name);
        let report = match assemble_symbol(sources, &mapping, collected_at) {
            Assembly::Report(report) => report,
            Assembly::NoData => {
                warn!(symbol = %mapping.symbol, "no COT data found");
                summary.no_data.push(mapping.symbol);
                continue;
            }
        };

        match sink.write(&report) {
            Ok(location) => summary.written.push((mapping.symbol, location)),
            Err(e) => {
                warn!(symbol = %mapping.symbol, "{e}");
                summary.failed.push((mapping.symbol, e.to_string()));
            }
        }
    }

    summary
}

/// Assemble and persist the full report. `Ok(None)` means there was nothing to write.
pub fn run_full_pipeline(
    sources: &dyn SourcePort,
    sink: &dyn ReportSink,
    collected_at: NaiveDateTime,
) -> Result<Option<String>, CotError> {
    match assemble_full(sources, collected_at) {
        Assembly::Report(report) => {
            info!("{} markets parsed", report.entries.len());
            sink.write(&report).map(Some)
        }
        Assembly::NoData => Ok(None),
    }
}

fn run_symbol(config_path: &Path, symbol: &str, date: Option<NaiveDate>) -> ExitCode {
    let config = match load_run_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let symbols = match load_symbols(&config) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let selection = select_symbols(symbol, &symbols.symbols());
    if selection.is_empty() {
        eprintln!("error: no symbols selected");
        return ExitCode::from(2);
    }

    let sources = cache_sources(&config, date);
    let sink = JsonReportAdapter::in_dir(config.output_dir.clone());
    let summary = run_symbol_pipeline(&sources, &symbols, &sink, &selection, now());

    for (symbol, location) in &summary.written {
        println!("{symbol}: {location}");
    }
    for symbol in &summary.unmapped {
        eprintln!("{symbol}: no report mapping");
    }
    for symbol in &summary.no_data {
        eprintln!("{symbol}: no results");
    }
    for (symbol, reason) in &summary.failed {
        eprintln!("{symbol}: {reason}");
    }
    summary.exit_code()
}

fn run_full(
    config_path: &Path,
    output: Option<PathBuf>,
    fetch: bool,
    date: Option<NaiveDate>,
) -> ExitCode {
    let config = match load_run_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let date = if fetch {
        let today = date.unwrap_or_else(|| Local::now().date_naive());
        if let Err(code) = fetch_sources(&config, today) {
            return code;
        }
        Some(today)
    } else {
        date
    };

    let sources = cache_sources(&config, date);
    let sink = match output {
        Some(path) => JsonReportAdapter::to_file(path),
        None => JsonReportAdapter::in_dir(config.output_dir.clone()),
    };

    match run_full_pipeline(&sources, &sink, now()) {
        Ok(Some(location)) => {
            println!("{location}");
            ExitCode::SUCCESS
        }
        Ok(None) => {
            eprintln!("no COT data found in {}", config.cache_dir.display());
            ExitCode::from(5)
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

#[cfg(feature = "fetch")]
fn fetch_sources(config: &RunConfig, date: NaiveDate) -> Result<(), ExitCode> {
    use crate::adapters::http_fetch_adapter::HttpFetchAdapter;
    use std::time::Duration;

    if config.sources.is_empty() {
        warn!("no [sources] configured; nothing to download");
        return Ok(());
    }
    let fetcher = HttpFetchAdapter::new(
        config.cache_dir.clone(),
        &config.user_agent,
        Duration::from_secs(config.timeout_secs),
    )
    .map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })?
    .with_refresh(config.refresh);
    let fetched = fetcher.fetch_all(&config.sources, date);
    info!("{} of {} sources cached", fetched.len(), config.sources.len());
    Ok(())
}

#[cfg(not(feature = "fetch"))]
fn fetch_sources(_config: &RunConfig, _date: NaiveDate) -> Result<(), ExitCode> {
    eprintln!("error: fetch feature is required for --fetch");
    Err(ExitCode::from(1))
}

fn run_list_symbols(config_path: &Path) -> ExitCode {
    let config = match load_run_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let symbols = match load_symbols(&config) {
        Ok(s) => s,
        Err(code) => return code,
    };

    for symbol in symbols.symbols() {
        let report_name = symbols
            .info(&symbol)
            .and_then(|info| info.report_name())
            .unwrap_or("-");
        println!("{symbol}\t{report_name}");
    }
    ExitCode::SUCCESS
}

fn run_inspect(path: &Path, report_name: Option<&str>) -> ExitCode {
    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(e) => {
            let err = CotError::Io(e);
            eprintln!("error: failed to read {}: {err}", path.display());
            return (&err).into();
        }
    };
    let raw = String::from_utf8_lossy(&bytes);
    let text = extract_pre_text(&raw).unwrap_or_else(|| raw.to_string());

    let source_id = path
        .file_stem()
        .and_then(|s| s.to_str())
        .map(source_id_from_stem)
        .unwrap_or_default();

    let (symbol, filter) = match report_name {
        Some(name) => (name, MarketFilter::ReportName(name)),
        None => (FULL_REPORT_SYMBOL, MarketFilter::All),
    };

    match assemble(symbol, entries_from_text(&source_id, &text, filter), now()) {
        Assembly::Report(report) => match report.to_json() {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                let err = CotError::from(e);
                eprintln!("error: {err}");
                (&err).into()
            }
        },
        Assembly::NoData => {
            eprintln!("no COT data found in {}", path.display());
            ExitCode::from(5)
        }
    }
}
