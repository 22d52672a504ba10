//! `djolar` - parse filter and sort strings against a searcher configuration.
//!
//! Prints the resulting filter tree and sort order, which makes it handy for
//! checking a configuration file or debugging what a front end sends.
//!
//! ```text
//! djolar --config search.yaml --query 'q=st__co__abc&s=-st'
//! djolar --config search.json --filter 'st__in__[a,b]' --format text
//! ```
//!
//! # Logging
//!
//! | Source | Effect |
//! |--------|--------|
//! | `RUST_LOG` | Fine-grained tracing filter (overrides `--log-level`) |
//! | `--log-level` | Fallback filter, `warn` by default |
//!
//! Logs go to stderr; stdout carries only the rendered query.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use djolar::{SearchParams, SearchQuery, Searcher, SearcherConfig};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "djolar", version, about = "Parse djolar filter and sort strings")]
struct Cli {
    /// Searcher configuration file (YAML for .yaml/.yml, JSON otherwise)
    #[arg(short, long)]
    config: PathBuf,

    /// URL query string carrying the `q` and `s` parameters
    #[arg(long)]
    query: Option<String>,

    /// Filter string, overriding `q` from --query
    #[arg(short, long, allow_hyphen_values = true)]
    filter: Option<String>,

    /// Sort string, overriding `s` from --query
    #[arg(short, long, allow_hyphen_values = true)]
    sort: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Yaml,
    Text,
}

impl Cli {
    /// Request parameters, with explicit flags taking precedence over --query.
    fn params(&self) -> SearchParams {
        let mut params = self
            .query
            .as_deref()
            .map(SearchParams::from_query)
            .unwrap_or_default();
        if let Some(filter) = &self.filter {
            params.filter = Some(filter.clone());
        }
        if let Some(sort) = &self.sort {
            params.sort = Some(sort.clone());
        }
        params
    }
}

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to `log_level`.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    Ok(())
}

fn load_config(path: &Path) -> Result<SearcherConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;

    let config = if is_yaml(path) {
        SearcherConfig::from_yaml_str(&text)
    } else {
        SearcherConfig::from_json_str(&text)
    };
    config.with_context(|| format!("invalid searcher config in {}", path.display()))
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
}

fn render(query: &SearchQuery, format: Format) -> Result<String> {
    let out = match format {
        Format::Json => serde_json::to_string_pretty(query)?,
        Format::Yaml => serde_yaml::to_string(query)?,
        Format::Text => {
            let order = query
                .order
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",");
            format!("filter: {}\norder: {order}", query.filter)
        }
    };
    Ok(out)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;

    let config = load_config(&cli.config)?;
    let params = cli.params();
    debug!(config = %cli.config.display(), ?params, "Parsing search request");

    let query = Searcher::new(config)
        .search(&params)
        .context("invalid search request")?;
    println!("{}", render(&query, cli.format)?.trim_end());

    Ok(())
}
