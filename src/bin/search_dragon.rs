//! CLI binary for search-dragon.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use search_dragon::{DragonConfig, RequestContext, SearchRequest};
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Search OLS and UMLS for ontology concepts and print one harmonised page as JSON.
#[derive(Parser)]
#[command(name = "search-dragon", version, about)]
struct Cli {
    /// Keyword or code to search for.
    #[arg(short, long)]
    keyword: String,

    /// Ontology prefixes to restrict to, comma separated (e.g. `mondo,hp`).
    #[arg(short, long, value_delimiter = ',')]
    ontologies: Vec<String>,

    /// Sources to query in order, comma separated (`ols`, `ols2`, `umls`).
    #[arg(short, long, value_delimiter = ',')]
    sources: Vec<String>,

    /// Rows requested from each source.
    #[arg(long)]
    page_size: Option<usize>,

    /// Row offset of the page.
    #[arg(long)]
    start_index: Option<usize>,

    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Ontology lookup CSV, overriding the config file.
    #[arg(long)]
    lookup: Option<PathBuf>,

    /// Deadline for the whole request, in seconds.
    #[arg(long)]
    timeout: Option<u64>,

    /// Pretty-print the JSON response.
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries only the response.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("search_dragon=info,ontology_search=info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = DragonConfig::load(cli.config.as_deref())?;
    if let Some(lookup) = cli.lookup.clone() {
        config.lookup.path = Some(lookup);
    }
    config.validate()?;

    let request = build_request(&cli, &config);

    let cancel = CancellationToken::new();
    let mut ctx = RequestContext::new().with_cancel_token(cancel.clone());
    if let Some(seconds) = cli.timeout {
        ctx = ctx.with_timeout(Duration::from_secs(seconds));
    }

    let cancel_clone = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("received Ctrl+C, cancelling search...");
            cancel_clone.cancel();
        }
    });

    let response = search_dragon::run_search(&config, &request, &ctx).await?;

    let json = if cli.pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{json}");

    Ok(())
}

/// Fill in whatever the command line leaves out from the config defaults.
fn build_request(cli: &Cli, config: &DragonConfig) -> SearchRequest {
    let defaults = &config.defaults;
    let sources = if cli.sources.is_empty() {
        defaults.sources.clone()
    } else {
        cli.sources.clone()
    };
    SearchRequest {
        keyword: cli.keyword.clone(),
        ontology_filter: cli.ontologies.clone(),
        sources,
        page_size: cli.page_size.unwrap_or(defaults.page_size),
        start_index: cli.start_index.unwrap_or(defaults.start_index),
    }
}
