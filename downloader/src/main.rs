use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tabcore::{aggregate, download_tabs, SaveConfig};
use tracing_subscriber::{fmt, EnvFilter};
use url::Url;

mod fetch;
mod prompt;

use fetch::HttpFetcher;

#[derive(Parser, Debug)]
#[command(name = "tabdl")]
#[command(about = "Search ultimate-guitar.com and save tabs as text files")]
struct Cli {
    /// Directory the tabs are saved to
    #[arg(long, default_value = ".")]
    output: PathBuf,
    /// Site root used for search and tab pages
    #[arg(long, default_value = "https://www.ultimate-guitar.com")]
    base_url: String,
    /// Request timeout seconds
    #[arg(long, default_value_t = 12)]
    timeout_secs: u64,
    /// User-Agent sent with every request
    #[arg(long, default_value = "Mozilla/5.0 (X11; Linux x86_64) tabdl/0.1")]
    user_agent: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();
    let args = Cli::parse();
    let base = Url::parse(&args.base_url).with_context(|| format!("invalid --base-url {}", args.base_url))?;
    let fetcher = HttpFetcher::new(&args.user_agent, Duration::from_secs(args.timeout_secs))?;
    let cfg = SaveConfig::new(&args.output);

    let mut input = io::stdin().lock();
    let mut out = io::stdout().lock();

    let Some(terms) = prompt::read_search_terms(&mut input, &mut out)? else { return Ok(()) };
    let results = aggregate(&fetcher, &base, &terms).await?;
    if results.is_empty() {
        writeln!(out, "\n> No downloadable tabs found for \"{}\"", terms.join(" "))?;
        return Ok(());
    }
    prompt::display_results(&mut out, &results)?;

    let Some(urls) = prompt::read_selection(&mut input, &mut out, &results)? else { return Ok(()) };
    let summary = download_tabs(&fetcher, &urls, &cfg).await;
    eprintln!(
        "done: written={} metadata_only={} already_present={} failed={}",
        summary.written, summary.metadata_only, summary.already_present, summary.failed
    );

    let location = std::fs::canonicalize(&cfg.root).unwrap_or_else(|_| cfg.root.clone());
    writeln!(out, "\n> Download finished")?;
    writeln!(out, "> Location: {}", location.display())?;
    Ok(())
}
