use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use grafwatch_proxy::{dashboard, etcd, query, HttpDispatcher};
use grafwatch_types::{ClusterId, TimeRange};

mod duration;
mod report;
mod settings;

use settings::Settings;

#[derive(Parser, Debug)]
#[command(name = "grafwatch")]
#[command(about = "Grafana proxy URLs, dashboard checks and etcd health for managed clusters")]
struct Args {
    /// Path to a TOML config file (default: ./grafwatch.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Management API endpoint (e.g., "https://rancher.example.com")
    #[arg(short, long, global = true)]
    endpoint: Option<String>,

    /// Cluster id to scope requests to ("local" for the management cluster)
    #[arg(short = 'C', long, global = true)]
    cluster: Option<String>,

    /// Request timeout (e.g., "10s", "500ms")
    #[arg(short, long, global = true)]
    timeout: Option<String>,

    /// Accept invalid TLS certificates
    #[arg(long, global = true)]
    insecure: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the cluster proxy URL for a Grafana embed URL
    Url {
        /// Embed URL captured from Grafana
        embed_url: String,

        /// Extra query parameter, overrides forwarded ones (repeatable)
        #[arg(short, long = "param", value_parser = parse_key_val)]
        params: Vec<(String, String)>,
    },

    /// Check that every dashboard exists behind the proxy (exit 1 if not)
    Check {
        /// Embed URLs captured from Grafana
        #[arg(required = true)]
        embed_urls: Vec<String>,
    },

    /// Show etcd leader presence, leader changes and failed proposals
    Etcd {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run a raw range query and print the series as JSON
    Query {
        /// Metric expression, inserted into the URL as-is
        expr: String,

        /// Window ending now (e.g., "5m", "1h")
        #[arg(short, long, default_value = "1h")]
        window: String,

        /// Step in seconds
        #[arg(short, long, default_value = "30")]
        step: u64,
    },
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let settings = resolve_settings(&args)?;
    let cluster = settings.cluster_id();
    debug!(
        endpoint = %settings.endpoint,
        cluster = %cluster,
        timeout = %settings.timeout,
        "settings resolved"
    );

    match args.command {
        Command::Url { embed_url, params } => print_url(&embed_url, &cluster, &params),
        Command::Check { embed_urls } => {
            let dispatcher = build_dispatcher(&settings)?;
            run_async(check_dashboards(dispatcher, cluster, embed_urls))
        }
        Command::Etcd { json } => {
            let dispatcher = build_dispatcher(&settings)?;
            run_async(show_etcd(dispatcher, cluster, json))
        }
        Command::Query { expr, window, step } => {
            let window = duration::parse_duration(&window)
                .with_context(|| format!("Invalid window '{}'", window))?;
            let dispatcher = build_dispatcher(&settings)?;
            run_async(run_query(dispatcher, cluster, expr, window, step))
        }
    }
}

/// Apply command line overrides on top of the loaded configuration
fn resolve_settings(args: &Args) -> Result<Settings> {
    let mut settings = Settings::load(args.config.as_deref())?;

    if let Some(endpoint) = &args.endpoint {
        settings.endpoint = endpoint.clone();
    }
    if let Some(cluster) = &args.cluster {
        settings.cluster = cluster.clone();
    }
    if let Some(timeout) = &args.timeout {
        settings.timeout = timeout.clone();
    }
    if args.insecure {
        settings.insecure = true;
    }

    Ok(settings)
}

fn build_dispatcher(settings: &Settings) -> Result<HttpDispatcher> {
    let dispatcher = HttpDispatcher::builder()
        .endpoint(settings.endpoint.clone())
        .timeout(settings.timeout()?)
        .accept_invalid_certs(settings.insecure)
        .build()
        .context("Failed to build HTTP client")?;

    Ok(dispatcher)
}

fn run_async<F>(future: F) -> Result<ExitCode>
where
    F: std::future::Future<Output = Result<ExitCode>>,
{
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(future)
}

fn print_url(
    embed_url: &str,
    cluster: &ClusterId,
    params: &[(String, String)],
) -> Result<ExitCode> {
    let params: Vec<(&str, &str)> = params
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();

    let url = dashboard::dashboard_url(embed_url, cluster, &params)?;
    println!("{}", url);
    Ok(ExitCode::SUCCESS)
}

async fn check_dashboards(
    dispatcher: HttpDispatcher,
    cluster: ClusterId,
    embed_urls: Vec<String>,
) -> Result<ExitCode> {
    if dashboard::all_dashboards_exist(&dispatcher, &cluster, &embed_urls).await {
        println!("all dashboards present");
        Ok(ExitCode::SUCCESS)
    } else {
        println!("missing dashboards");
        Ok(ExitCode::FAILURE)
    }
}

async fn show_etcd(dispatcher: HttpDispatcher, cluster: ClusterId, json: bool) -> Result<ExitCode> {
    let health = etcd::etcd_health(&dispatcher, &cluster)
        .await
        .with_context(|| format!("Failed to query etcd health for cluster {}", cluster))?;

    if json {
        let doc = report::health_json(&cluster, &health);
        println!("{}", serde_json::to_string_pretty(&doc)?);
    } else {
        println!("{}", report::format_health(&cluster, &health));
    }

    Ok(ExitCode::SUCCESS)
}

async fn run_query(
    dispatcher: HttpDispatcher,
    cluster: ClusterId,
    expr: String,
    window: Duration,
    step: u64,
) -> Result<ExitCode> {
    if step == 0 {
        return Err(anyhow!("Step must be at least 1 second"));
    }

    let range = TimeRange::last(window);
    let result = query::query_range(&dispatcher, &cluster, &expr, range, step)
        .await
        .with_context(|| format!("Range query '{}' failed", expr))?;

    let doc = report::query_json(&expr, &result);
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(ExitCode::SUCCESS)
}

/// Parse a single `key=value` pair
fn parse_key_val(s: &str) -> Result<(String, String)> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| anyhow!("expected key=value, got '{}'", s))?;

    if key.is_empty() {
        return Err(anyhow!("empty parameter name in '{}'", s));
    }

    Ok((key.to_string(), value.to_string()))
}
