//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use wikiracer_core::{
    CandidateChooser, FirstCandidate, GraphProvider, MemoryGraph, SkipReason, TitleResolver,
    TraversalConfig, TraversalEngine, TraversalObserver,
};
use wikiracer_mediawiki::MediaWikiClient;
use wikiracer_shared::{
    AppConfig, ClientConfig, Title, TraversalResult, init_config, load_config, load_settings,
};

use crate::prompt::{self, InteractiveChooser};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Wikiracer: race from one encyclopedia article to another, link by link.
#[derive(Parser)]
#[command(
    name = "wikiracer",
    version,
    about = "Find a chain of links from one encyclopedia article to another.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Resolve two articles and search for a link path between them.
    Race(RaceArgs),

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Arguments for `wikiracer race`.
#[derive(Args, Debug)]
pub(crate) struct RaceArgs {
    /// Start article search term (prompted for when omitted).
    pub start: Option<String>,

    /// Target article search term (prompted for when omitted).
    pub end: Option<String>,

    /// JSON settings file with `start` and `end` fields.
    #[arg(short, long, conflicts_with_all = ["start", "end"])]
    pub settings: Option<PathBuf>,

    /// Race over an offline JSON graph instead of the live API.
    #[arg(long, conflicts_with = "endpoint")]
    pub graph: Option<PathBuf>,

    /// MediaWiki API endpoint (overrides config).
    #[arg(long, env = "WIKIRACER_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Resolve ambiguous terms to the first search result without asking.
    #[arg(long)]
    pub first: bool,

    /// Give up on paths longer than this many hops.
    #[arg(long)]
    pub max_depth: Option<u32>,

    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    // Per-page fetch failures are warnings, so they show by default.
    let filter = match cli.verbose {
        0 => "wikiracer=warn",
        1 => "wikiracer=info",
        2 => "wikiracer=debug",
        _ => "wikiracer=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Race(args) => cmd_race(args).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

// ---------------------------------------------------------------------------
// race
// ---------------------------------------------------------------------------

async fn cmd_race(args: RaceArgs) -> Result<()> {
    let config = load_config()?;

    let (raw_start, raw_end) = race_terms(&args)?;

    let provider = build_provider(&args, &config)?;
    let provider: &dyn GraphProvider = provider.as_ref();

    let mut chooser: Box<dyn CandidateChooser> = if args.first || config.race.first_candidate {
        Box::new(FirstCandidate)
    } else {
        Box::new(InteractiveChooser)
    };

    info!(start = %raw_start, end = %raw_end, "resolving race terms");
    let coords = TitleResolver::new(provider)
        .resolve_coordinates(&raw_start, &raw_end, chooser.as_mut())
        .await?;

    let mut traversal = TraversalConfig::from(&config.race);
    if args.max_depth.is_some() {
        traversal.max_depth = args.max_depth;
    }

    if !args.json {
        println!(
            "Working the path\nFrom: {}\nTo: {}\n\nTracing. . .",
            coords.start(),
            coords.end()
        );
    }

    let observer = CliObserver::new();
    let started = Instant::now();
    let result = TraversalEngine::new(provider)
        .with_config(traversal)
        .run(&coords, &observer)
        .await;
    let elapsed = started.elapsed();
    observer.finish();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    }

    match result {
        TraversalResult::PathFound { path, visited } => {
            if !args.json {
                print_path(&path, visited, elapsed);
            }
            Ok(())
        }
        TraversalResult::NotFound => Err(eyre!(
            "no path from '{}' to '{}' after {} pages",
            coords.start(),
            coords.end(),
            observer.seen()
        )),
    }
}

/// Raw terms: positional args, else a settings file, else interactive prompts.
fn race_terms(args: &RaceArgs) -> Result<(String, String)> {
    match (&args.start, &args.end, &args.settings) {
        (Some(start), Some(end), _) => Ok((start.clone(), end.clone())),
        (None, None, Some(path)) => {
            let settings = load_settings(path)?;
            Ok((settings.start, settings.end))
        }
        (None, None, None) => Ok(prompt::read_terms()?),
        _ => Err(eyre!("provide both START and END, or neither")),
    }
}

fn build_provider(args: &RaceArgs, config: &AppConfig) -> Result<Box<dyn GraphProvider>> {
    if let Some(path) = &args.graph {
        return Ok(Box::new(load_graph(path)?));
    }

    let mut api = config.api.clone();
    if let Some(endpoint) = &args.endpoint {
        api.endpoint = endpoint.clone();
    }
    let client_config = ClientConfig::try_from(&api)?;
    info!(endpoint = %client_config.endpoint, "using MediaWiki API");

    Ok(Box::new(MediaWikiClient::new(client_config)?))
}

fn load_graph(path: &Path) -> Result<MemoryGraph> {
    info!(path = %path.display(), "loading offline graph");
    Ok(MemoryGraph::load(path)?)
}

fn print_path(path: &[Title], visited: usize, elapsed: Duration) {
    let rendered: Vec<&str> = path.iter().map(Title::as_str).collect();
    println!();
    println!("  Path:             {}", rendered.join(" -> "));
    println!("  Hops:             {}", path.len().saturating_sub(1));
    println!("  Time elapsed:     {:.1}s", elapsed.as_secs_f64());
    println!("  Total pages seen: {visited}");
    println!();
}

// ---------------------------------------------------------------------------
// CLI traversal observer
// ---------------------------------------------------------------------------

/// CLI observer using an indicatif spinner.
struct CliObserver {
    spinner: ProgressBar,
    discovered: AtomicUsize,
}

impl CliObserver {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(Duration::from_millis(80));
        Self {
            spinner,
            discovered: AtomicUsize::new(0),
        }
    }

    fn seen(&self) -> usize {
        self.discovered.load(Ordering::Relaxed)
    }

    fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

impl TraversalObserver for CliObserver {
    fn expanding(&self, vertex: &Title, depth: u32) {
        self.spinner.set_message(format!(
            "[hop {depth}, {} seen] {vertex}",
            self.seen()
        ));
    }

    fn discovered(&self, _link: &Title, _depth: u32) {
        self.discovered.fetch_add(1, Ordering::Relaxed);
    }

    // The engine already logs each skip at warn level.
    fn skipped(&self, vertex: &Title, reason: &SkipReason) {
        self.spinner.set_message(format!("{vertex} failed ({reason}). . ."));
    }
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
