//! Auditdash CLI - inspect summarization runs and their benchmarks

use std::path::PathBuf;
use std::process::ExitCode;

use auditdash_core::Error;
use auditdash_core::client::{FixtureSource, HttpRunSource, RunSource};
use auditdash_core::config::Config;
use auditdash_core::pages::{
    BenchmarkControls, PageLimits, PageState, load_benchmark_page, load_latest_page,
    load_run_page,
};
use auditdash_core::render::{RenderPage, TextRenderer};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "auditdash")]
#[command(author, version, about = "Audit persona runs and benchmarks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Suppress confirmations from start and config set/reset. Pages,
    /// listings and config values still print
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Service base URL (overrides AUDITDASH_API_URL and the config file)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Read documents from a fixture directory instead of the service
    #[arg(long, global = true, value_name = "DIR")]
    fixtures: Option<PathBuf>,

    /// Show text blocks in full instead of their previews
    #[arg(long, global = true)]
    expand: bool,

    /// List accordion rows by title only
    #[arg(long, global = true)]
    collapse: bool,
}

/// Exit code for errors reported by the service or fixture source
const EXIT_TRANSPORT: u8 = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show the most recent run
    Latest,

    /// Show a run by id
    Run {
        /// Run ID
        id: String,
    },

    /// Show the benchmark results for a run
    Benchmark {
        /// Run ID
        id: String,
    },

    /// List stored runs
    Runs,

    /// Show whether a benchmark is running
    Status,

    /// Start a benchmark for a run
    Start {
        /// Run ID
        id: String,
    },

    /// Show benchmark logs for a run
    Logs {
        /// Run ID
        id: String,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Get a config value
    Get { key: String },
    /// Set a config value
    Set { key: String, value: String },
    /// List all config values
    List,
    /// Reset to defaults
    Reset,
    /// Show config file path
    Path,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Initialize tracing; stdout is reserved for page output
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("auditdash=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    Ok(run(&cli).await.unwrap_or_else(|err| report(&err)))
}

async fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    let out = Output {
        format: cli.format,
        quiet: cli.quiet,
        renderer: TextRenderer::new()
            .expand_all(cli.expand)
            .rows_open(!cli.collapse),
    };

    // Config and source are only needed by commands that read documents
    let open = || -> anyhow::Result<(Box<dyn RunSource>, PageLimits)> {
        let config = Config::load()?;
        let source = open_source(cli, &config)?;
        Ok((source, PageLimits::from(&config.display)))
    };

    match &cli.command {
        Commands::Latest => {
            let (source, limits) = open()?;
            out.page(&load_latest_page(source.as_ref(), &limits).await)
        }

        Commands::Run { id } => {
            let (source, limits) = open()?;
            out.page(&load_run_page(source.as_ref(), id, &limits).await)
        }

        Commands::Benchmark { id } => {
            let (source, limits) = open()?;
            out.page(&load_benchmark_page(source.as_ref(), id, &limits).await)
        }

        Commands::Runs => {
            let (source, _) = open()?;
            cmd_runs(source.as_ref(), &out).await?;
            Ok(ExitCode::SUCCESS)
        }

        Commands::Status => {
            let (source, _) = open()?;
            cmd_status(source.as_ref(), &out).await?;
            Ok(ExitCode::SUCCESS)
        }

        Commands::Start { id } => {
            let (source, _) = open()?;
            cmd_start(source.as_ref(), id, &out).await?;
            Ok(ExitCode::SUCCESS)
        }

        Commands::Logs { id } => {
            let (source, _) = open()?;
            cmd_logs(source.as_ref(), id, &out).await?;
            Ok(ExitCode::SUCCESS)
        }

        Commands::Config { action } => {
            cmd_config(action, cli.quiet)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Print a command error to stderr and pick the exit code.
///
/// Service and fixture errors carry a code and hint, and exit with
/// `EXIT_TRANSPORT` so scripts can tell them from bad input.
fn report(err: &anyhow::Error) -> ExitCode {
    let Some(error) = err.downcast_ref::<Error>() else {
        eprintln!("Error: {:#}", err);
        return ExitCode::FAILURE;
    };

    eprintln!("Error [{}]: {}", error.code(), error);
    if let Some(hint) = error.suggestion() {
        eprintln!("Hint: try `{}`", hint);
    }
    if error.is_transport() {
        ExitCode::from(EXIT_TRANSPORT)
    } else {
        ExitCode::FAILURE
    }
}

/// Fixture directory when given, otherwise the HTTP service
fn open_source(cli: &Cli, config: &Config) -> anyhow::Result<Box<dyn RunSource>> {
    if let Some(dir) = &cli.fixtures {
        if !dir.is_dir() {
            anyhow::bail!("Fixture directory not found: {}", dir.display());
        }
        debug!(root = %dir.display(), "Using fixture source");
        return Ok(Box::new(FixtureSource::new(dir)));
    }

    let base_url = config.api.resolved_base_url(cli.api_url.as_deref());
    let source = HttpRunSource::builder()
        .config(config.api.clone())
        .base_url(base_url)
        .build()?;
    debug!(base_url = source.base_url(), "Using HTTP source");
    Ok(Box::new(source))
}

/// Output settings shared by every command
struct Output {
    format: OutputFormat,
    quiet: bool,
    renderer: TextRenderer,
}

impl Output {
    /// Print a page; failure states exit non-zero
    fn page<T: RenderPage + Serialize>(&self, state: &PageState<T>) -> anyhow::Result<ExitCode> {
        match self.format {
            OutputFormat::Text => print!("{}", self.renderer.render(state)),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(state)?),
        }

        if state.is_ready() {
            Ok(ExitCode::SUCCESS)
        } else {
            Ok(ExitCode::FAILURE)
        }
    }

    fn json<T: Serialize>(&self, value: &T) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}

// ============================================================================
// Command Implementations
// ============================================================================

async fn cmd_runs(source: &dyn RunSource, out: &Output) -> anyhow::Result<()> {
    let runs = source.list_runs().await?;
    match out.format {
        OutputFormat::Text => print!("{}", out.renderer.render_runs(&runs)),
        OutputFormat::Json => out.json(&runs)?,
    }
    Ok(())
}

async fn cmd_status(source: &dyn RunSource, out: &Output) -> anyhow::Result<()> {
    let status = source.benchmark_status().await?;
    match out.format {
        OutputFormat::Text => print!("{}", out.renderer.render_status(&status)),
        OutputFormat::Json => out.json(&status)?,
    }
    Ok(())
}

async fn cmd_start(source: &dyn RunSource, run_id: &str, out: &Output) -> anyhow::Result<()> {
    let mut controls = BenchmarkControls::new();
    controls.refresh(source).await;
    if !controls.can_start() {
        anyhow::bail!(
            "Cannot start a benchmark for run {}: a benchmark is already running",
            run_id
        );
    }

    let response = controls.start(source, run_id).await?;
    info!(run_id, benchmark_id = %response.id, "Benchmark requested");

    match out.format {
        OutputFormat::Text => {
            if !out.quiet {
                println!("{}", response.message);
                println!("  ID: {}", response.id);
                println!("  Status: {}", response.status);
            }
        }
        OutputFormat::Json => out.json(&response)?,
    }
    Ok(())
}

async fn cmd_logs(source: &dyn RunSource, run_id: &str, out: &Output) -> anyhow::Result<()> {
    let logs = source.benchmark_logs(run_id).await?;
    match out.format {
        OutputFormat::Text => print!("{}", out.renderer.render_logs(&logs)),
        OutputFormat::Json => out.json(&logs)?,
    }
    Ok(())
}

fn cmd_config(action: &ConfigAction, quiet: bool) -> anyhow::Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            let value = config.get(key)?;
            println!("{}", value);
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(key, value)?;
            config.save()?;
            if !quiet {
                println!("Set {} = {}", key, value);
            }
        }
        ConfigAction::List => {
            let config = Config::load()?;
            for (key, value) in config.list()? {
                println!("{} = {}", key, value);
            }
        }
        ConfigAction::Reset => {
            Config::reset()?;
            if !quiet {
                println!("Configuration reset to defaults.");
            }
        }
        ConfigAction::Path => {
            let path = Config::config_path()?;
            println!("{}", path.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "auditdash",
            "run",
            "r1",
            "--format",
            "json",
            "--fixtures",
            "/tmp/fx",
            "--expand",
        ])
        .unwrap();

        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.fixtures, Some(PathBuf::from("/tmp/fx")));
        assert!(cli.expand);
        assert!(!cli.collapse);
        assert!(matches!(cli.command, Commands::Run { ref id } if id == "r1"));
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["auditdash", "latest"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(!cli.quiet);
        assert!(cli.api_url.is_none());
        assert!(matches!(cli.command, Commands::Latest));
    }

    #[test]
    fn test_config_subcommands() {
        let cli = Cli::try_parse_from(["auditdash", "config", "set", "display.line_limit", "4"])
            .unwrap();
        match cli.command {
            Commands::Config {
                action: ConfigAction::Set { key, value },
            } => {
                assert_eq!(key, "display.line_limit");
                assert_eq!(value, "4");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_missing_run_id_rejected() {
        assert!(Cli::try_parse_from(["auditdash", "benchmark"]).is_err());
        assert!(Cli::try_parse_from(["auditdash", "--format", "yaml", "latest"]).is_err());
    }

    #[test]
    fn test_open_source_prefers_fixtures() {
        let dir = std::env::temp_dir();
        let cli = Cli::try_parse_from([
            "auditdash",
            "status",
            "--fixtures",
            dir.to_str().unwrap(),
        ])
        .unwrap();
        assert!(open_source(&cli, &Config::default()).is_ok());

        let cli = Cli::try_parse_from([
            "auditdash",
            "status",
            "--fixtures",
            "/definitely/not/a/fixture/dir",
        ])
        .unwrap();
        assert!(open_source(&cli, &Config::default()).is_err());
    }

    #[test]
    fn test_open_source_rejects_bad_url() {
        let cli =
            Cli::try_parse_from(["auditdash", "status", "--api-url", "ftp://example.com"]).unwrap();
        assert!(open_source(&cli, &Config::default()).is_err());
    }
}
