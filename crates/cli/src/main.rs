// celledit CLI - replay edit sessions against a headless grid

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use celledit_cli::exit_codes::{
    EXIT_EXPECT_FAILED, EXIT_INVALID_SCENARIO, EXIT_IO, EXIT_PARSE, EXIT_SUCCESS,
};
use celledit_cli::replay::replay;
use celledit_cli::scenario::{Scenario, ScenarioError};
use celledit_config::{ConfigError, Settings};

#[derive(Parser)]
#[command(name = "celledit")]
#[command(about = "Replay in-place cell edit sessions (headless)")]
#[command(version)]
struct Cli {
    /// Settings file (default: platform config dir)
    #[arg(long, global = true, env = "CELLEDIT_SETTINGS")]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario file and print the state after every step
    #[command(after_help = "\
Examples:
  celledit replay scenarios/spanning_commit.toml
  celledit replay scenarios/spanning_commit.toml --json
  RUST_LOG=celledit_engine=trace celledit replay scenarios/scroll_cancels.toml")]
    Replay {
        /// Scenario file (TOML)
        scenario: PathBuf,

        /// Emit the trace as JSON
        #[arg(long)]
        json: bool,

        /// Only report expectation failures
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Print the settings file path and the effective edit settings
    Settings,
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<ScenarioError> for CliError {
    fn from(err: ScenarioError) -> Self {
        let code = match &err {
            ScenarioError::Io { .. } => EXIT_IO,
            ScenarioError::Parse(_) => EXIT_PARSE,
            ScenarioError::Invalid(_) => EXIT_INVALID_SCENARIO,
        };
        Self { code, message: err.to_string(), hint: None }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        let code = match &err {
            ConfigError::Io { .. } => EXIT_IO,
            ConfigError::Parse { .. } => EXIT_PARSE,
        };
        Self { code, message: err.to_string(), hint: None }
            .with_hint("settings files are JSON; lines starting with // are ignored")
    }
}

fn load_settings(path: Option<&PathBuf>) -> Result<Settings, CliError> {
    match path {
        Some(path) => Ok(Settings::load_from(path)?),
        None => Ok(Settings::load()),
    }
}

/// RUST_LOG wins over the settings file.
fn init_logging(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = load_settings(cli.settings.as_ref()).and_then(|settings| {
        init_logging(&settings);
        match cli.command {
            None => {
                // No subcommand = show help
                eprintln!("Usage: celledit <command> [options]");
                eprintln!("       celledit --help for more information");
                Ok(())
            }
            Some(Commands::Replay { scenario, json, quiet }) => {
                cmd_replay(scenario, json, quiet, &settings)
            }
            Some(Commands::Settings) => cmd_settings(cli.settings.as_ref(), &settings),
        }
    });

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

// ============================================================================
// replay
// ============================================================================

fn cmd_replay(path: PathBuf, json: bool, quiet: bool, settings: &Settings) -> Result<(), CliError> {
    let scenario = Scenario::load(&path)?;
    log::info!("replaying {} ({} steps)", path.display(), scenario.steps.len());

    let trace = replay(&scenario, settings.edit);

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if json {
        let body = serde_json::to_string_pretty(&trace).map_err(|e| CliError::io(e.to_string()))?;
        writeln!(handle, "{}", body).map_err(|e| CliError::io(e.to_string()))?;
    } else if !quiet {
        write!(handle, "{}", trace.render_text()).map_err(|e| CliError::io(e.to_string()))?;
    }

    if trace.passed() {
        Ok(())
    } else {
        Err(CliError {
            code: EXIT_EXPECT_FAILED,
            message: format!("{} expectation(s) failed", trace.mismatches.len()),
            hint: quiet.then(|| trace.mismatches.join("; ")),
        })
    }
}

// ============================================================================
// settings
// ============================================================================

fn cmd_settings(path: Option<&PathBuf>, settings: &Settings) -> Result<(), CliError> {
    let shown = path
        .map(|p| p.display().to_string())
        .unwrap_or_else(Settings::config_path_display);
    let body = serde_json::to_string_pretty(settings).map_err(|e| CliError::io(e.to_string()))?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "# {}", shown).map_err(|e| CliError::io(e.to_string()))?;
    writeln!(handle, "{}", body).map_err(|e| CliError::io(e.to_string()))?;
    Ok(())
}
