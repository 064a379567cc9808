use anyhow::Result;
use clap::{Parser, Subcommand};
use herald_core::SystemClock;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Instrument;

mod config;
mod logging;
mod reminder_cmd;

use config::Config;
use logging::LogLevel;
use reminder_cmd::ReminderArgs;

#[derive(Parser, Debug)]
#[command(
    name = "herald",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("HERALD_BUILD_SHA"), ")"),
    about = "Post CTF reminders to a chat webhook"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file (default: ~/.herald/config.toml)
    #[arg(long = "config", global = true)]
    config_path: Option<PathBuf>,

    /// Make the operation more talkative (same as --log-level debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log level; overrides [log].level from config
    #[arg(long, global = true, value_enum)]
    log_level: Option<LogLevel>,

    /// Do not perform the operation, only show what would be sent
    #[arg(short, long, global = true)]
    dry_run: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Remind CTF url, timeline and credentials
    Reminder(ReminderArgs),

    /// Inspect or create the config file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config file (never overwrites)
    Init,

    /// Print the effective config
    Show,
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Reminder(_) => "reminder",
            Command::Config { .. } => "config",
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // init must work when the target file doesn't exist yet or is broken
    let loaded = match &cli.command {
        Command::Config {
            command: ConfigCommand::Init,
        } => Ok(Config::default()),
        _ => config::load_config(cli.config_path.as_deref()),
    };
    let log_cfg = loaded.as_ref().map(|c| c.log.clone()).unwrap_or_default();
    let level = if cli.verbose {
        LogLevel::Debug
    } else {
        cli.log_level.unwrap_or(log_cfg.level)
    };

    let dispatch = logging::dispatch(log_cfg.format, logging::env_filter(level), std::io::stdout);
    let _guard = tracing::dispatcher::set_default(&dispatch);

    let span = tracing::info_span!("herald", app = logging::APP_NAME, service = cli.command.name());
    async move {
        let result = match loaded {
            Ok(cfg) => run(cli, cfg).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                let cause = format!("{e:#}");
                tracing::error!(error = %cause, "herald failed");
                ExitCode::FAILURE
            }
        }
    }
    .instrument(span)
    .await
}

async fn run(cli: Cli, cfg: Config) -> Result<()> {
    match cli.command {
        Command::Reminder(args) => {
            reminder_cmd::run(&args, &cfg, cli.dry_run, &SystemClock).await?;
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config(cli.config_path.as_deref())?,
            ConfigCommand::Show => config::show_config(&cfg)?,
        },
    }

    Ok(())
}
