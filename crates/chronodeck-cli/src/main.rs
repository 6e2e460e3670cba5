use std::path::PathBuf;

use chronodeck_core::Config;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "chronodeck", version, about = "Chronodeck CLI")]
struct Cli {
    /// Path to a TOML config file (defaults to the platform config dir).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a countdown timer
    Timer {
        /// Duration such as `90s`, `5m` or `1h30m`; defaults from config
        duration: Option<String>,
        /// Display label
        #[arg(long)]
        label: Option<String>,
    },
    /// Run a stopwatch
    Stopwatch {
        /// Stop automatically after this long (runs until Ctrl-C otherwise)
        #[arg(long = "for")]
        run_for: Option<String>,
    },
    /// Run a pomodoro work/break cycle
    Pomodoro {
        /// Work phase length
        #[arg(long)]
        work: Option<String>,
        /// Break phase length
        #[arg(long = "break")]
        break_duration: Option<String>,
        /// Number of work sessions
        #[arg(long)]
        repeat: Option<u32>,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("chronodeck")
        .join("config.toml")
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(default_config_path);

    let result: Result<(), Box<dyn std::error::Error>> = (|| {
        let config = Config::load(&config_path)?;
        match cli.command {
            Commands::Timer { duration, label } => commands::timer::run(&config, duration, label),
            Commands::Stopwatch { run_for } => commands::stopwatch::run(run_for),
            Commands::Pomodoro {
                work,
                break_duration,
                repeat,
            } => commands::pomodoro::run(&config, work, break_duration, repeat),
            Commands::Config { action } => commands::config::run(action, &config_path, &config),
        }
    })();

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
