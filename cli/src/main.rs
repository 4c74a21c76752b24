//! `xdmenu`: a dmenu launcher that remembers what you pick.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;
use xdmenu_launcher::{DispatchOutcome, LauncherConfig, SessionController, home_dir};

#[derive(Debug, Parser)]
#[command(name = "xdmenu", version, about = "Frequency-ranked dmenu launcher")]
struct Cli {
    /// Config file (defaults to $XDMENU_CONFIG, then ~/.extended-dmenu/config.toml).
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Pick a candidate in dmenu and launch it.
    Open,

    /// Scan configured locations and learn new candidates.
    Update,

    /// Print the ranked candidates with their scores.
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let home = home_dir()?;
    let config = LauncherConfig::load(cli.config.as_deref(), &home)?;
    let controller = SessionController::builder(config, &home).build()?;
    let store = controller.candidate_path().display().to_string();

    match cli.command {
        Command::Open => {
            let outcome = controller
                .open()
                .await
                .with_context(|| format!("open failed for {store}"))?;
            if let Some(DispatchOutcome::Failed(error)) = &outcome.dispatch {
                eprintln!("xdmenu: {error}");
            }
        }
        Command::Update => {
            info!("Running {} discovery tasks", controller.plan().len());
            let outcome = controller
                .update()
                .await
                .with_context(|| format!("update failed for {store}"))?;
            for failure in &outcome.failures {
                eprintln!("xdmenu: skipped {}: {}", failure.label, failure.error);
            }
            println!(
                "learned {} new candidates ({} total)",
                outcome.added, outcome.total
            );
        }
        Command::List => {
            let candidates = controller
                .list()
                .await
                .with_context(|| format!("failed to list {store}"))?;
            for candidate in candidates {
                println!("{}\t{}", candidate.score, candidate.key);
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_global_flags() {
        let cli = Cli::parse_from(["xdmenu", "update", "-vv", "--config", "/tmp/x.toml"]);

        assert!(matches!(cli.command, Command::Update));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/x.toml")));
    }
}
