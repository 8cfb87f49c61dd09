//! tap-inspect binary entry point

use std::io::{self, Write};
use std::path::PathBuf;

use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tap_persist::reader;
use tap_persist::writer::{save_unified, write_body, Destination};
use tap_persist::{Config, MessageSaver};

#[derive(Parser, Debug)]
#[command(name = "tap-inspect")]
#[command(about = "Inspect and convert saved broker messages")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a saved message as a JSON document
    Show {
        /// `.json` document, `.dat` file or base name of a split save
        path: PathBuf,
        /// Leave the body out (the Body field is printed empty)
        #[arg(long)]
        no_body: bool,
    },
    /// Print the raw body of a saved message
    Body {
        path: PathBuf,
    },
    /// Save a saved message again using the configured output
    Save {
        /// Path to configuration file
        #[arg(short, long, env = "TAP_CONFIG")]
        config: PathBuf,
        path: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout carries message output, logs go to stderr
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    run(args.command).map_err(|e| {
        error!(error = %e, "tap-inspect failed");
        e
    })
}

fn run(command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Show { path, no_body } => {
            let message = reader::load(&path)?.into_message();
            let mut out = io::stdout().lock();
            save_unified(Destination::Stream(&mut out), !no_body, &message)?;
        }
        Command::Body { path } => {
            let message = reader::load(&path)?.into_message();
            let mut out = io::stdout().lock();
            write_body(&mut out, &message)?;
            out.flush()?;
        }
        Command::Save { config, path } => {
            let config = Config::load(&config)?;
            let saver = MessageSaver::from_config(&config.output)?;
            let message = reader::load(&path)?.into_message();

            let saved = saver.save(&message, Utc::now())?;
            info!(
                source = ?path,
                saved = ?saved,
                format = ?saver.format(),
                "Message saved"
            );
        }
    }
    Ok(())
}
