//! named-format CLI - Main entry point

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::TemplateArgs;

/// Log filter used when `RUST_LOG` is not set. Covers the binary and the library.
const DEFAULT_LOG_FILTER: &str = "named_format=info,quarto_named_format=info";

#[derive(Parser)]
#[command(name = "named-format")]
#[command(version)]
#[command(about = "Render templates with named placeholders", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a template with values from a JSON file
    Render {
        #[command(flatten)]
        args: TemplateArgs,
    },

    /// Print the positional template and argument list as JSON
    Rewrite {
        #[command(flatten)]
        args: TemplateArgs,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render { args } => commands::render::execute(args),
        Commands::Rewrite { args } => commands::rewrite::execute(args),
    }
}
