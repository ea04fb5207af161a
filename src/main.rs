//! Runbook - scaffolding CLI for new procedure definitions.
//!
//! Runbook definitions are ordinary Rust programs; this binary only
//! bootstraps them. `runbook new <title>` writes a starter definition
//! file next to you.

use std::fs;
use std::path::Path;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use runbook::template;

/// Define repeatable operational procedures in code
#[derive(Parser)]
#[command(name = "runbook")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter runbook definition file
    New {
        /// Title of the new runbook; words become the definition name
        #[arg(required = true)]
        title: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose { EnvFilter::new("debug") } else { EnvFilter::new("warn") };

    tracing_subscriber::registry().with(fmt::layer().with_target(false)).with(filter).init();

    match cli.command {
        Commands::New { title } => cmd_new(&title.join(" ")),
    }
}

fn cmd_new(title: &str) -> Result<()> {
    let scaffold = template::scaffold(title);
    let path = Path::new(&scaffold.file_name);

    if path.exists() {
        anyhow::bail!("refusing to overwrite existing file '{}'", scaffold.file_name);
    }

    fs::write(path, scaffold.contents)?;
    println!("Created {}", scaffold.file_name);

    Ok(())
}
