use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;
mod error;

use config::Config;

#[derive(Parser)]
#[command(name = "stampmap")]
#[command(about = "Stampmap - field mapping files, data templates and artifact names")]
#[command(version)]
#[command(long_about = "
Stampmap manages the geometric field mappings that document-generation
tooling stamps data into. The interactive placement itself lives in a
hosting editor; this tool covers the surrounding file work.

Examples:
  stampmap validate 034122-geld-manual-mapping-v2.json
  stampmap template mapping.json --out 034122-geld-example-data.xml
  stampmap classify formulare/steuern/spenden/034122-geld/grundlagen
  stampmap save mapping.json --dir mappings --form-id 034122-geldspende-verein
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check a mapping file and report its field status
    Validate {
        /// Mapping file (JSON)
        mapping: PathBuf,
    },

    /// Generate the example data template from a mapping
    Template {
        /// Mapping file (JSON)
        mapping: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Six-digit document number (derived from the mapping when omitted)
        #[arg(long)]
        form_number: Option<String>,
    },

    /// Classify the files of a form directory by artifact role
    Classify {
        /// Directory holding the form's files
        dir: PathBuf,
    },

    /// Save a mapping revision under the next free version number
    Save {
        /// Mapping file (JSON)
        mapping: PathBuf,

        /// Target directory for the revision
        #[arg(long, required = true)]
        dir: PathBuf,

        /// Combined form id, e.g. 034122-geldspende-verein
        #[arg(long, required = true)]
        form_id: String,

        /// Store as auto-mapping instead of manual-mapping
        #[arg(long)]
        auto: bool,
    },
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        std::env::set_var("RUST_LOG", "error");
    } else {
        let level = match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        };
        std::env::set_var("RUST_LOG", level);
    }

    env_logger::Builder::from_default_env()
        .format_timestamp_secs()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Validate { mapping } => {
            commands::validate::execute(mapping)?;
        }

        Commands::Template {
            mapping,
            out,
            form_number,
        } => {
            commands::template::execute(&config, mapping, out, form_number)?;
        }

        Commands::Classify { dir } => {
            commands::classify::execute(dir)?;
        }

        Commands::Save {
            mapping,
            dir,
            form_id,
            auto,
        } => {
            commands::save::execute(&config, mapping, dir, form_id, auto)?;
        }
    }

    Ok(())
}
