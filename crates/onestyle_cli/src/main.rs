//! onestyle CLI
//!
//! Edits a project's theme configuration from the terminal. State lives in a
//! file-backed store under the project directory (see onestyle.toml).

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::Project;

#[derive(Parser)]
#[command(name = "onestyle", version, about = "Manage onestyle design tokens", long_about = None)]
struct Cli {
    /// project directory or onestyle.toml
    #[arg(short, long, default_value = ".", global = true)]
    project: PathBuf,

    /// more logging (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// write a default onestyle.toml
    Init {
        /// project name (defaults to the directory name)
        #[arg(long)]
        name: Option<String>,
    },

    /// print or write the compiled stylesheet
    Compile {
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// wrap the CSS in a <style> element
        #[arg(long)]
        wrap: bool,
    },

    /// print or write the configuration as JSON
    Export {
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// replace the configuration with a JSON file
    Import { file: PathBuf },

    /// restore the default configuration and clear overrides
    Reset {
        /// confirm discarding every customization
        #[arg(long)]
        yes: bool,
    },

    /// add default components missing from the configuration
    Sync,

    /// manage custom property overrides
    Override {
        #[command(subcommand)]
        action: OverrideAction,
    },

    /// manage scope collections
    Collection {
        #[command(subcommand)]
        action: CollectionAction,
    },
}

#[derive(Subcommand)]
enum OverrideAction {
    /// set an override
    Set { name: String, value: String },

    /// remove an override
    Remove { name: String },

    /// list overrides
    List,
}

#[derive(Subcommand)]
enum CollectionAction {
    /// list collections and their scopes
    List,

    /// add a scope to a collection, creating it if needed
    Add { collection: String, scope: String },

    /// remove a scope from a collection
    Remove { collection: String, scope: String },

    /// drop references to scopes that no longer exist
    Prune,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut out = io::stdout().lock();

    // `init` runs before a project exists; everything else loads one.
    let project = || Project::load(&cli.project);
    match cli.command {
        Commands::Init { name } => commands::init(&cli.project, name.as_deref(), &mut out),
        Commands::Compile { out: dest, wrap } => {
            commands::compile(&project()?, dest.as_deref(), wrap, &mut out)
        }
        Commands::Export { out: dest } => commands::export(&project()?, dest.as_deref(), &mut out),
        Commands::Import { file } => commands::import(&project()?, &file, &mut out),
        Commands::Reset { yes } => commands::reset(&project()?, yes, &mut out),
        Commands::Sync => commands::sync(&project()?, &mut out),
        Commands::Override { action } => {
            let project = project()?;
            match action {
                OverrideAction::Set { name, value } => {
                    commands::set_override(&project, &name, &value, &mut out)
                }
                OverrideAction::Remove { name } => {
                    commands::remove_override(&project, &name, &mut out)
                }
                OverrideAction::List => commands::list_overrides(&project, &mut out),
            }
        }
        Commands::Collection { action } => {
            let project = project()?;
            match action {
                CollectionAction::List => commands::list_collections(&project, &mut out),
                CollectionAction::Add { collection, scope } => {
                    commands::add_to_collection(&project, &collection, &scope, &mut out)
                }
                CollectionAction::Remove { collection, scope } => {
                    commands::remove_from_collection(&project, &collection, &scope, &mut out)
                }
                CollectionAction::Prune => commands::prune_collections(&project, &mut out),
            }
        }
    }
}
