//! Command-line interface for cardfile
//!
//! This module defines the CLI structure using clap derive macros.
//! Each subcommand is defined in its own submodule.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::config::{self, Config};
use crate::error::Result;

mod hash;
mod init;
mod list;
mod serve;

/// cardfile - a session-authenticated todo board over one CSV file
///
/// Serves a small card board whose only store is a flat CSV file, plus
/// a few commands for working with that file from the shell.
#[derive(Parser, Debug)]
#[command(name = "cardfile")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the config file (defaults to ./cardfile.toml)
    #[arg(long, global = true, env = "CARDFILE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the board server
    Serve {
        /// Address to listen on (e.g., "127.0.0.1:3000")
        #[arg(long, env = "CARDFILE_ADDR")]
        addr: Option<String>,

        /// Path to the card file
        #[arg(long, env = "CARDFILE_DB")]
        db: Option<PathBuf>,
    },

    /// Create the config file and an empty card file
    Init,

    /// Print the cards in the file
    List {
        /// Only cards in this status column
        #[arg(long)]
        status: Option<String>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Print the session hash of a user identifier
    Hash {
        /// Raw user identifier
        user: String,
    },
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Serve { addr, db } => serve::run(serve::ServeOptions {
                config: self.config,
                addr,
                db,
            }),
            Commands::Init => init::run(self.config),
            Commands::List { status, json } => list::run(list::ListOptions {
                config: self.config,
                status,
                json,
            }),
            Commands::Hash { user } => hash::run(&user),
        }
    }
}

/// Load config from an explicit path, or from the working directory.
///
/// An explicit path must exist; the implicit one may be absent, in which
/// case defaults apply.
fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path),
        None => Config::load_from_dir(Path::new(".")),
    }
}

fn config_path(path: Option<PathBuf>) -> PathBuf {
    path.unwrap_or_else(|| PathBuf::from(config::CONFIG_FILE))
}
