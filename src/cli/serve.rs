//! cardfile serve command implementation
//!
//! Loads config, applies flag/env overrides, and runs the server on a
//! fresh tokio runtime until a shutdown signal arrives.

use std::path::PathBuf;

use tracing::info;

use crate::error::Result;
use crate::server::{self, AppState};

pub struct ServeOptions {
    pub config: Option<PathBuf>,
    pub addr: Option<String>,
    pub db: Option<PathBuf>,
}

pub fn run(opts: ServeOptions) -> Result<()> {
    let mut config = super::load_config(opts.config.as_deref())?;
    if let Some(addr) = opts.addr {
        config.addr = addr;
    }
    if let Some(db) = opts.db {
        config.db.path = db;
    }
    // Overrides bypassed the load-time check
    config.validate()?;

    info!(
        addr = config.addr.as_str(),
        db = %config.db.path.display(),
        "starting server"
    );

    let state = AppState::new(config)?;
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server::run(state))
}
