//! cardfile init command implementation
//!
//! Creates the config file and an empty card file so the server has
//! something to serve on first run. Existing files are left alone.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::lock;

pub fn run(config_path: Option<PathBuf>) -> Result<()> {
    let config_path = super::config_path(config_path);
    let created_config = ensure_config(&config_path)?;

    // Either freshly written or pre-existing; both must parse
    let config = Config::load(&config_path)?;
    let created_db = ensure_card_file(&config.db.path)?;

    let mut created = Vec::new();
    if created_config {
        created.push(config_path.display().to_string());
    }
    if created_db {
        created.push(config.db.path.display().to_string());
    }

    if created.is_empty() {
        println!("cardfile init: nothing to do");
    } else {
        println!("cardfile init: created {}", created.join(", "));
    }

    Ok(())
}

fn ensure_config(path: &Path) -> Result<bool> {
    if path.exists() {
        if !path.is_file() {
            return Err(Error::OperationFailed(format!(
                "config exists but is not a file: {}",
                path.display()
            )));
        }
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Config::default().save(path)?;
    Ok(true)
}

fn ensure_card_file(path: &Path) -> Result<bool> {
    if path.exists() {
        if !path.is_file() {
            return Err(Error::OperationFailed(format!(
                "card file exists but is not a file: {}",
                path.display()
            )));
        }
        return Ok(false);
    }

    lock::write_atomic_str(path, "")?;
    Ok(true)
}
