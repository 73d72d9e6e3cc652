//! cardfile list command implementation

use std::path::PathBuf;

use crate::card::CardStore;
use crate::error::Result;

pub struct ListOptions {
    pub config: Option<PathBuf>,
    pub status: Option<String>,
    pub json: bool,
}

pub fn run(opts: ListOptions) -> Result<()> {
    let config = super::load_config(opts.config.as_deref())?;
    let store = CardStore::new(config.db.path.clone(), &config.board);

    let mut cards = store.load()?;
    if let Some(status) = &opts.status {
        store.validate_status(status)?;
        cards.retain(|card| &card.status == status);
    }

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&cards)?);
    } else if cards.is_empty() {
        println!("no cards");
    } else {
        for card in &cards {
            println!("{}\t{}\t{}", card.id, card.status, card.data);
        }
    }

    Ok(())
}
