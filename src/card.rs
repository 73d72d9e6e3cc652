//! Card model and the file-backed card store
//!
//! Cards live as rows in one CSV file and nowhere else: every accessor
//! goes back to disk, so the file can be inspected or edited by hand
//! between requests. Mutations hold the sibling `.lock` file across the
//! whole read-modify-write and land the result atomically.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::BoardConfig;
use crate::csv;
use crate::error::{Error, Result};
use crate::lock::{self, FileLock, DEFAULT_LOCK_TIMEOUT_MS};

/// Field keys used in card rows.
const KEY_ID: &str = "id";
const KEY_DATA: &str = "data";
const KEY_TYPE: &str = "type";

/// A single todo card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Decimal string allocated from the highest id in the file
    pub id: String,
    /// Free-text content
    pub data: String,
    /// Status column the card sits in
    #[serde(rename = "type")]
    pub status: String,
}

/// File-backed store for cards.
#[derive(Debug, Clone)]
pub struct CardStore {
    path: PathBuf,
    statuses: Vec<String>,
    default_status: String,
}

impl CardStore {
    pub fn new(path: PathBuf, board: &BoardConfig) -> Self {
        Self {
            path,
            statuses: board.statuses.clone(),
            default_status: board.default_status.clone(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn default_status(&self) -> &str {
        &self.default_status
    }

    /// Check a status against the configured columns
    pub fn validate_status(&self, status: &str) -> Result<()> {
        if self.statuses.iter().any(|value| value == status) {
            Ok(())
        } else {
            Err(Error::UnknownStatus(status.to_string()))
        }
    }

    /// Load every card in file order.
    ///
    /// A missing file is an empty board.
    pub fn load(&self) -> Result<Vec<Card>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let _lock = FileLock::acquire(self.lock_path(), DEFAULT_LOCK_TIMEOUT_MS)?;
        self.read_cards()
    }

    /// Look up one card by id.
    pub fn get(&self, id: &str) -> Result<Option<Card>> {
        Ok(self.load()?.into_iter().find(|card| card.id == id))
    }

    /// Append a new card, allocating the next numeric id.
    ///
    /// `status` falls back to the configured default when absent.
    pub fn add(&self, data: &str, status: Option<&str>) -> Result<Card> {
        if data.trim().is_empty() {
            return Err(Error::InvalidArgument(
                "card data cannot be empty".to_string(),
            ));
        }
        let status = match status {
            Some(value) => {
                self.validate_status(value)?;
                value.to_string()
            }
            None => self.default_status.clone(),
        };

        let _lock = FileLock::acquire(self.lock_path(), DEFAULT_LOCK_TIMEOUT_MS)?;
        let mut cards = self.read_cards()?;
        let card = Card {
            id: next_id(&cards)?,
            data: data.to_string(),
            status,
        };
        cards.push(card.clone());
        self.write_cards(&cards)?;
        Ok(card)
    }

    /// Move a card to another status column.
    pub fn set_status(&self, id: &str, status: &str) -> Result<Card> {
        self.validate_status(status)?;

        let _lock = FileLock::acquire(self.lock_path(), DEFAULT_LOCK_TIMEOUT_MS)?;
        let mut cards = self.read_cards()?;
        let card = cards
            .iter_mut()
            .find(|card| card.id == id)
            .ok_or_else(|| Error::CardNotFound(id.to_string()))?;
        card.status = status.to_string();
        let updated = card.clone();
        self.write_cards(&cards)?;
        Ok(updated)
    }

    /// Remove a card's row.
    pub fn remove(&self, id: &str) -> Result<Card> {
        let _lock = FileLock::acquire(self.lock_path(), DEFAULT_LOCK_TIMEOUT_MS)?;
        let mut cards = self.read_cards()?;
        let pos = cards
            .iter()
            .position(|card| card.id == id)
            .ok_or_else(|| Error::CardNotFound(id.to_string()))?;
        let removed = cards.remove(pos);
        self.write_cards(&cards)?;
        Ok(removed)
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("lock")
    }

    // Callers hold the file lock.
    fn read_cards(&self) -> Result<Vec<Card>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let text = fs::read_to_string(&self.path)?;
        parse_cards(&text)
    }

    // Callers hold the file lock.
    fn write_cards(&self, cards: &[Card]) -> Result<()> {
        let mut text = String::new();
        for card in cards {
            let fields = [
                KEY_ID.to_string(),
                card.id.clone(),
                KEY_DATA.to_string(),
                card.data.clone(),
                KEY_TYPE.to_string(),
                card.status.clone(),
            ];
            text.push_str(&csv::render_row(&fields));
            text.push('\n');
        }
        lock::write_atomic_str(&self.path, &text)
    }
}

/// Parse card file text, enforcing one row per id.
///
/// Unknown keys are rejected rather than silently dropped on the next
/// rewrite. A repeated known key within a row keeps its last value.
pub fn parse_cards(text: &str) -> Result<Vec<Card>> {
    let rows = csv::parse(text)?;
    let mut cards = Vec::with_capacity(rows.len());
    let mut seen: HashSet<String> = HashSet::new();

    for row in rows {
        let mut id = None;
        let mut data = None;
        let mut status = None;
        for (key, value) in row.pairs()? {
            match key.as_str() {
                KEY_ID => id = Some(value),
                KEY_DATA => data = Some(value),
                KEY_TYPE => status = Some(value),
                other => {
                    return Err(Error::MalformedRow {
                        line: row.line,
                        reason: format!("unknown field '{other}'"),
                    });
                }
            }
        }

        let id = match id {
            Some(value) if !value.trim().is_empty() => value,
            _ => {
                return Err(Error::MalformedRow {
                    line: row.line,
                    reason: "missing id".to_string(),
                });
            }
        };
        if !seen.insert(id.clone()) {
            return Err(Error::DuplicateCardId { id, line: row.line });
        }

        cards.push(Card {
            id,
            data: data.unwrap_or_default(),
            status: status.unwrap_or_default(),
        });
    }

    Ok(cards)
}

/// Next id: one past the highest all-digit id in the file.
///
/// Ids of any other shape (hand-edited files) are preserved as cards but
/// do not advance the counter.
fn next_id(cards: &[Card]) -> Result<String> {
    let max = cards
        .iter()
        .filter(|card| card.id.bytes().all(|b| b.is_ascii_digit()))
        .filter_map(|card| card.id.parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    let next = max
        .checked_add(1)
        .ok_or_else(|| Error::OperationFailed("card id space exhausted".to_string()))?;
    Ok(next.to_string())
}
