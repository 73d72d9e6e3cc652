//! cardfile - a session-authenticated todo board over one CSV file
//!
//! The card file is the sole store: every request re-reads it and every
//! mutation rewrites it atomically. The web layer renders the file as a
//! board and exposes add/update/delete as plain-text endpoints; a hashed
//! user identifier carried in a server-side session gates all of them.
//!
//! # Module Organization
//!
//! - `cli`: command-line interface using clap
//! - `config`: configuration loading from `cardfile.toml`
//! - `error`: error types and result aliases
//! - `csv`: key-value row codec for the card file
//! - `card`: card model and the file-backed store
//! - `session`: identifier hashing and the in-process session registry
//! - `page`: HTML for the login and board pages
//! - `server`: shared state, router assembly, and the serve loop
//! - `routes`: HTTP handlers
//! - `lock`: file locking and atomic writes

pub mod card;
pub mod cli;
pub mod config;
pub mod csv;
pub mod error;
pub mod lock;
pub mod page;
pub mod routes;
pub mod server;
pub mod session;

pub use error::{Error, Result};
