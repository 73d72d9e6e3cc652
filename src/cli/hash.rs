//! cardfile hash command implementation
//!
//! Prints the digest a given user identifier would be stored under,
//! which is handy when eyeballing session logs.

use crate::error::{Error, Result};
use crate::session;

pub fn run(user: &str) -> Result<()> {
    let user = user.trim();
    if user.is_empty() {
        return Err(Error::InvalidArgument("user cannot be empty".to_string()));
    }

    println!("{}", session::hash_user_id(user));
    Ok(())
}
