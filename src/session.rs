//! Session identifier hashing and the in-process session registry
//!
//! A session never stores the raw user identifier, only its SHA-256
//! digest. The registry itself lives in process memory keyed by a random
//! sid carried in one cookie; restarting the server signs everyone out,
//! which is the whole of the authentication story here.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Hash a raw user identifier for session storage.
pub fn hash_user_id(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    hex::encode(hasher.finalize())
}

/// Longest accepted session lifetime.
///
/// `expires_at = now + ttl` has to stay inside the representable
/// datetime range, so the lifetime is capped well short of it.
const MAX_TTL_DAYS: i64 = 36_525; // a century

/// Parse a session TTL (e.g. "12h", "30m", "7d").
///
/// A bare number is minutes. Anything past a century is out of range.
pub fn parse_ttl(s: &str) -> Result<Duration> {
    let s = s.trim();

    if s.is_empty() {
        return Err(Error::InvalidArgument("ttl cannot be empty".to_string()));
    }

    // Find where the number ends and the unit begins
    let (num_str, unit) = if let Some(pos) = s.find(|c: char| !c.is_ascii_digit()) {
        (&s[..pos], &s[pos..])
    } else {
        // Assume minutes if no unit
        (s, "m")
    };

    let num: i64 = num_str
        .parse()
        .map_err(|_| Error::InvalidArgument(format!("invalid ttl number: {num_str}")))?;

    // The plain constructors panic on overflow; the try_ ones report it
    let duration = match unit.to_lowercase().as_str() {
        "s" | "sec" | "second" | "seconds" => Duration::try_seconds(num),
        "m" | "min" | "minute" | "minutes" => Duration::try_minutes(num),
        "h" | "hr" | "hour" | "hours" => Duration::try_hours(num),
        "d" | "day" | "days" => Duration::try_days(num),
        "w" | "week" | "weeks" => Duration::try_weeks(num),
        _ => {
            return Err(Error::InvalidArgument(format!(
                "invalid ttl unit '{unit}'. Expected: s, m, h, d, w"
            )));
        }
    };

    match duration {
        Some(duration) if duration <= Duration::days(MAX_TTL_DAYS) => Ok(duration),
        _ => Err(Error::InvalidArgument(format!("ttl '{s}' is out of range"))),
    }
}

/// A live session
#[derive(Debug, Clone)]
pub struct Session {
    /// Hashed user identifier (never the raw one)
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// In-process session registry keyed by sid cookie value
#[derive(Debug)]
pub struct SessionStore {
    ttl: Duration,
    sessions: Mutex<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Mint a session for a hashed user id, returning the new sid.
    ///
    /// Also sweeps expired entries: logins are the only source of new
    /// ones, so sweeping here keeps the registry bounded even for sids
    /// that are abandoned and never presented again.
    pub fn create(&self, user_id: &str) -> String {
        let sid = Uuid::new_v4().to_string();
        let now = Utc::now();
        let session = Session {
            user_id: user_id.to_string(),
            created_at: now,
            expires_at: now + self.ttl,
        };
        let mut sessions = self.lock();
        sessions.retain(|_, entry| entry.expires_at > now);
        sessions.insert(sid.clone(), session);
        sid
    }

    /// Look up a live session. An expired entry is swept and reported
    /// exactly like an unknown sid.
    pub fn get(&self, sid: &str) -> Option<Session> {
        let mut sessions = self.lock();
        match sessions.get(sid) {
            Some(session) if session.expires_at > Utc::now() => Some(session.clone()),
            Some(_) => {
                sessions.remove(sid);
                None
            }
            None => None,
        }
    }

    /// Drop a session. Returns whether it existed.
    pub fn destroy(&self, sid: &str) -> bool {
        self.lock().remove(sid).is_some()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Session>> {
        // A poisoned registry still holds valid data; keep serving it
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Pull a named cookie out of a Cookie header value.
pub fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|part| {
        let (key, value) = part.trim().split_once('=')?;
        (key == name).then_some(value)
    })
}

/// Build the Set-Cookie value that installs a sid.
pub fn session_cookie(name: &str, sid: &str) -> String {
    format!("{name}={sid}; Path=/; HttpOnly; SameSite=Lax")
}

/// Build the Set-Cookie value that clears the sid cookie.
pub fn clear_cookie(name: &str) -> String {
    format!("{name}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}
