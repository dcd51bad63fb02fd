//! Visitor identity

use std::{fmt, iter, sync::Mutex};

use jiff::Timestamp;
use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

const SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 9;

/// Pseudo-random visitor identifier, e.g. `user_1700000000000_k3j9x0a2m`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Generate a fresh id from the current time and a random base-36 suffix.
    pub fn generate() -> Self {
        Self::generate_with(Timestamp::now(), &mut rand::thread_rng())
    }

    /// Generate an id for a given instant and random source.
    pub fn generate_with<R: Rng + ?Sized>(now: Timestamp, rng: &mut R) -> Self {
        let suffix: String = iter::repeat_with(|| SUFFIX_ALPHABET.choose(&mut *rng))
            .flatten()
            .take(SUFFIX_LEN)
            .map(|&byte| char::from(byte))
            .collect();

        Self(format!("user_{}_{suffix}", now.as_millisecond()))
    }

    /// Wrap an id read back from storage.
    pub fn from_stored(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors raised by a [`UserIdStore`].
#[derive(Debug, Error)]
pub enum UserIdError {
    /// Reading or writing the backing file failed.
    #[error("user id storage io error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing store is unavailable or refused the operation.
    #[error("user id storage unavailable: {0}")]
    Unavailable(String),
}

/// Somewhere the visitor id survives between page loads.
pub trait UserIdStore {
    /// Read the stored id, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn load(&self) -> Result<Option<UserId>, UserIdError>;

    /// Persist the id.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn save(&self, user_id: &UserId) -> Result<(), UserIdError>;
}

/// In-process store, forgotten on exit.
#[derive(Debug, Default)]
pub struct MemoryUserIdStore {
    user_id: Mutex<Option<UserId>>,
}

impl MemoryUserIdStore {
    /// Create a store that already holds `user_id`.
    pub fn with_user_id(user_id: UserId) -> Self {
        Self {
            user_id: Mutex::new(Some(user_id)),
        }
    }
}

impl UserIdStore for MemoryUserIdStore {
    fn load(&self) -> Result<Option<UserId>, UserIdError> {
        self.user_id
            .lock()
            .map(|guard| guard.clone())
            .map_err(|error| UserIdError::Unavailable(error.to_string()))
    }

    fn save(&self, user_id: &UserId) -> Result<(), UserIdError> {
        let mut guard = self
            .user_id
            .lock()
            .map_err(|error| UserIdError::Unavailable(error.to_string()))?;

        *guard = Some(user_id.clone());

        Ok(())
    }
}

/// Return the stored visitor id, creating and saving one on first use.
///
/// Storage failures never prevent an id from being returned; an id that could
/// not be saved is used for this call only.
pub fn resolve_user_id<S: UserIdStore + ?Sized>(store: &S) -> UserId {
    match store.load() {
        Ok(Some(user_id)) => return user_id,
        Ok(None) => {}
        Err(error) => warn!(%error, "failed to read stored user id"),
    }

    let user_id = UserId::generate();

    debug!(user_id = %user_id, "generated new user id");

    if let Err(error) = store.save(&user_id) {
        warn!(%error, "failed to persist user id");
    }

    user_id
}
