use std::error::Error;
use std::fmt;

use crate::record::LocalKey;

/// Failure talking to a remote store.
///
/// Persistence is optimistic: in-memory state already reflects the attempted
/// change when one of these is returned, and nothing is rolled back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store was unreachable or the connection failed mid-flight.
    Transport(String),
    /// The store answered with a non-2xx status.
    Rejected { status: u16 },
    /// The response body could not be decoded.
    Decode(String),
    /// In-process store lock poisoned (MemoryStore only).
    LockPoisoned(&'static str),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Transport(detail) => write!(f, "store unreachable: {}", detail),
            StoreError::Rejected { status } => write!(f, "store rejected request (status {})", status),
            StoreError::Decode(detail) => write!(f, "undecodable store response: {}", detail),
            StoreError::LockPoisoned(operation) => {
                write!(f, "store lock poisoned during {}", operation)
            }
        }
    }
}

impl Error for StoreError {}

/// Failure of a collection operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListError {
    /// No member with this key (never existed, or already destroyed).
    UnknownRecord(LocalKey),
    /// The local mutation was applied but persistence failed.
    Store(StoreError),
}

impl fmt::Display for ListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListError::UnknownRecord(key) => write!(f, "unknown record {}", key),
            ListError::Store(err) => write!(f, "persistence failed: {}", err),
        }
    }
}

impl Error for ListError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ListError::Store(err) => Some(err),
            ListError::UnknownRecord(_) => None,
        }
    }
}

impl From<StoreError> for ListError {
    fn from(err: StoreError) -> Self {
        ListError::Store(err)
    }
}
