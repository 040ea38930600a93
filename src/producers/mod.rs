//! # Background Producers
//!
//! Work that must not block the frame: directory listings, library scans,
//! thumbnail downloads and wifi scans. Each producer runs as a tokio task
//! (or `spawn_blocking` for filesystem walks) and reports through a
//! `std::sync::mpsc::Sender` whose receiver is owned by the scene or the
//! frontend. The receiver side drains with `try_recv` once per tick.
//!
//! ```text
//! Scene ──spawn(tx)──► tokio task ──tx.send(msg)──► rx (owned by Scene)
//!                                                     │ try_recv in drain()
//!                                                     ▼
//!                                               applied on next tick
//! ```
//!
//! When the owning scene is disposed its receiver is dropped. The next send
//! fails, the producer logs it and stops writing. In-flight tasks are not
//! aborted.

pub mod directory;
pub mod network;
pub mod thumbnails;

use std::fmt;

/// Errors from background producers. Never fatal: they end up as
/// notifications or as a "broken" placeholder.
#[derive(Debug)]
pub enum ProducerError {
    /// Filesystem failure (listing, cache write, connman settings file).
    Io(std::io::Error),
    /// Transport failure (timeout, DNS, connection refused).
    Network(String),
    /// Server answered with a non-success status.
    Http { status: u16 },
    /// An external command failed or exited non-zero.
    Command(String),
}

impl fmt::Display for ProducerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProducerError::Io(e) => write!(f, "I/O error: {e}"),
            ProducerError::Network(msg) => write!(f, "network error: {msg}"),
            ProducerError::Http { status } => write!(f, "HTTP error {status}"),
            ProducerError::Command(msg) => write!(f, "command failed: {msg}"),
        }
    }
}

impl std::error::Error for ProducerError {}

impl From<std::io::Error> for ProducerError {
    fn from(e: std::io::Error) -> Self {
        ProducerError::Io(e)
    }
}

impl From<reqwest::Error> for ProducerError {
    fn from(e: reqwest::Error) -> Self {
        ProducerError::Network(e.to_string())
    }
}

/// True when called from inside a tokio runtime, where producers can be
/// spawned.
pub fn runtime_available() -> bool {
    tokio::runtime::Handle::try_current().is_ok()
}
