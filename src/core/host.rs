//! # Host Collaborators
//!
//! Narrow interfaces into the parts of the front-end this crate does not
//! own: the window, the emulator core runtime and the game library.
//!
//! ```text
//!              ┌──────────────┐
//!              │   Frontend   │
//!              └──────┬───────┘
//!      ┌──────────────┼──────────────┐
//!      ▼              ▼              ▼
//!   Window        CoreHost        Library
//!  (video)     (plugin core)   (playlists)
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

/// Errors reported by host collaborators. These never abort a tick; the
/// frontend turns them into notifications.
#[derive(Debug)]
pub enum HostError {
    /// Filesystem or OS failure.
    Io(std::io::Error),
    /// The core refused an operation (bad ROM, missing symbol, ...).
    Core(String),
    /// An operation that needs a running game was called without one.
    NotRunning,
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostError::Io(e) => write!(f, "I/O error: {e}"),
            HostError::Core(msg) => write!(f, "{msg}"),
            HostError::NotRunning => write!(f, "No game is running."),
        }
    }
}

impl std::error::Error for HostError {}

impl From<std::io::Error> for HostError {
    fn from(e: std::io::Error) -> Self {
        HostError::Io(e)
    }
}

/// The host window and its graphics backend.
pub trait Window {
    fn framebuffer_size(&self) -> (u32, u32);
    fn set_should_close(&mut self, close: bool);
    fn should_close(&self) -> bool;
    /// Re-creates the video mode after a fullscreen or monitor change.
    fn reconfigure(&mut self, fullscreen: bool, monitor: u32);
    fn monitor_count(&self) -> u32 {
        1
    }
}

/// A core option exposed by the running core.
#[derive(Debug, Clone, PartialEq)]
pub struct CoreOption {
    pub key: String,
    pub description: String,
    pub choices: Vec<String>,
    pub selected: usize,
}

/// The plugin-core runtime.
pub trait CoreHost {
    fn is_running(&self) -> bool;
    fn core_path(&self) -> Option<&Path>;
    fn game_path(&self) -> Option<&Path>;
    fn load_core(&mut self, path: &Path) -> Result<(), HostError>;
    fn load_game(&mut self, path: &Path) -> Result<(), HostError>;
    fn reset(&mut self) -> Result<(), HostError>;
    fn save_state(&mut self) -> Result<PathBuf, HostError>;
    fn load_state(&mut self) -> Result<(), HostError>;
    fn screenshot(&mut self) -> Result<PathBuf, HostError>;
    /// Runs the emulated content for one frame.
    fn run_frame(&mut self);
    fn set_volume(&mut self, volume: f32);
    fn options(&self) -> Vec<CoreOption> {
        Vec::new()
    }
    fn set_options(&mut self, _options: &[CoreOption]) {}
}

/// A playlist summary for the home tabs.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistInfo {
    /// Playlist name, e.g. "Nintendo - Game Boy". Also the thumbnail system.
    pub name: String,
    pub path: PathBuf,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Game {
    pub name: String,
    pub path: PathBuf,
}

/// Read access to the game library.
pub trait Library {
    fn playlists(&self) -> Vec<PlaylistInfo>;
    fn games(&self, playlist: &Path) -> Vec<Game>;
    /// Adds files found by a directory scan. Returns how many were new.
    fn import(&mut self, _files: &[PathBuf]) -> Result<usize, HostError> {
        Ok(0)
    }
}
