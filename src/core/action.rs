//! # Effects
//!
//! Everything a scene can ask the front-end to do becomes an `Effect`.
//! User confirms "Load State"? That's `Effect::LoadState`.
//! A playlist entry is picked? That's `Effect::LaunchGame { .. }`.
//!
//! Scenes never touch the core, the window or the settings store directly.
//! They push effects, and the frontend executes them after the scene's
//! update returns. I/O happens there, not here.
//!
//! ```text
//! Scene::update(input)  →  Vec<Effect>  →  Frontend::apply()  →  collaborators
//! ```

use std::path::PathBuf;

use crate::core::config::Settings;
use crate::core::host::{CoreOption, PlaylistInfo};

/// A wifi network as reported by the network manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Network {
    pub ssid: String,
    /// Service identifier used to connect, e.g. `wifi_0012_..._managed_psk`.
    pub path: String,
    pub status: String,
}

/// What an explorer does with a selected file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplorerAction {
    LoadCore,
    LoadGame,
    Scan,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorerRequest {
    pub path: PathBuf,
    /// Only files with these extensions are listed (None = all files).
    pub extensions: Option<Vec<String>>,
    pub action: ExplorerAction,
    /// Adds a leading "<Scan this directory>" entry.
    pub scan_entry: bool,
}

/// What the on-screen keyboard's value is for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyboardPurpose {
    /// Wifi passphrase; submitting connects to the network.
    Passphrase(Network),
}

/// Scenes the frontend knows how to build.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneRequest {
    Tabs,
    MainMenu,
    QuickMenu,
    Settings,
    CoreOptions,
    Playlist(PlaylistInfo),
    Explorer(ExplorerRequest),
    Keyboard { label: String, purpose: KeyboardPurpose },
    Network,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Push(SceneRequest),
    Pop,
    Quit,
    ResumeContent,
    ResetContent,
    SaveState,
    LoadState,
    Screenshot,
    LoadCore(PathBuf),
    LoadGame(PathBuf),
    /// Load a playlist game with the playlist's core, then show the quick menu.
    LaunchGame { playlist: String, game: PathBuf },
    ScanDirectory(PathBuf),
    ConnectNetwork { network: Network, passphrase: String },
    SettingsChanged(Settings),
    CoreOptionsChanged(Vec<CoreOption>),
    Notify { prefix: String, message: String },
    /// Resolve every pending tween now.
    FastForward,
}

impl Effect {
    pub fn notify(prefix: &str, message: impl Into<String>) -> Self {
        Effect::Notify {
            prefix: prefix.to_string(),
            message: message.into(),
        }
    }
}
