//! # Configuration
//!
//! Persisted front-end settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Settings live at `~/.retronav/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.
//! Unlike a read-only config, these settings are edited from the menu and
//! written back through a [`SettingsStore`].

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::input::binds::BindKind;
use crate::input::types::ButtonId;

// ============================================================================
// Settings Structs (every section defaults independently for sparse TOML)
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub video: VideoSettings,
    #[serde(default)]
    pub audio: AudioSettings,
    #[serde(default)]
    pub menu: MenuSettings,
    #[serde(default)]
    pub paths: PathSettings,
    #[serde(default)]
    pub thumbnails: ThumbnailSettings,
    #[serde(default = "default_core_for_playlist")]
    pub core_for_playlist: BTreeMap<String, String>,
    #[serde(default, rename = "joypad")]
    pub joypads: Vec<JoypadConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct VideoSettings {
    pub fullscreen: bool,
    pub monitor_index: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AudioSettings {
    pub volume: f32,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            volume: DEFAULT_VOLUME,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MenuSettings {
    pub show_hidden_files: bool,
    /// Seconds between repeated moves while a direction is held.
    pub repeat_interval: f32,
}

impl Default for MenuSettings {
    fn default() -> Self {
        Self {
            show_hidden_files: true,
            repeat_interval: crate::core::repeat::DEFAULT_INTERVAL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PathSettings {
    pub cores_directory: PathBuf,
    pub playlists_directory: PathBuf,
    pub thumbnails_directory: PathBuf,
    pub savestates_directory: PathBuf,
    pub screenshots_directory: PathBuf,
}

impl Default for PathSettings {
    fn default() -> Self {
        let base = data_dir();
        Self {
            cores_directory: PathBuf::from("./cores"),
            playlists_directory: base.join("playlists"),
            thumbnails_directory: base.join("thumbnails"),
            savestates_directory: base.join("savestates"),
            screenshots_directory: base.join("screenshots"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ThumbnailSettings {
    pub server_url: String,
    pub timeout_secs: u64,
}

impl Default for ThumbnailSettings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_THUMBNAIL_SERVER.to_string(),
            timeout_secs: DEFAULT_THUMBNAIL_TIMEOUT_SECS,
        }
    }
}

/// Custom bind table for a controller, keyed by the name the device reports.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct JoypadConfig {
    pub name: String,
    #[serde(default)]
    pub binds: Vec<BindConfig>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BindConfig {
    pub kind: BindKind,
    pub index: usize,
    pub direction: Option<f32>,
    pub threshold: Option<f32>,
    pub button: ButtonId,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_VOLUME: f32 = 0.5;
pub const DEFAULT_THUMBNAIL_SERVER: &str = "http://thumbnails.libretro.com";
pub const DEFAULT_THUMBNAIL_TIMEOUT_SECS: u64 = 10;

fn default_core_for_playlist() -> BTreeMap<String, String> {
    [
        ("Atari - 2600", "stella_libretro"),
        ("Atari - 5200", "atari800_libretro"),
        ("Atari - 7800", "prosystem_libretro"),
        ("Atari - Jaguar", "virtualjaguar_libretro"),
        ("Atari - Lynx", "handy_libretro"),
        ("Atari - ST", "hatari_libretro"),
        ("Bandai - WonderSwan Color", "mednafen_wswan_libretro"),
        ("Bandai - WonderSwan", "mednafen_wswan_libretro"),
        ("Coleco - ColecoVision", "bluemsx_libretro"),
        ("GCE - Vectrex", "vecx_libretro"),
        ("NEC - PC Engine SuperGrafx", "mednafen_supergrafx_libretro"),
        ("NEC - PC Engine - TurboGrafx 16", "mednafen_pce_fast_libretro"),
        ("Nintendo - Game Boy Advance", "mgba_libretro"),
        ("Nintendo - Game Boy Color", "gambatte_libretro"),
        ("Nintendo - Game Boy", "gambatte_libretro"),
        ("Nintendo - Nintendo Entertainment System", "nestopia_libretro"),
        ("Nintendo - Super Nintendo Entertainment System", "snes9x_libretro"),
        ("Nintendo - Virtual Boy", "mednafen_vb_libretro"),
        ("Sega - 32X", "picodrive_libretro"),
        ("Sega - Game Gear", "genesis_plus_gx_libretro"),
        ("Sega - Master System - Mark III", "genesis_plus_gx_libretro"),
        ("Sega - Mega Drive - Genesis", "genesis_plus_gx_libretro"),
        ("Sega - PICO", "picodrive_libretro"),
        ("SNK - Neo Geo Pocket Color", "mednafen_ngp_libretro"),
        ("SNK - Neo Geo Pocket", "mednafen_ngp_libretro"),
        ("Sony - PlayStation", "mednafen_psx_libretro"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

impl Settings {
    /// Defaults including the built-in playlist → core table.
    pub fn with_defaults() -> Self {
        Self {
            core_for_playlist: default_core_for_playlist(),
            ..Default::default()
        }
    }

    /// Full path of the core assigned to a playlist, if any.
    pub fn core_for_playlist(&self, playlist: &str) -> Option<PathBuf> {
        self.core_for_playlist.get(playlist).map(|name| {
            self.paths
                .cores_directory
                .join(format!("{name}.{}", std::env::consts::DLL_EXTENSION))
        })
    }
}

/// `~/.retronav`, or the working directory if there is no home.
pub fn data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".retronav"))
        .unwrap_or_else(|| PathBuf::from("."))
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Serialize(toml::ser::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
            ConfigError::Serialize(e) => write!(f, "config serialize error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Persistence
// ============================================================================

/// Get/set access to the settings plus an explicit save.
pub trait SettingsStore {
    fn settings(&self) -> &Settings;
    fn settings_mut(&mut self) -> &mut Settings;
    fn save(&mut self) -> Result<(), ConfigError>;
}

/// Returns the path to `~/.retronav/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".retronav").join("config.toml"))
}

/// Settings backed by a TOML file.
#[derive(Debug)]
pub struct TomlSettingsStore {
    path: PathBuf,
    settings: Settings,
}

impl TomlSettingsStore {
    /// Loads settings from `path`.
    ///
    /// If the file doesn't exist, generates a commented-out default and
    /// starts from [`Settings::with_defaults`]. If it exists but is
    /// malformed, returns `ConfigError::Parse`.
    pub fn load(path: PathBuf) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!("No config file found, generating default at {}", path.display());
            generate_default_config(&path);
            return Ok(Self {
                path,
                settings: Settings::with_defaults(),
            });
        }

        let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
        let settings: Settings = toml::from_str(&contents).map_err(ConfigError::Parse)?;
        info!("Loaded config from {}", path.display());
        debug!("Settings: {:?}", settings);
        Ok(Self { path, settings })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for TomlSettingsStore {
    fn settings(&self) -> &Settings {
        &self.settings
    }

    fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Atomically writes the settings (via `.tmp` + rename).
    fn save(&mut self) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(&self.settings).map_err(ConfigError::Serialize)?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }
        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, contents).map_err(ConfigError::Io)?;
        fs::rename(&tmp_path, &self.path).map_err(ConfigError::Io)?;
        debug!("Saved settings to {}", self.path.display());
        Ok(())
    }
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# retronav configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.
# This file is rewritten when settings change from the menu.

# [video]
# fullscreen = false                # Or set RETRONAV_FULLSCREEN
# monitor_index = 0

# [audio]
# volume = 0.5                      # Or set RETRONAV_VOLUME

# [menu]
# show_hidden_files = true
# repeat_interval = 0.15            # Seconds between repeats while holding a direction

# [paths]
# cores_directory = "./cores"
# playlists_directory = "~/.retronav/playlists"
# thumbnails_directory = "~/.retronav/thumbnails"

# [thumbnails]
# server_url = "http://thumbnails.libretro.com"   # Or set RETRONAV_THUMBNAIL_SERVER
# timeout_secs = 10

# [core_for_playlist]
# "Nintendo - Super Nintendo Entertainment System" = "snes9x_libretro"

# [[joypad]]
# name = "8BitDo SN30 Pro"
# binds = [
#   { kind = "button", index = 0, button = "b" },
#   { kind = "axis", index = 1, direction = -1.0, threshold = -0.5, button = "up" },
# ]
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Overrides passed on the command line (None = not specified).
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub fullscreen: Option<bool>,
    pub volume: Option<f32>,
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("Ignoring {}: could not parse '{}'", name, raw);
            None
        }
    }
}

/// Applies env vars then CLI flags on top of the loaded settings.
pub fn resolve(settings: &mut Settings, cli: &CliOverrides) {
    // Fullscreen: CLI → env → config
    if let Some(fullscreen) = cli.fullscreen.or_else(|| env_parse("RETRONAV_FULLSCREEN")) {
        settings.video.fullscreen = fullscreen;
    }

    // Volume: CLI → env → config
    if let Some(volume) = cli.volume.or_else(|| env_parse("RETRONAV_VOLUME")) {
        settings.audio.volume = volume.clamp(0.0, 1.0);
    }

    // Thumbnail server: env → config
    if let Some(url) = env_parse::<String>("RETRONAV_THUMBNAIL_SERVER") {
        settings.thumbnails.server_url = url;
    }
}
