//! Game library and a preview core for running the menu in a terminal.
//!
//! Playlists are `.lpl` files in the classic six-line layout, one record
//! per game:
//!
//! ```text
//! /roms/gb/Tetris.gb      path
//! Tetris                  display name
//! DETECT                  core path
//! DETECT                  core name
//! 0|crc                   crc
//! Nintendo - Game Boy.lpl playlist file
//! ```
//!
//! The terminal cannot run emulated content, so [`PreviewCore`] only
//! tracks what a real core would hold (loaded core, game, frame count)
//! and writes placeholder save states.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::core::host::{CoreHost, Game, HostError, Library, PlaylistInfo};

const RECORD_LINES: usize = 6;
const PLAYLIST_EXTENSION: &str = "lpl";

// ============================================================================
// Playlists
// ============================================================================

pub struct PlaylistLibrary {
    dir: PathBuf,
}

impl PlaylistLibrary {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn read(path: &Path) -> Vec<Game> {
        let contents = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                warn!("Failed to read playlist {}: {}", path.display(), e);
                return Vec::new();
            }
        };
        let lines: Vec<&str> = contents.lines().collect();
        lines
            .chunks_exact(RECORD_LINES)
            .map(|record| Game {
                path: PathBuf::from(record[0]),
                name: record[1].to_string(),
            })
            .collect()
    }

    fn read_quiet(path: &Path) -> Vec<Game> {
        if path.exists() { Self::read(path) } else { Vec::new() }
    }

    fn playlist_files(&self) -> Vec<PathBuf> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("No playlists at {}: {}", self.dir.display(), e);
                return Vec::new();
            }
        };
        let mut files: Vec<PathBuf> = entries
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == PLAYLIST_EXTENSION))
            .collect();
        files.sort();
        files
    }
}

fn record(game: &Path, playlist_file: &str) -> String {
    let name = game
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{}\n{}\nDETECT\nDETECT\n0|crc\n{}\n", game.display(), name, playlist_file)
}

impl Library for PlaylistLibrary {
    fn playlists(&self) -> Vec<PlaylistInfo> {
        self.playlist_files()
            .into_iter()
            .map(|path| {
                let name = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let count = Self::read(&path).len();
                PlaylistInfo { name, path, count }
            })
            .collect()
    }

    fn games(&self, playlist: &Path) -> Vec<Game> {
        Self::read(playlist)
    }

    /// Appends each file to the playlist named after its parent directory.
    /// Files already in that playlist are skipped.
    fn import(&mut self, files: &[PathBuf]) -> Result<usize, HostError> {
        fs::create_dir_all(&self.dir)?;
        let mut added = 0;
        for file in files {
            let Some(system) = file
                .parent()
                .and_then(Path::file_name)
                .map(|n| n.to_string_lossy().into_owned())
            else {
                continue;
            };
            let playlist_file = format!("{system}.{PLAYLIST_EXTENSION}");
            let path = self.dir.join(&playlist_file);
            let known: HashSet<PathBuf> = Self::read_quiet(&path).into_iter().map(|g| g.path).collect();
            if known.contains(file) {
                continue;
            }
            let mut contents = fs::read_to_string(&path).unwrap_or_default();
            contents.push_str(&record(file, &playlist_file));
            fs::write(&path, contents)?;
            added += 1;
        }
        info!("Imported {} of {} scanned files", added, files.len());
        Ok(added)
    }
}

// ============================================================================
// Preview Core
// ============================================================================

/// Stand-in for the plugin core runtime.
#[derive(Debug)]
pub struct PreviewCore {
    savestates: PathBuf,
    core: Option<PathBuf>,
    game: Option<PathBuf>,
    frames: u64,
    volume: f32,
}

impl PreviewCore {
    pub fn new(savestates: PathBuf) -> Self {
        Self {
            savestates,
            core: None,
            game: None,
            frames: 0,
            volume: 1.0,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    fn state_path(&self) -> Result<PathBuf, HostError> {
        let game = self.game.as_deref().ok_or(HostError::NotRunning)?;
        let stem = game
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "game".to_string());
        Ok(self.savestates.join(format!("{stem}.state")))
    }
}

impl CoreHost for PreviewCore {
    fn is_running(&self) -> bool {
        self.game.is_some()
    }

    fn core_path(&self) -> Option<&Path> {
        self.core.as_deref()
    }

    fn game_path(&self) -> Option<&Path> {
        self.game.as_deref()
    }

    fn load_core(&mut self, path: &Path) -> Result<(), HostError> {
        if !path.is_file() {
            return Err(HostError::Core(format!("Core not found: {}", path.display())));
        }
        info!("Core loaded: {}", path.display());
        self.core = Some(path.to_path_buf());
        self.game = None;
        Ok(())
    }

    fn load_game(&mut self, path: &Path) -> Result<(), HostError> {
        if self.core.is_none() {
            return Err(HostError::Core("No core loaded.".to_string()));
        }
        if !path.is_file() {
            return Err(HostError::Core(format!("Game not found: {}", path.display())));
        }
        info!("Game loaded: {}", path.display());
        self.game = Some(path.to_path_buf());
        self.frames = 0;
        Ok(())
    }

    fn reset(&mut self) -> Result<(), HostError> {
        if self.game.is_none() {
            return Err(HostError::NotRunning);
        }
        self.frames = 0;
        Ok(())
    }

    fn save_state(&mut self) -> Result<PathBuf, HostError> {
        let path = self.state_path()?;
        fs::create_dir_all(&self.savestates)?;
        fs::write(&path, self.frames.to_le_bytes())?;
        Ok(path)
    }

    fn load_state(&mut self) -> Result<(), HostError> {
        let path = self.state_path()?;
        let bytes = fs::read(&path)?;
        let frames: [u8; 8] = bytes
            .try_into()
            .map_err(|_| HostError::Core(format!("Corrupt state: {}", path.display())))?;
        self.frames = u64::from_le_bytes(frames);
        Ok(())
    }

    fn screenshot(&mut self) -> Result<PathBuf, HostError> {
        Err(HostError::Core("Screenshots are not supported in the terminal.".to_string()))
    }

    fn run_frame(&mut self) {
        self.frames += 1;
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }
}
