//! # TUI Adapter
//!
//! Runs the navigation core in a terminal. This is the only module that
//! knows about ratatui and crossterm; the frontend only sees the host
//! traits implemented here.
//!
//! ```text
//!   crossterm events ──► KeyState (DeviceLayer)
//!                              │
//!                              ▼
//!                     Frontend::tick(dt, host)
//!                              │
//!                              ▼
//!   ratatui frame  ◄── TerminalRenderer (Renderer)
//! ```
//!
//! ## Frame Pacing
//!
//! The loop runs at a fixed rate. Events are read until the frame deadline,
//! then the frontend ticks once and the off-screen buffer is drawn. Tweens
//! need a steady `dt`, so unlike an idle-aware redraw loop this one never
//! sleeps longer than a frame.

pub mod event;
pub mod library;
pub mod terminal;

use log::{info, warn};
use std::io::stdout;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::core::config::SettingsStore;
use crate::core::host::Window;
use crate::frontend::{Frontend, Host};
use crate::producers::network::ConnmanManager;
use crate::tui::event::{KeyState, TuiEvent, poll_event_timeout};
use crate::tui::library::{PlaylistLibrary, PreviewCore};
use crate::tui::terminal::{TerminalRenderer, TerminalWindow};

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Release events need the kitty keyboard protocol. Terminals without
        // it ignore the request and KeyState falls back to synthetic holds.
        execute!(
            stdout(),
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), PopKeyboardEnhancementFlags);
    }
}

/// Runs the menu until the user quits.
pub fn run(settings: Box<dyn SettingsStore>, fps: u32) -> std::io::Result<()> {
    let paths = settings.settings().paths.clone();
    let fullscreen = settings.settings().video.fullscreen;

    let mut library = PlaylistLibrary::new(paths.playlists_directory.clone());
    let mut core = PreviewCore::new(paths.savestates_directory.clone());
    let network = Arc::new(ConnmanManager::default());
    let mut frontend = Frontend::new(settings, network);

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = match TerminalModeGuard::new() {
        Ok(guard) => Some(guard),
        Err(e) => {
            warn!("Keyboard enhancement unavailable: {}", e);
            None
        }
    };

    let size = terminal.size()?;
    let mut window = TerminalWindow::new(size.width, size.height, fullscreen);
    let mut renderer = TerminalRenderer::new(size.width, size.height);
    let mut keys = KeyState::new();

    frontend.start(&mut Host {
        devices: &keys,
        window: &mut window,
        core: &mut core,
        library: &mut library,
        renderer: &mut renderer,
    });

    let frame = Duration::from_secs_f64(1.0 / fps.max(1) as f64);
    let mut last = Instant::now();

    let result = loop {
        let deadline = last + frame;
        let mut force_quit = false;
        while let Some(remaining) = deadline.checked_duration_since(Instant::now()) {
            let Some(event) = poll_event_timeout(remaining) else {
                continue;
            };
            match event {
                TuiEvent::ForceQuit => force_quit = true,
                TuiEvent::Resize(cols, rows) => {
                    window.resize(cols, rows);
                    renderer.resize(cols, rows);
                }
                TuiEvent::Press(_) | TuiEvent::Release(_) => keys.apply(&event),
            }
        }
        if force_quit {
            info!("Quit requested from terminal");
            break Ok(());
        }

        let now = Instant::now();
        let dt = now.duration_since(last).as_secs_f32();
        last = now;

        renderer.clear();
        frontend.tick(
            dt,
            &mut Host {
                devices: &keys,
                window: &mut window,
                core: &mut core,
                library: &mut library,
                renderer: &mut renderer,
            },
        );
        keys.end_frame();

        if let Err(e) = terminal.draw(|f| f.render_widget(&renderer, f.area())) {
            break Err(e);
        }
        if window.should_close() {
            info!("Window closed after {} content frames", core.frames());
            break Ok(());
        }
    };

    ratatui::restore();
    result
}

/// Where the default config lives, for `--config` help text.
pub fn default_config_path() -> PathBuf {
    crate::core::config::config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
}
