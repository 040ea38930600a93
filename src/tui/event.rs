//! Terminal key events and the held-key state fed to the input aggregator.
//!
//! Terminals that speak the kitty keyboard protocol report key releases.
//! Others only send presses and auto-repeats, so a press without a release
//! is treated as held for a few frames and refreshed by each repeat.

use std::collections::HashMap;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::input::aggregator::DeviceLayer;
use crate::input::types::{Key, PadSnapshot};

/// Frames a press stays held when the terminal never reports releases.
const SYNTHETIC_HOLD_FRAMES: u32 = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TuiEvent {
    Press(Key),
    Release(Key),
    Resize(u16, u16),
    /// Ctrl+C
    ForceQuit,
}

pub fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Char(c) => Some(Key::Char(c.to_ascii_lowercase())),
        KeyCode::Up => Some(Key::Up),
        KeyCode::Down => Some(Key::Down),
        KeyCode::Left => Some(Key::Left),
        KeyCode::Right => Some(Key::Right),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Backspace => Some(Key::Backspace),
        KeyCode::Esc => Some(Key::Escape),
        _ => None,
    }
}

pub fn translate(event: Event) -> Option<TuiEvent> {
    match event {
        Event::Key(KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            ..
        }) => Some(TuiEvent::ForceQuit),
        Event::Key(key_event) => {
            log::debug!("Key event: {:?} ({:?})", key_event.code, key_event.kind);
            let key = map_key(key_event.code)?;
            match key_event.kind {
                KeyEventKind::Press | KeyEventKind::Repeat => Some(TuiEvent::Press(key)),
                KeyEventKind::Release => Some(TuiEvent::Release(key)),
            }
        }
        Event::Resize(w, h) => Some(TuiEvent::Resize(w, h)),
        _ => None,
    }
}

/// Waits up to `timeout` for the next event we care about. Read errors are
/// logged and treated as no event.
pub fn poll_event_timeout(timeout: Duration) -> Option<TuiEvent> {
    match event::poll(timeout) {
        Ok(true) => match event::read() {
            Ok(ev) => translate(ev),
            Err(e) => {
                log::warn!("Failed to read terminal event: {}", e);
                None
            }
        },
        Ok(false) => None,
        Err(e) => {
            log::warn!("Failed to poll terminal events: {}", e);
            None
        }
    }
}

/// Keyboard state as seen by the aggregator. Never reports controllers.
#[derive(Debug, Default)]
pub struct KeyState {
    /// Held keys, with the remaining synthetic hold in frames.
    held: HashMap<Key, u32>,
    releases_reported: bool,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, event: &TuiEvent) {
        match event {
            TuiEvent::Press(key) => {
                self.held.insert(*key, SYNTHETIC_HOLD_FRAMES);
            }
            TuiEvent::Release(key) => {
                self.releases_reported = true;
                self.held.remove(key);
            }
            TuiEvent::Resize(..) | TuiEvent::ForceQuit => {}
        }
    }

    /// Ages synthetic holds. Call once per tick, after the frontend polled.
    pub fn end_frame(&mut self) {
        if self.releases_reported {
            return;
        }
        for frames in self.held.values_mut() {
            *frames = frames.saturating_sub(1);
        }
        self.held.retain(|_, frames| *frames > 0);
    }
}

impl DeviceLayer for KeyState {
    fn key_down(&self, key: Key) -> bool {
        self.held.contains_key(&key)
    }

    fn pad(&self, _slot: usize) -> Option<PadSnapshot> {
        None
    }
}
