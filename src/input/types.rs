//! # Input Types
//!
//! Logical buttons, per-player frames and the edges derived from them.
//!
//! ```text
//! InputFrame  [player 0..5][ButtonId 0..COUNT]  bool "held"
//!
//!   old ─┐
//!        ├─► Edges::between ─► pressed  = new && !old
//!   new ─┘                     released = !new && old
//! ```

use serde::{Deserialize, Serialize};

/// Number of player slots polled each frame.
pub const MAX_PLAYERS: usize = 5;

/// Normalized logical controls.
///
/// The joypad variants are ordered so that the discriminant matches the
/// libretro `RETRO_DEVICE_ID_JOYPAD_*` id, which lets the input-state query
/// index the frame directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonId {
    B = 0,
    Y,
    Select,
    Start,
    Up,
    Down,
    Left,
    Right,
    A,
    X,
    L,
    R,
    L2,
    R2,
    L3,
    R3,
    // Menu-only actions, never reported to the content.
    MenuToggle,
    FullscreenToggle,
    Quit,
}

impl ButtonId {
    /// End-of-range sentinel used for array sizing.
    pub const COUNT: usize = ButtonId::Quit as usize + 1;

    /// Number of buttons visible to emulated content.
    pub const JOYPAD_COUNT: usize = ButtonId::R3 as usize + 1;

    pub const ALL: [ButtonId; ButtonId::COUNT] = [
        ButtonId::B,
        ButtonId::Y,
        ButtonId::Select,
        ButtonId::Start,
        ButtonId::Up,
        ButtonId::Down,
        ButtonId::Left,
        ButtonId::Right,
        ButtonId::A,
        ButtonId::X,
        ButtonId::L,
        ButtonId::R,
        ButtonId::L2,
        ButtonId::R2,
        ButtonId::L3,
        ButtonId::R3,
        ButtonId::MenuToggle,
        ButtonId::FullscreenToggle,
        ButtonId::Quit,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Which logical buttons are held, per player slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputFrame {
    held: [[bool; ButtonId::COUNT]; MAX_PLAYERS],
}

impl InputFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false for player slots outside `0..MAX_PLAYERS`.
    pub fn get(&self, player: usize, button: ButtonId) -> bool {
        self.held
            .get(player)
            .map(|row| row[button.index()])
            .unwrap_or(false)
    }

    pub fn set(&mut self, player: usize, button: ButtonId, held: bool) {
        if let Some(row) = self.held.get_mut(player) {
            row[button.index()] = held;
        }
    }

    pub fn clear(&mut self) {
        self.held = [[false; ButtonId::COUNT]; MAX_PLAYERS];
    }

    /// True when any button of the given player is held.
    pub fn any(&self, player: usize) -> bool {
        self.held
            .get(player)
            .map(|row| row.iter().any(|&b| b))
            .unwrap_or(false)
    }
}

/// Press/release transitions between two consecutive frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Edges {
    pub pressed: InputFrame,
    pub released: InputFrame,
}

impl Edges {
    pub fn between(old: &InputFrame, new: &InputFrame) -> Self {
        let mut edges = Edges::default();
        for p in 0..MAX_PLAYERS {
            for b in ButtonId::ALL {
                let (n, o) = (new.get(p, b), old.get(p, b));
                edges.pressed.set(p, b, n && !o);
                edges.released.set(p, b, !n && o);
            }
        }
        edges
    }
}

/// Keyboard keys the front-end binds. Anything else is ignored by the
/// aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Up,
    Down,
    Left,
    Right,
    Enter,
    Backspace,
    Escape,
}

/// Raw state of one connected controller as reported by the device layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PadSnapshot {
    pub name: String,
    pub buttons: Vec<bool>,
    pub axes: Vec<f32>,
}
