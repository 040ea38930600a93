//! # Bind Tables
//!
//! Maps physical controls to logical [`ButtonId`]s.
//!
//! Controllers are identified by the name string the device layer reports.
//! A name with no table contributes nothing: that is how unsupported pads
//! (and pads that are detected but send garbage) are handled, not an error.
//!
//! Axis binds use a single formula for both directions:
//!
//! ```text
//! held = direction * value > threshold * direction
//! ```
//!
//! A "push down" bind on a stick therefore uses `direction = -1` and a
//! negative threshold.

use std::collections::HashMap;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::types::{ButtonId, Key, PadSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BindKind {
    Button,
    Axis,
}

/// One physical control descriptor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bind {
    pub kind: BindKind,
    pub index: usize,
    pub direction: f32,
    pub threshold: f32,
}

impl Bind {
    pub const fn button(index: usize) -> Self {
        Self {
            kind: BindKind::Button,
            index,
            direction: 0.0,
            threshold: 0.0,
        }
    }

    pub const fn axis(index: usize, direction: f32, threshold: f32) -> Self {
        Self {
            kind: BindKind::Axis,
            index,
            direction,
            threshold,
        }
    }

    /// Evaluates the bind against a snapshot. Indices the pad does not
    /// report are never held.
    pub fn is_held(&self, pad: &PadSnapshot) -> bool {
        match self.kind {
            BindKind::Button => pad.buttons.get(self.index).copied().unwrap_or(false),
            BindKind::Axis => pad
                .axes
                .get(self.index)
                .map(|&v| self.direction * v > self.threshold * self.direction)
                .unwrap_or(false),
        }
    }
}

/// Ordered bind list for one device. A control may feed several buttons.
pub type BindTable = Vec<(Bind, ButtonId)>;

// ============================================================================
// Built-in Tables
// ============================================================================

fn xbox_binds() -> BindTable {
    vec![
        (Bind::button(0), ButtonId::B),
        (Bind::button(1), ButtonId::A),
        (Bind::button(2), ButtonId::Y),
        (Bind::button(3), ButtonId::X),
        (Bind::button(4), ButtonId::L),
        (Bind::button(5), ButtonId::R),
        (Bind::button(6), ButtonId::Select),
        (Bind::button(7), ButtonId::Start),
        (Bind::button(8), ButtonId::L3),
        (Bind::button(9), ButtonId::R3),
        (Bind::button(10), ButtonId::Up),
        (Bind::button(11), ButtonId::Right),
        (Bind::button(12), ButtonId::Down),
        (Bind::button(13), ButtonId::Left),
        (Bind::axis(4, 1.0, 0.0), ButtonId::L2),
        (Bind::axis(5, 1.0, 0.0), ButtonId::R2),
    ]
}

fn ds4_binds() -> BindTable {
    vec![
        (Bind::button(0), ButtonId::X),
        (Bind::button(1), ButtonId::B),
        (Bind::button(2), ButtonId::A),
        (Bind::button(3), ButtonId::Y),
        (Bind::button(4), ButtonId::L),
        (Bind::button(5), ButtonId::R),
        (Bind::button(4), ButtonId::L2),
        (Bind::button(5), ButtonId::R2),
        (Bind::button(6), ButtonId::Select),
        (Bind::button(7), ButtonId::Start),
        (Bind::button(8), ButtonId::L3),
        (Bind::button(9), ButtonId::R3),
        (Bind::button(10), ButtonId::MenuToggle),
        (Bind::button(14), ButtonId::Up),
        (Bind::button(15), ButtonId::Right),
        (Bind::button(16), ButtonId::Down),
        (Bind::button(17), ButtonId::Left),
        (Bind::axis(3, 1.0, 0.0), ButtonId::L2),
        (Bind::axis(4, 1.0, 0.0), ButtonId::R2),
    ]
}

/// Keyboard always feeds player slot 0.
pub const KEY_BINDS: [(Key, ButtonId); 13] = [
    (Key::Char('x'), ButtonId::A),
    (Key::Char('z'), ButtonId::B),
    (Key::Char('a'), ButtonId::Y),
    (Key::Char('s'), ButtonId::X),
    (Key::Up, ButtonId::Up),
    (Key::Down, ButtonId::Down),
    (Key::Left, ButtonId::Left),
    (Key::Right, ButtonId::Right),
    (Key::Enter, ButtonId::Start),
    (Key::Backspace, ButtonId::Select),
    (Key::Char('p'), ButtonId::MenuToggle),
    (Key::Char('f'), ButtonId::FullscreenToggle),
    (Key::Escape, ButtonId::Quit),
];

// ============================================================================
// Registry
// ============================================================================

/// Bind tables keyed by device name.
#[derive(Debug, Clone, Default)]
pub struct BindRegistry {
    tables: HashMap<String, BindTable>,
    empty: BindTable,
}

impl BindRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the controllers the front-end knows about.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.insert("Microsoft X-Box 360 pad", xbox_binds());
        registry.insert("Xbox 360 Controller", xbox_binds());
        registry.insert("Xbox Controller", xbox_binds());
        registry.insert("Wireless Controller", ds4_binds());
        // Detected, but reports nothing usable.
        registry.insert("PLAYSTATION(R)3 Controller", BindTable::new());
        registry
    }

    /// Adds or replaces the table for `name`.
    pub fn insert(&mut self, name: impl Into<String>, table: BindTable) {
        let name = name.into();
        debug!("Registering {} binds for '{}'", table.len(), name);
        self.tables.insert(name, table);
    }

    /// Looks up a table; unknown names get the empty table.
    pub fn table(&self, name: &str) -> &BindTable {
        self.tables.get(name).unwrap_or(&self.empty)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Merges tables declared in the config file. Config wins over the
    /// built-in table of the same name.
    pub fn extend_from_config(&mut self, pads: &[crate::core::config::JoypadConfig]) {
        for pad in pads {
            let table: BindTable = pad
                .binds
                .iter()
                .map(|b| {
                    let bind = match b.kind {
                        BindKind::Button => Bind::button(b.index),
                        BindKind::Axis => Bind::axis(
                            b.index,
                            b.direction.unwrap_or(1.0),
                            b.threshold.unwrap_or(0.0),
                        ),
                    };
                    (bind, b.button)
                })
                .collect();
            info!("Loaded custom binds for '{}' from config", pad.name);
            self.insert(pad.name.clone(), table);
        }
    }
}
