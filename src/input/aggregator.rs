//! # Input Aggregator
//!
//! Polls the keyboard and every controller slot once per tick and folds
//! them into a single [`InputFrame`], then derives [`Edges`] against the
//! previous frame.
//!
//! ```text
//! DeviceLayer ──► pads (slot 0..5, via BindRegistry) ─┐
//!             └─► keyboard (always slot 0) ──────────┴─► InputFrame ─► Edges
//! ```

use log::{debug, info};

use super::binds::{BindRegistry, KEY_BINDS};
use super::types::{ButtonId, Edges, InputFrame, Key, MAX_PLAYERS, PadSnapshot};
use crate::core::notifications::Notifications;

/// libretro `RETRO_DEVICE_JOYPAD`.
pub const DEVICE_JOYPAD: u32 = 1;

/// Source of raw device state. Implemented by the windowing adapter.
pub trait DeviceLayer {
    /// Whether the key is currently held.
    fn key_down(&self, key: Key) -> bool;

    /// Snapshot of the controller in `slot`, or `None` if nothing is plugged.
    fn pad(&self, slot: usize) -> Option<PadSnapshot>;

    /// Whether any controller is connected. Drives hint icon selection.
    fn any_pad(&self) -> bool {
        (0..MAX_PLAYERS).any(|slot| self.pad(slot).is_some())
    }
}

/// Hot-plug notifications from the device layer.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceEvent {
    Connected { slot: usize, name: String },
    Disconnected { slot: usize },
    Unhandled { slot: usize, code: i32 },
}

#[derive(Debug, Default)]
pub struct InputAggregator {
    registry: BindRegistry,
    current: InputFrame,
    previous: InputFrame,
    edges: Edges,
}

impl InputAggregator {
    pub fn new(registry: BindRegistry) -> Self {
        Self {
            registry,
            ..Default::default()
        }
    }

    /// Reads every device, returns the fresh frame and updates edges.
    pub fn poll(&mut self, devices: &dyn DeviceLayer) -> InputFrame {
        let mut frame = InputFrame::new();

        for slot in 0..MAX_PLAYERS {
            if let Some(pad) = devices.pad(slot) {
                for (bind, button) in self.registry.table(&pad.name) {
                    if bind.is_held(&pad) {
                        frame.set(slot, *button, true);
                    }
                }
            }
        }

        for (key, button) in KEY_BINDS {
            if devices.key_down(key) {
                frame.set(0, button, true);
            }
        }

        self.previous = self.current;
        self.current = frame;
        self.edges = Edges::between(&self.previous, &self.current);
        frame
    }

    pub fn current(&self) -> &InputFrame {
        &self.current
    }

    pub fn edges(&self) -> &Edges {
        &self.edges
    }

    pub fn held(&self, button: ButtonId) -> bool {
        self.current.get(0, button)
    }

    pub fn released(&self, button: ButtonId) -> bool {
        self.edges.released.get(0, button)
    }

    pub fn registry_mut(&mut self) -> &mut BindRegistry {
        &mut self.registry
    }

    /// Logs and notifies. Never fails and never touches the frame.
    pub fn on_device_event(&self, event: &DeviceEvent, notifications: &mut Notifications) {
        debug!("Device event: {:?}", event);
        let message = match event {
            DeviceEvent::Connected { slot, name } => {
                if !self.registry.contains(name) {
                    info!("No binds for '{}', slot {} will be ignored", name, slot);
                }
                format!("Joystick #{slot} plugged: {name}.")
            }
            DeviceEvent::Disconnected { slot } => format!("Joystick #{slot} unplugged."),
            DeviceEvent::Unhandled { slot, code } => {
                format!("Joystick #{slot} unhandled event: {code}.")
            }
        };
        notifications.display_and_log("Input", &message);
    }

    /// Input-state query for the emulated content: 1 when the joypad
    /// button is held, 0 otherwise.
    pub fn state(&self, port: usize, device: u32, index: u32, id: u32) -> i16 {
        if device != DEVICE_JOYPAD || index > 0 || id as usize >= ButtonId::JOYPAD_COUNT {
            return 0;
        }
        i16::from(self.current.get(port, ButtonId::ALL[id as usize]))
    }
}
