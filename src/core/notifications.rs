//! # Notifications
//!
//! Transient on-screen messages with a frame budget. This is where
//! non-fatal failures from collaborators end up: the tick loop reports them
//! here and carries on.

use log::info;

/// Default lifetime of a notification, in frames.
pub const DEFAULT_FRAMES: u32 = 240;

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub frames: u32,
}

/// A message sent by a background task for the main loop to display.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub prefix: String,
    pub message: String,
}

impl Notice {
    pub fn new(prefix: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct Notifications {
    list: Vec<Notification>,
    next_id: u64,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows `message` for `frames` frames and returns its id.
    pub fn display(&mut self, message: impl Into<String>, frames: u32) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.list.push(Notification {
            id,
            message: message.into(),
            frames,
        });
        id
    }

    /// Shows a message for the default duration and writes it to the log
    /// as `[prefix]: message`.
    pub fn display_and_log(&mut self, prefix: &str, message: &str) -> u64 {
        info!("[{}]: {}", prefix, message);
        self.display(message, DEFAULT_FRAMES)
    }

    /// Replaces the text of a live notification. Returns false if it has
    /// already expired.
    pub fn update(&mut self, id: u64, message: impl Into<String>) -> bool {
        match self.list.iter_mut().find(|n| n.id == id) {
            Some(n) => {
                n.message = message.into();
                true
            }
            None => false,
        }
    }

    /// Called once per frame: ages every notification and drops expired ones.
    pub fn process(&mut self) {
        for n in &mut self.list {
            n.frames = n.frames.saturating_sub(1);
        }
        self.list.retain(|n| n.frames > 0);
    }

    pub fn clear(&mut self) {
        self.list.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.list.iter()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_expire() {
        let mut n = Notifications::new();
        n.display("Test1", 2);
        n.display("Test2", 3);
        assert_eq!(n.len(), 2);

        n.process();
        assert_eq!(n.len(), 2);
        n.process();
        assert_eq!(n.len(), 1);
        assert_eq!(n.iter().next().map(|x| x.message.as_str()), Some("Test2"));
        n.process();
        assert!(n.is_empty());
    }

    #[test]
    fn test_update_live_notification() {
        let mut n = Notifications::new();
        let id = n.display("Scanning", 10);
        assert!(n.update(id, "Scanning 3 files"));
        assert_eq!(n.iter().next().map(|x| x.message.as_str()), Some("Scanning 3 files"));
        n.clear();
        assert!(!n.update(id, "gone"));
    }

    #[test]
    fn test_ids_are_unique() {
        let mut n = Notifications::new();
        let a = n.display_and_log("Menu", "one");
        let b = n.display_and_log("Menu", "two");
        assert_ne!(a, b);
        assert_eq!(n.iter().next().map(|x| x.frames), Some(DEFAULT_FRAMES));
    }
}
