//! # Entries
//!
//! A node of a scene's tree: label, icon, optional callbacks and children.
//!
//! An entry's animated scalars are not fields. They live in the owning
//! scene's [`Arena`], at slots computed from the child index:
//!
//! ```text
//! slot 0          list scroll offset
//! slot 1, 2       cursor alpha, cursor y
//! slot 3 + 6*i    child i: y, scale, icon alpha, label alpha, tag alpha, width
//! ```

use std::fmt;
use std::path::PathBuf;

use crate::core::action::Effect;
use crate::core::tween::{Arena, Slot};

pub type ConfirmFn = Box<dyn FnMut(&mut Vec<Effect>)>;
pub type IncrementFn = Box<dyn FnMut(i32, &mut Vec<Effect>)>;
pub type ValueFn = Box<dyn Fn() -> String>;

#[derive(Default)]
pub struct Entry {
    pub label: String,
    pub icon: String,
    pub sub_label: Option<String>,
    pub path: Option<PathBuf>,
    pub tags: Vec<String>,
    pub children: Vec<Entry>,
    pub ptr: usize,
    pub on_confirm: Option<ConfirmFn>,
    pub on_increment: Option<IncrementFn>,
    pub on_value: Option<ValueFn>,
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("label", &self.label)
            .field("icon", &self.icon)
            .field("children", &self.children.len())
            .field("ptr", &self.ptr)
            .finish()
    }
}

impl Entry {
    pub fn new(label: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            icon: icon.into(),
            ..Default::default()
        }
    }

    pub fn sub_label(mut self, sub_label: impl Into<String>) -> Self {
        self.sub_label = Some(sub_label.into());
        self
    }

    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn on_confirm(mut self, f: impl FnMut(&mut Vec<Effect>) + 'static) -> Self {
        self.on_confirm = Some(Box::new(f));
        self
    }

    pub fn on_increment(mut self, f: impl FnMut(i32, &mut Vec<Effect>) + 'static) -> Self {
        self.on_increment = Some(Box::new(f));
        self
    }

    pub fn on_value(mut self, f: impl Fn() -> String + 'static) -> Self {
        self.on_value = Some(Box::new(f));
        self
    }

    /// Runs `on_confirm` of the selected child. No callback, no-op.
    pub fn confirm_selected(&mut self, effects: &mut Vec<Effect>) {
        if let Some(f) = self
            .children
            .get_mut(self.ptr)
            .and_then(|c| c.on_confirm.as_mut())
        {
            f(effects);
        }
    }

    /// Runs `on_increment` of the selected child. No callback, no-op.
    pub fn increment_selected(&mut self, direction: i32, effects: &mut Vec<Effect>) {
        if let Some(f) = self
            .children
            .get_mut(self.ptr)
            .and_then(|c| c.on_increment.as_mut())
        {
            f(direction, effects);
        }
    }

    pub fn value(&self) -> Option<String> {
        self.on_value.as_ref().map(|f| f())
    }

    pub fn selected(&self) -> Option<&Entry> {
        self.children.get(self.ptr)
    }
}

// ============================================================================
// Slots
// ============================================================================

pub const SCROLL: Slot = Slot(0);
pub const CURSOR_ALPHA: Slot = Slot(1);
pub const CURSOR_Y: Slot = Slot(2);
const FIRST_CHILD: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Y = 0,
    Scale,
    IconAlpha,
    LabelAlpha,
    TagAlpha,
    Width,
}

impl Field {
    pub const COUNT: u32 = 6;
}

pub fn child_slot(index: usize, field: Field) -> Slot {
    Slot(FIRST_CHILD + index as u32 * Field::COUNT + field as u32)
}

/// Number of arena slots used by a list with `children` entries.
pub fn slot_count(children: usize) -> usize {
    (FIRST_CHILD + children as u32 * Field::COUNT) as usize
}

/// Snapshot of a child's animated fields.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EntryView {
    pub y: f32,
    pub scale: f32,
    pub icon_alpha: f32,
    pub label_alpha: f32,
    pub tag_alpha: f32,
    pub width: f32,
}

impl EntryView {
    pub fn read(arena: &Arena, index: usize) -> Self {
        Self {
            y: arena.get(child_slot(index, Field::Y)),
            scale: arena.get(child_slot(index, Field::Scale)),
            icon_alpha: arena.get(child_slot(index, Field::IconAlpha)),
            label_alpha: arena.get(child_slot(index, Field::LabelAlpha)),
            tag_alpha: arena.get(child_slot(index, Field::TagAlpha)),
            width: arena.get(child_slot(index, Field::Width)),
        }
    }
}
