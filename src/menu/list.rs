//! # Generic List
//!
//! Vertical list behavior shared by most scenes: layout, transitions,
//! navigation and drawing. Scenes that are "a list with a custom builder"
//! use [`ListScene`] directly; the others embed a [`List`] and override
//! the parts they need.
//!
//! Resting layout, in viewport-height units:
//!
//! ```text
//!  0.32   entry ptr-1   alpha 0.5
//!  0.50   entry ptr     alpha 1.0   ◄ cursor
//!  0.68   entry ptr+1   alpha 0.5
//! ```
//!
//! Each child's `y` slot holds its position with the scroll removed; the
//! drawn position is `y - scroll`, and moving the selection tweens `scroll`.

use crate::core::action::Effect;
use crate::core::tween::Arena;
use crate::input::types::ButtonId;

use super::entry::{CURSOR_ALPHA, CURSOR_Y, Entry, EntryView, Field, SCROLL, child_slot, slot_count};
use super::render::{Color, Hint, HintIcon, Renderer};
use super::scene::{MenuInput, Scene, SceneCx, SceneKind, ViewCx};

pub const ROW_SPACING: f32 = 0.08;
/// Extra space around the selected row.
const SELECTION_GAP: f32 = 0.1;
/// How far entries slide during mount and segues.
const SLIDE: f32 = 0.3;
const ENTRY_SCALE: f32 = 0.5;

pub const DEFAULT_HINTS: [Hint; 3] = [
    (HintIcon::UpDown, "NAVIGATE"),
    (HintIcon::B, "BACK"),
    (HintIcon::A, "OK"),
];

/// Text color for list labels: dark over the menu background, light over
/// running content.
pub fn text_color(view: &ViewCx) -> Color {
    if view.content.running {
        Color::WHITE
    } else {
        Color::BLACK
    }
}

#[derive(Debug, Default)]
pub struct List {
    pub root: Entry,
    pub arena: Arena,
}

impl List {
    pub fn new(root: Entry) -> Self {
        Self {
            root,
            arena: Arena::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.root.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }

    pub fn ptr(&self) -> usize {
        self.root.ptr
    }

    /// Resting `y` of child `i` (scroll not applied).
    pub fn rest_y(&self, i: usize) -> f32 {
        let ptr = self.root.ptr;
        let gap = if i < ptr {
            -SELECTION_GAP
        } else if i > ptr {
            SELECTION_GAP
        } else {
            0.0
        };
        0.5 + ROW_SPACING * i as f32 + gap
    }

    pub fn scroll_target(&self) -> f32 {
        ROW_SPACING * self.root.ptr as f32
    }

    pub fn scroll(&self) -> f32 {
        self.arena.get(SCROLL)
    }

    /// On-screen `y` of child `i`.
    pub fn view_y(&self, i: usize) -> f32 {
        self.arena.get(child_slot(i, Field::Y)) - self.scroll()
    }

    /// Replaces the children, resetting the selection.
    pub fn set_children(&mut self, children: Vec<Entry>) {
        self.root.children = children;
        self.root.ptr = 0;
        self.arena.truncate(slot_count(0));
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Entries start below their resting place, transparent, and slide in.
    pub fn mount(&mut self, cx: &mut SceneCx) {
        self.arena.set(SCROLL, self.scroll_target());
        self.arena.set(CURSOR_Y, 0.5);
        for i in 0..self.len() {
            self.arena.set(child_slot(i, Field::Y), self.rest_y(i) + SLIDE);
            self.arena.set(child_slot(i, Field::Scale), ENTRY_SCALE);
            self.arena.set(child_slot(i, Field::IconAlpha), 0.0);
            self.arena.set(child_slot(i, Field::LabelAlpha), 0.0);
            self.arena.set(child_slot(i, Field::TagAlpha), 0.0);
        }
        self.animate(cx);
    }

    /// Tweens every entry and the cursor to their resting values.
    pub fn animate(&mut self, cx: &mut SceneCx) {
        for i in 0..self.len() {
            let alpha = if i == self.root.ptr { 1.0 } else { 0.5 };
            let tag_alpha = if i == self.root.ptr { 1.0 } else { 0.0 };
            cx.animate(&self.arena, child_slot(i, Field::Y), self.rest_y(i));
            cx.animate(&self.arena, child_slot(i, Field::Scale), ENTRY_SCALE);
            cx.animate(&self.arena, child_slot(i, Field::IconAlpha), alpha);
            cx.animate(&self.arena, child_slot(i, Field::LabelAlpha), alpha);
            cx.animate(&self.arena, child_slot(i, Field::TagAlpha), tag_alpha);
        }
        cx.animate(&self.arena, CURSOR_ALPHA, 0.1);
        cx.animate(&self.arena, CURSOR_Y, 0.5);
    }

    /// Slides up and fades out as a new scene covers this one.
    pub fn segue_next(&mut self, cx: &mut SceneCx) {
        self.slide_out(-SLIDE, cx);
    }

    /// Slides back down and fades out after being popped.
    pub fn exit(&mut self, cx: &mut SceneCx) {
        self.slide_out(SLIDE, cx);
    }

    fn slide_out(&mut self, offset: f32, cx: &mut SceneCx) {
        for i in 0..self.len() {
            cx.animate(&self.arena, child_slot(i, Field::Y), self.rest_y(i) + offset);
            cx.animate(&self.arena, child_slot(i, Field::IconAlpha), 0.0);
            cx.animate(&self.arena, child_slot(i, Field::LabelAlpha), 0.0);
            cx.animate(&self.arena, child_slot(i, Field::TagAlpha), 0.0);
        }
        cx.animate(&self.arena, CURSOR_ALPHA, 0.0);
    }

    // ========================================================================
    // Input
    // ========================================================================

    /// Moves the selection by `delta` with wraparound and starts the
    /// scroll tween. Returns false on an empty list.
    pub fn move_selection(&mut self, delta: i32, cx: &mut SceneCx) -> bool {
        let n = self.len() as i32;
        if n == 0 {
            return false;
        }
        self.root.ptr = (self.root.ptr as i32 + delta).rem_euclid(n) as usize;
        cx.animate(&self.arena, SCROLL, self.scroll_target());
        self.animate(cx);
        true
    }

    /// Up/Down navigation, then confirm, increment and cancel.
    pub fn input(&mut self, dt: f32, input: &MenuInput, cx: &mut SceneCx) {
        if cx.repeat.down.update(dt, input.held(ButtonId::Down)) {
            self.move_selection(1, cx);
        }
        if cx.repeat.up.update(dt, input.held(ButtonId::Up)) {
            self.move_selection(-1, cx);
        }

        if input.released(ButtonId::A) {
            self.root.confirm_selected(cx.effects);
        }
        if input.released(ButtonId::Right) {
            self.root.increment_selected(1, cx.effects);
        }
        if input.released(ButtonId::Left) {
            self.root.increment_selected(-1, cx.effects);
        }
        if input.released(ButtonId::B) && cx.depth > 1 {
            cx.emit(Effect::Pop);
        }
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    pub fn draw_cursor(&self, r: &mut dyn Renderer, view: &ViewCx) {
        let ratio = view.ratio();
        let y = view.viewport.height * self.arena.get(CURSOR_Y);
        r.draw_rounded_rect(
            530.0 * ratio,
            y - 50.0 * ratio,
            1200.0 * ratio,
            100.0 * ratio,
            0.2,
            Color::WHITE.with_alpha(self.arena.get(CURSOR_ALPHA)),
        );
    }

    /// Draws the title, cursor and every visible child. Children outside
    /// the viewport are skipped.
    pub fn render(&self, r: &mut dyn Renderer, view: &ViewCx) {
        let ratio = view.ratio();
        let (w, h) = (view.viewport.width, view.viewport.height);
        let color = text_color(view);

        if view.focused {
            r.print(96.0 * ratio, 120.0 * ratio, 0.8 * ratio, color, &self.root.label);
        }
        self.draw_cursor(r, view);

        let font_offset = 64.0 * 0.7 * ratio * 0.3;
        for (i, child) in self.root.children.iter().enumerate() {
            let y = self.view_y(i);
            if !(-0.1..=1.1).contains(&y) {
                continue;
            }
            let e = EntryView::read(&self.arena, i);

            r.draw_image(
                &child.icon,
                610.0 * ratio - 64.0 * e.scale * ratio,
                h * y - 64.0 * e.scale * ratio,
                128.0 * ratio,
                128.0 * ratio,
                e.scale,
                color.with_alpha(e.icon_alpha),
            );

            if e.label_alpha > 0.0 {
                let label_color = color.with_alpha(e.label_alpha);
                r.print(670.0 * ratio, h * y + font_offset, 0.7 * ratio, label_color, &child.label);
                if let Some(value) = child.value() {
                    let vw = r.text_width(0.7 * ratio, &value);
                    r.print(w - 250.0 * ratio - vw, h * y + font_offset, 0.7 * ratio, label_color, &value);
                }
            }
        }
    }
}

// ============================================================================
// ListScene
// ============================================================================

/// A scene that is nothing more than a list.
pub struct ListScene {
    kind: SceneKind,
    list: List,
    hints: Vec<Hint>,
}

impl ListScene {
    pub fn new(kind: SceneKind, root: Entry) -> Self {
        Self {
            kind,
            list: List::new(root),
            hints: DEFAULT_HINTS.to_vec(),
        }
    }

    pub fn with_hints(mut self, hints: Vec<Hint>) -> Self {
        self.hints = hints;
        self
    }

    pub fn list(&self) -> &List {
        &self.list
    }
}

impl Scene for ListScene {
    fn kind(&self) -> SceneKind {
        self.kind
    }

    fn label(&self) -> &str {
        &self.list.root.label
    }

    fn arena(&self) -> &Arena {
        &self.list.arena
    }

    fn arena_mut(&mut self) -> &mut Arena {
        &mut self.list.arena
    }

    fn mount(&mut self, cx: &mut SceneCx) {
        self.list.mount(cx);
    }

    fn segue_next(&mut self, cx: &mut SceneCx) {
        self.list.segue_next(cx);
    }

    fn exit(&mut self, cx: &mut SceneCx) {
        self.list.exit(cx);
    }

    fn refocus(&mut self, cx: &mut SceneCx) {
        self.list.animate(cx);
    }

    fn update(&mut self, dt: f32, input: &MenuInput, cx: &mut SceneCx) {
        self.list.input(dt, input, cx);
    }

    fn render(&self, r: &mut dyn Renderer, view: &ViewCx) {
        self.list.render(r, view);
    }

    fn hints(&self) -> Vec<Hint> {
        self.hints.clone()
    }

    fn selection(&self) -> Option<usize> {
        Some(self.list.ptr())
    }
}
