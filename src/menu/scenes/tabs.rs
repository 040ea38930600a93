//! # Home Tabs
//!
//! The root scene: a horizontal carousel of hexagon tabs.
//!
//! ```text
//!   ⬡   ⬡   [  ⬢  ]   ⬡   ⬡
//!  128 128    600    128 128     widths (reference px)
//!            label
//!          sub-label
//! ```
//!
//! The selected tab is full size and labelled; the others shrink to a
//! quarter. Scroll is in reference pixels, `ptr * 128`. Opening a tab
//! widens it to cover the screen while the carousel scrolls away.

use std::path::PathBuf;

use crate::core::action::{Effect, ExplorerAction, ExplorerRequest, SceneRequest};
use crate::core::host::PlaylistInfo;
use crate::core::tween::Arena;
use crate::input::types::ButtonId;
use crate::menu::entry::{Entry, EntryView, Field, SCROLL, child_slot};
use crate::menu::render::{Color, Hint, HintIcon, Renderer};
use crate::menu::scene::{MenuInput, Scene, SceneCx, SceneKind, ViewCx};

const TAB_WIDTH: f32 = 128.0;
const SELECTED_WIDTH: f32 = 600.0;
const OPENED_WIDTH: f32 = 5200.0;
const OPEN_SCROLL: f32 = 2980.0;

/// Shortens long playlist names for the tab label: the vendor prefix is
/// dropped and a few system names abbreviated.
pub fn playlist_short_name(name: &str) -> String {
    if name.chars().count() < 20 {
        return name.to_string();
    }
    let rest = name.split_once(" - ").map_or(name, |(_, rest)| rest);
    rest.replace("Nintendo Entertainment System", "NES")
        .replace("PC Engine", "PCE")
}

/// Hue-rotated tab color, 20 degrees apart per tab.
fn tab_color(index: usize, alpha: f32) -> Color {
    let h = (index as f32 * 20.0) % 360.0 / 60.0;
    let (c, m) = (0.35, 0.3);
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    Color::rgba(r + m, g + m, b + m, alpha)
}

pub struct Tabs {
    root: Entry,
    arena: Arena,
}

impl Tabs {
    pub fn new(playlists: &[PlaylistInfo], home: PathBuf) -> Self {
        let mut root = Entry::new("retronav", "");

        root.children.push(
            Entry::new("Main Menu", "main")
                .sub_label("Load cores and games manually")
                .on_confirm(|fx| fx.push(Effect::Push(SceneRequest::MainMenu))),
        );
        root.children.push(
            Entry::new("Settings", "setting")
                .sub_label("Configure retronav")
                .on_confirm(|fx| fx.push(Effect::Push(SceneRequest::Settings))),
        );

        for info in playlists {
            let request = SceneRequest::Playlist(info.clone());
            root.children.push(
                Entry::new(playlist_short_name(&info.name), info.name.clone())
                    .sub_label(format!("{} Games - 0 Favorites", info.count))
                    .path(info.path.clone())
                    .on_confirm(move |fx| fx.push(Effect::Push(request.clone()))),
            );
        }

        let scan = SceneRequest::Explorer(ExplorerRequest {
            path: home,
            extensions: None,
            action: ExplorerAction::Scan,
            scan_entry: true,
        });
        root.children.push(
            Entry::new("Add games", "add")
                .sub_label("Scan your collection")
                .on_confirm(move |fx| fx.push(Effect::Push(scan.clone()))),
        );

        Self {
            root,
            arena: Arena::new(),
        }
    }

    pub fn root(&self) -> &Entry {
        &self.root
    }

    /// Resting (label alpha, scale, width) of tab `i`.
    fn rest(&self, i: usize) -> (f32, f32, f32) {
        if i == self.root.ptr {
            (1.0, 1.0, SELECTED_WIDTH)
        } else {
            (0.0, 0.25, TAB_WIDTH)
        }
    }

    fn set_rest(&mut self) {
        for i in 0..self.root.children.len() {
            let (label_alpha, scale, width) = self.rest(i);
            self.arena.set(child_slot(i, Field::Y), 0.5);
            self.arena.set(child_slot(i, Field::LabelAlpha), label_alpha);
            self.arena.set(child_slot(i, Field::IconAlpha), 1.0);
            self.arena.set(child_slot(i, Field::Scale), scale);
            self.arena.set(child_slot(i, Field::Width), width);
        }
    }

    fn animate(&mut self, cx: &mut SceneCx) {
        for i in 0..self.root.children.len() {
            let (label_alpha, scale, width) = self.rest(i);
            cx.animate(&self.arena, child_slot(i, Field::Y), 0.5);
            cx.animate(&self.arena, child_slot(i, Field::LabelAlpha), label_alpha);
            cx.animate(&self.arena, child_slot(i, Field::IconAlpha), 1.0);
            cx.animate(&self.arena, child_slot(i, Field::Scale), scale);
            cx.animate(&self.arena, child_slot(i, Field::Width), width);
        }
        cx.animate(&self.arena, SCROLL, self.root.ptr as f32 * TAB_WIDTH);
    }

    fn move_selection(&mut self, delta: i32, cx: &mut SceneCx) {
        let n = self.root.children.len() as i32;
        if n == 0 {
            return;
        }
        self.root.ptr = (self.root.ptr as i32 + delta).rem_euclid(n) as usize;
        self.animate(cx);
    }
}

impl Scene for Tabs {
    fn kind(&self) -> SceneKind {
        SceneKind::Tabs
    }

    fn label(&self) -> &str {
        &self.root.label
    }

    fn arena(&self) -> &Arena {
        &self.arena
    }

    fn arena_mut(&mut self) -> &mut Arena {
        &mut self.arena
    }

    fn mount(&mut self, cx: &mut SceneCx) {
        self.set_rest();
        self.animate(cx);
    }

    fn segue_next(&mut self, cx: &mut SceneCx) {
        let ptr = self.root.ptr;
        cx.animate(&self.arena, child_slot(ptr, Field::Width), OPENED_WIDTH);
        let scroll = self.arena.get(SCROLL);
        cx.animate(&self.arena, SCROLL, scroll + OPEN_SCROLL);
    }

    fn exit(&mut self, cx: &mut SceneCx) {
        for i in 0..self.root.children.len() {
            cx.animate(&self.arena, child_slot(i, Field::IconAlpha), 0.0);
            cx.animate(&self.arena, child_slot(i, Field::LabelAlpha), 0.0);
        }
    }

    fn refocus(&mut self, cx: &mut SceneCx) {
        self.animate(cx);
    }

    fn update(&mut self, dt: f32, input: &MenuInput, cx: &mut SceneCx) {
        if cx.repeat.right.update(dt, input.held(ButtonId::Right)) {
            self.move_selection(1, cx);
        }
        if cx.repeat.left.update(dt, input.held(ButtonId::Left)) {
            self.move_selection(-1, cx);
        }
        if input.released(ButtonId::A) {
            self.root.confirm_selected(cx.effects);
        }
    }

    fn render(&self, r: &mut dyn Renderer, view: &ViewCx) {
        let ratio = view.ratio();
        let h = view.viewport.height;
        let scroll = self.arena.get(SCROLL);

        let mut stack_width = 660.0 * ratio;
        for (i, tab) in self.root.children.iter().enumerate() {
            let e = EntryView::read(&self.arena, i);
            stack_width += e.width * ratio;
            let x = -scroll * ratio + stack_width - e.width / 2.0 * ratio;
            let y = h * e.y;

            if e.label_alpha > 0.0 {
                let c = tab_color(i, e.label_alpha);
                let lw = r.text_width(0.7 * ratio, &tab.label);
                r.print(x - lw / 2.0, y + 310.0 * ratio, 0.7 * ratio, c, &tab.label);
                if let Some(sub) = &tab.sub_label {
                    let sw = r.text_width(0.4 * ratio, sub);
                    r.print(x - sw / 2.0, y + 390.0 * ratio, 0.4 * ratio, c, sub);
                }
            }

            r.draw_image(
                "hexagon",
                x - 220.0 * e.scale * ratio,
                y - 220.0 * e.scale * ratio,
                440.0 * ratio,
                440.0 * ratio,
                e.scale,
                tab_color(i, e.icon_alpha),
            );
            r.draw_image(
                &tab.icon,
                x - 128.0 * e.scale * ratio,
                y - 128.0 * e.scale * ratio,
                256.0 * ratio,
                256.0 * ratio,
                e.scale,
                Color::WHITE.with_alpha(e.icon_alpha),
            );
        }
    }

    fn hints(&self) -> Vec<Hint> {
        vec![(HintIcon::LeftRight, "NAVIGATE"), (HintIcon::A, "OPEN")]
    }

    fn selection(&self) -> Option<usize> {
        Some(self.root.ptr)
    }
}
