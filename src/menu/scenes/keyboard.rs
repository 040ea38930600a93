//! # On-screen Keyboard
//!
//! Text entry with a 10x4 key grid and three layouts. Slides up from the
//! bottom of the screen on mount and back down when popped.
//!
//! | Button | Action |
//! |--------|--------|
//! | D-pad  | move (wraps within row/column, repeats while held) |
//! | A      | type the focused key |
//! | X      | next layout |
//! | Y      | delete last character (repeats while held) |
//! | B      | cancel |
//! | Start  | submit a non-empty value |

use crate::core::action::{Effect, KeyboardPurpose};
use crate::core::tween::{Arena, Slot};
use crate::input::types::ButtonId;
use crate::menu::render::{Color, Hint, HintIcon, Renderer};
use crate::menu::scene::{MenuInput, Scene, SceneCx, SceneKind, ViewCx};

const COLUMNS: usize = 10;

pub const LAYOUTS: [[&str; 40]; 3] = [
    [
        "1", "2", "3", "4", "5", "6", "7", "8", "9", "0", //
        "q", "w", "e", "r", "t", "y", "u", "i", "o", "p", //
        "a", "s", "d", "f", "g", "h", "j", "k", "l", "@", //
        "z", "x", "c", "v", "b", "n", "m", " ", "-", ".",
    ],
    [
        "1", "2", "3", "4", "5", "6", "7", "8", "9", "0", //
        "Q", "W", "E", "R", "T", "Y", "U", "I", "O", "P", //
        "A", "S", "D", "F", "G", "H", "J", "K", "L", "+", //
        "Z", "X", "C", "V", "B", "N", "M", " ", "_", "/",
    ],
    [
        "1", "2", "3", "4", "5", "6", "7", "8", "9", "0", //
        "!", "\"", "#", "$", "%", "&", "'", "*", "(", ")", //
        "+", ",", "-", "~", "/", ":", ";", "=", "<", ">", //
        "?", "@", "[", "\\", "]", "^", "_", "|", "{", "}",
    ],
];

const Y: Slot = Slot(0);
const ALPHA: Slot = Slot(1);

pub struct Keyboard {
    label: String,
    purpose: KeyboardPurpose,
    index: usize,
    layout: usize,
    value: String,
    arena: Arena,
}

impl Keyboard {
    pub fn new(label: impl Into<String>, purpose: KeyboardPurpose) -> Self {
        Self {
            label: label.into(),
            purpose,
            index: 0,
            layout: 0,
            value: String::new(),
            arena: Arena::new(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn layout(&self) -> usize {
        self.layout
    }

    fn keys(&self) -> &'static [&'static str; 40] {
        &LAYOUTS[self.layout]
    }

    fn right(&mut self) {
        if (self.index + 1) % COLUMNS == 0 {
            self.index -= COLUMNS - 1;
        } else {
            self.index += 1;
        }
    }

    fn left(&mut self) {
        if self.index % COLUMNS == 0 {
            self.index += COLUMNS - 1;
        } else {
            self.index -= 1;
        }
    }

    fn up(&mut self) {
        let n = self.keys().len();
        if self.index < COLUMNS {
            self.index += n - COLUMNS;
        } else {
            self.index -= COLUMNS;
        }
    }

    fn down(&mut self) {
        let n = self.keys().len();
        if self.index >= n - COLUMNS {
            self.index -= n - COLUMNS;
        } else {
            self.index += COLUMNS;
        }
    }

    fn submit(&self) -> Effect {
        match &self.purpose {
            KeyboardPurpose::Passphrase(network) => Effect::ConnectNetwork {
                network: network.clone(),
                passphrase: self.value.clone(),
            },
        }
    }
}

impl Scene for Keyboard {
    fn kind(&self) -> SceneKind {
        SceneKind::Keyboard
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn arena(&self) -> &Arena {
        &self.arena
    }

    fn arena_mut(&mut self) -> &mut Arena {
        &mut self.arena
    }

    fn mount(&mut self, cx: &mut SceneCx) {
        self.arena.set(Y, cx.viewport.height);
        self.arena.set(ALPHA, 0.0);
        cx.animate(&self.arena, Y, 0.0);
        cx.animate(&self.arena, ALPHA, 1.0);
    }

    fn segue_next(&mut self, _cx: &mut SceneCx) {}

    fn exit(&mut self, cx: &mut SceneCx) {
        cx.animate(&self.arena, Y, cx.viewport.height);
        cx.animate(&self.arena, ALPHA, 0.0);
    }

    fn refocus(&mut self, cx: &mut SceneCx) {
        cx.animate(&self.arena, Y, 0.0);
        cx.animate(&self.arena, ALPHA, 1.0);
    }

    fn update(&mut self, dt: f32, input: &MenuInput, cx: &mut SceneCx) {
        if cx.repeat.right.update(dt, input.held(ButtonId::Right)) {
            self.right();
        }
        if cx.repeat.left.update(dt, input.held(ButtonId::Left)) {
            self.left();
        }
        if cx.repeat.up.update(dt, input.held(ButtonId::Up)) {
            self.up();
        }
        if cx.repeat.down.update(dt, input.held(ButtonId::Down)) {
            self.down();
        }

        if input.released(ButtonId::A) {
            self.value.push_str(self.keys()[self.index]);
        }
        if input.released(ButtonId::X) {
            self.layout = (self.layout + 1) % LAYOUTS.len();
        }
        if cx.repeat.delete.update(dt, input.held(ButtonId::Y)) {
            self.value.pop();
        }

        if input.released(ButtonId::B) && cx.depth > 1 {
            cx.emit(Effect::Pop);
        }
        if input.released(ButtonId::Start) && !self.value.is_empty() {
            let effect = self.submit();
            cx.emit(effect);
            cx.emit(Effect::Pop);
        }
    }

    fn render(&self, r: &mut dyn Renderer, view: &ViewCx) {
        let (w, h) = (view.viewport.width, view.viewport.height);
        let ratio = view.ratio();
        let y0 = self.arena.get(Y);
        let alpha = self.arena.get(ALPHA);

        let lines = 4.0;
        let kbh = h * 0.6;
        let ksp = (kbh - 50.0 * ratio) / (lines + 1.0);
        let ksz = ksp * 0.9;
        let ttw = COLUMNS as f32 * ksp;

        r.draw_rect(0.0, 0.0, w, h, Color::WHITE.with_alpha(alpha));

        r.print(
            w / 2.0 - ttw / 2.0,
            y0 + h * 0.15 - ksz / 2.0 + ksz * 0.6,
            ksz / 200.0,
            Color::BLACK,
            &self.label,
        );

        r.draw_rect(w / 2.0 - ttw / 2.0, y0 + h * 0.25 - ksz / 2.0, ttw, ksz, Color::gray(0.95, 1.0));
        r.print(
            w / 2.0 - ttw / 2.0 + ksz / 4.0,
            y0 + h * 0.25 - ksz / 2.0 + ksz * 0.62,
            ksz / 150.0,
            Color::BLACK,
            &format!("{}|", self.value),
        );

        r.draw_rect(0.0, y0 + h - kbh, w, kbh, Color::BLACK);

        for (i, key) in self.keys().iter().enumerate() {
            let x = (i % COLUMNS) as f32 * ksp - ttw / 2.0 + w / 2.0;
            let y = y0 + (i / COLUMNS) as f32 * ksp + ksp / 2.0 + h - kbh;
            let gw = r.text_width(ksz / 150.0, key);

            let (c1, c2) = if i == self.index {
                (Color::gray(0.35, 1.0), Color::gray(0.45, 1.0))
            } else {
                (Color::gray(0.15, 1.0), Color::gray(0.25, 1.0))
            };
            r.draw_rounded_rect(x, y, ksz, ksz, 0.2, c1);
            r.draw_rounded_rect(x, y, ksz, ksz * 0.95, 0.2, c2);
            r.print(x + ksz / 2.0 - gw / 2.0, y + ksz * 0.6, ksz / 150.0, Color::WHITE, key);
        }
    }

    fn hints(&self) -> Vec<Hint> {
        vec![
            (HintIcon::Arrows, "SELECT"),
            (HintIcon::A, "TYPE"),
            (HintIcon::X, "SHIFT"),
            (HintIcon::Y, "DELETE"),
            (HintIcon::B, "CANCEL"),
            (HintIcon::Start, "DONE"),
        ]
    }
}
