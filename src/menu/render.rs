//! # Rendering
//!
//! The [`Renderer`] trait is the only way the menu draws anything. Positions
//! and sizes are in framebuffer pixels; layouts are authored for a 1920 px
//! wide screen and scaled by [`Viewport::ratio`].
//!
//! Also home to the pieces every scene shares: the hint bar at the bottom
//! of the screen and the notification overlay.

use crate::core::notifications::Notifications;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn gray(v: f32, a: f32) -> Self {
        Self::rgba(v, v, v, a)
    }

    pub const WHITE: Color = Color::gray(1.0, 1.0);
    pub const BLACK: Color = Color::gray(0.0, 1.0);

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

/// Drawing backend. Implemented by the windowing adapter.
pub trait Renderer {
    #[allow(clippy::too_many_arguments)]
    fn draw_image(&mut self, key: &str, x: f32, y: f32, w: f32, h: f32, scale: f32, color: Color);
    fn draw_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color);
    fn draw_rounded_rect(&mut self, x: f32, y: f32, w: f32, h: f32, radius: f32, color: Color);
    fn draw_border(&mut self, x: f32, y: f32, w: f32, h: f32, thickness: f32, color: Color);
    fn print(&mut self, x: f32, y: f32, scale: f32, color: Color, text: &str);
    fn text_width(&self, scale: f32, text: &str) -> f32;
}

/// Framebuffer dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as f32,
            height: height as f32,
        }
    }

    /// Scale factor from the 1920 px reference layout.
    pub fn ratio(&self) -> f32 {
        self.width / 1920.0
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1920, 1080)
    }
}

// ============================================================================
// Hint Bar
// ============================================================================

/// Buttons a hint can refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintIcon {
    Arrows,
    UpDown,
    LeftRight,
    A,
    B,
    X,
    Y,
    Start,
    Select,
    Guide,
}

impl HintIcon {
    /// Image key, depending on whether a joypad is connected.
    pub fn key(self, pad: bool) -> &'static str {
        match (self, pad) {
            (HintIcon::Arrows, true) => "pad-arrows",
            (HintIcon::UpDown, true) => "pad-up-down",
            (HintIcon::LeftRight, true) => "pad-left-right",
            (HintIcon::A, true) => "pad-a",
            (HintIcon::B, true) => "pad-b",
            (HintIcon::X, true) => "pad-x",
            (HintIcon::Y, true) => "pad-y",
            (HintIcon::Start, true) => "pad-start",
            (HintIcon::Select, true) => "pad-select",
            (HintIcon::Guide, true) => "pad-guide",
            (HintIcon::Arrows, false) => "key-arrows",
            (HintIcon::UpDown, false) => "key-up-down",
            (HintIcon::LeftRight, false) => "key-left-right",
            (HintIcon::A, false) => "key-x",
            (HintIcon::B, false) => "key-z",
            (HintIcon::X, false) => "key-s",
            (HintIcon::Y, false) => "key-a",
            (HintIcon::Start, false) => "key-return",
            (HintIcon::Select, false) => "key-shift",
            (HintIcon::Guide, false) => "key-p",
        }
    }
}

pub type Hint = (HintIcon, &'static str);

const HINT_TEXT: Color = Color::gray(0.25, 1.0);

/// Draws the bottom bar with one icon and label per hint, left to right.
pub fn draw_hint_bar(r: &mut dyn Renderer, viewport: Viewport, hints: &[Hint], pad: bool) {
    let ratio = viewport.ratio();
    let h = viewport.height;
    r.draw_rect(0.0, h - 70.0 * ratio, viewport.width, 70.0 * ratio, Color::gray(0.75, 1.0));

    let mut stack = 0.0;
    for (icon, label) in hints {
        stack += 30.0 * ratio;
        r.draw_image(icon.key(pad), stack, h - 70.0 * ratio, 70.0 * ratio, 70.0 * ratio, 1.0, HINT_TEXT);
        stack += 70.0 * ratio;
        r.print(stack, h - 23.0 * ratio, 0.5 * ratio, HINT_TEXT, label);
        stack += r.text_width(0.5 * ratio, label);
    }
}

/// Draws live notifications in the top-left corner, newest last.
pub fn draw_notifications(r: &mut dyn Renderer, viewport: Viewport, notifications: &Notifications) {
    let ratio = viewport.ratio();
    let line = 60.0 * ratio;
    for (i, n) in notifications.iter().enumerate() {
        let y = line * (i as f32 + 1.0);
        let w = r.text_width(0.5 * ratio, &n.message) + 40.0 * ratio;
        r.draw_rounded_rect(20.0 * ratio, y - 40.0 * ratio, w, 50.0 * ratio, 0.25, Color::gray(0.2, 0.85));
        r.print(40.0 * ratio, y, 0.5 * ratio, Color::WHITE, &n.message);
    }
}
