//! Text-mode rendering backend and window.
//!
//! The menu lays itself out in framebuffer pixels. The terminal pretends
//! each cell is `CELL_W x CELL_H` pixels, so a 120-column terminal behaves
//! like a 1920 px wide screen. Drawing goes to an off-screen ratatui
//! [`Buffer`] that is copied into the frame as a widget.
//!
//! Alpha is blended against whatever background the cell already has.

use log::info;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color as TermColor;
use ratatui::widgets::Widget;
use unicode_width::UnicodeWidthStr;

use crate::core::host::Window;
use crate::menu::render::{Color, Renderer};

pub const CELL_W: f32 = 16.0;
pub const CELL_H: f32 = 32.0;

/// Below this alpha nothing is drawn.
const MIN_ALPHA: f32 = 0.05;

fn channel(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn rgb(color: TermColor) -> (f32, f32, f32) {
    match color {
        TermColor::Rgb(r, g, b) => (r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0),
        TermColor::White => (1.0, 1.0, 1.0),
        _ => (0.0, 0.0, 0.0),
    }
}

fn blend(color: Color, under: TermColor) -> TermColor {
    let (r, g, b) = rgb(under);
    let a = color.a.clamp(0.0, 1.0);
    TermColor::Rgb(
        channel(color.r * a + r * (1.0 - a)),
        channel(color.g * a + g * (1.0 - a)),
        channel(color.b * a + b * (1.0 - a)),
    )
}

/// Character shown for an image key. Images without one (thumbnails,
/// placeholders) are not drawn.
pub fn glyph(key: &str) -> Option<&'static str> {
    let glyph = match key {
        "folder" => "▸",
        "file" => "·",
        "resume" => "▶",
        "reload" => "↻",
        "scan" => "+",
        "menu_network" => "≋",
        "menu_close" => "×",
        "main" | "subsetting" | "setting" => "•",
        k if k.ends_with("-content") => "◆",
        "key-arrows" | "pad-arrows" => "✥",
        "key-up-down" | "pad-up-down" => "↕",
        "key-left-right" | "pad-left-right" => "↔",
        "key-x" => "X",
        "key-z" => "Z",
        "key-s" => "S",
        "key-a" => "A",
        "key-p" => "P",
        "key-return" => "⏎",
        "key-shift" => "⌫",
        "pad-a" => "Ⓐ",
        "pad-b" => "Ⓑ",
        "pad-x" => "Ⓧ",
        "pad-y" => "Ⓨ",
        "pad-start" | "pad-select" | "pad-guide" => "◉",
        _ => return None,
    };
    Some(glyph)
}

/// Renderer writing into an off-screen cell buffer.
pub struct TerminalRenderer {
    buffer: Buffer,
}

impl TerminalRenderer {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            buffer: Buffer::empty(Rect::new(0, 0, cols, rows)),
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.buffer.resize(Rect::new(0, 0, cols, rows));
    }

    pub fn clear(&mut self) {
        self.buffer.reset();
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    fn cell_at(&self, x: f32, y: f32) -> Option<(u16, u16)> {
        let area = self.buffer.area;
        let col = (x / CELL_W).floor();
        let row = (y / CELL_H).floor();
        if col < 0.0 || row < 0.0 || col >= area.width as f32 || row >= area.height as f32 {
            return None;
        }
        Some((col as u16, row as u16))
    }

    fn fill(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        if color.a < MIN_ALPHA {
            return;
        }
        let area = self.buffer.area;
        let col0 = (x / CELL_W).floor().max(0.0) as u16;
        let row0 = (y / CELL_H).floor().max(0.0) as u16;
        let col1 = (((x + w) / CELL_W).ceil().max(0.0) as u16).min(area.width);
        let row1 = (((y + h) / CELL_H).ceil().max(0.0) as u16).min(area.height);
        for row in row0..row1 {
            for col in col0..col1 {
                if let Some(cell) = self.buffer.cell_mut((col, row)) {
                    let bg = blend(color, cell.bg);
                    cell.set_bg(bg);
                }
            }
        }
    }
}

impl Renderer for TerminalRenderer {
    fn draw_image(&mut self, key: &str, x: f32, y: f32, w: f32, h: f32, scale: f32, color: Color) {
        if color.a < MIN_ALPHA {
            return;
        }
        let Some(symbol) = glyph(key) else {
            return;
        };
        let cx = x + w * scale / 2.0;
        let cy = y + h * scale / 2.0;
        if let Some(pos) = self.cell_at(cx, cy)
            && let Some(cell) = self.buffer.cell_mut(pos)
        {
            let fg = blend(color, cell.bg);
            cell.set_symbol(symbol).set_fg(fg);
        }
    }

    fn draw_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.fill(x, y, w, h, color);
    }

    fn draw_rounded_rect(&mut self, x: f32, y: f32, w: f32, h: f32, _radius: f32, color: Color) {
        self.fill(x, y, w, h, color);
    }

    fn draw_border(&mut self, x: f32, y: f32, w: f32, h: f32, _thickness: f32, color: Color) {
        if color.a < MIN_ALPHA {
            return;
        }
        let mid = y + h / 2.0;
        for (px, symbol) in [(x, "["), (x + w - CELL_W, "]")] {
            if let Some(pos) = self.cell_at(px, mid)
                && let Some(cell) = self.buffer.cell_mut(pos)
            {
                let fg = blend(color.with_alpha(1.0), cell.bg);
                cell.set_symbol(symbol).set_fg(fg);
            }
        }
    }

    fn print(&mut self, x: f32, y: f32, _scale: f32, color: Color, text: &str) {
        if color.a < MIN_ALPHA {
            return;
        }
        // `y` is the text baseline
        let Some((col, row)) = self.cell_at(x.max(0.0), (y - CELL_H / 2.0).max(0.0)) else {
            return;
        };
        let mut col = col;
        let width = self.buffer.area.width;
        for ch in text.chars() {
            if col >= width {
                break;
            }
            let w = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0) as u16;
            if let Some(cell) = self.buffer.cell_mut((col, row)) {
                let fg = blend(color, cell.bg);
                cell.set_char(ch).set_fg(fg);
            }
            col += w.max(1);
        }
    }

    fn text_width(&self, _scale: f32, text: &str) -> f32 {
        text.width() as f32 * CELL_W
    }
}

impl Widget for &TerminalRenderer {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let src = &self.buffer;
        for row in 0..area.height.min(src.area.height) {
            for col in 0..area.width.min(src.area.width) {
                if let (Some(from), Some(to)) =
                    (src.cell((col, row)), buf.cell_mut((area.x + col, area.y + row)))
                {
                    *to = from.clone();
                }
            }
        }
    }
}

/// The terminal as a window. Fullscreen and monitor changes are recorded
/// but have no effect on a terminal.
#[derive(Debug)]
pub struct TerminalWindow {
    cols: u16,
    rows: u16,
    fullscreen: bool,
    close: bool,
}

impl TerminalWindow {
    pub fn new(cols: u16, rows: u16, fullscreen: bool) -> Self {
        Self {
            cols,
            rows,
            fullscreen,
            close: false,
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
    }

    pub fn fullscreen(&self) -> bool {
        self.fullscreen
    }
}

impl Window for TerminalWindow {
    fn framebuffer_size(&self) -> (u32, u32) {
        (
            (self.cols as f32 * CELL_W) as u32,
            (self.rows as f32 * CELL_H) as u32,
        )
    }

    fn set_should_close(&mut self, close: bool) {
        self.close = close;
    }

    fn should_close(&self) -> bool {
        self.close
    }

    fn reconfigure(&mut self, fullscreen: bool, monitor: u32) {
        info!("Video mode change ignored in terminal (fullscreen={fullscreen}, monitor={monitor})");
        self.fullscreen = fullscreen;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_text(r: &TerminalRenderer, row: u16) -> String {
        let area = r.buffer().area;
        (0..area.width)
            .filter_map(|col| r.buffer().cell((col, row)).map(|c| c.symbol().to_string()))
            .collect()
    }

    #[test]
    fn test_print_lands_on_baseline_row() {
        let mut r = TerminalRenderer::new(20, 4);
        r.print(2.0 * CELL_W, 2.0 * CELL_H, 1.0, Color::BLACK, "Quit");
        assert!(row_text(&r, 1).starts_with("  Quit"));
        assert!(row_text(&r, 2).trim().is_empty());
    }

    #[test]
    fn test_transparent_draws_are_skipped() {
        let mut r = TerminalRenderer::new(10, 2);
        r.print(0.0, CELL_H, 1.0, Color::BLACK.with_alpha(0.0), "hidden");
        r.draw_rect(0.0, 0.0, 160.0, 64.0, Color::WHITE.with_alpha(0.0));
        assert!(row_text(&r, 0).trim().is_empty());
        assert_eq!(r.buffer().cell((0, 0)).map(|c| c.bg), Some(TermColor::Reset));
    }

    #[test]
    fn test_rect_blends_background() {
        let mut r = TerminalRenderer::new(4, 2);
        r.draw_rect(0.0, 0.0, 4.0 * CELL_W, 2.0 * CELL_H, Color::WHITE);
        r.draw_rect(0.0, 0.0, CELL_W, CELL_H, Color::BLACK.with_alpha(0.5));
        assert_eq!(r.buffer().cell((0, 0)).map(|c| c.bg), Some(TermColor::Rgb(128, 128, 128)));
        assert_eq!(r.buffer().cell((3, 1)).map(|c| c.bg), Some(TermColor::Rgb(255, 255, 255)));
    }

    #[test]
    fn test_offscreen_text_is_clipped() {
        let mut r = TerminalRenderer::new(4, 1);
        r.print(2.0 * CELL_W, CELL_H, 1.0, Color::BLACK, "long text");
        assert_eq!(row_text(&r, 0), "  lo");
        r.print(0.0, 50.0 * CELL_H, 1.0, Color::BLACK, "below");
    }

    #[test]
    fn test_text_width_uses_display_width() {
        let r = TerminalRenderer::new(1, 1);
        assert_eq!(r.text_width(0.7, "abc"), 3.0 * CELL_W);
        assert_eq!(r.text_width(0.7, "日本"), 4.0 * CELL_W);
    }

    #[test]
    fn test_unknown_images_are_not_drawn() {
        let mut r = TerminalRenderer::new(4, 2);
        r.draw_image("/cache/thumb.png", 0.0, 0.0, CELL_W, CELL_H, 1.0, Color::WHITE);
        assert!(row_text(&r, 0).trim().is_empty());
        r.draw_image("folder", 0.0, 0.0, CELL_W, CELL_H, 1.0, Color::BLACK);
        assert_eq!(r.buffer().cell((0, 0)).map(|c| c.symbol().to_string()).as_deref(), Some("▸"));
    }

    #[test]
    fn test_window_reports_virtual_pixels() {
        let mut w = TerminalWindow::new(120, 34, false);
        assert_eq!(w.framebuffer_size(), (1920, 1088));
        w.reconfigure(true, 0);
        assert!(w.fullscreen());
    }
}
