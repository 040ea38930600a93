//! # Playlist
//!
//! Games of one playlist. Names are split into a title and region/revision
//! tags, the running game shows a resume icon, and each visible entry gets
//! a boxart thumbnail fetched in the background.
//!
//! ```text
//! Unknown ──(cached on disk)──────────────► Ready(path)
//!    │
//!    └──spawn fetch──► Downloading ──msg──► Ready(path) | Broken
//! ```

use std::borrow::Cow;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};

use log::debug;

use crate::core::action::Effect;
use crate::core::host::{Game, PlaylistInfo};
use crate::core::tween::Arena;
use crate::menu::entry::{Entry, EntryView};
use crate::menu::list::{List, text_color};
use crate::menu::render::{Color, Hint, HintIcon, Renderer};
use crate::menu::scene::{MenuInput, Scene, SceneCx, SceneKind, ViewCx};
use crate::producers::runtime_available;
use crate::producers::thumbnails::{ThumbnailFetcher, ThumbnailMsg};

/// Splits `"Tetris (World) (Rev A, En)"` into `("Tetris", ["World", "Rev A", "En"])`.
pub fn extract_tags(name: &str) -> (String, Vec<String>) {
    let mut title = String::with_capacity(name.len());
    let mut tags = Vec::new();
    let mut rest = name;
    while let Some(open) = rest.find('(') {
        let Some(close) = rest[open..].find(')').map(|c| open + c) else {
            break;
        };
        title.push_str(&rest[..open]);
        tags.extend(
            rest[open + 1..close]
                .split(',')
                .map(|t| t.trim().to_string()),
        );
        rest = &rest[close + 1..];
    }
    title.push_str(rest);
    (title.trim().to_string(), tags)
}

#[derive(Debug, Clone, PartialEq)]
pub enum Thumbnail {
    Unknown,
    Downloading,
    Ready(PathBuf),
    Broken,
}

impl Thumbnail {
    fn image_key(&self) -> Cow<'_, str> {
        match self {
            Thumbnail::Unknown | Thumbnail::Downloading => Cow::Borrowed("img-dl"),
            Thumbnail::Ready(path) => path.to_string_lossy(),
            Thumbnail::Broken => Cow::Borrowed("img-broken"),
        }
    }
}

pub struct Playlist {
    list: List,
    thumbnails: Vec<Thumbnail>,
    fetcher: Option<ThumbnailFetcher>,
    tx: Sender<ThumbnailMsg>,
    rx: Receiver<ThumbnailMsg>,
}

impl Playlist {
    pub fn new(info: &PlaylistInfo, games: Vec<Game>, fetcher: Option<ThumbnailFetcher>) -> Self {
        let mut root = Entry::new(info.name.clone(), "");
        let icon = format!("{}-content", info.name);
        for game in games {
            let (title, tags) = extract_tags(&game.name);
            let playlist = info.name.clone();
            let path = game.path.clone();
            let mut entry = Entry::new(title, icon.clone())
                .path(game.path)
                .on_confirm(move |fx| {
                    fx.push(Effect::LaunchGame {
                        playlist: playlist.clone(),
                        game: path.clone(),
                    })
                });
            entry.tags = tags;
            root.children.push(entry);
        }

        let (tx, rx) = mpsc::channel();
        Self {
            thumbnails: vec![Thumbnail::Unknown; root.children.len()],
            list: List::new(root),
            fetcher,
            tx,
            rx,
        }
    }

    pub fn list(&self) -> &List {
        &self.list
    }

    pub fn thumbnail(&self, index: usize) -> Option<&Thumbnail> {
        self.thumbnails.get(index)
    }

    fn visible(&self, i: usize) -> bool {
        (-0.1..=1.1).contains(&self.list.view_y(i))
    }

    /// Resolves thumbnails of on-screen entries from the cache, or starts
    /// downloading them.
    fn request_visible(&mut self) {
        let system = self.list.root.label.clone();
        for i in 0..self.thumbnails.len() {
            if self.thumbnails[i] != Thumbnail::Unknown || !self.visible(i) {
                continue;
            }
            let Some(fetcher) = &self.fetcher else {
                self.thumbnails[i] = Thumbnail::Broken;
                continue;
            };
            let game = self.list.root.children[i]
                .path
                .as_ref()
                .and_then(|p| p.file_stem())
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();

            let cached = fetcher.cache_path(&system, &game);
            self.thumbnails[i] = if cached.exists() {
                Thumbnail::Ready(cached)
            } else if runtime_available() {
                fetcher.spawn(i, system.clone(), game, self.tx.clone());
                Thumbnail::Downloading
            } else {
                Thumbnail::Broken
            };
        }
    }
}

impl Scene for Playlist {
    fn kind(&self) -> SceneKind {
        SceneKind::Playlist
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

    fn drain(&mut self, _cx: &mut SceneCx) {
        while let Ok(msg) = self.rx.try_recv() {
            let Some(slot) = self.thumbnails.get_mut(msg.index) else {
                continue;
            };
            *slot = match msg.result {
                Ok(path) => Thumbnail::Ready(path),
                Err(e) => {
                    debug!("Thumbnail {} broken: {}", msg.index, e);
                    Thumbnail::Broken
                }
            };
        }
        self.request_visible();
    }

    fn render(&self, r: &mut dyn Renderer, view: &ViewCx) {
        let ratio = view.ratio();
        let h = view.viewport.height;
        let list = &self.list;

        if view.focused {
            r.print(96.0 * ratio, 120.0 * ratio, 0.8 * ratio, text_color(view), &list.root.label);
        }
        list.draw_cursor(r, view);

        let font_offset = 64.0 * 0.7 * ratio * 0.3;
        for (i, child) in list.root.children.iter().enumerate() {
            let y = list.view_y(i);
            if !(-0.1..=1.1).contains(&y) {
                continue;
            }
            let e = EntryView::read(&list.arena, i);
            let color = text_color(view).with_alpha(e.icon_alpha);

            let playing = child.path.as_deref().is_some_and(|p| view.content.is_playing(p));
            let icon = if playing { "resume" } else { child.icon.as_str() };
            let icon_y = h * y - 14.0 * ratio - 64.0 * e.scale * ratio + font_offset;
            r.draw_image(
                icon,
                610.0 * ratio - 64.0 * e.scale * ratio,
                icon_y,
                128.0 * ratio,
                128.0 * ratio,
                e.scale,
                color,
            );

            if e.label_alpha <= 0.0 {
                continue;
            }
            r.print(
                670.0 * ratio,
                h * y + font_offset,
                0.7 * ratio,
                color.with_alpha(e.label_alpha),
                &child.label,
            );

            let mut stack = 670.0 * ratio + r.text_width(0.7 * ratio, &child.label).floor() + 10.0;
            for tag in &child.tags {
                stack += 20.0;
                let tag_y = h * y - 22.0 * ratio;
                r.draw_image(tag, stack, tag_y, 60.0 * ratio, 44.0 * ratio, 1.0, Color::WHITE.with_alpha(e.tag_alpha));
                r.draw_border(
                    stack,
                    tag_y,
                    60.0 * ratio,
                    44.0 * ratio,
                    0.05 / ratio,
                    Color::BLACK.with_alpha(e.tag_alpha / 4.0),
                );
                stack += 60.0 * ratio;
            }

            if let Some(thumb) = self.thumbnails.get(i) {
                r.draw_image(
                    &thumb.image_key(),
                    600.0 * ratio - 64.0 * e.scale * ratio,
                    icon_y,
                    128.0 * ratio * 4.0 / 3.0,
                    128.0 * ratio,
                    e.scale,
                    Color::WHITE,
                );
            }
        }
    }

    fn hints(&self) -> Vec<Hint> {
        vec![
            (HintIcon::UpDown, "NAVIGATE"),
            (HintIcon::B, "BACK"),
            (HintIcon::A, "RUN"),
        ]
    }

    fn selection(&self) -> Option<usize> {
        Some(self.list.ptr())
    }
}
