//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::core::action::{Effect, Network};
use crate::core::config::{ConfigError, Settings, SettingsStore};
use crate::core::host::{CoreHost, CoreOption, Game, HostError, Library, PlaylistInfo, Window};
use crate::core::repeat::RepeatTimers;
use crate::core::tween::{Arena, SceneId, Slot, TweenScheduler};
use crate::input::aggregator::DeviceLayer;
use crate::input::types::{ButtonId, Edges, InputFrame, Key, MAX_PLAYERS, PadSnapshot};
use crate::menu::render::{Color, Hint, Renderer, Viewport};
use crate::menu::scene::{ContentStatus, MenuInput, Scene, SceneCx, SceneKind, TRANSITION, ViewCx};
use crate::producers::ProducerError;
use crate::producers::network::NetworkManager;

// ============================================================================
// Rendering
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Image { key: String, x: f32, y: f32, w: f32, h: f32, scale: f32, color: Color },
    Rect { x: f32, y: f32, w: f32, h: f32, color: Color },
    RoundedRect { x: f32, y: f32, w: f32, h: f32, color: Color },
    Border { x: f32, y: f32, w: f32, h: f32, color: Color },
    Text { x: f32, y: f32, scale: f32, color: Color, text: String },
}

/// Renderer that records every call.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub calls: Vec<DrawCall>,
}

impl RecordingRenderer {
    pub fn images(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Image { key, .. } => Some(key.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Renderer for RecordingRenderer {
    fn draw_image(&mut self, key: &str, x: f32, y: f32, w: f32, h: f32, scale: f32, color: Color) {
        self.calls.push(DrawCall::Image {
            key: key.to_string(),
            x,
            y,
            w,
            h,
            scale,
            color,
        });
    }

    fn draw_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.calls.push(DrawCall::Rect { x, y, w, h, color });
    }

    fn draw_rounded_rect(&mut self, x: f32, y: f32, w: f32, h: f32, _radius: f32, color: Color) {
        self.calls.push(DrawCall::RoundedRect { x, y, w, h, color });
    }

    fn draw_border(&mut self, x: f32, y: f32, w: f32, h: f32, _thickness: f32, color: Color) {
        self.calls.push(DrawCall::Border { x, y, w, h, color });
    }

    fn print(&mut self, x: f32, y: f32, scale: f32, color: Color, text: &str) {
        self.calls.push(DrawCall::Text {
            x,
            y,
            scale,
            color,
            text: text.to_string(),
        });
    }

    fn text_width(&self, scale: f32, text: &str) -> f32 {
        text.chars().count() as f32 * 40.0 * scale
    }
}

// ============================================================================
// Input
// ============================================================================

#[derive(Debug, Default)]
pub struct FakeDevices {
    keys: HashSet<Key>,
    pads: HashMap<usize, PadSnapshot>,
}

impl FakeDevices {
    pub fn press(&mut self, key: Key) {
        self.keys.insert(key);
    }

    pub fn release(&mut self, key: Key) {
        self.keys.remove(&key);
    }

    pub fn plug(&mut self, slot: usize, name: &str, buttons: usize, axes: usize) {
        self.pads.insert(
            slot,
            PadSnapshot {
                name: name.to_string(),
                buttons: vec![false; buttons],
                axes: vec![0.0; axes],
            },
        );
    }

    pub fn unplug(&mut self, slot: usize) {
        self.pads.remove(&slot);
    }

    pub fn pad_button(&mut self, slot: usize, index: usize, held: bool) {
        if let Some(b) = self.pads.get_mut(&slot).and_then(|p| p.buttons.get_mut(index)) {
            *b = held;
        }
    }

    pub fn pad_axis(&mut self, slot: usize, index: usize, value: f32) {
        if let Some(a) = self.pads.get_mut(&slot).and_then(|p| p.axes.get_mut(index)) {
            *a = value;
        }
    }
}

impl DeviceLayer for FakeDevices {
    fn key_down(&self, key: Key) -> bool {
        self.keys.contains(&key)
    }

    fn pad(&self, slot: usize) -> Option<PadSnapshot> {
        if slot >= MAX_PLAYERS {
            return None;
        }
        self.pads.get(&slot).cloned()
    }
}

pub fn held(button: ButtonId) -> MenuInput {
    let mut frame = InputFrame::new();
    frame.set(0, button, true);
    MenuInput::new(frame, Edges::default())
}

pub fn released(button: ButtonId) -> MenuInput {
    let mut edges = Edges::default();
    edges.released.set(0, button, true);
    MenuInput::new(InputFrame::new(), edges)
}

// ============================================================================
// Scenes
// ============================================================================

/// Owns everything a `SceneCx` borrows, for driving one scene by hand.
pub struct SceneHarness {
    pub tweens: TweenScheduler,
    pub repeat: RepeatTimers,
    pub effects: Vec<Effect>,
    pub content: ContentStatus,
    pub viewport: Viewport,
}

impl Default for SceneHarness {
    fn default() -> Self {
        Self {
            tweens: TweenScheduler::new(),
            repeat: RepeatTimers::default(),
            effects: Vec::new(),
            content: ContentStatus::default(),
            viewport: Viewport::default(),
        }
    }
}

impl SceneHarness {
    pub const ID: SceneId = SceneId(0);

    pub fn cx(&mut self, depth: usize) -> SceneCx<'_> {
        SceneCx {
            id: Self::ID,
            depth,
            viewport: self.viewport,
            content: &self.content,
            tweens: &mut self.tweens,
            repeat: &mut self.repeat,
            effects: &mut self.effects,
        }
    }

    /// Mounts and resolves the entrance animation.
    pub fn mount(&mut self, scene: &mut dyn Scene) {
        scene.mount(&mut self.cx(2));
        self.settle(scene);
    }

    pub fn settle(&mut self, scene: &mut dyn Scene) {
        self.tweens.settle(Self::ID, scene.arena_mut());
    }

    /// One update at depth 2 (so Cancel pops).
    pub fn update(&mut self, scene: &mut dyn Scene, input: &MenuInput) {
        scene.drain(&mut self.cx(2));
        scene.update(1.0 / 60.0, input, &mut self.cx(2));
    }

    pub fn render(&self, scene: &dyn Scene) -> RecordingRenderer {
        let view = ViewCx {
            viewport: self.viewport,
            content: &self.content,
            pad_connected: false,
            focused: true,
        };
        let mut r = RecordingRenderer::default();
        scene.render(&mut r, &view);
        r
    }

    pub fn take_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }
}

/// Minimal scene that records its hook calls.
pub struct HookLogScene {
    label: String,
    log: Rc<RefCell<Vec<String>>>,
    arena: Arena,
    on_refocus: Option<Effect>,
}

impl HookLogScene {
    pub const ALPHA: Slot = Slot(0);

    pub fn new(label: &str) -> (Self, Rc<RefCell<Vec<String>>>) {
        Self::with_log(label, Rc::new(RefCell::new(Vec::new())))
    }

    pub fn with_log(label: &str, log: Rc<RefCell<Vec<String>>>) -> (Self, Rc<RefCell<Vec<String>>>) {
        let scene = Self {
            label: label.to_string(),
            log: log.clone(),
            arena: Arena::new(),
            on_refocus: None,
        };
        (scene, log)
    }

    /// Emits `effect` every time the scene regains focus.
    pub fn emitting_on_refocus(mut self, effect: Effect) -> Self {
        self.on_refocus = Some(effect);
        self
    }

    fn record(&self, hook: &str) {
        self.log.borrow_mut().push(format!("{}:{}", self.label, hook));
    }
}

impl Scene for HookLogScene {
    fn kind(&self) -> SceneKind {
        SceneKind::List
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
        self.record("mount");
        self.arena.set(Self::ALPHA, 0.0);
        cx.animate(&self.arena, Self::ALPHA, 1.0);
    }

    fn segue_next(&mut self, _cx: &mut SceneCx) {
        self.record("segue_next");
    }

    fn exit(&mut self, cx: &mut SceneCx) {
        self.record("exit");
        cx.tweens.animate(
            crate::core::tween::TweenKey::new(cx.id, Self::ALPHA),
            &self.arena,
            0.0,
            TRANSITION,
            crate::core::tween::Easing::Linear,
        );
    }

    fn refocus(&mut self, cx: &mut SceneCx) {
        self.record("refocus");
        if let Some(effect) = &self.on_refocus {
            cx.emit(effect.clone());
        }
    }

    fn update(&mut self, _dt: f32, _input: &MenuInput, _cx: &mut SceneCx) {
        self.record("update");
    }

    fn drain(&mut self, _cx: &mut SceneCx) {
        self.record("drain");
    }

    fn render(&self, r: &mut dyn Renderer, _view: &ViewCx) {
        r.print(0.0, 0.0, 1.0, Color::BLACK, &self.label);
    }

    fn hints(&self) -> Vec<Hint> {
        Vec::new()
    }
}

// ============================================================================
// Collaborators
// ============================================================================

#[derive(Debug, Default)]
pub struct MemorySettings {
    pub settings: Settings,
    pub saves: usize,
    pub fail_save: bool,
}

impl SettingsStore for MemorySettings {
    fn settings(&self) -> &Settings {
        &self.settings
    }

    fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    fn save(&mut self) -> Result<(), ConfigError> {
        if self.fail_save {
            return Err(ConfigError::Io(std::io::Error::other("disk full")));
        }
        self.saves += 1;
        Ok(())
    }
}

#[derive(Debug)]
pub struct FakeWindow {
    pub size: (u32, u32),
    pub close: bool,
    pub monitors: u32,
    pub reconfigured: Vec<(bool, u32)>,
}

impl Default for FakeWindow {
    fn default() -> Self {
        Self {
            size: (1920, 1080),
            close: false,
            monitors: 1,
            reconfigured: Vec::new(),
        }
    }
}

impl Window for FakeWindow {
    fn framebuffer_size(&self) -> (u32, u32) {
        self.size
    }

    fn set_should_close(&mut self, close: bool) {
        self.close = close;
    }

    fn should_close(&self) -> bool {
        self.close
    }

    fn reconfigure(&mut self, fullscreen: bool, monitor: u32) {
        self.reconfigured.push((fullscreen, monitor));
    }

    fn monitor_count(&self) -> u32 {
        self.monitors
    }
}

#[derive(Debug, Default)]
pub struct FakeCore {
    pub core: Option<PathBuf>,
    pub game: Option<PathBuf>,
    pub loaded_cores: Vec<PathBuf>,
    pub frames: usize,
    pub resets: usize,
    pub volume: Option<f32>,
    pub fail_game: bool,
    pub options: Vec<CoreOption>,
}

impl CoreHost for FakeCore {
    fn is_running(&self) -> bool {
        self.game.is_some()
    }

    fn core_path(&self) -> Option<&Path> {
        self.core.as_deref()
    }

    fn game_path(&self) -> Option<&Path> {
        self.game.as_deref()
    }

    fn load_core(&mut self, path: &Path) -> Result<(), HostError> {
        self.core = Some(path.to_path_buf());
        self.loaded_cores.push(path.to_path_buf());
        Ok(())
    }

    fn load_game(&mut self, path: &Path) -> Result<(), HostError> {
        if self.fail_game {
            return Err(HostError::Core("Failed to load the game.".into()));
        }
        if self.core.is_none() {
            return Err(HostError::Core("No core loaded.".into()));
        }
        self.game = Some(path.to_path_buf());
        Ok(())
    }

    fn reset(&mut self) -> Result<(), HostError> {
        self.resets += 1;
        Ok(())
    }

    fn save_state(&mut self) -> Result<PathBuf, HostError> {
        if self.game.is_none() {
            return Err(HostError::NotRunning);
        }
        Ok(PathBuf::from("/tmp/state"))
    }

    fn load_state(&mut self) -> Result<(), HostError> {
        if self.game.is_none() {
            return Err(HostError::NotRunning);
        }
        Ok(())
    }

    fn screenshot(&mut self) -> Result<PathBuf, HostError> {
        Ok(PathBuf::from("/tmp/shot.png"))
    }

    fn run_frame(&mut self) {
        self.frames += 1;
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = Some(volume);
    }

    fn options(&self) -> Vec<CoreOption> {
        self.options.clone()
    }

    fn set_options(&mut self, options: &[CoreOption]) {
        self.options = options.to_vec();
    }
}

#[derive(Debug, Default)]
pub struct StaticLibrary {
    pub playlists: Vec<PlaylistInfo>,
    pub games: HashMap<PathBuf, Vec<Game>>,
    pub imported: Vec<PathBuf>,
}

impl Library for StaticLibrary {
    fn playlists(&self) -> Vec<PlaylistInfo> {
        self.playlists.clone()
    }

    fn games(&self, playlist: &Path) -> Vec<Game> {
        self.games.get(playlist).cloned().unwrap_or_default()
    }

    fn import(&mut self, files: &[PathBuf]) -> Result<usize, HostError> {
        self.imported.extend_from_slice(files);
        Ok(files.len())
    }
}

/// Network manager answering from a fixed list.
#[derive(Debug, Default)]
pub struct FakeNetwork {
    pub networks: Vec<Network>,
    pub fail_scan: bool,
    pub connected: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl NetworkManager for FakeNetwork {
    async fn scan(&self) -> Result<Vec<Network>, ProducerError> {
        if self.fail_scan {
            return Err(ProducerError::Command("connmanctl scan wifi: no wifi".into()));
        }
        Ok(self.networks.clone())
    }

    async fn status(&self, _network: &Network) -> Result<String, ProducerError> {
        Ok("Ready".into())
    }

    async fn connect(&self, network: &Network, passphrase: &str) -> Result<(), ProducerError> {
        if let Ok(mut connected) = self.connected.lock() {
            connected.push((network.ssid.clone(), passphrase.to_string()));
        }
        Ok(())
    }
}

pub fn network(ssid: &str, status: &str) -> Network {
    Network {
        ssid: ssid.to_string(),
        path: format!("wifi_{}_managed_psk", ssid.to_lowercase()),
        status: status.to_string(),
    }
}
