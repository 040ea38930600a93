//! # Scenes
//!
//! One navigable screen of the menu. Scenes are trait objects on the
//! [`SceneStack`](super::stack::SceneStack); the stack drives their
//! lifecycle hooks and only the top scene receives input.
//!
//! ```text
//!  push ──► Mounting ──(entrance tweens done)──► Active
//!                                                  │ pop
//!                                                  ▼
//!                   Disposed ◄──(exit tweens done)── TransitioningOut
//! ```
//!
//! Hooks run with a [`SceneCx`], which scopes tween registration to the
//! scene's own id and collects [`Effect`]s for the frontend to execute.

use std::path::{Path, PathBuf};

use crate::core::action::Effect;
use crate::core::config::Settings;
use crate::core::repeat::RepeatTimers;
use crate::core::tween::{Arena, Easing, SceneId, Slot, TweenKey, TweenScheduler};
use crate::input::types::{ButtonId, Edges, InputFrame};

use super::render::{Hint, Renderer, Viewport};

/// Duration of every menu transition, in seconds.
pub const TRANSITION: f32 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneKind {
    Tabs,
    MainMenu,
    QuickMenu,
    Playlist,
    Keyboard,
    NetworkPicker,
    OptionList,
    Explorer,
    List,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneState {
    Mounting,
    Active,
    TransitioningOut,
    Disposed,
}

/// What the scene needs to know about the emulated content.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentStatus {
    pub running: bool,
    pub game_path: Option<PathBuf>,
}

impl ContentStatus {
    pub fn is_playing(&self, path: &Path) -> bool {
        self.game_path.as_deref() == Some(path)
    }
}

/// Player 0's held buttons and edges for this tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct MenuInput {
    pub held: InputFrame,
    pub edges: Edges,
}

impl MenuInput {
    pub fn new(held: InputFrame, edges: Edges) -> Self {
        Self { held, edges }
    }

    pub fn held(&self, button: ButtonId) -> bool {
        self.held.get(0, button)
    }

    pub fn released(&self, button: ButtonId) -> bool {
        self.edges.released.get(0, button)
    }
}

/// Per-call context handed to scene hooks.
pub struct SceneCx<'a> {
    pub id: SceneId,
    /// Stack depth, counting this scene.
    pub depth: usize,
    pub viewport: Viewport,
    pub content: &'a ContentStatus,
    pub tweens: &'a mut TweenScheduler,
    pub repeat: &'a mut RepeatTimers,
    pub effects: &'a mut Vec<Effect>,
}

impl SceneCx<'_> {
    /// Tweens one of this scene's slots with the standard menu transition.
    pub fn animate(&mut self, arena: &Arena, slot: Slot, to: f32) {
        self.tweens
            .animate(TweenKey::new(self.id, slot), arena, to, TRANSITION, Easing::OutSine);
    }

    pub fn emit(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    /// Resolves this scene's pending tweens into its arena.
    pub fn settle(&mut self, arena: &mut Arena) {
        self.tweens.settle(self.id, arena);
    }
}

/// Read-only context for rendering.
#[derive(Debug, Clone, Copy)]
pub struct ViewCx<'a> {
    pub viewport: Viewport,
    pub content: &'a ContentStatus,
    pub pad_connected: bool,
    pub focused: bool,
}

impl ViewCx<'_> {
    pub fn ratio(&self) -> f32 {
        self.viewport.ratio()
    }
}

pub trait Scene {
    fn kind(&self) -> SceneKind;
    fn label(&self) -> &str;
    fn arena(&self) -> &Arena;
    fn arena_mut(&mut self) -> &mut Arena;

    /// Sets initial slot values and registers entrance tweens.
    fn mount(&mut self, cx: &mut SceneCx);

    /// Another scene is being pushed on top of this one.
    fn segue_next(&mut self, cx: &mut SceneCx);

    /// This scene was popped. Registers its exit tweens.
    fn exit(&mut self, cx: &mut SceneCx);

    /// The scene above was popped and this one is on top again. Refreshes
    /// derived state without rebuilding the tree.
    fn refocus(&mut self, cx: &mut SceneCx);

    /// Handles one tick of input. Only called on the top scene.
    fn update(&mut self, dt: f32, input: &MenuInput, cx: &mut SceneCx);

    /// Applies results from background producers. Called every tick on
    /// every live scene, before `update`.
    fn drain(&mut self, _cx: &mut SceneCx) {}

    fn render(&self, r: &mut dyn Renderer, view: &ViewCx);

    fn hints(&self) -> Vec<Hint>;

    /// Selected child index, for scenes that have one.
    fn selection(&self) -> Option<usize> {
        None
    }

    /// Settings were changed elsewhere; refresh any cached copy.
    fn settings_changed(&mut self, _settings: &Settings) {}
}
