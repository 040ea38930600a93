//! # Menu
//!
//! The navigation core: one [`Menu`] owns the scene stack, the tween
//! scheduler and the repeat timers. There is no process-wide menu state;
//! the frontend constructs a `Menu` at startup and drops it at shutdown.
//!
//! ```text
//! Menu
//! ├── stack: SceneStack          // modal scenes, top is focused
//! ├── tweens: TweenScheduler     // keyed by (scene id, slot)
//! ├── repeat: RepeatTimers       // held-direction gates
//! └── active: bool               // menu shown over the content
//! ```
//!
//! ## Modules
//!
//! - [`entry`]: `Entry` nodes and the arena slot layout
//! - [`scene`]: the `Scene` trait and hook contexts
//! - [`stack`]: `SceneStack` lifecycle
//! - [`list`]: generic list behavior shared by most scenes
//! - [`render`]: the `Renderer` trait, hint bar, notification overlay
//! - [`scenes`]: the concrete scenes

pub mod entry;
pub mod list;
pub mod render;
pub mod scene;
pub mod scenes;
pub mod stack;

use log::debug;

use crate::core::action::Effect;
use crate::core::config::Settings;
use crate::core::repeat::RepeatTimers;
use crate::core::tween::{SceneId, TweenScheduler};

use render::{Renderer, Viewport, draw_hint_bar};
use scene::{ContentStatus, MenuInput, Scene, ViewCx};
use stack::{SceneStack, StackEnv};

pub struct Menu {
    stack: SceneStack,
    tweens: TweenScheduler,
    repeat: RepeatTimers,
    pub active: bool,
}

impl Menu {
    pub fn new(repeat_interval: f32) -> Self {
        Self {
            stack: SceneStack::new(),
            tweens: TweenScheduler::new(),
            repeat: RepeatTimers::new(repeat_interval),
            active: true,
        }
    }

    fn env<'a>(
        tweens: &'a mut TweenScheduler,
        repeat: &'a mut RepeatTimers,
        effects: &'a mut Vec<Effect>,
        viewport: Viewport,
        content: &'a ContentStatus,
    ) -> StackEnv<'a> {
        StackEnv {
            viewport,
            content,
            tweens,
            repeat,
            effects,
        }
    }

    /// Pushes a scene. Returns effects its hooks emitted.
    pub fn push(
        &mut self,
        scene: Box<dyn Scene>,
        viewport: Viewport,
        content: &ContentStatus,
    ) -> (SceneId, Vec<Effect>) {
        let mut effects = Vec::new();
        let mut env = Self::env(&mut self.tweens, &mut self.repeat, &mut effects, viewport, content);
        let id = self.stack.push(scene, &mut env);
        (id, effects)
    }

    /// Pops the focused scene. No-op at depth 1. Returns effects the
    /// exit and refocus hooks emitted.
    pub fn pop(&mut self, viewport: Viewport, content: &ContentStatus) -> Vec<Effect> {
        let mut effects = Vec::new();
        let mut env = Self::env(&mut self.tweens, &mut self.repeat, &mut effects, viewport, content);
        if !self.stack.pop(&mut env) {
            debug!("Pop ignored at the root scene");
        }
        effects
    }

    /// One menu tick: advance tweens, retire finished scenes, drain
    /// producer queues, then hand input to the focused scene.
    pub fn update(
        &mut self,
        dt: f32,
        input: &MenuInput,
        viewport: Viewport,
        content: &ContentStatus,
    ) -> Vec<Effect> {
        self.tweens.tick(dt, &mut self.stack);
        self.stack.reap(&mut self.tweens);

        let mut effects = Vec::new();
        let mut env = Self::env(&mut self.tweens, &mut self.repeat, &mut effects, viewport, content);
        self.stack.drain(&mut env);
        self.stack.update_top(dt, input, &mut env);
        effects
    }

    /// Resolves every pending tween immediately.
    pub fn fast_forward(&mut self) {
        self.tweens.fast_forward(&mut self.stack);
        self.stack.reap(&mut self.tweens);
    }

    pub fn render(&self, r: &mut dyn Renderer, view: &ViewCx) {
        self.stack.render(r, view);
        draw_hint_bar(r, view.viewport, &self.stack.hints(), view.pad_connected);
    }

    pub fn settings_changed(&mut self, settings: &Settings) {
        self.stack.for_each_mut(|scene| scene.settings_changed(settings));
    }

    /// Drops every scene and pending tween.
    pub fn reset(&mut self) {
        self.stack.clear(&mut self.tweens);
    }

    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    pub fn top(&self) -> Option<&dyn Scene> {
        self.stack.top()
    }

    pub fn stack(&self) -> &SceneStack {
        &self.stack
    }

    pub fn tweens(&self) -> &TweenScheduler {
        &self.tweens
    }
}
