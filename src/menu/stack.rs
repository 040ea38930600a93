//! # Scene Stack
//!
//! Ordered modal stack of scenes. The last layer is focused; everything
//! below stays rendered so transitions can overlap.
//!
//! ```text
//! layers:   [ Tabs ][ MainMenu ][ Explorer ]   ◄── focused
//! leaving:  [ Keyboard (TransitioningOut) ]        drawn last, then disposed
//! ```
//!
//! A popped scene is not dropped immediately. It moves to `leaving`, plays
//! its exit tweens and is disposed by [`SceneStack::reap`] once the
//! scheduler has nothing pending for it.

use log::debug;

use crate::core::action::Effect;
use crate::core::repeat::RepeatTimers;
use crate::core::tween::{SceneId, SlotTarget, TweenKey, TweenScheduler};

use super::render::{Hint, Renderer, Viewport};
use super::scene::{ContentStatus, MenuInput, Scene, SceneCx, SceneState, ViewCx};

struct Layer {
    id: SceneId,
    state: SceneState,
    scene: Box<dyn Scene>,
}

/// Collaborators the stack lends to scene hooks.
pub struct StackEnv<'a> {
    pub viewport: Viewport,
    pub content: &'a ContentStatus,
    pub tweens: &'a mut TweenScheduler,
    pub repeat: &'a mut RepeatTimers,
    pub effects: &'a mut Vec<Effect>,
}

impl StackEnv<'_> {
    fn cx(&mut self, id: SceneId, depth: usize) -> SceneCx<'_> {
        SceneCx {
            id,
            depth,
            viewport: self.viewport,
            content: self.content,
            tweens: &mut *self.tweens,
            repeat: &mut *self.repeat,
            effects: &mut *self.effects,
        }
    }
}

#[derive(Default)]
pub struct SceneStack {
    layers: Vec<Layer>,
    leaving: Vec<Layer>,
    next_id: u32,
}

impl SceneStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mounts `scene` on top. The previous top segues out of focus but
    /// stays on the stack.
    pub fn push(&mut self, mut scene: Box<dyn Scene>, env: &mut StackEnv) -> SceneId {
        let depth = self.layers.len();
        if let Some(top) = self.layers.last_mut() {
            top.scene.segue_next(&mut env.cx(top.id, depth));
        }

        let id = SceneId(self.next_id);
        self.next_id += 1;
        debug!("Pushing {:?} '{}' as {:?}", scene.kind(), scene.label(), id);
        scene.mount(&mut env.cx(id, depth + 1));
        self.layers.push(Layer {
            id,
            state: SceneState::Mounting,
            scene,
        });
        id
    }

    /// Pops the top scene. No-op at depth 1.
    pub fn pop(&mut self, env: &mut StackEnv) -> bool {
        let depth = self.layers.len();
        if depth <= 1 {
            return false;
        }
        let Some(mut layer) = self.layers.pop() else {
            return false;
        };
        debug!("Popping {:?} '{}'", layer.scene.kind(), layer.scene.label());
        layer.scene.exit(&mut env.cx(layer.id, depth));
        layer.state = SceneState::TransitioningOut;
        self.leaving.push(layer);

        if let Some(top) = self.layers.last_mut() {
            top.scene.refocus(&mut env.cx(top.id, depth - 1));
        }
        true
    }

    /// Promotes settled scenes to Active and disposes finished exits.
    /// Returns how many scenes were disposed.
    pub fn reap(&mut self, tweens: &mut TweenScheduler) -> usize {
        for layer in &mut self.layers {
            if layer.state == SceneState::Mounting && !tweens.has_pending(layer.id) {
                layer.state = SceneState::Active;
            }
        }

        let before = self.leaving.len();
        self.leaving.retain_mut(|layer| {
            if tweens.has_pending(layer.id) {
                return true;
            }
            layer.state = SceneState::Disposed;
            debug!("Disposed {:?} '{}'", layer.scene.kind(), layer.scene.label());
            false
        });
        before - self.leaving.len()
    }

    /// Lets every live scene apply producer results.
    pub fn drain(&mut self, env: &mut StackEnv) {
        for (i, layer) in self.layers.iter_mut().enumerate() {
            layer.scene.drain(&mut env.cx(layer.id, i + 1));
        }
    }

    /// Routes input to the focused scene.
    pub fn update_top(&mut self, dt: f32, input: &MenuInput, env: &mut StackEnv) {
        let depth = self.layers.len();
        if let Some(top) = self.layers.last_mut() {
            top.scene.update(dt, input, &mut env.cx(top.id, depth));
        }
    }

    /// Draws bottom to top, then scenes still animating out.
    pub fn render(&self, r: &mut dyn Renderer, view: &ViewCx) {
        let top = self.layers.len().saturating_sub(1);
        for (i, layer) in self.layers.iter().enumerate() {
            let view = ViewCx {
                focused: i == top,
                ..*view
            };
            layer.scene.render(r, &view);
        }
        for layer in &self.leaving {
            let view = ViewCx {
                focused: false,
                ..*view
            };
            layer.scene.render(r, &view);
        }
    }

    pub fn for_each_mut(&mut self, mut f: impl FnMut(&mut dyn Scene)) {
        for layer in &mut self.layers {
            f(layer.scene.as_mut());
        }
    }

    pub fn top(&self) -> Option<&dyn Scene> {
        self.layers.last().map(|l| l.scene.as_ref())
    }

    pub fn top_id(&self) -> Option<SceneId> {
        self.layers.last().map(|l| l.id)
    }

    pub fn hints(&self) -> Vec<Hint> {
        self.top().map(|s| s.hints()).unwrap_or_default()
    }

    pub fn depth(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn leaving(&self) -> usize {
        self.leaving.len()
    }

    /// Lifecycle state of a live or leaving scene. `None` once disposed.
    pub fn state(&self, id: SceneId) -> Option<SceneState> {
        self.layers
            .iter()
            .chain(self.leaving.iter())
            .find(|l| l.id == id)
            .map(|l| l.state)
    }

    pub fn get(&self, id: SceneId) -> Option<&dyn Scene> {
        self.layers
            .iter()
            .chain(self.leaving.iter())
            .find(|l| l.id == id)
            .map(|l| l.scene.as_ref())
    }

    /// Drops every scene, live or leaving.
    pub fn clear(&mut self, tweens: &mut TweenScheduler) {
        for layer in self.layers.drain(..).chain(self.leaving.drain(..)) {
            tweens.cancel_scene(layer.id);
        }
    }
}

impl SlotTarget for SceneStack {
    fn write(&mut self, key: TweenKey, value: f32) {
        if let Some(layer) = self
            .layers
            .iter_mut()
            .chain(self.leaving.iter_mut())
            .find(|l| l.id == key.scene)
        {
            layer.scene.arena_mut().set(key.slot, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::HookLogScene;

    struct Harness {
        stack: SceneStack,
        tweens: TweenScheduler,
        repeat: RepeatTimers,
        effects: Vec<Effect>,
        content: ContentStatus,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                stack: SceneStack::new(),
                tweens: TweenScheduler::new(),
                repeat: RepeatTimers::default(),
                effects: Vec::new(),
                content: ContentStatus::default(),
            }
        }

        fn push(&mut self, scene: HookLogScene) -> SceneId {
            let mut env = StackEnv {
                viewport: Viewport::default(),
                content: &self.content,
                tweens: &mut self.tweens,
                repeat: &mut self.repeat,
                effects: &mut self.effects,
            };
            self.stack.push(Box::new(scene), &mut env)
        }

        fn pop(&mut self) -> bool {
            let mut env = StackEnv {
                viewport: Viewport::default(),
                content: &self.content,
                tweens: &mut self.tweens,
                repeat: &mut self.repeat,
                effects: &mut self.effects,
            };
            self.stack.pop(&mut env)
        }

        fn tick(&mut self, dt: f32) {
            self.tweens.tick(dt, &mut self.stack);
            self.stack.reap(&mut self.tweens);
        }
    }

    #[test]
    fn test_push_runs_hooks_in_order() {
        let (first, log) = HookLogScene::new("first");
        let (second, _) = HookLogScene::with_log("second", log.clone());
        let mut h = Harness::new();
        h.push(first);
        h.push(second);
        assert_eq!(
            *log.borrow(),
            vec!["first:mount", "first:segue_next", "second:mount"]
        );
        assert_eq!(h.stack.depth(), 2);
        assert_eq!(h.stack.top().map(|s| s.label()), Some("second"));
    }

    #[test]
    fn test_pop_at_depth_one_is_noop() {
        let (only, log) = HookLogScene::new("only");
        let mut h = Harness::new();
        h.push(only);
        assert!(!h.pop());
        assert_eq!(h.stack.depth(), 1);
        assert_eq!(*log.borrow(), vec!["only:mount"]);
    }

    #[test]
    fn test_pop_exits_then_refocuses() {
        let (first, log) = HookLogScene::new("first");
        let (second, _) = HookLogScene::with_log("second", log.clone());
        let mut h = Harness::new();
        h.push(first);
        h.push(second);
        log.borrow_mut().clear();

        assert!(h.pop());
        assert_eq!(*log.borrow(), vec!["second:exit", "first:refocus"]);
        assert_eq!(h.stack.depth(), 1);
        assert_eq!(h.stack.leaving(), 1);
    }

    #[test]
    fn test_lifecycle_states() {
        let (first, _) = HookLogScene::new("first");
        let (second, _) = HookLogScene::new("second");
        let mut h = Harness::new();
        h.push(first);
        let id = h.push(second);
        assert_eq!(h.stack.state(id), Some(SceneState::Mounting));

        h.tick(1.0);
        assert_eq!(h.stack.state(id), Some(SceneState::Active));

        h.pop();
        assert_eq!(h.stack.state(id), Some(SceneState::TransitioningOut));
        // Still rendered while the exit tween runs.
        h.tweens.tick(0.05, &mut h.stack);
        assert_eq!(h.stack.reap(&mut h.tweens), 0);

        h.tick(1.0);
        assert_eq!(h.stack.state(id), None);
        assert_eq!(h.stack.leaving(), 0);
    }

    #[test]
    fn test_tween_writes_reach_leaving_scene() {
        let (first, _) = HookLogScene::new("first");
        let (second, _) = HookLogScene::new("second");
        let mut h = Harness::new();
        h.push(first);
        let id = h.push(second);
        h.tick(1.0);
        h.pop();
        h.tweens.tick(0.075, &mut h.stack);
        let alpha = h.stack.get(id).map(|s| s.arena().get(HookLogScene::ALPHA));
        assert!(alpha.is_some_and(|a| a > 0.0 && a < 1.0));
    }

    #[test]
    fn test_only_top_receives_input() {
        let (first, log) = HookLogScene::new("first");
        let (second, _) = HookLogScene::with_log("second", log.clone());
        let mut h = Harness::new();
        h.push(first);
        h.push(second);
        log.borrow_mut().clear();

        let mut env = StackEnv {
            viewport: Viewport::default(),
            content: &h.content,
            tweens: &mut h.tweens,
            repeat: &mut h.repeat,
            effects: &mut h.effects,
        };
        h.stack.update_top(0.016, &MenuInput::default(), &mut env);
        h.stack.drain(&mut env);
        assert_eq!(
            *log.borrow(),
            vec!["second:update", "first:drain", "second:drain"]
        );
    }
}
