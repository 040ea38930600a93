//! # Tween Scheduler
//!
//! Time-based interpolation of numeric fields.
//!
//! Animated scalars do not live on the types that display them. Each scene
//! owns an [`Arena`] of `f32` slots, and tweens are keyed by
//! `(SceneId, Slot)`:
//!
//! ```text
//! TweenScheduler
//! └── BTreeMap<TweenKey, Tween>
//!       (scene 3, slot 0)  scroll   0.0 → 64.0   OutSine
//!       (scene 3, slot 7)  y        0.8 → 0.5    OutSine
//!                 │
//!                 ▼ tick(dt, target)
//! SlotTarget::write(key, value) ──► scene 3 arena[7] = eased value
//! ```
//!
//! At most one tween exists per key. Registering on a busy key replaces the
//! old tween outright; nothing of the old interpolation is applied after
//! that point. On completion the exact end value is written and the tween
//! is dropped.

use std::collections::BTreeMap;
use std::f32::consts::PI;

/// Stable handle of a scene for the lifetime of the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SceneId(pub u32);

/// Index of an animatable scalar inside a scene's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slot(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TweenKey {
    pub scene: SceneId,
    pub slot: Slot,
}

impl TweenKey {
    pub fn new(scene: SceneId, slot: Slot) -> Self {
        Self { scene, slot }
    }
}

// ============================================================================
// Arena
// ============================================================================

/// Per-scene storage for animated scalars. Slots that were never written
/// read as 0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arena {
    values: Vec<f32>,
}

impl Arena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: Slot) -> f32 {
        self.values.get(slot.0 as usize).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, slot: Slot, value: f32) {
        let i = slot.0 as usize;
        if i >= self.values.len() {
            self.values.resize(i + 1, 0.0);
        }
        self.values[i] = value;
    }

    /// Drops every slot at or above `len`.
    pub fn truncate(&mut self, len: usize) {
        self.values.truncate(len);
    }
}

/// Anything that can receive tween output. The scene stack implements this
/// by routing the key to the right scene's arena.
pub trait SlotTarget {
    fn write(&mut self, key: TweenKey, value: f32);
}

// ============================================================================
// Easing
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    InSine,
    #[default]
    OutSine,
    InOutSine,
    OutQuad,
    OutCubic,
}

impl Easing {
    /// Maps progress `t` in `[0, 1]` to eased progress.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::InSine => 1.0 - (t * PI / 2.0).cos(),
            Easing::OutSine => (t * PI / 2.0).sin(),
            Easing::InOutSine => -((PI * t).cos() - 1.0) / 2.0,
            Easing::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::OutCubic => 1.0 - (1.0 - t).powi(3),
        }
    }
}

// ============================================================================
// Tween
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub from: f32,
    pub to: f32,
    pub duration: f32,
    pub elapsed: f32,
    pub easing: Easing,
}

impl Tween {
    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Current interpolated value. Exactly `to` once complete.
    pub fn value(&self) -> f32 {
        if self.is_complete() {
            return self.to;
        }
        let t = self.elapsed / self.duration;
        self.from + (self.to - self.from) * self.easing.apply(t)
    }
}

// ============================================================================
// Scheduler
// ============================================================================

#[derive(Debug, Default)]
pub struct TweenScheduler {
    tweens: BTreeMap<TweenKey, Tween>,
}

impl TweenScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a tween on `key`, discarding any tween already there.
    pub fn register(&mut self, key: TweenKey, from: f32, to: f32, duration: f32, easing: Easing) {
        self.tweens.insert(
            key,
            Tween {
                from,
                to,
                duration: duration.max(0.0),
                elapsed: 0.0,
                easing,
            },
        );
    }

    /// Like [`register`](Self::register), starting from the slot's current value.
    pub fn animate(&mut self, key: TweenKey, arena: &Arena, to: f32, duration: f32, easing: Easing) {
        let from = arena.get(key.slot);
        self.register(key, from, to, duration, easing);
    }

    /// Advances every tween by `dt` seconds and writes the result.
    pub fn tick(&mut self, dt: f32, target: &mut dyn SlotTarget) {
        self.tweens.retain(|key, tween| {
            tween.elapsed += dt;
            target.write(*key, tween.value());
            !tween.is_complete()
        });
    }

    /// Resolves every pending tween to its end value now.
    pub fn fast_forward(&mut self, target: &mut dyn SlotTarget) {
        for (key, tween) in std::mem::take(&mut self.tweens) {
            target.write(key, tween.to);
        }
    }

    /// Resolves the tweens of one scene straight into its arena.
    pub fn settle(&mut self, scene: SceneId, arena: &mut Arena) {
        self.tweens.retain(|key, tween| {
            if key.scene == scene {
                arena.set(key.slot, tween.to);
                false
            } else {
                true
            }
        });
    }

    /// Drops the tweens of a scene without applying them.
    pub fn cancel_scene(&mut self, scene: SceneId) {
        self.tweens.retain(|key, _| key.scene != scene);
    }

    pub fn has_pending(&self, scene: SceneId) -> bool {
        self.tweens.keys().any(|key| key.scene == scene)
    }

    pub fn get(&self, key: &TweenKey) -> Option<&Tween> {
        self.tweens.get(key)
    }

    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct Sink {
        values: HashMap<TweenKey, f32>,
        writes: usize,
    }

    impl SlotTarget for Sink {
        fn write(&mut self, key: TweenKey, value: f32) {
            self.values.insert(key, value);
            self.writes += 1;
        }
    }

    fn key(slot: u32) -> TweenKey {
        TweenKey::new(SceneId(1), Slot(slot))
    }

    #[test]
    fn test_tick_lands_exactly_on_target() {
        let mut tweens = TweenScheduler::new();
        let mut sink = Sink::default();
        tweens.register(key(0), 0.0, 10.0, 0.15, Easing::OutSine);

        // 1/60 does not divide 0.15 evenly, so the last step overshoots elapsed.
        for _ in 0..10 {
            tweens.tick(1.0 / 60.0, &mut sink);
        }
        assert_eq!(sink.values[&key(0)], 10.0);
        assert!(tweens.is_empty());
    }

    #[test]
    fn test_values_move_monotonically() {
        let mut tweens = TweenScheduler::new();
        let mut sink = Sink::default();
        tweens.register(key(0), 0.0, 1.0, 1.0, Easing::Linear);

        let mut last = 0.0;
        for _ in 0..4 {
            tweens.tick(0.25, &mut sink);
            let v = sink.values[&key(0)];
            assert!(v > last);
            last = v;
        }
        assert_eq!(last, 1.0);
    }

    #[test]
    fn test_reregister_discards_previous_tween() {
        let mut tweens = TweenScheduler::new();
        let mut sink = Sink::default();
        tweens.register(key(0), 0.0, 100.0, 1.0, Easing::Linear);
        tweens.tick(0.5, &mut sink);
        assert_eq!(sink.values[&key(0)], 50.0);

        tweens.register(key(0), 50.0, 0.0, 1.0, Easing::Linear);
        assert_eq!(tweens.len(), 1);
        assert_eq!(tweens.get(&key(0)).map(|t| t.elapsed), Some(0.0));

        for _ in 0..8 {
            tweens.tick(0.25, &mut sink);
            assert!(sink.values[&key(0)] <= 50.0);
        }
        assert_eq!(sink.values[&key(0)], 0.0);
    }

    #[test]
    fn test_fast_forward_resolves_everything_at_once() {
        let mut tweens = TweenScheduler::new();
        let mut sink = Sink::default();
        tweens.register(key(0), 0.0, 1.0, 0.15, Easing::OutSine);
        tweens.register(key(1), 0.3, 0.5, 0.15, Easing::OutSine);
        tweens.register(key(2), 0.0, 0.8, 0.15, Easing::OutSine);

        tweens.fast_forward(&mut sink);
        assert_eq!(sink.writes, 3);
        assert_eq!(sink.values[&key(0)], 1.0);
        assert_eq!(sink.values[&key(1)], 0.5);
        assert_eq!(sink.values[&key(2)], 0.8);
        assert!(tweens.is_empty());
    }

    #[test]
    fn test_zero_duration_completes_on_next_tick() {
        let mut tweens = TweenScheduler::new();
        let mut sink = Sink::default();
        tweens.register(key(0), 3.0, 7.0, 0.0, Easing::OutCubic);
        tweens.tick(0.0, &mut sink);
        assert_eq!(sink.values[&key(0)], 7.0);
        assert!(tweens.is_empty());
    }

    #[test]
    fn test_settle_only_touches_one_scene() {
        let mut tweens = TweenScheduler::new();
        let other = TweenKey::new(SceneId(2), Slot(0));
        tweens.register(key(4), 0.0, 2.0, 1.0, Easing::Linear);
        tweens.register(other, 0.0, 9.0, 1.0, Easing::Linear);

        let mut arena = Arena::new();
        tweens.settle(SceneId(1), &mut arena);
        assert_eq!(arena.get(Slot(4)), 2.0);
        assert!(!tweens.has_pending(SceneId(1)));
        assert!(tweens.has_pending(SceneId(2)));
    }

    #[test]
    fn test_animate_starts_from_arena_value() {
        let mut tweens = TweenScheduler::new();
        let mut arena = Arena::new();
        arena.set(Slot(3), 0.4);
        tweens.animate(key(3), &arena, 1.0, 0.15, Easing::OutSine);
        assert_eq!(tweens.get(&key(3)).map(|t| t.from), Some(0.4));
    }

    #[test]
    fn test_cancel_scene_drops_without_writing() {
        let mut tweens = TweenScheduler::new();
        let mut sink = Sink::default();
        tweens.register(key(0), 0.0, 1.0, 1.0, Easing::Linear);
        tweens.cancel_scene(SceneId(1));
        tweens.tick(1.0, &mut sink);
        assert_eq!(sink.writes, 0);
    }

    #[test]
    fn test_easing_endpoints() {
        for easing in [
            Easing::Linear,
            Easing::InSine,
            Easing::OutSine,
            Easing::InOutSine,
            Easing::OutQuad,
            Easing::OutCubic,
        ] {
            assert!(easing.apply(0.0).abs() < 1e-6, "{easing:?} at 0");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-6, "{easing:?} at 1");
        }
    }

    #[test]
    fn test_arena_reads_zero_for_unset_slots() {
        let mut arena = Arena::new();
        assert_eq!(arena.get(Slot(10)), 0.0);
        arena.set(Slot(10), 1.5);
        assert_eq!(arena.get(Slot(10)), 1.5);
        assert_eq!(arena.get(Slot(9)), 0.0);
        arena.truncate(5);
        assert_eq!(arena.get(Slot(10)), 0.0);
    }
}
