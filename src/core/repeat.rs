//! # Repeat Timer
//!
//! Cooldown gate for held-button actions. Holding a direction fires once
//! immediately, then once per interval for as long as it stays held.

/// Interval between repeated moves while a direction is held, in seconds.
pub const DEFAULT_INTERVAL: f32 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RepeatTimer {
    cooldown: f32,
    interval: f32,
}

impl Default for RepeatTimer {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL)
    }
}

impl RepeatTimer {
    pub fn new(interval: f32) -> Self {
        Self {
            cooldown: 0.0,
            interval,
        }
    }

    /// Advances the cooldown by `dt` and reports whether the gated action
    /// fires this tick.
    pub fn update(&mut self, dt: f32, held: bool) -> bool {
        self.cooldown = (self.cooldown - dt).max(0.0);
        if held && self.cooldown == 0.0 {
            self.cooldown = self.interval;
            return true;
        }
        false
    }

    pub fn reset(&mut self) {
        self.cooldown = 0.0;
    }
}

/// One timer per logical direction, plus character delete.
#[derive(Debug, Clone, Copy, Default)]
pub struct RepeatTimers {
    pub up: RepeatTimer,
    pub down: RepeatTimer,
    pub left: RepeatTimer,
    pub right: RepeatTimer,
    pub delete: RepeatTimer,
}

impl RepeatTimers {
    pub fn new(interval: f32) -> Self {
        let t = RepeatTimer::new(interval);
        Self {
            up: t,
            down: t,
            left: t,
            right: t,
            delete: t,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_fires(timer: &mut RepeatTimer, dt: f32, ticks: usize) -> usize {
        (0..ticks).filter(|_| timer.update(dt, true)).count()
    }

    #[test]
    fn test_short_hold_fires_once() {
        let mut timer = RepeatTimer::new(0.15);
        // 0.1s of holding at 60 fps
        assert_eq!(count_fires(&mut timer, 1.0 / 60.0, 6), 1);
    }

    #[test]
    fn test_long_hold_fires_once_per_interval() {
        let mut timer = RepeatTimer::new(0.25);
        // 10 intervals, dt divides the interval exactly
        let fires = count_fires(&mut timer, 0.05, 50);
        assert!((9..=11).contains(&fires), "fired {fires} times");
    }

    #[test]
    fn test_release_does_not_fire_but_cools_down() {
        let mut timer = RepeatTimer::new(0.15);
        assert!(timer.update(0.016, true));
        assert!(!timer.update(0.1, false));
        assert!(!timer.update(0.01, true));
        assert!(!timer.update(0.1, false));
        assert!(timer.update(0.0, true));
    }

    #[test]
    fn test_cooldown_never_goes_negative() {
        let mut timer = RepeatTimer::new(0.15);
        timer.update(0.0, true);
        timer.update(10.0, false);
        assert_eq!(timer.cooldown, 0.0);
    }

    #[test]
    fn test_directions_are_independent() {
        let mut timers = RepeatTimers::default();
        assert!(timers.down.update(0.016, true));
        assert!(timers.up.update(0.016, true));
        assert!(!timers.down.update(0.016, true));
        assert!(timers.delete.update(0.016, true));
    }
}
