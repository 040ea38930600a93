//! # Core Building Blocks
//!
//! The pieces of the navigation core that know nothing about scenes or
//! terminals: animation, key repeat, notifications, settings, and the
//! interfaces to the host.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │          CORE           │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • tween (animation)    │
//!                    │  • repeat (held keys)   │
//!                    │  • action (effects)     │
//!                    │  • config (settings)    │
//!                    │                         │
//!                    │  No rendering. No I/O   │
//!                    │  beyond the config file │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    menu    │      │  frontend  │      │    tui     │
//!     │  (scenes)  │      │   (tick)   │      │ (ratatui)  │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`tween`]: Per-frame property animation addressed by arena slot
//! - [`repeat`]: Fixed-interval repeat while a direction is held
//! - [`action`]: `Effect` and `SceneRequest`, what scenes ask the frontend to do
//! - [`notifications`]: Timed on-screen messages
//! - [`config`]: Settings, TOML persistence and overrides
//! - [`host`]: Window, core runtime and library traits

pub mod action;
pub mod config;
pub mod host;
pub mod notifications;
pub mod repeat;
pub mod tween;
