//! # Input
//!
//! Keyboard and joypad state, merged into one [`InputFrame`](types::InputFrame)
//! per tick.
//!
//! ```text
//! DeviceLayer ──poll──► InputAggregator ──► InputFrame + Edges
//!                                               │
//!                        ActionRouter ◄─────────┤ (released edges, player 0)
//!                        focused Scene ◄────────┘
//! ```

pub mod aggregator;
pub mod binds;
pub mod router;
pub mod types;
