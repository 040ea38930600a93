//! retronav library exports for the binary and integration tests

pub mod core;
pub mod frontend;
pub mod input;
pub mod menu;
pub mod producers;
pub mod tui;

#[cfg(test)]
pub mod test_support;
