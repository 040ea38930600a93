//! Concrete scenes. Most are a [`List`](super::list::List) with their own
//! builder and drawing; tabs and the keyboard have layouts of their own.

pub mod explorer;
pub mod keyboard;
pub mod main_menu;
pub mod network;
pub mod options;
pub mod playlist;
pub mod tabs;
