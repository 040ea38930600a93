//! # Action Router
//!
//! Global hotkeys that work whether the menu is shown or not. Only player
//! 0's released edges are observed, so holding a key never repeats them.
//!
//! ```text
//! MenuToggle        → show/hide the menu (only while content runs)
//! FullscreenToggle  → flip fullscreen, reconfigure window, persist
//! Quit              → ask the window to close
//! ```

use log::{info, warn};

use crate::core::config::SettingsStore;
use crate::core::host::Window;
use crate::core::notifications::Notifications;

use super::types::{ButtonId, Edges};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    ToggleMenu,
    ToggleFullscreen,
    Quit,
}

/// Collaborators a routed action may touch.
pub struct RouteCx<'a> {
    pub menu_active: &'a mut bool,
    pub content_running: bool,
    pub settings: &'a mut dyn SettingsStore,
    pub window: &'a mut dyn Window,
    pub notifications: &'a mut Notifications,
}

#[derive(Debug, Default)]
pub struct ActionRouter;

impl ActionRouter {
    pub fn new() -> Self {
        Self
    }

    /// Actions triggered by this tick's released edges, in a fixed order.
    pub fn route(&self, edges: &Edges) -> Vec<MenuAction> {
        [
            (ButtonId::MenuToggle, MenuAction::ToggleMenu),
            (ButtonId::FullscreenToggle, MenuAction::ToggleFullscreen),
            (ButtonId::Quit, MenuAction::Quit),
        ]
        .into_iter()
        .filter(|(button, _)| edges.released.get(0, *button))
        .map(|(_, action)| action)
        .collect()
    }

    /// Routes and applies in one step. Returns the applied actions.
    pub fn dispatch(&self, edges: &Edges, cx: &mut RouteCx) -> Vec<MenuAction> {
        let actions = self.route(edges);
        for action in &actions {
            apply(*action, cx);
        }
        actions
    }
}

pub fn apply(action: MenuAction, cx: &mut RouteCx) {
    match action {
        MenuAction::ToggleMenu => {
            if cx.content_running {
                *cx.menu_active = !*cx.menu_active;
                info!("Menu {}", if *cx.menu_active { "shown" } else { "hidden" });
            }
        }
        MenuAction::ToggleFullscreen => {
            let video = {
                let video = &mut cx.settings.settings_mut().video;
                video.fullscreen = !video.fullscreen;
                video.clone()
            };
            cx.window.reconfigure(video.fullscreen, video.monitor_index);
            if let Err(e) = cx.settings.save() {
                warn!("Failed to save settings: {}", e);
                cx.notifications.display_and_log("Settings", &e.to_string());
            }
        }
        MenuAction::Quit => cx.window.set_should_close(true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeWindow, MemorySettings};

    fn released(buttons: &[ButtonId]) -> Edges {
        let mut edges = Edges::default();
        for b in buttons {
            edges.released.set(0, *b, true);
        }
        edges
    }

    #[test]
    fn test_only_player_zero_released_edges() {
        let router = ActionRouter::new();
        let mut edges = Edges::default();
        edges.pressed.set(0, ButtonId::Quit, true);
        edges.released.set(1, ButtonId::Quit, true);
        assert!(router.route(&edges).is_empty());

        let edges = released(&[ButtonId::Quit, ButtonId::MenuToggle]);
        assert_eq!(router.route(&edges), vec![MenuAction::ToggleMenu, MenuAction::Quit]);
    }

    #[test]
    fn test_menu_toggle_requires_running_content() {
        let mut settings = MemorySettings::default();
        let mut window = FakeWindow::default();
        let mut notifications = Notifications::new();
        let mut active = true;
        let mut cx = RouteCx {
            menu_active: &mut active,
            content_running: false,
            settings: &mut settings,
            window: &mut window,
            notifications: &mut notifications,
        };
        apply(MenuAction::ToggleMenu, &mut cx);
        assert!(*cx.menu_active);

        cx.content_running = true;
        apply(MenuAction::ToggleMenu, &mut cx);
        assert!(!*cx.menu_active);
    }

    #[test]
    fn test_fullscreen_toggle_reconfigures_and_saves() {
        let mut settings = MemorySettings::default();
        let mut window = FakeWindow::default();
        let mut notifications = Notifications::new();
        let mut active = true;
        let mut cx = RouteCx {
            menu_active: &mut active,
            content_running: false,
            settings: &mut settings,
            window: &mut window,
            notifications: &mut notifications,
        };
        ActionRouter::new().dispatch(&released(&[ButtonId::FullscreenToggle]), &mut cx);

        assert!(settings.settings().video.fullscreen);
        assert_eq!(settings.saves, 1);
        assert_eq!(window.reconfigured, vec![(true, 0)]);
        assert!(notifications.is_empty());
    }

    #[test]
    fn test_save_failure_becomes_notification() {
        let mut settings = MemorySettings {
            fail_save: true,
            ..Default::default()
        };
        let mut window = FakeWindow::default();
        let mut notifications = Notifications::new();
        let mut active = true;
        let mut cx = RouteCx {
            menu_active: &mut active,
            content_running: false,
            settings: &mut settings,
            window: &mut window,
            notifications: &mut notifications,
        };
        apply(MenuAction::ToggleFullscreen, &mut cx);
        assert_eq!(notifications.len(), 1);
        assert_eq!(window.reconfigured.len(), 1);
    }

    #[test]
    fn test_quit_closes_window() {
        let mut settings = MemorySettings::default();
        let mut window = FakeWindow::default();
        let mut notifications = Notifications::new();
        let mut active = true;
        let mut cx = RouteCx {
            menu_active: &mut active,
            content_running: true,
            settings: &mut settings,
            window: &mut window,
            notifications: &mut notifications,
        };
        ActionRouter::new().dispatch(&released(&[ButtonId::Quit]), &mut cx);
        assert!(window.should_close());
    }
}
