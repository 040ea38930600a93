//! # Option lists
//!
//! Two lists of editable values: front-end settings and the running core's
//! options. Left/Right change a value, A toggles booleans. Each change emits
//! the whole edited set as an effect; the frontend persists and applies it.
//!
//! Both scenes edit a shared copy, so entry closures and the scene see the
//! same values:
//!
//! ```text
//! OptionsScene ──Rc<RefCell<Settings>>──► entry callbacks
//!       ▲                                      │
//!       └──── settings_changed(&Settings) ◄────┴── Effect::SettingsChanged
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use crate::core::action::{Effect, SceneRequest};
use crate::core::config::Settings;
use crate::core::host::CoreOption;
use crate::core::tween::Arena;
use crate::menu::entry::Entry;
use crate::menu::list::{DEFAULT_HINTS, List};
use crate::menu::render::{Hint, HintIcon, Renderer};
use crate::menu::scene::{MenuInput, Scene, SceneCx, SceneKind, ViewCx};

const VOLUME_STEP: f32 = 0.1;

fn on_off(value: bool) -> String {
    if value { "ON" } else { "OFF" }.to_string()
}

fn edit_hints() -> Vec<Hint> {
    vec![
        (HintIcon::UpDown, "NAVIGATE"),
        (HintIcon::LeftRight, "CHANGE"),
        (HintIcon::B, "BACK"),
    ]
}

/// Builds an entry that edits `settings` through `edit` and reports the
/// result. `edit` returns false when nothing changed.
fn setting_entry(
    label: &str,
    settings: &Rc<RefCell<Settings>>,
    value: impl Fn(&Settings) -> String + 'static,
    edit: impl Fn(&mut Settings, i32) -> bool + 'static,
) -> Entry {
    let read = settings.clone();
    let apply = {
        let settings = settings.clone();
        let edit = Rc::new(edit);
        move |dir: i32, fx: &mut Vec<Effect>| {
            let edited = edit(&mut settings.borrow_mut(), dir);
            if edited {
                fx.push(Effect::SettingsChanged(settings.borrow().clone()));
            }
        }
    };
    let confirm = apply.clone();

    Entry::new(label, "setting")
        .on_value(move || value(&read.borrow()))
        .on_increment(apply)
        .on_confirm(move |fx| confirm(0, fx))
}

// ============================================================================
// Settings
// ============================================================================

pub struct OptionsScene {
    list: List,
    settings: Rc<RefCell<Settings>>,
}

impl OptionsScene {
    /// `monitors` bounds the monitor index setting.
    pub fn new(settings: &Settings, monitors: u32) -> Self {
        let shared = Rc::new(RefCell::new(settings.clone()));
        let last_monitor = monitors.max(1) - 1;
        let mut root = Entry::new("Settings", "setting");

        // Direction 0 is a confirm: toggles flip, ranges ignore it.
        root.children.push(setting_entry(
            "Video Fullscreen",
            &shared,
            |s| on_off(s.video.fullscreen),
            |s, _| {
                s.video.fullscreen = !s.video.fullscreen;
                true
            },
        ));
        root.children.push(setting_entry(
            "Video Monitor Index",
            &shared,
            |s| s.video.monitor_index.to_string(),
            move |s, dir| {
                let next = (s.video.monitor_index as i64 + dir as i64).clamp(0, last_monitor as i64) as u32;
                let edited = next != s.video.monitor_index;
                s.video.monitor_index = next;
                edited
            },
        ));
        root.children.push(setting_entry(
            "Audio Volume",
            &shared,
            |s| format!("{:.1}", s.audio.volume),
            |s, dir| {
                let next = ((s.audio.volume + dir as f32 * VOLUME_STEP) * 10.0).round() / 10.0;
                let next = next.clamp(0.0, 1.0);
                let edited = (next - s.audio.volume).abs() > f32::EPSILON;
                s.audio.volume = next;
                edited
            },
        ));
        root.children.push(setting_entry(
            "Show Hidden Files",
            &shared,
            |s| on_off(s.menu.show_hidden_files),
            |s, _| {
                s.menu.show_hidden_files = !s.menu.show_hidden_files;
                true
            },
        ));
        root.children.push(
            Entry::new("Wi-Fi", "menu_network")
                .on_confirm(|fx| fx.push(Effect::Push(SceneRequest::Network))),
        );

        Self {
            list: List::new(root),
            settings: shared,
        }
    }

    pub fn list(&self) -> &List {
        &self.list
    }

    pub fn settings(&self) -> Settings {
        self.settings.borrow().clone()
    }
}

impl Scene for OptionsScene {
    fn kind(&self) -> SceneKind {
        SceneKind::OptionList
    }

    fn label(&self) -> &str {
        &self.list.root.label
    }

    fn arena(&self) -> &Arena {
        &self.list.arena
    }

    fn arena_mut(&mut self) -> &mut Arena {
        &mut self.list.arena
    }

    fn mount(&mut self, cx: &mut SceneCx) {
        self.list.mount(cx);
    }

    fn segue_next(&mut self, cx: &mut SceneCx) {
        self.list.segue_next(cx);
    }

    fn exit(&mut self, cx: &mut SceneCx) {
        self.list.exit(cx);
    }

    fn refocus(&mut self, cx: &mut SceneCx) {
        self.list.animate(cx);
    }

    fn update(&mut self, dt: f32, input: &MenuInput, cx: &mut SceneCx) {
        self.list.input(dt, input, cx);
    }

    fn render(&self, r: &mut dyn Renderer, view: &ViewCx) {
        self.list.render(r, view);
    }

    fn hints(&self) -> Vec<Hint> {
        edit_hints()
    }

    fn selection(&self) -> Option<usize> {
        Some(self.list.ptr())
    }

    fn settings_changed(&mut self, settings: &Settings) {
        *self.settings.borrow_mut() = settings.clone();
    }
}

// ============================================================================
// Core options
// ============================================================================

pub struct CoreOptionsScene {
    list: List,
    options: Rc<RefCell<Vec<CoreOption>>>,
}

impl CoreOptionsScene {
    pub fn new(options: Vec<CoreOption>) -> Self {
        let shared = Rc::new(RefCell::new(options));
        let mut root = Entry::new("Core Options", "subsetting");

        let count = shared.borrow().len();
        for i in 0..count {
            let label = shared.borrow()[i].description.clone();
            let read = shared.clone();
            let write = shared.clone();
            root.children.push(
                Entry::new(label, "setting")
                    .on_value(move || {
                        read.borrow()
                            .get(i)
                            .and_then(|o| o.choices.get(o.selected))
                            .cloned()
                            .unwrap_or_default()
                    })
                    .on_increment(move |dir, fx| {
                        {
                            let mut options = write.borrow_mut();
                            let Some(option) = options.get_mut(i) else {
                                return;
                            };
                            let n = option.choices.len() as i32;
                            if n < 2 {
                                return;
                            }
                            option.selected = (option.selected as i32 + dir).rem_euclid(n) as usize;
                        }
                        fx.push(Effect::CoreOptionsChanged(write.borrow().clone()));
                    }),
            );
        }

        Self {
            list: List::new(root),
            options: shared,
        }
    }

    pub fn list(&self) -> &List {
        &self.list
    }

    pub fn options(&self) -> Vec<CoreOption> {
        self.options.borrow().clone()
    }
}

impl Scene for CoreOptionsScene {
    fn kind(&self) -> SceneKind {
        SceneKind::OptionList
    }

    fn label(&self) -> &str {
        &self.list.root.label
    }

    fn arena(&self) -> &Arena {
        &self.list.arena
    }

    fn arena_mut(&mut self) -> &mut Arena {
        &mut self.list.arena
    }

    fn mount(&mut self, cx: &mut SceneCx) {
        self.list.mount(cx);
    }

    fn segue_next(&mut self, cx: &mut SceneCx) {
        self.list.segue_next(cx);
    }

    fn exit(&mut self, cx: &mut SceneCx) {
        self.list.exit(cx);
    }

    fn refocus(&mut self, cx: &mut SceneCx) {
        self.list.animate(cx);
    }

    fn update(&mut self, dt: f32, input: &MenuInput, cx: &mut SceneCx) {
        self.list.input(dt, input, cx);
    }

    fn render(&self, r: &mut dyn Renderer, view: &ViewCx) {
        self.list.render(r, view);
    }

    fn hints(&self) -> Vec<Hint> {
        if self.list.is_empty() {
            DEFAULT_HINTS[..2].to_vec()
        } else {
            edit_hints()
        }
    }

    fn selection(&self) -> Option<usize> {
        Some(self.list.ptr())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::types::ButtonId;
    use crate::test_support::{SceneHarness, held, released};

    fn select(scene: &mut dyn Scene, h: &mut SceneHarness, index: usize) {
        for _ in 0..index {
            h.update(scene, &held(ButtonId::Down));
            h.repeat.down.reset();
        }
    }

    fn changed(effects: &[Effect]) -> Option<&Settings> {
        match effects.last() {
            Some(Effect::SettingsChanged(s)) => Some(s),
            _ => None,
        }
    }

    #[test]
    fn test_fullscreen_toggles_both_ways() {
        let mut scene = OptionsScene::new(&Settings::default(), 1);
        let mut h = SceneHarness::default();
        h.mount(&mut scene);
        assert_eq!(scene.list().root.children[0].value().as_deref(), Some("OFF"));

        h.update(&mut scene, &released(ButtonId::Right));
        assert!(changed(&h.take_effects()).is_some_and(|s| s.video.fullscreen));
        h.update(&mut scene, &released(ButtonId::A));
        assert!(changed(&h.take_effects()).is_some_and(|s| !s.video.fullscreen));
    }

    #[test]
    fn test_monitor_index_is_clamped() {
        let mut scene = OptionsScene::new(&Settings::default(), 2);
        let mut h = SceneHarness::default();
        h.mount(&mut scene);
        select(&mut scene, &mut h, 1);

        h.update(&mut scene, &released(ButtonId::Left));
        assert!(h.take_effects().is_empty());
        h.update(&mut scene, &released(ButtonId::Right));
        h.update(&mut scene, &released(ButtonId::Right));
        assert_eq!(h.take_effects().len(), 1);
        assert_eq!(scene.settings().video.monitor_index, 1);
    }

    #[test]
    fn test_volume_steps_and_clamps() {
        let mut settings = Settings::default();
        settings.audio.volume = 0.9;
        let mut scene = OptionsScene::new(&settings, 1);
        let mut h = SceneHarness::default();
        h.mount(&mut scene);
        select(&mut scene, &mut h, 2);

        h.update(&mut scene, &released(ButtonId::Right));
        h.update(&mut scene, &released(ButtonId::Right));
        assert_eq!(scene.settings().audio.volume, 1.0);
        assert_eq!(scene.list().root.children[2].value().as_deref(), Some("1.0"));
        assert_eq!(h.take_effects().len(), 1);

        h.update(&mut scene, &released(ButtonId::Left));
        assert!((scene.settings().audio.volume - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_wifi_pushes_network_picker() {
        let mut scene = OptionsScene::new(&Settings::default(), 1);
        let mut h = SceneHarness::default();
        h.mount(&mut scene);
        select(&mut scene, &mut h, 4);
        h.update(&mut scene, &released(ButtonId::A));
        assert_eq!(h.take_effects(), vec![Effect::Push(SceneRequest::Network)]);
    }

    #[test]
    fn test_settings_changed_refreshes_values() {
        let mut scene = OptionsScene::new(&Settings::default(), 1);
        let mut updated = Settings::default();
        updated.menu.show_hidden_files = false;
        scene.settings_changed(&updated);
        assert_eq!(scene.list().root.children[3].value().as_deref(), Some("OFF"));
    }

    fn option(description: &str, choices: &[&str]) -> CoreOption {
        CoreOption {
            key: description.to_lowercase(),
            description: description.to_string(),
            choices: choices.iter().map(|c| c.to_string()).collect(),
            selected: 0,
        }
    }

    #[test]
    fn test_core_option_choices_wrap() {
        let mut scene = CoreOptionsScene::new(vec![option("Palette", &["gray", "green", "blue"])]);
        let mut h = SceneHarness::default();
        h.mount(&mut scene);

        h.update(&mut scene, &released(ButtonId::Left));
        assert_eq!(scene.list().root.children[0].value().as_deref(), Some("blue"));
        match h.take_effects().as_slice() {
            [Effect::CoreOptionsChanged(options)] => assert_eq!(options[0].selected, 2),
            other => panic!("unexpected {other:?}"),
        }

        h.update(&mut scene, &released(ButtonId::Right));
        assert_eq!(scene.options()[0].selected, 0);
    }

    #[test]
    fn test_single_choice_option_does_not_change() {
        let mut scene = CoreOptionsScene::new(vec![option("Region", &["auto"])]);
        let mut h = SceneHarness::default();
        h.mount(&mut scene);
        h.update(&mut scene, &released(ButtonId::Right));
        assert!(h.take_effects().is_empty());
    }

    #[test]
    fn test_no_core_options() {
        let scene = CoreOptionsScene::new(Vec::new());
        assert!(scene.list().is_empty());
        assert_eq!(scene.hints().len(), 2);
    }
}
