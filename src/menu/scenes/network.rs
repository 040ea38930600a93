//! Wifi network picker. Starts with a placeholder while the scan runs in
//! the background, then swaps in one entry per network.

use std::sync::mpsc::Receiver;

use crate::core::action::{Effect, KeyboardPurpose, Network, SceneRequest};
use crate::core::tween::Arena;
use crate::menu::entry::Entry;
use crate::menu::list::List;
use crate::menu::render::{Hint, HintIcon, Renderer};
use crate::menu::scene::{MenuInput, Scene, SceneCx, SceneKind, ViewCx};
use crate::producers::network::NetworkMsg;

pub struct NetworkPicker {
    list: List,
    rx: Receiver<NetworkMsg>,
    found: bool,
}

fn network_entry(network: Network) -> Entry {
    let status = network.status.clone();
    let request = SceneRequest::Keyboard {
        label: format!("Passphrase for {}", network.ssid),
        purpose: KeyboardPurpose::Passphrase(network.clone()),
    };
    Entry::new(network.ssid, "menu_network")
        .on_value(move || status.clone())
        .on_confirm(move |fx| fx.push(Effect::Push(request.clone())))
}

impl NetworkPicker {
    pub fn new(rx: Receiver<NetworkMsg>) -> Self {
        let mut root = Entry::new("Wi-Fi", "");
        root.children.push(Entry::new("Looking for networks", "reload"));
        Self {
            list: List::new(root),
            rx,
            found: false,
        }
    }

    pub fn list(&self) -> &List {
        &self.list
    }

    fn show_empty(&mut self) {
        if let Some(placeholder) = self.list.root.children.first_mut() {
            placeholder.label = "No network found".into();
            placeholder.icon = "menu_close".into();
        }
    }
}

impl Scene for NetworkPicker {
    fn kind(&self) -> SceneKind {
        SceneKind::NetworkPicker
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

    fn drain(&mut self, cx: &mut SceneCx) {
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                NetworkMsg::Found(networks) if !networks.is_empty() => {
                    self.list
                        .set_children(networks.into_iter().map(network_entry).collect());
                    self.found = true;
                    self.list.mount(cx);
                    cx.settle(&mut self.list.arena);
                }
                NetworkMsg::Found(_) => self.show_empty(),
                NetworkMsg::Failed(e) => {
                    cx.emit(Effect::notify("Network", e));
                    self.show_empty();
                }
            }
        }
    }

    fn render(&self, r: &mut dyn Renderer, view: &ViewCx) {
        self.list.render(r, view);
    }

    fn hints(&self) -> Vec<Hint> {
        let mut hints = vec![(HintIcon::UpDown, "NAVIGATE"), (HintIcon::B, "BACK")];
        if self.found {
            hints.push((HintIcon::A, "CONNECT"));
        }
        hints
    }

    fn selection(&self) -> Option<usize> {
        Some(self.list.ptr())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::types::ButtonId;
    use crate::menu::entry::{EntryView, Field, child_slot};
    use crate::test_support::{SceneHarness, network, released};
    use std::sync::mpsc;

    #[test]
    fn test_placeholder_while_scanning() {
        let (_tx, rx) = mpsc::channel();
        let mut scene = NetworkPicker::new(rx);
        let mut h = SceneHarness::default();
        h.mount(&mut scene);
        h.update(&mut scene, &MenuInput::default());
        assert_eq!(scene.list().root.children[0].label, "Looking for networks");
        assert_eq!(scene.hints().len(), 2);
    }

    #[test]
    fn test_results_replace_children_settled() {
        let (tx, rx) = mpsc::channel();
        let mut scene = NetworkPicker::new(rx);
        let mut h = SceneHarness::default();
        h.mount(&mut scene);
        tx.send(NetworkMsg::Found(vec![network("Home", "Online"), network("Cafe", "")]))
            .unwrap();
        h.update(&mut scene, &MenuInput::default());

        let children = &scene.list().root.children;
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].value().as_deref(), Some("Online"));
        assert!(!h.tweens.has_pending(SceneHarness::ID));
        assert_eq!(EntryView::read(scene.arena(), 0).label_alpha, 1.0);
        assert!((scene.arena().get(child_slot(1, Field::Y)) - 0.68).abs() < 1e-6);
        assert_eq!(scene.hints().last(), Some(&(HintIcon::A, "CONNECT")));
    }

    #[test]
    fn test_empty_scan_shows_no_network() {
        let (tx, rx) = mpsc::channel();
        let mut scene = NetworkPicker::new(rx);
        let mut h = SceneHarness::default();
        h.mount(&mut scene);
        tx.send(NetworkMsg::Found(Vec::new())).unwrap();
        h.update(&mut scene, &MenuInput::default());
        let placeholder = &scene.list().root.children[0];
        assert_eq!((placeholder.label.as_str(), placeholder.icon.as_str()), ("No network found", "menu_close"));
    }

    #[test]
    fn test_failed_scan_notifies() {
        let (tx, rx) = mpsc::channel();
        let mut scene = NetworkPicker::new(rx);
        let mut h = SceneHarness::default();
        h.mount(&mut scene);
        tx.send(NetworkMsg::Failed("no wifi".into())).unwrap();
        h.update(&mut scene, &MenuInput::default());
        assert_eq!(h.take_effects(), vec![Effect::notify("Network", "no wifi")]);
        assert_eq!(scene.list().root.children[0].label, "No network found");
    }

    #[test]
    fn test_confirm_asks_for_passphrase() {
        let (tx, rx) = mpsc::channel();
        let mut scene = NetworkPicker::new(rx);
        let mut h = SceneHarness::default();
        h.mount(&mut scene);
        tx.send(NetworkMsg::Found(vec![network("Home", "")])).unwrap();
        h.update(&mut scene, &MenuInput::default());
        h.update(&mut scene, &released(ButtonId::A));
        assert_eq!(
            h.take_effects(),
            vec![Effect::Push(SceneRequest::Keyboard {
                label: "Passphrase for Home".into(),
                purpose: KeyboardPurpose::Passphrase(network("Home", "")),
            })]
        );
    }

    #[test]
    fn test_placeholder_confirm_is_noop() {
        let (_tx, rx) = mpsc::channel();
        let mut scene = NetworkPicker::new(rx);
        let mut h = SceneHarness::default();
        h.mount(&mut scene);
        h.update(&mut scene, &released(ButtonId::A));
        assert!(h.take_effects().is_empty());
    }
}
