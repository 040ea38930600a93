//! File explorer. Lists one directory, filled in by a background listing.
//! Directories open a nested explorer with the same request; files run the
//! request's action.

use std::sync::mpsc::Receiver;

use crate::core::action::{Effect, ExplorerAction, ExplorerRequest, SceneRequest};
use crate::core::tween::Arena;
use crate::menu::entry::Entry;
use crate::menu::list::{DEFAULT_HINTS, List};
use crate::menu::render::{Hint, Renderer};
use crate::menu::scene::{MenuInput, Scene, SceneCx, SceneKind, ViewCx};
use crate::producers::directory::{DirEntry, ListingMsg};

pub const SCAN_LABEL: &str = "<Scan this directory>";

pub struct Explorer {
    list: List,
    request: ExplorerRequest,
    rx: Receiver<ListingMsg>,
}

impl Explorer {
    pub fn new(request: ExplorerRequest, rx: Receiver<ListingMsg>) -> Self {
        let label = request
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| request.path.display().to_string());
        let mut root = Entry::new(label, "folder");
        if request.scan_entry {
            root.children.push(scan_entry(&request));
        }
        Self {
            list: List::new(root),
            request,
            rx,
        }
    }

    pub fn list(&self) -> &List {
        &self.list
    }

    pub fn request(&self) -> &ExplorerRequest {
        &self.request
    }

    fn entry_for(&self, item: DirEntry) -> Entry {
        if item.is_dir {
            let request = SceneRequest::Explorer(ExplorerRequest {
                path: item.path.clone(),
                ..self.request.clone()
            });
            return Entry::new(item.name, "folder")
                .path(item.path)
                .on_confirm(move |fx| fx.push(Effect::Push(request.clone())));
        }

        let entry = Entry::new(item.name, "file").path(item.path.clone());
        let path = item.path;
        match self.request.action {
            ExplorerAction::LoadCore => entry.on_confirm(move |fx| fx.push(Effect::LoadCore(path.clone()))),
            ExplorerAction::LoadGame => entry.on_confirm(move |fx| fx.push(Effect::LoadGame(path.clone()))),
            ExplorerAction::Scan => entry,
        }
    }
}

fn scan_entry(request: &ExplorerRequest) -> Entry {
    let path = request.path.clone();
    Entry::new(SCAN_LABEL, "scan").on_confirm(move |fx| fx.push(Effect::ScanDirectory(path.clone())))
}

impl Scene for Explorer {
    fn kind(&self) -> SceneKind {
        SceneKind::Explorer
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
                ListingMsg::Listed(items) => {
                    let mut children = Vec::with_capacity(items.len() + 1);
                    if self.request.scan_entry {
                        children.push(scan_entry(&self.request));
                    }
                    children.extend(items.into_iter().map(|item| self.entry_for(item)));
                    self.list.set_children(children);
                    self.list.mount(cx);
                }
                ListingMsg::Failed(e) => cx.emit(Effect::notify("Menu", e)),
            }
        }
    }

    fn render(&self, r: &mut dyn Renderer, view: &ViewCx) {
        self.list.render(r, view);
    }

    fn hints(&self) -> Vec<Hint> {
        DEFAULT_HINTS.to_vec()
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
    use std::path::PathBuf;
    use std::sync::mpsc;

    fn request(action: ExplorerAction, scan_entry: bool) -> ExplorerRequest {
        ExplorerRequest {
            path: PathBuf::from("/roms"),
            extensions: None,
            action,
            scan_entry,
        }
    }

    fn listing() -> ListingMsg {
        ListingMsg::Listed(vec![
            DirEntry {
                name: "gb".into(),
                path: "/roms/gb".into(),
                is_dir: true,
            },
            DirEntry {
                name: "tetris.gb".into(),
                path: "/roms/tetris.gb".into(),
                is_dir: false,
            },
        ])
    }

    fn labels(scene: &Explorer) -> Vec<&str> {
        scene.list().root.children.iter().map(|c| c.label.as_str()).collect()
    }

    #[test]
    fn test_listing_fills_entries() {
        let (tx, rx) = mpsc::channel();
        let mut scene = Explorer::new(request(ExplorerAction::LoadGame, false), rx);
        let mut h = SceneHarness::default();
        h.mount(&mut scene);
        assert!(scene.list().is_empty());
        assert_eq!(scene.label(), "roms");

        tx.send(listing()).unwrap();
        h.update(&mut scene, &MenuInput::default());
        assert_eq!(labels(&scene), vec!["gb", "tetris.gb"]);
        assert_eq!(scene.list().root.children[0].icon, "folder");
        assert_eq!(scene.list().root.children[1].icon, "file");
    }

    #[test]
    fn test_directory_opens_nested_explorer() {
        let (tx, rx) = mpsc::channel();
        let mut scene = Explorer::new(request(ExplorerAction::LoadCore, false), rx);
        let mut h = SceneHarness::default();
        h.mount(&mut scene);
        tx.send(listing()).unwrap();
        h.update(&mut scene, &MenuInput::default());
        h.settle(&mut scene);

        h.update(&mut scene, &released(ButtonId::A));
        assert_eq!(
            h.take_effects(),
            vec![Effect::Push(SceneRequest::Explorer(ExplorerRequest {
                path: "/roms/gb".into(),
                ..request(ExplorerAction::LoadCore, false)
            }))]
        );
    }

    #[test]
    fn test_file_runs_request_action() {
        for (action, expected) in [
            (ExplorerAction::LoadCore, Some(Effect::LoadCore("/roms/tetris.gb".into()))),
            (ExplorerAction::LoadGame, Some(Effect::LoadGame("/roms/tetris.gb".into()))),
            (ExplorerAction::Scan, None),
        ] {
            let (tx, rx) = mpsc::channel();
            let mut scene = Explorer::new(request(action, false), rx);
            let mut h = SceneHarness::default();
            h.mount(&mut scene);
            tx.send(listing()).unwrap();
            h.update(&mut scene, &held(ButtonId::Down));
            h.update(&mut scene, &released(ButtonId::A));
            assert_eq!(h.take_effects(), expected.into_iter().collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_scan_entry_stays_first() {
        let (tx, rx) = mpsc::channel();
        let mut scene = Explorer::new(request(ExplorerAction::Scan, true), rx);
        let mut h = SceneHarness::default();
        h.mount(&mut scene);
        assert_eq!(labels(&scene), vec![SCAN_LABEL]);

        tx.send(listing()).unwrap();
        h.update(&mut scene, &released(ButtonId::A));
        assert_eq!(labels(&scene), vec![SCAN_LABEL, "gb", "tetris.gb"]);
        assert_eq!(h.take_effects(), vec![Effect::ScanDirectory("/roms".into())]);
    }

    #[test]
    fn test_failed_listing_notifies() {
        let (tx, rx) = mpsc::channel();
        let mut scene = Explorer::new(request(ExplorerAction::LoadGame, false), rx);
        let mut h = SceneHarness::default();
        tx.send(ListingMsg::Failed("Permission denied".into())).unwrap();
        h.update(&mut scene, &MenuInput::default());
        assert_eq!(h.take_effects(), vec![Effect::notify("Menu", "Permission denied")]);
    }
}
