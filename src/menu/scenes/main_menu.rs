//! Main menu and quick menu. Both are plain lists whose entries only emit
//! effects.

use std::path::Path;

use crate::core::action::{Effect, ExplorerAction, ExplorerRequest, SceneRequest};
use crate::menu::entry::Entry;
use crate::menu::list::ListScene;
use crate::menu::scene::{ContentStatus, SceneKind};

/// File extensions of loadable cores.
pub const CORE_EXTENSIONS: [&str; 3] = [".dll", ".dylib", ".so"];

fn push(request: SceneRequest) -> impl FnMut(&mut Vec<Effect>) + 'static {
    move |fx| fx.push(Effect::Push(request.clone()))
}

pub fn main_menu(content: &ContentStatus, cores_dir: &Path, home: &Path) -> ListScene {
    let mut root = Entry::new("Main Menu", "main");

    if content.running {
        root.children
            .push(Entry::new("Quick Menu", "subsetting").on_confirm(push(SceneRequest::QuickMenu)));
    }

    root.children.push(Entry::new("Load Core", "subsetting").on_confirm(push(
        SceneRequest::Explorer(ExplorerRequest {
            path: cores_dir.to_path_buf(),
            extensions: Some(CORE_EXTENSIONS.iter().map(|e| e.to_string()).collect()),
            action: ExplorerAction::LoadCore,
            scan_entry: false,
        }),
    )));

    root.children.push(Entry::new("Load Game", "subsetting").on_confirm(push(
        SceneRequest::Explorer(ExplorerRequest {
            path: home.to_path_buf(),
            extensions: None,
            action: ExplorerAction::LoadGame,
            scan_entry: false,
        }),
    )));

    root.children
        .push(Entry::new("Settings", "subsetting").on_confirm(push(SceneRequest::Settings)));

    root.children.push(
        Entry::new("Help", "subsetting")
            .on_confirm(|fx| fx.push(Effect::notify("Menu", "Not implemented yet."))),
    );

    root.children
        .push(Entry::new("Quit", "subsetting").on_confirm(|fx| fx.push(Effect::Quit)));

    ListScene::new(SceneKind::MainMenu, root)
}

pub fn quick_menu() -> ListScene {
    let mut root = Entry::new("Quick Menu", "subsetting");
    let items: [(&str, &str, Effect); 5] = [
        ("Resume", "resume", Effect::ResumeContent),
        ("Reset", "reset", Effect::ResetContent),
        ("Save State", "savestate", Effect::SaveState),
        ("Load State", "loadstate", Effect::LoadState),
        ("Take Screenshot", "screenshot", Effect::Screenshot),
    ];
    for (label, icon, effect) in items {
        root.children
            .push(Entry::new(label, icon).on_confirm(move |fx| fx.push(effect.clone())));
    }
    root.children
        .push(Entry::new("Options", "subsetting").on_confirm(push(SceneRequest::CoreOptions)));

    ListScene::new(SceneKind::QuickMenu, root)
}
