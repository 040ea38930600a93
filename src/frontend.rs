//! # Frontend
//!
//! The per-frame orchestrator. It owns every piece of navigation state
//! (input, router, menu, notifications, settings) and borrows the host
//! collaborators for the length of one tick.
//!
//! ```text
//! tick(dt, host)
//!   1. poll input            InputAggregator → frame + edges
//!   2. route hotkeys         ActionRouter (menu toggle, fullscreen, quit)
//!   3. drain producers       notices, library scan progress
//!   4. menu or content       Menu::update → effects → apply()
//!                            or CoreHost::run_frame when the menu is hidden
//!   5. render                menu, then notifications on top
//!   6. age notifications
//! ```
//!
//! Nothing here blocks. Slow work is handed to producers, and failures
//! become notifications.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};

use log::{debug, info, warn};

use crate::core::action::{Effect, ExplorerRequest, Network, SceneRequest};
use crate::core::config::{Settings, SettingsStore};
use crate::core::host::{CoreHost, Library, Window};
use crate::core::notifications::{Notice, Notifications};
use crate::input::aggregator::{DeviceEvent, DeviceLayer, InputAggregator};
use crate::input::binds::BindRegistry;
use crate::input::router::{ActionRouter, MenuAction, RouteCx};
use crate::menu::Menu;
use crate::menu::render::{Color, Renderer, Viewport, draw_notifications};
use crate::menu::scene::{ContentStatus, MenuInput, Scene, ViewCx};
use crate::menu::scenes::explorer::Explorer;
use crate::menu::scenes::keyboard::Keyboard;
use crate::menu::scenes::main_menu::{main_menu, quick_menu};
use crate::menu::scenes::network::NetworkPicker;
use crate::menu::scenes::options::{CoreOptionsScene, OptionsScene};
use crate::menu::scenes::playlist::Playlist;
use crate::menu::scenes::tabs::Tabs;
use crate::producers::directory::{self, ListingMsg, ScanEvent};
use crate::producers::network::{self, NetworkManager, NetworkMsg};
use crate::producers::runtime_available;
use crate::producers::thumbnails::ThumbnailFetcher;

/// How long the scan progress notification stays up between updates.
const SCAN_NOTICE_FRAMES: u32 = 600;

/// Collaborators lent to the frontend for one tick.
pub struct Host<'a> {
    pub devices: &'a dyn DeviceLayer,
    pub window: &'a mut dyn Window,
    pub core: &'a mut dyn CoreHost,
    pub library: &'a mut dyn Library,
    pub renderer: &'a mut dyn Renderer,
}

impl Host<'_> {
    fn viewport(&self) -> Viewport {
        let (w, h) = self.window.framebuffer_size();
        Viewport::new(w, h)
    }

    fn content(&self) -> ContentStatus {
        ContentStatus {
            running: self.core.is_running(),
            game_path: self.core.game_path().map(Path::to_path_buf),
        }
    }
}

pub struct Frontend {
    input: InputAggregator,
    router: ActionRouter,
    menu: Menu,
    notifications: Notifications,
    settings: Box<dyn SettingsStore>,
    network: Arc<dyn NetworkManager>,
    thumbnails: Option<ThumbnailFetcher>,
    home: PathBuf,
    notice_tx: Sender<Notice>,
    notice_rx: Receiver<Notice>,
    scan_tx: Sender<ScanEvent>,
    scan_rx: Receiver<ScanEvent>,
    /// Notification showing the running scan, if any.
    scan_notice: Option<u64>,
}

impl Frontend {
    pub fn new(settings: Box<dyn SettingsStore>, network: Arc<dyn NetworkManager>) -> Self {
        let s = settings.settings();
        let mut registry = BindRegistry::with_defaults();
        registry.extend_from_config(&s.joypads);
        let menu = Menu::new(s.menu.repeat_interval);
        let thumbnails = match ThumbnailFetcher::new(&s.thumbnails, s.paths.thumbnails_directory.clone()) {
            Ok(fetcher) => Some(fetcher),
            Err(e) => {
                warn!("Thumbnails disabled: {}", e);
                None
            }
        };
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));

        let (notice_tx, notice_rx) = mpsc::channel();
        let (scan_tx, scan_rx) = mpsc::channel();
        Self {
            input: InputAggregator::new(registry),
            router: ActionRouter::new(),
            menu,
            notifications: Notifications::new(),
            settings,
            network,
            thumbnails,
            home,
            notice_tx,
            notice_rx,
            scan_tx,
            scan_rx,
            scan_notice: None,
        }
    }

    /// Directory the "Load Game" and "Add games" explorers open at.
    pub fn with_home(mut self, home: PathBuf) -> Self {
        self.home = home;
        self
    }

    pub fn without_thumbnails(mut self) -> Self {
        self.thumbnails = None;
        self
    }

    /// Pushes the home tabs. Call once before the first tick.
    pub fn start(&mut self, host: &mut Host) {
        self.menu.reset();
        self.menu.active = true;
        self.apply(vec![Effect::Push(SceneRequest::Tabs)], host);
        info!("Frontend started with {} playlists", host.library.playlists().len());
    }

    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn settings(&self) -> &Settings {
        self.settings.settings()
    }

    /// Sender background tasks can use to post notifications.
    pub fn notice_sender(&self) -> Sender<Notice> {
        self.notice_tx.clone()
    }

    pub fn on_device_event(&mut self, event: &DeviceEvent) {
        self.input.on_device_event(event, &mut self.notifications);
    }

    /// Input state for the emulated content.
    pub fn input_state(&self, port: usize, device: u32, index: u32, id: u32) -> i16 {
        self.input.state(port, device, index, id)
    }

    // ========================================================================
    // Tick
    // ========================================================================

    pub fn tick(&mut self, dt: f32, host: &mut Host) {
        self.input.poll(host.devices);
        let edges = *self.input.edges();

        let running = host.core.is_running();
        let mut route = RouteCx {
            menu_active: &mut self.menu.active,
            content_running: running,
            settings: self.settings.as_mut(),
            window: &mut *host.window,
            notifications: &mut self.notifications,
        };
        let actions = self.router.dispatch(&edges, &mut route);
        if actions.contains(&MenuAction::ToggleFullscreen) {
            // Open settings scenes hold their own copy
            self.menu.settings_changed(self.settings.settings());
        }
        if !running {
            self.menu.active = true;
        }

        self.drain_notices();
        self.drain_scan(host.library);

        if self.menu.active {
            let input = MenuInput::new(*self.input.current(), edges);
            let effects = self.menu.update(dt, &input, host.viewport(), &host.content());
            self.apply(effects, host);
        } else {
            host.core.run_frame();
        }

        self.render(host);
        self.notifications.process();
    }

    fn render(&self, host: &mut Host) {
        let viewport = host.viewport();
        let content = host.content();
        let r = &mut *host.renderer;

        if self.menu.active {
            let background = if content.running {
                Color::BLACK.with_alpha(0.85)
            } else {
                Color::WHITE
            };
            r.draw_rect(0.0, 0.0, viewport.width, viewport.height, background);
            let view = ViewCx {
                viewport,
                content: &content,
                pad_connected: host.devices.any_pad(),
                focused: true,
            };
            self.menu.render(r, &view);
        }
        draw_notifications(r, viewport, &self.notifications);
    }

    fn drain_notices(&mut self) {
        while let Ok(notice) = self.notice_rx.try_recv() {
            self.notifications.display_and_log(&notice.prefix, &notice.message);
        }
    }

    fn drain_scan(&mut self, library: &mut dyn Library) {
        while let Ok(event) = self.scan_rx.try_recv() {
            match event {
                ScanEvent::Progress { done, total, name } => {
                    let message = format!("{done}/{total} {name}");
                    let live = self
                        .scan_notice
                        .is_some_and(|id| self.notifications.update(id, message.clone()));
                    if !live {
                        self.scan_notice = Some(self.notifications.display(message, SCAN_NOTICE_FRAMES));
                    }
                }
                ScanEvent::Done(files) => {
                    self.scan_notice = None;
                    match library.import(&files) {
                        Ok(added) => {
                            self.notifications
                                .display_and_log("Menu", &format!("Scan done. {added} games added."));
                        }
                        Err(e) => {
                            self.notifications.display_and_log("Menu", &e.to_string());
                        }
                    }
                }
                ScanEvent::Failed(e) => {
                    self.scan_notice = None;
                    self.notifications.display_and_log("Menu", &e);
                }
            }
        }
    }

    // ========================================================================
    // Effects
    // ========================================================================

    /// Executes effects in order. Effects emitted while executing (by a
    /// freshly mounted scene, say) run after the current batch.
    pub fn apply(&mut self, effects: Vec<Effect>, host: &mut Host) {
        let mut queue: VecDeque<Effect> = effects.into();
        while let Some(effect) = queue.pop_front() {
            debug!("Applying {:?}", effect);
            match effect {
                Effect::Push(request) => {
                    let scene = self.build_scene(request, host);
                    let (_, emitted) = self.menu.push(scene, host.viewport(), &host.content());
                    queue.extend(emitted);
                }
                Effect::Pop => {
                    let emitted = self.menu.pop(host.viewport(), &host.content());
                    queue.extend(emitted);
                }
                Effect::Quit => host.window.set_should_close(true),
                Effect::ResumeContent => {
                    if host.core.is_running() {
                        self.menu.active = false;
                    }
                }
                Effect::ResetContent => match host.core.reset() {
                    Ok(()) => self.menu.active = false,
                    Err(e) => self.notify("Menu", &e.to_string()),
                },
                Effect::SaveState => match host.core.save_state() {
                    Ok(path) => self.notify("Menu", &format!("State saved to {}.", path.display())),
                    Err(e) => self.notify("Menu", &e.to_string()),
                },
                Effect::LoadState => match host.core.load_state() {
                    Ok(()) => {
                        self.notify("Menu", "State loaded.");
                        self.menu.active = false;
                    }
                    Err(e) => self.notify("Menu", &e.to_string()),
                },
                Effect::Screenshot => match host.core.screenshot() {
                    Ok(path) => self.notify("Menu", &format!("Screenshot saved to {}.", path.display())),
                    Err(e) => self.notify("Menu", &e.to_string()),
                },
                Effect::LoadCore(path) => match host.core.load_core(&path) {
                    Ok(()) => self.notify("Core", "Core loaded."),
                    Err(e) => self.notify("Core", &e.to_string()),
                },
                Effect::LoadGame(path) => match host.core.load_game(&path) {
                    Ok(()) => {
                        info!("Loaded {}", path.display());
                        self.menu.active = false;
                    }
                    Err(e) => self.notify("Menu", &e.to_string()),
                },
                Effect::LaunchGame { playlist, game } => {
                    queue.extend(self.launch_game(&playlist, &game, host));
                }
                Effect::ScanDirectory(dir) => self.scan_directory(dir),
                Effect::ConnectNetwork { network, passphrase } => self.connect(network, passphrase),
                Effect::SettingsChanged(settings) => self.settings_changed(settings, host),
                Effect::CoreOptionsChanged(options) => host.core.set_options(&options),
                Effect::Notify { prefix, message } => self.notify(&prefix, &message),
                Effect::FastForward => self.menu.fast_forward(),
            }
        }
    }

    fn notify(&mut self, prefix: &str, message: &str) {
        self.notifications.display_and_log(prefix, message);
    }

    /// Loads the playlist's core and the game if they are not already
    /// loaded, then shows the quick menu.
    fn launch_game(&mut self, playlist: &str, game: &Path, host: &mut Host) -> Vec<Effect> {
        let Some(core) = self.settings.settings().core_for_playlist(playlist) else {
            self.notify("Menu", "Default core not set for this playlist.");
            return Vec::new();
        };
        if !core.exists() {
            self.notify("Menu", "Core not found.");
            return Vec::new();
        }

        if host.core.core_path() != Some(core.as_path()) {
            if let Err(e) = host.core.load_core(&core) {
                self.notify("Menu", &e.to_string());
                return Vec::new();
            }
        }

        let mut effects = Vec::new();
        if host.core.game_path() != Some(game) {
            if let Err(e) = host.core.load_game(game) {
                self.notify("Menu", &e.to_string());
                return effects;
            }
            effects.push(Effect::Push(SceneRequest::QuickMenu));
            effects.push(Effect::FastForward);
        } else {
            effects.push(Effect::Push(SceneRequest::QuickMenu));
        }
        effects
    }

    fn scan_directory(&mut self, dir: PathBuf) {
        if self.scan_notice.is_some() {
            self.notify("Menu", "A scan is already running.");
            return;
        }
        if !runtime_available() {
            warn!("No async runtime, cannot scan {}", dir.display());
            self.notify("Menu", "Scanning is unavailable.");
            return;
        }
        let id = self
            .notifications
            .display_and_log("Menu", &format!("Scanning {}", dir.display()));
        self.scan_notice = Some(id);
        directory::spawn_scan(dir, self.scan_tx.clone());
    }

    fn connect(&mut self, network: Network, passphrase: String) {
        if !runtime_available() {
            self.notify("Network", "Connecting is unavailable.");
            return;
        }
        let manager = self.network.clone();
        let tx = self.notice_tx.clone();
        tokio::spawn(async move {
            let notice = match manager.connect(&network, &passphrase).await {
                Ok(()) => Notice::new("Network", format!("Connected to {}.", network.ssid)),
                Err(e) => {
                    warn!("Connecting to {} failed: {}", network.ssid, e);
                    Notice::new("Network", e.to_string())
                }
            };
            if tx.send(notice).is_err() {
                warn!("Network notice send failed: receiver dropped");
            }
        });
    }

    fn settings_changed(&mut self, settings: Settings, host: &mut Host) {
        let previous = self.settings.settings().video.clone();
        *self.settings.settings_mut() = settings.clone();

        if previous != settings.video {
            host.window
                .reconfigure(settings.video.fullscreen, settings.video.monitor_index);
        }
        host.core.set_volume(settings.audio.volume);
        if let Err(e) = self.settings.save() {
            warn!("Failed to save settings: {}", e);
            self.notify("Settings", &e.to_string());
        }
        self.menu.settings_changed(&settings);
    }

    // ========================================================================
    // Scene factory
    // ========================================================================

    fn build_scene(&self, request: SceneRequest, host: &mut Host) -> Box<dyn Scene> {
        let settings = self.settings.settings();
        match request {
            SceneRequest::Tabs => Box::new(Tabs::new(&host.library.playlists(), self.home.clone())),
            SceneRequest::MainMenu => Box::new(main_menu(
                &host.content(),
                &settings.paths.cores_directory,
                &self.home,
            )),
            SceneRequest::QuickMenu => Box::new(quick_menu()),
            SceneRequest::Settings => Box::new(OptionsScene::new(settings, host.window.monitor_count())),
            SceneRequest::CoreOptions => Box::new(CoreOptionsScene::new(host.core.options())),
            SceneRequest::Playlist(info) => {
                let games = host.library.games(&info.path);
                Box::new(Playlist::new(&info, games, self.thumbnails.clone()))
            }
            SceneRequest::Explorer(req) => {
                let rx = list_directory(&req, settings.menu.show_hidden_files);
                Box::new(Explorer::new(req, rx))
            }
            SceneRequest::Keyboard { label, purpose } => Box::new(Keyboard::new(label, purpose)),
            SceneRequest::Network => {
                let (tx, rx) = mpsc::channel();
                if runtime_available() {
                    network::spawn_scan(self.network.clone(), tx);
                } else if tx.send(NetworkMsg::Failed("No async runtime.".into())).is_err() {
                    warn!("Network scan send failed: receiver dropped");
                }
                Box::new(NetworkPicker::new(rx))
            }
        }
    }
}

/// Starts a listing for an explorer. Without a runtime the listing is done
/// inline and is already queued when the scene first drains.
fn list_directory(req: &ExplorerRequest, show_hidden: bool) -> Receiver<ListingMsg> {
    let (tx, rx) = mpsc::channel();
    if runtime_available() {
        directory::spawn_list(req.path.clone(), show_hidden, req.extensions.clone(), tx);
    } else if tx
        .send(directory::listing(&req.path, show_hidden, req.extensions.as_deref()))
        .is_err()
    {
        warn!("Directory listing send failed: receiver dropped");
    }
    rx
}
