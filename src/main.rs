use clap::Parser;
use retronav::core::config::{self, CliOverrides, SettingsStore, TomlSettingsStore};
use retronav::tui;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "retronav", about = "Emulator front-end menu in your terminal")]
struct Args {
    /// Config file (defaults to ~/.retronav/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start in fullscreen mode
    #[arg(long)]
    fullscreen: bool,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,

    /// Frames per second
    #[arg(long, default_value_t = 60)]
    fps: u32,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();

    // Initialize file logger - writes to retronav.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    if let Ok(log_file) = File::create("retronav.log") {
        let _ = WriteLogger::init(level, log_config, log_file);
    }

    let path = args.config.unwrap_or_else(tui::default_config_path);
    let mut store = match TomlSettingsStore::load(path) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    let cli = CliOverrides {
        fullscreen: args.fullscreen.then_some(true),
        volume: None,
    };
    config::resolve(store.settings_mut(), &cli);

    log::info!("retronav starting up with config {}", store.path().display());

    tui::run(Box::new(store), args.fps)
}
