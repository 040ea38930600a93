//! # Wifi
//!
//! The [`NetworkManager`] seam and its connman implementation, driven
//! through `connmanctl`.
//!
//! `connmanctl services` prints one service per line:
//!
//! ```text
//! *AO MyNetwork            wifi_dc85de828967_4d794e6574776f726b_managed_psk
//! ^^^^                     ^
//! flags (0..4)             service path (25..)
//!     SSID (4..24, space padded)
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::Sender;

use async_trait::async_trait;
use log::{debug, info, warn};
use tokio::process::Command;

use super::ProducerError;
use crate::core::action::Network;

/// Directory connman reads per-service settings from.
pub const CONNMAN_SETTINGS_DIR: &str = "/storage/.cache/connman";
const CONNMANCTL: &str = "/usr/bin/connmanctl";

#[async_trait]
pub trait NetworkManager: Send + Sync {
    /// Enables wifi, scans and lists visible networks.
    async fn scan(&self) -> Result<Vec<Network>, ProducerError>;
    /// Human readable state of one network: "Online", "Ready",
    /// "Association" or empty.
    async fn status(&self, network: &Network) -> Result<String, ProducerError>;
    async fn connect(&self, network: &Network, passphrase: &str) -> Result<(), ProducerError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum NetworkMsg {
    Found(Vec<Network>),
    Failed(String),
}

/// Status from the flag column: `O` online, `R` ready, `a` association.
pub fn status_from_flags(flags: &str) -> String {
    if flags.contains('O') {
        "Online".into()
    } else if flags.contains('R') {
        "Ready".into()
    } else if flags.contains('a') {
        "Association".into()
    } else {
        String::new()
    }
}

/// Status from a `State = ...` line of `connmanctl services <path>`.
pub fn status_from_state(output: &str) -> String {
    let state = output
        .lines()
        .find(|l| l.trim_start().starts_with("State"))
        .unwrap_or("");
    if state.contains("online") {
        "Online".into()
    } else if state.contains("ready") {
        "Ready".into()
    } else if state.contains("association") {
        "Association".into()
    } else {
        String::new()
    }
}

/// Parses `connmanctl services` output. Lines too short to hold a service
/// path are skipped.
pub fn parse_services(output: &str) -> Vec<Network> {
    output
        .lines()
        .filter_map(|line| {
            let flags = line.get(..4)?;
            let ssid = line.get(4..24)?.trim();
            let path = line.get(25..)?.trim();
            if path.is_empty() {
                return None;
            }
            Some(Network {
                ssid: ssid.to_string(),
                path: path.to_string(),
                status: status_from_flags(flags),
            })
        })
        .collect()
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Contents of the connman settings file for a service.
pub fn service_settings(network: &Network, passphrase: &str) -> String {
    format!(
        "[{path}]\nName={ssid}\nSSID={hex}\nFavorite=true\nAutoConnect=true\nPassphrase={passphrase}\nIPv4.method=dhcp\n",
        path = network.path,
        ssid = network.ssid,
        hex = hex_encode(network.ssid.as_bytes()),
    )
}

pub struct ConnmanManager {
    settings_dir: PathBuf,
}

impl Default for ConnmanManager {
    fn default() -> Self {
        Self::new(PathBuf::from(CONNMAN_SETTINGS_DIR))
    }
}

impl ConnmanManager {
    pub fn new(settings_dir: PathBuf) -> Self {
        Self { settings_dir }
    }

    async fn connmanctl(args: &[&str]) -> Result<String, ProducerError> {
        let output = Command::new(CONNMANCTL).args(args).output().await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ProducerError::Command(format!("connmanctl {}: {}", args.join(" "), stderr.trim())));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl NetworkManager for ConnmanManager {
    async fn scan(&self) -> Result<Vec<Network>, ProducerError> {
        // Enabling an already enabled technology fails; not an error here.
        if let Err(e) = Self::connmanctl(&["enable", "wifi"]).await {
            debug!("{}", e);
        }
        Self::connmanctl(&["scan", "wifi"]).await?;
        let out = Self::connmanctl(&["services"]).await?;
        let networks = parse_services(&out);
        info!("Found {} networks", networks.len());
        Ok(networks)
    }

    async fn status(&self, network: &Network) -> Result<String, ProducerError> {
        let out = Self::connmanctl(&["services", &network.path]).await?;
        Ok(status_from_state(&out))
    }

    async fn connect(&self, network: &Network, passphrase: &str) -> Result<(), ProducerError> {
        let dir = self.settings_dir.join(&network.path);
        tokio::fs::create_dir_all(&dir).await?;
        let file = dir.join("settings");
        tokio::fs::write(&file, service_settings(network, passphrase)).await?;
        debug!("Wrote {}", file.display());
        Self::connmanctl(&["connect", &network.path]).await?;
        info!("Connected to {}", network.ssid);
        Ok(())
    }
}

/// Scans in the background, then refreshes each network's status.
pub fn spawn_scan(manager: Arc<dyn NetworkManager>, tx: Sender<NetworkMsg>) {
    tokio::spawn(async move {
        let msg = match manager.scan().await {
            Ok(mut networks) => {
                for network in &mut networks {
                    if network.status.is_empty() {
                        match manager.status(network).await {
                            Ok(status) => network.status = status,
                            Err(e) => debug!("Status for {} unavailable: {}", network.ssid, e),
                        }
                    }
                }
                NetworkMsg::Found(networks)
            }
            Err(e) => {
                warn!("Network scan failed: {}", e);
                NetworkMsg::Failed(e.to_string())
            }
        };
        if tx.send(msg).is_err() {
            warn!("Network scan send failed: receiver dropped");
        }
    });
}
