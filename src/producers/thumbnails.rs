//! # Thumbnails
//!
//! Boxart download for playlist entries. Images are cached on disk under
//! `<thumbnails_dir>/<system>/Named_Snaps/<game>.png` and fetched from the
//! thumbnail server with the same layout when missing.
//!
//! The body is streamed to a `.tmp` file and renamed on completion, so a
//! crashed download never leaves a truncated image in the cache.

use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::time::Duration;

use futures::StreamExt;
use log::{debug, info, warn};
use tokio::io::AsyncWriteExt;

use super::ProducerError;
use crate::core::config::ThumbnailSettings;

/// Result of one download, addressed by the entry index in the playlist.
#[derive(Debug)]
pub struct ThumbnailMsg {
    pub index: usize,
    pub result: Result<PathBuf, ProducerError>,
}

/// Characters the thumbnail server replaces with `_` in file names.
const FORBIDDEN: &[char] = &['&', '*', '/', ':', '`', '<', '>', '?', '\\', '|'];

pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| if FORBIDDEN.contains(&c) { '_' } else { c })
        .collect()
}

#[derive(Clone)]
pub struct ThumbnailFetcher {
    client: reqwest::Client,
    server_url: String,
    cache_dir: PathBuf,
}

impl ThumbnailFetcher {
    pub fn new(settings: &ThumbnailSettings, cache_dir: PathBuf) -> Result<Self, ProducerError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            server_url: settings.server_url.trim_end_matches('/').to_string(),
            cache_dir,
        })
    }

    pub fn cache_path(&self, system: &str, game: &str) -> PathBuf {
        self.cache_dir
            .join(system)
            .join("Named_Snaps")
            .join(format!("{}.png", sanitize_name(game)))
    }

    pub fn url(&self, system: &str, game: &str) -> String {
        format!("{}/{}/Named_Snaps/{}.png", self.server_url, system, sanitize_name(game))
    }

    /// Returns the cached image, downloading it first if needed.
    pub async fn fetch(&self, system: &str, game: &str) -> Result<PathBuf, ProducerError> {
        let path = self.cache_path(system, game);
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(path);
        }

        let url = self.url(system, game);
        debug!("Downloading thumbnail {}", url);
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            debug!("Thumbnail {} answered {}", url, status);
            return Err(ProducerError::Http { status });
        }

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp_path = path.with_extension("tmp");
        write_stream(response, &tmp_path).await?;
        tokio::fs::rename(&tmp_path, &path).await?;
        info!("Cached thumbnail {}", path.display());
        Ok(path)
    }

    /// Downloads in the background and reports to `tx`.
    pub fn spawn(&self, index: usize, system: String, game: String, tx: Sender<ThumbnailMsg>) {
        let fetcher = self.clone();
        tokio::spawn(async move {
            let result = fetcher.fetch(&system, &game).await;
            if let Err(e) = &result {
                debug!("Thumbnail for '{}' unavailable: {}", game, e);
            }
            if tx.send(ThumbnailMsg { index, result }).is_err() {
                warn!("Thumbnail send failed: receiver dropped");
            }
        });
    }
}

async fn write_stream(response: reqwest::Response, path: &Path) -> Result<(), ProducerError> {
    let mut file = tokio::fs::File::create(path).await?;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        file.write_all(&chunk?).await?;
    }
    file.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher(dir: &Path) -> ThumbnailFetcher {
        let settings = ThumbnailSettings {
            server_url: "http://thumbs.example/".into(),
            timeout_secs: 1,
        };
        ThumbnailFetcher::new(&settings, dir.to_path_buf()).unwrap()
    }

    #[test]
    fn test_url_layout() {
        let f = fetcher(Path::new("/tmp/thumbs"));
        assert_eq!(
            f.url("Nintendo - Game Boy", "Tetris (World)"),
            "http://thumbs.example/Nintendo - Game Boy/Named_Snaps/Tetris (World).png"
        );
        assert_eq!(
            f.cache_path("Nintendo - Game Boy", "Tetris (World)"),
            PathBuf::from("/tmp/thumbs/Nintendo - Game Boy/Named_Snaps/Tetris (World).png")
        );
    }

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("Q*bert: Rebooted"), "Q_bert_ Rebooted");
        assert_eq!(sanitize_name("Plain"), "Plain");
    }

    #[test]
    fn test_cached_image_skips_network() {
        let dir = tempfile::tempdir().unwrap();
        let f = fetcher(dir.path());
        let path = f.cache_path("Sys", "Game");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"png").unwrap();

        let got = tokio_test::block_on(f.fetch("Sys", "Game")).unwrap();
        assert_eq!(got, path);
    }
}
