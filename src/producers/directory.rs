//! Directory listings for the explorer and recursive scans for "Add games".
//! Both walk the filesystem on tokio's blocking pool.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

use log::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListingMsg {
    Listed(Vec<DirEntry>),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScanEvent {
    Progress { done: usize, total: usize, name: String },
    Done(Vec<PathBuf>),
    Failed(String),
}

pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// True if `path` ends in one of `extensions` (given with the leading dot,
/// e.g. `".so"`). Comparison ignores case.
pub fn matches_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    extensions
        .iter()
        .any(|want| want.trim_start_matches('.').eq_ignore_ascii_case(ext))
}

/// Lists one directory, sorted by name. Directories are always kept; files
/// only when they match `extensions` (if given).
pub fn list_dir(path: &Path, show_hidden: bool, extensions: Option<&[String]>) -> io::Result<Vec<DirEntry>> {
    let mut entries = Vec::new();
    for dirent in fs::read_dir(path)? {
        let dirent = dirent?;
        let name = dirent.file_name().to_string_lossy().into_owned();
        if !show_hidden && is_hidden(&name) {
            continue;
        }
        let path = dirent.path();
        let is_dir = path.is_dir();
        if !is_dir && extensions.is_some_and(|exts| !matches_extension(&path, exts)) {
            continue;
        }
        entries.push(DirEntry { name, path, is_dir });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// Lists `path` and wraps the result for the explorer.
pub fn listing(path: &Path, show_hidden: bool, extensions: Option<&[String]>) -> ListingMsg {
    match list_dir(path, show_hidden, extensions) {
        Ok(entries) => {
            debug!("Listed {} entries in {}", entries.len(), path.display());
            ListingMsg::Listed(entries)
        }
        Err(e) => {
            warn!("Failed to list {}: {}", path.display(), e);
            ListingMsg::Failed(e.to_string())
        }
    }
}

pub fn spawn_list(path: PathBuf, show_hidden: bool, extensions: Option<Vec<String>>, tx: Sender<ListingMsg>) {
    tokio::task::spawn_blocking(move || {
        let msg = listing(&path, show_hidden, extensions.as_deref());
        if tx.send(msg).is_err() {
            warn!("Directory listing send failed: receiver dropped");
        }
    });
}

/// Every regular file below `dir`, depth first, sorted per directory.
/// Unreadable subdirectories and symlinked directories are skipped.
pub fn all_files_in(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let mut entries: Vec<(PathBuf, fs::FileType)> = match fs::read_dir(dir) {
        Ok(rd) => rd
            .filter_map(|d| d.ok())
            .filter_map(|d| d.file_type().ok().map(|t| (d.path(), t)))
            .collect(),
        Err(e) => {
            debug!("Skipping {}: {}", dir.display(), e);
            return files;
        }
    };
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    for (path, file_type) in entries {
        if file_type.is_dir() {
            files.extend(all_files_in(&path));
        } else if file_type.is_symlink() && path.is_dir() {
            debug!("Not following directory link {}", path.display());
        } else {
            files.push(path);
        }
    }
    files
}

/// Walks `dir` and reports one progress event per file, then the full list.
pub fn spawn_scan(dir: PathBuf, tx: Sender<ScanEvent>) {
    tokio::task::spawn_blocking(move || {
        if !dir.is_dir() {
            let event = ScanEvent::Failed(format!("{} is not a directory", dir.display()));
            if tx.send(event).is_err() {
                warn!("Scan failure send failed: receiver dropped");
            }
            return;
        }
        let files = all_files_in(&dir);
        let total = files.len();
        info!("Scanning {} ({} files)", dir.display(), total);

        for (i, path) in files.iter().enumerate() {
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let event = ScanEvent::Progress {
                done: i + 1,
                total,
                name,
            };
            if tx.send(event).is_err() {
                warn!("Scan progress send failed: receiver dropped");
                return;
            }
        }
        if tx.send(ScanEvent::Done(files)).is_err() {
            warn!("Scan result send failed: receiver dropped");
        }
    });
}
