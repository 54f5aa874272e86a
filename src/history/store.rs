//! Persisted download history.
//!
//! One text file per run, `{source}_urls-{YYYY-MM-DD-HHMMSS}.txt`, holding one
//! downloaded URL per line. Saving moves earlier files into `backups/`.

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use chrono::Local;

use crate::config::SourceKind;
use crate::error::Result;

/// Subfolder receiving superseded history files.
pub const BACKUP_FOLDER: &str = "backups";

/// Loads and saves the URL history of one source in one directory.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    dir: PathBuf,
    source: SourceKind,
}

impl HistoryStore {
    pub fn new(dir: impl Into<PathBuf>, source: SourceKind) -> Self {
        Self {
            dir: dir.into(),
            source,
        }
    }

    /// Load the most recent history file, or an empty set if there is none.
    pub fn load(&self) -> Result<HashSet<String>> {
        let Some(latest) = self.history_files()?.pop() else {
            tracing::warn!(
                "No {}_urls file found in {}, continuing with no history",
                self.source,
                self.dir.display()
            );
            return Ok(HashSet::new());
        };

        tracing::debug!("Loading history from {}", latest.display());
        let content = fs::read_to_string(&latest)?;

        Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Back up existing history files, then write `urls` to a new dated file.
    pub fn save(&self, urls: &HashSet<String>) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;

        let existing = self.history_files()?;
        if !existing.is_empty() {
            let backup_dir = self.dir.join(BACKUP_FOLDER);
            fs::create_dir_all(&backup_dir)?;

            for file in existing {
                if let Some(name) = file.file_name() {
                    fs::rename(&file, backup_dir.join(name))?;
                }
            }
        }

        let timestamp = Local::now().format("%Y-%m-%d-%H%M%S");
        let path = self
            .dir
            .join(format!("{}-{}.txt", self.file_prefix(), timestamp));

        let mut content = String::new();
        for url in urls {
            content.push_str(url);
            content.push('\n');
        }
        fs::write(&path, content)?;

        tracing::info!("Saved {} URL(s) to {}", urls.len(), path.display());
        Ok(path)
    }

    fn file_prefix(&self) -> String {
        format!("{}_urls", self.source)
    }

    /// History files in `dir`, sorted so the newest is last.
    fn history_files(&self) -> Result<Vec<PathBuf>> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }

        let prefix = self.file_prefix();
        let mut files = Vec::new();

        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }

            let matches = path
                .file_name()
                .and_then(|n| n.to_str())
                .map(|name| name.starts_with(&prefix) && name.ends_with(".txt"))
                .unwrap_or(false);

            if matches {
                files.push(path);
            }
        }

        files.sort();
        Ok(files)
    }
}
