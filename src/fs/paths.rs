//! Path and directory management.

use std::path::{Path, PathBuf};

use crate::config::SourceKind;
use crate::error::Result;
use crate::fs::naming::sanitize_filename;

/// Folder collecting every download of a source, regardless of author.
pub const ALL_FOLDER: &str = "__all__";

/// The two replicas of one downloaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    /// `{root}/__all__/{filename}`
    pub all_path: PathBuf,
    /// `{root}/{author}/{filename}`
    pub author_path: PathBuf,
}

impl Destination {
    /// Both parent directories.
    pub fn dirs(&self) -> [&Path; 2] {
        [
            self.all_path.parent().unwrap_or(Path::new(".")),
            self.author_path.parent().unwrap_or(Path::new(".")),
        ]
    }
}

/// Download root of one source: `{base}/{likes|timeline}`.
pub fn source_root(base: &Path, kind: SourceKind) -> PathBuf {
    base.join(kind.as_str())
}

/// Compute both destination paths for `filename` under `root`.
pub fn destination_paths(root: &Path, author: &str, filename: &str) -> Result<Destination> {
    let author = sanitize_filename(author)?;
    let filename = sanitize_filename(filename)?;

    Ok(Destination {
        all_path: root.join(ALL_FOLDER).join(&filename),
        author_path: root.join(author).join(&filename),
    })
}

/// Ensure a directory exists, creating it if necessary.
pub async fn ensure_dir(path: &Path) -> Result<()> {
    tokio::fs::create_dir_all(path).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_root() {
        let base = PathBuf::from("/downloads");
        assert_eq!(
            source_root(&base, SourceKind::Likes),
            PathBuf::from("/downloads/likes")
        );
        assert_eq!(
            source_root(&base, SourceKind::Timeline),
            PathBuf::from("/downloads/timeline")
        );
    }

    #[test]
    fn test_destination_paths() {
        let root = PathBuf::from("/downloads/likes");
        let dest = destination_paths(&root, "dnoodels", "gif2021-03-16-210559_dnoodels_1.mp4")
            .unwrap();

        assert_eq!(
            dest.all_path,
            PathBuf::from("/downloads/likes/__all__/gif2021-03-16-210559_dnoodels_1.mp4")
        );
        assert_eq!(
            dest.author_path,
            PathBuf::from("/downloads/likes/dnoodels/gif2021-03-16-210559_dnoodels_1.mp4")
        );
        assert_eq!(
            dest.dirs(),
            [
                Path::new("/downloads/likes/__all__"),
                Path::new("/downloads/likes/dnoodels")
            ]
        );
    }

    #[test]
    fn test_destination_paths_rejects_traversal() {
        let root = PathBuf::from("/downloads/likes");
        assert!(destination_paths(&root, "..", "file.jpg").is_err());
        assert!(destination_paths(&root, "author", "../file.jpg").is_err());
    }

    #[tokio::test]
    async fn test_ensure_dir_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        ensure_dir(&nested).await.unwrap();
        ensure_dir(&nested).await.unwrap();
        assert!(nested.is_dir());
    }
}
