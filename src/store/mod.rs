// Artifact Store - the flat directory of produced media files
//
// The directory is the only record of what exists; there is no index.
// Orchestration talks to it through `ArtifactStore` so an indexed store
// can replace the filesystem later.

pub mod sweeper;

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;

use crate::downloader::models::Artifact;

pub use sweeper::{CleanupSweeper, SweepReport};

/// Artifact Store failures
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to prepare store directory {path}: {source}")]
    Prepare {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to list artifacts: {0}")]
    List(#[source] std::io::Error),

    #[error("Failed to read {path}: {source}")]
    Metadata {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to delete {path}: {source}")]
    Delete {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Identity of the bytes at a path, compared to detect rewrites
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fingerprint {
    pub len: u64,
    pub modified: SystemTime,
}

#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Path an artifact with this file name lives at
    fn path_for(&self, filename: &str) -> PathBuf;

    async fn exists(&self, path: &Path) -> bool;

    async fn size_of(&self, path: &Path) -> Result<u64, StoreError>;

    /// Length and modification time, or `None` when nothing is there
    async fn fingerprint(&self, path: &Path) -> Option<Fingerprint>;

    async fn list_all(&self) -> Result<Vec<Artifact>, StoreError>;

    async fn delete(&self, path: &Path) -> Result<(), StoreError>;
}

/// Filesystem-backed store rooted at a single flat directory
#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    root: PathBuf,
}

impl FsArtifactStore {
    /// Open the store, creating the directory if needed
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|source| StoreError::Prepare {
            path: root.display().to_string(),
            source,
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl ArtifactStore for FsArtifactStore {
    fn path_for(&self, filename: &str) -> PathBuf {
        self.root.join(filename)
    }

    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::metadata(path)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false)
    }

    async fn size_of(&self, path: &Path) -> Result<u64, StoreError> {
        tokio::fs::metadata(path)
            .await
            .map(|m| m.len())
            .map_err(|source| StoreError::Metadata {
                path: path.display().to_string(),
                source,
            })
    }

    async fn fingerprint(&self, path: &Path) -> Option<Fingerprint> {
        let metadata = tokio::fs::metadata(path).await.ok().filter(|m| m.is_file())?;
        Some(Fingerprint {
            len: metadata.len(),
            modified: metadata.modified().ok()?,
        })
    }

    async fn list_all(&self) -> Result<Vec<Artifact>, StoreError> {
        let mut entries = tokio::fs::read_dir(&self.root).await.map_err(StoreError::List)?;
        let mut artifacts = Vec::new();

        while let Some(entry) = entries.next_entry().await.map_err(StoreError::List)? {
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().to_string();
            // .gitkeep and friends are not artifacts
            if name.starts_with('.') {
                continue;
            }

            let metadata = match entry.metadata().await {
                Ok(m) if m.is_file() => m,
                Ok(_) => continue,
                // Deleted between read_dir and stat
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(source) => {
                    return Err(StoreError::Metadata {
                        path: path.display().to_string(),
                        source,
                    })
                }
            };
            let created_at = metadata.modified().map_err(|source| StoreError::Metadata {
                path: path.display().to_string(),
                source,
            })?;

            let (locator, format) = match name.rsplit_once('.') {
                Some((stem, ext)) => (stem.to_string(), ext.to_string()),
                None => (name.clone(), String::new()),
            };

            artifacts.push(Artifact {
                locator,
                format,
                path,
                size_bytes: metadata.len(),
                created_at,
            });
        }

        Ok(artifacts)
    }

    async fn delete(&self, path: &Path) -> Result<(), StoreError> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            // Already gone: someone else won the race
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Delete {
                path: path.display().to_string(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("public");
        FsArtifactStore::open(&root).unwrap();
        FsArtifactStore::open(&root).unwrap();
        assert!(root.is_dir());
    }

    #[tokio::test]
    async fn test_exists_and_size() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::open(dir.path()).unwrap();
        let path = store.path_for("dQw4w9WgXcQ.webm");

        assert!(!store.exists(&path).await);
        assert!(store.size_of(&path).await.is_err());

        std::fs::write(&path, b"abcd").unwrap();
        assert!(store.exists(&path).await);
        assert_eq!(store.size_of(&path).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_fingerprint_tracks_rewrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::open(dir.path()).unwrap();
        let path = store.path_for("dQw4w9WgXcQ.webm");
        assert_eq!(store.fingerprint(&path).await, None);

        std::fs::write(&path, b"abcd").unwrap();
        let before = store.fingerprint(&path).await.unwrap();
        assert_eq!(before.len, 4);
        assert_eq!(store.fingerprint(&path).await, Some(before));

        std::fs::write(&path, b"abcdef").unwrap();
        assert_ne!(store.fingerprint(&path).await, Some(before));
    }

    #[tokio::test]
    async fn test_list_all_skips_dotfiles_and_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::open(dir.path()).unwrap();
        std::fs::write(store.path_for("dQw4w9WgXcQ.mp4"), b"video").unwrap();
        std::fs::write(store.path_for(".gitkeep"), b"").unwrap();
        std::fs::create_dir(store.path_for("nested")).unwrap();

        let artifacts = store.list_all().await.unwrap();
        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].locator, "dQw4w9WgXcQ");
        assert_eq!(artifacts[0].format, "mp4");
        assert_eq!(artifacts[0].size_bytes, 5);
    }

    #[tokio::test]
    async fn test_delete_missing_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::open(dir.path()).unwrap();
        let path = store.path_for("dQw4w9WgXcQ.webm");
        std::fs::write(&path, b"x").unwrap();

        store.delete(&path).await.unwrap();
        assert!(!path.exists());
        store.delete(&path).await.unwrap();
    }
}
