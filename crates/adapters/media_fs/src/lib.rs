//! # switchroom-adapter-media-fs
//!
//! Local filesystem storage for photo binaries.
//!
//! ## Responsibilities
//! - Implement the `PhotoStorage` port defined in `switchroom-app::ports`
//! - Write uploads under `<root>/switchroom_photos/` with collision-free names
//! - Resolve stored references to public URLs under a configurable prefix
//!
//! ## Dependency rule
//! Depends on `switchroom-app` (for the port trait) and `switchroom-domain`
//! (for the error type). Serving the files over HTTP is the HTTP adapter's job.

use std::io;
use std::path::{Component, Path, PathBuf};

use switchroom_app::ports::PhotoStorage;
use switchroom_domain::error::SwitchroomError;

/// Sub-directory of the media root that holds switchroom photos.
pub const UPLOAD_DIR: &str = "switchroom_photos";

/// Errors originating from the filesystem photo storage.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    /// Reading or writing a file failed.
    #[error("media file error")]
    Io(#[from] io::Error),

    /// A stored reference points outside the media root.
    #[error("invalid media reference {0:?}")]
    InvalidReference(String),
}

impl From<MediaError> for SwitchroomError {
    fn from(err: MediaError) -> Self {
        Self::Storage(Box::new(err))
    }
}

/// Configuration for the filesystem photo storage.
pub struct Config {
    /// Directory files are written under.
    pub root: PathBuf,
    /// URL prefix the HTTP adapter serves `root` from (e.g. `/media`).
    pub url_prefix: String,
}

impl Config {
    /// Build the storage backend.
    #[must_use]
    pub fn build(self) -> FsPhotoStorage {
        FsPhotoStorage {
            root: self.root,
            url_prefix: self.url_prefix.trim_end_matches('/').to_string(),
        }
    }
}

/// Photo storage backed by a local directory.
pub struct FsPhotoStorage {
    root: PathBuf,
    url_prefix: String,
}

impl FsPhotoStorage {
    /// Directory files are written under.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a stored reference back to a path inside the media root.
    fn resolve(&self, reference: &str) -> Result<PathBuf, MediaError> {
        let relative = Path::new(reference);
        let contained = relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
        if !contained || reference.is_empty() {
            return Err(MediaError::InvalidReference(reference.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

impl PhotoStorage for FsPhotoStorage {
    async fn save(
        &self,
        extension: &'static str,
        data: Vec<u8>,
    ) -> Result<String, SwitchroomError> {
        let dir = self.root.join(UPLOAD_DIR);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(MediaError::from)?;

        let file_name = format!("{}.{extension}", uuid::Uuid::new_v4());
        tokio::fs::write(dir.join(&file_name), &data)
            .await
            .map_err(MediaError::from)?;

        let reference = format!("{UPLOAD_DIR}/{file_name}");
        tracing::debug!(reference = %reference, bytes = data.len(), "photo stored");
        Ok(reference)
    }

    async fn remove(&self, reference: String) -> Result<(), SwitchroomError> {
        let path = self.resolve(&reference)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(MediaError::from(err).into()),
        }
    }

    fn url(&self, reference: &str) -> String {
        format!("{}/{reference}", self.url_prefix)
    }
}
