//! Poster storage in a single directory, sandboxed with `cap-std`.
//!
//! References are plain file names (`{key}.{extension}`). Writes go to a
//! temporary name first and are renamed into place.

use std::io;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use tracing::debug;

use crate::domain::ports::{PosterError, PosterStore, RenderedPoster};

/// Stores posters as files under one directory.
#[derive(Debug, Clone)]
pub struct DirectoryPosterStore {
    dir: Arc<Dir>,
}

impl DirectoryPosterStore {
    /// Open `path`, creating it when missing.
    pub fn open(path: &Path) -> io::Result<Self> {
        Dir::create_ambient_dir_all(path, ambient_authority())?;
        let dir = Dir::open_ambient_dir(path, ambient_authority())?;
        Ok(Self { dir: Arc::new(dir) })
    }
}

fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.'))
}

fn content_type_for(reference: &str) -> &'static str {
    match reference.rsplit_once('.').map(|(_, ext)| ext) {
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}

fn storage_error(action: &str, reference: &str, error: impl std::fmt::Display) -> PosterError {
    PosterError::storage(format!("{action} {reference}: {error}"))
}

fn write_atomically(dir: &Dir, reference: &str, bytes: &[u8]) -> io::Result<()> {
    let staging = format!(".{reference}.tmp");
    dir.write(&staging, bytes)?;
    dir.rename(&staging, dir, reference)
}

fn read_optional(dir: &Dir, reference: &str) -> io::Result<Option<Vec<u8>>> {
    match dir.read(reference) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(error) => Err(error),
    }
}

#[async_trait]
impl PosterStore for DirectoryPosterStore {
    async fn save(&self, key: &str, poster: &RenderedPoster) -> Result<String, PosterError> {
        if !is_safe_name(key) || !is_safe_name(&poster.extension) {
            return Err(PosterError::storage(format!("invalid poster key {key}")));
        }
        let reference = format!("{key}.{}", poster.extension);
        let dir = Arc::clone(&self.dir);
        let bytes = poster.bytes.clone();
        let target = reference.clone();
        tokio::task::spawn_blocking(move || write_atomically(&dir, &target, &bytes))
            .await
            .map_err(|error| storage_error("write", &reference, error))?
            .map_err(|error| storage_error("write", &reference, error))?;
        debug!(reference = %reference, "poster stored");
        Ok(reference)
    }

    async fn load(&self, reference: &str) -> Result<Option<RenderedPoster>, PosterError> {
        if !is_safe_name(reference) {
            return Ok(None);
        }
        let dir = Arc::clone(&self.dir);
        let target = reference.to_owned();
        let bytes = tokio::task::spawn_blocking(move || read_optional(&dir, &target))
            .await
            .map_err(|error| storage_error("read", reference, error))?
            .map_err(|error| storage_error("read", reference, error))?;
        Ok(bytes.map(|bytes| RenderedPoster {
            content_type: content_type_for(reference).to_owned(),
            extension: reference
                .rsplit_once('.')
                .map(|(_, ext)| ext.to_owned())
                .unwrap_or_default(),
            bytes,
        }))
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    use super::*;

    struct Harness {
        _root: TempDir,
        store: DirectoryPosterStore,
    }

    #[fixture]
    fn harness() -> Harness {
        let root = tempfile::tempdir().expect("temp dir");
        let store = DirectoryPosterStore::open(&root.path().join("posters")).expect("open store");
        Harness { _root: root, store }
    }

    fn poster() -> RenderedPoster {
        RenderedPoster {
            content_type: "image/svg+xml".to_owned(),
            extension: "svg".to_owned(),
            bytes: b"<svg/>".to_vec(),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn saved_posters_load_back(harness: Harness) {
        let reference = harness
            .store
            .save("2019ugcs001-abc", &poster())
            .await
            .expect("save");

        assert_eq!(reference, "2019ugcs001-abc.svg");
        let loaded = harness.store.load(&reference).await.expect("load");
        assert_eq!(loaded, Some(poster()));
    }

    #[rstest]
    #[tokio::test]
    async fn missing_posters_load_as_none(harness: Harness) {
        let loaded = harness.store.load("absent.svg").await.expect("load");
        assert!(loaded.is_none());
    }

    #[rstest]
    #[case("../escape")]
    #[case("nested/key")]
    #[case("")]
    #[tokio::test]
    async fn unsafe_keys_are_refused(harness: Harness, #[case] key: &str) {
        let error = harness
            .store
            .save(key, &poster())
            .await
            .expect_err("unsafe key");
        assert!(matches!(error, PosterError::Storage { .. }));
        assert!(harness.store.load(key).await.expect("load").is_none());
    }

    #[rstest]
    #[case("a.svg", "image/svg+xml")]
    #[case("a.jpeg", "image/jpeg")]
    #[case("a", "application/octet-stream")]
    fn content_type_follows_extension(#[case] reference: &str, #[case] expected: &str) {
        assert_eq!(content_type_for(reference), expected);
    }
}
