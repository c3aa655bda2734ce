//! Artifact store: filesystem primitives for uploaded videos, thumbnails,
//! and scoring output segments.
//!
//! All paths handed back to callers (and persisted in the record store)
//! are relative to the storage root, so the root can move without
//! rewriting rows. Cleanup helpers are best-effort by contract: a missing
//! file is not an error, and any other I/O failure is logged and
//! swallowed by [`remove_manifest`].

use std::path::{Path, PathBuf};

/// Uploaded source videos.
pub const VIDEO_DIR: &str = "uploads/videos";

/// Generated video thumbnails.
pub const THUMBNAIL_DIR: &str = "uploads/thumbnails";

/// Segment artifacts written by the scoring processor.
pub const SEGMENT_DIR: &str = "runs";

/// Generate a collision-free storage name, preserving the extension of
/// the client-supplied file name.
pub fn unique_file_name(original: &str) -> String {
    let id = uuid::Uuid::new_v4().simple();
    match Path::new(original).extension().and_then(|e| e.to_str()) {
        Some(ext) if !ext.is_empty() => format!("{id}.{}", ext.to_lowercase()),
        _ => id.to_string(),
    }
}

/// Resolve a stored artifact path against the storage root.
///
/// Manifest entries written by the scoring processor may be absolute;
/// everything this service writes is root-relative.
pub fn resolve(root: &Path, stored: &str) -> PathBuf {
    let path = Path::new(stored);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Write `bytes` under `root/directory/file_name`, creating the directory
/// as needed. Returns the root-relative path for persistence.
pub async fn save_file(
    root: &Path,
    directory: &str,
    file_name: &str,
    bytes: &[u8],
) -> std::io::Result<String> {
    let dir = root.join(directory);
    tokio::fs::create_dir_all(&dir).await?;
    tokio::fs::write(dir.join(file_name), bytes).await?;
    Ok(format!("{directory}/{file_name}"))
}

/// Delete a stored file. Returns `false` (not an error) when the file
/// was already absent.
pub async fn delete_file(root: &Path, stored: &str) -> std::io::Result<bool> {
    match tokio::fs::remove_file(resolve(root, stored)).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// Best-effort removal of every file named in an analysis artifact
/// manifest (the persisted `output_arr`). Non-string entries are skipped;
/// I/O failures are logged and never propagated. Returns the number of
/// files actually removed.
pub async fn remove_manifest(root: &Path, manifest: Option<&serde_json::Value>) -> usize {
    let Some(entries) = manifest.and_then(|m| m.as_array()) else {
        return 0;
    };

    let mut removed = 0;
    for entry in entries {
        let Some(stored) = entry.as_str() else {
            tracing::debug!("non-string manifest entry skipped");
            continue;
        };
        match delete_file(root, stored).await {
            Ok(true) => removed += 1,
            Ok(false) => {}
            Err(e) => {
                tracing::warn!(path = stored, error = %e, "failed to remove segment artifact");
            }
        }
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unique_name_keeps_extension() {
        let name = unique_file_name("My Swing.MP4");
        assert!(name.ends_with(".mp4"));
        assert!(!name.contains(' '));
        assert_ne!(unique_file_name("a.mp4"), unique_file_name("a.mp4"));
    }

    #[test]
    fn unique_name_without_extension() {
        let name = unique_file_name("clip");
        assert!(!name.contains('.'));
    }

    #[test]
    fn resolve_absolute_passes_through() {
        let root = Path::new("/data/storage");
        assert_eq!(resolve(root, "/tmp/x.mp4"), PathBuf::from("/tmp/x.mp4"));
        assert_eq!(
            resolve(root, "runs/x_0.mp4"),
            PathBuf::from("/data/storage/runs/x_0.mp4")
        );
    }

    #[tokio::test]
    async fn save_then_delete_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let rel = save_file(dir.path(), VIDEO_DIR, "clip.mp4", b"data")
            .await
            .unwrap();
        assert_eq!(rel, "uploads/videos/clip.mp4");
        assert!(dir.path().join(&rel).exists());

        assert!(delete_file(dir.path(), &rel).await.unwrap());
        assert!(!dir.path().join(&rel).exists());
    }

    #[tokio::test]
    async fn delete_missing_file_is_false_not_error() {
        let dir = tempfile::tempdir().unwrap();
        let deleted = delete_file(dir.path(), "uploads/videos/ghost.mp4")
            .await
            .unwrap();
        assert!(!deleted);
    }

    #[tokio::test]
    async fn remove_manifest_is_best_effort() {
        let dir = tempfile::tempdir().unwrap();
        let kept = save_file(dir.path(), SEGMENT_DIR, "a_0.mp4", b"seg")
            .await
            .unwrap();

        let manifest = json!([kept, "runs/ghost.mp4", 42, null]);
        let removed = remove_manifest(dir.path(), Some(&manifest)).await;
        assert_eq!(removed, 1);
        assert!(!dir.path().join("runs/a_0.mp4").exists());
    }

    #[tokio::test]
    async fn remove_manifest_handles_missing_or_non_array() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(remove_manifest(dir.path(), None).await, 0);
        assert_eq!(remove_manifest(dir.path(), Some(&json!(null))).await, 0);
        assert_eq!(remove_manifest(dir.path(), Some(&json!("x"))).await, 0);
    }
}
