//! Artifact discovery, selection and storage.
//!
//! The renderer writes into an ad hoc tree of media/video/image
//! subdirectories (with per-scene quality tiers like `720p30`). We search
//! a fixed, ordered list of candidate roots, deduplicate across the
//! overlapping roots, pick the best playable video, and copy it into the
//! durable output directory under a collision-free timestamped name.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Playable video containers, in no particular order.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "gif", "webm"];

/// Still-image formats the renderer may emit.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "svg"];

/// The primary container format. Almost always preferred over other
/// formats, hence the large ranking bonus.
const PRIMARY_FORMAT: &str = "mp4";
const PRIMARY_FORMAT_BONUS: u64 = 1 << 40;

/// Extension class of a discovered file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Video,
    Image,
    Other,
}

/// A generated media file found in the working tree.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub path: PathBuf,
    pub size: u64,
    pub kind: ArtifactKind,
}

fn classify(path: &Path) -> ArtifactKind {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();
    if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
        ArtifactKind::Video
    } else if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        ArtifactKind::Image
    } else {
        ArtifactKind::Other
    }
}

/// Fixed, ordered candidate roots beneath the working tree. The roots
/// overlap on purpose; `discover` deduplicates.
fn candidate_roots(tree: &Path) -> Vec<PathBuf> {
    vec![
        tree.to_path_buf(),
        tree.join("media"),
        tree.join("media").join("videos"),
        tree.join("media").join("images"),
        tree.join("media").join("Tex"),
    ]
}

/// Locate media files across the candidate roots, deduplicated by
/// canonical path, in deterministic (path-sorted) order.
pub fn discover(tree: &Path) -> Vec<Artifact> {
    let mut seen: HashSet<PathBuf> = HashSet::new();
    let mut artifacts = Vec::new();

    for root in candidate_roots(tree) {
        collect(&root, &mut seen, &mut artifacts);
    }

    artifacts.sort_by(|a, b| a.path.cmp(&b.path));
    artifacts
}

fn collect(dir: &Path, seen: &mut HashSet<PathBuf>, out: &mut Vec<Artifact>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        // Roots the renderer never created simply contribute nothing.
        Err(_) => return,
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect(&path, seen, out);
            continue;
        }
        let kind = classify(&path);
        if kind == ArtifactKind::Other {
            continue;
        }
        let canonical = path.canonicalize().unwrap_or_else(|_| path.clone());
        if !seen.insert(canonical) {
            continue;
        }
        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
        out.push(Artifact { path, size, kind });
    }
}

fn score(artifact: &Artifact) -> u64 {
    let is_primary = artifact
        .path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(PRIMARY_FORMAT))
        .unwrap_or(false);
    let bonus = if is_primary { PRIMARY_FORMAT_BONUS } else { 0 };
    bonus + artifact.size
}

/// Select the canonical artifact: playable videos only, ranked by the
/// primary-format bonus plus file size. Larger files win — placeholder or
/// truncated renders are typically small.
pub fn select(artifacts: &[Artifact]) -> Option<&Artifact> {
    artifacts
        .iter()
        .filter(|a| a.kind == ArtifactKind::Video)
        .max_by_key(|a| score(a))
}

/// Copy `artifact` into `output_dir` under `<stem>_<unix-seconds>.<ext>`
/// and return the stored file name. The source file is never mutated; the
/// working tree is destroyed wholesale by its owner.
pub fn store(artifact: &Artifact, output_dir: &Path) -> Result<String> {
    std::fs::create_dir_all(output_dir).context("Create output dir")?;

    let stem = artifact
        .path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("artifact");
    let ext = artifact
        .path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("bin");
    let name = format!("{}_{}.{}", stem, chrono::Utc::now().timestamp(), ext);

    std::fs::copy(&artifact.path, output_dir.join(&name))
        .with_context(|| format!("Copy artifact {}", artifact.path.display()))?;
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path, bytes: usize) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, vec![0u8; bytes]).unwrap();
    }

    #[test]
    fn discovers_across_quality_tiers() {
        let tree = tempfile::tempdir().unwrap();
        touch(
            &tree.path().join("media/videos/demo/720p30/Demo.mp4"),
            100,
        );
        touch(&tree.path().join("media/images/frame.png"), 10);
        touch(&tree.path().join("notes.txt"), 5);

        let artifacts = discover(tree.path());
        assert_eq!(artifacts.len(), 2);
        assert!(artifacts.iter().any(|a| a.kind == ArtifactKind::Video));
        assert!(artifacts.iter().any(|a| a.kind == ArtifactKind::Image));
    }

    #[test]
    fn overlapping_roots_deduplicate() {
        let tree = tempfile::tempdir().unwrap();
        // Reachable from the tree root, `media`, and `media/videos`.
        touch(&tree.path().join("media/videos/Demo.mp4"), 100);

        let artifacts = discover(tree.path());
        assert_eq!(artifacts.len(), 1);
    }

    #[test]
    fn primary_format_beats_any_size() {
        let tree = tempfile::tempdir().unwrap();
        touch(&tree.path().join("small.mp4"), 10);
        touch(&tree.path().join("huge.gif"), 1_000_000);

        let artifacts = discover(tree.path());
        let selected = select(&artifacts).unwrap();
        assert!(selected.path.ends_with("small.mp4"));
    }

    #[test]
    fn same_format_prefers_larger() {
        let tree = tempfile::tempdir().unwrap();
        touch(&tree.path().join("placeholder.mp4"), 64);
        touch(&tree.path().join("full.mp4"), 4096);

        let artifacts = discover(tree.path());
        let selected = select(&artifacts).unwrap();
        assert!(selected.path.ends_with("full.mp4"));
    }

    #[test]
    fn images_are_never_selected() {
        let tree = tempfile::tempdir().unwrap();
        touch(&tree.path().join("media/images/frame.png"), 4096);

        let artifacts = discover(tree.path());
        assert_eq!(artifacts.len(), 1);
        assert!(select(&artifacts).is_none());
    }

    #[test]
    fn store_appends_timestamp_to_stem() {
        let tree = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        touch(&tree.path().join("Demo.mp4"), 128);

        let artifacts = discover(tree.path());
        let name = store(select(&artifacts).unwrap(), out.path()).unwrap();
        assert!(name.starts_with("Demo_"));
        assert!(name.ends_with(".mp4"));
        assert!(out.path().join(&name).exists());
        // Source stays in place.
        assert!(tree.path().join("Demo.mp4").exists());
    }

    #[test]
    fn store_tolerates_preexisting_unrelated_files() {
        let tree = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        std::fs::write(out.path().join("leftover.bin"), b"x").unwrap();
        touch(&tree.path().join("Demo.mp4"), 128);

        let artifacts = discover(tree.path());
        let name = store(select(&artifacts).unwrap(), out.path()).unwrap();
        assert!(out.path().join(name).exists());
        assert!(out.path().join("leftover.bin").exists());
    }
}
