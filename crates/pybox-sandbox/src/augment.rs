//! Render augmentation for Manim sources.
//!
//! Before an augmented run we write a `manim.cfg` into the working tree so
//! the renderer keeps its output inside the tree, then scan the source for
//! a Scene subclass and append bootstrap code that renders it. Detection
//! is best-effort and never raises: a source without a recognisable scene
//! class runs unmodified.

use anyhow::{Context, Result};
use pybox_core::config::RenderConfig;
use regex::Regex;
use std::path::Path;

/// Matches `class Name(...Scene...):` declarations, including subclasses
/// like `MovingCameraScene` or `ThreeDScene`.
fn scene_class_pattern() -> Regex {
    Regex::new(r"(?m)^\s*class\s+([A-Za-z_][A-Za-z0-9_]*)\s*\([^)]*Scene[^)]*\)\s*:")
        .expect("static scene pattern")
}

/// Find the first class declaration subclassing the renderer's scene
/// abstraction. Returns the class name, or `None` — never an error.
pub fn detect_scene_class(source: &str) -> Option<String> {
    scene_class_pattern()
        .captures(source)
        .map(|caps| caps[1].to_string())
}

/// Write the renderer configuration into the working tree and create the
/// media directory skeleton the renderer expects.
pub fn write_renderer_config(tree: &Path, render: &RenderConfig) -> Result<()> {
    let media_dir = tree.join("media");
    let videos_dir = media_dir.join("videos");
    std::fs::create_dir_all(&videos_dir).context("Create media dirs")?;

    let config = format!(
        "[CLI]\n\
         media_dir = {}\n\
         video_dir = {}\n\
         pixel_width = {}\n\
         pixel_height = {}\n\
         frame_rate = {}\n\
         format = {}\n\
         disable_caching = True\n",
        media_dir.display(),
        videos_dir.display(),
        render.pixel_width,
        render.pixel_height,
        render.frame_rate,
        render.format,
    );
    std::fs::write(tree.join("manim.cfg"), config).context("Write manim.cfg")?;
    Ok(())
}

/// Append bootstrap code that instantiates the detected scene class and
/// invokes its render entry point. The construct body is padded with a
/// short tail wait so an empty scene still yields a playable artifact.
/// Returns the (possibly unchanged) source and the detected class name.
pub fn augment_source(source: &str) -> (String, Option<String>) {
    let Some(class_name) = detect_scene_class(source) else {
        return (source.to_string(), None);
    };

    let bootstrap = format!(
        "\n\nif __name__ == \"__main__\":\n\
         \x20   _pybox_scene = {class_name}()\n\
         \x20   _pybox_construct = _pybox_scene.construct\n\
         \x20   def _pybox_construct_padded():\n\
         \x20       _pybox_construct()\n\
         \x20       _pybox_scene.wait(0.5)\n\
         \x20   _pybox_scene.construct = _pybox_construct_padded\n\
         \x20   _pybox_scene.render()\n"
    );

    let mut augmented = source.to_string();
    augmented.push_str(&bootstrap);
    (augmented, Some(class_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_plain_scene_subclass() {
        let source = "from manim import *\n\nclass SquareToCircle(Scene):\n    def construct(self):\n        pass\n";
        assert_eq!(detect_scene_class(source), Some("SquareToCircle".to_string()));
    }

    #[test]
    fn detects_derived_scene_bases() {
        let source = "class Orbit(MovingCameraScene):\n    pass\n";
        assert_eq!(detect_scene_class(source), Some("Orbit".to_string()));
    }

    #[test]
    fn non_scene_class_is_not_detected() {
        let source = "class Helper(object):\n    pass\n";
        assert_eq!(detect_scene_class(source), None);
    }

    #[test]
    fn augment_without_scene_leaves_source_unmodified() {
        let source = "print('hi')\n";
        let (out, detected) = augment_source(source);
        assert_eq!(out, source);
        assert_eq!(detected, None);
    }

    #[test]
    fn augment_appends_render_bootstrap() {
        let source = "class Demo(Scene):\n    def construct(self):\n        pass\n";
        let (out, detected) = augment_source(source);
        assert_eq!(detected, Some("Demo".to_string()));
        assert!(out.starts_with(source));
        assert!(out.contains("Demo()"));
        assert!(out.contains(".render()"));
        assert!(out.contains(".wait(0.5)"));
    }

    #[test]
    fn renderer_config_is_written_into_tree() {
        let tree = tempfile::tempdir().unwrap();
        let render = RenderConfig {
            pixel_width: 1280,
            pixel_height: 720,
            frame_rate: 30,
            format: "mp4".to_string(),
        };
        write_renderer_config(tree.path(), &render).unwrap();

        let cfg = std::fs::read_to_string(tree.path().join("manim.cfg")).unwrap();
        assert!(cfg.starts_with("[CLI]\n"));
        assert!(cfg.contains("pixel_width = 1280"));
        assert!(cfg.contains("frame_rate = 30"));
        assert!(cfg.contains("disable_caching = True"));
        assert!(tree.path().join("media").join("videos").is_dir());
    }
}
