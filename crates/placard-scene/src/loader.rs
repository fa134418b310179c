//! Scene loading from JSON and TOML

use crate::format::{Scene, SuggestionList};
use placard_core::Result;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// On-disk scene encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneFormat {
    Json,
    Toml,
}

impl SceneFormat {
    /// `.toml` files are TOML, everything else is treated as JSON
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match path.as_ref().extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => SceneFormat::Toml,
            _ => SceneFormat::Json,
        }
    }
}

/// Load a scene from a file, picking the format from the extension
pub fn load_scene<P: AsRef<Path>>(path: P) -> Result<Scene> {
    let format = SceneFormat::from_path(&path);
    let content = fs::read_to_string(path)?;
    load_scene_string(&content, format)
}

/// Load a scene from a string
pub fn load_scene_string(content: &str, format: SceneFormat) -> Result<Scene> {
    let scene: Scene = match format {
        SceneFormat::Json => serde_json::from_str(content)?,
        SceneFormat::Toml => toml::from_str(content)?,
    };
    tracing::debug!(scene = %scene.id, elements = scene.elements.len(), "scene loaded");
    Ok(scene)
}

/// Load candidate scenes from the suggestion service.
///
/// Accepts either `{"layouts": [...]}` or a bare JSON array of scenes.
pub fn load_suggestions_string(content: &str) -> Result<Vec<Scene>> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Suggestions {
        Wrapped(SuggestionList),
        Bare(Vec<Scene>),
    }

    let scenes = match serde_json::from_str(content)? {
        Suggestions::Wrapped(list) => list.layouts,
        Suggestions::Bare(scenes) => scenes,
    };
    tracing::debug!(count = scenes.len(), "suggestions loaded");
    Ok(scenes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementKind;
    use std::io::Write;

    #[test]
    fn test_load_toml_scene() {
        let toml_str = r##"
id = "toml_layout"
score = 0.5

[[elements]]
type = "background"
color = "#F0F0F0"

[[elements]]
type = "headline"
text = "Summer range"
x = 10.0
y = 40.0
width = 80.0
height = 10.0
font_size = 40
"##;
        let scene = load_scene_string(toml_str, SceneFormat::Toml).unwrap();
        assert_eq!(scene.id, "toml_layout");
        assert_eq!(scene.elements.len(), 2);
        assert_eq!(scene.elements[1].effective_font_size(), Some(40.0));
    }

    #[test]
    fn test_load_malformed_json_is_error() {
        assert!(load_scene_string("{ not json", SceneFormat::Json).is_err());
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(SceneFormat::from_path("a/b.toml"), SceneFormat::Toml);
        assert_eq!(SceneFormat::from_path("a/b.TOML"), SceneFormat::Toml);
        assert_eq!(SceneFormat::from_path("a/b.json"), SceneFormat::Json);
        assert_eq!(SceneFormat::from_path("a/b"), SceneFormat::Json);
    }

    #[test]
    fn test_load_scene_from_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{"id": "f", "elements": [{{"type": "logo", "asset": "l.png"}}]}}"#
        )
        .unwrap();

        let scene = load_scene(file.path()).unwrap();
        assert_eq!(scene.id, "f");
        assert!(scene.has(ElementKind::Logo));
    }

    #[test]
    fn test_load_suggestions_wrapped_and_bare() {
        let wrapped = r#"{"layouts": [{"id": "a", "elements": []}, {"id": "b", "elements": []}]}"#;
        let scenes = load_suggestions_string(wrapped).unwrap();
        assert_eq!(scenes.len(), 2);
        assert_eq!(scenes[1].id, "b");

        let bare = r#"[{"id": "c", "elements": []}]"#;
        assert_eq!(load_suggestions_string(bare).unwrap()[0].id, "c");
    }
}
