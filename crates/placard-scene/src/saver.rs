//! Scene saving to JSON and TOML

use crate::format::Scene;
use crate::loader::SceneFormat;
use placard_core::Result;
use std::fs;
use std::path::Path;

/// Save a scene to a file, picking the format from the extension
pub fn save_scene<P: AsRef<Path>>(path: P, scene: &Scene) -> Result<()> {
    let content = save_scene_string(scene, SceneFormat::from_path(&path))?;
    fs::write(path, content)?;
    Ok(())
}

/// Serialize a scene. JSON output is pretty-printed with a trailing newline.
pub fn save_scene_string(scene: &Scene, format: SceneFormat) -> Result<String> {
    let content = match format {
        SceneFormat::Json => {
            let mut s = serde_json::to_string_pretty(scene)?;
            s.push('\n');
            s
        }
        SceneFormat::Toml => toml::to_string_pretty(scene)?,
    };
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;
    use crate::loader::{load_scene, load_scene_string};

    fn sample() -> Scene {
        Scene::new("Roundtrip")
            .with(Element::background("#FFFFFF"))
            .with(Element::headline("Big news").with_rect(10.0, 40.0, 80.0, 10.0))
    }

    #[test]
    fn test_json_roundtrip() {
        let scene = sample();
        let saved = save_scene_string(&scene, SceneFormat::Json).unwrap();
        assert!(saved.contains("\"type\": \"headline\""));
        assert_eq!(load_scene_string(&saved, SceneFormat::Json).unwrap(), scene);
    }

    #[test]
    fn test_toml_roundtrip() {
        let scene = sample();
        let saved = save_scene_string(&scene, SceneFormat::Toml).unwrap();
        assert!(saved.contains("[[elements]]"));
        assert_eq!(load_scene_string(&saved, SceneFormat::Toml).unwrap(), scene);
    }

    #[test]
    fn test_save_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.toml");
        save_scene(&path, &sample()).unwrap();
        assert_eq!(load_scene(&path).unwrap(), sample());
    }
}
