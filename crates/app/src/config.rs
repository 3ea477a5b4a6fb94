//! Launch configuration read from the environment

use std::path::{Path, PathBuf};

use serde::Deserialize;
use sfumato_config::{ConfigError, GalleryConfig};
use sfumato_scene::{Exhibit, PaintingSource};

/// Errors while resolving what to exhibit
#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("Failed to read exhibit manifest: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid exhibit manifest: {0}")]
    Manifest(#[from] serde_json::Error),

    #[error("Unsupported exhibit file: {0}")]
    Unsupported(String),
}

/// How UI messages reach the gallery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IpcMode {
    /// No UI attached
    #[default]
    None,
    /// JSON lines on stdin and stdout
    Stdio,
}

impl IpcMode {
    /// Parse from environment variable SFUMATO_IPC
    pub fn from_env() -> Self {
        match std::env::var("SFUMATO_IPC").as_deref() {
            Ok("stdio") => Self::Stdio,
            _ => Self::None,
        }
    }
}

/// Exhibit manifest, `{"object": "bust.glb"}` or
/// `{"paintings": [{"path": "a.png", "width_cm": 77, "height_cm": 53}]}`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Manifest {
    Object(String),
    Paintings(Vec<ManifestPainting>),
}

#[derive(Debug, Deserialize)]
struct ManifestPainting {
    path: String,
    #[serde(default)]
    width_cm: Option<f32>,
    #[serde(default)]
    height_cm: Option<f32>,
}

fn resolve(base: &Path, path: &str) -> String {
    base.join(path).to_string_lossy().into_owned()
}

/// Parse a manifest whose relative paths start at `base`
pub fn exhibit_from_manifest(json: &str, base: &Path) -> Result<Exhibit, LaunchError> {
    let exhibit = match serde_json::from_str::<Manifest>(json)? {
        Manifest::Object(path) => Exhibit::Object {
            path: resolve(base, &path),
        },
        Manifest::Paintings(paintings) => Exhibit::Paintings(
            paintings
                .into_iter()
                .map(|p| PaintingSource {
                    path: resolve(base, &p.path),
                    dimensions_cm: p.width_cm.zip(p.height_cm).map(|(w, h)| [w, h]),
                })
                .collect(),
        ),
    };
    Ok(exhibit)
}

/// Exhibit for a file: glTF objects, single images or JSON manifests
pub fn exhibit_for_path(path: &Path) -> Result<Exhibit, LaunchError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let display = path.to_string_lossy().into_owned();

    match extension.as_str() {
        "gltf" | "glb" => Ok(Exhibit::Object { path: display }),
        "png" | "jpg" | "jpeg" => Ok(Exhibit::Paintings(vec![PaintingSource {
            path: display,
            dimensions_cm: None,
        }])),
        "json" => {
            let json = std::fs::read_to_string(path)?;
            let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
            exhibit_from_manifest(&json, &base)
        }
        _ => Err(LaunchError::Unsupported(display)),
    }
}

/// Everything the app needs before building the bevy app
#[derive(Debug, Clone)]
pub struct LaunchConfig {
    pub gallery: GalleryConfig,
    pub exhibit: Exhibit,
    pub ipc: IpcMode,
    /// Problems found while reading the environment, logged once the app runs
    pub warnings: Vec<String>,
}

impl LaunchConfig {
    /// Read SFUMATO_CONFIG, SFUMATO_EXHIBIT and SFUMATO_IPC. Problems are
    /// recorded and the defaults kept.
    pub fn from_env() -> Self {
        let mut warnings = Vec::new();

        let gallery = match std::env::var_os("SFUMATO_CONFIG").map(PathBuf::from) {
            Some(path) => GalleryConfig::from_file(&path).unwrap_or_else(|err: ConfigError| {
                warnings.push(format!("Ignoring gallery config {}: {}", path.display(), err));
                GalleryConfig::default()
            }),
            None => GalleryConfig::default(),
        };

        let exhibit = match std::env::var_os("SFUMATO_EXHIBIT").map(PathBuf::from) {
            Some(path) => exhibit_for_path(&path).unwrap_or_else(|err| {
                warnings.push(format!("Cannot exhibit {}: {}", path.display(), err));
                Exhibit::Empty
            }),
            None => Exhibit::Empty,
        };

        Self {
            gallery,
            exhibit,
            ipc: IpcMode::from_env(),
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_painting_manifest() {
        let json = r#"{"paintings": [
            {"path": "mona.png", "width_cm": 77, "height_cm": 53},
            {"path": "sketch.jpg", "width_cm": 40}
        ]}"#;
        let exhibit = exhibit_from_manifest(json, Path::new("/gallery")).unwrap();
        let Exhibit::Paintings(paintings) = exhibit else {
            panic!("expected paintings");
        };
        assert_eq!(paintings.len(), 2);
        assert_eq!(paintings[0].dimensions_cm, Some([77.0, 53.0]));
        assert!(paintings[0].path.ends_with("mona.png"));
        assert!(paintings[0].path.starts_with("/gallery"));
        // Both dimensions are needed
        assert_eq!(paintings[1].dimensions_cm, None);
    }

    #[test]
    fn test_object_manifest() {
        let exhibit = exhibit_from_manifest(r#"{"object": "bust.glb"}"#, Path::new("models")).unwrap();
        assert!(matches!(exhibit, Exhibit::Object { ref path } if path.ends_with("bust.glb")));
    }

    #[test]
    fn test_exhibit_by_extension() {
        assert!(matches!(exhibit_for_path(Path::new("statue.GLB")), Ok(Exhibit::Object { .. })));
        assert!(matches!(
            exhibit_for_path(Path::new("portrait.jpeg")),
            Ok(Exhibit::Paintings(ref p)) if p.len() == 1
        ));
        assert!(matches!(
            exhibit_for_path(Path::new("notes.txt")),
            Err(LaunchError::Unsupported(_))
        ));
    }

    #[test]
    fn test_bad_manifest() {
        assert!(matches!(
            exhibit_from_manifest("{\"sculptures\": []}", Path::new(".")),
            Err(LaunchError::Manifest(_))
        ));
    }
}
