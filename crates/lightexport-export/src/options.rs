//! Export configuration

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use lightexport_core::{Error, FrameRange, Result};

/// Where and how frame documents and mesh files are written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Directory receiving documents and mesh files
    pub output_dir: PathBuf,

    /// File name prefix of frame documents
    pub document_prefix: String,

    /// Extension of frame documents
    pub document_extension: String,

    /// File name prefix of mesh files, followed by the object name
    pub mesh_prefix: String,

    /// Extension of mesh files
    pub mesh_extension: String,

    /// Overrides the scene's frame range when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_range: Option<FrameRange>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            output_dir: std::env::temp_dir(),
            document_prefix: "blender_export".to_string(),
            document_extension: "toml".to_string(),
            mesh_prefix: "blender_export_".to_string(),
            mesh_extension: "obj".to_string(),
            frame_range: None,
        }
    }
}

impl ExportOptions {
    /// Default options writing into `output_dir`
    pub fn in_dir(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            ..Default::default()
        }
    }

    /// Load options from a JSON file; missing keys take their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let options: ExportOptions = serde_json::from_str(&json)
            .map_err(|e| Error::invalid_config(format!("{}: {e}", path.display())))?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        if self.document_prefix.is_empty() {
            return Err(Error::invalid_config("document_prefix must not be empty"));
        }
        if self.document_extension.is_empty() || self.mesh_extension.is_empty() {
            return Err(Error::invalid_config("file extensions must not be empty"));
        }
        if self.mesh_prefix.is_empty() {
            return Err(Error::invalid_config("mesh_prefix must not be empty"));
        }
        if let Some(range) = &self.frame_range {
            range.validate()?;
        }
        Ok(())
    }

    /// `<output_dir>/<document_prefix><frame>.<document_extension>`;
    /// the frame part is empty when no frame is given
    pub fn document_path(&self, frame: Option<i32>) -> PathBuf {
        let name = format!(
            "{}{}.{}",
            self.document_prefix,
            frame_suffix(frame),
            self.document_extension
        );
        self.output_dir.join(name)
    }

    /// `<output_dir>/<mesh_prefix><object><frame>.<mesh_extension>`
    pub fn mesh_path(&self, object: &str, frame: Option<i32>) -> PathBuf {
        let name = format!(
            "{}{}{}.{}",
            self.mesh_prefix,
            object,
            frame_suffix(frame),
            self.mesh_extension
        );
        self.output_dir.join(name)
    }
}

fn frame_suffix(frame: Option<i32>) -> String {
    frame.map(|f| f.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_embed_frame_index() {
        let options = ExportOptions::in_dir("/tmp");

        assert_eq!(options.document_path(Some(12)), PathBuf::from("/tmp/blender_export12.toml"));
        assert_eq!(options.document_path(None), PathBuf::from("/tmp/blender_export.toml"));
        assert_eq!(
            options.mesh_path("Cube", Some(3)),
            PathBuf::from("/tmp/blender_export_Cube3.obj")
        );
        assert_eq!(options.mesh_path("Cube", None), PathBuf::from("/tmp/blender_export_Cube.obj"));
    }

    #[test]
    fn test_validate() {
        assert!(ExportOptions::default().validate().is_ok());

        let options = ExportOptions {
            document_prefix: String::new(),
            ..Default::default()
        };
        assert!(matches!(options.validate(), Err(Error::InvalidConfig { .. })));

        let options = ExportOptions {
            frame_range: Some(FrameRange { start: 3, end: 1 }),
            ..Default::default()
        };
        assert!(matches!(options.validate(), Err(Error::InvalidFrameRange { .. })));
    }

    #[test]
    fn test_from_json_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");
        std::fs::write(&path, r#"{ "output_dir": "/srv/frames", "frame_range": { "start": 5, "end": 8 } }"#).unwrap();

        let options = ExportOptions::from_json_file(&path).unwrap();
        assert_eq!(options.output_dir, PathBuf::from("/srv/frames"));
        assert_eq!(options.frame_range, Some(FrameRange { start: 5, end: 8 }));
        assert_eq!(options.mesh_extension, "obj");
    }

    #[test]
    fn test_from_json_file_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(
            ExportOptions::from_json_file(&path),
            Err(Error::InvalidConfig { .. })
        ));
    }
}
