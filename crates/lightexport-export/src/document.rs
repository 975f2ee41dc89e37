//! Frame documents and document sinks
//!
//! A frame document is a flat list of `key = value` lines grouped under
//! `[mesh]` and `[camera]` markers. Vector values are `;`-joined.

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::Serialize;

use lightexport_core::Result;

use crate::camera::CameraRecord;
use crate::material::MaterialRecord;

/// Render a scalar with a decimal point always present (`1.0`, `0.25`)
pub fn format_scalar(value: f32) -> String {
    format!("{value:?}")
}

/// Render a vector as `x;y;z`
pub fn format_vec3(v: Vec3) -> String {
    v.to_array()
        .iter()
        .map(|c| format_scalar(*c))
        .collect::<Vec<_>>()
        .join(";")
}

/// A mesh block: exported geometry file plus its material layers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeshSection {
    pub object: String,
    pub mesh_file: String,
    pub materials: Vec<MaterialRecord>,
}

impl MeshSection {
    pub const HEADER: &'static str = "[mesh]";

    pub fn mesh_file_line(mesh_file: &str) -> String {
        format!("mesh_file = {mesh_file}")
    }

    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![Self::HEADER.to_string(), Self::mesh_file_line(&self.mesh_file)];
        lines.extend(self.materials.iter().flat_map(MaterialRecord::lines));
        lines
    }
}

/// One block of a frame document
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "section", rename_all = "lowercase")]
pub enum Section {
    Mesh(MeshSection),
    Camera(CameraRecord),
}

impl Section {
    pub fn lines(&self) -> Vec<String> {
        match self {
            Section::Mesh(mesh) => mesh.lines(),
            Section::Camera(camera) => camera.lines(),
        }
    }
}

/// Complete export of one frame
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FrameDocument {
    /// `None` when the scene was exported at its current state
    pub frame: Option<i32>,
    pub sections: Vec<Section>,
}

impl FrameDocument {
    pub fn new(frame: Option<i32>) -> Self {
        Self {
            frame,
            sections: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn meshes(&self) -> impl Iterator<Item = &MeshSection> {
        self.sections.iter().filter_map(|section| match section {
            Section::Mesh(mesh) => Some(mesh),
            Section::Camera(_) => None,
        })
    }

    pub fn cameras(&self) -> impl Iterator<Item = &CameraRecord> {
        self.sections.iter().filter_map(|section| match section {
            Section::Camera(camera) => Some(camera),
            Section::Mesh(_) => None,
        })
    }

    /// All document lines in order
    pub fn lines(&self) -> Vec<String> {
        self.sections.iter().flat_map(Section::lines).collect()
    }
}

impl fmt::Display for FrameDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Destination for document lines
pub trait DocumentSink {
    /// Append one line; the sink adds the line terminator
    fn write_line(&mut self, line: &str) -> Result<()>;

    /// Flush everything written so far
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Buffered file sink. The file is created (or truncated) on open and closed
/// when the sink is dropped, including on error paths.
pub struct FileDocumentSink {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl FileDocumentSink {
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)?;
        Ok(Self {
            path,
            writer: BufWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentSink for FileDocumentSink {
    fn write_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.writer, "{line}")?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// In-memory sink
#[derive(Debug, Default, Clone)]
pub struct VecDocumentSink {
    lines: Vec<String>,
}

impl VecDocumentSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_text(self) -> String {
        self.lines.iter().map(|line| format!("{line}\n")).collect()
    }
}

impl DocumentSink for VecDocumentSink {
    fn write_line(&mut self, line: &str) -> Result<()> {
        self.lines.push(line.to_string());
        Ok(())
    }
}
