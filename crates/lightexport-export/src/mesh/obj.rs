//! Wavefront OBJ mesh exporter

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use glam::Mat3;
use tracing::debug;

use lightexport_core::ObjectId;
use lightexport_scene::{MeshGeometry, ObjectKind, SceneContext, SceneObject};

use super::{MeshExportError, MeshExportOptions, MeshExportResult, MeshExporter};
use crate::coords::to_export_space;

/// Writes meshes as OBJ text, baked into world space and converted to the
/// Y-up export axes.
#[derive(Debug, Default, Clone)]
pub struct ObjMeshExporter {
    files_written: usize,
}

impl ObjMeshExporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of OBJ files written so far
    pub fn files_written(&self) -> usize {
        self.files_written
    }

    /// Write `objects` as OBJ text to `w`
    pub fn write_obj<W: Write>(
        &self,
        w: &mut W,
        objects: &[&SceneObject],
        options: &MeshExportOptions,
    ) -> MeshExportResult<()> {
        writeln!(w, "# lightexport OBJ")?;

        // OBJ indices are 1-based and global across objects.
        let mut vertex_offset = 1u32;
        let mut normal_offset = 1u32;

        for object in objects {
            let geometry = object.geometry.as_ref().ok_or_else(|| MeshExportError::MissingGeometry {
                object: object.name.clone(),
            })?;
            validate_faces(&object.name, geometry)?;

            writeln!(w, "o {}", object.name)?;

            let world = object.world_matrix();
            for position in &geometry.positions {
                let p = to_export_space(world.transform_point3(*position));
                writeln!(w, "v {} {} {}", p.x, p.y, p.z)?;
            }

            let has_normals = !geometry.normals.is_empty() && geometry.normals.len() == geometry.positions.len();
            if has_normals {
                let normal_matrix = Mat3::from_mat4(world).inverse().transpose();
                for normal in &geometry.normals {
                    let n = to_export_space((normal_matrix * *normal).normalize_or_zero());
                    writeln!(w, "vn {} {} {}", n.x, n.y, n.z)?;
                }
            }

            if options.export_materials {
                if let Some(material) = object.primary_material() {
                    writeln!(w, "usemtl {}", material.name)?;
                }
            }

            if options.smooth_groups {
                writeln!(w, "s 1")?;
            } else {
                writeln!(w, "s off")?;
            }

            for face in &geometry.faces {
                if options.triangulate {
                    for i in 1..face.len() - 1 {
                        let tri = [face[0], face[i], face[i + 1]];
                        write_face(w, &tri, vertex_offset, normal_offset, has_normals)?;
                    }
                } else {
                    write_face(w, face, vertex_offset, normal_offset, has_normals)?;
                }
            }

            vertex_offset += geometry.positions.len() as u32;
            if has_normals {
                normal_offset += geometry.normals.len() as u32;
            }
        }

        Ok(())
    }
}

impl MeshExporter for ObjMeshExporter {
    fn export_selected(
        &mut self,
        scene: &dyn SceneContext,
        path: &Path,
        options: &MeshExportOptions,
    ) -> MeshExportResult<()> {
        let ids: Vec<ObjectId> = if options.selected_only {
            scene.selected_ids()
        } else {
            scene.visible_ids()
        };

        let objects: Vec<&SceneObject> = ids
            .into_iter()
            .filter_map(|id| scene.object(id))
            .filter(|object| object.kind == ObjectKind::Mesh)
            .collect();

        if objects.is_empty() {
            return Err(MeshExportError::NothingSelected);
        }

        let mut writer = BufWriter::new(File::create(path)?);
        self.write_obj(&mut writer, &objects, options)?;
        writer.flush()?;

        self.files_written += 1;
        debug!(path = %path.display(), objects = objects.len(), "Wrote OBJ");

        Ok(())
    }
}

fn validate_faces(object: &str, geometry: &MeshGeometry) -> MeshExportResult<()> {
    let count = geometry.positions.len();
    for (face_index, face) in geometry.faces.iter().enumerate() {
        if face.len() < 3 {
            return Err(MeshExportError::DegenerateFace {
                object: object.to_string(),
                face: face_index,
                vertices: face.len(),
            });
        }
        if let Some(&index) = face.iter().find(|&&index| index as usize >= count) {
            return Err(MeshExportError::IndexOutOfRange {
                object: object.to_string(),
                index,
                count,
            });
        }
    }
    Ok(())
}

fn write_face<W: Write>(
    w: &mut W,
    indices: &[u32],
    vertex_offset: u32,
    normal_offset: u32,
    has_normals: bool,
) -> MeshExportResult<()> {
    write!(w, "f")?;
    for &index in indices {
        if has_normals {
            write!(w, " {}//{}", index + vertex_offset, index + normal_offset)?;
        } else {
            write!(w, " {}", index + vertex_offset)?;
        }
    }
    writeln!(w)?;
    Ok(())
}
