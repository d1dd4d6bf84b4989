//! MeshSink - callback interface for the renderer that displays node meshes.
//!
//! The octree pushes one mesh section per node and toggles section visibility
//! as nodes enter and leave the render set. It never reads anything back.

use std::collections::HashMap;

use crate::mesh::MeshData;
use crate::octree::NodeIndex;

/// Identifier of one mesh section. Equal to the index of the node that owns
/// it, so it stays stable for the lifetime of the tree.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct SectionId(pub u32);

impl From<NodeIndex> for SectionId {
  fn from(index: NodeIndex) -> Self {
    Self(index.raw())
  }
}

/// Receiver of extracted meshes.
///
/// # Example
///
/// ```ignore
/// struct GpuSink { device: Device, buffers: HashMap<SectionId, GpuMesh> }
///
/// impl MeshSink for GpuSink {
///   fn set_mesh_section(&mut self, section: SectionId, mesh: MeshData) {
///     self.buffers.insert(section, self.device.upload(&mesh));
///   }
///   fn set_section_visibility(&mut self, section: SectionId, visible: bool) {
///     if let Some(buffer) = self.buffers.get_mut(&section) {
///       buffer.visible = visible;
///     }
///   }
///   fn clear_section(&mut self, section: SectionId) {
///     self.buffers.remove(&section);
///   }
/// }
/// ```
pub trait MeshSink {
  /// Replace the geometry of a section, creating it if needed.
  fn set_mesh_section(&mut self, section: SectionId, mesh: MeshData);

  /// Show or hide a section. Sections without geometry may be toggled too.
  fn set_section_visibility(&mut self, section: SectionId, visible: bool);

  /// Drop the geometry of a section.
  fn clear_section(&mut self, section: SectionId);
}

/// No-op implementation for headless operation.
pub struct NullSink;

impl MeshSink for NullSink {
  fn set_mesh_section(&mut self, _section: SectionId, _mesh: MeshData) {
    // No-op
  }

  fn set_section_visibility(&mut self, _section: SectionId, _visible: bool) {
    // No-op
  }

  fn clear_section(&mut self, _section: SectionId) {
    // No-op
  }
}

/// Section state held by [`MemorySink`].
#[derive(Clone, Debug, Default)]
pub struct Section {
  pub mesh: Option<MeshData>,
  pub visible: bool,
}

/// Keeps every section in memory. Useful for tests and for hosts that upload
/// geometry in a later stage.
#[derive(Debug, Default)]
pub struct MemorySink {
  sections: HashMap<SectionId, Section>,
  /// Number of `set_mesh_section` calls received.
  pub uploads: usize,
  /// Number of `clear_section` calls received.
  pub clears: usize,
}

impl MemorySink {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn section(&self, section: SectionId) -> Option<&Section> {
    self.sections.get(&section)
  }

  /// Mesh of a section, if it has geometry.
  pub fn mesh(&self, section: SectionId) -> Option<&MeshData> {
    self.sections.get(&section)?.mesh.as_ref()
  }

  pub fn is_visible(&self, section: SectionId) -> bool {
    self.sections.get(&section).is_some_and(|s| s.visible)
  }

  /// Sections that are visible and hold geometry.
  pub fn visible_meshes(&self) -> impl Iterator<Item = (SectionId, &MeshData)> {
    self
      .sections
      .iter()
      .filter(|(_, s)| s.visible)
      .filter_map(|(id, s)| s.mesh.as_ref().map(|mesh| (*id, mesh)))
  }

  /// Total triangles across visible sections.
  pub fn visible_triangle_count(&self) -> usize {
    self.visible_meshes().map(|(_, mesh)| mesh.triangle_count()).sum()
  }
}

impl MeshSink for MemorySink {
  fn set_mesh_section(&mut self, section: SectionId, mesh: MeshData) {
    self.uploads += 1;
    self.sections.entry(section).or_default().mesh = Some(mesh);
  }

  fn set_section_visibility(&mut self, section: SectionId, visible: bool) {
    self.sections.entry(section).or_default().visible = visible;
  }

  fn clear_section(&mut self, section: SectionId) {
    self.clears += 1;
    if let Some(entry) = self.sections.get_mut(&section) {
      entry.mesh = None;
    }
  }
}
