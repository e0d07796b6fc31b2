//! External mesh resources and the colour targets lit objects write into
//!
//! Meshes belong to the host. A lit object keeps one [`MeshColorTarget`] per
//! mesh it paints: a colour buffer sized once at setup and a weak reference
//! to the mesh it uploads into. The buffer is never resized afterwards; if
//! the live mesh stops matching it, the upload is refused.

use std::sync::{Arc, RwLock, Weak};

use crate::foundation::color::VertexColor;
use crate::lighting::error::LightingError;

/// Mesh vertex colour storage as seen by the renderer
#[derive(Debug, Clone, PartialEq)]
pub struct VertexMesh {
    name: String,
    vertex_count: usize,
    colors: Vec<VertexColor>,
}

/// Mesh shared between the host renderer and the lighting session
pub type SharedMesh = Arc<RwLock<VertexMesh>>;

impl VertexMesh {
    /// Create a mesh with `vertex_count` black vertices
    pub fn new(name: impl Into<String>, vertex_count: usize) -> Self {
        Self {
            name: name.into(),
            vertex_count,
            colors: vec![VertexColor::BLACK; vertex_count],
        }
    }

    /// Wrap the mesh for sharing with lit objects
    pub fn shared(self) -> SharedMesh {
        Arc::new(RwLock::new(self))
    }

    /// Mesh name, used to exclude meshes from painting
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Live vertex count
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Replace the geometry with one of a different vertex count
    ///
    /// Models that swap parts at runtime do this; lit objects painting the
    /// mesh have to be set up again afterwards.
    pub fn replace_geometry(&mut self, vertex_count: usize) {
        self.vertex_count = vertex_count;
        self.colors = vec![VertexColor::BLACK; vertex_count];
    }

    /// Colours last uploaded to this mesh
    pub fn colors(&self) -> &[VertexColor] {
        &self.colors
    }

    /// Colour buffer as raw bytes, ready for a GPU upload
    pub fn color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.colors)
    }

    /// Upload a full colour buffer
    pub fn upload_colors(&mut self, colors: &[VertexColor]) -> Result<(), LightingError> {
        if colors.len() != self.vertex_count {
            return Err(LightingError::Consistency {
                mesh: self.name.clone(),
                buffer_len: colors.len(),
                vertex_count: self.vertex_count,
            });
        }
        self.colors.copy_from_slice(colors);
        Ok(())
    }
}

/// One mesh in a model hierarchy, as offered to lit object setup
#[derive(Debug, Clone)]
pub struct MeshNode {
    /// The mesh
    pub mesh: SharedMesh,
    /// Dynamically attached part that must never receive vertex lighting
    pub unlit: bool,
}

impl MeshNode {
    /// A mesh that should be painted
    pub fn lit(mesh: SharedMesh) -> Self {
        Self { mesh, unlit: false }
    }

    /// A dynamically attached mesh that is excluded from painting
    pub fn unlit(mesh: SharedMesh) -> Self {
        Self { mesh, unlit: true }
    }
}

/// Colour buffer for one mesh of a lit object
#[derive(Debug, Clone)]
pub struct MeshColorTarget {
    mesh_name: String,
    mesh: Weak<RwLock<VertexMesh>>,
    colors: Vec<VertexColor>,
}

impl MeshColorTarget {
    /// Size a target to the mesh's current vertex count
    pub fn for_mesh(mesh: &SharedMesh) -> Result<Self, LightingError> {
        let guard = mesh.read().map_err(|_| LightingError::MeshUnavailable {
            mesh: String::from("<poisoned>"),
        })?;
        Ok(Self {
            mesh_name: guard.name().to_string(),
            mesh: Arc::downgrade(mesh),
            colors: vec![VertexColor::BLACK; guard.vertex_count()],
        })
    }

    /// Name of the mesh this target paints
    pub fn mesh_name(&self) -> &str {
        &self.mesh_name
    }

    /// Cached colours, fixed in length since setup
    pub fn colors(&self) -> &[VertexColor] {
        &self.colors
    }

    /// Fill the cached buffer with `color` and upload it to the mesh
    ///
    /// A mesh that has already been dropped is not an error: the cached
    /// buffer is still updated so a later setup sees the latest colour.
    pub fn fill(&mut self, color: VertexColor) -> Result<(), LightingError> {
        self.colors.fill(color);

        let Some(mesh) = self.mesh.upgrade() else {
            return Ok(());
        };
        let mut guard = mesh.write().map_err(|_| LightingError::MeshUnavailable {
            mesh: self.mesh_name.clone(),
        })?;
        guard.upload_colors(&self.colors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_sized_from_mesh_and_uploads() {
        let mesh = VertexMesh::new("body", 4).shared();
        let mut target = MeshColorTarget::for_mesh(&mesh).unwrap();

        assert_eq!(target.colors().len(), 4);
        target.fill(VertexColor::new(10, 20, 30)).unwrap();

        let guard = mesh.read().unwrap();
        assert!(guard.colors().iter().all(|c| *c == VertexColor::new(10, 20, 30)));
        assert_eq!(guard.color_bytes().len(), 12);
    }

    #[test]
    fn test_mismatched_mesh_is_reported_and_left_untouched() {
        let mesh = VertexMesh::new("helmet", 3).shared();
        let mut target = MeshColorTarget::for_mesh(&mesh).unwrap();
        mesh.write().unwrap().replace_geometry(5);

        let result = target.fill(VertexColor::WHITE);

        assert!(matches!(
            result,
            Err(LightingError::Consistency { buffer_len: 3, vertex_count: 5, .. })
        ));
        assert!(mesh.read().unwrap().colors().iter().all(|c| *c == VertexColor::BLACK));
        assert_eq!(target.colors(), &[VertexColor::WHITE; 3]);
    }

    #[test]
    fn test_dropped_mesh_only_updates_cache() {
        let mesh = VertexMesh::new("cape", 2).shared();
        let mut target = MeshColorTarget::for_mesh(&mesh).unwrap();
        drop(mesh);

        target.fill(VertexColor::splat(7)).unwrap();
        assert_eq!(target.colors(), &[VertexColor::splat(7); 2]);
    }
}
