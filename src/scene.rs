//! Scene lifecycle: the model loads first, markers exist only afterwards.

use anyhow::Result;
use glam::Vec3;
use tracing::error;

use crate::asset::ModelSource;
use crate::mesh::MeshData;
use crate::picking::Marker;

/// Contents of a successfully loaded scene.
#[derive(Debug, Clone)]
pub struct SceneModel {
    /// Flattened model meshes in world space.
    pub meshes: Vec<MeshData>,
    /// Annotation markers, in registration order.
    pub markers: Vec<Marker>,
}

/// Outcome of the one-shot model load at startup.
///
/// Markers are registered only when the load succeeds; a failed load leaves
/// the viewer running with an empty scene.
#[derive(Debug, Clone)]
pub enum SceneState {
    /// Model and markers are ready.
    Ready(SceneModel),
    /// Load failed; the diagnostic has been logged.
    Failed,
}

impl SceneState {
    /// Resolve a load result into the next state.
    pub fn from_load_result(source: &ModelSource, result: Result<Vec<MeshData>>) -> Self {
        match result {
            Ok(meshes) => SceneState::Ready(SceneModel {
                meshes,
                markers: default_markers(),
            }),
            Err(err) => {
                error!(%source, error = %format!("{err:#}"), "failed to load model");
                SceneState::Failed
            }
        }
    }

    /// Markers to pick against; empty unless the scene is ready.
    pub fn markers(&self) -> &[Marker] {
        match self {
            SceneState::Ready(model) => &model.markers,
            SceneState::Failed => &[],
        }
    }

    /// Whether the model finished loading.
    pub fn is_ready(&self) -> bool {
        matches!(self, SceneState::Ready(_))
    }
}

/// The fixed marker set, registered when the model loads.
pub fn default_markers() -> Vec<Marker> {
    vec![
        Marker::new(Vec3::new(0.0, 1.8, 0.4), "Casque de l'astronaute"),
        Marker::new(Vec3::new(0.0, 1.0, 0.3), "Torse de l'astronaute"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::uv_sphere;

    #[test]
    fn test_successful_load_registers_markers() {
        let source = ModelSource::default();
        let meshes = vec![uv_sphere(1.0, 8, 6, [1.0; 4])];
        let state = SceneState::from_load_result(&source, Ok(meshes));

        assert!(state.is_ready());
        let markers = state.markers();
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].label, "Casque de l'astronaute");
        assert_eq!(markers[0].position, Vec3::new(0.0, 1.8, 0.4));
    }

    #[test]
    fn test_failed_load_has_no_markers() {
        let source = ModelSource::default();
        let state = SceneState::from_load_result(&source, Err(anyhow::anyhow!("network error")));

        assert!(!state.is_ready());
        assert!(state.markers().is_empty());
    }
}
