//! GLB model loading: fetch bytes from a URL or file, parse with `gltf`.

use anyhow::{Context, Result};
use glam::{Mat4, Vec3};
use std::path::PathBuf;
use tracing::info;

use crate::mesh::{MeshData, MeshVertex};

/// Default model fetched when no source is configured.
pub const DEFAULT_MODEL_URL: &str = "https://modelviewer.dev/shared-assets/models/Astronaut.glb";

/// Where the model bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    /// Fetch over HTTP(S).
    Url(String),
    /// Read from the local filesystem.
    Path(PathBuf),
}

impl ModelSource {
    /// Interpret a CLI/config string as a URL or a local path.
    pub fn parse(raw: &str) -> Self {
        if raw.starts_with("http://") || raw.starts_with("https://") {
            ModelSource::Url(raw.to_string())
        } else {
            ModelSource::Path(PathBuf::from(raw))
        }
    }
}

impl Default for ModelSource {
    fn default() -> Self {
        ModelSource::Url(DEFAULT_MODEL_URL.to_string())
    }
}

impl std::fmt::Display for ModelSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelSource::Url(url) => write!(f, "{url}"),
            ModelSource::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Fetch the raw asset bytes from the configured source.
fn fetch_bytes(source: &ModelSource) -> Result<Vec<u8>> {
    match source {
        ModelSource::Url(url) => {
            let client = reqwest::blocking::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .context("Failed to build HTTP client")?;
            let response = client
                .get(url)
                .send()
                .with_context(|| format!("Failed to fetch model from {url}"))?
                .error_for_status()
                .with_context(|| format!("Server rejected model request for {url}"))?;
            let bytes = response
                .bytes()
                .with_context(|| format!("Failed to read model body from {url}"))?;
            Ok(bytes.to_vec())
        }
        ModelSource::Path(path) => std::fs::read(path)
            .with_context(|| format!("Failed to read model file {}", path.display())),
    }
}

/// Load a GLB model into mesh data ready for GPU upload.
///
/// Every mesh primitive of the default scene is flattened into world space
/// using its node transform, so the renderer can draw them with a single
/// identity model matrix.
pub fn load_model(source: &ModelSource) -> Result<Vec<MeshData>> {
    let bytes = fetch_bytes(source)?;
    let meshes = parse_glb(&bytes)?;

    let (vertices, triangles) = meshes.iter().fold((0, 0), |(v, t), mesh| {
        (v + mesh.vertices.len(), t + mesh.indices.len() / 3)
    });
    info!(
        %source,
        primitives = meshes.len(),
        vertices,
        triangles,
        "model loaded"
    );

    Ok(meshes)
}

/// Parse GLB bytes into per-primitive mesh data.
pub fn parse_glb(bytes: &[u8]) -> Result<Vec<MeshData>> {
    let (document, buffers, _images) =
        gltf::import_slice(bytes).context("Failed to parse GLB data")?;

    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .context("GLB contains no scene")?;

    let mut meshes = Vec::new();
    for node in scene.nodes() {
        collect_node_meshes(&node, Mat4::IDENTITY, &buffers, &mut meshes)?;
    }

    if meshes.is_empty() {
        anyhow::bail!("GLB scene contains no mesh primitives");
    }

    Ok(meshes)
}

fn collect_node_meshes(
    node: &gltf::Node,
    parent_transform: Mat4,
    buffers: &[gltf::buffer::Data],
    meshes: &mut Vec<MeshData>,
) -> Result<()> {
    let transform = parent_transform * Mat4::from_cols_array_2d(&node.transform().matrix());

    if let Some(mesh) = node.mesh() {
        let normal_matrix = transform.inverse().transpose();

        for primitive in mesh.primitives() {
            let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

            let positions: Vec<[f32; 3]> = reader
                .read_positions()
                .context("Mesh primitive has no positions")?
                .collect();

            let normals: Vec<[f32; 3]> = reader
                .read_normals()
                .map(|normals| normals.collect())
                .unwrap_or_else(|| vec![[0.0, 1.0, 0.0]; positions.len()]);

            let indices: Vec<u32> = match reader.read_indices() {
                Some(indices) => indices.into_u32().collect(),
                // Unindexed primitive: every three vertices form a triangle
                None => (0..positions.len() as u32).collect(),
            };

            let vertices = positions
                .iter()
                .zip(normals.iter())
                .map(|(position, normal)| MeshVertex {
                    position: transform
                        .transform_point3(Vec3::from_array(*position))
                        .to_array(),
                    normal: normal_matrix
                        .transform_vector3(Vec3::from_array(*normal))
                        .normalize_or_zero()
                        .to_array(),
                })
                .collect();

            let base_color = primitive
                .material()
                .pbr_metallic_roughness()
                .base_color_factor();

            meshes.push(MeshData {
                vertices,
                indices,
                base_color,
            });
        }
    }

    for child in node.children() {
        collect_node_meshes(&child, transform, buffers, meshes)?;
    }

    Ok(())
}
