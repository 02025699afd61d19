//! CPU mesh data, GPU upload, and the procedural marker sphere.

use glam::Vec3;
use wgpu::util::DeviceExt;

/// Vertex format shared by the model and marker meshes.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    /// Position in model space.
    pub position: [f32; 3],
    /// Unit normal.
    pub normal: [f32; 3],
}

impl MeshVertex {
    /// Vertex buffer layout for the render pipeline.
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
            wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// A triangle mesh on the CPU side, with its material base color.
#[derive(Debug, Clone)]
pub struct MeshData {
    /// Vertex list.
    pub vertices: Vec<MeshVertex>,
    /// Triangle indices into `vertices`.
    pub indices: Vec<u32>,
    /// RGBA base color from the source material.
    pub base_color: [f32; 4],
}

/// GPU-side representation of a mesh.
pub struct GpuMesh {
    /// Vertex buffer on GPU.
    pub vertex_buffer: wgpu::Buffer,
    /// Index buffer on GPU.
    pub index_buffer: wgpu::Buffer,
    /// Number of indices to draw.
    pub index_count: u32,
}

impl GpuMesh {
    /// Upload a mesh to the GPU.
    pub fn from_mesh_data(device: &wgpu::Device, mesh: &MeshData) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Vertex Buffer"),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Index Buffer"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
        }
    }
}

/// Generate a UV sphere centered at the origin.
///
/// `sectors` is the number of longitudinal slices, `stacks` the number of
/// latitudinal rings. Used for the marker spheres.
pub fn uv_sphere(radius: f32, sectors: u32, stacks: u32, base_color: [f32; 4]) -> MeshData {
    let mut vertices = Vec::with_capacity(((stacks + 1) * (sectors + 1)) as usize);
    let mut indices = Vec::with_capacity((stacks * sectors * 6) as usize);

    for stack in 0..=stacks {
        // Latitude from +pi/2 (top) down to -pi/2
        let phi = std::f32::consts::FRAC_PI_2 - std::f32::consts::PI * stack as f32 / stacks as f32;
        let (phi_sin, phi_cos) = phi.sin_cos();

        for sector in 0..=sectors {
            let theta = 2.0 * std::f32::consts::PI * sector as f32 / sectors as f32;
            let (theta_sin, theta_cos) = theta.sin_cos();

            let normal = Vec3::new(phi_cos * theta_cos, phi_sin, phi_cos * theta_sin);
            vertices.push(MeshVertex {
                position: (normal * radius).to_array(),
                normal: normal.to_array(),
            });
        }
    }

    for stack in 0..stacks {
        for sector in 0..sectors {
            let row = stack * (sectors + 1);
            let next_row = (stack + 1) * (sectors + 1);

            // Two triangles per quad; degenerate at the poles but harmless
            indices.push(row + sector);
            indices.push(next_row + sector);
            indices.push(row + sector + 1);

            indices.push(row + sector + 1);
            indices.push(next_row + sector);
            indices.push(next_row + sector + 1);
        }
    }

    MeshData {
        vertices,
        indices,
        base_color,
    }
}
