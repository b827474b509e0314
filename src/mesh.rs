//! Cube geometry and spatial transforms for the city renderer.
//!
//! [`Geometry`] is the CPU-side mesh value: flat vertex data plus triangle
//! indices, built once at startup and fully inspectable without a GPU.
//! [`Mesh`] is the result of the one-time buffer upload; it is immutable
//! afterwards and shared by every draw call. [`Transform`] places instances
//! of the shared mesh in the world.
//!
//! # Vertex Layout
//!
//! [`Vertex`] occupies 36 bytes per vertex:
//!
//! | Attribute | Format    | Offset | Shader Location |
//! |-----------|-----------|--------|-----------------|
//! | position  | Float32x3 | 0      | 0               |
//! | normal    | Float32x3 | 12     | 1               |
//! | color     | Float32x3 | 24     | 2               |

use glam::{Mat4, Vec3};

use crate::gpu::GpuContext;

/// Solid face colors for [`Geometry::cube`]: red, green, blue, yellow,
/// magenta, cyan. Cycles if a primitive ever has more than six faces.
pub const FACE_PALETTE: [[f32; 3]; 6] = [
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
    [1.0, 1.0, 0.0],
    [1.0, 0.0, 1.0],
    [0.0, 1.0, 1.0],
];

/// A vertex with position, flat face normal, and face color.
///
/// `#[repr(C)]` plus [`bytemuck::Pod`] so vertex slices cast directly into
/// GPU buffer contents.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Position in model space.
    pub position: [f32; 3],
    /// Face normal (unit length).
    pub normal: [f32; 3],
    /// Linear RGB face color.
    pub color: [f32; 3],
}

impl Vertex {
    /// Vertex buffer layout matching the pipeline in `scene_pass`.
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            // position
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            // normal
            wgpu::VertexAttribute {
                offset: 12,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x3,
            },
            // color
            wgpu::VertexAttribute {
                offset: 24,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32x3,
            },
        ],
    };

    pub fn new(position: [f32; 3], normal: [f32; 3], color: [f32; 3]) -> Self {
        Self {
            position,
            normal,
            color,
        }
    }
}

/// Unit-cube faces as (outward normal, corners in CCW winding viewed from
/// outside). Corner coordinates are half-extents of ±1, scaled at build time.
#[rustfmt::skip]
const CUBE_FACES: [([f32; 3], [[f32; 3]; 4]); 6] = [
    // Front (Z+)
    ([ 0.0,  0.0,  1.0], [[-1.0, -1.0,  1.0], [ 1.0, -1.0,  1.0], [ 1.0,  1.0,  1.0], [-1.0,  1.0,  1.0]]),
    // Back (Z-)
    ([ 0.0,  0.0, -1.0], [[ 1.0, -1.0, -1.0], [-1.0, -1.0, -1.0], [-1.0,  1.0, -1.0], [ 1.0,  1.0, -1.0]]),
    // Top (Y+)
    ([ 0.0,  1.0,  0.0], [[-1.0,  1.0,  1.0], [ 1.0,  1.0,  1.0], [ 1.0,  1.0, -1.0], [-1.0,  1.0, -1.0]]),
    // Bottom (Y-)
    ([ 0.0, -1.0,  0.0], [[-1.0, -1.0, -1.0], [ 1.0, -1.0, -1.0], [ 1.0, -1.0,  1.0], [-1.0, -1.0,  1.0]]),
    // Right (X+)
    ([ 1.0,  0.0,  0.0], [[ 1.0, -1.0,  1.0], [ 1.0, -1.0, -1.0], [ 1.0,  1.0, -1.0], [ 1.0,  1.0,  1.0]]),
    // Left (X-)
    ([-1.0,  0.0,  0.0], [[-1.0, -1.0, -1.0], [-1.0, -1.0,  1.0], [-1.0,  1.0,  1.0], [-1.0,  1.0, -1.0]]),
];

/// CPU-side mesh data: vertices plus triangle indices.
///
/// Immutable once built. Per-vertex position/normal/color counts are equal by
/// construction of [`Vertex`], and every index references an existing vertex.
#[derive(Clone, Debug, PartialEq)]
pub struct Geometry {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Geometry {
    /// Builds an axis-aligned cube with the given edge length, centered at
    /// the origin.
    ///
    /// Each face gets its own four vertices so it keeps a flat normal and one
    /// solid color from [`FACE_PALETTE`]: 24 vertices and 36 indices total,
    /// wound counter-clockwise for back-face culling. Deterministic: equal
    /// `size` yields bit-identical geometry.
    pub fn cube(size: f32) -> Self {
        let h = size * 0.5;
        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);

        for (face, (normal, corners)) in CUBE_FACES.iter().enumerate() {
            let base = vertices.len() as u32;
            let color = FACE_PALETTE[face % FACE_PALETTE.len()];
            for corner in corners {
                vertices.push(Vertex::new(
                    [corner[0] * h, corner[1] * h, corner[2] * h],
                    *normal,
                    color,
                ));
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
        }

        Self { vertices, indices }
    }

    /// Uploads this geometry to the GPU. The one-time side effect per mesh;
    /// nothing here is touched again after creation.
    pub fn upload(&self, gpu: &GpuContext) -> Mesh {
        Mesh::new(gpu, &self.vertices, &self.indices)
    }
}

/// GPU-resident mesh geometry with vertex and index buffers.
///
/// Immutable after creation and safely referenced by every frame.
#[derive(Debug)]
pub struct Mesh {
    pub(crate) vertex_buffer: wgpu::Buffer,
    pub(crate) index_buffer: wgpu::Buffer,
    pub(crate) index_count: u32,
}

impl Mesh {
    /// Creates a mesh from raw vertex and index data, uploading both buffers.
    pub fn new(gpu: &GpuContext, vertices: &[Vertex], indices: &[u32]) -> Self {
        use wgpu::util::DeviceExt;

        let vertex_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Vertex Buffer"),
                contents: bytemuck::cast_slice(vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let index_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Index Buffer"),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
        }
    }
}

/// Translation plus non-uniform scale, producing a model matrix on demand.
///
/// The layout has no rotating objects, so this stays a two-component value
/// type. Composition order is translate-then-scale: the matrix scales model
/// coordinates around the object's origin, then moves it to `position`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Identity transform: origin position, unit scale.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// The model matrix: `translate(position) * scale(scale)`.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position) * Mat4::from_scale(self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_has_24_vertices_and_36_indices() {
        let cube = Geometry::cube(1.0);
        assert_eq!(cube.vertices.len(), 24);
        assert_eq!(cube.indices.len(), 36);
    }

    #[test]
    fn cube_indices_are_in_bounds() {
        let cube = Geometry::cube(2.5);
        let count = cube.vertices.len() as u32;
        assert!(cube.indices.iter().all(|&i| i < count));
    }

    #[test]
    fn cube_has_six_distinct_face_colors() {
        let cube = Geometry::cube(1.0);
        let mut colors: Vec<[f32; 3]> = cube.vertices.iter().map(|v| v.color).collect();
        colors.dedup();
        assert_eq!(colors.len(), 6);
        // All four vertices of a face share its color
        for face in cube.vertices.chunks(4) {
            assert!(face.iter().all(|v| v.color == face[0].color));
        }
    }

    #[test]
    fn cube_normals_are_unit_length() {
        let cube = Geometry::cube(3.0);
        for v in &cube.vertices {
            let n = Vec3::from(v.normal);
            assert!((n.length() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn cube_is_deterministic() {
        assert_eq!(Geometry::cube(1.0), Geometry::cube(1.0));
        assert_eq!(Geometry::cube(0.25), Geometry::cube(0.25));
    }

    #[test]
    fn cube_spans_half_extent() {
        let cube = Geometry::cube(4.0);
        for v in &cube.vertices {
            assert!(v.position.iter().all(|c| c.abs() == 2.0));
        }
    }

    #[test]
    fn transform_scales_then_translates() {
        let t = Transform::from_position(Vec3::new(1.0, 2.0, 3.0)).scale(Vec3::splat(2.0));
        let p = t.matrix().transform_point3(Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(p, Vec3::new(3.0, 2.0, 3.0));
    }

    #[test]
    fn default_transform_is_identity() {
        assert_eq!(Transform::new().matrix(), Mat4::IDENTITY);
    }
}
