//! Primitive geometry and its GPU upload.
//!
//! [`MeshData`] builds the CPU-side vertices and indices for every
//! [`Shape`](crate::Shape); [`GpuMesh`] is the same data living in wgpu
//! buffers. All primitives wind counter-clockwise for front faces.
//!
//! | Attribute | Format    | Offset | Shader Location |
//! |-----------|-----------|--------|-----------------|
//! | position  | Float32x3 | 0      | 0               |
//! | normal    | Float32x3 | 12     | 1               |

use std::f32::consts::{PI, TAU};

use crate::gpu::GpuContext;
use crate::scene::Shape;

/// A vertex with position and normal (24 bytes).
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex3d {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex3d {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex3d>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &Self::ATTRIBUTES,
    };

    pub fn new(position: [f32; 3], normal: [f32; 3]) -> Self {
        Self { position, normal }
    }
}

/// CPU-side triangle mesh.
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex3d>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn for_shape(shape: Shape) -> Self {
        match shape {
            Shape::Cube => Self::cube(),
            Shape::Sphere => Self::sphere(32, 16),
            Shape::Plane => Self::plane(),
            Shape::Torus => Self::torus(1.0, 0.4, 60, 16),
            Shape::Cone => Self::cone(32),
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// 1x1x1 cube with 4 vertices per face for flat normals.
    pub fn cube() -> Self {
        const FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
            // normal, u axis, v axis
            ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
            ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
            ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
            ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ];

        let mut mesh = Self::default();
        for (n, u, v) in FACES {
            let base = mesh.vertices.len() as u32;
            for (su, sv) in [(-0.5, -0.5), (0.5, -0.5), (0.5, 0.5), (-0.5, 0.5)] {
                let p = [
                    n[0] * 0.5 + u[0] * su + v[0] * sv,
                    n[1] * 0.5 + u[1] * su + v[1] * sv,
                    n[2] * 0.5 + u[2] * su + v[2] * sv,
                ];
                mesh.vertices.push(Vertex3d::new(p, n));
            }
            mesh.indices
                .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
        }
        mesh
    }

    /// Unit-radius UV sphere.
    pub fn sphere(segments: u32, rings: u32) -> Self {
        let mut mesh = Self::default();

        for ring in 0..=rings {
            let phi = PI * ring as f32 / rings as f32;
            let (ring_radius, y) = phi.sin_cos();
            for seg in 0..=segments {
                let theta = TAU * seg as f32 / segments as f32;
                let p = [ring_radius * theta.cos(), y, ring_radius * theta.sin()];
                mesh.vertices.push(Vertex3d::new(p, p));
            }
        }

        for ring in 0..rings {
            for seg in 0..segments {
                let current = ring * (segments + 1) + seg;
                let next = current + segments + 1;
                mesh.indices.extend_from_slice(&[
                    current,
                    current + 1,
                    next,
                    current + 1,
                    next + 1,
                    next,
                ]);
            }
        }
        mesh
    }

    /// 1x1 plane on XZ facing +Y.
    pub fn plane() -> Self {
        let n = [0.0, 1.0, 0.0];
        Self {
            vertices: vec![
                Vertex3d::new([-0.5, 0.0, -0.5], n),
                Vertex3d::new([-0.5, 0.0, 0.5], n),
                Vertex3d::new([0.5, 0.0, 0.5], n),
                Vertex3d::new([0.5, 0.0, -0.5], n),
            ],
            indices: vec![0, 1, 2, 2, 3, 0],
        }
    }

    /// Torus in the XY plane around the Z axis.
    pub fn torus(radius: f32, tube: f32, radial: u32, tubular: u32) -> Self {
        let mut mesh = Self::default();

        for i in 0..=radial {
            let u = TAU * i as f32 / radial as f32;
            let center = [radius * u.cos(), radius * u.sin(), 0.0];
            for j in 0..=tubular {
                let v = TAU * j as f32 / tubular as f32;
                let n = [u.cos() * v.cos(), u.sin() * v.cos(), v.sin()];
                let p = [
                    center[0] + tube * n[0],
                    center[1] + tube * n[1],
                    tube * n[2],
                ];
                mesh.vertices.push(Vertex3d::new(p, n));
            }
        }

        for i in 0..radial {
            for j in 0..tubular {
                let a = i * (tubular + 1) + j;
                let b = a + tubular + 1;
                mesh.indices
                    .extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
            }
        }
        mesh
    }

    /// Cone of radius 1 from y = -1 to an apex at y = 1, with a bottom cap.
    pub fn cone(segments: u32) -> Self {
        let mut mesh = Self::default();
        let slope: f32 = 0.5; // radius / height
        let norm = (1.0 + slope * slope).sqrt();

        for seg in 0..=segments {
            let theta = TAU * seg as f32 / segments as f32;
            let (s, c) = theta.sin_cos();
            let n = [c / norm, slope / norm, s / norm];
            mesh.vertices.push(Vertex3d::new([c, -1.0, s], n));
            mesh.vertices.push(Vertex3d::new([0.0, 1.0, 0.0], n));
        }
        for seg in 0..segments {
            let base = seg * 2;
            mesh.indices
                .extend_from_slice(&[base, base + 1, base + 2]);
        }

        let center = mesh.vertices.len() as u32;
        let down = [0.0, -1.0, 0.0];
        mesh.vertices.push(Vertex3d::new([0.0, -1.0, 0.0], down));
        for seg in 0..=segments {
            let theta = TAU * seg as f32 / segments as f32;
            mesh.vertices
                .push(Vertex3d::new([theta.cos(), -1.0, theta.sin()], down));
        }
        for seg in 0..segments {
            let rim = center + 1 + seg;
            mesh.indices.extend_from_slice(&[center, rim, rim + 1]);
        }
        mesh
    }
}

/// Mesh geometry uploaded to GPU buffers.
#[derive(Debug)]
pub struct GpuMesh {
    pub(crate) vertex_buffer: wgpu::Buffer,
    pub(crate) index_buffer: wgpu::Buffer,
    pub(crate) index_count: u32,
}

impl GpuMesh {
    pub fn upload(gpu: &GpuContext, data: &MeshData, label: &str) -> Self {
        use wgpu::util::DeviceExt;

        let vertex_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(&data.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let index_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(&data.indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: data.indices.len() as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    /// Every triangle's geometric normal should agree with its vertex normals.
    fn assert_ccw_outward(mesh: &MeshData) {
        for tri in mesh.indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| mesh.vertices[i as usize]);
            let pa = Vec3::from(a.position);
            let face = (Vec3::from(b.position) - pa).cross(Vec3::from(c.position) - pa);
            if face.length_squared() < 1e-12 {
                continue; // degenerate pole triangle
            }
            let avg = Vec3::from(a.normal) + Vec3::from(b.normal) + Vec3::from(c.normal);
            assert!(face.dot(avg) > 0.0, "inward-facing triangle {tri:?}");
        }
    }

    #[test]
    fn cube_has_flat_faces() {
        let cube = MeshData::cube();
        assert_eq!(cube.vertices.len(), 24);
        assert_eq!(cube.triangle_count(), 12);
        assert_ccw_outward(&cube);
    }

    #[test]
    fn sphere_vertices_lie_on_unit_radius() {
        let sphere = MeshData::sphere(16, 8);
        assert_eq!(sphere.vertices.len(), 17 * 9);
        for v in &sphere.vertices {
            assert!((Vec3::from(v.position).length() - 1.0).abs() < 1e-5);
        }
        assert_ccw_outward(&sphere);
    }

    #[test]
    fn plane_faces_up() {
        assert_ccw_outward(&MeshData::plane());
    }

    #[test]
    fn torus_and_cone_wind_outward() {
        assert_ccw_outward(&MeshData::torus(1.0, 0.4, 24, 8));
        assert_ccw_outward(&MeshData::cone(16));
    }

    #[test]
    fn vertex_stride_matches_layout() {
        assert_eq!(Vertex3d::LAYOUT.array_stride, 24);
    }
}
