use std::f32::consts::{PI, TAU};
use std::fmt;

use bytemuck::NoUninit;
use glam::Vec3;
use wgpu::util::DeviceExt;

/// Smallest radius we will build a sphere for. Anything below is clamped up
/// rather than rejected: a speck on screen beats a startup failure.
pub const MIN_RADIUS: f32 = 1e-4;

/// Hard ceiling imposed by the 16-bit index format.
pub const MAX_VERTEX_COUNT: usize = u16::MAX as usize;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, NoUninit)]
pub struct Vertex {
    pub pos: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Construction-time mesh parameter errors. None of these are recoverable;
/// the caller aborts startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshError {
    TooFewStacks(u32),
    TooFewSlices(u32),
    TooManyVertices(usize),
}

impl fmt::Display for MeshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshError::TooFewStacks(n) => {
                write!(f, "invalid parameter: {n} stacks, need at least 2")
            }
            MeshError::TooFewSlices(n) => {
                write!(f, "invalid parameter: {n} slices, need at least 3")
            }
            MeshError::TooManyVertices(n) => {
                write!(f, "invalid parameter: {n} vertices exceed the 16-bit index range")
            }
        }
    }
}

impl std::error::Error for MeshError {}

#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
}

pub struct MeshBuffer {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl Mesh {
    pub fn triangle_count(&self) -> u32 {
        (self.indices.len() / 3) as u32
    }

    pub fn upload(&self, device: &wgpu::Device) -> MeshBuffer {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("sphere_vertex_buffer"),
            contents: bytemuck::cast_slice(&self.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("sphere_index_buffer"),
            contents: bytemuck::cast_slice(&self.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        MeshBuffer {
            vertex_buffer,
            index_buffer,
            index_count: self.indices.len() as u32,
        }
    }
}

/// Build a UV sphere centered at the origin from the parametrization
/// x = r·sinφ·cosθ, y = r·cosφ, z = r·sinφ·sinθ with φ ∈ [0, π] over
/// `stacks` steps and θ ∈ [0, 2π] over `slices` steps.
///
/// Each latitude ring carries `slices + 1` vertices: the first vertex is
/// repeated at θ = 2π so texture coordinates wrap without pinching. Winding
/// is counter-clockwise seen from outside the sphere.
pub fn build_uv_sphere(radius: f32, stacks: u32, slices: u32) -> Result<Mesh, MeshError> {
    if stacks < 2 {
        return Err(MeshError::TooFewStacks(stacks));
    }
    if slices < 3 {
        return Err(MeshError::TooFewSlices(slices));
    }

    let ring = slices as usize + 1;
    let vertex_count = (stacks as usize + 1) * ring;
    if vertex_count > MAX_VERTEX_COUNT {
        return Err(MeshError::TooManyVertices(vertex_count));
    }

    let radius = radius.max(MIN_RADIUS);

    let mut vertices = Vec::with_capacity(vertex_count);
    for i in 0..=stacks {
        let phi = PI * i as f32 / stacks as f32;
        let (sin_phi, cos_phi) = phi.sin_cos();

        for j in 0..=slices {
            let theta = TAU * j as f32 / slices as f32;
            let (sin_theta, cos_theta) = theta.sin_cos();

            let pos = radius * Vec3::new(sin_phi * cos_theta, cos_phi, sin_phi * sin_theta);
            // Sphere is origin-centered, so the normal is just the position
            // direction. The fallback covers a radius that rounds to zero.
            let normal = pos
                .try_normalize()
                .unwrap_or(Vec3::new(0.0, cos_phi.signum(), 0.0));

            vertices.push(Vertex {
                pos: pos.to_array(),
                normal: normal.to_array(),
                uv: [theta / TAU, phi / PI],
            });
        }
    }

    let mut indices = Vec::with_capacity(stacks as usize * slices as usize * 6);
    for i in 0..stacks {
        let ring_start = (i * (slices + 1)) as u16;
        let next_ring_start = ((i + 1) * (slices + 1)) as u16;

        for j in 0..slices as u16 {
            let a = ring_start + j;
            let b = next_ring_start + j;
            let c = ring_start + j + 1;
            let d = next_ring_start + j + 1;

            indices.extend_from_slice(&[a, c, b, c, d, b]);
        }
    }

    Ok(Mesh { vertices, indices })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn counts_match_parameters() {
        let mesh = build_uv_sphere(0.25, 18, 36).unwrap();
        assert_eq!(mesh.vertices.len(), 19 * 37); // 703
        assert_eq!(mesh.indices.len(), 18 * 36 * 6); // 3888
        assert_eq!(mesh.triangle_count(), 1296);
    }

    #[test]
    fn normals_are_unit_length() {
        let mesh = build_uv_sphere(0.25, 18, 36).unwrap();
        for v in &mesh.vertices {
            let len = Vec3::from_array(v.normal).length();
            assert!((len - 1.0).abs() < 1e-5, "normal length {len}");
        }
    }

    #[test]
    fn uvs_stay_in_unit_square() {
        let mesh = build_uv_sphere(1.0, 8, 12).unwrap();
        for v in &mesh.vertices {
            assert!((0.0..=1.0).contains(&v.uv[0]));
            assert!((0.0..=1.0).contains(&v.uv[1]));
        }
    }

    #[test]
    fn rings_close_with_duplicated_seam_vertex() {
        let slices = 12u32;
        let mesh = build_uv_sphere(1.0, 8, slices).unwrap();
        let ring = slices as usize + 1;
        for i in 0..=8usize {
            let first = &mesh.vertices[i * ring];
            let last = &mesh.vertices[i * ring + slices as usize];
            for k in 0..3 {
                assert!((first.pos[k] - last.pos[k]).abs() < 1e-5);
            }
            // Same point in space, different texture column.
            assert_eq!(first.uv[0], 0.0);
            assert_eq!(last.uv[0], 1.0);
        }
    }

    #[test]
    fn triangles_face_outward() {
        let mesh = build_uv_sphere(1.0, 18, 36).unwrap();
        let mut outward = 0;
        for tri in mesh.indices.chunks_exact(3) {
            let a = Vec3::from_array(mesh.vertices[tri[0] as usize].pos);
            let b = Vec3::from_array(mesh.vertices[tri[1] as usize].pos);
            let c = Vec3::from_array(mesh.vertices[tri[2] as usize].pos);
            let n = (b - a).cross(c - a);
            // Pole quads contribute one zero-area triangle each.
            if n.length_squared() < 1e-12 {
                continue;
            }
            let centroid = (a + b + c) / 3.0;
            assert!(
                n.dot(centroid) > 0.0,
                "inward-wound triangle {tri:?}, normal {n}, centroid {centroid}"
            );
            outward += 1;
        }
        assert!(outward > 0);
    }

    #[test]
    fn generation_is_deterministic() {
        let a = build_uv_sphere(0.25, 18, 36).unwrap();
        let b = build_uv_sphere(0.25, 18, 36).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_too_few_stacks_or_slices() {
        assert_eq!(build_uv_sphere(1.0, 1, 36), Err(MeshError::TooFewStacks(1)));
        assert_eq!(build_uv_sphere(1.0, 18, 2), Err(MeshError::TooFewSlices(2)));
    }

    #[test]
    fn rejects_vertex_counts_beyond_u16() {
        // 256 * 256 = 65536, one past the ceiling.
        assert_eq!(
            build_uv_sphere(1.0, 255, 255),
            Err(MeshError::TooManyVertices(65536))
        );
        // 255 * 256 = 65280 still fits.
        assert!(build_uv_sphere(1.0, 254, 255).is_ok());
    }

    #[test]
    fn tiny_radius_is_clamped_not_rejected() {
        let mesh = build_uv_sphere(0.0, 4, 6).unwrap();
        let equator = &mesh.vertices[2 * 7]; // φ = π/2, θ = 0
        assert!((equator.pos[0] - MIN_RADIUS).abs() < 1e-7);
    }

    proptest! {
        #[test]
        fn prop_counts_and_normals(
            radius in 0.01f32..10.0,
            stacks in 2u32..40,
            slices in 3u32..60,
        ) {
            let mesh = build_uv_sphere(radius, stacks, slices).unwrap();
            prop_assert_eq!(
                mesh.vertices.len(),
                (stacks as usize + 1) * (slices as usize + 1)
            );
            prop_assert_eq!(mesh.indices.len(), stacks as usize * slices as usize * 6);
            for v in &mesh.vertices {
                let len = Vec3::from_array(v.normal).length();
                prop_assert!((len - 1.0).abs() < 1e-4);
            }
        }

        #[test]
        fn prop_indices_in_range(stacks in 2u32..20, slices in 3u32..30) {
            let mesh = build_uv_sphere(1.0, stacks, slices).unwrap();
            let n = mesh.vertices.len() as u16;
            for &i in &mesh.indices {
                prop_assert!(i < n);
            }
        }
    }
}
