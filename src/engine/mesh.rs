use std::f32::consts::{PI, TAU};

/// Interleaved `position(3) color(3) uv(2)` vertices, 32 bytes each.
pub struct Mesh {
    pub vertices: Vec<f32>,
    pub indices: Vec<u16>,
}

pub const FLOATS_PER_VERTEX: usize = 8;

impl Mesh {
    /// UV sphere of the given radius, white so uniform colors and textures show unmodified.
    pub fn sphere(radius: f32, slices: u16, stacks: u16) -> Self {
        let slices = slices.max(3);
        let stacks = stacks.max(2);
        let mut vertices = Vec::with_capacity((slices as usize + 1) * (stacks as usize + 1) * FLOATS_PER_VERTEX);
        let mut indices = Vec::with_capacity(slices as usize * stacks as usize * 6);

        for stack in 0..=stacks {
            let v = stack as f32 / stacks as f32;
            let (sin_phi, cos_phi) = (v * PI).sin_cos();

            for slice in 0..=slices {
                let u = slice as f32 / slices as f32;
                let (sin_theta, cos_theta) = (u * TAU).sin_cos();

                vertices.extend_from_slice(&[
                    radius * sin_phi * cos_theta,
                    radius * cos_phi,
                    radius * sin_phi * sin_theta,
                    1.0, 1.0, 1.0,
                    1.0 - u, v,
                ]);
            }
        }

        let row = slices + 1;
        for stack in 0..stacks {
            for slice in 0..slices {
                let a = stack * row + slice;
                let b = a + row;
                indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
            }
        }

        Mesh { vertices, indices }
    }
}
