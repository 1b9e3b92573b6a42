//! Placement of orbit rings.
//!
//! A ring is one shared unit circle in the XZ plane, drawn through a per-body model matrix:
//! translate to the parent, tilt about Z by the accumulated solar tilt, scale by the orbit
//! radius. This mirrors how `orbital_position` places the body, so the body always sits on its ring.

use super::body::BodyId;
use super::hierarchy::OrbitHierarchy;
use super::math::Vec3;
use nalgebra::{Matrix4, Point3};
use std::f32::consts::{PI, TAU};

/// Unit circle polyline, generated once and reused for every ring.
#[derive(Clone, Debug)]
pub struct UnitCircle {
    points: Vec<Vec3>,
}

impl UnitCircle {
    pub fn new(segments: usize) -> Self {
        let segments = segments.max(3);
        let points = (0..segments)
            .map(|i| {
                let theta = -PI + TAU * i as f32 / segments as f32;
                Vec3::new(theta.cos(), 0.0, theta.sin())
            })
            .collect();
        UnitCircle { points }
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Flattened `x, y, z` triples, ready for a vertex buffer.
    pub fn vertices(&self) -> Vec<f32> {
        self.points.iter().flat_map(|p| [p.x, p.y, p.z]).collect()
    }
}

/// Model matrix for the orbit ring of `id`, or `None` for bodies without a parent.
///
/// The parent comes from the cached ancestor chain rather than a fresh walk.
pub fn orbit_ring_transform(hierarchy: &OrbitHierarchy, id: BodyId) -> Option<Matrix4<f32>> {
    let parent = *hierarchy.ancestors(id).first()?;
    let body = hierarchy.get(id)?;
    let parent_position = hierarchy.get(parent)?.position();

    Some(
        Matrix4::new_translation(&parent_position)
            * Matrix4::from_axis_angle(&Vec3::z_axis(), body.global_solar_tilt().to_radians())
            * Matrix4::new_nonuniform_scaling(&Vec3::repeat(body.parent_distance())),
    )
}

/// Maps a unit-circle point at `theta` through a ring transform.
pub fn ring_point(transform: &Matrix4<f32>, theta: f32) -> Vec3 {
    transform
        .transform_point(&Point3::new(theta.cos(), 0.0, theta.sin()))
        .coords
}
