use super::body::{CelestialBody, Rgb, TextureHandle};
use super::math::Vec3;
use super::trajectory::orbit_ring_transform;
use super::Orrery;
use crate::engine::renderer::Renderer;
use crate::engine::textures::TextureBank;
use nalgebra::Matrix4;

const BACKGROUND: (f32, f32, f32) = (0.0196, 0.0294, 0.0804);
const RING_ALPHA: f32 = 0.15;

impl Orrery {
    /// Draws stars, bodies and (optionally) orbit rings. Reads the scene, never mutates it.
    pub fn render(&self, renderer: &Renderer, textures: &TextureBank, width: i32, height: i32) {
        renderer.clear(BACKGROUND.0, BACKGROUND.1, BACKGROUND.2);
        renderer.resize(width, height);
        renderer.enable_depth_test();

        let aspect = width as f32 / height.max(1) as f32;
        let projection = self.camera.projection_matrix(aspect);
        let view = self.camera.view_matrix();

        let star_scale = Matrix4::new_nonuniform_scaling(&Vec3::repeat(self.stars.size()));
        for star in self.stars.positions_around(self.camera.position()) {
            let model = Matrix4::new_translation(&star) * star_scale;
            renderer.draw_sphere(&model, (1.0, 1.0, 1.0), None, &projection, &view);
        }

        for (_, body) in self.hierarchy.iter() {
            let (handle, color) = surface(body, |handle| textures.failed(handle));
            renderer.draw_sphere(
                &body_model(body),
                unit_color(color),
                handle.and_then(|handle| textures.get(handle)),
                &projection,
                &view,
            );
        }

        if self.show_trajectories {
            renderer.enable_blend();
            for (id, body) in self.hierarchy.iter() {
                if let Some(transform) = orbit_ring_transform(&self.hierarchy, id) {
                    renderer.draw_ring(&transform, unit_color(body.declared_color()), RING_ALPHA, &projection, &view);
                }
            }
            renderer.disable_blend();
        }
    }
}

/// Places a unit sphere at the body: tilted with its orbital plane and spun by its day phase.
pub fn body_model(body: &CelestialBody) -> Matrix4<f32> {
    Matrix4::new_translation(&body.position())
        * Matrix4::from_axis_angle(&Vec3::z_axis(), body.global_solar_tilt().to_radians())
        * Matrix4::from_axis_angle(&Vec3::y_axis(), body.self_parametric_angle())
        * Matrix4::new_nonuniform_scaling(&Vec3::repeat(body.radius()))
}

/// Texture and tint to draw a body with. A body whose texture failed to load goes back to its
/// declared color.
pub fn surface(
    body: &CelestialBody,
    texture_failed: impl Fn(TextureHandle) -> bool,
) -> (Option<TextureHandle>, Rgb) {
    match body.texture() {
        Some(handle) if !texture_failed(handle) => (Some(handle), body.color()),
        Some(_) => (None, body.declared_color()),
        None => (None, body.color()),
    }
}

fn unit_color([r, g, b]: Rgb) -> (f32, f32, f32) {
    (r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orrery::body::BodyParams;
    use nalgebra::Point3;

    #[test]
    fn body_model_centres_and_scales_the_sphere() {
        let body = CelestialBody::new(
            BodyParams {
                name: "Earth".to_string(),
                radius_au: 0.01,
                orbital_period_days: 365.0,
                parent_distance_au: 1.0,
                solar_tilt_deg: 23.0,
                self_rotation_period_days: 1.0,
            },
            200.0,
            None,
            None,
        );
        let model = body_model(&body);
        let centre = model.transform_point(&Point3::origin()).coords;
        assert!((centre - body.position()).norm() < 1e-4);

        let surface = model.transform_point(&Point3::new(1.0, 0.0, 0.0)).coords;
        assert!(((surface - centre).norm() - body.radius()).abs() < 1e-4);
    }

    fn earth(texture: Option<TextureHandle>) -> CelestialBody {
        let mut body = CelestialBody::new(
            BodyParams {
                name: "Earth".to_string(),
                radius_au: 0.01,
                orbital_period_days: 365.0,
                parent_distance_au: 1.0,
                solar_tilt_deg: 0.0,
                self_rotation_period_days: 1.0,
            },
            200.0,
            None,
            texture,
        );
        body.colorize(0, 0, 255);
        body
    }

    #[test]
    fn failed_texture_falls_back_to_declared_color() {
        let body = earth(Some(TextureHandle(0)));
        assert_eq!(surface(&body, |_| false), (Some(TextureHandle(0)), [255, 255, 255]));
        assert_eq!(surface(&body, |_| true), (None, [0, 0, 255]));
    }

    #[test]
    fn untextured_body_keeps_its_color() {
        let body = earth(None);
        assert_eq!(surface(&body, |_| true), (None, [0, 0, 255]));
    }

    #[test]
    fn colors_map_to_unit_range() {
        assert_eq!(unit_color([255, 0, 51]), (1.0, 0.0, 0.2));
    }
}
