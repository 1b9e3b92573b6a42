use super::clock::TickContext;
use super::math::{advance_phase, angular_velocity, au_to_world, Vec3};
use std::f32::consts::PI;

/// Index of a body inside its `OrbitHierarchy`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub usize);

/// Opaque handle handed out by a `TextureLoader`. The core never looks inside it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub usize);

pub type Rgb = [u8; 3];

const WHITE: Rgb = [0xFF, 0xFF, 0xFF];

/// Construction parameters, in the units of the description (AU, days, degrees).
#[derive(Clone, Debug, PartialEq)]
pub struct BodyParams {
    pub name: String,
    pub radius_au: f32,
    pub orbital_period_days: f32,
    pub parent_distance_au: f32,
    pub solar_tilt_deg: f32,
    pub self_rotation_period_days: f32,
}

/// One star, planet or moon.
///
/// `position` is derived: it is recomputed from the orbital phase, the orbit radius, the
/// accumulated tilt and the parent position on construction and on every `advance`.
#[derive(Clone, Debug)]
pub struct CelestialBody {
    name: String,
    parent: Option<BodyId>,
    position: Vec3,
    radius: f32,
    orbital_period: f32,
    angular_velocity: f32,
    parametric_angle: f32,
    parent_distance: f32,
    solar_tilt: f32,
    global_solar_tilt: f32,
    cos_tilt: f32,
    sin_tilt: f32,
    self_angular_velocity: f32,
    self_parametric_angle: f32,
    color: Rgb,
    declared_color: Rgb,
    texture: Option<TextureHandle>,
}

impl CelestialBody {
    /// `parent` pairs the parent's id with the parent itself so the accumulated tilt and the
    /// starting position can be resolved right away.
    pub fn new(
        params: BodyParams,
        world_scale: f32,
        parent: Option<(BodyId, &CelestialBody)>,
        texture: Option<TextureHandle>,
    ) -> Self {
        let parent_tilt = parent.map_or(0.0, |(_, p)| p.global_solar_tilt);
        let global_solar_tilt = params.solar_tilt_deg + parent_tilt;
        let (sin_tilt, cos_tilt) = global_solar_tilt.to_radians().sin_cos();

        let mut body = CelestialBody {
            name: params.name,
            parent: parent.map(|(id, _)| id),
            position: Vec3::zeros(),
            radius: au_to_world(params.radius_au, world_scale),
            orbital_period: params.orbital_period_days,
            angular_velocity: angular_velocity(params.orbital_period_days),
            parametric_angle: -PI,
            parent_distance: au_to_world(params.parent_distance_au, world_scale),
            solar_tilt: params.solar_tilt_deg,
            global_solar_tilt,
            cos_tilt,
            sin_tilt,
            self_angular_velocity: angular_velocity(params.self_rotation_period_days),
            self_parametric_angle: -PI,
            color: WHITE,
            declared_color: WHITE,
            texture,
        };
        body.position = body.resolve_position(parent.map(|(_, p)| p.position));
        body
    }

    /// Sets the tint. Textured bodies stay white so the texture is not color-multiplied, but
    /// remember the declared color in case the texture never arrives.
    pub fn colorize(&mut self, r: u8, g: u8, b: u8) -> &mut Self {
        self.declared_color = [r, g, b];
        if self.texture.is_none() {
            self.color = [r, g, b];
        }
        self
    }

    /// Moves both phases forward by one tick and re-resolves `position`.
    ///
    /// `parent_position` must already reflect this tick.
    pub fn advance(&mut self, ctx: &TickContext, parent_position: Option<Vec3>) {
        let step = ctx.speed_factor * ctx.elapsed_hours;

        self.parametric_angle =
            advance_phase(self.parametric_angle, step * self.angular_velocity);
        self.self_parametric_angle =
            advance_phase(self.self_parametric_angle, step * self.self_angular_velocity);

        self.position = self.resolve_position(parent_position);
    }

    fn resolve_position(&self, parent_position: Option<Vec3>) -> Vec3 {
        orbital_position(
            self.parametric_angle,
            self.parent_distance,
            self.cos_tilt,
            self.sin_tilt,
            parent_position,
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<BodyId> {
        self.parent
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn orbital_period(&self) -> f32 {
        self.orbital_period
    }

    pub fn angular_velocity(&self) -> f32 {
        self.angular_velocity
    }

    pub fn parametric_angle(&self) -> f32 {
        self.parametric_angle
    }

    pub fn parent_distance(&self) -> f32 {
        self.parent_distance
    }

    pub fn solar_tilt(&self) -> f32 {
        self.solar_tilt
    }

    /// Orbital-plane tilt relative to the world frame, in degrees.
    pub fn global_solar_tilt(&self) -> f32 {
        self.global_solar_tilt
    }

    pub fn self_angular_velocity(&self) -> f32 {
        self.self_angular_velocity
    }

    pub fn self_parametric_angle(&self) -> f32 {
        self.self_parametric_angle
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    /// Color from the description, whether or not a texture overrides it.
    pub fn declared_color(&self) -> Rgb {
        self.declared_color
    }

    pub fn has_texture(&self) -> bool {
        self.texture.is_some()
    }

    pub fn texture(&self) -> Option<TextureHandle> {
        self.texture
    }
}

/// World position of a point on a tilted circular orbit.
///
/// The orbit is laid out in the local XZ plane, tilted about Z, then offset by the parent.
pub fn orbital_position(
    parametric_angle: f32,
    parent_distance: f32,
    cos_tilt: f32,
    sin_tilt: f32,
    parent_position: Option<Vec3>,
) -> Vec3 {
    let (sin_ang, cos_ang) = parametric_angle.sin_cos();
    let local_x = cos_ang * parent_distance;
    let local_z = sin_ang * parent_distance;

    let position = Vec3::new(local_x * cos_tilt, local_x * sin_tilt, local_z);
    match parent_position {
        Some(parent) => position + parent,
        None => position,
    }
}
