use super::body::BodyId;
use super::config::CameraConfig;
use super::hierarchy::OrbitHierarchy;
use super::math::{clamp, look_direction, Vec3};
use nalgebra::{Matrix4, Point3};
use std::f32::consts::FRAC_PI_2;

const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;
const FIELD_OF_VIEW_DEG: f32 = 60.0;
const NEAR_PLANE: f32 = 0.01;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CameraMode {
    FreeFly,
    /// Position slaved to the body; look angles stay under user control.
    Anchored(BodyId),
}

/// Movement keys currently held down.
#[derive(Clone, Copy, Debug, Default)]
pub struct MovementInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub sprint: bool,
}

#[derive(Clone, Debug)]
pub struct Camera {
    position: Vec3,
    look: Vec3,
    up: Vec3,
    horizontal: f32,
    vertical: f32,
    movement_speed: f32,
    sprint_multiplier: f32,
    look_sensitivity: f32,
    anchor_distance: f32,
    render_distance: f32,
    mode: CameraMode,
}

impl Camera {
    pub fn new(config: &CameraConfig) -> Self {
        let [x, y, z] = config.position;
        let horizontal = config.horizontal_angle;
        let vertical = clamp(config.vertical_angle, -PITCH_LIMIT, PITCH_LIMIT);
        Camera {
            position: Vec3::new(x, y, z),
            look: look_direction(horizontal, vertical),
            up: Vec3::y(),
            horizontal,
            vertical,
            movement_speed: config.movement_speed,
            sprint_multiplier: config.sprint_multiplier,
            look_sensitivity: config.look_sensitivity,
            anchor_distance: config.anchor_distance,
            render_distance: config.render_distance,
            mode: CameraMode::FreeFly,
        }
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    pub fn anchor(&self) -> Option<BodyId> {
        match self.mode {
            CameraMode::Anchored(id) => Some(id),
            CameraMode::FreeFly => None,
        }
    }

    pub fn anchor_to(&mut self, id: BodyId) {
        tracing::info!(body = id.0, "camera anchored");
        self.mode = CameraMode::Anchored(id);
    }

    /// Back to free flight, keeping the current position.
    pub fn free_fly(&mut self) {
        if self.mode != CameraMode::FreeFly {
            tracing::info!("camera released to free flight");
        }
        self.mode = CameraMode::FreeFly;
    }

    /// Turns the view by a pointer delta in pixels.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.horizontal -= dx * self.look_sensitivity;
        self.vertical = clamp(
            self.vertical - dy * self.look_sensitivity,
            -PITCH_LIMIT,
            PITCH_LIMIT,
        );
        self.look = look_direction(self.horizontal, self.vertical);
    }

    /// Moves the camera for this frame. Must run after the hierarchy has been advanced.
    pub fn update(&mut self, input: &MovementInput, hierarchy: &OrbitHierarchy) {
        match self.mode {
            CameraMode::FreeFly => self.fly(input),
            CameraMode::Anchored(id) => {
                if let Some(body) = hierarchy.get(id) {
                    self.position =
                        body.position() - self.look * body.radius() * self.anchor_distance;
                }
            }
        }
    }

    fn fly(&mut self, input: &MovementInput) {
        let mut speed = self.movement_speed;
        if input.sprint {
            speed *= self.sprint_multiplier;
        }

        let (sin_h, cos_h) = self.horizontal.sin_cos();
        let strafe = Vec3::new(cos_h, 0.0, -sin_h);

        if input.forward {
            self.position += self.look * speed;
        }
        if input.backward {
            self.position -= self.look * speed;
        }
        if input.left {
            self.position += strafe * speed;
        }
        if input.right {
            self.position -= strafe * speed;
        }
        if input.up {
            self.position.y += speed;
        }
        if input.down {
            self.position.y -= speed;
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn look(&self) -> Vec3 {
        self.look
    }

    pub fn render_distance(&self) -> f32 {
        self.render_distance
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        let eye = Point3::from(self.position);
        Matrix4::look_at_rh(&eye, &(eye + self.look), &self.up)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Matrix4<f32> {
        Matrix4::new_perspective(
            aspect,
            FIELD_OF_VIEW_DEG.to_radians(),
            NEAR_PLANE,
            self.render_distance,
        )
    }
}
