pub mod body;
pub mod camera;
pub mod clock;
pub mod config;
pub mod description;
pub mod error;
pub mod hierarchy;
pub mod math;
pub mod menu;
pub mod render;
pub mod stars;
pub mod trajectory;

pub use body::{BodyId, BodyParams, CelestialBody, Rgb, TextureHandle};
pub use camera::{Camera, CameraMode, MovementInput};
pub use clock::{FrameClock, SimulationControls, TickContext};
pub use config::{CameraConfig, OrreryConfig};
pub use description::{parse_description, BodyDeclaration};
pub use error::{LoadError, LoadResult, LoadWarning};
pub use hierarchy::{NoTextures, OrbitHierarchy, TextureLoader};
pub use menu::{MenuOption, SelectionMenu};
pub use stars::StarField;
pub use trajectory::{orbit_ring_transform, UnitCircle};

/// The running scene: the hierarchy plus everything that looks at it.
pub struct Orrery {
    hierarchy: OrbitHierarchy,
    camera: Camera,
    controls: SimulationControls,
    clock: FrameClock,
    stars: StarField,
    ring: UnitCircle,
    menu: SelectionMenu,
    input: MovementInput,
    show_trajectories: bool,
    simulated_hours: f64,
    is_dragging: bool,
    last_mouse_pos: (i32, i32),
}

impl Orrery {
    pub fn new(config: &OrreryConfig, hierarchy: OrbitHierarchy) -> Self {
        let camera = Camera::new(&config.camera);
        let stars = StarField::generate(
            config.star_count,
            camera.render_distance(),
            config.star_seed,
        );
        let menu = SelectionMenu::new(&hierarchy);

        Orrery {
            hierarchy,
            camera,
            controls: SimulationControls::new(
                config.speed_factor,
                config.speed_step,
                config.hours_per_second,
            ),
            clock: FrameClock::new(config.fps_cap),
            stars,
            ring: UnitCircle::new(config.ring_segments),
            menu,
            input: MovementInput::default(),
            show_trajectories: config.show_trajectories,
            simulated_hours: 0.0,
            is_dragging: false,
            last_mouse_pos: (0, 0),
        }
    }

    /// Runs one update pass if the frame cap allows it. Returns whether anything moved.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        let Some(elapsed_ms) = self.clock.poll(now_ms) else {
            return false;
        };
        let ctx = self.controls.tick_context(elapsed_ms);
        self.simulated_hours += (ctx.speed_factor * ctx.elapsed_hours) as f64;

        self.hierarchy.advance(&ctx);
        self.camera.update(&self.input, &self.hierarchy);
        true
    }

    pub fn hierarchy(&self) -> &OrbitHierarchy {
        &self.hierarchy
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn controls(&self) -> &SimulationControls {
        &self.controls
    }

    pub fn controls_mut(&mut self) -> &mut SimulationControls {
        &mut self.controls
    }

    pub fn menu(&self) -> &SelectionMenu {
        &self.menu
    }

    pub fn stars(&self) -> &StarField {
        &self.stars
    }

    pub fn ring(&self) -> &UnitCircle {
        &self.ring
    }

    pub fn show_trajectories(&self) -> bool {
        self.show_trajectories
    }

    pub fn toggle_trajectories(&mut self) {
        self.show_trajectories = !self.show_trajectories;
    }

    pub fn simulated_days(&self) -> f64 {
        self.simulated_hours / 24.0
    }

    /// Anchors the camera to the named body, as if picked from the menu.
    pub fn anchor_camera(&mut self, name: &str) -> bool {
        if self.hierarchy.find(name).is_none() || !self.menu.highlight(name) {
            return false;
        }
        self.menu.confirm(&mut self.camera);
        true
    }

    pub fn free_fly(&mut self) {
        self.menu.highlight(MenuOption::FreeFly.label());
        self.menu.confirm(&mut self.camera);
    }

    /// Keyboard mapping. Returns whether the key was used.
    pub fn handle_key(&mut self, key: &str, pressed: bool) -> bool {
        let held = match key {
            "w" | "W" => &mut self.input.forward,
            "s" | "S" => &mut self.input.backward,
            "a" | "A" => &mut self.input.left,
            "d" | "D" => &mut self.input.right,
            " " => &mut self.input.up,
            "x" | "X" => &mut self.input.down,
            "Shift" => &mut self.input.sprint,
            _ => return pressed && self.handle_command(key),
        };
        *held = pressed;
        true
    }

    fn handle_command(&mut self, key: &str) -> bool {
        match key {
            "+" | "=" => self.controls.faster(),
            "-" | "_" => self.controls.slower(),
            "p" | "P" => self.controls.toggle_pause(),
            "t" | "T" => self.toggle_trajectories(),
            "f" | "F" => self.free_fly(),
            "ArrowUp" => self.menu.previous(),
            "ArrowDown" => self.menu.next(),
            "Enter" => self.menu.confirm(&mut self.camera),
            _ => return false,
        }
        true
    }

    pub fn handle_mouse_down(&mut self, x: i32, y: i32) {
        self.is_dragging = true;
        self.last_mouse_pos = (x, y);
    }

    pub fn handle_mouse_up(&mut self) {
        self.is_dragging = false;
    }

    pub fn handle_mouse_move(&mut self, x: i32, y: i32) {
        if self.is_dragging {
            let dx = x - self.last_mouse_pos.0;
            let dy = y - self.last_mouse_pos.1;
            self.camera.rotate(dx as f32, dy as f32);
            self.last_mouse_pos = (x, y);
        }
    }

    /// `Moon ← Earth ← Sun` for the given body, from its cached ancestor chain.
    pub fn breadcrumb(&self, id: BodyId) -> String {
        std::iter::once(id)
            .chain(self.hierarchy.ancestors(id).iter().copied())
            .filter_map(|i| self.hierarchy.get(i))
            .map(CelestialBody::name)
            .collect::<Vec<_>>()
            .join(" ← ")
    }

    pub fn hud_text(&self) -> String {
        let view = match self.camera.mode() {
            CameraMode::FreeFly => "free fly".to_string(),
            CameraMode::Anchored(id) => format!("anchored to {}", self.breadcrumb(id)),
        };
        let paused = if self.controls.is_paused() { " (paused)" } else { "" };
        format!(
            "Speed x{}{} | Day {:.1} | Camera: {} | Menu: {}",
            self.controls.speed_factor(),
            paused,
            self.simulated_days(),
            view,
            self.menu.selected().label(),
        )
    }
}
