//! Frame pacing and the simulation speed controls.

/// Everything one update pass needs to know about the passage of time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickContext {
    /// Global multiplier applied on top of the elapsed time.
    pub speed_factor: f32,
    /// Simulated hours since the previous tick.
    pub elapsed_hours: f32,
}

/// Gates ticks to a frame-rate cap. Early polls are skipped, never blocked on.
#[derive(Clone, Debug)]
pub struct FrameClock {
    min_frame_ms: f64,
    last_tick_ms: Option<f64>,
}

impl FrameClock {
    pub fn new(fps_cap: u32) -> Self {
        FrameClock {
            min_frame_ms: 1000.0 / fps_cap.max(1) as f64,
            last_tick_ms: None,
        }
    }

    /// Returns the real milliseconds since the last accepted tick, or `None` if the cap says
    /// this frame should be skipped. The very first poll is accepted with zero elapsed time.
    pub fn poll(&mut self, now_ms: f64) -> Option<f64> {
        match self.last_tick_ms {
            None => {
                self.last_tick_ms = Some(now_ms);
                Some(0.0)
            }
            Some(last) if now_ms - last >= self.min_frame_ms => {
                self.last_tick_ms = Some(now_ms);
                Some(now_ms - last)
            }
            Some(_) => None,
        }
    }
}

/// User-adjustable pacing of the simulation.
#[derive(Clone, Debug)]
pub struct SimulationControls {
    speed_factor: f32,
    speed_step: f32,
    hours_per_second: f32,
    paused: bool,
}

impl SimulationControls {
    pub fn new(speed_factor: f32, speed_step: f32, hours_per_second: f32) -> Self {
        SimulationControls {
            speed_factor,
            speed_step,
            hours_per_second,
            paused: false,
        }
    }

    pub fn speed_factor(&self) -> f32 {
        self.speed_factor
    }

    pub fn set_speed_factor(&mut self, speed_factor: f32) {
        self.speed_factor = speed_factor;
        tracing::debug!(speed_factor, "speed factor set");
    }

    pub fn faster(&mut self) {
        self.set_speed_factor(self.speed_factor * self.speed_step);
    }

    pub fn slower(&mut self) {
        self.set_speed_factor(self.speed_factor / self.speed_step);
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn tick_context(&self, elapsed_ms: f64) -> TickContext {
        let elapsed_hours = if self.paused {
            0.0
        } else {
            (elapsed_ms / 1000.0) as f32 * self.hours_per_second
        };
        TickContext {
            speed_factor: self.speed_factor,
            elapsed_hours,
        }
    }
}
