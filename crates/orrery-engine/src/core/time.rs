/// Fixed timestep accumulator.
/// Ensures simulation ticks run at a consistent rate regardless of frame time.
pub struct FixedTimestep {
    /// The fixed delta time per tick.
    dt: f32,
    /// Accumulated time from variable frame deltas.
    accumulator: f32,
    /// Upper bound on ticks per frame (spiral-of-death guard).
    max_steps: u32,
}

impl FixedTimestep {
    pub const DEFAULT_MAX_STEPS: u32 = 10;

    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
            max_steps: Self::DEFAULT_MAX_STEPS,
        }
    }

    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps.max(1);
        self
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        // Hidden tabs report huge or negative deltas; neither should advance time backwards.
        self.accumulator += frame_dt.max(0.0);
        self.accumulator = self.accumulator.min(self.dt * self.max_steps as f32);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        steps
    }

    /// Interpolation alpha for rendering between ticks (0.0 to 1.0).
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.dt
    }

    /// The fixed delta time.
    pub fn dt(&self) -> f32 {
        self.dt
    }
}

/// Simulated-time accumulator.
///
/// Every tick adds `real_dt × time_speed` to the simulated clock, so changing
/// the speed never makes bodies jump and a speed of zero freezes the clock
/// exactly. Tier factors (planets vs. moons) are applied by the reader.
#[derive(Debug, Clone, Default)]
pub struct SimClock {
    /// Simulated seconds (f64: long sessions accumulate large values).
    elapsed: f64,
    /// Real seconds fed to the clock, regardless of speed.
    real: f64,
    /// Number of ticks advanced.
    ticks: u64,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by one tick of `real_dt` seconds at `time_speed`.
    /// Negative or non-finite speeds are treated as paused.
    pub fn advance(&mut self, real_dt: f32, time_speed: f64) {
        self.real += real_dt as f64;
        self.ticks += 1;
        if time_speed.is_finite() && time_speed > 0.0 {
            self.elapsed += real_dt as f64 * time_speed;
        }
    }

    /// Simulated seconds since start.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Simulated seconds scaled by a fixed slowdown factor.
    pub fn scaled(&self, factor: f64) -> f64 {
        self.elapsed * factor
    }

    /// Real seconds since start.
    pub fn real(&self) -> f64 {
        self.real
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
