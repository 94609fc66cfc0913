use std::f64::consts::TAU;

/// Rates driving the two cubes' motion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationConfig {
    /// Spin of the orbiting cube about its own axis, rad/s.
    pub own_revolution_rate: f64,
    /// Orbit of the small cube about the global Y axis, rad/s.
    pub global_revolution_rate: f64,
    /// Peak deviation of the center cube's scale from 1.
    pub pulse_amplitude: f64,
    /// Angular frequency of the pulse, rad/s.
    pub pulse_frequency: f64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            own_revolution_rate: 10.0,
            global_revolution_rate: -1.0,
            pulse_amplitude: 0.2,
            pulse_frequency: 1.5,
        }
    }
}

/// Time accumulator behind all cube motion.
///
/// Every derived value is a pure function of elapsed time, so pausing
/// freezes the scene and resuming continues without a jump.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationClock {
    pub config: AnimationConfig,
    elapsed: f64,
    enabled: bool,
}

impl Default for AnimationClock {
    fn default() -> Self {
        Self::new(AnimationConfig::default())
    }
}

impl AnimationClock {
    /// A paused clock at time zero.
    pub fn new(config: AnimationConfig) -> Self {
        Self {
            config,
            elapsed: 0.0,
            enabled: false,
        }
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn toggle_enabled(&mut self) {
        self.enabled = !self.enabled;
        tracing::debug!(enabled = self.enabled, elapsed = self.elapsed, "animation toggled");
    }

    /// Advance by one frame's delta. No-op while paused.
    pub fn advance(&mut self, dt: f64) {
        if !self.enabled {
            return;
        }
        if !dt.is_finite() || dt < 0.0 {
            tracing::warn!(dt, "ignoring invalid frame delta");
            return;
        }
        self.elapsed += dt;
    }

    /// `1 + amplitude * sin(frequency * t)`.
    pub fn center_cube_scale(&self) -> f32 {
        let c = &self.config;
        (1.0 + c.pulse_amplitude * (c.pulse_frequency * self.elapsed).sin()) as f32
    }

    /// Unbounded; consumers wrap if they need to.
    pub fn own_revolution_angle(&self) -> f32 {
        (self.elapsed * self.config.own_revolution_rate) as f32
    }

    /// Unbounded; consumers wrap if they need to.
    pub fn global_revolution_angle(&self) -> f32 {
        (self.elapsed * self.config.global_revolution_rate) as f32
    }

    /// Own angle reduced to `[0, 2π)` before narrowing to `f32`.
    pub fn own_revolution_phase(&self) -> f32 {
        phase(self.elapsed * self.config.own_revolution_rate)
    }

    /// Global angle reduced to `[0, 2π)` before narrowing to `f32`.
    pub fn global_revolution_phase(&self) -> f32 {
        phase(self.elapsed * self.config.global_revolution_rate)
    }
}

fn phase(angle: f64) -> f32 {
    angle.rem_euclid(TAU) as f32
}
