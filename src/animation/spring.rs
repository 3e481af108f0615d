use crate::foundation::core::Vec2;

/// Damped spring parameters: `a = (-stiffness * x - damping * v) / mass`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SpringConfig {
    pub stiffness: f64,
    pub damping: f64,
    pub mass: f64,
}

impl SpringConfig {
    /// The cursor trail's feel.
    pub const TRAIL: SpringConfig = SpringConfig {
        stiffness: 150.0,
        damping: 20.0,
        mass: 0.5,
    };
}

/// A 2D point chasing a target through a damped spring.
#[derive(Clone, Copy, Debug)]
pub struct Spring2 {
    config: SpringConfig,
    position: Vec2,
    velocity: Vec2,
    target: Vec2,
}

impl Spring2 {
    // Semi-implicit Euler is stable for these constants at ~4ms steps.
    const MAX_STEP_S: f64 = 1.0 / 240.0;
    const REST_DELTA: f64 = 0.01;
    const REST_SPEED: f64 = 0.01;

    pub fn new(config: SpringConfig, at: Vec2) -> Self {
        Self {
            config,
            position: at,
            velocity: Vec2::ZERO,
            target: at,
        }
    }

    pub fn set_target(&mut self, target: Vec2) {
        self.target = target;
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn target(&self) -> Vec2 {
        self.target
    }

    pub fn is_at_rest(&self) -> bool {
        (self.target - self.position).hypot() < Self::REST_DELTA
            && self.velocity.hypot() < Self::REST_SPEED
    }

    /// Advance by `dt_s` seconds in fixed sub-steps.
    pub fn step(&mut self, dt_s: f64) {
        if !dt_s.is_finite() || dt_s <= 0.0 || self.is_at_rest() {
            return;
        }
        let mass = self.config.mass.max(1e-6);
        let mut remaining = dt_s;
        while remaining > 0.0 {
            let h = remaining.min(Self::MAX_STEP_S);
            let offset = self.position - self.target;
            let accel =
                (offset * -self.config.stiffness - self.velocity * self.config.damping) / mass;
            self.velocity += accel * h;
            self.position += self.velocity * h;
            remaining -= h;
        }
        if self.is_at_rest() {
            self.position = self.target;
            self.velocity = Vec2::ZERO;
        }
    }
}
