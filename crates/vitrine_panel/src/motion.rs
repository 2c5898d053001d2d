//! Spring motion
//!
//! A damped spring integrated with RK4. The panel uses one spring per visual
//! quantity; anything that must move in lockstep reads the same spring.

/// Stiffness, damping and mass of a spring
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringConfig {
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
}

impl SpringConfig {
    pub const fn new(stiffness: f32, damping: f32, mass: f32) -> Self {
        Self {
            stiffness,
            damping,
            mass,
        }
    }

    /// Panel slide and content shift
    pub const fn panel() -> Self {
        Self::new(300.0, 30.0, 1.0)
    }

    /// Toggle knob
    pub const fn knob() -> Self {
        Self::new(400.0, 30.0, 1.0)
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::panel()
    }
}

/// Position and velocity of a spring at one instant
#[derive(Clone, Copy, Debug)]
struct Phase {
    x: f32,
    v: f32,
}

/// A one-dimensional animated value
#[derive(Clone, Copy, Debug)]
pub struct Spring {
    config: SpringConfig,
    phase: Phase,
    target: f32,
}

impl Spring {
    const SETTLE_DISTANCE: f32 = 0.5;
    const SETTLE_SPEED: f32 = 5.0;

    pub fn new(config: SpringConfig, initial: f32) -> Self {
        Self {
            config,
            phase: Phase { x: initial, v: 0.0 },
            target: initial,
        }
    }

    pub fn value(&self) -> f32 {
        self.phase.x
    }

    pub fn velocity(&self) -> f32 {
        self.phase.v
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    /// Move the rest point. Current velocity carries over.
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Jump to `value` and stop.
    pub fn snap_to(&mut self, value: f32) {
        self.target = value;
        self.phase = Phase { x: value, v: 0.0 };
    }

    pub fn is_settled(&self) -> bool {
        (self.phase.x - self.target).abs() < Self::SETTLE_DISTANCE
            && self.phase.v.abs() < Self::SETTLE_SPEED
    }

    /// Advance by `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        if self.is_settled() {
            self.snap_to(self.target);
            return;
        }

        let p0 = self.phase;
        let d1 = self.derivative(p0);
        let d2 = self.derivative(advance(p0, d1, dt * 0.5));
        let d3 = self.derivative(advance(p0, d2, dt * 0.5));
        let d4 = self.derivative(advance(p0, d3, dt));

        self.phase = Phase {
            x: p0.x + (d1.x + 2.0 * d2.x + 2.0 * d3.x + d4.x) * dt / 6.0,
            v: p0.v + (d1.v + 2.0 * d2.v + 2.0 * d3.v + d4.v) * dt / 6.0,
        };
    }

    /// Returns (dx/dt, dv/dt) packed into a `Phase`
    fn derivative(&self, p: Phase) -> Phase {
        let force = -self.config.stiffness * (p.x - self.target) - self.config.damping * p.v;
        Phase {
            x: p.v,
            v: force / self.config.mass,
        }
    }
}

fn advance(p: Phase, d: Phase, dt: f32) -> Phase {
    Phase {
        x: p.x + d.x * dt,
        v: p.v + d.v * dt,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_spring_settles() {
        let mut spring = Spring::new(SpringConfig::panel(), 0.0);
        spring.set_target(-344.0);

        for _ in 0..180 {
            spring.step(1.0 / 60.0);
        }

        assert!(spring.is_settled());
        assert_eq!(spring.value(), -344.0);
    }

    #[test]
    fn test_retarget_keeps_velocity() {
        let mut spring = Spring::new(SpringConfig::knob(), 0.0);
        spring.set_target(20.0);
        for _ in 0..5 {
            spring.step(1.0 / 60.0);
        }
        let velocity = spring.velocity();
        assert!(velocity > 0.0);

        spring.set_target(0.0);
        assert_eq!(spring.velocity(), velocity);
    }

    #[test]
    fn test_snap_stops_motion() {
        let mut spring = Spring::new(SpringConfig::panel(), 0.0);
        spring.set_target(100.0);
        spring.step(1.0 / 60.0);
        spring.snap_to(100.0);
        assert!(spring.is_settled());
        assert_eq!(spring.velocity(), 0.0);
    }
}
