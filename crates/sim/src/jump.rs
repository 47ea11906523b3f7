use crate::config::{Integrator, JumpConfig};

/// Upper bound on fixed sub-steps per frame, so a long stall cannot spin.
const MAX_FIXED_STEPS: u32 = 240;

/// Outcome of advancing jump physics by one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpPhase {
    Grounded,
    Airborne,
    /// Touched down during this frame.
    Landed,
}

/// Vertical kinematics for a single body standing on the plane `y = 0`.
///
/// Invariant: whenever `airborne` is false, `velocity` is zero.
#[derive(Debug, Clone)]
pub struct JumpPhysics {
    config: JumpConfig,
    airborne: bool,
    velocity: f32,
    accumulator: f32,
}

impl Default for JumpPhysics {
    fn default() -> Self {
        Self::new(JumpConfig::default())
    }
}

impl JumpPhysics {
    pub fn new(config: JumpConfig) -> Self {
        Self {
            config,
            airborne: false,
            velocity: 0.0,
            accumulator: 0.0,
        }
    }

    pub fn is_airborne(&self) -> bool {
        self.airborne
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Start a jump if standing on the ground at height `y`.
    /// Returns whether a jump began.
    pub fn try_jump(&mut self, y: f32) -> bool {
        if self.airborne || y > self.config.ground_epsilon {
            return false;
        }
        self.airborne = true;
        self.velocity = self.config.jump_speed;
        self.accumulator = 0.0;
        tracing::debug!("jump started at y={y:.4}");
        true
    }

    /// Advance by `dt` seconds, updating the height `y` in place.
    pub fn step(&mut self, y: &mut f32, dt: f32) -> JumpPhase {
        if !self.airborne {
            return JumpPhase::Grounded;
        }

        let landed = match self.config.integrator {
            Integrator::Euler => self.euler(y, dt),
            Integrator::FixedStep => self.fixed(y, dt),
        };

        if landed {
            tracing::debug!("landed");
            JumpPhase::Landed
        } else {
            JumpPhase::Airborne
        }
    }

    fn fixed(&mut self, y: &mut f32, dt: f32) -> bool {
        let h = self.config.fixed_step;
        self.accumulator += dt;
        let mut steps = 0;
        while self.accumulator >= h && steps < MAX_FIXED_STEPS {
            self.accumulator -= h;
            steps += 1;
            if self.euler(y, h) {
                return true;
            }
        }
        if steps == MAX_FIXED_STEPS {
            self.accumulator = 0.0;
        }
        false
    }

    /// One explicit Euler step. Returns true on touchdown.
    fn euler(&mut self, y: &mut f32, dt: f32) -> bool {
        self.velocity += self.config.gravity * dt;
        *y += self.velocity * dt;

        if *y <= 0.0 {
            *y = 0.0;
            self.airborne = false;
            self.velocity = 0.0;
            self.accumulator = 0.0;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_config() -> JumpConfig {
        JumpConfig {
            integrator: Integrator::FixedStep,
            ..JumpConfig::default()
        }
    }

    /// Run a full jump from the ground; returns (apex, frames, final y).
    fn run_cycle(physics: &mut JumpPhysics, dt: f32) -> (f32, usize, f32) {
        let mut y = 0.0;
        assert!(physics.try_jump(y));
        let mut apex: f32 = 0.0;
        let mut frames = 0;
        while physics.step(&mut y, dt) != JumpPhase::Landed {
            apex = apex.max(y);
            frames += 1;
            assert!(frames < 10_000, "jump never landed");
        }
        (apex, frames, y)
    }

    #[test]
    fn cycle_returns_exactly_to_ground() {
        let mut physics = JumpPhysics::default();
        let (apex, frames, y) = run_cycle(&mut physics, 1.0 / 60.0);
        assert_eq!(y, 0.0);
        assert!(!physics.is_airborne());
        assert_eq!(physics.velocity(), 0.0);
        assert!(frames > 10);
        // v^2 / 2g = 0.3186; Euler undershoots slightly.
        assert!(apex > 0.25 && apex < 0.33, "apex {apex}");
    }

    #[test]
    fn fixed_step_cycle_returns_exactly_to_ground() {
        let mut physics = JumpPhysics::new(fixed_config());
        let (_, _, y) = run_cycle(&mut physics, 1.0 / 30.0);
        assert_eq!(y, 0.0);
        assert!(!physics.is_airborne());
        assert_eq!(physics.velocity(), 0.0);
    }

    #[test]
    fn fixed_step_apex_ignores_frame_rate() {
        let mut slow = JumpPhysics::new(fixed_config());
        let mut fast = JumpPhysics::new(fixed_config());
        let (apex_slow, _, _) = run_cycle(&mut slow, 1.0 / 24.0);
        let (apex_fast, _, _) = run_cycle(&mut fast, 1.0 / 240.0);
        assert!((apex_slow - apex_fast).abs() < 0.02);
    }

    #[test]
    fn cannot_double_jump() {
        let mut physics = JumpPhysics::default();
        let mut y = 0.0;
        assert!(physics.try_jump(y));
        physics.step(&mut y, 0.05);
        assert!(!physics.try_jump(y));
        assert!(!physics.try_jump(0.0));
    }

    #[test]
    fn cannot_jump_above_ground() {
        let mut physics = JumpPhysics::default();
        assert!(!physics.try_jump(0.5));
        assert!(physics.try_jump(0.0005));
    }

    #[test]
    fn grounded_step_is_noop() {
        let mut physics = JumpPhysics::default();
        let mut y = 0.0;
        assert_eq!(physics.step(&mut y, 1.0), JumpPhase::Grounded);
        assert_eq!(y, 0.0);
    }

    #[test]
    fn huge_dt_lands_immediately() {
        let mut physics = JumpPhysics::default();
        let mut y = 0.0;
        physics.try_jump(y);
        assert_eq!(physics.step(&mut y, 1.0), JumpPhase::Landed);
        assert_eq!(y, 0.0);
        assert!(!physics.is_airborne());
    }
}
