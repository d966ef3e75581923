//! Vertical Motion
//!
//! Jump and gravity along one axis, shared by the 3D character and the
//! planar controller. The ground is the height the entity stood at when its
//! controller was enabled; there is no terrain collision.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalMotion {
    /// Vertical velocity (units/s), positive is up
    pub velocity: f32,
    pub grounded: bool,
    pub ground_level: f32,
}

impl Default for VerticalMotion {
    fn default() -> Self {
        Self::grounded_at(0.0)
    }
}

impl VerticalMotion {
    pub fn grounded_at(ground_level: f32) -> Self {
        Self {
            velocity: 0.0,
            grounded: true,
            ground_level,
        }
    }

    /// Integrate one frame and return the new height.
    ///
    /// A jump only starts while grounded. Landing clamps the height to the
    /// ground level and zeroes the velocity.
    pub fn step(&mut self, height: f32, jump: bool, jump_force: f32, gravity: f32, dt: f32) -> f32 {
        if jump && self.grounded {
            self.velocity = jump_force;
            self.grounded = false;
        }
        if !self.grounded {
            self.velocity -= gravity * dt;
        }

        let next = height + self.velocity * dt;
        if next <= self.ground_level {
            self.velocity = 0.0;
            self.grounded = true;
            return self.ground_level;
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jump_arc_returns_to_ground() {
        let mut motion = VerticalMotion::grounded_at(2.0);
        let dt = 1.0 / 240.0;
        let mut y = 2.0;
        let mut apex: f32 = y;

        y = motion.step(y, true, 8.0, 20.0, dt);
        assert!(!motion.grounded);

        let mut frames = 0;
        while !motion.grounded && frames < 10_000 {
            y = motion.step(y, false, 8.0, 20.0, dt);
            apex = apex.max(y);
            frames += 1;
        }

        assert!(motion.grounded);
        assert_eq!(y, 2.0);
        // v^2 / 2g = 1.6
        assert!((apex - 2.0 - 1.6).abs() < 0.05, "apex {}", apex);
    }

    #[test]
    fn test_no_double_jump() {
        let mut motion = VerticalMotion::grounded_at(0.0);
        let y = motion.step(0.0, true, 8.0, 20.0, 0.1);
        let v = motion.velocity;
        motion.step(y, true, 8.0, 20.0, 0.1);
        assert!(motion.velocity < v);
    }

    #[test]
    fn test_idle_stays_on_ground() {
        let mut motion = VerticalMotion::grounded_at(1.0);
        assert_eq!(motion.step(1.0, false, 8.0, 20.0, 0.016), 1.0);
        assert!(motion.grounded);
    }
}
