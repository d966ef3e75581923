//! Frame Scheduler
//!
//! Splits wall-clock frame time into one variable `update(dt)` and a number
//! of fixed-size `fixed_update` steps owed by an accumulator.

/// Default fixed step (60 Hz)
pub const DEFAULT_FIXED_DT: f32 = 1.0 / 60.0;

/// Catch-up steps allowed per frame before the backlog is dropped
pub const MAX_FIXED_STEPS: u32 = 5;

/// Frames longer than this are treated as a stall and clamped
const MAX_FRAME_DT: f32 = 0.25;

/// Work owed for one rendered frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTicks {
    /// Variable frame delta (seconds)
    pub dt: f32,
    pub fixed_dt: f32,
    /// Number of `fixed_update` calls owed this frame
    pub fixed_steps: u32,
}

/// The game loop as seen by the orchestrator.
pub trait GameLoopScheduler {
    fn start(&mut self);
    fn stop(&mut self);
    fn is_running(&self) -> bool;
    /// Account for `frame_dt` seconds. `None` while stopped.
    fn advance(&mut self, frame_dt: f32) -> Option<FrameTicks>;
}

#[derive(Debug, Clone)]
pub struct FrameScheduler {
    fixed_dt: f32,
    max_steps: u32,
    accumulator: f32,
    running: bool,
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_FIXED_DT)
    }
}

impl FrameScheduler {
    pub fn new(fixed_dt: f32) -> Self {
        Self {
            fixed_dt: fixed_dt.max(f32::EPSILON),
            max_steps: MAX_FIXED_STEPS,
            accumulator: 0.0,
            running: false,
        }
    }

    pub fn fixed_dt(&self) -> f32 {
        self.fixed_dt
    }

    /// Time carried over to the next frame.
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }
}

impl GameLoopScheduler for FrameScheduler {
    fn start(&mut self) {
        self.running = true;
        self.accumulator = 0.0;
    }

    fn stop(&mut self) {
        self.running = false;
        self.accumulator = 0.0;
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn advance(&mut self, frame_dt: f32) -> Option<FrameTicks> {
        if !self.running {
            return None;
        }

        let dt = frame_dt.clamp(0.0, MAX_FRAME_DT);
        self.accumulator += dt;

        let mut fixed_steps = 0;
        while self.accumulator >= self.fixed_dt && fixed_steps < self.max_steps {
            self.accumulator -= self.fixed_dt;
            fixed_steps += 1;
        }
        // Drop the backlog instead of spiralling
        if fixed_steps == self.max_steps && self.accumulator >= self.fixed_dt {
            log::debug!("fixed-step backlog of {:.3}s dropped", self.accumulator);
            self.accumulator %= self.fixed_dt;
        }

        Some(FrameTicks {
            dt,
            fixed_dt: self.fixed_dt,
            fixed_steps,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stopped_scheduler_yields_nothing() {
        let mut scheduler = FrameScheduler::default();
        assert!(scheduler.advance(0.016).is_none());
    }

    #[test]
    fn test_accumulates_fixed_steps() {
        let mut scheduler = FrameScheduler::new(0.01);
        scheduler.start();
        let ticks = scheduler.advance(0.025).unwrap();
        assert_eq!(ticks.fixed_steps, 2);
        assert!((scheduler.accumulator() - 0.005).abs() < 1e-6);

        let ticks = scheduler.advance(0.006).unwrap();
        assert_eq!(ticks.fixed_steps, 1);
    }

    #[test]
    fn test_catch_up_is_capped() {
        let mut scheduler = FrameScheduler::default();
        scheduler.start();
        let ticks = scheduler.advance(0.2).unwrap();
        assert_eq!(ticks.fixed_steps, MAX_FIXED_STEPS);
        assert!(scheduler.accumulator() < scheduler.fixed_dt());
    }

    #[test]
    fn test_stop_resets() {
        let mut scheduler = FrameScheduler::default();
        scheduler.start();
        scheduler.advance(0.01);
        scheduler.stop();
        assert!(!scheduler.is_running());
        assert_eq!(scheduler.accumulator(), 0.0);
    }
}
