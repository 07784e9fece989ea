//! Acceleration limiting
//!
//! Each ramped output keeps the value commanded on the previous cycle and
//! may move at most `limit` ticks toward its new target per cycle, in either
//! direction and across neutral. A previous value of 0 (power-on) or a limit
//! of 0 disables limiting so the first frame lands on target immediately.

/// Next commanded value for `target` given the previous command
pub fn ramp(target: i32, previous: i32, limit: i32) -> i32 {
    if previous == 0 || limit == 0 {
        return target;
    }
    previous + (target - previous).clamp(-limit, limit)
}

/// Ramp state for one actuator output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ramp {
    previous: i32,
    limit: i32,
}

impl Ramp {
    /// Fresh ramp; the first step lands on target
    pub const fn new(limit: i32) -> Self {
        Self { previous: 0, limit }
    }

    /// Advance toward `target` and return the new command
    pub fn step(&mut self, target: i32) -> i32 {
        self.previous = ramp(target, self.previous, self.limit);
        self.previous
    }

    /// Last commanded value (0 before the first step)
    pub fn value(&self) -> i32 {
        self.previous
    }
}
