//! Mock Timer implementation for testing

use crate::platform::{
    error::{PlatformError, TimerError},
    traits::TimerInterface,
    Result,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Schedule {
    Idle,
    Oneshot { due_us: u64 },
    Periodic { due_us: u64, period_us: u32 },
}

/// Mock Timer implementation
///
/// Simulated time only moves through [`MockTimer::advance`], which reports
/// how many times the timer would have fired.
#[derive(Debug)]
pub struct MockTimer {
    now_us: u64,
    schedule: Schedule,
}

impl MockTimer {
    /// Create a new mock timer at time zero, stopped
    pub fn new() -> Self {
        Self {
            now_us: 0,
            schedule: Schedule::Idle,
        }
    }

    /// Advance simulated time and return the number of expirations
    pub fn advance(&mut self, us: u32) -> u32 {
        self.now_us += us as u64;
        match self.schedule {
            Schedule::Idle => 0,
            Schedule::Oneshot { due_us } => {
                if self.now_us >= due_us {
                    self.schedule = Schedule::Idle;
                    1
                } else {
                    0
                }
            }
            Schedule::Periodic { due_us, period_us } => {
                if self.now_us < due_us {
                    return 0;
                }
                let period = period_us as u64;
                let fired = (self.now_us - due_us) / period + 1;
                self.schedule = Schedule::Periodic {
                    due_us: due_us + fired * period,
                    period_us,
                };
                fired as u32
            }
        }
    }

    /// Period of the running periodic schedule
    pub fn period_us(&self) -> Option<u32> {
        match self.schedule {
            Schedule::Periodic { period_us, .. } => Some(period_us),
            _ => None,
        }
    }
}

impl Default for MockTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerInterface for MockTimer {
    fn start_oneshot(&mut self, us: u32) -> Result<()> {
        if us == 0 {
            return Err(PlatformError::Timer(TimerError::InvalidDuration));
        }
        self.schedule = Schedule::Oneshot {
            due_us: self.now_us + us as u64,
        };
        Ok(())
    }

    fn start_periodic(&mut self, us: u32) -> Result<()> {
        if us == 0 {
            return Err(PlatformError::Timer(TimerError::InvalidDuration));
        }
        self.schedule = Schedule::Periodic {
            due_us: self.now_us + us as u64,
            period_us: us,
        };
        Ok(())
    }

    fn stop(&mut self) {
        self.schedule = Schedule::Idle;
    }

    fn is_running(&self) -> bool {
        self.schedule != Schedule::Idle
    }

    fn now_us(&self) -> u64 {
        self.now_us
    }
}
