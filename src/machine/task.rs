//! Embassy runtime glue
//!
//! On an async executor the hardware timers are replaced by
//! [`SignalTimer`]s: each one forwards its schedule through a [`Signal`] to
//! a [`timer_task`] that sleeps with `embassy-time` and posts the timer's
//! event to [`EVENT_CHANNEL`]. [`controller_task`] consumes the channel and
//! samples the sensors on a fixed period.
//!
//! # Usage
//!
//! ```ignore
//! use rc_hydraulic::machine::task::{controller_task, timer_task, TURNAROUND, STROBE};
//! use rc_hydraulic_core::Event;
//!
//! #[embassy_executor::task]
//! async fn turnaround() -> ! {
//!     timer_task(&TURNAROUND, Event::RxTimeout).await
//! }
//!
//! #[embassy_executor::task]
//! async fn strobe() -> ! {
//!     timer_task(&STROBE, Event::StrobeTick).await
//! }
//!
//! #[embassy_executor::task]
//! async fn control(machine: Machine<Board>) -> ! {
//!     controller_task(machine).await
//! }
//! ```

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Instant, Ticker, Timer};
use rc_hydraulic_core::Event;

use super::{Machine, EVENT_CAPACITY};
use crate::parameters;
use crate::platform::error::{PlatformError, TimerError};
use crate::platform::traits::{Platform, TimerInterface};
use crate::platform::Result;

/// Events from interrupt handlers and timer tasks
pub static EVENT_CHANNEL: Channel<CriticalSectionRawMutex, Event, EVENT_CAPACITY> =
    Channel::new();

/// Schedule requests for the turnaround timer task
pub static TURNAROUND: Signal<CriticalSectionRawMutex, Schedule> = Signal::new();

/// Schedule requests for the strobe timer task
pub static STROBE: Signal<CriticalSectionRawMutex, Schedule> = Signal::new();

/// Timer schedule request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// Fire once after the given microseconds
    Oneshot(u32),
    /// Fire every given microseconds
    Periodic(u32),
    /// Cancel
    Stopped,
}

/// [`TimerInterface`] backed by a [`timer_task`]
pub struct SignalTimer {
    schedule: &'static Signal<CriticalSectionRawMutex, Schedule>,
    requested: Schedule,
}

impl SignalTimer {
    /// Timer driving the task that waits on `schedule`
    pub const fn new(schedule: &'static Signal<CriticalSectionRawMutex, Schedule>) -> Self {
        Self {
            schedule,
            requested: Schedule::Stopped,
        }
    }

    fn request(&mut self, schedule: Schedule) {
        self.requested = schedule;
        self.schedule.signal(schedule);
    }
}

impl TimerInterface for SignalTimer {
    fn start_oneshot(&mut self, us: u32) -> Result<()> {
        if us == 0 {
            return Err(PlatformError::Timer(TimerError::InvalidDuration));
        }
        self.request(Schedule::Oneshot(us));
        Ok(())
    }

    fn start_periodic(&mut self, us: u32) -> Result<()> {
        if us == 0 {
            return Err(PlatformError::Timer(TimerError::InvalidDuration));
        }
        self.request(Schedule::Periodic(us));
        Ok(())
    }

    fn stop(&mut self) {
        self.request(Schedule::Stopped);
    }

    /// Reflects the last request; an expired one-shot still reads as running
    fn is_running(&self) -> bool {
        self.requested != Schedule::Stopped
    }

    fn now_us(&self) -> u64 {
        Instant::now().as_micros()
    }
}

/// Run the timer whose schedule arrives on `schedule`, posting `event` on expiry
///
/// A new request replaces the running one immediately.
pub async fn timer_task(
    schedule: &'static Signal<CriticalSectionRawMutex, Schedule>,
    event: Event,
) -> ! {
    let mut current = Schedule::Stopped;
    loop {
        current = match current {
            Schedule::Stopped => schedule.wait().await,
            Schedule::Oneshot(us) => {
                match select(Timer::after_micros(us as u64), schedule.wait()).await {
                    Either::First(()) => {
                        EVENT_CHANNEL.send(event).await;
                        Schedule::Stopped
                    }
                    Either::Second(next) => next,
                }
            }
            Schedule::Periodic(us) => {
                let mut ticker = Ticker::every(Duration::from_micros(us as u64));
                loop {
                    match select(ticker.next(), schedule.wait()).await {
                        Either::First(()) => EVENT_CHANNEL.send(event).await,
                        Either::Second(next) => break next,
                    }
                }
            }
        };
    }
}

/// Start the machine and process events forever
pub async fn controller_task<P: Platform>(mut machine: Machine<P>) -> ! {
    machine.start();
    let mut sampling = Ticker::every(Duration::from_micros(
        parameters::SENSOR_SAMPLE_US as u64,
    ));
    loop {
        match select(EVENT_CHANNEL.receive(), sampling.next()).await {
            Either::First(event) => {
                machine.dispatch(event);
                while let Ok(event) = EVENT_CHANNEL.try_receive() {
                    machine.dispatch(event);
                }
            }
            Either::Second(()) => machine.sample_sensors(),
        }
    }
}
