//! Interrupt-safe event queue
//!
//! Interrupt handlers push, the main loop pops. Both sides go through a
//! critical section, so a push from an interrupt can never interleave with
//! a pop.
//!
//! # Usage
//!
//! ```ignore
//! use rc_hydraulic::machine::EVENTS;
//! use rc_hydraulic_core::Event;
//!
//! #[interrupt]
//! fn USART1() {
//!     let byte = read_data_register();
//!     EVENTS.push(Event::ByteReceived(byte));
//! }
//! ```

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Deque;
use rc_hydraulic_core::Event;

/// Queue capacity: a full servo frame plus a request and timer events
pub const EVENT_CAPACITY: usize = 48;

/// Queue shared by all interrupt handlers
pub static EVENTS: EventQueue<EVENT_CAPACITY> = EventQueue::new();

struct Inner<const N: usize> {
    events: Deque<Event, N>,
    dropped: u32,
}

/// Fixed-capacity FIFO of pending events
pub struct EventQueue<const N: usize> {
    inner: Mutex<RefCell<Inner<N>>>,
}

impl<const N: usize> EventQueue<N> {
    /// Create an empty queue (const for static initialization)
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Inner {
                events: Deque::new(),
                dropped: 0,
            })),
        }
    }

    /// Append an event
    ///
    /// When the queue is full the new event is discarded and counted;
    /// returns `false` in that case.
    pub fn push(&self, event: Event) -> bool {
        critical_section::with(|cs| {
            let mut inner = self.inner.borrow_ref_mut(cs);
            match inner.events.push_back(event) {
                Ok(()) => true,
                Err(_) => {
                    inner.dropped = inner.dropped.wrapping_add(1);
                    false
                }
            }
        })
    }

    /// Take the oldest event
    pub fn pop(&self) -> Option<Event> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).events.pop_front())
    }

    /// Number of pending events
    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.inner.borrow_ref(cs).events.len())
    }

    /// Check if no events are pending
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return and reset the overflow counter
    pub fn take_dropped(&self) -> u32 {
        critical_section::with(|cs| {
            let mut inner = self.inner.borrow_ref_mut(cs);
            core::mem::take(&mut inner.dropped)
        })
    }

    /// Discard everything pending
    pub fn clear(&self) {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).events.clear());
    }
}

impl<const N: usize> Default for EventQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}
