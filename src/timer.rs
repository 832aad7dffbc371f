//! Recognition timer and time sources
//!
//! The recognition timer is the only time-driven trigger in the gesture
//! core. It does not run on its own: it records a deadline against an
//! injectable [`Clock`], and whoever drives the areas (the dispatcher or the
//! async event loop) polls it. Tests use [`ManualClock`] to step time
//! deterministically.
//!
//! # Usage
//!
//! ```
//! use std::rc::Rc;
//! use std::time::Duration;
//! use shell_gestures::timer::{ManualClock, RecognitionTimer};
//!
//! let clock = ManualClock::new();
//! let mut timer = RecognitionTimer::new(Rc::new(clock.clone()), Duration::from_millis(50));
//!
//! timer.start();
//! clock.advance(Duration::from_millis(49));
//! assert!(!timer.poll());
//! clock.advance(Duration::from_millis(1));
//! assert!(timer.poll());
//! assert!(!timer.is_running());
//! ```

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Source of monotonic time
pub trait Clock: fmt::Debug {
    fn now(&self) -> Instant;
}

/// Wall clock backed by [`Instant::now`]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Rc::new(Cell::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

/// Single-shot countdown that forces a gesture decision
pub struct RecognitionTimer {
    clock: Rc<dyn Clock>,
    interval: Duration,
    deadline: Option<Instant>,
}

impl fmt::Debug for RecognitionTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecognitionTimer")
            .field("interval", &self.interval)
            .field("deadline", &self.deadline)
            .finish()
    }
}

impl RecognitionTimer {
    pub fn new(clock: Rc<dyn Clock>, interval: Duration) -> Self {
        Self {
            clock,
            interval,
            deadline: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Change the interval. A running timer restarts with the new interval.
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
        if self.is_running() {
            self.start();
        }
    }

    /// Arm (or re-arm) the timer
    pub fn start(&mut self) {
        self.deadline = Some(self.clock.now() + self.interval);
    }

    pub fn stop(&mut self) {
        self.deadline = None;
    }

    pub fn is_running(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns true exactly once when the deadline has passed, disarming the timer
    pub fn poll(&mut self) -> bool {
        match self.deadline {
            Some(deadline) if self.clock.now() >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timer(ms: u64) -> (ManualClock, RecognitionTimer) {
        let clock = ManualClock::new();
        let timer = RecognitionTimer::new(Rc::new(clock.clone()), Duration::from_millis(ms));
        (clock, timer)
    }

    #[test]
    fn test_idle_timer_never_fires() {
        let (clock, mut timer) = timer(10);
        clock.advance(Duration::from_secs(5));
        assert!(!timer.poll());
        assert!(timer.deadline().is_none());
    }

    #[test]
    fn test_fires_once() {
        let (clock, mut timer) = timer(10);
        timer.start();
        clock.advance(Duration::from_millis(10));
        assert!(timer.poll());
        assert!(!timer.poll());
    }

    #[test]
    fn test_stop_cancels() {
        let (clock, mut timer) = timer(10);
        timer.start();
        timer.stop();
        clock.advance(Duration::from_millis(20));
        assert!(!timer.poll());
    }

    #[test]
    fn test_restart_pushes_deadline() {
        let (clock, mut timer) = timer(10);
        timer.start();
        clock.advance(Duration::from_millis(8));
        timer.start();
        clock.advance(Duration::from_millis(8));
        assert!(!timer.poll());
        clock.advance(Duration::from_millis(2));
        assert!(timer.poll());
    }

    #[test]
    fn test_set_interval_restarts_running_timer() {
        let (clock, mut timer) = timer(10);
        timer.start();
        clock.advance(Duration::from_millis(5));
        timer.set_interval(Duration::from_millis(100));
        clock.advance(Duration::from_millis(50));
        assert!(!timer.poll());
        clock.advance(Duration::from_millis(50));
        assert!(timer.poll());
    }

    #[test]
    fn test_set_interval_keeps_stopped_timer_stopped() {
        let (_clock, mut timer) = timer(10);
        timer.set_interval(Duration::from_millis(100));
        assert!(!timer.is_running());
        assert_eq!(timer.interval(), Duration::from_millis(100));
    }
}
