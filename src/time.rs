//! Monotonic clock abstraction.
//!
//! The scheduler never reads wall-clock time directly. Hosts pass in a
//! `Clock`: `SystemClock` natively, `PerformanceClock` in the browser, and
//! `ManualClock` in tests where time only moves when the test says so.

use std::cell::Cell;
use std::rc::Rc;

/// Milliseconds since an arbitrary, fixed origin. Never goes backwards.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// `std::time::Instant` based clock. Origin is the moment of creation.
#[cfg(not(target_arch = "wasm32"))]
pub struct SystemClock {
    origin: std::time::Instant,
}

#[cfg(not(target_arch = "wasm32"))]
impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

/// `performance.now()` clock. `std::time::Instant` panics on wasm32-unknown-unknown.
#[cfg(target_arch = "wasm32")]
#[derive(Default)]
pub struct PerformanceClock {
    last: Cell<u64>,
}

#[cfg(target_arch = "wasm32")]
impl PerformanceClock {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(target_arch = "wasm32")]
impl Clock for PerformanceClock {
    fn now_ms(&self) -> u64 {
        let now = web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now().max(0.0) as u64)
            .unwrap_or(0);
        // performance.now() is monotonic, but keep the guarantee if the window goes away
        let now = now.max(self.last.get());
        self.last.set(now);
        now
    }
}

/// Clock that only advances when told to. Clones share the same time.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get().saturating_add(ms));
    }

    /// Jump to `ms`. Earlier values are ignored.
    pub fn set(&self, ms: u64) {
        self.now.set(self.now.get().max(ms));
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}
