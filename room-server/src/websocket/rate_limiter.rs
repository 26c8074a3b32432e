use std::time::{Duration, Instant};

/// Per-connection token bucket guarding the dispatch loop against a
/// flooding client. Not a fairness mechanism: one bucket per connection,
/// refilled on a fixed interval.
#[derive(Debug)]
pub struct RateLimiter {
    capacity: u32,
    available: u32,
    refill_every: Duration,
    last_refill: Instant,
}

impl RateLimiter {
    pub fn new() -> Self {
        // 20-message burst, one token back every 100ms
        Self::with_limits(20, Duration::from_millis(100))
    }

    pub fn with_limits(capacity: u32, refill_every: Duration) -> Self {
        Self {
            capacity,
            available: capacity,
            refill_every,
            last_refill: Instant::now(),
        }
    }

    /// Take a token if one is available.
    pub fn allow(&mut self) -> bool {
        self.refill();
        if self.available > 0 {
            self.available -= 1;
            true
        } else {
            false
        }
    }

    fn refill(&mut self) {
        let elapsed = self.last_refill.elapsed();
        if elapsed >= self.refill_every {
            let earned = (elapsed.as_millis() / self.refill_every.as_millis()) as u32;
            self.available = (self.available + earned).min(self.capacity);
            self.last_refill = Instant::now();
        }
    }

    pub fn remaining(&mut self) -> u32 {
        self.refill();
        self.available
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
