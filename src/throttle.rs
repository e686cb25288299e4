use crate::config::ThrottleConfig;
use std::thread;
use std::time::Duration;

/// Constant-delay rate limiter for the two network-bound paths: one pause
/// between result pages, a longer one after each recorded diff fetch. The
/// delays are a courtesy to the upstream API, not a correctness mechanism.
#[derive(Debug, Clone)]
pub struct Throttle {
    page_delay: Duration,
    record_delay: Duration,
}

impl Throttle {
    pub fn new(page_delay: Duration, record_delay: Duration) -> Self {
        Self { page_delay, record_delay }
    }

    pub fn from_config(config: &ThrottleConfig) -> Self {
        Self::new(
            Duration::from_millis(config.page_delay_ms),
            Duration::from_millis(config.record_delay_ms),
        )
    }

    /// Zero-delay throttle so tests run without real sleeps.
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    pub fn between_pages(&self) {
        pause(self.page_delay);
    }

    pub fn after_record(&self) {
        pause(self.record_delay);
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), Duration::from_secs(2))
    }
}

fn pause(delay: Duration) {
    if !delay.is_zero() {
        thread::sleep(delay);
    }
}
