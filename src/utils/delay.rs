use std::time::Duration;

/// A pause of `base` plus a uniformly random share of `jitter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayRange {
    pub base: Duration,
    pub jitter: Duration,
}

impl DelayRange {
    pub const fn new(base: Duration, jitter: Duration) -> Self {
        Self { base, jitter }
    }

    pub const fn none() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    pub fn sample(&self) -> Duration {
        self.base + self.jitter.mul_f64(rand::random::<f64>())
    }
}
