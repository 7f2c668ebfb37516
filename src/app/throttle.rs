/// Rate limit for the "still waiting for the card" log. The mount state can
/// be polled far faster than a card is detected, so only every
/// `interval`-th attempt is reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LogThrottle {
    interval: u32,
}

impl LogThrottle {
    /// An interval of 0 never logs.
    pub const fn new(interval: u32) -> Self {
        Self { interval }
    }

    pub const fn interval(self) -> u32 {
        self.interval
    }

    pub fn should_log(self, count: u32) -> bool {
        count != 0 && count.checked_rem(self.interval) == Some(0)
    }
}
