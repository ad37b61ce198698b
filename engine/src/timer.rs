//====================================================================

use web_time::{Duration, Instant};

//====================================================================

/// Holds back a value until no new value arrived for `delay`.
/// Arming again replaces whatever was pending.
#[derive(Debug)]
pub struct Debounce<T> {
    delay: Duration,
    pending: Option<(Instant, T)>,
}

impl<T> Debounce<T> {
    #[inline]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    #[inline]
    pub fn arm(&mut self, now: Instant, value: T) {
        self.pending = Some((now + self.delay, value));
    }

    #[inline]
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Number of outstanding deadlines, either 0 or 1.
    #[inline]
    pub fn pending(&self) -> usize {
        self.pending.is_some() as usize
    }

    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((deadline, _)) if now >= *deadline => {
                self.pending.take().map(|(_, value)| value)
            }
            _ => None,
        }
    }
}

//====================================================================

/// A recurring deadline. Re-arming cancels the previous schedule.
#[derive(Debug)]
pub struct Interval {
    period: Duration,
    next: Option<Instant>,
}

impl Interval {
    #[inline]
    pub fn new(period: Duration) -> Self {
        Self { period, next: None }
    }

    #[inline]
    pub fn arm(&mut self, now: Instant) {
        self.next = Some(now + self.period);
    }

    #[inline]
    pub fn cancel(&mut self) {
        self.next = None;
    }

    #[inline]
    pub fn is_armed(&self) -> bool {
        self.next.is_some()
    }

    #[inline]
    pub fn pending(&self) -> usize {
        self.is_armed() as usize
    }

    #[inline]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Returns true once per elapsed period. Missed periods collapse into a
    /// single tick.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next {
            Some(next) if now >= next => {
                let mut following = next + self.period;
                if following <= now {
                    following = now + self.period;
                }
                self.next = Some(following);
                true
            }
            _ => false,
        }
    }
}

//====================================================================


//====================================================================
