//! Explicit periodic tick for live duration updates.

use chrono::{Duration, NaiveDateTime};

/// Fires once per `interval`. A cancelled ticker never fires again.
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    next_due: Option<NaiveDateTime>,
}

impl Ticker {
    /// First tick is due at `start`.
    pub fn new(interval: Duration, start: NaiveDateTime) -> Self {
        let interval = if interval <= Duration::zero() {
            Duration::seconds(1)
        } else {
            interval
        };
        Self {
            interval,
            next_due: Some(start),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_cancelled(&self) -> bool {
        self.next_due.is_none()
    }

    pub fn due(&self, now: NaiveDateTime) -> bool {
        self.next_due.is_some_and(|due| now >= due)
    }

    /// Consume a due tick and schedule the next one after `now`.
    /// Ticks missed while asleep collapse into one.
    pub fn advance(&mut self, now: NaiveDateTime) -> bool {
        let Some(mut due) = self.next_due else {
            return false;
        };
        if now < due {
            return false;
        }
        while due <= now {
            due += self.interval;
        }
        self.next_due = Some(due);
        true
    }

    /// Time left until the next tick; `None` once cancelled.
    pub fn until_next(&self, now: NaiveDateTime) -> Option<Duration> {
        self.next_due
            .map(|due| if due > now { due - now } else { Duration::zero() })
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn t(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 9, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn fires_once_per_interval() {
        let mut tk = Ticker::new(Duration::minutes(1), t(9, 0));
        assert!(tk.advance(t(9, 0)));
        assert!(!tk.advance(t(9, 0)));
        assert!(!tk.due(t(9, 0)));
        assert!(tk.due(t(9, 1)));
    }

    #[test]
    fn missed_ticks_collapse() {
        let mut tk = Ticker::new(Duration::minutes(1), t(9, 0));
        assert!(tk.advance(t(9, 10)));
        assert!(!tk.due(t(9, 10)));
        assert_eq!(tk.until_next(t(9, 10)), Some(Duration::minutes(1)));
    }

    #[test]
    fn cancelled_never_fires() {
        let mut tk = Ticker::new(Duration::minutes(1), t(9, 0));
        tk.cancel();
        assert!(tk.is_cancelled());
        assert!(!tk.due(t(10, 0)));
        assert!(!tk.advance(t(10, 0)));
        assert_eq!(tk.until_next(t(10, 0)), None);
    }
}
