//! TTL cache in front of the remote "is today a locking day" lookup.
//!
//! The lookup goes over Wi-Fi to an HTTP endpoint and can take seconds, so
//! the controller must not ask every cycle.  The cache remembers the last
//! verdict and only goes back to the network once the TTL has elapsed since
//! the last *attempt*, successful or not.
//!
//! ```text
//!   t=0        t=TTL        t=TTL+ε
//!   query ──▶  (cached) ──▶ query
//!    │ ok(v)                  │ Unavailable
//!    ▼                        ▼
//!   v          v              v  (kept, TTL restarts)
//! ```
//!
//! Timestamps are monotonic and injected by the caller.

use embassy_time::{Duration, Instant};
use log::{debug, info, warn};

use crate::app::ports::CalendarPort;

/// Last successful verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarCacheEntry {
    pub result: bool,
    pub fetched_at: Instant,
}

pub struct CalendarCache {
    ttl: Duration,
    entry: Option<CalendarCacheEntry>,
    last_attempt: Option<Instant>,
}

impl CalendarCache {
    pub const fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entry: None,
            last_attempt: None,
        }
    }

    /// Whether today is a locking day, refreshing from `remote` when stale.
    ///
    /// Never fails.  A remote failure keeps the previous verdict (or `false`
    /// if there never was one) and still restarts the TTL, so a dead
    /// endpoint is retried once per TTL rather than once per cycle.
    pub fn should_lock_today(&mut self, now: Instant, remote: &mut impl CalendarPort) -> bool {
        if self.is_stale(now) {
            self.last_attempt = Some(now);
            match remote.query() {
                Ok(result) => {
                    info!("Calendar: today is {}a locking day", if result { "" } else { "not " });
                    self.entry = Some(CalendarCacheEntry {
                        result,
                        fetched_at: now,
                    });
                }
                Err(e) => {
                    warn!("Calendar: {}; keeping verdict={}", e, self.cached());
                }
            }
        } else {
            debug!("Calendar: cached verdict={}", self.cached());
        }
        self.cached()
    }

    /// Last successful entry, if any.
    pub fn entry(&self) -> Option<CalendarCacheEntry> {
        self.entry
    }

    fn cached(&self) -> bool {
        self.entry.is_some_and(|e| e.result)
    }

    fn is_stale(&self, now: Instant) -> bool {
        match self.last_attempt {
            None => true,
            Some(at) => now.saturating_duration_since(at) > self.ttl,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RemoteUnavailable;

    /// Replays a fixed list of answers and counts calls.
    struct Scripted {
        answers: Vec<Result<bool, RemoteUnavailable>>,
        calls: usize,
    }

    impl Scripted {
        fn new(answers: &[Result<bool, RemoteUnavailable>]) -> Self {
            Self {
                answers: answers.to_vec(),
                calls: 0,
            }
        }
    }

    impl CalendarPort for Scripted {
        fn query(&mut self) -> Result<bool, RemoteUnavailable> {
            let answer = self.answers[self.calls.min(self.answers.len() - 1)];
            self.calls += 1;
            answer
        }
    }

    fn at(secs: u64) -> Instant {
        Instant::from_secs(secs)
    }

    #[test]
    fn queries_once_within_ttl() {
        let mut cache = CalendarCache::new(Duration::from_secs(900));
        let mut remote = Scripted::new(&[Ok(true)]);

        assert!(cache.should_lock_today(at(0), &mut remote));
        assert!(cache.should_lock_today(at(60), &mut remote));
        assert!(cache.should_lock_today(at(900), &mut remote));
        assert_eq!(remote.calls, 1);
    }

    #[test]
    fn refreshes_once_ttl_exceeded() {
        let mut cache = CalendarCache::new(Duration::from_secs(900));
        let mut remote = Scripted::new(&[Ok(true), Ok(false)]);

        assert!(cache.should_lock_today(at(0), &mut remote));
        assert!(!cache.should_lock_today(at(901), &mut remote));
        assert_eq!(remote.calls, 2);
        assert_eq!(
            cache.entry(),
            Some(CalendarCacheEntry {
                result: false,
                fetched_at: at(901)
            })
        );
    }

    #[test]
    fn failure_keeps_previous_verdict() {
        let mut cache = CalendarCache::new(Duration::from_secs(900));
        let mut remote = Scripted::new(&[Ok(true), Err(RemoteUnavailable)]);

        assert!(cache.should_lock_today(at(0), &mut remote));
        assert!(cache.should_lock_today(at(1000), &mut remote));
        assert_eq!(remote.calls, 2);
        // Failed attempt still restarts the TTL.
        assert!(cache.should_lock_today(at(1500), &mut remote));
        assert_eq!(remote.calls, 2);
    }

    #[test]
    fn false_until_first_success() {
        let mut cache = CalendarCache::new(Duration::from_secs(60));
        let mut remote = Scripted::new(&[Err(RemoteUnavailable), Ok(true)]);

        assert!(!cache.should_lock_today(at(0), &mut remote));
        assert!(cache.entry().is_none());
        assert!(!cache.should_lock_today(at(30), &mut remote));
        assert!(cache.should_lock_today(at(61), &mut remote));
        assert_eq!(remote.calls, 2);
    }
}
