//! Persistent countdown clock
//!
//! Remaining time is always derived from the absolute start timestamp kept in
//! the session repository, never from an in-memory counter, so reloads and
//! suspended processes observe correctly depleted time.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::{
    constants::{storage_keys, TICK_INTERVAL_MS},
    error::ClientResult,
    storage::SessionRepository,
    utils::{parse_epoch_millis, time::now_utc},
};

/// Source of wall-clock time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Operating-system wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        now_utc()
    }
}

/// Seconds left in an attempt of `duration_seconds` that began at `start`
///
/// Clamped to `[0, duration_seconds]`; a `now` earlier than `start` (clock
/// moved backwards) counts as no time elapsed.
pub fn remaining_seconds(start: DateTime<Utc>, now: DateTime<Utc>, duration_seconds: i64) -> i64 {
    let elapsed = (now - start).num_milliseconds().max(0) / 1000;
    (duration_seconds - elapsed).clamp(0, duration_seconds.max(0))
}

/// Start timestamp persisted under `timer_start_time`
#[derive(Clone)]
pub struct PersistentClock {
    repo: Arc<dyn SessionRepository>,
    clock: Arc<dyn Clock>,
    duration_seconds: i64,
}

impl PersistentClock {
    pub fn new(repo: Arc<dyn SessionRepository>, clock: Arc<dyn Clock>, duration_seconds: i64) -> Self {
        Self {
            repo,
            clock,
            duration_seconds,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn duration_seconds(&self) -> i64 {
        self.duration_seconds
    }

    /// Persisted start, if any; a malformed value is discarded
    pub fn start(&self) -> ClientResult<Option<DateTime<Utc>>> {
        let Some(raw) = self.repo.get(storage_keys::TIMER_START)? else {
            return Ok(None);
        };
        match parse_epoch_millis(&raw) {
            Some(start) => Ok(Some(start)),
            None => {
                tracing::warn!(value = %raw, "Discarding malformed timer start");
                self.repo.remove_many(&[storage_keys::TIMER_START])?;
                Ok(None)
            }
        }
    }

    /// Return the persisted start, creating it from the current time if absent
    ///
    /// First writer wins: an already stored start is never overwritten.
    pub fn ensure_started(&self) -> ClientResult<DateTime<Utc>> {
        if let Some(start) = self.start()? {
            return Ok(start);
        }

        let now = self.clock.now();
        let stored = self
            .repo
            .set_if_absent(storage_keys::TIMER_START, &now.timestamp_millis().to_string())?;
        let start = parse_epoch_millis(&stored).unwrap_or(now);
        if start == now {
            tracing::info!(start = %start, "Contest timer started");
        }
        Ok(start)
    }

    /// Remaining seconds, or `None` when no timer has been started
    pub fn remaining(&self) -> ClientResult<Option<i64>> {
        Ok(self
            .start()?
            .map(|start| remaining_seconds(start, self.clock.now(), self.duration_seconds)))
    }

    /// Countdown state machine for the given start
    pub fn countdown(&self, start: DateTime<Utc>) -> Countdown {
        Countdown::new(start, self.duration_seconds)
    }

    /// Spawn the once-per-second ticker for `start`
    pub fn spawn_ticker(&self, start: DateTime<Utc>) -> (mpsc::Receiver<TickEvent>, JoinHandle<()>) {
        spawn_ticker(self.countdown(start), self.clock.clone())
    }
}

/// Event produced by the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickEvent {
    Tick { remaining_seconds: i64 },
    /// Fired exactly once, after which ticking stops
    Expired,
}

/// Countdown over a fixed start and duration
#[derive(Debug, Clone)]
pub struct Countdown {
    start: DateTime<Utc>,
    duration_seconds: i64,
    expired: bool,
}

impl Countdown {
    pub fn new(start: DateTime<Utc>, duration_seconds: i64) -> Self {
        Self {
            start,
            duration_seconds,
            expired: false,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    /// Observe the clock; `None` once expiry has been reported
    pub fn observe(&mut self, now: DateTime<Utc>) -> Option<TickEvent> {
        if self.expired {
            return None;
        }
        let remaining = remaining_seconds(self.start, now, self.duration_seconds);
        if remaining == 0 {
            self.expired = true;
            Some(TickEvent::Expired)
        } else {
            Some(TickEvent::Tick {
                remaining_seconds: remaining,
            })
        }
    }
}

/// Drive `countdown` once per second until expiry or until the receiver is dropped
pub fn spawn_ticker(
    mut countdown: Countdown,
    clock: Arc<dyn Clock>,
) -> (mpsc::Receiver<TickEvent>, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(8);
    let handle = tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(TICK_INTERVAL_MS));
        loop {
            interval.tick().await;
            let Some(event) = countdown.observe(clock.now()) else {
                break;
            };
            if tx.send(event).await.is_err() {
                tracing::debug!("Countdown receiver dropped; ticker stopping");
                break;
            }
            if event == TickEvent::Expired {
                tracing::info!("Contest time is up");
                break;
            }
        }
    });
    (rx, handle)
}
