//! Virtual-clock timer queue
//!
//! Every timed behaviour (spawn cadence, countdown, combo decay, bubble
//! expiry, power-up revert) is a scheduled event here. Events are handed out
//! in deadline order, FIFO on ties, one at a time, so callbacks never
//! interleave. Time only moves when the owner advances it.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::state::BubbleId;

/// Handle for cancelling or inspecting a scheduled event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerId(u64);

/// What fires when a timer comes due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Spawner cadence
    Spawn,
    /// One-second countdown
    ClockTick,
    /// Combo window elapsed
    ComboReset,
    /// Bubble lifetime elapsed
    Expire(BubbleId),
    /// Power-up duration elapsed
    RevertPowerUp { activation: u64 },
}

#[derive(Debug, Clone)]
struct Scheduled {
    id: TimerId,
    event: TimerEvent,
    /// Re-arm interval for repeating timers
    period: Option<u64>,
}

/// Ordered queue of pending events keyed by (deadline, insertion order)
#[derive(Debug, Default)]
pub struct Scheduler {
    now_ms: u64,
    next_id: u64,
    next_seq: u64,
    queue: BTreeMap<(u64, u64), Scheduled>,
    keys: HashMap<TimerId, (u64, u64)>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time (ms)
    pub fn now(&self) -> u64 {
        self.now_ms
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Fire `event` once, `delay_ms` from now
    pub fn schedule_once(&mut self, delay_ms: u64, event: TimerEvent) -> TimerId {
        let id = self.allocate_id();
        let deadline = self.now_ms + delay_ms;
        self.insert(
            deadline,
            Scheduled {
                id,
                event,
                period: None,
            },
        );
        id
    }

    /// Fire `event` every `period_ms`, first time one period from now
    pub fn schedule_every(&mut self, period_ms: u64, event: TimerEvent) -> TimerId {
        let period = if period_ms == 0 {
            log::warn!("Zero-length period for {event:?}, using 1 ms");
            1
        } else {
            period_ms
        };
        let id = self.allocate_id();
        let deadline = self.now_ms + period;
        self.insert(
            deadline,
            Scheduled {
                id,
                event,
                period: Some(period),
            },
        );
        id
    }

    /// Remove a pending timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.keys.remove(&id) {
            Some(key) => self.queue.remove(&key).is_some(),
            None => false,
        }
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.keys.contains_key(&id)
    }

    /// Absolute deadline of a pending timer
    pub fn deadline(&self, id: TimerId) -> Option<u64> {
        self.keys.get(&id).map(|(deadline, _)| *deadline)
    }

    /// Time left until a pending timer fires
    pub fn remaining(&self, id: TimerId) -> Option<u64> {
        self.deadline(id).map(|d| d.saturating_sub(self.now_ms))
    }

    /// Move a pending timer to fire `delay_ms` from now, keeping its id and period
    pub fn reschedule(&mut self, id: TimerId, delay_ms: u64) -> bool {
        let Some(key) = self.keys.remove(&id) else {
            return false;
        };
        let Some(scheduled) = self.queue.remove(&key) else {
            return false;
        };
        let deadline = self.now_ms + delay_ms;
        self.insert(deadline, scheduled);
        true
    }

    /// Take the earliest event due at or before `until`, moving the clock to
    /// its deadline. Repeating timers are re-armed at `deadline + period`.
    pub fn pop_due(&mut self, until: u64) -> Option<(TimerId, TimerEvent)> {
        let entry = self.queue.first_entry()?;
        if entry.key().0 > until {
            return None;
        }
        let ((deadline, _), scheduled) = entry.remove_entry();
        self.keys.remove(&scheduled.id);
        self.now_ms = self.now_ms.max(deadline);

        let fired = (scheduled.id, scheduled.event);
        if let Some(period) = scheduled.period {
            self.insert(deadline + period, scheduled);
        }
        Some(fired)
    }

    /// Move the clock forward without firing anything
    pub fn advance_to(&mut self, t: u64) {
        self.now_ms = self.now_ms.max(t);
    }

    /// Drop every pending timer; the clock keeps its value
    pub fn clear(&mut self) {
        self.queue.clear();
        self.keys.clear();
    }

    /// Keep only timers whose event matches
    pub fn retain(&mut self, mut keep: impl FnMut(&TimerEvent) -> bool) {
        let keys = &mut self.keys;
        self.queue.retain(|_, scheduled| {
            let kept = keep(&scheduled.event);
            if !kept {
                keys.remove(&scheduled.id);
            }
            kept
        });
    }

    fn allocate_id(&mut self) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        id
    }

    fn insert(&mut self, deadline: u64, scheduled: Scheduled) {
        let key = (deadline, self.next_seq);
        self.next_seq += 1;
        self.keys.insert(scheduled.id, key);
        self.queue.insert(key, scheduled);
    }
}
