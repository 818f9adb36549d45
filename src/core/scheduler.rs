//! Virtual-clock timer queue
//!
//! Every pending animation timer in the gallery lives here. The main loop moves
//! the clock forward by wall-clock elapsed time and dispatches whatever fell
//! due, in due order (ties in scheduling order). Tests drive the same clock by
//! hand, so state machines are exercised without sleeping.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use crate::widgets::window_chrome::CloseStage;

/// Identity of one mounted widget instance; owner of its timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(u64);

impl InstanceId {
    pub fn raw(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// What a timer means to its owner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Reveal one more character
    TypeTick,
    /// Cosmetic "press enter" hint
    ShowHint,
    /// Emphasis effect over, move to the next item
    FinishAdvance,
    /// Self-issued advance for auto-cycling menus
    AutoAdvance,
    /// Mount animation finished
    MountComplete,
    CloseStage(CloseStage),
    CloseComplete,
}

/// A timer that fell due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired {
    pub timer: TimerId,
    pub owner: InstanceId,
    pub event: TimerEvent,
    pub at: Duration,
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    owner: InstanceId,
    event: TimerEvent,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    now: Duration,
    next_seq: u64,
    next_instance: u64,
    /// Keyed by (due, seq) so iteration order is dispatch order
    queue: BTreeMap<(Duration, u64), Pending>,
    due_by_id: HashMap<TimerId, Duration>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time since the scheduler was created
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn allocate_instance(&mut self) -> InstanceId {
        self.next_instance += 1;
        InstanceId(self.next_instance)
    }

    pub fn schedule(&mut self, owner: InstanceId, delay: Duration, event: TimerEvent) -> TimerId {
        self.next_seq += 1;
        let seq = self.next_seq;
        let due = self.now + delay;
        let id = TimerId(seq);

        self.queue.insert((due, seq), Pending { owner, event });
        self.due_by_id.insert(id, due);
        tracing::trace!(owner = owner.0, ?event, ?due, "timer scheduled");
        id
    }

    /// Cancel one timer; false if it already fired or was cancelled
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.due_by_id.remove(&id) {
            Some(due) => self.queue.remove(&(due, id.0)).is_some(),
            None => false,
        }
    }

    /// Cancel every timer owned by `owner`; returns how many were pending
    pub fn cancel_owner(&mut self, owner: InstanceId) -> usize {
        let keys: Vec<(Duration, u64)> = self
            .queue
            .iter()
            .filter(|(_, pending)| pending.owner == owner)
            .map(|(key, _)| *key)
            .collect();

        for key in &keys {
            self.queue.remove(key);
            self.due_by_id.remove(&TimerId(key.1));
        }
        if !keys.is_empty() {
            tracing::debug!(owner = owner.0, cancelled = keys.len(), "timers cancelled");
        }
        keys.len()
    }

    pub fn pending_for(&self, owner: InstanceId) -> usize {
        self.queue.values().filter(|p| p.owner == owner).count()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.due_by_id.contains_key(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.queue.keys().next().map(|(due, _)| *due)
    }

    /// Remove and return the earliest timer due at or before `until`,
    /// moving the clock to its due time.
    pub fn pop_due(&mut self, until: Duration) -> Option<Fired> {
        let (&(due, seq), _) = self.queue.iter().next()?;
        if due > until {
            return None;
        }
        let pending = self.queue.remove(&(due, seq))?;
        let timer = TimerId(seq);
        self.due_by_id.remove(&timer);
        if due > self.now {
            self.now = due;
        }
        Some(Fired {
            timer,
            owner: pending.owner,
            event: pending.event,
            at: due,
        })
    }

    /// Move the clock to `until` once everything due has been dispatched
    pub fn settle(&mut self, until: Duration) {
        if until > self.now {
            self.now = until;
        }
    }
}
