//! Pairing save-completed callbacks with the triggers that caused them.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use clipwatch_models::TriggerRecord;
use tracing::warn;

use crate::config::CorrelationMode;

#[derive(Debug)]
enum Pending {
    Latest(Option<TriggerRecord>),
    Queue {
        records: VecDeque<TriggerRecord>,
        capacity: usize,
    },
}

/// Pending trigger storage shared by the event loop (writer) and the
/// capture callback thread (reader).
#[derive(Debug)]
pub struct TriggerSlot {
    pending: Mutex<Pending>,
}

impl TriggerSlot {
    pub fn new(mode: CorrelationMode) -> Self {
        let pending = match mode {
            CorrelationMode::LastWins => Pending::Latest(None),
            CorrelationMode::Fifo { capacity } => Pending::Queue {
                records: VecDeque::new(),
                capacity: capacity.max(1),
            },
        };
        Self {
            pending: Mutex::new(pending),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Pending> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores a new trigger. In last-wins mode it replaces the previous one.
    pub fn record(&self, record: TriggerRecord) {
        match &mut *self.lock() {
            Pending::Latest(slot) => *slot = Some(record),
            Pending::Queue { records, capacity } => {
                if records.len() >= *capacity {
                    if let Some(dropped) = records.pop_front() {
                        warn!(trigger = %dropped.id, "Pending trigger queue full, dropping oldest");
                    }
                }
                records.push_back(record);
            }
        }
    }

    /// The trigger a newly saved clip belongs to.
    ///
    /// Last-wins mode returns a copy and leaves the slot as is; FIFO mode
    /// removes the oldest pending trigger.
    pub fn take_for_artifact(&self) -> Option<TriggerRecord> {
        match &mut *self.lock() {
            Pending::Latest(slot) => slot.clone(),
            Pending::Queue { records, .. } => records.pop_front(),
        }
    }

    /// Most recent trigger still held, without consuming it.
    pub fn latest(&self) -> Option<TriggerRecord> {
        match &*self.lock() {
            Pending::Latest(slot) => slot.clone(),
            Pending::Queue { records, .. } => records.back().cloned(),
        }
    }

    /// Number of triggers held.
    pub fn pending(&self) -> usize {
        match &*self.lock() {
            Pending::Latest(slot) => usize::from(slot.is_some()),
            Pending::Queue { records, .. } => records.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipwatch_models::ChatEvent;

    fn trigger(chatter: &str, keyword: &str) -> TriggerRecord {
        TriggerRecord::from_event(&ChatEvent::new("s", chatter, keyword), keyword)
    }

    #[test]
    fn test_last_wins_overwrites_and_is_not_cleared() {
        let slot = TriggerSlot::new(CorrelationMode::LastWins);
        assert!(slot.take_for_artifact().is_none());

        slot.record(trigger("alice", "lock"));
        slot.record(trigger("bob", "ssd"));
        assert_eq!(slot.pending(), 1);

        assert_eq!(slot.take_for_artifact().unwrap().chatter, "bob");
        assert_eq!(slot.take_for_artifact().unwrap().chatter, "bob");
    }

    #[test]
    fn test_fifo_pairs_in_order() {
        let slot = TriggerSlot::new(CorrelationMode::Fifo { capacity: 8 });
        slot.record(trigger("alice", "lock"));
        slot.record(trigger("bob", "ssd"));
        assert_eq!(slot.latest().unwrap().chatter, "bob");

        assert_eq!(slot.take_for_artifact().unwrap().chatter, "alice");
        assert_eq!(slot.take_for_artifact().unwrap().chatter, "bob");
        assert!(slot.take_for_artifact().is_none());
    }

    #[test]
    fn test_fifo_drops_oldest_when_full() {
        let slot = TriggerSlot::new(CorrelationMode::Fifo { capacity: 2 });
        slot.record(trigger("a", "mine"));
        slot.record(trigger("b", "mine"));
        slot.record(trigger("c", "mine"));

        assert_eq!(slot.pending(), 2);
        assert_eq!(slot.take_for_artifact().unwrap().chatter, "b");
    }
}
