//! Append-only session log.
//!
//! Records are created by the completion routine only; a manual skip or
//! switch never logs. The single removal path is the bulk clear, which
//! the service pairs with zeroing the completion counter.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::timer::SessionType;

/// One completed session. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryItem {
    pub id: Uuid,
    /// Creation time, epoch milliseconds.
    pub timestamp: i64,
    #[serde(rename = "type")]
    pub session: SessionType,
    pub duration_minutes: u64,
}

impl HistoryItem {
    pub fn new(session: SessionType, duration_minutes: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now().timestamp_millis(),
            session,
            duration_minutes,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryLog {
    items: Vec<HistoryItem>,
}

impl HistoryLog {
    pub fn push(&mut self, item: HistoryItem) {
        self.items.push(item);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Records in insertion order (oldest first).
    pub fn iter(&self) -> impl Iterator<Item = &HistoryItem> {
        self.items.iter()
    }

    /// Display order: most recent first.
    pub fn recent(&self) -> impl Iterator<Item = &HistoryItem> {
        self.items.iter().rev()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recent_reverses_insertion_order() {
        let mut log = HistoryLog::default();
        log.push(HistoryItem::new(SessionType::Work, 25));
        log.push(HistoryItem::new(SessionType::ShortBreak, 5));
        let recent: Vec<_> = log.recent().map(|i| i.session).collect();
        assert_eq!(recent, [SessionType::ShortBreak, SessionType::Work]);
    }

    #[test]
    fn clear_empties_the_log() {
        let mut log = HistoryLog::default();
        log.push(HistoryItem::new(SessionType::LongBreak, 15));
        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn items_serialize_with_the_stable_type_key() {
        let item = HistoryItem::new(SessionType::ShortBreak, 5);
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "short-break");
        assert_eq!(json["duration_minutes"], 5);
    }
}
