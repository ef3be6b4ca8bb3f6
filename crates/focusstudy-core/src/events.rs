use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::integrations::quotes::{Quote, QuoteCategory};
use crate::prefs::{ClockStyle, Theme};
use crate::timer::SessionType;

/// Every state change in the core produces an Event.
///
/// The presentation layer consumes these instead of reaching into the
/// engine: `SessionCompleted` is the chime trigger, and its `celebrate`
/// flag is the confetti trigger for an earned long break.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        session: SessionType,
        seconds_remaining: u64,
        at: DateTime<Utc>,
    },
    SessionPaused {
        session: SessionType,
        seconds_remaining: u64,
        at: DateTime<Utc>,
    },
    SessionReset {
        session: SessionType,
        seconds_remaining: u64,
        at: DateTime<Utc>,
    },
    /// The countdown hit zero. The completion routine runs on the next
    /// observation, not inside the tick itself.
    CountdownExpired {
        session: SessionType,
        at: DateTime<Utc>,
    },
    SessionCompleted {
        finished: SessionType,
        next: SessionType,
        duration_minutes: u64,
        sessions_completed: u64,
        celebrate: bool,
        at: DateTime<Utc>,
    },
    SessionSwitched {
        from: SessionType,
        to: SessionType,
        seconds_remaining: u64,
        at: DateTime<Utc>,
    },
    SkippedToWork {
        from: SessionType,
        at: DateTime<Utc>,
    },
    DurationChanged {
        session: SessionType,
        seconds: u64,
        at: DateTime<Utc>,
    },
    HistoryCleared {
        at: DateTime<Utc>,
    },
    /// An asynchronous quote fetch was issued. Only a resolution carrying
    /// the most recently issued token is applied.
    QuoteRequested {
        category: QuoteCategory,
        token: u64,
        at: DateTime<Utc>,
    },
    QuoteUpdated {
        quote: Quote,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        session: SessionType,
        is_active: bool,
        seconds_remaining: u64,
        clock: String,
        sessions_completed: u64,
        theme: Theme,
        clock_style: ClockStyle,
        particle_color: Option<String>,
        quote: Quote,
        quote_loading: bool,
        at: DateTime<Utc>,
    },
}
