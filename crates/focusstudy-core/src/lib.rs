//! # FocusStudy Core Library
//!
//! Core logic for the FocusStudy pomodoro timer. The CLI binary (and any
//! GUI shell) is a thin layer over this library: it drives the named
//! operations on [`FocusService`] and renders the events they produce.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a wall-clock-based state machine cycling
//!   work / short-break / long-break sessions; the caller invokes
//!   `tick()` roughly once per second
//! - **Persistence Sync**: flat key-value storage (SQLite) mirroring
//!   preferences, the session log and the live timer, loaded with
//!   per-key silent fallback
//! - **Quotes**: Gemini-backed motivational quote client with a
//!   deterministic fallback and latest-fetch-wins resolution
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: core timer state machine
//! - [`FocusService`]: explicitly constructed application service
//! - [`Database`]: key-value persistence
//! - [`GeminiQuoteClient`]: outbound quote fetches

pub mod error;
pub mod events;
pub mod history;
pub mod integrations;
pub mod prefs;
pub mod service;
pub mod storage;
pub mod timer;

pub use error::{CoreError, QuoteError, StorageError};
pub use events::Event;
pub use history::{HistoryItem, HistoryLog};
pub use integrations::{GeminiQuoteClient, Quote, QuoteBoard, QuoteCategory};
pub use prefs::{ClockStyle, Theme};
pub use service::FocusService;
pub use storage::{Database, PersistedState};
pub use timer::{
    format_clock, Completion, SessionDurations, SessionType, TimerEngine,
    WORK_SESSIONS_BEFORE_LONG_BREAK,
};
