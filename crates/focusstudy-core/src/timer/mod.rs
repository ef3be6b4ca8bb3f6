mod engine;
mod session;

pub use engine::{Completion, TimerEngine, TRANSITION_GUARD_MS};
pub use session::{
    SessionDurations, SessionType, MAX_SESSION_SECS, MIN_SESSION_SECS,
    WORK_SESSIONS_BEFORE_LONG_BREAK,
};

/// Format a second count as the `mm:ss` clock face.
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
