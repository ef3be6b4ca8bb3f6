//! The persistence sync contract.
//!
//! Each piece of user-visible state is serialized independently under a
//! stable key. On startup every key is read on its own: an absent or
//! unparsable value silently resets only that field to its documented
//! default and can never fail the load. Writes go through on every
//! relevant state change; there is no transactionality across keys.

use crate::history::HistoryLog;
use crate::prefs::{normalize_hex_color, ClockStyle, Theme};
use crate::storage::Database;
use crate::timer::{SessionDurations, TimerEngine};

/// Stable store keys.
pub mod keys {
    pub const THEME: &str = "theme";
    pub const CLOCK_STYLE: &str = "clock_style";
    pub const DURATIONS: &str = "durations";
    pub const SESSIONS_COMPLETED: &str = "sessions_completed";
    pub const HISTORY: &str = "history";
    pub const PARTICLE_COLOR: &str = "particle_color";
    pub const TIMER_STATE: &str = "timer_state";
}

/// Everything loaded at startup. Every field has survived its own
/// parse-or-default pass.
#[derive(Debug)]
pub struct PersistedState {
    pub theme: Theme,
    pub clock_style: ClockStyle,
    pub durations: SessionDurations,
    pub sessions_completed: u64,
    pub history: HistoryLog,
    pub particle_color: Option<String>,
    /// Live engine snapshot, when one was saved and still parses.
    pub timer_state: Option<TimerEngine>,
}

impl PersistedState {
    pub fn load(db: &Database) -> Self {
        Self {
            theme: read(db, keys::THEME)
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            clock_style: read(db, keys::CLOCK_STYLE)
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            durations: read(db, keys::DURATIONS)
                .and_then(|s| serde_json::from_str::<SessionDurations>(&s).ok())
                .unwrap_or_default()
                .sanitized(),
            sessions_completed: read(db, keys::SESSIONS_COMPLETED)
                .and_then(|s| s.parse().ok())
                .unwrap_or(0),
            history: read(db, keys::HISTORY)
                .and_then(|s| serde_json::from_str(&s).ok())
                .unwrap_or_default(),
            particle_color: read(db, keys::PARTICLE_COLOR)
                .and_then(|s| normalize_hex_color(&s)),
            timer_state: read(db, keys::TIMER_STATE).and_then(|s| {
                serde_json::from_str::<TimerEngine>(&s).ok().map(|mut e| {
                    e.sanitize();
                    e
                })
            }),
        }
    }
}

fn read(db: &Database, key: &str) -> Option<String> {
    match db.kv_get(key) {
        Ok(v) => v,
        Err(e) => {
            log::warn!("failed to read '{key}' from the store: {e}");
            None
        }
    }
}

/// Write one value, logging instead of propagating on failure.
/// Best-effort durability is the contract for this data.
fn write(db: &Database, key: &str, value: &str) {
    if let Err(e) = db.kv_set(key, value) {
        log::warn!("failed to persist '{key}': {e}");
    }
}

pub fn write_theme(db: &Database, theme: Theme) {
    write(db, keys::THEME, theme.as_str());
}

pub fn write_clock_style(db: &Database, style: ClockStyle) {
    write(db, keys::CLOCK_STYLE, style.as_str());
}

pub fn write_durations(db: &Database, durations: &SessionDurations) {
    match serde_json::to_string(durations) {
        Ok(json) => write(db, keys::DURATIONS, &json),
        Err(e) => log::warn!("failed to serialize durations: {e}"),
    }
}

pub fn write_sessions_completed(db: &Database, count: u64) {
    write(db, keys::SESSIONS_COMPLETED, &count.to_string());
}

pub fn write_history(db: &Database, history: &HistoryLog) {
    match serde_json::to_string(history) {
        Ok(json) => write(db, keys::HISTORY, &json),
        Err(e) => log::warn!("failed to serialize history: {e}"),
    }
}

pub fn write_particle_color(db: &Database, color: Option<&str>) {
    match color {
        Some(hex) => write(db, keys::PARTICLE_COLOR, hex),
        None => {
            if let Err(e) = db.kv_delete(keys::PARTICLE_COLOR) {
                log::warn!("failed to clear particle color: {e}");
            }
        }
    }
}

pub fn write_timer_state(db: &Database, engine: &TimerEngine) {
    match serde_json::to_string(engine) {
        Ok(json) => write(db, keys::TIMER_STATE, &json),
        Err(e) => log::warn!("failed to serialize timer state: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::HistoryItem;
    use crate::timer::SessionType;

    fn db() -> Database {
        Database::open_memory().unwrap()
    }

    #[test]
    fn empty_store_loads_all_defaults() {
        let state = PersistedState::load(&db());
        assert_eq!(state.theme, Theme::Dark);
        assert_eq!(state.clock_style, ClockStyle::Serif);
        assert_eq!(state.durations, SessionDurations::default());
        assert_eq!(state.sessions_completed, 0);
        assert!(state.history.is_empty());
        assert!(state.particle_color.is_none());
        assert!(state.timer_state.is_none());
    }

    #[test]
    fn every_key_roundtrips() {
        let db = db();
        let mut durations = SessionDurations::default();
        durations.set_minutes(SessionType::Work, 50);
        let mut history = HistoryLog::default();
        history.push(HistoryItem::new(SessionType::Work, 50));
        history.push(HistoryItem::new(SessionType::ShortBreak, 5));

        write_theme(&db, Theme::Ocean);
        write_clock_style(&db, ClockStyle::Mono);
        write_durations(&db, &durations);
        write_sessions_completed(&db, 9);
        write_history(&db, &history);
        write_particle_color(&db, Some("#ffd700"));

        let state = PersistedState::load(&db);
        assert_eq!(state.theme, Theme::Ocean);
        assert_eq!(state.clock_style, ClockStyle::Mono);
        assert_eq!(state.durations, durations);
        assert_eq!(state.sessions_completed, 9);
        assert_eq!(state.history.len(), 2);
        let loaded: Vec<_> = state.history.iter().map(|i| i.session).collect();
        let original: Vec<_> = history.iter().map(|i| i.session).collect();
        assert_eq!(loaded, original);
        assert_eq!(state.particle_color.as_deref(), Some("#ffd700"));
    }

    #[test]
    fn one_corrupt_key_resets_only_that_field() {
        let db = db();
        write_theme(&db, Theme::Gold);
        write_sessions_completed(&db, 4);
        // Corrupt the durations blob only.
        db.kv_set(keys::DURATIONS, "{not json").unwrap();
        db.kv_set(keys::HISTORY, "\"also wrong\"").unwrap();

        let state = PersistedState::load(&db);
        assert_eq!(state.durations, SessionDurations::default());
        assert!(state.history.is_empty());
        // The healthy keys are untouched.
        assert_eq!(state.theme, Theme::Gold);
        assert_eq!(state.sessions_completed, 4);
    }

    #[test]
    fn out_of_range_stored_durations_are_reclamped() {
        let db = db();
        db.kv_set(keys::DURATIONS, r#"{"work":5,"short-break":300,"long-break":999999}"#)
            .unwrap();
        let state = PersistedState::load(&db);
        assert_eq!(state.durations.work, 60);
        assert_eq!(state.durations.long_break, 10_800);
        assert_eq!(state.durations.short_break, 300);
    }

    #[test]
    fn invalid_particle_color_loads_as_absent() {
        let db = db();
        db.kv_set(keys::PARTICLE_COLOR, "not-a-color").unwrap();
        assert!(PersistedState::load(&db).particle_color.is_none());
    }

    #[test]
    fn clearing_the_particle_color_removes_the_key() {
        let db = db();
        write_particle_color(&db, Some("#abc"));
        write_particle_color(&db, None);
        assert!(db.kv_get(keys::PARTICLE_COLOR).unwrap().is_none());
    }

    #[test]
    fn timer_snapshot_roundtrips() {
        let db = db();
        let mut engine = TimerEngine::new(SessionDurations::default(), 2);
        engine.switch(SessionType::ShortBreak);
        write_timer_state(&db, &engine);

        let state = PersistedState::load(&db);
        let restored = state.timer_state.unwrap();
        assert_eq!(restored.current_session(), SessionType::ShortBreak);
        assert_eq!(restored.sessions_completed(), 2);
    }
}
