//! Application service: the single owner of timer state, history,
//! preferences and the quote board.
//!
//! Collaborators are constructed and injected explicitly — there is no
//! module-level singleton. Every mutation goes through a named operation
//! that updates the in-memory record and writes the affected keys
//! through to the store; persistence failures degrade to log lines.
//!
//! The service is the renderer's whole surface: reads are plain getters
//! plus a snapshot event, writes are the operations below, and
//! completion side effects (chime, celebration, quote refresh) surface
//! as events for the caller to act on.

use chrono::Utc;

use crate::events::Event;
use crate::history::{HistoryItem, HistoryLog};
use crate::integrations::quotes::{Quote, QuoteBoard, QuoteCategory};
use crate::prefs::{normalize_hex_color, ClockStyle, Theme};
use crate::storage::{sync, Database, PersistedState};
use crate::timer::{format_clock, SessionDurations, SessionType, TimerEngine};

pub struct FocusService {
    db: Database,
    engine: TimerEngine,
    history: HistoryLog,
    theme: Theme,
    clock_style: ClockStyle,
    particle_color: Option<String>,
    quotes: QuoteBoard,
}

impl FocusService {
    /// Load all persisted state from the store. Missing or corrupt
    /// fields fall back to their defaults; this never fails.
    pub fn new(db: Database) -> Self {
        let state = PersistedState::load(&db);
        let engine = state
            .timer_state
            .unwrap_or_else(|| TimerEngine::new(state.durations, state.sessions_completed));
        Self {
            db,
            engine,
            history: state.history,
            theme: state.theme,
            clock_style: state.clock_style,
            particle_color: state.particle_color,
            quotes: QuoteBoard::default(),
        }
    }

    // ── Timer operations ─────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        let event = self.engine.start();
        self.persist_timer();
        event
    }

    pub fn pause(&mut self) -> Option<Event> {
        let event = self.engine.pause();
        self.persist_timer();
        event
    }

    pub fn reset(&mut self) -> Option<Event> {
        let event = self.engine.reset();
        self.persist_timer();
        event
    }

    pub fn switch_session(&mut self, to: SessionType) -> Option<Event> {
        let event = self.engine.switch(to);
        self.persist_timer();
        event
    }

    pub fn skip_to_work(&mut self) -> Option<Event> {
        let event = self.engine.skip_to_work();
        self.persist_timer();
        event
    }

    pub fn set_duration(&mut self, session: SessionType, minutes: u64) -> Event {
        let event = self.engine.set_duration(session, minutes);
        sync::write_durations(&self.db, self.engine.durations());
        self.persist_timer();
        event
    }

    /// Advance the countdown and, when the terminal state is observed,
    /// run the completion routine: log the finished session, advance the
    /// cycle, and issue a quote fetch for the finished type.
    pub fn tick(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        if let Some(expired) = self.engine.tick() {
            events.push(expired);
        }

        if let Some(c) = self.engine.complete_if_due() {
            self.history
                .push(HistoryItem::new(c.finished, c.duration_minutes));
            sync::write_history(&self.db, &self.history);
            sync::write_sessions_completed(&self.db, c.sessions_completed);

            events.push(Event::SessionCompleted {
                finished: c.finished,
                next: c.next,
                duration_minutes: c.duration_minutes,
                sessions_completed: c.sessions_completed,
                celebrate: c.celebrate,
                at: Utc::now(),
            });
            events.push(self.issue_quote_request(c.finished.into()));
        }

        self.persist_timer();
        events
    }

    // ── Quotes ───────────────────────────────────────────────────────

    /// Issue a quote fetch for a category and return the request event
    /// carrying its token.
    pub fn issue_quote_request(&mut self, category: QuoteCategory) -> Event {
        Event::QuoteRequested {
            category,
            token: self.quotes.begin(),
            at: Utc::now(),
        }
    }

    /// Apply a resolved fetch. Stale tokens are dropped so the displayed
    /// quote always matches the most recently initiated request.
    pub fn resolve_quote(&mut self, token: u64, quote: Quote) -> Option<Event> {
        if self.quotes.resolve(token, quote.clone()) {
            Some(Event::QuoteUpdated {
                quote,
                at: Utc::now(),
            })
        } else {
            None
        }
    }

    // ── Preferences ──────────────────────────────────────────────────

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        sync::write_theme(&self.db, theme);
    }

    pub fn set_clock_style(&mut self, style: ClockStyle) {
        self.clock_style = style;
        sync::write_clock_style(&self.db, style);
    }

    /// Set or clear the custom particle color. A string that is not a
    /// valid hex color is ignored.
    pub fn set_particle_color(&mut self, color: Option<&str>) {
        match color {
            Some(raw) => match normalize_hex_color(raw) {
                Some(hex) => {
                    sync::write_particle_color(&self.db, Some(&hex));
                    self.particle_color = Some(hex);
                }
                None => log::warn!("ignoring invalid particle color: {raw}"),
            },
            None => {
                sync::write_particle_color(&self.db, None);
                self.particle_color = None;
            }
        }
    }

    // ── History ──────────────────────────────────────────────────────

    /// Empty the log and zero the completion counter together. The two
    /// always reset as a pair.
    pub fn clear_history(&mut self) -> Event {
        self.history.clear();
        self.engine.clear_completed();
        sync::write_history(&self.db, &self.history);
        sync::write_sessions_completed(&self.db, 0);
        self.persist_timer();
        Event::HistoryCleared { at: Utc::now() }
    }

    // ── Read surface ─────────────────────────────────────────────────

    pub fn clock(&self) -> String {
        format_clock(self.engine.seconds_remaining())
    }

    pub fn is_active(&self) -> bool {
        self.engine.is_active()
    }

    pub fn current_session(&self) -> SessionType {
        self.engine.current_session()
    }

    pub fn durations(&self) -> &SessionDurations {
        self.engine.durations()
    }

    pub fn sessions_completed(&self) -> u64 {
        self.engine.sessions_completed()
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn clock_style(&self) -> ClockStyle {
        self.clock_style
    }

    pub fn particle_color(&self) -> Option<&str> {
        self.particle_color.as_deref()
    }

    pub fn quote(&self) -> &Quote {
        self.quotes.current()
    }

    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            session: self.engine.current_session(),
            is_active: self.engine.is_active(),
            seconds_remaining: self.engine.seconds_remaining(),
            clock: self.clock(),
            sessions_completed: self.engine.sessions_completed(),
            theme: self.theme,
            clock_style: self.clock_style,
            particle_color: self.particle_color.clone(),
            quote: self.quotes.current().clone(),
            quote_loading: self.quotes.is_loading(),
            at: Utc::now(),
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn persist_timer(&self) {
        sync::write_timer_state(&self.db, &self.engine);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::keys;

    fn service() -> FocusService {
        FocusService::new(Database::open_memory().unwrap())
    }

    /// Drive the engine to the terminal `(.., inactive, 0)` state by
    /// anchoring the countdown far in the past.
    fn expire_current_session(svc: &mut FocusService) {
        svc.engine.start_at(1);
        svc.engine.tick_at(20_000_000_000);
    }

    #[test]
    fn completion_logs_persists_and_requests_a_quote() {
        let mut svc = service();
        expire_current_session(&mut svc);

        let events = svc.tick();
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::SessionCompleted { finished: SessionType::Work, next: SessionType::ShortBreak, celebrate: false, .. })));
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::QuoteRequested { category: QuoteCategory::Work, .. })));

        assert_eq!(svc.sessions_completed(), 1);
        assert_eq!(svc.history().len(), 1);
        assert_eq!(svc.current_session(), SessionType::ShortBreak);

        // Write-through happened for both keys.
        assert_eq!(
            svc.db.kv_get(keys::SESSIONS_COMPLETED).unwrap().unwrap(),
            "1"
        );
        let stored: Vec<HistoryItem> =
            serde_json::from_str(&svc.db.kv_get(keys::HISTORY).unwrap().unwrap()).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].session, SessionType::Work);

        // The terminal state is consumed; another tick completes nothing.
        assert!(svc.tick().is_empty());
        assert_eq!(svc.history().len(), 1);
    }

    #[test]
    fn break_completion_keeps_the_counter() {
        let mut svc = service();
        svc.switch_session(SessionType::ShortBreak);
        expire_current_session(&mut svc);
        svc.engine.guard_until_ms = None;

        let events = svc.tick();
        assert!(events.iter().any(|e| matches!(
            e,
            Event::SessionCompleted {
                finished: SessionType::ShortBreak,
                next: SessionType::Work,
                ..
            }
        )));
        assert_eq!(svc.sessions_completed(), 0);
        assert_eq!(svc.history().len(), 1);
    }

    #[test]
    fn clear_history_resets_log_and_counter_together() {
        let mut svc = service();
        expire_current_session(&mut svc);
        svc.tick();
        assert_eq!(svc.history().len(), 1);
        assert_eq!(svc.sessions_completed(), 1);

        svc.clear_history();
        assert!(svc.history().is_empty());
        assert_eq!(svc.sessions_completed(), 0);
        assert_eq!(
            svc.db.kv_get(keys::SESSIONS_COMPLETED).unwrap().unwrap(),
            "0"
        );
        assert_eq!(svc.db.kv_get(keys::HISTORY).unwrap().unwrap(), "[]");
    }

    #[test]
    fn stale_quote_resolution_is_dropped() {
        let mut svc = service();
        let first = match svc.issue_quote_request(QuoteCategory::Work) {
            Event::QuoteRequested { token, .. } => token,
            _ => unreachable!(),
        };
        let second = match svc.issue_quote_request(QuoteCategory::Break) {
            Event::QuoteRequested { token, .. } => token,
            _ => unreachable!(),
        };

        let stale = Quote {
            text: "old".into(),
            author: "a".into(),
        };
        assert!(svc.resolve_quote(first, stale).is_none());
        assert_eq!(svc.quote(), &Quote::initial());

        let fresh = QuoteCategory::Break.fallback();
        assert!(svc.resolve_quote(second, fresh.clone()).is_some());
        assert_eq!(svc.quote(), &fresh);
    }

    #[test]
    fn preferences_write_through_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("focusstudy.db");
        {
            let mut svc = FocusService::new(Database::open_at(&path).unwrap());
            svc.set_theme(Theme::Sunset);
            svc.set_clock_style(ClockStyle::Rounded);
            svc.set_particle_color(Some("#FFD700"));
            svc.set_duration(SessionType::Work, 50);
        }
        let svc = FocusService::new(Database::open_at(&path).unwrap());
        assert_eq!(svc.theme(), Theme::Sunset);
        assert_eq!(svc.clock_style(), ClockStyle::Rounded);
        assert_eq!(svc.particle_color(), Some("#ffd700"));
        assert_eq!(svc.clock(), "50:00");
    }

    #[test]
    fn invalid_particle_color_is_ignored() {
        let mut svc = service();
        svc.set_particle_color(Some("#ffd700"));
        svc.set_particle_color(Some("chartreuse"));
        assert_eq!(svc.particle_color(), Some("#ffd700"));
        svc.set_particle_color(None);
        assert_eq!(svc.particle_color(), None);
    }

    #[test]
    fn timer_state_survives_a_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("focusstudy.db");
        {
            let mut svc = FocusService::new(Database::open_at(&path).unwrap());
            svc.switch_session(SessionType::LongBreak);
        }
        let svc = FocusService::new(Database::open_at(&path).unwrap());
        assert_eq!(svc.current_session(), SessionType::LongBreak);
        assert_eq!(svc.clock(), "15:00");
    }

    #[test]
    fn snapshot_reflects_the_whole_read_surface() {
        let svc = service();
        match svc.snapshot() {
            Event::StateSnapshot {
                session,
                is_active,
                clock,
                sessions_completed,
                quote,
                ..
            } => {
                assert_eq!(session, SessionType::Work);
                assert!(!is_active);
                assert_eq!(clock, "25:00");
                assert_eq!(sessions_completed, 0);
                assert_eq!(quote, Quote::initial());
            }
            _ => panic!("expected StateSnapshot"),
        }
    }
}
