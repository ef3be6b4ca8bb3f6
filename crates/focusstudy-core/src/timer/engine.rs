//! Timer engine implementation.
//!
//! The engine is a wall-clock-based state machine. It does not use
//! internal threads or timers - the caller invokes `tick()` roughly once
//! per second while a session runs.
//!
//! ## Countdown
//!
//! Remaining time is never decremented per tick. Starting a countdown
//! captures an anchor (start timestamp + starting seconds) and each tick
//! recomputes `remaining = max(0, start_seconds - elapsed)`, so imprecise
//! tick scheduling cannot accumulate drift.
//!
//! ## Completion
//!
//! A tick that reaches zero leaves the engine at `(session, inactive, 0)`
//! and returns `CountdownExpired`. The completion routine itself runs on
//! the next call to `complete_if_due()`, which serializes it with any
//! in-flight switch through the transition guard. Completion resets the
//! countdown to the next session's duration, so the terminal state
//! disappears and the routine can fire at most once per expiry.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::session::{SessionDurations, SessionType, WORK_SESSIONS_BEFORE_LONG_BREAK};
use crate::events::Event;

/// How long structural transitions stay locked out after one lands, in
/// milliseconds. Sized for a fade-style visual handoff in a renderer.
pub const TRANSITION_GUARD_MS: u64 = 400;

/// Drift-correction anchor, present only while the countdown runs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct CountdownAnchor {
    /// Timestamp (ms since epoch) when the countdown was last (re)started.
    started_epoch_ms: u64,
    /// `seconds_remaining` captured at that moment.
    start_seconds: u64,
}

/// Outcome of the completion routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    /// The session type that just finished.
    pub finished: SessionType,
    /// Its configured length in whole minutes (the history record value).
    pub duration_minutes: u64,
    /// The session type the engine advanced to.
    pub next: SessionType,
    /// Counter after the completion (only work sessions increment it).
    pub sessions_completed: u64,
    /// True when this completion earned a long break.
    pub celebrate: bool,
}

/// Core timer state machine.
///
/// All mutation goes through the transition methods; each is an atomic
/// read-modify-write over the whole record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerEngine {
    durations: SessionDurations,
    current_session: SessionType,
    seconds_remaining: u64,
    is_active: bool,
    sessions_completed: u64,
    #[serde(default)]
    anchor: Option<CountdownAnchor>,
    /// Transition guard deadline (ms since epoch). Structural transitions
    /// observed before the deadline are dropped. Plain data, so nothing
    /// stray can fire after the owner is torn down.
    #[serde(default)]
    pub(crate) guard_until_ms: Option<u64>,
}

impl TimerEngine {
    /// Create an engine at `(work, inactive, durations.work)` with a
    /// previously persisted completion counter.
    pub fn new(durations: SessionDurations, sessions_completed: u64) -> Self {
        Self {
            seconds_remaining: durations.work,
            durations,
            current_session: SessionType::Work,
            is_active: false,
            sessions_completed,
            anchor: None,
            guard_until_ms: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn current_session(&self) -> SessionType {
        self.current_session
    }

    pub fn seconds_remaining(&self) -> u64 {
        self.seconds_remaining
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn sessions_completed(&self) -> u64 {
        self.sessions_completed
    }

    pub fn durations(&self) -> &SessionDurations {
        &self.durations
    }

    /// True while the engine is at the terminal `(.., inactive, 0)` state
    /// and a completion is pending.
    pub fn completion_pending(&self) -> bool {
        self.seconds_remaining == 0 && !self.is_active
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        self.start_at(now_ms())
    }

    pub(crate) fn start_at(&mut self, now: u64) -> Option<Event> {
        if self.is_active || self.seconds_remaining == 0 {
            return None;
        }
        self.is_active = true;
        self.anchor = Some(CountdownAnchor {
            started_epoch_ms: now,
            start_seconds: self.seconds_remaining,
        });
        Some(Event::SessionStarted {
            session: self.current_session,
            seconds_remaining: self.seconds_remaining,
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        self.pause_at(now_ms())
    }

    pub(crate) fn pause_at(&mut self, now: u64) -> Option<Event> {
        if !self.is_active {
            return None;
        }
        self.seconds_remaining = self.remaining_at(now);
        self.is_active = false;
        self.anchor = None;
        Some(Event::SessionPaused {
            session: self.current_session,
            seconds_remaining: self.seconds_remaining,
            at: Utc::now(),
        })
    }

    /// Call roughly once per second while active. Returns
    /// `CountdownExpired` exactly when the countdown reaches zero.
    pub fn tick(&mut self) -> Option<Event> {
        self.tick_at(now_ms())
    }

    pub(crate) fn tick_at(&mut self, now: u64) -> Option<Event> {
        if !self.is_active {
            return None;
        }
        self.seconds_remaining = self.remaining_at(now);
        if self.seconds_remaining == 0 {
            self.is_active = false;
            self.anchor = None;
            return Some(Event::CountdownExpired {
                session: self.current_session,
                at: Utc::now(),
            });
        }
        None
    }

    /// Run the completion routine if one is pending and no other
    /// structural transition is in flight.
    ///
    /// Appending the history record and firing effects belong to the
    /// caller; the engine only advances the cycle.
    pub fn complete_if_due(&mut self) -> Option<Completion> {
        self.complete_if_due_at(now_ms())
    }

    pub(crate) fn complete_if_due_at(&mut self, now: u64) -> Option<Completion> {
        if !self.completion_pending() || self.guard_active(now) {
            return None;
        }

        let finished = self.current_session;
        let duration_minutes = self.durations.get(finished) / 60;

        if finished.is_work() {
            self.sessions_completed += 1;
        }
        let earned_long_break = finished.is_work()
            && self.sessions_completed > 0
            && self.sessions_completed % WORK_SESSIONS_BEFORE_LONG_BREAK == 0;
        let next = if !finished.is_work() {
            SessionType::Work
        } else if earned_long_break {
            SessionType::LongBreak
        } else {
            SessionType::ShortBreak
        };

        self.current_session = next;
        self.seconds_remaining = self.durations.get(next);
        self.is_active = false;
        self.anchor = None;
        self.guard_until_ms = Some(now + TRANSITION_GUARD_MS);

        Some(Completion {
            finished,
            duration_minutes,
            next,
            sessions_completed: self.sessions_completed,
            celebrate: earned_long_break,
        })
    }

    /// Manual switch to another session type. Dropped when the target is
    /// already displayed or a transition is in flight.
    pub fn switch(&mut self, to: SessionType) -> Option<Event> {
        self.switch_at(to, now_ms())
    }

    pub(crate) fn switch_at(&mut self, to: SessionType, now: u64) -> Option<Event> {
        if to == self.current_session || self.guard_active(now) {
            return None;
        }
        let from = self.current_session;
        self.apply_session(to, now);
        Some(Event::SessionSwitched {
            from,
            to,
            seconds_remaining: self.seconds_remaining,
            at: Utc::now(),
        })
    }

    /// Abandon a break and jump back to work. Logs nothing and leaves the
    /// completion counter untouched; meaningless while already at work.
    pub fn skip_to_work(&mut self) -> Option<Event> {
        self.skip_to_work_at(now_ms())
    }

    pub(crate) fn skip_to_work_at(&mut self, now: u64) -> Option<Event> {
        if self.current_session.is_work() || self.guard_active(now) {
            return None;
        }
        let from = self.current_session;
        self.apply_session(SessionType::Work, now);
        Some(Event::SkippedToWork {
            from,
            at: Utc::now(),
        })
    }

    /// Restore the current session to its full configured length.
    pub fn reset(&mut self) -> Option<Event> {
        self.is_active = false;
        self.anchor = None;
        self.seconds_remaining = self.durations.get(self.current_session);
        Some(Event::SessionReset {
            session: self.current_session,
            seconds_remaining: self.seconds_remaining,
            at: Utc::now(),
        })
    }

    /// Update a session length from minute input (clamped to `[1, 180]`).
    ///
    /// When the edited type is currently displayed and idle, the countdown
    /// adopts the new value immediately; otherwise it applies on the next
    /// reset or switch into that type. The terminal `(.., inactive, 0)`
    /// state is left alone so a pending completion still fires.
    pub fn set_duration(&mut self, session: SessionType, minutes: u64) -> Event {
        let secs = self.durations.set_minutes(session, minutes);
        if self.current_session == session && !self.is_active && !self.completion_pending() {
            self.seconds_remaining = secs;
        }
        Event::DurationChanged {
            session,
            seconds: secs,
            at: Utc::now(),
        }
    }

    /// Zero the completion counter. Paired with clearing the history log.
    pub fn clear_completed(&mut self) {
        self.sessions_completed = 0;
    }

    /// Re-clamp loaded durations and drop a stale running countdown.
    /// Applied to snapshots restored from persistence.
    pub fn sanitize(&mut self) {
        self.durations = self.durations.sanitized();
        let full = self.durations.get(self.current_session);
        if self.seconds_remaining > full {
            self.seconds_remaining = full;
        }
        // An active flag without its anchor can never advance; demote
        // the snapshot to paused.
        if self.anchor.is_none() {
            self.is_active = false;
        }
        if !self.is_active {
            self.anchor = None;
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn remaining_at(&self, now: u64) -> u64 {
        match self.anchor {
            Some(a) => {
                let elapsed_secs = now.saturating_sub(a.started_epoch_ms) / 1000;
                a.start_seconds.saturating_sub(elapsed_secs)
            }
            None => self.seconds_remaining,
        }
    }

    fn apply_session(&mut self, to: SessionType, now: u64) {
        self.current_session = to;
        self.seconds_remaining = self.durations.get(to);
        self.is_active = false;
        self.anchor = None;
        self.guard_until_ms = Some(now + TRANSITION_GUARD_MS);
    }

    fn guard_active(&self, now: u64) -> bool {
        matches!(self.guard_until_ms, Some(until) if now < until)
    }
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
