use serde::{Deserialize, Serialize};

/// Lower clamp for a configured session length (1 minute).
pub const MIN_SESSION_SECS: u64 = 60;
/// Upper clamp for a configured session length (180 minutes).
pub const MAX_SESSION_SECS: u64 = 10_800;
/// Work sessions finished before the cycle earns a long break.
pub const WORK_SESSIONS_BEFORE_LONG_BREAK: u64 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionType {
    Work,
    ShortBreak,
    LongBreak,
}

impl SessionType {
    pub const ALL: [SessionType; 3] = [
        SessionType::Work,
        SessionType::ShortBreak,
        SessionType::LongBreak,
    ];

    /// Stable identifier used for persistence and CLI arguments.
    pub fn as_str(self) -> &'static str {
        match self {
            SessionType::Work => "work",
            SessionType::ShortBreak => "short-break",
            SessionType::LongBreak => "long-break",
        }
    }

    pub fn is_work(self) -> bool {
        self == SessionType::Work
    }
}

impl std::fmt::Display for SessionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SessionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "work" => Ok(SessionType::Work),
            "short-break" => Ok(SessionType::ShortBreak),
            "long-break" => Ok(SessionType::LongBreak),
            other => Err(format!("unknown session type: {other}")),
        }
    }
}

/// Per-type session lengths, in seconds.
///
/// Every write path clamps to `[MIN_SESSION_SECS, MAX_SESSION_SECS]`,
/// so a loaded or constructed value is always usable as a countdown
/// starting point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDurations {
    #[serde(default = "default_work_secs")]
    pub work: u64,
    #[serde(rename = "short-break", default = "default_short_break_secs")]
    pub short_break: u64,
    #[serde(rename = "long-break", default = "default_long_break_secs")]
    pub long_break: u64,
}

fn default_work_secs() -> u64 {
    25 * 60
}
fn default_short_break_secs() -> u64 {
    5 * 60
}
fn default_long_break_secs() -> u64 {
    15 * 60
}

impl Default for SessionDurations {
    fn default() -> Self {
        Self {
            work: default_work_secs(),
            short_break: default_short_break_secs(),
            long_break: default_long_break_secs(),
        }
    }
}

impl SessionDurations {
    pub fn get(&self, session: SessionType) -> u64 {
        match session {
            SessionType::Work => self.work,
            SessionType::ShortBreak => self.short_break,
            SessionType::LongBreak => self.long_break,
        }
    }

    /// Set a session length from minute-denominated input.
    ///
    /// Minutes are clamped to `[1, 180]` before conversion; the clamped
    /// second count is returned.
    pub fn set_minutes(&mut self, session: SessionType, minutes: u64) -> u64 {
        let secs = minutes.clamp(1, 180).saturating_mul(60);
        self.set_secs(session, secs)
    }

    fn set_secs(&mut self, session: SessionType, secs: u64) -> u64 {
        let secs = clamp_secs(secs);
        match session {
            SessionType::Work => self.work = secs,
            SessionType::ShortBreak => self.short_break = secs,
            SessionType::LongBreak => self.long_break = secs,
        }
        secs
    }

    /// Re-clamp every field. Applied after deserializing persisted data
    /// so an out-of-range stored value cannot leak into the engine.
    pub fn sanitized(mut self) -> Self {
        self.work = clamp_secs(self.work);
        self.short_break = clamp_secs(self.short_break);
        self.long_break = clamp_secs(self.long_break);
        self
    }
}

fn clamp_secs(secs: u64) -> u64 {
    secs.clamp(MIN_SESSION_SECS, MAX_SESSION_SECS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn defaults_match_the_classic_cycle() {
        let d = SessionDurations::default();
        assert_eq!(d.work, 1500);
        assert_eq!(d.short_break, 300);
        assert_eq!(d.long_break, 900);
    }

    #[test]
    fn set_minutes_clamps_low_and_high() {
        let mut d = SessionDurations::default();
        assert_eq!(d.set_minutes(SessionType::Work, 0), 60);
        assert_eq!(d.set_minutes(SessionType::Work, 500), 10_800);
        assert_eq!(d.set_minutes(SessionType::ShortBreak, 7), 420);
        assert_eq!(d.short_break, 420);
    }

    #[test]
    fn sanitized_repairs_out_of_range_values() {
        let d = SessionDurations {
            work: 5,
            short_break: 999_999,
            long_break: 900,
        }
        .sanitized();
        assert_eq!(d.work, MIN_SESSION_SECS);
        assert_eq!(d.short_break, MAX_SESSION_SECS);
        assert_eq!(d.long_break, 900);
    }

    #[test]
    fn serde_uses_kebab_case_keys() {
        let d = SessionDurations::default();
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["work"], 1500);
        assert_eq!(json["short-break"], 300);
        assert_eq!(json["long-break"], 900);
    }

    #[test]
    fn session_type_roundtrips_through_str() {
        for s in SessionType::ALL {
            assert_eq!(s.as_str().parse::<SessionType>().unwrap(), s);
        }
        assert!("lunch".parse::<SessionType>().is_err());
    }

    proptest! {
        #[test]
        fn stored_duration_is_always_in_range(minutes in 0u64..100_000) {
            let mut d = SessionDurations::default();
            let secs = d.set_minutes(SessionType::LongBreak, minutes);
            prop_assert!(secs >= MIN_SESSION_SECS && secs <= MAX_SESSION_SECS);
            prop_assert_eq!(d.long_break, secs);
        }

        #[test]
        fn in_range_minutes_store_exactly(minutes in 1u64..=180) {
            let mut d = SessionDurations::default();
            let secs = d.set_minutes(SessionType::Work, minutes);
            prop_assert_eq!(secs, minutes * 60);
        }
    }
}
