use clap::Subcommand;
use focusstudy_core::{Database, FocusService, SessionType};

use super::{print_events, quote::resolve_quote_requests};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start the countdown
    Start,
    /// Pause the countdown
    Pause,
    /// Restore the current session to its full length
    Reset,
    /// Abandon a break and jump back to work (logs nothing)
    Skip,
    /// Switch to another session type (work, short-break, long-break)
    Switch { session: SessionType },
    /// Tick the countdown, run a due completion, and print the state
    Status,
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut svc = FocusService::new(db);

    let mut events = match action {
        TimerAction::Start => svc.start().into_iter().collect(),
        TimerAction::Pause => svc.pause().into_iter().collect(),
        TimerAction::Reset => svc.reset().into_iter().collect(),
        TimerAction::Skip => svc.skip_to_work().into_iter().collect(),
        TimerAction::Switch { session } => svc.switch_session(session).into_iter().collect(),
        TimerAction::Status => svc.tick(),
    };

    // A completion issues a quote fetch; settle it before reporting.
    let resolved = resolve_quote_requests(&mut svc, &events)?;
    events.extend(resolved);
    events.push(svc.snapshot());
    print_events(&events)
}
