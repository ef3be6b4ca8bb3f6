pub mod config;
pub mod history;
pub mod quote;
pub mod timer;

use focusstudy_core::Event;

/// Print a batch of events as pretty JSON, one object per event.
pub fn print_events(events: &[Event]) -> Result<(), Box<dyn std::error::Error>> {
    for event in events {
        println!("{}", serde_json::to_string_pretty(event)?);
    }
    Ok(())
}
