use chrono::{TimeZone, Utc};
use clap::Subcommand;
use focusstudy_core::{Database, FocusService};

use super::print_events;

#[derive(Subcommand)]
pub enum HistoryAction {
    /// Show the session log, most recent first
    List {
        #[arg(long)]
        json: bool,
    },
    /// Clear the log and reset the completion counter
    Clear,
}

pub fn run(action: HistoryAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut svc = FocusService::new(db);

    match action {
        HistoryAction::List { json } => {
            if json {
                let items: Vec<_> = svc.history().recent().collect();
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else {
                if svc.history().is_empty() {
                    eprintln!("no sessions logged yet");
                }
                for item in svc.history().recent() {
                    let when = Utc
                        .timestamp_millis_opt(item.timestamp)
                        .single()
                        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                        .unwrap_or_else(|| "?".into());
                    println!("{when}  {:<11}  {}m", item.session.as_str(), item.duration_minutes);
                }
                eprintln!("{} work sessions completed", svc.sessions_completed());
            }
        }
        HistoryAction::Clear => {
            let event = svc.clear_history();
            print_events(&[event])?;
        }
    }
    Ok(())
}
