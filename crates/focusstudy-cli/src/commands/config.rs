use clap::Subcommand;
use focusstudy_core::prefs::normalize_hex_color;
use focusstudy_core::{ClockStyle, Database, FocusService, SessionType, Theme};

use super::print_events;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the current preferences as JSON
    Show,
    /// Set a session length in minutes (clamped to 1..=180)
    SetDuration { session: SessionType, minutes: u64 },
    /// Select a theme
    SetTheme { theme: Theme },
    /// Select a clock face style
    SetClockStyle { style: ClockStyle },
    /// Set the custom particle color (hex, e.g. #ffd700)
    SetParticleColor { color: String },
    /// Revert to the theme's own particle color
    ClearParticleColor,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut svc = FocusService::new(db);

    match action {
        ConfigAction::Show => {
            let prefs = serde_json::json!({
                "theme": svc.theme(),
                "clock_style": svc.clock_style(),
                "durations": svc.durations(),
                "particle_color": svc.particle_color(),
            });
            println!("{}", serde_json::to_string_pretty(&prefs)?);
        }
        ConfigAction::SetDuration { session, minutes } => {
            let event = svc.set_duration(session, minutes);
            print_events(&[event])?;
        }
        ConfigAction::SetTheme { theme } => {
            svc.set_theme(theme);
            eprintln!("theme set to {theme}");
        }
        ConfigAction::SetClockStyle { style } => {
            svc.set_clock_style(style);
            eprintln!("clock style set to {style}");
        }
        ConfigAction::SetParticleColor { color } => {
            let hex = normalize_hex_color(&color)
                .ok_or_else(|| format!("not a hex color: {color}"))?;
            svc.set_particle_color(Some(&hex));
            eprintln!("particle color set to {hex}");
        }
        ConfigAction::ClearParticleColor => {
            svc.set_particle_color(None);
            eprintln!("particle color cleared");
        }
    }
    Ok(())
}
