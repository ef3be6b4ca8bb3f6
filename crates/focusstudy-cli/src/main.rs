use clap::{CommandFactory, Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "focusstudy", version, about = "FocusStudy CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Timer control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Preferences and durations
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Session log
    History {
        #[command(subcommand)]
        action: commands::history::HistoryAction,
    },
    /// Motivational quotes
    Quote {
        #[command(subcommand)]
        action: commands::quote::QuoteAction,
    },
    /// Generate shell completions
    Completions { shell: clap_complete::Shell },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Timer { action } => commands::timer::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::History { action } => commands::history::run(action),
        Commands::Quote { action } => commands::quote::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "focusstudy",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
