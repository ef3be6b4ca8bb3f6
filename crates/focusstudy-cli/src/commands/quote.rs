use clap::Subcommand;
use focusstudy_core::integrations::keyring_store;
use focusstudy_core::integrations::quotes::API_KEY_ENTRY;
use focusstudy_core::{Event, FocusService, GeminiQuoteClient, SessionType};

#[derive(Subcommand)]
pub enum QuoteAction {
    /// Fetch a quote for a session type
    Fetch {
        #[arg(long, default_value = "work")]
        session: SessionType,
    },
    /// Store the Gemini API key in the OS keyring
    SetKey { key: String },
    /// Remove the stored API key
    ClearKey,
}

pub fn run(action: QuoteAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        QuoteAction::Fetch { session } => {
            let client = GeminiQuoteClient::new();
            let rt = tokio::runtime::Runtime::new()?;
            let quote = rt.block_on(client.fetch(session.into()));
            println!("{}", serde_json::to_string_pretty(&quote)?);
        }
        QuoteAction::SetKey { key } => {
            keyring_store::set(API_KEY_ENTRY, &key)?;
            eprintln!("API key stored");
        }
        QuoteAction::ClearKey => {
            keyring_store::delete(API_KEY_ENTRY)?;
            eprintln!("API key removed");
        }
    }
    Ok(())
}

/// Settle every `QuoteRequested` event in a batch: fetch on a local
/// runtime and feed the result back through the token board. Stale
/// tokens resolve to nothing.
pub fn resolve_quote_requests(
    svc: &mut FocusService,
    events: &[Event],
) -> Result<Vec<Event>, Box<dyn std::error::Error>> {
    let mut resolved = Vec::new();
    let requests: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            Event::QuoteRequested {
                category, token, ..
            } => Some((*category, *token)),
            _ => None,
        })
        .collect();
    if requests.is_empty() {
        return Ok(resolved);
    }

    let client = GeminiQuoteClient::new();
    let rt = tokio::runtime::Runtime::new()?;
    for (category, token) in requests {
        let quote = rt.block_on(client.fetch(category));
        if let Some(updated) = svc.resolve_quote(token, quote) {
            resolved.push(updated);
        }
    }
    Ok(resolved)
}
