use clap::Subcommand;
use serde_json::json;

use crate::session::{print_json, CliResult, Session};

#[derive(Subcommand)]
pub enum PhraseAction {
    /// List phrases in cycle order
    List,
    /// Switch to a phrase (count restarts at 0)
    Select {
        /// Phrase ID (see `phrase list`)
        id: String,
    },
}

pub async fn run(action: PhraseAction) -> CliResult {
    let session = Session::open().await?;
    let result = match action {
        PhraseAction::List => {
            let engine = &session.engine;
            let current = engine.current_phrase().id;
            let phrases: Vec<_> = engine
                .catalog()
                .phrases()
                .iter()
                .map(|p| {
                    json!({
                        "id": p.id,
                        "display_text": p.display_text,
                        "native_script_text": p.native_script_text,
                        "default_target": p.default_target,
                        "target": engine.target_for(&p.id),
                        "current": p.id == current,
                    })
                })
                .collect();
            print_json(&phrases)
        }
        PhraseAction::Select { id } => match session.engine.select_phrase(&id).await {
            Ok(event) => session.print_event_or_snapshot(event),
            Err(e) => Err(e.into()),
        },
    };
    session.close().await?;
    result
}
