use clap::Subcommand;
use serde_json::json;

use crate::session::{print_json, CliResult, Session};

#[derive(Subcommand)]
pub enum TargetAction {
    /// Set a custom target for the current phrase (1-99999)
    Set {
        /// New target
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// Show the current phrase's target
    Show,
    /// Drop the custom target and use the phrase default
    Clear,
}

pub async fn run(action: TargetAction) -> CliResult {
    let session = Session::open().await?;
    let result = match action {
        TargetAction::Set { value } => match session.engine.set_target_str(&value).await {
            Ok(event) => print_json(&event),
            Err(e) => Err(e.into()),
        },
        TargetAction::Show => {
            let engine = &session.engine;
            let phrase = engine.current_phrase();
            print_json(&json!({
                "phrase_id": phrase.id,
                "target": engine.target(),
                "default_target": phrase.default_target,
                "custom": engine.is_custom_target(),
                "count": engine.count(),
            }))
        }
        TargetAction::Clear => match session.engine.clear_target().await {
            Ok(event) => print_json(&event),
            Err(e) => Err(e.into()),
        },
    };
    session.close().await?;
    result
}
