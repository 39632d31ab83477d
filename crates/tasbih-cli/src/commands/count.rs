use clap::Subcommand;

use crate::session::{print_json, CliResult, Session};

#[derive(Subcommand)]
pub enum CountAction {
    /// Count one or more taps
    Tap {
        /// Number of taps
        #[arg(long, default_value = "1")]
        times: u32,
    },
    /// Reset the count for the current phrase
    Reset,
    /// Print current session state as JSON
    Status,
}

pub async fn run(action: CountAction) -> CliResult {
    let session = Session::open().await?;
    let result = match action {
        CountAction::Tap { times } => {
            let mut events = Vec::new();
            for _ in 0..times {
                if let Some(event) = session.engine.increment().await {
                    events.push(event);
                }
            }
            print_json(&events)
        }
        CountAction::Reset => match session.engine.reset().await {
            Ok(event) => session.print_event_or_snapshot(event),
            Err(e) => Err(e.into()),
        },
        CountAction::Status => print_json(&session.engine.snapshot()),
    };
    session.close().await?;
    result
}
