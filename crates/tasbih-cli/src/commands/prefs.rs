use clap::{Subcommand, ValueEnum};

use crate::session::{print_json, CliResult, Session};

#[derive(Clone, Copy, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    fn enabled(self) -> bool {
        matches!(self, Toggle::On)
    }
}

#[derive(Subcommand)]
pub enum PrefsAction {
    /// Turn haptic feedback on or off
    Vibration {
        #[arg(value_enum)]
        state: Toggle,
    },
    /// Turn audio cues on or off
    Sound {
        #[arg(value_enum)]
        state: Toggle,
    },
    /// Pause between reaching a target and switching phrase (0-10000 ms)
    Delay {
        /// Delay in milliseconds
        ms: u64,
    },
}

pub async fn run(action: PrefsAction) -> CliResult {
    let session = Session::open().await?;
    let engine = &session.engine;
    let result = match action {
        PrefsAction::Vibration { state } => {
            print_json(&engine.set_vibration_enabled(state.enabled()).await)
        }
        PrefsAction::Sound { state } => print_json(&engine.set_sound_enabled(state.enabled()).await),
        PrefsAction::Delay { ms } => match engine.set_transition_delay_ms(ms).await {
            Ok(event) => print_json(&event),
            Err(e) => Err(e.into()),
        },
    };
    session.close().await?;
    result
}
