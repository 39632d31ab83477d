use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod console_feedback;
mod outbox;
mod session;

#[derive(Parser)]
#[command(name = "tasbih", version, about = "Tasbih dhikr counter")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Counting: tap, reset, status
    Count {
        #[command(subcommand)]
        action: commands::count::CountAction,
    },
    /// Phrase catalog and selection
    Phrase {
        #[command(subcommand)]
        action: commands::phrase::PhraseAction,
    },
    /// Per-phrase targets
    Target {
        #[command(subcommand)]
        action: commands::target::TargetAction,
    },
    /// Session preferences
    Prefs {
        #[command(subcommand)]
        action: commands::prefs::PrefsAction,
    },
    /// Daily reminder
    Reminder {
        #[command(subcommand)]
        action: commands::reminder::ReminderAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("TASBIH_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Count { action } => commands::count::run(action).await,
        Commands::Phrase { action } => commands::phrase::run(action).await,
        Commands::Target { action } => commands::target::run(action).await,
        Commands::Prefs { action } => commands::prefs::run(action).await,
        Commands::Reminder { action } => commands::reminder::run(action).await,
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
