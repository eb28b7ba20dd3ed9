use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "neurofocus", version, about = "NeuroFocus Pomodoro timer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the session controller, reading commands from stdin
    Run,
    /// Durations and active window
    Settings {
        #[command(subcommand)]
        action: commands::settings::SettingsAction,
    },
    /// Distracting site list
    Sites {
        #[command(subcommand)]
        action: commands::sites::SitesAction,
    },
    /// Daily focus report
    Report(commands::report::ReportArgs),
    /// Session log
    Log {
        #[command(subcommand)]
        action: commands::log::LogAction,
    },
    /// Host configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print a shell completion script
    Completions {
        shell: clap_complete::Shell,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("NEUROFOCUS_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let result = match cli.command {
        Commands::Run => commands::run::run(),
        Commands::Settings { action } => commands::settings::run(action),
        Commands::Sites { action } => commands::sites::run(action),
        Commands::Report(args) => commands::report::run(args),
        Commands::Log { action } => commands::log::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "neurofocus", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
