use clap::{CommandFactory, Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "tradegate-cli", version, about = "Tradegate CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Checklist operations
    Check {
        #[command(subcommand)]
        action: commands::check::CheckAction,
    },
    /// Market session status
    Sessions {
        #[command(subcommand)]
        action: commands::sessions::SessionsAction,
    },
    /// Reference-zone clock face
    Clock {
        #[command(subcommand)]
        action: commands::clock::ClockAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Generate shell completions
    Completions {
        /// Target shell
        shell: clap_complete::Shell,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Check { action } => commands::check::run(action),
        Commands::Sessions { action } => commands::sessions::run(action),
        Commands::Clock { action } => commands::clock::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
