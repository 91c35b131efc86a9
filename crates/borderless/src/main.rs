mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "borderless",
    version,
    about = "Hide window borders and menu bars with global hotkeys"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the default configuration file
    Init,
    /// Run the tray application (the default when no command is given)
    Run {
        /// Enable file logging at this level: debug, info, warn or error
        #[arg(long, value_name = "LEVEL")]
        log_level: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Init) => commands::init::execute(),
        Some(Commands::Run { log_level }) => commands::run::execute(log_level.as_deref()),
        None => commands::run::execute(None),
    }
}
