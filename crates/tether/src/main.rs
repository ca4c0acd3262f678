mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "tether",
    version,
    about = "Keeps an overlay window glued to a video surface"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the default configuration file
    Init,
    /// Glue a translucent overlay to a window until Ctrl+C
    Attach(commands::attach::AttachArgs),
    /// Print the notifications delivered for a window
    Events(commands::events::EventsArgs),
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Attach(args) => commands::attach::execute(&args),
        Commands::Events(args) => commands::events::execute(&args),
    }
}
