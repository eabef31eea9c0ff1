//! Statecraft CLI - determinize, minimize and diagram finite automata

mod cli;
mod colorizer;
mod report;

use clap::Parser;

fn main() {
    let cli_args = cli::Cli::parse();

    // Logging is installed by app.run() once the flags are known; a global
    // subscriber can only be set once.
    let mut app = cli::StatecraftApp::new();

    if let Err(e) = app.run(cli_args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
