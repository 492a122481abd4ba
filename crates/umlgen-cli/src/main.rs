//! umlgen CLI - Export UML class diagrams as server and client projects

mod cli;

use clap::Parser;

fn main() {
    let cli_args = cli::Cli::parse();

    // logging is initialized in run() once the flags are known
    let mut app = cli::UmlgenApp::new();

    if let Err(e) = app.run(cli_args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
