//! ClickUp CLI - Work with ClickUp from the terminal

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = clickup_cli::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
