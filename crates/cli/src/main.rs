use std::process::ExitCode;

use clap::Parser;
use env_logger::init;
use fontsets_cli::cli::Cli;

fn main() -> ExitCode {
    init();
    match Cli::parse().run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:?}");
            ExitCode::FAILURE
        }
    }
}
