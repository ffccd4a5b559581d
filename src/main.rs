mod app;
mod cli;
mod domain;
mod infra;
mod slack;
mod ui;
mod usecases;

use std::process;

use clap::Parser;

fn main() {
    // The CLI contract pins exit code 1 for a missing argument, so
    // clap's default exit (2) is not used.
    let cli = match cli::Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => {
            eprint!("{error}");
            process::exit(1);
        }
    };

    if let Err(error) = app::run(cli) {
        eprintln!("Error: {error:#}");
        process::exit(1);
    }
}
