#![forbid(unsafe_code)]

//! vendor-cleanup: CLI entry point, invoked from Composer script hooks.

use clap::Parser;

mod cli_app;

fn main() {
    let args = cli_app::Cli::parse();
    if let Err(e) = cli_app::run(&args) {
        eprintln!("vendor-cleanup: {e}");
        std::process::exit(e.exit_code());
    }
}
