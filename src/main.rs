use clap::Parser;
use quantlens::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
