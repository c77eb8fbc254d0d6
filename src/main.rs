use clap::Parser;
use tickerdash::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
    run(Cli::parse())
}
