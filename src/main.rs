use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use sip_planner::api::{self, Cli};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_level());
    api::run(cli)
}

fn init_tracing(level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("sip_planner={level}").into());

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}
