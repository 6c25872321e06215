mod cache;
mod cmd;
mod config;
mod drive;
mod error;
mod printer;
mod resolver;
mod store;
#[cfg(test)]
mod testing;

use anyhow::{Result, anyhow};
use std::env;
use std::process::exit;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "DRIVEPATH_LOG";

fn main() {
    init_tracing();
    if let Err(e) = entry() {
        eprintln!("Error: {e:#}");
        exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn entry() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let Some(command) = args.get(1) else {
        return cmd::help::run();
    };
    let rest = &args[2..];

    match command.as_str() {
        "ls" => cmd::ls::run(rest),
        "id" => cmd::id::run(rest),
        "path" => cmd::path::run(rest),
        "info" => cmd::info::run(rest),
        "mkdir" => cmd::mkdir::run(rest),
        "help" | "-h" | "--help" => cmd::help::run(),
        "-V" | "--version" => {
            println!("drivepath {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => Err(anyhow!(
            "unknown command: {other}\nRun `drivepath --help` for usage"
        )),
    }
}
