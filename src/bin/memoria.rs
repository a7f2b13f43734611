use std::process::ExitCode;

use clap::Parser;

use memoria::cli::{Cli, run};

fn main() -> ExitCode {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("memoria: {err}");
            ExitCode::FAILURE
        }
    }
}
