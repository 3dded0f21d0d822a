use std::io::Write;
use std::process::ExitCode;

use clap::Parser;

fn main() -> ExitCode {
    let cli = stockcast_cli::Cli::parse();
    stockcast_observability::init(cli.log_format.into());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let result = stockcast_cli::execute(&cli, &mut out);
    let _ = out.flush();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "command failed");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
