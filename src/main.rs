use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use intered::InterEdError;
use intered::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e);
            ExitCode::FAILURE
        }
    }
}

fn report(err: &InterEdError) {
    match err {
        InterEdError::Validation(fields) => {
            eprintln!("error: validation failed");
            for (field, message) in fields {
                eprintln!("  {field}: {message}");
            }
        }
        InterEdError::NotFound { collection, .. } => {
            eprintln!("error: {err}");
            eprintln!("hint: run `intered ls {collection}` to see what exists");
        }
        _ => eprintln!("error: {err}"),
    }
}
