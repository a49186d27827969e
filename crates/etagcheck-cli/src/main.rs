mod cli;

use crate::cli::Cli;

#[tokio::main]
async fn main() {
    // Parse CLI, set up logging, and dispatch.
    let code = match Cli::run_from_args().await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("etagcheck error: {:#}", err);
            1
        }
    };
    std::process::exit(code);
}
