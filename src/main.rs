use clap::Parser;
use colored::Colorize;
use gurl::domain::error::exit_code;
use gurl::infrastructure::http_client::HyperTransport;
use gurl::infrastructure::logging;
use gurl::presentation::cli::{Cli, usage_hint};

/// gurl: send one HTTP request and show what went over the wire
///
/// Prints the request line and headers, the response status line and headers, then the
/// response body exactly as received. Redirects are shown, not followed.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let executor = HyperTransport::new().create_executor();

    if let Err(err) = cli.run(&executor).await {
        eprintln!("{}", format!("{:#}", err).red());
        if let Some(hint) = usage_hint(&err) {
            eprintln!("{}", hint);
        }
        std::process::exit(exit_code(&err));
    }
}
