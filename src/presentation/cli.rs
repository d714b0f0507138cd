use crate::application::builders::config_builder::ConfigBuilder;
use crate::application::services::Executor;
use crate::domain::entities::{Config, DEFAULT_USER_AGENT};
use crate::domain::error::{ErrorKind, return_code_error};
use crate::infrastructure::output::Output;
use anyhow::Result;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// CLI configuration for gurl
#[derive(Parser, Debug)]
#[command(name = "gurl", version, disable_help_flag = true)]
#[command(about = "gurl is an HTTP client", long_about = None)]
pub struct Cli {
    /// URL to call; exactly one is required
    #[arg(value_name = "URL")]
    pub urls: Vec<String>,

    /// Custom header as "HeaderName: Header content", repeat the flag for more headers
    #[arg(
        short = 'H',
        long = "header",
        visible_alias = "headers",
        short_alias = 'h',
        value_name = "HEADER"
    )]
    pub headers: Vec<String>,

    /// User agent to be used for requests
    #[arg(short, long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Data to be sent as the request body
    #[arg(short, long)]
    pub data: Option<String>,

    /// HTTP method to be used for the request
    #[arg(short, long, default_value = "GET")]
    pub method: String,

    /// Allows insecure server connections over HTTPS
    #[arg(short = 'k', long)]
    pub insecure: bool,

    /// Write the response body to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Log more details to stderr, repeat for more
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    pub help: Option<bool>,
}

impl Cli {
    /// Validates the arguments into a [`Config`], stopping at the first problem.
    pub fn config(&self) -> Result<Config> {
        ConfigBuilder::new()
            .urls(&self.urls)?
            .headers(&self.headers)?
            .method(&self.method)?
            .user_agent(&self.user_agent)
            .data(self.data.as_deref())
            .insecure(self.insecure)
            .build()
    }

    pub async fn run(&self, executor: &Executor) -> Result<()> {
        let config = self.config()?;
        let mut output = Output::open(self.output.as_deref()).await?;
        executor.execute(config, &mut output).await
    }
}

/// Extra guidance printed after argument mistakes
pub fn usage_hint(err: &anyhow::Error) -> Option<&'static str> {
    match return_code_error(err)?.kind() {
        ErrorKind::ArgumentCount | ErrorKind::InvalidUrl => {
            Some("Usage: gurl [OPTIONS] URL\nTry 'gurl --help' for more information.")
        }
        ErrorKind::InvalidHeader => Some("Headers are given as -H \"Name: Value\""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::exit_code;
    use clap::error::ErrorKind as ClapErrorKind;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("gurl").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_match_a_plain_get() {
        let cli = parse(&["http://example.com"]);
        let config = cli.config().unwrap();

        assert_eq!(config.method.0, http::Method::GET);
        assert_eq!(config.user_agent, "gurl");
        assert!(config.data.is_empty());
        assert!(!config.insecure);
        assert!(cli.output.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn every_header_spelling_is_collected_in_order() {
        let cli = parse(&[
            "-H",
            "Accept: text/html, application/json",
            "-h",
            "Cache: None",
            "--header",
            "Cache: Respect",
            "--headers",
            "X-Trace: 1",
            "http://example.com",
        ]);
        let config = cli.config().unwrap();

        assert_eq!(
            config.headers.iter().collect::<Vec<_>>(),
            vec![
                ("Accept", "text/html, application/json"),
                ("Cache", "None"),
                ("Cache", "Respect"),
                ("X-Trace", "1"),
            ]
        );
    }

    #[test]
    fn short_flags_fill_the_config() {
        let cli = parse(&[
            "-m", "post", "-d", "name=user", "-u", "tester", "-k", "-vv", "-o", "out.html",
            "https://example.com/form",
        ]);
        let config = cli.config().unwrap();

        assert_eq!(config.method.0, http::Method::POST);
        assert_eq!(config.user_agent, "tester");
        assert!(!config.data.is_empty());
        assert!(config.insecure);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.output, Some(PathBuf::from("out.html")));
    }

    #[test]
    fn positional_count_is_checked_after_parsing() {
        let none = parse(&[]).config().unwrap_err();
        assert_eq!(exit_code(&none), 2);

        let two = parse(&["http://a.example", "http://b.example"])
            .config()
            .unwrap_err();
        assert!(two.to_string().ends_with("but you provided 2"));
    }

    #[test]
    fn a_malformed_header_is_reported_before_the_method() {
        let err = parse(&["-m", "GET /", "-H", "NoSeparator", "http://example.com"])
            .config()
            .unwrap_err();
        assert_eq!(exit_code(&err), 3);
    }

    #[test]
    fn help_is_only_a_long_flag() {
        let err = Cli::try_parse_from(["gurl", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ClapErrorKind::DisplayHelp);
    }

    #[test]
    fn argument_mistakes_come_with_a_hint() {
        let count = parse(&[]).config().unwrap_err();
        assert!(usage_hint(&count).unwrap().starts_with("Usage: gurl [OPTIONS] URL"));

        let header = parse(&["-H", "Accept", "http://example.com"])
            .config()
            .unwrap_err();
        assert_eq!(
            usage_hint(&header),
            Some("Headers are given as -H \"Name: Value\"")
        );

        assert!(usage_hint(&anyhow::anyhow!("connection refused")).is_none());
    }
}
