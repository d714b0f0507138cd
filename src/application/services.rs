use crate::application::trace::Trace;
use crate::domain::entities::Config;
use crate::domain::headers::HeaderMultimap;
use crate::infrastructure::output::Output;
use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::prelude::*;
use http::header::AUTHORIZATION;
use http::response::Parts;
use http::{Request, Response};
use http_body_util::Full;
use http_body_util::combinators::BoxBody;
use hyper::body::Bytes;
use hyper::ext::ReasonPhrase;
use tokio::io::AsyncWrite;
use tracing::debug;

/// Streaming response body handed back by a [`Transport`]
pub type ResponseBody = BoxBody<Bytes, anyhow::Error>;

/// Trait for HTTP transports to enable mocking and dependency inversion
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs exactly one round trip. Redirects are returned, never followed.
    ///
    /// `insecure` turns off certificate and hostname verification for this request only.
    async fn send(
        &self,
        request: Request<Full<Bytes>>,
        insecure: bool,
    ) -> Result<Response<ResponseBody>>;
}

/// Application service running one request: trace it, send it, trace and stream the response
pub struct Executor {
    transport: Box<dyn Transport>,
}

impl Executor {
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Executes the request described by `config`.
    ///
    /// The request trace is written before anything is sent, the response trace as soon as the
    /// head arrives, then the body is copied as it streams in. The first failure aborts the rest.
    pub async fn execute<C, B>(&self, config: Config, output: &mut Output<C, B>) -> Result<()>
    where
        C: AsyncWrite + Unpin,
        B: AsyncWrite + Unpin,
    {
        let outbound = config.outbound_headers();
        let request = build_request(&config, &outbound)?;

        output
            .write_control(&request_trace(&config, &outbound).render())
            .await?;

        debug!(method = %config.method, url = %config.url, insecure = config.insecure, "sending request");
        let response = self.transport.send(request, config.insecure).await?;
        let (parts, body) = response.into_parts();
        debug!(status = %parts.status, version = ?parts.version, "received response");

        output.write_control(&response_trace(&parts).render()).await?;

        let copied = output.copy_body(body).await?;
        debug!(bytes = copied, "response body copied");
        Ok(())
    }
}

fn build_request(config: &Config, headers: &HeaderMultimap) -> Result<Request<Full<Bytes>>> {
    let uri = config
        .url
        .to_uri()
        .with_context(|| format!("failed to build request for {}", config.url))?;

    let mut builder = Request::builder().method(config.method.0.clone()).uri(uri);
    for (name, value) in headers.iter() {
        builder = builder.header(name, value);
    }

    // URL credentials never reach the wire as part of the URI; they become Basic auth unless
    // the user already sent an Authorization header.
    let explicit_auth = builder
        .headers_ref()
        .is_some_and(|headers| headers.contains_key(AUTHORIZATION));
    match config.url.credentials() {
        Some((username, password)) if !explicit_auth => {
            let token = BASE64_STANDARD.encode(format!("{username}:{password}"));
            builder = builder.header(AUTHORIZATION, format!("Basic {token}"));
        }
        _ => {}
    }

    builder
        .body(Full::new(config.data.0.clone()))
        .with_context(|| format!("failed to build request for {}", config.url))
}

fn request_trace(config: &Config, headers: &HeaderMultimap) -> Trace {
    let mut trace = Trace::request();
    trace
        .line(format!("{} {}", config.method, config.url))
        .headers(headers.iter());
    trace
}

fn response_trace(parts: &Parts) -> Trace {
    let headers: Vec<(&str, String)> = parts
        .headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();

    let mut trace = Trace::response();
    trace
        .line(status_line(parts))
        .headers(headers.iter().map(|(name, value)| (*name, value.as_str())));
    trace
}

/// `HTTP/1.1 200 OK`, preferring the reason phrase the server actually sent
fn status_line(parts: &Parts) -> String {
    let reason = parts
        .extensions
        .get::<ReasonPhrase>()
        .map(|reason| String::from_utf8_lossy(reason.as_bytes()).into_owned())
        .or_else(|| parts.status.canonical_reason().map(str::to_string));

    match reason {
        Some(reason) => format!("{:?} {} {}", parts.version, parts.status.as_str(), reason),
        None => format!("{:?} {}", parts.version, parts.status.as_str()),
    }
}
