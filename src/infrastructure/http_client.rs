use crate::application::services::{Executor, ResponseBody, Transport};

use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use http::uri::{PathAndQuery, Uri};
use http::{HeaderValue, Request, Response};
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::client::conn::http1;
use hyper::header::HOST;
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;
use tokio_native_tls::{TlsConnector, native_tls};
use tracing::{debug, warn};

/// Infrastructure implementation of [`Transport`] using Hyper's HTTP/1.1 connection API
///
/// Every call opens a fresh connection, sends one request over it and hands back the
/// streaming response. Nothing is pooled and redirects are never followed.
#[derive(Debug, Default, Clone, Copy)]
pub struct HyperTransport;

impl HyperTransport {
    pub fn new() -> Self {
        Self
    }

    /// Creates an executor that sends through this transport
    pub fn create_executor(self) -> Executor {
        Executor::new(Box::new(self))
    }
}

#[async_trait]
impl Transport for HyperTransport {
    async fn send(
        &self,
        request: Request<Full<Bytes>>,
        insecure: bool,
    ) -> Result<Response<ResponseBody>> {
        let target = Target::from_uri(request.uri())?;
        let request = RequestAdapter::to_origin_form(request, &target)?;

        debug!(host = %target.host, port = target.port, "connecting");
        let stream = TcpStream::connect((target.host.as_str(), target.port))
            .await
            .with_context(|| format!("failed to connect to {}:{}", target.host, target.port))?;

        match target.scheme {
            Scheme::Http => self.exchange(TokioIo::new(stream), request).await,
            Scheme::Https => {
                let connector = TlsAdapter::connector(insecure)?;
                let stream = connector
                    .connect(&target.host, stream)
                    .await
                    .with_context(|| format!("TLS handshake with {} failed", target.host))?;
                self.exchange(TokioIo::new(stream), request).await
            }
        }
    }
}

impl HyperTransport {
    async fn exchange<T>(
        &self,
        io: TokioIo<T>,
        request: Request<Full<Bytes>>,
    ) -> Result<Response<ResponseBody>>
    where
        T: tokio::io::AsyncRead + tokio::io::AsyncWrite + Send + Unpin + 'static,
    {
        let (mut sender, connection) = http1::handshake(io)
            .await
            .map_err(|e| anyhow!("HTTP handshake failed: {}", e))?;

        // Drives the socket until the body has been read; ends once `sender` is gone.
        tokio::spawn(async move {
            if let Err(err) = connection.await {
                warn!(error = %err, "failed to close connection");
            }
        });

        let response = sender
            .send_request(request)
            .await
            .map_err(|e| anyhow!("HTTP request execution failed: {}", e))?;

        Ok(ResponseAdapter::to_response_body(response))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scheme {
    Http,
    Https,
}

/// Where a request goes, resolved from its absolute URI
#[derive(Debug, Clone, PartialEq, Eq)]
struct Target {
    scheme: Scheme,
    host: String,
    port: u16,
    authority: String,
}

impl Target {
    fn from_uri(uri: &Uri) -> Result<Self> {
        let scheme = match uri.scheme_str() {
            Some("http") => Scheme::Http,
            Some("https") => Scheme::Https,
            Some(other) => bail!("unsupported URL scheme: '{}'", other),
            None => bail!("URL has no scheme: {}", uri),
        };
        let authority = uri
            .authority()
            .ok_or_else(|| anyhow!("URL has no host: {}", uri))?;
        let host = authority
            .host()
            .trim_start_matches('[')
            .trim_end_matches(']')
            .to_string();
        let port = authority.port_u16().unwrap_or(match scheme {
            Scheme::Http => 80,
            Scheme::Https => 443,
        });

        // `host[:port]` only, userinfo never goes into the Host header.
        let bracketed = if host.contains(':') {
            format!("[{host}]")
        } else {
            host.clone()
        };
        let authority = match authority.port() {
            Some(port) => format!("{bracketed}:{port}"),
            None => bracketed,
        };

        Ok(Self {
            scheme,
            host,
            port,
            authority,
        })
    }
}

/// Adapter turning an absolute-form request into what goes on an HTTP/1.1 connection
struct RequestAdapter;

impl RequestAdapter {
    fn to_origin_form(
        mut request: Request<Full<Bytes>>,
        target: &Target,
    ) -> Result<Request<Full<Bytes>>> {
        let path = request
            .uri()
            .path_and_query()
            .cloned()
            .unwrap_or_else(|| PathAndQuery::from_static("/"));
        *request.uri_mut() = Uri::from(path);

        if !request.headers().contains_key(HOST) {
            let host = HeaderValue::from_str(&target.authority)
                .map_err(|e| anyhow!("Invalid host '{}': {}", target.authority, e))?;
            request.headers_mut().insert(HOST, host);
        }
        Ok(request)
    }
}

/// Adapter for handing Hyper's streaming body to the application layer
struct ResponseAdapter;

impl ResponseAdapter {
    fn to_response_body(response: Response<hyper::body::Incoming>) -> Response<ResponseBody> {
        response.map(|body| body.map_err(anyhow::Error::from).boxed())
    }
}

/// Adapter building the TLS connector for one request
struct TlsAdapter;

impl TlsAdapter {
    fn connector(insecure: bool) -> Result<TlsConnector> {
        let connector = native_tls::TlsConnector::builder()
            .danger_accept_invalid_certs(insecure)
            .danger_accept_invalid_hostnames(insecure)
            .build()
            .context("failed to initialise TLS")?;
        Ok(TlsConnector::from(connector))
    }
}
