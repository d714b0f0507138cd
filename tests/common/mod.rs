//! In-process HTTP/1.1 server recording every request it receives.

use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio_native_tls::{TlsAcceptor, native_tls};

pub const GREETING: &str = "Hello, client\n";

type Log = Arc<Mutex<Vec<Received>>>;

/// One request as seen by the server
#[derive(Debug, Clone)]
pub struct Received {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Received {
    /// All values sent for `name`, in wire order.
    pub fn header(&self, name: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
            .collect()
    }
}

pub struct TestServer {
    addr: SocketAddr,
    tls: bool,
    received: Log,
}

impl TestServer {
    pub async fn plain() -> Self {
        Self::start(None).await
    }

    /// Serves HTTPS with a self-signed "Acme Co" certificate no client trusts by default.
    pub async fn tls() -> Self {
        let identity = native_tls::Identity::from_pkcs8(
            include_bytes!("../fixtures/cert.pem"),
            include_bytes!("../fixtures/key.pem"),
        )
        .unwrap();
        let acceptor = native_tls::TlsAcceptor::new(identity).unwrap();
        Self::start(Some(TlsAcceptor::from(acceptor))).await
    }

    async fn start(acceptor: Option<TlsAcceptor>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let received = Log::default();
        let tls = acceptor.is_some();

        let log = received.clone();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let acceptor = acceptor.clone();
                let log = log.clone();
                tokio::spawn(async move {
                    let service = service_fn(move |request| handle(request, log.clone()));
                    match acceptor {
                        Some(acceptor) => {
                            // Clients that reject the certificate never get past this point.
                            if let Ok(stream) = acceptor.accept(stream).await {
                                let _ = http1::Builder::new()
                                    .serve_connection(TokioIo::new(stream), service)
                                    .await;
                            }
                        }
                        None => {
                            let _ = http1::Builder::new()
                                .serve_connection(TokioIo::new(stream), service)
                                .await;
                        }
                    }
                });
            }
        });

        Self { addr, tls, received }
    }

    pub fn url(&self, path: &str) -> String {
        let scheme = if self.tls { "https" } else { "http" };
        format!("{scheme}://{}{path}", self.addr)
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn received(&self) -> Vec<Received> {
        self.received.lock().unwrap().clone()
    }
}

/// `/redirect` answers 302 to `/landing`; everything else gets the greeting.
async fn handle(request: Request<Incoming>, log: Log) -> Result<Response<Full<Bytes>>, Infallible> {
    let (parts, body) = request.into_parts();
    let body = body
        .collect()
        .await
        .map(|collected| collected.to_bytes().to_vec())
        .unwrap_or_default();
    let headers = parts
        .headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();
    let path = parts.uri.path().to_string();

    log.lock().unwrap().push(Received {
        method: parts.method.to_string(),
        path: path.clone(),
        headers,
        body,
    });

    let response = match path.as_str() {
        "/redirect" => Response::builder()
            .status(StatusCode::FOUND)
            .header("location", "/landing")
            .body(Full::new(Bytes::new())),
        _ => Response::builder()
            .header("content-type", "text/plain; charset=utf-8")
            .body(Full::new(Bytes::from_static(GREETING.as_bytes()))),
    };
    Ok(response.unwrap())
}
