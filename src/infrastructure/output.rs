use crate::application::services::ResponseBody;
use anyhow::{Context, Result};
use http_body_util::BodyExt;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Type-erased sink used by the command line front end
pub type Sink = Box<dyn AsyncWrite + Send + Unpin>;

/// Destinations for the request/response trace (`control`) and the response payload (`body`)
pub struct Output<C = Sink, B = Sink> {
    pub control: C,
    pub body: B,
}

impl Output {
    /// Trace on stdout; body on stdout, or in `body_path` when given (created or truncated).
    pub async fn open(body_path: Option<&Path>) -> Result<Self> {
        let body: Sink = match body_path {
            Some(path) => Box::new(
                File::create(path)
                    .await
                    .with_context(|| format!("failed to create output file {}", path.display()))?,
            ),
            None => Box::new(tokio::io::stdout()),
        };

        Ok(Output {
            control: Box::new(tokio::io::stdout()),
            body,
        })
    }
}

impl<C, B> Output<C, B>
where
    C: AsyncWrite + Unpin,
    B: AsyncWrite + Unpin,
{
    pub fn new(control: C, body: B) -> Self {
        Self { control, body }
    }

    /// Writes one rendered trace block in a single call and flushes it.
    pub async fn write_control(&mut self, text: &str) -> Result<()> {
        self.control
            .write_all(text.as_bytes())
            .await
            .context("failed to write trace")?;
        self.control.flush().await.context("failed to write trace")
    }

    /// Copies `body` frame by frame, returning the number of bytes written.
    pub async fn copy_body(&mut self, mut body: ResponseBody) -> Result<u64> {
        let mut copied = 0;
        while let Some(frame) = body.frame().await {
            let frame = frame.context("failed to read response body")?;
            if let Ok(data) = frame.into_data() {
                self.body
                    .write_all(&data)
                    .await
                    .context("failed to write response body")?;
                copied += data.len() as u64;
            }
        }
        self.body
            .flush()
            .await
            .context("failed to write response body")?;
        Ok(copied)
    }
}
