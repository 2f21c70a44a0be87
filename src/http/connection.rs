use std::time::Duration;

use anyhow::Context;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use crate::config::Config;
use crate::http::handler::Handler;
use crate::http::reader::RequestReader;
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::writer::{ResponseWriter, WriterState};

/// One client connection, serving exactly one request.
pub struct Connection<S> {
    stream: S,
    buffer_size: usize,
    read_timeout: Option<Duration>,
    write_timeout: Option<Duration>,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    pub fn new(stream: S, cfg: &Config) -> Self {
        Self {
            stream,
            buffer_size: cfg.initial_buffer_size,
            read_timeout: cfg.read_timeout(),
            write_timeout: cfg.write_timeout(),
        }
    }

    /// Reads the request, runs `handler`, and closes the write side.
    ///
    /// A request that fails to parse is answered with 400 and the parse
    /// error as body; the error is then returned to the caller.
    pub async fn run<H: Handler>(mut self, handler: &H) -> anyhow::Result<()> {
        let request = RequestReader::with_capacity(self.buffer_size)
            .read_with_timeout(&mut self.stream, self.read_timeout)
            .await;

        let result = match request {
            Ok(request) => self.dispatch(handler, &request).await,
            Err(e) => {
                let response = Response::bad_request(e.to_string());
                let mut writer =
                    ResponseWriter::new(&mut self.stream).with_timeout(self.write_timeout);
                if let Err(write_err) = writer.write_response(&response).await {
                    tracing::debug!(error = %write_err, "could not send 400 response");
                }
                Err(anyhow::Error::new(e).context("invalid request"))
            }
        };

        if let Err(e) = self.stream.shutdown().await {
            tracing::debug!(error = %e, "shutdown after response failed");
        }

        result
    }

    async fn dispatch<H: Handler>(&mut self, handler: &H, request: &Request) -> anyhow::Result<()> {
        tracing::debug!(
            method = ?request.method(),
            path = %request.target(),
            headers = request.headers.len(),
            body = request.body.len(),
            "request parsed"
        );
        tracing::trace!("\n{}", request);

        let mut writer = ResponseWriter::new(&mut self.stream).with_timeout(self.write_timeout);
        let outcome = handler.handle(&mut writer, request).await;

        match (outcome, writer.state()) {
            (Ok(()), WriterState::Done) => Ok(()),

            (Ok(()), WriterState::WriteStatusLine) => {
                writer
                    .write_response(&Response::internal_error("handler produced no response\n"))
                    .await
                    .context("failed to send fallback response")?;
                anyhow::bail!("handler returned without writing a response")
            }

            (Ok(()), state) => anyhow::bail!("handler left response unfinished at {}", state),

            (Err(e), WriterState::WriteStatusLine) => match e.to_response() {
                Some(response) => {
                    tracing::info!(path = %request.target(), error = %e, "handler failed");
                    writer
                        .write_response(&response)
                        .await
                        .context("failed to send handler error")?;
                    Ok(())
                }
                None => Err(anyhow::Error::new(e).context("handler failed")),
            },

            (Err(e), _) => Err(anyhow::Error::new(e).context("handler failed mid-response")),
        }
    }
}
