use std::fmt;
use std::time::Duration;

use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::headers::Headers;
use crate::http::response::{Response, StatusCode};

const HTTP_VERSION: &str = "HTTP/1.1";

#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("invalid writer state: expected {expected}, currently {actual}")]
    InvalidWriterState {
        expected: WriterState,
        actual: WriterState,
    },

    #[error("timed out writing response")]
    Timeout,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Phases a response passes through, each exactly once and in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterState {
    WriteStatusLine,
    WriteHeaders,
    WriteBody,
    Done,
}

impl fmt::Display for WriterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WriterState::WriteStatusLine => "write status line",
            WriterState::WriteHeaders => "write headers",
            WriterState::WriteBody => "write body",
            WriterState::Done => "done",
        };
        f.write_str(name)
    }
}

/// Serializes one response onto a byte sink in the mandated order.
///
/// A step only advances the state once its bytes were written. If a write
/// fails the state stays put, and since a prefix of the step may already be
/// on the wire the writer must not be retried.
pub struct ResponseWriter<W> {
    stream: W,
    state: WriterState,
    timeout: Option<Duration>,
}

impl<W> ResponseWriter<W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(stream: W) -> Self {
        Self {
            stream,
            state: WriterState::WriteStatusLine,
            timeout: None,
        }
    }

    /// Bounds every individual write by `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn state(&self) -> WriterState {
        self.state
    }

    pub fn into_inner(self) -> W {
        self.stream
    }

    pub async fn write_status_line(&mut self, code: StatusCode) -> Result<(), WriteError> {
        self.expect(WriterState::WriteStatusLine)?;

        let line = format!(
            "{} {} {}\r\n",
            HTTP_VERSION,
            code.as_u16(),
            code.reason_phrase()
        );
        self.send(line.as_bytes()).await?;

        self.state = WriterState::WriteHeaders;
        Ok(())
    }

    pub async fn write_headers(&mut self, headers: &Headers) -> Result<(), WriteError> {
        self.expect(WriterState::WriteHeaders)?;

        let mut buf = Vec::new();
        for (name, value) in headers {
            buf.extend_from_slice(name.as_bytes());
            buf.extend_from_slice(b": ");
            buf.extend_from_slice(value.as_bytes());
            buf.extend_from_slice(b"\r\n");
        }
        buf.extend_from_slice(b"\r\n");
        self.send(&buf).await?;

        self.state = WriterState::WriteBody;
        Ok(())
    }

    /// Writes the body verbatim and returns the number of bytes written.
    pub async fn write_body(&mut self, body: &[u8]) -> Result<usize, WriteError> {
        self.expect(WriterState::WriteBody)?;

        self.send(body).await?;
        self.flush().await?;

        self.state = WriterState::Done;
        Ok(body.len())
    }

    /// Writes status line, headers and body, stopping at the first error.
    pub async fn write_response(&mut self, response: &Response) -> Result<usize, WriteError> {
        self.write_status_line(response.code).await?;
        self.write_headers(&response.headers).await?;
        self.write_body(&response.message).await
    }

    fn expect(&self, expected: WriterState) -> Result<(), WriteError> {
        if self.state != expected {
            return Err(WriteError::InvalidWriterState {
                expected,
                actual: self.state,
            });
        }
        Ok(())
    }

    async fn send(&mut self, bytes: &[u8]) -> Result<(), WriteError> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.stream.write_all(bytes))
                .await
                .map_err(|_| WriteError::Timeout)??,
            None => self.stream.write_all(bytes).await?,
        }
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), WriteError> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.stream.flush())
                .await
                .map_err(|_| WriteError::Timeout)??,
            None => self.stream.flush().await?,
        }
        Ok(())
    }
}
