//! Feeds the incremental parser from a blocking byte source.

use std::time::Duration;

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::http::parser::ParseError;
use crate::http::request::Request;

/// Initial size of the working buffer.
pub const DEFAULT_BUFFER_SIZE: usize = 8;

/// Reads one request from `reader`, growing the working buffer as needed.
///
/// Waits indefinitely for the client; see [`read_request_with_timeout`].
pub async fn read_request<R>(reader: &mut R) -> Result<Request, ParseError>
where
    R: AsyncRead + Unpin,
{
    RequestReader::new().read(reader).await
}

/// Like [`read_request`], but gives up with [`ParseError::Timeout`] once
/// `limit` has elapsed. `None` means no limit.
pub async fn read_request_with_timeout<R>(
    reader: &mut R,
    limit: Option<Duration>,
) -> Result<Request, ParseError>
where
    R: AsyncRead + Unpin,
{
    RequestReader::new().read_with_timeout(reader, limit).await
}

/// The buffer driver.
///
/// Holds a buffer and a count of bytes that were read but not yet consumed
/// by the parser. Consumed bytes are shifted out after every parse so the
/// buffer only ever holds the unparsed tail.
pub struct RequestReader {
    buffer: BytesMut,
    read_to: usize,
}

impl Default for RequestReader {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestReader {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_BUFFER_SIZE)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: BytesMut::zeroed(capacity.max(1)),
            read_to: 0,
        }
    }

    /// Current size of the working buffer.
    ///
    /// Starts at the requested capacity and doubles whenever a read finds
    /// the buffer full.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    pub async fn read_with_timeout<R>(
        &mut self,
        reader: &mut R,
        limit: Option<Duration>,
    ) -> Result<Request, ParseError>
    where
        R: AsyncRead + Unpin,
    {
        match limit {
            Some(limit) => tokio::time::timeout(limit, self.read(reader))
                .await
                .map_err(|_| ParseError::Timeout)?,
            None => self.read(reader).await,
        }
    }

    pub async fn read<R>(&mut self, reader: &mut R) -> Result<Request, ParseError>
    where
        R: AsyncRead + Unpin,
    {
        let mut request = Request::new();

        while !request.is_done() {
            if self.read_to >= self.buffer.len() {
                let doubled = self.buffer.len() * 2;
                self.buffer.resize(doubled, 0);
            }

            let n = reader.read(&mut self.buffer[self.read_to..]).await?;
            if n == 0 {
                if !request.is_done() {
                    return Err(ParseError::IncompleteRequest);
                }
                break;
            }

            self.read_to += n;
            let parsed = request.parse(&self.buffer[..self.read_to])?;

            self.buffer.copy_within(parsed..self.read_to, 0);
            self.read_to -= parsed;
        }

        tracing::trace!(
            buffer = self.buffer.len(),
            body = request.body.len(),
            "request fully read"
        );

        Ok(request)
    }
}
