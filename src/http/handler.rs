use std::future::Future;

use bytes::Bytes;
use tokio::io::AsyncWrite;

use crate::http::request::Request;
use crate::http::response::{Response, StatusCode};
use crate::http::writer::{ResponseWriter, WriteError};

/// Application code invoked once per successfully parsed request.
///
/// The handler owns the response: it decides code, headers and body and
/// drives `writer` to [`WriterState::Done`](crate::http::writer::WriterState::Done).
/// Returning a [`HandlerError`] before anything was written lets the
/// connection answer on the handler's behalf.
pub trait Handler: Send + Sync + 'static {
    fn handle<W>(
        &self,
        writer: &mut ResponseWriter<W>,
        request: &Request,
    ) -> impl Future<Output = Result<(), HandlerError>> + Send
    where
        W: AsyncWrite + Unpin + Send;
}

/// A failure reported by a [`Handler`].
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// The handler chose to fail the request with this status.
    #[error("{} {}", .code.as_u16(), String::from_utf8_lossy(.message))]
    Status { code: StatusCode, message: Bytes },

    #[error(transparent)]
    Write(#[from] WriteError),
}

impl HandlerError {
    pub fn new(code: StatusCode, message: impl Into<Bytes>) -> Self {
        HandlerError::Status {
            code,
            message: message.into(),
        }
    }

    /// The response the connection sends for this error, if one can still
    /// be sent.
    pub fn to_response(&self) -> Option<Response> {
        match self {
            HandlerError::Status { code, message } => Some(Response::new(*code, message.clone())),
            HandlerError::Write(_) => None,
        }
    }
}
