use bytes::Bytes;

use crate::http::headers::Headers;

/// HTTP status codes the server can emit.
///
/// - `Ok` (200): Request successful
/// - `BadRequest` (400): Malformed request
/// - `InternalServerError` (500): Server error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 400 Bad Request
    BadRequest,
    /// 500 Internal Server Error
    InternalServerError,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use servus::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::BadRequest.as_u16(), 400);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::InternalServerError => 500,
        }
    }

    /// Maps a numeric code back to a supported status, if there is one.
    pub fn from_u16(code: u16) -> Option<Self> {
        match code {
            200 => Some(StatusCode::Ok),
            400 => Some(StatusCode::BadRequest),
            500 => Some(StatusCode::InternalServerError),
            _ => None,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use servus::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    /// assert_eq!(StatusCode::InternalServerError.reason_phrase(), "Internal Server Error");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }
}

/// Headers sent when a handler does not supply its own.
pub fn default_headers(content_length: usize) -> Headers {
    let mut headers = Headers::new();
    headers.set("Content-Length", content_length.to_string());
    headers.set("Connection", "close");
    headers.set("Content-Type", "text/plain");
    headers
}

/// A response built by a handler and consumed once by the writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub code: StatusCode,
    pub message: Bytes,
    pub headers: Headers,
}

impl Response {
    /// Creates a response carrying the default headers for `message`.
    pub fn new(code: StatusCode, message: impl Into<Bytes>) -> Self {
        let message = message.into();
        let headers = default_headers(message.len());
        Self {
            code,
            message,
            headers,
        }
    }

    pub fn ok(message: impl Into<Bytes>) -> Self {
        Self::new(StatusCode::Ok, message)
    }

    pub fn bad_request(message: impl Into<Bytes>) -> Self {
        Self::new(StatusCode::BadRequest, message)
    }

    pub fn internal_error(message: impl Into<Bytes>) -> Self {
        Self::new(StatusCode::InternalServerError, message)
    }

    /// Replaces a header, keeping the rest of the defaults.
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.set(name, value);
        self
    }
}
