use std::fmt;

use crate::http::headers::{Headers, find_crlf};
use crate::http::parser::{ParseError, ParserState};

const HTTP_VERSION: &str = "HTTP/1.1";

/// HTTP request methods.
///
/// Only the methods listed here are accepted on the request line; anything
/// else (including lowercase spellings) is rejected as malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
    /// HEAD - Like GET but without the response body
    HEAD,
    /// POST - Create or submit data
    POST,
    /// PUT - Replace a resource
    PUT,
    /// DELETE - Delete a resource
    DELETE,
    /// TRACE - Loop the request back to the client
    TRACE,
}

impl Method {
    /// Parses an HTTP method from a string.
    ///
    /// # Example
    ///
    /// ```
    /// # use servus::http::request::Method;
    /// assert_eq!(Method::from_str("GET"), Some(Method::GET));
    /// assert_eq!(Method::from_str("get"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "GET" => Some(Method::GET),
            "HEAD" => Some(Method::HEAD),
            "POST" => Some(Method::POST),
            "PUT" => Some(Method::PUT),
            "DELETE" => Some(Method::DELETE),
            "TRACE" => Some(Method::TRACE),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::HEAD => "HEAD",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::TRACE => "TRACE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The first line of a request: `METHOD SP TARGET SP HTTP/1.1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    pub method: Method,
    /// The request target as sent (e.g. "/coffee?size=large")
    pub target: String,
    /// Protocol version without the `HTTP/` prefix, always "1.1"
    pub version: String,
}

/// A request being materialized by the incremental parser.
///
/// A fresh `Request` starts in [`ParserState::Initialized`] with no line,
/// no headers and an empty body; [`Request::parse`] fills it in as bytes
/// arrive. The line is `None` until the first `\r\n` has been seen.
#[derive(Debug, Clone)]
pub struct Request {
    pub line: Option<RequestLine>,
    pub headers: Headers,
    pub body: Vec<u8>,
    pub(crate) state: ParserState,
    pub(crate) content_length: usize,
}

impl Default for Request {
    fn default() -> Self {
        Self::new()
    }
}

impl Request {
    pub fn new() -> Self {
        Self {
            line: None,
            headers: Headers::new(),
            body: Vec::new(),
            state: ParserState::Initialized,
            content_length: 0,
        }
    }

    pub fn state(&self) -> ParserState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == ParserState::Done
    }

    pub fn method(&self) -> Option<Method> {
        self.line.as_ref().map(|l| l.method)
    }

    /// The request target, or an empty string before the line is parsed.
    pub fn target(&self) -> &str {
        self.line.as_ref().map(|l| l.target.as_str()).unwrap_or("")
    }

    /// Retrieves a header value by name (case-insensitive).
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key)
    }
}

/// Multi-line dump of the request, one header per line.
impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Request line:")?;
        if let Some(line) = &self.line {
            writeln!(f, "- Method: {}", line.method)?;
            writeln!(f, "- Target: {}", line.target)?;
            writeln!(f, "- Version: {}", line.version)?;
        }
        writeln!(f, "Headers:")?;
        for (name, value) in self.headers.iter() {
            writeln!(f, "- {}: {}", name, value)?;
        }
        writeln!(f, "Body:")?;
        write!(f, "{}", String::from_utf8_lossy(&self.body))
    }
}

/// Parses the request line at the front of `data`.
///
/// Returns `Ok(None)` when no `\r\n` has arrived yet. On success, also
/// returns the number of bytes consumed (line length plus the `\r\n`).
pub fn parse_request_line(data: &[u8]) -> Result<Option<(RequestLine, usize)>, ParseError> {
    let Some(line_end) = find_crlf(data) else {
        return Ok(None);
    };

    let line = std::str::from_utf8(&data[..line_end])
        .map_err(|_| ParseError::MalformedRequestLine("request line is not valid UTF-8".into()))?;

    let parts: Vec<&str> = line.split(' ').collect();
    let [method, target, version] = parts[..] else {
        return Err(ParseError::MalformedRequestLine(format!(
            "expected 3 parts, found {}",
            parts.len()
        )));
    };

    let method = Method::from_str(method).ok_or_else(|| {
        ParseError::MalformedRequestLine(format!("invalid http method {:?}", method))
    })?;

    if target.is_empty() || target.chars().any(char::is_whitespace) {
        return Err(ParseError::MalformedRequestLine(format!(
            "invalid target {:?}",
            target
        )));
    }

    if version != HTTP_VERSION {
        return Err(ParseError::MalformedRequestLine(format!(
            "http version must be {}, got {:?}",
            HTTP_VERSION, version
        )));
    }

    let request_line = RequestLine {
        method,
        target: target.to_string(),
        version: version.trim_start_matches("HTTP/").to_string(),
    };

    Ok(Some((request_line, line_end + 2)))
}
