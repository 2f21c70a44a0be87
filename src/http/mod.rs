//! HTTP/1.1 protocol implementation.
//!
//! Requests are parsed incrementally from whatever bytes have arrived so far
//! and responses are written through a strictly ordered state machine. One
//! request is served per connection; there is no keep-alive, pipelining or
//! chunked transfer-encoding.
//!
//! # Architecture
//!
//! - **`headers`**: Header multimap and the single-line header parser
//! - **`request`**: Request types and the request-line parser
//! - **`parser`**: The incremental request state machine and parse errors
//! - **`reader`**: Buffer driver feeding the parser from an async byte stream
//! - **`response`**: Status codes and the response value
//! - **`writer`**: Serializes a response in order, exactly once
//! - **`handler`**: The application hook invoked per request
//! - **`connection`**: Glues reader, handler and writer for one client
//!
//! # Request State Machine
//!
//! ```text
//!        ┌──────────────┐
//!        │ Initialized  │ ← Wait for the request line
//!        └──────┬───────┘
//!               │ "\r\n" seen
//!               ▼
//!        ┌──────────────────┐
//!        │ ParsingHeaders   │ ← One header line per step
//!        └──────┬───────────┘
//!               │ blank line
//!               ├─ no Content-Length → Done
//!               ▼
//!        ┌──────────────────┐
//!        │  ParsingBody     │ ← Append until Content-Length bytes
//!        └──────┬───────────┘
//!               ▼
//!             Done
//! ```
//!
//! # Example
//!
//! ```ignore
//! use servus::http::reader::read_request;
//! use servus::http::response::Response;
//! use servus::http::writer::ResponseWriter;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let listener = TcpListener::bind("127.0.0.1:42069").await?;
//!
//!     loop {
//!         let (mut socket, _addr) = listener.accept().await?;
//!         tokio::spawn(async move {
//!             let request = read_request(&mut socket).await?;
//!             let mut writer = ResponseWriter::new(&mut socket);
//!             writer.write_response(&Response::ok(request.target().to_string())).await?;
//!             anyhow::Ok(())
//!         });
//!     }
//! }
//! ```

pub mod connection;
pub mod handler;
pub mod headers;
pub mod parser;
pub mod reader;
pub mod request;
pub mod response;
pub mod writer;

pub use handler::{Handler, HandlerError};
pub use headers::Headers;
pub use parser::{ParseError, ParserState};
pub use request::{Method, Request, RequestLine};
pub use response::{Response, StatusCode};
pub use writer::{ResponseWriter, WriteError, WriterState};
