//! Servus - HTTP/1.1 from raw bytes
//!
//! Streaming request parser, ordered response writer and a small tokio
//! server built on top of them.

pub mod config;
pub mod http;
pub mod server;
