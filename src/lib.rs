//! Minimal HTTP/1.x message codec and blocking client.
//!
//! A [`Request`](request::Request) serializes to a request head, and
//! [`read_response()`](response::read_response) parses a response head from
//! any stream, leaving the rest of the stream as the body.
//! [`Client`](client::Client) drives a single exchange over a TCP connection.
//!
//! Chunked transfer coding, persistent connections, and TLS are not
//! supported.
pub mod client;
pub mod error;
pub mod header;
pub mod io;
pub mod method;
mod parse;
pub mod request;
pub mod response;
pub mod status;
pub mod version;

#[cfg(feature = "bin")]
#[doc(hidden)]
pub mod app;
