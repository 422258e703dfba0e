//! Blocking HTTP client over a single TCP connection per request
use std::{
    io::{BufWriter, Write},
    net::{SocketAddr, TcpStream},
    time::Duration,
};

use crate::{
    error::{GeneralError, Phase, TransportError, UrlError},
    io::IO_BUFFER_LENGTH,
    request::Request,
    response::{ParserConfig, Response, read_response},
};

/// Configuration for a [`Client`]
///
/// All timeouts default to `None`, meaning an unresponsive peer blocks the
/// calling thread indefinitely.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// Configuration for parsing responses
    pub parser: ParserConfig,
    /// Write the empty line ending the head before the body.
    ///
    /// When `false`, the request body (or the peer's patience) is expected to
    /// provide it.
    pub terminate_head: bool,
    pub connect_timeout: Option<Duration>,
    pub read_timeout: Option<Duration>,
    pub write_timeout: Option<Duration>,
}

/// Sends requests, each on its own connection.
///
/// The client holds no per-request state and can be shared between threads.
#[derive(Debug, Clone, Default)]
pub struct Client {
    config: ClientConfig,
}

impl Client {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Sends a request and parses the head of the response.
    ///
    /// A new connection is opened for the request. It is not reused; the
    /// returned response body reads from it until the peer closes it.
    ///
    /// If writing fails, the connection is dropped and the error returned;
    /// nothing is sent to the peer to signal the failure.
    pub fn send(&self, mut request: Request) -> Result<Response<TcpStream>, GeneralError> {
        let span = tracing::debug_span!("exchange", method = %request.method(), url = %request.url());
        let _span_guard = span.enter();

        let mut stream = self.connect(&request)?;

        self.write_request(&mut stream, &mut request)?;

        let response = read_response(stream, &self.config.parser)?;

        tracing::debug!(status = %response.status, "received response head");

        Ok(response)
    }

    fn connect(&self, request: &Request) -> Result<TcpStream, GeneralError> {
        let url = request.url();
        // Resolving through the URL applies the scheme's default port.
        let addrs = url
            .socket_addrs(|| None)
            .map_err(|error| match error.kind() {
                std::io::ErrorKind::InvalidInput => GeneralError::from(UrlError::new(url.as_str())),
                _ => TransportError::new(Phase::Connect, error).into(),
            })?;

        let stream = self
            .connect_any(&addrs)
            .map_err(|error| TransportError::new(Phase::Connect, error))?;

        stream
            .set_read_timeout(self.config.read_timeout)
            .and_then(|_| stream.set_write_timeout(self.config.write_timeout))
            .map_err(|error| TransportError::new(Phase::Connect, error))?;

        tracing::debug!(peer = ?stream.peer_addr().ok(), "connected");

        Ok(stream)
    }

    fn connect_any(&self, addrs: &[SocketAddr]) -> std::io::Result<TcpStream> {
        let mut last_error = None;

        for addr in addrs {
            let result = match self.config.connect_timeout {
                Some(timeout) => TcpStream::connect_timeout(addr, timeout),
                None => TcpStream::connect(addr),
            };

            match result {
                Ok(stream) => return Ok(stream),
                Err(error) => {
                    tracing::trace!(%addr, %error, "connect attempt failed");
                    last_error = Some(error);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "host did not resolve to any address",
            )
        }))
    }

    fn write_request(
        &self,
        stream: &mut TcpStream,
        request: &mut Request,
    ) -> Result<(), TransportError> {
        let mut writer = BufWriter::with_capacity(IO_BUFFER_LENGTH, &mut *stream);

        request
            .write_head(&mut writer)
            .and_then(|_| {
                if self.config.terminate_head {
                    writer.write_all(b"\n")
                } else {
                    Ok(())
                }
            })
            .and_then(|_| writer.flush())
            .map_err(|error| TransportError::new(Phase::WriteHead, error))?;

        tracing::trace!("wrote head");

        if let Some(mut body) = request.take_body() {
            let body_len = std::io::copy(&mut body, &mut writer)
                .and_then(|len| writer.flush().map(|_| len))
                .map_err(|error| TransportError::new(Phase::WriteBody, error))?;

            tracing::trace!(body_len, "wrote body");
        }

        Ok(())
    }
}
