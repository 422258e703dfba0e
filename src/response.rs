//! HTTP response head parsing
use std::io::{BufRead, BufReader, Read};

use crate::{
    error::{GeneralError, ParseError, ParseErrorKind, Phase, TransportError},
    header::Headers,
    io::{Body, IO_BUFFER_LENGTH},
    status::{Status, StatusLookup, StatusTable},
    version::Version,
};

const MAX_LINE_LENGTH: usize = 32768;

/// Configuration for [`read_response()`]
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Phrases accepted in the status line
    pub status_table: StatusTable,
    /// How phrases missing from the table are treated
    pub status_lookup: StatusLookup,
    /// Maximum length of a single line in the head, including the line ending
    pub max_line_length: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            status_table: StatusTable::default(),
            status_lookup: StatusLookup::default(),
            max_line_length: MAX_LINE_LENGTH,
        }
    }
}

/// HTTP response with a body that has not been read yet.
#[derive(Debug)]
pub struct Response<R> {
    pub version: Version,
    pub status: Status,
    pub headers: Headers,
    pub body: Body<R>,
}

impl<R: Read> Response<R> {
    /// Splits the response into its head and body.
    pub fn into_parts(self) -> (ResponseHead, Body<R>) {
        (
            ResponseHead {
                version: self.version,
                status: self.status,
                headers: self.headers,
            },
            self.body,
        )
    }
}

/// Status line and header fields of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHead {
    pub version: Version,
    pub status: Status,
    pub headers: Headers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    StatusLine,
    Headers,
    Body,
}

/// Parses a response head from a stream.
///
/// The stream is wrapped in a buffer; whatever follows the head in the
/// buffer and the stream becomes the body of the returned response.
///
/// A stream that ends before the empty line terminating the header fields is
/// not an error. The header fields read until then are kept. Likewise, a
/// status line or header line cut off by the end of the stream is parsed as
/// if it ended with `\n`.
pub fn read_response<R: Read>(input: R, config: &ParserConfig) -> Result<Response<R>, GeneralError> {
    ResponseReader::new(input, config).read()
}

struct ResponseReader<'a, R: Read> {
    state: State,
    input: BufReader<R>,
    config: &'a ParserConfig,
    position: u64,
    line: Vec<u8>,
}

impl<'a, R: Read> ResponseReader<'a, R> {
    fn new(input: R, config: &'a ParserConfig) -> Self {
        Self {
            state: State::StatusLine,
            input: BufReader::with_capacity(IO_BUFFER_LENGTH, input),
            config,
            position: 0,
            line: Vec::new(),
        }
    }

    fn read(mut self) -> Result<Response<R>, GeneralError> {
        debug_assert_eq!(self.state, State::StatusLine);
        let (version, status) = self.read_status_line()?;
        self.state = State::Headers;

        let headers = self.read_headers()?;
        self.state = State::Body;

        tracing::trace!(state = ?self.state, position = self.position, "head complete");

        Ok(Response {
            version,
            status,
            headers,
            body: Body::new(self.input, self.position),
        })
    }

    fn read_status_line(&mut self) -> Result<(Version, Status), GeneralError> {
        let line_position = self.position;
        let read_len = self
            .read_line()
            .map_err(|error| TransportError::new(Phase::ReadStatus, error))?;

        if read_len == 0 {
            let error = std::io::Error::from(std::io::ErrorKind::UnexpectedEof);
            return Err(TransportError::new(Phase::ReadStatus, error).into());
        }

        let line = self.line_str(line_position)?.trim();

        tracing::trace!(line, "status line");

        let parts = crate::parse::status_line(line).map_err(|match_count| {
            ParseError::new(ParseErrorKind::MalformedStatusLine { match_count })
                .with_position(line_position)
                .with_snippet(line.escape_debug().to_string())
        })?;

        let version = Version::new(
            parse_version_number(parts.major, line_position)?,
            parse_version_number(parts.minor, line_position)?,
        );

        let status = self
            .config
            .status_table
            .lookup(parts.phrase, self.config.status_lookup)
            .ok_or_else(|| {
                ParseError::new(ParseErrorKind::UnknownStatus {
                    phrase: parts.phrase.to_string(),
                })
                .with_position(line_position)
            })?;

        tracing::debug!(%version, %status, "read status line");

        Ok((version, status))
    }

    fn read_headers(&mut self) -> Result<Headers, GeneralError> {
        let mut headers = Headers::new();

        loop {
            let line_position = self.position;
            let read_len = self
                .read_line()
                .map_err(|error| TransportError::new(Phase::ReadHeaders, error))?;

            if read_len == 0 {
                tracing::debug!(
                    position = self.position,
                    "stream ended before end of header fields"
                );
                break;
            }

            let line = self.line_str(line_position)?.trim();

            if line.is_empty() {
                break;
            }

            let pair = crate::parse::field_pair(line).ok_or_else(|| {
                ParseError::new(ParseErrorKind::MalformedHeaderLine)
                    .with_position(line_position)
                    .with_snippet(line.escape_debug().to_string())
            })?;

            tracing::trace!(name = pair.name, value = pair.value, "header field");

            headers.add(pair.name, pair.value);
        }

        Ok(headers)
    }

    /// Reads a line, including the line ending, into the line buffer.
    ///
    /// At most one byte past the length limit is read so that an overlong
    /// line can be told apart from one that ends the stream.
    ///
    /// Returns 0 at the end of the stream.
    fn read_line(&mut self) -> std::io::Result<usize> {
        self.line.clear();

        let limit = (self.config.max_line_length as u64).saturating_add(1);
        let read_len = (&mut self.input)
            .take(limit)
            .read_until(b'\n', &mut self.line)?;
        self.position += read_len as u64;

        Ok(read_len)
    }

    fn line_str(&self, line_position: u64) -> Result<&str, ParseError> {
        if self.line.len() > self.config.max_line_length {
            return Err(ParseError::new(ParseErrorKind::LineTooLong).with_position(line_position));
        }

        std::str::from_utf8(&self.line)
            .map_err(|error| ParseError::from(error).with_position(line_position))
    }
}

fn parse_version_number(digits: &str, line_position: u64) -> Result<u32, ParseError> {
    digits.parse::<u32>().map_err(|error| {
        ParseError::from(error)
            .with_position(line_position)
            .with_snippet(digits)
    })
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn config_with_ok() -> ParserConfig {
        let mut config = ParserConfig::default();
        config.status_table.register("OK", Status::OK);
        config
    }

    fn parse_error(result: Result<Response<Cursor<&[u8]>>, GeneralError>) -> ParseError {
        result.unwrap_err().try_into_parse().unwrap()
    }

    #[test]
    fn test_read_response() {
        let input = Cursor::new(&b"HTTP/2.5 OK\nMessage: be cool : )\n\nbody!"[..]);

        let mut response = read_response(input, &config_with_ok()).unwrap();

        assert_eq!(response.version, Version::new(2, 5));
        assert_eq!(response.status, Status::OK);
        assert_eq!(response.headers.get("Message"), "be cool : )");
        assert_eq!(response.body.read_to_string_lossy().unwrap(), "body!");
    }

    #[test]
    fn test_read_response_crlf_and_repeated_headers() {
        let input = Cursor::new(
            &b"HTTP/1.1 200 OK\r\n\
            Set-Cookie: a=1\r\n\
            Set-Cookie: b=2\r\n\
            X-Empty:\r\n\
            \r\n\
            line 1\r\nline 2\r\n"[..],
        );

        let response = read_response(input, &ParserConfig::default()).unwrap();
        let (head, mut body) = response.into_parts();

        assert_eq!(head.version, Version::HTTP_1_1);
        assert_eq!(head.status, Status::OK);
        assert_eq!(head.headers.get_all("Set-Cookie").unwrap(), ["a=1", "b=2"]);
        assert_eq!(head.headers.get_all("X-Empty").unwrap(), [""]);

        let mut buf = Vec::new();
        body.read_to_end(&mut buf).unwrap();
        assert_eq!(buf, b"line 1\r\nline 2\r\n");
    }

    #[test]
    fn test_read_response_eof_in_headers() {
        let input = Cursor::new(&b"HTTP/1.1 200 OK\nServer: example"[..]);

        let mut response = read_response(input, &ParserConfig::default()).unwrap();

        assert_eq!(response.headers.get("Server"), "example");
        assert_eq!(response.body.read_to_string_lossy().unwrap(), "");

        let input = Cursor::new(&b"HTTP/1.1 404 Not Found\n"[..]);
        let response = read_response(input, &ParserConfig::default()).unwrap();

        assert_eq!(response.status, Status::NOT_FOUND);
        assert!(response.headers.is_empty());
    }

    #[test]
    fn test_read_response_unknown_status() {
        let input = Cursor::new(&b"HTTP/1.1 299 Whatever\n\n"[..]);

        let error = parse_error(read_response(input, &ParserConfig::default()));

        assert_eq!(
            error.kind(),
            &ParseErrorKind::UnknownStatus {
                phrase: "299 Whatever".to_string()
            }
        );

        let input = Cursor::new(&b"HTTP/2.5 OK\n\n"[..]);
        let error = parse_error(read_response(input, &ParserConfig::default()));
        assert!(error.kind().is_unknown_status());
    }

    #[test]
    fn test_read_response_code_fallback() {
        let mut config = ParserConfig::default();
        config.status_lookup = StatusLookup::CodeFallback;

        let input = Cursor::new(&b"HTTP/1.1 299 Whatever\n\n"[..]);
        let response = read_response(input, &config).unwrap();

        assert_eq!(response.status.code(), 299);
        assert_eq!(response.status.reason(), "Whatever");
    }

    #[test]
    fn test_read_response_malformed_status_line() {
        for data in [&b"ICY 200 OK\n\n"[..], b"HTTP/1.1\n\n", b"\n", b"HTTP/1.1 \n\n"] {
            let error = parse_error(read_response(Cursor::new(data), &ParserConfig::default()));

            assert!(error.kind().is_malformed_status_line(), "{:?}", data);
            assert_eq!(error.position(), Some(0));
        }
    }

    #[test]
    fn test_read_response_empty_stream() {
        let error = read_response(Cursor::new(&b""[..]), &ParserConfig::default()).unwrap_err();
        let error = error.try_into_transport().unwrap();

        assert_eq!(error.phase(), Phase::ReadStatus);
        assert_eq!(error.io_error().kind(), std::io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_read_response_invalid_version_number() {
        let input = Cursor::new(&b"HTTP/99999999999.1 200 OK\n\n"[..]);

        let error = parse_error(read_response(input, &ParserConfig::default()));

        assert_eq!(error.kind(), &ParseErrorKind::InvalidVersionNumber);
    }

    #[test]
    fn test_read_response_malformed_header_line() {
        let input = Cursor::new(&b"HTTP/1.1 200 OK\nGood: yes\nno colon\n\n"[..]);

        let error = parse_error(read_response(input, &ParserConfig::default()));

        assert_eq!(error.kind(), &ParseErrorKind::MalformedHeaderLine);
        assert_eq!(error.position(), Some(26));
        assert_eq!(error.snippet().map(String::as_str), Some("no colon"));
    }

    #[test]
    fn test_read_response_line_too_long() {
        let mut config = ParserConfig::default();
        config.max_line_length = 32;

        let mut data = b"HTTP/1.1 200 OK\nLong: ".to_vec();
        data.extend(std::iter::repeat_n(b'a', 64));
        data.extend(b"\n\n");

        let error = parse_error(read_response(Cursor::new(data.as_slice()), &config));

        assert_eq!(error.kind(), &ParseErrorKind::LineTooLong);
        assert_eq!(error.position(), Some(16));
    }

    #[test]
    fn test_read_response_line_at_length_limit() {
        let mut config = ParserConfig::default();
        config.max_line_length = 16;

        let input = Cursor::new(&b"HTTP/1.1 200 OK\nServer: 12345678"[..]);
        let response = read_response(input, &config).unwrap();
        assert_eq!(response.headers.get("Server"), "12345678");

        let input = Cursor::new(&b"HTTP/1.1 200 OK\nServer: 1234567\n\n"[..]);
        let response = read_response(input, &config).unwrap();
        assert_eq!(response.headers.get("Server"), "1234567");

        let input = Cursor::new(&b"HTTP/1.1 200 OK\nServer: 12345678\n\n"[..]);
        let error = parse_error(read_response(input, &config));
        assert_eq!(error.kind(), &ParseErrorKind::LineTooLong);
    }

    #[test]
    fn test_read_response_status_line_at_end_of_stream() {
        let input = Cursor::new(&b"HTTP/1.1 200 OK"[..]);

        let mut response = read_response(input, &ParserConfig::default()).unwrap();

        assert_eq!(response.version, Version::HTTP_1_1);
        assert_eq!(response.status, Status::OK);
        assert!(response.headers.is_empty());
        assert_eq!(response.body.read_to_string_lossy().unwrap(), "");
    }

    #[test]
    fn test_read_response_invalid_utf8() {
        let input = Cursor::new(&b"HTTP/1.1 200 OK\nName: \xff\xfe\n\n"[..]);

        let error = parse_error(read_response(input, &ParserConfig::default()));

        assert_eq!(error.kind(), &ParseErrorKind::InvalidUtf8);
    }

    #[test]
    fn test_read_response_read_error() {
        #[derive(Debug)]
        struct FailingReader;

        impl Read for FailingReader {
            fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::from(std::io::ErrorKind::ConnectionReset))
            }
        }

        let error = read_response(FailingReader, &ParserConfig::default()).unwrap_err();
        let error = error.try_into_transport().unwrap();

        assert_eq!(error.phase(), Phase::ReadStatus);
        assert_eq!(error.io_error().kind(), std::io::ErrorKind::ConnectionReset);
    }
}
