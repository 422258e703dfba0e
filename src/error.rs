//! Error representations
use std::{backtrace::Backtrace, fmt::Display, str::Utf8Error};

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum GeneralError {
    #[error(transparent)]
    Url(#[from] UrlError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl GeneralError {
    pub fn is_url(&self) -> bool {
        matches!(self, Self::Url(..))
    }

    pub fn as_url(&self) -> Option<&UrlError> {
        if let Self::Url(v) = self {
            Some(v)
        } else {
            None
        }
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse(..))
    }

    pub fn as_parse(&self) -> Option<&ParseError> {
        if let Self::Parse(v) = self {
            Some(v)
        } else {
            None
        }
    }

    pub fn try_into_parse(self) -> Result<ParseError, Self> {
        if let Self::Parse(v) = self {
            Ok(v)
        } else {
            Err(self)
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(..))
    }

    pub fn as_transport(&self) -> Option<&TransportError> {
        if let Self::Transport(v) = self {
            Some(v)
        } else {
            None
        }
    }

    pub fn try_into_transport(self) -> Result<TransportError, Self> {
        if let Self::Transport(v) = self {
            Ok(v)
        } else {
            Err(self)
        }
    }
}

/// Error for a request target that is not an absolute URL with a host.
#[derive(Debug, thiserror::Error)]
pub struct UrlError {
    target: String,
    #[source]
    source: Option<url::ParseError>,
}

impl UrlError {
    pub fn new<S: Into<String>>(target: S) -> Self {
        Self {
            target: target.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: url::ParseError) -> Self {
        self.source = Some(source);
        self
    }

    pub fn target(&self) -> &str {
        &self.target
    }
}

impl Display for UrlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "malformed URL '{}'", self.target.escape_debug())
    }
}

/// Error for parsing a response head.
#[derive(Debug, thiserror::Error)]
pub struct ParseError {
    kind: ParseErrorKind,
    context: Box<ParseContext>,
    backtrace: Option<Box<Backtrace>>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind) -> Self {
        Self {
            kind,
            context: Default::default(),
            backtrace: Some(Box::new(Backtrace::capture())),
            source: None,
        }
    }

    pub fn with_position(mut self, value: u64) -> Self {
        self.context.position = Some(value);
        self
    }

    pub fn with_snippet<S: Into<String>>(mut self, value: S) -> Self {
        self.context.snippet = Some(value.into());
        self
    }

    pub fn with_backtrace(mut self, backtrace: Backtrace) -> Self {
        self.backtrace = Some(Box::new(backtrace));
        self
    }

    pub fn with_source<T: Into<Box<dyn std::error::Error + Send + Sync>>>(
        mut self,
        source: T,
    ) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }

    /// Byte offset in the response stream of the line that failed.
    pub fn position(&self) -> Option<u64> {
        self.context.position
    }

    /// The offending line, escaped.
    pub fn snippet(&self) -> Option<&String> {
        self.context.snippet.as_ref()
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "parse error: {}{}", self.kind, self.context)
    }
}

impl From<ParseErrorKind> for ParseError {
    fn from(value: ParseErrorKind) -> Self {
        Self::new(value)
    }
}

impl From<Utf8Error> for ParseError {
    fn from(value: Utf8Error) -> Self {
        ParseError::new(ParseErrorKind::InvalidUtf8).with_source(value)
    }
}

impl From<std::num::ParseIntError> for ParseError {
    fn from(value: std::num::ParseIntError) -> Self {
        ParseError::new(ParseErrorKind::InvalidVersionNumber).with_source(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseErrorKind {
    /// The status line did not look like `HTTP/<digits>.<digits> <phrase>`.
    MalformedStatusLine { match_count: usize },
    InvalidVersionNumber,
    /// The status phrase is not registered in the status table.
    UnknownStatus { phrase: String },
    MalformedHeaderLine,
    LineTooLong,
    InvalidUtf8,
}

impl ParseErrorKind {
    pub fn is_malformed_status_line(&self) -> bool {
        matches!(self, Self::MalformedStatusLine { .. })
    }

    pub fn is_unknown_status(&self) -> bool {
        matches!(self, Self::UnknownStatus { .. })
    }
}

impl Display for ParseErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedStatusLine { match_count } => {
                write!(f, "malformed status line ({match_count} groups matched)")
            }
            Self::InvalidVersionNumber => write!(f, "invalid version number"),
            Self::UnknownStatus { phrase } => {
                write!(f, "unknown status '{}'", phrase.escape_debug())
            }
            Self::MalformedHeaderLine => write!(f, "malformed header line"),
            Self::LineTooLong => write!(f, "line too long"),
            Self::InvalidUtf8 => write!(f, "invalid UTF-8"),
        }
    }
}

#[derive(Debug, Default)]
struct ParseContext {
    position: Option<u64>,
    snippet: Option<String>,
}

impl Display for ParseContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(position) = self.position {
            write!(f, " position {}", position)?;
        }

        if let Some(snippet) = &self.snippet {
            write!(f, " near '{}'", snippet)?;
        }

        Ok(())
    }
}

/// Step of an exchange in which an I/O error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Connect,
    WriteHead,
    WriteBody,
    ReadStatus,
    ReadHeaders,
}

impl Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = match self {
            Self::Connect => "connect",
            Self::WriteHead => "write head",
            Self::WriteBody => "write body",
            Self::ReadStatus => "read status line",
            Self::ReadHeaders => "read headers",
        };

        f.write_str(value)
    }
}

/// I/O error from the underlying stream, tagged with the exchange phase.
#[derive(Debug, thiserror::Error)]
#[error("transport error: {phase} failed")]
pub struct TransportError {
    phase: Phase,
    #[source]
    source: std::io::Error,
}

impl TransportError {
    pub fn new(phase: Phase, source: std::io::Error) -> Self {
        Self { phase, source }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn io_error(&self) -> &std::io::Error {
        &self.source
    }

    pub fn into_io_error(self) -> std::io::Error {
        self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let error = ParseError::new(ParseErrorKind::MalformedHeaderLine)
            .with_position(12)
            .with_snippet("no colon here");

        assert_eq!(
            error.to_string(),
            "parse error: malformed header line position 12 near 'no colon here'"
        );
        assert_eq!(error.position(), Some(12));
    }

    #[test]
    fn test_general_error_accessors() {
        let error = GeneralError::from(TransportError::new(
            Phase::WriteBody,
            std::io::Error::from(std::io::ErrorKind::BrokenPipe),
        ));

        assert!(error.is_transport());
        assert!(!error.is_parse());
        assert_eq!(error.as_transport().unwrap().phase(), Phase::WriteBody);
        assert_eq!(error.to_string(), "transport error: write body failed");

        let error = error.try_into_parse().unwrap_err();
        assert!(error.try_into_transport().is_ok());
    }
}
