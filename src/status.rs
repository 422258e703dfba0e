//! HTTP response status and the status phrase table
use std::{borrow::Cow, collections::HashMap, fmt::Display, sync::LazyLock};

/// HTTP response status: a numeric code with its reason phrase.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Status {
    code: u16,
    reason: Cow<'static, str>,
}

macro_rules! standard_statuses {
    ($($name:ident = $code:literal $reason:literal;)*) => {
        impl Status {
            $(
                pub const $name: Self = Self::from_static($code, $reason);
            )*
        }

        const STANDARD: &[Status] = &[$(Status::$name),*];
    };
}

standard_statuses! {
    CONTINUE = 100 "Continue";
    SWITCHING_PROTOCOLS = 101 "Switching Protocols";
    OK = 200 "OK";
    CREATED = 201 "Created";
    ACCEPTED = 202 "Accepted";
    NON_AUTHORITATIVE_INFORMATION = 203 "Non-Authoritative Information";
    NO_CONTENT = 204 "No Content";
    RESET_CONTENT = 205 "Reset Content";
    PARTIAL_CONTENT = 206 "Partial Content";
    MULTIPLE_CHOICES = 300 "Multiple Choices";
    MOVED_PERMANENTLY = 301 "Moved Permanently";
    FOUND = 302 "Found";
    SEE_OTHER = 303 "See Other";
    NOT_MODIFIED = 304 "Not Modified";
    TEMPORARY_REDIRECT = 307 "Temporary Redirect";
    PERMANENT_REDIRECT = 308 "Permanent Redirect";
    BAD_REQUEST = 400 "Bad Request";
    UNAUTHORIZED = 401 "Unauthorized";
    FORBIDDEN = 403 "Forbidden";
    NOT_FOUND = 404 "Not Found";
    METHOD_NOT_ALLOWED = 405 "Method Not Allowed";
    NOT_ACCEPTABLE = 406 "Not Acceptable";
    REQUEST_TIMEOUT = 408 "Request Timeout";
    CONFLICT = 409 "Conflict";
    GONE = 410 "Gone";
    LENGTH_REQUIRED = 411 "Length Required";
    PAYLOAD_TOO_LARGE = 413 "Content Too Large";
    URI_TOO_LONG = 414 "URI Too Long";
    UNSUPPORTED_MEDIA_TYPE = 415 "Unsupported Media Type";
    TOO_MANY_REQUESTS = 429 "Too Many Requests";
    INTERNAL_SERVER_ERROR = 500 "Internal Server Error";
    NOT_IMPLEMENTED = 501 "Not Implemented";
    BAD_GATEWAY = 502 "Bad Gateway";
    SERVICE_UNAVAILABLE = 503 "Service Unavailable";
    GATEWAY_TIMEOUT = 504 "Gateway Timeout";
    HTTP_VERSION_NOT_SUPPORTED = 505 "HTTP Version Not Supported";
}

impl Status {
    pub const fn from_static(code: u16, reason: &'static str) -> Self {
        Self {
            code,
            reason: Cow::Borrowed(reason),
        }
    }

    pub fn new<S: Into<Cow<'static, str>>>(code: u16, reason: S) -> Self {
        Self {
            code,
            reason: reason.into(),
        }
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Returns the wire form `CODE REASON`.
    pub fn phrase(&self) -> String {
        self.to_string()
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.code)
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:03} {}", self.code, self.reason)
    }
}

/// How the text after the version in a status line is resolved to a [`Status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusLookup {
    /// Only phrases registered verbatim in the table are accepted.
    #[default]
    Phrase,
    /// Registered phrases take precedence; otherwise any phrase starting with
    /// a three digit code is accepted with the remaining text as the reason.
    CodeFallback,
}

static STANDARD_TABLE: LazyLock<StatusTable> =
    LazyLock::new(|| StatusTable::from_iter(STANDARD.iter().cloned()));

/// Table mapping a full status phrase, such as `200 OK`, to a [`Status`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusTable {
    entries: HashMap<String, Status>,
}

impl StatusTable {
    /// Returns a table without any entries.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Returns the table of common statuses keyed by `CODE REASON`.
    pub fn standard() -> &'static Self {
        &STANDARD_TABLE
    }

    /// Registers a phrase, replacing any status previously registered under it.
    pub fn register<S: Into<String>>(&mut self, phrase: S, status: Status) {
        self.entries.insert(phrase.into(), status);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the status registered under exactly this phrase.
    pub fn get(&self, phrase: &str) -> Option<&Status> {
        self.entries.get(phrase)
    }

    pub fn lookup(&self, phrase: &str, mode: StatusLookup) -> Option<Status> {
        if let Some(status) = self.get(phrase) {
            return Some(status.clone());
        }

        match mode {
            StatusLookup::Phrase => None,
            StatusLookup::CodeFallback => parse_code_phrase(phrase),
        }
    }
}

impl Default for StatusTable {
    fn default() -> Self {
        Self::standard().clone()
    }
}

impl FromIterator<Status> for StatusTable {
    fn from_iter<T: IntoIterator<Item = Status>>(iter: T) -> Self {
        let mut table = Self::empty();

        for status in iter {
            table.register(status.phrase(), status);
        }

        table
    }
}

fn parse_code_phrase(phrase: &str) -> Option<Status> {
    let (code, reason) = match phrase.split_once(' ') {
        Some((code, reason)) => (code, reason),
        None => (phrase, ""),
    };

    if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let code = code.parse().ok()?;

    Some(Status::new(code, reason.to_string()))
}
