//! HTTP request and request head serialization
use std::io::{Read, Write};

use url::Url;

use crate::{error::UrlError, header::Headers, method::Method, version::Version};

/// Value of the `User-Agent` header sent with every request.
pub const USER_AGENT: &str = concat!("slowhttp/", env!("CARGO_PKG_VERSION"));

/// Body stream of a request.
pub type RequestBody = Box<dyn Read + Send>;

/// HTTP request to be sent by a [`Client`](crate::client::Client).
pub struct Request {
    method: Method,
    url: Url,
    version: Version,
    /// Header fields serialized in the request head.
    ///
    /// `User-Agent` and `Host` are filled in on construction; changing them
    /// afterwards is possible but not the intended use.
    pub headers: Headers,
    body: Option<RequestBody>,
}

impl Request {
    /// Creates a request for an absolute URL.
    ///
    /// `User-Agent` is always set to [`USER_AGENT`] and `Host` to the
    /// authority of the URL, replacing any values given in `headers`.
    pub fn new(method: Method, target: &str, headers: Option<Headers>) -> Result<Self, UrlError> {
        let url = Url::parse(target).map_err(|error| UrlError::new(target).with_source(error))?;

        let host = authority(&url).ok_or_else(|| UrlError::new(target))?;

        let mut headers = headers.unwrap_or_default();
        headers.set("User-Agent", USER_AGENT);
        headers.set("Host", host);

        Ok(Self {
            method,
            url,
            version: Version::HTTP_1_1,
            headers,
            body: None,
        })
    }

    /// Attaches a body stream that will be copied after the head.
    ///
    /// No framing headers such as `Content-Length` are added.
    pub fn with_body<B: Read + Send + 'static>(mut self, body: B) -> Self {
        self.body = Some(Box::new(body));
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }

    pub fn take_body(&mut self) -> Option<RequestBody> {
        self.body.take()
    }

    /// Returns the path with the query, if any, as sent in the request line.
    pub fn request_target(&self) -> String {
        let path = match self.url.path() {
            "" => "/",
            path => path,
        };

        match self.url.query() {
            Some(query) if !query.is_empty() => format!("{}?{}", path, query),
            _ => path.to_string(),
        }
    }

    /// Returns the serialized request line and header lines.
    ///
    /// Every line ends with `\n`. The empty line that ends a head is not
    /// included.
    pub fn head(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.write_head(&mut buf).expect("writing to a Vec does not fail");
        buf
    }

    /// Writes the same bytes as [`Self::head()`].
    pub fn write_head<W: Write>(&self, mut buf: W) -> std::io::Result<()> {
        buf.write_all(self.method.as_str().as_bytes())?;
        buf.write_all(b" ")?;
        buf.write_all(self.request_target().as_bytes())?;
        buf.write_all(b" ")?;
        self.version.serialize(&mut buf)?;
        buf.write_all(b"\n")?;

        self.headers.serialize(&mut buf)?;

        Ok(())
    }
}

impl std::fmt::Debug for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.method)
            .field("url", &self.url.as_str())
            .field("version", &self.version)
            .field("headers", &self.headers)
            .field("body", &self.body.is_some())
            .finish()
    }
}

/// Host with the port when one is given explicitly.
fn authority(url: &Url) -> Option<String> {
    let host = url.host_str().filter(|host| !host.is_empty())?;

    match url.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host.to_string()),
    }
}
