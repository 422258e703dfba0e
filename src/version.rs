//! HTTP message version
use std::fmt::Display;

/// HTTP version as a major/minor pair.
///
/// The text form is `MAJOR.MINOR`; on the wire it is prefixed with `HTTP/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
}

impl Version {
    pub const HTTP_1_0: Self = Self::new(1, 0);
    pub const HTTP_1_1: Self = Self::new(1, 1);

    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Writes `HTTP/MAJOR.MINOR`.
    pub fn serialize<W: std::io::Write>(&self, mut buf: W) -> std::io::Result<()> {
        write!(buf, "HTTP/{}", self)
    }
}

impl Default for Version {
    fn default() -> Self {
        Self::HTTP_1_1
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}
