//! Stream adapters
use std::{
    io::{BufRead, BufReader, Cursor, Read},
    net::{Shutdown, TcpStream},
};

pub(crate) const IO_BUFFER_LENGTH: usize = 4096;

/// Trait for streams that can release their underlying resource.
pub trait Close {
    fn close(&mut self) -> std::io::Result<()>;
}

impl Close for TcpStream {
    fn close(&mut self) -> std::io::Result<()> {
        match self.shutdown(Shutdown::Both) {
            Err(error) if error.kind() == std::io::ErrorKind::NotConnected => Ok(()),
            result => result,
        }
    }
}

impl<T> Close for Cursor<T> {
    fn close(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl Close for &[u8] {
    fn close(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<C: Close + ?Sized> Close for &mut C {
    fn close(&mut self) -> std::io::Result<()> {
        (**self).close()
    }
}

impl<C: Close + ?Sized> Close for Box<C> {
    fn close(&mut self) -> std::io::Result<()> {
        (**self).close()
    }
}

pub trait LogicalPosition {
    /// Returns the number of bytes consumed from the start of the stream.
    fn logical_position(&self) -> u64;
}

/// Remaining bytes of a response after its head.
///
/// Reads are served from the buffer that the head was parsed from, then from
/// the stream. Closing releases the stream that the buffer reads from.
/// Dropping the body drops the stream as well.
#[derive(Debug)]
pub struct Body<R> {
    reader: BufReader<R>,
    position: u64,
}

impl<R: Read> Body<R> {
    pub(crate) fn new(reader: BufReader<R>, position: u64) -> Self {
        Self { reader, position }
    }

    pub fn get_ref(&self) -> &R {
        self.reader.get_ref()
    }

    pub fn get_mut(&mut self) -> &mut R {
        self.reader.get_mut()
    }

    /// Reads the rest of the stream into a string.
    pub fn read_to_string_lossy(&mut self) -> std::io::Result<String> {
        let mut buf = Vec::new();
        self.read_to_end(&mut buf)?;

        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

impl<R: Read + Close> Body<R> {
    /// Closes the underlying stream, discarding any unread data.
    pub fn close(mut self) -> std::io::Result<()> {
        tracing::trace!(position = self.position, "close body");
        self.reader.get_mut().close()
    }
}

impl<R: Read> Read for Body<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let read_len = self.reader.read(buf)?;
        self.position += read_len as u64;

        Ok(read_len)
    }
}

impl<R: Read> BufRead for Body<R> {
    fn fill_buf(&mut self) -> std::io::Result<&[u8]> {
        self.reader.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.reader.consume(amt);
        self.position += amt as u64;
    }
}

impl<R> LogicalPosition for Body<R> {
    fn logical_position(&self) -> u64 {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[derive(Default)]
    struct TrackedStream {
        data: Cursor<Vec<u8>>,
        closed: bool,
    }

    impl Read for TrackedStream {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            self.data.read(buf)
        }
    }

    impl Close for TrackedStream {
        fn close(&mut self) -> std::io::Result<()> {
            self.closed = true;
            Ok(())
        }
    }

    #[test]
    fn test_body_reads_from_buffer_then_stream() {
        let source = (0..50000).map(|i| i as u8).collect::<Vec<u8>>();
        let mut reader = BufReader::with_capacity(IO_BUFFER_LENGTH, Cursor::new(source.clone()));
        let mut line = Vec::new();
        reader.read_until(0, &mut line).unwrap();

        let mut body = Body::new(reader, line.len() as u64);
        let mut actual = Vec::new();
        body.read_to_end(&mut actual).unwrap();

        assert_eq!(actual, source[1..]);
        assert_eq!(body.logical_position(), 50000);
    }

    #[test]
    fn test_body_close_delegates() {
        let mut stream = TrackedStream {
            data: Cursor::new(b"abc".to_vec()),
            ..Default::default()
        };

        let mut body = Body::new(BufReader::new(&mut stream), 0);
        let mut buf = [0u8; 1];
        body.read_exact(&mut buf).unwrap();
        assert!(!body.get_ref().closed);

        body.close().unwrap();
        assert!(stream.closed);
    }
}
