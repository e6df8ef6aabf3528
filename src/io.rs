//! Byte streams over memory, files, file descriptors and callbacks.
//!
//! [`IoReader`] and [`IoWriter`] give every source and sink the same shape
//! so the writer and reader stacks can sit on any of them.

use std::fs::File;
use std::io::{self, BufReader, Cursor, Read, Write};
use std::path::Path;

use crate::error::{Error, Result};

const COPY_CHUNK: usize = 8 * 1024;

/// A readable byte stream.
pub struct IoReader<'a> {
    inner: Box<dyn Read + 'a>,
    eof: bool,
}

impl<'a> IoReader<'a> {
    /// Read from any [`Read`] implementation.
    pub fn new(reader: impl Read + 'a) -> Self {
        IoReader {
            inner: Box::new(reader),
            eof: false,
        }
    }

    /// Read from an owned buffer.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> IoReader<'static> {
        IoReader::new(Cursor::new(bytes.into()))
    }

    /// Read from a borrowed buffer.
    pub fn from_slice(bytes: &'a [u8]) -> Self {
        IoReader::new(bytes)
    }

    /// Read from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<IoReader<'static>> {
        let file = File::open(path.as_ref())?;
        Ok(IoReader::new(BufReader::new(file)))
    }

    /// Read from a raw file descriptor, taking ownership of it.
    ///
    /// # Safety
    ///
    /// `fd` must be an open, readable descriptor that nothing else closes.
    #[cfg(unix)]
    pub unsafe fn from_raw_fd(fd: std::os::unix::io::RawFd) -> IoReader<'static> {
        use std::os::unix::io::FromRawFd;
        IoReader::new(File::from_raw_fd(fd))
    }

    /// Read by calling `callback` with a buffer to fill. The callback
    /// returns how many bytes it wrote; zero means end of stream.
    pub fn from_callback<F>(callback: F) -> Self
    where
        F: FnMut(&mut [u8]) -> io::Result<usize> + 'a,
    {
        IoReader::new(CallbackReader(callback))
    }

    /// Read at most `len` bytes.
    ///
    /// Returns `None` once the stream is exhausted and `len > 0`; a zero
    /// length request always yields an empty buffer.
    pub fn read_bounded(&mut self, len: usize) -> Result<Option<Vec<u8>>> {
        if len == 0 {
            return Ok(Some(Vec::new()));
        }
        let mut buf = Vec::with_capacity(len.min(COPY_CHUNK));
        (&mut self.inner).take(len as u64).read_to_end(&mut buf)?;
        if buf.is_empty() {
            self.eof = true;
            return Ok(None);
        }
        Ok(Some(buf))
    }

    /// Read everything that is left. Returns an empty buffer at end of stream.
    pub fn read_all(&mut self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.inner.read_to_end(&mut buf)?;
        self.eof = true;
        Ok(buf)
    }

    /// Skip everything that is left, returning how many bytes were dropped.
    pub fn discard(&mut self) -> Result<u64> {
        let n = io::copy(&mut self.inner, &mut io::sink())?;
        self.eof = true;
        Ok(n)
    }

    /// Copy up to `limit` bytes (or everything when `None`) into `writer`.
    pub fn copy_to(&mut self, writer: &mut impl Write, limit: Option<u64>) -> Result<u64> {
        let copied = match limit {
            Some(n) => io::copy(&mut (&mut self.inner).take(n), writer)?,
            None => io::copy(&mut self.inner, writer)?,
        };
        if limit.map_or(true, |n| copied < n) {
            self.eof = true;
        }
        Ok(copied)
    }

    /// True once a read has observed the end of the stream.
    pub fn is_eof(&self) -> bool {
        self.eof
    }
}

impl Read for IoReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        if n == 0 && !buf.is_empty() {
            self.eof = true;
        }
        Ok(n)
    }
}

struct CallbackReader<F>(F);

impl<F> Read for CallbackReader<F>
where
    F: FnMut(&mut [u8]) -> io::Result<usize>,
{
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = (self.0)(buf)?;
        if n > buf.len() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "read callback claimed more bytes than requested",
            ));
        }
        Ok(n)
    }
}

/// A writable byte stream.
pub struct IoWriter<'a> {
    sink: Sink<'a>,
}

enum Sink<'a> {
    Memory(Vec<u8>),
    Boxed(Box<dyn Write + 'a>),
}

impl<'a> IoWriter<'a> {
    /// Write into any [`Write`] implementation.
    pub fn new(writer: impl Write + 'a) -> Self {
        IoWriter {
            sink: Sink::Boxed(Box::new(writer)),
        }
    }

    /// Collect output in memory; retrieve it with [`IoWriter::into_bytes`].
    pub fn memory() -> IoWriter<'static> {
        IoWriter {
            sink: Sink::Memory(Vec::new()),
        }
    }

    /// Create (or truncate) a file and write into it.
    pub fn from_file(path: impl AsRef<Path>) -> Result<IoWriter<'static>> {
        let file = File::create(path.as_ref())?;
        Ok(IoWriter::new(io::BufWriter::new(file)))
    }

    /// Write to a raw file descriptor, taking ownership of it.
    ///
    /// # Safety
    ///
    /// `fd` must be an open, writable descriptor that nothing else closes.
    #[cfg(unix)]
    pub unsafe fn from_raw_fd(fd: std::os::unix::io::RawFd) -> IoWriter<'static> {
        use std::os::unix::io::FromRawFd;
        IoWriter::new(File::from_raw_fd(fd))
    }

    /// Write by calling `callback` with each chunk. The callback returns
    /// how many bytes it accepted.
    pub fn from_callback<F>(callback: F) -> Self
    where
        F: FnMut(&[u8]) -> io::Result<usize> + 'a,
    {
        IoWriter::new(CallbackWriter(callback))
    }

    /// Bytes collected so far by a memory writer.
    pub fn bytes(&self) -> Option<&[u8]> {
        match &self.sink {
            Sink::Memory(buf) => Some(buf),
            Sink::Boxed(_) => None,
        }
    }

    /// Consume a memory writer and return its contents.
    pub fn into_bytes(self) -> Result<Vec<u8>> {
        match self.sink {
            Sink::Memory(buf) => Ok(buf),
            Sink::Boxed(_) => Err(Error::InvalidOperation(
                "only memory writers hold their output".to_string(),
            )),
        }
    }
}

impl Write for IoWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.sink {
            Sink::Memory(v) => {
                v.extend_from_slice(buf);
                Ok(buf.len())
            }
            Sink::Boxed(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.sink {
            Sink::Memory(_) => Ok(()),
            Sink::Boxed(w) => w.flush(),
        }
    }
}

struct CallbackWriter<F>(F);

impl<F> Write for CallbackWriter<F>
where
    F: FnMut(&[u8]) -> io::Result<usize>,
{
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        (self.0)(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounded_reads() {
        let mut reader = IoReader::from_bytes(b"Hello world!\n".to_vec());
        assert_eq!(reader.read_bounded(0).unwrap(), Some(Vec::new()));
        assert_eq!(reader.read_bounded(5).unwrap().unwrap(), b"Hello");
        assert_eq!(reader.read_bounded(10).unwrap().unwrap(), b" world!\n");
        assert_eq!(reader.read_bounded(1).unwrap(), None);
        assert!(reader.is_eof());
    }

    #[test]
    fn test_read_all_then_empty() {
        let mut reader = IoReader::from_slice(b"Hello world!\n");
        assert_eq!(reader.read_all().unwrap(), b"Hello world!\n");
        assert_eq!(reader.read_all().unwrap(), b"");
    }

    #[test]
    fn test_discard() {
        let mut reader = IoReader::from_bytes(b"0123456789".to_vec());
        reader.read_bounded(3).unwrap();
        assert_eq!(reader.discard().unwrap(), 7);
        assert_eq!(reader.read_all().unwrap(), b"");
        assert_eq!(reader.read_bounded(10).unwrap(), None);
    }

    #[test]
    fn test_callback_reader() {
        let mut source = Cursor::new(b"blub".to_vec());
        let mut reader = IoReader::from_callback(move |buf| source.read(buf));
        assert_eq!(reader.read_all().unwrap(), b"blub");
    }

    #[test]
    fn test_callback_writer_and_copy() {
        let mut collected = Vec::new();
        {
            let mut writer = IoWriter::from_callback(|chunk: &[u8]| {
                collected.extend_from_slice(chunk);
                Ok(chunk.len())
            });
            let mut reader = IoReader::from_bytes(b"Hello world! and more".to_vec());
            assert_eq!(reader.copy_to(&mut writer, Some(12)).unwrap(), 12);
            assert!(!reader.is_eof());
        }
        assert_eq!(collected, b"Hello world!");
    }

    #[test]
    fn test_memory_writer() {
        let mut writer = IoWriter::memory();
        writer.write_all(b"").unwrap();
        writer.write_all(b"Hello").unwrap();
        writer.write_all(b" world!").unwrap();
        assert_eq!(writer.bytes(), Some(&b"Hello world!"[..]));
        assert_eq!(writer.into_bytes().unwrap(), b"Hello world!");

        assert!(IoWriter::new(Vec::new()).into_bytes().is_err());
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("iowriter_test.txt");
        {
            let mut writer = IoWriter::from_file(&path).unwrap();
            writer.write_all(b"Hello world!").unwrap();
            writer.flush().unwrap();
        }
        let mut reader = IoReader::from_file(&path).unwrap();
        assert_eq!(reader.read_bounded(12).unwrap().unwrap(), b"Hello world!");

        assert!(matches!(
            IoReader::from_file(dir.path().join("non-existent.txt")),
            Err(Error::Io(_))
        ));
    }
}
