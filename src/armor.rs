//! ASCII armor framing on top of rpgp's armor codec.
//!
//! [`ArmorKind`] maps onto rpgp's [`BlockType`]; the base64 body, line
//! wrapping and CRC-24 trailer are rpgp's. Armor problems (missing header,
//! bad base64, checksum mismatch) surface as
//! [`std::io::ErrorKind::InvalidData`] through the `Read` implementation.

use std::fmt;
use std::io::{self, BufRead, BufReader, Cursor, Read, Write};
use std::path::Path;

use log::debug;
use pgp::armor::{self as pgp_armor, BlockType, Dearmor, Headers};
use pgp::ser::Serialize;

use crate::error::{Error, Result};

/// Upper bound for a single armored block.
const MAX_ARMOR_BUFFER: usize = 1024 * 1024 * 1024;

/// The kind of data an armor block announces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArmorKind {
    Message,
    PublicKey,
    SecretKey,
    Signature,
    File,
}

impl ArmorKind {
    /// The matching rpgp block type.
    pub fn block_type(self) -> BlockType {
        match self {
            ArmorKind::Message => BlockType::Message,
            ArmorKind::PublicKey => BlockType::PublicKey,
            ArmorKind::SecretKey => BlockType::PrivateKey,
            ArmorKind::Signature => BlockType::Signature,
            ArmorKind::File => BlockType::File,
        }
    }

    /// OpenPGP block types only; PEM and ssh blocks have no kind.
    pub fn from_block_type(typ: &BlockType) -> Option<Self> {
        match typ {
            BlockType::Message | BlockType::MultiPartMessage(..) => Some(ArmorKind::Message),
            BlockType::PublicKey => Some(ArmorKind::PublicKey),
            BlockType::PrivateKey => Some(ArmorKind::SecretKey),
            BlockType::Signature => Some(ArmorKind::Signature),
            BlockType::File => Some(ArmorKind::File),
            _ => None,
        }
    }

    /// The label between `BEGIN`/`END` and the dashes.
    pub fn label(self) -> String {
        self.block_type().to_string()
    }

    /// Numeric kind; `0` is reserved for "any kind" when reading.
    pub fn code(self) -> u8 {
        match self {
            ArmorKind::Message => 1,
            ArmorKind::PublicKey => 2,
            ArmorKind::SecretKey => 3,
            ArmorKind::Signature => 4,
            ArmorKind::File => 5,
        }
    }

    /// Parse a numeric kind. `0` maps to `None`, meaning any kind.
    pub fn from_code(code: u8) -> Result<Option<Self>> {
        match code {
            0 => Ok(None),
            1 => Ok(Some(ArmorKind::Message)),
            2 => Ok(Some(ArmorKind::PublicKey)),
            3 => Ok(Some(ArmorKind::SecretKey)),
            4 => Ok(Some(ArmorKind::Signature)),
            5 => Ok(Some(ArmorKind::File)),
            n => Err(Error::InvalidArgument(format!("unknown armor kind {}", n))),
        }
    }
}

impl fmt::Display for ArmorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.block_type().fmt(f)
    }
}

/// Already serialized packet bytes, handed to rpgp's armor writer as is.
struct RawPackets<'a>(&'a [u8]);

impl Serialize for RawPackets<'_> {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> pgp::errors::Result<()> {
        writer.write_all(self.0)?;
        Ok(())
    }

    fn write_len(&self) -> usize {
        self.0.len()
    }
}

/// Encodes everything written to it as one armor block.
///
/// The body is collected and framed by rpgp when
/// [`ArmorWriter::finalize`] runs; nothing reaches `inner` before that.
pub struct ArmorWriter<W: Write> {
    inner: W,
    kind: ArmorKind,
    headers: Headers,
    body: Vec<u8>,
}

impl<W: Write> ArmorWriter<W> {
    /// Check the header lines and return a writer for the body.
    pub fn new(inner: W, kind: ArmorKind, headers: &[(&str, &str)]) -> Result<Self> {
        let mut map = Headers::new();
        for (key, value) in headers {
            if key.is_empty() || key.contains(':') || key.contains('\n') || value.contains('\n') {
                return Err(Error::InvalidArgument(format!(
                    "armor header {:?} is not a single key: value line",
                    key
                )));
            }
            map.entry(key.to_string())
                .or_insert_with(Vec::new)
                .push(value.to_string());
        }

        Ok(ArmorWriter {
            inner,
            kind,
            headers: map,
            body: Vec::new(),
        })
    }

    pub fn kind(&self) -> ArmorKind {
        self.kind
    }

    /// Frame the body, write it out and return the inner writer.
    pub fn finalize(mut self) -> Result<W> {
        let headers = (!self.headers.is_empty()).then_some(&self.headers);
        pgp_armor::write(
            &RawPackets(&self.body),
            self.kind.block_type(),
            &mut self.inner,
            headers,
            true,
        )
        .map_err(|e| Error::InvalidOperation(format!("armoring {}: {}", self.kind, e)))?;
        self.inner.flush()?;
        debug!("armored {} byte(s) as {}", self.body.len(), self.kind);
        Ok(self.inner)
    }
}

impl<W: Write> Write for ArmorWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.body.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Decodes one armor block.
///
/// The header is parsed on construction, so [`ArmorReader::kind`] and
/// [`ArmorReader::headers`] are available before any body is read. The
/// CRC-24 trailer is checked when present.
#[derive(Debug)]
pub struct ArmorReader<R: BufRead> {
    inner: Dearmor<R>,
    kind: ArmorKind,
    headers: Vec<(String, String)>,
}

fn invalid(msg: impl Into<String>) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg.into())
}

impl<R: BufRead> ArmorReader<R> {
    /// Parse the armor header. With `expected` set, any other kind is an
    /// error; `None` accepts every kind.
    pub fn new(inner: R, expected: Option<ArmorKind>) -> Result<Self> {
        let mut dearmor = Dearmor::with_crc24(inner, MAX_ARMOR_BUFFER);
        dearmor
            .read_header()
            .map_err(|e| invalid(format!("no armor header found: {}", e)))?;

        let kind = match dearmor.typ {
            Some(ref typ) => ArmorKind::from_block_type(typ)
                .ok_or_else(|| invalid(format!("unsupported armor block {}", typ)))?,
            None => return Err(invalid("no armor header found").into()),
        };
        if let Some(want) = expected {
            if want != kind {
                return Err(invalid(format!("expected {}, found {}", want, kind)).into());
            }
        }

        let headers: Vec<(String, String)> = dearmor
            .headers
            .iter()
            .flat_map(|(key, values)| values.iter().map(move |v| (key.clone(), v.clone())))
            .collect();
        debug!("armor block {} with {} header(s)", kind, headers.len());

        Ok(ArmorReader {
            inner: dearmor,
            kind,
            headers,
        })
    }

    pub fn kind(&self) -> ArmorKind {
        self.kind
    }

    /// Armor headers, grouped by key.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }
}

impl ArmorReader<BufReader<Cursor<Vec<u8>>>> {
    /// Decode armor held in memory.
    pub fn from_bytes(data: &[u8], expected: Option<ArmorKind>) -> Result<Self> {
        ArmorReader::new(BufReader::new(Cursor::new(data.to_vec())), expected)
    }
}

impl ArmorReader<BufReader<std::fs::File>> {
    /// Decode armor stored in a file.
    pub fn from_file(path: impl AsRef<Path>, expected: Option<ArmorKind>) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        ArmorReader::new(BufReader::new(file), expected)
    }
}

impl<R: BufRead> Read for ArmorReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf).map_err(|e| match e.kind() {
            io::ErrorKind::Other => invalid(e.to_string()),
            _ => e,
        })
    }
}

/// Armor `data` in one go.
pub fn armor(data: &[u8], kind: ArmorKind, headers: &[(&str, &str)]) -> Result<String> {
    let mut writer = ArmorWriter::new(Vec::new(), kind, headers)?;
    writer.write_all(data)?;
    let out = writer.finalize()?;
    String::from_utf8(out).map_err(|e| Error::InvalidOperation(e.to_string()))
}

/// Decode a whole armor block, returning its kind and body.
pub fn dearmor(data: &[u8]) -> Result<(ArmorKind, Vec<u8>)> {
    let mut reader = ArmorReader::from_bytes(data, None)?;
    let mut body = Vec::new();
    reader.read_to_end(&mut body).map_err(Error::from_io)?;
    Ok((reader.kind(), body))
}

/// True if `data` starts with an armor header line.
pub fn is_armored(data: &[u8]) -> bool {
    let start = data
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(data.len());
    data[start..].starts_with(b"-----BEGIN ")
}
