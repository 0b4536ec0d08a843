// ============================================================
// CSV WRITER
// ============================================================
// Write delimited records, encoded back into the input encoding

use std::fs::File;
use std::io::{self, BufWriter, ErrorKind, Write};
use std::path::Path;

use csv::{QuoteStyle, Terminator, WriterBuilder};
use encoding_rs::{Encoder, EncoderResult, Encoding, UTF_8};

use crate::domain::csv::{Dialect, RecordSink};
use crate::domain::error::{AppError, Result};

/// CSV writer factory for a given dialect and output encoding
pub struct CsvWriter {
    dialect: Dialect,
    encoding: &'static Encoding,
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            encoding: UTF_8,
        }
    }
}

impl CsvWriter {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            ..Default::default()
        }
    }

    /// Set the encoding. Encodings that cannot be written (UTF-16) fall
    /// back to their output encoding.
    pub fn with_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.encoding = encoding.output_encoding();
        self
    }

    /// Create (or truncate) `path` and return a sink writing to it
    pub fn create(&self, path: &Path) -> Result<RecordWriter<BufWriter<File>>> {
        let file = File::create(path).map_err(|e| {
            AppError::IoError(format!("Failed to create {}: {}", path.display(), e))
        })?;
        Ok(self.from_writer(BufWriter::new(file)))
    }

    pub fn from_writer<W: Write>(&self, destination: W) -> RecordWriter<W> {
        let encoded = EncodeWriter::new(destination, self.encoding);
        let inner = WriterBuilder::new()
            .delimiter(self.dialect.delimiter)
            .quote(self.dialect.quote)
            .double_quote(true)
            .quote_style(QuoteStyle::Necessary)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(encoded);

        RecordWriter { inner }
    }
}

/// Record sink over any byte destination
pub struct RecordWriter<W: Write> {
    inner: csv::Writer<EncodeWriter<W>>,
}

impl<W: Write> RecordWriter<W> {
    /// Flush every buffered record and hand back the destination
    pub fn finish(self) -> Result<W> {
        let encoded = self
            .inner
            .into_inner()
            .map_err(|e| AppError::IoError(format!("Failed to flush output: {}", e.error())))?;
        let mut destination = encoded.finish()?;
        destination.flush()?;
        Ok(destination)
    }
}

impl<W: Write> RecordSink for RecordWriter<W> {
    fn write_record<F: AsRef<str>>(&mut self, fields: &[F]) -> Result<()> {
        self.inner
            .write_record(fields.iter().map(|f| f.as_ref()))
            .map_err(AppError::from)
    }
}

/// Transcodes the UTF-8 produced by the csv writer into `encoding`.
/// Bytes of a UTF-8 sequence split across writes are held back until the
/// sequence is complete.
pub struct EncodeWriter<W: Write> {
    inner: W,
    encoder: Encoder,
    pending: Vec<u8>,
    scratch: Vec<u8>,
}

impl<W: Write> EncodeWriter<W> {
    pub fn new(inner: W, encoding: &'static Encoding) -> Self {
        Self {
            inner,
            encoder: encoding.new_encoder(),
            pending: Vec::new(),
            scratch: Vec::new(),
        }
    }

    fn encode_pending(&mut self, len: usize, last: bool) -> io::Result<()> {
        let text = std::str::from_utf8(&self.pending[..len])
            .map_err(|e| io::Error::new(ErrorKind::InvalidData, e))?;

        let needed = self
            .encoder
            .max_buffer_length_from_utf8_without_replacement(text.len())
            .ok_or_else(|| io::Error::new(ErrorKind::InvalidInput, "record too large to encode"))?;
        self.scratch.clear();
        self.scratch.reserve(needed);

        let (result, read) =
            self.encoder
                .encode_from_utf8_to_vec_without_replacement(text, &mut self.scratch, last);

        match result {
            EncoderResult::InputEmpty => {}
            EncoderResult::Unmappable(c) => {
                return Err(io::Error::new(
                    ErrorKind::InvalidData,
                    format!(
                        "character {:?} cannot be encoded in {}",
                        c,
                        self.encoder.encoding().name()
                    ),
                ))
            }
            EncoderResult::OutputFull => {
                return Err(io::Error::new(
                    ErrorKind::Other,
                    "encoder output buffer too small",
                ))
            }
        }

        self.inner.write_all(&self.scratch)?;
        self.pending.drain(..read);
        Ok(())
    }

    /// Encode whatever is left (closing any stateful encoder) and return
    /// the inner writer
    pub fn finish(mut self) -> io::Result<W> {
        if !self.pending.is_empty() && std::str::from_utf8(&self.pending).is_err() {
            return Err(io::Error::new(
                ErrorKind::InvalidData,
                "output ended inside a UTF-8 sequence",
            ));
        }
        let len = self.pending.len();
        self.encode_pending(len, true)?;
        Ok(self.inner)
    }
}

impl<W: Write> Write for EncodeWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);

        let complete = match std::str::from_utf8(&self.pending) {
            Ok(text) => text.len(),
            // Incomplete trailing sequence: wait for the rest
            Err(e) if e.error_len().is_none() => e.valid_up_to(),
            Err(e) => return Err(io::Error::new(ErrorKind::InvalidData, e)),
        };

        if complete > 0 {
            self.encode_pending(complete, false)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
