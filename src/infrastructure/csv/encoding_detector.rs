// ============================================================
// ENCODING DETECTOR
// ============================================================
// Guess the text encoding of a file from its raw bytes

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use encoding_rs::{Encoding, UTF_8};

use crate::domain::error::{AppError, Result};

/// Bytes read per `feed` call
const CHUNK_SIZE: usize = 8 * 1024;

/// Once non-ASCII bytes have been seen, the guess is taken after this
/// many bytes
const DEFAULT_PROBE_LIMIT: usize = 1024 * 1024;

/// Longest byte-order mark (UTF-8)
const MAX_BOM_LEN: usize = 3;

/// Incremental charset detection state
pub trait CharsetAccumulator {
    /// Feed the next chunk. Returns `true` once the accumulator is
    /// confident and wants no more input.
    fn feed(&mut self, chunk: &[u8]) -> bool;

    /// Final guess. `complete` is `true` when the whole stream was fed.
    /// `None` means the encoding is unknown.
    fn finish(self, complete: bool) -> Option<&'static Encoding>;
}

/// Accumulator backed by `chardetng`, with BOM sniffing up front
pub struct ChardetAccumulator {
    detector: chardetng::EncodingDetector,
    head: Vec<u8>,
    bom: Option<&'static Encoding>,
    fed: usize,
    non_ascii: bool,
    probe_limit: usize,
}

impl ChardetAccumulator {
    pub fn new(probe_limit: usize) -> Self {
        Self {
            detector: chardetng::EncodingDetector::new(),
            head: Vec::with_capacity(MAX_BOM_LEN),
            bom: None,
            fed: 0,
            non_ascii: false,
            probe_limit,
        }
    }

    fn sniff_bom(&mut self, chunk: &[u8]) -> bool {
        if self.head.len() >= MAX_BOM_LEN {
            return false;
        }
        let take = (MAX_BOM_LEN - self.head.len()).min(chunk.len());
        self.head.extend_from_slice(&chunk[..take]);

        if let Some((encoding, _)) = Encoding::for_bom(&self.head) {
            self.bom = Some(encoding);
            return true;
        }
        false
    }
}

impl Default for ChardetAccumulator {
    fn default() -> Self {
        Self::new(DEFAULT_PROBE_LIMIT)
    }
}

impl CharsetAccumulator for ChardetAccumulator {
    fn feed(&mut self, chunk: &[u8]) -> bool {
        if self.sniff_bom(chunk) {
            return true;
        }

        self.non_ascii |= self.detector.feed(chunk, false);
        self.fed += chunk.len();
        // Pure ASCII so far proves nothing; keep reading until the first
        // non-ASCII byte or the end of the stream
        self.non_ascii && self.fed >= self.probe_limit
    }

    fn finish(mut self, complete: bool) -> Option<&'static Encoding> {
        if let Some(encoding) = self.bom {
            return Some(encoding);
        }
        if self.fed == 0 {
            return None;
        }
        // A truncated sample must not be closed off, or a multi-byte
        // sequence cut at the limit would rule out UTF-8.
        if complete {
            self.non_ascii |= self.detector.feed(&[], true);
        }
        if !self.non_ascii {
            return Some(UTF_8);
        }
        Some(self.detector.guess(None, true))
    }
}

/// Reads a file incrementally and asks an accumulator for its encoding
pub struct EncodingDetector {
    chunk_size: usize,
    probe_limit: usize,
}

impl Default for EncodingDetector {
    fn default() -> Self {
        Self {
            chunk_size: CHUNK_SIZE,
            probe_limit: DEFAULT_PROBE_LIMIT,
        }
    }
}

impl EncodingDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Detect the encoding of the file at `path`.
    /// `Ok(None)` means the file gave nothing to go on (empty file).
    pub fn detect_file(&self, path: &Path) -> Result<Option<&'static Encoding>> {
        let file = File::open(path).map_err(|e| {
            AppError::EncodingError(format!("failed to open {}: {}", path.display(), e))
        })?;
        self.detect_reader(file)
    }

    pub fn detect_reader<R: Read>(&self, reader: R) -> Result<Option<&'static Encoding>> {
        self.detect_with(reader, ChardetAccumulator::new(self.probe_limit))
    }

    /// Drive any accumulator over `reader` until it is confident or the
    /// stream ends
    pub fn detect_with<R, A>(&self, mut reader: R, mut accumulator: A) -> Result<Option<&'static Encoding>>
    where
        R: Read,
        A: CharsetAccumulator,
    {
        let mut buffer = vec![0u8; self.chunk_size];

        loop {
            let read = match reader.read(&mut buffer) {
                Ok(0) => return Ok(accumulator.finish(true)),
                Ok(read) => read,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Err(AppError::EncodingError(format!("failed to read input: {}", e)))
                }
            };

            if accumulator.feed(&buffer[..read]) {
                return Ok(accumulator.finish(false));
            }
        }
    }
}
