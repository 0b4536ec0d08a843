// ============================================================
// INPUT VALIDATOR
// ============================================================
// Confirm the input is readable under the resolved encoding before
// anything touches the output file

use std::fs::{self, File};
use std::io::{self, ErrorKind, Read};
use std::path::Path;

use encoding_rs::{DecoderResult, Encoding};

use crate::domain::error::{AppError, Result};

/// Bytes decoded by the probe
const PROBE_LEN: usize = 4 * 1024;

/// Codec names in common use that are not WHATWG labels
const LABEL_ALIASES: &[(&str, &str)] = &[
    ("latin-1", "latin1"),
    ("l1", "latin1"),
    ("iso-8859-1", "latin1"),
    ("8859", "latin1"),
    ("cp819", "latin1"),
    ("u8", "utf-8"),
    ("utf", "utf-8"),
    ("utf-8-sig", "utf-8"),
    ("cp65001", "utf-8"),
    ("utf-16-le", "utf-16le"),
    ("utf-16-be", "utf-16be"),
    ("cp932", "shift_jis"),
    ("ms932", "shift_jis"),
    ("shift-jis", "shift_jis"),
    ("sjis", "shift_jis"),
    ("mac-roman", "macintosh"),
    ("cp936", "gbk"),
    ("cp949", "euc-kr"),
    ("cp950", "big5"),
];

/// Look up an encoding by label. WHATWG labels (`utf-8`, `cp1252`,
/// `iso-8859-2`, ...) resolve directly; other common codec spellings
/// (`latin-1`, `utf_8`, `UTF-8-SIG`, ...) are normalised first.
pub fn resolve_encoding_label(label: &str) -> Result<&'static Encoding> {
    let trimmed = label.trim();
    if let Some(encoding) = Encoding::for_label(trimmed.as_bytes()) {
        return Ok(encoding);
    }

    let normalised = trimmed.to_ascii_lowercase().replace('_', "-");
    let canonical = LABEL_ALIASES
        .iter()
        .find(|(alias, _)| *alias == normalised)
        .map(|(_, target)| *target)
        .unwrap_or(normalised.as_str());

    Encoding::for_label(canonical.as_bytes())
        .ok_or_else(|| AppError::OpenError(format!("unknown encoding: {}", label)))
}

pub struct InputValidator {
    probe_len: usize,
}

impl Default for InputValidator {
    fn default() -> Self {
        Self {
            probe_len: PROBE_LEN,
        }
    }
}

impl InputValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check that `input` exists, is a regular readable file, and that its
    /// leading bytes decode under `encoding`
    pub fn validate(&self, input: &Path, encoding: &'static Encoding) -> Result<()> {
        let metadata = fs::metadata(input).map_err(|e| open_error(input, e))?;
        if metadata.is_dir() {
            return Err(AppError::OpenError(format!(
                "{} is a directory",
                input.display()
            )));
        }

        let file = File::open(input).map_err(|e| open_error(input, e))?;
        let mut probe = Vec::with_capacity(self.probe_len);
        file.take(self.probe_len as u64)
            .read_to_end(&mut probe)
            .map_err(|e| open_error(input, e))?;

        // A BOM overrides the configured encoding, same as the reader
        let (encoding, bom_len) = Encoding::for_bom(&probe).unwrap_or((encoding, 0));
        let mut decoder = encoding.new_decoder_without_bom_handling();
        let capacity = decoder
            .max_utf8_buffer_length_without_replacement(probe.len())
            .unwrap_or(probe.len() * 4);
        let mut decoded = String::with_capacity(capacity);

        // `last = false`: a sequence cut at the probe boundary is fine
        let (result, _) =
            decoder.decode_to_string_without_replacement(&probe[bom_len..], &mut decoded, false);

        match result {
            DecoderResult::Malformed(_, _) => Err(AppError::OpenError(format!(
                "{} is not valid {}",
                input.display(),
                encoding.name()
            ))),
            DecoderResult::InputEmpty | DecoderResult::OutputFull => Ok(()),
        }
    }

    /// Reject an output path that points at the input file
    pub fn ensure_distinct_output(&self, input: &Path, output: &Path) -> Result<()> {
        let (Ok(input_real), Ok(output_real)) = (fs::canonicalize(input), fs::canonicalize(output))
        else {
            // Output does not exist yet, so it cannot be the input
            return Ok(());
        };

        if input_real == output_real {
            return Err(AppError::ValidationError(format!(
                "output file {} is the input file",
                output.display()
            )));
        }
        Ok(())
    }
}

fn open_error(path: &Path, err: io::Error) -> AppError {
    match err.kind() {
        ErrorKind::NotFound => AppError::NotFound(path.display().to_string()),
        _ => AppError::OpenError(format!("{}: {}", path.display(), err)),
    }
}
