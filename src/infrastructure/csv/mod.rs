// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// Encoding detection, input validation, CSV reading and writing

mod csv_parser;
mod csv_writer;
mod encoding_detector;
mod input_validator;

pub use csv_parser::{CsvParser, RecordReader};
pub use csv_writer::{CsvWriter, EncodeWriter, RecordWriter};
pub use encoding_detector::{CharsetAccumulator, ChardetAccumulator, EncodingDetector};
pub use input_validator::{resolve_encoding_label, InputValidator};
