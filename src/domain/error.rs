use std::fmt;

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    OpenError(String),
    EncodingError(String),
    ValidationError(String),
    ParseError(String),
    IoError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Input file not found: {}", msg),
            AppError::OpenError(msg) => write!(f, "Error opening input file: {}", msg),
            AppError::EncodingError(msg) => write!(f, "Encoding detection error: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            AppError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        if err.is_io_error() {
            return AppError::IoError(err.to_string());
        }
        AppError::ParseError(err.to_string())
    }
}

impl From<figment::Error> for AppError {
    fn from(err: figment::Error) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl AppError {
    /// Whether the error was raised before the output file was touched
    pub fn is_pre_processing(&self) -> bool {
        matches!(
            self,
            AppError::NotFound(_) | AppError::OpenError(_) | AppError::ValidationError(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion() {
        let err: AppError = std::io::Error::new(std::io::ErrorKind::Other, "disk full").into();
        assert!(matches!(err, AppError::IoError(_)));
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn test_pre_processing_kinds() {
        assert!(AppError::NotFound("a.csv".into()).is_pre_processing());
        assert!(AppError::OpenError("a.csv".into()).is_pre_processing());
        assert!(!AppError::IoError("broken pipe".into()).is_pre_processing());
    }
}
