use enough::StopReason;

/// Errors from PNM/PFM detection, decoding and encoding.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PnmError {
    #[error("unrecognized format magic bytes")]
    UnrecognizedFormat,

    #[error("format mismatch: expected magic {expected}, found {found:?}")]
    FormatMismatch {
        expected: &'static str,
        found: String,
    },

    #[error("invalid header: {0}")]
    HeaderParse(String),

    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: i64, height: i64 },

    #[error("pixel data ended before all samples were read")]
    TruncatedData,

    #[error("malformed sample: {0}")]
    MalformedSample(String),

    #[error("unsupported format variant: {0}")]
    UnsupportedVariant(String),

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("buffer too small: need {needed} samples, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    #[error("i/o error: {0}")]
    Io(#[source] std::io::Error),

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

impl From<StopReason> for PnmError {
    fn from(r: StopReason) -> Self {
        PnmError::Cancelled(r)
    }
}

impl From<std::io::Error> for PnmError {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::UnexpectedEof => PnmError::TruncatedData,
            _ => PnmError::Io(e),
        }
    }
}
