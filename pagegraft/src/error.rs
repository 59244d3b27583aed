use thiserror::Error;

use crate::pdf::object::stream::filter::FilterError;

pub type Result<T> = std::result::Result<T, GraftError>;

/// Discriminant of [`GraftError`], handy for matching without caring about the
/// payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    UnexpectedEndOfInput,
    Format,
    Decode,
    Closed,
    PageOutOfRange,
}

#[derive(Debug, Error)]
pub enum GraftError {
    #[error("{source_id}: i/o error: {error}")]
    Io {
        source_id: String,
        #[source]
        error: std::io::Error,
    },

    #[error("{source_id}: unexpected end of input at byte {offset}")]
    UnexpectedEndOfInput { source_id: String, offset: u64 },

    #[error("{source_id}{}: {message}", at(.offset))]
    Format {
        source_id: String,
        offset: Option<u64>,
        message: String,
    },

    #[error("{source_id}{}: {message}", at(.offset))]
    Decode {
        source_id: String,
        offset: Option<u64>,
        message: String,
    },

    #[error("{source_id}: document is closed")]
    Closed { source_id: String },

    #[error("{source_id}: page {index} requested but the document has {count} pages")]
    PageOutOfRange {
        source_id: String,
        index: usize,
        count: usize,
    },
}

fn at(offset: &Option<u64>) -> String {
    match offset {
        Some(offset) => format!(" (byte {})", offset),
        None => String::new(),
    }
}

impl GraftError {
    pub fn format(source_id: &str, offset: Option<u64>, message: impl Into<String>) -> Self {
        GraftError::Format {
            source_id: source_id.to_owned(),
            offset,
            message: message.into(),
        }
    }

    pub(crate) fn io(source_id: &str, error: std::io::Error) -> Self {
        GraftError::Io {
            source_id: source_id.to_owned(),
            error,
        }
    }

    /// Attach the source identifier to a codec failure.
    ///
    /// Unsupported or malformed encodings are format errors, a failing
    /// decompression is a decode error.
    pub(crate) fn from_filter(source_id: &str, offset: Option<u64>, err: FilterError) -> Self {
        match err {
            FilterError::Inflate(_) => GraftError::Decode {
                source_id: source_id.to_owned(),
                offset,
                message: err.to_string(),
            },
            _ => GraftError::format(source_id, offset, err.to_string()),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            GraftError::Io { .. } => ErrorKind::Io,
            GraftError::UnexpectedEndOfInput { .. } => ErrorKind::UnexpectedEndOfInput,
            GraftError::Format { .. } => ErrorKind::Format,
            GraftError::Decode { .. } => ErrorKind::Decode,
            GraftError::Closed { .. } => ErrorKind::Closed,
            GraftError::PageOutOfRange { .. } => ErrorKind::PageOutOfRange,
        }
    }

    /// Identifier of the source the error originated from.
    pub fn source_id(&self) -> &str {
        match self {
            GraftError::Io { source_id, .. }
            | GraftError::UnexpectedEndOfInput { source_id, .. }
            | GraftError::Format { source_id, .. }
            | GraftError::Decode { source_id, .. }
            | GraftError::Closed { source_id }
            | GraftError::PageOutOfRange { source_id, .. } => source_id,
        }
    }
}
