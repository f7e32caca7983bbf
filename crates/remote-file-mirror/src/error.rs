//! Error types for the file mirror

use std::fmt;

#[derive(Debug)]
pub enum MirrorError {
    /// The remote resource is not a JPEG, PNG, or GIF.
    UnsupportedFormat,
    /// The remote server answered with a non-success status.
    Status(reqwest::StatusCode),
    Http(reqwest::Error),
    Io(Box<std::io::Error>),
}

impl fmt::Display for MirrorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MirrorError::UnsupportedFormat => write!(f, "unsupported image format"),
            MirrorError::Status(status) => write!(f, "remote server returned status {}", status),
            MirrorError::Http(err) => write!(f, "HTTP error: {}", err),
            MirrorError::Io(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for MirrorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MirrorError::Http(err) => Some(err),
            MirrorError::Io(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for MirrorError {
    fn from(err: reqwest::Error) -> Self {
        MirrorError::Http(err)
    }
}

impl From<std::io::Error> for MirrorError {
    fn from(err: std::io::Error) -> Self {
        MirrorError::Io(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, MirrorError>;
