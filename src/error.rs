//! Crate error types
//!
//! Only encoder configuration failures abort startup; everything else is
//! contained at the site where it happens (see the pipeline module).

use std::io;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for mixer operations
#[derive(Debug)]
pub enum Error {
    /// Encoder rejected the requested configuration (fatal to startup)
    EncoderConfig(String),
    /// Mid-session encoder failure (logged by the pipeline, non-fatal)
    Encoder(String),
    /// The session is not running (already stopped or never started)
    SessionClosed,
    /// I/O error from the outbound transport
    Io(io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::EncoderConfig(msg) => write!(f, "Encoder configuration rejected: {}", msg),
            Error::Encoder(msg) => write!(f, "Encoder error: {}", msg),
            Error::SessionClosed => write!(f, "Mixer session is not running"),
            Error::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = Error::EncoderConfig("unsupported codec".into());
        assert_eq!(
            err.to_string(),
            "Encoder configuration rejected: unsupported codec"
        );

        let err = Error::SessionClosed;
        assert_eq!(err.to_string(), "Mixer session is not running");
    }

    #[test]
    fn test_io_conversion() {
        let io_err = io::Error::new(io::ErrorKind::BrokenPipe, "pipe");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
