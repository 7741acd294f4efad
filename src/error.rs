//! Unified error type.

use std::fmt;
use std::net::AddrParseError;

/// The error type returned by tollgate's fallible operations.
///
/// Rejections such as `401 Unauthorized` or `404 Not Found` are expressed as
/// [`Response`](crate::Response) values, not as `Error`s. This type surfaces
/// startup and infrastructure failures only.
#[derive(Debug)]
pub enum Error {
    /// Binding the listener or accepting a connection failed.
    Io(std::io::Error),
    /// The configured listen address is not a valid `host:port`.
    Addr {
        value: String,
        source: AddrParseError,
    },
}

impl Error {
    pub(crate) fn addr(value: &str, source: AddrParseError) -> Self {
        Self::Addr { value: value.to_owned(), source }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Addr { value, source } => write!(f, "invalid listen address `{value}`: {source}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Addr { source, .. } => Some(source),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
