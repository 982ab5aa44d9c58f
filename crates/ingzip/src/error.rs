use std::io;
use thiserror::Error;

/// Errors yielded by a request body stream while it is being read.
#[derive(Error, Debug)]
pub enum BodyError {
    #[error("invalid body: {reason}")]
    InvalidBody { reason: String },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl BodyError {
    pub fn invalid_body<S: ToString>(str: S) -> Self {
        Self::InvalidBody { reason: str.to_string() }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}

/// Reasons a buffered gzip payload could not be decoded.
///
/// These never leave the middleware: each one makes it fall back to forwarding the
/// original bytes.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("invalid gzip header")]
    InvalidHeader,

    #[error("corrupted gzip stream: {source}")]
    Corrupted {
        #[from]
        source: io::Error,
    },

    #[error("decoded body exceed the limit {limit}")]
    TooLarge { limit: usize },
}

impl DecodeError {
    pub fn too_large(limit: usize) -> Self {
        Self::TooLarge { limit }
    }
}
