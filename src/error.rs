//! Error types for the geos-wrap crate.

use thiserror::Error;

use crate::types::Format;

/// Result type alias for geos-wrap operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for geos-wrap operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// No engine context has been initialized on the calling thread.
    #[error("GEOS context not initialized on this thread (call geos_wrap::init first)")]
    NotInitialized,

    /// A constructor returned a null handle without reporting why.
    #[error("allocation failed: {0}")]
    Allocation(&'static str),

    /// Setting a coordinate component in a sequence failed.
    #[error("could not set coordinate {index} in sequence")]
    SequenceWrite {
        /// Position of the coordinate in the sequence.
        index: usize,
    },

    /// Ring, polygon or point construction returned null.
    #[error("could not create {kind}")]
    Construction {
        /// Geometry kind that was being built.
        kind: &'static str,
    },

    /// Deserialization returned no geometry.
    #[error("could not parse {format}: {message}")]
    Parse {
        /// Input format.
        format: Format,
        /// Message captured from the engine, if any.
        message: String,
    },

    /// The engine reported an error through its error callback.
    #[error("GEOS error: {0}")]
    Engine(String),

    /// Input that cannot be handed to the C API.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    /// Check if this is a parse error.
    pub fn is_parse(&self) -> bool {
        matches!(self, Error::Parse { .. })
    }

    /// Check if this error carries a message reported by the engine.
    pub fn is_engine(&self) -> bool {
        matches!(self, Error::Engine(_))
    }

    /// Check if this is a not-initialized error.
    pub fn is_not_initialized(&self) -> bool {
        matches!(self, Error::NotInitialized)
    }
}
