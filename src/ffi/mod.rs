//! FFI plumbing around the GEOS C API.
//!
//! The raw declarations come from `geos-sys`. This module adds the per-thread
//! context, the error channel and the constructor entry points the factories
//! rely on. Users should prefer the safe wrappers in the parent modules.

pub mod construct;
pub mod context;
pub mod error;

pub use context::{try_with_handle, with_context, Context};
