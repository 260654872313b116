//! Safe ownership layer over the GEOS C API.
//!
//! GEOS hands out opaque handles that must each be destroyed exactly once with
//! the matching destroy function. This crate wraps them in owned handles that
//! free themselves, converts geometries to and from WKT, WKB and hex WKB, and
//! builds rings, polygons and points from raw coordinates while moving
//! ownership of the intermediate handles into the finished geometry.
//!
//! # Example
//!
//! ```no_run
//! fn main() -> geos_wrap::Result<()> {
//!     // Initialize the engine for this thread
//!     geos_wrap::init()?;
//!
//!     let ring = vec![(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0), (0.0, 0.0)];
//!     let polygon = geos_wrap::make_polygon(&[ring])?;
//!     println!("{}", geos_wrap::to_wkt_with_precision(&polygon, 2)?);
//!
//!     let point = geos_wrap::from_hex_wkb("0101000000000000000000F03F0000000000000040")?;
//!     println!("{}", point.to_wkt()?);
//!
//!     // Handles must be dropped before the context they belong to
//!     drop((polygon, point));
//!     geos_wrap::shutdown();
//!     Ok(())
//! }
//! ```
//!
//! # Threads
//!
//! Every thread that uses the crate calls [`init`] first; each thread gets its
//! own engine context. Handles are neither `Send` nor `Sync`.

pub mod deserialize;
pub mod error;
pub mod factory;
mod ffi;
pub mod geometry;
pub mod handle;
pub mod resources;
pub mod serialize;
pub mod types;

// Re-export main types at the crate root
pub use deserialize::{from_hex_wkb, from_wkb, from_wkt};
pub use error::{Error, Result};
pub use factory::{make_coord_sequence, make_linear_ring, make_point, make_polygon};
pub use geos_sys as sys;
pub use handle::{
    release_all, CoordSeq, Destroy, Geometry, Owned, Shared, SharedCoordSeq, SharedGeometry,
};
pub use resources::{buffer_params, prepare, strtree, Prepared};
pub use serialize::{
    to_hex_wkb, to_hex_wkb_with, to_wkb, to_wkb_with, to_wkt, to_wkt_with, to_wkt_with_precision,
};
pub use types::{ByteOrder, Coord, Format, GeometryType, WkbOptions, WktOptions};

use std::ffi::CStr;

/// Initialize the GEOS context of the calling thread.
///
/// Must be called on a thread before any other function. Safe to call
/// multiple times (reference counted per thread).
pub fn init() -> Result<()> {
    ffi::context::init()
}

/// Release one [`init`] of the calling thread.
///
/// The context is finished when every `init` has been balanced. Handles still
/// alive at that point are leaked, not destroyed.
pub fn shutdown() {
    ffi::context::shutdown()
}

/// Check if the calling thread has an initialized context.
pub fn is_initialized() -> bool {
    ffi::context::is_initialized()
}

/// Get the version string of the linked GEOS library (e.g. "3.12.1-CAPI-1.18.1").
pub fn geos_version() -> String {
    unsafe {
        let ptr = sys::GEOSversion();
        if ptr.is_null() {
            return String::new();
        }
        CStr::from_ptr(ptr).to_string_lossy().into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geos_version() {
        let version = geos_version();
        assert!(version.contains("CAPI"), "unexpected version: {}", version);
    }

    #[test]
    fn test_init_reference_counted() {
        assert!(!is_initialized());
        init().unwrap();
        init().unwrap();
        shutdown();
        assert!(is_initialized());
        shutdown();
        assert!(!is_initialized());
    }

    #[test]
    fn test_shutdown_without_init_is_noop() {
        shutdown();
        assert!(!is_initialized());
    }
}
