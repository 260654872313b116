//! WKT, WKB and hex WKB to geometry.

use std::ffi::CString;

use geos_sys::{
    GEOSWKBReader_create_r, GEOSWKBReader_readHEX_r, GEOSWKBReader_read_r,
    GEOSWKTReader_create_r, GEOSWKTReader_read_r, GEOSWKBReader,
};

use crate::error::{Error, Result};
use crate::ffi::{with_context, Context};
use crate::handle::{Geometry, Owned};
use crate::types::Format;

/// Parse a geometry from WKT.
pub fn from_wkt(wkt: &str) -> Result<Geometry> {
    let text = CString::new(wkt)
        .map_err(|_| Error::InvalidArgument("WKT contains a NUL byte".to_string()))?;

    with_context(|ctx| unsafe {
        let reader = Owned::from_raw(GEOSWKTReader_create_r(ctx.handle()))
            .ok_or_else(|| ctx.failure(Error::Allocation("WKT reader")))?;

        Geometry::from_raw(GEOSWKTReader_read_r(ctx.handle(), reader.as_ptr(), text.as_ptr()))
            .ok_or_else(|| ctx.parse_failure(Format::Wkt))
    })
}

/// Parse a geometry from WKB.
pub fn from_wkb(wkb: &[u8]) -> Result<Geometry> {
    with_context(|ctx| unsafe {
        let reader = wkb_reader(ctx)?;

        Geometry::from_raw(GEOSWKBReader_read_r(
            ctx.handle(),
            reader.as_ptr(),
            wkb.as_ptr(),
            wkb.len(),
        ))
        .ok_or_else(|| ctx.parse_failure(Format::Wkb))
    })
}

/// Parse a geometry from hex-encoded WKB. Upper and lower case are accepted.
pub fn from_hex_wkb(hex: impl AsRef<[u8]>) -> Result<Geometry> {
    let hex = hex.as_ref();

    with_context(|ctx| unsafe {
        let reader = wkb_reader(ctx)?;

        Geometry::from_raw(GEOSWKBReader_readHEX_r(
            ctx.handle(),
            reader.as_ptr(),
            hex.as_ptr(),
            hex.len(),
        ))
        .ok_or_else(|| ctx.parse_failure(Format::HexWkb))
    })
}

unsafe fn wkb_reader(ctx: &Context) -> Result<Owned<GEOSWKBReader>> {
    Owned::from_raw(GEOSWKBReader_create_r(ctx.handle()))
        .ok_or_else(|| ctx.failure(Error::Allocation("WKB reader")))
}
