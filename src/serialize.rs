//! Geometry to WKT, WKB and hex WKB.
//!
//! Each call creates its own writer, and the buffer the writer returns is
//! allocated by GEOS. Both are held by [`Owned`] wrappers so they go back to
//! GEOS on every path, and the output is copied into Rust memory before that.

use std::ffi::CStr;
use std::os::raw::{c_char, c_int};

use geos_sys::{
    GEOSWKBWriter_create_r, GEOSWKBWriter_setByteOrder_r, GEOSWKBWriter_setOutputDimension_r,
    GEOSWKBWriter_writeHEX_r, GEOSWKBWriter_write_r, GEOSWKTWriter_create_r,
    GEOSWKTWriter_setOutputDimension_r, GEOSWKTWriter_setRoundingPrecision_r,
    GEOSWKTWriter_setTrim_r, GEOSWKTWriter_write_r, GEOSWKBWriter,
};

use crate::error::{Error, Result};
use crate::ffi::{with_context, Context};
use crate::handle::{ByteBuffer, Geometry, Owned, TextBuffer};
use crate::types::{WkbOptions, WktOptions};

/// Write `geometry` as WKT with 15 significant digits.
pub fn to_wkt(geometry: &Geometry) -> Result<String> {
    to_wkt_with(geometry, &WktOptions::default())
}

/// Write `geometry` as WKT, rounding coordinates to `precision` digits.
pub fn to_wkt_with_precision(geometry: &Geometry, precision: i32) -> Result<String> {
    let options = WktOptions {
        precision,
        ..Default::default()
    };
    to_wkt_with(geometry, &options)
}

/// Write `geometry` as WKT using `options`.
pub fn to_wkt_with(geometry: &Geometry, options: &WktOptions) -> Result<String> {
    with_context(|ctx| unsafe {
        let writer = Owned::from_raw(GEOSWKTWriter_create_r(ctx.handle()))
            .ok_or_else(|| ctx.failure(Error::Allocation("WKT writer")))?;

        GEOSWKTWriter_setRoundingPrecision_r(ctx.handle(), writer.as_ptr(), options.precision);
        GEOSWKTWriter_setTrim_r(ctx.handle(), writer.as_ptr(), options.trim as c_char);
        GEOSWKTWriter_setOutputDimension_r(
            ctx.handle(),
            writer.as_ptr(),
            options.output_dimension as c_int,
        );

        let raw = GEOSWKTWriter_write_r(ctx.handle(), writer.as_ptr(), geometry.as_ptr());
        let text = Owned::from_raw(raw as *mut TextBuffer)
            .ok_or_else(|| ctx.failure(Error::Engine("WKT writer returned no output".to_string())))?;

        Ok(CStr::from_ptr(text.as_ptr() as *const c_char)
            .to_string_lossy()
            .into_owned())
    })
}

/// Write `geometry` as little-endian WKB.
pub fn to_wkb(geometry: &Geometry) -> Result<Vec<u8>> {
    to_wkb_with(geometry, &WkbOptions::default())
}

/// Write `geometry` as WKB using `options`.
pub fn to_wkb_with(geometry: &Geometry, options: &WkbOptions) -> Result<Vec<u8>> {
    with_context(|ctx| unsafe {
        let writer = wkb_writer(ctx, options)?;

        let mut size: usize = 0;
        let raw = GEOSWKBWriter_write_r(ctx.handle(), writer.as_ptr(), geometry.as_ptr(), &mut size);
        let bytes = Owned::from_raw(raw as *mut ByteBuffer)
            .ok_or_else(|| ctx.failure(Error::Engine("WKB writer returned no output".to_string())))?;

        // WKB holds zero bytes, so the copy is bounded by the reported size.
        Ok(std::slice::from_raw_parts(bytes.as_ptr() as *const u8, size).to_vec())
    })
}

/// Write `geometry` as hex-encoded little-endian WKB.
pub fn to_hex_wkb(geometry: &Geometry) -> Result<String> {
    to_hex_wkb_with(geometry, &WkbOptions::default())
}

/// Write `geometry` as hex-encoded WKB using `options`.
pub fn to_hex_wkb_with(geometry: &Geometry, options: &WkbOptions) -> Result<String> {
    let bytes = with_context(|ctx| unsafe {
        let writer = wkb_writer(ctx, options)?;

        let mut size: usize = 0;
        let raw =
            GEOSWKBWriter_writeHEX_r(ctx.handle(), writer.as_ptr(), geometry.as_ptr(), &mut size);
        let hex = Owned::from_raw(raw as *mut ByteBuffer).ok_or_else(|| {
            ctx.failure(Error::Engine("WKB writer returned no hex output".to_string()))
        })?;

        Ok(std::slice::from_raw_parts(hex.as_ptr() as *const u8, size).to_vec())
    })?;

    String::from_utf8(bytes)
        .map_err(|e| Error::Engine(format!("hex WKB output is not ASCII: {}", e)))
}

unsafe fn wkb_writer(ctx: &Context, options: &WkbOptions) -> Result<Owned<GEOSWKBWriter>> {
    let writer = Owned::from_raw(GEOSWKBWriter_create_r(ctx.handle()))
        .ok_or_else(|| ctx.failure(Error::Allocation("WKB writer")))?;

    GEOSWKBWriter_setByteOrder_r(ctx.handle(), writer.as_ptr(), options.byte_order.into());
    GEOSWKBWriter_setOutputDimension_r(
        ctx.handle(),
        writer.as_ptr(),
        options.output_dimension as c_int,
    );

    Ok(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::make_point;
    use crate::handle::ledger;

    fn assert_writer_and_buffer_freed() {
        let l = ledger::snapshot();
        assert_eq!(l.acquired, 2, "{:?}", l);
        assert_eq!(l.destroyed, 2, "{:?}", l);
        assert_eq!(l.released, 0, "{:?}", l);
        assert!(l.balanced(), "{:?}", l);
    }

    #[test]
    fn test_writers_and_buffers_destroyed_once() {
        crate::init().unwrap();
        let point = make_point(1.0, 2.0).unwrap();

        ledger::reset();
        let wkt = to_wkt(&point).unwrap();
        assert!(wkt.starts_with("POINT"));
        assert_writer_and_buffer_freed();

        ledger::reset();
        let wkb = to_wkb(&point).unwrap();
        assert_eq!(wkb.len(), 21);
        assert_writer_and_buffer_freed();

        ledger::reset();
        let hex = to_hex_wkb(&point).unwrap();
        assert_eq!(hex.len(), 42);
        assert_writer_and_buffer_freed();

        drop(point);
        crate::shutdown();
    }

    #[test]
    fn test_writer_options_applied() {
        crate::init().unwrap();
        let point = make_point(1.0, 2.0).unwrap();

        let trimmed = WktOptions {
            trim: true,
            ..Default::default()
        };
        assert_eq!(to_wkt_with(&point, &trimmed).unwrap(), "POINT (1 2)");

        let big = WkbOptions {
            byte_order: crate::types::ByteOrder::Big,
            ..Default::default()
        };
        assert!(to_hex_wkb_with(&point, &big).unwrap().starts_with("00"));

        drop(point);
        crate::shutdown();
    }
}
