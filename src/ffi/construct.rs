//! Absorbing constructors with a uniform ownership contract.
//!
//! GEOS moves a coordinate sequence into a ring or point before validating
//! it, so when `GEOSGeom_createLinearRing_r` or `GEOSGeom_createPoint_r` fail
//! the sequence is already gone. `GEOSGeom_createPolygon_r` frees the shell
//! and every hole when it refuses them, whether because one of them is not a
//! linear ring or because the shell is empty while a hole is not.
//!
//! The functions here check those construction rules up front, report the
//! engine's message on the error channel and return null with every input
//! untouched. Past that point the engine call only fails on allocation. The
//! factories can then rely on one contract: a null result means nothing was
//! absorbed.

use std::os::raw::{c_double, c_uint};
use std::ptr;

use geos_sys::{
    GEOSCoordSeq_getSize_r, GEOSCoordSeq_getX_r, GEOSCoordSeq_getY_r, GEOSCoordSequence,
    GEOSGeomTypeId_r, GEOSGeom_createLinearRing_r, GEOSGeom_createPoint_r,
    GEOSGeom_createPolygon_r, GEOSGeometry, GEOSisEmpty_r,
};

use super::context::Context;

const LINEAR_RING_TYPE_ID: i32 = 2;

unsafe fn sequence_size(ctx: &Context, seq: *mut GEOSCoordSequence) -> Option<c_uint> {
    let mut size: c_uint = 0;
    if GEOSCoordSeq_getSize_r(ctx.handle(), seq, &mut size) == 0 {
        return None;
    }
    Some(size)
}

unsafe fn xy_at(ctx: &Context, seq: *mut GEOSCoordSequence, index: c_uint) -> Option<(f64, f64)> {
    let mut x: c_double = 0.0;
    let mut y: c_double = 0.0;
    if GEOSCoordSeq_getX_r(ctx.handle(), seq, index, &mut x) == 0
        || GEOSCoordSeq_getY_r(ctx.handle(), seq, index, &mut y) == 0
    {
        return None;
    }
    Some((x, y))
}

/// Build a linear ring from `seq`. `seq` is absorbed only if the result is non-null.
///
/// # Safety
///
/// `seq` must be a live coordinate sequence owned by the caller.
pub unsafe fn create_linear_ring(ctx: &Context, seq: *mut GEOSCoordSequence) -> *mut GEOSGeometry {
    let Some(size) = sequence_size(ctx, seq) else {
        return ptr::null_mut();
    };

    if size != 0 && size < 4 {
        ctx.report(format!(
            "IllegalArgumentException: Invalid number of points in LinearRing found {} - must be 0 or >= 4",
            size
        ));
        return ptr::null_mut();
    }

    if size != 0 {
        let (Some(first), Some(last)) = (xy_at(ctx, seq, 0), xy_at(ctx, seq, size - 1)) else {
            return ptr::null_mut();
        };
        if first != last {
            ctx.report(
                "IllegalArgumentException: Points of LinearRing do not form a closed linestring"
                    .to_string(),
            );
            return ptr::null_mut();
        }
    }

    GEOSGeom_createLinearRing_r(ctx.handle(), seq)
}

/// Build a point from `seq`. `seq` is absorbed only if the result is non-null.
///
/// # Safety
///
/// `seq` must be a live coordinate sequence owned by the caller.
pub unsafe fn create_point(ctx: &Context, seq: *mut GEOSCoordSequence) -> *mut GEOSGeometry {
    let Some(size) = sequence_size(ctx, seq) else {
        return ptr::null_mut();
    };

    if size > 1 {
        ctx.report(
            "IllegalArgumentException: Point coordinate list must contain a single element"
                .to_string(),
        );
        return ptr::null_mut();
    }

    GEOSGeom_createPoint_r(ctx.handle(), seq)
}

/// Build a polygon from a shell and holes, all of which are absorbed only if
/// the result is non-null.
///
/// # Safety
///
/// `shell` and every entry of `holes` must be live geometries owned by the caller.
pub unsafe fn create_polygon(
    ctx: &Context,
    shell: *mut GEOSGeometry,
    holes: &mut [*mut GEOSGeometry],
) -> *mut GEOSGeometry {
    if GEOSGeomTypeId_r(ctx.handle(), shell) != LINEAR_RING_TYPE_ID {
        ctx.report("IllegalArgumentException: Shell is not a LinearRing".to_string());
        return ptr::null_mut();
    }
    if holes
        .iter()
        .any(|&hole| GEOSGeomTypeId_r(ctx.handle(), hole) != LINEAR_RING_TYPE_ID)
    {
        ctx.report("IllegalArgumentException: Hole is not a LinearRing".to_string());
        return ptr::null_mut();
    }

    if !holes.is_empty() {
        match GEOSisEmpty_r(ctx.handle(), shell) {
            0 => {}
            1 => {
                let mut any_filled = false;
                for &hole in holes.iter() {
                    match GEOSisEmpty_r(ctx.handle(), hole) {
                        0 => any_filled = true,
                        1 => {}
                        _ => return ptr::null_mut(),
                    }
                }
                if any_filled {
                    ctx.report(
                        "IllegalArgumentException: shell is empty but holes are not".to_string(),
                    );
                    return ptr::null_mut();
                }
            }
            _ => return ptr::null_mut(),
        }
    }

    let Ok(hole_count) = c_uint::try_from(holes.len()) else {
        ctx.report(format!("IllegalArgumentException: too many holes ({})", holes.len()));
        return ptr::null_mut();
    };

    GEOSGeom_createPolygon_r(ctx.handle(), shell, holes.as_mut_ptr(), hole_count)
}
