//! Geometry factories: coordinate sequences, rings, polygons and points.
//!
//! Construction goes bottom-up (sequence, ring, polygon). Each absorbing call
//! gets raw pointers while the children are still held by their [`Owned`]
//! wrappers, and the wrappers are released only once the call has returned a
//! geometry. On any failure the wrappers still own their handles and free them
//! as the error propagates.
//!
//! # Example
//!
//! ```no_run
//! # fn example() -> geos_wrap::Result<()> {
//! geos_wrap::init()?;
//!
//! let square = vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)];
//! let hole = vec![(2.0, 2.0), (2.0, 4.0), (4.0, 4.0), (4.0, 2.0), (2.0, 2.0)];
//! let polygon = geos_wrap::make_polygon(&[square, hole])?;
//! assert_eq!(polygon.num_interior_rings()?, 1);
//!
//! geos_wrap::shutdown();
//! # Ok(())
//! # }
//! ```

use std::os::raw::c_uint;

use geos_sys::{
    GEOSCoordSeq_create_r, GEOSCoordSeq_setX_r, GEOSCoordSeq_setY_r,
    GEOSGeom_createEmptyPolygon_r, GEOSGeometry,
};

use crate::error::{Error, Result};
use crate::ffi::{construct, with_context, Context};
use crate::handle::{release_all, CoordSeq, Geometry, Owned};
use crate::types::Coord;

/// Build a 2-D coordinate sequence holding `coords` in order.
pub fn make_coord_sequence(coords: &[Coord]) -> Result<CoordSeq> {
    with_context(|ctx| coord_sequence(ctx, coords))
}

/// Build a linear ring from `coords`.
///
/// The ring must be closed and have zero or at least four points.
pub fn make_linear_ring(coords: &[Coord]) -> Result<Geometry> {
    with_context(|ctx| linear_ring(ctx, coords))
}

/// Build a polygon. `rings[0]` is the exterior ring, the rest are holes.
///
/// An empty `rings` yields an empty polygon.
pub fn make_polygon(rings: &[Vec<Coord>]) -> Result<Geometry> {
    with_context(|ctx| polygon(ctx, rings))
}

/// Build a point at `(x, y)`.
pub fn make_point(x: f64, y: f64) -> Result<Geometry> {
    with_context(|ctx| point(ctx, x, y))
}

fn coord_sequence(ctx: &Context, coords: &[Coord]) -> Result<CoordSeq> {
    let size = c_uint::try_from(coords.len()).map_err(|_| {
        Error::InvalidArgument(format!("{} coordinates do not fit in a sequence", coords.len()))
    })?;

    unsafe {
        let seq = CoordSeq::from_raw(GEOSCoordSeq_create_r(ctx.handle(), size, 2))
            .ok_or_else(|| ctx.failure(Error::Allocation("coordinate sequence")))?;

        for (index, &(x, y)) in coords.iter().enumerate() {
            let ret_x = GEOSCoordSeq_setX_r(ctx.handle(), seq.as_ptr(), index as c_uint, x);
            let ret_y = GEOSCoordSeq_setY_r(ctx.handle(), seq.as_ptr(), index as c_uint, y);

            if ret_x == 0 || ret_y == 0 {
                return Err(ctx.failure(Error::SequenceWrite { index }));
            }
        }

        Ok(seq)
    }
}

fn linear_ring(ctx: &Context, coords: &[Coord]) -> Result<Geometry> {
    let seq = coord_sequence(ctx, coords)?;

    unsafe {
        let ring = Geometry::from_raw(construct::create_linear_ring(ctx, seq.as_ptr()))
            .ok_or_else(|| ctx.failure(Error::Construction { kind: "linear ring" }))?;
        // owned by the ring now
        seq.release();
        Ok(ring)
    }
}

fn polygon(ctx: &Context, rings: &[Vec<Coord>]) -> Result<Geometry> {
    // Stops at the first bad ring; the rings built so far are dropped.
    let rings = rings
        .iter()
        .map(|coords| linear_ring(ctx, coords))
        .collect::<Result<Vec<_>>>()?;

    let Some((shell, holes)) = rings.split_first() else {
        return unsafe {
            Geometry::from_raw(GEOSGeom_createEmptyPolygon_r(ctx.handle()))
                .ok_or_else(|| ctx.failure(Error::Construction { kind: "empty polygon" }))
        };
    };

    let mut hole_ptrs: Vec<*mut GEOSGeometry> = holes.iter().map(Owned::as_ptr).collect();

    let polygon = unsafe {
        Geometry::from_raw(construct::create_polygon(ctx, shell.as_ptr(), &mut hole_ptrs))
            .ok_or_else(|| ctx.failure(Error::Construction { kind: "polygon" }))?
    };

    // The polygon took every ring; only now is it safe to let go of them.
    release_all(rings);
    Ok(polygon)
}

fn point(ctx: &Context, x: f64, y: f64) -> Result<Geometry> {
    let seq = coord_sequence(ctx, &[(x, y)])?;

    unsafe {
        let point = Geometry::from_raw(construct::create_point(ctx, seq.as_ptr()))
            .ok_or_else(|| ctx.failure(Error::Construction { kind: "point" }))?;
        seq.release();
        Ok(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::ledger;
    use crate::types::GeometryType;

    fn square(origin: f64, size: f64) -> Vec<Coord> {
        vec![
            (origin, origin),
            (origin + size, origin),
            (origin + size, origin + size),
            (origin, origin + size),
            (origin, origin),
        ]
    }

    #[test]
    fn test_coord_sequence_keeps_order() {
        crate::init().unwrap();

        let seq = make_coord_sequence(&[(1.0, 2.0), (3.0, 4.0), (5.0, 6.0)]).unwrap();
        assert_eq!(seq.len().unwrap(), 3);
        assert_eq!(seq.get(0).unwrap(), (1.0, 2.0));
        assert_eq!(seq.get(2).unwrap(), (5.0, 6.0));

        drop(seq);
        crate::shutdown();
    }

    #[test]
    fn test_ring_absorbs_sequence() {
        crate::init().unwrap();
        ledger::reset();

        let ring = make_linear_ring(&square(0.0, 1.0)).unwrap();
        assert_eq!(ring.geometry_type().unwrap(), GeometryType::LinearRing);

        let l = ledger::snapshot();
        assert_eq!(l.acquired, 2);
        assert_eq!(l.released, 1);
        assert_eq!(l.destroyed, 0);

        drop(ring);
        let l = ledger::snapshot();
        assert_eq!(l.destroyed, 1);
        assert!(l.balanced(), "{:?}", l);
        crate::shutdown();
    }

    #[test]
    fn test_failed_ring_destroys_sequence() {
        crate::init().unwrap();
        ledger::reset();

        // Not closed.
        let err = make_linear_ring(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]).unwrap_err();
        assert!(err.is_engine(), "unexpected error: {:?}", err);
        assert!(err.to_string().contains("closed"));

        let l = ledger::snapshot();
        assert_eq!(l.acquired, 1);
        assert_eq!(l.destroyed, 1);
        assert_eq!(l.released, 0);
        assert!(l.balanced(), "{:?}", l);
        crate::shutdown();
    }

    #[test]
    fn test_polygon_with_hole_balanced() {
        crate::init().unwrap();
        ledger::reset();

        let polygon = make_polygon(&[square(0.0, 10.0), square(2.0, 2.0)]).unwrap();
        assert_eq!(polygon.geometry_type().unwrap(), GeometryType::Polygon);
        assert_eq!(polygon.num_interior_rings().unwrap(), 1);

        let l = ledger::snapshot();
        // two sequences, two rings, one polygon
        assert_eq!(l.acquired, 5);
        assert_eq!(l.released, 4);
        assert_eq!(l.destroyed, 0);
        assert_eq!(l.live.len(), 1);

        drop(polygon);
        let l = ledger::snapshot();
        assert_eq!(l.destroyed, 1);
        assert!(l.balanced(), "{:?}", l);
        crate::shutdown();
    }

    #[test]
    fn test_polygon_partial_failure_leaks_nothing() {
        crate::init().unwrap();
        ledger::reset();

        let bad = vec![(5.0, 5.0), (6.0, 5.0), (6.0, 6.0)];
        let result = make_polygon(&[square(0.0, 10.0), square(2.0, 2.0), bad]);
        assert!(result.is_err());

        let l = ledger::snapshot();
        assert_eq!(l.acquired, 5);
        assert_eq!(l.released, 2);
        assert_eq!(l.destroyed, 3);
        assert!(l.balanced(), "{:?}", l);
        crate::shutdown();
    }

    #[test]
    fn test_empty_shell_with_empty_hole_builds() {
        crate::init().unwrap();
        ledger::reset();

        let polygon = make_polygon(&[Vec::new(), Vec::new()]).unwrap();
        assert_eq!(polygon.geometry_type().unwrap(), GeometryType::Polygon);
        assert!(polygon.is_empty().unwrap());
        assert_eq!(polygon.num_interior_rings().unwrap(), 1);

        let l = ledger::snapshot();
        // both sequences and both rings were absorbed
        assert_eq!(l.acquired, 5);
        assert_eq!(l.released, 4);
        assert_eq!(l.destroyed, 0);

        drop(polygon);
        assert!(ledger::snapshot().balanced(), "{:?}", ledger::snapshot());
        crate::shutdown();
    }

    #[test]
    fn test_polygon_rejected_keeps_rings_owned() {
        crate::init().unwrap();
        ledger::reset();

        // An empty shell with a hole is refused by the polygon constructor itself.
        let err = make_polygon(&[Vec::new(), square(2.0, 2.0)]).unwrap_err();
        assert!(err.is_engine(), "unexpected error: {:?}", err);

        let l = ledger::snapshot();
        // the sequences went into the rings, the rings went back through their wrappers
        assert_eq!(l.acquired, 4);
        assert_eq!(l.released, 2);
        assert_eq!(l.destroyed, 2);
        assert!(l.balanced(), "{:?}", l);
        crate::shutdown();
    }

    #[test]
    fn test_empty_polygon() {
        crate::init().unwrap();
        ledger::reset();

        let polygon = make_polygon(&[]).unwrap();
        assert_eq!(polygon.geometry_type().unwrap(), GeometryType::Polygon);
        assert!(polygon.is_empty().unwrap());

        drop(polygon);
        assert!(ledger::snapshot().balanced());
        crate::shutdown();
    }

    #[test]
    fn test_point_absorbs_sequence() {
        crate::init().unwrap();
        ledger::reset();

        let point = make_point(3.5, -1.25).unwrap();
        assert_eq!(point.geometry_type().unwrap(), GeometryType::Point);

        let l = ledger::snapshot();
        assert_eq!(l.acquired, 2);
        assert_eq!(l.released, 1);

        drop(point);
        assert!(ledger::snapshot().balanced());
        crate::shutdown();
    }

    #[test]
    fn test_factories_require_init() {
        let err = make_point(0.0, 0.0).unwrap_err();
        assert!(err.is_not_initialized());
        assert!(make_polygon(&[]).unwrap_err().is_not_initialized());
    }
}
