//! Owned handles for the engine's auxiliary resources.
//!
//! Only their lifetimes are managed here; buffering, prepared predicates and
//! index queries are left to the raw API.

use std::marker::PhantomData;

use geos_sys::{
    GEOSBufferParams, GEOSBufferParams_create_r, GEOSPrepare_r, GEOSPreparedGeometry,
    GEOSSTRtree, GEOSSTRtree_create_r,
};

use crate::error::{Error, Result};
use crate::ffi::with_context;
use crate::handle::{Geometry, Owned};

/// Create a buffer-parameters object with the engine defaults.
pub fn buffer_params() -> Result<Owned<GEOSBufferParams>> {
    with_context(|ctx| unsafe {
        Owned::from_raw(GEOSBufferParams_create_r(ctx.handle()))
            .ok_or_else(|| ctx.failure(Error::Allocation("buffer parameters")))
    })
}

/// Create an empty STR tree with the given node capacity.
pub fn strtree(node_capacity: usize) -> Result<Owned<GEOSSTRtree>> {
    if node_capacity < 2 {
        return Err(Error::InvalidArgument(format!(
            "STR tree node capacity must be at least 2, got {}",
            node_capacity
        )));
    }

    with_context(|ctx| unsafe {
        Owned::from_raw(GEOSSTRtree_create_r(ctx.handle(), node_capacity))
            .ok_or_else(|| ctx.failure(Error::Allocation("STR tree")))
    })
}

/// A prepared geometry. It refers to its source, so it cannot outlive it.
pub struct Prepared<'g> {
    handle: Owned<GEOSPreparedGeometry>,
    _source: PhantomData<&'g Geometry>,
}

impl<'g> Prepared<'g> {
    /// Get the raw handle.
    pub fn as_ptr(&self) -> *mut GEOSPreparedGeometry {
        self.handle.as_ptr()
    }
}

/// Prepare `geometry` for repeated predicate evaluation.
pub fn prepare(geometry: &Geometry) -> Result<Prepared<'_>> {
    with_context(|ctx| unsafe {
        let raw = GEOSPrepare_r(ctx.handle(), geometry.as_ptr()) as *mut GEOSPreparedGeometry;
        let handle = Owned::from_raw(raw)
            .ok_or_else(|| ctx.failure(Error::Allocation("prepared geometry")))?;
        Ok(Prepared {
            handle,
            _source: PhantomData,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::make_polygon;
    use crate::handle::ledger;

    #[test]
    fn test_auxiliary_handles_destroyed() {
        crate::init().unwrap();

        let polygon = make_polygon(&[vec![
            (0.0, 0.0),
            (4.0, 0.0),
            (4.0, 4.0),
            (0.0, 4.0),
            (0.0, 0.0),
        ]])
        .unwrap();
        ledger::reset();

        {
            let _params = buffer_params().unwrap();
            let _tree = strtree(10).unwrap();
            let prepared = prepare(&polygon).unwrap();
            assert!(!prepared.as_ptr().is_null());
        }

        let l = ledger::snapshot();
        assert_eq!(l.acquired, 3);
        assert_eq!(l.destroyed, 3);
        assert!(l.balanced(), "{:?}", l);

        drop(polygon);
        crate::shutdown();
    }

    #[test]
    fn test_strtree_capacity_checked() {
        crate::init().unwrap();
        assert!(matches!(strtree(1), Err(Error::InvalidArgument(_))));
        crate::shutdown();
    }
}
