//! Read-only queries on owned geometries and coordinate sequences.

use std::os::raw::{c_double, c_int, c_uint};

use geos_sys::{
    GEOSCoordSeq_getSize_r, GEOSCoordSeq_getX_r, GEOSCoordSeq_getY_r, GEOSCoordSequence,
    GEOSGeomTypeId_r, GEOSGeometry, GEOSGetNumInteriorRings_r, GEOSisEmpty_r,
};

use crate::error::{Error, Result};
use crate::ffi::with_context;
use crate::handle::Owned;
use crate::types::{Coord, GeometryType};
use crate::{deserialize, serialize};

impl Owned<GEOSGeometry> {
    /// Get the kind of this geometry.
    pub fn geometry_type(&self) -> Result<GeometryType> {
        with_context(|ctx| {
            let id = unsafe { GEOSGeomTypeId_r(ctx.handle(), self.as_ptr()) };
            if id < 0 {
                return Err(ctx.failure(Error::Engine("could not read geometry type".to_string())));
            }
            GeometryType::try_from(id)
                .map_err(|id| Error::Engine(format!("unknown geometry type id {}", id)))
        })
    }

    /// Check whether this geometry has no points.
    pub fn is_empty(&self) -> Result<bool> {
        with_context(|ctx| match unsafe { GEOSisEmpty_r(ctx.handle(), self.as_ptr()) } {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(ctx.failure(Error::Engine("could not test emptiness".to_string()))),
        })
    }

    /// Number of holes of a polygon.
    pub fn num_interior_rings(&self) -> Result<usize> {
        with_context(|ctx| {
            let n: c_int = unsafe { GEOSGetNumInteriorRings_r(ctx.handle(), self.as_ptr()) };
            usize::try_from(n)
                .map_err(|_| ctx.failure(Error::Engine("could not count interior rings".to_string())))
        })
    }

    /// Shorthand for [`serialize::to_wkt`].
    pub fn to_wkt(&self) -> Result<String> {
        serialize::to_wkt(self)
    }

    /// Shorthand for [`serialize::to_wkb`].
    pub fn to_wkb(&self) -> Result<Vec<u8>> {
        serialize::to_wkb(self)
    }

    /// Shorthand for [`serialize::to_hex_wkb`].
    pub fn to_hex_wkb(&self) -> Result<String> {
        serialize::to_hex_wkb(self)
    }

    /// Shorthand for [`deserialize::from_wkt`].
    pub fn from_wkt(wkt: &str) -> Result<Self> {
        deserialize::from_wkt(wkt)
    }
}

impl Owned<GEOSCoordSequence> {
    /// Number of coordinates in the sequence.
    pub fn len(&self) -> Result<usize> {
        with_context(|ctx| {
            let mut size: c_uint = 0;
            if unsafe { GEOSCoordSeq_getSize_r(ctx.handle(), self.as_ptr(), &mut size) } == 0 {
                return Err(ctx.failure(Error::Engine("could not read sequence size".to_string())));
            }
            Ok(size as usize)
        })
    }

    /// Check whether the sequence holds no coordinates.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Get the coordinate at `index`.
    pub fn get(&self, index: usize) -> Result<Coord> {
        // GEOS does not bounds-check ordinate reads.
        if index >= self.len()? {
            return Err(Error::InvalidArgument(format!("index {} out of range", index)));
        }
        let idx = index as c_uint;

        with_context(|ctx| {
            let mut x: c_double = 0.0;
            let mut y: c_double = 0.0;
            unsafe {
                if GEOSCoordSeq_getX_r(ctx.handle(), self.as_ptr(), idx, &mut x) == 0
                    || GEOSCoordSeq_getY_r(ctx.handle(), self.as_ptr(), idx, &mut y) == 0
                {
                    return Err(ctx.failure(Error::Engine(format!(
                        "could not read coordinate {}",
                        index
                    ))));
                }
            }
            Ok((x, y))
        })
    }
}
