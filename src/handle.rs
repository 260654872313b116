//! Owned handles to GEOS resources.
//!
//! Every resource kind GEOS hands out has exactly one destroy function. The
//! [`Destroy`] trait binds each raw handle type to that function, and
//! [`Owned`] calls it when dropped, on every exit path including `?` returns
//! and unwinding.
//!
//! Constructors that take over a child handle ("absorb" it) are modelled with
//! [`Owned::release`]: once the consuming call has succeeded, the child's
//! wrapper is released so it never destroys memory its parent now owns.

use std::fmt;
use std::mem;
use std::os::raw::c_void;
use std::ptr::NonNull;
use std::rc::Rc;

use geos_sys::{
    GEOSBufferParams, GEOSBufferParams_destroy_r, GEOSContextHandle_t, GEOSCoordSeq_destroy_r,
    GEOSCoordSequence, GEOSFree_r, GEOSGeom_destroy_r, GEOSGeometry, GEOSPreparedGeom_destroy_r,
    GEOSPreparedGeometry, GEOSSTRtree, GEOSSTRtree_destroy_r, GEOSWKBReader,
    GEOSWKBReader_destroy_r, GEOSWKBWriter, GEOSWKBWriter_destroy_r, GEOSWKTReader,
    GEOSWKTReader_destroy_r, GEOSWKTWriter, GEOSWKTWriter_destroy_r,
};

use crate::ffi;

/// A raw handle kind that GEOS can destroy.
///
/// # Safety
///
/// `destroy` must call the GEOS destroy function that matches `Self`.
pub unsafe trait Destroy {
    /// Name of the handle kind, used in logs.
    const KIND: &'static str;

    /// Release `ptr` back to GEOS.
    ///
    /// # Safety
    ///
    /// `ptr` must be a live handle of this kind that nothing else owns.
    unsafe fn destroy(ctx: GEOSContextHandle_t, ptr: *mut Self);
}

/// Text buffer returned by the WKT writer, freed with `GEOSFree_r`.
#[repr(C)]
pub struct TextBuffer {
    _private: [u8; 0],
}

/// Byte buffer returned by the WKB writer, freed with `GEOSFree_r`.
#[repr(C)]
pub struct ByteBuffer {
    _private: [u8; 0],
}

/// Bind a raw handle type to its destroy function.
macro_rules! define_destroy {
    ($ty:ty, $kind:literal, |$ctx:ident, $ptr:ident| $body:expr) => {
        unsafe impl Destroy for $ty {
            const KIND: &'static str = $kind;

            #[inline]
            unsafe fn destroy($ctx: GEOSContextHandle_t, $ptr: *mut Self) {
                $body
            }
        }
    };
}

define_destroy!(GEOSGeometry, "geometry", |ctx, ptr| GEOSGeom_destroy_r(ctx, ptr));
define_destroy!(GEOSCoordSequence, "coordinate sequence", |ctx, ptr| GEOSCoordSeq_destroy_r(ctx, ptr));
define_destroy!(GEOSWKTWriter, "WKT writer", |ctx, ptr| GEOSWKTWriter_destroy_r(ctx, ptr));
define_destroy!(GEOSWKBWriter, "WKB writer", |ctx, ptr| GEOSWKBWriter_destroy_r(ctx, ptr));
define_destroy!(GEOSWKTReader, "WKT reader", |ctx, ptr| GEOSWKTReader_destroy_r(ctx, ptr));
define_destroy!(GEOSWKBReader, "WKB reader", |ctx, ptr| GEOSWKBReader_destroy_r(ctx, ptr));
define_destroy!(GEOSBufferParams, "buffer parameters", |ctx, ptr| GEOSBufferParams_destroy_r(ctx, ptr));
define_destroy!(GEOSPreparedGeometry, "prepared geometry", |ctx, ptr| GEOSPreparedGeom_destroy_r(ctx, ptr));
define_destroy!(GEOSSTRtree, "STR tree", |ctx, ptr| GEOSSTRtree_destroy_r(ctx, ptr));
define_destroy!(TextBuffer, "text buffer", |ctx, ptr| GEOSFree_r(ctx, ptr as *mut c_void));
define_destroy!(ByteBuffer, "byte buffer", |ctx, ptr| GEOSFree_r(ctx, ptr as *mut c_void));

/// Exclusive owner of a GEOS handle.
///
/// Not `Send`: handles belong to the context of the thread that created them.
pub struct Owned<T: Destroy> {
    ptr: NonNull<T>,
}

/// Reference-counted owner of a GEOS handle, destroyed with its last clone.
pub type Shared<T> = Rc<Owned<T>>;

/// Owned geometry.
pub type Geometry = Owned<GEOSGeometry>;
/// Shared geometry.
pub type SharedGeometry = Shared<GEOSGeometry>;
/// Owned coordinate sequence.
pub type CoordSeq = Owned<GEOSCoordSequence>;
/// Shared coordinate sequence.
pub type SharedCoordSeq = Shared<GEOSCoordSequence>;

impl<T: Destroy> Owned<T> {
    /// Take ownership of a handle returned by GEOS. Returns `None` for null.
    ///
    /// # Safety
    ///
    /// A non-null `ptr` must be a live handle of kind `T` that nothing else
    /// owns or will destroy.
    pub unsafe fn from_raw(ptr: *mut T) -> Option<Self> {
        let ptr = NonNull::new(ptr)?;
        #[cfg(test)]
        ledger::acquire(ptr.as_ptr() as usize, T::KIND);
        Some(Self { ptr })
    }

    /// Get the raw handle without giving up ownership.
    #[inline]
    pub fn as_ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Give up ownership without destroying the handle.
    ///
    /// Call this only after the handle has been handed to something that now
    /// owns it, such as a constructor that absorbed it.
    pub fn release(self) -> NonNull<T> {
        let ptr = self.ptr;
        #[cfg(test)]
        ledger::release(ptr.as_ptr() as usize, T::KIND);
        mem::forget(self);
        ptr
    }

    /// Convert into a reference-counted handle.
    pub fn into_shared(self) -> Shared<T> {
        Rc::new(self)
    }
}

impl<T: Destroy> Drop for Owned<T> {
    fn drop(&mut self) {
        let ptr = self.ptr.as_ptr();
        let destroyed = ffi::try_with_handle(|ctx| unsafe { T::destroy(ctx, ptr) });
        if destroyed {
            #[cfg(test)]
            ledger::destroy(ptr as usize, T::KIND);
        } else {
            log::warn!("leaking {} {:p}: no GEOS context on this thread", T::KIND, ptr);
        }
    }
}

impl<T: Destroy> fmt::Debug for Owned<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Owned")
            .field("kind", &T::KIND)
            .field("ptr", &self.ptr)
            .finish()
    }
}

/// Release every handle in `handles` without destroying any of them.
pub fn release_all<T: Destroy>(handles: impl IntoIterator<Item = Owned<T>>) {
    for handle in handles {
        handle.release();
    }
}
