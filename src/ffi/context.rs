//! Per-thread GEOS context.
//!
//! GEOS is driven through its re-entrant `_r` API, so every thread that uses
//! the crate owns its own context handle. The handle lives in a thread local
//! that is created by [`crate::init`] and finished by [`crate::shutdown`].

use std::cell::{Cell, RefCell};
use std::os::raw::c_void;

use geos_sys::{
    GEOSContextHandle_t, GEOSContext_setErrorMessageHandler_r,
    GEOSContext_setNoticeMessageHandler_r, GEOS_finish_r, GEOS_init_r,
};

use super::error::{error_handler, notice_handler, MessageSlot};
use crate::error::{Error, Result};

thread_local! {
    static CONTEXT: RefCell<Option<Context>> = const { RefCell::new(None) };
}

/// An initialized GEOS context together with its error channel.
pub struct Context {
    handle: GEOSContextHandle_t,
    // Boxed so the address handed to GEOS as user data never moves.
    messages: Box<MessageSlot>,
    depth: Cell<usize>,
}

impl Context {
    fn new() -> Result<Self> {
        unsafe {
            let handle = GEOS_init_r();
            if handle.is_null() {
                return Err(Error::Allocation("GEOS context"));
            }

            let messages = Box::new(MessageSlot::default());
            let user_data = &*messages as *const MessageSlot as *mut c_void;
            GEOSContext_setNoticeMessageHandler_r(handle, Some(notice_handler), user_data);
            GEOSContext_setErrorMessageHandler_r(handle, Some(error_handler), user_data);

            Ok(Self {
                handle,
                messages,
                depth: Cell::new(1),
            })
        }
    }

    /// Get the raw context handle.
    pub fn handle(&self) -> GEOSContextHandle_t {
        self.handle
    }

    /// Take the last message reported on the error channel, if any.
    pub fn take_error(&self) -> Option<String> {
        self.messages.take()
    }

    /// Record a message on the error channel as if the engine had raised it.
    pub fn report(&self, message: String) {
        self.messages.record(message);
    }

    fn clear_error(&self) {
        if let Some(stale) = self.messages.take() {
            log::trace!("discarding stale GEOS error: {}", stale);
        }
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        unsafe {
            GEOS_finish_r(self.handle);
        }
    }
}

/// Initialize the context of the calling thread, or bump its reference count.
pub(crate) fn init() -> Result<()> {
    CONTEXT.with(|cell| {
        let mut slot = cell.try_borrow_mut().map_err(|_| {
            Error::InvalidArgument("init called while the GEOS context is in use".to_string())
        })?;

        if let Some(ctx) = slot.as_ref() {
            ctx.depth.set(ctx.depth.get() + 1);
            return Ok(());
        }

        *slot = Some(Context::new()?);
        log::debug!("GEOS context initialized");
        Ok(())
    })
}

/// Drop one reference to the context of the calling thread, finishing it when
/// the count reaches zero.
pub(crate) fn shutdown() {
    let _ = CONTEXT.try_with(|cell| {
        let Ok(mut slot) = cell.try_borrow_mut() else {
            log::warn!("shutdown called while the GEOS context is in use; ignored");
            return;
        };

        let finished = match slot.as_ref().map(|ctx| ctx.depth.get()) {
            Some(depth) if depth > 1 => {
                if let Some(ctx) = slot.as_ref() {
                    ctx.depth.set(depth - 1);
                }
                None
            }
            Some(_) => slot.take(),
            None => None,
        };
        drop(slot);

        if finished.is_some() {
            drop(finished);
            log::debug!("GEOS context finished");
        }
    });
}

/// Check whether the calling thread has a live context.
pub(crate) fn is_initialized() -> bool {
    CONTEXT
        .try_with(|cell| cell.try_borrow().map(|slot| slot.is_some()).unwrap_or(false))
        .unwrap_or(false)
}

/// Run `f` against the context of the calling thread.
///
/// Any message left on the error channel by an earlier call is discarded first,
/// so a message seen inside `f` was raised by `f`.
pub fn with_context<R>(f: impl FnOnce(&Context) -> Result<R>) -> Result<R> {
    CONTEXT
        .try_with(|cell| {
            let slot = cell.try_borrow().map_err(|_| Error::NotInitialized)?;
            let ctx = slot.as_ref().ok_or(Error::NotInitialized)?;
            ctx.clear_error();
            f(ctx)
        })
        .unwrap_or(Err(Error::NotInitialized))
}

/// Run `f` with the raw context handle if the calling thread still has one.
///
/// Returns `false` without calling `f` when there is no context, which happens
/// for handles that outlive [`crate::shutdown`] or the thread's locals.
pub fn try_with_handle(f: impl FnOnce(GEOSContextHandle_t)) -> bool {
    CONTEXT
        .try_with(|cell| match cell.try_borrow() {
            Ok(slot) => match slot.as_ref() {
                Some(ctx) => {
                    f(ctx.handle);
                    true
                }
                None => false,
            },
            Err(_) => false,
        })
        .unwrap_or(false)
}
