//! Error channel between GEOS and Rust.
//!
//! GEOS reports failures by invoking the context's error handler and then
//! returning a null pointer or a sentinel value. The handler only stores the
//! message; the call site that saw the sentinel turns it into an [`Error`].

use std::cell::Cell;
use std::ffi::CStr;
use std::os::raw::{c_char, c_void};

use super::context::Context;
use crate::error::Error;
use crate::types::Format;

/// Holds the last message raised by the engine on one context.
#[derive(Default)]
pub struct MessageSlot {
    last: Cell<Option<String>>,
}

impl MessageSlot {
    pub fn record(&self, message: String) {
        log::debug!("GEOS error: {}", message);
        if let Some(previous) = self.last.replace(Some(message)) {
            log::trace!("overwriting unread GEOS error: {}", previous);
        }
    }

    pub fn take(&self) -> Option<String> {
        self.last.take()
    }
}

unsafe fn message_text(message: *const c_char) -> String {
    if message.is_null() {
        "Unknown error".to_string()
    } else {
        CStr::from_ptr(message).to_string_lossy().into_owned()
    }
}

/// Notice callback: informational messages go to the log.
pub unsafe extern "C" fn notice_handler(message: *const c_char, _user_data: *mut c_void) {
    log::info!("GEOS notice: {}", message_text(message));
}

/// Error callback: stores the message in the context's [`MessageSlot`].
///
/// # Safety
///
/// `user_data` must point to the `MessageSlot` registered with the context.
pub unsafe extern "C" fn error_handler(message: *const c_char, user_data: *mut c_void) {
    if user_data.is_null() {
        return;
    }
    let slot = &*(user_data as *const MessageSlot);
    slot.record(message_text(message));
}

impl Context {
    /// Convert a null result into an error.
    ///
    /// A message captured on the error channel wins over `fallback`.
    pub fn failure(&self, fallback: Error) -> Error {
        match self.take_error() {
            Some(message) => Error::Engine(message),
            None => fallback,
        }
    }

    /// Convert a null parse result into [`Error::Parse`] for `format`.
    pub fn parse_failure(&self, format: Format) -> Error {
        let message = self
            .take_error()
            .unwrap_or_else(|| "reader returned no geometry".to_string());
        Error::Parse { format, message }
    }
}
