use std::cell::RefCell;
use std::ffi::CString;

use dt_tensor::TensorError;

use crate::types::DTStatus;

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Store an error message for later retrieval via `dt_last_error`.
pub fn set_last_error(msg: String) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

/// Take the last error message, leaving `None` in its place.
pub fn take_last_error() -> Option<CString> {
    LAST_ERROR.with(|e| e.borrow_mut().take())
}

/// Record a library error and map it to its status code.
pub fn report(err: TensorError) -> DTStatus {
    let status = match err {
        TensorError::Allocation { .. } => DTStatus::ErrorOutOfMemory,
        TensorError::IndexOutOfBounds { .. } => DTStatus::ErrorIndexOutOfBounds,
        TensorError::DTypeMismatch { .. } => DTStatus::ErrorDTypeMismatch,
        TensorError::ShapeMismatch { .. } => DTStatus::ErrorInvalidArgument,
    };
    set_last_error(err.to_string());
    status
}
