mod error;
mod handle;
mod types;

pub use error::*;
pub use handle::*;
pub use types::*;

use std::ffi::CString;
use std::os::raw::c_char;

use dt_tensor::{MemoryUsage, Tensor};

/// Execute a closure that returns a `DTStatus`, catching any panics
/// and converting them into `DTStatus::ErrorInternal`.
fn catch_panic<F: FnOnce() -> DTStatus + std::panic::UnwindSafe>(f: F) -> DTStatus {
    match std::panic::catch_unwind(f) {
        Ok(status) => status,
        Err(_) => {
            set_last_error("internal panic".to_string());
            DTStatus::ErrorInternal
        }
    }
}

/// Hand a Rust string to C through `*out`.
///
/// # Safety
/// `out` must be non-null and writable.
unsafe fn write_string(text: String, out: *mut *mut c_char) -> DTStatus {
    match CString::new(text) {
        Ok(c) => {
            *out = c.into_raw();
            DTStatus::Ok
        }
        Err(e) => {
            set_last_error(format!("output encoding error: {}", e));
            DTStatus::ErrorInternal
        }
    }
}

/// Allocate a zero-filled `rows x cols` tensor.
///
/// On success, writes a heap-allocated `DTTensor` pointer into `*out` and
/// returns `DTStatus::Ok`. The caller must later call `dt_tensor_free`.
/// On failure `*out` is left untouched.
#[no_mangle]
pub unsafe extern "C" fn dt_tensor_create(
    rows: u16,
    cols: u16,
    dtype: DTDType,
    out: *mut *mut DTTensor,
) -> DTStatus {
    catch_panic(|| {
        if out.is_null() {
            set_last_error("out is null".to_string());
            return DTStatus::ErrorInvalidArgument;
        }
        match Tensor::allocate(rows, cols, dtype.into()) {
            Ok(t) => {
                let handle = Box::new(DTTensor::new(t));
                unsafe {
                    *out = Box::into_raw(handle);
                }
                DTStatus::Ok
            }
            Err(e) => report(e),
        }
    })
}

/// Free a tensor previously created by `dt_tensor_create`.
///
/// Passing a null pointer is a no-op and returns `DTStatus::Ok`. Freeing the
/// same pointer twice is undefined behaviour.
#[no_mangle]
pub unsafe extern "C" fn dt_tensor_free(t: *mut DTTensor) -> DTStatus {
    if t.is_null() {
        return DTStatus::Ok;
    }
    let handle = Box::from_raw(t);
    handle.tensor.release();
    DTStatus::Ok
}

/// Number of rows, or 0 for a null handle.
#[no_mangle]
pub unsafe extern "C" fn dt_tensor_rows(t: *const DTTensor) -> u16 {
    t.as_ref().map_or(0, |h| h.tensor.rows())
}

/// Number of columns, or 0 for a null handle.
#[no_mangle]
pub unsafe extern "C" fn dt_tensor_cols(t: *const DTTensor) -> u16 {
    t.as_ref().map_or(0, |h| h.tensor.cols())
}

/// Number of elements, or 0 for a null handle.
#[no_mangle]
pub unsafe extern "C" fn dt_tensor_numel(t: *const DTTensor) -> u32 {
    t.as_ref().map_or(0, |h| h.tensor.shape().numel())
}

/// Write the tensor's element representation into `*out`.
#[no_mangle]
pub unsafe extern "C" fn dt_tensor_dtype(t: *const DTTensor, out: *mut DTDType) -> DTStatus {
    if t.is_null() || out.is_null() {
        set_last_error("null argument".to_string());
        return DTStatus::ErrorInvalidArgument;
    }
    *out = (*t).tensor.dtype().into();
    DTStatus::Ok
}

/// Store `value` at flat index `index` of a Float32 tensor.
#[no_mangle]
pub unsafe extern "C" fn dt_tensor_set_f32(t: *mut DTTensor, index: u32, value: f32) -> DTStatus {
    catch_panic(|| {
        let Some(h) = (unsafe { t.as_mut() }) else {
            set_last_error("null argument".to_string());
            return DTStatus::ErrorInvalidArgument;
        };
        let len = h.tensor.numel();
        let data = match h.tensor.as_f32_slice_mut() {
            Ok(d) => d,
            Err(e) => return report(e),
        };
        match data.get_mut(index as usize) {
            Some(slot) => {
                *slot = value;
                DTStatus::Ok
            }
            None => report(dt_tensor::TensorError::IndexOutOfBounds {
                index: index as usize,
                len,
            }),
        }
    })
}

/// Read element `index` as a float into `*out`, decoding F16 and widening I8.
#[no_mangle]
pub unsafe extern "C" fn dt_tensor_read_f32(
    t: *const DTTensor,
    index: u32,
    out: *mut f32,
) -> DTStatus {
    catch_panic(|| {
        if t.is_null() || out.is_null() {
            set_last_error("null argument".to_string());
            return DTStatus::ErrorInvalidArgument;
        }
        let h = unsafe { &*t };
        match h.tensor.read_as_f32(index as usize) {
            Ok(v) => {
                unsafe { *out = v };
                DTStatus::Ok
            }
            Err(e) => report(e),
        }
    })
}

/// Quantize a Float32 tensor into an Int8 tensor.
///
/// A representation or element-count mismatch is not an error: nothing is
/// written and `DTStatus::Ok` is returned. Only null handles are rejected.
#[no_mangle]
pub unsafe extern "C" fn dt_quantize(
    src: *const DTTensor,
    dst: *mut DTTensor,
    scale: f32,
) -> DTStatus {
    if src.is_null() || dst.is_null() {
        set_last_error("null argument".to_string());
        return DTStatus::ErrorInvalidArgument;
    }
    // The same tensor cannot be both F32 and I8, so this is always a skip.
    if std::ptr::eq(src, dst) {
        return DTStatus::Ok;
    }
    catch_panic(|| {
        let (src, dst) = unsafe { (&*src, &mut *dst) };
        dt_tensor::quantize(&src.tensor, &mut dst.tensor, scale);
        DTStatus::Ok
    })
}

/// Dequantize an Int8 tensor into a Float32 tensor.
///
/// Mismatches are skipped silently, as in `dt_quantize`.
#[no_mangle]
pub unsafe extern "C" fn dt_dequantize(
    src: *const DTTensor,
    dst: *mut DTTensor,
    scale: f32,
) -> DTStatus {
    if src.is_null() || dst.is_null() {
        set_last_error("null argument".to_string());
        return DTStatus::ErrorInvalidArgument;
    }
    if std::ptr::eq(src, dst) {
        return DTStatus::Ok;
    }
    catch_panic(|| {
        let (src, dst) = unsafe { (&*src, &mut *dst) };
        dt_tensor::dequantize(&src.tensor, &mut dst.tensor, scale);
        DTStatus::Ok
    })
}

/// Encode an `f32` into truncated half-precision bits.
#[no_mangle]
pub extern "C" fn dt_encode_half(value: f32) -> u16 {
    dt_tensor::encode_half(value)
}

/// Decode half-precision bits into an `f32`.
#[no_mangle]
pub extern "C" fn dt_decode_half(bits: u16) -> f32 {
    dt_tensor::decode_half(bits)
}

/// Render the tensor as text (header plus one line per row).
///
/// On success writes a heap-allocated C string into `*out`; free it with
/// `dt_free_string`.
#[no_mangle]
pub unsafe extern "C" fn dt_tensor_format(t: *const DTTensor, out: *mut *mut c_char) -> DTStatus {
    catch_panic(|| {
        if t.is_null() || out.is_null() {
            set_last_error("null argument".to_string());
            return DTStatus::ErrorInvalidArgument;
        }
        let h = unsafe { &*t };
        unsafe { write_string(h.tensor.to_string(), out) }
    })
}

/// Render the memory usage comparison for `elements` values.
///
/// Free the returned string with `dt_free_string`.
#[no_mangle]
pub unsafe extern "C" fn dt_memory_usage_format(elements: u32, out: *mut *mut c_char) -> DTStatus {
    if out.is_null() {
        set_last_error("out is null".to_string());
        return DTStatus::ErrorInvalidArgument;
    }
    write_string(MemoryUsage::for_elements(elements).to_string(), out)
}

/// Retrieve the last error message.
///
/// Returns a pointer to a C string describing the most recent error, or
/// null if no error has occurred. The caller must free the returned string
/// with `dt_free_string`.
#[no_mangle]
pub extern "C" fn dt_last_error() -> *const c_char {
    match error::take_last_error() {
        Some(e) => e.into_raw(),
        None => std::ptr::null(),
    }
}

/// Free a string previously returned by `dt_tensor_format`,
/// `dt_memory_usage_format` or `dt_last_error`.
#[no_mangle]
pub unsafe extern "C" fn dt_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CStr;
    use std::ptr;

    unsafe fn create(rows: u16, cols: u16, dtype: DTDType) -> *mut DTTensor {
        let mut t: *mut DTTensor = ptr::null_mut();
        assert_eq!(dt_tensor_create(rows, cols, dtype, &mut t), DTStatus::Ok);
        assert!(!t.is_null());
        t
    }

    unsafe fn take_string(s: *mut c_char) -> String {
        let text = CStr::from_ptr(s).to_str().unwrap().to_string();
        dt_free_string(s);
        text
    }

    #[test]
    fn test_create_and_free() {
        unsafe {
            let t = create(2, 3, DTDType::Int8);
            assert_eq!(dt_tensor_rows(t), 2);
            assert_eq!(dt_tensor_cols(t), 3);
            assert_eq!(dt_tensor_numel(t), 6);
            let mut dtype = DTDType::Float32;
            assert_eq!(dt_tensor_dtype(t, &mut dtype), DTStatus::Ok);
            assert_eq!(dtype, DTDType::Int8);
            assert_eq!(dt_tensor_free(t), DTStatus::Ok);
        }
    }

    #[test]
    fn test_null_handling() {
        unsafe {
            assert_eq!(dt_tensor_free(ptr::null_mut()), DTStatus::Ok);
            assert_eq!(dt_tensor_rows(ptr::null()), 0);
            assert_eq!(
                dt_tensor_create(1, 1, DTDType::Float32, ptr::null_mut()),
                DTStatus::ErrorInvalidArgument
            );
            let msg = dt_last_error();
            assert!(!msg.is_null());
            assert_eq!(take_string(msg as *mut c_char), "out is null");
            assert!(dt_last_error().is_null());
        }
    }

    #[test]
    fn test_quantize_roundtrip() {
        unsafe {
            let input = create(2, 2, DTDType::Float32);
            for (i, v) in [0.5f32, -1.2, 3.4, 2.1].iter().enumerate() {
                assert_eq!(dt_tensor_set_f32(input, i as u32, *v), DTStatus::Ok);
            }
            let q = create(2, 2, DTDType::Int8);
            let back = create(2, 2, DTDType::Float32);

            assert_eq!(dt_quantize(input, q, 0.1), DTStatus::Ok);
            assert_eq!(dt_dequantize(q, back, 0.1), DTStatus::Ok);

            let mut out: *mut c_char = ptr::null_mut();
            assert_eq!(dt_tensor_format(q, &mut out), DTStatus::Ok);
            assert_eq!(take_string(out), "Tensor (2x2):\n5 -12 \n34 20 \n");

            let mut v = 0.0f32;
            assert_eq!(dt_tensor_read_f32(back, 0, &mut v), DTStatus::Ok);
            assert!((v - 0.5).abs() < 1e-6);

            dt_tensor_free(input);
            dt_tensor_free(q);
            dt_tensor_free(back);
        }
    }

    #[test]
    fn test_quantize_mismatch_is_ok() {
        unsafe {
            let input = create(2, 2, DTDType::Float32);
            let small = create(1, 2, DTDType::Int8);
            assert_eq!(dt_quantize(input, small, 1.0), DTStatus::Ok);
            assert_eq!(dt_quantize(input, input, 1.0), DTStatus::Ok);
            dt_tensor_free(input);
            dt_tensor_free(small);
        }
    }

    #[test]
    fn test_set_and_read_errors() {
        unsafe {
            let t = create(1, 2, DTDType::Int8);
            assert_eq!(dt_tensor_set_f32(t, 0, 1.0), DTStatus::ErrorDTypeMismatch);
            let mut v = 0.0f32;
            assert_eq!(
                dt_tensor_read_f32(t, 2, &mut v),
                DTStatus::ErrorIndexOutOfBounds
            );
            dt_free_string(dt_last_error() as *mut c_char);
            dt_tensor_free(t);
        }
    }

    #[test]
    fn test_half_codec() {
        assert_eq!(dt_encode_half(1.0), 0x3C00);
        assert_eq!(dt_decode_half(0xC000), -2.0);
        assert_eq!(dt_encode_half(1.0e10), 0x7C00);
    }

    #[test]
    fn test_memory_usage_format() {
        unsafe {
            let mut out: *mut c_char = ptr::null_mut();
            assert_eq!(dt_memory_usage_format(4, &mut out), DTStatus::Ok);
            assert!(take_string(out).contains("Float16 : 8 bytes"));
        }
    }
}
