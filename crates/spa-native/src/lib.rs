//! C ABI over the `spa-minify` engine, loaded at runtime by
//! `spa_engine::NativeDelegate`.

use std::ffi::{c_char, c_int, CString};
use std::panic;
use std::ptr;

use spa_core::{CompressionLevel, ContentType};

fn level_from_native(level: c_int) -> Option<CompressionLevel> {
    match level {
        1 => Some(CompressionLevel::Basic),
        2 => Some(CompressionLevel::Aggressive),
        3 => Some(CompressionLevel::Extreme),
        _ => None,
    }
}

fn type_from_native(ty: c_int) -> Option<ContentType> {
    match ContentType::from_native_code(ty) {
        Some(ContentType::Json) | None => None,
        Some(ty) => Some(ty),
    }
}

/// Minify `len` bytes of UTF-8 at `input`.
///
/// Returns a NUL-terminated buffer and stores its length (without the NUL) in
/// `out_len`, or null on invalid arguments, non-UTF-8 input, or output with
/// an interior NUL.
///
/// # Safety
///
/// `input` must point to `len` readable bytes and `out_len` must be valid for
/// writes. The result must be released with [`spa_free_string`].
#[no_mangle]
pub unsafe extern "C" fn spa_compress(
    input: *const c_char,
    len: usize,
    level: c_int,
    ty: c_int,
    out_len: *mut usize,
) -> *mut c_char {
    if input.is_null() || out_len.is_null() {
        return ptr::null_mut();
    }
    let (Some(level), Some(ty)) = (level_from_native(level), type_from_native(ty)) else {
        return ptr::null_mut();
    };

    let bytes = std::slice::from_raw_parts(input.cast::<u8>(), len);
    let Ok(text) = std::str::from_utf8(bytes) else {
        tracing::debug!(len, "spa_compress: input is not UTF-8");
        return ptr::null_mut();
    };

    let Ok(output) = panic::catch_unwind(|| spa_minify::minify(text, ty, level)) else {
        return ptr::null_mut();
    };
    let Ok(output) = CString::new(output) else {
        return ptr::null_mut();
    };

    *out_len = output.as_bytes().len();
    output.into_raw()
}

/// Release a buffer returned by [`spa_compress`]. Null is ignored.
///
/// # Safety
///
/// `ptr` must come from `spa_compress` and must not be used afterwards.
#[no_mangle]
pub unsafe extern "C" fn spa_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}
