//! Complex Marshaller.
//!
//! CBLAS hands complex scalars and matrices over as `void*`. The provider
//! expects the same bytes behind the same addresses, so marshalling is a
//! layout contract plus a pointer cast, never a copy:
//!
//! ```text
//!   Complex32  = #[repr(C)] { re: f32, im: f32 }   8 bytes, align 4
//!   Complex64  = #[repr(C)] { re: f64, im: f64 }  16 bytes, align 8
//!   matrices   = interleaved re, im, re, im, ...  (Fortran COMPLEX / C99 _Complex)
//! ```
//!
//! No endian or padding conversion happens here. A caller or provider with
//! a different complex layout is misconfigured.

use std::borrow::Cow;
use std::mem::{align_of, size_of};
use std::os::raw::c_void;

use num_complex::{Complex32, Complex64};

use crate::element::Element;
use crate::error::BlasError;

const _: () = {
    assert!(size_of::<Complex32>() == 2 * size_of::<f32>());
    assert!(align_of::<Complex32>() == align_of::<f32>());
    assert!(size_of::<Complex64>() == 2 * size_of::<f64>());
    assert!(align_of::<Complex64>() == align_of::<f64>());
    assert!(size_of::<[Complex64; 3]>() == 6 * size_of::<f64>());
};

/// Reinterpret a C `const void*` as a typed element pointer.
#[inline]
pub fn cast<T: Element>(ptr: *const c_void) -> *const T {
    debug_assert!(
        ptr as usize % align_of::<T>() == 0,
        "misaligned {:?} pointer {ptr:p}",
        T::PRECISION
    );
    ptr as *const T
}

/// Reinterpret a C `void*` as a typed element pointer.
#[inline]
pub fn cast_mut<T: Element>(ptr: *mut c_void) -> *mut T {
    debug_assert!(
        ptr as usize % align_of::<T>() == 0,
        "misaligned {:?} pointer {ptr:p}",
        T::PRECISION
    );
    ptr as *mut T
}

/// Check a by-address scalar before it is forwarded or read.
///
/// `position` is the scalar's 1-based CBLAS argument index.
#[inline]
pub fn scalar<T>(
    ptr: *const T,
    routine: &'static str,
    position: i32,
    param: &'static str,
) -> Result<*const T, BlasError> {
    if ptr.is_null() {
        return Err(BlasError::NullScalar {
            routine: Cow::Borrowed(routine),
            position,
            param,
        });
    }
    Ok(ptr)
}
