// Entry points mirror the CBLAS signatures, argument counts included.
#![allow(clippy::too_many_arguments)]

//! # fortramp-blas
//!
//! CBLAS Level-2 and Level-3 on top of any Fortran-convention BLAS.
//!
//! A CBLAS call carries a storage order and integer-coded modifiers; a
//! Fortran BLAS only knows column-major storage, character flags and
//! by-reference arguments. The trampoline validates the CBLAS arguments,
//! re-expresses row-major problems as their column-major transposes and makes
//! exactly one provider call. Matrices are never copied; the only copies are
//! conjugated input vectors for row-major complex Level-2 calls.
//!
//! ```text
//!   cblas_dgemm(RowMajor, ...)
//!        │ validate    (validate)   enum + dimension checks, CBLAS positions
//!        │ plan        (transpose)  flip table for the routine family
//!        ▼ dispatch    (dispatch)   marshal to pointers + char flags
//!   dgemm_("T", "N", &n, &m, ...)   the registered provider
//! ```
//!
//! ## Using it from Rust
//!
//! ```
//! use fortramp_blas::Trampoline;
//! use fortramp_core::abi::{CblasNoTrans, CblasRowMajor};
//!
//! let blas = Trampoline::new(fortramp_ref::provider());
//! let a = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
//! let b = [7.0, 8.0, 9.0, 10.0, 11.0, 12.0];
//! let mut c = [0.0; 4];
//! unsafe {
//!     blas.dgemm(CblasRowMajor, CblasNoTrans, CblasNoTrans, 2, 2, 3, 1.0,
//!                a.as_ptr(), 3, b.as_ptr(), 2, 0.0, c.as_mut_ptr(), 2)
//!         .unwrap();
//! }
//! assert_eq!(c, [58.0, 64.0, 139.0, 154.0]);
//! ```
//!
//! ## Using it from C
//!
//! With the `cblas-exports` feature (default) the cdylib exports the
//! `cblas_*` Level-2 and Level-3 symbols. Hand it a provider first, either one entry at
//! a time (`fortramp_register_dgemm(&dgemm_)`) or by naming a shared library
//! in `FORTRAMP_PROVIDER` and calling `fortramp_install_from_env()`.

pub mod dispatch;
pub mod level2;
pub mod level3;
pub mod transpose;
pub mod validate;

#[cfg(feature = "cblas-exports")]
pub mod ffi;

pub use dispatch::{Dispatch, HermitianDispatch, RealDispatch, Trampoline};
pub use transpose::{ColMajorPlan, Family, OpDescriptor};

// Re-export the shared vocabulary for convenience
pub use fortramp_core::{
    blasint, BlasError, BlasResult, Complex32, Complex64, Diag, FortranBlas, Layout, Precision,
    Provider, Reporter, Routine, Side, Transpose, Uplo,
};
