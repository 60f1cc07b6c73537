// Entry points mirror the Fortran BLAS signatures, argument counts included.
// Kernels index column-major arrays directly.
#![allow(clippy::too_many_arguments, clippy::needless_range_loop)]

//! # fortramp-ref
//!
//! A column-major reference Level-2 and Level-3 BLAS that speaks the Fortran
//! calling convention, plus the fixtures the trampoline is tested against.
//!
//! - [`kernels`]: generic column-major GEMM, SYMM/HEMM, SYRK/HERK,
//!   SYR2K/HER2K, TRMM, TRSM, and the matrix-vector GEMV, GER, SYMV/HEMV,
//!   SYR/HER, TRMV, TRSV built on them.
//! - [`fortran`]: the 56 `xGEMM`-style entry points and [`fortran::provider`],
//!   a fully populated [`fortramp_core::FortranBlas`].
//! - [`fixtures`]: logical matrices, layout-aware storage and closed-form
//!   expectations.
//!
//! Correct, unoptimised, and not meant for production traffic.

pub mod fixtures;
pub mod fortran;
pub mod kernels;

pub use fortran::provider;
