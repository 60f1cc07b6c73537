//! C and Fortran ABI vocabulary.
//!
//! The C side mirrors `cblas.h`: every enumeration crosses the boundary as a
//! plain `c_int`, so a foreign caller can hand over any value and the
//! validator decides whether it is legal.
//!
//! The Fortran side is the provider convention: every argument is passed by
//! address, scalars included, matrices are column-major, character arguments
//! are single bytes. Hidden string-length arguments are not passed; every
//! character argument of a Level-2 or Level-3 routine has length 1 and the common
//! providers (reference BLAS, OpenBLAS, MKL, BLIS) never read them.

#![allow(non_camel_case_types, non_upper_case_globals)]

use std::os::raw::{c_char, c_int};

use crate::layout::{Diag, Layout, Side, Transpose, Uplo};

/// BLAS index integer. 64-bit with the `ilp64` feature.
#[cfg(not(feature = "ilp64"))]
pub type blasint = i32;
/// BLAS index integer. 64-bit with the `ilp64` feature.
#[cfg(feature = "ilp64")]
pub type blasint = i64;

/// Integer width the crate was built for. Caller and provider must agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexWidth {
    Lp64,
    Ilp64,
}

impl IndexWidth {
    pub fn bits(self) -> u32 {
        match self {
            IndexWidth::Lp64 => 32,
            IndexWidth::Ilp64 => 64,
        }
    }
}

#[cfg(not(feature = "ilp64"))]
pub const INDEX_WIDTH: IndexWidth = IndexWidth::Lp64;
#[cfg(feature = "ilp64")]
pub const INDEX_WIDTH: IndexWidth = IndexWidth::Ilp64;

// ═══════════════════════════════════════════════════════════════
// cblas.h enumerations
// ═══════════════════════════════════════════════════════════════

pub type CBLAS_LAYOUT = c_int;
pub type CBLAS_ORDER = CBLAS_LAYOUT;
pub type CBLAS_TRANSPOSE = c_int;
pub type CBLAS_UPLO = c_int;
pub type CBLAS_DIAG = c_int;
pub type CBLAS_SIDE = c_int;

pub const CblasRowMajor: CBLAS_LAYOUT = Layout::RowMajor as CBLAS_LAYOUT;
pub const CblasColMajor: CBLAS_LAYOUT = Layout::ColMajor as CBLAS_LAYOUT;
pub const CblasNoTrans: CBLAS_TRANSPOSE = Transpose::NoTrans as CBLAS_TRANSPOSE;
pub const CblasTrans: CBLAS_TRANSPOSE = Transpose::Trans as CBLAS_TRANSPOSE;
pub const CblasConjTrans: CBLAS_TRANSPOSE = Transpose::ConjTrans as CBLAS_TRANSPOSE;
pub const CblasUpper: CBLAS_UPLO = Uplo::Upper as CBLAS_UPLO;
pub const CblasLower: CBLAS_UPLO = Uplo::Lower as CBLAS_UPLO;
pub const CblasNonUnit: CBLAS_DIAG = Diag::NonUnit as CBLAS_DIAG;
pub const CblasUnit: CBLAS_DIAG = Diag::Unit as CBLAS_DIAG;
pub const CblasLeft: CBLAS_SIDE = Side::Left as CBLAS_SIDE;
pub const CblasRight: CBLAS_SIDE = Side::Right as CBLAS_SIDE;

// ═══════════════════════════════════════════════════════════════
// Fortran Level-2 entry points
// ═══════════════════════════════════════════════════════════════

/// `xGEMV(TRANS, M, N, ALPHA, A, LDA, X, INCX, BETA, Y, INCY)`
pub type GemvFn<T> = unsafe extern "C" fn(
    trans: *const c_char,
    m: *const blasint,
    n: *const blasint,
    alpha: *const T,
    a: *const T,
    lda: *const blasint,
    x: *const T,
    incx: *const blasint,
    beta: *const T,
    y: *mut T,
    incy: *const blasint,
);

/// `xGER` / `xGERU` / `xGERC(M, N, ALPHA, X, INCX, Y, INCY, A, LDA)`
pub type GerFn<T> = unsafe extern "C" fn(
    m: *const blasint,
    n: *const blasint,
    alpha: *const T,
    x: *const T,
    incx: *const blasint,
    y: *const T,
    incy: *const blasint,
    a: *mut T,
    lda: *const blasint,
);

/// `xSYMV` / `xHEMV(UPLO, N, ALPHA, A, LDA, X, INCX, BETA, Y, INCY)`
pub type SymvFn<T> = unsafe extern "C" fn(
    uplo: *const c_char,
    n: *const blasint,
    alpha: *const T,
    a: *const T,
    lda: *const blasint,
    x: *const T,
    incx: *const blasint,
    beta: *const T,
    y: *mut T,
    incy: *const blasint,
);

/// `xSYR` / `xHER(UPLO, N, ALPHA, X, INCX, A, LDA)`.
///
/// `S` is the type of ALPHA: the element type for SYR, its real part for HER.
pub type SyrFn<T, S> = unsafe extern "C" fn(
    uplo: *const c_char,
    n: *const blasint,
    alpha: *const S,
    x: *const T,
    incx: *const blasint,
    a: *mut T,
    lda: *const blasint,
);

/// `xTRMV` / `xTRSV(UPLO, TRANS, DIAG, N, A, LDA, X, INCX)`
pub type TrmvFn<T> = unsafe extern "C" fn(
    uplo: *const c_char,
    trans: *const c_char,
    diag: *const c_char,
    n: *const blasint,
    a: *const T,
    lda: *const blasint,
    x: *mut T,
    incx: *const blasint,
);

// ═══════════════════════════════════════════════════════════════
// Fortran Level-3 entry points
// ═══════════════════════════════════════════════════════════════

/// `xGEMM(TRANSA, TRANSB, M, N, K, ALPHA, A, LDA, B, LDB, BETA, C, LDC)`
pub type GemmFn<T> = unsafe extern "C" fn(
    transa: *const c_char,
    transb: *const c_char,
    m: *const blasint,
    n: *const blasint,
    k: *const blasint,
    alpha: *const T,
    a: *const T,
    lda: *const blasint,
    b: *const T,
    ldb: *const blasint,
    beta: *const T,
    c: *mut T,
    ldc: *const blasint,
);

/// `xSYMM` / `xHEMM(SIDE, UPLO, M, N, ALPHA, A, LDA, B, LDB, BETA, C, LDC)`
pub type SymmFn<T> = unsafe extern "C" fn(
    side: *const c_char,
    uplo: *const c_char,
    m: *const blasint,
    n: *const blasint,
    alpha: *const T,
    a: *const T,
    lda: *const blasint,
    b: *const T,
    ldb: *const blasint,
    beta: *const T,
    c: *mut T,
    ldc: *const blasint,
);

/// `xSYRK` / `xHERK(UPLO, TRANS, N, K, ALPHA, A, LDA, BETA, C, LDC)`.
///
/// `S` is the scalar type: the element type for SYRK, its real part for HERK.
pub type SyrkFn<T, S> = unsafe extern "C" fn(
    uplo: *const c_char,
    trans: *const c_char,
    n: *const blasint,
    k: *const blasint,
    alpha: *const S,
    a: *const T,
    lda: *const blasint,
    beta: *const S,
    c: *mut T,
    ldc: *const blasint,
);

/// `xSYR2K` / `xHER2K(UPLO, TRANS, N, K, ALPHA, A, LDA, B, LDB, BETA, C, LDC)`.
///
/// `B` is the type of BETA: the element type for SYR2K, its real part for HER2K.
pub type Syr2kFn<T, B> = unsafe extern "C" fn(
    uplo: *const c_char,
    trans: *const c_char,
    n: *const blasint,
    k: *const blasint,
    alpha: *const T,
    a: *const T,
    lda: *const blasint,
    b: *const T,
    ldb: *const blasint,
    beta: *const B,
    c: *mut T,
    ldc: *const blasint,
);

/// `xTRMM` / `xTRSM(SIDE, UPLO, TRANSA, DIAG, M, N, ALPHA, A, LDA, B, LDB)`
pub type TrmmFn<T> = unsafe extern "C" fn(
    side: *const c_char,
    uplo: *const c_char,
    transa: *const c_char,
    diag: *const c_char,
    m: *const blasint,
    n: *const blasint,
    alpha: *const T,
    a: *const T,
    lda: *const blasint,
    b: *mut T,
    ldb: *const blasint,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_match_cblas_h() {
        assert_eq!(CblasRowMajor, 101);
        assert_eq!(CblasColMajor, 102);
        assert_eq!(CblasNoTrans, 111);
        assert_eq!(CblasTrans, 112);
        assert_eq!(CblasConjTrans, 113);
        assert_eq!(CblasUpper, 121);
        assert_eq!(CblasLower, 122);
        assert_eq!(CblasNonUnit, 131);
        assert_eq!(CblasUnit, 132);
        assert_eq!(CblasLeft, 141);
        assert_eq!(CblasRight, 142);
    }

    #[test]
    fn test_index_width_matches_blasint() {
        assert_eq!(
            INDEX_WIDTH.bits() as usize,
            8 * std::mem::size_of::<blasint>()
        );
    }
}
