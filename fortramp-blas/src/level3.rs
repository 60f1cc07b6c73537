//! Typed Level-3 entry points, one per CBLAS routine.
//!
//! Real scalars are passed by value, complex scalars by address, exactly as
//! in `cblas.h` (HERK's alpha and beta and HER2K's beta are real, so by
//! value). Each method forwards to the generic pipeline in
//! [`crate::dispatch`] and returns what it reported.

use fortramp_core::abi::{CBLAS_DIAG, CBLAS_LAYOUT, CBLAS_SIDE, CBLAS_TRANSPOSE, CBLAS_UPLO};
use fortramp_core::{blasint, BlasResult, Complex32, Complex64};

use crate::dispatch::Trampoline;

macro_rules! real_level3 {
    ($t:ty: $gemm:ident, $symm:ident, $syrk:ident, $syr2k:ident, $trmm:ident, $trsm:ident) => {
        impl Trampoline {
            /// # Safety
            ///
            /// See [`Trampoline::gemm`].
            pub unsafe fn $gemm(
                &self,
                layout: CBLAS_LAYOUT,
                trans_a: CBLAS_TRANSPOSE,
                trans_b: CBLAS_TRANSPOSE,
                m: blasint,
                n: blasint,
                k: blasint,
                alpha: $t,
                a: *const $t,
                lda: blasint,
                b: *const $t,
                ldb: blasint,
                beta: $t,
                c: *mut $t,
                ldc: blasint,
            ) -> BlasResult<()> {
                self.gemm::<$t>(
                    layout, trans_a, trans_b, m, n, k, &alpha, a, lda, b, ldb, &beta, c, ldc,
                )
            }

            /// # Safety
            ///
            /// See [`Trampoline::gemm`].
            pub unsafe fn $symm(
                &self,
                layout: CBLAS_LAYOUT,
                side: CBLAS_SIDE,
                uplo: CBLAS_UPLO,
                m: blasint,
                n: blasint,
                alpha: $t,
                a: *const $t,
                lda: blasint,
                b: *const $t,
                ldb: blasint,
                beta: $t,
                c: *mut $t,
                ldc: blasint,
            ) -> BlasResult<()> {
                self.symm::<$t>(layout, side, uplo, m, n, &alpha, a, lda, b, ldb, &beta, c, ldc)
            }

            /// # Safety
            ///
            /// See [`Trampoline::gemm`].
            pub unsafe fn $syrk(
                &self,
                layout: CBLAS_LAYOUT,
                uplo: CBLAS_UPLO,
                trans: CBLAS_TRANSPOSE,
                n: blasint,
                k: blasint,
                alpha: $t,
                a: *const $t,
                lda: blasint,
                beta: $t,
                c: *mut $t,
                ldc: blasint,
            ) -> BlasResult<()> {
                self.syrk::<$t>(layout, uplo, trans, n, k, &alpha, a, lda, &beta, c, ldc)
            }

            /// # Safety
            ///
            /// See [`Trampoline::gemm`].
            pub unsafe fn $syr2k(
                &self,
                layout: CBLAS_LAYOUT,
                uplo: CBLAS_UPLO,
                trans: CBLAS_TRANSPOSE,
                n: blasint,
                k: blasint,
                alpha: $t,
                a: *const $t,
                lda: blasint,
                b: *const $t,
                ldb: blasint,
                beta: $t,
                c: *mut $t,
                ldc: blasint,
            ) -> BlasResult<()> {
                self.syr2k::<$t>(layout, uplo, trans, n, k, &alpha, a, lda, b, ldb, &beta, c, ldc)
            }

            /// # Safety
            ///
            /// See [`Trampoline::gemm`].
            pub unsafe fn $trmm(
                &self,
                layout: CBLAS_LAYOUT,
                side: CBLAS_SIDE,
                uplo: CBLAS_UPLO,
                trans_a: CBLAS_TRANSPOSE,
                diag: CBLAS_DIAG,
                m: blasint,
                n: blasint,
                alpha: $t,
                a: *const $t,
                lda: blasint,
                b: *mut $t,
                ldb: blasint,
            ) -> BlasResult<()> {
                self.trmm::<$t>(layout, side, uplo, trans_a, diag, m, n, &alpha, a, lda, b, ldb)
            }

            /// # Safety
            ///
            /// See [`Trampoline::gemm`].
            pub unsafe fn $trsm(
                &self,
                layout: CBLAS_LAYOUT,
                side: CBLAS_SIDE,
                uplo: CBLAS_UPLO,
                trans_a: CBLAS_TRANSPOSE,
                diag: CBLAS_DIAG,
                m: blasint,
                n: blasint,
                alpha: $t,
                a: *const $t,
                lda: blasint,
                b: *mut $t,
                ldb: blasint,
            ) -> BlasResult<()> {
                self.trsm::<$t>(layout, side, uplo, trans_a, diag, m, n, &alpha, a, lda, b, ldb)
            }
        }
    };
}

macro_rules! complex_level3 {
    ($t:ty, $r:ty: $gemm:ident, $symm:ident, $hemm:ident, $syrk:ident, $herk:ident,
     $syr2k:ident, $her2k:ident, $trmm:ident, $trsm:ident) => {
        impl Trampoline {
            /// # Safety
            ///
            /// See [`Trampoline::gemm`].
            pub unsafe fn $gemm(
                &self,
                layout: CBLAS_LAYOUT,
                trans_a: CBLAS_TRANSPOSE,
                trans_b: CBLAS_TRANSPOSE,
                m: blasint,
                n: blasint,
                k: blasint,
                alpha: *const $t,
                a: *const $t,
                lda: blasint,
                b: *const $t,
                ldb: blasint,
                beta: *const $t,
                c: *mut $t,
                ldc: blasint,
            ) -> BlasResult<()> {
                self.gemm::<$t>(
                    layout, trans_a, trans_b, m, n, k, alpha, a, lda, b, ldb, beta, c, ldc,
                )
            }

            /// # Safety
            ///
            /// See [`Trampoline::gemm`].
            pub unsafe fn $symm(
                &self,
                layout: CBLAS_LAYOUT,
                side: CBLAS_SIDE,
                uplo: CBLAS_UPLO,
                m: blasint,
                n: blasint,
                alpha: *const $t,
                a: *const $t,
                lda: blasint,
                b: *const $t,
                ldb: blasint,
                beta: *const $t,
                c: *mut $t,
                ldc: blasint,
            ) -> BlasResult<()> {
                self.symm::<$t>(layout, side, uplo, m, n, alpha, a, lda, b, ldb, beta, c, ldc)
            }

            /// # Safety
            ///
            /// See [`Trampoline::gemm`].
            pub unsafe fn $hemm(
                &self,
                layout: CBLAS_LAYOUT,
                side: CBLAS_SIDE,
                uplo: CBLAS_UPLO,
                m: blasint,
                n: blasint,
                alpha: *const $t,
                a: *const $t,
                lda: blasint,
                b: *const $t,
                ldb: blasint,
                beta: *const $t,
                c: *mut $t,
                ldc: blasint,
            ) -> BlasResult<()> {
                self.hemm::<$t>(layout, side, uplo, m, n, alpha, a, lda, b, ldb, beta, c, ldc)
            }

            /// # Safety
            ///
            /// See [`Trampoline::gemm`].
            pub unsafe fn $syrk(
                &self,
                layout: CBLAS_LAYOUT,
                uplo: CBLAS_UPLO,
                trans: CBLAS_TRANSPOSE,
                n: blasint,
                k: blasint,
                alpha: *const $t,
                a: *const $t,
                lda: blasint,
                beta: *const $t,
                c: *mut $t,
                ldc: blasint,
            ) -> BlasResult<()> {
                self.syrk::<$t>(layout, uplo, trans, n, k, alpha, a, lda, beta, c, ldc)
            }

            /// # Safety
            ///
            /// See [`Trampoline::gemm`].
            pub unsafe fn $herk(
                &self,
                layout: CBLAS_LAYOUT,
                uplo: CBLAS_UPLO,
                trans: CBLAS_TRANSPOSE,
                n: blasint,
                k: blasint,
                alpha: $r,
                a: *const $t,
                lda: blasint,
                beta: $r,
                c: *mut $t,
                ldc: blasint,
            ) -> BlasResult<()> {
                self.herk::<$t>(layout, uplo, trans, n, k, &alpha, a, lda, &beta, c, ldc)
            }

            /// # Safety
            ///
            /// See [`Trampoline::gemm`].
            pub unsafe fn $syr2k(
                &self,
                layout: CBLAS_LAYOUT,
                uplo: CBLAS_UPLO,
                trans: CBLAS_TRANSPOSE,
                n: blasint,
                k: blasint,
                alpha: *const $t,
                a: *const $t,
                lda: blasint,
                b: *const $t,
                ldb: blasint,
                beta: *const $t,
                c: *mut $t,
                ldc: blasint,
            ) -> BlasResult<()> {
                self.syr2k::<$t>(layout, uplo, trans, n, k, alpha, a, lda, b, ldb, beta, c, ldc)
            }

            /// # Safety
            ///
            /// See [`Trampoline::gemm`].
            pub unsafe fn $her2k(
                &self,
                layout: CBLAS_LAYOUT,
                uplo: CBLAS_UPLO,
                trans: CBLAS_TRANSPOSE,
                n: blasint,
                k: blasint,
                alpha: *const $t,
                a: *const $t,
                lda: blasint,
                b: *const $t,
                ldb: blasint,
                beta: $r,
                c: *mut $t,
                ldc: blasint,
            ) -> BlasResult<()> {
                self.her2k::<$t>(layout, uplo, trans, n, k, alpha, a, lda, b, ldb, &beta, c, ldc)
            }

            /// # Safety
            ///
            /// See [`Trampoline::gemm`].
            pub unsafe fn $trmm(
                &self,
                layout: CBLAS_LAYOUT,
                side: CBLAS_SIDE,
                uplo: CBLAS_UPLO,
                trans_a: CBLAS_TRANSPOSE,
                diag: CBLAS_DIAG,
                m: blasint,
                n: blasint,
                alpha: *const $t,
                a: *const $t,
                lda: blasint,
                b: *mut $t,
                ldb: blasint,
            ) -> BlasResult<()> {
                self.trmm::<$t>(layout, side, uplo, trans_a, diag, m, n, alpha, a, lda, b, ldb)
            }

            /// # Safety
            ///
            /// See [`Trampoline::gemm`].
            pub unsafe fn $trsm(
                &self,
                layout: CBLAS_LAYOUT,
                side: CBLAS_SIDE,
                uplo: CBLAS_UPLO,
                trans_a: CBLAS_TRANSPOSE,
                diag: CBLAS_DIAG,
                m: blasint,
                n: blasint,
                alpha: *const $t,
                a: *const $t,
                lda: blasint,
                b: *mut $t,
                ldb: blasint,
            ) -> BlasResult<()> {
                self.trsm::<$t>(layout, side, uplo, trans_a, diag, m, n, alpha, a, lda, b, ldb)
            }
        }
    };
}

real_level3!(f32: sgemm, ssymm, ssyrk, ssyr2k, strmm, strsm);
real_level3!(f64: dgemm, dsymm, dsyrk, dsyr2k, dtrmm, dtrsm);
complex_level3!(Complex32, f32: cgemm, csymm, chemm, csyrk, cherk, csyr2k, cher2k, ctrmm, ctrsm);
complex_level3!(Complex64, f64: zgemm, zsymm, zhemm, zsyrk, zherk, zsyr2k, zher2k, ztrmm, ztrsm);
