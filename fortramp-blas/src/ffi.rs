//! The C surface: unmangled `cblas_*` Level-2 and Level-3 symbols over the
//! process registry and handler, plus the hooks a host uses to fill the
//! registry.
//!
//! Errors are reported through the process-wide handler (see
//! [`fortramp_core::error::set_error_handler`]); the C functions themselves
//! return nothing, as in `cblas.h`.

use std::ffi::c_void;
use std::os::raw::{c_char, c_int};

use fortramp_core::abi::*;
use fortramp_core::{complex, error, provider, Complex32, Complex64, FortranBlas};

use crate::dispatch::Trampoline;

static GLOBAL: Trampoline = Trampoline::global();

// =========================================================================
// cblas_* Level-2 symbols
// =========================================================================

macro_rules! real_level2_exports {
    ($t:ty: $gemv_c:ident => $gemv:ident, $ger_c:ident => $ger:ident,
     $symv_c:ident => $symv:ident, $syr_c:ident => $syr:ident,
     $trmv_c:ident => $trmv:ident, $trsv_c:ident => $trsv:ident) => {
        #[no_mangle]
        pub unsafe extern "C" fn $gemv_c(
            order: CBLAS_LAYOUT, trans: CBLAS_TRANSPOSE, m: blasint, n: blasint, alpha: $t,
            a: *const $t, lda: blasint, x: *const $t, inc_x: blasint, beta: $t, y: *mut $t,
            inc_y: blasint,
        ) {
            let _ = GLOBAL.$gemv(order, trans, m, n, alpha, a, lda, x, inc_x, beta, y, inc_y);
        }

        #[no_mangle]
        pub unsafe extern "C" fn $ger_c(
            order: CBLAS_LAYOUT, m: blasint, n: blasint, alpha: $t, x: *const $t,
            inc_x: blasint, y: *const $t, inc_y: blasint, a: *mut $t, lda: blasint,
        ) {
            let _ = GLOBAL.$ger(order, m, n, alpha, x, inc_x, y, inc_y, a, lda);
        }

        #[no_mangle]
        pub unsafe extern "C" fn $symv_c(
            order: CBLAS_LAYOUT, uplo: CBLAS_UPLO, n: blasint, alpha: $t, a: *const $t,
            lda: blasint, x: *const $t, inc_x: blasint, beta: $t, y: *mut $t, inc_y: blasint,
        ) {
            let _ = GLOBAL.$symv(order, uplo, n, alpha, a, lda, x, inc_x, beta, y, inc_y);
        }

        #[no_mangle]
        pub unsafe extern "C" fn $syr_c(
            order: CBLAS_LAYOUT, uplo: CBLAS_UPLO, n: blasint, alpha: $t, x: *const $t,
            inc_x: blasint, a: *mut $t, lda: blasint,
        ) {
            let _ = GLOBAL.$syr(order, uplo, n, alpha, x, inc_x, a, lda);
        }

        #[no_mangle]
        pub unsafe extern "C" fn $trmv_c(
            order: CBLAS_LAYOUT, uplo: CBLAS_UPLO, trans_a: CBLAS_TRANSPOSE, diag: CBLAS_DIAG,
            n: blasint, a: *const $t, lda: blasint, x: *mut $t, inc_x: blasint,
        ) {
            let _ = GLOBAL.$trmv(order, uplo, trans_a, diag, n, a, lda, x, inc_x);
        }

        #[no_mangle]
        pub unsafe extern "C" fn $trsv_c(
            order: CBLAS_LAYOUT, uplo: CBLAS_UPLO, trans_a: CBLAS_TRANSPOSE, diag: CBLAS_DIAG,
            n: blasint, a: *const $t, lda: blasint, x: *mut $t, inc_x: blasint,
        ) {
            let _ = GLOBAL.$trsv(order, uplo, trans_a, diag, n, a, lda, x, inc_x);
        }
    };
}

real_level2_exports!(f32: cblas_sgemv => sgemv, cblas_sger => sger, cblas_ssymv => ssymv,
    cblas_ssyr => ssyr, cblas_strmv => strmv, cblas_strsv => strsv);
real_level2_exports!(f64: cblas_dgemv => dgemv, cblas_dger => dger, cblas_dsymv => dsymv,
    cblas_dsyr => dsyr, cblas_dtrmv => dtrmv, cblas_dtrsv => dtrsv);

macro_rules! complex_level2_exports {
    ($t:ty, $r:ty: $gemv_c:ident => $gemv:ident, $geru_c:ident => $geru:ident,
     $gerc_c:ident => $gerc:ident, $hemv_c:ident => $hemv:ident, $her_c:ident => $her:ident,
     $trmv_c:ident => $trmv:ident, $trsv_c:ident => $trsv:ident) => {
        #[no_mangle]
        pub unsafe extern "C" fn $gemv_c(
            order: CBLAS_LAYOUT, trans: CBLAS_TRANSPOSE, m: blasint, n: blasint,
            alpha: *const c_void, a: *const c_void, lda: blasint, x: *const c_void,
            inc_x: blasint, beta: *const c_void, y: *mut c_void, inc_y: blasint,
        ) {
            let _ = GLOBAL.$gemv(
                order, trans, m, n, complex::cast::<$t>(alpha), complex::cast(a), lda,
                complex::cast(x), inc_x, complex::cast::<$t>(beta), complex::cast_mut(y), inc_y,
            );
        }

        #[no_mangle]
        pub unsafe extern "C" fn $geru_c(
            order: CBLAS_LAYOUT, m: blasint, n: blasint, alpha: *const c_void,
            x: *const c_void, inc_x: blasint, y: *const c_void, inc_y: blasint,
            a: *mut c_void, lda: blasint,
        ) {
            let _ = GLOBAL.$geru(
                order, m, n, complex::cast::<$t>(alpha), complex::cast(x), inc_x,
                complex::cast(y), inc_y, complex::cast_mut(a), lda,
            );
        }

        #[no_mangle]
        pub unsafe extern "C" fn $gerc_c(
            order: CBLAS_LAYOUT, m: blasint, n: blasint, alpha: *const c_void,
            x: *const c_void, inc_x: blasint, y: *const c_void, inc_y: blasint,
            a: *mut c_void, lda: blasint,
        ) {
            let _ = GLOBAL.$gerc(
                order, m, n, complex::cast::<$t>(alpha), complex::cast(x), inc_x,
                complex::cast(y), inc_y, complex::cast_mut(a), lda,
            );
        }

        #[no_mangle]
        pub unsafe extern "C" fn $hemv_c(
            order: CBLAS_LAYOUT, uplo: CBLAS_UPLO, n: blasint, alpha: *const c_void,
            a: *const c_void, lda: blasint, x: *const c_void, inc_x: blasint,
            beta: *const c_void, y: *mut c_void, inc_y: blasint,
        ) {
            let _ = GLOBAL.$hemv(
                order, uplo, n, complex::cast::<$t>(alpha), complex::cast(a), lda,
                complex::cast(x), inc_x, complex::cast::<$t>(beta), complex::cast_mut(y), inc_y,
            );
        }

        #[no_mangle]
        pub unsafe extern "C" fn $her_c(
            order: CBLAS_LAYOUT, uplo: CBLAS_UPLO, n: blasint, alpha: $r, x: *const c_void,
            inc_x: blasint, a: *mut c_void, lda: blasint,
        ) {
            let _ = GLOBAL.$her(
                order, uplo, n, alpha, complex::cast::<$t>(x), inc_x, complex::cast_mut(a), lda,
            );
        }

        #[no_mangle]
        pub unsafe extern "C" fn $trmv_c(
            order: CBLAS_LAYOUT, uplo: CBLAS_UPLO, trans_a: CBLAS_TRANSPOSE, diag: CBLAS_DIAG,
            n: blasint, a: *const c_void, lda: blasint, x: *mut c_void, inc_x: blasint,
        ) {
            let _ = GLOBAL.$trmv(
                order, uplo, trans_a, diag, n, complex::cast::<$t>(a), lda,
                complex::cast_mut(x), inc_x,
            );
        }

        #[no_mangle]
        pub unsafe extern "C" fn $trsv_c(
            order: CBLAS_LAYOUT, uplo: CBLAS_UPLO, trans_a: CBLAS_TRANSPOSE, diag: CBLAS_DIAG,
            n: blasint, a: *const c_void, lda: blasint, x: *mut c_void, inc_x: blasint,
        ) {
            let _ = GLOBAL.$trsv(
                order, uplo, trans_a, diag, n, complex::cast::<$t>(a), lda,
                complex::cast_mut(x), inc_x,
            );
        }
    };
}

complex_level2_exports!(Complex32, f32: cblas_cgemv => cgemv, cblas_cgeru => cgeru,
    cblas_cgerc => cgerc, cblas_chemv => chemv, cblas_cher => cher,
    cblas_ctrmv => ctrmv, cblas_ctrsv => ctrsv);
complex_level2_exports!(Complex64, f64: cblas_zgemv => zgemv, cblas_zgeru => zgeru,
    cblas_zgerc => zgerc, cblas_zhemv => zhemv, cblas_zher => zher,
    cblas_ztrmv => ztrmv, cblas_ztrsv => ztrsv);

// =========================================================================
// cblas_* Level-3 symbols
// =========================================================================

macro_rules! real_exports {
    ($t:ty: $gemm_c:ident => $gemm:ident, $symm_c:ident => $symm:ident,
     $syrk_c:ident => $syrk:ident, $syr2k_c:ident => $syr2k:ident,
     $trmm_c:ident => $trmm:ident, $trsm_c:ident => $trsm:ident) => {
        #[no_mangle]
        pub unsafe extern "C" fn $gemm_c(
            order: CBLAS_LAYOUT, trans_a: CBLAS_TRANSPOSE, trans_b: CBLAS_TRANSPOSE,
            m: blasint, n: blasint, k: blasint, alpha: $t, a: *const $t, lda: blasint,
            b: *const $t, ldb: blasint, beta: $t, c: *mut $t, ldc: blasint,
        ) {
            let _ = GLOBAL.$gemm(
                order, trans_a, trans_b, m, n, k, alpha, a, lda, b, ldb, beta, c, ldc,
            );
        }

        #[no_mangle]
        pub unsafe extern "C" fn $symm_c(
            order: CBLAS_LAYOUT, side: CBLAS_SIDE, uplo: CBLAS_UPLO, m: blasint, n: blasint,
            alpha: $t, a: *const $t, lda: blasint, b: *const $t, ldb: blasint, beta: $t,
            c: *mut $t, ldc: blasint,
        ) {
            let _ = GLOBAL.$symm(order, side, uplo, m, n, alpha, a, lda, b, ldb, beta, c, ldc);
        }

        #[no_mangle]
        pub unsafe extern "C" fn $syrk_c(
            order: CBLAS_LAYOUT, uplo: CBLAS_UPLO, trans: CBLAS_TRANSPOSE, n: blasint, k: blasint,
            alpha: $t, a: *const $t, lda: blasint, beta: $t, c: *mut $t, ldc: blasint,
        ) {
            let _ = GLOBAL.$syrk(order, uplo, trans, n, k, alpha, a, lda, beta, c, ldc);
        }

        #[no_mangle]
        pub unsafe extern "C" fn $syr2k_c(
            order: CBLAS_LAYOUT, uplo: CBLAS_UPLO, trans: CBLAS_TRANSPOSE, n: blasint, k: blasint,
            alpha: $t, a: *const $t, lda: blasint, b: *const $t, ldb: blasint, beta: $t,
            c: *mut $t, ldc: blasint,
        ) {
            let _ = GLOBAL.$syr2k(order, uplo, trans, n, k, alpha, a, lda, b, ldb, beta, c, ldc);
        }

        #[no_mangle]
        pub unsafe extern "C" fn $trmm_c(
            order: CBLAS_LAYOUT, side: CBLAS_SIDE, uplo: CBLAS_UPLO, trans_a: CBLAS_TRANSPOSE,
            diag: CBLAS_DIAG, m: blasint, n: blasint, alpha: $t, a: *const $t, lda: blasint,
            b: *mut $t, ldb: blasint,
        ) {
            let _ = GLOBAL.$trmm(order, side, uplo, trans_a, diag, m, n, alpha, a, lda, b, ldb);
        }

        #[no_mangle]
        pub unsafe extern "C" fn $trsm_c(
            order: CBLAS_LAYOUT, side: CBLAS_SIDE, uplo: CBLAS_UPLO, trans_a: CBLAS_TRANSPOSE,
            diag: CBLAS_DIAG, m: blasint, n: blasint, alpha: $t, a: *const $t, lda: blasint,
            b: *mut $t, ldb: blasint,
        ) {
            let _ = GLOBAL.$trsm(order, side, uplo, trans_a, diag, m, n, alpha, a, lda, b, ldb);
        }
    };
}

real_exports!(f32: cblas_sgemm => sgemm, cblas_ssymm => ssymm, cblas_ssyrk => ssyrk,
    cblas_ssyr2k => ssyr2k, cblas_strmm => strmm, cblas_strsm => strsm);
real_exports!(f64: cblas_dgemm => dgemm, cblas_dsymm => dsymm, cblas_dsyrk => dsyrk,
    cblas_dsyr2k => dsyr2k, cblas_dtrmm => dtrmm, cblas_dtrsm => dtrsm);

// Complex arguments arrive as `void *`.
macro_rules! complex_exports {
    ($t:ty, $r:ty: $gemm_c:ident => $gemm:ident, $symm_c:ident => $symm:ident,
     $hemm_c:ident => $hemm:ident, $syrk_c:ident => $syrk:ident, $herk_c:ident => $herk:ident,
     $syr2k_c:ident => $syr2k:ident, $her2k_c:ident => $her2k:ident,
     $trmm_c:ident => $trmm:ident, $trsm_c:ident => $trsm:ident) => {
        #[no_mangle]
        pub unsafe extern "C" fn $gemm_c(
            order: CBLAS_LAYOUT, trans_a: CBLAS_TRANSPOSE, trans_b: CBLAS_TRANSPOSE,
            m: blasint, n: blasint, k: blasint, alpha: *const c_void, a: *const c_void,
            lda: blasint, b: *const c_void, ldb: blasint, beta: *const c_void, c: *mut c_void,
            ldc: blasint,
        ) {
            let _ = GLOBAL.$gemm(
                order, trans_a, trans_b, m, n, k,
                complex::cast::<$t>(alpha), complex::cast(a), lda, complex::cast(b), ldb,
                complex::cast::<$t>(beta), complex::cast_mut(c), ldc,
            );
        }

        #[no_mangle]
        pub unsafe extern "C" fn $symm_c(
            order: CBLAS_LAYOUT, side: CBLAS_SIDE, uplo: CBLAS_UPLO, m: blasint, n: blasint,
            alpha: *const c_void, a: *const c_void, lda: blasint, b: *const c_void, ldb: blasint,
            beta: *const c_void, c: *mut c_void, ldc: blasint,
        ) {
            let _ = GLOBAL.$symm(
                order, side, uplo, m, n, complex::cast::<$t>(alpha), complex::cast(a), lda,
                complex::cast(b), ldb, complex::cast::<$t>(beta), complex::cast_mut(c), ldc,
            );
        }

        #[no_mangle]
        pub unsafe extern "C" fn $hemm_c(
            order: CBLAS_LAYOUT, side: CBLAS_SIDE, uplo: CBLAS_UPLO, m: blasint, n: blasint,
            alpha: *const c_void, a: *const c_void, lda: blasint, b: *const c_void, ldb: blasint,
            beta: *const c_void, c: *mut c_void, ldc: blasint,
        ) {
            let _ = GLOBAL.$hemm(
                order, side, uplo, m, n, complex::cast::<$t>(alpha), complex::cast(a), lda,
                complex::cast(b), ldb, complex::cast::<$t>(beta), complex::cast_mut(c), ldc,
            );
        }

        #[no_mangle]
        pub unsafe extern "C" fn $syrk_c(
            order: CBLAS_LAYOUT, uplo: CBLAS_UPLO, trans: CBLAS_TRANSPOSE, n: blasint, k: blasint,
            alpha: *const c_void, a: *const c_void, lda: blasint, beta: *const c_void,
            c: *mut c_void, ldc: blasint,
        ) {
            let _ = GLOBAL.$syrk(
                order, uplo, trans, n, k, complex::cast::<$t>(alpha), complex::cast(a), lda,
                complex::cast::<$t>(beta), complex::cast_mut(c), ldc,
            );
        }

        #[no_mangle]
        pub unsafe extern "C" fn $herk_c(
            order: CBLAS_LAYOUT, uplo: CBLAS_UPLO, trans: CBLAS_TRANSPOSE, n: blasint, k: blasint,
            alpha: $r, a: *const c_void, lda: blasint, beta: $r, c: *mut c_void, ldc: blasint,
        ) {
            let _ = GLOBAL.$herk(
                order, uplo, trans, n, k, alpha, complex::cast::<$t>(a), lda, beta,
                complex::cast_mut(c), ldc,
            );
        }

        #[no_mangle]
        pub unsafe extern "C" fn $syr2k_c(
            order: CBLAS_LAYOUT, uplo: CBLAS_UPLO, trans: CBLAS_TRANSPOSE, n: blasint, k: blasint,
            alpha: *const c_void, a: *const c_void, lda: blasint, b: *const c_void, ldb: blasint,
            beta: *const c_void, c: *mut c_void, ldc: blasint,
        ) {
            let _ = GLOBAL.$syr2k(
                order, uplo, trans, n, k, complex::cast::<$t>(alpha), complex::cast(a), lda,
                complex::cast(b), ldb, complex::cast::<$t>(beta), complex::cast_mut(c), ldc,
            );
        }

        #[no_mangle]
        pub unsafe extern "C" fn $her2k_c(
            order: CBLAS_LAYOUT, uplo: CBLAS_UPLO, trans: CBLAS_TRANSPOSE, n: blasint, k: blasint,
            alpha: *const c_void, a: *const c_void, lda: blasint, b: *const c_void, ldb: blasint,
            beta: $r, c: *mut c_void, ldc: blasint,
        ) {
            let _ = GLOBAL.$her2k(
                order, uplo, trans, n, k, complex::cast::<$t>(alpha), complex::cast(a), lda,
                complex::cast(b), ldb, beta, complex::cast_mut(c), ldc,
            );
        }

        #[no_mangle]
        pub unsafe extern "C" fn $trmm_c(
            order: CBLAS_LAYOUT, side: CBLAS_SIDE, uplo: CBLAS_UPLO, trans_a: CBLAS_TRANSPOSE,
            diag: CBLAS_DIAG, m: blasint, n: blasint, alpha: *const c_void, a: *const c_void,
            lda: blasint, b: *mut c_void, ldb: blasint,
        ) {
            let _ = GLOBAL.$trmm(
                order, side, uplo, trans_a, diag, m, n, complex::cast::<$t>(alpha),
                complex::cast(a), lda, complex::cast_mut(b), ldb,
            );
        }

        #[no_mangle]
        pub unsafe extern "C" fn $trsm_c(
            order: CBLAS_LAYOUT, side: CBLAS_SIDE, uplo: CBLAS_UPLO, trans_a: CBLAS_TRANSPOSE,
            diag: CBLAS_DIAG, m: blasint, n: blasint, alpha: *const c_void, a: *const c_void,
            lda: blasint, b: *mut c_void, ldb: blasint,
        ) {
            let _ = GLOBAL.$trsm(
                order, side, uplo, trans_a, diag, m, n, complex::cast::<$t>(alpha),
                complex::cast(a), lda, complex::cast_mut(b), ldb,
            );
        }
    };
}

complex_exports!(Complex32, f32: cblas_cgemm => cgemm, cblas_csymm => csymm,
    cblas_chemm => chemm, cblas_csyrk => csyrk, cblas_cherk => cherk,
    cblas_csyr2k => csyr2k, cblas_cher2k => cher2k, cblas_ctrmm => ctrmm,
    cblas_ctrsm => ctrsm);
complex_exports!(Complex64, f64: cblas_zgemm => zgemm, cblas_zsymm => zsymm,
    cblas_zhemm => zhemm, cblas_zsyrk => zsyrk, cblas_zherk => zherk,
    cblas_zsyr2k => zsyr2k, cblas_zher2k => zher2k, cblas_ztrmm => ztrmm,
    cblas_ztrsm => ztrsm);

/// `cblas_xerbla(p, rout, form)`. `form` is taken as the message verbatim;
/// no format arguments are read.
///
/// # Safety
///
/// `rout` and `form` must each be null or a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn cblas_xerbla(p: c_int, rout: *const c_char, form: *const c_char) {
    error::report(&error::xerbla_error(p, rout, form));
}

// =========================================================================
// Registration hooks
// =========================================================================

/// `0` registered (or already registered with the same function),
/// `1` null function, `2` a different function is already registered.
fn register(entry: &'static str, table: Option<FortranBlas>) -> c_int {
    let Some(table) = table else {
        log::warn!("fortramp_register_{entry}: null function pointer");
        return 1;
    };
    match provider::install(&table) {
        Ok(_) => 0,
        Err(err) => {
            log::warn!("{err}");
            2
        }
    }
}

macro_rules! register_hooks {
    ($($hook:ident => $entry:ident: $ty:ty;)+) => {$(
        #[no_mangle]
        pub extern "C" fn $hook(f: Option<$ty>) -> c_int {
            register(
                stringify!($entry),
                f.map(|f| FortranBlas { $entry: Some(f), ..FortranBlas::EMPTY }),
            )
        }
    )+};
}

register_hooks! {
    fortramp_register_sgemv => sgemv: GemvFn<f32>;
    fortramp_register_dgemv => dgemv: GemvFn<f64>;
    fortramp_register_cgemv => cgemv: GemvFn<Complex32>;
    fortramp_register_zgemv => zgemv: GemvFn<Complex64>;
    fortramp_register_sger => sger: GerFn<f32>;
    fortramp_register_dger => dger: GerFn<f64>;
    fortramp_register_cgeru => cgeru: GerFn<Complex32>;
    fortramp_register_zgeru => zgeru: GerFn<Complex64>;
    fortramp_register_cgerc => cgerc: GerFn<Complex32>;
    fortramp_register_zgerc => zgerc: GerFn<Complex64>;
    fortramp_register_ssymv => ssymv: SymvFn<f32>;
    fortramp_register_dsymv => dsymv: SymvFn<f64>;
    fortramp_register_chemv => chemv: SymvFn<Complex32>;
    fortramp_register_zhemv => zhemv: SymvFn<Complex64>;
    fortramp_register_ssyr => ssyr: SyrFn<f32, f32>;
    fortramp_register_dsyr => dsyr: SyrFn<f64, f64>;
    fortramp_register_cher => cher: SyrFn<Complex32, f32>;
    fortramp_register_zher => zher: SyrFn<Complex64, f64>;
    fortramp_register_strmv => strmv: TrmvFn<f32>;
    fortramp_register_dtrmv => dtrmv: TrmvFn<f64>;
    fortramp_register_ctrmv => ctrmv: TrmvFn<Complex32>;
    fortramp_register_ztrmv => ztrmv: TrmvFn<Complex64>;
    fortramp_register_strsv => strsv: TrmvFn<f32>;
    fortramp_register_dtrsv => dtrsv: TrmvFn<f64>;
    fortramp_register_ctrsv => ctrsv: TrmvFn<Complex32>;
    fortramp_register_ztrsv => ztrsv: TrmvFn<Complex64>;
    fortramp_register_sgemm => sgemm: GemmFn<f32>;
    fortramp_register_dgemm => dgemm: GemmFn<f64>;
    fortramp_register_cgemm => cgemm: GemmFn<Complex32>;
    fortramp_register_zgemm => zgemm: GemmFn<Complex64>;
    fortramp_register_ssymm => ssymm: SymmFn<f32>;
    fortramp_register_dsymm => dsymm: SymmFn<f64>;
    fortramp_register_csymm => csymm: SymmFn<Complex32>;
    fortramp_register_zsymm => zsymm: SymmFn<Complex64>;
    fortramp_register_chemm => chemm: SymmFn<Complex32>;
    fortramp_register_zhemm => zhemm: SymmFn<Complex64>;
    fortramp_register_ssyrk => ssyrk: SyrkFn<f32, f32>;
    fortramp_register_dsyrk => dsyrk: SyrkFn<f64, f64>;
    fortramp_register_csyrk => csyrk: SyrkFn<Complex32, Complex32>;
    fortramp_register_zsyrk => zsyrk: SyrkFn<Complex64, Complex64>;
    fortramp_register_cherk => cherk: SyrkFn<Complex32, f32>;
    fortramp_register_zherk => zherk: SyrkFn<Complex64, f64>;
    fortramp_register_ssyr2k => ssyr2k: Syr2kFn<f32, f32>;
    fortramp_register_dsyr2k => dsyr2k: Syr2kFn<f64, f64>;
    fortramp_register_csyr2k => csyr2k: Syr2kFn<Complex32, Complex32>;
    fortramp_register_zsyr2k => zsyr2k: Syr2kFn<Complex64, Complex64>;
    fortramp_register_cher2k => cher2k: Syr2kFn<Complex32, f32>;
    fortramp_register_zher2k => zher2k: Syr2kFn<Complex64, f64>;
    fortramp_register_strmm => strmm: TrmmFn<f32>;
    fortramp_register_dtrmm => dtrmm: TrmmFn<f64>;
    fortramp_register_ctrmm => ctrmm: TrmmFn<Complex32>;
    fortramp_register_ztrmm => ztrmm: TrmmFn<Complex64>;
    fortramp_register_strsm => strsm: TrmmFn<f32>;
    fortramp_register_dtrsm => dtrsm: TrmmFn<f64>;
    fortramp_register_ctrsm => ctrsm: TrmmFn<Complex32>;
    fortramp_register_ztrsm => ztrsm: TrmmFn<Complex64>;
}

/// Load the library named by `FORTRAMP_PROVIDER` into the registry.
///
/// `0` loaded, `1` nothing configured, `2` loading or registration failed.
///
/// # Safety
///
/// Runs the library's initialisers and trusts its exported signatures.
#[cfg(feature = "dynamic")]
#[no_mangle]
pub unsafe extern "C" fn fortramp_install_from_env() -> c_int {
    match provider::install_from_config() {
        Ok(Some(added)) => {
            log::debug!("installed {added} provider entries from FORTRAMP_PROVIDER");
            0
        }
        Ok(None) => 1,
        Err(err) => {
            log::warn!("{err}");
            2
        }
    }
}
