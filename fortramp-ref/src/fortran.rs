//! Fortran calling convention over [`crate::kernels`].
//!
//! Every argument arrives by address and the option flags are single
//! characters. Arguments are checked in the order the reference BLAS checks
//! them; the first bad one is reported through
//! [`fortramp_core::error::report_provider_error`] with its Fortran position
//! and the routine returns without touching any output.

use std::os::raw::c_char;
use std::convert::identity;
use std::slice;

use fortramp_core::abi::{
    GemmFn, GemvFn, GerFn, Syr2kFn, SymmFn, SymvFn, SyrFn, SyrkFn, TrmmFn, TrmvFn,
};
use fortramp_core::error::report_provider_error;
use fortramp_core::{
    blasint, Complex32, Complex64, Diag, Element, FortranBlas, Side, Transpose, Uplo,
};

use crate::kernels;

// ── Flag parsing ────────────────────────────────────────────────────

#[inline]
unsafe fn flag(p: *const c_char) -> u8 {
    (*p as u8).to_ascii_uppercase()
}

fn parse_trans(c: u8) -> Option<Transpose> {
    match c {
        b'N' => Some(Transpose::NoTrans),
        b'T' => Some(Transpose::Trans),
        b'C' => Some(Transpose::ConjTrans),
        _ => None,
    }
}

fn parse_uplo(c: u8) -> Option<Uplo> {
    match c {
        b'U' => Some(Uplo::Upper),
        b'L' => Some(Uplo::Lower),
        _ => None,
    }
}

fn parse_side(c: u8) -> Option<Side> {
    match c {
        b'L' => Some(Side::Left),
        b'R' => Some(Side::Right),
        _ => None,
    }
}

fn parse_diag(c: u8) -> Option<Diag> {
    match c {
        b'N' => Some(Diag::NonUnit),
        b'U' => Some(Diag::Unit),
        _ => None,
    }
}

/// Position of the first failing check, if any.
fn first_failure(checks: &[(bool, blasint)]) -> Option<blasint> {
    checks.iter().find(|(bad, _)| *bad).map(|&(_, info)| info)
}

/// Report and bail out with the first failing check.
macro_rules! check {
    ($name:expr, $($bad:expr => $info:expr),+ $(,)?) => {
        if let Some(info) = first_failure(&[$(($bad, $info)),+]) {
            report_provider_error($name, info);
            return;
        }
    };
}

// ── Matrix views ────────────────────────────────────────────────────

/// The `rows x cols` column-major window at `p` with leading dimension `ld`.
#[inline]
unsafe fn view<'a, T>(p: *const T, ld: usize, rows: usize, cols: usize) -> &'a [T] {
    if rows == 0 || cols == 0 {
        &[]
    } else {
        slice::from_raw_parts(p, ld * (cols - 1) + rows)
    }
}

#[inline]
unsafe fn view_mut<'a, T>(p: *mut T, ld: usize, rows: usize, cols: usize) -> &'a mut [T] {
    if rows == 0 || cols == 0 {
        &mut []
    } else {
        slice::from_raw_parts_mut(p, ld * (cols - 1) + rows)
    }
}

/// The `len` elements of a strided vector at `p`, gaps included.
#[inline]
unsafe fn vector<'a, T>(p: *const T, len: usize, inc: isize) -> &'a [T] {
    if len == 0 {
        &[]
    } else {
        slice::from_raw_parts(p, 1 + (len - 1) * inc.unsigned_abs())
    }
}

#[inline]
unsafe fn vector_mut<'a, T>(p: *mut T, len: usize, inc: isize) -> &'a mut [T] {
    if len == 0 {
        &mut []
    } else {
        slice::from_raw_parts_mut(p, 1 + (len - 1) * inc.unsigned_abs())
    }
}

// ── Per-family adapters ─────────────────────────────────────────────

unsafe fn gemv<T: Element>(
    name: &str,
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
) {
    let tr = parse_trans(flag(trans));
    let (m, n, lda, incx, incy) = (*m, *n, *lda, *incx, *incy);
    check!(name,
        tr.is_none() => 1,
        m < 0 => 2,
        n < 0 => 3,
        lda < m.max(1) => 6,
        incx == 0 => 8,
        incy == 0 => 11,
    );
    let Some(tr) = tr else { return };
    let (m, n, lda) = (m as usize, n as usize, lda as usize);
    let (leny, lenx) = if tr == Transpose::NoTrans { (m, n) } else { (n, m) };
    let (incx, incy) = (incx as isize, incy as isize);

    kernels::gemv(
        tr,
        m,
        n,
        *alpha,
        view(a, lda, m, n),
        lda,
        vector(x, lenx, incx),
        incx,
        *beta,
        vector_mut(y, leny, incy),
        incy,
    );
}

unsafe fn ger<T: Element>(
    name: &str,
    conjugate_y: bool,
    m: *const blasint,
    n: *const blasint,
    alpha: *const T,
    x: *const T,
    incx: *const blasint,
    y: *const T,
    incy: *const blasint,
    a: *mut T,
    lda: *const blasint,
) {
    let (m, n, incx, incy, lda) = (*m, *n, *incx, *incy, *lda);
    check!(name,
        m < 0 => 1,
        n < 0 => 2,
        incx == 0 => 5,
        incy == 0 => 7,
        lda < m.max(1) => 9,
    );
    let (m, n, lda) = (m as usize, n as usize, lda as usize);
    let (incx, incy) = (incx as isize, incy as isize);

    kernels::ger(
        conjugate_y,
        m,
        n,
        *alpha,
        vector(x, m, incx),
        incx,
        vector(y, n, incy),
        incy,
        view_mut(a, lda, m, n),
        lda,
    );
}

unsafe fn symv<T: Element>(
    name: &str,
    hermitian: bool,
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
) {
    let ul = parse_uplo(flag(uplo));
    let (n, lda, incx, incy) = (*n, *lda, *incx, *incy);
    check!(name,
        ul.is_none() => 1,
        n < 0 => 2,
        lda < n.max(1) => 5,
        incx == 0 => 7,
        incy == 0 => 10,
    );
    let Some(ul) = ul else { return };
    let (n, lda) = (n as usize, lda as usize);
    let (incx, incy) = (incx as isize, incy as isize);

    kernels::symv(
        ul,
        hermitian,
        n,
        *alpha,
        view(a, lda, n, n),
        lda,
        vector(x, n, incx),
        incx,
        *beta,
        vector_mut(y, n, incy),
        incy,
    );
}

unsafe fn syr<T: Element, S: Copy>(
    name: &str,
    hermitian: bool,
    lift: fn(S) -> T,
    uplo: *const c_char,
    n: *const blasint,
    alpha: *const S,
    x: *const T,
    incx: *const blasint,
    a: *mut T,
    lda: *const blasint,
) {
    let ul = parse_uplo(flag(uplo));
    let (n, incx, lda) = (*n, *incx, *lda);
    check!(name,
        ul.is_none() => 1,
        n < 0 => 2,
        incx == 0 => 5,
        lda < n.max(1) => 7,
    );
    let Some(ul) = ul else { return };
    let (n, lda, incx) = (n as usize, lda as usize, incx as isize);

    kernels::syr(
        ul,
        hermitian,
        n,
        lift(*alpha),
        vector(x, n, incx),
        incx,
        view_mut(a, lda, n, n),
        lda,
    );
}

unsafe fn triangular_vector<T: Element>(
    name: &str,
    solve: bool,
    uplo: *const c_char,
    trans: *const c_char,
    diag: *const c_char,
    n: *const blasint,
    a: *const T,
    lda: *const blasint,
    x: *mut T,
    incx: *const blasint,
) {
    let ul = parse_uplo(flag(uplo));
    let tr = parse_trans(flag(trans));
    let dg = parse_diag(flag(diag));
    let (n, lda, incx) = (*n, *lda, *incx);
    check!(name,
        ul.is_none() => 1,
        tr.is_none() => 2,
        dg.is_none() => 3,
        n < 0 => 4,
        lda < n.max(1) => 6,
        incx == 0 => 8,
    );
    let (Some(ul), Some(tr), Some(dg)) = (ul, tr, dg) else {
        return;
    };
    let (n, lda, incx) = (n as usize, lda as usize, incx as isize);

    let a = view(a, lda, n, n);
    let x = vector_mut(x, n, incx);
    if solve {
        kernels::trsv(ul, tr, dg, n, a, lda, x, incx);
    } else {
        kernels::trmv(ul, tr, dg, n, a, lda, x, incx);
    }
}

unsafe fn gemm<T: Element>(
    name: &str,
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
) {
    let (ta, tb) = (parse_trans(flag(transa)), parse_trans(flag(transb)));
    let (m, n, k, lda, ldb, ldc) = (*m, *n, *k, *lda, *ldb, *ldc);
    let nrowa = if ta == Some(Transpose::NoTrans) { m } else { k };
    let nrowb = if tb == Some(Transpose::NoTrans) { k } else { n };
    check!(name,
        ta.is_none() => 1,
        tb.is_none() => 2,
        m < 0 => 3,
        n < 0 => 4,
        k < 0 => 5,
        lda < nrowa.max(1) => 8,
        ldb < nrowb.max(1) => 10,
        ldc < m.max(1) => 13,
    );
    let (Some(ta), Some(tb)) = (ta, tb) else { return };
    let (m, n, k) = (m as usize, n as usize, k as usize);
    let (lda, ldb, ldc) = (lda as usize, ldb as usize, ldc as usize);

    let (ra, ca) = if ta == Transpose::NoTrans { (m, k) } else { (k, m) };
    let (rb, cb) = if tb == Transpose::NoTrans { (k, n) } else { (n, k) };
    kernels::gemm(
        ta,
        tb,
        m,
        n,
        k,
        *alpha,
        view(a, lda, ra, ca),
        lda,
        view(b, ldb, rb, cb),
        ldb,
        *beta,
        view_mut(c, ldc, m, n),
        ldc,
    );
}

unsafe fn symm<T: Element>(
    name: &str,
    hermitian: bool,
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
) {
    let (sd, ul) = (parse_side(flag(side)), parse_uplo(flag(uplo)));
    let (m, n, lda, ldb, ldc) = (*m, *n, *lda, *ldb, *ldc);
    let ka = if sd == Some(Side::Left) { m } else { n };
    check!(name,
        sd.is_none() => 1,
        ul.is_none() => 2,
        m < 0 => 3,
        n < 0 => 4,
        lda < ka.max(1) => 7,
        ldb < m.max(1) => 9,
        ldc < m.max(1) => 12,
    );
    let (Some(sd), Some(ul)) = (sd, ul) else { return };
    let (m, n, ka) = (m as usize, n as usize, ka as usize);
    let (lda, ldb, ldc) = (lda as usize, ldb as usize, ldc as usize);

    kernels::symm(
        sd,
        ul,
        hermitian,
        m,
        n,
        *alpha,
        view(a, lda, ka, ka),
        lda,
        view(b, ldb, m, n),
        ldb,
        *beta,
        view_mut(c, ldc, m, n),
        ldc,
    );
}

/// TRANS values the routine accepts: real SYRK takes all three, complex
/// SYRK rejects `C`, HERK rejects `T`.
fn trans_allowed<T: Element>(trans: Transpose, hermitian: bool) -> bool {
    match trans {
        Transpose::NoTrans => true,
        Transpose::Trans => !hermitian,
        Transpose::ConjTrans => hermitian || !T::PRECISION.is_complex(),
    }
}

unsafe fn syrk<T: Element, S: Copy>(
    name: &str,
    hermitian: bool,
    lift: fn(S) -> T,
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
) {
    let ul = parse_uplo(flag(uplo));
    let tr = parse_trans(flag(trans)).filter(|&t| trans_allowed::<T>(t, hermitian));
    let (n, k, lda, ldc) = (*n, *k, *lda, *ldc);
    let nrowa = if tr == Some(Transpose::NoTrans) { n } else { k };
    check!(name,
        ul.is_none() => 1,
        tr.is_none() => 2,
        n < 0 => 3,
        k < 0 => 4,
        lda < nrowa.max(1) => 7,
        ldc < n.max(1) => 10,
    );
    let (Some(ul), Some(tr)) = (ul, tr) else { return };
    let (n, k, lda, ldc) = (n as usize, k as usize, lda as usize, ldc as usize);

    let (ra, ca) = if tr == Transpose::NoTrans { (n, k) } else { (k, n) };
    kernels::syrk(
        ul,
        tr,
        hermitian,
        n,
        k,
        lift(*alpha),
        view(a, lda, ra, ca),
        lda,
        lift(*beta),
        view_mut(c, ldc, n, n),
        ldc,
    );
}

unsafe fn syr2k<T: Element, B: Copy>(
    name: &str,
    hermitian: bool,
    lift: fn(B) -> T,
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
) {
    let ul = parse_uplo(flag(uplo));
    let tr = parse_trans(flag(trans)).filter(|&t| trans_allowed::<T>(t, hermitian));
    let (n, k, lda, ldb, ldc) = (*n, *k, *lda, *ldb, *ldc);
    let nrowa = if tr == Some(Transpose::NoTrans) { n } else { k };
    check!(name,
        ul.is_none() => 1,
        tr.is_none() => 2,
        n < 0 => 3,
        k < 0 => 4,
        lda < nrowa.max(1) => 7,
        ldb < nrowa.max(1) => 9,
        ldc < n.max(1) => 12,
    );
    let (Some(ul), Some(tr)) = (ul, tr) else { return };
    let (n, k) = (n as usize, k as usize);
    let (lda, ldb, ldc) = (lda as usize, ldb as usize, ldc as usize);

    let (r, cols) = if tr == Transpose::NoTrans { (n, k) } else { (k, n) };
    kernels::syr2k(
        ul,
        tr,
        hermitian,
        n,
        k,
        *alpha,
        view(a, lda, r, cols),
        lda,
        view(b, ldb, r, cols),
        ldb,
        lift(*beta),
        view_mut(c, ldc, n, n),
        ldc,
    );
}

unsafe fn triangular<T: Element>(
    name: &str,
    solve: bool,
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
) {
    let sd = parse_side(flag(side));
    let ul = parse_uplo(flag(uplo));
    let tr = parse_trans(flag(transa));
    let dg = parse_diag(flag(diag));
    let (m, n, lda, ldb) = (*m, *n, *lda, *ldb);
    let nrowa = if sd == Some(Side::Left) { m } else { n };
    check!(name,
        sd.is_none() => 1,
        ul.is_none() => 2,
        tr.is_none() => 3,
        dg.is_none() => 4,
        m < 0 => 5,
        n < 0 => 6,
        lda < nrowa.max(1) => 9,
        ldb < m.max(1) => 11,
    );
    let (Some(sd), Some(ul), Some(tr), Some(dg)) = (sd, ul, tr, dg) else {
        return;
    };
    let (m, n, ka) = (m as usize, n as usize, nrowa as usize);
    let (lda, ldb) = (lda as usize, ldb as usize);

    let a = view(a, lda, ka, ka);
    let b = view_mut(b, ldb, m, n);
    if solve {
        kernels::trsm(sd, ul, tr, dg, m, n, *alpha, a, lda, b, ldb);
    } else {
        kernels::trmm(sd, ul, tr, dg, m, n, *alpha, a, lda, b, ldb);
    }
}

// ── Entry points ────────────────────────────────────────────────────

macro_rules! gemv_entry {
    ($($name:ident, $t:ty, $label:literal;)+) => {$(
        #[doc = concat!("Fortran `", $label, "`.")]
        pub unsafe extern "C" fn $name(
            trans: *const c_char,
            m: *const blasint,
            n: *const blasint,
            alpha: *const $t,
            a: *const $t,
            lda: *const blasint,
            x: *const $t,
            incx: *const blasint,
            beta: *const $t,
            y: *mut $t,
            incy: *const blasint,
        ) {
            gemv::<$t>($label, trans, m, n, alpha, a, lda, x, incx, beta, y, incy)
        }
    )+};
}

macro_rules! ger_entry {
    ($($name:ident, $t:ty, $label:literal, $conjugate:expr;)+) => {$(
        #[doc = concat!("Fortran `", $label, "`.")]
        pub unsafe extern "C" fn $name(
            m: *const blasint,
            n: *const blasint,
            alpha: *const $t,
            x: *const $t,
            incx: *const blasint,
            y: *const $t,
            incy: *const blasint,
            a: *mut $t,
            lda: *const blasint,
        ) {
            ger::<$t>($label, $conjugate, m, n, alpha, x, incx, y, incy, a, lda)
        }
    )+};
}

macro_rules! symv_entry {
    ($($name:ident, $t:ty, $label:literal, $hermitian:expr;)+) => {$(
        #[doc = concat!("Fortran `", $label, "`.")]
        pub unsafe extern "C" fn $name(
            uplo: *const c_char,
            n: *const blasint,
            alpha: *const $t,
            a: *const $t,
            lda: *const blasint,
            x: *const $t,
            incx: *const blasint,
            beta: *const $t,
            y: *mut $t,
            incy: *const blasint,
        ) {
            symv::<$t>($label, $hermitian, uplo, n, alpha, a, lda, x, incx, beta, y, incy)
        }
    )+};
}

macro_rules! syr_entry {
    ($($name:ident, $t:ty, $s:ty, $label:literal, $hermitian:expr, $lift:expr;)+) => {$(
        #[doc = concat!("Fortran `", $label, "`.")]
        pub unsafe extern "C" fn $name(
            uplo: *const c_char,
            n: *const blasint,
            alpha: *const $s,
            x: *const $t,
            incx: *const blasint,
            a: *mut $t,
            lda: *const blasint,
        ) {
            syr::<$t, $s>($label, $hermitian, $lift, uplo, n, alpha, x, incx, a, lda)
        }
    )+};
}

macro_rules! trmv_entry {
    ($($name:ident, $t:ty, $label:literal, $solve:expr;)+) => {$(
        #[doc = concat!("Fortran `", $label, "`.")]
        pub unsafe extern "C" fn $name(
            uplo: *const c_char,
            trans: *const c_char,
            diag: *const c_char,
            n: *const blasint,
            a: *const $t,
            lda: *const blasint,
            x: *mut $t,
            incx: *const blasint,
        ) {
            triangular_vector::<$t>($label, $solve, uplo, trans, diag, n, a, lda, x, incx)
        }
    )+};
}

macro_rules! gemm_entry {
    ($($name:ident, $t:ty, $label:literal;)+) => {$(
        #[doc = concat!("Fortran `", $label, "`.")]
        pub unsafe extern "C" fn $name(
            transa: *const c_char,
            transb: *const c_char,
            m: *const blasint,
            n: *const blasint,
            k: *const blasint,
            alpha: *const $t,
            a: *const $t,
            lda: *const blasint,
            b: *const $t,
            ldb: *const blasint,
            beta: *const $t,
            c: *mut $t,
            ldc: *const blasint,
        ) {
            gemm::<$t>($label, transa, transb, m, n, k, alpha, a, lda, b, ldb, beta, c, ldc)
        }
    )+};
}

macro_rules! symm_entry {
    ($($name:ident, $t:ty, $label:literal, $hermitian:expr;)+) => {$(
        #[doc = concat!("Fortran `", $label, "`.")]
        pub unsafe extern "C" fn $name(
            side: *const c_char,
            uplo: *const c_char,
            m: *const blasint,
            n: *const blasint,
            alpha: *const $t,
            a: *const $t,
            lda: *const blasint,
            b: *const $t,
            ldb: *const blasint,
            beta: *const $t,
            c: *mut $t,
            ldc: *const blasint,
        ) {
            symm::<$t>(
                $label,
                $hermitian,
                side, uplo, m, n, alpha, a, lda, b, ldb, beta, c, ldc,
            )
        }
    )+};
}

macro_rules! syrk_entry {
    ($($name:ident, $t:ty, $s:ty, $label:literal, $hermitian:expr, $lift:expr;)+) => {$(
        #[doc = concat!("Fortran `", $label, "`.")]
        pub unsafe extern "C" fn $name(
            uplo: *const c_char,
            trans: *const c_char,
            n: *const blasint,
            k: *const blasint,
            alpha: *const $s,
            a: *const $t,
            lda: *const blasint,
            beta: *const $s,
            c: *mut $t,
            ldc: *const blasint,
        ) {
            syrk::<$t, $s>(
                $label,
                $hermitian,
                $lift,
                uplo, trans, n, k, alpha, a, lda, beta, c, ldc,
            )
        }
    )+};
}

macro_rules! syr2k_entry {
    ($($name:ident, $t:ty, $b:ty, $label:literal, $hermitian:expr, $lift:expr;)+) => {$(
        #[doc = concat!("Fortran `", $label, "`.")]
        pub unsafe extern "C" fn $name(
            uplo: *const c_char,
            trans: *const c_char,
            n: *const blasint,
            k: *const blasint,
            alpha: *const $t,
            a: *const $t,
            lda: *const blasint,
            b: *const $t,
            ldb: *const blasint,
            beta: *const $b,
            c: *mut $t,
            ldc: *const blasint,
        ) {
            syr2k::<$t, $b>(
                $label,
                $hermitian,
                $lift,
                uplo, trans, n, k, alpha, a, lda, b, ldb, beta, c, ldc,
            )
        }
    )+};
}

macro_rules! triangular_entry {
    ($($name:ident, $t:ty, $label:literal, $solve:expr;)+) => {$(
        #[doc = concat!("Fortran `", $label, "`.")]
        pub unsafe extern "C" fn $name(
            side: *const c_char,
            uplo: *const c_char,
            transa: *const c_char,
            diag: *const c_char,
            m: *const blasint,
            n: *const blasint,
            alpha: *const $t,
            a: *const $t,
            lda: *const blasint,
            b: *mut $t,
            ldb: *const blasint,
        ) {
            triangular::<$t>(
                $label,
                $solve,
                side, uplo, transa, diag, m, n, alpha, a, lda, b, ldb,
            )
        }
    )+};
}

gemv_entry! {
    sgemv, f32, "SGEMV";
    dgemv, f64, "DGEMV";
    cgemv, Complex32, "CGEMV";
    zgemv, Complex64, "ZGEMV";
}

ger_entry! {
    sger, f32, "SGER", false;
    dger, f64, "DGER", false;
    cgeru, Complex32, "CGERU", false;
    zgeru, Complex64, "ZGERU", false;
    cgerc, Complex32, "CGERC", true;
    zgerc, Complex64, "ZGERC", true;
}

symv_entry! {
    ssymv, f32, "SSYMV", false;
    dsymv, f64, "DSYMV", false;
    chemv, Complex32, "CHEMV", true;
    zhemv, Complex64, "ZHEMV", true;
}

syr_entry! {
    ssyr, f32, f32, "SSYR", false, identity::<f32>;
    dsyr, f64, f64, "DSYR", false, identity::<f64>;
    cher, Complex32, f32, "CHER", true, Complex32::from_real;
    zher, Complex64, f64, "ZHER", true, Complex64::from_real;
}

trmv_entry! {
    strmv, f32, "STRMV", false;
    dtrmv, f64, "DTRMV", false;
    ctrmv, Complex32, "CTRMV", false;
    ztrmv, Complex64, "ZTRMV", false;
    strsv, f32, "STRSV", true;
    dtrsv, f64, "DTRSV", true;
    ctrsv, Complex32, "CTRSV", true;
    ztrsv, Complex64, "ZTRSV", true;
}

gemm_entry! {
    sgemm, f32, "SGEMM";
    dgemm, f64, "DGEMM";
    cgemm, Complex32, "CGEMM";
    zgemm, Complex64, "ZGEMM";
}

symm_entry! {
    ssymm, f32, "SSYMM", false;
    dsymm, f64, "DSYMM", false;
    csymm, Complex32, "CSYMM", false;
    zsymm, Complex64, "ZSYMM", false;
    chemm, Complex32, "CHEMM", true;
    zhemm, Complex64, "ZHEMM", true;
}

triangular_entry! {
    strmm, f32, "STRMM", false;
    dtrmm, f64, "DTRMM", false;
    ctrmm, Complex32, "CTRMM", false;
    ztrmm, Complex64, "ZTRMM", false;
    strsm, f32, "STRSM", true;
    dtrsm, f64, "DTRSM", true;
    ctrsm, Complex32, "CTRSM", true;
    ztrsm, Complex64, "ZTRSM", true;
}

syrk_entry! {
    ssyrk, f32, f32, "SSYRK", false, identity::<f32>;
    dsyrk, f64, f64, "DSYRK", false, identity::<f64>;
    csyrk, Complex32, Complex32, "CSYRK", false, identity::<Complex32>;
    zsyrk, Complex64, Complex64, "ZSYRK", false, identity::<Complex64>;
    cherk, Complex32, f32, "CHERK", true, Complex32::from_real;
    zherk, Complex64, f64, "ZHERK", true, Complex64::from_real;
}

syr2k_entry! {
    ssyr2k, f32, f32, "SSYR2K", false, identity::<f32>;
    dsyr2k, f64, f64, "DSYR2K", false, identity::<f64>;
    csyr2k, Complex32, Complex32, "CSYR2K", false, identity::<Complex32>;
    zsyr2k, Complex64, Complex64, "ZSYR2K", false, identity::<Complex64>;
    cher2k, Complex32, f32, "CHER2K", true, Complex32::from_real;
    zher2k, Complex64, f64, "ZHER2K", true, Complex64::from_real;
}

/// Every entry point of this provider.
pub fn provider() -> FortranBlas {
    FortranBlas {
        sgemv: Some(sgemv as GemvFn<f32>),
        dgemv: Some(dgemv as GemvFn<f64>),
        cgemv: Some(cgemv as GemvFn<Complex32>),
        zgemv: Some(zgemv as GemvFn<Complex64>),

        sger: Some(sger as GerFn<f32>),
        dger: Some(dger as GerFn<f64>),
        cgeru: Some(cgeru as GerFn<Complex32>),
        zgeru: Some(zgeru as GerFn<Complex64>),
        cgerc: Some(cgerc as GerFn<Complex32>),
        zgerc: Some(zgerc as GerFn<Complex64>),

        ssymv: Some(ssymv as SymvFn<f32>),
        dsymv: Some(dsymv as SymvFn<f64>),
        chemv: Some(chemv as SymvFn<Complex32>),
        zhemv: Some(zhemv as SymvFn<Complex64>),

        ssyr: Some(ssyr as SyrFn<f32, f32>),
        dsyr: Some(dsyr as SyrFn<f64, f64>),
        cher: Some(cher as SyrFn<Complex32, f32>),
        zher: Some(zher as SyrFn<Complex64, f64>),

        strmv: Some(strmv as TrmvFn<f32>),
        dtrmv: Some(dtrmv as TrmvFn<f64>),
        ctrmv: Some(ctrmv as TrmvFn<Complex32>),
        ztrmv: Some(ztrmv as TrmvFn<Complex64>),

        strsv: Some(strsv as TrmvFn<f32>),
        dtrsv: Some(dtrsv as TrmvFn<f64>),
        ctrsv: Some(ctrsv as TrmvFn<Complex32>),
        ztrsv: Some(ztrsv as TrmvFn<Complex64>),

        sgemm: Some(sgemm as GemmFn<f32>),
        dgemm: Some(dgemm as GemmFn<f64>),
        cgemm: Some(cgemm as GemmFn<Complex32>),
        zgemm: Some(zgemm as GemmFn<Complex64>),

        ssymm: Some(ssymm as SymmFn<f32>),
        dsymm: Some(dsymm as SymmFn<f64>),
        csymm: Some(csymm as SymmFn<Complex32>),
        zsymm: Some(zsymm as SymmFn<Complex64>),
        chemm: Some(chemm as SymmFn<Complex32>),
        zhemm: Some(zhemm as SymmFn<Complex64>),

        ssyrk: Some(ssyrk as SyrkFn<f32, f32>),
        dsyrk: Some(dsyrk as SyrkFn<f64, f64>),
        csyrk: Some(csyrk as SyrkFn<Complex32, Complex32>),
        zsyrk: Some(zsyrk as SyrkFn<Complex64, Complex64>),
        cherk: Some(cherk as SyrkFn<Complex32, f32>),
        zherk: Some(zherk as SyrkFn<Complex64, f64>),

        ssyr2k: Some(ssyr2k as Syr2kFn<f32, f32>),
        dsyr2k: Some(dsyr2k as Syr2kFn<f64, f64>),
        csyr2k: Some(csyr2k as Syr2kFn<Complex32, Complex32>),
        zsyr2k: Some(zsyr2k as Syr2kFn<Complex64, Complex64>),
        cher2k: Some(cher2k as Syr2kFn<Complex32, f32>),
        zher2k: Some(zher2k as Syr2kFn<Complex64, f64>),

        strmm: Some(strmm as TrmmFn<f32>),
        dtrmm: Some(dtrmm as TrmmFn<f64>),
        ctrmm: Some(ctrmm as TrmmFn<Complex32>),
        ztrmm: Some(ztrmm as TrmmFn<Complex64>),

        strsm: Some(strsm as TrmmFn<f32>),
        dtrsm: Some(dtrsm as TrmmFn<f64>),
        ctrsm: Some(ctrsm as TrmmFn<Complex32>),
        ztrsm: Some(ztrsm as TrmmFn<Complex64>),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fortramp_core::error::{reset_error_handler, set_error_handler};
    use std::sync::{Arc, Mutex};

    fn ch(c: u8) -> c_char {
        c as c_char
    }

    #[test]
    fn test_provider_is_complete() {
        assert_eq!(provider().len(), FortranBlas::ENTRIES.len());
    }

    #[test]
    fn test_dgemm_lowercase_flags() {
        // [[1,2],[3,4]] * [[5,6],[7,8]] in column-major storage
        let a = [1.0f64, 3.0, 2.0, 4.0];
        let b = [5.0f64, 7.0, 6.0, 8.0];
        let mut c = [0.0f64; 4];
        let (two, one, zero): (blasint, f64, f64) = (2, 1.0, 0.0);
        unsafe {
            dgemm(
                &ch(b'n'), &ch(b'n'), &two, &two, &two, &one, a.as_ptr(), &two,
                b.as_ptr(), &two, &zero, c.as_mut_ptr(), &two,
            );
        }
        assert_eq!(c, [19.0, 43.0, 22.0, 50.0]);
    }

    #[test]
    fn test_dgemv_negative_increment() {
        // y = A^T x with A = [[1,2],[3,4]], x stored backwards
        let a = [1.0f64, 3.0, 2.0, 4.0];
        let x = [1.0f64, 0.0, 10.0];
        let mut y = [0.0f64, -1.0, 0.0];
        let (two, neg_two, inc_y): (blasint, blasint, blasint) = (2, -2, 2);
        let (one, zero) = (1.0f64, 0.0f64);
        unsafe {
            dgemv(
                &ch(b't'), &two, &two, &one, a.as_ptr(), &two, x.as_ptr(), &neg_two,
                &zero, y.as_mut_ptr(), &inc_y,
            );
        }
        // x = [10, 1]; A^T x = [10 + 3, 20 + 4]
        assert_eq!(y, [13.0, -1.0, 24.0]);
    }

    #[test]
    fn test_zher_real_alpha() {
        let x = [Complex64::new(0.0, 1.0), Complex64::new(1.0, 0.0)];
        let mut a = [Complex64::new(0.0, 0.0); 4];
        let (n, inc): (blasint, blasint) = (2, 1);
        let alpha = 2.0f64;
        unsafe {
            zher(&ch(b'L'), &n, &alpha, x.as_ptr(), &inc, a.as_mut_ptr(), &n);
        }
        // 2 * x x^H, lower triangle: [2, 2*(1 * conj(i)) ; _, 2]
        assert_eq!(a[0], Complex64::new(2.0, 0.0));
        assert_eq!(a[1], Complex64::new(0.0, -2.0));
        assert_eq!(a[2], Complex64::new(0.0, 0.0));
        assert_eq!(a[3], Complex64::new(2.0, 0.0));
    }

    #[test]
    fn test_zherk_real_scalars() {
        // A = [i, 1] as a 1x2 row; A*A^H = |i|^2 + |1|^2 = 2
        let a = [Complex64::new(0.0, 1.0), Complex64::new(1.0, 0.0)];
        let mut c = [Complex64::new(0.0, 0.0)];
        let (n, k, lda): (blasint, blasint, blasint) = (1, 2, 1);
        let (alpha, beta) = (3.0f64, 0.0f64);
        unsafe {
            zherk(
                &ch(b'U'), &ch(b'N'), &n, &k, &alpha, a.as_ptr(), &lda, &beta,
                c.as_mut_ptr(), &n,
            );
        }
        assert_eq!(c[0], Complex64::new(6.0, 0.0));
    }

    // The only test in this crate that installs a process-wide handler.
    #[test]
    fn test_illegal_arguments_report_fortran_position() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        set_error_handler(move |e| {
            sink.lock()
                .unwrap()
                .push((e.routine().to_string(), e.position()))
        });

        let one: blasint = 1;
        let bad_ld: blasint = 0;
        let alpha = 1.0f64;
        let a = [2.0f64];
        let mut b = [7.0f64];
        let mut c = [Complex32::new(9.0, 9.0)];
        let calpha = Complex32::new(1.0, 0.0);
        let zero_inc: blasint = 0;
        let x = [3.0f64];
        unsafe {
            // LDA below max(1, M)
            dtrsm(
                &ch(b'L'), &ch(b'U'), &ch(b'N'), &ch(b'N'), &one, &one, &alpha,
                a.as_ptr(), &bad_ld, b.as_mut_ptr(), &one,
            );
            // complex SYRK does not take 'C'
            csyrk(
                &ch(b'U'), &ch(b'C'), &one, &one, &calpha, c.as_ptr(), &one, &calpha,
                c.as_mut_ptr(), &one,
            );
            // INCX must not be zero
            dtrmv(
                &ch(b'U'), &ch(b'N'), &ch(b'N'), &one, a.as_ptr(), &one, b.as_mut_ptr(),
                &zero_inc,
            );
            // INCY is checked before LDA
            dger(
                &one, &one, &alpha, x.as_ptr(), &one, x.as_ptr(), &zero_inc, b.as_mut_ptr(),
                &bad_ld,
            );
        }
        reset_error_handler();

        assert_eq!(
            seen.lock().unwrap().as_slice(),
            &[
                ("DTRSM".to_string(), 9),
                ("CSYRK".to_string(), 2),
                ("DTRMV".to_string(), 8),
                ("DGER".to_string(), 7),
            ]
        );
        assert_eq!(b, [7.0]);
        assert_eq!(c, [Complex32::new(9.0, 9.0)]);
    }
}
