//! Column-major Level-2 and Level-3 kernels.
//!
//! Straight triple loops over `Layout::ColMajor.index`, generic over the
//! element type. They follow the Fortran reference semantics exactly (which
//! triangle is read, real diagonals for Hermitian matrices, `beta == 0`
//! clearing rather than scaling, quick returns) and make no attempt at speed.
//!
//! The matrix-vector kernels gather their strided vectors into a single
//! column and run the matching Level-3 kernel on it.

use std::ops::Range;

use fortramp_core::{Diag, Element, Layout, Side, Transpose, Uplo};
use num_traits::{One, Zero};

#[inline(always)]
fn at(i: usize, j: usize, ld: usize) -> usize {
    Layout::ColMajor.index(i, j, ld)
}

#[inline(always)]
fn conj_if<T: Element>(x: T, conjugate: bool) -> T {
    if conjugate {
        x.conj()
    } else {
        x
    }
}

/// Element (i, j) of op(A).
#[inline(always)]
fn op_at<T: Element>(a: &[T], lda: usize, trans: Transpose, i: usize, j: usize) -> T {
    match trans {
        Transpose::NoTrans => a[at(i, j, lda)],
        Transpose::Trans => a[at(j, i, lda)],
        Transpose::ConjTrans => a[at(j, i, lda)].conj(),
    }
}

/// `beta * c`, with `beta == 0` giving an exact zero.
#[inline(always)]
fn scaled<T: Element>(beta: T, c: T) -> T {
    if beta == T::zero() {
        T::zero()
    } else {
        beta * c
    }
}

/// Rows of column `j` inside the `uplo` triangle of an `n x n` matrix.
#[inline(always)]
fn triangle_rows(uplo: Uplo, j: usize, n: usize) -> Range<usize> {
    let (i_start, i_end) = match uplo {
        Uplo::Upper => (0, j + 1),
        Uplo::Lower => (j, n),
    };
    i_start..i_end
}

// ============================================================================
// GEMM: C := alpha * op(A) * op(B) + beta * C
// ============================================================================

pub fn gemm<T: Element>(
    trans_a: Transpose,
    trans_b: Transpose,
    m: usize,
    n: usize,
    k: usize,
    alpha: T,
    a: &[T],
    lda: usize,
    b: &[T],
    ldb: usize,
    beta: T,
    c: &mut [T],
    ldc: usize,
) {
    if m == 0 || n == 0 || ((alpha == T::zero() || k == 0) && beta == T::one()) {
        return;
    }

    for j in 0..n {
        for i in 0..m {
            let idx = at(i, j, ldc);
            let prior = scaled(beta, c[idx]);
            if alpha == T::zero() {
                c[idx] = prior;
                continue;
            }
            let mut acc = T::zero();
            for p in 0..k {
                acc = acc + op_at(a, lda, trans_a, i, p) * op_at(b, ldb, trans_b, p, j);
            }
            c[idx] = alpha * acc + prior;
        }
    }
}

// ============================================================================
// SYMM / HEMM: C := alpha * A * B + beta * C  or  alpha * B * A + beta * C
// ============================================================================

/// Element (i, j) of the full symmetric (or Hermitian) matrix whose `uplo`
/// triangle is stored in `a`.
#[inline(always)]
fn sym_at<T: Element>(a: &[T], lda: usize, uplo: Uplo, hermitian: bool, i: usize, j: usize) -> T {
    if i == j {
        let d = a[at(i, i, lda)];
        return if hermitian { T::from_real(d.re()) } else { d };
    }
    let stored = match uplo {
        Uplo::Upper => i < j,
        Uplo::Lower => i > j,
    };
    if stored {
        a[at(i, j, lda)]
    } else {
        conj_if(a[at(j, i, lda)], hermitian)
    }
}

pub fn symm<T: Element>(
    side: Side,
    uplo: Uplo,
    hermitian: bool,
    m: usize,
    n: usize,
    alpha: T,
    a: &[T],
    lda: usize,
    b: &[T],
    ldb: usize,
    beta: T,
    c: &mut [T],
    ldc: usize,
) {
    if m == 0 || n == 0 || (alpha == T::zero() && beta == T::one()) {
        return;
    }

    for j in 0..n {
        for i in 0..m {
            let idx = at(i, j, ldc);
            let prior = scaled(beta, c[idx]);
            if alpha == T::zero() {
                c[idx] = prior;
                continue;
            }
            let mut acc = T::zero();
            match side {
                Side::Left => {
                    for p in 0..m {
                        acc = acc + sym_at(a, lda, uplo, hermitian, i, p) * b[at(p, j, ldb)];
                    }
                }
                Side::Right => {
                    for p in 0..n {
                        acc = acc + b[at(i, p, ldb)] * sym_at(a, lda, uplo, hermitian, p, j);
                    }
                }
            }
            c[idx] = alpha * acc + prior;
        }
    }
}

// ============================================================================
// SYRK / HERK / SYR2K / HER2K: rank-k updates of the uplo triangle of C
// ============================================================================

/// `(X * Y^T)(i, j)` for `NoTrans`, `(X^T * Y)(i, j)` otherwise; with
/// `hermitian` the transposed factor is conjugated.
#[inline(always)]
fn rank_dot<T: Element>(
    x: &[T],
    ldx: usize,
    y: &[T],
    ldy: usize,
    trans: Transpose,
    hermitian: bool,
    k: usize,
    i: usize,
    j: usize,
) -> T {
    let mut acc = T::zero();
    for p in 0..k {
        acc = acc
            + match trans {
                Transpose::NoTrans => x[at(i, p, ldx)] * conj_if(y[at(j, p, ldy)], hermitian),
                _ => conj_if(x[at(p, i, ldx)], hermitian) * y[at(p, j, ldy)],
            };
    }
    acc
}

/// Write `value` into the triangle, forcing a real diagonal for Hermitian C.
#[inline(always)]
fn store_triangle<T: Element>(c: &mut [T], idx: usize, value: T, hermitian: bool, diagonal: bool) {
    c[idx] = if hermitian && diagonal {
        T::from_real(value.re())
    } else {
        value
    };
}

pub fn syrk<T: Element>(
    uplo: Uplo,
    trans: Transpose,
    hermitian: bool,
    n: usize,
    k: usize,
    alpha: T,
    a: &[T],
    lda: usize,
    beta: T,
    c: &mut [T],
    ldc: usize,
) {
    if n == 0 || ((alpha == T::zero() || k == 0) && beta == T::one()) {
        return;
    }

    for j in 0..n {
        for i in triangle_rows(uplo, j, n) {
            let idx = at(i, j, ldc);
            let prior = scaled(beta, c[idx]);
            let value = if alpha == T::zero() {
                prior
            } else {
                alpha * rank_dot(a, lda, a, lda, trans, hermitian, k, i, j) + prior
            };
            store_triangle(c, idx, value, hermitian, i == j);
        }
    }
}

pub fn syr2k<T: Element>(
    uplo: Uplo,
    trans: Transpose,
    hermitian: bool,
    n: usize,
    k: usize,
    alpha: T,
    a: &[T],
    lda: usize,
    b: &[T],
    ldb: usize,
    beta: T,
    c: &mut [T],
    ldc: usize,
) {
    if n == 0 || ((alpha == T::zero() || k == 0) && beta == T::one()) {
        return;
    }
    let alpha2 = conj_if(alpha, hermitian);

    for j in 0..n {
        for i in triangle_rows(uplo, j, n) {
            let idx = at(i, j, ldc);
            let prior = scaled(beta, c[idx]);
            let value = if alpha == T::zero() {
                prior
            } else {
                alpha * rank_dot(a, lda, b, ldb, trans, hermitian, k, i, j)
                    + alpha2 * rank_dot(b, ldb, a, lda, trans, hermitian, k, i, j)
                    + prior
            };
            store_triangle(c, idx, value, hermitian, i == j);
        }
    }
}

// ============================================================================
// TRMM / TRSM: B := alpha * op(A) * B, or solve op(A) * X = alpha * B
// (mirrored for Side::Right)
// ============================================================================

/// Dense `k x k` column-major op(A) for a triangular `A`.
fn triangular_op<T: Element>(
    uplo: Uplo,
    trans: Transpose,
    diag: Diag,
    k: usize,
    a: &[T],
    lda: usize,
) -> Vec<T> {
    let mut t = vec![T::zero(); k * k];
    for j in 0..k {
        for i in triangle_rows(uplo, j, k) {
            let v = if i == j && diag == Diag::Unit {
                T::one()
            } else {
                a[at(i, j, lda)]
            };
            match trans {
                Transpose::NoTrans => t[at(i, j, k)] = v,
                Transpose::Trans => t[at(j, i, k)] = v,
                Transpose::ConjTrans => t[at(j, i, k)] = v.conj(),
            }
        }
    }
    t
}

fn clear<T: Element>(b: &mut [T], ldb: usize, m: usize, n: usize) {
    for j in 0..n {
        for i in 0..m {
            b[at(i, j, ldb)] = T::zero();
        }
    }
}

pub fn trmm<T: Element>(
    side: Side,
    uplo: Uplo,
    trans: Transpose,
    diag: Diag,
    m: usize,
    n: usize,
    alpha: T,
    a: &[T],
    lda: usize,
    b: &mut [T],
    ldb: usize,
) {
    if m == 0 || n == 0 {
        return;
    }
    if alpha == T::zero() {
        clear(b, ldb, m, n);
        return;
    }

    let k = match side {
        Side::Left => m,
        Side::Right => n,
    };
    let t = triangular_op(uplo, trans, diag, k, a, lda);

    let mut out = vec![T::zero(); m * n];
    for j in 0..n {
        for i in 0..m {
            let mut acc = T::zero();
            match side {
                Side::Left => {
                    for p in 0..m {
                        acc = acc + t[at(i, p, m)] * b[at(p, j, ldb)];
                    }
                }
                Side::Right => {
                    for p in 0..n {
                        acc = acc + b[at(i, p, ldb)] * t[at(p, j, n)];
                    }
                }
            }
            out[at(i, j, m)] = alpha * acc;
        }
    }
    for j in 0..n {
        for i in 0..m {
            b[at(i, j, ldb)] = out[at(i, j, m)];
        }
    }
}

pub fn trsm<T: Element>(
    side: Side,
    uplo: Uplo,
    trans: Transpose,
    diag: Diag,
    m: usize,
    n: usize,
    alpha: T,
    a: &[T],
    lda: usize,
    b: &mut [T],
    ldb: usize,
) {
    if m == 0 || n == 0 {
        return;
    }
    if alpha == T::zero() {
        clear(b, ldb, m, n);
        return;
    }

    let k = match side {
        Side::Left => m,
        Side::Right => n,
    };
    let t = triangular_op(uplo, trans, diag, k, a, lda);
    // Transposing swaps which triangle op(A) occupies.
    let lower = matches!(
        (uplo, trans),
        (Uplo::Lower, Transpose::NoTrans) | (Uplo::Upper, Transpose::Trans | Transpose::ConjTrans)
    );

    if alpha != T::one() {
        for j in 0..n {
            for i in 0..m {
                let idx = at(i, j, ldb);
                b[idx] = alpha * b[idx];
            }
        }
    }

    match side {
        Side::Left => {
            // op(A) * X = B, one right-hand side column at a time.
            for j in 0..n {
                if lower {
                    for i in 0..m {
                        let mut sum = b[at(i, j, ldb)];
                        for p in 0..i {
                            sum = sum - t[at(i, p, m)] * b[at(p, j, ldb)];
                        }
                        b[at(i, j, ldb)] = sum / t[at(i, i, m)];
                    }
                } else {
                    for i in (0..m).rev() {
                        let mut sum = b[at(i, j, ldb)];
                        for p in (i + 1)..m {
                            sum = sum - t[at(i, p, m)] * b[at(p, j, ldb)];
                        }
                        b[at(i, j, ldb)] = sum / t[at(i, i, m)];
                    }
                }
            }
        }
        Side::Right => {
            // X * op(A) = B, solved column by column of X.
            let solve_column = |b: &mut [T], j: usize, deps: Range<usize>| {
                for i in 0..m {
                    let mut sum = b[at(i, j, ldb)];
                    for p in deps.clone() {
                        sum = sum - b[at(i, p, ldb)] * t[at(p, j, n)];
                    }
                    b[at(i, j, ldb)] = sum / t[at(j, j, n)];
                }
            };
            if lower {
                for j in (0..n).rev() {
                    solve_column(&mut *b, j, (j + 1)..n);
                }
            } else {
                for j in 0..n {
                    solve_column(&mut *b, j, 0..j);
                }
            }
        }
    }
}

// ============================================================================
// Level 2: matrix-vector operations on strided vectors
// ============================================================================

/// Storage slot of logical element `i` of a strided vector of `n` elements.
/// A negative increment walks the storage backwards.
#[inline(always)]
fn slot(i: usize, n: usize, inc: isize) -> usize {
    let step = inc.unsigned_abs();
    if inc > 0 {
        i * step
    } else {
        (n - 1 - i) * step
    }
}

/// Logical elements of the strided vector `x` of `n` elements.
pub fn gather<T: Copy>(x: &[T], n: usize, inc: isize) -> Vec<T> {
    (0..n).map(|i| x[slot(i, n, inc)]).collect()
}

/// Write `values` back into the strided vector `x`.
pub fn scatter<T: Copy>(values: &[T], x: &mut [T], inc: isize) {
    let n = values.len();
    for (i, v) in values.iter().enumerate() {
        x[slot(i, n, inc)] = *v;
    }
}

/// `y := alpha * op(A) * x + beta * y`, `A` is `m x n`.
pub fn gemv<T: Element>(
    trans: Transpose,
    m: usize,
    n: usize,
    alpha: T,
    a: &[T],
    lda: usize,
    x: &[T],
    incx: isize,
    beta: T,
    y: &mut [T],
    incy: isize,
) {
    if m == 0 || n == 0 || (alpha == T::zero() && beta == T::one()) {
        return;
    }
    let (leny, lenx) = match trans {
        Transpose::NoTrans => (m, n),
        Transpose::Trans | Transpose::ConjTrans => (n, m),
    };
    let xs = gather(x, lenx, incx);
    let mut ys = gather(y, leny, incy);
    gemm(trans, Transpose::NoTrans, leny, 1, lenx, alpha, a, lda, &xs, lenx, beta, &mut ys, leny);
    scatter(&ys, y, incy);
}

/// `A := alpha * x * y^T + A`, or `alpha * x * y^H + A` with `conjugate_y`.
pub fn ger<T: Element>(
    conjugate_y: bool,
    m: usize,
    n: usize,
    alpha: T,
    x: &[T],
    incx: isize,
    y: &[T],
    incy: isize,
    a: &mut [T],
    lda: usize,
) {
    if m == 0 || n == 0 || alpha == T::zero() {
        return;
    }
    let xs = gather(x, m, incx);
    let ys = gather(y, n, incy);
    let trans_y = if conjugate_y {
        Transpose::ConjTrans
    } else {
        Transpose::Trans
    };
    gemm(Transpose::NoTrans, trans_y, m, n, 1, alpha, &xs, m, &ys, n, T::one(), a, lda);
}

/// `y := alpha * A * x + beta * y` with `A` symmetric (or Hermitian).
pub fn symv<T: Element>(
    uplo: Uplo,
    hermitian: bool,
    n: usize,
    alpha: T,
    a: &[T],
    lda: usize,
    x: &[T],
    incx: isize,
    beta: T,
    y: &mut [T],
    incy: isize,
) {
    if n == 0 || (alpha == T::zero() && beta == T::one()) {
        return;
    }
    let xs = gather(x, n, incx);
    let mut ys = gather(y, n, incy);
    symm(Side::Left, uplo, hermitian, n, 1, alpha, a, lda, &xs, n, beta, &mut ys, n);
    scatter(&ys, y, incy);
}

/// `A := alpha * x * x^T + A` (or `x * x^H`) on the `uplo` triangle.
pub fn syr<T: Element>(
    uplo: Uplo,
    hermitian: bool,
    n: usize,
    alpha: T,
    x: &[T],
    incx: isize,
    a: &mut [T],
    lda: usize,
) {
    if n == 0 || alpha == T::zero() {
        return;
    }
    let xs = gather(x, n, incx);
    syrk(uplo, Transpose::NoTrans, hermitian, n, 1, alpha, &xs, n, T::one(), a, lda);
}

/// `x := op(A) * x` with `A` triangular.
pub fn trmv<T: Element>(
    uplo: Uplo,
    trans: Transpose,
    diag: Diag,
    n: usize,
    a: &[T],
    lda: usize,
    x: &mut [T],
    incx: isize,
) {
    if n == 0 {
        return;
    }
    let mut xs = gather(x, n, incx);
    trmm(Side::Left, uplo, trans, diag, n, 1, T::one(), a, lda, &mut xs, n);
    scatter(&xs, x, incx);
}

/// Solve `op(A) * z = x` with `A` triangular; `z` overwrites `x`.
pub fn trsv<T: Element>(
    uplo: Uplo,
    trans: Transpose,
    diag: Diag,
    n: usize,
    a: &[T],
    lda: usize,
    x: &mut [T],
    incx: isize,
) {
    if n == 0 {
        return;
    }
    let mut xs = gather(x, n, incx);
    trsm(Side::Left, uplo, trans, diag, n, 1, T::one(), a, lda, &mut xs, n);
    scatter(&xs, x, incx);
}
