//! Test fixtures: logical matrices, strided storage in either layout, and
//! closed-form expectations for every Level-2 and Level-3 operation.
//!
//! A [`Mat`] is a plain `rows x cols` matrix with no storage order. It is
//! written into a flat buffer with [`Mat::store`] (any layout, any leading
//! dimension, padding filled with a canary) and read back with [`Mat::load`].
//! Vectors are plain `Vec`s, spread over a strided buffer with [`strided`]
//! and read back with [`unstrided`].

use fortramp_core::{Complex32, Complex64, Diag, Element, Layout, Side, Transpose, Uplo};
use num_traits::{One, Zero};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Element types the fixtures can generate.
pub trait Sample: Element {
    /// Uniform in [-1, 1) (both parts for complex).
    fn sample(rng: &mut StdRng) -> Self;

    /// Fill value for padding that must never be written.
    fn canary() -> Self;

    /// Absolute tolerance for results of small products.
    fn tolerance() -> f64;
}

impl Sample for f32 {
    fn sample(rng: &mut StdRng) -> Self {
        rng.gen_range(-1.0f32..1.0)
    }
    fn canary() -> Self {
        -777.25
    }
    fn tolerance() -> f64 {
        1e-4
    }
}

impl Sample for f64 {
    fn sample(rng: &mut StdRng) -> Self {
        rng.gen_range(-1.0f64..1.0)
    }
    fn canary() -> Self {
        -777.25
    }
    fn tolerance() -> f64 {
        1e-10
    }
}

impl Sample for Complex32 {
    fn sample(rng: &mut StdRng) -> Self {
        Complex32::new(rng.gen_range(-1.0f32..1.0), rng.gen_range(-1.0f32..1.0))
    }
    fn canary() -> Self {
        Complex32::new(-777.25, 313.5)
    }
    fn tolerance() -> f64 {
        1e-4
    }
}

impl Sample for Complex64 {
    fn sample(rng: &mut StdRng) -> Self {
        Complex64::new(rng.gen_range(-1.0f64..1.0), rng.gen_range(-1.0f64..1.0))
    }
    fn canary() -> Self {
        Complex64::new(-777.25, 313.5)
    }
    fn tolerance() -> f64 {
        1e-10
    }
}

/// Deterministic generator for fixtures.
pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

#[derive(Clone, Debug, PartialEq)]
pub struct Mat<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T: Sample> Mat<T> {
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                data.push(f(i, j));
            }
        }
        Mat { rows, cols, data }
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::from_fn(rows, cols, |_, _| T::zero())
    }

    pub fn identity(n: usize) -> Self {
        Self::from_fn(n, n, |i, j| if i == j { T::one() } else { T::zero() })
    }

    pub fn random(rows: usize, cols: usize, rng: &mut StdRng) -> Self {
        Self::from_fn(rows, cols, |_, _| T::sample(rng))
    }

    /// Build from row-by-row values.
    pub fn from_rows(rows: usize, cols: usize, values: &[T]) -> Self {
        assert_eq!(values.len(), rows * cols, "value count does not match shape");
        Mat {
            rows,
            cols,
            data: values.to_vec(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, i: usize, j: usize) -> T {
        self.data[i * self.cols + j]
    }

    pub fn set(&mut self, i: usize, j: usize, value: T) {
        self.data[i * self.cols + j] = value;
    }

    pub fn transpose(&self) -> Self {
        Self::from_fn(self.cols, self.rows, |i, j| self.get(j, i))
    }

    pub fn adjoint(&self) -> Self {
        Self::from_fn(self.cols, self.rows, |i, j| self.get(j, i).conj())
    }

    pub fn op(&self, trans: Transpose) -> Self {
        match trans {
            Transpose::NoTrans => self.clone(),
            Transpose::Trans => self.transpose(),
            Transpose::ConjTrans => self.adjoint(),
        }
    }

    pub fn matmul(&self, other: &Self) -> Self {
        assert_eq!(self.cols, other.rows, "inner dimensions differ");
        Self::from_fn(self.rows, other.cols, |i, j| {
            (0..self.cols).fold(T::zero(), |acc, p| acc + self.get(i, p) * other.get(p, j))
        })
    }

    pub fn scale(&self, s: T) -> Self {
        Self::from_fn(self.rows, self.cols, |i, j| s * self.get(i, j))
    }

    pub fn add(&self, other: &Self) -> Self {
        assert_eq!((self.rows, self.cols), (other.rows, other.cols));
        Self::from_fn(self.rows, self.cols, |i, j| self.get(i, j) + other.get(i, j))
    }

    /// The symmetric matrix whose `uplo` triangle matches `self`.
    pub fn symmetric_from(&self, uplo: Uplo) -> Self {
        Self::from_fn(self.rows, self.cols, |i, j| {
            if in_triangle(uplo, i, j) {
                self.get(i, j)
            } else {
                self.get(j, i)
            }
        })
    }

    /// The Hermitian matrix whose strict `uplo` triangle matches `self`;
    /// the diagonal keeps only its real part.
    pub fn hermitian_from(&self, uplo: Uplo) -> Self {
        Self::from_fn(self.rows, self.cols, |i, j| {
            if i == j {
                T::from_real(self.get(i, i).re())
            } else if in_triangle(uplo, i, j) {
                self.get(i, j)
            } else {
                self.get(j, i).conj()
            }
        })
    }

    /// The triangular matrix `self` describes under `uplo` and `diag`.
    pub fn triangular_from(&self, uplo: Uplo, diag: Diag) -> Self {
        Self::from_fn(self.rows, self.cols, |i, j| {
            if i == j && diag == Diag::Unit {
                T::one()
            } else if in_triangle(uplo, i, j) {
                self.get(i, j)
            } else {
                T::zero()
            }
        })
    }

    /// Add `shift` to the diagonal, to keep triangular solves well conditioned.
    pub fn with_diagonal_shift(&self, shift: T) -> Self {
        Self::from_fn(self.rows, self.cols, |i, j| {
            if i == j {
                self.get(i, j) + shift
            } else {
                self.get(i, j)
            }
        })
    }

    /// Force a real diagonal, as Hermitian inputs require.
    pub fn with_real_diagonal(&self) -> Self {
        Self::from_fn(self.rows, self.cols, |i, j| {
            if i == j {
                T::from_real(self.get(i, j).re())
            } else {
                self.get(i, j)
            }
        })
    }

    /// Flat storage in `layout` with leading dimension `ld`; padding holds
    /// [`Sample::canary`].
    pub fn store(&self, layout: Layout, ld: usize) -> Vec<T> {
        let (outer, inner) = match layout {
            Layout::RowMajor => (self.rows, self.cols),
            Layout::ColMajor => (self.cols, self.rows),
        };
        assert!(ld >= inner.max(1), "leading dimension {ld} too small");
        let mut flat = vec![T::canary(); ld * outer.max(1)];
        for i in 0..self.rows {
            for j in 0..self.cols {
                flat[layout.index(i, j, ld)] = self.get(i, j);
            }
        }
        flat
    }

    pub fn load(layout: Layout, rows: usize, cols: usize, ld: usize, flat: &[T]) -> Self {
        Self::from_fn(rows, cols, |i, j| flat[layout.index(i, j, ld)])
    }

    /// Largest elementwise modulus of `self - other`.
    pub fn max_abs_diff(&self, other: &Self) -> f64 {
        assert_eq!((self.rows, self.cols), (other.rows, other.cols));
        self.data
            .iter()
            .zip(&other.data)
            .map(|(&x, &y)| (x - y).magnitude())
            .fold(0.0, f64::max)
    }

    /// Like [`Mat::max_abs_diff`] over the `uplo` triangle only.
    pub fn max_abs_diff_triangle(&self, other: &Self, uplo: Uplo) -> f64 {
        let mut worst = 0.0f64;
        for i in 0..self.rows {
            for j in 0..self.cols {
                if in_triangle(uplo, i, j) {
                    worst = worst.max((self.get(i, j) - other.get(i, j)).magnitude());
                }
            }
        }
        worst
    }
}

fn in_triangle(uplo: Uplo, i: usize, j: usize) -> bool {
    match uplo {
        Uplo::Upper => i <= j,
        Uplo::Lower => i >= j,
    }
}

/// True when every slot of `flat` outside the stored `rows x cols` window
/// still holds the canary.
pub fn padding_intact<T: Sample>(
    layout: Layout,
    rows: usize,
    cols: usize,
    ld: usize,
    flat: &[T],
) -> bool {
    let mut inside = vec![false; flat.len()];
    for i in 0..rows {
        for j in 0..cols {
            inside[layout.index(i, j, ld)] = true;
        }
    }
    flat.iter()
        .zip(&inside)
        .all(|(&v, &stored)| stored || v == T::canary())
}

/// Storage span of `n` elements at increment `inc`.
pub fn span(n: usize, inc: isize) -> usize {
    if n == 0 {
        0
    } else {
        1 + (n - 1) * inc.unsigned_abs()
    }
}

fn vector_slot(i: usize, n: usize, inc: isize) -> usize {
    let step = inc.unsigned_abs();
    if inc > 0 {
        i * step
    } else {
        (n - 1 - i) * step
    }
}

/// `values` laid out at increment `inc`; the gaps hold [`Sample::canary`].
/// A negative increment stores the first element last.
pub fn strided<T: Sample>(values: &[T], inc: isize) -> Vec<T> {
    assert_ne!(inc, 0, "zero increment");
    let n = values.len();
    let mut flat = vec![T::canary(); span(n, inc)];
    for (i, &v) in values.iter().enumerate() {
        flat[vector_slot(i, n, inc)] = v;
    }
    flat
}

pub fn unstrided<T: Sample>(flat: &[T], n: usize, inc: isize) -> Vec<T> {
    (0..n).map(|i| flat[vector_slot(i, n, inc)]).collect()
}

/// True when every slot of `flat` between the `n` strided elements still
/// holds the canary.
pub fn gaps_intact<T: Sample>(flat: &[T], n: usize, inc: isize) -> bool {
    let mut inside = vec![false; flat.len()];
    for i in 0..n {
        inside[vector_slot(i, n, inc)] = true;
    }
    flat.iter()
        .zip(&inside)
        .all(|(&v, &stored)| stored || v == T::canary())
}

/// Largest elementwise modulus of `x - y`.
pub fn max_abs_diff_vec<T: Sample>(x: &[T], y: &[T]) -> f64 {
    assert_eq!(x.len(), y.len());
    x.iter()
        .zip(y)
        .map(|(&a, &b)| (a - b).magnitude())
        .fold(0.0, f64::max)
}

pub fn random_vec<T: Sample>(n: usize, rng: &mut StdRng) -> Vec<T> {
    (0..n).map(|_| T::sample(rng)).collect()
}

/// Closed-form results, in logical (storage-free) terms.
pub mod oracle {
    use super::*;

    /// alpha * op(A) * op(B) + beta * C
    pub fn gemm<T: Sample>(
        trans_a: Transpose,
        trans_b: Transpose,
        alpha: T,
        a: &Mat<T>,
        b: &Mat<T>,
        beta: T,
        c: &Mat<T>,
    ) -> Mat<T> {
        a.op(trans_a)
            .matmul(&b.op(trans_b))
            .scale(alpha)
            .add(&c.scale(beta))
    }

    /// alpha * S * B + beta * C (Left) or alpha * B * S + beta * C (Right),
    /// with S the symmetric or Hermitian completion of `a`'s `uplo` triangle.
    pub fn symm<T: Sample>(
        side: Side,
        uplo: Uplo,
        hermitian: bool,
        alpha: T,
        a: &Mat<T>,
        b: &Mat<T>,
        beta: T,
        c: &Mat<T>,
    ) -> Mat<T> {
        let s = if hermitian {
            a.hermitian_from(uplo)
        } else {
            a.symmetric_from(uplo)
        };
        let product = match side {
            Side::Left => s.matmul(b),
            Side::Right => b.matmul(&s),
        };
        product.scale(alpha).add(&c.scale(beta))
    }

    /// The NoTrans-shaped factor of a rank-k update.
    fn factor<T: Sample>(a: &Mat<T>, trans: Transpose, hermitian: bool) -> Mat<T> {
        match (trans, hermitian) {
            (Transpose::NoTrans, _) => a.clone(),
            (_, true) => a.adjoint(),
            (_, false) => a.transpose(),
        }
    }

    fn partner<T: Sample>(x: &Mat<T>, hermitian: bool) -> Mat<T> {
        if hermitian {
            x.adjoint()
        } else {
            x.transpose()
        }
    }

    /// SYRK: alpha * X * X^T + beta * C; HERK: alpha * X * X^H + beta * C,
    /// with X = A for NoTrans and A^T (A^H) otherwise. Compare on `uplo` only.
    pub fn syrk<T: Sample>(
        trans: Transpose,
        hermitian: bool,
        alpha: T,
        a: &Mat<T>,
        beta: T,
        c: &Mat<T>,
    ) -> Mat<T> {
        let x = factor(a, trans, hermitian);
        x.matmul(&partner(&x, hermitian)).scale(alpha).add(&c.scale(beta))
    }

    /// SYR2K: alpha * X * Y^T + alpha * Y * X^T + beta * C; HER2K uses
    /// Hermitian partners and conj(alpha) on the second term.
    pub fn syr2k<T: Sample>(
        trans: Transpose,
        hermitian: bool,
        alpha: T,
        a: &Mat<T>,
        b: &Mat<T>,
        beta: T,
        c: &Mat<T>,
    ) -> Mat<T> {
        let x = factor(a, trans, hermitian);
        let y = factor(b, trans, hermitian);
        let alpha2 = if hermitian { alpha.conj() } else { alpha };
        let first = x.matmul(&partner(&y, hermitian)).scale(alpha);
        let second = y.matmul(&partner(&x, hermitian)).scale(alpha2);
        first.add(&second).add(&c.scale(beta))
    }

    /// alpha * op(T) * B (Left) or alpha * B * op(T) (Right).
    pub fn trmm<T: Sample>(
        side: Side,
        uplo: Uplo,
        trans: Transpose,
        diag: Diag,
        alpha: T,
        a: &Mat<T>,
        b: &Mat<T>,
    ) -> Mat<T> {
        let t = a.triangular_from(uplo, diag).op(trans);
        let product = match side {
            Side::Left => t.matmul(b),
            Side::Right => b.matmul(&t),
        };
        product.scale(alpha)
    }

    /// op(T) * X (Left) or X * op(T) (Right); a TRSM result satisfies
    /// `trsm_residual(.., x) == alpha * B`.
    pub fn trsm_residual<T: Sample>(
        side: Side,
        uplo: Uplo,
        trans: Transpose,
        diag: Diag,
        a: &Mat<T>,
        x: &Mat<T>,
    ) -> Mat<T> {
        trmm(side, uplo, trans, diag, T::one(), a, x)
    }

    fn column<T: Sample>(values: &[T]) -> Mat<T> {
        Mat::from_fn(values.len(), 1, |i, _| values[i])
    }

    fn entries<T: Sample>(m: &Mat<T>) -> Vec<T> {
        (0..m.rows()).map(|i| m.get(i, 0)).collect()
    }

    /// alpha * op(A) * x + beta * y
    pub fn gemv<T: Sample>(
        trans: Transpose,
        alpha: T,
        a: &Mat<T>,
        x: &[T],
        beta: T,
        y: &[T],
    ) -> Vec<T> {
        let c = column(y);
        entries(&gemm(trans, Transpose::NoTrans, alpha, a, &column(x), beta, &c))
    }

    /// alpha * x * y^T + A, or alpha * x * y^H + A with `conjugate_y`.
    pub fn ger<T: Sample>(conjugate_y: bool, alpha: T, x: &[T], y: &[T], a: &Mat<T>) -> Mat<T> {
        let yt = if conjugate_y {
            column(y).adjoint()
        } else {
            column(y).transpose()
        };
        column(x).matmul(&yt).scale(alpha).add(a)
    }

    /// alpha * S * x + beta * y with S completed from `a`'s `uplo` triangle.
    pub fn symv<T: Sample>(
        uplo: Uplo,
        hermitian: bool,
        alpha: T,
        a: &Mat<T>,
        x: &[T],
        beta: T,
        y: &[T],
    ) -> Vec<T> {
        let c = column(y);
        entries(&symm(Side::Left, uplo, hermitian, alpha, a, &column(x), beta, &c))
    }

    /// alpha * x * x^T + A (x * x^H when `hermitian`). Compare on `uplo` only.
    pub fn syr<T: Sample>(hermitian: bool, alpha: T, x: &[T], a: &Mat<T>) -> Mat<T> {
        ger(hermitian, alpha, x, x, a)
    }

    /// op(T) * x; a TRSV result `z` satisfies `trmv(.., z) == x`.
    pub fn trmv<T: Sample>(
        uplo: Uplo,
        trans: Transpose,
        diag: Diag,
        a: &Mat<T>,
        x: &[T],
    ) -> Vec<T> {
        entries(&trmm(Side::Left, uplo, trans, diag, T::one(), a, &column(x)))
    }
}
