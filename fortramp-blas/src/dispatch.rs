//! Dispatcher: one validated, layout-normalised provider call per
//! trampoline call.
//!
//! Every generic entry point below runs the same pipeline:
//!
//! 1. validate (first offending argument wins, see [`crate::validate`]);
//! 2. resolve the provider entry for the precision (missing is an error);
//! 3. skip the provider when the output has no elements;
//! 4. plan the column-major call ([`crate::transpose`]);
//! 5. call the provider exactly once, everything by address.
//!
//! A complex matrix-vector call whose plan conjugates its vectors also
//! conjugates them around step 5: input vectors through a contiguous copy,
//! the output vector in place before and after the call.
//!
//! Failures are handed to the trampoline's [`Reporter`] and then returned.
//! Nothing has been written when an error comes back.

use std::borrow::Cow;
use std::os::raw::c_char;

use fortramp_core::abi::{
    GemmFn, GemvFn, GerFn, Syr2kFn, SymmFn, SymvFn, SyrFn, SyrkFn, TrmmFn, TrmvFn, CBLAS_DIAG,
    CBLAS_LAYOUT, CBLAS_SIDE, CBLAS_TRANSPOSE, CBLAS_UPLO,
};
use fortramp_core::{
    blasint, BlasError, BlasResult, Complex32, Complex64, Element, FortranBlas, Precision, Provider,
    Reporter, Routine,
};

use crate::transpose::{ColMajorPlan, Family};
use crate::validate::{self, routine_name};

/// Per-precision lookup of the provider entries shared by real and complex.
pub trait Dispatch: Element {
    fn gemv_entry(provider: &Provider) -> Option<GemvFn<Self>>;
    fn trmv_entry(provider: &Provider) -> Option<TrmvFn<Self>>;
    fn trsv_entry(provider: &Provider) -> Option<TrmvFn<Self>>;
    fn gemm_entry(provider: &Provider) -> Option<GemmFn<Self>>;
    fn symm_entry(provider: &Provider) -> Option<SymmFn<Self>>;
    fn syrk_entry(provider: &Provider) -> Option<SyrkFn<Self, Self>>;
    fn syr2k_entry(provider: &Provider) -> Option<Syr2kFn<Self, Self>>;
    fn trmm_entry(provider: &Provider) -> Option<TrmmFn<Self>>;
    fn trsm_entry(provider: &Provider) -> Option<TrmmFn<Self>>;
}

/// Entries that exist in real precisions only.
pub trait RealDispatch: Dispatch {
    fn ger_entry(provider: &Provider) -> Option<GerFn<Self>>;
    fn symv_entry(provider: &Provider) -> Option<SymvFn<Self>>;
    fn syr_entry(provider: &Provider) -> Option<SyrFn<Self, Self>>;
}

/// Entries that exist in complex precisions only: the Hermitian routines
/// and the unconjugated/conjugated rank-1 updates.
pub trait HermitianDispatch: Dispatch {
    fn geru_entry(provider: &Provider) -> Option<GerFn<Self>>;
    fn gerc_entry(provider: &Provider) -> Option<GerFn<Self>>;
    fn hemv_entry(provider: &Provider) -> Option<SymvFn<Self>>;
    fn her_entry(provider: &Provider) -> Option<SyrFn<Self, Self::Real>>;
    fn hemm_entry(provider: &Provider) -> Option<SymmFn<Self>>;
    fn herk_entry(provider: &Provider) -> Option<SyrkFn<Self, Self::Real>>;
    fn her2k_entry(provider: &Provider) -> Option<Syr2kFn<Self, Self::Real>>;
}

macro_rules! impl_dispatch {
    (
        $t:ty: $gemv:ident, $trmv:ident, $trsv:ident,
        $gemm:ident, $symm:ident, $syrk:ident, $syr2k:ident, $trmm:ident, $trsm:ident
    ) => {
        impl Dispatch for $t {
            #[inline]
            fn gemv_entry(provider: &Provider) -> Option<GemvFn<Self>> {
                provider.$gemv()
            }
            #[inline]
            fn trmv_entry(provider: &Provider) -> Option<TrmvFn<Self>> {
                provider.$trmv()
            }
            #[inline]
            fn trsv_entry(provider: &Provider) -> Option<TrmvFn<Self>> {
                provider.$trsv()
            }
            #[inline]
            fn gemm_entry(provider: &Provider) -> Option<GemmFn<Self>> {
                provider.$gemm()
            }
            #[inline]
            fn symm_entry(provider: &Provider) -> Option<SymmFn<Self>> {
                provider.$symm()
            }
            #[inline]
            fn syrk_entry(provider: &Provider) -> Option<SyrkFn<Self, Self>> {
                provider.$syrk()
            }
            #[inline]
            fn syr2k_entry(provider: &Provider) -> Option<Syr2kFn<Self, Self>> {
                provider.$syr2k()
            }
            #[inline]
            fn trmm_entry(provider: &Provider) -> Option<TrmmFn<Self>> {
                provider.$trmm()
            }
            #[inline]
            fn trsm_entry(provider: &Provider) -> Option<TrmmFn<Self>> {
                provider.$trsm()
            }
        }
    };
}

macro_rules! impl_real_dispatch {
    ($t:ty: $ger:ident, $symv:ident, $syr:ident) => {
        impl RealDispatch for $t {
            #[inline]
            fn ger_entry(provider: &Provider) -> Option<GerFn<Self>> {
                provider.$ger()
            }
            #[inline]
            fn symv_entry(provider: &Provider) -> Option<SymvFn<Self>> {
                provider.$symv()
            }
            #[inline]
            fn syr_entry(provider: &Provider) -> Option<SyrFn<Self, Self>> {
                provider.$syr()
            }
        }
    };
}

macro_rules! impl_hermitian_dispatch {
    (
        $t:ty: $geru:ident, $gerc:ident, $hemv:ident, $her:ident,
        $hemm:ident, $herk:ident, $her2k:ident
    ) => {
        impl HermitianDispatch for $t {
            #[inline]
            fn geru_entry(provider: &Provider) -> Option<GerFn<Self>> {
                provider.$geru()
            }
            #[inline]
            fn gerc_entry(provider: &Provider) -> Option<GerFn<Self>> {
                provider.$gerc()
            }
            #[inline]
            fn hemv_entry(provider: &Provider) -> Option<SymvFn<Self>> {
                provider.$hemv()
            }
            #[inline]
            fn her_entry(provider: &Provider) -> Option<SyrFn<Self, Self::Real>> {
                provider.$her()
            }
            #[inline]
            fn hemm_entry(provider: &Provider) -> Option<SymmFn<Self>> {
                provider.$hemm()
            }
            #[inline]
            fn herk_entry(provider: &Provider) -> Option<SyrkFn<Self, Self::Real>> {
                provider.$herk()
            }
            #[inline]
            fn her2k_entry(provider: &Provider) -> Option<Syr2kFn<Self, Self::Real>> {
                provider.$her2k()
            }
        }
    };
}

impl_dispatch!(f32: sgemv, strmv, strsv, sgemm, ssymm, ssyrk, ssyr2k, strmm, strsm);
impl_dispatch!(f64: dgemv, dtrmv, dtrsv, dgemm, dsymm, dsyrk, dsyr2k, dtrmm, dtrsm);
impl_dispatch!(Complex32: cgemv, ctrmv, ctrsv, cgemm, csymm, csyrk, csyr2k, ctrmm, ctrsm);
impl_dispatch!(Complex64: zgemv, ztrmv, ztrsv, zgemm, zsymm, zsyrk, zsyr2k, ztrmm, ztrsm);
impl_real_dispatch!(f32: sger, ssymv, ssyr);
impl_real_dispatch!(f64: dger, dsymv, dsyr);
impl_hermitian_dispatch!(Complex32: cgeru, cgerc, chemv, cher, chemm, cherk, cher2k);
impl_hermitian_dispatch!(Complex64: zgeru, zgerc, zhemv, zher, zhemm, zherk, zher2k);

/// The dispatch context: where entry points come from and where errors go.
#[derive(Clone, Debug, Default)]
pub struct Trampoline {
    provider: Provider,
    reporter: Reporter,
}

#[inline(always)]
fn flag(c: u8) -> c_char {
    c as c_char
}

fn require<F>(entry: Option<F>, routine: Routine, precision: Precision) -> BlasResult<F> {
    entry.ok_or_else(|| BlasError::Unregistered {
        routine: Cow::Borrowed(routine_name(routine, precision)),
        entry: routine.fortran_name(precision).unwrap_or("?"),
    })
}

/// Conjugate alpha into `slot` when the plan asks for it.
#[inline]
unsafe fn planned_alpha<S: Element>(
    plan: &ColMajorPlan,
    alpha: *const S,
    slot: &mut S,
) -> *const S {
    if plan.conjugate_alpha {
        *slot = (*alpha).conj();
        slot as *const S
    } else {
        alpha
    }
}

/// Whether the vectors of a planned call must be conjugated. Conjugating
/// real data is the identity, so real calls never pay for it.
#[inline]
fn conjugates_vectors<T: Element>(plan: &ColMajorPlan) -> bool {
    plan.conjugate_vectors && T::PRECISION.is_complex()
}

/// Storage slot of logical element `i` of a strided vector of `len`
/// elements. A negative increment walks the storage backwards.
#[inline]
fn slot(i: usize, len: usize, inc: blasint) -> usize {
    let step = inc.unsigned_abs() as usize;
    if inc > 0 {
        i * step
    } else {
        (len - 1 - i) * step
    }
}

/// Contiguous conjugated copy of a strided vector, in logical order; pass it
/// on with increment 1.
unsafe fn conjugated<T: Element>(x: *const T, len: blasint, inc: blasint) -> Vec<T> {
    let len = len as usize;
    (0..len).map(|i| (*x.add(slot(i, len, inc))).conj()).collect()
}

/// Conjugate every element of a strided vector where it lies.
unsafe fn conjugate_in_place<T: Element>(x: *mut T, len: blasint, inc: blasint) {
    let step = inc.unsigned_abs() as usize;
    for i in 0..len as usize {
        let p = x.add(i * step);
        *p = (*p).conj();
    }
}

const UNIT_STRIDE: blasint = 1;

impl Trampoline {
    /// Global registry and process-wide handler.
    pub const fn global() -> Self {
        Trampoline {
            provider: Provider::Global,
            reporter: Reporter::Global,
        }
    }

    /// A private provider table; errors still go to the process-wide handler.
    pub fn new(table: FortranBlas) -> Self {
        Trampoline {
            provider: Provider::Table(table),
            reporter: Reporter::Global,
        }
    }

    pub fn with_provider(mut self, provider: Provider) -> Self {
        self.provider = provider;
        self
    }

    pub fn with_reporter(mut self, reporter: Reporter) -> Self {
        self.reporter = reporter;
        self
    }

    /// Send this trampoline's errors to `handler` instead of the process-wide one.
    pub fn with_handler<F>(self, handler: F) -> Self
    where
        F: Fn(&BlasError) + Send + Sync + 'static,
    {
        self.with_reporter(Reporter::custom(handler))
    }

    pub fn provider(&self) -> &Provider {
        &self.provider
    }

    pub fn reporter(&self) -> &Reporter {
        &self.reporter
    }

    fn finish(&self, result: BlasResult<()>) -> BlasResult<()> {
        if let Err(err) = &result {
            log::debug!("{}: rejected at parameter {}", err.routine(), err.position());
            self.reporter.report(err);
        }
        result
    }

    // ── gemm ────────────────────────────────────────────────────────

    /// `C := alpha * op(A) * op(B) + beta * C`.
    ///
    /// # Safety
    ///
    /// Matrix pointers must cover the extents their dimensions and leading
    /// dimensions describe; scalars must be readable or null.
    pub unsafe fn gemm<T: Dispatch>(
        &self,
        layout: CBLAS_LAYOUT,
        trans_a: CBLAS_TRANSPOSE,
        trans_b: CBLAS_TRANSPOSE,
        m: blasint,
        n: blasint,
        k: blasint,
        alpha: *const T,
        a: *const T,
        lda: blasint,
        b: *const T,
        ldb: blasint,
        beta: *const T,
        c: *mut T,
        ldc: blasint,
    ) -> BlasResult<()> {
        self.finish(self.gemm_inner(
            layout, trans_a, trans_b, m, n, k, alpha, a, lda, b, ldb, beta, c, ldc,
        ))
    }

    unsafe fn gemm_inner<T: Dispatch>(
        &self,
        layout: CBLAS_LAYOUT,
        trans_a: CBLAS_TRANSPOSE,
        trans_b: CBLAS_TRANSPOSE,
        m: blasint,
        n: blasint,
        k: blasint,
        alpha: *const T,
        a: *const T,
        lda: blasint,
        b: *const T,
        ldb: blasint,
        beta: *const T,
        c: *mut T,
        ldc: blasint,
    ) -> BlasResult<()> {
        let call = validate::gemm(
            T::PRECISION,
            layout,
            trans_a,
            trans_b,
            m,
            n,
            k,
            alpha,
            lda,
            ldb,
            beta,
            ldc,
        )?;
        let entry = require(T::gemm_entry(&self.provider), Routine::Gemm, T::PRECISION)?;
        let routine = routine_name(Routine::Gemm, T::PRECISION);
        if call.is_empty() {
            log::trace!("{routine}: empty output, provider skipped");
            return Ok(());
        }

        let plan = Family::General.plan(call.layout, call.op());
        log::trace!("{routine}: {:?} {:?} -> {:?}", call.layout, call.op(), plan);
        let (m, n, a, lda, b, ldb) = if plan.swap_operands {
            (n, m, b, ldb, a, lda)
        } else {
            (m, n, a, lda, b, ldb)
        };
        let ta = flag(plan.op.trans_a.fortran_char());
        let tb = flag(plan.op.trans_b.fortran_char());

        entry(&ta, &tb, &m, &n, &k, alpha, a, &lda, b, &ldb, beta, c, &ldc);
        Ok(())
    }

    // ── symm / hemm ─────────────────────────────────────────────────

    /// `C := alpha * A * B + beta * C` (Left) or `alpha * B * A + beta * C`
    /// (Right) with `A` symmetric.
    ///
    /// # Safety
    ///
    /// See [`Trampoline::gemm`].
    pub unsafe fn symm<T: Dispatch>(
        &self,
        layout: CBLAS_LAYOUT,
        side: CBLAS_SIDE,
        uplo: CBLAS_UPLO,
        m: blasint,
        n: blasint,
        alpha: *const T,
        a: *const T,
        lda: blasint,
        b: *const T,
        ldb: blasint,
        beta: *const T,
        c: *mut T,
        ldc: blasint,
    ) -> BlasResult<()> {
        let entry = T::symm_entry(&self.provider);
        self.finish(self.symm_inner(
            Routine::Symm, entry, layout, side, uplo, m, n, alpha, a, lda, b, ldb, beta, c, ldc,
        ))
    }

    /// [`Trampoline::symm`] with `A` Hermitian; its diagonal is taken as real.
    ///
    /// # Safety
    ///
    /// See [`Trampoline::gemm`].
    pub unsafe fn hemm<T: HermitianDispatch>(
        &self,
        layout: CBLAS_LAYOUT,
        side: CBLAS_SIDE,
        uplo: CBLAS_UPLO,
        m: blasint,
        n: blasint,
        alpha: *const T,
        a: *const T,
        lda: blasint,
        b: *const T,
        ldb: blasint,
        beta: *const T,
        c: *mut T,
        ldc: blasint,
    ) -> BlasResult<()> {
        let entry = T::hemm_entry(&self.provider);
        self.finish(self.symm_inner(
            Routine::Hemm, entry, layout, side, uplo, m, n, alpha, a, lda, b, ldb, beta, c, ldc,
        ))
    }

    unsafe fn symm_inner<T: Element>(
        &self,
        routine: Routine,
        entry: Option<SymmFn<T>>,
        layout: CBLAS_LAYOUT,
        side: CBLAS_SIDE,
        uplo: CBLAS_UPLO,
        m: blasint,
        n: blasint,
        alpha: *const T,
        a: *const T,
        lda: blasint,
        b: *const T,
        ldb: blasint,
        beta: *const T,
        c: *mut T,
        ldc: blasint,
    ) -> BlasResult<()> {
        let call = validate::symm(
            routine,
            T::PRECISION,
            layout,
            side,
            uplo,
            m,
            n,
            alpha,
            lda,
            ldb,
            beta,
            ldc,
        )?;
        let entry = require(entry, routine, T::PRECISION)?;
        let name = routine_name(routine, T::PRECISION);
        if call.is_empty() {
            log::trace!("{name}: empty output, provider skipped");
            return Ok(());
        }

        let plan = Family::Symmetric.plan(call.layout, call.op());
        log::trace!("{name}: {:?} {:?} -> {:?}", call.layout, call.op(), plan);
        let (m, n) = if plan.swap_extents { (n, m) } else { (m, n) };
        let side = flag(plan.op.side.fortran_char());
        let uplo = flag(plan.op.uplo.fortran_char());

        entry(&side, &uplo, &m, &n, alpha, a, &lda, b, &ldb, beta, c, &ldc);
        Ok(())
    }

    // ── syrk / herk ─────────────────────────────────────────────────

    /// `C := alpha * A * A^T + beta * C` (NoTrans) or
    /// `alpha * A^T * A + beta * C`, on the `uplo` triangle of `C`.
    ///
    /// # Safety
    ///
    /// See [`Trampoline::gemm`].
    pub unsafe fn syrk<T: Dispatch>(
        &self,
        layout: CBLAS_LAYOUT,
        uplo: CBLAS_UPLO,
        trans: CBLAS_TRANSPOSE,
        n: blasint,
        k: blasint,
        alpha: *const T,
        a: *const T,
        lda: blasint,
        beta: *const T,
        c: *mut T,
        ldc: blasint,
    ) -> BlasResult<()> {
        let entry = T::syrk_entry(&self.provider);
        self.finish(self.rank_k_inner(
            Routine::Syrk,
            Family::RankK,
            entry,
            layout,
            uplo,
            trans,
            n,
            k,
            alpha,
            a,
            lda,
            beta,
            c,
            ldc,
        ))
    }

    /// `C := alpha * A * A^H + beta * C` (NoTrans) or
    /// `alpha * A^H * A + beta * C`, with real `alpha` and `beta`.
    ///
    /// # Safety
    ///
    /// See [`Trampoline::gemm`].
    pub unsafe fn herk<T: HermitianDispatch>(
        &self,
        layout: CBLAS_LAYOUT,
        uplo: CBLAS_UPLO,
        trans: CBLAS_TRANSPOSE,
        n: blasint,
        k: blasint,
        alpha: *const T::Real,
        a: *const T,
        lda: blasint,
        beta: *const T::Real,
        c: *mut T,
        ldc: blasint,
    ) -> BlasResult<()> {
        let entry = T::herk_entry(&self.provider);
        self.finish(self.rank_k_inner(
            Routine::Herk,
            Family::HermitianRankK,
            entry,
            layout,
            uplo,
            trans,
            n,
            k,
            alpha,
            a,
            lda,
            beta,
            c,
            ldc,
        ))
    }

    unsafe fn rank_k_inner<T: Element, S: Element>(
        &self,
        routine: Routine,
        family: Family,
        entry: Option<SyrkFn<T, S>>,
        layout: CBLAS_LAYOUT,
        uplo: CBLAS_UPLO,
        trans: CBLAS_TRANSPOSE,
        n: blasint,
        k: blasint,
        alpha: *const S,
        a: *const T,
        lda: blasint,
        beta: *const S,
        c: *mut T,
        ldc: blasint,
    ) -> BlasResult<()> {
        let call = validate::rank_k(
            routine,
            T::PRECISION,
            layout,
            uplo,
            trans,
            n,
            k,
            alpha,
            lda,
            beta,
            ldc,
        )?;
        let entry = require(entry, routine, T::PRECISION)?;
        let name = routine_name(routine, T::PRECISION);
        if call.is_empty() {
            log::trace!("{name}: empty output, provider skipped");
            return Ok(());
        }

        let plan = family.plan(call.layout, call.op());
        log::trace!("{name}: {:?} {:?} -> {:?}", call.layout, call.op(), plan);
        let uplo = flag(plan.op.uplo.fortran_char());
        let trans = flag(plan.op.trans_a.fortran_char());
        // Real alpha (herk) is its own conjugate.
        let mut conj_alpha = S::zero();
        let alpha = planned_alpha(&plan, alpha, &mut conj_alpha);

        entry(&uplo, &trans, &n, &k, alpha, a, &lda, beta, c, &ldc);
        Ok(())
    }

    // ── syr2k / her2k ───────────────────────────────────────────────

    /// `C := alpha * A * B^T + alpha * B * A^T + beta * C` (NoTrans) or the
    /// transposed-operand form, on the `uplo` triangle of `C`.
    ///
    /// # Safety
    ///
    /// See [`Trampoline::gemm`].
    pub unsafe fn syr2k<T: Dispatch>(
        &self,
        layout: CBLAS_LAYOUT,
        uplo: CBLAS_UPLO,
        trans: CBLAS_TRANSPOSE,
        n: blasint,
        k: blasint,
        alpha: *const T,
        a: *const T,
        lda: blasint,
        b: *const T,
        ldb: blasint,
        beta: *const T,
        c: *mut T,
        ldc: blasint,
    ) -> BlasResult<()> {
        let entry = T::syr2k_entry(&self.provider);
        self.finish(self.rank_2k_inner(
            Routine::Syr2k,
            Family::RankK,
            entry,
            layout,
            uplo,
            trans,
            n,
            k,
            alpha,
            a,
            lda,
            b,
            ldb,
            beta,
            c,
            ldc,
        ))
    }

    /// `C := alpha * A * B^H + conj(alpha) * B * A^H + beta * C` (NoTrans) or
    /// the adjoint-operand form, with real `beta`.
    ///
    /// # Safety
    ///
    /// See [`Trampoline::gemm`].
    pub unsafe fn her2k<T: HermitianDispatch>(
        &self,
        layout: CBLAS_LAYOUT,
        uplo: CBLAS_UPLO,
        trans: CBLAS_TRANSPOSE,
        n: blasint,
        k: blasint,
        alpha: *const T,
        a: *const T,
        lda: blasint,
        b: *const T,
        ldb: blasint,
        beta: *const T::Real,
        c: *mut T,
        ldc: blasint,
    ) -> BlasResult<()> {
        let entry = T::her2k_entry(&self.provider);
        self.finish(self.rank_2k_inner(
            Routine::Her2k,
            Family::HermitianRankK,
            entry,
            layout,
            uplo,
            trans,
            n,
            k,
            alpha,
            a,
            lda,
            b,
            ldb,
            beta,
            c,
            ldc,
        ))
    }

    unsafe fn rank_2k_inner<T: Element, B>(
        &self,
        routine: Routine,
        family: Family,
        entry: Option<Syr2kFn<T, B>>,
        layout: CBLAS_LAYOUT,
        uplo: CBLAS_UPLO,
        trans: CBLAS_TRANSPOSE,
        n: blasint,
        k: blasint,
        alpha: *const T,
        a: *const T,
        lda: blasint,
        b: *const T,
        ldb: blasint,
        beta: *const B,
        c: *mut T,
        ldc: blasint,
    ) -> BlasResult<()> {
        let call = validate::rank_2k(
            routine,
            T::PRECISION,
            layout,
            uplo,
            trans,
            n,
            k,
            alpha,
            lda,
            ldb,
            beta,
            ldc,
        )?;
        let entry = require(entry, routine, T::PRECISION)?;
        let name = routine_name(routine, T::PRECISION);
        if call.is_empty() {
            log::trace!("{name}: empty output, provider skipped");
            return Ok(());
        }

        let plan = family.plan(call.layout, call.op());
        log::trace!("{name}: {:?} {:?} -> {:?}", call.layout, call.op(), plan);
        let uplo = flag(plan.op.uplo.fortran_char());
        let trans = flag(plan.op.trans_a.fortran_char());
        // Row-major her2k: the two terms swap roles, so alpha becomes conj(alpha).
        let mut conj_alpha = T::zero();
        let alpha = planned_alpha(&plan, alpha, &mut conj_alpha);

        entry(&uplo, &trans, &n, &k, alpha, a, &lda, b, &ldb, beta, c, &ldc);
        Ok(())
    }

    // ── trmm / trsm ─────────────────────────────────────────────────

    /// `B := alpha * op(A) * B` (Left) or `alpha * B * op(A)` (Right) with
    /// `A` triangular.
    ///
    /// # Safety
    ///
    /// See [`Trampoline::gemm`].
    pub unsafe fn trmm<T: Dispatch>(
        &self,
        layout: CBLAS_LAYOUT,
        side: CBLAS_SIDE,
        uplo: CBLAS_UPLO,
        trans_a: CBLAS_TRANSPOSE,
        diag: CBLAS_DIAG,
        m: blasint,
        n: blasint,
        alpha: *const T,
        a: *const T,
        lda: blasint,
        b: *mut T,
        ldb: blasint,
    ) -> BlasResult<()> {
        let entry = T::trmm_entry(&self.provider);
        self.finish(self.triangular_inner(
            Routine::Trmm, entry, layout, side, uplo, trans_a, diag, m, n, alpha, a, lda, b, ldb,
        ))
    }

    /// Solve `op(A) * X = alpha * B` (Left) or `X * op(A) = alpha * B`
    /// (Right) with `A` triangular; `X` overwrites `B`.
    ///
    /// # Safety
    ///
    /// See [`Trampoline::gemm`].
    pub unsafe fn trsm<T: Dispatch>(
        &self,
        layout: CBLAS_LAYOUT,
        side: CBLAS_SIDE,
        uplo: CBLAS_UPLO,
        trans_a: CBLAS_TRANSPOSE,
        diag: CBLAS_DIAG,
        m: blasint,
        n: blasint,
        alpha: *const T,
        a: *const T,
        lda: blasint,
        b: *mut T,
        ldb: blasint,
    ) -> BlasResult<()> {
        let entry = T::trsm_entry(&self.provider);
        self.finish(self.triangular_inner(
            Routine::Trsm, entry, layout, side, uplo, trans_a, diag, m, n, alpha, a, lda, b, ldb,
        ))
    }

    unsafe fn triangular_inner<T: Element>(
        &self,
        routine: Routine,
        entry: Option<TrmmFn<T>>,
        layout: CBLAS_LAYOUT,
        side: CBLAS_SIDE,
        uplo: CBLAS_UPLO,
        trans_a: CBLAS_TRANSPOSE,
        diag: CBLAS_DIAG,
        m: blasint,
        n: blasint,
        alpha: *const T,
        a: *const T,
        lda: blasint,
        b: *mut T,
        ldb: blasint,
    ) -> BlasResult<()> {
        let call = validate::triangular(
            routine,
            T::PRECISION,
            layout,
            side,
            uplo,
            trans_a,
            diag,
            m,
            n,
            alpha,
            lda,
            ldb,
        )?;
        let entry = require(entry, routine, T::PRECISION)?;
        let name = routine_name(routine, T::PRECISION);
        if call.is_empty() {
            log::trace!("{name}: empty output, provider skipped");
            return Ok(());
        }

        let plan = Family::Triangular.plan(call.layout, call.op());
        log::trace!("{name}: {:?} {:?} -> {:?}", call.layout, call.op(), plan);
        let (m, n) = if plan.swap_extents { (n, m) } else { (m, n) };
        let side = flag(plan.op.side.fortran_char());
        let uplo = flag(plan.op.uplo.fortran_char());
        let trans = flag(plan.op.trans_a.fortran_char());
        let diag = flag(plan.op.diag.fortran_char());

        entry(&side, &uplo, &trans, &diag, &m, &n, alpha, a, &lda, b, &ldb);
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════
// Matrix-vector
// ═══════════════════════════════════════════════════════════════

impl Trampoline {
    // ── gemv ────────────────────────────────────────────────────────

    /// `y := alpha * op(A) * x + beta * y`.
    ///
    /// # Safety
    ///
    /// `a` must cover the matrix its dimensions and leading dimension
    /// describe, `x` and `y` the strided vectors op(A) implies; scalars must
    /// be readable or null.
    pub unsafe fn gemv<T: Dispatch>(
        &self,
        layout: CBLAS_LAYOUT,
        trans: CBLAS_TRANSPOSE,
        m: blasint,
        n: blasint,
        alpha: *const T,
        a: *const T,
        lda: blasint,
        x: *const T,
        inc_x: blasint,
        beta: *const T,
        y: *mut T,
        inc_y: blasint,
    ) -> BlasResult<()> {
        self.finish(self.gemv_inner(
            layout, trans, m, n, alpha, a, lda, x, inc_x, beta, y, inc_y,
        ))
    }

    unsafe fn gemv_inner<T: Dispatch>(
        &self,
        layout: CBLAS_LAYOUT,
        trans: CBLAS_TRANSPOSE,
        m: blasint,
        n: blasint,
        alpha: *const T,
        a: *const T,
        lda: blasint,
        x: *const T,
        inc_x: blasint,
        beta: *const T,
        y: *mut T,
        inc_y: blasint,
    ) -> BlasResult<()> {
        let call = validate::gemv(
            T::PRECISION,
            layout,
            trans,
            m,
            n,
            alpha,
            lda,
            inc_x,
            beta,
            inc_y,
        )?;
        let entry = require(T::gemv_entry(&self.provider), Routine::Gemv, T::PRECISION)?;
        let name = routine_name(Routine::Gemv, T::PRECISION);
        if call.is_empty() {
            log::trace!("{name}: empty output, provider skipped");
            return Ok(());
        }

        let plan = Family::GeneralVector.plan(call.layout, call.op());
        log::trace!("{name}: {:?} {:?} -> {:?}", call.layout, call.op(), plan);
        let (m, n) = if plan.swap_extents { (n, m) } else { (m, n) };
        let trans = flag(plan.op.trans_a.fortran_char());
        let mut conj_alpha = T::zero();
        let alpha = planned_alpha(&plan, alpha, &mut conj_alpha);

        if !conjugates_vectors::<T>(&plan) {
            entry(&trans, &m, &n, alpha, a, &lda, x, &inc_x, beta, y, &inc_y);
            return Ok(());
        }
        // conj(y) := conj(alpha) * A^T * conj(x) + conj(beta) * conj(y)
        let x = conjugated(x, call.x_len(), inc_x);
        let beta = (*beta).conj();
        conjugate_in_place(y, call.y_len(), inc_y);
        entry(&trans, &m, &n, alpha, a, &lda, x.as_ptr(), &UNIT_STRIDE, &beta, y, &inc_y);
        conjugate_in_place(y, call.y_len(), inc_y);
        Ok(())
    }

    // ── ger / geru / gerc ───────────────────────────────────────────

    /// `A := alpha * x * y^T + A`, real precisions.
    ///
    /// # Safety
    ///
    /// `x` must cover `m` strided elements, `y` `n`, `a` the `m x n` matrix
    /// its leading dimension describes; `alpha` must be readable or null.
    pub unsafe fn ger<T: RealDispatch>(
        &self,
        layout: CBLAS_LAYOUT,
        m: blasint,
        n: blasint,
        alpha: *const T,
        x: *const T,
        inc_x: blasint,
        y: *const T,
        inc_y: blasint,
        a: *mut T,
        lda: blasint,
    ) -> BlasResult<()> {
        let entry = T::ger_entry(&self.provider);
        self.finish(self.rank_one_inner(
            Routine::Ger,
            Family::RankOne,
            entry,
            layout,
            m,
            n,
            alpha,
            x,
            inc_x,
            y,
            inc_y,
            a,
            lda,
        ))
    }

    /// `A := alpha * x * y^T + A`, complex precisions.
    ///
    /// # Safety
    ///
    /// See [`Trampoline::ger`].
    pub unsafe fn geru<T: HermitianDispatch>(
        &self,
        layout: CBLAS_LAYOUT,
        m: blasint,
        n: blasint,
        alpha: *const T,
        x: *const T,
        inc_x: blasint,
        y: *const T,
        inc_y: blasint,
        a: *mut T,
        lda: blasint,
    ) -> BlasResult<()> {
        let entry = T::geru_entry(&self.provider);
        self.finish(self.rank_one_inner(
            Routine::Geru,
            Family::RankOne,
            entry,
            layout,
            m,
            n,
            alpha,
            x,
            inc_x,
            y,
            inc_y,
            a,
            lda,
        ))
    }

    /// `A := alpha * x * y^H + A`.
    ///
    /// # Safety
    ///
    /// See [`Trampoline::ger`].
    pub unsafe fn gerc<T: HermitianDispatch>(
        &self,
        layout: CBLAS_LAYOUT,
        m: blasint,
        n: blasint,
        alpha: *const T,
        x: *const T,
        inc_x: blasint,
        y: *const T,
        inc_y: blasint,
        a: *mut T,
        lda: blasint,
    ) -> BlasResult<()> {
        let entry = T::gerc_entry(&self.provider);
        self.finish(self.rank_one_inner(
            Routine::Gerc,
            Family::ConjugateRankOne,
            entry,
            layout,
            m,
            n,
            alpha,
            x,
            inc_x,
            y,
            inc_y,
            a,
            lda,
        ))
    }

    unsafe fn rank_one_inner<T: Element>(
        &self,
        routine: Routine,
        family: Family,
        entry: Option<GerFn<T>>,
        layout: CBLAS_LAYOUT,
        m: blasint,
        n: blasint,
        alpha: *const T,
        x: *const T,
        inc_x: blasint,
        y: *const T,
        inc_y: blasint,
        a: *mut T,
        lda: blasint,
    ) -> BlasResult<()> {
        let call = validate::ger(routine, T::PRECISION, layout, m, n, alpha, inc_x, inc_y, lda)?;
        let entry = require(entry, routine, T::PRECISION)?;
        let name = routine_name(routine, T::PRECISION);
        if call.is_empty() {
            log::trace!("{name}: empty output, provider skipped");
            return Ok(());
        }

        let plan = family.plan(call.layout, call.op());
        log::trace!("{name}: {:?} {:?} -> {:?}", call.layout, call.op(), plan);
        let (m, n) = if plan.swap_extents { (n, m) } else { (m, n) };
        let (x, inc_x, y, inc_y) = if plan.swap_operands {
            (y, inc_y, x, inc_x)
        } else {
            (x, inc_x, y, inc_y)
        };

        if !conjugates_vectors::<T>(&plan) {
            entry(&m, &n, alpha, x, &inc_x, y, &inc_y, a, &lda);
            return Ok(());
        }
        // A^T := alpha * conj(y) * x^T + A^T, as gerc on conj(y) and conj(x).
        let x = conjugated(x, m, inc_x);
        let y = conjugated(y, n, inc_y);
        entry(
            &m,
            &n,
            alpha,
            x.as_ptr(),
            &UNIT_STRIDE,
            y.as_ptr(),
            &UNIT_STRIDE,
            a,
            &lda,
        );
        Ok(())
    }

    // ── symv / hemv ─────────────────────────────────────────────────

    /// `y := alpha * A * x + beta * y` with `A` symmetric, real precisions.
    ///
    /// # Safety
    ///
    /// `a` must cover the `n x n` matrix its leading dimension describes,
    /// `x` and `y` `n` strided elements each; scalars must be readable or
    /// null.
    pub unsafe fn symv<T: RealDispatch>(
        &self,
        layout: CBLAS_LAYOUT,
        uplo: CBLAS_UPLO,
        n: blasint,
        alpha: *const T,
        a: *const T,
        lda: blasint,
        x: *const T,
        inc_x: blasint,
        beta: *const T,
        y: *mut T,
        inc_y: blasint,
    ) -> BlasResult<()> {
        let entry = T::symv_entry(&self.provider);
        self.finish(self.symmetric_vector_inner(
            Routine::Symv,
            Family::SymmetricVector,
            entry,
            layout,
            uplo,
            n,
            alpha,
            a,
            lda,
            x,
            inc_x,
            beta,
            y,
            inc_y,
        ))
    }

    /// [`Trampoline::symv`] with `A` Hermitian; its diagonal is taken as real.
    ///
    /// # Safety
    ///
    /// See [`Trampoline::symv`].
    pub unsafe fn hemv<T: HermitianDispatch>(
        &self,
        layout: CBLAS_LAYOUT,
        uplo: CBLAS_UPLO,
        n: blasint,
        alpha: *const T,
        a: *const T,
        lda: blasint,
        x: *const T,
        inc_x: blasint,
        beta: *const T,
        y: *mut T,
        inc_y: blasint,
    ) -> BlasResult<()> {
        let entry = T::hemv_entry(&self.provider);
        self.finish(self.symmetric_vector_inner(
            Routine::Hemv,
            Family::HermitianVector,
            entry,
            layout,
            uplo,
            n,
            alpha,
            a,
            lda,
            x,
            inc_x,
            beta,
            y,
            inc_y,
        ))
    }

    unsafe fn symmetric_vector_inner<T: Element>(
        &self,
        routine: Routine,
        family: Family,
        entry: Option<SymvFn<T>>,
        layout: CBLAS_LAYOUT,
        uplo: CBLAS_UPLO,
        n: blasint,
        alpha: *const T,
        a: *const T,
        lda: blasint,
        x: *const T,
        inc_x: blasint,
        beta: *const T,
        y: *mut T,
        inc_y: blasint,
    ) -> BlasResult<()> {
        let call = validate::symv(
            routine,
            T::PRECISION,
            layout,
            uplo,
            n,
            alpha,
            lda,
            inc_x,
            beta,
            inc_y,
        )?;
        let entry = require(entry, routine, T::PRECISION)?;
        let name = routine_name(routine, T::PRECISION);
        if call.is_empty() {
            log::trace!("{name}: empty output, provider skipped");
            return Ok(());
        }

        let plan = family.plan(call.layout, call.op());
        log::trace!("{name}: {:?} {:?} -> {:?}", call.layout, call.op(), plan);
        let uplo = flag(plan.op.uplo.fortran_char());
        let mut conj_alpha = T::zero();
        let alpha = planned_alpha(&plan, alpha, &mut conj_alpha);

        if !conjugates_vectors::<T>(&plan) {
            entry(&uplo, &n, alpha, a, &lda, x, &inc_x, beta, y, &inc_y);
            return Ok(());
        }
        // Row-major A is conj(A) to the provider:
        // conj(y) := conj(alpha) * A * conj(x) + conj(beta) * conj(y)
        let x = conjugated(x, n, inc_x);
        let beta = (*beta).conj();
        conjugate_in_place(y, n, inc_y);
        entry(&uplo, &n, alpha, a, &lda, x.as_ptr(), &UNIT_STRIDE, &beta, y, &inc_y);
        conjugate_in_place(y, n, inc_y);
        Ok(())
    }

    // ── syr / her ───────────────────────────────────────────────────

    /// `A := alpha * x * x^T + A` on the `uplo` triangle, real precisions.
    ///
    /// # Safety
    ///
    /// `x` must cover `n` strided elements, `a` the `n x n` matrix its
    /// leading dimension describes; `alpha` must be readable or null.
    pub unsafe fn syr<T: RealDispatch>(
        &self,
        layout: CBLAS_LAYOUT,
        uplo: CBLAS_UPLO,
        n: blasint,
        alpha: *const T,
        x: *const T,
        inc_x: blasint,
        a: *mut T,
        lda: blasint,
    ) -> BlasResult<()> {
        let entry = T::syr_entry(&self.provider);
        self.finish(self.symmetric_rank_one_inner(
            Routine::Syr,
            Family::SymmetricVector,
            entry,
            layout,
            uplo,
            n,
            alpha,
            x,
            inc_x,
            a,
            lda,
        ))
    }

    /// `A := alpha * x * x^H + A` on the `uplo` triangle, with real `alpha`.
    ///
    /// # Safety
    ///
    /// See [`Trampoline::syr`].
    pub unsafe fn her<T: HermitianDispatch>(
        &self,
        layout: CBLAS_LAYOUT,
        uplo: CBLAS_UPLO,
        n: blasint,
        alpha: *const T::Real,
        x: *const T,
        inc_x: blasint,
        a: *mut T,
        lda: blasint,
    ) -> BlasResult<()> {
        let entry = T::her_entry(&self.provider);
        self.finish(self.symmetric_rank_one_inner(
            Routine::Her,
            Family::HermitianVector,
            entry,
            layout,
            uplo,
            n,
            alpha,
            x,
            inc_x,
            a,
            lda,
        ))
    }

    unsafe fn symmetric_rank_one_inner<T: Element, S: Element>(
        &self,
        routine: Routine,
        family: Family,
        entry: Option<SyrFn<T, S>>,
        layout: CBLAS_LAYOUT,
        uplo: CBLAS_UPLO,
        n: blasint,
        alpha: *const S,
        x: *const T,
        inc_x: blasint,
        a: *mut T,
        lda: blasint,
    ) -> BlasResult<()> {
        let call = validate::syr(routine, T::PRECISION, layout, uplo, n, alpha, inc_x, lda)?;
        let entry = require(entry, routine, T::PRECISION)?;
        let name = routine_name(routine, T::PRECISION);
        if call.is_empty() {
            log::trace!("{name}: empty output, provider skipped");
            return Ok(());
        }

        let plan = family.plan(call.layout, call.op());
        log::trace!("{name}: {:?} {:?} -> {:?}", call.layout, call.op(), plan);
        let uplo = flag(plan.op.uplo.fortran_char());
        // Real alpha (her) is its own conjugate.
        let mut conj_alpha = S::zero();
        let alpha = planned_alpha(&plan, alpha, &mut conj_alpha);

        if !conjugates_vectors::<T>(&plan) {
            entry(&uplo, &n, alpha, x, &inc_x, a, &lda);
            return Ok(());
        }
        // conj(A) := alpha * conj(x) * conj(x)^H + conj(A)
        let x = conjugated(x, n, inc_x);
        entry(&uplo, &n, alpha, x.as_ptr(), &UNIT_STRIDE, a, &lda);
        Ok(())
    }

    // ── trmv / trsv ─────────────────────────────────────────────────

    /// `x := op(A) * x` with `A` triangular.
    ///
    /// # Safety
    ///
    /// `a` must cover the `n x n` matrix its leading dimension describes,
    /// `x` `n` strided elements.
    pub unsafe fn trmv<T: Dispatch>(
        &self,
        layout: CBLAS_LAYOUT,
        uplo: CBLAS_UPLO,
        trans_a: CBLAS_TRANSPOSE,
        diag: CBLAS_DIAG,
        n: blasint,
        a: *const T,
        lda: blasint,
        x: *mut T,
        inc_x: blasint,
    ) -> BlasResult<()> {
        let entry = T::trmv_entry(&self.provider);
        self.finish(self.triangular_vector_inner(
            Routine::Trmv, entry, layout, uplo, trans_a, diag, n, a, lda, x, inc_x,
        ))
    }

    /// Solve `op(A) * z = x` with `A` triangular; `z` overwrites `x`.
    ///
    /// # Safety
    ///
    /// See [`Trampoline::trmv`].
    pub unsafe fn trsv<T: Dispatch>(
        &self,
        layout: CBLAS_LAYOUT,
        uplo: CBLAS_UPLO,
        trans_a: CBLAS_TRANSPOSE,
        diag: CBLAS_DIAG,
        n: blasint,
        a: *const T,
        lda: blasint,
        x: *mut T,
        inc_x: blasint,
    ) -> BlasResult<()> {
        let entry = T::trsv_entry(&self.provider);
        self.finish(self.triangular_vector_inner(
            Routine::Trsv, entry, layout, uplo, trans_a, diag, n, a, lda, x, inc_x,
        ))
    }

    unsafe fn triangular_vector_inner<T: Element>(
        &self,
        routine: Routine,
        entry: Option<TrmvFn<T>>,
        layout: CBLAS_LAYOUT,
        uplo: CBLAS_UPLO,
        trans_a: CBLAS_TRANSPOSE,
        diag: CBLAS_DIAG,
        n: blasint,
        a: *const T,
        lda: blasint,
        x: *mut T,
        inc_x: blasint,
    ) -> BlasResult<()> {
        let call = validate::triangular_vector(
            routine,
            T::PRECISION,
            layout,
            uplo,
            trans_a,
            diag,
            n,
            lda,
            inc_x,
        )?;
        let entry = require(entry, routine, T::PRECISION)?;
        let name = routine_name(routine, T::PRECISION);
        if call.is_empty() {
            log::trace!("{name}: empty output, provider skipped");
            return Ok(());
        }

        let plan = Family::TriangularVector.plan(call.layout, call.op());
        log::trace!("{name}: {:?} {:?} -> {:?}", call.layout, call.op(), plan);
        let uplo = flag(plan.op.uplo.fortran_char());
        let trans = flag(plan.op.trans_a.fortran_char());
        let diag = flag(plan.op.diag.fortran_char());

        let conjugate = conjugates_vectors::<T>(&plan);
        if conjugate {
            conjugate_in_place(x, n, inc_x);
        }
        entry(&uplo, &trans, &diag, &n, a, &lda, x, &inc_x);
        if conjugate {
            conjugate_in_place(x, n, inc_x);
        }
        Ok(())
    }
}
