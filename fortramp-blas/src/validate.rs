//! Enum Validator: raw CBLAS arguments in, typed call records out.
//!
//! Checks run in CBLAS argument order (Order, the enums, the dimensions,
//! alpha, then the leading dimensions, increments and beta as they appear)
//! and the first failure wins, so the reported position is always the first
//! offending argument. Nothing is coerced: a Trans of 999 is an error, not
//! `NoTrans`, and a zero increment is an error, not a broadcast.

use std::borrow::Cow;
use std::os::raw::c_int;

use fortramp_core::abi::{CBLAS_DIAG, CBLAS_LAYOUT, CBLAS_SIDE, CBLAS_TRANSPOSE, CBLAS_UPLO};
use fortramp_core::complex;
use fortramp_core::{
    blasint, BlasError, BlasResult, Diag, EnumError, Layout, Precision, Routine, Side, Transpose,
    Uplo,
};

use crate::transpose::OpDescriptor;

/// 1-based CBLAS argument positions, per routine family.
pub mod position {
    pub mod gemv {
        pub const ORDER: i32 = 1;
        pub const TRANS: i32 = 2;
        pub const M: i32 = 3;
        pub const N: i32 = 4;
        pub const ALPHA: i32 = 5;
        pub const LDA: i32 = 7;
        pub const INC_X: i32 = 9;
        pub const BETA: i32 = 10;
        pub const INC_Y: i32 = 12;
    }

    /// ger, geru, gerc
    pub mod ger {
        pub const ORDER: i32 = 1;
        pub const M: i32 = 2;
        pub const N: i32 = 3;
        pub const ALPHA: i32 = 4;
        pub const INC_X: i32 = 6;
        pub const INC_Y: i32 = 8;
        pub const LDA: i32 = 10;
    }

    /// symv, hemv
    pub mod symv {
        pub const ORDER: i32 = 1;
        pub const UPLO: i32 = 2;
        pub const N: i32 = 3;
        pub const ALPHA: i32 = 4;
        pub const LDA: i32 = 6;
        pub const INC_X: i32 = 8;
        pub const BETA: i32 = 9;
        pub const INC_Y: i32 = 11;
    }

    /// syr, her
    pub mod syr {
        pub const ORDER: i32 = 1;
        pub const UPLO: i32 = 2;
        pub const N: i32 = 3;
        pub const ALPHA: i32 = 4;
        pub const INC_X: i32 = 6;
        pub const LDA: i32 = 8;
    }

    /// trmv, trsv
    pub mod triangular_vector {
        pub const ORDER: i32 = 1;
        pub const UPLO: i32 = 2;
        pub const TRANS_A: i32 = 3;
        pub const DIAG: i32 = 4;
        pub const N: i32 = 5;
        pub const LDA: i32 = 7;
        pub const INC_X: i32 = 9;
    }

    pub mod gemm {
        pub const ORDER: i32 = 1;
        pub const TRANS_A: i32 = 2;
        pub const TRANS_B: i32 = 3;
        pub const M: i32 = 4;
        pub const N: i32 = 5;
        pub const K: i32 = 6;
        pub const ALPHA: i32 = 7;
        pub const LDA: i32 = 9;
        pub const LDB: i32 = 11;
        pub const BETA: i32 = 12;
        pub const LDC: i32 = 14;
    }

    /// symm, hemm
    pub mod symm {
        pub const ORDER: i32 = 1;
        pub const SIDE: i32 = 2;
        pub const UPLO: i32 = 3;
        pub const M: i32 = 4;
        pub const N: i32 = 5;
        pub const ALPHA: i32 = 6;
        pub const LDA: i32 = 8;
        pub const LDB: i32 = 10;
        pub const BETA: i32 = 11;
        pub const LDC: i32 = 13;
    }

    /// syrk, herk
    pub mod rank_k {
        pub const ORDER: i32 = 1;
        pub const UPLO: i32 = 2;
        pub const TRANS: i32 = 3;
        pub const N: i32 = 4;
        pub const K: i32 = 5;
        pub const ALPHA: i32 = 6;
        pub const LDA: i32 = 8;
        pub const BETA: i32 = 9;
        pub const LDC: i32 = 11;
    }

    /// syr2k, her2k
    pub mod rank_2k {
        pub const ORDER: i32 = 1;
        pub const UPLO: i32 = 2;
        pub const TRANS: i32 = 3;
        pub const N: i32 = 4;
        pub const K: i32 = 5;
        pub const ALPHA: i32 = 6;
        pub const LDA: i32 = 8;
        pub const LDB: i32 = 10;
        pub const BETA: i32 = 11;
        pub const LDC: i32 = 13;
    }

    /// trmm, trsm
    pub mod triangular {
        pub const ORDER: i32 = 1;
        pub const SIDE: i32 = 2;
        pub const UPLO: i32 = 3;
        pub const TRANS_A: i32 = 4;
        pub const DIAG: i32 = 5;
        pub const M: i32 = 6;
        pub const N: i32 = 7;
        pub const ALPHA: i32 = 8;
        pub const LDA: i32 = 10;
        pub const LDB: i32 = 12;
    }
}

/// CBLAS entry point name, used in every diagnostic.
pub fn routine_name(routine: Routine, precision: Precision) -> &'static str {
    routine.cblas_name(precision).unwrap_or("cblas_?")
}

struct Check {
    routine: &'static str,
}

impl Check {
    fn enum_arg<E>(&self, raw: c_int, position: i32, param: &'static str) -> BlasResult<E>
    where
        E: TryFrom<c_int, Error = EnumError>,
    {
        E::try_from(raw).map_err(|e| BlasError::InvalidEnum {
            routine: Cow::Borrowed(self.routine),
            position,
            param,
            value: e.value,
            legal: e.kind.legal(),
        })
    }

    /// A Trans restricted to a subset of its enumeration.
    fn trans_in(
        &self,
        raw: CBLAS_TRANSPOSE,
        position: i32,
        param: &'static str,
        legal: &[Transpose],
        legal_text: &'static str,
    ) -> BlasResult<Transpose> {
        let trans: Transpose = self.enum_arg(raw, position, param)?;
        if legal.contains(&trans) {
            Ok(trans)
        } else {
            Err(BlasError::InvalidEnum {
                routine: Cow::Borrowed(self.routine),
                position,
                param,
                value: raw,
                legal: legal_text,
            })
        }
    }

    fn at_least(
        &self,
        value: blasint,
        min: blasint,
        position: i32,
        param: &'static str,
    ) -> BlasResult<()> {
        if value < min {
            return Err(BlasError::InvalidDimension {
                routine: Cow::Borrowed(self.routine),
                position,
                param,
                value: value as i64,
                min: min as i64,
            });
        }
        Ok(())
    }

    fn dim(&self, value: blasint, position: i32, param: &'static str) -> BlasResult<()> {
        self.at_least(value, 0, position, param)
    }

    /// Leading dimension of a `rows x cols` matrix stored in `layout`.
    fn ld(
        &self,
        layout: Layout,
        value: blasint,
        rows: blasint,
        cols: blasint,
        position: i32,
        param: &'static str,
    ) -> BlasResult<()> {
        self.at_least(value, layout.leading_dim(rows, cols).max(1), position, param)
    }

    fn inc(&self, value: blasint, position: i32, param: &'static str) -> BlasResult<()> {
        if value == 0 {
            return Err(BlasError::ZeroIncrement {
                routine: Cow::Borrowed(self.routine),
                position,
                param,
            });
        }
        Ok(())
    }

    fn scalar<S>(&self, ptr: *const S, position: i32, param: &'static str) -> BlasResult<()> {
        complex::scalar(ptr, self.routine, position, param).map(|_| ())
    }
}

/// Shape of op(X) = `rows x cols` given the stored operand's transpose flag.
#[inline]
fn stored_shape(trans: Transpose, rows: blasint, cols: blasint) -> (blasint, blasint) {
    match trans {
        Transpose::NoTrans => (rows, cols),
        Transpose::Trans | Transpose::ConjTrans => (cols, rows),
    }
}

// ── Call records ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GemmCall {
    pub layout: Layout,
    pub trans_a: Transpose,
    pub trans_b: Transpose,
    pub m: blasint,
    pub n: blasint,
    pub k: blasint,
}

impl GemmCall {
    /// C has no elements. K = 0 is not empty: C is still scaled by beta.
    pub fn is_empty(&self) -> bool {
        self.m == 0 || self.n == 0
    }

    pub fn op(&self) -> OpDescriptor {
        OpDescriptor {
            trans_a: self.trans_a,
            trans_b: self.trans_b,
            ..OpDescriptor::default()
        }
    }
}

/// symm, hemm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymmCall {
    pub layout: Layout,
    pub side: Side,
    pub uplo: Uplo,
    pub m: blasint,
    pub n: blasint,
}

impl SymmCall {
    pub fn is_empty(&self) -> bool {
        self.m == 0 || self.n == 0
    }

    pub fn op(&self) -> OpDescriptor {
        OpDescriptor {
            side: self.side,
            uplo: self.uplo,
            ..OpDescriptor::default()
        }
    }
}

/// syrk, herk, syr2k, her2k
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankKCall {
    pub layout: Layout,
    pub uplo: Uplo,
    pub trans: Transpose,
    pub n: blasint,
    pub k: blasint,
}

impl RankKCall {
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn op(&self) -> OpDescriptor {
        OpDescriptor {
            trans_a: self.trans,
            uplo: self.uplo,
            ..OpDescriptor::default()
        }
    }
}

/// trmm, trsm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriangularCall {
    pub layout: Layout,
    pub side: Side,
    pub uplo: Uplo,
    pub trans: Transpose,
    pub diag: Diag,
    pub m: blasint,
    pub n: blasint,
}

impl TriangularCall {
    pub fn is_empty(&self) -> bool {
        self.m == 0 || self.n == 0
    }

    pub fn op(&self) -> OpDescriptor {
        OpDescriptor {
            trans_a: self.trans,
            trans_b: Transpose::NoTrans,
            side: self.side,
            uplo: self.uplo,
            diag: self.diag,
        }
    }
}

/// gemv
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GemvCall {
    pub layout: Layout,
    pub trans: Transpose,
    pub m: blasint,
    pub n: blasint,
}

impl GemvCall {
    /// Length of x, the vector op(A) is applied to.
    pub fn x_len(&self) -> blasint {
        match self.trans {
            Transpose::NoTrans => self.n,
            Transpose::Trans | Transpose::ConjTrans => self.m,
        }
    }

    /// Length of y, the output.
    pub fn y_len(&self) -> blasint {
        match self.trans {
            Transpose::NoTrans => self.m,
            Transpose::Trans | Transpose::ConjTrans => self.n,
        }
    }

    /// y has no elements. An empty x is not empty: y is still the
    /// provider's to scale.
    pub fn is_empty(&self) -> bool {
        self.y_len() == 0
    }

    pub fn op(&self) -> OpDescriptor {
        OpDescriptor {
            trans_a: self.trans,
            ..OpDescriptor::default()
        }
    }
}

/// ger, geru, gerc
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GerCall {
    pub layout: Layout,
    pub m: blasint,
    pub n: blasint,
}

impl GerCall {
    pub fn is_empty(&self) -> bool {
        self.m == 0 || self.n == 0
    }

    pub fn op(&self) -> OpDescriptor {
        OpDescriptor::default()
    }
}

/// symv, hemv, syr, her
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymmetricVectorCall {
    pub layout: Layout,
    pub uplo: Uplo,
    pub n: blasint,
}

impl SymmetricVectorCall {
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn op(&self) -> OpDescriptor {
        OpDescriptor {
            uplo: self.uplo,
            ..OpDescriptor::default()
        }
    }
}

/// trmv, trsv
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriangularVectorCall {
    pub layout: Layout,
    pub uplo: Uplo,
    pub trans: Transpose,
    pub diag: Diag,
    pub n: blasint,
}

impl TriangularVectorCall {
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn op(&self) -> OpDescriptor {
        OpDescriptor {
            trans_a: self.trans,
            uplo: self.uplo,
            diag: self.diag,
            ..OpDescriptor::default()
        }
    }
}

// ── Validators ──────────────────────────────────────────────────────

pub fn gemm<S>(
    precision: Precision,
    layout: CBLAS_LAYOUT,
    trans_a: CBLAS_TRANSPOSE,
    trans_b: CBLAS_TRANSPOSE,
    m: blasint,
    n: blasint,
    k: blasint,
    alpha: *const S,
    lda: blasint,
    ldb: blasint,
    beta: *const S,
    ldc: blasint,
) -> BlasResult<GemmCall> {
    use position::gemm as pos;
    let check = Check {
        routine: routine_name(Routine::Gemm, precision),
    };

    let layout: Layout = check.enum_arg(layout, pos::ORDER, "Order")?;
    let trans_a: Transpose = check.enum_arg(trans_a, pos::TRANS_A, "TransA")?;
    let trans_b: Transpose = check.enum_arg(trans_b, pos::TRANS_B, "TransB")?;
    check.dim(m, pos::M, "M")?;
    check.dim(n, pos::N, "N")?;
    check.dim(k, pos::K, "K")?;
    check.scalar(alpha, pos::ALPHA, "alpha")?;

    let (ra, ca) = stored_shape(trans_a, m, k);
    check.ld(layout, lda, ra, ca, pos::LDA, "lda")?;
    let (rb, cb) = stored_shape(trans_b, k, n);
    check.ld(layout, ldb, rb, cb, pos::LDB, "ldb")?;
    check.scalar(beta, pos::BETA, "beta")?;
    check.ld(layout, ldc, m, n, pos::LDC, "ldc")?;

    Ok(GemmCall {
        layout,
        trans_a,
        trans_b,
        m,
        n,
        k,
    })
}

/// symm and hemm; `routine` picks the name used in diagnostics.
pub fn symm<S>(
    routine: Routine,
    precision: Precision,
    layout: CBLAS_LAYOUT,
    side: CBLAS_SIDE,
    uplo: CBLAS_UPLO,
    m: blasint,
    n: blasint,
    alpha: *const S,
    lda: blasint,
    ldb: blasint,
    beta: *const S,
    ldc: blasint,
) -> BlasResult<SymmCall> {
    use position::symm as pos;
    let check = Check {
        routine: routine_name(routine, precision),
    };

    let layout: Layout = check.enum_arg(layout, pos::ORDER, "Order")?;
    let side: Side = check.enum_arg(side, pos::SIDE, "Side")?;
    let uplo: Uplo = check.enum_arg(uplo, pos::UPLO, "Uplo")?;
    check.dim(m, pos::M, "M")?;
    check.dim(n, pos::N, "N")?;
    check.scalar(alpha, pos::ALPHA, "alpha")?;

    let ka = match side {
        Side::Left => m,
        Side::Right => n,
    };
    check.ld(layout, lda, ka, ka, pos::LDA, "lda")?;
    check.ld(layout, ldb, m, n, pos::LDB, "ldb")?;
    check.scalar(beta, pos::BETA, "beta")?;
    check.ld(layout, ldc, m, n, pos::LDC, "ldc")?;

    Ok(SymmCall {
        layout,
        side,
        uplo,
        m,
        n,
    })
}

const TRANS_REAL_SYMMETRIC: &[Transpose] =
    &[Transpose::NoTrans, Transpose::Trans, Transpose::ConjTrans];
const TRANS_COMPLEX_SYMMETRIC: &[Transpose] = &[Transpose::NoTrans, Transpose::Trans];
const TRANS_HERMITIAN: &[Transpose] = &[Transpose::NoTrans, Transpose::ConjTrans];

/// Trans values a rank-k routine accepts, with the matching diagnostic.
fn rank_k_trans(routine: Routine, precision: Precision) -> (&'static [Transpose], &'static str) {
    if routine.is_hermitian() {
        (TRANS_HERMITIAN, "one of CblasNoTrans (111), CblasConjTrans (113)")
    } else if precision.is_complex() {
        (TRANS_COMPLEX_SYMMETRIC, "one of CblasNoTrans (111), CblasTrans (112)")
    } else {
        (
            TRANS_REAL_SYMMETRIC,
            "one of CblasNoTrans (111), CblasTrans (112), CblasConjTrans (113)",
        )
    }
}

/// syrk and herk. `S` is the scalar type (real for herk).
pub fn rank_k<S>(
    routine: Routine,
    precision: Precision,
    layout: CBLAS_LAYOUT,
    uplo: CBLAS_UPLO,
    trans: CBLAS_TRANSPOSE,
    n: blasint,
    k: blasint,
    alpha: *const S,
    lda: blasint,
    beta: *const S,
    ldc: blasint,
) -> BlasResult<RankKCall> {
    use position::rank_k as pos;
    let check = Check {
        routine: routine_name(routine, precision),
    };
    let (legal, legal_text) = rank_k_trans(routine, precision);

    let layout: Layout = check.enum_arg(layout, pos::ORDER, "Order")?;
    let uplo: Uplo = check.enum_arg(uplo, pos::UPLO, "Uplo")?;
    let trans = check.trans_in(trans, pos::TRANS, "Trans", legal, legal_text)?;
    check.dim(n, pos::N, "N")?;
    check.dim(k, pos::K, "K")?;
    check.scalar(alpha, pos::ALPHA, "alpha")?;

    let (ra, ca) = stored_shape(trans, n, k);
    check.ld(layout, lda, ra, ca, pos::LDA, "lda")?;
    check.scalar(beta, pos::BETA, "beta")?;
    check.ld(layout, ldc, n, n, pos::LDC, "ldc")?;

    Ok(RankKCall {
        layout,
        uplo,
        trans,
        n,
        k,
    })
}

/// syr2k and her2k. `A` is alpha's type, `B` beta's (real for her2k).
pub fn rank_2k<A, B>(
    routine: Routine,
    precision: Precision,
    layout: CBLAS_LAYOUT,
    uplo: CBLAS_UPLO,
    trans: CBLAS_TRANSPOSE,
    n: blasint,
    k: blasint,
    alpha: *const A,
    lda: blasint,
    ldb: blasint,
    beta: *const B,
    ldc: blasint,
) -> BlasResult<RankKCall> {
    use position::rank_2k as pos;
    let check = Check {
        routine: routine_name(routine, precision),
    };
    let (legal, legal_text) = rank_k_trans(routine, precision);

    let layout: Layout = check.enum_arg(layout, pos::ORDER, "Order")?;
    let uplo: Uplo = check.enum_arg(uplo, pos::UPLO, "Uplo")?;
    let trans = check.trans_in(trans, pos::TRANS, "Trans", legal, legal_text)?;
    check.dim(n, pos::N, "N")?;
    check.dim(k, pos::K, "K")?;
    check.scalar(alpha, pos::ALPHA, "alpha")?;

    let (r, c) = stored_shape(trans, n, k);
    check.ld(layout, lda, r, c, pos::LDA, "lda")?;
    check.ld(layout, ldb, r, c, pos::LDB, "ldb")?;
    check.scalar(beta, pos::BETA, "beta")?;
    check.ld(layout, ldc, n, n, pos::LDC, "ldc")?;

    Ok(RankKCall {
        layout,
        uplo,
        trans,
        n,
        k,
    })
}

/// trmm and trsm.
pub fn triangular<S>(
    routine: Routine,
    precision: Precision,
    layout: CBLAS_LAYOUT,
    side: CBLAS_SIDE,
    uplo: CBLAS_UPLO,
    trans: CBLAS_TRANSPOSE,
    diag: CBLAS_DIAG,
    m: blasint,
    n: blasint,
    alpha: *const S,
    lda: blasint,
    ldb: blasint,
) -> BlasResult<TriangularCall> {
    use position::triangular as pos;
    let check = Check {
        routine: routine_name(routine, precision),
    };

    let layout: Layout = check.enum_arg(layout, pos::ORDER, "Order")?;
    let side: Side = check.enum_arg(side, pos::SIDE, "Side")?;
    let uplo: Uplo = check.enum_arg(uplo, pos::UPLO, "Uplo")?;
    let trans: Transpose = check.enum_arg(trans, pos::TRANS_A, "TransA")?;
    let diag: Diag = check.enum_arg(diag, pos::DIAG, "Diag")?;
    check.dim(m, pos::M, "M")?;
    check.dim(n, pos::N, "N")?;
    check.scalar(alpha, pos::ALPHA, "alpha")?;

    let ka = match side {
        Side::Left => m,
        Side::Right => n,
    };
    check.ld(layout, lda, ka, ka, pos::LDA, "lda")?;
    check.ld(layout, ldb, m, n, pos::LDB, "ldb")?;

    Ok(TriangularCall {
        layout,
        side,
        uplo,
        trans,
        diag,
        m,
        n,
    })
}

// ── Matrix-vector validators ────────────────────────────────────────

pub fn gemv<S>(
    precision: Precision,
    layout: CBLAS_LAYOUT,
    trans: CBLAS_TRANSPOSE,
    m: blasint,
    n: blasint,
    alpha: *const S,
    lda: blasint,
    inc_x: blasint,
    beta: *const S,
    inc_y: blasint,
) -> BlasResult<GemvCall> {
    use position::gemv as pos;
    let check = Check {
        routine: routine_name(Routine::Gemv, precision),
    };

    let layout: Layout = check.enum_arg(layout, pos::ORDER, "Order")?;
    let trans: Transpose = check.enum_arg(trans, pos::TRANS, "TransA")?;
    check.dim(m, pos::M, "M")?;
    check.dim(n, pos::N, "N")?;
    check.scalar(alpha, pos::ALPHA, "alpha")?;
    check.ld(layout, lda, m, n, pos::LDA, "lda")?;
    check.inc(inc_x, pos::INC_X, "incX")?;
    check.scalar(beta, pos::BETA, "beta")?;
    check.inc(inc_y, pos::INC_Y, "incY")?;

    Ok(GemvCall {
        layout,
        trans,
        m,
        n,
    })
}

/// ger, geru and gerc.
pub fn ger<S>(
    routine: Routine,
    precision: Precision,
    layout: CBLAS_LAYOUT,
    m: blasint,
    n: blasint,
    alpha: *const S,
    inc_x: blasint,
    inc_y: blasint,
    lda: blasint,
) -> BlasResult<GerCall> {
    use position::ger as pos;
    let check = Check {
        routine: routine_name(routine, precision),
    };

    let layout: Layout = check.enum_arg(layout, pos::ORDER, "Order")?;
    check.dim(m, pos::M, "M")?;
    check.dim(n, pos::N, "N")?;
    check.scalar(alpha, pos::ALPHA, "alpha")?;
    check.inc(inc_x, pos::INC_X, "incX")?;
    check.inc(inc_y, pos::INC_Y, "incY")?;
    check.ld(layout, lda, m, n, pos::LDA, "lda")?;

    Ok(GerCall { layout, m, n })
}

/// symv and hemv.
pub fn symv<S>(
    routine: Routine,
    precision: Precision,
    layout: CBLAS_LAYOUT,
    uplo: CBLAS_UPLO,
    n: blasint,
    alpha: *const S,
    lda: blasint,
    inc_x: blasint,
    beta: *const S,
    inc_y: blasint,
) -> BlasResult<SymmetricVectorCall> {
    use position::symv as pos;
    let check = Check {
        routine: routine_name(routine, precision),
    };

    let layout: Layout = check.enum_arg(layout, pos::ORDER, "Order")?;
    let uplo: Uplo = check.enum_arg(uplo, pos::UPLO, "Uplo")?;
    check.dim(n, pos::N, "N")?;
    check.scalar(alpha, pos::ALPHA, "alpha")?;
    check.ld(layout, lda, n, n, pos::LDA, "lda")?;
    check.inc(inc_x, pos::INC_X, "incX")?;
    check.scalar(beta, pos::BETA, "beta")?;
    check.inc(inc_y, pos::INC_Y, "incY")?;

    Ok(SymmetricVectorCall { layout, uplo, n })
}

/// syr and her. `S` is the scalar type (real for her).
pub fn syr<S>(
    routine: Routine,
    precision: Precision,
    layout: CBLAS_LAYOUT,
    uplo: CBLAS_UPLO,
    n: blasint,
    alpha: *const S,
    inc_x: blasint,
    lda: blasint,
) -> BlasResult<SymmetricVectorCall> {
    use position::syr as pos;
    let check = Check {
        routine: routine_name(routine, precision),
    };

    let layout: Layout = check.enum_arg(layout, pos::ORDER, "Order")?;
    let uplo: Uplo = check.enum_arg(uplo, pos::UPLO, "Uplo")?;
    check.dim(n, pos::N, "N")?;
    check.scalar(alpha, pos::ALPHA, "alpha")?;
    check.inc(inc_x, pos::INC_X, "incX")?;
    check.ld(layout, lda, n, n, pos::LDA, "lda")?;

    Ok(SymmetricVectorCall { layout, uplo, n })
}

/// trmv and trsv.
pub fn triangular_vector(
    routine: Routine,
    precision: Precision,
    layout: CBLAS_LAYOUT,
    uplo: CBLAS_UPLO,
    trans: CBLAS_TRANSPOSE,
    diag: CBLAS_DIAG,
    n: blasint,
    lda: blasint,
    inc_x: blasint,
) -> BlasResult<TriangularVectorCall> {
    use position::triangular_vector as pos;
    let check = Check {
        routine: routine_name(routine, precision),
    };

    let layout: Layout = check.enum_arg(layout, pos::ORDER, "Order")?;
    let uplo: Uplo = check.enum_arg(uplo, pos::UPLO, "Uplo")?;
    let trans: Transpose = check.enum_arg(trans, pos::TRANS_A, "TransA")?;
    let diag: Diag = check.enum_arg(diag, pos::DIAG, "Diag")?;
    check.dim(n, pos::N, "N")?;
    check.ld(layout, lda, n, n, pos::LDA, "lda")?;
    check.inc(inc_x, pos::INC_X, "incX")?;

    Ok(TriangularVectorCall {
        layout,
        uplo,
        trans,
        diag,
        n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fortramp_core::abi::*;
    use fortramp_core::Complex64;

    const ONE: f64 = 1.0;

    fn dgemm(
        layout: CBLAS_LAYOUT,
        ta: CBLAS_TRANSPOSE,
        tb: CBLAS_TRANSPOSE,
        (m, n, k): (blasint, blasint, blasint),
        (lda, ldb, ldc): (blasint, blasint, blasint),
    ) -> BlasResult<GemmCall> {
        gemm(Precision::Double, layout, ta, tb, m, n, k, &ONE, lda, ldb, &ONE, ldc)
    }

    #[test]
    fn test_gemm_accepts_tight_leading_dims() {
        // Row-major A is M x K: lda >= K.
        let call = dgemm(CblasRowMajor, CblasNoTrans, CblasNoTrans, (2, 4, 3), (3, 4, 4)).unwrap();
        assert_eq!(call.m, 2);
        assert!(!call.is_empty());
        // Column-major A is M x K: lda >= M.
        assert!(dgemm(CblasColMajor, CblasNoTrans, CblasNoTrans, (2, 4, 3), (2, 3, 2)).is_ok());
        // Transposed A is stored K x M.
        assert!(dgemm(CblasColMajor, CblasTrans, CblasNoTrans, (2, 4, 3), (3, 3, 2)).is_ok());
    }

    #[test]
    fn test_gemm_first_failure_wins() {
        // Bad Order and bad TransA: Order is reported.
        let err = dgemm(0, 999, CblasNoTrans, (1, 1, 1), (1, 1, 1)).unwrap_err();
        assert_eq!(err.position(), position::gemm::ORDER);

        let err = dgemm(CblasRowMajor, CblasNoTrans, 999, (-1, 1, 1), (1, 1, 1)).unwrap_err();
        assert_eq!(err.position(), position::gemm::TRANS_B);

        let err = dgemm(CblasRowMajor, CblasNoTrans, CblasNoTrans, (1, 1, -3), (0, 0, 0))
            .unwrap_err();
        assert_eq!(err.position(), position::gemm::K);
        assert_eq!(
            err.to_string(),
            "Parameter 6 to routine cblas_dgemm was incorrect: K = -3, must be at least 0"
        );
    }

    #[test]
    fn test_leading_dimension_positions() {
        let lda = dgemm(CblasRowMajor, CblasNoTrans, CblasNoTrans, (3, 2, 4), (3, 2, 2))
            .unwrap_err();
        assert_eq!(lda.position(), 9);
        let ldb = dgemm(CblasRowMajor, CblasNoTrans, CblasNoTrans, (3, 2, 4), (4, 1, 2))
            .unwrap_err();
        assert_eq!(ldb.position(), 11);
        let ldc = dgemm(CblasColMajor, CblasNoTrans, CblasNoTrans, (3, 2, 4), (3, 4, 2))
            .unwrap_err();
        assert_eq!(ldc.position(), 14);
    }

    #[test]
    fn test_zero_extent_leading_dims_must_be_positive() {
        assert!(dgemm(CblasColMajor, CblasNoTrans, CblasNoTrans, (0, 0, 0), (1, 1, 1))
            .unwrap()
            .is_empty());
        let err = dgemm(CblasColMajor, CblasNoTrans, CblasNoTrans, (0, 0, 0), (0, 1, 1))
            .unwrap_err();
        assert_eq!(err.position(), position::gemm::LDA);
    }

    #[test]
    fn test_k_zero_is_not_empty() {
        let call = dgemm(CblasColMajor, CblasNoTrans, CblasNoTrans, (2, 2, 0), (2, 1, 2)).unwrap();
        assert!(!call.is_empty());
    }

    #[test]
    fn test_null_scalar_position() {
        let err = gemm::<f64>(
            Precision::Double,
            CblasRowMajor,
            CblasNoTrans,
            CblasNoTrans,
            1,
            1,
            1,
            std::ptr::null(),
            1,
            1,
            &ONE,
            1,
        )
        .unwrap_err();
        assert!(matches!(err, BlasError::NullScalar { position: 7, .. }));
    }

    #[test]
    fn test_symm_invalid_uplo() {
        let err = symm(
            Routine::Symm,
            Precision::Double,
            CblasRowMajor,
            CblasLeft,
            999,
            2,
            2,
            &ONE,
            2,
            2,
            &ONE,
            2,
        )
        .unwrap_err();
        assert_eq!(err.position(), position::symm::UPLO);
        assert_eq!(
            err.to_string(),
            "Parameter 3 to routine cblas_dsymm was incorrect: \
             Uplo = 999 is not one of CblasUpper (121), CblasLower (122)"
        );
    }

    #[test]
    fn test_symm_right_side_lda() {
        // Side = Right: A is N x N.
        let err = symm(
            Routine::Symm,
            Precision::Double,
            CblasColMajor,
            CblasRight,
            CblasUpper,
            5,
            3,
            &ONE,
            2,
            5,
            &ONE,
            5,
        )
        .unwrap_err();
        assert_eq!(err.position(), position::symm::LDA);
    }

    #[test]
    fn test_rank_k_trans_sets() {
        let z = Complex64::new(1.0, 0.0);
        let conj_trans = |routine: Routine, precision: Precision| {
            let call = match precision {
                Precision::Double => rank_k(
                    routine, precision, CblasColMajor, CblasUpper, CblasConjTrans, 2, 2, &ONE, 2,
                    &ONE, 2,
                ),
                _ => rank_k(
                    routine, precision, CblasColMajor, CblasUpper, CblasConjTrans, 2, 2, &z, 2, &z,
                    2,
                ),
            };
            call.map(|c| c.trans)
        };
        // Real syrk takes ConjTrans as a synonym for Trans.
        assert_eq!(conj_trans(Routine::Syrk, Precision::Double), Ok(Transpose::ConjTrans));
        // Complex syrk does not.
        let err = conj_trans(Routine::Syrk, Precision::ComplexDouble).unwrap_err();
        assert_eq!(err.position(), position::rank_k::TRANS);
        assert_eq!(err.routine(), "cblas_zsyrk");
        // Herk takes ConjTrans and rejects Trans.
        assert!(conj_trans(Routine::Herk, Precision::ComplexDouble).is_ok());
        let err = rank_k(
            Routine::Herk,
            Precision::ComplexDouble,
            CblasColMajor,
            CblasUpper,
            CblasTrans,
            2,
            2,
            &ONE,
            2,
            &ONE,
            2,
        )
        .unwrap_err();
        assert!(err.to_string().contains("CblasConjTrans (113)"));
    }

    #[test]
    fn test_rank_2k_ldb_position() {
        let err = rank_2k(
            Routine::Syr2k,
            Precision::Single,
            CblasRowMajor,
            CblasLower,
            CblasNoTrans,
            3,
            4,
            &1.0f32,
            4,
            3,
            &1.0f32,
            3,
        )
        .unwrap_err();
        assert_eq!(err.position(), position::rank_2k::LDB);
        assert_eq!(err.routine(), "cblas_ssyr2k");
    }

    #[test]
    fn test_triangular_positions() {
        let call = |diag, m, lda| {
            triangular(
                Routine::Trsm,
                Precision::Double,
                CblasRowMajor,
                CblasLeft,
                CblasUpper,
                CblasNoTrans,
                diag,
                m,
                3,
                &ONE,
                lda,
                3,
            )
        };
        assert_eq!(call(CblasUnit, 2, 2).unwrap().diag, Diag::Unit);
        assert_eq!(call(0, 2, 2).unwrap_err().position(), position::triangular::DIAG);
        assert_eq!(call(CblasUnit, -1, 2).unwrap_err().position(), position::triangular::M);
        assert_eq!(call(CblasUnit, 2, 1).unwrap_err().position(), position::triangular::LDA);
        assert!(call(CblasNonUnit, 0, 1).unwrap().is_empty());
    }

    #[test]
    fn test_gemv_positions_and_lengths() {
        let call = |trans, m, n, lda, inc_x, inc_y| {
            gemv(Precision::Double, CblasRowMajor, trans, m, n, &ONE, lda, inc_x, &ONE, inc_y)
        };
        let ok = call(CblasTrans, 2, 3, 3, -1, 2).unwrap();
        assert_eq!((ok.x_len(), ok.y_len()), (2, 3));
        // Row-major A is M x N: lda >= N.
        assert_eq!(call(CblasNoTrans, 2, 3, 2, 1, 1).unwrap_err().position(), 7);
        let err = call(CblasNoTrans, 2, 3, 3, 0, 1).unwrap_err();
        assert_eq!(err.position(), position::gemv::INC_X);
        assert_eq!(
            err.to_string(),
            "Parameter 9 to routine cblas_dgemv was incorrect: incX must not be zero"
        );
        assert_eq!(call(CblasNoTrans, 2, 3, 3, 1, 0).unwrap_err().position(), 12);
        // Only y decides emptiness.
        assert!(call(CblasNoTrans, 0, 3, 3, 1, 1).unwrap().is_empty());
        assert!(!call(CblasNoTrans, 2, 0, 1, 1, 1).unwrap().is_empty());
        assert!(call(CblasTrans, 2, 0, 1, 1, 1).unwrap().is_empty());
    }

    #[test]
    fn test_ger_checks_increments_before_lda() {
        let call = |inc_x, inc_y, lda| {
            ger(Routine::Ger, Precision::Single, CblasColMajor, 3, 2, &1.0f32, inc_x, inc_y, lda)
        };
        assert!(call(1, -1, 3).is_ok());
        assert_eq!(call(0, 0, 1).unwrap_err().position(), position::ger::INC_X);
        assert_eq!(call(1, 0, 1).unwrap_err().position(), position::ger::INC_Y);
        assert_eq!(call(1, 1, 2).unwrap_err().position(), position::ger::LDA);
        let err = call(0, 1, 3).unwrap_err();
        assert_eq!(err.routine(), "cblas_sger");
    }

    #[test]
    fn test_symmetric_vector_positions() {
        let z = Complex64::new(1.0, 0.0);
        let err = symv(
            Routine::Hemv,
            Precision::ComplexDouble,
            CblasRowMajor,
            CblasUpper,
            3,
            &z,
            3,
            1,
            std::ptr::null(),
            1,
        )
        .unwrap_err();
        assert!(matches!(err, BlasError::NullScalar { position: 9, param: "beta", .. }));
        assert_eq!(err.routine(), "cblas_zhemv");

        let err = syr(Routine::Her, Precision::ComplexDouble, CblasColMajor, 0, 2, &ONE, 1, 2)
            .unwrap_err();
        assert_eq!(err.position(), position::syr::UPLO);
        let err = syr(Routine::Syr, Precision::Double, CblasColMajor, CblasLower, 2, &ONE, 1, 1)
            .unwrap_err();
        assert_eq!(err.position(), position::syr::LDA);
    }

    #[test]
    fn test_triangular_vector_positions() {
        let call = |trans, diag, n, lda, inc_x| {
            triangular_vector(
                Routine::Trsv,
                Precision::Double,
                CblasColMajor,
                CblasLower,
                trans,
                diag,
                n,
                lda,
                inc_x,
            )
        };
        let ok = call(CblasConjTrans, CblasUnit, 3, 3, -2).unwrap();
        assert_eq!(ok.op().trans_a, Transpose::ConjTrans);
        assert_eq!(ok.op().diag, Diag::Unit);
        assert_eq!(call(114, CblasUnit, 3, 3, 1).unwrap_err().position(), 3);
        assert_eq!(call(CblasTrans, 130, 3, 3, 1).unwrap_err().position(), 4);
        assert_eq!(call(CblasTrans, CblasUnit, 3, 2, 1).unwrap_err().position(), 7);
        assert_eq!(call(CblasTrans, CblasUnit, 3, 3, 0).unwrap_err().position(), 9);
        assert!(call(CblasTrans, CblasUnit, 0, 1, 1).unwrap().is_empty());
    }

    #[test]
    fn test_records_carry_their_own_flags() {
        let call = TriangularCall {
            layout: Layout::RowMajor,
            side: Side::Right,
            uplo: Uplo::Lower,
            trans: Transpose::Trans,
            diag: Diag::Unit,
            m: 1,
            n: 1,
        };
        let op = call.op();
        assert_eq!(
            (op.side, op.uplo, op.trans_a, op.diag),
            (Side::Right, Uplo::Lower, Transpose::Trans, Diag::Unit)
        );
        let gemm = GemmCall {
            layout: Layout::RowMajor,
            trans_a: Transpose::ConjTrans,
            trans_b: Transpose::Trans,
            m: 1,
            n: 1,
            k: 1,
        };
        assert_eq!(
            (gemm.op().trans_a, gemm.op().trans_b),
            (Transpose::ConjTrans, Transpose::Trans)
        );
    }
}
