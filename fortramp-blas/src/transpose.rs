//! Layout Transposer: re-expresses a CBLAS call as the equivalent
//! column-major Fortran call without moving matrix data.
//!
//! A row-major `r x c` matrix with leading dimension `ld` is, byte for byte,
//! the column-major `c x r` matrix with the same `ld`: its transpose. So a
//! row-major problem is solved by asking the provider for the transposed
//! problem. What that means depends on the routine family:
//!
//! ```text
//!   General          C = op(A) op(B)     =>  C^T = op(B)^T op(A)^T
//!                    swap A<->B, M<->N, TransA<->TransB
//!   Symmetric        C = S B  (Left)     =>  C^T = B^T S^T  (Right)
//!                    swap M<->N, flip Side, flip Uplo
//!   RankK            C = A A^T (N)       =>  C^T = (A^T)^T (A^T)  (T)
//!                    flip Uplo, N<->T
//!   HermitianRankK   C = A A^H (N)       =>  conj(C) on the other triangle
//!                    flip Uplo, N<->C, conjugate alpha (her2k)
//!   Triangular       B = op(T) B  (Left) =>  B^T = B^T op(T)^T  (Right)
//!                    swap M<->N, flip Side, flip Uplo; Trans, Diag unchanged
//!
//!   GeneralVector    y = op(A) x         =>  y = op'(A^T) x
//!                    swap M<->N, N->T, T->N, C->N on conjugated vectors
//!   RankOne          A += x y^T          =>  A^T += y x^T
//!                    swap M<->N, swap x<->y
//!   ConjugateRankOne A += x y^H          =>  A^T += conj(y) x^T
//!                    swap M<->N, swap x<->y, conjugated vectors
//!   SymmetricVector  S symmetric         =>  S^T = S on the other triangle
//!                    flip Uplo
//!   HermitianVector  H Hermitian         =>  H^T = conj(H) on the other triangle
//!                    flip Uplo, conjugated vectors, conjugate alpha
//!   TriangularVector x = op(T) x         =>  x = op'(T^T) x
//!                    flip Uplo, N->T, T->N, C->N on conjugated vectors
//! ```
//!
//! Leading dimensions, increments and data pointers only change roles, never
//! values. The one exception is a conjugated vector: a complex matrix-vector
//! call whose row-major form needs conj(A) is solved as the conjugate of the
//! whole problem, so its vectors are conjugated around the provider call.
//! Column-major calls pass through unchanged.

use fortramp_core::{Diag, Layout, Side, Transpose, Uplo};

/// The enum modifiers of one call.
///
/// Every field has a value. A routine sets the fields it takes (rank-k and
/// matrix-vector routines keep their single Trans in `trans_a`); the rest
/// hold their defaults and are never passed to a provider for that routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OpDescriptor {
    pub trans_a: Transpose,
    pub trans_b: Transpose,
    pub side: Side,
    pub uplo: Uplo,
    pub diag: Diag,
}

/// Routine families sharing one flip table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// gemm
    General,
    /// symm, hemm
    Symmetric,
    /// syrk, syr2k
    RankK,
    /// herk, her2k
    HermitianRankK,
    /// trmm, trsm
    Triangular,
    /// gemv
    GeneralVector,
    /// ger, geru
    RankOne,
    /// gerc
    ConjugateRankOne,
    /// symv, syr
    SymmetricVector,
    /// hemv, her
    HermitianVector,
    /// trmv, trsv
    TriangularVector,
}

/// The column-major call equivalent to the requested one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColMajorPlan {
    pub op: OpDescriptor,
    /// Exchange the A and B operands, or the x and y vectors (pointer and
    /// leading dimension or increment).
    pub swap_operands: bool,
    /// Exchange M and N.
    pub swap_extents: bool,
    /// Pass conj(alpha) instead of alpha.
    pub conjugate_alpha: bool,
    /// Conjugate the vectors around the provider call. Only meaningful for
    /// complex elements.
    pub conjugate_vectors: bool,
}

impl ColMajorPlan {
    pub fn identity(op: OpDescriptor) -> Self {
        ColMajorPlan {
            op,
            swap_operands: false,
            swap_extents: false,
            conjugate_alpha: false,
            conjugate_vectors: false,
        }
    }

    #[inline]
    pub fn is_identity(&self) -> bool {
        !(self.swap_operands
            || self.swap_extents
            || self.conjugate_alpha
            || self.conjugate_vectors)
    }
}

impl Family {
    pub const ALL: [Family; 11] = [
        Family::General,
        Family::Symmetric,
        Family::RankK,
        Family::HermitianRankK,
        Family::Triangular,
        Family::GeneralVector,
        Family::RankOne,
        Family::ConjugateRankOne,
        Family::SymmetricVector,
        Family::HermitianVector,
        Family::TriangularVector,
    ];

    /// Plan the column-major call for `op` stored in `layout`.
    pub fn plan(self, layout: Layout, op: OpDescriptor) -> ColMajorPlan {
        if layout == Layout::ColMajor {
            return ColMajorPlan::identity(op);
        }

        let mut plan = ColMajorPlan::identity(op);
        match self {
            Family::General => {
                plan.op.trans_a = op.trans_b;
                plan.op.trans_b = op.trans_a;
                plan.swap_operands = true;
                plan.swap_extents = true;
            }
            Family::Symmetric | Family::Triangular => {
                plan.op.side = op.side.opposite();
                plan.op.uplo = op.uplo.opposite();
                plan.swap_extents = true;
            }
            Family::RankK => {
                plan.op.trans_a = op.trans_a.transposed();
                plan.op.uplo = op.uplo.opposite();
            }
            Family::HermitianRankK => {
                plan.op.trans_a = op.trans_a.adjoint();
                plan.op.uplo = op.uplo.opposite();
                plan.conjugate_alpha = true;
            }
            Family::GeneralVector => {
                plan.op.trans_a = op.trans_a.transposed();
                plan.swap_extents = true;
                if op.trans_a == Transpose::ConjTrans {
                    plan.conjugate_alpha = true;
                    plan.conjugate_vectors = true;
                }
            }
            Family::RankOne => {
                plan.swap_operands = true;
                plan.swap_extents = true;
            }
            Family::ConjugateRankOne => {
                plan.swap_operands = true;
                plan.swap_extents = true;
                plan.conjugate_vectors = true;
            }
            Family::SymmetricVector => {
                plan.op.uplo = op.uplo.opposite();
            }
            Family::HermitianVector => {
                plan.op.uplo = op.uplo.opposite();
                plan.conjugate_alpha = true;
                plan.conjugate_vectors = true;
            }
            Family::TriangularVector => {
                plan.op.trans_a = op.trans_a.transposed();
                plan.op.uplo = op.uplo.opposite();
                plan.conjugate_vectors = op.trans_a == Transpose::ConjTrans;
            }
        }
        plan
    }
}
