//! CBLAS-style layout, transpose, triangle, side and diagonal enumerations.
//!
//! The discriminants are the CBLAS integer values (101, 102, 111, ...), so a
//! variant casts straight to the `c_int` a C caller passes. The reverse
//! direction never casts: a raw integer is only accepted through `TryFrom`,
//! which rejects anything outside the legal set instead of coercing it.

use std::fmt;
use std::os::raw::c_int;

/// Memory layout for matrices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum Layout {
    /// Row-major (C-style): elements in a row are contiguous.
    #[default]
    RowMajor = 101,
    /// Column-major (Fortran-style): elements in a column are contiguous.
    ColMajor = 102,
}

/// Transpose operation for matrices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum Transpose {
    /// No transpose.
    #[default]
    NoTrans = 111,
    /// Transpose.
    Trans = 112,
    /// Conjugate transpose (for complex types).
    ConjTrans = 113,
}

/// BLAS triangle specifier (upper/lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum Uplo {
    #[default]
    Upper = 121,
    Lower = 122,
}

/// BLAS diagonal specifier (unit/non-unit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum Diag {
    #[default]
    NonUnit = 131,
    Unit = 132,
}

/// BLAS side specifier (left/right multiplication).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum Side {
    #[default]
    Left = 141,
    Right = 142,
}

impl Layout {
    pub const ALL: [Layout; 2] = [Layout::RowMajor, Layout::ColMajor];

    /// Minimum leading dimension of a stored `rows x cols` matrix.
    #[inline(always)]
    pub fn leading_dim<I>(self, rows: I, cols: I) -> I {
        match self {
            Layout::RowMajor => cols,
            Layout::ColMajor => rows,
        }
    }

    /// Linear index into a flat array for element (i, j) of an M x N matrix.
    #[inline(always)]
    pub fn index(self, i: usize, j: usize, ld: usize) -> usize {
        match self {
            Layout::RowMajor => i * ld + j,
            Layout::ColMajor => j * ld + i,
        }
    }
}

impl Transpose {
    pub const ALL: [Transpose; 3] = [Transpose::NoTrans, Transpose::Trans, Transpose::ConjTrans];

    #[inline]
    pub fn fortran_char(self) -> u8 {
        match self {
            Transpose::NoTrans => b'N',
            Transpose::Trans => b'T',
            Transpose::ConjTrans => b'C',
        }
    }

    /// Flag for the same operand read through the other storage order:
    /// `N -> T`, `T | C -> N`. Symmetric rank-k and matrix-vector flavour.
    #[inline]
    pub fn transposed(self) -> Transpose {
        match self {
            Transpose::NoTrans => Transpose::Trans,
            Transpose::Trans | Transpose::ConjTrans => Transpose::NoTrans,
        }
    }

    /// Hermitian rank-k flavour of [`Transpose::transposed`]: `N -> C`, `T | C -> N`.
    #[inline]
    pub fn adjoint(self) -> Transpose {
        match self {
            Transpose::NoTrans => Transpose::ConjTrans,
            Transpose::Trans | Transpose::ConjTrans => Transpose::NoTrans,
        }
    }
}

impl Uplo {
    pub const ALL: [Uplo; 2] = [Uplo::Upper, Uplo::Lower];

    #[inline]
    pub fn fortran_char(self) -> u8 {
        match self {
            Uplo::Upper => b'U',
            Uplo::Lower => b'L',
        }
    }

    /// The stored triangle seen through the other storage order.
    #[inline]
    pub fn opposite(self) -> Uplo {
        match self {
            Uplo::Upper => Uplo::Lower,
            Uplo::Lower => Uplo::Upper,
        }
    }
}

impl Diag {
    pub const ALL: [Diag; 2] = [Diag::NonUnit, Diag::Unit];

    #[inline]
    pub fn fortran_char(self) -> u8 {
        match self {
            Diag::NonUnit => b'N',
            Diag::Unit => b'U',
        }
    }
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Left, Side::Right];

    #[inline]
    pub fn fortran_char(self) -> u8 {
        match self {
            Side::Left => b'L',
            Side::Right => b'R',
        }
    }

    #[inline]
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

// ── Raw integer parsing ─────────────────────────────────────────────

/// Which enumeration a raw value was meant to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumKind {
    Layout,
    Transpose,
    Uplo,
    Diag,
    Side,
}

impl EnumKind {
    /// Human-readable legal set, used in diagnostics.
    pub fn legal(self) -> &'static str {
        match self {
            EnumKind::Layout => "one of CblasRowMajor (101), CblasColMajor (102)",
            EnumKind::Transpose => {
                "one of CblasNoTrans (111), CblasTrans (112), CblasConjTrans (113)"
            }
            EnumKind::Uplo => "one of CblasUpper (121), CblasLower (122)",
            EnumKind::Diag => "one of CblasNonUnit (131), CblasUnit (132)",
            EnumKind::Side => "one of CblasLeft (141), CblasRight (142)",
        }
    }
}

/// A raw C integer that is not a member of its enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumError {
    pub kind: EnumKind,
    pub value: c_int,
}

impl fmt::Display for EnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is not {}", self.value, self.kind.legal())
    }
}

impl std::error::Error for EnumError {}

macro_rules! impl_try_from_raw {
    ($ty:ident, $kind:ident, [$($variant:ident),+ $(,)?]) => {
        impl TryFrom<c_int> for $ty {
            type Error = EnumError;

            fn try_from(value: c_int) -> Result<Self, Self::Error> {
                $(
                    if value == $ty::$variant as c_int {
                        return Ok($ty::$variant);
                    }
                )+
                Err(EnumError { kind: EnumKind::$kind, value })
            }
        }
    };
}

impl_try_from_raw!(Layout, Layout, [RowMajor, ColMajor]);
impl_try_from_raw!(Transpose, Transpose, [NoTrans, Trans, ConjTrans]);
impl_try_from_raw!(Uplo, Uplo, [Upper, Lower]);
impl_try_from_raw!(Diag, Diag, [NonUnit, Unit]);
impl_try_from_raw!(Side, Side, [Left, Right]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cblas_values() {
        assert_eq!(Layout::RowMajor as c_int, 101);
        assert_eq!(Layout::ColMajor as c_int, 102);
        assert_eq!(Transpose::ConjTrans as c_int, 113);
        assert_eq!(Uplo::Lower as c_int, 122);
        assert_eq!(Diag::Unit as c_int, 132);
        assert_eq!(Side::Right as c_int, 142);
    }

    #[test]
    fn test_try_from_accepts_every_member() {
        for l in Layout::ALL {
            assert_eq!(Layout::try_from(l as c_int), Ok(l));
        }
        for t in Transpose::ALL {
            assert_eq!(Transpose::try_from(t as c_int), Ok(t));
        }
        for u in Uplo::ALL {
            assert_eq!(Uplo::try_from(u as c_int), Ok(u));
        }
        for d in Diag::ALL {
            assert_eq!(Diag::try_from(d as c_int), Ok(d));
        }
        for s in Side::ALL {
            assert_eq!(Side::try_from(s as c_int), Ok(s));
        }
    }

    #[test]
    fn test_try_from_rejects_neighbours() {
        // Values from adjacent enumerations must not be coerced.
        assert_eq!(
            Uplo::try_from(999),
            Err(EnumError {
                kind: EnumKind::Uplo,
                value: 999
            })
        );
        assert!(Layout::try_from(111).is_err());
        assert!(Transpose::try_from(121).is_err());
        assert!(Transpose::try_from(110).is_err());
        assert!(Diag::try_from(0).is_err());
        assert!(Side::try_from(-141).is_err());
    }

    #[test]
    fn test_fortran_chars() {
        assert_eq!(Transpose::NoTrans.fortran_char(), b'N');
        assert_eq!(Transpose::Trans.fortran_char(), b'T');
        assert_eq!(Transpose::ConjTrans.fortran_char(), b'C');
        assert_eq!(Uplo::Upper.fortran_char(), b'U');
        assert_eq!(Uplo::Lower.fortran_char(), b'L');
        assert_eq!(Diag::NonUnit.fortran_char(), b'N');
        assert_eq!(Diag::Unit.fortran_char(), b'U');
        assert_eq!(Side::Left.fortran_char(), b'L');
        assert_eq!(Side::Right.fortran_char(), b'R');
    }

    #[test]
    fn test_flips() {
        assert_eq!(Uplo::Upper.opposite(), Uplo::Lower);
        assert_eq!(Side::Right.opposite(), Side::Left);
        assert_eq!(Transpose::NoTrans.transposed(), Transpose::Trans);
        assert_eq!(Transpose::ConjTrans.transposed(), Transpose::NoTrans);
        assert_eq!(Transpose::NoTrans.adjoint(), Transpose::ConjTrans);
        assert_eq!(Transpose::ConjTrans.adjoint(), Transpose::NoTrans);
    }

    #[test]
    fn test_leading_dim_and_index() {
        // 2x3 matrix
        assert_eq!(Layout::RowMajor.leading_dim(2, 3), 3);
        assert_eq!(Layout::ColMajor.leading_dim(2, 3), 2);
        assert_eq!(Layout::RowMajor.index(1, 2, 3), 5);
        assert_eq!(Layout::ColMajor.index(1, 2, 2), 5);
    }

    #[test]
    fn test_enum_error_display() {
        let err = Side::try_from(7).unwrap_err();
        assert_eq!(
            err.to_string(),
            "7 is not one of CblasLeft (141), CblasRight (142)"
        );
    }
}
