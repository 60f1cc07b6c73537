//! Element types the trampoline can carry, tagged by BLAS precision.

use std::fmt::Debug;

use num_complex::{Complex32, Complex64};
use num_traits::Num;

/// BLAS precision, in the order of the `s`, `d`, `c`, `z` prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Precision {
    Single,
    Double,
    ComplexSingle,
    ComplexDouble,
}

impl Precision {
    pub const ALL: [Precision; 4] = [
        Precision::Single,
        Precision::Double,
        Precision::ComplexSingle,
        Precision::ComplexDouble,
    ];

    /// Routine-name prefix (`s`, `d`, `c`, `z`).
    pub fn prefix(self) -> char {
        match self {
            Precision::Single => 's',
            Precision::Double => 'd',
            Precision::ComplexSingle => 'c',
            Precision::ComplexDouble => 'z',
        }
    }

    pub fn is_complex(self) -> bool {
        matches!(self, Precision::ComplexSingle | Precision::ComplexDouble)
    }
}

/// A BLAS element: `f32`, `f64`, [`Complex32`] or [`Complex64`].
pub trait Element: Num + Copy + Debug + Send + Sync + 'static {
    /// The real type underneath (`Self` for real elements).
    type Real: Element<Real = Self::Real> + PartialOrd;

    const PRECISION: Precision;

    fn conj(self) -> Self;

    fn re(self) -> Self::Real;

    fn from_real(re: Self::Real) -> Self;

    /// Modulus as `f64`, for tolerance checks.
    fn magnitude(self) -> f64;
}

impl Element for f32 {
    type Real = f32;
    const PRECISION: Precision = Precision::Single;

    #[inline]
    fn conj(self) -> Self {
        self
    }
    #[inline]
    fn re(self) -> f32 {
        self
    }
    #[inline]
    fn from_real(re: f32) -> Self {
        re
    }
    #[inline]
    fn magnitude(self) -> f64 {
        (self as f64).abs()
    }
}

impl Element for f64 {
    type Real = f64;
    const PRECISION: Precision = Precision::Double;

    #[inline]
    fn conj(self) -> Self {
        self
    }
    #[inline]
    fn re(self) -> f64 {
        self
    }
    #[inline]
    fn from_real(re: f64) -> Self {
        re
    }
    #[inline]
    fn magnitude(self) -> f64 {
        self.abs()
    }
}

impl Element for Complex32 {
    type Real = f32;
    const PRECISION: Precision = Precision::ComplexSingle;

    #[inline]
    fn conj(self) -> Self {
        Complex32::new(self.re, -self.im)
    }
    #[inline]
    fn re(self) -> f32 {
        self.re
    }
    #[inline]
    fn from_real(re: f32) -> Self {
        Complex32::new(re, 0.0)
    }
    #[inline]
    fn magnitude(self) -> f64 {
        self.norm() as f64
    }
}

impl Element for Complex64 {
    type Real = f64;
    const PRECISION: Precision = Precision::ComplexDouble;

    #[inline]
    fn conj(self) -> Self {
        Complex64::new(self.re, -self.im)
    }
    #[inline]
    fn re(self) -> f64 {
        self.re
    }
    #[inline]
    fn from_real(re: f64) -> Self {
        Complex64::new(re, 0.0)
    }
    #[inline]
    fn magnitude(self) -> f64 {
        self.norm()
    }
}
