//! Routine identities and their CBLAS / Fortran names.

use crate::element::Precision;

/// A Level-2 or Level-3 routine, independent of precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Routine {
    Gemv,
    Ger,
    Geru,
    Gerc,
    Symv,
    Hemv,
    Syr,
    Her,
    Trmv,
    Trsv,
    Gemm,
    Symm,
    Hemm,
    Syrk,
    Herk,
    Syr2k,
    Her2k,
    Trmm,
    Trsm,
}

macro_rules! names {
    ($($routine:ident => [$($prec:ident: $cblas:literal, $fortran:literal);+ $(;)?]),+ $(,)?) => {
        impl Routine {
            /// CBLAS entry point name, e.g. `cblas_dsymm`.
            ///
            /// `None` for combinations that do not exist (`dhemm`, `cger`).
            pub fn cblas_name(self, precision: Precision) -> Option<&'static str> {
                match (self, precision) {
                    $($( (Routine::$routine, Precision::$prec) => Some($cblas), )+)+
                    _ => None,
                }
            }

            /// Undecorated Fortran name, e.g. `dsymm`.
            pub fn fortran_name(self, precision: Precision) -> Option<&'static str> {
                match (self, precision) {
                    $($( (Routine::$routine, Precision::$prec) => Some($fortran), )+)+
                    _ => None,
                }
            }
        }
    };
}

names! {
    Gemv => [
        Single: "cblas_sgemv", "sgemv";
        Double: "cblas_dgemv", "dgemv";
        ComplexSingle: "cblas_cgemv", "cgemv";
        ComplexDouble: "cblas_zgemv", "zgemv";
    ],
    Ger => [
        Single: "cblas_sger", "sger";
        Double: "cblas_dger", "dger";
    ],
    Geru => [
        ComplexSingle: "cblas_cgeru", "cgeru";
        ComplexDouble: "cblas_zgeru", "zgeru";
    ],
    Gerc => [
        ComplexSingle: "cblas_cgerc", "cgerc";
        ComplexDouble: "cblas_zgerc", "zgerc";
    ],
    Symv => [
        Single: "cblas_ssymv", "ssymv";
        Double: "cblas_dsymv", "dsymv";
    ],
    Hemv => [
        ComplexSingle: "cblas_chemv", "chemv";
        ComplexDouble: "cblas_zhemv", "zhemv";
    ],
    Syr => [
        Single: "cblas_ssyr", "ssyr";
        Double: "cblas_dsyr", "dsyr";
    ],
    Her => [
        ComplexSingle: "cblas_cher", "cher";
        ComplexDouble: "cblas_zher", "zher";
    ],
    Trmv => [
        Single: "cblas_strmv", "strmv";
        Double: "cblas_dtrmv", "dtrmv";
        ComplexSingle: "cblas_ctrmv", "ctrmv";
        ComplexDouble: "cblas_ztrmv", "ztrmv";
    ],
    Trsv => [
        Single: "cblas_strsv", "strsv";
        Double: "cblas_dtrsv", "dtrsv";
        ComplexSingle: "cblas_ctrsv", "ctrsv";
        ComplexDouble: "cblas_ztrsv", "ztrsv";
    ],
    Gemm => [
        Single: "cblas_sgemm", "sgemm";
        Double: "cblas_dgemm", "dgemm";
        ComplexSingle: "cblas_cgemm", "cgemm";
        ComplexDouble: "cblas_zgemm", "zgemm";
    ],
    Symm => [
        Single: "cblas_ssymm", "ssymm";
        Double: "cblas_dsymm", "dsymm";
        ComplexSingle: "cblas_csymm", "csymm";
        ComplexDouble: "cblas_zsymm", "zsymm";
    ],
    Hemm => [
        ComplexSingle: "cblas_chemm", "chemm";
        ComplexDouble: "cblas_zhemm", "zhemm";
    ],
    Syrk => [
        Single: "cblas_ssyrk", "ssyrk";
        Double: "cblas_dsyrk", "dsyrk";
        ComplexSingle: "cblas_csyrk", "csyrk";
        ComplexDouble: "cblas_zsyrk", "zsyrk";
    ],
    Herk => [
        ComplexSingle: "cblas_cherk", "cherk";
        ComplexDouble: "cblas_zherk", "zherk";
    ],
    Syr2k => [
        Single: "cblas_ssyr2k", "ssyr2k";
        Double: "cblas_dsyr2k", "dsyr2k";
        ComplexSingle: "cblas_csyr2k", "csyr2k";
        ComplexDouble: "cblas_zsyr2k", "zsyr2k";
    ],
    Her2k => [
        ComplexSingle: "cblas_cher2k", "cher2k";
        ComplexDouble: "cblas_zher2k", "zher2k";
    ],
    Trmm => [
        Single: "cblas_strmm", "strmm";
        Double: "cblas_dtrmm", "dtrmm";
        ComplexSingle: "cblas_ctrmm", "ctrmm";
        ComplexDouble: "cblas_ztrmm", "ztrmm";
    ],
    Trsm => [
        Single: "cblas_strsm", "strsm";
        Double: "cblas_dtrsm", "dtrsm";
        ComplexSingle: "cblas_ctrsm", "ctrsm";
        ComplexDouble: "cblas_ztrsm", "ztrsm";
    ],
}

impl Routine {
    pub const ALL: [Routine; 19] = [
        Routine::Gemv,
        Routine::Ger,
        Routine::Geru,
        Routine::Gerc,
        Routine::Symv,
        Routine::Hemv,
        Routine::Syr,
        Routine::Her,
        Routine::Trmv,
        Routine::Trsv,
        Routine::Gemm,
        Routine::Symm,
        Routine::Hemm,
        Routine::Syrk,
        Routine::Herk,
        Routine::Syr2k,
        Routine::Her2k,
        Routine::Trmm,
        Routine::Trsm,
    ];

    /// Hermitian routines only exist in complex precisions.
    pub fn is_hermitian(self) -> bool {
        matches!(
            self,
            Routine::Hemv | Routine::Her | Routine::Hemm | Routine::Herk | Routine::Her2k
        )
    }

    /// Matrix-vector routines, the ones that take vector increments.
    pub fn is_level2(self) -> bool {
        matches!(
            self,
            Routine::Gemv
                | Routine::Ger
                | Routine::Geru
                | Routine::Gerc
                | Routine::Symv
                | Routine::Hemv
                | Routine::Syr
                | Routine::Her
                | Routine::Trmv
                | Routine::Trsv
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_follow_prefix_convention() {
        let mut count = 0;
        for routine in Routine::ALL {
            for precision in Precision::ALL {
                let cblas = routine.cblas_name(precision);
                let fortran = routine.fortran_name(precision);
                assert_eq!(cblas.is_some(), fortran.is_some(), "{routine:?} {precision:?}");
                if routine.is_hermitian() && !precision.is_complex() {
                    assert!(cblas.is_none(), "{routine:?} {precision:?}");
                }
                if let (Some(cblas), Some(fortran)) = (cblas, fortran) {
                    assert!(fortran.starts_with(precision.prefix()));
                    assert_eq!(cblas, format!("cblas_{fortran}"));
                    count += 1;
                }
            }
        }
        assert_eq!(count, 56);
    }

    #[test]
    fn test_rank_one_and_symmetric_vector_split_by_domain() {
        for precision in Precision::ALL {
            let real = !precision.is_complex();
            assert_eq!(Routine::Ger.cblas_name(precision).is_some(), real);
            assert_eq!(Routine::Symv.cblas_name(precision).is_some(), real);
            assert_eq!(Routine::Syr.cblas_name(precision).is_some(), real);
            assert_eq!(Routine::Geru.cblas_name(precision).is_some(), !real);
            assert_eq!(Routine::Gerc.cblas_name(precision).is_some(), !real);
        }
        assert!(Routine::Trsv.is_level2());
        assert!(!Routine::Trsm.is_level2());
    }
}
