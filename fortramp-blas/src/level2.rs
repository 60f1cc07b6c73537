//! Typed Level-2 entry points: GEMV, the rank-1 updates, SYMV/HEMV,
//! SYR/HER, TRMV and TRSV.
//!
//! Scalars follow `cblas.h`: real by value, complex by address, and HER's
//! alpha is real. Increments may be negative; a negative increment walks
//! the vector from its last stored element, as in the Fortran BLAS.

use fortramp_core::abi::{CBLAS_DIAG, CBLAS_LAYOUT, CBLAS_TRANSPOSE, CBLAS_UPLO};
use fortramp_core::{blasint, BlasResult, Complex32, Complex64};

use crate::dispatch::Trampoline;

macro_rules! real_level2 {
    ($t:ty: $gemv:ident, $ger:ident, $symv:ident, $syr:ident, $trmv:ident, $trsv:ident) => {
        impl Trampoline {
            /// # Safety
            ///
            /// See [`Trampoline::gemv`].
            pub unsafe fn $gemv(
                &self,
                layout: CBLAS_LAYOUT,
                trans: CBLAS_TRANSPOSE,
                m: blasint,
                n: blasint,
                alpha: $t,
                a: *const $t,
                lda: blasint,
                x: *const $t,
                inc_x: blasint,
                beta: $t,
                y: *mut $t,
                inc_y: blasint,
            ) -> BlasResult<()> {
                self.gemv::<$t>(layout, trans, m, n, &alpha, a, lda, x, inc_x, &beta, y, inc_y)
            }

            /// # Safety
            ///
            /// See [`Trampoline::ger`].
            pub unsafe fn $ger(
                &self,
                layout: CBLAS_LAYOUT,
                m: blasint,
                n: blasint,
                alpha: $t,
                x: *const $t,
                inc_x: blasint,
                y: *const $t,
                inc_y: blasint,
                a: *mut $t,
                lda: blasint,
            ) -> BlasResult<()> {
                self.ger::<$t>(layout, m, n, &alpha, x, inc_x, y, inc_y, a, lda)
            }

            /// # Safety
            ///
            /// See [`Trampoline::symv`].
            pub unsafe fn $symv(
                &self,
                layout: CBLAS_LAYOUT,
                uplo: CBLAS_UPLO,
                n: blasint,
                alpha: $t,
                a: *const $t,
                lda: blasint,
                x: *const $t,
                inc_x: blasint,
                beta: $t,
                y: *mut $t,
                inc_y: blasint,
            ) -> BlasResult<()> {
                self.symv::<$t>(layout, uplo, n, &alpha, a, lda, x, inc_x, &beta, y, inc_y)
            }

            /// # Safety
            ///
            /// See [`Trampoline::syr`].
            pub unsafe fn $syr(
                &self,
                layout: CBLAS_LAYOUT,
                uplo: CBLAS_UPLO,
                n: blasint,
                alpha: $t,
                x: *const $t,
                inc_x: blasint,
                a: *mut $t,
                lda: blasint,
            ) -> BlasResult<()> {
                self.syr::<$t>(layout, uplo, n, &alpha, x, inc_x, a, lda)
            }

            /// # Safety
            ///
            /// See [`Trampoline::trmv`].
            pub unsafe fn $trmv(
                &self,
                layout: CBLAS_LAYOUT,
                uplo: CBLAS_UPLO,
                trans_a: CBLAS_TRANSPOSE,
                diag: CBLAS_DIAG,
                n: blasint,
                a: *const $t,
                lda: blasint,
                x: *mut $t,
                inc_x: blasint,
            ) -> BlasResult<()> {
                self.trmv::<$t>(layout, uplo, trans_a, diag, n, a, lda, x, inc_x)
            }

            /// # Safety
            ///
            /// See [`Trampoline::trsv`].
            pub unsafe fn $trsv(
                &self,
                layout: CBLAS_LAYOUT,
                uplo: CBLAS_UPLO,
                trans_a: CBLAS_TRANSPOSE,
                diag: CBLAS_DIAG,
                n: blasint,
                a: *const $t,
                lda: blasint,
                x: *mut $t,
                inc_x: blasint,
            ) -> BlasResult<()> {
                self.trsv::<$t>(layout, uplo, trans_a, diag, n, a, lda, x, inc_x)
            }
        }
    };
}

macro_rules! complex_level2 {
    ($t:ty, $r:ty: $gemv:ident, $geru:ident, $gerc:ident, $hemv:ident, $her:ident,
     $trmv:ident, $trsv:ident) => {
        impl Trampoline {
            /// # Safety
            ///
            /// See [`Trampoline::gemv`].
            pub unsafe fn $gemv(
                &self,
                layout: CBLAS_LAYOUT,
                trans: CBLAS_TRANSPOSE,
                m: blasint,
                n: blasint,
                alpha: *const $t,
                a: *const $t,
                lda: blasint,
                x: *const $t,
                inc_x: blasint,
                beta: *const $t,
                y: *mut $t,
                inc_y: blasint,
            ) -> BlasResult<()> {
                self.gemv::<$t>(layout, trans, m, n, alpha, a, lda, x, inc_x, beta, y, inc_y)
            }

            /// # Safety
            ///
            /// See [`Trampoline::ger`].
            pub unsafe fn $geru(
                &self,
                layout: CBLAS_LAYOUT,
                m: blasint,
                n: blasint,
                alpha: *const $t,
                x: *const $t,
                inc_x: blasint,
                y: *const $t,
                inc_y: blasint,
                a: *mut $t,
                lda: blasint,
            ) -> BlasResult<()> {
                self.geru::<$t>(layout, m, n, alpha, x, inc_x, y, inc_y, a, lda)
            }

            /// # Safety
            ///
            /// See [`Trampoline::ger`].
            pub unsafe fn $gerc(
                &self,
                layout: CBLAS_LAYOUT,
                m: blasint,
                n: blasint,
                alpha: *const $t,
                x: *const $t,
                inc_x: blasint,
                y: *const $t,
                inc_y: blasint,
                a: *mut $t,
                lda: blasint,
            ) -> BlasResult<()> {
                self.gerc::<$t>(layout, m, n, alpha, x, inc_x, y, inc_y, a, lda)
            }

            /// # Safety
            ///
            /// See [`Trampoline::symv`].
            pub unsafe fn $hemv(
                &self,
                layout: CBLAS_LAYOUT,
                uplo: CBLAS_UPLO,
                n: blasint,
                alpha: *const $t,
                a: *const $t,
                lda: blasint,
                x: *const $t,
                inc_x: blasint,
                beta: *const $t,
                y: *mut $t,
                inc_y: blasint,
            ) -> BlasResult<()> {
                self.hemv::<$t>(layout, uplo, n, alpha, a, lda, x, inc_x, beta, y, inc_y)
            }

            /// # Safety
            ///
            /// See [`Trampoline::syr`].
            pub unsafe fn $her(
                &self,
                layout: CBLAS_LAYOUT,
                uplo: CBLAS_UPLO,
                n: blasint,
                alpha: $r,
                x: *const $t,
                inc_x: blasint,
                a: *mut $t,
                lda: blasint,
            ) -> BlasResult<()> {
                self.her::<$t>(layout, uplo, n, &alpha, x, inc_x, a, lda)
            }

            /// # Safety
            ///
            /// See [`Trampoline::trmv`].
            pub unsafe fn $trmv(
                &self,
                layout: CBLAS_LAYOUT,
                uplo: CBLAS_UPLO,
                trans_a: CBLAS_TRANSPOSE,
                diag: CBLAS_DIAG,
                n: blasint,
                a: *const $t,
                lda: blasint,
                x: *mut $t,
                inc_x: blasint,
            ) -> BlasResult<()> {
                self.trmv::<$t>(layout, uplo, trans_a, diag, n, a, lda, x, inc_x)
            }

            /// # Safety
            ///
            /// See [`Trampoline::trsv`].
            pub unsafe fn $trsv(
                &self,
                layout: CBLAS_LAYOUT,
                uplo: CBLAS_UPLO,
                trans_a: CBLAS_TRANSPOSE,
                diag: CBLAS_DIAG,
                n: blasint,
                a: *const $t,
                lda: blasint,
                x: *mut $t,
                inc_x: blasint,
            ) -> BlasResult<()> {
                self.trsv::<$t>(layout, uplo, trans_a, diag, n, a, lda, x, inc_x)
            }
        }
    };
}

real_level2!(f32: sgemv, sger, ssymv, ssyr, strmv, strsv);
real_level2!(f64: dgemv, dger, dsymv, dsyr, dtrmv, dtrsv);
complex_level2!(Complex32, f32: cgemv, cgeru, cgerc, chemv, cher, ctrmv, ctrsv);
complex_level2!(Complex64, f64: zgemv, zgeru, zgerc, zhemv, zher, ztrmv, ztrsv);

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::os::raw::{c_char, c_int};
    use std::sync::{Arc, Mutex};

    use fortramp_core::abi::*;
    use fortramp_core::{BlasError, Diag, FortranBlas, Layout, Transpose, Uplo};
    use fortramp_ref::fixtures::{
        gaps_intact, max_abs_diff_vec, oracle, padding_intact, random_vec, rng, strided,
        unstrided, Mat, Sample,
    };
    use fortramp_ref::fortran;

    use crate::dispatch::{Dispatch, HermitianDispatch, RealDispatch};
    use crate::validate::position;

    fn reference() -> Trampoline {
        let _ = env_logger::builder().is_test(true).try_init();
        Trampoline::new(fortramp_ref::provider()).with_handler(|e| panic!("unexpected error: {e}"))
    }

    fn padded(layout: Layout, rows: usize, cols: usize) -> usize {
        layout.leading_dim(rows, cols).max(1) + 2
    }

    fn bi(x: usize) -> blasint {
        x as blasint
    }

    /// Everything strictly outside the `uplo` triangle is bit-identical.
    fn strictly_outside_untouched<T: Sample>(got: &Mat<T>, before: &Mat<T>, uplo: Uplo) -> bool {
        let n = got.rows();
        (0..n).all(|i| {
            (0..n).all(|j| {
                let outside = match uplo {
                    Uplo::Upper => i > j,
                    Uplo::Lower => i < j,
                };
                !outside || got.get(i, j) == before.get(i, j)
            })
        })
    }

    /// Increment pairs for (x, y): unit, strided, and backwards.
    const INCREMENTS: [(blasint, blasint); 3] = [(1, 1), (2, -1), (-3, 2)];

    fn lengths(trans: Transpose, m: usize, n: usize) -> (usize, usize) {
        match trans {
            Transpose::NoTrans => (n, m),
            _ => (m, n),
        }
    }

    // =====================================================================
    // Layout equivalence against the dense oracle
    // =====================================================================

    fn check_gemv<T: Sample + Dispatch>(seed: u64) {
        let tramp = reference();
        let mut rng = rng(seed);
        let (m, n) = (3, 4);
        for layout in Layout::ALL {
            for trans in Transpose::ALL {
                for (inc_x, inc_y) in INCREMENTS {
                    let (len_x, len_y) = lengths(trans, m, n);
                    let a = Mat::<T>::random(m, n, &mut rng);
                    let x = random_vec::<T>(len_x, &mut rng);
                    let y = random_vec::<T>(len_y, &mut rng);
                    let (alpha, beta) = (T::sample(&mut rng), T::sample(&mut rng));

                    let lda = padded(layout, m, n);
                    let a_flat = a.store(layout, lda);
                    let x_flat = strided(&x, inc_x as isize);
                    let mut y_flat = strided(&y, inc_y as isize);
                    unsafe {
                        tramp
                            .gemv::<T>(
                                layout as c_int, trans as c_int, bi(m), bi(n), &alpha,
                                a_flat.as_ptr(), bi(lda), x_flat.as_ptr(), inc_x, &beta,
                                y_flat.as_mut_ptr(), inc_y,
                            )
                            .unwrap();
                    }

                    let got = unstrided(&y_flat, len_y, inc_y as isize);
                    let want = oracle::gemv(trans, alpha, &a, &x, beta, &y);
                    assert!(
                        max_abs_diff_vec(&got, &want) < T::tolerance(),
                        "{:?} {layout:?} {trans:?} incX={inc_x} incY={inc_y}",
                        T::PRECISION
                    );
                    assert!(gaps_intact(&y_flat, len_y, inc_y as isize));
                    assert_eq!(x_flat, strided(&x, inc_x as isize), "x was written");
                }
            }
        }
    }

    #[test]
    fn test_gemv_layout_equivalence() {
        check_gemv::<f32>(1);
        check_gemv::<f64>(2);
        check_gemv::<Complex32>(3);
        check_gemv::<Complex64>(4);
    }

    fn check_ger<T: Sample>(
        seed: u64,
        conjugate_y: bool,
        call: impl Fn(
            CBLAS_LAYOUT,
            blasint,
            blasint,
            &T,
            *const T,
            blasint,
            *const T,
            blasint,
            *mut T,
            blasint,
        ) -> BlasResult<()>,
    ) {
        let mut rng = rng(seed);
        let (m, n) = (3, 4);
        for layout in Layout::ALL {
            for (inc_x, inc_y) in INCREMENTS {
                let a = Mat::<T>::random(m, n, &mut rng);
                let x = random_vec::<T>(m, &mut rng);
                let y = random_vec::<T>(n, &mut rng);
                let alpha = T::sample(&mut rng);

                let lda = padded(layout, m, n);
                let mut a_flat = a.store(layout, lda);
                let x_flat = strided(&x, inc_x as isize);
                let y_flat = strided(&y, inc_y as isize);
                call(
                    layout as c_int, bi(m), bi(n), &alpha, x_flat.as_ptr(), inc_x,
                    y_flat.as_ptr(), inc_y, a_flat.as_mut_ptr(), bi(lda),
                )
                .unwrap();

                let got = Mat::load(layout, m, n, lda, &a_flat);
                let want = oracle::ger(conjugate_y, alpha, &x, &y, &a);
                assert!(
                    got.max_abs_diff(&want) < T::tolerance(),
                    "{:?} conjugate={conjugate_y} {layout:?} incX={inc_x} incY={inc_y}",
                    T::PRECISION
                );
                assert!(padding_intact(layout, m, n, lda, &a_flat));
                assert_eq!(x_flat, strided(&x, inc_x as isize));
                assert_eq!(y_flat, strided(&y, inc_y as isize));
            }
        }
    }

    fn check_ger_for<T: Sample + RealDispatch>(seed: u64) {
        let tramp = reference();
        check_ger::<T>(seed, false, |l, m, n, alpha, x, ix, y, iy, a, lda| unsafe {
            tramp.ger::<T>(l, m, n, alpha, x, ix, y, iy, a, lda)
        });
    }

    fn check_geru_for<T: Sample + HermitianDispatch>(seed: u64) {
        let tramp = reference();
        check_ger::<T>(seed, false, |l, m, n, alpha, x, ix, y, iy, a, lda| unsafe {
            tramp.geru::<T>(l, m, n, alpha, x, ix, y, iy, a, lda)
        });
    }

    fn check_gerc_for<T: Sample + HermitianDispatch>(seed: u64) {
        let tramp = reference();
        check_ger::<T>(seed, true, |l, m, n, alpha, x, ix, y, iy, a, lda| unsafe {
            tramp.gerc::<T>(l, m, n, alpha, x, ix, y, iy, a, lda)
        });
    }

    #[test]
    fn test_rank_one_layout_equivalence() {
        check_ger_for::<f32>(10);
        check_ger_for::<f64>(11);
        check_geru_for::<Complex32>(12);
        check_geru_for::<Complex64>(13);
        check_gerc_for::<Complex32>(14);
        check_gerc_for::<Complex64>(15);
    }

    fn check_symv<T: Sample>(
        seed: u64,
        hermitian: bool,
        call: impl Fn(
            CBLAS_LAYOUT,
            CBLAS_UPLO,
            blasint,
            &T,
            *const T,
            blasint,
            *const T,
            blasint,
            &T,
            *mut T,
            blasint,
        ) -> BlasResult<()>,
    ) {
        let mut rng = rng(seed);
        let n = 4;
        for layout in Layout::ALL {
            for uplo in Uplo::ALL {
                for (inc_x, inc_y) in INCREMENTS {
                    let a = Mat::<T>::random(n, n, &mut rng);
                    let x = random_vec::<T>(n, &mut rng);
                    let y = random_vec::<T>(n, &mut rng);
                    let (alpha, beta) = (T::sample(&mut rng), T::sample(&mut rng));

                    let lda = padded(layout, n, n);
                    let a_flat = a.store(layout, lda);
                    let x_flat = strided(&x, inc_x as isize);
                    let mut y_flat = strided(&y, inc_y as isize);
                    call(
                        layout as c_int, uplo as c_int, bi(n), &alpha, a_flat.as_ptr(), bi(lda),
                        x_flat.as_ptr(), inc_x, &beta, y_flat.as_mut_ptr(), inc_y,
                    )
                    .unwrap();

                    let got = unstrided(&y_flat, n, inc_y as isize);
                    let want = oracle::symv(uplo, hermitian, alpha, &a, &x, beta, &y);
                    assert!(
                        max_abs_diff_vec(&got, &want) < T::tolerance(),
                        "{:?} hermitian={hermitian} {layout:?} {uplo:?} \
                         incX={inc_x} incY={inc_y}",
                        T::PRECISION
                    );
                    assert!(gaps_intact(&y_flat, n, inc_y as isize));
                }
            }
        }
    }

    fn check_symv_for<T: Sample + RealDispatch>(seed: u64) {
        let tramp = reference();
        check_symv::<T>(
            seed,
            false,
            |l, u, n, alpha, a, lda, x, ix, beta, y, iy| unsafe {
                tramp.symv::<T>(l, u, n, alpha, a, lda, x, ix, beta, y, iy)
            },
        );
    }

    fn check_hemv_for<T: Sample + HermitianDispatch>(seed: u64) {
        let tramp = reference();
        check_symv::<T>(
            seed,
            true,
            |l, u, n, alpha, a, lda, x, ix, beta, y, iy| unsafe {
                tramp.hemv::<T>(l, u, n, alpha, a, lda, x, ix, beta, y, iy)
            },
        );
    }

    #[test]
    fn test_symv_hemv_layout_equivalence() {
        check_symv_for::<f32>(20);
        check_symv_for::<f64>(21);
        check_hemv_for::<Complex32>(22);
        check_hemv_for::<Complex64>(23);
    }

    fn check_syr<T: Sample>(
        seed: u64,
        hermitian: bool,
        call: impl Fn(
            CBLAS_LAYOUT,
            CBLAS_UPLO,
            blasint,
            T,
            *const T,
            blasint,
            *mut T,
            blasint,
        ) -> BlasResult<()>,
    ) {
        let mut rng = rng(seed);
        let n = 4;
        for layout in Layout::ALL {
            for uplo in Uplo::ALL {
                for (inc_x, _) in INCREMENTS {
                    let mut a = Mat::<T>::random(n, n, &mut rng);
                    if hermitian {
                        a = a.with_real_diagonal();
                    }
                    let x = random_vec::<T>(n, &mut rng);
                    let sample = T::sample(&mut rng);
                    let alpha = if hermitian {
                        T::from_real(sample.re())
                    } else {
                        sample
                    };

                    let lda = padded(layout, n, n);
                    let mut a_flat = a.store(layout, lda);
                    let x_flat = strided(&x, inc_x as isize);
                    call(
                        layout as c_int, uplo as c_int, bi(n), alpha, x_flat.as_ptr(), inc_x,
                        a_flat.as_mut_ptr(), bi(lda),
                    )
                    .unwrap();

                    let got = Mat::load(layout, n, n, lda, &a_flat);
                    let want = oracle::syr(hermitian, alpha, &x, &a);
                    assert!(
                        got.max_abs_diff_triangle(&want, uplo) < T::tolerance(),
                        "{:?} hermitian={hermitian} {layout:?} {uplo:?} incX={inc_x}",
                        T::PRECISION
                    );
                    assert!(strictly_outside_untouched(&got, &a, uplo));
                    assert!(padding_intact(layout, n, n, lda, &a_flat));
                }
            }
        }
    }

    fn check_syr_for<T: Sample + RealDispatch>(seed: u64) {
        let tramp = reference();
        check_syr::<T>(seed, false, |l, u, n, alpha, x, ix, a, lda| unsafe {
            tramp.syr::<T>(l, u, n, &alpha, x, ix, a, lda)
        });
    }

    fn check_her_for<T: Sample + HermitianDispatch>(seed: u64) {
        let tramp = reference();
        check_syr::<T>(seed, true, |l, u, n, alpha, x, ix, a, lda| unsafe {
            tramp.her::<T>(l, u, n, &alpha.re(), x, ix, a, lda)
        });
    }

    #[test]
    fn test_syr_her_layout_equivalence() {
        check_syr_for::<f32>(30);
        check_syr_for::<f64>(31);
        check_her_for::<Complex32>(32);
        check_her_for::<Complex64>(33);
    }

    fn check_triangular_vector<T: Sample + Dispatch>(seed: u64, solve: bool) {
        let tramp = reference();
        let mut rng = rng(seed);
        let n = 4;
        let four = T::one() + T::one() + T::one() + T::one();
        for layout in Layout::ALL {
            for uplo in Uplo::ALL {
                for trans in Transpose::ALL {
                    for diag in Diag::ALL {
                        for (inc_x, _) in INCREMENTS {
                            let a = Mat::<T>::random(n, n, &mut rng).with_diagonal_shift(four);
                            let x = random_vec::<T>(n, &mut rng);

                            let lda = padded(layout, n, n);
                            let a_flat = a.store(layout, lda);
                            let mut x_flat = strided(&x, inc_x as isize);
                            let (l, u) = (layout as c_int, uplo as c_int);
                            let (t, d) = (trans as c_int, diag as c_int);
                            unsafe {
                                if solve {
                                    tramp.trsv::<T>(
                                        l, u, t, d, bi(n), a_flat.as_ptr(), bi(lda),
                                        x_flat.as_mut_ptr(), inc_x,
                                    )
                                } else {
                                    tramp.trmv::<T>(
                                        l, u, t, d, bi(n), a_flat.as_ptr(), bi(lda),
                                        x_flat.as_mut_ptr(), inc_x,
                                    )
                                }
                                .unwrap();
                            }

                            let got = unstrided(&x_flat, n, inc_x as isize);
                            let diff = if solve {
                                let back = oracle::trmv(uplo, trans, diag, &a, &got);
                                max_abs_diff_vec(&back, &x)
                            } else {
                                let want = oracle::trmv(uplo, trans, diag, &a, &x);
                                max_abs_diff_vec(&got, &want)
                            };
                            assert!(
                                diff < T::tolerance(),
                                "{:?} solve={solve} {layout:?} {uplo:?} {trans:?} {diag:?} \
                                 incX={inc_x}",
                                T::PRECISION
                            );
                            assert!(gaps_intact(&x_flat, n, inc_x as isize));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_trmv_trsv_layout_equivalence() {
        for solve in [false, true] {
            check_triangular_vector::<f32>(40, solve);
            check_triangular_vector::<f64>(41, solve);
            check_triangular_vector::<Complex32>(42, solve);
            check_triangular_vector::<Complex64>(43, solve);
        }
    }

    // =====================================================================
    // Worked scenarios
    // =====================================================================

    #[test]
    fn test_dgemv_row_major_scenario() {
        let tramp = reference();
        // A = [[1,2,3],[4,5,6]], x = [1,1,1]
        let a = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let x = [1.0; 3];
        let mut y = [10.0, 20.0];
        unsafe {
            tramp
                .dgemv(
                    CblasRowMajor, CblasNoTrans, 2, 3, 1.0, a.as_ptr(), 3, x.as_ptr(), 1, 0.5,
                    y.as_mut_ptr(), 1,
                )
                .unwrap();
        }
        assert_eq!(y, [11.0, 25.0]);

        // A^T * [1, -1] = [-3, -3, -3]
        let x = [1.0, -1.0];
        let mut y = [0.0; 3];
        unsafe {
            tramp
                .dgemv(
                    CblasRowMajor, CblasTrans, 2, 3, 1.0, a.as_ptr(), 3, x.as_ptr(), 1, 0.0,
                    y.as_mut_ptr(), 1,
                )
                .unwrap();
        }
        assert_eq!(y, [-3.0, -3.0, -3.0]);
    }

    #[test]
    fn test_row_major_conj_trans_zgemv() {
        // A = [[i, 1]] (1 x 2), x = [1]: A^H x = [-i, 1]
        let tramp = reference();
        let i = Complex64::new(0.0, 1.0);
        let one = Complex64::new(1.0, 0.0);
        let zero = Complex64::new(0.0, 0.0);
        let a = [i, one];
        let x = [one];
        let mut y = [zero; 2];
        unsafe {
            tramp
                .zgemv(
                    CblasRowMajor, CblasConjTrans, 1, 2, &one, a.as_ptr(), 2, x.as_ptr(), 1,
                    &zero, y.as_mut_ptr(), 1,
                )
                .unwrap();
        }
        assert_eq!(y, [Complex64::new(0.0, -1.0), one]);
        // The caller's x is never conjugated in place.
        assert_eq!(x, [one]);
    }

    #[test]
    fn test_row_major_zher_keeps_diagonal_real() {
        let tramp = reference();
        let x = [Complex64::new(0.0, 1.0), Complex64::new(1.0, 0.0)];
        let mut a = [Complex64::new(0.0, 0.0); 4];
        unsafe {
            tramp
                .zher(CblasRowMajor, CblasUpper, 2, 2.0, x.as_ptr(), 1, a.as_mut_ptr(), 2)
                .unwrap();
        }
        // 2 * x x^H, upper triangle in row-major order: [2, 2i; _, 2]
        assert_eq!(a[0], Complex64::new(2.0, 0.0));
        assert_eq!(a[1], Complex64::new(0.0, 2.0));
        assert_eq!(a[2], Complex64::new(0.0, 0.0));
        assert_eq!(a[3], Complex64::new(2.0, 0.0));
    }

    // =====================================================================
    // Counting provider
    // =====================================================================

    thread_local! {
        static CALLS: Cell<usize> = const { Cell::new(0) };
    }

    fn calls() -> usize {
        CALLS.with(Cell::get)
    }

    fn reset_calls() {
        CALLS.with(|c| c.set(0));
    }

    type Ch = *const c_char;
    type Int = *const blasint;

    macro_rules! counting {
        ($($name:ident => $inner:path, ($($arg:ident: $ty:ty),+ $(,)?);)+) => {$(
            unsafe extern "C" fn $name($($arg: $ty),+) {
                CALLS.with(|c| c.set(c.get() + 1));
                $inner($($arg),+)
            }
        )+};
    }

    counting! {
        counting_dgemv => fortran::dgemv, (trans: Ch, m: Int, n: Int, alpha: *const f64,
            a: *const f64, lda: Int, x: *const f64, incx: Int, beta: *const f64, y: *mut f64,
            incy: Int);
        counting_dger => fortran::dger, (m: Int, n: Int, alpha: *const f64, x: *const f64,
            incx: Int, y: *const f64, incy: Int, a: *mut f64, lda: Int);
        counting_dsymv => fortran::dsymv, (uplo: Ch, n: Int, alpha: *const f64, a: *const f64,
            lda: Int, x: *const f64, incx: Int, beta: *const f64, y: *mut f64, incy: Int);
        counting_dtrsv => fortran::dtrsv, (uplo: Ch, trans: Ch, diag: Ch, n: Int,
            a: *const f64, lda: Int, x: *mut f64, incx: Int);
    }

    fn counting_table() -> FortranBlas {
        FortranBlas {
            dgemv: Some(counting_dgemv as GemvFn<f64>),
            dger: Some(counting_dger as GerFn<f64>),
            dsymv: Some(counting_dsymv as SymvFn<f64>),
            dtrsv: Some(counting_dtrsv as TrmvFn<f64>),
            ..FortranBlas::EMPTY
        }
    }

    fn recording() -> (Trampoline, Arc<Mutex<Vec<i32>>>) {
        let _ = env_logger::builder().is_test(true).try_init();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let tramp = Trampoline::new(counting_table())
            .with_handler(move |e| sink.lock().unwrap().push(e.position()));
        (tramp, seen)
    }

    const CANARY: f64 = -777.25;

    #[test]
    fn test_empty_outputs_skip_the_provider() {
        let (tramp, seen) = recording();
        let a = [1.0f64; 4];
        let x = [1.0f64; 4];
        let mut y = [CANARY; 4];
        let mut b = [CANARY; 4];
        reset_calls();
        unsafe {
            // NoTrans with M = 0: y has no elements.
            tramp
                .dgemv(
                    CblasRowMajor, CblasNoTrans, 0, 3, 1.0, a.as_ptr(), 3, x.as_ptr(), 1, 0.0,
                    y.as_mut_ptr(), 1,
                )
                .unwrap();
            tramp
                .dger(CblasColMajor, 2, 0, 1.0, x.as_ptr(), 1, x.as_ptr(), 1, b.as_mut_ptr(), 2)
                .unwrap();
            tramp
                .dsymv(
                    CblasRowMajor, CblasLower, 0, 1.0, a.as_ptr(), 1, x.as_ptr(), 1, 0.0,
                    y.as_mut_ptr(), 1,
                )
                .unwrap();
            tramp
                .dtrsv(
                    CblasColMajor, CblasUpper, CblasNoTrans, CblasUnit, 0, a.as_ptr(), 1,
                    y.as_mut_ptr(), 1,
                )
                .unwrap();
        }
        assert_eq!(calls(), 0);
        assert!(seen.lock().unwrap().is_empty());
        assert_eq!(y, [CANARY; 4]);
        assert_eq!(b, [CANARY; 4]);
    }

    #[test]
    fn test_gemv_with_empty_x_still_reaches_the_provider() {
        let (tramp, seen) = recording();
        let a = [0.0f64; 1];
        let x = [0.0f64; 1];
        let mut y = [3.0f64, 4.0];
        reset_calls();
        unsafe {
            // NoTrans with N = 0: x is empty but y has two elements.
            tramp
                .dgemv(
                    CblasColMajor, CblasNoTrans, 2, 0, 1.0, a.as_ptr(), 2, x.as_ptr(), 1, 0.0,
                    y.as_mut_ptr(), 1,
                )
                .unwrap();
        }
        assert_eq!(calls(), 1);
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_zero_increment_is_rejected_before_the_provider() {
        let (tramp, seen) = recording();
        let a = [1.0f64; 4];
        let x = [1.0f64; 2];
        let mut y = [CANARY; 2];
        reset_calls();
        let err = unsafe {
            tramp.dgemv(
                CblasRowMajor, CblasNoTrans, 2, 2, 1.0, a.as_ptr(), 2, x.as_ptr(), 0, 0.0,
                y.as_mut_ptr(), 1,
            )
        }
        .unwrap_err();
        assert!(matches!(err, BlasError::ZeroIncrement { param: "incX", .. }));
        assert_eq!(err.position(), position::gemv::INC_X);

        let err = unsafe {
            tramp.dsymv(
                CblasColMajor, CblasUpper, 2, 1.0, a.as_ptr(), 2, x.as_ptr(), 1, 0.0,
                y.as_mut_ptr(), 0,
            )
        }
        .unwrap_err();
        assert_eq!(err.position(), position::symv::INC_Y);

        // incY precedes lda in argument order, so it wins over the short lda.
        let mut b = [CANARY; 4];
        let err = unsafe {
            tramp.dger(CblasColMajor, 2, 2, 1.0, x.as_ptr(), 1, x.as_ptr(), 0, b.as_mut_ptr(), 1)
        }
        .unwrap_err();
        assert_eq!(err.position(), position::ger::INC_Y);

        assert_eq!(seen.lock().unwrap().as_slice(), &[9, 11, 8]);
        assert_eq!(calls(), 0);
        assert_eq!(y, [CANARY; 2]);
        assert_eq!(b, [CANARY; 4]);
    }

    #[test]
    fn test_invalid_enums_on_trsv_report_their_positions() {
        let (tramp, seen) = recording();
        let a = [1.0f64; 4];
        let mut x = [CANARY; 2];
        reset_calls();
        unsafe {
            let p = x.as_mut_ptr();
            let _ = tramp.dtrsv(0, CblasUpper, CblasNoTrans, CblasUnit, 2, a.as_ptr(), 2, p, 1);
            let _ = tramp.dtrsv(
                CblasRowMajor, CblasLeft, CblasNoTrans, CblasUnit, 2, a.as_ptr(), 2, p, 1,
            );
            let _ = tramp.dtrsv(
                CblasRowMajor, CblasUpper, CblasUpper, CblasUnit, 2, a.as_ptr(), 2, p, 1,
            );
            let _ = tramp.dtrsv(CblasRowMajor, CblasUpper, CblasNoTrans, 0, 2, a.as_ptr(), 2, p, 1);
        }
        assert_eq!(seen.lock().unwrap().as_slice(), &[1, 2, 3, 4]);
        assert_eq!(calls(), 0);
        assert_eq!(x, [CANARY; 2]);
    }
}
