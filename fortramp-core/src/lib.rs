//! # fortramp core
//!
//! Shared vocabulary for the fortramp CBLAS trampoline.
//!
//! This crate provides:
//! - **CBLAS enumerations**: `Layout`, `Transpose`, `Uplo`, `Diag`, `Side` with
//!   their CBLAS integer values and validated conversion from raw C integers.
//! - **ABI types**: the configured BLAS integer `blasint`, `cblas.h` typedefs
//!   and constants, and the Fortran Level-2 and Level-3
//!   function-pointer signatures.
//! - **Elements**: `f32`, `f64`, `Complex32`, `Complex64` behind one trait,
//!   with the complex memory-layout contract.
//! - **Provider**: the function-pointer table, the process registry and
//!   dynamic loading of a shared BLAS.
//! - **Error reporting**: structured argument errors and the overridable
//!   handler they are reported to.
//! - **Configuration**: environment-driven runtime settings.

pub mod abi;
pub mod complex;
pub mod config;
pub mod element;
pub mod error;
pub mod layout;
pub mod provider;
pub mod routine;

pub use abi::{blasint, IndexWidth, INDEX_WIDTH};
pub use config::{config, Config, Decoration, ErrorMode};
pub use element::{Element, Precision};
pub use error::{BlasError, BlasResult, Handler, Reporter};
pub use layout::{Diag, EnumError, EnumKind, Layout, Side, Transpose, Uplo};
pub use provider::{FortranBlas, Provider, ProviderError};
pub use routine::Routine;

#[cfg(feature = "dynamic")]
pub use provider::LoadedProvider;

pub use num_complex::{Complex32, Complex64};
