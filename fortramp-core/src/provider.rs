//! The Fortran-convention BLAS provider: function-pointer table, process
//! registry, and optional dynamic loading.
//!
//! A provider is any set of `xGEMV`/`xGEMM`-style entry points. They reach the
//! trampoline in one of three ways:
//!
//! - a [`FortranBlas`] table handed to a trampoline directly ([`Provider::Table`]);
//! - the process registry, filled once through [`install`] (or the C
//!   registration hooks) and read through [`Provider::Global`];
//! - a shared library resolved by symbol name ([`LoadedProvider`], feature
//!   `dynamic`).
//!
//! Registry entries are single-assignment. Re-registering the same pointer
//! is a no-op; replacing it is an error, and an install that would replace
//! any entry registers none of them.

use std::fmt;
use std::sync::OnceLock;

use num_complex::{Complex32, Complex64};
use thiserror::Error;

use crate::abi::{
    GemmFn, GemvFn, GerFn, Syr2kFn, SymmFn, SymvFn, SyrFn, SyrkFn, TrmmFn, TrmvFn,
};

#[cfg(feature = "dynamic")]
use crate::config::Decoration;
#[cfg(feature = "dynamic")]
use std::path::{Path, PathBuf};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider entry {entry} is already registered with a different function")]
    AlreadyRegistered { entry: &'static str },

    #[cfg(feature = "dynamic")]
    #[error("failed to load provider library {}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },

    #[cfg(feature = "dynamic")]
    #[error("{} exports no BLAS symbols with {decoration:?} decoration", .path.display())]
    NoSymbols {
        path: PathBuf,
        decoration: Decoration,
    },
}

/// Where a trampoline looks up its entry points.
#[derive(Clone, Copy, Debug, Default)]
pub enum Provider {
    /// The process registry.
    #[default]
    Global,
    /// A private table.
    Table(FortranBlas),
}

macro_rules! provider_table {
    ($($name:ident: $ty:ty),+ $(,)?) => {
        /// Level-2 and Level-3 entry points of one Fortran BLAS, any subset
        /// populated.
        #[derive(Clone, Copy, Default)]
        pub struct FortranBlas {
            $(pub $name: Option<$ty>,)+
        }

        impl FortranBlas {
            pub const EMPTY: FortranBlas = FortranBlas { $($name: None,)+ };

            /// Undecorated names of every entry, in table order.
            pub const ENTRIES: &'static [&'static str] = &[$(stringify!($name)),+];

            /// Number of populated entries.
            pub fn len(&self) -> usize {
                0 $(+ self.$name.is_some() as usize)+
            }

            pub fn is_empty(&self) -> bool {
                self.len() == 0
            }

            fn populated(&self) -> Vec<&'static str> {
                let mut names = Vec::new();
                $(if self.$name.is_some() { names.push(stringify!($name)); })+
                names
            }

            #[cfg(feature = "dynamic")]
            unsafe fn resolve(library: &libloading::Library, decoration: Decoration) -> Self {
                FortranBlas {
                    $($name: lookup::<$ty>(library, &decoration.decorate(stringify!($name))),)+
                }
            }
        }

        struct Registry {
            installing: parking_lot::Mutex<()>,
            $($name: OnceLock<$ty>,)+
        }

        impl Registry {
            const fn new() -> Self {
                Registry {
                    installing: parking_lot::const_mutex(()),
                    $($name: OnceLock::new(),)+
                }
            }

            /// All or nothing: every populated entry is checked against the
            /// registry before any is set. Readers never take the lock.
            fn install(&self, table: &FortranBlas) -> Result<usize, ProviderError> {
                let _installing = self.installing.lock();
                $(
                    if let (Some(f), Some(current)) = (table.$name, self.$name.get()) {
                        if *current as usize != f as usize {
                            return Err(ProviderError::AlreadyRegistered {
                                entry: stringify!($name),
                            });
                        }
                    }
                )+
                let mut added = 0;
                $(
                    if let Some(f) = table.$name {
                        if self.$name.set(f).is_ok() {
                            log::debug!("registered provider entry {}", stringify!($name));
                            added += 1;
                        }
                    }
                )+
                Ok(added)
            }

            fn snapshot(&self) -> FortranBlas {
                FortranBlas { $($name: self.$name.get().copied(),)+ }
            }
        }

        impl Provider {
            $(
                #[inline]
                pub fn $name(&self) -> Option<$ty> {
                    match self {
                        Provider::Global => REGISTRY.$name.get().copied(),
                        Provider::Table(table) => table.$name,
                    }
                }
            )+
        }
    };
}

provider_table! {
    sgemv: GemvFn<f32>,
    dgemv: GemvFn<f64>,
    cgemv: GemvFn<Complex32>,
    zgemv: GemvFn<Complex64>,

    sger: GerFn<f32>,
    dger: GerFn<f64>,
    cgeru: GerFn<Complex32>,
    zgeru: GerFn<Complex64>,
    cgerc: GerFn<Complex32>,
    zgerc: GerFn<Complex64>,

    ssymv: SymvFn<f32>,
    dsymv: SymvFn<f64>,
    chemv: SymvFn<Complex32>,
    zhemv: SymvFn<Complex64>,

    ssyr: SyrFn<f32, f32>,
    dsyr: SyrFn<f64, f64>,
    cher: SyrFn<Complex32, f32>,
    zher: SyrFn<Complex64, f64>,

    strmv: TrmvFn<f32>,
    dtrmv: TrmvFn<f64>,
    ctrmv: TrmvFn<Complex32>,
    ztrmv: TrmvFn<Complex64>,

    strsv: TrmvFn<f32>,
    dtrsv: TrmvFn<f64>,
    ctrsv: TrmvFn<Complex32>,
    ztrsv: TrmvFn<Complex64>,

    sgemm: GemmFn<f32>,
    dgemm: GemmFn<f64>,
    cgemm: GemmFn<Complex32>,
    zgemm: GemmFn<Complex64>,

    ssymm: SymmFn<f32>,
    dsymm: SymmFn<f64>,
    csymm: SymmFn<Complex32>,
    zsymm: SymmFn<Complex64>,
    chemm: SymmFn<Complex32>,
    zhemm: SymmFn<Complex64>,

    ssyrk: SyrkFn<f32, f32>,
    dsyrk: SyrkFn<f64, f64>,
    csyrk: SyrkFn<Complex32, Complex32>,
    zsyrk: SyrkFn<Complex64, Complex64>,
    cherk: SyrkFn<Complex32, f32>,
    zherk: SyrkFn<Complex64, f64>,

    ssyr2k: Syr2kFn<f32, f32>,
    dsyr2k: Syr2kFn<f64, f64>,
    csyr2k: Syr2kFn<Complex32, Complex32>,
    zsyr2k: Syr2kFn<Complex64, Complex64>,
    cher2k: Syr2kFn<Complex32, f32>,
    zher2k: Syr2kFn<Complex64, f64>,

    strmm: TrmmFn<f32>,
    dtrmm: TrmmFn<f64>,
    ctrmm: TrmmFn<Complex32>,
    ztrmm: TrmmFn<Complex64>,

    strsm: TrmmFn<f32>,
    dtrsm: TrmmFn<f64>,
    ctrsm: TrmmFn<Complex32>,
    ztrsm: TrmmFn<Complex64>,
}

impl fmt::Debug for FortranBlas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FortranBlas")
            .field("populated", &self.populated())
            .finish()
    }
}

static REGISTRY: Registry = Registry::new();

/// Register every populated entry of `table` with the process registry.
///
/// Returns how many entries were newly registered. On a conflict nothing is
/// registered and the error names the first conflicting entry in table order.
pub fn install(table: &FortranBlas) -> Result<usize, ProviderError> {
    REGISTRY.install(table)
}

/// Snapshot of the process registry.
pub fn registered() -> FortranBlas {
    REGISTRY.snapshot()
}

// ── Dynamic loading ─────────────────────────────────────────────────

#[cfg(feature = "dynamic")]
unsafe fn lookup<F: Copy>(library: &libloading::Library, symbol: &str) -> Option<F> {
    match library.get::<F>(symbol.as_bytes()) {
        Ok(sym) => Some(*sym),
        Err(_) => {
            log::trace!("provider symbol {symbol} not found");
            None
        }
    }
}

#[cfg(feature = "dynamic")]
static PINNED: parking_lot::Mutex<Vec<libloading::Library>> =
    parking_lot::const_mutex(Vec::new());

/// A provider resolved from a shared library.
#[cfg(feature = "dynamic")]
pub struct LoadedProvider {
    table: FortranBlas,
    path: PathBuf,
    library: libloading::Library,
}

#[cfg(feature = "dynamic")]
impl LoadedProvider {
    /// Open `path` and resolve every entry under `decoration`.
    ///
    /// # Safety
    ///
    /// Loading runs the library's initialisers, and every resolved symbol is
    /// trusted to have the Fortran signature its name implies.
    pub unsafe fn open(
        path: impl AsRef<Path>,
        decoration: Decoration,
    ) -> Result<Self, ProviderError> {
        let path = path.as_ref().to_path_buf();
        let library = match libloading::Library::new(&path) {
            Ok(library) => library,
            Err(source) => return Err(ProviderError::Load { path, source }),
        };
        let table = FortranBlas::resolve(&library, decoration);
        if table.is_empty() {
            return Err(ProviderError::NoSymbols { path, decoration });
        }
        log::debug!(
            "resolved {} of {} entries from {}",
            table.len(),
            FortranBlas::ENTRIES.len(),
            path.display()
        );
        Ok(LoadedProvider {
            table,
            path,
            library,
        })
    }

    /// The resolved entries. Valid while `self` is alive.
    pub fn table(&self) -> &FortranBlas {
        &self.table
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Register with the process registry.
    ///
    /// The library stays mapped for the rest of the process whether or not
    /// registration succeeds: copies of [`table`](Self::table) may outlive
    /// `self`.
    pub fn install(self) -> Result<usize, ProviderError> {
        let LoadedProvider {
            table,
            path,
            library,
        } = self;
        PINNED.lock().push(library);
        let result = install(&table);
        if let Err(err) = &result {
            log::warn!("{} not installed: {err}", path.display());
        }
        result
    }
}

/// Load and install the library named by `FORTRAMP_PROVIDER`, if set.
///
/// Returns `Ok(None)` when no library is configured.
///
/// # Safety
///
/// See [`LoadedProvider::open`].
#[cfg(feature = "dynamic")]
pub unsafe fn install_from_config() -> Result<Option<usize>, ProviderError> {
    let cfg = crate::config::config();
    let Some(path) = cfg.provider_library.as_ref() else {
        return Ok(None);
    };
    LoadedProvider::open(path, cfg.decoration)?.install().map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::blasint;
    use std::os::raw::c_char;

    // Registry entries are single-assignment for the life of the test
    // binary, so each test claims entries no other test uses.
    static REGISTRY_TESTS: parking_lot::Mutex<()> = parking_lot::const_mutex(());

    unsafe extern "C" fn noop_trmm<T>(
        _side: *const c_char,
        _uplo: *const c_char,
        _transa: *const c_char,
        _diag: *const c_char,
        _m: *const blasint,
        _n: *const blasint,
        _alpha: *const T,
        _a: *const T,
        _lda: *const blasint,
        _b: *mut T,
        _ldb: *const blasint,
    ) {
    }

    unsafe extern "C" fn other_trmm<T: Default>(
        side: *const c_char,
        uplo: *const c_char,
        transa: *const c_char,
        diag: *const c_char,
        m: *const blasint,
        n: *const blasint,
        alpha: *const T,
        a: *const T,
        lda: *const blasint,
        b: *mut T,
        ldb: *const blasint,
    ) {
        noop_trmm(side, uplo, transa, diag, m, n, alpha, a, lda, b, ldb);
        if !b.is_null() {
            *b = T::default();
        }
    }

    #[test]
    fn test_table_counts() {
        assert_eq!(FortranBlas::ENTRIES.len(), 56);
        assert_eq!(FortranBlas::ENTRIES[0], "sgemv");
        assert!(FortranBlas::EMPTY.is_empty());
        let table = FortranBlas {
            strsm: Some(noop_trmm::<f32>),
            ..FortranBlas::EMPTY
        };
        assert_eq!(table.len(), 1);
        assert_eq!(format!("{table:?}"), r#"FortranBlas { populated: ["strsm"] }"#);
    }

    #[test]
    fn test_entries_match_routine_names() {
        use crate::{Precision, Routine};
        let mut names: Vec<&str> = Routine::ALL
            .iter()
            .flat_map(|r| Precision::ALL.iter().filter_map(move |p| r.fortran_name(*p)))
            .collect();
        let mut entries = FortranBlas::ENTRIES.to_vec();
        names.sort_unstable();
        entries.sort_unstable();
        assert_eq!(names, entries);
    }

    #[test]
    fn test_table_provider_lookup() {
        let table = FortranBlas {
            strsm: Some(noop_trmm::<f32>),
            ..FortranBlas::EMPTY
        };
        let provider = Provider::Table(table);
        assert!(provider.strsm().is_some());
        assert!(provider.dtrsm().is_none());
        assert!(provider.dgemv().is_none());
    }

    #[test]
    fn test_registry_single_assignment() {
        let _guard = REGISTRY_TESTS.lock();
        let table = FortranBlas {
            strsm: Some(noop_trmm::<f32>),
            ..FortranBlas::EMPTY
        };
        assert_eq!(install(&table).unwrap(), 1);
        // Same pointer again: accepted, nothing new.
        assert_eq!(install(&table).unwrap(), 0);
        assert!(registered().strsm.is_some());
        assert!(Provider::Global.strsm().is_some());

        let other = FortranBlas {
            strsm: Some(other_trmm::<f32>),
            ..FortranBlas::EMPTY
        };
        match install(&other) {
            Err(ProviderError::AlreadyRegistered { entry }) => assert_eq!(entry, "strsm"),
            other => panic!("expected AlreadyRegistered, got {other:?}"),
        }
    }

    #[test]
    fn test_conflicting_install_registers_nothing() {
        let _guard = REGISTRY_TESTS.lock();
        let first = FortranBlas {
            dtrsm: Some(noop_trmm::<f64>),
            ..FortranBlas::EMPTY
        };
        assert_eq!(install(&first).unwrap(), 1);

        // dtrmm precedes dtrsm in table order and is free; the conflict on
        // dtrsm must keep it unregistered.
        let second = FortranBlas {
            dtrmm: Some(noop_trmm::<f64>),
            dtrsm: Some(other_trmm::<f64>),
            ..FortranBlas::EMPTY
        };
        match install(&second) {
            Err(ProviderError::AlreadyRegistered { entry }) => assert_eq!(entry, "dtrsm"),
            other => panic!("expected AlreadyRegistered, got {other:?}"),
        }
        assert!(registered().dtrmm.is_none());
        assert!(registered().dtrsm.is_some());
    }

    #[cfg(feature = "dynamic")]
    #[test]
    fn test_open_missing_library() {
        let err = unsafe {
            LoadedProvider::open(
                "/nonexistent/libfortramp-missing.so",
                crate::config::Decoration::default(),
            )
        }
        .err()
        .expect("loading a missing library must fail");
        assert!(matches!(err, ProviderError::Load { .. }));
        assert!(err.to_string().contains("libfortramp-missing.so"));
    }

    // glibc is a real shared object that exports no BLAS symbols.
    #[cfg(all(feature = "dynamic", target_os = "linux", target_env = "gnu"))]
    mod loaded {
        use super::*;

        const LIBC: &str = "libc.so.6";

        fn pinned() -> usize {
            PINNED.lock().len()
        }

        fn libc_provider(table: FortranBlas) -> LoadedProvider {
            let library =
                unsafe { libloading::Library::new(LIBC) }.expect("glibc must load");
            LoadedProvider {
                table,
                path: PathBuf::from(LIBC),
                library,
            }
        }

        #[test]
        fn test_open_library_without_blas_symbols() {
            let err = unsafe { LoadedProvider::open(LIBC, Decoration::default()) }
                .err()
                .expect("glibc has no dgemm_");
            match &err {
                ProviderError::NoSymbols { path, decoration } => {
                    assert_eq!(path, Path::new(LIBC));
                    assert_eq!(*decoration, Decoration::default());
                }
                other => panic!("expected NoSymbols, got {other:?}"),
            }
            assert!(err.to_string().contains("exports no BLAS symbols"));
        }

        #[test]
        fn test_install_pins_library_on_success() {
            let _guard = REGISTRY_TESTS.lock();
            let before = pinned();
            let loaded = libc_provider(FortranBlas {
                ctrsm: Some(noop_trmm::<Complex32>),
                ..FortranBlas::EMPTY
            });
            assert_eq!(loaded.path(), Path::new(LIBC));
            assert_eq!(loaded.install().unwrap(), 1);
            assert_eq!(pinned(), before + 1);
            assert!(Provider::Global.ctrsm().is_some());
        }

        #[test]
        fn test_install_pins_library_on_conflict() {
            let _guard = REGISTRY_TESTS.lock();
            let first = FortranBlas {
                ztrsm: Some(noop_trmm::<Complex64>),
                ..FortranBlas::EMPTY
            };
            install(&first).unwrap();

            let before = pinned();
            let loaded = libc_provider(FortranBlas {
                ztrmm: Some(noop_trmm::<Complex64>),
                ztrsm: Some(other_trmm::<Complex64>),
                ..FortranBlas::EMPTY
            });
            match loaded.install() {
                Err(ProviderError::AlreadyRegistered { entry }) => assert_eq!(entry, "ztrsm"),
                other => panic!("expected AlreadyRegistered, got {other:?}"),
            }
            assert_eq!(pinned(), before + 1);
            assert!(registered().ztrmm.is_none());
        }

        // Resolves against a system BLAS when one is installed; the registry
        // is left alone.
        #[test]
        fn test_open_system_blas_when_present() {
            const CANDIDATES: &[&str] = &[
                "libopenblas.so.0",
                "libblas.so.3",
                "libopenblas.so",
                "libblas.so",
            ];
            let Some(loaded) = CANDIDATES
                .iter()
                .find_map(|name| {
                    unsafe { LoadedProvider::open(name, Decoration::default()) }.ok()
                })
            else {
                log::info!("no system BLAS found, skipping");
                return;
            };
            let table = loaded.table();
            assert!(table.dgemm.is_some(), "{:?}", loaded.path());
            assert!(table.dgemv.is_some(), "{:?}", loaded.path());
            assert!(table.len() <= FortranBlas::ENTRIES.len());
        }
    }
}
