//! Runtime configuration, read once from the environment.
//!
//! | variable            | values                          | default      |
//! |---------------------|---------------------------------|--------------|
//! | `FORTRAMP_ON_ERROR` | `exit`, `abort`, `continue`     | `exit`       |
//! | `FORTRAMP_PROVIDER` | path to a shared BLAS library   | unset        |
//! | `FORTRAMP_SYMBOLS`  | `underscore`, `plain`, `upper`  | `underscore` |
//!
//! Integer width is not here: it is the `ilp64` cargo feature, fixed at
//! build time.

use std::path::PathBuf;
use std::sync::OnceLock;

use crate::abi::INDEX_WIDTH;

pub const ENV_ON_ERROR: &str = "FORTRAMP_ON_ERROR";
pub const ENV_PROVIDER: &str = "FORTRAMP_PROVIDER";
pub const ENV_SYMBOLS: &str = "FORTRAMP_SYMBOLS";

/// What the default error handler does after printing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// `exit(-1)`, as reference CBLAS does.
    #[default]
    Exit,
    /// `abort()`, for a core dump at the offending call.
    Abort,
    /// Print and return; the call completes as a no-op.
    Continue,
}

/// Provider symbol decoration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Decoration {
    /// `dgemm_` (gfortran, OpenBLAS, MKL, BLIS).
    #[default]
    LowerUnderscore,
    /// `dgemm` (xlf, some Windows builds).
    Lower,
    /// `DGEMM` (Intel Fortran on Windows).
    Upper,
}

impl Decoration {
    /// Decorated symbol for an undecorated lowercase routine name.
    pub fn decorate(self, name: &str) -> String {
        match self {
            Decoration::LowerUnderscore => format!("{name}_"),
            Decoration::Lower => name.to_string(),
            Decoration::Upper => name.to_ascii_uppercase(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    pub on_error: ErrorMode,
    pub provider_library: Option<PathBuf>,
    pub decoration: Decoration,
}

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Process configuration (read from the environment on first call).
pub fn config() -> &'static Config {
    CONFIG.get_or_init(Config::from_env)
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unknown values keep the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Config::default();

        if let Some(raw) = lookup(ENV_ON_ERROR) {
            match raw.trim().to_ascii_lowercase().as_str() {
                "exit" => cfg.on_error = ErrorMode::Exit,
                "abort" => cfg.on_error = ErrorMode::Abort,
                "continue" | "return" => cfg.on_error = ErrorMode::Continue,
                other => log::warn!("{ENV_ON_ERROR}={other:?} not recognised, using exit"),
            }
        }

        if let Some(raw) = lookup(ENV_PROVIDER) {
            let raw = raw.trim();
            if !raw.is_empty() {
                cfg.provider_library = Some(PathBuf::from(raw));
            }
        }

        if let Some(raw) = lookup(ENV_SYMBOLS) {
            match raw.trim().to_ascii_lowercase().as_str() {
                "underscore" | "lower_" => cfg.decoration = Decoration::LowerUnderscore,
                "plain" | "lower" => cfg.decoration = Decoration::Lower,
                "upper" => cfg.decoration = Decoration::Upper,
                other => log::warn!("{ENV_SYMBOLS}={other:?} not recognised, using underscore"),
            }
        }

        cfg
    }
}

/// Print the effective configuration.
pub fn print_config() {
    let cfg = config();
    println!("=== fortramp configuration ===");
    println!("  Index width:   {} bit", INDEX_WIDTH.bits());
    println!("  On error:      {:?}", cfg.on_error);
    println!("  Decoration:    {:?}", cfg.decoration);
    match cfg.provider_library {
        Some(ref path) => println!("  Provider:      {}", path.display()),
        None => println!("  Provider:      registered at runtime"),
    }
}
