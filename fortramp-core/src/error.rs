//! Error Reporter: structured argument errors and the handler they go to.
//!
//! Every failure is a [`BlasError`] carrying the routine name and the 1-based
//! position of the offending argument in the CBLAS signature. Reporting a
//! failure hands it to a handler:
//!
//! - a context handler ([`Reporter::Custom`]) carried by one trampoline, or
//! - the process-wide handler ([`set_error_handler`]), or, if none is set,
//! - [`default_handler`]: log, print, then exit/abort/continue per
//!   [`crate::config::ErrorMode`].
//!
//! The process-wide slot is configuration. Install it before BLAS traffic
//! starts on other threads.

use std::borrow::Cow;
use std::ffi::CStr;
use std::fmt;
use std::os::raw::c_char;
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;

use crate::abi::blasint;
use crate::config::{config, ErrorMode};

pub type RoutineName = Cow<'static, str>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlasError {
    #[error(
        "Parameter {position} to routine {routine} was incorrect: \
         {param} = {value} is not {legal}"
    )]
    InvalidEnum {
        routine: RoutineName,
        position: i32,
        param: &'static str,
        value: i32,
        legal: &'static str,
    },

    #[error(
        "Parameter {position} to routine {routine} was incorrect: \
         {param} = {value}, must be at least {min}"
    )]
    InvalidDimension {
        routine: RoutineName,
        position: i32,
        param: &'static str,
        value: i64,
        min: i64,
    },

    #[error("Parameter {position} to routine {routine} was incorrect: {param} must not be zero")]
    ZeroIncrement {
        routine: RoutineName,
        position: i32,
        param: &'static str,
    },

    #[error("Parameter {position} to routine {routine} was incorrect: {param} is a null pointer")]
    NullScalar {
        routine: RoutineName,
        position: i32,
        param: &'static str,
    },

    #[error("routine {routine} has no provider: {entry} is not registered")]
    Unregistered {
        routine: RoutineName,
        entry: &'static str,
    },

    /// Raised by the provider's own argument checking and passed on verbatim.
    #[error("** On entry to {routine} parameter number {position} had an illegal value")]
    Provider { routine: RoutineName, position: i32 },

    /// Arrived through the `cblas_xerbla` side channel.
    #[error("Parameter {position} to routine {routine} was incorrect: {message}")]
    Reported {
        routine: RoutineName,
        position: i32,
        message: String,
    },
}

impl BlasError {
    pub fn routine(&self) -> &str {
        match self {
            BlasError::InvalidEnum { routine, .. }
            | BlasError::InvalidDimension { routine, .. }
            | BlasError::ZeroIncrement { routine, .. }
            | BlasError::NullScalar { routine, .. }
            | BlasError::Unregistered { routine, .. }
            | BlasError::Provider { routine, .. }
            | BlasError::Reported { routine, .. } => &**routine,
        }
    }

    /// 1-based argument index, 0 when no argument is at fault.
    pub fn position(&self) -> i32 {
        match self {
            BlasError::InvalidEnum { position, .. }
            | BlasError::InvalidDimension { position, .. }
            | BlasError::ZeroIncrement { position, .. }
            | BlasError::NullScalar { position, .. }
            | BlasError::Provider { position, .. }
            | BlasError::Reported { position, .. } => *position,
            BlasError::Unregistered { .. } => 0,
        }
    }
}

pub type BlasResult<T> = Result<T, BlasError>;

// ── Handlers ────────────────────────────────────────────────────────

pub type Handler = Arc<dyn Fn(&BlasError) + Send + Sync>;

static HANDLER: RwLock<Option<Handler>> = parking_lot::const_rwlock(None);

/// Install the process-wide handler, returning the previous one.
pub fn set_error_handler<F>(handler: F) -> Option<Handler>
where
    F: Fn(&BlasError) + Send + Sync + 'static,
{
    HANDLER.write().replace(Arc::new(handler))
}

/// Go back to [`default_handler`], returning the handler that was installed.
pub fn reset_error_handler() -> Option<Handler> {
    HANDLER.write().take()
}

/// Hand `err` to the process-wide handler.
pub fn report(err: &BlasError) {
    // Clone out so the lock is released before the handler runs; a handler
    // may itself install a new handler.
    let handler = HANDLER.read().clone();
    match handler {
        Some(handler) => handler(err),
        None => default_handler(err),
    }
}

/// Log and print `err`, then act on the configured [`ErrorMode`].
pub fn default_handler(err: &BlasError) {
    log::error!("{err}");
    eprintln!("{err}");
    match config().on_error {
        ErrorMode::Exit => std::process::exit(-1),
        ErrorMode::Abort => std::process::abort(),
        ErrorMode::Continue => {}
    }
}

/// Where a trampoline sends its errors.
#[derive(Clone, Default)]
pub enum Reporter {
    /// The process-wide handler.
    #[default]
    Global,
    Custom(Handler),
}

impl Reporter {
    pub fn custom<F>(handler: F) -> Self
    where
        F: Fn(&BlasError) + Send + Sync + 'static,
    {
        Reporter::Custom(Arc::new(handler))
    }

    pub fn report(&self, err: &BlasError) {
        match self {
            Reporter::Global => report(err),
            Reporter::Custom(handler) => handler(err),
        }
    }
}

impl fmt::Debug for Reporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reporter::Global => f.write_str("Reporter::Global"),
            Reporter::Custom(_) => f.write_str("Reporter::Custom(..)"),
        }
    }
}

// ── Provider-raised errors ──────────────────────────────────────────

/// Re-surface an error the provider detected itself.
///
/// `name` is the provider's routine name as it would pass it to `XERBLA`
/// (trailing blanks are trimmed), `info` the Fortran argument position.
pub fn report_provider_error(name: &str, info: blasint) {
    let err = BlasError::Provider {
        routine: Cow::Owned(name.trim_end().to_string()),
        position: info as i32,
    };
    log::warn!("provider rejected a call: {err}");
    report(&err);
}

/// Fortran-ABI `XERBLA(SRNAME, INFO)` with its hidden length argument, for
/// providers that accept a replacement error routine.
///
/// # Safety
///
/// `srname` must point to `len` readable bytes (or be null), `info` to a
/// readable `blasint` (or be null).
pub unsafe extern "C" fn fortran_xerbla(srname: *const c_char, info: *const blasint, len: usize) {
    let name = if srname.is_null() {
        Cow::Borrowed("?")
    } else {
        let bytes = std::slice::from_raw_parts(srname as *const u8, len);
        String::from_utf8_lossy(bytes)
    };
    let info = if info.is_null() { 0 } else { *info };
    report_provider_error(&name, info);
}

/// Build the error for the `cblas_xerbla` side channel.
///
/// # Safety
///
/// `rout` and `form` must each be null or a valid NUL-terminated string.
pub unsafe fn xerbla_error(p: i32, rout: *const c_char, form: *const c_char) -> BlasError {
    let text = |ptr: *const c_char, fallback: &str| {
        if ptr.is_null() {
            fallback.to_string()
        } else {
            CStr::from_ptr(ptr).to_string_lossy().trim_end().to_string()
        }
    };
    BlasError::Reported {
        routine: Cow::Owned(text(rout, "<unknown>")),
        position: p,
        message: text(form, "illegal value"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    // Tests touching the process-wide handler run one at a time.
    static GLOBAL: Mutex<()> = parking_lot::const_mutex(());

    fn uplo_error() -> BlasError {
        BlasError::InvalidEnum {
            routine: Cow::Borrowed("cblas_dsymm"),
            position: 3,
            param: "Uplo",
            value: 999,
            legal: "one of CblasUpper (121), CblasLower (122)",
        }
    }

    #[test]
    fn test_message_format() {
        assert_eq!(
            uplo_error().to_string(),
            "Parameter 3 to routine cblas_dsymm was incorrect: \
             Uplo = 999 is not one of CblasUpper (121), CblasLower (122)"
        );
        let dim = BlasError::InvalidDimension {
            routine: Cow::Borrowed("cblas_dgemm"),
            position: 9,
            param: "lda",
            value: 1,
            min: 3,
        };
        assert_eq!(
            dim.to_string(),
            "Parameter 9 to routine cblas_dgemm was incorrect: lda = 1, must be at least 3"
        );
        assert_eq!(dim.position(), 9);
        assert_eq!(dim.routine(), "cblas_dgemm");

        let inc = BlasError::ZeroIncrement {
            routine: Cow::Borrowed("cblas_dgemv"),
            position: 9,
            param: "incX",
        };
        assert_eq!(
            inc.to_string(),
            "Parameter 9 to routine cblas_dgemv was incorrect: incX must not be zero"
        );
        assert_eq!(inc.position(), 9);
    }

    #[test]
    fn test_custom_reporter_records() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let reporter = Reporter::custom(move |e| sink.lock().push(e.clone()));
        reporter.report(&uplo_error());
        assert_eq!(seen.lock().as_slice(), &[uplo_error()]);
    }

    #[test]
    fn test_global_handler_install_and_reset() {
        let _guard = GLOBAL.lock();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        set_error_handler(move |e| sink.lock().push(e.position()));

        report(&uplo_error());
        Reporter::Global.report(&uplo_error());
        assert_eq!(seen.lock().as_slice(), &[3, 3]);

        assert!(reset_error_handler().is_some());
        assert!(reset_error_handler().is_none());
    }

    #[test]
    fn test_handler_may_reinstall_itself() {
        let _guard = GLOBAL.lock();
        let hits = Arc::new(Mutex::new(0));
        let counter = hits.clone();
        set_error_handler(move |_| {
            *counter.lock() += 1;
            // Re-entering the slot from inside a handler must not deadlock.
            let inner = counter.clone();
            set_error_handler(move |_| *inner.lock() += 10);
        });
        report(&uplo_error());
        report(&uplo_error());
        assert_eq!(*hits.lock(), 11);
        reset_error_handler();
    }

    #[test]
    fn test_provider_error_resurfaces_verbatim() {
        let _guard = GLOBAL.lock();
        let seen = Arc::new(Mutex::new(None));
        let sink = seen.clone();
        set_error_handler(move |e| *sink.lock() = Some(e.clone()));

        let name = b"DGEMM ";
        let info: blasint = 8;
        unsafe { fortran_xerbla(name.as_ptr() as *const c_char, &info, name.len()) };
        let err = seen.lock().take().expect("handler not called");
        assert_eq!(
            err.to_string(),
            "** On entry to DGEMM parameter number 8 had an illegal value"
        );
        assert_eq!(err.position(), 8);
        reset_error_handler();
    }

    #[test]
    fn test_xerbla_error_from_c_strings() {
        let rout = b"cblas_dtrsm\0";
        let form = b"illegal Side \0";
        let err = unsafe {
            xerbla_error(
                2,
                rout.as_ptr() as *const c_char,
                form.as_ptr() as *const c_char,
            )
        };
        assert_eq!(
            err.to_string(),
            "Parameter 2 to routine cblas_dtrsm was incorrect: illegal Side"
        );
        let anonymous = unsafe { xerbla_error(1, std::ptr::null(), std::ptr::null()) };
        assert_eq!(anonymous.routine(), "<unknown>");
    }
}
