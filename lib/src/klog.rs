//! Leveled logging for the raffle engine.
//!
//! All log output funnels through a single **backend** function pointer. The
//! engine crates are `no_std`, so they never decide where a line goes: the
//! host registers a backend (stderr, browser console, a test capture) and
//! until then every line is discarded.
//!
//! # Backend contract
//!
//! The backend receives the pre-formatted arguments for a **single log line**
//! and is responsible for appending the trailing newline.
//!
//! # Registration
//!
//! ```ignore
//! raffle_lib::klog::klog_register_backend(|level, args| eprintln!("[{}] {args}", level.as_str()));
//! ```

use core::fmt;
use core::sync::atomic::{AtomicPtr, AtomicU8, Ordering};

// ---------------------------------------------------------------------------
// Log levels
// ---------------------------------------------------------------------------

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum KlogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl KlogLevel {
    fn from_raw(raw: u8) -> Self {
        match raw {
            0 => KlogLevel::Error,
            1 => KlogLevel::Warn,
            2 => KlogLevel::Info,
            3 => KlogLevel::Debug,
            _ => KlogLevel::Trace,
        }
    }

    /// Parse a level name, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        const NAMES: [(&str, KlogLevel); 5] = [
            ("error", KlogLevel::Error),
            ("warn", KlogLevel::Warn),
            ("info", KlogLevel::Info),
            ("debug", KlogLevel::Debug),
            ("trace", KlogLevel::Trace),
        ];
        NAMES
            .iter()
            .find(|(name, _)| value.eq_ignore_ascii_case(name))
            .map(|&(_, level)| level)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            KlogLevel::Error => "ERROR",
            KlogLevel::Warn => "WARN",
            KlogLevel::Info => "INFO",
            KlogLevel::Debug => "DEBUG",
            KlogLevel::Trace => "TRACE",
        }
    }
}

static CURRENT_LEVEL: AtomicU8 = AtomicU8::new(KlogLevel::Info as u8);

#[inline(always)]
fn is_enabled(level: KlogLevel) -> bool {
    level as u8 <= CURRENT_LEVEL.load(Ordering::Relaxed)
}

// ---------------------------------------------------------------------------
// Backend dispatch
// ---------------------------------------------------------------------------

/// Signature of a klog backend: one line, level already filtered.
pub type KlogBackend = fn(KlogLevel, fmt::Arguments<'_>);

/// Stored as a raw pointer; `null` means "discard".
static BACKEND: AtomicPtr<()> = AtomicPtr::new(core::ptr::null_mut());

#[inline]
fn dispatch(level: KlogLevel, args: fmt::Arguments<'_>) {
    let ptr = BACKEND.load(Ordering::Acquire);
    if ptr.is_null() {
        return;
    }
    // SAFETY: `klog_register_backend` only stores valid `KlogBackend` fn
    // pointers, which have the same size as `*mut ()`.
    let backend: KlogBackend = unsafe { core::mem::transmute(ptr) };
    backend(level, args);
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Register the sink for every subsequent log line.
pub fn klog_register_backend(backend: KlogBackend) {
    BACKEND.store(backend as *mut (), Ordering::Release);
}

/// Drop the registered backend; lines are discarded again.
pub fn klog_unregister_backend() {
    BACKEND.store(core::ptr::null_mut(), Ordering::Release);
}

/// Reset the level to its default.
pub fn klog_init() {
    CURRENT_LEVEL.store(KlogLevel::Info as u8, Ordering::Relaxed);
}

pub fn klog_set_level(level: KlogLevel) {
    CURRENT_LEVEL.store(level as u8, Ordering::Relaxed);
}

pub fn klog_get_level() -> KlogLevel {
    KlogLevel::from_raw(CURRENT_LEVEL.load(Ordering::Relaxed))
}

pub fn is_enabled_level(level: KlogLevel) -> bool {
    is_enabled(level)
}

/// Emit a formatted log line at the given level.
///
/// Callers should **not** include a trailing newline.
pub fn log_args(level: KlogLevel, args: fmt::Arguments<'_>) {
    if !is_enabled(level) {
        return;
    }
    dispatch(level, args);
}

// ---------------------------------------------------------------------------
// Macros
// ---------------------------------------------------------------------------

#[macro_export]
macro_rules! klog {
    ($level:expr, $($arg:tt)*) => {{
        $crate::klog::log_args($level, ::core::format_args!($($arg)*));
    }};
}

#[macro_export]
macro_rules! klog_error {
    ($($arg:tt)*) => {
        $crate::klog::log_args($crate::klog::KlogLevel::Error, ::core::format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! klog_warn {
    ($($arg:tt)*) => {
        $crate::klog::log_args($crate::klog::KlogLevel::Warn, ::core::format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! klog_info {
    ($($arg:tt)*) => {
        $crate::klog::log_args($crate::klog::KlogLevel::Info, ::core::format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! klog_debug {
    ($($arg:tt)*) => {
        $crate::klog::log_args($crate::klog::KlogLevel::Debug, ::core::format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! klog_trace {
    ($($arg:tt)*) => {
        $crate::klog::log_args($crate::klog::KlogLevel::Trace, ::core::format_args!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_names_parse() {
        assert_eq!(KlogLevel::parse("DEBUG"), Some(KlogLevel::Debug));
        assert_eq!(KlogLevel::parse("warn"), Some(KlogLevel::Warn));
        assert_eq!(KlogLevel::parse("loud"), None);
    }

    #[test]
    fn levels_are_ordered_by_verbosity() {
        assert!(KlogLevel::Error < KlogLevel::Warn);
        assert!(KlogLevel::Debug < KlogLevel::Trace);
        assert_eq!(KlogLevel::from_raw(9), KlogLevel::Trace);
    }
}
