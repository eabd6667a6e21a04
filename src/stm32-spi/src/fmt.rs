//! Logging macros that forward to `defmt` when the `defmt` feature is
//! enabled and evaluate to nothing otherwise, so call sites stay free of
//! feature gates.
#![allow(unused_macros)]

/// Logs a message at the trace level.
#[cfg(feature = "defmt")]
macro_rules! trace {
    ($($arg:tt)*) => {{
        ::defmt::trace!($($arg)*);
    }};
}

/// Logs a message at the debug level.
#[cfg(feature = "defmt")]
macro_rules! debug {
    ($($arg:tt)*) => {{
        ::defmt::debug!($($arg)*);
    }};
}

/// Logs a message at the info level.
#[cfg(feature = "defmt")]
macro_rules! info {
    ($($arg:tt)*) => {{
        ::defmt::info!($($arg)*);
    }};
}

/// Logs a message at the warn level.
#[cfg(feature = "defmt")]
macro_rules! warn {
    ($($arg:tt)*) => {{
        ::defmt::warn!($($arg)*);
    }};
}

/// Logs a message at the error level.
#[cfg(feature = "defmt")]
macro_rules! error {
    ($($arg:tt)*) => {{
        ::defmt::error!($($arg)*);
    }};
}

/// No-op log macro.
#[cfg(not(feature = "defmt"))]
macro_rules! trace {
    ($($arg:tt)*) => {{
        let _ = ($($arg)*);
    }};
}

/// No-op log macro.
#[cfg(not(feature = "defmt"))]
macro_rules! debug {
    ($($arg:tt)*) => {{
        let _ = ($($arg)*);
    }};
}

/// No-op log macro.
#[cfg(not(feature = "defmt"))]
macro_rules! info {
    ($($arg:tt)*) => {{
        let _ = ($($arg)*);
    }};
}

/// No-op log macro.
#[cfg(not(feature = "defmt"))]
macro_rules! warn {
    ($($arg:tt)*) => {{
        let _ = ($($arg)*);
    }};
}

/// No-op log macro.
#[cfg(not(feature = "defmt"))]
macro_rules! error {
    ($($arg:tt)*) => {{
        let _ = ($($arg)*);
    }};
}
