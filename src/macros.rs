//! Internal logging macros.
//!
//! With the `tracing` feature off these expand to nothing that runs, while
//! still type-checking (and "using") their arguments.

/// Enter an info span for the transform being dispatched.
macro_rules! trace_transform {
    ($name:expr) => {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!("transform", name = $name).entered();
    };
}

/// Debug-level event (plain format string arguments only).
macro_rules! hg_debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "tracing")]
        tracing::debug!($($arg)*);
        #[cfg(not(feature = "tracing"))]
        let _ = || {
            let _ = format_args!($($arg)*);
        };
    }};
}
