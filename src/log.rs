//! Utilities for logging messages from the library.
//!
//! Logging is off unless the `SVGFLAT_LOG` environment variable is set, in which case
//! messages go to stdout.  This is meant for debugging why a path came out shorter than
//! expected (parse errors truncate paths silently) or why an arc turned into a line.

use once_cell::sync::Lazy;

#[doc(hidden)]
#[macro_export]
macro_rules! flat_log {
    (
        $($arg:tt)+
    ) => {
        if $crate::log::log_enabled() {
            println!("{}", format_args!($($arg)+));
        }
    };
}

pub fn log_enabled() -> bool {
    static ENABLED: Lazy<bool> = Lazy::new(|| ::std::env::var_os("SVGFLAT_LOG").is_some());

    *ENABLED
}
