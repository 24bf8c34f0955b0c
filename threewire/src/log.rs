//! Logging shim.
//!
//! With the `log` feature, the macros defined here forward to the `log` crate. Without it, the
//! arguments are still type-checked via `format_args!`, but nothing is emitted and none of the
//! formatting code ends up in the binary.

macro_rules! define_log_macros {
    ($d:tt $($name:ident),*) => {
        $(
            #[cfg(feature = "log")]
            #[allow(unused_macros)]
            macro_rules! $name {
                ($d($d t:tt)*) => {{ ::log::$name!($d($d t)*); }};
            }

            #[cfg(not(feature = "log"))]
            #[allow(unused_macros)]
            macro_rules! $name {
                ($d($d t:tt)*) => {{ format_args!($d($d t)*); }};
            }
        )*
    };
}

define_log_macros!($ error, warn, info, debug, trace);
