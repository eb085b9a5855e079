// File: src/logging.rs
//
// Tracing subscriber setup for the pithon binary.
// Library code only emits events; installing a subscriber is left to the
// binary so embedders keep control of their own logging.

use std::sync::Once;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static TRACING_INIT: Once = Once::new();

/// Filter used when `RUST_LOG` is not set: `-v` enables debug events for
/// this crate, `-vv` and above enable trace events
pub fn default_directive(verbosity: u8) -> String {
    let level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    format!("warn,pithon={}", level)
}

/// Installs the global subscriber once. Events go to stderr so that
/// program output on stdout stays clean.
pub fn init(verbosity: u8) {
    TRACING_INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true).with_level(true))
            .with(filter)
            .init();
    });
}
