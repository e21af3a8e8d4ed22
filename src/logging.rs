// src/logging.rs
// =============================================================================
// Logger setup for the binary.
//
// RUST_LOG is read first (so per-module filters work), then the --log-level
// flag sets the overall level. HTTP plumbing is capped at info because its
// debug output drowns out the sweep logs.
// =============================================================================

use std::io::Write;

use log::{LevelFilter, SetLoggerError};

pub fn init_logger(level: LevelFilter) -> Result<(), SetLoggerError> {
    let mut builder = env_logger::Builder::from_default_env();

    builder.filter_level(level);
    builder.filter_module("reqwest", LevelFilter::Info);
    builder.filter_module("hyper", LevelFilter::Info);
    builder.filter_module("rustls", LevelFilter::Warn);

    builder.format(|buf, record| {
        writeln!(
            buf,
            "{} {:<5} [{}] {}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S"),
            record.level(),
            record.target(),
            record.args()
        )
    });

    // try_init so a second call (tests) doesn't panic
    builder.try_init()
}
