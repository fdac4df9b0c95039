use std::io::Write;

use env_logger::{Builder, Target};
use log::LevelFilter;

/// Sets up an env_logger writing to stderr, so stdout stays reserved for
/// solution output. The `RUST_LOG` environment variable overrides `level`.
pub fn build_logger_for_level(level: LevelFilter) {
    let mut builder = Builder::new();

    builder
        .filter_level(level)
        .parse_default_env()
        .target(Target::Stderr)
        .format(|buf, record| writeln!(buf, "[{:5}] {}", record.level(), record.args()));

    // may be called a second time from tests; the first initialization wins
    let _ = builder.try_init();
}

pub fn build_logger() {
    build_logger_for_level(LevelFilter::Info);
}
