//! Logger setup for the CLI.
//!
//! Library modules log through the `log` facade; the binary installs
//! `env_logger` once at startup. `RUST_LOG` wins over `--verbose`.

use env_logger::{Builder, Env};
use std::io::Write;

/// Default filter: `warn`, or `info` with `--verbose`.
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose { "info" } else { "warn" }
}

pub fn init_logging(verbose: bool) {
    let logging_env = Env::default().filter_or("RUST_LOG", default_filter(verbose));
    Builder::from_env(logging_env)
        .format(|buf, record| {
            writeln!(
                buf,
                "{} {} {}",
                chrono::Local::now().format("%H:%M:%S"),
                record.level().as_str().to_ascii_lowercase(),
                record.args()
            )
        })
        .init();
}
