//! Logging setup for the clwrap driver
//!
//! Both crates log through the `log` facade; the driver installs
//! `env_logger` once at startup with [`init`].
//!
//! # Log Levels
//!
//! - `warn!` - failed program builds, unrecognized job targets
//! - `info!` - the selected device, the loaded job
//! - `debug!` - device search, lazy context and queue creation
//! - `trace!` - grid size of every dispatch
//!
//! Without `--verbose`, `RUST_LOG` decides what is shown (default `warn`).
//! `--verbose` raises the global level to `debug`; module directives from
//! `RUST_LOG` still apply on top of it.
//!
//! ```bash
//! RUST_LOG=info clwrap job.xml
//! RUST_LOG=clwrap_gpu::select=trace clwrap --verbose job.xml
//! ```

use env_logger::{Builder, Env};
use log::LevelFilter;
use std::io::Write;
use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize logging for the driver. Subsequent calls are no-ops.
pub fn init(verbose: bool) {
    INIT.call_once(|| {
        builder(verbose, Env::default().default_filter_or("warn")).init();
    });
}

fn builder(verbose: bool, env: Env<'_>) -> Builder {
    let mut builder = Builder::from_env(env);
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.format(|buf, record| {
        writeln!(
            buf,
            "[{:5}] {}:{} - {}",
            record.level(),
            record.file().unwrap_or("unknown"),
            record.line().unwrap_or(0),
            record.args()
        )
    });
    builder
}

/// Initialize logging for tests; safe to call from every test.
pub fn init_test() {
    let _ = env_logger::builder()
        .filter_level(LevelFilter::Warn)
        .is_test(true)
        .try_init();
}
