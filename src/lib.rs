//! # Kerf
//!
//! A G-code driver for GRBL-family laser cutters: encodes vector and
//! raster job parts into the controller's textual command stream and
//! delivers it over a flow-controlled serial link.
//!
//! ## Architecture
//!
//! Kerf is organized as a workspace with four crates:
//!
//! 1. **kerf-core** - Job model, unit conversion, errors, progress reporting
//! 2. **kerf-encoder** - G-code emission, raster scan conversion, bitmap import
//! 3. **kerf-driver** - Serial link, flow-controlled transmission, orchestration
//! 4. **kerf-settings** - Device configuration persistence
//!
//! The `kerf` binary integrates all of them behind a small CLI.

pub mod cli;

pub use kerf_core::{Error, LogProgressListener, ProgressListener, Result};
pub use kerf_driver::{CancelToken, GrblDriver};
pub use kerf_settings::DeviceConfig;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output on stderr, keeping stdout free for command output
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    Ok(())
}
