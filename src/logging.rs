//! Diagnostic logging for the binary.

use tracing::Level;

/// Installs a stderr subscriber at INFO level.
///
/// The level is fixed: the tool reads no environment variables, so there is no
/// `RUST_LOG` lookup. Calling this more than once is harmless.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}
