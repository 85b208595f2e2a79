//! Logging setup shared by the odp workspace binaries.

pub mod logging;

/// Initializes logging for a binary. See [`logging::init`].
pub fn init() {
    logging::init();
}
