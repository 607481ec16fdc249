//! Shared tracing setup for the catalog binaries.

/// Initialize process-wide structured logging.
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    tracing::init();
}

/// Subscriber configuration (filters, JSON formatting).
pub mod tracing;
