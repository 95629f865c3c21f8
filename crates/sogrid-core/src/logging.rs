//! Logging facilities for SO-Grid.
//!
//! SO-Grid uses the `tracing` crate for instrumentation. Nothing is printed
//! unless the host installs a subscriber:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("sogrid=debug,sogrid_table=trace")
//!     .init();
//! ```
//!
//! State setters log at `debug`, row-model computation at `trace`, and
//! listener failures at `error`.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Signal/listener dispatch.
    pub const SIGNAL: &str = "sogrid_core::signal";
    /// Tabular engine (row models, capability checks).
    pub const ENGINE: &str = "sogrid_table::engine";
    /// Column definition mapping.
    pub const COLUMNS: &str = "sogrid::columns";
    /// Grid state store.
    pub const STORE: &str = "sogrid::store";
    /// Grid API facade.
    pub const API: &str = "sogrid::api";
    /// CSV export and download delivery.
    pub const EXPORT: &str = "sogrid::export";
    /// Configuration loading.
    pub const CONFIG: &str = "sogrid::config";
}

/// Extracts a printable message from a panic payload.
pub fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "<non-string panic payload>"
    }
}
