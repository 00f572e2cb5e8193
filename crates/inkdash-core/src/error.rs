//! Error types for the dashboard core

use thiserror_no_std::Error;

/// Errors surfaced by the layout registry.
///
/// Feedback values and placements are sanitized rather than rejected, so the
/// only failures left are bookkeeping ones.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DashError {
    /// The layout surface has no free widget slot
    #[error("Layout surface full (max: {max})")]
    SurfaceFull {
        /// Maximum number of registered widgets
        max: usize,
    },

    /// A widget id does not name a registered widget
    #[error("Unknown widget: {id}")]
    UnknownWidget {
        /// The id that failed to resolve
        id: u8,
    },
}

/// Result type for dashboard operations
pub type DashResult<T> = Result<T, DashError>;
