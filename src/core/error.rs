//! Error types for the editing core.
//!
//! Uses thiserror for structured errors. Every variant is recoverable
//! within a session: the controller logs it and leaves the previously
//! displayed image untouched. Nothing is retried automatically; the next
//! user-initiated event is the retry.

use crate::core::params::ParameterId;
use thiserror::Error;

/// Top-level error type for the editing core.
#[derive(Error, Debug)]
pub enum EditError {
    /// The requested filter name is not in the catalog (or the backend has
    /// no filter by that name). Should be unreachable given a closed menu.
    #[error("unknown filter '{0}'")]
    UnknownFilter(String),

    /// A slider event arrived for a parameter the selected filter does not
    /// accept. Should be unreachable: the UI only shows active sliders.
    #[error("parameter '{0}' is not active for the selected filter")]
    InactiveParameter(ParameterId),

    /// The rendering backend could not produce output for the current
    /// inputs. The previously displayed image stays as-is.
    #[error("renderer produced no output for filter '{filter}'")]
    RenderUnavailable {
        /// Backend-facing name of the filter that failed.
        filter: String,
    },

    /// Export was requested before any render succeeded.
    #[error("no rendered output to export")]
    NothingToExport,

    /// Image encode/decode error from the `image` crate (export path).
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error (export path).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EditError {
    /// Whether this error indicates a defect in the driving UI layer
    /// rather than a condition that can legitimately occur at runtime.
    ///
    /// Defects are logged louder; render failures are part of normal life.
    pub fn is_ui_defect(&self) -> bool {
        matches!(
            self,
            EditError::UnknownFilter(_) | EditError::InactiveParameter(_)
        )
    }
}

/// Result type alias for editing operations.
pub type EditResult<T> = Result<T, EditError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = EditError::UnknownFilter("mystery".to_string());
        assert_eq!(err.to_string(), "unknown filter 'mystery'");

        let err = EditError::InactiveParameter(ParameterId::Radius);
        assert!(err.to_string().contains("Radius"));
    }

    #[test]
    fn test_ui_defect_classification() {
        assert!(EditError::UnknownFilter("x".into()).is_ui_defect());
        assert!(EditError::InactiveParameter(ParameterId::Scale).is_ui_defect());
        assert!(!EditError::RenderUnavailable { filter: "vignette".into() }.is_ui_defect());
        assert!(!EditError::NothingToExport.is_ui_defect());
    }
}
