//! # Chitra - Photo-editing Core
//!
//! Chitra is the orchestration core of a minimal photo-editing
//! application: the user imports a photo, selects one of a fixed set of
//! filters, adjusts up to three numeric parameters via sliders, and
//! exports the processed result.
//!
//! The interesting part is not the pixel math but the binding protocol:
//! which parameters a filter exposes is decided at runtime by asking the
//! rendering backend which input keys the filter accepts, and every
//! parameter or filter change deterministically re-renders from the
//! unmodified source image.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use chitra::prelude::*;
//!
//! let mut session = EditorSession::with_software_backend();
//! session.import(image::open("photo.jpg")?)?;
//!
//! session.select_filter("gaussian_blur")?;
//! session.set_parameter(ParameterId::Radius, 24.0)?;
//!
//! session.export("blurred.png")?;
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: parameter registry, filter catalog, error types
//! - [`backend`]: the four-operation rendering-collaborator contract and
//!   the built-in CPU backend
//! - [`session`]: live filter state, the render engine, and the editor
//!   session that drives them per user event
//!
//! UI construction, dialogs and photo-library access are deliberately
//! outside this crate; a shell consumes [`session::EditorSession`] and
//! feeds it decoded images and user events.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod core;
pub mod session;

/// Prelude module for convenient imports.
///
/// Import everything commonly needed with:
/// ```rust,ignore
/// use chitra::prelude::*;
/// ```
pub mod prelude {
    pub use crate::backend::{FilterBackend, FilterHandle, InputValue, SoftwareBackend};
    pub use crate::core::catalog::{FilterCatalog, FilterDescriptor};
    pub use crate::core::error::{EditError, EditResult};
    pub use crate::core::params::{keys, Parameter, ParameterId, MIN_SLIDER_VALUE};
    pub use crate::session::editor::EditorSession;
    pub use crate::session::engine::RenderEngine;
    pub use crate::session::state::{FilterState, SelectionCallback};
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use image::{DynamicImage, Rgba, RgbaImage};

    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
        assert_eq!(super::NAME, "chitra");
    }

    #[test]
    fn test_end_to_end_adjustment_loop() {
        let img = RgbaImage::from_pixel(30, 30, Rgba([200, 120, 80, 255]));
        let mut session = EditorSession::with_software_backend();
        session.import(DynamicImage::ImageRgba8(img)).unwrap();

        session.select_filter("unsharp_mask").unwrap();
        assert_eq!(session.active_parameters().len(), 2);

        session.set_parameter(ParameterId::Intensity, 0.7).unwrap();
        session.set_parameter(ParameterId::Radius, 30.0).unwrap();

        let output = session.output().unwrap();
        assert_eq!((output.width(), output.height()), (30, 30));
    }
}
