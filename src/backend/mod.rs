//! Rendering collaborator contract.
//!
//! The editing core is written purely against this four-operation
//! interface: create a filter by name, query which input keys it accepts,
//! bind inputs, render. Capability is a runtime query against the live
//! handle rather than a static table, so a backend can grow new filter
//! variants and the session picks up the applicable sliders automatically.
//!
//! A backend may be expensive to construct. Sessions create one and reuse
//! it for every render; handles are cheap and created per render.

pub mod software;

pub use software::SoftwareBackend;

use crate::core::error::EditResult;
use image::DynamicImage;
use indexmap::IndexSet;
use std::sync::Arc;

/// A value bound to one of a filter's named inputs.
#[derive(Debug, Clone)]
pub enum InputValue {
    /// The source image.
    Image(Arc<DynamicImage>),
    /// A numeric parameter value.
    Scalar(f64),
    /// A 2D point in pixel coordinates, e.g. the effect center.
    Position(f64, f64),
}

impl InputValue {
    /// Try to view this value as a scalar.
    pub fn as_scalar(&self) -> Option<f64> {
        if let InputValue::Scalar(v) = self {
            Some(*v)
        } else {
            None
        }
    }

    /// Try to view this value as a 2D position.
    pub fn as_position(&self) -> Option<(f64, f64)> {
        if let InputValue::Position(x, y) = self {
            Some((*x, *y))
        } else {
            None
        }
    }

    /// Try to view this value as an image.
    pub fn as_image(&self) -> Option<&Arc<DynamicImage>> {
        if let InputValue::Image(img) = self {
            Some(img)
        } else {
            None
        }
    }
}

/// One configurable filter instance created by a backend.
pub trait FilterHandle {
    /// The set of input keys this filter accepts, in a stable order.
    ///
    /// The session intersects this set with the parameter registry to
    /// decide which sliders to show.
    fn accepted_input_keys(&self) -> &IndexSet<&'static str>;

    /// Bind a value to a named input. Unknown keys are ignored.
    fn set_input(&mut self, key: &str, value: InputValue);

    /// Render the filtered output over the full extent of the source.
    ///
    /// Fails with [`crate::core::error::EditError::RenderUnavailable`]
    /// when the backend cannot produce output for the current inputs.
    fn render_output(&self) -> EditResult<DynamicImage>;
}

/// Factory for filter handles: the rendering collaborator.
pub trait FilterBackend: Send + Sync {
    /// Create a filter instance by backend-facing name.
    ///
    /// Fails with [`crate::core::error::EditError::UnknownFilter`] when
    /// the backend has no filter by that name.
    fn create_filter(&self, name: &str) -> EditResult<Box<dyn FilterHandle>>;
}
