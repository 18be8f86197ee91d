//! Parameter registry: the fixed table of slider-adjustable filter inputs.
//!
//! Which of these parameters actually applies to a filter is not recorded
//! here. Applicability is a runtime capability query against the rendering
//! backend (see [`crate::session::state::FilterState`]), so new filter
//! variants pick up the right sliders without touching this table.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Engine-facing input key identifiers shared with the rendering backend.
pub mod keys {
    /// The source image input.
    pub const IMAGE: &str = "image";
    /// Effect strength, dimensionless.
    pub const INTENSITY: &str = "intensity";
    /// Effect radius in pixels.
    pub const RADIUS: &str = "radius";
    /// Effect scale factor.
    pub const SCALE: &str = "scale";
    /// Geometric center of the effect. Set by the engine to the image
    /// center on every render; never slider-driven.
    pub const CENTER: &str = "center";
}

/// Lowest value any slider can reach.
///
/// Never exactly zero: a filter at zero strength is a no-op a user would
/// mistake for a bug.
pub const MIN_SLIDER_VALUE: f64 = 0.1;

/// Identity of a slider-adjustable parameter.
///
/// Closed enumeration, so the projections below are infallible.
/// Declaration order is the display order of the slider panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterId {
    /// Effect strength (tone mapping, sharpening amount, vignette depth).
    Intensity,
    /// Effect radius in pixels (blurs, distortions).
    Radius,
    /// Effect scale factor (pixellation block size, distortion magnitude).
    Scale,
}

impl ParameterId {
    /// All parameter ids in slider display order.
    pub fn all() -> &'static [ParameterId] {
        &[
            ParameterId::Intensity,
            ParameterId::Radius,
            ParameterId::Scale,
        ]
    }

    /// Human-readable label for the slider.
    pub fn display_name(&self) -> &'static str {
        match self {
            ParameterId::Intensity => "Intensity",
            ParameterId::Radius => "Radius",
            ParameterId::Scale => "Scale",
        }
    }

    /// Upper slider bound. Always positive.
    pub fn max_value(&self) -> f64 {
        match self {
            ParameterId::Intensity => 1.0,
            ParameterId::Radius => 200.0,
            ParameterId::Scale => 10.0,
        }
    }

    /// The input key the rendering backend expects for this parameter.
    pub fn engine_key(&self) -> &'static str {
        match self {
            ParameterId::Intensity => keys::INTENSITY,
            ParameterId::Radius => keys::RADIUS,
            ParameterId::Scale => keys::SCALE,
        }
    }

    /// Clamp a raw slider value into this parameter's valid range.
    ///
    /// Out-of-range values map to the nearest bound; they are never rejected.
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(MIN_SLIDER_VALUE, self.max_value())
    }
}

impl fmt::Display for ParameterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Immutable registry record for one adjustable parameter.
///
/// UI-facing: serialized as-is to drive slider construction in a shell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Parameter {
    /// Parameter identity.
    pub id: ParameterId,
    /// Human-readable slider label.
    pub display_name: &'static str,
    /// Upper slider bound.
    pub max_value: f64,
    /// Input key the rendering backend expects.
    pub engine_key: &'static str,
}

impl Parameter {
    /// The registry record for one parameter id.
    pub fn of(id: ParameterId) -> Self {
        Self {
            id,
            display_name: id.display_name(),
            max_value: id.max_value(),
            engine_key: id.engine_key(),
        }
    }

    /// All registry records in slider display order.
    pub fn registry() -> Vec<Parameter> {
        ParameterId::all().iter().copied().map(Parameter::of).collect()
    }
}
