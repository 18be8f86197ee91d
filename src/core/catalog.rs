//! Filter catalog: the fixed, ordered menu of selectable filters.
//!
//! Descriptors carry no parameter information. Which sliders a filter gets
//! is decided at selection time by asking the rendering backend which input
//! keys the filter accepts.

use crate::core::error::{EditError, EditResult};
use serde::Serialize;

/// One selectable filter, identified by the name the rendering backend
/// understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilterDescriptor {
    /// Backend-facing identifier (e.g. `"gaussian_blur"`).
    pub name: &'static str,
    /// Human-readable name for menus and titles.
    pub display_name: &'static str,
}

/// The ordered menu of filters presented to the user.
///
/// The first entry is the default selection for a fresh session.
const CATALOG: [FilterDescriptor; 7] = [
    FilterDescriptor { name: "sepia_tone", display_name: "Sepia Tone" },
    FilterDescriptor { name: "bump_distortion", display_name: "Bump Distortion" },
    FilterDescriptor { name: "gaussian_blur", display_name: "Gaussian Blur" },
    FilterDescriptor { name: "pixellate", display_name: "Pixellate" },
    FilterDescriptor { name: "twirl_distortion", display_name: "Twirl Distortion" },
    FilterDescriptor { name: "unsharp_mask", display_name: "Unsharp Mask" },
    FilterDescriptor { name: "vignette", display_name: "Vignette" },
];

/// Pure lookup table over the filter menu.
pub struct FilterCatalog;

impl FilterCatalog {
    /// All filters in menu order.
    pub fn all() -> &'static [FilterDescriptor] {
        &CATALOG
    }

    /// The filter a fresh session starts with.
    pub fn default_filter() -> FilterDescriptor {
        CATALOG[0]
    }

    /// Resolve a filter by exact backend-facing name.
    ///
    /// Fails with [`EditError::UnknownFilter`]. Defensive: the menu is
    /// closed, so a miss indicates a UI-layer defect.
    pub fn by_name(name: &str) -> EditResult<FilterDescriptor> {
        CATALOG
            .iter()
            .copied()
            .find(|descriptor| descriptor.name == name)
            .ok_or_else(|| EditError::UnknownFilter(name.to_string()))
    }

    /// Number of filters in the menu.
    pub fn len() -> usize {
        CATALOG.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_has_seven_filters() {
        assert_eq!(FilterCatalog::len(), 7);
        assert_eq!(FilterCatalog::all().len(), 7);
    }

    #[test]
    fn test_default_is_sepia() {
        assert_eq!(FilterCatalog::default_filter().name, "sepia_tone");
        assert_eq!(FilterCatalog::default_filter(), FilterCatalog::all()[0]);
    }

    #[test]
    fn test_names_are_unique() {
        let names: HashSet<&str> = FilterCatalog::all().iter().map(|d| d.name).collect();
        assert_eq!(names.len(), FilterCatalog::len());
    }

    #[test]
    fn test_by_name_exact_match() {
        let descriptor = FilterCatalog::by_name("twirl_distortion").unwrap();
        assert_eq!(descriptor.display_name, "Twirl Distortion");
    }

    #[test]
    fn test_by_name_unknown() {
        let err = FilterCatalog::by_name("solarize").unwrap_err();
        assert!(matches!(err, EditError::UnknownFilter(name) if name == "solarize"));
    }
}
