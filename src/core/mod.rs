//! Core vocabulary of the editing pipeline.
//!
//! This module contains the foundational types the rest of the crate is
//! written against:
//! - The parameter registry (ids, display names, bounds, engine keys)
//! - The filter catalog (the ordered menu of selectable filters)
//! - Error types

pub mod catalog;
pub mod error;
pub mod params;

// Re-export commonly used types
pub use catalog::{FilterCatalog, FilterDescriptor};
pub use error::{EditError, EditResult};
pub use params::{Parameter, ParameterId, MIN_SLIDER_VALUE};
