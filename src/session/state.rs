//! Live editing state: the selected filter and its bound parameter values.
//!
//! Selection drives parameter binding: on every filter switch the state
//! asks the backend which input keys the filter accepts, intersects that
//! set with the parameter registry, and re-seeds the surviving parameters
//! at full strength. Values never carry over between filters.

use crate::backend::FilterBackend;
use crate::core::catalog::{FilterCatalog, FilterDescriptor};
use crate::core::error::{EditError, EditResult};
use crate::core::params::{Parameter, ParameterId};
use image::DynamicImage;
use indexmap::IndexMap;
use std::sync::Arc;

/// Callback fired whenever the selected filter changes.
///
/// This is the seam the presenter layer hangs off (e.g. refreshing a
/// "Selected Filter" title); the state itself knows nothing about display.
pub type SelectionCallback = Box<dyn Fn(&FilterDescriptor) + Send + Sync>;

/// Mutable per-session editing state.
pub struct FilterState {
    selected: FilterDescriptor,
    values: IndexMap<ParameterId, f64>,
    source: Option<Arc<DynamicImage>>,
    on_selection_changed: Option<SelectionCallback>,
}

impl FilterState {
    /// Fresh state: default filter selected, no parameters bound, no image.
    pub fn new() -> Self {
        Self {
            selected: FilterCatalog::default_filter(),
            values: IndexMap::new(),
            source: None,
            on_selection_changed: None,
        }
    }

    /// The currently selected filter.
    pub fn selected(&self) -> &FilterDescriptor {
        &self.selected
    }

    /// Live values of the active parameters, in slider display order.
    pub fn values(&self) -> &IndexMap<ParameterId, f64> {
        &self.values
    }

    /// Whether a parameter is active (adjustable) for the selected filter.
    pub fn is_active(&self, id: ParameterId) -> bool {
        self.values.contains_key(&id)
    }

    /// Registry records for the active parameters, in display order.
    /// This is what a UI shell builds its slider panel from.
    pub fn active_parameters(&self) -> Vec<Parameter> {
        self.values.keys().map(|id| Parameter::of(*id)).collect()
    }

    /// The imported source image, if any.
    pub fn source(&self) -> Option<&Arc<DynamicImage>> {
        self.source.as_ref()
    }

    /// Bind a freshly imported photo. Existing parameter values survive
    /// until the next [`FilterState::select_filter`] call re-seeds them.
    pub fn set_source(&mut self, image: Arc<DynamicImage>) {
        self.source = Some(image);
    }

    /// Register the selection-changed observer.
    pub fn set_selection_callback(&mut self, callback: SelectionCallback) {
        self.on_selection_changed = Some(callback);
    }

    /// Switch to a filter and re-derive its adjustable parameters.
    ///
    /// Queries the backend for the filter's accepted input keys; every
    /// registry parameter whose engine key is accepted becomes active at
    /// its full-strength default. Values bound for the previous filter are
    /// discarded wholesale.
    pub fn select_filter(
        &mut self,
        descriptor: FilterDescriptor,
        backend: &dyn FilterBackend,
    ) -> EditResult<()> {
        let handle = backend.create_filter(descriptor.name)?;
        let accepted = handle.accepted_input_keys();

        self.values.clear();
        for id in ParameterId::all() {
            if accepted.contains(id.engine_key()) {
                self.values.insert(*id, id.max_value());
            }
        }

        self.selected = descriptor;
        log::debug!(
            "selected '{}' with {} active parameter(s)",
            descriptor.name,
            self.values.len()
        );
        if let Some(callback) = &self.on_selection_changed {
            callback(&self.selected);
        }
        Ok(())
    }

    /// Update one active parameter from a slider event.
    ///
    /// The value is clamped into `[MIN_SLIDER_VALUE, max_value]` and the
    /// clamped value is returned. Other active parameters keep their
    /// last-set values. Fails with [`EditError::InactiveParameter`] for a
    /// parameter the selected filter does not accept, leaving all values
    /// unchanged.
    pub fn set_value(&mut self, id: ParameterId, value: f64) -> EditResult<f64> {
        if !self.values.contains_key(&id) {
            return Err(EditError::InactiveParameter(id));
        }
        let clamped = id.clamp(value);
        self.values.insert(id, clamped);
        Ok(clamped)
    }
}

impl Default for FilterState {
    fn default() -> Self {
        Self::new()
    }
}
