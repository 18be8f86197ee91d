//! Editor session: the controller driving state and engine per user event.
//!
//! One session per edited photo. Events arrive synchronously (import a
//! photo, pick a filter, move a slider), each triggers at most one render
//! before returning. A failed render is logged and leaves the previously
//! displayed output untouched; the next event is the retry.

use crate::backend::{FilterBackend, SoftwareBackend};
use crate::core::catalog::{FilterCatalog, FilterDescriptor};
use crate::core::error::{EditError, EditResult};
use crate::core::params::{Parameter, ParameterId};
use crate::session::engine::RenderEngine;
use crate::session::state::{FilterState, SelectionCallback};
use image::DynamicImage;
use std::path::Path;
use std::sync::Arc;

/// A single photo-editing session.
///
/// State machine: `NoImage → ImageLoaded → (FilterSelected ⇄
/// ParameterAdjusted)`, every transition re-entering through a render.
/// Importing a new photo resets the session to the default filter with
/// defaulted values. There is no terminal state.
pub struct EditorSession {
    backend: Arc<dyn FilterBackend>,
    engine: RenderEngine,
    state: FilterState,
    output: Option<DynamicImage>,
}

impl EditorSession {
    /// Create a session over a shared rendering backend.
    ///
    /// The backend is constructed once and reused for every render and
    /// capability query in this session.
    pub fn new(backend: Arc<dyn FilterBackend>) -> Self {
        Self {
            engine: RenderEngine::new(Arc::clone(&backend)),
            backend,
            state: FilterState::new(),
            output: None,
        }
    }

    /// Create a session over the built-in software backend.
    pub fn with_software_backend() -> Self {
        Self::new(Arc::new(SoftwareBackend::new()))
    }

    /// The live editing state.
    pub fn state(&self) -> &FilterState {
        &self.state
    }

    /// The currently selected filter.
    pub fn selected_filter(&self) -> &FilterDescriptor {
        self.state.selected()
    }

    /// Registry records for the sliders the UI should currently show.
    pub fn active_parameters(&self) -> Vec<Parameter> {
        self.state.active_parameters()
    }

    /// The latest successfully rendered image, if any.
    ///
    /// A failed render never touches this; it always reflects the last
    /// good output.
    pub fn output(&self) -> Option<&DynamicImage> {
        self.output.as_ref()
    }

    /// Register the observer fired whenever the selected filter changes.
    pub fn set_selection_callback(&mut self, callback: SelectionCallback) {
        self.state.set_selection_callback(callback);
    }

    /// Import a photo, resetting the session around it.
    ///
    /// Selection returns to the default filter with full-strength values
    /// and an initial render is produced.
    pub fn import(&mut self, image: DynamicImage) -> EditResult<()> {
        log::info!("imported {}x{} photo", image.width(), image.height());
        self.state.set_source(Arc::new(image));
        self.state
            .select_filter(FilterCatalog::default_filter(), self.backend.as_ref())?;
        self.refresh()
    }

    /// Switch to the named catalog filter and re-render.
    ///
    /// A safe no-op before any photo is imported.
    pub fn select_filter(&mut self, name: &str) -> EditResult<()> {
        let descriptor = FilterCatalog::by_name(name)?;
        if self.state.source().is_none() {
            log::debug!("no photo imported; ignoring selection of '{}'", name);
            return Ok(());
        }
        self.state.select_filter(descriptor, self.backend.as_ref())?;
        self.refresh()
    }

    /// Apply a slider event and re-render.
    ///
    /// A safe no-op before any photo is imported. The UI passes the
    /// parameter's identity directly; there is no ordinal decoding.
    pub fn set_parameter(&mut self, id: ParameterId, value: f64) -> EditResult<()> {
        if self.state.source().is_none() {
            log::debug!("no photo imported; ignoring slider event for {}", id);
            return Ok(());
        }
        match self.state.set_value(id, value) {
            Ok(clamped) => {
                log::debug!("set {} = {}", id, clamped);
            }
            Err(err) => {
                log::warn!("rejected slider event: {}", err);
                return Err(err);
            }
        }
        self.refresh()
    }

    /// Write the latest output image to disk.
    ///
    /// Fails with [`EditError::NothingToExport`] before the first
    /// successful render. The format follows the path extension.
    pub fn export(&self, path: impl AsRef<Path>) -> EditResult<()> {
        let path = path.as_ref();
        let output = self.output.as_ref().ok_or(EditError::NothingToExport)?;
        output.save(path)?;
        log::info!(
            "exported {}x{} image to {}",
            output.width(),
            output.height(),
            path.display()
        );
        Ok(())
    }

    /// Re-render the current state and, on success, replace the output.
    fn refresh(&mut self) -> EditResult<()> {
        let Some(source) = self.state.source().cloned() else {
            return Ok(());
        };
        match self
            .engine
            .render(&source, self.state.selected(), self.state.values())
        {
            Ok(image) => {
                self.output = Some(image);
                Ok(())
            }
            Err(err) => {
                log::warn!("render failed, keeping previous output: {}", err);
                Err(err)
            }
        }
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::with_software_backend()
    }
}
