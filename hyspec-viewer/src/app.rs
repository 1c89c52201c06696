//! Interactive session state and logic.
//!
//! Contains the `ViewerSession` struct which owns the loaded cube, the
//! published raster set, navigation and selection, and drains messages from
//! the render pipeline.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use hyspec_algorithms::{
    extract_profile, highlight, render_filtered, BandRenderer, GrayscaleRenderer,
    HighlightCondition, SpatialFilter,
};
use hyspec_core::{
    Cube, NavigationState, PixelCoord, Rect, RenderedBand, SelectionRegion, SpectralProfile,
};
use hyspec_io::{write_profile_csv, write_raster_png, CubeLoader};
use log::{info, warn};

use crate::command::ViewerCommand;
use crate::config::ViewerConfig;
use crate::error::{Result, ViewerError};
use crate::message::PipelineMessage;
use crate::pipeline::RenderPipeline;
use crate::state::ProcessingState;

/// How a render run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutcome {
    /// The new cube and its rasters are now displayed.
    Published { bands: usize, elapsed: Duration },
    /// The run failed; the previous cube stays displayed.
    Failed(String),
}

/// Status line data for the displayed band.
#[derive(Debug, Clone, PartialEq)]
pub struct BandInfo {
    /// Band number counted from 1.
    pub index: usize,
    /// Number of bands in the cube.
    pub count: usize,
    /// Wavelength of the band in nanometres.
    pub wavelength_nm: f64,
    /// Display label such as `"528 nm"`.
    pub label: String,
}

/// Headless viewer controller.
///
/// All methods run on the interactive thread. The only background work is
/// the render run started by [`open`](Self::open) or
/// [`load_cube`](Self::load_cube); its results are applied by
/// [`handle_messages`](Self::handle_messages).
pub struct ViewerSession {
    config: ViewerConfig,
    loader: Option<Box<dyn CubeLoader>>,
    pipeline: RenderPipeline,

    /// Cube whose rasters are displayed.
    cube: Option<Arc<Cube>>,
    /// Cube being rendered; published when its run completes.
    pending: Option<Arc<Cube>>,
    bands: Option<Arc<[RenderedBand]>>,

    navigation: NavigationState,
    selection: Option<SelectionRegion>,
    /// Filter or highlight output shown until the next navigation command.
    overlay: Option<RenderedBand>,
    /// Pinned comparison image.
    frozen: Option<RenderedBand>,

    processing: ProcessingState,
}

impl ViewerSession {
    /// Create an empty session.
    ///
    /// With the `hdf5` feature the session can open HDF5 files using the
    /// configured dataset paths.
    #[must_use]
    pub fn new(config: ViewerConfig) -> Self {
        let renderer = Arc::new(GrayscaleRenderer::new(config.wavelengths));
        Self {
            loader: default_loader(&config),
            pipeline: RenderPipeline::new(renderer),
            config,
            cube: None,
            pending: None,
            bands: None,
            navigation: NavigationState::default(),
            selection: None,
            overlay: None,
            frozen: None,
            processing: ProcessingState::default(),
        }
    }

    /// Use `loader` for [`open`](Self::open).
    #[must_use]
    pub fn with_loader(mut self, loader: Box<dyn CubeLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Use `renderer` for subsequent render runs.
    #[must_use]
    pub fn with_renderer(mut self, renderer: Arc<dyn BandRenderer>) -> Self {
        self.pipeline = RenderPipeline::new(renderer);
        self
    }

    /// Load a file and start rendering it in the background.
    ///
    /// Returns the render run's generation.
    ///
    /// # Errors
    /// Fails if a run is already active, no loader is configured, the file
    /// holds no usable cube, or the worker cannot start.
    pub fn open(&mut self, path: &Path) -> anyhow::Result<u64> {
        if self.pipeline.is_running() {
            return Err(ViewerError::PipelineBusy.into());
        }
        let loader = self
            .loader
            .as_ref()
            .context("no cube loader configured")?;
        let cube = loader
            .load(path)
            .with_context(|| format!("failed to load {}", path.display()))?;
        self.load_cube(cube)
            .context("failed to start render pipeline")
    }

    /// Start rendering an already loaded cube.
    ///
    /// The cube is displayed once its run completes.
    ///
    /// # Errors
    /// Returns [`ViewerError::PipelineBusy`] if a run is active.
    pub fn load_cube(&mut self, cube: Cube) -> Result<u64> {
        let cube = Arc::new(cube);
        let generation = self.pipeline.start(Arc::clone(&cube))?;
        info!(
            "cube {}x{}x{} bands, range [{}, {}]",
            cube.width(),
            cube.height(),
            cube.band_count(),
            cube.min_value(),
            cube.max_value()
        );
        self.pending = Some(cube);
        self.processing.begin("Rendering bands...");
        Ok(generation)
    }

    /// Abandon the active render run. The displayed cube is unchanged.
    pub fn cancel_render(&mut self) {
        if self.pipeline.is_running() {
            self.pipeline.cancel();
            self.pending = None;
            self.processing.finish("Cancelled");
        }
    }

    /// Apply pending messages from the render worker.
    ///
    /// Returns the outcome if the run ended during this call.
    pub fn handle_messages(&mut self) -> Option<RenderOutcome> {
        let mut outcome = None;
        while let Some(message) = self.pipeline.try_next() {
            if let Some(done) = self.apply_message(message) {
                outcome = Some(done);
            }
        }
        outcome
    }

    /// Block until the active run ends.
    ///
    /// # Errors
    /// Returns [`ViewerError::RenderFailed`] if the run fails.
    pub fn wait_for_render(&mut self) -> Result<Option<RenderOutcome>> {
        while let Some(message) = self.pipeline.next_blocking() {
            match self.apply_message(message) {
                Some(RenderOutcome::Failed(reason)) => {
                    return Err(ViewerError::RenderFailed(reason))
                }
                Some(done) => return Ok(Some(done)),
                None => {}
            }
        }
        Ok(None)
    }

    fn apply_message(&mut self, message: PipelineMessage) -> Option<RenderOutcome> {
        match message {
            PipelineMessage::Progress(percent) => {
                self.processing.update(percent);
                None
            }
            PipelineMessage::Complete(bands, elapsed) => {
                let Some(cube) = self.pending.take() else {
                    warn!("render completed with no pending cube");
                    return None;
                };
                let count = bands.len();
                self.navigation.reset(cube.band_count());
                self.cube = Some(cube);
                self.bands = Some(bands.into());
                self.selection = None;
                self.overlay = None;
                self.frozen = None;
                self.processing.finish(format!(
                    "Rendered {count} bands in {:.2}s",
                    elapsed.as_secs_f64()
                ));
                Some(RenderOutcome::Published {
                    bands: count,
                    elapsed,
                })
            }
            PipelineMessage::Failed(reason) => {
                self.pending = None;
                self.processing.finish(format!("Error: {reason}"));
                Some(RenderOutcome::Failed(reason))
            }
        }
    }

    /// Apply an operator command.
    ///
    /// Navigation commands clear the overlay. Selections are clamped to the
    /// cube. Returns `true` if the displayed band or the selection changed.
    /// Without a cube every command is ignored.
    pub fn apply(&mut self, command: ViewerCommand) -> bool {
        let Some(cube) = self.cube.as_ref() else {
            return false;
        };
        let (width, height) = (cube.width(), cube.height());

        if command.is_navigation() {
            self.overlay = None;
        }
        match command {
            ViewerCommand::StepNext => self.navigation.next(),
            ViewerCommand::StepPrevious => self.navigation.previous(),
            ViewerCommand::GotoIndex(n) => self.navigation.goto(n),
            ViewerCommand::SelectPoint { row, col } => {
                let at = PixelCoord::new(row, col).clamp_to(width, height);
                self.set_selection(SelectionRegion::Point(at))
            }
            ViewerCommand::SelectRegion(rect) => {
                let clamped = Rect::from_corners(
                    rect.top_left().clamp_to(width, height),
                    rect.bottom_right().clamp_to(width, height),
                );
                self.set_selection(SelectionRegion::Region(clamped))
            }
        }
    }

    fn set_selection(&mut self, selection: SelectionRegion) -> bool {
        let changed = self.selection != Some(selection);
        self.selection = Some(selection);
        changed
    }

    /// Clear the point or region selection.
    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Precomputed raster for the current band.
    #[must_use]
    pub fn current_band(&self) -> Option<&RenderedBand> {
        self.bands
            .as_ref()
            .and_then(|bands| bands.get(self.navigation.current()))
    }

    /// Raster to show: the overlay if present, else the current band.
    #[must_use]
    pub fn displayed(&self) -> Option<&RenderedBand> {
        self.overlay.as_ref().or_else(|| self.current_band())
    }

    /// Drop the filter or highlight overlay.
    pub fn clear_overlay(&mut self) {
        self.overlay = None;
    }

    /// Filter the current band and show the result as the overlay.
    ///
    /// # Errors
    /// Returns [`ViewerError::NoCube`] if nothing is displayed.
    pub fn apply_filter(&mut self, filter: SpatialFilter) -> Result<&RenderedBand> {
        let cube = self.cube.as_ref().ok_or(ViewerError::NoCube)?;
        let rendered = render_filtered(
            cube,
            self.navigation.current(),
            filter,
            &self.config.filter,
            &self.config.wavelengths,
        )?;
        Ok(self.overlay.insert(rendered))
    }

    /// Highlight the current band and show the result as the overlay.
    ///
    /// # Errors
    /// Returns [`ViewerError::NoCube`] if nothing is displayed.
    pub fn highlight(
        &mut self,
        threshold: f32,
        condition: HighlightCondition,
    ) -> Result<&RenderedBand> {
        let cube = self.cube.as_ref().ok_or(ViewerError::NoCube)?;
        let rendered = highlight(
            cube,
            self.navigation.current(),
            threshold,
            condition,
            &self.config.wavelengths,
        )?;
        Ok(self.overlay.insert(rendered))
    }

    /// Spectral profile of the current selection.
    ///
    /// # Errors
    /// Returns [`ViewerError::NoCube`] or [`ViewerError::NoSelection`].
    pub fn profile(&self) -> Result<SpectralProfile> {
        let selection = self.selection.ok_or(ViewerError::NoSelection)?;
        self.profile_for(&selection)
    }

    /// Spectral profile of an arbitrary selection on the displayed cube.
    ///
    /// # Errors
    /// Returns [`ViewerError::NoCube`] or a core error for a selection
    /// outside the cube.
    pub fn profile_for(&self, selection: &SelectionRegion) -> Result<SpectralProfile> {
        let cube = self.cube.as_ref().ok_or(ViewerError::NoCube)?;
        Ok(extract_profile(cube, selection, &self.config.wavelengths)?)
    }

    /// Pin the displayed raster as a comparison image.
    ///
    /// Returns `false` if nothing is displayed.
    pub fn freeze_current(&mut self) -> bool {
        match self.displayed().cloned() {
            Some(band) => {
                self.frozen = Some(band);
                true
            }
            None => false,
        }
    }

    /// The pinned comparison image.
    #[must_use]
    pub fn frozen(&self) -> Option<&RenderedBand> {
        self.frozen.as_ref()
    }

    pub fn clear_frozen(&mut self) {
        self.frozen = None;
    }

    /// Index, count and wavelength label of the current band.
    #[must_use]
    pub fn band_info(&self) -> Option<BandInfo> {
        let band = self.current_band()?;
        Some(BandInfo {
            index: self.navigation.display_index(),
            count: self.navigation.band_count(),
            wavelength_nm: band.wavelength_nm(),
            label: band.wavelength_label(),
        })
    }

    /// Write the displayed raster to a PNG file.
    ///
    /// # Errors
    /// Fails if nothing is displayed or the file cannot be written.
    pub fn export_displayed(&self, path: &Path) -> anyhow::Result<()> {
        let band = self.displayed().context("no band displayed")?;
        write_raster_png(path, band.buffer())
            .with_context(|| format!("failed to write {}", path.display()))
    }

    /// Write the current selection's profile to a CSV file.
    ///
    /// # Errors
    /// Fails if there is no selection or the file cannot be written.
    pub fn export_profile(&self, path: &Path) -> anyhow::Result<()> {
        let profile = self.profile()?;
        write_profile_csv(path, &profile)
            .with_context(|| format!("failed to write {}", path.display()))
    }

    #[must_use]
    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    #[must_use]
    pub fn cube(&self) -> Option<&Arc<Cube>> {
        self.cube.as_ref()
    }

    /// Every published raster, in band order.
    #[must_use]
    pub fn bands(&self) -> Option<&Arc<[RenderedBand]>> {
        self.bands.as_ref()
    }

    #[must_use]
    pub fn navigation(&self) -> &NavigationState {
        &self.navigation
    }

    #[must_use]
    pub fn selection(&self) -> Option<SelectionRegion> {
        self.selection
    }

    #[must_use]
    pub fn processing(&self) -> &ProcessingState {
        &self.processing
    }

    #[must_use]
    pub fn is_rendering(&self) -> bool {
        self.pipeline.is_running()
    }
}

impl Default for ViewerSession {
    fn default() -> Self {
        Self::new(ViewerConfig::default())
    }
}

#[cfg(feature = "hdf5")]
fn default_loader(config: &ViewerConfig) -> Option<Box<dyn CubeLoader>> {
    Some(Box::new(
        hyspec_io::Hdf5CubeLoader::new().with_dataset_paths(config.dataset_paths.clone()),
    ))
}

#[cfg(not(feature = "hdf5"))]
fn default_loader(_config: &ViewerConfig) -> Option<Box<dyn CubeLoader>> {
    None
}
