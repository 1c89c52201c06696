#![allow(clippy::cast_precision_loss)]
use std::path::Path;
use std::sync::Arc;

use hyspec_algorithms::{BandRenderer, GrayscaleRenderer, HighlightCondition, SpatialFilter};
use hyspec_core::{Cube, PixelCoord, ProfileSource, Rect, RenderedBand, SelectionRegion};
use hyspec_io::CubeLoader;
use hyspec_viewer::{RenderOutcome, ViewerCommand, ViewerConfig, ViewerError, ViewerSession};
use tempfile::NamedTempFile;

fn cube(bands: usize, height: usize, width: usize) -> Cube {
    let planes: Vec<Vec<f32>> = (0..bands)
        .map(|b| {
            (0..height * width)
                .map(|i| (b * 1000 + i) as f32)
                .collect()
        })
        .collect();
    Cube::from_bands(width, height, &planes).unwrap()
}

fn loaded_session(bands: usize) -> ViewerSession {
    let mut session = ViewerSession::new(ViewerConfig::default());
    session.load_cube(cube(bands, 4, 4)).unwrap();
    let outcome = session.wait_for_render().unwrap();
    assert!(matches!(outcome, Some(RenderOutcome::Published { .. })));
    session
}

struct MemoryLoader;

impl CubeLoader for MemoryLoader {
    fn load(&self, _path: &Path) -> hyspec_io::Result<Cube> {
        Ok(cube(3, 2, 2))
    }
}

struct MissingLoader;

impl CubeLoader for MissingLoader {
    fn load(&self, path: &Path) -> hyspec_io::Result<Cube> {
        Err(hyspec_io::Error::DatasetNotFound(path.display().to_string()))
    }
}

/// Fails every cube with exactly three bands.
struct PickyRenderer;

impl BandRenderer for PickyRenderer {
    fn name(&self) -> &'static str {
        "picky"
    }

    fn render(&self, cube: &Cube, band: usize) -> hyspec_core::Result<RenderedBand> {
        if cube.band_count() == 3 {
            return Err(hyspec_core::Error::ConfigError("three bands".to_string()));
        }
        GrayscaleRenderer::default().render(cube, band)
    }
}

#[test]
fn test_publish_and_navigate() {
    let mut session = loaded_session(5);
    assert_eq!(session.bands().unwrap().len(), 5);
    assert!(!session.is_rendering());
    assert_eq!(session.processing().progress, 100);

    let info = session.band_info().unwrap();
    assert_eq!(info.index, 1);
    assert_eq!(info.count, 5);
    assert_eq!(info.label, "528 nm");

    assert!(!session.apply(ViewerCommand::StepPrevious));
    assert_eq!(session.navigation().current(), 0);
    for _ in 0..4 {
        assert!(session.apply(ViewerCommand::StepNext));
    }
    assert!(!session.apply(ViewerCommand::StepNext));
    assert_eq!(session.navigation().current(), 4);
    assert_eq!(session.band_info().unwrap().label, "544 nm");

    assert!(session.apply(ViewerCommand::GotoIndex(3)));
    assert_eq!(session.navigation().current(), 2);
    assert_eq!(session.current_band().unwrap().band_index(), 2);
    assert!(!session.apply(ViewerCommand::GotoIndex(0)));
    assert!(!session.apply(ViewerCommand::GotoIndex(6)));
}

#[test]
fn test_commands_ignored_without_cube() {
    let mut session = ViewerSession::default();
    assert!(!session.apply(ViewerCommand::StepNext));
    assert!(!session.apply(ViewerCommand::SelectPoint { row: 0, col: 0 }));
    assert!(session.displayed().is_none());
    assert!(matches!(
        session.apply_filter(SpatialFilter::Box),
        Err(ViewerError::NoCube)
    ));
}

#[test]
fn test_overlay_cleared_on_navigation() {
    let mut session = loaded_session(3);
    let overlay = session
        .highlight(5.0, HighlightCondition::Above)
        .unwrap()
        .clone();
    assert_eq!(session.displayed(), Some(&overlay));
    assert_ne!(session.displayed(), session.current_band());

    session.apply(ViewerCommand::StepNext);
    assert_eq!(session.displayed(), session.current_band());

    session.apply_filter(SpatialFilter::Mosaic).unwrap();
    assert_ne!(session.displayed(), session.current_band());
    // A no-op step still counts as navigation
    session.apply(ViewerCommand::GotoIndex(99));
    assert_eq!(session.displayed(), session.current_band());
}

#[test]
fn test_selection_clamped_and_profiled() {
    let mut session = loaded_session(2);
    assert!(matches!(session.profile(), Err(ViewerError::NoSelection)));

    assert!(session.apply(ViewerCommand::SelectPoint { row: 99, col: 1 }));
    assert_eq!(
        session.selection(),
        Some(SelectionRegion::Point(PixelCoord::new(3, 1)))
    );
    let profile = session.profile().unwrap();
    assert_eq!(profile.values(), &[13.0, 1013.0]);
    assert_eq!(profile.wavelengths(), &[528.0, 532.0]);

    session.apply(ViewerCommand::select_region(
        PixelCoord::new(2, 2),
        PixelCoord::new(1, 1),
    ));
    let profile = session.profile().unwrap();
    // Samples 5, 6, 9, 10
    assert_eq!(profile.values(), &[7.5, 1007.5]);

    session.apply(ViewerCommand::SelectRegion(Rect::from_corners(
        PixelCoord::new(2, 2),
        PixelCoord::new(40, 40),
    )));
    let profile = session.profile().unwrap();
    assert_eq!(
        profile.source(),
        ProfileSource::Region(Rect::from_corners(
            PixelCoord::new(2, 2),
            PixelCoord::new(3, 3)
        ))
    );
}

#[test]
fn test_second_load_refused_while_rendering() {
    let mut session = ViewerSession::default();
    session.load_cube(cube(4, 8, 8)).unwrap();
    assert!(matches!(
        session.load_cube(cube(2, 2, 2)),
        Err(ViewerError::PipelineBusy)
    ));
    session.wait_for_render().unwrap();
    assert_eq!(session.cube().unwrap().band_count(), 4);

    session.load_cube(cube(2, 2, 2)).unwrap();
    session.wait_for_render().unwrap();
    assert_eq!(session.cube().unwrap().band_count(), 2);
    assert_eq!(session.navigation().current(), 0);
}

#[test]
fn test_failed_run_keeps_previous_cube() {
    let mut session = ViewerSession::default().with_renderer(Arc::new(PickyRenderer));
    session.load_cube(cube(2, 4, 4)).unwrap();
    session.wait_for_render().unwrap();
    session.apply(ViewerCommand::StepNext);
    session.apply(ViewerCommand::SelectPoint { row: 1, col: 1 });

    session.load_cube(cube(3, 4, 4)).unwrap();
    let err = session.wait_for_render().unwrap_err();
    assert!(matches!(err, ViewerError::RenderFailed(_)));

    assert_eq!(session.cube().unwrap().band_count(), 2);
    assert_eq!(session.bands().unwrap().len(), 2);
    assert_eq!(session.navigation().current(), 1);
    assert!(session.selection().is_some());
    assert!(session.processing().status_text.starts_with("Error"));
    assert!(!session.is_rendering());
}

#[test]
fn test_cancel_leaves_session_idle() {
    let mut session = ViewerSession::default();
    session.load_cube(cube(3, 16, 16)).unwrap();
    session.cancel_render();
    assert!(!session.is_rendering());
    assert_eq!(session.handle_messages(), None);
    assert!(session.cube().is_none());

    session.load_cube(cube(1, 2, 2)).unwrap();
    session.wait_for_render().unwrap();
    assert_eq!(session.cube().unwrap().band_count(), 1);
}

#[test]
fn test_handle_messages_polling() {
    let mut session = ViewerSession::default();
    session.load_cube(cube(6, 4, 4)).unwrap();
    let outcome = loop {
        if let Some(outcome) = session.handle_messages() {
            break outcome;
        }
        std::thread::yield_now();
    };
    assert!(matches!(outcome, RenderOutcome::Published { bands: 6, .. }));
    assert_eq!(session.processing().progress, 100);
    assert!(!session.processing().is_rendering);
}

#[test]
fn test_freeze_cleared_on_new_cube() {
    let mut session = loaded_session(2);
    assert!(session.freeze_current());
    assert_eq!(session.frozen(), session.current_band());

    session.apply(ViewerCommand::StepNext);
    assert_ne!(session.frozen(), session.current_band());

    session.load_cube(cube(1, 2, 2)).unwrap();
    // Still frozen until the new cube is published
    assert!(session.frozen().is_some());
    session.wait_for_render().unwrap();
    assert!(session.frozen().is_none());
}

#[test]
fn test_open_with_loader() {
    let mut session = ViewerSession::default().with_loader(Box::new(MemoryLoader));
    session.open(Path::new("cube.h5")).unwrap();
    session.wait_for_render().unwrap();
    assert_eq!(session.cube().unwrap().band_count(), 3);

    let mut session = ViewerSession::default().with_loader(Box::new(MissingLoader));
    let err = session.open(Path::new("missing.h5")).unwrap_err();
    assert!(format!("{err:#}").contains("missing.h5"));
    assert!(!session.is_rendering());
}

#[test]
fn test_exports() {
    let mut session = loaded_session(2);
    session.apply(ViewerCommand::SelectPoint { row: 0, col: 0 });

    let png = NamedTempFile::with_suffix(".png").unwrap();
    session.export_displayed(png.path()).unwrap();
    assert!(std::fs::metadata(png.path()).unwrap().len() > 0);

    let csv = NamedTempFile::new().unwrap();
    session.export_profile(csv.path()).unwrap();
    let content = std::fs::read_to_string(csv.path()).unwrap();
    assert_eq!(content, "wavelength,pixel value\n528,0\n532,1000\n");
}

#[test]
fn test_region_command_from_json_profiles() {
    let mut session = loaded_session(2);
    let json = r#"{"SelectRegion":{"top_left":{"row":2,"col":2},"bottom_right":{"row":1,"col":1}}}"#;
    let command: ViewerCommand = serde_json::from_str(json).unwrap();
    assert!(session.apply(command));
    // Samples 5, 6, 9, 10
    assert_eq!(session.profile().unwrap().values(), &[7.5, 1007.5]);
}
