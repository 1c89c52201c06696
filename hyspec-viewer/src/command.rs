//! Operator input commands.
//!
//! Pointer, gesture and voice front ends all reduce their input to one of
//! these commands before handing it to [`crate::ViewerSession::apply`].

use hyspec_core::{PixelCoord, Rect};
use serde::{Deserialize, Serialize};

/// The fixed command set accepted by a viewer session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewerCommand {
    /// Show the next band.
    StepNext,
    /// Show the previous band.
    StepPrevious,
    /// Show band `n`, counted from 1.
    GotoIndex(usize),
    /// Select one pixel.
    SelectPoint { row: usize, col: usize },
    /// Select a rectangle.
    SelectRegion(Rect),
}

impl ViewerCommand {
    /// Region selection from two opposite corners in any order.
    #[must_use]
    pub fn select_region(a: PixelCoord, b: PixelCoord) -> Self {
        Self::SelectRegion(Rect::from_corners(a, b))
    }

    /// Whether this command changes the displayed band.
    #[must_use]
    pub fn is_navigation(&self) -> bool {
        matches!(self, Self::StepNext | Self::StepPrevious | Self::GotoIndex(_))
    }
}
