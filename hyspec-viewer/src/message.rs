//! Render pipeline message types.
//!
//! Messages are sent from the background render worker to the interactive
//! thread via a channel to report progress, completion, and errors.

use std::time::Duration;

use hyspec_core::RenderedBand;

/// Messages sent from the render worker to the interactive thread.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineMessage {
    /// Integer percent of bands rendered, `0..=100`.
    Progress(u8),

    /// Every band rendered, in band order.
    Complete(Vec<RenderedBand>, Duration),

    /// The run aborted; no bands are published.
    Failed(String),
}

impl PipelineMessage {
    /// Whether this message ends a run.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Progress(_))
    }
}

/// A [`PipelineMessage`] tagged with the run that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineEvent {
    /// Run generation, see [`crate::RenderPipeline::generation`].
    pub generation: u64,
    pub message: PipelineMessage,
}
