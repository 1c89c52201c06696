//! Processing state for the background render pipeline.

use crate::util::percent_to_fraction;

/// Tracks the state of the background render run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingState {
    /// Whether a render run is in progress.
    pub is_rendering: bool,
    /// Percent of bands rendered, `0..=100`.
    pub progress: u8,
    /// User-facing status message.
    pub status_text: String,
}

impl Default for ProcessingState {
    fn default() -> Self {
        Self {
            is_rendering: false,
            progress: 0,
            status_text: "Ready".to_string(),
        }
    }
}

impl ProcessingState {
    /// Mark a run as started.
    pub fn begin(&mut self, status: impl Into<String>) {
        self.is_rendering = true;
        self.progress = 0;
        self.status_text = status.into();
    }

    /// Record a progress update. Progress never moves backwards within a run.
    pub fn update(&mut self, percent: u8) {
        self.progress = self.progress.max(percent.min(100));
        self.status_text = format!("Rendering bands... {}%", self.progress);
    }

    /// Mark the run as ended.
    pub fn finish(&mut self, status: impl Into<String>) {
        self.is_rendering = false;
        self.status_text = status.into();
    }

    /// Progress as a `0.0..=1.0` fraction, for progress bars.
    #[must_use]
    pub fn fraction(&self) -> f32 {
        percent_to_fraction(self.progress)
    }
}
