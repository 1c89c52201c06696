//! hyspec-viewer: Interactive session controller for hyspec.
//!
//! A [`ViewerSession`] owns the displayed cube and its rendered bands,
//! the navigation and selection state, and a [`RenderPipeline`] that renders
//! new cubes on a background thread. Front ends translate their input into
//! [`ViewerCommand`]s and call [`ViewerSession::handle_messages`] regularly
//! to pick up render progress.
//!

mod app;
mod command;
mod config;
mod error;
mod message;
pub mod pipeline;
mod state;
mod util;

pub use app::{BandInfo, RenderOutcome, ViewerSession};
pub use command::ViewerCommand;
pub use config::ViewerConfig;
pub use error::{Result, ViewerError};
pub use message::{PipelineEvent, PipelineMessage};
pub use pipeline::RenderPipeline;
pub use state::ProcessingState;
pub use util::percent_complete;
