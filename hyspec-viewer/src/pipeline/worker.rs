//! Background render worker.
//!
//! Renders every band of a cube in increasing band order and reports
//! progress and the final raster set over a channel.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::time::Instant;

use hyspec_algorithms::BandRenderer;
use hyspec_core::{Cube, RenderedBand};
use log::{debug, warn};

use crate::message::{PipelineEvent, PipelineMessage};
use crate::util::percent_complete;

/// Render all bands of `cube` and report through `tx`.
///
/// Sends `Progress(0)`, then a `Progress` each time the integer percentage
/// rises, ending with `Progress(100)`, then `Complete`. The first band error
/// or panic sends a single `Failed` and stops. If `cancel` is set the worker
/// stops between bands without sending anything further.
pub fn render_worker(
    cube: &Cube,
    renderer: &dyn BandRenderer,
    generation: u64,
    tx: &Sender<PipelineEvent>,
    cancel: &AtomicBool,
) {
    let start = Instant::now();
    let total = cube.band_count();
    let send = |message| {
        let _ = tx.send(PipelineEvent {
            generation,
            message,
        });
    };

    send(PipelineMessage::Progress(0));
    let mut last_percent = 0u8;
    let mut bands: Vec<RenderedBand> = Vec::with_capacity(total);

    for band in 0..total {
        if cancel.load(Ordering::SeqCst) {
            debug!("render run {generation} cancelled at band {band}");
            return;
        }

        match catch_unwind(AssertUnwindSafe(|| renderer.render(cube, band))) {
            Ok(Ok(rendered)) => bands.push(rendered),
            Ok(Err(e)) => {
                warn!("render run {generation} failed at band {band}: {e}");
                send(PipelineMessage::Failed(format!("band {band}: {e}")));
                return;
            }
            Err(payload) => {
                let reason = panic_message(payload.as_ref());
                warn!("render run {generation} panicked at band {band}: {reason}");
                send(PipelineMessage::Failed(format!(
                    "band {band}: renderer panicked: {reason}"
                )));
                return;
            }
        }

        let percent = percent_complete(band + 1, total);
        if percent > last_percent {
            last_percent = percent;
            send(PipelineMessage::Progress(percent));
        }
    }

    if cancel.load(Ordering::SeqCst) {
        return;
    }
    debug!(
        "render run {generation} finished {total} bands in {:?}",
        start.elapsed()
    );
    send(PipelineMessage::Complete(bands, start.elapsed()));
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
