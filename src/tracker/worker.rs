use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::{error, info, warn};

use crate::capture::FrameSource;
use crate::config::Thresholds;
use crate::tracker::emitter::SnapshotEmitter;
use crate::tracker::{DetectionGate, process_frame};

const READ_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Spawn the dedicated detection thread. Frames are processed strictly one
/// at a time; a frame either completes the whole pipeline or is abandoned
/// for the next one. The loop runs until the process is terminated.
pub fn start_tracker<F>(
    open_source: F,
    thresholds: Thresholds,
    cooldown: Duration,
    emitter: SnapshotEmitter,
) -> JoinHandle<()>
where
    F: FnOnce() -> Result<Box<dyn FrameSource>> + Send + 'static,
{
    thread::spawn(move || {
        let mut source = open_source().expect("failed to open frame source");
        let mut gate = DetectionGate::new(cooldown);

        loop {
            let mut frame = match source.read() {
                Ok(frame) => frame,
                Err(e) => {
                    warn!("could not read camera frame, trying again: {e:?}");
                    thread::sleep(READ_RETRY_DELAY);
                    continue;
                }
            };

            if let Some(center) = process_frame(&frame, &thresholds, &mut gate, Instant::now()) {
                info!("laser detected at ({}, {})", center.x, center.y);
                if let Err(e) = emitter.emit(&mut frame, center) {
                    error!("failed to deliver detection: {e:?}");
                }
            }
        }
    })
}
