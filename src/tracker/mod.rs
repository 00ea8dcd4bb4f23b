use std::time::{Duration, Instant};

use image::RgbImage;
use imageproc::point::Point;

use crate::config::Thresholds;
use crate::vision::blob::locate_blob;
use crate::vision::hsv::split_hsv;
use crate::vision::mask::{channel_masks, laser_mask};

pub mod emitter;
pub mod worker;

/// Temporal filter that turns a continuous stream of sightings into sparse
/// events: once a detection fires, further sightings are suppressed until
/// the cooldown expires, so a laser streak held on the target produces one
/// event instead of one per frame.
pub struct DetectionGate {
    cooldown: Duration,
    last_detection: Option<Instant>,
    last_position: Option<Point<i32>>,
}

impl DetectionGate {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_detection: None,
            last_position: None,
        }
    }

    pub fn suppressed(&self, now: Instant) -> bool {
        matches!(self.last_detection, Some(at) if now.saturating_duration_since(at) < self.cooldown)
    }

    pub fn last_position(&self) -> Option<Point<i32>> {
        self.last_position
    }

    /// Look for a blob in the composite mask unless still cooling down.
    /// Returns the centroid only when a new event fires; `now` is passed in
    /// so transitions are replayable in tests.
    pub fn observe(&mut self, mask: &image::GrayImage, now: Instant) -> Option<Point<i32>> {
        if self.suppressed(now) {
            return None;
        }

        let center = locate_blob(mask)?;
        self.last_detection = Some(now);
        self.last_position = Some(center);
        Some(center)
    }
}

/// Run one frame through the full pipeline: HSV split, per-channel
/// thresholds, composite mask, then the gated blob search.
pub fn process_frame(
    frame: &RgbImage,
    thresholds: &Thresholds,
    gate: &mut DetectionGate,
    now: Instant,
) -> Option<Point<i32>> {
    let planes = split_hsv(frame);
    let masks = channel_masks(&planes, thresholds);
    let laser = laser_mask(&masks);
    gate.observe(&laser, now)
}
