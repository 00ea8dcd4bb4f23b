use std::path::PathBuf;

use anyhow::{Context, Result};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_circle_mut;
use imageproc::point::Point;

use crate::signal::DetectionSignal;

const MARKER_RADIUS: i32 = 10;
const MARKER_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

/// Delivers one detection event: marks the frame for operator feedback,
/// overwrites the latest-snapshot file, and raises the coalescing signal.
pub struct SnapshotEmitter {
    path: PathBuf,
    signal: DetectionSignal,
}

impl SnapshotEmitter {
    pub fn new(path: impl Into<PathBuf>, signal: DetectionSignal) -> Self {
        Self {
            path: path.into(),
            signal,
        }
    }

    pub fn snapshot_path(&self) -> &std::path::Path {
        &self.path
    }

    pub fn emit(&self, frame: &mut RgbImage, center: Point<i32>) -> Result<()> {
        draw_hollow_circle_mut(frame, (center.x, center.y), MARKER_RADIUS, MARKER_COLOR);
        frame
            .save(&self.path)
            .with_context(|| format!("failed to write snapshot {}", self.path.display()))?;
        self.signal.raise();
        Ok(())
    }
}
