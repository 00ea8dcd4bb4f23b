use anyhow::{Context, Result};
use image::RgbImage;
use nokhwa::{
    Camera,
    pixel_format::RgbFormat,
    utils::{CameraIndex, RequestedFormat, RequestedFormatType, Resolution},
};
use tracing::info;

/// Supplier of frames for the detection loop. A failed read is transient;
/// the caller retries, it never advances detection state.
pub trait FrameSource {
    fn read(&mut self) -> Result<RgbImage>;
}

pub struct CameraSource {
    camera: Camera,
}

impl CameraSource {
    pub fn open(index: u32, width: u32, height: u32) -> Result<Self> {
        let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::HighestResolution(
            Resolution::new(width, height),
        ));
        let mut camera = Camera::new(CameraIndex::Index(index), requested)
            .with_context(|| format!("failed to open camera device {index}"))?;
        camera
            .open_stream()
            .context("failed to open camera stream")?;

        info!(
            "camera {index}: {}x{} {}fps",
            camera.resolution().width(),
            camera.resolution().height(),
            camera.frame_rate()
        );

        Ok(Self { camera })
    }
}

impl FrameSource for CameraSource {
    fn read(&mut self) -> Result<RgbImage> {
        let buffer = self
            .camera
            .frame()
            .context("failed to get next camera frame")?;
        buffer
            .decode_image::<RgbFormat>()
            .context("failed to decode frame image")
    }
}
