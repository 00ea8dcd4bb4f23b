use image::GrayImage;

use crate::config::Thresholds;
use crate::vision::hsv::HsvPlanes;

/// Binary masks (0 or 255) for the three tracked channels.
pub struct ChannelMasks {
    pub hue: GrayImage,
    pub saturation: GrayImage,
    pub value: GrayImage,
}

/// Threshold each HSV plane against its configured band.
///
/// Saturation and value pass inside their band. Hue is inverted: low and
/// high hues both read as red, so the two acceptance arcs are modeled as
/// the complement of one rejected band.
pub fn channel_masks(planes: &HsvPlanes, thresholds: &Thresholds) -> ChannelMasks {
    let mut hue = band_mask(&planes.hue, thresholds.hue_min, thresholds.hue_max);
    invert_mask(&mut hue);
    ChannelMasks {
        hue,
        saturation: band_mask(&planes.saturation, thresholds.sat_min, thresholds.sat_max),
        value: band_mask(&planes.value, thresholds.val_min, thresholds.val_max),
    }
}

/// Two-step band threshold: samples strictly above `max` are zeroed first,
/// then whatever is left strictly above `min` becomes 255. Boundary
/// behavior (min excluded, max included) comes from the composition, so
/// don't collapse this into a single range check.
pub fn band_mask(plane: &GrayImage, min: u16, max: u16) -> GrayImage {
    let (width, height) = plane.dimensions();
    let mut out = GrayImage::new(width, height);
    for (dst, src) in out.pixels_mut().zip(plane.pixels()) {
        let sample = src[0] as u16;
        let clipped = if sample > max { 0 } else { sample };
        dst[0] = if clipped > min { 255 } else { 0 };
    }
    out
}

pub fn invert_mask(mask: &mut GrayImage) {
    for pixel in mask.pixels_mut() {
        pixel[0] = !pixel[0];
    }
}

/// A pixel is laser only when all three channel masks agree.
pub fn laser_mask(masks: &ChannelMasks) -> GrayImage {
    let combined = and_masks(&masks.hue, &masks.value);
    and_masks(&masks.saturation, &combined)
}

fn and_masks(a: &GrayImage, b: &GrayImage) -> GrayImage {
    debug_assert_eq!(a.dimensions(), b.dimensions());
    let (width, height) = a.dimensions();
    let mut out = GrayImage::new(width, height);
    for ((dst, pa), pb) in out.pixels_mut().zip(a.pixels()).zip(b.pixels()) {
        dst[0] = pa[0] & pb[0];
    }
    out
}
