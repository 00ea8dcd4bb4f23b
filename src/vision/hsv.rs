use image::{GrayImage, RgbImage};

/// Per-channel HSV planes of one frame, 8-bit convention: hue halved into
/// 0..=179 so it fits a byte, saturation and value in 0..=255.
pub struct HsvPlanes {
    pub hue: GrayImage,
    pub saturation: GrayImage,
    pub value: GrayImage,
}

/// Split a frame into its hue/saturation/value planes.
pub fn split_hsv(frame: &RgbImage) -> HsvPlanes {
    let (width, height) = frame.dimensions();
    let mut hue = GrayImage::new(width, height);
    let mut saturation = GrayImage::new(width, height);
    let mut value = GrayImage::new(width, height);

    for (x, y, pixel) in frame.enumerate_pixels() {
        let (h, s, v) = rgb_to_hsv(pixel[0], pixel[1], pixel[2]);
        hue.get_pixel_mut(x, y)[0] = h;
        saturation.get_pixel_mut(x, y)[0] = s;
        value.get_pixel_mut(x, y)[0] = v;
    }

    HsvPlanes {
        hue,
        saturation,
        value,
    }
}

fn rgb_to_hsv(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = (max - min) as f32;

    let v = max;
    let s = if max == 0 {
        0
    } else {
        (255.0 * delta / max as f32).round() as u8
    };

    if max == min {
        return (0, s, v);
    }

    let (rf, gf, bf) = (r as f32, g as f32, b as f32);
    let mut h = if max == r {
        60.0 * (gf - bf) / delta
    } else if max == g {
        120.0 + 60.0 * (bf - rf) / delta
    } else {
        240.0 + 60.0 * (rf - gf) / delta
    };
    if h < 0.0 {
        h += 360.0;
    }

    // halve the 0..360 angle into a byte; 359.x rounds up and wraps to 0
    let h = ((h / 2.0).round() as u16 % 180) as u8;
    (h, s, v)
}
