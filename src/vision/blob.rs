use image::GrayImage;
use imageproc::contours::{BorderType, Contour, find_contours};
use imageproc::point::Point;

/// Find the centroid of the largest connected bright region in a binary
/// mask, or None when the mask has no outer contours.
pub fn locate_blob(mask: &GrayImage) -> Option<Point<i32>> {
    let contours = find_contours::<i32>(mask);

    let mut best: Option<(f64, &Contour<i32>, Moments)> = None;
    for contour in &contours {
        if contour.border_type != BorderType::Outer {
            continue;
        }
        let moments = polygon_moments(&contour.points);
        let area = moments.m00.abs();
        match &best {
            // strictly-greater keeps the first contour on area ties
            Some((best_area, _, _)) if *best_area >= area => {}
            _ => best = Some((area, contour, moments)),
        }
    }
    let (_, contour, moments) = best?;

    if moments.m00 != 0.0 {
        // truncation toward zero, matching integer centroid convention
        Some(Point::new(
            (moments.m10 / moments.m00) as i32,
            (moments.m01 / moments.m00) as i32,
        ))
    } else {
        enclosing_circle_center(&contour.points)
    }
}

struct Moments {
    m00: f64,
    m10: f64,
    m01: f64,
}

/// Signed spatial moments of the closed boundary polygon via Green's
/// theorem. The sign cancels in the centroid quotients.
fn polygon_moments(points: &[Point<i32>]) -> Moments {
    let mut m00 = 0.0;
    let mut m10 = 0.0;
    let mut m01 = 0.0;

    for (i, a) in points.iter().enumerate() {
        let b = &points[(i + 1) % points.len()];
        let (ax, ay) = (a.x as f64, a.y as f64);
        let (bx, by) = (b.x as f64, b.y as f64);
        let cross = ax * by - bx * ay;
        m00 += cross;
        m10 += (ax + bx) * cross;
        m01 += (ay + by) * cross;
    }

    Moments {
        m00: m00 / 2.0,
        m10: m10 / 6.0,
        m01: m01 / 6.0,
    }
}

/// Center of the minimum enclosing circle of a zero-area contour. Such
/// contours are single points or one-pixel-wide lines, so the circle is
/// spanned by the two farthest points and its center is their midpoint.
fn enclosing_circle_center(points: &[Point<i32>]) -> Option<Point<i32>> {
    let first = points.first()?;
    let mut span = (*first, *first, 0i64);

    for (i, a) in points.iter().enumerate() {
        for b in &points[i + 1..] {
            let dx = (a.x - b.x) as i64;
            let dy = (a.y - b.y) as i64;
            let dist2 = dx * dx + dy * dy;
            if dist2 > span.2 {
                span = (*a, *b, dist2);
            }
        }
    }

    let (a, b, _) = span;
    Some(Point::new(
        ((a.x + b.x) as f64 / 2.0) as i32,
        ((a.y + b.y) as f64 / 2.0) as i32,
    ))
}
