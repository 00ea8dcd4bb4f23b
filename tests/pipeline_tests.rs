use std::time::{Duration, Instant};

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_circle_mut;

use lasertarget::config::{Thresholds, TrackerConfig};
use lasertarget::signal;
use lasertarget::tracker::emitter::SnapshotEmitter;
use lasertarget::tracker::{DetectionGate, process_frame};

const BACKGROUND: Rgb<u8> = Rgb([128, 128, 128]);
const LASER_RED: Rgb<u8> = Rgb([255, 0, 0]);

fn frame_with_dot(x: i32, y: i32) -> RgbImage {
    let mut frame = RgbImage::from_pixel(640, 480, BACKGROUND);
    draw_filled_circle_mut(&mut frame, (x, y), 10, LASER_RED);
    frame
}

fn temp_snapshot(tag: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("lasertarget-{tag}-{}.jpg", std::process::id()))
}

#[test]
fn steady_dot_delivers_exactly_one_event() {
    let config = TrackerConfig::default();
    config.validate().unwrap();

    let snapshot = temp_snapshot("steady");
    let (sig, notifications) = signal::channel();
    let emitter = SnapshotEmitter::new(&snapshot, sig);

    let mut gate = DetectionGate::new(Duration::from_secs(config.cooldown_secs));
    let start = Instant::now();

    // the same dot for 5 consecutive frames at 10 fps
    let mut events = Vec::new();
    for i in 0..5 {
        let mut frame = frame_with_dot(300, 200);
        let now = start + Duration::from_millis(100 * i);
        if let Some(center) = process_frame(&frame, &config.thresholds, &mut gate, now) {
            emitter.emit(&mut frame, center).unwrap();
            events.push(center);
        }
    }

    assert_eq!(events.len(), 1);
    assert!((events[0].x - 300).abs() <= 1, "x was {}", events[0].x);
    assert!((events[0].y - 200).abs() <= 1, "y was {}", events[0].y);

    assert!(snapshot.exists());
    assert!(notifications.try_recv().is_ok());
    assert!(notifications.try_recv().is_err());

    std::fs::remove_file(&snapshot).unwrap();
}

#[test]
fn dots_in_separate_windows_deliver_two_events() {
    let thresholds = Thresholds::default();
    let mut gate = DetectionGate::new(Duration::from_secs(2));
    let start = Instant::now();

    let first = process_frame(&frame_with_dot(100, 100), &thresholds, &mut gate, start);
    assert!(first.is_some());

    // still inside the cooldown: a dot elsewhere is ignored by design
    let during = start + Duration::from_millis(1500);
    assert!(process_frame(&frame_with_dot(500, 400), &thresholds, &mut gate, during).is_none());

    // past the cooldown the new dot fires
    let after = start + Duration::from_millis(2500);
    let second = process_frame(&frame_with_dot(500, 400), &thresholds, &mut gate, after).unwrap();
    assert!((second.x - 500).abs() <= 1);
    assert!((second.y - 400).abs() <= 1);
}

#[test]
fn background_without_dot_never_fires() {
    let thresholds = Thresholds::default();
    let mut gate = DetectionGate::new(Duration::from_secs(2));
    let start = Instant::now();

    let frame = RgbImage::from_pixel(640, 480, BACKGROUND);
    for i in 0..10 {
        let now = start + Duration::from_millis(100 * i);
        assert!(process_frame(&frame, &thresholds, &mut gate, now).is_none());
    }
    assert_eq!(gate.last_position(), None);
}

#[test]
fn dim_dot_is_filtered_by_value_band() {
    let thresholds = Thresholds::default();
    let mut gate = DetectionGate::new(Duration::from_secs(2));

    // dark red: right hue, but below the 200 value floor
    let mut frame = RgbImage::from_pixel(640, 480, BACKGROUND);
    draw_filled_circle_mut(&mut frame, (300, 200), 10, Rgb([150, 0, 0]));

    assert!(process_frame(&frame, &thresholds, &mut gate, Instant::now()).is_none());
}
