use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

const USAGE: &str = "Usage: lasertarget [--config <path>] [--index <n>] \
[--width <px>] [--height <px>] [--hue-min <0-179>] [--hue-max <0-179>] \
[--sat-min <0-255>] [--sat-max <0-256>] [--val-min <0-255>] [--val-max <0-256>] \
[--cooldown <secs>] [--snapshot <path>] [--address <ip>] [--port <port>]";

/// HSV acceptance bands. Components use the 8-bit convention: hue in
/// 0..=179, saturation and value in 0..=255; a max of 256 leaves the
/// upper end of a channel unclipped.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub hue_min: u16,
    pub hue_max: u16,
    pub sat_min: u16,
    pub sat_max: u16,
    pub val_min: u16,
    pub val_max: u16,
}

impl Default for Thresholds {
    fn default() -> Self {
        // tuned for a red laser pointer
        Self {
            hue_min: 20,
            hue_max: 160,
            sat_min: 100,
            sat_max: 255,
            val_min: 200,
            val_max: 256,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub cam_index: u32,
    pub cam_width: u32,
    pub cam_height: u32,
    pub thresholds: Thresholds,
    /// Seconds to wait before re-triggering, so a laser streak held on the
    /// target produces one event instead of one per frame.
    pub cooldown_secs: u64,
    pub snapshot_path: PathBuf,
    /// Local IP to serve snapshots on; discovered automatically when absent.
    pub address: Option<String>,
    pub port: u16,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            cam_index: 0,
            cam_width: 640,
            cam_height: 480,
            thresholds: Thresholds::default(),
            cooldown_secs: 2,
            snapshot_path: PathBuf::from("latest.jpg"),
            address: None,
            port: 8080,
        }
    }
}

impl TrackerConfig {
    /// Parse the process arguments, optionally seeding from a JSON config
    /// file; individual flags override file values.
    pub fn from_args(args: &[String]) -> Result<Self> {
        let mut config = TrackerConfig::default();

        // --config is applied first so every other flag can override it
        let mut idx = 1;
        while idx < args.len() {
            if args[idx] == "--config" {
                let path = args
                    .get(idx + 1)
                    .with_context(|| format!("--config requires a path\n{USAGE}"))?;
                config = Self::load(path)?;
            }
            idx += 1;
        }

        let mut idx = 1;
        while idx < args.len() {
            match args[idx].as_str() {
                // already applied above; skip the path value like any flag
                "--config" => {}
                "--index" => config.cam_index = parse_flag(args, idx)?,
                "--width" => config.cam_width = parse_flag(args, idx)?,
                "--height" => config.cam_height = parse_flag(args, idx)?,
                "--hue-min" => config.thresholds.hue_min = parse_flag(args, idx)?,
                "--hue-max" => config.thresholds.hue_max = parse_flag(args, idx)?,
                "--sat-min" => config.thresholds.sat_min = parse_flag(args, idx)?,
                "--sat-max" => config.thresholds.sat_max = parse_flag(args, idx)?,
                "--val-min" => config.thresholds.val_min = parse_flag(args, idx)?,
                "--val-max" => config.thresholds.val_max = parse_flag(args, idx)?,
                "--cooldown" => config.cooldown_secs = parse_flag(args, idx)?,
                "--snapshot" => config.snapshot_path = parse_flag(args, idx)?,
                "--address" => config.address = Some(parse_flag(args, idx)?),
                "--port" => config.port = parse_flag(args, idx)?,
                "--help" | "-h" => bail!(USAGE),
                other => bail!("unknown flag {other}\n{USAGE}"),
            }
            idx += 2;
        }

        Ok(config)
    }

    pub fn load(path: &str) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {path}"))?;
        serde_json::from_str(&raw).with_context(|| format!("failed to parse config file {path}"))
    }

    /// Per-frame correctness assumes validated bounds; reject bad pairs
    /// before the session starts instead of mid-stream.
    pub fn validate(&self) -> Result<()> {
        let t = &self.thresholds;
        for (name, min, max) in [
            ("hue", t.hue_min, t.hue_max),
            ("saturation", t.sat_min, t.sat_max),
            ("value", t.val_min, t.val_max),
        ] {
            if min > max {
                bail!("invalid {name} threshold range: min {min} > max {max}");
            }
        }
        if self.cam_width == 0 || self.cam_height == 0 {
            bail!(
                "invalid camera resolution {}x{}",
                self.cam_width,
                self.cam_height
            );
        }
        Ok(())
    }
}

fn parse_flag<T: FromStr>(args: &[String], idx: usize) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    let flag = &args[idx];
    let value = args
        .get(idx + 1)
        .with_context(|| format!("{flag} requires a value\n{USAGE}"))?;
    value
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid value {value:?} for {flag}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("lasertarget")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn defaults_match_red_laser_profile() {
        let config = TrackerConfig::default();
        assert_eq!(config.cam_width, 640);
        assert_eq!(config.cam_height, 480);
        assert_eq!(config.thresholds.hue_min, 20);
        assert_eq!(config.thresholds.val_max, 256);
        assert_eq!(config.cooldown_secs, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn flags_override_defaults() {
        let config = TrackerConfig::from_args(&args(&[
            "--index", "2", "--hue-min", "30", "--port", "9000", "--snapshot", "shot.jpg",
        ]))
        .unwrap();
        assert_eq!(config.cam_index, 2);
        assert_eq!(config.thresholds.hue_min, 30);
        assert_eq!(config.port, 9000);
        assert_eq!(config.snapshot_path, PathBuf::from("shot.jpg"));
        // untouched flags keep their defaults
        assert_eq!(config.thresholds.hue_max, 160);
    }

    #[test]
    fn unknown_flag_is_rejected() {
        assert!(TrackerConfig::from_args(&args(&["--zoom", "2"])).is_err());
    }

    #[test]
    fn inverted_range_fails_validation() {
        let mut config = TrackerConfig::default();
        config.thresholds.sat_min = 200;
        config.thresholds.sat_max = 100;
        assert!(config.validate().is_err());
    }

    #[test]
    fn equal_bounds_pass_validation() {
        let mut config = TrackerConfig::default();
        config.thresholds.val_min = 200;
        config.thresholds.val_max = 200;
        assert!(config.validate().is_ok());
    }
}
