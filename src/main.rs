use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use lasertarget::capture::{CameraSource, FrameSource};
use lasertarget::config::TrackerConfig;
use lasertarget::tracker::emitter::SnapshotEmitter;
use lasertarget::tracker::worker::start_tracker;
use lasertarget::{server, signal};

fn main() -> Result<()> {
    tracing_subscriber::fmt().init();

    let args: Vec<String> = std::env::args().collect();
    let config = TrackerConfig::from_args(&args)?;
    config.validate()?;

    let address = match &config.address {
        Some(address) => address.clone(),
        None => local_address(),
    };
    let addr: SocketAddr = format!("{address}:{}", config.port)
        .parse()
        .with_context(|| format!("invalid listen address {address}:{}", config.port))?;

    server::start_snapshot_server(addr, config.snapshot_path.clone())?;

    let (sig, notifications) = signal::channel();
    let emitter = SnapshotEmitter::new(config.snapshot_path.clone(), sig);

    let (index, width, height) = (config.cam_index, config.cam_width, config.cam_height);
    start_tracker(
        move || {
            CameraSource::open(index, width, height).map(|s| Box::new(s) as Box<dyn FrameSource>)
        },
        config.thresholds,
        Duration::from_secs(config.cooldown_secs),
        emitter,
    );

    // Notification relay: one fresh URL per delivered detection, for a cast
    // client to pick up. The serial defeats client-side caching; the server
    // answers any path with the latest snapshot.
    let mut serial = 0u64;
    for () in notifications.iter() {
        serial += 1;
        info!("snapshot changed, refresh from http://{addr}/latest{serial}.jpg");
    }

    Ok(())
}

/// Best-effort local IP discovery: route a UDP socket toward a non-routable
/// address and read back the chosen source address. Nothing is sent.
fn local_address() -> String {
    std::net::UdpSocket::bind("0.0.0.0:0")
        .and_then(|socket| {
            socket.connect("10.255.255.255:1")?;
            socket.local_addr()
        })
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|_| "127.0.0.1".to_string())
}
