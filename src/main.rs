mod axes;
mod config;
mod kalman;
mod peak;
mod scheduler;
mod source;
mod transport;

use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use log::info;

use crate::config::Config;
use crate::scheduler::{Event, ReportScheduler};
use crate::source::LatestSample;
use crate::transport::SocketTransport;

const SOCKET_PATH: &str = "/tmp/jolt.sock";
const DEFAULT_CONFIG_PATH: &str = "jolt.json";

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let config = Config::load(&config_path)
        .with_context(|| format!("loading config from {}", config_path.display()))?;

    if !config.enabled {
        info!("reporting disabled in config, nothing to do");
        return Ok(());
    }

    let transport = SocketTransport::bind(Path::new(SOCKET_PATH))?;

    let latest = LatestSample::new();
    let (tx, rx) = mpsc::channel();

    // Feed samples from stdin (JSON lines, one {"x","y","z"} object each).
    let feed_latest = latest.clone();
    let sample_tx = tx.clone();
    thread::spawn(move || {
        source::run_feed(io::stdin().lock(), feed_latest, |sample| {
            sample_tx.send(Event::Sample(sample)).is_ok()
        });
        info!("sample feed ended");
    });

    scheduler::spawn_timer(Duration::from_millis(config.interval_ms), tx);

    info!("socket at {SOCKET_PATH}");
    info!("reporting every {}ms", config.interval_ms);

    let mut reporter = ReportScheduler::new(latest, transport);
    scheduler::run(rx, &mut reporter);

    Ok(())
}
