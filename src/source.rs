/// Raw sample delivery. Hardware access is someone else's job: samples are
/// pushed into the event loop through a channel, and the most recent raw
/// reading is kept behind a shared handle so the scheduler can pull a live
/// sample when a window closes empty.

use std::io::BufRead;
use std::sync::{Arc, Mutex};

use log::{debug, warn};

use crate::axes::Vector3;

/// Synchronous pull interface for the no-data fallback path.
pub trait RawSource {
    /// A fresh instantaneous reading, unfiltered.
    fn read_current(&self) -> Vector3;
}

/// Last raw sample seen by the feed, shared between the feed thread and the
/// scheduler. Starts at the zero vector until the first sample arrives.
#[derive(Clone, Default)]
pub struct LatestSample {
    inner: Arc<Mutex<Vector3>>,
}

impl LatestSample {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self, sample: Vector3) {
        *self.inner.lock().unwrap() = sample;
    }
}

impl RawSource for LatestSample {
    fn read_current(&self) -> Vector3 {
        *self.inner.lock().unwrap()
    }
}

/// Read JSON-lines samples (`{"x":..,"y":..,"z":..}`) from `input`, update
/// `latest`, and hand each sample to `deliver`. Blocks until the input ends
/// or `deliver` returns false (the event loop is gone).
///
/// Malformed lines are logged and skipped; a sensor feed glitch must not
/// take the daemon down.
pub fn run_feed<R, F>(input: R, latest: LatestSample, mut deliver: F)
where
    R: BufRead,
    F: FnMut(Vector3) -> bool,
{
    for line in input.lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                warn!("feed read error: {e}");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<Vector3>(&line) {
            Ok(sample) => {
                latest.store(sample);
                if !deliver(sample) {
                    break;
                }
            }
            Err(e) => debug!("skipping malformed sample line: {e}"),
        }
    }
}
