/// Windowed reporting. One context struct owns the filters and the peak
/// tracker; samples and timer ticks reach it serially through a single
/// channel, so no locking guards the core state.

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use log::warn;

use crate::axes::{AxisBank, DegenerateFilterState, Vector3};
use crate::peak::PeakSampler;
use crate::source::RawSource;
use crate::transport::{Report, Transport, TransportError};

/// Everything the event loop can deliver.
pub enum Event {
    Sample(Vector3),
    Tick,
}

pub struct ReportScheduler<S: RawSource, T: Transport> {
    bank: AxisBank,
    peak: PeakSampler,
    source: S,
    transport: T,
}

impl<S: RawSource, T: Transport> ReportScheduler<S, T> {
    pub fn new(source: S, transport: T) -> Self {
        Self {
            bank: AxisBank::new(),
            peak: PeakSampler::new(),
            source,
            transport,
        }
    }

    /// Filter a raw sample and offer it to the current window's peak.
    pub fn handle_sample(&mut self, raw: Vector3) -> Result<(), DegenerateFilterState> {
        let filtered = self.bank.update(raw)?;
        self.peak.consider(filtered);
        Ok(())
    }

    /// Close the current window and emit exactly one report.
    ///
    /// An empty window substitutes a live pull from the raw source instead
    /// of fabricating an all-zero reading; an idle sensor still sits at its
    /// gravity baseline. If no sample has ever arrived, that pull is raw and
    /// unfiltered — accepted, since there is nothing better to report.
    ///
    /// A send failure is the caller's to log; window and filter state have
    /// already moved on and the report is not retried.
    pub fn tick(&mut self) -> Result<(), TransportError> {
        let (peak, had_data) = self.peak.flush_and_reset();
        let vector = if had_data {
            peak
        } else {
            self.source.read_current()
        };
        self.transport.send(&Report::accel(vector))
    }
}

/// Drive a scheduler from a channel until every sender is gone. Degenerate
/// samples and failed emissions are logged and dropped; neither stops the
/// loop.
pub fn run<S: RawSource, T: Transport>(
    rx: mpsc::Receiver<Event>,
    scheduler: &mut ReportScheduler<S, T>,
) {
    while let Ok(event) = rx.recv() {
        match event {
            Event::Sample(raw) => {
                if let Err(e) = scheduler.handle_sample(raw) {
                    warn!("{e}; sample dropped");
                }
            }
            Event::Tick => {
                if let Err(e) = scheduler.tick() {
                    warn!("report emission failed: {e}");
                }
            }
        }
    }
}

/// Send `Event::Tick` every `interval` until the receiver hangs up.
pub fn spawn_timer(interval: Duration, tx: mpsc::Sender<Event>) {
    thread::spawn(move || loop {
        thread::sleep(interval);
        if tx.send(Event::Tick).is_err() {
            break;
        }
    });
}
