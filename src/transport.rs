/// Report emission. The core hands a `Report` to a `Transport` and moves on:
/// delivery is fire-and-forget, failures are surfaced to the loop owner but
/// never retried and never fed back into filter state.
///
/// The bundled transport broadcasts newline-delimited JSON over a Unix
/// socket to whoever is connected, dropping clients on write failure.

use std::io::Write;
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use log::{info, warn};
use serde::Serialize;
use thiserror::Error;

use crate::axes::Vector3;

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
enum ReportKind {
    Accel,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct AccelReading {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub mag: f64,
}

/// One report per window: a type discriminator plus the chosen vector with
/// its derived magnitude.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Report {
    #[serde(rename = "type")]
    kind: ReportKind,
    pub accel: AccelReading,
}

impl Report {
    pub fn accel(v: Vector3) -> Self {
        Self {
            kind: ReportKind::Accel,
            accel: AccelReading {
                x: v.x,
                y: v.y,
                z: v.z,
                mag: v.magnitude(),
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to bind socket {path}: {source}")]
    Bind {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to encode report: {0}")]
    Encode(#[from] serde_json::Error),
}

pub trait Transport {
    fn send(&mut self, report: &Report) -> Result<(), TransportError>;
}

/// Unix-socket broadcast to connected clients. Accepting runs on its own
/// thread; the client list is the only shared state.
pub struct SocketTransport {
    clients: Arc<Mutex<Vec<UnixStream>>>,
}

impl SocketTransport {
    pub fn bind(path: &Path) -> Result<Self, TransportError> {
        // Clean up a stale socket from a previous run.
        let _ = std::fs::remove_file(path);

        let listener = UnixListener::bind(path).map_err(|source| TransportError::Bind {
            path: path.display().to_string(),
            source,
        })?;
        listener.set_nonblocking(true).ok();

        let clients: Arc<Mutex<Vec<UnixStream>>> = Arc::new(Mutex::new(Vec::new()));

        let accept_clients = clients.clone();
        thread::spawn(move || loop {
            match listener.accept() {
                Ok((stream, _)) => {
                    info!("client connected");
                    stream.set_nonblocking(false).ok();
                    accept_clients.lock().unwrap().push(stream);
                }
                Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(100));
                }
                Err(e) => {
                    warn!("accept error: {e}");
                    thread::sleep(Duration::from_millis(100));
                }
            }
        });

        Ok(Self { clients })
    }
}

impl Transport for SocketTransport {
    fn send(&mut self, report: &Report) -> Result<(), TransportError> {
        let json = serde_json::to_string(report)?;

        let mut clients = self.clients.lock().unwrap();
        clients.retain_mut(|stream| match writeln!(stream, "{json}") {
            Ok(_) => {
                stream.flush().ok();
                true
            }
            Err(_) => {
                info!("client disconnected");
                false
            }
        });

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_wire_format() {
        let report = Report::accel(Vector3::new(3.0, 4.0, 0.0));
        let json = serde_json::to_string(&report).unwrap();
        assert_eq!(
            json,
            r#"{"type":"accel","accel":{"x":3.0,"y":4.0,"z":0.0,"mag":5.0}}"#
        );
    }
}
