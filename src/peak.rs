/// Peak tracking: reduces a fast filtered sample stream to the single
/// largest-magnitude vector per reporting window. One message per interval
/// regardless of input rate, which is all a tap/impact consumer needs.

use crate::axes::Vector3;

pub struct PeakSampler {
    peak: Vector3,
    peak_magnitude: f64,
    has_data: bool,
}

impl PeakSampler {
    pub fn new() -> Self {
        Self {
            peak: Vector3::default(),
            peak_magnitude: 0.0,
            has_data: false,
        }
    }

    /// Keep this sample if its magnitude strictly exceeds the stored peak
    /// (zero when the window is empty). Ties keep the earlier sample, so a
    /// zero-magnitude sample never marks the window as having data.
    pub fn consider(&mut self, filtered: Vector3) {
        let magnitude = filtered.magnitude();
        let current = if self.has_data { self.peak_magnitude } else { 0.0 };
        if magnitude > current {
            self.peak = filtered;
            self.peak_magnitude = magnitude;
            self.has_data = true;
        }
    }

    /// Returns (peak, had_data) for the window just ended, then starts a
    /// fresh window. With no samples seen, the peak is the zero vector and
    /// had_data is false.
    pub fn flush_and_reset(&mut self) -> (Vector3, bool) {
        let result = (self.peak, self.has_data);
        self.peak = Vector3::default();
        self.peak_magnitude = 0.0;
        self.has_data = false;
        result
    }
}

impl Default for PeakSampler {
    fn default() -> Self {
        Self::new()
    }
}
