/// Scalar Kalman filter: recursive estimator for one noisy signal.
/// O(1) memory, no history — just an estimate and its covariance.
///
/// The model is x' = a*x + b*u with measurement z = c*x. Defaults give
/// identity dynamics (a=1, b=0, c=1), which is what the accelerometer
/// axes use.

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    Uninitialized,
    Initialized { estimate: f64, covariance: f64 },
}

#[derive(Debug, Clone)]
pub struct ScalarEstimator {
    /// Process noise variance: how much the true signal drifts between samples.
    r: f64,
    /// Measurement noise variance: how noisy the sensor readings are.
    q: f64,
    a: f64,
    b: f64,
    c: f64,
    state: State,
}

impl ScalarEstimator {
    /// Identity-dynamics filter with unit noise (r = q = 1).
    pub fn new() -> Self {
        Self::with_model(1.0, 0.0, 1.0)
    }

    /// Filter with explicit model coefficients (state gain, control gain,
    /// measurement gain). Noise parameters default to 1.
    pub fn with_model(a: f64, b: f64, c: f64) -> Self {
        Self {
            r: 1.0,
            q: 1.0,
            a,
            b,
            c,
            state: State::Uninitialized,
        }
    }

    /// Feed one measurement (and optional control input) through the filter
    /// and return the new estimate.
    ///
    /// The first call bootstraps the state from the measurement itself rather
    /// than assuming a zero prior: estimate = z/c, covariance = q/c².
    ///
    /// Degenerate parameters (c = 0 with q = 0) make the gain division
    /// undefined and the estimate goes non-finite. That is the caller's
    /// problem; `AxisBank` checks for it at its boundary.
    pub fn filter(&mut self, measurement: f64, control: f64) -> f64 {
        match self.state {
            State::Uninitialized => {
                let estimate = measurement / self.c;
                let covariance = self.q / (self.c * self.c);
                self.state = State::Initialized {
                    estimate,
                    covariance,
                };
                estimate
            }
            State::Initialized {
                estimate,
                covariance,
            } => {
                // Predict
                let pred_estimate = self.a * estimate + self.b * control;
                let pred_cov = self.a * covariance * self.a + self.r;

                // Correct
                let gain = pred_cov * self.c / (self.c * pred_cov * self.c + self.q);
                let estimate = pred_estimate + gain * (measurement - self.c * pred_estimate);
                let covariance = pred_cov - gain * self.c * pred_cov;

                self.state = State::Initialized {
                    estimate,
                    covariance,
                };
                estimate
            }
        }
    }

    /// Projected next estimate without mutating state.
    /// `None` until the first `filter` call.
    pub fn predict(&self, control: f64) -> Option<f64> {
        match self.state {
            State::Uninitialized => None,
            State::Initialized { estimate, .. } => Some(self.a * estimate + self.b * control),
        }
    }

    /// Projected next covariance. `None` until the first `filter` call.
    pub fn uncertainty(&self) -> Option<f64> {
        match self.state {
            State::Uninitialized => None,
            State::Initialized { covariance, .. } => Some(self.a * covariance * self.a + self.r),
        }
    }

    /// Current estimate. `None` until the first `filter` call.
    pub fn last_estimate(&self) -> Option<f64> {
        match self.state {
            State::Uninitialized => None,
            State::Initialized { estimate, .. } => Some(estimate),
        }
    }

    /// Takes effect on subsequent `filter` calls only.
    pub fn set_process_noise(&mut self, value: f64) {
        self.r = value;
    }

    /// Takes effect on subsequent `filter` calls only.
    pub fn set_measurement_noise(&mut self, value: f64) {
        self.q = value;
    }
}

impl Default for ScalarEstimator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn first_call_passes_measurement_through() {
        let mut f = ScalarEstimator::new();
        assert_eq!(f.filter(10.0, 0.0), 10.0);
    }

    #[test]
    fn first_call_scales_by_measurement_gain() {
        let mut f = ScalarEstimator::with_model(1.0, 0.0, 2.0);
        assert_eq!(f.filter(10.0, 0.0), 5.0);
    }

    #[test]
    fn converges_to_constant_input() {
        let mut f = ScalarEstimator::new();
        let mut estimate = 0.0;
        for _ in 0..200 {
            estimate = f.filter(7.5, 0.0);
        }
        assert_relative_eq!(estimate, 7.5, epsilon = 1e-6);
    }

    #[test]
    fn uncertainty_is_monotone_non_increasing() {
        let mut f = ScalarEstimator::new();
        f.filter(3.0, 0.0);
        let mut prev = f.uncertainty().unwrap();
        for _ in 0..50 {
            f.filter(3.0, 0.0);
            let cur = f.uncertainty().unwrap();
            assert!(cur <= prev, "uncertainty rose from {prev} to {cur}");
            prev = cur;
        }
    }

    #[test]
    fn estimate_lands_between_prior_and_measurement() {
        let mut f = ScalarEstimator::new();
        f.filter(10.0, 0.0);
        let out = f.filter(15.0, 0.0);
        assert!(out > 10.0 && out < 15.0);
    }

    #[test]
    fn reads_before_first_sample_are_none() {
        let f = ScalarEstimator::new();
        assert_eq!(f.last_estimate(), None);
        assert_eq!(f.predict(0.0), None);
        assert_eq!(f.uncertainty(), None);
    }

    #[test]
    fn predict_does_not_mutate() {
        let mut f = ScalarEstimator::new();
        f.filter(4.0, 0.0);
        let before = f.last_estimate();
        let _ = f.predict(1.0);
        assert_eq!(f.last_estimate(), before);
    }

    #[test]
    fn control_input_shifts_prediction() {
        let mut f = ScalarEstimator::with_model(1.0, 2.0, 1.0);
        f.filter(1.0, 0.0);
        assert_eq!(f.predict(3.0), Some(7.0));
    }

    #[test]
    fn higher_process_noise_tracks_changes_faster() {
        let mut slow = ScalarEstimator::new();
        let mut fast = ScalarEstimator::new();
        slow.filter(0.0, 0.0);
        fast.filter(0.0, 0.0);
        fast.set_process_noise(10.0);

        let a = slow.filter(10.0, 0.0);
        let b = fast.filter(10.0, 0.0);
        assert!(b > a);
    }

    #[test]
    fn noise_setters_only_affect_later_calls() {
        let mut a = ScalarEstimator::new();
        let mut b = ScalarEstimator::new();
        a.filter(10.0, 0.0);
        b.filter(10.0, 0.0);

        // Tightening measurement noise makes the filter trust new samples more.
        b.set_measurement_noise(0.01);
        let loose = a.filter(20.0, 0.0);
        let tight = b.filter(20.0, 0.0);
        assert!(tight > loose);
        assert_relative_eq!(tight, 20.0, epsilon = 0.2);
    }

    #[test]
    fn degenerate_model_propagates_non_finite() {
        let mut f = ScalarEstimator::with_model(1.0, 0.0, 0.0);
        f.set_measurement_noise(0.0);
        // First call already divides by c = 0.
        assert!(!f.filter(1.0, 0.0).is_finite());
    }
}
