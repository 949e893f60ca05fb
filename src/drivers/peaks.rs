use ndarray::Array1;
use crate::drivers::CaptureError;
/// Mean and population standard deviation of one ECG window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowStats {
    pub mean: f64,
    pub std_dev: f64,
}
impl WindowStats {
    pub fn compute(window: &[i64]) -> Option<Self> {
        let values: Array1<f64> = window.iter().map(|&v| v as f64).collect();
        let mean = values.mean()?;
        Some(Self {
            mean,
            std_dev: values.std(0.0),
        })
    }
    pub fn threshold(&self, sigma_factor: f64) -> f64 {
        self.mean + sigma_factor * self.std_dev
    }
}
/// Indices of local maxima in `values`.
///
/// A sample is a maximum if it is strictly above its left neighbour and,
/// after any run of equal samples, strictly above the next differing sample.
/// Plateaus report their midpoint (rounded down). Edges never qualify.
pub fn local_maxima(values: &[f64]) -> Vec<usize> {
    let mut peaks = Vec::new();
    if values.len() < 3 {
        return peaks;
    }
    let last = values.len() - 1;
    let mut i = 1;
    while i < last {
        if values[i - 1] < values[i] {
            let mut ahead = i + 1;
            while ahead < last && values[ahead] == values[i] {
                ahead += 1;
            }
            if values[ahead] < values[i] {
                peaks.push((i + ahead - 1) / 2);
                i = ahead;
            }
        }
        i += 1;
    }
    peaks
}
/// Local maxima whose height reaches `min_height`.
pub fn find_peaks(values: &[f64], min_height: f64) -> Vec<usize> {
    local_maxima(values)
        .into_iter()
        .filter(|&idx| values[idx] >= min_height)
        .collect()
}
/// Sliding-window detector: flags a window containing at least one peak at
/// `mean + sigma_factor * std_dev` or above.
#[derive(Clone, Debug)]
pub struct PeakDetector {
    window: usize,
    sigma_factor: f64,
}
impl PeakDetector {
    pub fn new(window: usize, sigma_factor: f64) -> Result<Self, CaptureError> {
        if window < 3 {
            return Err(CaptureError::InvalidWindow(window));
        }
        Ok(Self {
            window,
            sigma_factor,
        })
    }
    pub fn window(&self) -> usize {
        self.window
    }
    /// Peaks in the most recent window of `history`, or `None` while the
    /// history is not yet longer than one window.
    pub fn detect(&self, history: &[i64]) -> Option<Vec<usize>> {
        if history.len() <= self.window {
            return None;
        }
        let window = &history[history.len() - self.window..];
        let stats = WindowStats::compute(window)?;
        let values: Vec<f64> = window.iter().map(|&v| v as f64).collect();
        Some(find_peaks(&values, stats.threshold(self.sigma_factor)))
    }
}
/// Running synthetic potassium level. Only ever moves up, by `step`, on
/// updates whose window holds a peak.
#[derive(Clone, Debug)]
pub struct IonEstimator {
    detector: PeakDetector,
    level: f64,
    step: f64,
    hits: usize,
}
impl IonEstimator {
    pub fn new(detector: PeakDetector, initial_level: f64, step: f64) -> Result<Self, CaptureError> {
        if !step.is_finite() || step < 0.0 {
            return Err(CaptureError::InvalidIonStep(step));
        }
        Ok(Self {
            detector,
            level: initial_level,
            step,
            hits: 0,
        })
    }
    pub fn window(&self) -> usize {
        self.detector.window()
    }
    pub fn level(&self) -> f64 {
        self.level
    }
    pub fn hits(&self) -> usize {
        self.hits
    }
    /// Re-evaluates the latest window of `history`; returns whether it fired.
    pub fn update(&mut self, history: &[i64]) -> bool {
        let fired = self
            .detector
            .detect(history)
            .is_some_and(|peaks| !peaks.is_empty());
        if fired {
            self.level += self.step;
            self.hits += 1;
        }
        fired
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn window_stats_use_population_std() {
        let stats = WindowStats::compute(&[2, 4, 4, 4, 5, 5, 7, 9]).unwrap();
        assert_eq!(stats.mean, 5.0);
        assert!((stats.std_dev - 2.0).abs() < 1e-12);
        assert!((stats.threshold(2.0) - 9.0).abs() < 1e-9);
        assert!(WindowStats::compute(&[]).is_none());
    }
    #[test]
    fn local_maxima_skip_edges() {
        assert_eq!(local_maxima(&[5.0, 1.0, 0.0, 1.0, 5.0]), Vec::<usize>::new());
        assert_eq!(local_maxima(&[0.0, 3.0, 1.0, 4.0, 2.0]), vec![1, 3]);
    }
    #[test]
    fn plateau_reports_midpoint() {
        assert_eq!(local_maxima(&[0.0, 2.0, 2.0, 2.0, 0.0]), vec![2]);
        assert_eq!(local_maxima(&[0.0, 2.0, 2.0, 0.0]), vec![1]);
    }
    #[test]
    fn plateau_running_into_edge_or_rising_is_not_a_peak() {
        assert_eq!(local_maxima(&[0.0, 2.0, 2.0, 2.0]), Vec::<usize>::new());
        assert_eq!(local_maxima(&[0.0, 2.0, 2.0, 3.0, 1.0]), vec![3]);
    }
    #[test]
    fn find_peaks_applies_inclusive_height() {
        let values = [0.0, 3.0, 0.0, 5.0, 0.0];
        assert_eq!(find_peaks(&values, 5.0), vec![3]);
        assert_eq!(find_peaks(&values, 5.1), Vec::<usize>::new());
    }
    #[test]
    fn detector_rejects_tiny_window() {
        assert!(matches!(
            PeakDetector::new(2, 2.0),
            Err(CaptureError::InvalidWindow(2))
        ));
    }
    #[test]
    fn detector_waits_for_more_than_one_window() {
        let detector = PeakDetector::new(50, 2.0).unwrap();
        let mut history = vec![500; 50];
        history[25] = 900;
        assert!(detector.detect(&history).is_none());
        history.push(500);
        assert_eq!(detector.detect(&history), Some(vec![24]));
    }
    #[test]
    fn flat_window_never_fires() {
        let detector = PeakDetector::new(50, 2.0).unwrap();
        assert_eq!(detector.detect(&vec![512; 80]), Some(vec![]));
    }
    #[test]
    fn estimator_is_monotonic_and_fires_every_update_while_spike_in_window() {
        let detector = PeakDetector::new(50, 2.0).unwrap();
        let mut estimator = IonEstimator::new(detector, 4.0, 0.01).unwrap();
        assert_eq!(estimator.window(), 50);
        let mut history: Vec<i64> = vec![500; 40];
        history.push(950);
        let mut previous = estimator.level();
        let mut fired = 0;
        for _ in 0..30 {
            history.push(500);
            if estimator.update(&history) {
                fired += 1;
            }
            assert!(estimator.level() >= previous);
            previous = estimator.level();
        }
        // history lengths 42..=71; the spike at index 40 sits inside the
        // window (and off its edges) for lengths 51..=89
        assert_eq!(fired, 21);
        assert_eq!(estimator.hits(), 21);
        assert!((estimator.level() - 4.21).abs() < 1e-9);
    }
    #[test]
    fn estimator_rejects_negative_or_non_finite_step() {
        let detector = PeakDetector::new(50, 2.0).unwrap();
        assert!(matches!(
            IonEstimator::new(detector.clone(), 4.0, -0.01),
            Err(CaptureError::InvalidIonStep(_))
        ));
        assert!(IonEstimator::new(detector.clone(), 4.0, f64::NAN).is_err());
        assert!(IonEstimator::new(detector, 4.0, 0.0).is_ok());
    }
}
