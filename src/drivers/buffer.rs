/// One accepted reading, stamped with seconds since the capture started.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub ecg: i64,
    pub accel: f64,
    pub elapsed_s: f64,
}
/// Owned copy of a finished (or in-progress) capture, ready to plot or export.
#[derive(Clone, Debug, Default)]
pub struct CaptureFrame {
    pub ecg: Vec<i64>,
    pub accel: Vec<f64>,
    pub times_s: Vec<f64>,
    pub ion_levels: Vec<f64>,
}
impl CaptureFrame {
    pub fn len(&self) -> usize {
        self.times_s.len()
    }
    pub fn is_empty(&self) -> bool {
        self.times_s.is_empty()
    }
    pub fn duration_seconds(&self) -> f64 {
        match (self.times_s.first(), self.times_s.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        }
    }
}
/// Grow-only capture storage. Every sequence is appended by the single
/// `push`, so all of them always have the same length.
#[derive(Debug, Default)]
pub struct CaptureBuffer {
    ecg: Vec<i64>,
    accel: Vec<f64>,
    times_s: Vec<f64>,
    ion_levels: Vec<f64>,
}
impl CaptureBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ecg: Vec::with_capacity(capacity),
            accel: Vec::with_capacity(capacity),
            times_s: Vec::with_capacity(capacity),
            ion_levels: Vec::with_capacity(capacity),
        }
    }
    pub fn push(&mut self, sample: Sample, ion_level: f64) {
        self.ecg.push(sample.ecg);
        self.accel.push(sample.accel);
        self.times_s.push(sample.elapsed_s);
        self.ion_levels.push(ion_level);
    }
    pub fn len(&self) -> usize {
        self.times_s.len()
    }
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.times_s.is_empty()
    }
    #[cfg(test)]
    pub fn ecg(&self) -> &[i64] {
        &self.ecg
    }
    #[cfg(test)]
    pub fn times_s(&self) -> &[f64] {
        &self.times_s
    }
    #[cfg(test)]
    pub fn ion_levels(&self) -> &[f64] {
        &self.ion_levels
    }
    /// Most recent `n` ECG values (fewer if the buffer is shorter).
    pub fn recent_ecg(&self, n: usize) -> &[i64] {
        &self.ecg[self.ecg.len().saturating_sub(n)..]
    }
    pub fn frame(&self) -> CaptureFrame {
        CaptureFrame {
            ecg: self.ecg.clone(),
            accel: self.accel.clone(),
            times_s: self.times_s.clone(),
            ion_levels: self.ion_levels.clone(),
        }
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    fn sample(ecg: i64, elapsed_s: f64) -> Sample {
        Sample {
            ecg,
            accel: 0.0,
            elapsed_s,
        }
    }
    #[test]
    fn push_keeps_sequences_in_lockstep() {
        let mut buffer = CaptureBuffer::with_capacity(4);
        buffer.push(sample(10, 0.0), 4.0);
        buffer.push(sample(20, 0.5), 4.01);
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.ecg(), &[10, 20]);
        assert_eq!(buffer.times_s(), &[0.0, 0.5]);
        assert_eq!(buffer.ion_levels(), &[4.0, 4.01]);
        let frame = buffer.frame();
        assert_eq!(frame.len(), 2);
        assert_eq!(frame.accel.len(), 2);
        assert!((frame.duration_seconds() - 0.5).abs() < 1e-12);
    }
    #[test]
    fn recent_ecg_clamps_to_available() {
        let mut buffer = CaptureBuffer::default();
        for i in 0..5 {
            buffer.push(sample(i, i as f64), 4.0);
        }
        assert_eq!(buffer.recent_ecg(3), &[2, 3, 4]);
        assert_eq!(buffer.recent_ecg(50), &[0, 1, 2, 3, 4]);
    }
}
