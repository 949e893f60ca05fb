use std::time::{Duration, Instant};
use log::{debug, info, warn};
use serde::Deserialize;
use crate::drivers::buffer::{CaptureBuffer, CaptureFrame, Sample};
use crate::drivers::error::CaptureError;
use crate::drivers::peaks::{IonEstimator, PeakDetector};
use crate::drivers::protocol::{parse_line, LineError};
use crate::drivers::source::{LinePoll, LineSource};
/// Stop condition and heuristic constants for one capture.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct CaptureSettings {
    pub target_samples: usize,
    pub window: usize,
    pub sigma_factor: f64,
    pub initial_ion_level: f64,
    pub ion_step: f64,
}
impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            target_samples: 150,
            window: 50,
            sigma_factor: 2.0,
            initial_ion_level: 4.0,
            ion_step: 0.01,
        }
    }
}
/// How accepted samples get their `elapsed_s`.
#[derive(Clone, Copy, Debug)]
pub enum SampleClock {
    /// Wall time since the capture started (live sources).
    Wall(Instant),
    /// Sample index times a fixed interval (recordings read faster than real time).
    Fixed(Duration),
}
impl SampleClock {
    fn stamp(&self, index: usize) -> f64 {
        match self {
            SampleClock::Wall(started_at) => started_at.elapsed().as_secs_f64(),
            SampleClock::Fixed(interval) => index as f64 * interval.as_secs_f64(),
        }
    }
}
/// What a single poll of the source did to the capture.
#[derive(Debug, PartialEq)]
pub enum PumpOutcome {
    Accepted { sample: Sample, fired: bool },
    Dropped(LineError),
    Idle,
    Closed,
}
#[derive(Clone, Debug, PartialEq)]
pub struct CaptureReport {
    pub samples: usize,
    pub dropped_lines: usize,
    pub peak_hits: usize,
    pub final_ion_level: f64,
    /// False when the source closed before the target was reached.
    pub completed: bool,
}
/// Blocking acquisition loop: pulls lines from a source until the buffer
/// holds `target_samples` samples.
pub struct CapturePipeline<S: LineSource> {
    source: S,
    buffer: CaptureBuffer,
    estimator: IonEstimator,
    target_samples: usize,
    clock: SampleClock,
    dropped_lines: usize,
    closed: bool,
}
impl<S: LineSource> CapturePipeline<S> {
    pub fn new(source: S, settings: &CaptureSettings) -> Result<Self, CaptureError> {
        if settings.target_samples == 0 {
            return Err(CaptureError::InvalidTarget);
        }
        let detector = PeakDetector::new(settings.window, settings.sigma_factor)?;
        Ok(Self {
            source,
            buffer: CaptureBuffer::with_capacity(settings.target_samples),
            estimator: IonEstimator::new(
                detector,
                settings.initial_ion_level,
                settings.ion_step,
            )?,
            target_samples: settings.target_samples,
            clock: SampleClock::Wall(Instant::now()),
            dropped_lines: 0,
            closed: false,
        })
    }
    pub fn with_clock(mut self, clock: SampleClock) -> Result<Self, CaptureError> {
        if matches!(clock, SampleClock::Fixed(interval) if interval.is_zero()) {
            return Err(CaptureError::InvalidSampleInterval);
        }
        self.clock = clock;
        Ok(self)
    }
    pub fn is_complete(&self) -> bool {
        self.buffer.len() >= self.target_samples
    }
    #[cfg(test)]
    pub fn buffer(&self) -> &CaptureBuffer {
        &self.buffer
    }
    pub fn pump_once(&mut self) -> Result<PumpOutcome, CaptureError> {
        if self.closed {
            return Ok(PumpOutcome::Closed);
        }
        let raw = match self.source.poll_line()? {
            LinePoll::Line(raw) => raw,
            LinePoll::Idle => return Ok(PumpOutcome::Idle),
            LinePoll::Overlong(len) => {
                self.dropped_lines += 1;
                debug!("dropping over-long {len}-byte line");
                return Ok(PumpOutcome::Dropped(LineError::TooLong(len)));
            }
            LinePoll::Closed => {
                self.closed = true;
                return Ok(PumpOutcome::Closed);
            }
        };
        let reading = match parse_line(&raw) {
            Ok(reading) => reading,
            Err(err) => {
                self.dropped_lines += 1;
                debug!("dropping line {:?}: {err}", String::from_utf8_lossy(&raw));
                return Ok(PumpOutcome::Dropped(err));
            }
        };
        let sample = Sample {
            ecg: reading.ecg,
            accel: reading.accel,
            elapsed_s: self.clock.stamp(self.buffer.len()),
        };
        Ok(self.record(sample))
    }
    fn record(&mut self, sample: Sample) -> PumpOutcome {
        // the heuristic window includes the sample being accepted
        let mut history = self.buffer.recent_ecg(self.estimator_window()).to_vec();
        history.push(sample.ecg);
        let fired = self.estimator.update(&history);
        self.buffer.push(sample, self.estimator.level());
        PumpOutcome::Accepted { sample, fired }
    }
    fn estimator_window(&self) -> usize {
        self.estimator.window()
    }
    /// Runs until the target is reached or the source closes.
    pub fn run(&mut self) -> Result<CaptureReport, CaptureError> {
        info!(
            "capturing {} samples (window {})",
            self.target_samples,
            self.estimator_window()
        );
        while !self.is_complete() {
            match self.pump_once()? {
                PumpOutcome::Accepted { sample, fired } => {
                    if fired {
                        debug!(
                            "peak in window ending at {:.3}s (ecg {}), ion level now {:.2}",
                            sample.elapsed_s,
                            sample.ecg,
                            self.estimator.level()
                        );
                    }
                }
                PumpOutcome::Dropped(_) | PumpOutcome::Idle => {}
                PumpOutcome::Closed => {
                    warn!(
                        "source closed after {} of {} samples",
                        self.buffer.len(),
                        self.target_samples
                    );
                    break;
                }
            }
        }
        Ok(self.report())
    }
    pub fn report(&self) -> CaptureReport {
        CaptureReport {
            samples: self.buffer.len(),
            dropped_lines: self.dropped_lines,
            peak_hits: self.estimator.hits(),
            final_ion_level: self.estimator.level(),
            completed: self.is_complete(),
        }
    }
    pub fn frame(&self) -> CaptureFrame {
        self.buffer.frame()
    }
}
/// Formats a protocol line the way the acquisition board sends it.
#[cfg(test)]
pub fn make_line(ecg: i64, accel: f64) -> String {
    format!("{ecg},{accel}\n")
}
