#[cfg(test)]
use std::collections::VecDeque;
use std::io::{BufRead, BufReader, ErrorKind, Read};
use std::thread;
use std::time::Duration;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use crate::drivers::CaptureError;
/// Longest line the board is expected to send, terminator included.
pub const MAX_LINE_BYTES: usize = 256;
/// Outcome of asking a source for its next raw line.
#[derive(Clone, Debug, PartialEq)]
pub enum LinePoll {
    /// One raw line, usually still carrying its `\n` terminator.
    Line(Vec<u8>),
    /// A line ran past the length limit and was discarded.
    Overlong(usize),
    /// Nothing arrived within the read timeout.
    Idle,
    /// The source will never yield another line.
    Closed,
}
/// Trait representing something that can yield newline-delimited lines on demand.
pub trait LineSource {
    fn poll_line(&mut self) -> Result<LinePoll, CaptureError>;
}
/// Assembles lines from any byte stream (serial port, replay file, pipe).
///
/// Bytes read before a timeout stay pending, so a line split across several
/// reads is still delivered whole. A line longer than `max_line` is reported
/// once as [`LinePoll::Overlong`] and its remaining bytes are skipped up to
/// the next newline.
pub struct ReaderSource<R: Read> {
    reader: BufReader<R>,
    pending: Vec<u8>,
    max_line: usize,
    discarding: bool,
    finished: bool,
}
impl<R: Read> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self::with_max_line(reader, MAX_LINE_BYTES)
    }
    pub fn with_max_line(reader: R, max_line: usize) -> Self {
        Self {
            reader: BufReader::new(reader),
            pending: Vec::new(),
            max_line: max_line.max(1),
            discarding: false,
            finished: false,
        }
    }
}
impl<R: Read> LineSource for ReaderSource<R> {
    fn poll_line(&mut self) -> Result<LinePoll, CaptureError> {
        if self.finished {
            return Ok(LinePoll::Closed);
        }
        loop {
            let available = match self.reader.fill_buf() {
                Ok(available) => available,
                Err(err)
                    if matches!(
                        err.kind(),
                        ErrorKind::TimedOut | ErrorKind::WouldBlock | ErrorKind::Interrupted
                    ) =>
                {
                    return Ok(LinePoll::Idle);
                }
                Err(err) => return Err(CaptureError::Io(err)),
            };
            if available.is_empty() {
                self.finished = true;
                if self.discarding || self.pending.is_empty() {
                    return Ok(LinePoll::Closed);
                }
                return Ok(LinePoll::Line(std::mem::take(&mut self.pending)));
            }
            let (take, terminated) = match available.iter().position(|&b| b == b'\n') {
                Some(idx) => (idx + 1, true),
                None => (available.len(), false),
            };
            if self.discarding {
                self.reader.consume(take);
                if !terminated {
                    // keep each poll bounded while a runaway line drains
                    return Ok(LinePoll::Idle);
                }
                self.discarding = false;
                continue;
            }
            self.pending.extend_from_slice(&available[..take]);
            self.reader.consume(take);
            if self.pending.len() > self.max_line {
                let len = self.pending.len();
                self.pending.clear();
                self.discarding = !terminated;
                return Ok(LinePoll::Overlong(len));
            }
            if terminated {
                return Ok(LinePoll::Line(std::mem::take(&mut self.pending)));
            }
        }
    }
}
/// In-memory source for deterministic tests.
#[cfg(test)]
pub struct ManualSource {
    queue: VecDeque<LinePoll>,
}
#[cfg(test)]
impl ManualSource {
    pub fn new<L: Into<Vec<u8>>>(lines: impl IntoIterator<Item = L>) -> Self {
        Self::from_polls(lines.into_iter().map(|l| LinePoll::Line(l.into())))
    }
    pub fn from_polls(polls: impl IntoIterator<Item = LinePoll>) -> Self {
        Self {
            queue: polls.into_iter().collect(),
        }
    }
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}
#[cfg(test)]
impl LineSource for ManualSource {
    fn poll_line(&mut self) -> Result<LinePoll, CaptureError> {
        Ok(self.queue.pop_front().unwrap_or(LinePoll::Closed))
    }
}
/// Shape of the synthetic ECG produced by [`SimulatedSource`].
#[derive(Clone, Debug)]
pub struct SimulationProfile {
    pub sample_interval: Duration,
    pub heart_rate_bpm: f64,
    pub baseline: f64,
    pub r_amplitude: f64,
    pub t_amplitude: f64,
    pub noise: f64,
    pub seed: Option<u64>,
}
impl Default for SimulationProfile {
    fn default() -> Self {
        Self {
            sample_interval: Duration::from_millis(20),
            heart_rate_bpm: 72.0,
            baseline: 512.0,
            r_amplitude: 300.0,
            t_amplitude: 60.0,
            noise: 6.0,
            seed: None,
        }
    }
}
/// Generates `"<ecg>,<accel>\n"` lines from a synthetic heartbeat, paced by
/// `sample_interval`. Never closes.
pub struct SimulatedSource {
    profile: SimulationProfile,
    rng: StdRng,
    emitted: u64,
}
impl SimulatedSource {
    pub fn new(profile: SimulationProfile) -> Self {
        let rng = match profile.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            profile,
            rng,
            emitted: 0,
        }
    }
    fn ecg_at(&mut self, t: f64) -> i64 {
        let period = 60.0 / self.profile.heart_rate_bpm.max(1.0);
        let phase = (t % period) / period;
        let r_wave = gaussian(phase, 0.30, 0.012) * self.profile.r_amplitude;
        let t_wave = gaussian(phase, 0.62, 0.045) * self.profile.t_amplitude;
        let jitter = (self.rng.gen::<f64>() * 2.0 - 1.0) * self.profile.noise;
        (self.profile.baseline + r_wave + t_wave + jitter).round() as i64
    }
}
impl LineSource for SimulatedSource {
    fn poll_line(&mut self) -> Result<LinePoll, CaptureError> {
        if !self.profile.sample_interval.is_zero() {
            thread::sleep(self.profile.sample_interval);
        }
        let t = self.emitted as f64 * self.profile.sample_interval.as_secs_f64().max(1e-3);
        self.emitted += 1;
        let ecg = self.ecg_at(t);
        let accel = 1.0 + (self.rng.gen::<f64>() * 2.0 - 1.0) * 0.02;
        Ok(LinePoll::Line(format!("{ecg},{accel:.4}\n").into_bytes()))
    }
}
fn gaussian(x: f64, centre: f64, width: f64) -> f64 {
    (-((x - centre) * (x - centre)) / (2.0 * width * width)).exp()
}
