use std::io::{self, Read};
use std::thread;
use std::time::Duration;
use log::info;
use serde::Deserialize;
use serialport::SerialPort;
use crate::drivers::{CaptureError, ReaderSource};
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SerialSettings {
    pub port: String,
    pub baud_rate: u32,
    /// Upper bound on a single blocking read; an expired read is an idle poll.
    pub read_timeout_ms: u64,
    /// Many boards reset when the port opens; wait this long before reading.
    pub settle_ms: u64,
}
impl Default for SerialSettings {
    fn default() -> Self {
        Self {
            port: "COM3".to_string(),
            baud_rate: 115_200,
            read_timeout_ms: 100,
            settle_ms: 2_000,
        }
    }
}
/// Open serial connection to the acquisition board.
///
/// The port is released when the link is dropped, including when a capture
/// aborts with an error.
pub struct SerialLink {
    port_name: String,
    port: Box<dyn SerialPort>,
}
impl SerialLink {
    pub fn connect(settings: &SerialSettings) -> Result<Self, CaptureError> {
        let port = serialport::new(&settings.port, settings.baud_rate)
            .timeout(Duration::from_millis(settings.read_timeout_ms.max(1)))
            .open()
            .map_err(|source| CaptureError::SerialOpen {
                port: settings.port.clone(),
                source,
            })?;
        info!(
            "opened {} at {} baud, settling for {} ms",
            settings.port, settings.baud_rate, settings.settle_ms
        );
        thread::sleep(Duration::from_millis(settings.settle_ms));
        Ok(Self {
            port_name: settings.port.clone(),
            port,
        })
    }
    pub fn port_name(&self) -> &str {
        &self.port_name
    }
    pub fn into_source(self) -> ReaderSource<SerialLink> {
        ReaderSource::new(self)
    }
}
impl Read for SerialLink {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.port.read(buf)
    }
}
impl Drop for SerialLink {
    fn drop(&mut self) {
        info!("released serial port {}", self.port_name);
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn defaults_match_board_firmware() {
        let settings = SerialSettings::default();
        assert_eq!(settings.port, "COM3");
        assert_eq!(settings.baud_rate, 115_200);
        assert_eq!(settings.settle_ms, 2_000);
    }
    #[test]
    fn missing_port_reports_its_name() {
        let settings = SerialSettings {
            port: "/dev/kion-monitor-no-such-port".to_string(),
            settle_ms: 0,
            ..SerialSettings::default()
        };
        match SerialLink::connect(&settings) {
            Err(CaptureError::SerialOpen { port, .. }) => {
                assert_eq!(port, "/dev/kion-monitor-no-such-port")
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("opening a missing port must fail"),
        }
    }
}
