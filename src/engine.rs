// src/engine.rs
use std::fs::File;
use std::time::Duration;
use log::info;
use crate::config::CaptureConfig;
use crate::drivers::{
    save_capture_png, CaptureError, CaptureFrame, CapturePipeline, CaptureReport,
    CaptureSettings, LineSource, PlotStyle, ReaderSource, SampleClock, SimulatedSource,
};
use crate::recorder;
use crate::serial_link::SerialLink;
use crate::types::{ConnectionMode, OutputSettings};

pub struct CaptureOutcome {
    pub frame: CaptureFrame,
    pub report: CaptureReport,
}

// 打开数据源并跑完一次采集; 数据源 (含串口) 在返回前释放
pub fn run_capture(config: &CaptureConfig) -> Result<CaptureOutcome, CaptureError> {
    match &config.source {
        ConnectionMode::Hardware => {
            let link = SerialLink::connect(&config.serial)?;
            info!("⚙️ acquiring from {}", link.port_name());
            capture(link.into_source(), &config.capture, None)
        }
        ConnectionMode::Simulation => {
            info!("⚙️ acquiring from simulated ECG");
            capture(SimulatedSource::new(config.simulation.profile()), &config.capture, None)
        }
        ConnectionMode::Replay { path, sample_interval_ms } => {
            let file = File::open(path).map_err(|source| CaptureError::ReplayOpen {
                path: path.display().to_string(),
                source,
            })?;
            info!("⚙️ replaying {} at {} ms per sample", path.display(), sample_interval_ms);
            let clock = SampleClock::Fixed(Duration::from_millis(*sample_interval_ms));
            capture(ReaderSource::new(file), &config.capture, Some(clock))
        }
    }
}

fn capture<S: LineSource>(
    source: S,
    settings: &CaptureSettings,
    clock: Option<SampleClock>,
) -> Result<CaptureOutcome, CaptureError> {
    let mut pipeline = CapturePipeline::new(source, settings)?;
    if let Some(clock) = clock {
        pipeline = pipeline.with_clock(clock)?;
    }
    let report = pipeline.run()?;
    let frame = pipeline.frame();
    info!(
        "✅ {} samples over {:.1} s, {} dropped lines, {} peak windows, K⁺ level {:.2}",
        report.samples,
        frame.duration_seconds(),
        report.dropped_lines,
        report.peak_hits,
        report.final_ion_level
    );
    Ok(CaptureOutcome { frame, report })
}

// 静态导出 (PNG / CSV), 均为可选
pub fn export(outcome: &CaptureOutcome, output: &OutputSettings) -> Result<(), CaptureError> {
    if let Some(path) = &output.png {
        save_capture_png(&outcome.frame, &PlotStyle::default(), path)?;
        info!("🖼 plot saved to {}", path.display());
    }
    if let Some(path) = &output.csv {
        recorder::save_csv(&outcome.frame, path)?;
    }
    Ok(())
}
