use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use log::info;
use crate::drivers::{CaptureError, CaptureFrame};

pub const CSV_HEADER: &str = "time_s,ecg,accel,k_ions";

// 写入一次完整采集: 每个样本一行
pub fn write_csv<W: Write>(frame: &CaptureFrame, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "{CSV_HEADER}")?;
    for i in 0..frame.len() {
        writeln!(
            out,
            "{:.4},{},{},{:.4}",
            frame.times_s[i], frame.ecg[i], frame.accel[i], frame.ion_levels[i]
        )?;
    }
    Ok(())
}

pub fn save_csv(frame: &CaptureFrame, path: &Path) -> Result<(), CaptureError> {
    let export_err = |err: std::io::Error| CaptureError::Export(format!("{}: {err}", path.display()));
    let file = File::create(path).map_err(export_err)?;
    let mut w = BufWriter::new(file);
    write_csv(frame, &mut w).map_err(export_err)?;
    w.flush().map_err(export_err)?;
    info!("💾 capture saved to {}", path.display());
    Ok(())
}
