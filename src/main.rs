// src/main.rs
mod config;
mod drivers;
mod engine;
mod gui;
mod recorder;
mod serial_link;
mod types;
use std::path::PathBuf;
use anyhow::Context;
use config::CaptureConfig;
// 入口函数: 采集 -> 导出 -> 显示
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    // 可选参数: JSON 配置文件路径
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = CaptureConfig::load(config_path.as_deref())?;
    let outcome = engine::run_capture(&config).context("capture failed")?;
    engine::export(&outcome, &config.output).context("export failed")?;
    if config.output.show_window {
        gui::show(outcome)?;
    }
    Ok(())
}
