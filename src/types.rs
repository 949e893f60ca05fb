// src/types.rs
use std::path::PathBuf;
use serde::Deserialize;

// 数据来源
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ConnectionMode {
    // 串口硬件 (默认)
    #[default]
    Hardware,
    // 合成心电, 无需硬件
    Simulation,
    // 回放已录制的行文本文件; 按固定采样间隔打时间戳
    Replay {
        path: PathBuf,
        #[serde(default = "default_replay_interval_ms")]
        sample_interval_ms: u64,
    },
}

fn default_replay_interval_ms() -> u64 {
    20
}

// 采集结束后的输出
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub png: Option<PathBuf>,
    pub csv: Option<PathBuf>,
    pub show_window: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self { png: None, csv: None, show_window: true }
    }
}
