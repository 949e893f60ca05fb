// src/drivers/mod.rs
// 采集链路: 行协议 -> 数据源 -> 缓冲 -> 峰值启发式 -> 绘图
pub mod buffer;
pub mod error;
pub mod peaks;
pub mod pipeline;
pub mod plot;
pub mod protocol;
pub mod source;
// 公开导出这些模块里的结构体，方便外部调用
pub use buffer::CaptureFrame;
pub use error::CaptureError;
pub use pipeline::{CapturePipeline, CaptureReport, CaptureSettings, SampleClock};
pub use plot::{save_capture_png, PlotStyle};
pub use source::{LineSource, ReaderSource, SimulatedSource, SimulationProfile};
