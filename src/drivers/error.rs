use thiserror::Error;
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("failed to open serial port {port}: {source}")]
    SerialOpen {
        port: String,
        #[source]
        source: serialport::Error,
    },
    #[error("failed to open replay file {path}: {source}")]
    ReplayOpen {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("line source I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("capture target must be greater than zero")]
    InvalidTarget,
    #[error("peak window must hold at least three samples, got {0}")]
    InvalidWindow(usize),
    #[error("ion step must be a finite, non-negative number, got {0}")]
    InvalidIonStep(f64),
    #[error("replay sample interval must be greater than zero")]
    InvalidSampleInterval,
    #[error("failed to render plot: {0}")]
    Plot(String),
    #[error("failed to export capture: {0}")]
    Export(String),
}
impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for CaptureError
{
    fn from(value: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        CaptureError::Plot(format!("{value:?}"))
    }
}
impl From<image::ImageError> for CaptureError {
    fn from(value: image::ImageError) -> Self {
        CaptureError::Plot(value.to_string())
    }
}
