use std::io::Cursor;
use std::path::Path;
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use plotters::coord::Shift;
use plotters::prelude::LineSeries;
use plotters::prelude::*;
use crate::drivers::error::CaptureError;
use crate::drivers::CaptureFrame;
#[derive(Clone, Debug)]
pub struct PlotStyle {
    pub width: u32,
    pub height: u32,
    pub background: RGBColor,
    pub foreground: RGBColor,
    pub ecg_color: RGBColor,
    pub ion_color: RGBColor,
    /// Captions, axis descriptions and tick labels. These need a system font.
    pub labels: bool,
}
impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 600,
            background: WHITE,
            foreground: BLACK,
            ecg_color: BLUE,
            ion_color: RED,
            labels: true,
        }
    }
}
struct Panel<'a> {
    caption: Option<&'a str>,
    x_desc: Option<&'a str>,
    y_desc: &'a str,
    color: RGBColor,
    flat_padding: f64,
}
/// Two stacked panels: ECG over time on top, the ion trend below.
pub fn render_capture_png(frame: &CaptureFrame, style: &PlotStyle) -> Result<Vec<u8>, CaptureError> {
    if frame.is_empty() {
        return Err(CaptureError::Plot("capture frame has no samples".into()));
    }
    let mut buffer = vec![0u8; (style.width * style.height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (style.width, style.height))
            .into_drawing_area();
        root.fill(&style.background)?;
        let panels = root.split_evenly((2, 1));
        let ecg: Vec<f64> = frame.ecg.iter().map(|&v| v as f64).collect();
        draw_panel(
            &panels[0],
            &frame.times_s,
            &ecg,
            &Panel {
                caption: Some("ECG Signal vs Time"),
                x_desc: None,
                y_desc: "ECG",
                color: style.ecg_color,
                flat_padding: 50.0,
            },
            style,
        )?;
        draw_panel(
            &panels[1],
            &frame.times_s,
            &frame.ion_levels,
            &Panel {
                caption: None,
                x_desc: Some("Time (s)"),
                y_desc: "K⁺ Ions",
                color: style.ion_color,
                flat_padding: 0.05,
            },
            style,
        )?;
        root.present()?;
    }
    encode_png(&buffer, style.width, style.height)
}
pub fn save_capture_png(
    frame: &CaptureFrame,
    style: &PlotStyle,
    path: &Path,
) -> Result<(), CaptureError> {
    let png = render_capture_png(frame, style)?;
    std::fs::write(path, png)
        .map_err(|err| CaptureError::Export(format!("{}: {err}", path.display())))
}
fn draw_panel(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    times: &[f64],
    values: &[f64],
    panel: &Panel<'_>,
    style: &PlotStyle,
) -> Result<(), CaptureError> {
    let x_bounds = bounds(times.iter().copied(), 1.0);
    let y_bounds = padded(bounds(values.iter().copied(), panel.flat_padding));
    let mut builder = ChartBuilder::on(area);
    builder.margin(10);
    if style.labels {
        if let Some(caption) = panel.caption {
            builder.caption(caption, ("sans-serif", 20).into_font().color(&style.foreground));
        }
        builder
            .set_label_area_size(LabelAreaPosition::Left, 60)
            .set_label_area_size(LabelAreaPosition::Bottom, 40);
    }
    let mut chart =
        builder.build_cartesian_2d(x_bounds.0..x_bounds.1, y_bounds.0..y_bounds.1)?;
    if style.labels {
        let mut mesh = chart.configure_mesh();
        mesh.y_desc(panel.y_desc)
            .light_line_style(&style.foreground.mix(0.08))
            .label_style(("sans-serif", 13).into_font().color(&style.foreground));
        if let Some(x_desc) = panel.x_desc {
            mesh.x_desc(x_desc);
        }
        mesh.draw()?;
    }
    let series = times.iter().copied().zip(values.iter().copied());
    chart.draw_series(LineSeries::new(series, &panel.color))?;
    Ok(())
}
/// Min/max of `values`, widened by `flat_padding` either side when flat.
fn bounds(values: impl Iterator<Item = f64>, flat_padding: f64) -> (f64, f64) {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    if (max - min).abs() < f64::EPSILON {
        (min - flat_padding, max + flat_padding)
    } else {
        (min, max)
    }
}
fn padded((min, max): (f64, f64)) -> (f64, f64) {
    let margin = (max - min) * 0.05;
    (min - margin, max + margin)
}
fn encode_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>, CaptureError> {
    let image = ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, buffer.to_vec())
        .ok_or_else(|| CaptureError::Plot("failed to allocate image buffer".into()))?;
    let mut output = Vec::new();
    let dynamic = DynamicImage::ImageRgb8(image);
    dynamic.write_to(&mut Cursor::new(&mut output), ImageFormat::Png)?;
    Ok(output)
}
#[cfg(test)]
mod tests {
    use super::*;
    fn unlabelled() -> PlotStyle {
        PlotStyle {
            width: 320,
            height: 200,
            labels: false,
            ..PlotStyle::default()
        }
    }
    #[test]
    fn empty_frame_is_rejected() {
        let err = render_capture_png(&CaptureFrame::default(), &unlabelled()).unwrap_err();
        assert!(matches!(err, CaptureError::Plot(_)));
    }
    #[test]
    fn single_sample_frame_still_renders() {
        let frame = CaptureFrame {
            ecg: vec![512],
            accel: vec![1.0],
            times_s: vec![0.0],
            ion_levels: vec![4.0],
        };
        let png = render_capture_png(&frame, &unlabelled()).unwrap();
        assert!(!png.is_empty());
    }
    #[test]
    fn flat_series_get_padded_bounds() {
        let (lo, hi) = bounds([4.0, 4.0].into_iter(), 0.05);
        assert!((lo - 3.95).abs() < 1e-12 && (hi - 4.05).abs() < 1e-12);
        assert_eq!(bounds([1.0, 3.0].into_iter(), 0.05), (1.0, 3.0));
        assert_eq!(bounds(std::iter::empty(), 1.0), (0.0, 1.0));
    }
}
