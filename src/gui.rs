// src/gui.rs
use anyhow::anyhow;
use eframe::egui;
use egui::Color32;
use egui_plot::{Line, Plot, PlotPoints};
use crate::drivers::{CaptureFrame, CaptureReport};
use crate::engine::CaptureOutcome;

// 采集结束后的静态两联图 (上: ECG, 下: K⁺ 趋势), 时间轴联动
pub struct CaptureViewer {
    ecg_points: Vec<[f64; 2]>,
    ion_points: Vec<[f64; 2]>,
    report: CaptureReport,
}

impl CaptureViewer {
    pub fn new(outcome: CaptureOutcome) -> Self {
        Self {
            ecg_points: ecg_points(&outcome.frame),
            ion_points: ion_points(&outcome.frame),
            report: outcome.report,
        }
    }

    fn summary(&self) -> String {
        let status = if self.report.completed { "complete" } else { "source closed early" };
        format!(
            "{} samples ({status}) | dropped lines: {} | peak windows: {} | final K⁺: {:.2}",
            self.report.samples, self.report.dropped_lines, self.report.peak_hits, self.report.final_ion_level
        )
    }
}

fn ecg_points(frame: &CaptureFrame) -> Vec<[f64; 2]> {
    frame.times_s.iter().zip(&frame.ecg).map(|(&t, &v)| [t, v as f64]).collect()
}

fn ion_points(frame: &CaptureFrame) -> Vec<[f64; 2]> {
    frame.times_s.iter().zip(&frame.ion_levels).map(|(&t, &v)| [t, v]).collect()
}

impl eframe::App for CaptureViewer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::bottom("summary").show(ctx, |ui| {
            ui.monospace(self.summary());
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let panel_height = ((ui.available_height() - 40.0) / 2.0).max(80.0);

            ui.heading("ECG Signal vs Time");
            Plot::new("ecg_plot")
                .height(panel_height)
                .link_axis("time", true, false)
                .y_axis_label("ECG")
                .show(ui, |plot_ui| {
                    plot_ui.line(Line::new(PlotPoints::new(self.ecg_points.clone())).name("ECG").color(Color32::BLUE));
                });

            Plot::new("ion_plot")
                .height(panel_height)
                .link_axis("time", true, false)
                .x_axis_label("Time (s)")
                .y_axis_label("K⁺ Ions")
                .show(ui, |plot_ui| {
                    plot_ui.line(Line::new(PlotPoints::new(self.ion_points.clone())).name("K⁺").color(Color32::RED));
                });
        });
    }
}

// 阻塞直到窗口关闭
pub fn show(outcome: CaptureOutcome) -> anyhow::Result<()> {
    let viewer = CaptureViewer::new(outcome);
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 640.0])
            .with_title("kion-monitor"),
        ..Default::default()
    };
    eframe::run_native("kion-monitor", options, Box::new(move |_cc| Box::new(viewer)))
        .map_err(|err| anyhow!("failed to open plot window: {err}"))
}
