use std::sync::Arc;

use eframe::egui;
use image::RgbImage;

use crate::state::ViewerState;
use crate::ui::{canvas, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct FigureViewerApp {
    pub state: ViewerState,
}

impl FigureViewerApp {
    pub fn new(figure: Arc<RgbImage>) -> Self {
        Self {
            state: ViewerState::new(figure),
        }
    }
}

impl eframe::App for FigureViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Central panel: figure ----
        egui::CentralPanel::default().show(ctx, |ui| {
            canvas::figure_canvas(ui, &mut self.state);
        });
    }
}

/// Open the viewer and block until the user closes it.
pub fn show_figure(figure: Arc<RgbImage>) -> eframe::Result {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1600.0, 950.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Surface Correlation – Heatmaps",
        options,
        Box::new(|_cc| Ok(Box::new(FigureViewerApp::new(figure)))),
    )
}
