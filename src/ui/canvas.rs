use eframe::egui::{self, ScrollArea, Ui};

use crate::state::ViewerState;

// ---------------------------------------------------------------------------
// Figure canvas (central panel)
// ---------------------------------------------------------------------------

/// Show the rendered figure, scaled to the panel or at preview resolution.
pub fn figure_canvas(ui: &mut Ui, state: &mut ViewerState) {
    let fit = state.fit_to_window;
    let texture = state.texture(ui.ctx()).clone();

    if fit {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.add(egui::Image::new(&texture).shrink_to_fit());
        });
    } else {
        ScrollArea::both()
            .auto_shrink([false, false])
            .show(ui, |ui: &mut Ui| {
                ui.add(egui::Image::new(&texture).fit_to_original_size(1.0));
            });
    }
}
