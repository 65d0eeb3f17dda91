use eframe::egui::{self, Color32, RichText, Ui};

use crate::state::ViewerState;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut ViewerState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Save as…").clicked() {
                save_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        let (w, h) = state.figure.dimensions();
        ui.label(format!("{w} × {h} px"));

        ui.separator();

        if ui
            .selectable_label(state.fit_to_window, "Fit to window")
            .clicked()
        {
            state.fit_to_window = !state.fit_to_window;
        }

        ui.separator();
        ui.label("Close the window to write the output file.");

        if let Some(msg) = &state.status_message {
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                Color32::DARK_GREEN
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn save_file_dialog(state: &mut ViewerState) {
    let file = rfd::FileDialog::new()
        .set_title("Save figure")
        .set_file_name(crate::config::OUTPUT_FILE)
        .add_filter("TIFF", &["tiff", "tif"])
        .add_filter("PNG", &["png"])
        .save_file();

    if let Some(path) = file {
        state.save_as(&path);
    }
}
