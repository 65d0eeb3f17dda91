use std::path::Path;
use std::sync::Arc;

use eframe::egui::{self, ColorImage, TextureHandle, TextureOptions};
use image::imageops::{self, FilterType};
use image::RgbImage;

// ---------------------------------------------------------------------------
// Viewer state
// ---------------------------------------------------------------------------

/// Longest side of the on-screen preview; the full canvas exceeds GPU texture limits.
pub const PREVIEW_MAX_SIDE: u32 = 4096;

/// The full viewer state, independent of rendering.
pub struct ViewerState {
    /// Full-resolution figure, used for "Save as…".
    pub figure: Arc<RgbImage>,

    /// Downscaled copy uploaded as a texture.
    preview: Option<ColorImage>,

    /// GPU texture (created on first frame).
    pub texture: Option<TextureHandle>,

    /// Scale the preview to the window instead of showing it 1:1.
    pub fit_to_window: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl ViewerState {
    pub fn new(figure: Arc<RgbImage>) -> Self {
        let preview = preview_image(&figure);
        Self {
            figure,
            preview: Some(preview),
            texture: None,
            fit_to_window: true,
            status_message: None,
        }
    }

    /// Upload the preview on first use and return the texture.
    pub fn texture(&mut self, ctx: &egui::Context) -> &TextureHandle {
        let preview = &mut self.preview;
        self.texture.get_or_insert_with(|| {
            let image = preview.take().unwrap_or_default();
            ctx.load_texture("figure", image, TextureOptions::LINEAR)
        })
    }

    /// Write the full-resolution figure; the format follows the extension.
    pub fn save_as(&mut self, path: &Path) {
        match self.figure.save(path) {
            Ok(()) => {
                log::info!("Saved figure to {}", path.display());
                self.status_message = Some(format!("Saved {}", path.display()));
            }
            Err(e) => {
                log::error!("Failed to save figure: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}

/// Scale `figure` down so neither side exceeds [`PREVIEW_MAX_SIDE`].
pub fn preview_image(figure: &RgbImage) -> ColorImage {
    let (w, h) = figure.dimensions();
    let longest = w.max(h);
    let scaled;
    let source = if longest > PREVIEW_MAX_SIDE {
        let factor = PREVIEW_MAX_SIDE as f64 / longest as f64;
        let nw = ((w as f64 * factor).round() as u32).max(1);
        let nh = ((h as f64 * factor).round() as u32).max(1);
        scaled = imageops::resize(figure, nw, nh, FilterType::Triangle);
        &scaled
    } else {
        figure
    };
    ColorImage::from_rgb(
        [source.width() as usize, source.height() as usize],
        source.as_raw(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_figures_are_previewed_as_is() {
        let img = RgbImage::from_pixel(40, 20, image::Rgb([10, 20, 30]));
        let preview = preview_image(&img);
        assert_eq!(preview.size, [40, 20]);
        assert_eq!(preview.pixels[0], egui::Color32::from_rgb(10, 20, 30));
    }

    #[test]
    fn large_figures_are_scaled_to_the_preview_limit() {
        let img = RgbImage::new(PREVIEW_MAX_SIDE * 2, 8);
        let preview = preview_image(&img);
        assert_eq!(preview.size, [PREVIEW_MAX_SIDE as usize, 4]);
    }

    #[test]
    fn save_as_reports_failures_in_the_status_line() {
        let mut state = ViewerState::new(Arc::new(RgbImage::new(4, 4)));
        state.save_as(Path::new("/nonexistent-dir/figure.png"));
        assert!(state.status_message.unwrap().starts_with("Error"));
    }
}
