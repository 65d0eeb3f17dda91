use std::sync::OnceLock;

use plotters::style::{register_font, FontStyle};

use crate::error::RenderError;

/// Family name every text element is drawn with.
pub const FAMILY: &str = "sans-serif";

static REGISTERED: OnceLock<Result<(), String>> = OnceLock::new();

/// Register the bundled egui face with the raster text renderer, once per process.
///
/// Only a light weight is bundled, so the bold slot reuses it and titles are
/// emboldened when drawn.
pub fn ensure_registered() -> Result<(), RenderError> {
    REGISTERED
        .get_or_init(|| {
            for style in [FontStyle::Normal, FontStyle::Bold] {
                register_font(FAMILY, style, epaint_default_fonts::UBUNTU_LIGHT).map_err(|_| {
                    format!("bundled font rejected for {FAMILY} ({})", style.as_str())
                })?;
            }
            log::debug!("Registered bundled font as '{FAMILY}'");
            Ok(())
        })
        .clone()
        .map_err(RenderError::Font)
}
