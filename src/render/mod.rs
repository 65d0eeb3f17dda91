/// Rendering layer: figure description → RGB raster → TIFF.
///
/// The figure is an explicit list of panels; a single call to [`render`]
/// draws all of them, so no drawing state outlives the call.

pub mod figure;
pub mod fonts;
pub mod heatmap;
pub mod layout;

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::RgbImage;
use plotters::prelude::*;
use tiff::encoder::{colortype, Rational, TiffEncoder};
use tiff::tags::ResolutionUnit;

use crate::color::DivergingColorMap;
use crate::error::RenderError;
use figure::Figure;

/// Draw every panel of `figure` into a fresh white canvas.
pub fn render(figure: &Figure) -> Result<RgbImage, RenderError> {
    fonts::ensure_registered()?;

    let (width, height) = figure.canvas_size();
    if width == 0 || height == 0 {
        return Err(RenderError::EmptyCanvas(width, height));
    }
    let style = &figure.style;
    let cmap = DivergingColorMap::coolwarm(style.vmin, style.vmax);

    let mut buffer = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(RenderError::backend)?;

        let margin = layout::pt_to_px(style.tick_pt, style.dpi) as i32;
        let areas = root.split_evenly((style.grid_rows, style.grid_columns));
        for panel in &figure.panels {
            let area = &areas[panel.row * style.grid_columns + panel.column];
            let inner = area.margin(margin, margin, margin, margin);
            let layout = heatmap::draw_panel(&inner, panel, style, &cmap)?;
            log::debug!("{}: colour bar at {:?}", panel.title, layout.colorbar);
        }

        root.present().map_err(RenderError::backend)?;
    }

    log::info!(
        "Rendered {} panels on a {width}x{height} canvas",
        figure.panels.len()
    );
    RgbImage::from_raw(width, height, buffer)
        .ok_or_else(|| RenderError::Backend("canvas buffer has the wrong size".into()))
}

/// Write `image` as an uncompressed RGB TIFF tagged with `dpi` pixels per
/// inch.
pub fn save_tiff(image: &RgbImage, path: &Path, dpi: f64) -> Result<(), RenderError> {
    let tiff_err = |source| RenderError::Tiff {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(|source| RenderError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut encoder = TiffEncoder::new(BufWriter::new(file)).map_err(tiff_err)?;
    let (width, height) = image.dimensions();
    let mut tiff = encoder
        .new_image::<colortype::RGB8>(width, height)
        .map_err(tiff_err)?;
    tiff.resolution(
        ResolutionUnit::Inch,
        Rational {
            n: dpi.round().max(1.0) as u32,
            d: 1,
        },
    );
    tiff.write_data(image.as_raw()).map_err(tiff_err)?;

    log::info!("Wrote {} at {dpi} dpi", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::figure::FigureStyle;
    use super::*;
    use crate::data::correlation::CorrelationMatrix;
    use crate::data::model::{Column, Dataset};

    fn small_figure(datasets: Vec<Dataset>) -> Figure {
        let style = FigureStyle {
            dpi: 30.0,
            ..FigureStyle::default()
        };
        let named = datasets
            .iter()
            .map(|ds| (ds.name.clone(), CorrelationMatrix::from_dataset(ds)))
            .collect();
        Figure::grid(named, style).unwrap()
    }

    fn sample(name: &str) -> Dataset {
        Dataset::new(
            name,
            vec![
                Column::numeric("0", vec![1.0, 2.0, 3.0, 4.0, 5.0]),
                Column::numeric("5", vec![2.0, 4.1, 5.9, 8.2, 9.9]),
                Column::numeric("10", vec![0.3, -1.2, 0.8, 0.1, -0.4]),
            ],
        )
    }

    #[test]
    fn render_produces_a_canvas_of_the_figure_size() {
        let fig = small_figure(vec![sample("HP_WB"), sample("SP_EB")]);
        let img = render(&fig).unwrap();
        assert_eq!(img.dimensions(), fig.canvas_size());
        assert!(img.pixels().any(|p| p.0 != [255, 255, 255]));
    }

    #[test]
    fn cells_are_painted_with_the_colour_map() {
        let fig = small_figure(vec![sample("HP_WB")]);
        let img = render(&fig).unwrap();
        // The warm end of the map (diagonal cells) must appear somewhere.
        let warm = |p: &image::Rgb<u8>| p.0[0] > 150 && p.0[1] < 60 && p.0[2] < 80;
        assert!(img.pixels().any(warm));
    }

    #[test]
    fn panel_without_numeric_columns_still_renders() {
        let text_only = Dataset::new("TXT", vec![Column::text("id", vec!["a".into()])]);
        let fig = small_figure(vec![text_only]);
        assert!(render(&fig).is_ok());
    }

    #[test]
    fn tiff_round_trips_through_the_decoder() {
        let img = render(&small_figure(vec![sample("HP_WB")])).unwrap();
        let path = std::env::temp_dir().join(format!(
            "surface-correlation-render-{}.tiff",
            std::process::id()
        ));
        save_tiff(&img, &path, 30.0).unwrap();
        let decoded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), img.dimensions());
        assert_eq!(decoded.as_raw(), img.as_raw());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn tiff_records_the_figure_resolution() {
        use tiff::decoder::{ifd::Value, Decoder};
        use tiff::tags::Tag;

        let path = std::env::temp_dir().join(format!(
            "surface-correlation-dpi-{}.tiff",
            std::process::id()
        ));
        save_tiff(&RgbImage::new(8, 4), &path, 500.0).unwrap();

        let mut decoder = Decoder::new(File::open(&path).unwrap()).unwrap();
        assert_eq!(decoder.dimensions().unwrap(), (8, 4));
        for tag in [Tag::XResolution, Tag::YResolution] {
            assert!(matches!(decoder.get_tag(tag).unwrap(), Value::Rational(500, 1)));
        }
        // 2 = inches
        assert_eq!(decoder.get_tag_u32(Tag::ResolutionUnit).unwrap(), 2);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn unwritable_output_is_an_io_error() {
        let img = RgbImage::new(2, 2);
        let err = save_tiff(&img, Path::new("/nonexistent-dir/out.tiff"), 200.0).unwrap_err();
        assert!(matches!(err, RenderError::Io { .. }), "{err}");
    }
}
