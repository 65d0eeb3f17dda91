use palette::Srgb;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::figure::{FigureStyle, Panel};
use super::fonts::FAMILY;
use super::layout::{colorbar_ticks, tick_decimals, FontSizes, PanelLayout, Rect};
use crate::color::DivergingColorMap;
use crate::error::RenderError;

// ---------------------------------------------------------------------------
// One annotated heatmap panel
// ---------------------------------------------------------------------------

fn rgb(c: Srgb<u8>) -> RGBColor {
    RGBColor(c.red, c.green, c.blue)
}

fn font(size: u32, style: FontStyle) -> FontDesc<'static> {
    FontDesc::new(FontFamily::Name(FAMILY), size as f64, style)
}

fn text_style(font: FontDesc<'static>, color: RGBColor, h: HPos, v: VPos) -> TextStyle<'static> {
    font.color(&color).pos(Pos::new(h, v))
}

fn fill<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    rect: Rect,
    color: RGBColor,
) -> Result<(), RenderError> {
    area.draw(&Rectangle::new(rect.corners(), color.filled()))
        .map_err(RenderError::backend)
}

/// Widest rendering of `labels` in `style`, in pixels.
fn widest<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    labels: impl IntoIterator<Item = String>,
    style: &TextStyle,
) -> Result<u32, RenderError> {
    let mut max = 0u32;
    for label in labels {
        let (w, _) = area
            .estimate_text_size(&label, style)
            .map_err(RenderError::backend)?;
        max = max.max(w);
    }
    Ok(max)
}

/// Draw `panel` into `area`: title, cells with value annotations, axis
/// labels and a colour bar. Returns the geometry the panel was drawn with.
pub fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    panel: &Panel,
    style: &FigureStyle,
    cmap: &DivergingColorMap,
) -> Result<PanelLayout, RenderError> {
    let sizes = FontSizes::from_style(style);
    let (width, height) = area.dim_in_pixel();
    let matrix = &panel.matrix;
    let n = matrix.size();

    let tick_font = font(sizes.tick, FontStyle::Normal);
    let y_label_style = text_style(tick_font.clone(), BLACK, HPos::Right, VPos::Center);
    let x_label_style = text_style(
        tick_font.clone().transform(FontTransform::Rotate270),
        BLACK,
        HPos::Right,
        VPos::Center,
    );
    let bar_label_style = text_style(tick_font, BLACK, HPos::Left, VPos::Center);

    let ticks = colorbar_ticks(cmap.vmin, cmap.vmax);
    let decimals = match ticks.as_slice() {
        [a, b, ..] => tick_decimals(b - a),
        _ => 1,
    };
    let tick_labels: Vec<String> = ticks.iter().map(|t| format!("{t:.decimals$}")).collect();

    let label_extent = widest(area, matrix.labels().iter().cloned(), &y_label_style)?;
    let bar_extent = widest(area, tick_labels.iter().cloned(), &bar_label_style)?;
    let layout = PanelLayout::compute(width, height, &sizes, label_extent, bar_extent);
    log::debug!("{}: {n}x{n} cells in {:?}", panel.title, layout.cells);

    draw_title(area, &panel.title, &layout, sizes.title)?;

    if n == 0 {
        let notice = text_style(font(sizes.tick, FontStyle::Normal), BLACK, HPos::Center, VPos::Center);
        area.draw_text("no numeric columns", &notice, layout.cells.center())
            .map_err(RenderError::backend)?;
        return Ok(layout);
    }

    draw_cells(area, panel, style, cmap, &layout, sizes.annotation)?;

    let half = layout.pad / 2;
    for (k, label) in matrix.labels().iter().enumerate() {
        let cell = layout.cell(n, k, k);
        area.draw_text(label, &y_label_style, (layout.cells.x - half, cell.center().1))
            .map_err(RenderError::backend)?;
        area.draw_text(label, &x_label_style, (cell.center().0, layout.cells.bottom() + half))
            .map_err(RenderError::backend)?;
    }

    draw_colorbar(area, cmap, &layout, &ticks, &tick_labels, &bar_label_style)?;
    Ok(layout)
}

/// Centred bold title. The bundled face has one weight, so the text is
/// repeated over a few pixels horizontally.
fn draw_title<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    layout: &PanelLayout,
    size: u32,
) -> Result<(), RenderError> {
    let style = text_style(font(size, FontStyle::Bold), BLACK, HPos::Center, VPos::Center);
    let (x, y) = layout.title.center();
    let stroke = (size as i32 / 24).max(1);
    for dx in 0..=stroke {
        area.draw_text(title, &style, (x + dx, y))
            .map_err(RenderError::backend)?;
    }
    Ok(())
}

fn draw_cells<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    panel: &Panel,
    style: &FigureStyle,
    cmap: &DivergingColorMap,
    layout: &PanelLayout,
    annotation_px: u32,
) -> Result<(), RenderError> {
    let matrix = &panel.matrix;
    let n = matrix.size();

    // Shrink annotations so "-0.00" fits inside a cell.
    let sample = layout.cell(n, 0, 0);
    let fit = (sample.w / 3).min(sample.h * 3 / 5).max(1) as u32;
    let annotation = font(annotation_px.min(fit), FontStyle::Normal);

    for row in 0..n {
        for col in 0..n {
            let value = matrix.get(row, col);
            let Some(color) = cmap.color_for(value) else {
                // Undefined correlation: blank cell, no annotation.
                continue;
            };
            let cell = layout.cell(n, row, col);
            fill(area, cell, rgb(color))?;

            let text = format!("{value:.prec$}", prec = style.annotation_decimals);
            let text_color = rgb(cmap.text_color_for(value));
            let label = text_style(annotation.clone(), text_color, HPos::Center, VPos::Center);
            area.draw_text(&text, &label, cell.center())
                .map_err(RenderError::backend)?;
        }
    }
    Ok(())
}

fn draw_colorbar<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    cmap: &DivergingColorMap,
    layout: &PanelLayout,
    ticks: &[f64],
    tick_labels: &[String],
    label_style: &TextStyle,
) -> Result<(), RenderError> {
    let bar = layout.colorbar;
    let span = cmap.vmax - cmap.vmin;

    for dy in 0..bar.h {
        let value = cmap.vmax - (dy as f64 + 0.5) / bar.h as f64 * span;
        if let Some(color) = cmap.color_for(value) {
            let row = Rect {
                x: bar.x,
                y: bar.y + dy,
                w: bar.w,
                h: 1,
            };
            fill(area, row, rgb(color))?;
        }
    }

    area.draw(&Rectangle::new(bar.corners(), BLACK.stroke_width(1)))
        .map_err(RenderError::backend)?;

    let tick_len = (layout.pad / 3).max(2);
    for (value, label) in ticks.iter().zip(tick_labels) {
        let y = bar.bottom() - ((value - cmap.vmin) / span * bar.h as f64).round() as i32;
        area.draw(&PathElement::new(
            vec![(bar.right(), y), (bar.right() + tick_len, y)],
            BLACK,
        ))
        .map_err(RenderError::backend)?;
        area.draw_text(label, label_style, (bar.right() + tick_len + layout.pad / 3, y))
            .map_err(RenderError::backend)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::correlation::CorrelationMatrix;
    use crate::data::model::{Column, Dataset};
    use crate::render::fonts;

    const SIZE: (u32, u32) = (480, 400);

    /// Draw one panel on a white canvas; returns the pixels and the layout.
    fn draw(dataset: &Dataset) -> (Vec<u8>, PanelLayout) {
        fonts::ensure_registered().unwrap();
        let style = FigureStyle {
            dpi: 40.0,
            ..FigureStyle::default()
        };
        let cmap = DivergingColorMap::coolwarm(style.vmin, style.vmax);
        let panel = Panel {
            title: "HP_EB Correlation".into(),
            matrix: CorrelationMatrix::from_dataset(dataset),
            row: 0,
            column: 0,
        };

        let mut buffer = vec![0u8; (SIZE.0 * SIZE.1 * 3) as usize];
        let layout = {
            let root = BitMapBackend::with_buffer(&mut buffer, SIZE).into_drawing_area();
            root.fill(&WHITE).unwrap();
            let layout = draw_panel(&root, &panel, &style, &cmap).unwrap();
            root.present().unwrap();
            layout
        };
        (buffer, layout)
    }

    fn pixel(buffer: &[u8], x: i32, y: i32) -> [u8; 3] {
        let i = (y as usize * SIZE.0 as usize + x as usize) * 3;
        [buffer[i], buffer[i + 1], buffer[i + 2]]
    }

    fn with_flat_column() -> Dataset {
        Dataset::new(
            "HP_EB",
            vec![
                Column::numeric("a", vec![1.0, 2.0, 3.0, 4.0]),
                Column::numeric("flat", vec![7.0, 7.0, 7.0, 7.0]),
                Column::numeric("b", vec![2.0, 4.0, 5.0, 9.0]),
            ],
        )
    }

    #[test]
    fn undefined_cells_stay_blank() {
        let (buffer, layout) = draw(&with_flat_column());
        for (row, col) in [(0, 1), (1, 0), (1, 1), (1, 2), (2, 1)] {
            let cell = layout.cell(3, row, col);
            assert!(cell.w > 2 && cell.h > 2, "{cell:?}");
            // Neighbouring fills may touch the shared edge, so skip it.
            for y in cell.y + 1..cell.bottom() - 1 {
                for x in cell.x + 1..cell.right() - 1 {
                    assert_eq!(pixel(&buffer, x, y), [255, 255, 255], "cell ({row}, {col}) at ({x}, {y})");
                }
            }
        }
    }

    #[test]
    fn defined_cells_next_to_blank_ones_are_filled() {
        let dataset = with_flat_column();
        let matrix = CorrelationMatrix::from_dataset(&dataset);
        let cmap = DivergingColorMap::coolwarm(-0.2, 1.0);
        let (buffer, layout) = draw(&dataset);
        for (row, col) in [(0, 0), (0, 2), (2, 0), (2, 2)] {
            let cell = layout.cell(3, row, col);
            let expected = cmap.color_for(matrix.get(row, col)).unwrap();
            // Corner pixels are clear of the centred annotation.
            assert_eq!(
                pixel(&buffer, cell.x + 2, cell.y + 2),
                [expected.red, expected.green, expected.blue],
                "cell ({row}, {col})"
            );
        }
    }
}
