use super::figure::FigureStyle;

// ---------------------------------------------------------------------------
// Pixel geometry of one heatmap panel
// ---------------------------------------------------------------------------

/// Typographic points to pixels at `dpi`, never below one pixel.
pub fn pt_to_px(pt: f64, dpi: f64) -> u32 {
    (pt * dpi / 72.0).round().max(1.0) as u32
}

/// Axis-aligned pixel rectangle in panel-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub fn center(&self) -> (i32, i32) {
        (self.x + self.w / 2, self.y + self.h / 2)
    }

    pub fn corners(&self) -> [(i32, i32); 2] {
        [(self.x, self.y), (self.right(), self.bottom())]
    }
}

/// Font heights in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontSizes {
    pub annotation: u32,
    pub tick: u32,
    pub title: u32,
}

impl FontSizes {
    pub fn from_style(style: &FigureStyle) -> Self {
        FontSizes {
            annotation: pt_to_px(style.annotation_pt, style.dpi),
            tick: pt_to_px(style.tick_pt, style.dpi),
            title: pt_to_px(style.title_pt, style.dpi),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelLayout {
    pub title: Rect,
    pub cells: Rect,
    pub colorbar: Rect,
    /// Spacing unit: one tick-label height.
    pub pad: i32,
}

impl PanelLayout {
    /// Split a `width × height` panel into title band, cell grid and colour bar.
    ///
    /// `label_extent` is the longest axis label in pixels; the y labels take
    /// that much room on the left, the rotated x labels as much at the bottom.
    /// `colorbar_label_extent` is the widest colour-bar tick label.
    pub fn compute(
        width: u32,
        height: u32,
        fonts: &FontSizes,
        label_extent: u32,
        colorbar_label_extent: u32,
    ) -> Self {
        let (width, height) = (width as i32, height as i32);
        let pad = fonts.tick as i32;

        let title = Rect {
            x: 0,
            y: 0,
            w: width,
            h: fonts.title as i32 * 2,
        };

        let left = label_extent as i32 + pad;
        let top = title.bottom() + pad / 2;
        let bottom = label_extent as i32 + pad;
        let bar_width = pad.max(width / 40);
        let gap = pad * 2;
        let right = gap + bar_width + pad + colorbar_label_extent as i32 + pad;

        let cells = Rect {
            x: left,
            y: top,
            w: (width - left - right).max(1),
            h: (height - top - bottom).max(1),
        };

        let colorbar = Rect {
            x: cells.right() + gap,
            y: cells.y,
            w: bar_width,
            h: cells.h,
        };

        PanelLayout {
            title,
            cells,
            colorbar,
            pad,
        }
    }

    /// Cell `(row, col)` of an `n × n` grid. Cells tile the grid exactly.
    pub fn cell(&self, n: usize, row: usize, col: usize) -> Rect {
        let edge = |start: i32, len: i32, k: usize| start + (k as i64 * len as i64 / n as i64) as i32;
        let x0 = edge(self.cells.x, self.cells.w, col);
        let x1 = edge(self.cells.x, self.cells.w, col + 1);
        let y0 = edge(self.cells.y, self.cells.h, row);
        let y1 = edge(self.cells.y, self.cells.h, row + 1);
        Rect {
            x: x0,
            y: y0,
            w: x1 - x0,
            h: y1 - y0,
        }
    }
}

/// Evenly spaced "round" tick values covering `[vmin, vmax]`.
pub fn colorbar_ticks(vmin: f64, vmax: f64) -> Vec<f64> {
    let span = vmax - vmin;
    if !(span > 0.0) {
        return vec![vmin];
    }
    let step = nice_step(span / 6.0);
    let first = (vmin / step - 1e-9).ceil() as i64;
    let last = (vmax / step + 1e-9).floor() as i64;
    (first..=last).map(|k| k as f64 * step).collect()
}

/// Decimals needed to print multiples of `step` without noise.
pub fn tick_decimals(step: f64) -> usize {
    (0..6)
        .find(|&d| {
            let scaled = step * 10f64.powi(d as i32);
            (scaled - scaled.round()).abs() < 1e-6
        })
        .unwrap_or(6)
}

fn nice_step(raw: f64) -> f64 {
    let magnitude = 10f64.powf(raw.log10().floor());
    [1.0, 2.0, 2.5, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|&s| s >= raw * (1.0 - 1e-9))
        .unwrap_or(10.0 * magnitude)
}
