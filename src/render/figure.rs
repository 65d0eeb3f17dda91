use serde::{Deserialize, Serialize};

use crate::data::correlation::CorrelationMatrix;
use crate::error::RenderError;

// ---------------------------------------------------------------------------
// Figure style
// ---------------------------------------------------------------------------

/// Canvas, grid and typography settings shared by every panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureStyle {
    pub grid_rows: usize,
    pub grid_columns: usize,
    pub width_in: f64,
    pub height_in: f64,
    pub dpi: f64,
    /// Colour scale bounds, identical for all panels.
    pub vmin: f64,
    pub vmax: f64,
    pub annotation_decimals: usize,
    pub annotation_pt: f64,
    pub tick_pt: f64,
    pub title_pt: f64,
}

impl Default for FigureStyle {
    fn default() -> Self {
        FigureStyle {
            grid_rows: 2,
            grid_columns: 3,
            width_in: 32.0,
            height_in: 18.0,
            dpi: 200.0,
            vmin: -0.2,
            vmax: 1.0,
            annotation_decimals: 2,
            annotation_pt: 8.0,
            tick_pt: 10.0,
            title_pt: 12.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Panels and the figure
// ---------------------------------------------------------------------------

/// One heatmap: a matrix, its title and its slot in the grid.
#[derive(Debug, Clone)]
pub struct Panel {
    pub title: String,
    pub matrix: CorrelationMatrix,
    pub row: usize,
    pub column: usize,
}

/// Every panel of the output image, consumed by a single render pass.
#[derive(Debug, Clone)]
pub struct Figure {
    pub panels: Vec<Panel>,
    pub style: FigureStyle,
}

pub fn panel_title(dataset: &str) -> String {
    format!("{dataset} Correlation")
}

impl Figure {
    /// Place matrices row-major into the style's grid.
    pub fn grid(
        matrices: Vec<(String, CorrelationMatrix)>,
        style: FigureStyle,
    ) -> Result<Self, RenderError> {
        if matrices.is_empty() {
            return Err(RenderError::NoPanels);
        }
        let slots = style.grid_rows * style.grid_columns;
        if matrices.len() > slots {
            return Err(RenderError::GridOverflow {
                panels: matrices.len(),
                rows: style.grid_rows,
                columns: style.grid_columns,
            });
        }

        let panels = matrices
            .into_iter()
            .enumerate()
            .map(|(i, (name, matrix))| Panel {
                title: panel_title(&name),
                matrix,
                row: i / style.grid_columns,
                column: i % style.grid_columns,
            })
            .collect();

        Ok(Figure { panels, style })
    }

    /// Canvas size in pixels.
    pub fn canvas_size(&self) -> (u32, u32) {
        let px = |inches: f64| (inches * self.style.dpi).round().max(0.0) as u32;
        (px(self.style.width_in), px(self.style.height_in))
    }
}
