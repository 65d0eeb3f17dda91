use serde::{Deserialize, Serialize};

use super::model::Dataset;

// ---------------------------------------------------------------------------
// Positional window: first N rows × first M columns
// ---------------------------------------------------------------------------

/// A positional slice anchored at the top-left corner of a table.
///
/// Counts are upper bounds: a table smaller than the window comes back
/// unchanged along that axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub rows: usize,
    pub columns: usize,
}

impl Window {
    pub const fn new(rows: usize, columns: usize) -> Self {
        Window { rows, columns }
    }
}

impl Dataset {
    /// Keep the first `window.rows` rows of the first `window.columns` columns.
    /// Non-numeric columns occupy positions like any other column.
    pub fn window(&self, window: Window) -> Dataset {
        let rows = window.rows.min(self.n_rows());
        let columns = self
            .columns
            .iter()
            .take(window.columns)
            .map(|c| c.head(rows))
            .collect();

        Dataset {
            name: self.name.clone(),
            columns,
        }
    }
}
