use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::data::correlation::CorrelationMatrix;
use crate::data::loader;
use crate::data::model::Dataset;
use crate::render::{self, figure::Figure};

// ---------------------------------------------------------------------------
// load → window → correlate → render → show → save
// ---------------------------------------------------------------------------

/// What a completed run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub output: PathBuf,
    pub panels: usize,
    pub canvas: (u32, u32),
}

/// Read every configured dataset and apply its window.
///
/// All files are read before anything is returned, so a missing or broken
/// file stops the run before any output exists.
pub fn load_datasets(config: &Config) -> Result<Vec<Dataset>> {
    config
        .datasets
        .iter()
        .map(|spec| -> Result<Dataset> {
            let path = config.dataset_path(spec);
            let dataset = loader::load_file(&spec.name, &path)
                .with_context(|| format!("loading dataset {}", spec.name))?;
            Ok(match spec.window {
                Some(window) => {
                    let cut = dataset.window(window);
                    log::info!(
                        "{}: kept {} rows x {} columns (window {}x{})",
                        spec.name,
                        cut.n_rows(),
                        cut.n_columns(),
                        window.rows,
                        window.columns
                    );
                    cut
                }
                None => dataset,
            })
        })
        .collect()
}

/// Correlation matrix per dataset, keyed by dataset name.
pub fn correlate(datasets: &[Dataset]) -> Vec<(String, CorrelationMatrix)> {
    datasets
        .iter()
        .map(|ds| {
            let matrix = CorrelationMatrix::from_dataset(ds);
            let n = matrix.size();
            log::info!("{}: {n}x{n} correlation matrix", ds.name);
            (ds.name.clone(), matrix)
        })
        .collect()
}

/// Run the whole pipeline once.
pub fn run(config: &Config) -> Result<RunSummary> {
    let datasets = load_datasets(config)?;
    let matrices = correlate(&datasets);

    let figure = Figure::grid(matrices, config.style.clone()).context("laying out figure")?;
    let image = Arc::new(render::render(&figure).context("rendering figure")?);

    if config.show_window {
        if let Err(e) = crate::app::show_figure(Arc::clone(&image)) {
            log::warn!("Could not open the figure window: {e}");
        }
    }

    render::save_tiff(&image, &config.output, config.style.dpi)
        .with_context(|| format!("writing {}", config.output.display()))?;

    Ok(RunSummary {
        output: config.output.clone(),
        panels: figure.panels.len(),
        canvas: image.dimensions(),
    })
}
