//! Pearson correlation heatmaps for the surface settlement survey.
//!
//! Six tables (HP, SJP and SP instruments, westbound and eastbound) are
//! loaded, correlated column against column and drawn as a 2×3 grid of
//! annotated heatmaps, shown in a window and written to a TIFF file.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod pipeline;
pub mod render;
pub mod state;
pub mod ui;
