//! Image rendering for motorsport assets.
//!
//! Implements:
//! - Qualifying gap-to-pole bar charts
//! - Driver standings boards
//! - SVG rasterisation to PNG

pub mod qualifying;
pub mod raster;
pub mod standings;
pub mod svg;

pub use qualifying::{render_delta_chart, ChartConfig, DeltaRow, DeltaTable, QualifyingLap};
pub use raster::{render_png, svg_to_png};
pub use standings::{render_standings_board, BoardConfig, BoardRow};
