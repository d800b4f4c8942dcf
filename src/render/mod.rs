//! Chart rendering
//!
//! Defines the two-column `Series` every rollup is converted into and the
//! `ChartSink` interface the report draws through. `PlotlyRenderer` writes
//! one HTML file per chart; `RecordingSink` keeps the calls in memory.

pub mod plotly_renderer;
pub mod series;

use crate::aggregation::HistogramInput;
use crate::error::StatsResult;

pub use plotly_renderer::PlotlyRenderer;
pub use series::{Series, SeriesPoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Line,
    Bar,
    Histogram,
}

impl ChartKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Line => "line",
            ChartKind::Bar => "bar",
            ChartKind::Histogram => "histogram",
        }
    }
}

/// Title, axis labels and artifact name of one chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub file_stem: String,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub kind: ChartKind,
}

impl ChartSpec {
    pub fn new(file_stem: impl Into<String>, title: impl Into<String>, x_label: &str, y_label: &str, kind: ChartKind) -> Self {
        Self {
            file_stem: file_stem.into(),
            title: title.into(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            kind,
        }
    }
}

/// Backend that turns series into visual artifacts
///
/// Implementations only read their inputs.
pub trait ChartSink {
    /// Draw a line or bar chart
    fn draw(&mut self, spec: &ChartSpec, series: &Series) -> StatsResult<()>;

    /// Draw a binned premium distribution
    fn draw_histogram(&mut self, spec: &ChartSpec, histogram: &HistogramInput) -> StatsResult<()>;

    /// Get backend type for logging
    fn backend_type(&self) -> &'static str;
}

/// One call received by a `RecordingSink`
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedChart {
    Series(ChartSpec, Series),
    Histogram(ChartSpec, HistogramInput),
}

impl RecordedChart {
    pub fn spec(&self) -> &ChartSpec {
        match self {
            RecordedChart::Series(spec, _) | RecordedChart::Histogram(spec, _) => spec,
        }
    }
}

/// In-memory sink, used for dry runs and tests
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub charts: Vec<RecordedChart>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file_stems(&self) -> Vec<&str> {
        self.charts.iter().map(|c| c.spec().file_stem.as_str()).collect()
    }

    pub fn series(&self, file_stem: &str) -> Option<&Series> {
        self.charts.iter().find_map(|c| match c {
            RecordedChart::Series(spec, series) if spec.file_stem == file_stem => Some(series),
            _ => None,
        })
    }
}

impl ChartSink for RecordingSink {
    fn draw(&mut self, spec: &ChartSpec, series: &Series) -> StatsResult<()> {
        self.charts.push(RecordedChart::Series(spec.clone(), series.clone()));
        Ok(())
    }

    fn draw_histogram(&mut self, spec: &ChartSpec, histogram: &HistogramInput) -> StatsResult<()> {
        self.charts
            .push(RecordedChart::Histogram(spec.clone(), histogram.clone()));
        Ok(())
    }

    fn backend_type(&self) -> &'static str {
        "memory"
    }
}
