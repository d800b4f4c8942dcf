//! HTML chart writer backed by plotly
//!
//! Each chart becomes `<output_dir>/<file_stem>.html`, a self-contained
//! interactive page.

use super::{ChartKind, ChartSink, ChartSpec, Series};
use crate::aggregation::HistogramInput;
use crate::error::{StatsError, StatsResult};
use plotly::common::{Mode, Title};
use plotly::layout::Axis;
use plotly::{Bar, Layout, Plot, Scatter};
use std::fs;
use std::path::{Path, PathBuf};

pub struct PlotlyRenderer {
    output_dir: PathBuf,
    written: Vec<PathBuf>,
}

impl PlotlyRenderer {
    /// Create the renderer, creating `output_dir` if needed
    pub fn new(output_dir: impl Into<PathBuf>) -> StatsResult<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir)?;
        log::info!("📝 Writing charts to: {}", output_dir.display());

        Ok(Self {
            output_dir,
            written: Vec::new(),
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Paths of every chart written so far, in order
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn layout(spec: &ChartSpec) -> Layout {
        Layout::new()
            .title(Title::new(&spec.title))
            .x_axis(Axis::new().title(Title::new(&spec.x_label)))
            .y_axis(Axis::new().title(Title::new(&spec.y_label)))
    }

    fn write(&mut self, spec: &ChartSpec, plot: &Plot) -> StatsResult<()> {
        let path = self.output_dir.join(format!("{}.html", spec.file_stem));
        fs::write(&path, plot.to_html())?;
        log::debug!("   ├─ {} ({})", path.display(), spec.kind.as_str());
        self.written.push(path);
        Ok(())
    }
}

impl ChartSink for PlotlyRenderer {
    fn draw(&mut self, spec: &ChartSpec, series: &Series) -> StatsResult<()> {
        let mut plot = Plot::new();
        match spec.kind {
            ChartKind::Line => {
                let trace = Scatter::new(series.keys(), series.values())
                    .mode(Mode::Lines)
                    .name(&series.value_label);
                plot.add_trace(trace);
            }
            ChartKind::Bar => {
                let trace = Bar::new(series.keys(), series.values()).name(&series.value_label);
                plot.add_trace(trace);
            }
            ChartKind::Histogram => {
                return Err(StatsError::Render(format!(
                    "{}: histogram charts take binned input, not a series",
                    spec.file_stem
                )))
            }
        }
        plot.set_layout(Self::layout(spec));
        self.write(spec, &plot)
    }

    fn draw_histogram(&mut self, spec: &ChartSpec, histogram: &HistogramInput) -> StatsResult<()> {
        // Bins are already computed; draw them as adjacent bars at their centers
        let centers: Vec<f64> = histogram
            .bins
            .iter()
            .map(|b| (b.lower + b.upper) / 2.0)
            .collect();
        let counts: Vec<u64> = histogram.bins.iter().map(|b| b.count).collect();

        let mut plot = Plot::new();
        plot.add_trace(Bar::new(centers, counts).name(&histogram.symbol));
        plot.set_layout(Self::layout(spec));
        self.write(spec, &plot)
    }

    fn backend_type(&self) -> &'static str {
        "plotly-html"
    }
}
