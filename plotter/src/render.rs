use std::{
    fs,
    ops::Range,
    path::{Path, PathBuf},
};

use anyhow::Context;
use plotters::{
    coord::{
        ranged1d::ValueFormatter,
        types::RangedCoordf64,
        Shift,
    },
    prelude::*,
};
use shared::Metric;
use tracing::info;

use crate::{
    chart::{Chart, Renderer},
    cli::Format,
};

const LOG_PADDING: f64 = 1.25;

/// Writes every chart to `<output_dir>/<metric>.<ext>`
pub struct FileRenderer {
    output_dir: PathBuf,
    format: Format,
    size: (u32, u32),
    log_x: bool,
}

impl FileRenderer {
    pub fn new(
        output_dir: impl Into<PathBuf>,
        format: Format,
        size: (u32, u32),
        log_x: bool,
    ) -> anyhow::Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir)
            .with_context(|| format!("Creating {} failed", output_dir.display()))?;

        Ok(Self {
            output_dir,
            format,
            size,
            log_x,
        })
    }

    pub fn path(&self, metric: Metric) -> PathBuf {
        self.output_dir
            .join(format!("{}.{}", metric.name(), self.format.extension()))
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

impl Renderer for FileRenderer {
    fn render(&mut self, chart: &Chart) -> anyhow::Result<()> {
        let path = self.path(chart.metric);
        match self.format {
            Format::Png => {
                let root = BitMapBackend::new(&path, self.size).into_drawing_area();
                draw(root, chart, self.log_x)?;
            }
            Format::Svg => {
                let root = SVGBackend::new(&path, self.size).into_drawing_area();
                draw(root, chart, self.log_x)?;
            }
        }

        info!(path = %path.display(), series = chart.series.len(), "Wrote chart");
        Ok(())
    }
}

fn draw<DB>(root: DrawingArea<DB, Shift>, chart: &Chart, log_x: bool) -> anyhow::Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let (x, y) = bounds(chart, log_x);
    let mut builder = ChartBuilder::on(&root);
    builder
        .caption(chart.title(), ("sans-serif", 32))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(70);

    if log_x {
        let mut ctx = builder.build_cartesian_2d(x.log_scale(), y)?;
        draw_series(&mut ctx, chart)?;
    } else {
        let mut ctx = builder.build_cartesian_2d(x, y)?;
        draw_series(&mut ctx, chart)?;
    }

    root.present()?;
    Ok(())
}

fn draw_series<'a, DB, X>(
    ctx: &mut ChartContext<'a, DB, Cartesian2d<X, RangedCoordf64>>,
    chart: &Chart,
) -> anyhow::Result<()>
where
    DB: DrawingBackend + 'a,
    DB::ErrorType: 'static,
    X: Ranged<ValueType = f64> + ValueFormatter<f64>,
{
    ctx.configure_mesh()
        .x_desc("threads")
        .y_desc(chart.title())
        .draw()?;

    for (index, series) in chart.series.iter().enumerate() {
        let color = Palette99::pick(index).to_rgba();
        let points: Vec<(f64, f64)> = series
            .points
            .iter()
            .map(|&(threads, value)| (f64::from(threads), value))
            .collect();

        ctx.draw_series(LineSeries::new(points.iter().copied(), &color))?
            .label(series.name.as_str())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });
        ctx.draw_series(points.iter().map(|&p| Circle::new(p, 3, color.filled())))?;
    }

    ctx.configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    Ok(())
}

/// Axis ranges covering every point of the chart.
///
/// A log axis starts at 1 thread at the lowest.
pub(crate) fn bounds(chart: &Chart, log_x: bool) -> (Range<f64>, Range<f64>) {
    let mut x = (f64::INFINITY, f64::NEG_INFINITY);
    let mut y = (f64::INFINITY, f64::NEG_INFINITY);
    for &(threads, value) in chart.series.iter().flat_map(|s| s.points.iter()) {
        let threads = f64::from(threads);
        x = (x.0.min(threads), x.1.max(threads));
        if value.is_finite() {
            y = (y.0.min(value), y.1.max(value));
        }
    }
    if x.0 > x.1 {
        x = (1.0, 1.0);
    }
    if y.0 > y.1 {
        y = (0.0, 0.0);
    }

    let x = if log_x {
        let low = x.0.max(1.0);
        low / LOG_PADDING..x.1.max(low) * LOG_PADDING
    } else if x.0 == x.1 {
        x.0 - 1.0..x.1 + 1.0
    } else {
        x.0..x.1
    };

    let span = y.1 - y.0;
    let pad = if span == 0.0 {
        y.0.abs().max(1.0) * 0.1
    } else {
        span * 0.05
    };

    (x, y.0 - pad..y.1 + pad)
}
