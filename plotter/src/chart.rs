use anyhow::{bail, Context};
use shared::{Metric, Series, Table};
use tracing::debug;

/// Everything needed to draw one metric: a line per configuration name
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub metric: Metric,
    pub series: Vec<Series>,
}

impl Chart {
    pub fn title(&self) -> &'static str {
        self.metric.name()
    }
}

/// Drawing backend for finished charts
pub trait Renderer {
    fn render(&mut self, chart: &Chart) -> anyhow::Result<()>;
}

/// One chart per metric, in [`Metric::ALL`] order.
///
/// Series keep the point order of the results file, so lines connect points
/// in that order rather than by ascending thread count.
pub fn charts(table: &Table) -> anyhow::Result<Vec<Chart>> {
    if table.is_empty() {
        bail!("No data rows to plot");
    }

    let charts = Metric::ALL
        .into_iter()
        .map(|metric| {
            let series = table
                .series(metric)
                .into_iter()
                .filter(|series| {
                    if series.is_empty() {
                        debug!(%metric, name = %series.name, "Skipping empty series");
                    }
                    !series.is_empty()
                })
                .collect();
            Chart { metric, series }
        })
        .collect();

    Ok(charts)
}

/// Render every chart, stopping at the first failure. Returns the number of
/// charts drawn.
pub fn render_all(table: &Table, renderer: &mut impl Renderer) -> anyhow::Result<usize> {
    let charts = charts(table)?;
    for chart in &charts {
        renderer
            .render(chart)
            .with_context(|| format!("Rendering chart {} failed", chart.metric))?;
    }
    Ok(charts.len())
}
