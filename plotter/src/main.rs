use anyhow::Context;
use clap::Parser;
use shared::{logging, Table};
use tracing::info;

pub mod chart;
pub mod cli;
pub mod render;

use cli::Args;
use render::FileRenderer;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init_subscriber("info");

    let table = Table::load(&args.input).context("Loading results failed")?;
    info!(
        input = %args.input.display(),
        rows = table.len(),
        names = table.names().count(),
        "Loaded results"
    );

    let mut renderer = FileRenderer::new(
        &args.output_dir,
        args.format,
        (args.width, args.height),
        args.log_x,
    )?;
    let count = chart::render_all(&table, &mut renderer)?;

    info!(
        charts = count,
        output_dir = %renderer.output_dir().display(),
        "Done"
    );
    Ok(())
}
