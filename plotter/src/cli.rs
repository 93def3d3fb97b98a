use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Thread-scaling chart renderer
///
/// Draws one chart per metric (time_ms, prec, mse) with one line per
/// configuration name.
#[derive(Debug, Clone, Parser)]
pub struct Args {
    /// Results file with headerless `name,threads,time_ms,prec,mse` rows
    #[arg(short, long)]
    pub input: PathBuf,
    /// Directory the charts are written to
    #[arg(short, long, default_value = "results")]
    pub output_dir: PathBuf,
    /// Image format
    #[arg(short, long, value_enum, default_value_t = Format::Png)]
    pub format: Format,
    /// Chart width in pixels
    #[arg(long, default_value_t = 1024, value_parser = clap::value_parser!(u32).range(1..))]
    pub width: u32,
    /// Chart height in pixels
    #[arg(long, default_value_t = 768, value_parser = clap::value_parser!(u32).range(1..))]
    pub height: u32,
    /// Use a logarithmic threads axis
    #[arg(long)]
    pub log_x: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Png,
    Svg,
}

impl Format {
    pub fn extension(self) -> &'static str {
        match self {
            Format::Png => "png",
            Format::Svg => "svg",
        }
    }
}
