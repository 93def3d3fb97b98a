use std::fmt;

use serde::Deserialize;

pub mod error;
pub mod logging;
pub mod table;

pub use error::LoadError;
pub use table::{Series, Table};

/// Number of columns in a results row
pub const FIELD_COUNT: usize = 5;

/// One measured run of the solver
///
/// Column order on disk: `name, threads, time_ms, prec, mse`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Record {
    pub name: String,
    pub threads: u32,
    pub time_ms: f64,
    pub prec: f64,
    pub mse: f64,
}

impl Record {
    pub fn new(name: impl Into<String>, threads: u32, time_ms: f64, prec: f64, mse: f64) -> Self {
        Self {
            name: name.into(),
            threads,
            time_ms,
            prec,
            mse,
        }
    }
}

/// Dependent variable that gets charted against `threads`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    TimeMs,
    Prec,
    Mse,
}

impl Metric {
    /// Chart order
    pub const ALL: [Metric; 3] = [Metric::TimeMs, Metric::Prec, Metric::Mse];

    pub fn name(self) -> &'static str {
        match self {
            Metric::TimeMs => "time_ms",
            Metric::Prec => "prec",
            Metric::Mse => "mse",
        }
    }

    pub fn value(self, record: &Record) -> f64 {
        match self {
            Metric::TimeMs => record.time_ms,
            Metric::Prec => record.prec,
            Metric::Mse => record.mse,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}
