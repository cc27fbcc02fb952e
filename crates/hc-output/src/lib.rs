//! `hc-output` — result writers for the rust_capture workspace.
//!
//! The CSV backend creates one file per result table:
//!
//! | Table                  | File                          |
//! |------------------------|-------------------------------|
//! | long-form Huff rows    | `huff_results.csv`            |
//! | per-facility capture   | `capture_summary.csv`         |
//! | expansion candidates   | `expansion_candidates.csv`    |
//! | impact estimates       | `impact_estimates.csv`        |
//!
//! Backends implement [`OutputWriter`].  [`HuffOutputObserver`] implements
//! `hc_huff::HuffObserver` and streams rows while a batch runs.
//!
//! # Usage
//!
//! ```rust,ignore
//! use hc_output::{CsvWriter, HuffOutputObserver, OutputWriter};
//!
//! let mut obs = HuffOutputObserver::new(CsvWriter::new(Path::new("./output"))?);
//! batch.run(&units, &mut obs)?;
//! if let Some(e) = obs.take_error() { return Err(e.into()); }
//! let mut writer = obs.into_writer();
//! writer.write_candidates(&CandidateRow::ranked(&ranked))?;
//! writer.finish()?;
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::HuffOutputObserver;
pub use row::{CandidateRow, CaptureRow, HuffRow, ImpactRow};
pub use writer::OutputWriter;
