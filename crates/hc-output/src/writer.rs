//! The `OutputWriter` trait implemented by all backend writers.

use crate::{CandidateRow, CaptureRow, HuffRow, ImpactRow, OutputResult};

/// One sink per result table.
///
/// Writers may be fed incrementally: long-form Huff rows arrive one demand
/// unit at a time while a batch is running, the other tables once each.
pub trait OutputWriter {
    /// Append long-form (demand unit, facility) rows.
    fn write_huff_rows(&mut self, rows: &[HuffRow]) -> OutputResult<()>;

    /// Write the per-facility capture table.
    fn write_capture_summary(&mut self, rows: &[CaptureRow]) -> OutputResult<()>;

    /// Write the ranked expansion candidates.
    fn write_candidates(&mut self, rows: &[CandidateRow]) -> OutputResult<()>;

    /// Write the impact estimates.
    fn write_impacts(&mut self, rows: &[ImpactRow]) -> OutputResult<()>;

    /// Flush all underlying file handles.
    ///
    /// Idempotent: later calls are no-ops.
    fn finish(&mut self) -> OutputResult<()>;
}
