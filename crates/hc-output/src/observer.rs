//! `HuffOutputObserver<W>` — bridges `HuffObserver` to an `OutputWriter`.

use hc_demand::DemandUnit;
use hc_huff::{BatchOutcome, HuffObserver, HuffResult};

use crate::row::{CaptureRow, HuffRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`HuffObserver`] that streams long-form rows and the final capture table
/// to any [`OutputWriter`].
///
/// Errors from the writer are stored internally because `HuffObserver`
/// methods have no return value.  After `batch.run()` returns, check for
/// errors with [`take_error`][Self::take_error].  The writer is not finished
/// at batch end so later stages can still write their tables through
/// [`writer_mut`][Self::writer_mut] or [`into_writer`][Self::into_writer].
pub struct HuffOutputObserver<W: OutputWriter> {
    writer:     W,
    buf:        Vec<HuffRow>,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> HuffOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            buf:        Vec::new(),
            last_error: None,
        }
    }

    /// Take the stored write error (if any) after `batch.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    /// Unwrap the inner writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> HuffObserver for HuffOutputObserver<W> {
    fn wants_details(&self) -> bool {
        true
    }

    fn on_unit(&mut self, _unit: &DemandUnit, rows: &[HuffResult]) {
        // Stop producing rows once a write has failed.
        if self.last_error.is_some() {
            return;
        }
        self.buf.clear();
        self.buf.extend(rows.iter().map(HuffRow::from));
        let result = self.writer.write_huff_rows(&self.buf);
        self.store_err(result);
    }

    fn on_batch_end(&mut self, outcome: &BatchOutcome) {
        let rows: Vec<CaptureRow> = outcome.summaries.iter().map(CaptureRow::from).collect();
        let result = self.writer.write_capture_summary(&rows);
        self.store_err(result);
    }
}
