//! Batch observer trait for detail rows and progress reporting.

use hc_demand::DemandUnit;

use crate::{BatchOutcome, HuffResult};

/// Callbacks invoked by [`BatchAggregator::run`][crate::BatchAggregator::run].
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.  Callbacks run on the calling thread, in
/// demand-unit order, even when the `parallel` feature evaluates units on a
/// thread pool.
///
/// # Example — count rows without keeping them
///
/// ```rust,ignore
/// struct RowCounter(usize);
///
/// impl HuffObserver for RowCounter {
///     fn wants_details(&self) -> bool { true }
///     fn on_unit(&mut self, _unit: &DemandUnit, rows: &[HuffResult]) {
///         self.0 += rows.len();
///     }
/// }
/// ```
pub trait HuffObserver {
    /// Return `true` to receive long-form rows through [`on_unit`][Self::on_unit].
    ///
    /// Rows are only materialised when requested.
    fn wants_details(&self) -> bool {
        false
    }

    /// Called once per processed demand unit with one row per facility.
    fn on_unit(&mut self, _unit: &DemandUnit, _rows: &[HuffResult]) {}

    /// Called after each chunk is folded into the running totals.
    fn on_chunk_end(&mut self, _processed: usize, _total: usize) {}

    /// Called once with the final (possibly partial) outcome.
    fn on_batch_end(&mut self, _outcome: &BatchOutcome) {}
}

/// A [`HuffObserver`] that does nothing.
pub struct NoopObserver;

impl HuffObserver for NoopObserver {}

/// Keeps every detail row in memory.
#[derive(Debug, Default)]
pub struct CollectRows {
    pub rows: Vec<HuffResult>,
}

impl HuffObserver for CollectRows {
    fn wants_details(&self) -> bool {
        true
    }

    fn on_unit(&mut self, _unit: &DemandUnit, rows: &[HuffResult]) {
        self.rows.extend_from_slice(rows);
    }
}

/// Logs progress at `info` level every `interval` units.
pub struct LogProgress {
    interval:    usize,
    next_report: usize,
}

impl LogProgress {
    pub fn new(interval: usize) -> Self {
        let interval = interval.max(1);
        Self { interval, next_report: interval }
    }
}

impl HuffObserver for LogProgress {
    fn on_chunk_end(&mut self, processed: usize, total: usize) {
        if processed >= self.next_report {
            log::info!("huff batch: {processed}/{total} demand units");
            while self.next_report <= processed {
                self.next_report += self.interval;
            }
        }
    }

    fn on_batch_end(&mut self, outcome: &BatchOutcome) {
        log::info!(
            "huff batch finished: {}/{} units, {} facilities, complete={}",
            outcome.units_processed,
            outcome.units_total,
            outcome.summaries.len(),
            outcome.completed
        );
    }
}
