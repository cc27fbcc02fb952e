//! The batch aggregator: the Huff engine over a whole demand partition.
//!
//! # Chunked evaluation
//!
//! ```text
//! for chunk in units.chunks(chunk_size):
//!   ① Score   — engine per unit (parallel with the `parallel` feature);
//!               each unit writes its own slice of the chunk buffer.
//!   ② Fold    — in unit order: accumulate p × weight and influence counts,
//!               stream detail rows to the observer if it asked for them.
//! finally:
//!   ③ Summarise — participation shares, then sort by captured demand.
//! ```
//!
//! Folding in unit order makes the floating-point sums, and therefore the
//! output, identical regardless of thread count or chunk size.  The chunk
//! buffer holds `chunk_size × facilities` scores and is allocated once per run.
//!
//! # Cancellation
//!
//! The [`CancelToken`] is checked before each unit.  Once cancelled, the
//! aggregator stops at the first unevaluated unit and returns the totals of
//! every unit before it as a valid partial [`BatchOutcome`] with
//! `completed == false`.

use hc_core::Covariate;
use hc_demand::{DemandUnit, Facility, validate_units};

use crate::capture::CaptureAccumulator;
use crate::observer::{CollectRows, NoopObserver};
use crate::{CancelToken, CaptureSummary, EngineResult, HuffModel, HuffObserver, HuffResult, PairScore};

// ── BatchOutcome ──────────────────────────────────────────────────────────────

/// Result of one batch run.
#[derive(Clone, Debug, PartialEq)]
pub struct BatchOutcome {
    /// One row per facility, captured demand descending.  Empty when no unit
    /// was processed or no facility was given.
    pub summaries:       Vec<CaptureSummary>,
    pub units_processed: usize,
    pub units_total:     usize,
    /// `false` when the run was cancelled before the last unit.
    pub completed:       bool,
    /// (unit, facility) pairs whose distance could not be computed.
    pub degraded_pairs:  usize,
    /// Σ of the weights of processed units.
    pub total_weight:    f64,
}

// ── Per-unit scoring ──────────────────────────────────────────────────────────

/// Scores of one chunk, reused from chunk to chunk within a run.
struct ChunkBuffer {
    /// Row-major: unit `i` owns `scores[i * n .. (i + 1) * n]`.
    scores: Vec<PairScore>,
    /// Degraded-pair count per unit; `None` for units skipped after
    /// cancellation.
    status: Vec<Option<usize>>,
    n:      usize,
}

impl ChunkBuffer {
    fn new(chunk_size: usize, n_facilities: usize) -> Self {
        Self {
            scores: Vec::with_capacity(chunk_size * n_facilities),
            status: Vec::with_capacity(chunk_size),
            n:      n_facilities,
        }
    }

    fn reset(&mut self, units: usize) {
        self.scores.clear();
        self.scores.resize(units * self.n, PairScore::default());
        self.status.clear();
        self.status.resize(units, None);
    }

    #[inline]
    fn unit(&self, i: usize) -> &[PairScore] {
        &self.scores[i * self.n..(i + 1) * self.n]
    }
}

fn score_unit(
    model:      &HuffModel,
    facilities: &[Facility],
    cancel:     &CancelToken,
    unit:       &DemandUnit,
    out:        &mut [PairScore],
) -> Option<usize> {
    if cancel.is_cancelled() {
        return None;
    }
    Some(model.score_slice(unit.centroid, facilities, out))
}

// ── BatchAggregator ───────────────────────────────────────────────────────────

/// Runs the Huff engine once per demand unit against a fixed facility set.
///
/// Create via [`BatchBuilder`][crate::BatchBuilder].
pub struct BatchAggregator {
    pub(crate) model:               HuffModel,
    pub(crate) facilities:          Vec<Facility>,
    pub(crate) influence_threshold: f64,
    pub(crate) chunk_size:          usize,
    pub(crate) weight:              Covariate,
    pub(crate) cancel:              CancelToken,
    #[cfg(feature = "parallel")]
    pub(crate) pool:                Option<rayon::ThreadPool>,
}

impl BatchAggregator {
    // ── Public API ────────────────────────────────────────────────────────

    pub fn facilities(&self) -> &[Facility] {
        &self.facilities
    }

    pub fn model(&self) -> &HuffModel {
        &self.model
    }

    /// A handle that cancels runs of this aggregator.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Evaluate every unit and aggregate per-facility capture.
    ///
    /// Units are validated first (non-empty unique ids, valid centroids,
    /// finite non-negative covariates); nothing is computed on failure.
    pub fn run<O: HuffObserver>(&self, units: &[DemandUnit], observer: &mut O) -> EngineResult<BatchOutcome> {
        validate_units(units)?;

        let total = units.len();
        let details = observer.wants_details();
        let mut acc = CaptureAccumulator::new(self.facilities.len(), self.influence_threshold);
        let mut degraded_pairs = 0;
        let mut rows: Vec<HuffResult> = Vec::new();
        let mut buf = ChunkBuffer::new(self.chunk_size.min(total), self.facilities.len());

        'chunks: for chunk in units.chunks(self.chunk_size) {
            self.score_chunk(chunk, &mut buf);

            for (i, unit) in chunk.iter().enumerate() {
                let Some(degraded) = buf.status[i] else {
                    break 'chunks;
                };
                let scores = buf.unit(i);
                acc.add_unit(unit.covariate(self.weight), scores);
                degraded_pairs += degraded;

                if details {
                    rows.clear();
                    rows.extend(
                        self.facilities
                            .iter()
                            .zip(scores)
                            .map(|(f, &s)| HuffResult::new(unit, f, s)),
                    );
                    observer.on_unit(unit, &rows);
                }
            }

            observer.on_chunk_end(acc.units, total);
        }

        let units_processed = acc.units;
        let completed = units_processed == total;
        if !completed {
            log::warn!("huff batch cancelled after {units_processed}/{total} demand units; returning partial totals");
        }
        if degraded_pairs > 0 {
            log::warn!("huff batch: {degraded_pairs} unit/facility pairs had no computable distance");
        }

        let total_weight = acc.weight;
        let summaries = if units_processed == 0 {
            Vec::new()
        } else {
            acc.into_summaries(&self.facilities)
        };

        let outcome = BatchOutcome {
            summaries,
            units_processed,
            units_total: total,
            completed,
            degraded_pairs,
            total_weight,
        };
        observer.on_batch_end(&outcome);
        Ok(outcome)
    }

    /// [`run`][Self::run] without an observer; returns only the summaries.
    pub fn summarize(&self, units: &[DemandUnit]) -> EngineResult<Vec<CaptureSummary>> {
        Ok(self.run(units, &mut NoopObserver)?.summaries)
    }

    /// [`run`][Self::run] keeping every long-form row in memory.
    pub fn run_collect(&self, units: &[DemandUnit]) -> EngineResult<(BatchOutcome, Vec<HuffResult>)> {
        let mut collector = CollectRows::default();
        let outcome = self.run(units, &mut collector)?;
        Ok((outcome, collector.rows))
    }

    // ── Chunk scoring ─────────────────────────────────────────────────────

    /// Score one chunk into `buf`.  Units skipped after cancellation keep a
    /// `None` status.
    fn score_chunk(&self, chunk: &[DemandUnit], buf: &mut ChunkBuffer) {
        buf.reset(chunk.len());
        // Explicit field borrows so the closures capture only shared refs.
        let model      = &self.model;
        let facilities = self.facilities.as_slice();
        let cancel     = &self.cancel;
        let n          = buf.n;
        let ChunkBuffer { scores, status, .. } = buf;

        if n == 0 {
            for s in status.iter_mut() {
                *s = (!cancel.is_cancelled()).then_some(0);
            }
            return;
        }

        #[cfg(not(feature = "parallel"))]
        {
            for ((out, s), unit) in scores.chunks_mut(n).zip(status.iter_mut()).zip(chunk) {
                *s = score_unit(model, facilities, cancel, unit, out);
            }
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            let work = || {
                scores
                    .par_chunks_mut(n)
                    .zip(status.par_iter_mut())
                    .zip(chunk.par_iter())
                    .for_each(|((out, s), unit)| *s = score_unit(model, facilities, cancel, unit, out));
            };
            match &self.pool {
                Some(pool) => pool.install(work),
                None       => work(),
            }
        }
    }
}
