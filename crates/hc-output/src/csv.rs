//! CSV output backend.
//!
//! Creates four files in the configured output directory:
//! - `huff_results.csv`
//! - `capture_summary.csv`
//! - `expansion_candidates.csv`
//! - `impact_estimates.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{CandidateRow, CaptureRow, HuffRow, ImpactRow, OutputResult};

pub const HUFF_RESULTS_FILE: &str = "huff_results.csv";
pub const CAPTURE_SUMMARY_FILE: &str = "capture_summary.csv";
pub const CANDIDATES_FILE: &str = "expansion_candidates.csv";
pub const IMPACTS_FILE: &str = "impact_estimates.csv";

/// Writes analysis output to four CSV files.
pub struct CsvWriter {
    huff:       Writer<File>,
    capture:    Writer<File>,
    candidates: Writer<File>,
    impacts:    Writer<File>,
    finished:   bool,
}

fn opt(v: Option<impl ToString>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

impl CsvWriter {
    /// Open (or create) the four CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut huff = Writer::from_path(dir.join(HUFF_RESULTS_FILE))?;
        huff.write_record(["unit_id", "facility_id", "facility_kind", "distance_km", "utility", "probability"])?;

        let mut capture = Writer::from_path(dir.join(CAPTURE_SUMMARY_FILE))?;
        capture.write_record([
            "facility_id",
            "name",
            "kind",
            "captured_demand",
            "participation_pct",
            "influence_units",
        ])?;

        let mut candidates = Writer::from_path(dir.join(CANDIDATES_FILE))?;
        candidates.write_record([
            "rank",
            "unit_id",
            "lat",
            "lng",
            "score",
            "cluster",
            "population",
            "potential_customers",
            "young_digital",
            "entrepreneur_mothers",
            "experienced_wholesalers",
        ])?;

        let mut impacts = Writer::from_path(dir.join(IMPACTS_FILE))?;
        impacts.write_record([
            "unit_id",
            "score",
            "potential_customers",
            "captured_customers",
            "annual_revenue",
            "roi_pct",
        ])?;

        Ok(Self {
            huff,
            capture,
            candidates,
            impacts,
            finished: false,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_huff_rows(&mut self, rows: &[HuffRow]) -> OutputResult<()> {
        for row in rows {
            self.huff.write_record(&[
                row.unit_id.clone(),
                row.facility_id.clone(),
                row.facility_kind.to_owned(),
                row.distance_km.to_string(),
                row.utility.to_string(),
                row.probability.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_capture_summary(&mut self, rows: &[CaptureRow]) -> OutputResult<()> {
        for row in rows {
            self.capture.write_record(&[
                row.facility_id.clone(),
                row.name.clone(),
                row.kind.to_owned(),
                row.captured_demand.to_string(),
                row.participation_pct.to_string(),
                row.influence_units.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_candidates(&mut self, rows: &[CandidateRow]) -> OutputResult<()> {
        for row in rows {
            self.candidates.write_record(&[
                row.rank.to_string(),
                row.unit_id.clone(),
                row.lat.to_string(),
                row.lng.to_string(),
                row.score.to_string(),
                opt(row.cluster),
                row.population.to_string(),
                row.potential_customers.to_string(),
                opt(row.young_digital),
                opt(row.entrepreneur_mothers),
                opt(row.experienced_wholesalers),
            ])?;
        }
        Ok(())
    }

    fn write_impacts(&mut self, rows: &[ImpactRow]) -> OutputResult<()> {
        for row in rows {
            self.impacts.write_record(&[
                row.unit_id.clone(),
                row.score.to_string(),
                row.potential_customers.to_string(),
                row.captured_customers.to_string(),
                row.annual_revenue.to_string(),
                row.roi_pct.to_string(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.huff.flush()?;
        self.capture.flush()?;
        self.candidates.flush()?;
        self.impacts.flush()?;
        Ok(())
    }
}
