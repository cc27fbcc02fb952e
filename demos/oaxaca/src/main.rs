//! oaxaca — end-to-end market-capture and expansion study for a jewellery
//! chain in Oaxaca de Juárez.
//!
//! Usage: `oaxaca [CONFIG.toml] [UNITS.csv] [--output-dir DIR] [--grid-units N] [--seed S]`
//!
//! Without a units file a seeded synthetic grid stands in for the census
//! partition.  Set `RUST_LOG=info` (or `debug`) for progress logs.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use hc_core::{AnalysisConfig, ClusterConfig, Covariate};
use hc_demand::grid::OAXACA_BBOX;
use hc_demand::reference::{competitors, own_stores};
use hc_demand::{CsvDemandSource, DemandSource, DemandUnit, FixedRatings, SimulatedGrid, score_sites};
use hc_expansion::{
    ClusterProfile, ExpansionScorer, ImpactEstimator, ImpactTotals, correlations, describe, find_similar,
    fit_profiles,
};
use hc_huff::{BatchBuilder, BatchOutcome, HuffObserver, HuffResult, LogProgress};
use hc_output::{CandidateRow, CsvWriter, HuffOutputObserver, ImpactRow, OutputWriter};

#[cfg(test)]
mod tests;

// ── Constants ─────────────────────────────────────────────────────────────────

const PROGRESS_EVERY: usize = 10;

/// Competitor ratings as published by the public place directory.  "Z" has
/// none and falls back to the default attractiveness.
const COMPETITOR_RATINGS: [(&str, f64); 2] = [("X", 4.3), ("Y", 4.1)];

// ── Observer fan-out ──────────────────────────────────────────────────────────

/// Forwards every callback to a progress logger and a CSV observer.
struct Fanout<W: OutputWriter> {
    progress: LogProgress,
    output:   HuffOutputObserver<W>,
}

impl<W: OutputWriter> HuffObserver for Fanout<W> {
    fn wants_details(&self) -> bool {
        self.output.wants_details()
    }

    fn on_unit(&mut self, unit: &DemandUnit, rows: &[HuffResult]) {
        self.output.on_unit(unit, rows);
    }

    fn on_chunk_end(&mut self, processed: usize, total: usize) {
        self.progress.on_chunk_end(processed, total);
    }

    fn on_batch_end(&mut self, outcome: &BatchOutcome) {
        self.progress.on_batch_end(outcome);
        self.output.on_batch_end(outcome);
    }
}

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// analysis configuration TOML file; defaults apply when omitted
    config: Option<PathBuf>,

    /// demand-unit CSV; a seeded synthetic grid is used when omitted
    units: Option<PathBuf>,

    /// directory receiving the four result tables
    #[arg(long, default_value = "output/oaxaca")]
    output_dir: PathBuf,

    /// number of synthetic demand units when no CSV is given
    #[arg(long, default_value_t = 50)]
    grid_units: usize,

    /// seed of the synthetic grid
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::init();
    run(&Args::parse())
}

/// Customer profiles, or `None` when there are fewer units than clusters.
fn profile_units(units: &[DemandUnit], config: &ClusterConfig) -> Result<Option<ClusterProfile>> {
    if units.len() < config.k {
        log::warn!(
            "{} demand units cannot form {} customer profiles; skipping profiling and similarity search",
            units.len(),
            config.k
        );
        return Ok(None);
    }
    Ok(Some(fit_profiles(units, config)?))
}

fn run(args: &Args) -> Result<()> {
    // 1. Configuration.
    let config = match &args.config {
        Some(path) => AnalysisConfig::from_toml_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };
    config.validate().context("invalid configuration")?;

    println!("=== oaxaca — market capture and expansion study ===");
    println!(
        "alpha = {}  |  beta = {}  |  weight = {}",
        config.huff.alpha, config.huff.beta, config.batch.weight
    );
    println!();

    // 2. Demand partition.
    let units = match &args.units {
        Some(path) => CsvDemandSource::new(path.clone()).demand_units()?,
        None => SimulatedGrid::new(args.grid_units, args.seed).demand_units()?,
    };
    let outside = units.iter().filter(|u| !OAXACA_BBOX.contains(u.centroid)).count();
    if outside > 0 {
        log::warn!("{outside} demand units lie outside the Oaxaca study area");
    }
    println!("Demand units: {}", units.len());

    // 3. Facilities: own branches carry in-house scores, competitors are rated.
    let ratings = FixedRatings::new(COMPETITOR_RATINGS);
    let mut facilities = own_stores();
    facilities.extend(score_sites(&ratings, competitors()));
    println!("Facilities:   {}", facilities.len());
    println!();

    // 4. Huff batch, streamed to CSV.
    let output_dir = args.output_dir.as_path();
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("creating {}", output_dir.display()))?;
    let writer = CsvWriter::new(output_dir)?;
    let mut obs = Fanout {
        progress: LogProgress::new(PROGRESS_EVERY),
        output:   HuffOutputObserver::new(writer),
    };
    let batch = BatchBuilder::new(facilities, config.huff)
        .with_config(&config.batch)
        .build()?;

    let t0 = Instant::now();
    let outcome = batch.run(&units, &mut obs)?;
    let elapsed = t0.elapsed();
    if let Some(e) = obs.output.take_error() {
        return Err(e).context("writing Huff results");
    }

    println!(
        "Huff model: {} units × {} facilities in {:.3} s",
        outcome.units_processed,
        batch.facilities().len(),
        elapsed.as_secs_f64()
    );
    println!();
    println!("{:<4} {:<22} {:<11} {:>12} {:>8} {:>10}", "Id", "Name", "Kind", "Captured", "Share %", "Influence");
    println!("{}", "-".repeat(72));
    for s in &outcome.summaries {
        println!(
            "{:<4} {:<22} {:<11} {:>12.2} {:>8.2} {:>10}",
            s.facility_id, s.name, s.kind.as_str(), s.captured_demand, s.participation_pct, s.influence_units
        );
    }
    println!();

    // 5. Customer profiles.
    let profile = profile_units(&units, &config.cluster)?;
    if let Some(profile) = &profile {
        println!("Customer profiles (k = {}, inertia {:.2})", profile.k(), profile.inertia);
        for c in &profile.summary {
            let means: Vec<String> = c.feature_means.iter().map(|m| format!("{m:.2}")).collect();
            println!("  cluster {}: {:>3} units ({:>5.1} %)  means [{}]", c.cluster, c.units, c.share_pct, means.join(", "));
        }
        println!();
    }

    // 6. Expansion candidates and their impact.
    let ranked = ExpansionScorer::new(config.scoring.clone())?.rank(&units, profile.as_ref())?;
    let impacts = ImpactEstimator::new(config.impact.clone())?.estimate(&ranked);
    let totals = ImpactTotals::from_estimates(&impacts);

    println!("{:<4} {:<12} {:>7} {:>8} {:>14} {:>9}", "Rank", "Unit", "Score", "Cluster", "Revenue", "ROI %");
    println!("{}", "-".repeat(60));
    for (i, c) in ranked.iter().enumerate() {
        let (revenue, roi) = impacts
            .iter()
            .find(|e| e.unit_id == c.unit_id)
            .map_or((0.0, 0.0), |e| (e.annual_revenue, e.roi_pct));
        let cluster = c.cluster.map_or_else(|| "-".to_owned(), |k| k.to_string());
        println!("{:<4} {:<12} {:>7.3} {:>8} {:>14.0} {:>9.1}", i + 1, c.unit_id, c.score, cluster, revenue, roi);
    }
    println!(
        "Total: {:.0} captured customers, {:.0} annual revenue, mean ROI {:.1} %, best {}",
        totals.captured_customers,
        totals.annual_revenue,
        totals.mean_roi_pct,
        totals.best_unit.as_deref().unwrap_or("-")
    );
    println!();

    // 7. Locations resembling the flagship branch.
    if let Some(profile) = &profile {
        let flagship = own_stores()
            .into_iter()
            .next()
            .context("no own store configured")?;
        let similar = find_similar(&units, profile, flagship.location, &config.similarity)?;
        println!("Similar to {} ({}): {} locations", flagship.name, flagship.location, similar.len());
        for s in similar.iter().take(10) {
            println!("  {:<12} similarity {:.3}  {:>6.2} km", s.unit_id, s.similarity, s.distance_km);
        }
        println!();
    }

    // 8. Covariate statistics.
    let pairs = correlations(&units, &Covariate::SEGMENTS, &config.stats);
    if pairs.is_empty() {
        println!("No covariate pairs with |r| > {}", config.stats.correlation_threshold);
    }
    for p in &pairs {
        println!("  r({}, {}) = {:.3}", p.a, p.b, p.r);
    }
    for s in describe(&units, &Covariate::ALL) {
        println!(
            "  {:<24} mean {:>8.2}  median {:>8.2}  p90 {:>8.2}  zeros {}",
            s.covariate.as_str(),
            s.mean,
            s.percentiles[2],
            s.percentiles[4],
            s.zeros
        );
    }
    println!();

    // 9. Remaining tables.
    let mut writer = obs.output.into_writer();
    writer.write_candidates(&CandidateRow::ranked(&ranked))?;
    let impact_rows: Vec<ImpactRow> = impacts.iter().map(ImpactRow::from).collect();
    writer.write_impacts(&impact_rows)?;
    writer.finish()?;
    println!("Results written to {}/", output_dir.display());

    Ok(())
}
