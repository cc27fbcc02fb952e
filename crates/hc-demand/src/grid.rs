//! Seeded synthetic demand grid.
//!
//! Used when no real partition is available (demos, tests, benchmarks).  The
//! covariate distributions follow the shape of the real Oaxaca grid: raw
//! population between 100 and 1 000 per cell, segment counts up to 500 and
//! potential customers up to 2 000, the latter `log1p`-transformed like the
//! real data provider does.

use hc_core::{BoundingBox, GeoPoint, SeededRng};

use crate::{Covariates, DemandResult, DemandSource, DemandUnit};

/// Oaxaca metropolitan area, the default extent.
pub const OAXACA_BBOX: BoundingBox = BoundingBox {
    min_lat: 17.04,
    max_lat: 17.11,
    min_lng: -96.75,
    max_lng: -96.69,
};

const MUNICIPALITIES: [&str; 2] = ["Oaxaca de Juárez", "Santa Cruz Xoxocotlán"];
const LOCALITIES: [&str; 3] = ["Centro", "Reforma", "Xoxocotlán"];

/// A reproducible random partition of `count` demand units inside `bbox`.
#[derive(Clone, Debug)]
pub struct SimulatedGrid {
    pub count: usize,
    pub bbox:  BoundingBox,
    pub seed:  u64,
}

impl Default for SimulatedGrid {
    fn default() -> Self {
        Self { count: 50, bbox: OAXACA_BBOX, seed: 42 }
    }
}

impl SimulatedGrid {
    pub fn new(count: usize, seed: u64) -> Self {
        Self { count, seed, ..Self::default() }
    }

    /// Generate the units.  Ids are `sim_hex_1 ..= sim_hex_{count}`.
    pub fn generate(&self) -> Vec<DemandUnit> {
        let mut rng = SeededRng::new(self.seed);
        let b = self.bbox;

        (0..self.count)
            .map(|i| {
                let centroid = GeoPoint::new(
                    rng.gen_range(b.min_lat..=b.max_lat),
                    rng.gen_range(b.min_lng..=b.max_lng),
                );
                let population = rng.gen_range(100u32..1_000) as f64;
                let young = (rng.gen_range(0u32..500) as f64).ln_1p();
                let mothers = (rng.gen_range(0u32..500) as f64).ln_1p();
                let wholesalers = (rng.gen_range(0u32..500) as f64).ln_1p();
                let customers = (rng.gen_range(0u32..2_000) as f64).ln_1p();

                let municipality = MUNICIPALITIES[rng.gen_range(0..MUNICIPALITIES.len())];
                let locality = LOCALITIES[rng.gen_range(0..LOCALITIES.len())];

                DemandUnit::new(
                    format!("sim_hex_{}", i + 1),
                    centroid,
                    Covariates::new(population, customers).with_segments(young, mothers, wholesalers),
                )
                .with_area(municipality, locality)
            })
            .collect()
    }
}

impl DemandSource for SimulatedGrid {
    fn demand_units(&self) -> DemandResult<Vec<DemandUnit>> {
        Ok(self.generate())
    }
}
