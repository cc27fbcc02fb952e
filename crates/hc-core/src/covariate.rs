//! Names of the demographic covariates carried by every demand unit.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One numeric column of the demand-unit schema.
///
/// `Population` is a raw head count.  The remaining covariates are stored
/// `log1p`-transformed by the geographic data provider.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Covariate {
    Population,
    PotentialCustomers,
    YoungDigital,
    EntrepreneurMothers,
    ExperiencedWholesalers,
}

impl Covariate {
    pub const ALL: [Covariate; 5] = [
        Covariate::Population,
        Covariate::PotentialCustomers,
        Covariate::YoungDigital,
        Covariate::EntrepreneurMothers,
        Covariate::ExperiencedWholesalers,
    ];

    /// Customer-segment features used for profile clustering.
    pub const SEGMENTS: [Covariate; 4] = [
        Covariate::YoungDigital,
        Covariate::EntrepreneurMothers,
        Covariate::ExperiencedWholesalers,
        Covariate::PotentialCustomers,
    ];

    /// Column name used in CSV headers and output tables.
    pub fn as_str(self) -> &'static str {
        match self {
            Covariate::Population             => "population",
            Covariate::PotentialCustomers     => "potential_customers",
            Covariate::YoungDigital           => "young_digital",
            Covariate::EntrepreneurMothers    => "entrepreneur_mothers",
            Covariate::ExperiencedWholesalers => "experienced_wholesalers",
        }
    }
}

impl fmt::Display for Covariate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
