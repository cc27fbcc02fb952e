//! Find demand units whose customer profile resembles a reference location.

use std::cmp::Ordering;

use serde::Serialize;

use hc_core::{GeoPoint, SimilarityConfig};
use hc_demand::DemandUnit;

use crate::{ClusterProfile, ExpansionError, ExpansionResult};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SimilarLocation {
    pub unit_id:     String,
    /// Cosine similarity of standardised features with the reference unit.
    pub similarity:  f64,
    /// Geodesic distance from the reference point.
    pub distance_km: f64,
    pub cluster:     Option<usize>,
}

/// Units resembling the one nearest to `reference`.
///
/// The demand unit closest to `reference` supplies the reference profile.
/// A unit is kept when its similarity is above `similarity_threshold` and it
/// lies farther than `min_distance_km` from `reference`.  Results are sorted
/// by similarity descending, ties by unit id.
pub fn find_similar(
    units:     &[DemandUnit],
    profile:   &ClusterProfile,
    reference: GeoPoint,
    config:    &SimilarityConfig,
) -> ExpansionResult<Vec<SimilarLocation>> {
    config.validate()?;
    if !reference.is_valid() {
        return Err(ExpansionError::InvalidInput(format!("invalid reference point {reference}")));
    }

    let distances: Vec<f64> = units.iter().map(|u| reference.distance_km(u.centroid)).collect();
    let Some(anchor) = nearest_unit(units, &distances) else {
        return Ok(Vec::new());
    };
    log::debug!(
        "similarity reference: unit {:?} at {:.3} km from {reference}",
        units[anchor].id,
        distances[anchor]
    );
    let target = profile.scaled(&units[anchor]);

    let mut found: Vec<SimilarLocation> = units
        .iter()
        .zip(&distances)
        .filter(|&(_, &d)| d > config.min_distance_km)
        .map(|(u, &distance_km)| SimilarLocation {
            unit_id: u.id.clone(),
            similarity: cosine(&target, &profile.scaled(u)),
            distance_km,
            cluster: profile.label_of(&u.id),
        })
        .filter(|s| s.similarity > config.similarity_threshold)
        .collect();

    found.sort_by(|a, b| match b.similarity.total_cmp(&a.similarity) {
        Ordering::Equal => a.unit_id.cmp(&b.unit_id),
        other => other,
    });
    Ok(found)
}

/// Index of the unit with the smallest finite distance; ties by id.
fn nearest_unit(units: &[DemandUnit], distances: &[f64]) -> Option<usize> {
    (0..units.len())
        .filter(|&i| distances[i].is_finite())
        .min_by(|&a, &b| match distances[a].total_cmp(&distances[b]) {
            Ordering::Equal => units[a].id.cmp(&units[b].id),
            other => other,
        })
}

/// Cosine similarity; 0 when either vector has zero norm.
pub fn cosine(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let nb = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if na == 0.0 || nb == 0.0 {
        0.0
    } else {
        dot / (na * nb)
    }
}
