//! Unit and integration tests for hc-huff.

use hc_core::{Covariate, GeoPoint, HuffParams};
use hc_demand::{Covariates, DemandUnit, Facility, FacilityKind};

use crate::{BatchBuilder, HuffModel};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn own(id: &str, lat: f64, lng: f64, attractiveness: f64) -> Facility {
    Facility::new(id, format!("store {id}"), FacilityKind::Own, GeoPoint::new(lat, lng), attractiveness)
}

fn rival(id: &str, lat: f64, lng: f64, attractiveness: f64) -> Facility {
    Facility::new(id, format!("rival {id}"), FacilityKind::Competitor, GeoPoint::new(lat, lng), attractiveness)
}

fn unit(id: &str, lat: f64, lng: f64, potential_customers: f64) -> DemandUnit {
    DemandUnit::new(id, GeoPoint::new(lat, lng), Covariates::new(1000.0, potential_customers))
}

/// Three facilities around a 5 × 8 grid of demand units.
fn fixture() -> (Vec<Facility>, Vec<DemandUnit>) {
    let facilities = vec![
        own("A", 17.07, -96.73, 4.0),
        rival("B", 17.05, -96.71, 3.5),
        rival("C", 17.09, -96.69, 4.5),
    ];
    let units = (0..40)
        .map(|i| {
            let lat = 17.04 + 0.002 * (i % 8) as f64;
            let lng = -96.75 + 0.01 * (i / 8) as f64;
            unit(&format!("u{i:02}"), lat, lng, 1.0 + (i % 5) as f64)
        })
        .collect();
    (facilities, units)
}

fn model() -> HuffModel {
    HuffModel::new(HuffParams::default()).unwrap()
}

// ── Engine ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod engine_tests {
    use super::*;
    use crate::{HuffError, MIN_DISTANCE_KM, huff_probabilities};

    #[test]
    fn probabilities_sum_to_one() {
        let (facilities, units) = fixture();
        for u in &units {
            let scores = model().probabilities(u.centroid, &facilities).unwrap();
            let sum: f64 = scores.iter().map(|s| s.probability).sum();
            assert!((sum - 1.0).abs() < 1e-9, "unit {}: sum {sum}", u.id);
            assert!(scores.iter().all(|s| (0.0..=1.0).contains(&s.probability)));
        }
    }

    #[test]
    fn empty_facilities_give_empty_result() {
        let scores = model().probabilities(GeoPoint::new(17.06, -96.70), &[]).unwrap();
        assert!(scores.is_empty());
    }

    #[test]
    fn single_facility_takes_everything() {
        let f = [own("A", 17.07, -96.73, 4.0)];
        let scores = model().probabilities(GeoPoint::new(17.06, -96.70), &f).unwrap();
        assert_eq!(scores.len(), 1);
        assert!((scores[0].probability - 1.0).abs() < 1e-12);
    }

    #[test]
    fn more_attractive_facility_gains_share() {
        let point = GeoPoint::new(17.06, -96.70);
        let with_a = |a: f64| {
            [own("A", 17.07, -96.71, a), rival("B", 17.05, -96.69, 3.0), rival("C", 17.08, -96.68, 4.0)]
        };

        let base = model().probabilities(point, &with_a(3.0)).unwrap();
        let boosted = model().probabilities(point, &with_a(4.5)).unwrap();
        assert!(boosted[0].probability > base[0].probability);
        for j in 1..3 {
            assert!(
                boosted[j].probability < base[j].probability,
                "facility {j}: {} !< {}",
                boosted[j].probability,
                base[j].probability
            );
        }
    }

    #[test]
    fn closer_facility_gains_share() {
        let point = GeoPoint::new(17.06, -96.70);
        let far = [own("A", 17.09, -96.70, 4.0), rival("B", 17.05, -96.69, 4.0)];
        let near = [own("A", 17.07, -96.70, 4.0), rival("B", 17.05, -96.69, 4.0)];

        let p_far = model().probabilities(point, &far).unwrap()[0].probability;
        let p_near = model().probabilities(point, &near).unwrap()[0].probability;
        assert!(p_near > p_far);
    }

    #[test]
    fn colocated_facility_is_floored_not_infinite() {
        let point = GeoPoint::new(17.06, -96.70);
        let f = [own("A", 17.06, -96.70, 4.0), rival("B", 17.07, -96.70, 4.0)];
        let scores = model().probabilities(point, &f).unwrap();
        assert_eq!(scores[0].distance_km, MIN_DISTANCE_KM);
        assert!(scores[0].utility.is_finite());
        assert!(scores[0].probability > 0.999);
    }

    #[test]
    fn zero_total_utility_falls_back_to_uniform() {
        // Both facilities are > 1 km away, so d^β overflows and every utility is 0.
        let params = HuffParams::new(1.0, 1e6);
        let f = [
            own("A", 17.08, -96.70, 4.0),
            rival("B", 17.04, -96.70, 4.0),
            rival("C", 17.06, -96.67, 4.0),
        ];
        let scores = huff_probabilities(GeoPoint::new(17.06, -96.70), &f, params).unwrap();
        for s in &scores {
            assert_eq!(s.utility, 0.0);
            assert!((s.probability - 1.0 / 3.0).abs() < 1e-12);
        }
    }

    #[test]
    fn overflowing_utilities_split_evenly() {
        let params = HuffParams::new(2.0, 1.0);
        let f = [
            own("A", 17.07, -96.70, 1e300),
            rival("B", 17.05, -96.70, 1e300),
            rival("C", 17.06, -96.69, 4.0),
        ];
        let scores = huff_probabilities(GeoPoint::new(17.06, -96.70), &f, params).unwrap();
        assert_eq!(scores[0].probability, 0.5);
        assert_eq!(scores[1].probability, 0.5);
        assert_eq!(scores[2].probability, 0.0);
    }

    #[test]
    fn non_positive_exponents_rejected() {
        for (alpha, beta) in [(0.0, 3.0), (1.0, 0.0), (-1.0, 3.0), (f64::NAN, 3.0), (1.0, f64::INFINITY)] {
            let err = HuffModel::new(HuffParams::new(alpha, beta)).unwrap_err();
            assert!(matches!(err, HuffError::Core(_)), "alpha={alpha}, beta={beta}: {err}");
        }
    }

    #[test]
    fn invalid_facilities_rejected() {
        let point = GeoPoint::new(17.06, -96.70);
        let nan = [own("A", 17.07, -96.70, f64::NAN)];
        assert!(matches!(model().probabilities(point, &nan), Err(HuffError::InvalidInput(_))));

        let dup = [own("A", 17.07, -96.70, 4.0), rival("A", 17.05, -96.70, 4.0)];
        assert!(matches!(model().probabilities(point, &dup), Err(HuffError::InvalidInput(_))));

        let blank = [own(" ", 17.07, -96.70, 4.0)];
        assert!(model().probabilities(point, &blank).is_err());
    }

    #[test]
    fn invalid_demand_point_rejected() {
        let f = [own("A", 17.07, -96.70, 4.0)];
        let err = model().probabilities(GeoPoint::new(17.06, 200.0), &f).unwrap_err();
        assert!(matches!(err, HuffError::InvalidInput(_)));
    }

    #[test]
    fn probabilities_into_reuses_buffer() {
        let (facilities, units) = fixture();
        let mut buf = vec![9.0; 10];
        let ptr = buf.as_ptr();
        for u in &units[..3] {
            let degraded = model().probabilities_into(u.centroid, &facilities, &mut buf).unwrap();
            assert_eq!(degraded, 0);
            assert_eq!(buf.len(), facilities.len());
            assert_eq!(buf.as_ptr(), ptr, "buffer with spare capacity must not move");
            let expected = model().probabilities(u.centroid, &facilities).unwrap();
            for (p, s) in buf.iter().zip(&expected) {
                assert_eq!(*p, s.probability);
            }
        }
    }

    #[test]
    fn probabilities_into_handles_degenerate_utilities() {
        let point = GeoPoint::new(17.06, -96.70);
        let mut buf = Vec::new();

        let far = HuffModel::new(HuffParams::new(1.0, 1e6)).unwrap();
        far.probabilities_into(point, &[own("A", 17.07, -96.71, 4.0), rival("B", 17.05, -96.69, 3.0)], &mut buf)
            .unwrap();
        assert_eq!(buf, [0.5, 0.5]);

        let huge = [own("A", 17.07, -96.71, 1e300), rival("B", 17.05, -96.69, 1e300), rival("C", 90.0, 0.0, 3.0)];
        HuffModel::new(HuffParams::new(2.0, 3.0))
            .unwrap()
            .probabilities_into(point, &huge, &mut buf)
            .unwrap();
        assert_eq!(buf, [0.5, 0.5, 0.0]);
    }

    #[test]
    fn distance_is_symmetric_in_scores() {
        let a = GeoPoint::new(17.06, -96.70);
        let b = GeoPoint::new(17.0789, -96.7106);
        let ab = model().probabilities(a, &[own("b", b.lat, b.lng, 4.0)]).unwrap()[0].distance_km;
        let ba = model().probabilities(b, &[own("a", a.lat, a.lng, 4.0)]).unwrap()[0].distance_km;
        assert!((ab - ba).abs() < 1e-12);
    }

    #[test]
    fn unreachable_facility_gets_zero_share() {
        let point = GeoPoint::new(17.06, -96.70);
        let f = [own("A", 17.07, -96.70, 4.0), rival("B", 95.0, -96.70, 4.0)];
        let scores = model().probabilities(point, &f).unwrap();
        assert!(scores[1].distance_km.is_infinite());
        assert_eq!(scores[1].probability, 0.0);
        assert!((scores[0].probability - 1.0).abs() < 1e-12);
    }

    /// Two branches north-west of a demand point in central Oaxaca.
    /// F2 is slightly closer, which outweighs F1's higher score at β = 3.
    #[test]
    fn oaxaca_two_branch_regression() {
        let f = [
            own("F1", 17.0789, -96.7106, 4.0),
            own("F2", 17.078, -96.7107, 3.8),
        ];
        let rows = model()
            .evaluate(&unit("oax", 17.06, -96.70, 1.0), &f)
            .unwrap();

        assert!((rows[0].distance_km - 2.384_581_110).abs() < 1e-6);
        assert!((rows[1].distance_km - 2.302_103_456).abs() < 1e-6);
        assert!((rows[0].probability - 0.486_426_49).abs() < 1e-6);
        assert!((rows[1].probability - 0.513_573_51).abs() < 1e-6);
        assert_eq!(rows[1].facility_id, "F2");
        assert_eq!(rows[1].unit_id, "oax");
    }
}

// ── Batch aggregator ──────────────────────────────────────────────────────────

#[cfg(test)]
mod batch_tests {
    use super::*;
    use crate::{CancelToken, HuffError, HuffObserver, NoopObserver};

    #[test]
    fn builder_rejects_bad_settings() {
        let (facilities, _) = fixture();
        let p = HuffParams::default();
        assert!(BatchBuilder::new(facilities.clone(), p).influence_threshold(1.5).build().is_err());
        assert!(BatchBuilder::new(facilities.clone(), p).influence_threshold(-0.1).build().is_err());
        assert!(matches!(
            BatchBuilder::new(facilities.clone(), p).chunk_size(0).build(),
            Err(HuffError::Config(_))
        ));
        assert!(BatchBuilder::new(facilities.clone(), p).num_threads(0).build().is_err());
        assert!(BatchBuilder::new(facilities, HuffParams::new(0.0, 3.0)).build().is_err());
    }

    #[test]
    fn summaries_sorted_and_participation_sums_to_100() {
        let (facilities, units) = fixture();
        let batch = BatchBuilder::new(facilities, HuffParams::default()).build().unwrap();
        let outcome = batch.run(&units, &mut NoopObserver).unwrap();

        assert!(outcome.completed);
        assert_eq!(outcome.units_processed, units.len());
        assert_eq!(outcome.summaries.len(), 3);
        for pair in outcome.summaries.windows(2) {
            assert!(pair[0].captured_demand >= pair[1].captured_demand);
        }
        let pct: f64 = outcome.summaries.iter().map(|s| s.participation_pct).sum();
        assert!((pct - 100.0).abs() < 1e-9);

        // Probabilities sum to 1 per unit, so total capture equals total weight.
        let captured: f64 = outcome.summaries.iter().map(|s| s.captured_demand).sum();
        assert!((captured - outcome.total_weight).abs() < 1e-9);
    }

    #[test]
    fn equal_capture_ties_break_by_id() {
        // Mirror-image facilities around a single unit: identical capture.
        let facilities = vec![
            rival("Z", 17.07, -96.70, 4.0),
            own("M", 17.05, -96.70, 4.0),
        ];
        let units = vec![unit("u", 17.06, -96.70, 10.0)];
        let summaries = BatchBuilder::new(facilities, HuffParams::default())
            .build()
            .unwrap()
            .summarize(&units)
            .unwrap();
        assert!((summaries[0].captured_demand - summaries[1].captured_demand).abs() < 1e-9);
        assert_eq!(summaries[0].facility_id, "M");
        assert_eq!(summaries[1].facility_id, "Z");
    }

    #[test]
    fn influence_counts_units_above_threshold() {
        let facilities = vec![own("A", 17.06, -96.70, 4.0), rival("B", 17.20, -96.70, 4.0)];
        // Units hug A; B is ~15 km away and never reaches 10 %.
        let units: Vec<_> = (0..5).map(|i| unit(&format!("u{i}"), 17.06 + 0.001 * i as f64, -96.70, 1.0)).collect();
        let summaries = BatchBuilder::new(facilities, HuffParams::default())
            .build()
            .unwrap()
            .summarize(&units)
            .unwrap();

        let a = summaries.iter().find(|s| s.facility_id == "A").unwrap();
        let b = summaries.iter().find(|s| s.facility_id == "B").unwrap();
        assert_eq!(a.influence_units, 5);
        assert_eq!(b.influence_units, 0);
    }

    #[test]
    fn weight_covariate_selects_demand() {
        let (facilities, units) = fixture();
        let by_pop = BatchBuilder::new(facilities, HuffParams::default())
            .weight(Covariate::Population)
            .build()
            .unwrap()
            .run(&units, &mut NoopObserver)
            .unwrap();
        assert!((by_pop.total_weight - 1000.0 * units.len() as f64).abs() < 1e-6);
    }

    #[test]
    fn result_independent_of_chunk_size() {
        let (facilities, units) = fixture();
        let run = |chunk: usize| {
            BatchBuilder::new(facilities.clone(), HuffParams::default())
                .chunk_size(chunk)
                .build()
                .unwrap()
                .run(&units, &mut NoopObserver)
                .unwrap()
        };
        let reference = run(256);
        for chunk in [1, 3, 7, 40] {
            assert_eq!(run(chunk), reference, "chunk size {chunk}");
        }
    }

    #[test]
    fn empty_inputs_give_empty_summaries() {
        let (facilities, units) = fixture();
        let batch = BatchBuilder::new(facilities, HuffParams::default()).build().unwrap();
        let outcome = batch.run(&[], &mut NoopObserver).unwrap();
        assert!(outcome.summaries.is_empty());
        assert!(outcome.completed);

        let no_facilities = BatchBuilder::new(Vec::new(), HuffParams::default()).build().unwrap();
        let outcome = no_facilities.run(&units, &mut NoopObserver).unwrap();
        assert!(outcome.summaries.is_empty());
        assert_eq!(outcome.units_processed, units.len());
    }

    #[test]
    fn detail_rows_match_engine_across_uneven_chunks() {
        let (facilities, units) = fixture();
        let batch = BatchBuilder::new(facilities.clone(), HuffParams::default())
            .chunk_size(7)
            .build()
            .unwrap();
        let (outcome, rows) = batch.run_collect(&units).unwrap();
        assert!(outcome.completed);

        let expected: Vec<_> = units
            .iter()
            .flat_map(|u| model().evaluate(u, &facilities).unwrap())
            .collect();
        assert_eq!(rows, expected);
    }

    #[test]
    fn invalid_units_abort_before_scoring() {
        let (facilities, mut units) = fixture();
        units[3].covariates.population = -1.0;
        let batch = BatchBuilder::new(facilities, HuffParams::default()).build().unwrap();
        assert!(matches!(batch.run(&units, &mut NoopObserver), Err(HuffError::Demand(_))));
    }

    #[test]
    fn cancelled_before_start_returns_empty_partial() {
        let (facilities, units) = fixture();
        let token = CancelToken::new();
        let batch = BatchBuilder::new(facilities, HuffParams::default())
            .cancel_token(token.clone())
            .build()
            .unwrap();
        token.cancel();

        let outcome = batch.run(&units, &mut NoopObserver).unwrap();
        assert!(!outcome.completed);
        assert_eq!(outcome.units_processed, 0);
        assert!(outcome.summaries.is_empty());
    }

    /// Cancels from inside the observer once the first chunk is folded.
    struct CancelAfterFirstChunk(CancelToken);

    impl HuffObserver for CancelAfterFirstChunk {
        fn on_chunk_end(&mut self, _processed: usize, _total: usize) {
            self.0.cancel();
        }
    }

    #[test]
    fn cancelled_mid_run_keeps_prefix() {
        let (facilities, units) = fixture();
        let batch = BatchBuilder::new(facilities.clone(), HuffParams::default())
            .chunk_size(8)
            .build()
            .unwrap();
        let mut observer = CancelAfterFirstChunk(batch.cancel_token());
        let partial = batch.run(&units, &mut observer).unwrap();

        assert!(!partial.completed);
        assert_eq!(partial.units_processed, 8);
        assert_eq!(partial.units_total, units.len());

        let prefix = BatchBuilder::new(facilities, HuffParams::default())
            .build()
            .unwrap()
            .run(&units[..8], &mut NoopObserver)
            .unwrap();
        assert_eq!(partial.summaries, prefix.summaries);
    }

    #[test]
    fn unreachable_facility_counted_as_degraded() {
        let (mut facilities, units) = fixture();
        facilities.push(rival("broken", f64::NAN, -96.70, 4.0));
        let outcome = BatchBuilder::new(facilities, HuffParams::default())
            .build()
            .unwrap()
            .run(&units, &mut NoopObserver)
            .unwrap();
        assert_eq!(outcome.degraded_pairs, units.len());
        let broken = outcome.summaries.iter().find(|s| s.facility_id == "broken").unwrap();
        assert_eq!(broken.captured_demand, 0.0);
        assert_eq!(outcome.summaries.last().unwrap().facility_id, "broken");
    }

    #[test]
    fn collect_rows_emits_one_row_per_pair() {
        let (facilities, units) = fixture();
        let batch = BatchBuilder::new(facilities.clone(), HuffParams::default()).build().unwrap();
        let (outcome, rows) = batch.run_collect(&units).unwrap();
        assert_eq!(rows.len(), units.len() * facilities.len());
        assert_eq!(rows[0].unit_id, units[0].id);
        assert_eq!(rows[facilities.len()].unit_id, units[1].id);

        // Detail rows agree with the aggregate.
        let a_total: f64 = rows
            .iter()
            .filter(|r| r.facility_id == "A")
            .zip(&units)
            .map(|(r, u)| r.probability * u.covariate(Covariate::PotentialCustomers))
            .sum();
        let a = outcome.summaries.iter().find(|s| s.facility_id == "A").unwrap();
        assert!((a.captured_demand - a_total).abs() < 1e-9);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn dedicated_pool_matches_sequential_fold() {
        let (facilities, units) = fixture();
        let pooled = BatchBuilder::new(facilities.clone(), HuffParams::default())
            .num_threads(4)
            .chunk_size(5)
            .build()
            .unwrap()
            .run(&units, &mut NoopObserver)
            .unwrap();
        let single = BatchBuilder::new(facilities, HuffParams::default())
            .num_threads(1)
            .build()
            .unwrap()
            .run(&units, &mut NoopObserver)
            .unwrap();
        assert_eq!(pooled, single);
    }
}
