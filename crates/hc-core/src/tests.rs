//! Unit tests for hc-core primitives.

#[cfg(test)]
mod geo {
    use crate::{BoundingBox, GeoPoint};

    #[test]
    fn zero_distance() {
        let p = GeoPoint::new(17.0594, -96.7216);
        assert_eq!(p.distance_km(p), 0.0);
    }

    #[test]
    fn one_degree_of_latitude() {
        // ~1 degree of latitude ≈ 111.2 km on the mean sphere
        let a = GeoPoint::new(30.0, -88.0);
        let b = GeoPoint::new(31.0, -88.0);
        let d = a.distance_km(b);
        assert!((d - 111.195).abs() < 0.01, "got {d}");
    }

    #[test]
    fn symmetric() {
        let a = GeoPoint::new(17.06, -96.70);
        let b = GeoPoint::new(17.0789, -96.7106);
        assert!((a.distance_km(b) - b.distance_km(a)).abs() < 1e-12);
    }

    #[test]
    fn oaxaca_pair_distance() {
        let a = GeoPoint::new(17.06, -96.70);
        let b = GeoPoint::new(17.0789, -96.7106);
        let d = a.distance_km(b);
        assert!((d - 2.384_581).abs() < 1e-5, "got {d}");
    }

    #[test]
    fn invalid_points_are_infinitely_far() {
        let ok = GeoPoint::new(17.0, -96.0);
        assert_eq!(ok.distance_km(GeoPoint::new(f64::NAN, -96.0)), f64::INFINITY);
        assert_eq!(ok.distance_km(GeoPoint::new(91.0, -96.0)), f64::INFINITY);
        assert_eq!(GeoPoint::new(0.0, 181.0).distance_km(ok), f64::INFINITY);
    }

    #[test]
    fn try_distance_names_bad_point() {
        let ok = GeoPoint::new(17.0, -96.0);
        let bad = GeoPoint::new(17.0, f64::INFINITY);
        let err = ok.try_distance_km(bad).unwrap_err();
        assert_eq!(err.point.lat, 17.0);
        assert!(err.point.lng.is_infinite());
    }

    #[test]
    fn antipodal_is_half_circumference() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 180.0);
        let d = a.distance_km(b);
        assert!((d - std::f64::consts::PI * crate::geo::EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn bbox_contains_is_inclusive() {
        let bbox = BoundingBox { min_lat: 17.04, max_lat: 17.11, min_lng: -96.75, max_lng: -96.69 };
        assert!(bbox.contains(GeoPoint::new(17.06, -96.72)));
        assert!(bbox.contains(GeoPoint::new(17.04, -96.69)));
        assert!(!bbox.contains(GeoPoint::new(17.2, -96.7)));
        assert!(!bbox.contains(GeoPoint::new(17.06, f64::NAN)));
    }
}

#[cfg(test)]
mod config {
    use crate::{AnalysisConfig, Covariate, HuffParams, ScoreWeights};

    #[test]
    fn defaults_validate() {
        let cfg = AnalysisConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.huff, HuffParams { alpha: 1.0, beta: 3.0 });
        assert_eq!(cfg.batch.influence_threshold, 0.1);
        assert_eq!(cfg.impact.fixed_cost, 500_000.0);
        assert_eq!(cfg.similarity.similarity_threshold, 0.7);
        assert!((cfg.scoring.weights.total() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn partial_toml_overrides() {
        let cfg = AnalysisConfig::from_toml_str(
            r#"
            [huff]
            alpha = 1.5

            [scoring]
            min_population = 300
            top_n = 20

            [scoring.weights]
            potential_customers = 1.0
            "#,
        )
        .unwrap();
        assert_eq!(cfg.huff.alpha, 1.5);
        assert_eq!(cfg.huff.beta, 3.0);
        assert_eq!(cfg.scoring.min_population, 300.0);
        assert_eq!(cfg.scoring.top_n, 20);
        assert_eq!(cfg.scoring.weights, ScoreWeights::single(Covariate::PotentialCustomers));
    }

    #[test]
    fn out_of_domain_values_rejected() {
        assert!(AnalysisConfig::from_toml_str("[huff]\nalpha = 0.0").is_err());
        assert!(AnalysisConfig::from_toml_str("[huff]\nbeta = 5.5").is_err());
        assert!(AnalysisConfig::from_toml_str("[impact]\ncapture_rate = 1.5").is_err());
        assert!(AnalysisConfig::from_toml_str("[cluster]\nk = 9").is_err());
    }

    #[test]
    fn unknown_keys_rejected() {
        assert!(AnalysisConfig::from_toml_str("[huff]\ngamma = 2.0").is_err());
    }

    #[test]
    fn weights_over_one_rejected() {
        let mut w = ScoreWeights::default();
        w.0.insert(Covariate::Population, 0.5);
        assert!(w.check().is_err());

        let mut neg = ScoreWeights::single(Covariate::Population);
        neg.0.insert(Covariate::YoungDigital, -0.1);
        assert!(neg.check().is_err());
    }

    #[test]
    fn engine_check_is_looser_than_validate() {
        let p = HuffParams::new(4.0, 3.0);
        p.check().unwrap();
        assert!(p.validate().is_err());
        assert!(HuffParams::new(1.0, f64::NAN).check().is_err());
    }
}

#[cfg(test)]
mod rng {
    use crate::SeededRng;

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = SeededRng::new(12345);
        let mut r2 = SeededRng::new(12345);
        for _ in 0..100 {
            let a: f64 = r1.gen_range(0.0..1.0);
            let b: f64 = r2.gen_range(0.0..1.0);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn streams_differ() {
        let mut s0 = SeededRng::stream(1, 0);
        let mut s1 = SeededRng::stream(1, 1);
        let a: u64 = s0.gen_range(0..u64::MAX);
        let b: u64 = s1.gen_range(0..u64::MAX);
        assert_ne!(a, b, "adjacent streams should diverge");
    }

    #[test]
    fn weighted_index_skips_zero_weights() {
        let mut rng = SeededRng::new(7);
        for _ in 0..200 {
            let i = rng.weighted_index(&[0.0, 2.0, 0.0, 1.0]).unwrap();
            assert!(i == 1 || i == 3);
        }
        assert_eq!(rng.weighted_index(&[0.0, 0.0]), None);
        assert_eq!(rng.weighted_index(&[]), None);
    }
}
