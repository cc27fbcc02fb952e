//! Unit tests for hc-demand.

#[cfg(test)]
mod unit_tests {
    use hc_core::{Covariate, GeoPoint};

    use crate::{Covariates, DemandUnit, validate_units};

    fn unit(id: &str) -> DemandUnit {
        DemandUnit::new(id, GeoPoint::new(17.06, -96.72), Covariates::new(500.0, 4.0))
    }

    #[test]
    fn missing_segments_read_as_zero() {
        let u = unit("a");
        assert_eq!(u.covariate(Covariate::YoungDigital), 0.0);
        assert_eq!(u.covariate(Covariate::PotentialCustomers), 4.0);
        assert_eq!(u.covariate(Covariate::Population), 500.0);
    }

    #[test]
    fn segments_round_trip_through_get() {
        let c = Covariates::new(1.0, 2.0).with_segments(3.0, 4.0, 5.0);
        assert_eq!(c.get(Covariate::YoungDigital), 3.0);
        assert_eq!(c.get(Covariate::EntrepreneurMothers), 4.0);
        assert_eq!(c.get(Covariate::ExperiencedWholesalers), 5.0);
    }

    #[test]
    fn duplicate_ids_rejected() {
        assert!(validate_units(&[unit("a"), unit("b")]).is_ok());
        assert!(validate_units(&[unit("a"), unit("a")]).is_err());
    }

    #[test]
    fn invalid_records_rejected() {
        let mut bad_centroid = unit("a");
        bad_centroid.centroid = GeoPoint::new(95.0, 0.0);
        assert!(bad_centroid.validate().is_err());

        let mut negative = unit("b");
        negative.covariates.young_digital = Some(-1.0);
        assert!(negative.validate().is_err());

        assert!(unit("  ").validate().is_err());
    }
}

#[cfg(test)]
mod provider_tests {
    use hc_core::GeoPoint;

    use crate::{
        Attractiveness, AttractivenessProvider, DEFAULT_ATTRACTIVENESS, FacilityKind, FacilitySite, FixedRatings,
        NoRatings, resolve, score_sites,
    };

    fn site(id: &str) -> FacilitySite {
        FacilitySite::new(id, id, FacilityKind::Competitor, GeoPoint::new(17.07, -96.71))
    }

    #[test]
    fn unavailable_falls_back_to_default() {
        assert_eq!(resolve(&NoRatings, &site("X")), DEFAULT_ATTRACTIVENESS);
    }

    #[test]
    fn known_rating_used() {
        let ratings = FixedRatings::new([("X", 4.6)]);
        assert_eq!(ratings.lookup(&site("X")), Attractiveness::Known(4.6));
        assert_eq!(resolve(&ratings, &site("X")), 4.6);
        assert_eq!(resolve(&ratings, &site("Y")), DEFAULT_ATTRACTIVENESS);
    }

    #[test]
    fn out_of_range_rating_falls_back() {
        let ratings = FixedRatings::new([("X", 0.2), ("Y", 7.0), ("Z", f64::NAN)]);
        for id in ["X", "Y", "Z"] {
            assert_eq!(resolve(&ratings, &site(id)), DEFAULT_ATTRACTIVENESS);
        }
    }

    #[test]
    fn score_sites_keeps_order_and_identity() {
        let ratings = FixedRatings::new([("Y", 4.1)]);
        let scored = score_sites(&ratings, vec![site("X"), site("Y")]);
        assert_eq!(scored.len(), 2);
        assert_eq!(scored[0].id, "X");
        assert_eq!(scored[0].attractiveness, DEFAULT_ATTRACTIVENESS);
        assert_eq!(scored[1].attractiveness, 4.1);
        assert_eq!(scored[1].kind, FacilityKind::Competitor);
    }
}

#[cfg(test)]
mod loader_tests {
    use std::io::Cursor;

    use hc_core::Covariate;

    use crate::{FacilityKind, FixedRatings, NoRatings, load_facilities_reader, load_units_reader};

    const UNITS_CSV: &str = "\
id,lat,lng,population,potential_customers,young_digital,entrepreneur_mothers,experienced_wholesalers,municipality,locality
hex_1,17.061,-96.721,640,5.30,4.1,3.9,2.2,Oaxaca de Juárez,Centro
hex_2,17.075,-96.702,210,3.10,,,,,
";

    #[test]
    fn loads_units_with_optional_columns() {
        let units = load_units_reader(Cursor::new(UNITS_CSV), false).unwrap();
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].id, "hex_1");
        assert_eq!(units[0].municipality.as_deref(), Some("Oaxaca de Juárez"));
        assert_eq!(units[0].covariate(Covariate::YoungDigital), 4.1);
        assert_eq!(units[1].covariates.young_digital, None);
        assert_eq!(units[1].locality, None);
    }

    #[test]
    fn minimal_header_is_enough() {
        let csv = "id,lat,lng,population,potential_customers\nu1,17.0,-96.7,100,2.0\n";
        let units = load_units_reader(Cursor::new(csv), false).unwrap();
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].covariate(Covariate::ExperiencedWholesalers), 0.0);
    }

    #[test]
    fn log_transform_applies_to_scaled_covariates_only() {
        let csv = "id,lat,lng,population,potential_customers\nu1,17.0,-96.7,100,99\n";
        let units = load_units_reader(Cursor::new(csv), true).unwrap();
        assert_eq!(units[0].covariates.population, 100.0);
        assert!((units[0].covariates.potential_customers - 100f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn bad_number_is_parse_error() {
        let csv = "id,lat,lng,population,potential_customers\nu1,north,-96.7,100,2.0\n";
        assert!(load_units_reader(Cursor::new(csv), false).is_err());
    }

    #[test]
    fn duplicate_unit_ids_rejected() {
        let csv = "id,lat,lng,population,potential_customers\nu1,17.0,-96.7,100,2.0\nu1,17.1,-96.7,100,2.0\n";
        assert!(load_units_reader(Cursor::new(csv), false).is_err());
    }

    const FACILITIES_CSV: &str = "\
id,name,kind,lat,lng,attractiveness
A,Sucursal Violetas,own,17.078904,-96.710641,4.0
X,Joyería Nice,competitor,17.078891,-96.710177,
";

    #[test]
    fn loads_facilities_resolving_missing_scores() {
        let ratings = FixedRatings::new([("X", 4.4)]);
        let facilities = load_facilities_reader(Cursor::new(FACILITIES_CSV), &ratings).unwrap();
        assert_eq!(facilities.len(), 2);
        assert_eq!(facilities[0].kind, FacilityKind::Own);
        assert_eq!(facilities[0].attractiveness, 4.0);
        assert_eq!(facilities[1].kind, FacilityKind::Competitor);
        assert_eq!(facilities[1].attractiveness, 4.4);
    }

    #[test]
    fn unknown_kind_rejected() {
        let csv = "id,name,kind,lat,lng,attractiveness\nQ,Q,partner,17.0,-96.7,3.0\n";
        assert!(load_facilities_reader(Cursor::new(csv), &NoRatings).is_err());
    }

    #[test]
    fn duplicate_facility_ids_rejected() {
        let csv = "id,name,kind,lat,lng,attractiveness\nA,a,own,17.0,-96.7,3.0\nA,b,own,17.1,-96.7,3.0\n";
        assert!(load_facilities_reader(Cursor::new(csv), &NoRatings).is_err());
    }
}

#[cfg(test)]
mod grid_tests {
    use crate::grid::OAXACA_BBOX;
    use crate::{DemandSource, SimulatedGrid, reference, validate_units};

    #[test]
    fn deterministic_for_seed() {
        let a = SimulatedGrid::new(20, 7).generate();
        let b = SimulatedGrid::new(20, 7).generate();
        assert_eq!(a, b);
        let c = SimulatedGrid::new(20, 8).generate();
        assert_ne!(a, c);
    }

    #[test]
    fn units_are_valid_and_inside_bbox() {
        let units = SimulatedGrid::default().demand_units().unwrap();
        assert_eq!(units.len(), 50);
        validate_units(&units).unwrap();
        for u in &units {
            assert!(OAXACA_BBOX.contains(u.centroid));
            assert!((100.0..1000.0).contains(&u.covariates.population));
            assert!(u.covariates.potential_customers <= 2000f64.ln_1p());
        }
        assert_eq!(units[0].id, "sim_hex_1");
    }

    #[test]
    fn reference_catalogue_shape() {
        assert_eq!(reference::own_stores().len(), 3);
        assert_eq!(reference::competitors().len(), 3);
    }
}
