//! Tests for the oaxaca binary: argument parsing and the end-to-end run.

#[cfg(test)]
mod cli_tests {
    use std::path::PathBuf;

    use clap::Parser;
    use clap::error::ErrorKind;

    use crate::Args;

    #[test]
    fn positional_files_and_defaults() {
        let args = Args::try_parse_from(["oaxaca", "study.toml", "units.csv"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("study.toml")));
        assert_eq!(args.units, Some(PathBuf::from("units.csv")));
        assert_eq!(args.output_dir, PathBuf::from("output/oaxaca"));
        assert_eq!(args.grid_units, 50);
        assert_eq!(args.seed, 42);
    }

    #[test]
    fn named_options_override_defaults() {
        let args = Args::try_parse_from(["oaxaca", "--output-dir", "out", "--grid-units", "12", "--seed", "7"]).unwrap();
        assert_eq!(args.config, None);
        assert_eq!(args.output_dir, PathBuf::from("out"));
        assert_eq!(args.grid_units, 12);
        assert_eq!(args.seed, 7);
    }

    #[test]
    fn help_is_not_mistaken_for_a_config_path() {
        let err = Args::try_parse_from(["oaxaca", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }
}

#[cfg(test)]
mod run_tests {
    use std::path::Path;

    use hc_core::{ClusterConfig, GeoPoint};
    use hc_demand::{Covariates, DemandUnit};
    use hc_output::csv::{CANDIDATES_FILE, CAPTURE_SUMMARY_FILE, IMPACTS_FILE};
    use tempfile::TempDir;

    use crate::{Args, profile_units, run};

    const SMALL_UNITS: &str = "\
id,lat,lng,population,potential_customers,young_digital,entrepreneur_mothers,experienced_wholesalers,municipality,locality
h1,17.060,-96.720,800,4.5,2.0,1.5,1.0,,
h2,17.070,-96.710,650,5.0,,2.5,,,
h3,17.080,-96.700,900,3.5,1.0,,0.5,,
";

    fn data_lines(path: &Path) -> usize {
        std::fs::read_to_string(path).unwrap().lines().skip(1).filter(|l| !l.is_empty()).count()
    }

    fn args(dir: &TempDir) -> Args {
        let units = dir.path().join("units.csv");
        std::fs::write(&units, SMALL_UNITS).unwrap();
        Args {
            config:     None,
            units:      Some(units),
            output_dir: dir.path().join("out"),
            grid_units: 50,
            seed:       42,
        }
    }

    #[test]
    fn fewer_units_than_clusters_skip_profiling() {
        let units: Vec<DemandUnit> = (0..3)
            .map(|i| {
                let centroid = GeoPoint::new(17.06, -96.72 + 0.01 * i as f64);
                DemandUnit::new(format!("u{i}"), centroid, Covariates::new(800.0, 4.0 + i as f64))
            })
            .collect();
        let config = ClusterConfig { k: 4, ..ClusterConfig::default() };
        assert!(profile_units(&units, &config).unwrap().is_none());

        let config = ClusterConfig { k: 2, ..ClusterConfig::default() };
        assert_eq!(profile_units(&units, &config).unwrap().map(|p| p.k()), Some(2));
    }

    #[test]
    fn small_partition_still_writes_every_table() {
        let dir = tempfile::tempdir().unwrap();
        let args = args(&dir);
        run(&args).unwrap();

        let out = &args.output_dir;
        assert_eq!(data_lines(&out.join(CAPTURE_SUMMARY_FILE)), 6);
        assert_eq!(data_lines(&out.join(CANDIDATES_FILE)), 3);
        assert_eq!(data_lines(&out.join(IMPACTS_FILE)), 3);
    }

    #[test]
    fn synthetic_grid_run_completes() {
        let dir = tempfile::tempdir().unwrap();
        let args = Args { units: None, grid_units: 20, seed: 3, ..args(&dir) };
        run(&args).unwrap();
        assert!(data_lines(&args.output_dir.join(CAPTURE_SUMMARY_FILE)) > 0);
    }
}
