//! Percentile engine properties

mod common;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use growth_lms::{
    DistributionMode, GrowthError, LmsParams, Measure, Observation, ReferenceTable, Sex,
    compute_series, compute_series_parallel, percentile, standard_normal_score,
};

fn sample_table() -> ReferenceTable {
    ReferenceTable::new(Measure::Weight, Sex::Male, common::sample_rows(100))
        .expect("sample rows satisfy the table invariants")
}

#[test]
fn median_value_maps_to_the_fiftieth_percentile() {
    let table = sample_table();
    let p = percentile(3.3, &table, 0).unwrap();
    assert!((p - 50.0).abs() < 1e-6, "expected 50.0, got {p}");
}

#[test]
fn one_coefficient_of_variation_above_median_is_z_one() {
    // Row 0 is (L=1, M=3.3, S=0.1); M + M*S = 3.63 sits exactly one standard
    // deviation above the median.
    let table = sample_table();
    let p = percentile(3.63, &table, 0).unwrap();
    assert!((p - 84.134_474_606_854_29).abs() < 1e-6, "got {p}");
}

#[test]
fn cumulative_percentile_is_monotonic_in_value() {
    let params = LmsParams {
        l: 1.0,
        m: 3.3,
        s: 0.1,
    };
    let mut rng = StdRng::seed_from_u64(42);
    let mut values: Vec<f64> = (0..200).map(|_| rng.random_range(0.5..5.9)).collect();
    values.sort_by(|a, b| a.partial_cmp(b).unwrap());

    let mut previous = f64::MIN;
    for value in values {
        let p = standard_normal_score(value, params, DistributionMode::Cumulative).unwrap();
        assert!(
            p >= previous,
            "percentile decreased: {p} after {previous} at value {value}"
        );
        previous = p;
    }
}

#[test]
fn cumulative_percentile_stays_inside_the_open_interval() {
    let params = LmsParams {
        l: 1.0,
        m: 3.3,
        s: 0.1,
    };
    for value in [0.5, 1.0, 3.3, 5.0, 5.9] {
        let p = standard_normal_score(value, params, DistributionMode::Cumulative).unwrap();
        assert!(p > 0.0 && p < 100.0, "percentile {p} for value {value}");
    }
}

#[test]
fn density_mode_is_the_scaled_normal_density() {
    let params = LmsParams {
        l: 1.0,
        m: 3.3,
        s: 0.1,
    };
    // φ(0)·100
    let d = standard_normal_score(3.3, params, DistributionMode::Density).unwrap();
    assert!((d - 39.894_228_040_143_27).abs() < 1e-6, "got {d}");
}

#[test]
fn invalid_parameters_are_rejected() {
    let table = sample_table();
    assert!(matches!(
        standard_normal_score(
            3.3,
            LmsParams {
                l: 1.0,
                m: 0.0,
                s: 0.1
            },
            DistributionMode::Cumulative
        ),
        Err(GrowthError::InvalidParameter(_))
    ));
    assert!(matches!(
        percentile(-3.3, &table, 0),
        Ok(_) // L = 1 is an integer power; the value is simply far below the median
    ));
    assert!(matches!(
        standard_normal_score(
            -3.3,
            LmsParams {
                l: 0.5,
                m: 3.3,
                s: 0.1
            },
            DistributionMode::Cumulative
        ),
        Err(GrowthError::InvalidParameter(_))
    ));
}

#[test]
fn series_preserves_input_order() {
    let table = sample_table();
    let observations = vec![
        Observation { day: 5, value: 3.4 },
        Observation { day: 0, value: 3.3 },
        Observation { day: 9, value: 3.2 },
    ];
    let results = compute_series(&table, &observations).unwrap();
    let days: Vec<i64> = results.iter().map(|r| r.day).collect();
    assert_eq!(days, vec![5, 0, 9]);
}

#[test]
fn series_fails_entirely_on_an_out_of_range_day() {
    let table = sample_table();
    let observations = vec![
        Observation { day: 0, value: 3.3 },
        Observation {
            day: 999,
            value: 3.4,
        },
        Observation { day: 2, value: 3.5 },
    ];
    let err = compute_series(&table, &observations).unwrap_err();
    assert!(matches!(
        err,
        GrowthError::IndexOutOfRange {
            index: 999,
            len: 100
        }
    ));
}

#[test]
fn parallel_series_matches_the_sequential_series() {
    let table = sample_table();
    let mut rng = StdRng::seed_from_u64(7);
    let observations: Vec<Observation> = (0..100)
        .map(|day| Observation {
            day,
            value: rng.random_range(2.5..4.5),
        })
        .collect();

    let sequential = compute_series(&table, &observations).unwrap();
    let parallel = compute_series_parallel(&table, &observations).unwrap();
    assert_eq!(sequential, parallel);
}

#[test]
fn parallel_series_also_fails_entirely_on_bad_input() {
    let table = sample_table();
    let observations = vec![
        Observation { day: 0, value: 3.3 },
        Observation {
            day: -1,
            value: 3.4,
        },
    ];
    assert!(matches!(
        compute_series_parallel(&table, &observations),
        Err(GrowthError::IndexOutOfRange { index: -1, .. })
    ));
}
