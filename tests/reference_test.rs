//! Reference table and vocabulary models

mod common;

use growth_lms::{GrowthError, Measure, ReferenceRow, ReferenceTable, Sex};

fn build(rows: Vec<ReferenceRow>) -> growth_lms::Result<ReferenceTable> {
    ReferenceTable::new(Measure::Weight, Sex::Female, rows)
}

#[test]
fn params_at_returns_the_exact_stored_triple() {
    let table = build(common::sample_rows(10)).unwrap();
    let params = table.params_at(3).unwrap();
    assert_eq!(params.l, 1.0);
    assert_eq!(params.m, 3.3 + 0.03);
    assert_eq!(params.s, 0.1);
}

#[test]
fn params_at_rejects_out_of_range_positions() {
    let table = build(common::sample_rows(10)).unwrap();
    assert!(matches!(
        table.params_at(-1),
        Err(GrowthError::IndexOutOfRange { index: -1, len: 10 })
    ));
    assert!(matches!(
        table.params_at(10),
        Err(GrowthError::IndexOutOfRange { index: 10, len: 10 })
    ));
    assert!(table.params_at(0).is_ok());
    assert!(table.params_at(9).is_ok());
}

#[test]
fn empty_tables_are_rejected() {
    assert!(matches!(
        build(Vec::new()),
        Err(GrowthError::SchemaError(_))
    ));
}

#[test]
fn tables_must_start_at_day_zero() {
    let mut rows = common::sample_rows(5);
    rows.remove(0);
    assert!(matches!(build(rows), Err(GrowthError::SchemaError(_))));
}

#[test]
fn gaps_in_the_day_column_are_rejected() {
    let mut rows = common::sample_rows(5);
    rows[3].day = 4;
    assert!(matches!(build(rows), Err(GrowthError::SchemaError(_))));
}

#[test]
fn non_positive_scale_parameters_are_rejected() {
    let mut rows = common::sample_rows(5);
    rows[2].m = 0.0;
    assert!(matches!(
        build(rows),
        Err(GrowthError::InvalidParameter(_))
    ));

    let mut rows = common::sample_rows(5);
    rows[4].s = -0.1;
    assert!(matches!(
        build(rows),
        Err(GrowthError::InvalidParameter(_))
    ));
}

#[test]
fn non_finite_parameters_are_rejected() {
    let mut rows = common::sample_rows(5);
    rows[1].l = f64::NAN;
    assert!(matches!(build(rows), Err(GrowthError::SchemaError(_))));
}

#[test]
fn table_accessors_describe_the_selection() {
    let table = build(common::sample_rows(7)).unwrap();
    assert_eq!(table.measure(), Measure::Weight);
    assert_eq!(table.sex(), Sex::Female);
    assert_eq!(table.len(), 7);
    assert_eq!(table.max_day(), 6);
    assert!(!table.is_empty());
}

#[test]
fn measure_metadata_matches_the_who_file_codes() {
    assert_eq!(Measure::Weight.info().file_code, "wfa");
    assert_eq!(Measure::Height.info().file_code, "lhfa");
    assert_eq!(Measure::HeadCircumference.info().file_code, "hcfa");
    assert_eq!(Measure::Weight.info().unit_label, "kg.");
    assert_eq!(Measure::Height.info().unit_label, "cm.");
    assert_eq!(Measure::Weight.info().column, "w");
    assert_eq!(Measure::HeadCircumference.info().column, "hc");
}

#[test]
fn selectors_parse_from_boundary_strings() {
    assert_eq!("weight".parse::<Measure>().unwrap(), Measure::Weight);
    assert_eq!(
        "Head-Circumference".parse::<Measure>().unwrap(),
        Measure::HeadCircumference
    );
    assert!(matches!(
        "waist".parse::<Measure>(),
        Err(GrowthError::InvalidParameter(_))
    ));

    assert_eq!("boys".parse::<Sex>().unwrap(), Sex::Male);
    assert_eq!("Female".parse::<Sex>().unwrap(), Sex::Female);
    assert!(matches!(
        "unknown".parse::<Sex>(),
        Err(GrowthError::InvalidParameter(_))
    ));
    assert_eq!(Sex::Male.table_code(), "boys");
    assert_eq!(Sex::Female.table_code(), "girls");
}
