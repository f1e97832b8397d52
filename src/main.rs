use chrono::NaiveDate;
use log::info;

use growth_lms::{
    DistributionMode, GrowthError, Measure, ObservationFile, Result, Sex, TableStore,
    age_in_days, age_in_months, compute_series, standard_normal_score,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        // Age conversion: birth date and optional reference date
        [cmd, birth] if cmd.as_str() == "age" => {
            let today = chrono::Local::now().date_naive();
            print_age(birth, today)
        }
        [cmd, birth, reference] if cmd.as_str() == "age" => {
            let reference = parse_date(reference)?;
            print_age(birth, reference)
        }

        // Warm every reference table found in the data directory
        [data_dir] => {
            let store = TableStore::new(data_dir);
            let loaded = store.load_all()?;
            println!("{}", serde_json::json!({ "tables_loaded": loaded }));
            Ok(())
        }

        // Percentile series for an uploaded measurement file
        [data_dir, measure, sex, upload] => {
            let measure: Measure = measure.parse()?;
            let sex: Sex = sex.parse()?;
            let store = TableStore::new(data_dir);
            let table = store.table(measure, sex)?;

            let series = ObservationFile::new().load_async(upload.as_ref()).await?;
            let observations = series.observations_for(measure)?;
            let results = compute_series(&table, &observations)?;
            info!(
                "Computed {} percentiles for {} ({})",
                results.len(),
                measure,
                sex
            );
            println!("{}", serde_json::to_string_pretty(&results).map_err(anyhow::Error::from)?);
            Ok(())
        }

        // Single-value calculator: one measurement at one age-in-days
        [data_dir, measure, sex, value, day] => {
            let measure: Measure = measure.parse()?;
            let sex: Sex = sex.parse()?;
            let value: f64 = value.parse().map_err(|_| {
                GrowthError::InvalidParameter(format!("'{value}' is not a number"))
            })?;
            let day: i64 = day.parse().map_err(|_| {
                GrowthError::InvalidParameter(format!("'{day}' is not a day index"))
            })?;

            let store = TableStore::new(data_dir);
            let table = store.table(measure, sex)?;
            let params = table.params_at(day)?;
            let percentile = standard_normal_score(value, params, DistributionMode::Cumulative)?;
            let z = growth_lms::z_score(value, params)?;
            println!(
                "{}",
                serde_json::json!({
                    "measure": measure.to_string(),
                    "sex": sex.to_string(),
                    "unit": measure.info().unit_label,
                    "day": day,
                    "value": value,
                    "z": z,
                    "percentile": percentile,
                })
            );
            Ok(())
        }

        _ => {
            eprintln!("Usage:");
            eprintln!("  growth-lms age <birth-date> [reference-date]");
            eprintln!("  growth-lms <data-dir>");
            eprintln!("  growth-lms <data-dir> <measure> <sex> <upload-file>");
            eprintln!("  growth-lms <data-dir> <measure> <sex> <value> <day>");
            Ok(())
        }
    }
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| GrowthError::InvalidParameter(format!("'{s}' is not a YYYY-MM-DD date")))
}

fn print_age(birth: &str, reference: NaiveDate) -> Result<()> {
    let birth = parse_date(birth)?;
    let days = age_in_days(birth, reference)?;
    println!(
        "{}",
        serde_json::json!({ "days": days, "months": age_in_months(days) })
    );
    Ok(())
}
