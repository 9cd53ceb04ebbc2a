//! Conversion of run output into stored records and CSV.

use std::collections::BTreeMap;

use w2_sim::{Quantity, RunOutput};

use crate::types::SeriesRecord;
use crate::{ResultsError, ResultsResult};

/// Quantities whose final values go into a run manifest.
pub const MANIFEST_QUANTITIES: [Quantity; 6] = [
    Quantity::Population,
    Quantity::NaturalResources,
    Quantity::CapitalInvestment,
    Quantity::Pollution,
    Quantity::AgricultureFraction,
    Quantity::QualityOfLife,
];

pub fn series_records(output: &RunOutput) -> Vec<SeriesRecord> {
    output
        .grid
        .times()
        .into_iter()
        .enumerate()
        .map(|(k, time)| SeriesRecord {
            time,
            values: Quantity::ALL
                .into_iter()
                .map(|q| (q.code().to_string(), output.store.value(q, k)))
                .collect(),
        })
        .collect()
}

pub fn manifest_final_values(output: &RunOutput) -> BTreeMap<String, f64> {
    MANIFEST_QUANTITIES
        .into_iter()
        .filter_map(|q| output.final_value(q).map(|v| (q.code().to_string(), v)))
        .collect()
}

/// Render records as CSV with a `time` column followed by one column per
/// quantity. Not-applicable samples are empty cells.
pub fn series_csv(records: &[SeriesRecord], quantities: &[Quantity]) -> ResultsResult<String> {
    let mut csv = String::from("time");
    for q in quantities {
        csv.push(',');
        csv.push_str(q.code());
    }
    csv.push('\n');

    for record in records {
        csv.push_str(&record.time.to_string());
        for q in quantities {
            let value = record
                .values
                .get(q.code())
                .ok_or_else(|| ResultsError::UnknownQuantity {
                    code: q.code().to_string(),
                })?;
            csv.push(',');
            if let Some(v) = value {
                csv.push_str(&v.to_string());
            }
        }
        csv.push('\n');
    }

    Ok(csv)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(time: f64, p: Option<f64>, br: Option<f64>) -> SeriesRecord {
        SeriesRecord {
            time,
            values: [("P".to_string(), p), ("BR".to_string(), br)]
                .into_iter()
                .collect(),
        }
    }

    #[test]
    fn csv_leaves_not_applicable_cells_empty() {
        let records = vec![
            record(1900.0, Some(1.65e9), None),
            record(1900.5, Some(1.7e9), Some(2.0e7)),
        ];
        let csv = series_csv(&records, &[Quantity::Population, Quantity::BirthRate]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "time,P,BR");
        assert_eq!(lines[1], "1900,1650000000,");
        assert_eq!(lines[2], "1900.5,1700000000,20000000");
    }

    #[test]
    fn csv_rejects_quantity_missing_from_records() {
        let records = vec![record(1900.0, Some(1.0), None)];
        assert!(matches!(
            series_csv(&records, &[Quantity::QualityOfLife]),
            Err(ResultsError::UnknownQuantity { .. })
        ));
    }
}
