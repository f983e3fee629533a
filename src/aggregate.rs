use crate::columns::ColumnScan;
use crate::models::{Status, StudentRow, PASSING_THRESHOLD};

/// Mean over the present cells only. All cells missing yields NaN, an
/// accepted edge case that stands for "no grades to average".
pub fn mean_of_present(grades: &[Option<f64>]) -> f64 {
    let present: Vec<f64> = grades.iter().flatten().copied().collect();
    if present.is_empty() {
        return f64::NAN;
    }
    present.iter().sum::<f64>() / present.len() as f64
}

/// Rounds to 2 decimal places. This is destructive: the rounded value is
/// what gets stored, classified, summarized, and exported.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Threshold rule on the rounded average. NaN compares false against the
/// threshold, so a record with no valid grades classifies as Failing.
pub fn classify(average: f64) -> Status {
    if average >= PASSING_THRESHOLD {
        Status::Passing
    } else {
        Status::Failing
    }
}

/// Average display/export rendering, shared so the table, artifact, and
/// round-trip comparisons all agree.
pub fn format_average(average: f64) -> String {
    if average.is_nan() {
        "NaN".to_string()
    } else {
        format!("{average:.2}")
    }
}

/// Builds one annotated row per student from the classified columns.
pub fn aggregate(scan: &ColumnScan) -> Vec<StudentRow> {
    let grade_columns = scan.grade_columns();

    scan.identities
        .iter()
        .enumerate()
        .map(|(i, identity)| {
            let grades: Vec<Option<f64>> =
                grade_columns.iter().map(|column| column.values[i]).collect();
            let average = round2(mean_of_present(&grades));
            StudentRow {
                identity: identity.clone(),
                grades,
                average,
                status: classify(average),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns;
    use crate::models::TableData;

    fn scan_of(columns_list: &[&str], rows: &[&[&str]]) -> ColumnScan {
        columns::scan(&TableData::new(
            columns_list.iter().map(|c| c.to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|c| c.to_string()).collect())
                .collect(),
        ))
    }

    #[test]
    fn averages_match_the_reference_scenario() {
        let rows = aggregate(&scan_of(
            &["Name", "A", "B", "C"],
            &[&["Ana", "4", "5", "3"], &["Luis", "2", "1", "2"]],
        ));
        assert_eq!(rows[0].average, 4.0);
        assert_eq!(rows[0].status, Status::Passing);
        assert_eq!(rows[1].average, 1.67);
        assert_eq!(rows[1].status, Status::Failing);
    }

    #[test]
    fn missing_cells_are_ignored_in_the_mean() {
        let rows = aggregate(&scan_of(
            &["Name", "A", "B", "C"],
            &[&["Ana", "4", "x", "2"], &["Luis", "1", "2", "3"]],
        ));
        // B stays a grade column because Luis has a value; Ana's mean is
        // over the two present cells only.
        assert_eq!(rows[0].average, 3.0);
        assert_eq!(rows[0].status, Status::Passing);
        assert_eq!(rows[1].average, 2.0);
    }

    #[test]
    fn all_missing_row_is_nan_and_failing() {
        let rows = aggregate(&scan_of(
            &["Name", "A", "B"],
            &[&["Eva", "x", "y"], &["Ana", "4", "5"]],
        ));
        assert!(rows[0].average.is_nan());
        assert_eq!(rows[0].status, Status::Failing);
        assert_eq!(rows[1].average, 4.5);
    }

    #[test]
    fn boundary_average_passes() {
        assert_eq!(classify(3.0), Status::Passing);
        assert_eq!(classify(2.99), Status::Failing);
        assert_eq!(classify(f64::NAN), Status::Failing);
    }

    #[test]
    fn average_stays_within_row_bounds() {
        let rows = aggregate(&scan_of(
            &["Name", "A", "B", "C"],
            &[&["Ana", "1", "5", "3"]],
        ));
        assert!(rows[0].average >= 1.0 && rows[0].average <= 5.0);
    }

    #[test]
    fn rounding_is_two_decimal_places() {
        assert_eq!(round2(5.0 / 3.0), 1.67);
        assert_eq!(round2(2.0), 2.0);
        assert!(round2(f64::NAN).is_nan());
    }

    #[test]
    fn formatting_is_fixed_precision() {
        assert_eq!(format_average(4.0), "4.00");
        assert_eq!(format_average(1.67), "1.67");
        assert_eq!(format_average(f64::NAN), "NaN");
    }
}
