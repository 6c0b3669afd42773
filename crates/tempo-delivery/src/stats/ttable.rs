//! Student-t critical values by confidence level and degrees of freedom.
//!
//! A closed-form t quantile is unnecessary here: the engine only ever needs
//! the two-tailed critical value at 90/95/99% confidence, and a table with
//! ceiling-rounded df lookup is exactly reproducible across runs and
//! platforms. Requested df between rows resolves to the nearest tabulated
//! df ≥ requested; df ≥ 1000 uses the z-approximation row.

use super::ConfidenceLevel;

/// Two-tailed critical values: `(df, [t_90, t_95, t_99])`.
const ROWS: [(usize, [f64; 3]); 18] = [
    (1, [6.314, 12.706, 63.657]),
    (2, [2.920, 4.303, 9.925]),
    (3, [2.353, 3.182, 5.841]),
    (4, [2.132, 2.776, 4.604]),
    (5, [2.015, 2.571, 4.032]),
    (6, [1.943, 2.447, 3.707]),
    (7, [1.895, 2.365, 3.499]),
    (8, [1.860, 2.306, 3.355]),
    (9, [1.833, 2.262, 3.250]),
    (10, [1.812, 2.228, 3.169]),
    (15, [1.753, 2.131, 2.947]),
    (20, [1.725, 2.086, 2.845]),
    (25, [1.708, 2.060, 2.787]),
    (30, [1.697, 2.042, 2.750]),
    (40, [1.684, 2.021, 2.704]),
    (50, [1.676, 2.009, 2.678]),
    (60, [1.671, 2.000, 2.660]),
    (100, [1.660, 1.984, 2.626]),
];

/// Large-sample (z) approximation, used at df ≥ 1000.
const Z_ROW: [f64; 3] = [1.645, 1.960, 2.576];

/// Two-tailed Student-t critical value for `df` degrees of freedom.
///
/// `df` is clamped to at least 1. Values between tabulated rows round up
/// to the next row (a slightly conservative interval).
#[must_use]
pub fn t_critical(level: ConfidenceLevel, df: usize) -> f64 {
    let df = df.max(1);
    let column = level.table_column();

    if df >= 1000 {
        return Z_ROW[column];
    }

    ROWS.iter()
        .find(|(row_df, _)| *row_df >= df)
        .map_or(Z_ROW[column], |(_, values)| values[column])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_rows_are_returned_verbatim() {
        assert!((t_critical(ConfidenceLevel::P95, 1) - 12.706).abs() < f64::EPSILON);
        assert!((t_critical(ConfidenceLevel::P90, 10) - 1.812).abs() < f64::EPSILON);
        assert!((t_critical(ConfidenceLevel::P99, 30) - 2.750).abs() < f64::EPSILON);
    }

    #[test]
    fn between_rows_rounds_up_to_the_next_df() {
        // df 11..15 all resolve to the df=15 row.
        for df in 11..=15 {
            assert!((t_critical(ConfidenceLevel::P95, df) - 2.131).abs() < f64::EPSILON);
        }
        // df 61..100 resolve to the df=100 row.
        assert!((t_critical(ConfidenceLevel::P95, 75) - 1.984).abs() < f64::EPSILON);
    }

    #[test]
    fn past_the_table_uses_the_z_row() {
        assert!((t_critical(ConfidenceLevel::P95, 101) - 1.960).abs() < f64::EPSILON);
        assert!((t_critical(ConfidenceLevel::P95, 5_000) - 1.960).abs() < f64::EPSILON);
        assert!((t_critical(ConfidenceLevel::P99, 1_000) - 2.576).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_df_is_clamped_to_one() {
        assert!((t_critical(ConfidenceLevel::P95, 0) - 12.706).abs() < f64::EPSILON);
    }

    #[test]
    fn critical_values_shrink_as_df_grows() {
        for level in [
            ConfidenceLevel::P90,
            ConfidenceLevel::P95,
            ConfidenceLevel::P99,
        ] {
            let mut prev = t_critical(level, 1);
            for df in 2..200 {
                let next = t_critical(level, df);
                assert!(next <= prev, "t must not grow with df (level {level:?}, df {df})");
                prev = next;
            }
        }
    }

    #[test]
    fn wider_confidence_means_larger_critical_value() {
        for df in [1, 5, 30, 2_000] {
            let t90 = t_critical(ConfidenceLevel::P90, df);
            let t95 = t_critical(ConfidenceLevel::P95, df);
            let t99 = t_critical(ConfidenceLevel::P99, df);
            assert!(t90 < t95 && t95 < t99);
        }
    }
}
