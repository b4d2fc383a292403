//! Per-zone statistics.

use serde::{Deserialize, Serialize};

/// Column order of the full statistics set, matching the persisted
/// tables and the joined attribute fields.
pub const STAT_COLUMNS: [&str; 12] = [
    "COUNT", "AREA", "MIN", "MAX", "RANGE", "MEAN", "STD", "SUM", "MEDIAN", "MAJORITY",
    "MINORITY", "VARIETY",
];

/// The full statistics set for one zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZonalStatistics {
    /// Number of data cells in the zone.
    pub count: u64,
    /// Ground area of the data cells (cell area times count).
    pub area: f64,
    pub min: f64,
    pub max: f64,
    pub range: f64,
    pub mean: f64,
    /// Population standard deviation.
    pub std: f64,
    pub sum: f64,
    /// Lower-middle order statistic for even counts.
    pub median: f64,
    /// Most frequent value; ties go to the smallest value.
    pub majority: f64,
    /// Least frequent value; ties go to the smallest value.
    pub minority: f64,
    /// Number of distinct values.
    pub variety: u64,
}

impl ZonalStatistics {
    /// Compute the statistics of a zone's cell values.
    ///
    /// `values` holds the data cells only (no NaN); returns None for an
    /// empty zone, which is then left out of the table.
    pub fn from_values(values: &[f32], cell_area: f64) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let mut sorted: Vec<f64> = values.iter().map(|&v| v as f64).collect();
        sorted.sort_by(f64::total_cmp);

        let count = sorted.len() as u64;
        let sum: f64 = sorted.iter().sum();
        let mean = sum / count as f64;
        let variance = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;

        let min = sorted[0];
        let max = sorted[sorted.len() - 1];
        let median = sorted[(sorted.len() - 1) / 2];

        let (majority, minority, variety) = value_frequencies(&sorted);

        Some(Self {
            count,
            area: cell_area * count as f64,
            min,
            max,
            range: max - min,
            mean,
            std: variance.sqrt(),
            sum,
            median,
            majority,
            minority,
            variety,
        })
    }

    /// Look up a statistic by its column name.
    pub fn column(&self, name: &str) -> Option<f64> {
        match name {
            "COUNT" => Some(self.count as f64),
            "AREA" => Some(self.area),
            "MIN" => Some(self.min),
            "MAX" => Some(self.max),
            "RANGE" => Some(self.range),
            "MEAN" => Some(self.mean),
            "STD" => Some(self.std),
            "SUM" => Some(self.sum),
            "MEDIAN" => Some(self.median),
            "MAJORITY" => Some(self.majority),
            "MINORITY" => Some(self.minority),
            "VARIETY" => Some(self.variety as f64),
            _ => None,
        }
    }
}

/// Majority, minority, and variety of a sorted value list.
///
/// Runs of equal values in the sorted order are counted; ties on run
/// length resolve to the smaller value because runs are visited in
/// ascending order.
fn value_frequencies(sorted: &[f64]) -> (f64, f64, u64) {
    let mut majority = sorted[0];
    let mut majority_len = 0usize;
    let mut minority = sorted[0];
    let mut minority_len = usize::MAX;
    let mut variety = 0u64;

    let mut run_start = 0;
    for i in 1..=sorted.len() {
        if i == sorted.len() || sorted[i] != sorted[run_start] {
            let run_len = i - run_start;
            variety += 1;
            if run_len > majority_len {
                majority_len = run_len;
                majority = sorted[run_start];
            }
            if run_len < minority_len {
                minority_len = run_len;
                minority = sorted[run_start];
            }
            run_start = i;
        }
    }

    (majority, minority, variety)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_statistics() {
        let values = [1.0f32, 2.0, 2.0, 3.0, 4.0];
        let stats = ZonalStatistics::from_values(&values, 900.0).unwrap();

        assert_eq!(stats.count, 5);
        assert_eq!(stats.area, 4500.0);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 4.0);
        assert_eq!(stats.range, 3.0);
        assert!((stats.mean - 2.4).abs() < 1e-9);
        assert_eq!(stats.sum, 12.0);
        assert_eq!(stats.median, 2.0);
        assert_eq!(stats.majority, 2.0);
        assert_eq!(stats.variety, 4);
    }

    #[test]
    fn test_std_population() {
        let values = [2.0f32, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let stats = ZonalStatistics::from_values(&values, 1.0).unwrap();
        assert!((stats.std - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_median_even_count_takes_lower_middle() {
        let values = [1.0f32, 2.0, 3.0, 4.0];
        let stats = ZonalStatistics::from_values(&values, 1.0).unwrap();
        assert_eq!(stats.median, 2.0);
    }

    #[test]
    fn test_majority_minority_ties_take_smallest() {
        let values = [0.0f32, 0.0, 1.0, 1.0];
        let stats = ZonalStatistics::from_values(&values, 1.0).unwrap();
        assert_eq!(stats.majority, 0.0);
        assert_eq!(stats.minority, 0.0);
        assert_eq!(stats.variety, 2);
    }

    #[test]
    fn test_binary_zone() {
        // a reclassified urban layer: mostly zeros, some ones
        let values = [0.0f32, 0.0, 0.0, 1.0, 1.0];
        let stats = ZonalStatistics::from_values(&values, 900.0).unwrap();
        assert_eq!(stats.majority, 0.0);
        assert_eq!(stats.minority, 1.0);
        assert_eq!(stats.variety, 2);
        assert!((stats.mean - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_empty_zone() {
        assert!(ZonalStatistics::from_values(&[], 900.0).is_none());
    }

    #[test]
    fn test_column_lookup() {
        let stats = ZonalStatistics::from_values(&[1.0f32, 3.0], 2.0).unwrap();
        for name in STAT_COLUMNS {
            assert!(stats.column(name).is_some(), "missing column {}", name);
        }
        assert_eq!(stats.column("COUNT"), Some(2.0));
        assert_eq!(stats.column("AREA"), Some(4.0));
        assert_eq!(stats.column("NOPE"), None);
    }
}
