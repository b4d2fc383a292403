//! Persisted zonal statistics tables.

use std::collections::HashMap;
use std::path::Path;

use tract_layer::AttributeColumn;

use crate::error::{ZonalError, ZonalResult};
use crate::stats::{ZonalStatistics, STAT_COLUMNS};

/// A zonal statistics table: one row per zone that received data.
#[derive(Debug, Clone)]
pub struct ZonalTable {
    /// Table name, e.g. `zonalTableGWRPM252000H`.
    pub name: String,
    /// Name of the zone key field (GISJOIN).
    pub zone_field: String,
    pub rows: Vec<ZonalRow>,
}

/// One zone's entry in a statistics table.
#[derive(Debug, Clone)]
pub struct ZonalRow {
    pub zone: String,
    pub stats: ZonalStatistics,
}

impl ZonalTable {
    /// Number of zones in the table.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Write the table as CSV: zone key column followed by the full
    /// statistics set.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> ZonalResult<()> {
        let mut writer = csv::Writer::from_path(path)?;

        let mut header = vec![self.zone_field.as_str()];
        header.extend(STAT_COLUMNS);
        writer.write_record(&header)?;

        for row in &self.rows {
            let mut record = vec![row.zone.clone()];
            for column in STAT_COLUMNS {
                let value = row
                    .stats
                    .column(column)
                    .expect("statistics cover every declared column");
                record.push(format_value(value));
            }
            writer.write_record(&record)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Read a table back from CSV.
    pub fn read_csv<P: AsRef<Path>>(path: P, name: &str) -> ZonalResult<Self> {
        let path = path.as_ref();
        let mut reader = csv::Reader::from_path(path)?;

        let zone_field = reader
            .headers()?
            .get(0)
            .unwrap_or("GISJOIN")
            .to_string();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            if record.len() != STAT_COLUMNS.len() + 1 {
                return Err(ZonalError::MalformedRow {
                    file: path.display().to_string(),
                    message: format!("expected {} fields, got {}", STAT_COLUMNS.len() + 1, record.len()),
                });
            }

            let zone = record[0].to_string();
            let mut values = [0.0f64; 12];
            for (i, value) in values.iter_mut().enumerate() {
                *value = record[i + 1].parse().map_err(|_| ZonalError::MalformedRow {
                    file: path.display().to_string(),
                    message: format!("field {} is not a number: '{}'", STAT_COLUMNS[i], &record[i + 1]),
                })?;
            }

            rows.push(ZonalRow {
                zone,
                stats: ZonalStatistics {
                    count: values[0] as u64,
                    area: values[1],
                    min: values[2],
                    max: values[3],
                    range: values[4],
                    mean: values[5],
                    std: values[6],
                    sum: values[7],
                    median: values[8],
                    majority: values[9],
                    minority: values[10],
                    variety: values[11] as u64,
                },
            });
        }

        Ok(Self {
            name: name.to_string(),
            zone_field,
            rows,
        })
    }

    /// Export the statistics as attribute columns for the tract join.
    pub fn columns(&self) -> Vec<AttributeColumn> {
        STAT_COLUMNS
            .iter()
            .map(|&column| {
                let mut values = HashMap::with_capacity(self.rows.len());
                for row in &self.rows {
                    if let Some(v) = row.stats.column(column) {
                        values.insert(row.zone.clone(), v);
                    }
                }
                AttributeColumn {
                    name: column.to_string(),
                    values,
                }
            })
            .collect()
    }
}

/// Render a statistic without trailing float noise on integral values.
fn format_value(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{}", v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> ZonalTable {
        let stats = ZonalStatistics::from_values(&[1.0f32, 2.0, 2.0, 4.0], 900.0).unwrap();
        ZonalTable {
            name: "zonalTableLndCov2010P".to_string(),
            zone_field: "GISJOIN".to_string(),
            rows: vec![ZonalRow {
                zone: "G001".to_string(),
                stats,
            }],
        }
    }

    #[test]
    fn test_csv_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.csv");

        let table = sample_table();
        table.write_csv(&path).unwrap();

        let loaded = ZonalTable::read_csv(&path, &table.name).unwrap();
        assert_eq!(loaded.zone_field, "GISJOIN");
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.rows[0].zone, "G001");
        assert_eq!(loaded.rows[0].stats, table.rows[0].stats);
    }

    #[test]
    fn test_columns_cover_all_statistics() {
        let table = sample_table();
        let columns = table.columns();
        assert_eq!(columns.len(), STAT_COLUMNS.len());
        assert_eq!(columns[0].name, "COUNT");
        assert_eq!(columns[0].values.get("G001"), Some(&4.0));
    }
}
