//! Weekday × hour activity grids.
//!
//! Fixed 7×24 shape (rows weekday 0=Sunday, columns hour 0–23) regardless
//! of input size. Cells hold raw counts (attendance) or raw sums (sales);
//! scaling and normalization are the consumer's concern.

use serde::Serialize;

use crate::types::{AttendanceRecord, AttendanceStatus, SalesRecord};

pub const WEEKDAYS: usize = 7;
pub const HOURS: usize = 24;

#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct Heatmap {
    cells: [[f64; HOURS]; WEEKDAYS],
}

impl Default for Heatmap {
    fn default() -> Self {
        Self::new()
    }
}

impl Heatmap {
    pub fn new() -> Self {
        Self { cells: [[0.0; HOURS]; WEEKDAYS] }
    }

    /// Add `amount` to cell `[weekday][hour]`. Coordinates outside the
    /// grid are ignored.
    pub fn bump(&mut self, weekday: u32, hour: u32, amount: f64) {
        let (w, h) = (weekday as usize, hour as usize);
        if w < WEEKDAYS && h < HOURS {
            self.cells[w][h] += amount;
        }
    }

    pub fn cells(&self) -> &[[f64; HOURS]; WEEKDAYS] {
        &self.cells
    }

    pub fn cell(&self, weekday: usize, hour: usize) -> f64 {
        self.cells[weekday][hour]
    }
}

/// One increment per check-in event; check-outs do not register.
pub fn attendance_heatmap(records: &[AttendanceRecord]) -> Heatmap {
    let mut grid = Heatmap::new();
    for record in records {
        if record.status == AttendanceStatus::CheckIn {
            grid.bump(record.weekday, record.hour_of_day, 1.0);
        }
    }
    grid
}

/// Transaction totals summed into the cell of each sale.
pub fn sales_heatmap(records: &[SalesRecord]) -> Heatmap {
    let mut grid = Heatmap::new();
    for record in records {
        grid.bump(record.weekday, record.hour_of_day, record.total);
    }
    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn attendance(weekday: u32, hour: u32, status: AttendanceStatus) -> AttendanceRecord {
        AttendanceRecord {
            timestamp_utc: Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(),
            day_key: "2025-06-01".into(),
            month_key: "2025-06".into(),
            year: 2025,
            month: 6,
            store_name: "Silom Branch".into(),
            employee_name: "Anong".into(),
            status,
            hour_of_day: hour,
            weekday,
        }
    }

    fn sale(weekday: u32, hour: u32, total: f64) -> SalesRecord {
        SalesRecord {
            timestamp_utc: Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(),
            day_key: "2025-06-01".into(),
            month_key: "2025-06".into(),
            year: 2025,
            month: 6,
            store_name: "Silom Branch".into(),
            employee_name: "Anong".into(),
            product_name: "Jasmine Rice".into(),
            product_code: "SKU-001".into(),
            unit: "กล่อง".into(),
            total,
            quantity: 1.0,
            hour_of_day: hour,
            weekday,
        }
    }

    #[test]
    fn test_grid_is_always_7x24() {
        let grid = attendance_heatmap(&[]);
        assert_eq!(grid.cells().len(), 7);
        for row in grid.cells() {
            assert_eq!(row.len(), 24);
            assert!(row.iter().all(|&v| v == 0.0));
        }
    }

    #[test]
    fn test_check_ins_increment_check_outs_do_not() {
        let records = vec![
            attendance(1, 9, AttendanceStatus::CheckIn),
            attendance(1, 9, AttendanceStatus::CheckIn),
            attendance(1, 9, AttendanceStatus::CheckOut),
        ];
        let grid = attendance_heatmap(&records);
        assert_eq!(grid.cell(1, 9), 2.0);
    }

    #[test]
    fn test_sales_sum_raw_totals() {
        let records = vec![sale(5, 14, 120.0), sale(5, 14, 80.5), sale(0, 8, 40.0)];
        let grid = sales_heatmap(&records);
        assert!((grid.cell(5, 14) - 200.5).abs() < 1e-9);
        assert!((grid.cell(0, 8) - 40.0).abs() < 1e-9);
        assert_eq!(grid.cell(3, 3), 0.0);
    }

    #[test]
    fn test_serializes_as_nested_arrays() {
        let grid = Heatmap::new();
        let value = serde_json::to_value(&grid).expect("serialize");
        let rows = value.as_array().expect("rows");
        assert_eq!(rows.len(), 7);
        assert_eq!(rows[0].as_array().expect("cols").len(), 24);
    }
}
