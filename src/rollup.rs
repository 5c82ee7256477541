//! Per-dimension performance rollups.
//!
//! One scan per dimension over the windowed records accumulates a keyed
//! aggregate, finalized once into ranked entries: stable-sorted descending
//! by revenue (ties keep encounter order) and capped to the configured
//! top N. The cap bounds response size; it is configuration, not a
//! correctness rule.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::stats::safe_div;
use crate::types::{AttendanceRecord, AttendanceStatus, SalesRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Store,
    Employee,
    Product,
}

#[derive(Debug, Default)]
struct Aggregate {
    check_ins: u64,
    revenue: f64,
    transactions: u64,
    employees: HashSet<String>,
    stores: HashSet<String>,
    products: HashSet<String>,
}

/// Finalized rollup entry. `efficiency` is present for the store
/// dimension only, `productivity` for the employee dimension only.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedEntry {
    pub name: String,
    pub check_ins: u64,
    pub revenue: f64,
    pub transactions: u64,
    pub avg_ticket: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub efficiency: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub productivity: Option<f64>,
    pub distinct_employees: usize,
    pub distinct_stores: usize,
    pub distinct_products: usize,
}

/// Keyed accumulator preserving first-encounter order, so revenue ties
/// rank in the order groups first appeared in the record scan.
#[derive(Debug, Default)]
struct GroupMap {
    index: HashMap<String, usize>,
    groups: Vec<(String, Aggregate)>,
}

impl GroupMap {
    fn slot(&mut self, key: &str) -> &mut Aggregate {
        let idx = match self.index.get(key) {
            Some(&idx) => idx,
            None => {
                self.index.insert(key.to_string(), self.groups.len());
                self.groups.push((key.to_string(), Aggregate::default()));
                self.groups.len() - 1
            }
        };
        &mut self.groups[idx].1
    }
}

/// Group the filtered record set by one dimension and rank the aggregates.
pub fn rollup(
    dimension: Dimension,
    attendance: &[AttendanceRecord],
    sales: &[SalesRecord],
    cap: usize,
) -> Vec<RankedEntry> {
    let mut map = GroupMap::default();

    // Attendance: check-in counts and active-employee membership.
    for record in attendance {
        if record.status != AttendanceStatus::CheckIn {
            continue;
        }
        let key = match dimension {
            Dimension::Store => &record.store_name,
            Dimension::Employee => &record.employee_name,
            Dimension::Product => continue,
        };
        let group = map.slot(key);
        group.check_ins += 1;
        group.employees.insert(record.employee_name.clone());
    }

    // Sales: revenue, transaction counts, secondary set memberships.
    for record in sales {
        let key = match dimension {
            Dimension::Store => &record.store_name,
            Dimension::Employee => &record.employee_name,
            Dimension::Product => &record.product_name,
        };
        let group = map.slot(key);
        group.revenue += record.total;
        group.transactions += 1;
        match dimension {
            Dimension::Store => {}
            Dimension::Employee => {
                group.stores.insert(record.store_name.clone());
                group.products.insert(record.product_name.clone());
            }
            Dimension::Product => {
                group.stores.insert(record.store_name.clone());
                group.employees.insert(record.employee_name.clone());
            }
        }
    }

    let mut entries: Vec<RankedEntry> = map
        .groups
        .into_iter()
        .map(|(name, group)| RankedEntry {
            name,
            check_ins: group.check_ins,
            revenue: group.revenue,
            transactions: group.transactions,
            avg_ticket: safe_div(group.revenue, group.transactions as f64),
            efficiency: (dimension == Dimension::Store)
                .then(|| safe_div(group.revenue, group.check_ins as f64)),
            productivity: (dimension == Dimension::Employee)
                .then(|| safe_div(group.transactions as f64, group.check_ins as f64)),
            distinct_employees: group.employees.len(),
            distinct_stores: group.stores.len(),
            distinct_products: group.products.len(),
        })
        .collect();

    // std stable sort: equal revenues keep encounter order.
    entries.sort_by(|a, b| {
        b.revenue
            .partial_cmp(&a.revenue)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    entries.truncate(cap);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn attendance(store: &str, employee: &str, status: AttendanceStatus) -> AttendanceRecord {
        AttendanceRecord {
            timestamp_utc: Utc.with_ymd_and_hms(2025, 6, 1, 2, 0, 0).unwrap(),
            day_key: "2025-06-01".into(),
            month_key: "2025-06".into(),
            year: 2025,
            month: 6,
            store_name: store.into(),
            employee_name: employee.into(),
            status,
            hour_of_day: 9,
            weekday: 0,
        }
    }

    fn sale(store: &str, employee: &str, product: &str, total: f64) -> SalesRecord {
        SalesRecord {
            timestamp_utc: Utc.with_ymd_and_hms(2025, 6, 1, 3, 0, 0).unwrap(),
            day_key: "2025-06-01".into(),
            month_key: "2025-06".into(),
            year: 2025,
            month: 6,
            store_name: store.into(),
            employee_name: employee.into(),
            product_name: product.into(),
            product_code: format!("SKU-{product}"),
            unit: "ชิ้น".into(),
            total,
            quantity: 1.0,
            hour_of_day: 10,
            weekday: 0,
        }
    }

    #[test]
    fn test_store_rollup_efficiency_and_ranking() {
        let attendance = vec![
            attendance("Silom", "Anong", AttendanceStatus::CheckIn),
            attendance("Silom", "Boonmee", AttendanceStatus::CheckIn),
            attendance("Asok", "Chai", AttendanceStatus::CheckIn),
            attendance("Asok", "Chai", AttendanceStatus::CheckOut),
        ];
        let sales = vec![
            sale("Asok", "Chai", "Rice", 500.0),
            sale("Silom", "Anong", "Rice", 300.0),
            sale("Silom", "Anong", "Noodles", 100.0),
        ];
        let entries = rollup(Dimension::Store, &attendance, &sales, 10);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "Asok");
        assert!((entries[0].revenue - 500.0).abs() < 1e-9);
        assert_eq!(entries[0].efficiency, Some(500.0));
        assert_eq!(entries[1].name, "Silom");
        assert_eq!(entries[1].check_ins, 2);
        assert_eq!(entries[1].distinct_employees, 2);
        assert_eq!(entries[1].efficiency, Some(200.0));
        assert!((entries[1].avg_ticket - 200.0).abs() < 1e-9);
        assert!(entries[0].productivity.is_none());
    }

    #[test]
    fn test_employee_rollup_productivity() {
        let attendance = vec![
            attendance("Silom", "Anong", AttendanceStatus::CheckIn),
            attendance("Silom", "Anong", AttendanceStatus::CheckIn),
        ];
        let sales = vec![
            sale("Silom", "Anong", "Rice", 120.0),
            sale("Asok", "Anong", "Noodles", 80.0),
            sale("Asok", "Anong", "Rice", 60.0),
            sale("Asok", "Anong", "Fish Sauce", 40.0),
        ];
        let entries = rollup(Dimension::Employee, &attendance, &sales, 10);
        assert_eq!(entries.len(), 1);
        let anong = &entries[0];
        assert_eq!(anong.productivity, Some(2.0));
        assert_eq!(anong.efficiency, None);
        assert_eq!(anong.distinct_stores, 2);
        assert_eq!(anong.distinct_products, 3);
    }

    #[test]
    fn test_productivity_with_zero_check_ins_is_zero() {
        let sales = vec![sale("Silom", "Anong", "Rice", 120.0)];
        let entries = rollup(Dimension::Employee, &[], &sales, 10);
        assert_eq!(entries[0].productivity, Some(0.0));
        assert!((entries[0].avg_ticket - 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_product_rollup_ignores_attendance() {
        let attendance = vec![attendance("Silom", "Anong", AttendanceStatus::CheckIn)];
        let sales = vec![
            sale("Silom", "Anong", "Rice", 100.0),
            sale("Asok", "Boonmee", "Rice", 50.0),
        ];
        let entries = rollup(Dimension::Product, &attendance, &sales, 10);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Rice");
        assert_eq!(entries[0].check_ins, 0);
        assert_eq!(entries[0].distinct_employees, 2);
        assert_eq!(entries[0].distinct_stores, 2);
    }

    #[test]
    fn test_ties_keep_encounter_order() {
        let sales = vec![
            sale("Silom", "Anong", "Zebra Brand", 100.0),
            sale("Silom", "Anong", "Apple Brand", 100.0),
            sale("Silom", "Anong", "Mango Brand", 100.0),
        ];
        let entries = rollup(Dimension::Product, &[], &sales, 10);
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Zebra Brand", "Apple Brand", "Mango Brand"]);
    }

    #[test]
    fn test_cap_bounds_output() {
        let sales: Vec<SalesRecord> = (0..15)
            .map(|i| sale("Silom", "Anong", &format!("Product {i}"), 100.0 + i as f64))
            .collect();
        let entries = rollup(Dimension::Product, &[], &sales, 10);
        assert_eq!(entries.len(), 10);
        assert_eq!(entries[0].name, "Product 14");
        // Cap is configuration, not hard-coded.
        let entries = rollup(Dimension::Product, &[], &sales, 3);
        assert_eq!(entries.len(), 3);
    }
}
