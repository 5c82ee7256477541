//! Parse-or-drop boundary between raw log-store events and typed records.
//!
//! This is the single place where malformed payloads are absorbed: an
//! event that survives normalization is fully typed, calendar-bucketed in
//! the configured zone, and carries only finite numbers. Drops are counted
//! and logged at debug, never fatal.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;

use crate::timezone::zoned_parts;
use crate::types::{
    AttendanceRecord, AttendanceStatus, EventScope, MasterData, RawEvent, SalesRecord, UNSPECIFIED,
};

/// Counts of events excluded during normalization, by reason.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DropStats {
    pub bad_timestamp: usize,
    pub bad_amount: usize,
}

impl DropStats {
    pub fn total(&self) -> usize {
        self.bad_timestamp + self.bad_amount
    }
}

#[derive(Debug, Default)]
pub struct NormalizedEvents {
    pub attendance: Vec<AttendanceRecord>,
    pub sales: Vec<SalesRecord>,
    pub dropped: DropStats,
}

/// Parse a storage timestamp into an absolute instant.
///
/// Accepts RFC3339 and the two naive forms the log store has historically
/// written; naive values are read as UTC. Calendar bucketing happens later
/// through the configured zone, so the storage zone never leaks into keys.
pub fn parse_instant(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(naive.and_utc());
        }
    }
    None
}

fn meta_str<'a>(meta: &'a HashMap<String, serde_json::Value>, key: &str) -> Option<&'a str> {
    meta.get(key)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Numeric meta field: accepts JSON numbers and numeric strings, requires
/// the result to be finite.
fn meta_f64(meta: &HashMap<String, serde_json::Value>, key: &str) -> Option<f64> {
    let value = meta.get(key)?;
    let parsed = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    parsed.is_finite().then_some(parsed)
}

fn resolve_timestamp(event: &RawEvent) -> Option<DateTime<Utc>> {
    meta_str(&event.meta, "timestamp")
        .and_then(parse_instant)
        .or_else(|| parse_instant(&event.timestamp))
}

fn resolve_employee(event: &RawEvent, master: &MasterData) -> String {
    meta_str(&event.meta, "employee_id")
        .and_then(|id| master.employees.get(id).cloned())
        .or_else(|| meta_str(&event.meta, "employee_name").map(str::to_string))
        .unwrap_or_else(|| UNSPECIFIED.to_string())
}

fn resolve_store(event: &RawEvent, master: &MasterData) -> String {
    meta_str(&event.meta, "store_id")
        .and_then(|id| master.stores.get(id).cloned())
        .or_else(|| meta_str(&event.meta, "store_name").map(str::to_string))
        .unwrap_or_else(|| UNSPECIFIED.to_string())
}

fn resolve_product(event: &RawEvent, master: &MasterData) -> (String, String) {
    if let Some(info) = meta_str(&event.meta, "product_id").and_then(|id| master.products.get(id)) {
        return (info.code.clone(), info.name.clone());
    }
    let code = meta_str(&event.meta, "product_code")
        .map(str::to_string)
        .unwrap_or_else(|| UNSPECIFIED.to_string());
    let name = meta_str(&event.meta, "product_name")
        .map(str::to_string)
        .unwrap_or_else(|| UNSPECIFIED.to_string());
    (code, name)
}

/// Anything other than the literal "check-out" normalizes to check-in.
fn resolve_status(event: &RawEvent) -> AttendanceStatus {
    match meta_str(&event.meta, "status").map(str::to_lowercase).as_deref() {
        Some("check-out") => AttendanceStatus::CheckOut,
        _ => AttendanceStatus::CheckIn,
    }
}

/// Map raw events into typed attendance and sales records, dropping what
/// cannot be represented faithfully.
pub fn normalize_events(events: &[RawEvent], master: &MasterData, tz: Tz) -> NormalizedEvents {
    let mut out = NormalizedEvents::default();

    for event in events {
        let Some(instant) = resolve_timestamp(event) else {
            out.dropped.bad_timestamp += 1;
            log::debug!("dropping {:?} event with unparsable timestamp {:?}", event.scope, event.timestamp);
            continue;
        };
        let parts = zoned_parts(instant, tz);

        match event.scope {
            EventScope::Attendance => {
                out.attendance.push(AttendanceRecord {
                    timestamp_utc: instant,
                    day_key: parts.day_key(),
                    month_key: parts.month_key(),
                    year: parts.year,
                    month: parts.month,
                    store_name: resolve_store(event, master),
                    employee_name: resolve_employee(event, master),
                    status: resolve_status(event),
                    hour_of_day: parts.hour,
                    weekday: parts.weekday,
                });
            }
            EventScope::Sales => {
                // Finiteness contract: a malformed amount silently summed
                // as zero would corrupt revenue, so the record is dropped.
                let (Some(total), Some(quantity)) =
                    (meta_f64(&event.meta, "total"), meta_f64(&event.meta, "quantity"))
                else {
                    out.dropped.bad_amount += 1;
                    log::debug!("dropping sales event at {} with non-finite or missing amount", event.timestamp);
                    continue;
                };
                let (product_code, product_name) = resolve_product(event, master);
                out.sales.push(SalesRecord {
                    timestamp_utc: instant,
                    day_key: parts.day_key(),
                    month_key: parts.month_key(),
                    year: parts.year,
                    month: parts.month,
                    store_name: resolve_store(event, master),
                    employee_name: resolve_employee(event, master),
                    product_name,
                    product_code,
                    unit: meta_str(&event.meta, "unit")
                        .map(str::to_string)
                        .unwrap_or_else(|| UNSPECIFIED.to_string()),
                    total,
                    quantity,
                    hour_of_day: parts.hour,
                    weekday: parts.weekday,
                });
            }
        }
    }

    out
}
