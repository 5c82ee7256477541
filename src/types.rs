//! Shared record shapes: raw events as the log store hands them over,
//! master-data mappings, and the normalized records every computation
//! consumes.
//!
//! Normalized records are ephemeral: allocated fresh per computation and
//! discarded after the response is serialized. Nothing here is cached.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder for string fields the source event never carried.
pub const UNSPECIFIED: &str = "ไม่ระบุ";

/// Which stream a raw event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventScope {
    Attendance,
    Sales,
}

/// A raw event as returned by the log store. Read-only to the engine.
///
/// `meta` is the loose payload recorded with the event; recognized keys are
/// `timestamp`, `employee_id`, `employee_name`, `store_id`, `store_name`,
/// `product_id`, `product_code`, `product_name`, `status`, `total`,
/// `quantity`, and `unit`. Everything is optional; the normalizer decides
/// what survives.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    pub scope: EventScope,
    pub timestamp: String,
    #[serde(default)]
    pub meta: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInfo {
    pub code: String,
    pub name: String,
}

/// Master-data mappings fetched by the caller before invoking the engine.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterData {
    /// employee id → display name
    #[serde(default)]
    pub employees: HashMap<String, String>,
    /// store id → display name
    #[serde(default)]
    pub stores: HashMap<String, String>,
    /// product id → code + display name
    #[serde(default)]
    pub products: HashMap<String, ProductInfo>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceStatus {
    CheckIn,
    CheckOut,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CheckIn => "check-in",
            Self::CheckOut => "check-out",
        }
    }
}

/// Normalized attendance event. Calendar fields are derived from
/// `timestamp_utc` through the configured time zone, never from the
/// storage zone.
#[derive(Debug, Clone)]
pub struct AttendanceRecord {
    pub timestamp_utc: DateTime<Utc>,
    pub day_key: String,
    pub month_key: String,
    pub year: i32,
    pub month: u32,
    pub store_name: String,
    pub employee_name: String,
    pub status: AttendanceStatus,
    pub hour_of_day: u32,
    pub weekday: u32,
}

/// Normalized point-of-sale transaction.
///
/// `total` and `quantity` are guaranteed finite: records that fail that
/// check are dropped at the normalization boundary rather than defaulted,
/// so downstream sums never see NaN or infinity.
#[derive(Debug, Clone)]
pub struct SalesRecord {
    pub timestamp_utc: DateTime<Utc>,
    pub day_key: String,
    pub month_key: String,
    pub year: i32,
    pub month: u32,
    pub store_name: String,
    pub employee_name: String,
    pub product_name: String,
    pub product_code: String,
    pub unit: String,
    pub total: f64,
    pub quantity: f64,
    pub hour_of_day: u32,
    pub weekday: u32,
}
