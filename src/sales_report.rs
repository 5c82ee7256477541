//! Unit-normalized multi-month sales comparison per employee.
//!
//! A parallel pipeline to the dashboard: it shares only the normalizer
//! and the zoned calendar. Sales rows in the requested scope are
//! classified into the three-category unit taxonomy, accumulated per
//! product per unit category and per month, then finalized into a
//! 12-entry month-over-month series with sequential diffs.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::EngineConfig;
use crate::normalize::normalize_events;
use crate::stats::{growth_percent, safe_div};
use crate::types::{MasterData, RawEvent};
use crate::units::UnitCategory;

pub const MONTHS_PER_YEAR: usize = 12;

pub struct SalesReportInput<'a> {
    pub events: &'a [RawEvent],
    pub master: &'a MasterData,
    pub config: &'a EngineConfig,
    /// Employee display name the report is scoped to.
    pub employee: String,
    /// Optional store restriction.
    pub store: Option<String>,
    pub year: i32,
    /// Inclusive month range, clamped to 1..=12.
    pub month_start: u32,
    pub month_end: u32,
    /// Reference instant stamped into the report metadata.
    pub now: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitSummary {
    pub total_quantity: f64,
    pub total_amount: f64,
    pub count: u64,
    pub avg_price: f64,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitBreakdown {
    #[serde(rename = "box")]
    pub boxes: UnitSummary,
    #[serde(rename = "pack")]
    pub packs: UnitSummary,
    #[serde(rename = "piece")]
    pub pieces: UnitSummary,
}

/// One month of the comparison series. Diffs are against the immediately
/// preceding month's total; month 1 has no prior data and zero diffs.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySalesEntry {
    pub month: u32,
    pub total_sales: f64,
    pub diff_amount: f64,
    pub diff_percent: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductComparison {
    pub product_code: String,
    pub product_name: String,
    pub units: UnitBreakdown,
    /// Sum of the three unit categories' amounts, rounded to the nearest
    /// integer currency unit.
    pub total_sales_all_units: f64,
    /// Always exactly 12 entries, months 1–12, regardless of sparsity.
    pub monthly: Vec<MonthlySalesEntry>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReportMeta {
    pub employee: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store: Option<String>,
    pub year: i32,
    pub month_start: u32,
    pub month_end: u32,
    pub total_products: usize,
    pub year_total_sales: f64,
    /// Rows excluded because their unit label matched no category.
    pub skipped_rows: usize,
    pub generated_at: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesComparisonReport {
    pub products: Vec<ProductComparison>,
    pub meta: SalesReportMeta,
}

#[derive(Debug, Default)]
struct UnitAcc {
    quantity: f64,
    amount: f64,
    count: u64,
}

impl UnitAcc {
    fn finalize(&self) -> UnitSummary {
        UnitSummary {
            total_quantity: self.quantity,
            total_amount: self.amount,
            count: self.count,
            avg_price: safe_div(self.amount, self.quantity),
        }
    }
}

#[derive(Debug)]
struct ProductAcc {
    name: String,
    boxes: UnitAcc,
    packs: UnitAcc,
    pieces: UnitAcc,
    monthly: [f64; MONTHS_PER_YEAR],
}

impl ProductAcc {
    fn new(name: String) -> Self {
        Self {
            name,
            boxes: UnitAcc::default(),
            packs: UnitAcc::default(),
            pieces: UnitAcc::default(),
            monthly: [0.0; MONTHS_PER_YEAR],
        }
    }

    fn unit_slot(&mut self, category: UnitCategory) -> &mut UnitAcc {
        match category {
            UnitCategory::Box => &mut self.boxes,
            UnitCategory::Pack => &mut self.packs,
            UnitCategory::Piece => &mut self.pieces,
        }
    }
}

fn monthly_series(totals: &[f64; MONTHS_PER_YEAR]) -> Vec<MonthlySalesEntry> {
    let mut entries = Vec::with_capacity(MONTHS_PER_YEAR);
    for (idx, &total) in totals.iter().enumerate() {
        let (diff_amount, diff_percent) = if idx == 0 {
            (0.0, 0.0)
        } else {
            let prior = totals[idx - 1];
            (total - prior, growth_percent(total, prior))
        };
        entries.push(MonthlySalesEntry {
            month: idx as u32 + 1,
            total_sales: total,
            diff_amount,
            diff_percent,
        });
    }
    entries
}

/// Build the multi-month comparison report for one employee scope.
pub fn build_sales_comparison(input: SalesReportInput) -> SalesComparisonReport {
    let normalized = normalize_events(input.events, input.master, input.config.timezone);
    let month_start = input.month_start.clamp(1, MONTHS_PER_YEAR as u32);
    let month_end = input.month_end.clamp(1, MONTHS_PER_YEAR as u32);

    let mut skipped_rows = 0usize;
    // BTreeMap keys the accumulator by product code, which also gives the
    // report its ascending code order for free.
    let mut products: BTreeMap<String, ProductAcc> = BTreeMap::new();

    for record in &normalized.sales {
        if record.year != input.year
            || record.month < month_start
            || record.month > month_end
            || record.employee_name != input.employee
        {
            continue;
        }
        if let Some(store) = &input.store {
            if &record.store_name != store {
                continue;
            }
        }

        let Some(category) = input.config.unit_keywords.classify(&record.unit) else {
            skipped_rows += 1;
            log::debug!(
                "unit label {:?} on product {} matched no category; row skipped",
                record.unit,
                record.product_code
            );
            continue;
        };

        let acc = products
            .entry(record.product_code.clone())
            .or_insert_with(|| ProductAcc::new(record.product_name.clone()));
        let unit = acc.unit_slot(category);
        unit.quantity += record.quantity;
        unit.amount += record.total;
        unit.count += 1;
        acc.monthly[(record.month - 1) as usize] += record.total;
    }

    let mut year_total_sales = 0.0;
    let products: Vec<ProductComparison> = products
        .into_iter()
        .map(|(code, acc)| {
            let units = UnitBreakdown {
                boxes: acc.boxes.finalize(),
                packs: acc.packs.finalize(),
                pieces: acc.pieces.finalize(),
            };
            let total_sales_all_units =
                (units.boxes.total_amount + units.packs.total_amount + units.pieces.total_amount)
                    .round();
            year_total_sales += total_sales_all_units;
            ProductComparison {
                product_code: code,
                product_name: acc.name,
                units,
                total_sales_all_units,
                monthly: monthly_series(&acc.monthly),
            }
        })
        .collect();

    SalesComparisonReport {
        meta: SalesReportMeta {
            employee: input.employee,
            store: input.store,
            year: input.year,
            month_start,
            month_end,
            total_products: products.len(),
            year_total_sales,
            skipped_rows,
            generated_at: input.now.to_rfc3339(),
        },
        products,
    }
}
