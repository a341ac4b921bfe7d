//! Paints aggregator output as terminal text.
//!
//! The `RenderContext` owns the charts that are currently on screen. Every refresh destroys the
//! previous chart in a slot before the new one is assigned, so a long-running `dashboard --watch`
//! never accumulates stale chart state.

mod chart;
mod table;

use crate::aggregate::Summary;
use crate::model::TransactionRecord;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::fmt::Write;

pub use chart::{Chart, ChartKind, Series};

const DEFAULT_BAR_WIDTH: usize = 32;

/// Holds the current chart handles and hands out chart ids.
#[derive(Debug)]
pub struct RenderContext {
    bar_width: usize,
    next_id: u64,
    destroyed: u64,
    category_chart: Option<Chart>,
    monthly_chart: Option<Chart>,
    report_category_chart: Option<Chart>,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new(DEFAULT_BAR_WIDTH)
    }
}

impl RenderContext {
    pub fn new(bar_width: usize) -> Self {
        Self {
            bar_width,
            next_id: 1,
            destroyed: 0,
            category_chart: None,
            monthly_chart: None,
            report_category_chart: None,
        }
    }

    /// The expense-by-category pie on the dashboard.
    pub fn category_chart(&self) -> Option<&Chart> {
        self.category_chart.as_ref()
    }

    /// The monthly income vs expense bars on the report.
    pub fn monthly_chart(&self) -> Option<&Chart> {
        self.monthly_chart.as_ref()
    }

    /// The all-transactions category doughnut on the report.
    pub fn report_category_chart(&self) -> Option<&Chart> {
        self.report_category_chart.as_ref()
    }

    /// How many charts have been torn down so far.
    pub fn destroyed(&self) -> u64 {
        self.destroyed
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Paints the totals, the category pie and the (optionally filtered) transaction table.
    pub fn render_dashboard(
        &mut self,
        records: &[TransactionRecord],
        summary: &Summary,
        search: Option<&str>,
    ) -> String {
        let id = self.next_id();
        let chart = Chart::categories(
            id,
            ChartKind::Pie,
            "Expenses by category",
            &summary.category_totals,
        );
        let chart = replace(&mut self.category_chart, chart, &mut self.destroyed);

        let mut out = String::new();
        let _ = writeln!(out, "{}", render_totals(summary));
        let _ = writeln!(out, "{}", chart.render(self.bar_width));
        out.push_str(&render_records(records, search));
        out
    }

    /// Paints the monthly bars and the all-transactions category breakdown.
    pub fn render_report(&mut self, summary: &Summary) -> String {
        let id = self.next_id();
        let monthly = Chart::monthly(id, "Monthly income vs expense", &summary.monthly_totals);
        let id = self.next_id();
        let breakdown = Chart::categories(
            id,
            ChartKind::Doughnut,
            "Category breakdown (all transactions)",
            &summary.category_breakdown,
        );

        let mut out = String::new();
        let monthly = replace(&mut self.monthly_chart, monthly, &mut self.destroyed);
        let _ = writeln!(out, "{}", monthly.render(self.bar_width));
        let breakdown = replace(
            &mut self.report_category_chart,
            breakdown,
            &mut self.destroyed,
        );
        out.push_str(&breakdown.render(self.bar_width));
        out
    }
}

/// Destroys whatever occupies `slot`, then installs `chart` there.
fn replace<'a>(slot: &'a mut Option<Chart>, chart: Chart, destroyed: &mut u64) -> &'a Chart {
    if let Some(old) = slot.take() {
        old.destroy();
        *destroyed += 1;
    }
    slot.insert(chart)
}

/// The income, expense and balance line, rounded to cents.
pub(crate) fn render_totals(summary: &Summary) -> String {
    let totals = summary.totals.rounded();
    format!(
        "Income: {}   Expense: {}   Balance: {}   ({} transactions)",
        money(totals.income),
        money(totals.expense),
        money(totals.balance),
        summary.count
    )
}

/// The transaction table, filtered by `search` when given.
pub(crate) fn render_records(records: &[TransactionRecord], search: Option<&str>) -> String {
    table::render(&table::rows(records, search))
}

/// Whether `record` would stay visible in the table when filtering by `search`.
pub(crate) fn record_matches(record: &TransactionRecord, search: &str) -> bool {
    table::Row::new(record).matches(search)
}

/// Formats a value with thousands separators and two decimals, keeping the sign.
pub(crate) fn money(value: Decimal) -> String {
    let value = value.round_dp(2);
    let formatted = format_num::format_num!(",.2", value.abs().to_f64().unwrap_or_default());
    if value.is_sign_negative() && !value.is_zero() {
        format!("-{formatted}")
    } else {
        formatted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Amount, TransactionType};
    use std::str::FromStr;

    fn records() -> Vec<TransactionRecord> {
        vec![
            TransactionRecord::new(
                "1",
                Amount::from_str("50").unwrap(),
                TransactionType::Income,
                "",
                "2024-01-05",
            ),
            TransactionRecord::new(
                "2",
                Amount::from_str("20").unwrap(),
                TransactionType::Expense,
                "food",
                "2024-01-10",
            ),
            TransactionRecord::new(
                "3",
                Amount::from_str("10").unwrap(),
                TransactionType::Expense,
                "food",
                "2024-02-01",
            ),
        ]
    }

    #[test]
    fn test_money() {
        assert_eq!(money(Decimal::from_str("1234.5").unwrap()), "1,234.50");
        assert_eq!(money(Decimal::from_str("-20").unwrap()), "-20.00");
    }

    #[test]
    fn test_dashboard_contents() {
        let records = records();
        let summary = Summary::new(&records);
        let mut ctx = RenderContext::new(10);
        let text = ctx.render_dashboard(&records, &summary, None);
        assert!(text.contains("Income: 50.00"));
        assert!(text.contains("Expense: 30.00"));
        assert!(text.contains("Balance: 20.00"));
        assert!(text.contains("Expenses by category"));
        assert!(text.contains("food"));
        assert_eq!(ctx.category_chart().unwrap().kind(), ChartKind::Pie);
    }

    #[test]
    fn test_refresh_replaces_chart() {
        let records = records();
        let summary = Summary::new(&records);
        let mut ctx = RenderContext::default();
        let _ = ctx.render_dashboard(&records, &summary, None);
        let first = ctx.category_chart().unwrap().id();
        assert_eq!(ctx.destroyed(), 0);

        let _ = ctx.render_dashboard(&records, &summary, None);
        let second = ctx.category_chart().unwrap().id();
        assert_ne!(first, second);
        assert_eq!(ctx.destroyed(), 1);
    }

    #[test]
    fn test_report_fills_both_slots() {
        let records = records();
        let summary = Summary::new(&records);
        let mut ctx = RenderContext::default();
        let text = ctx.render_report(&summary);
        assert!(text.contains("Jan 2024"));
        assert!(text.contains("Feb 2024"));
        assert!(text.contains("(uncategorized)"));
        assert_eq!(ctx.monthly_chart().unwrap().kind(), ChartKind::Bar);
        assert_eq!(
            ctx.report_category_chart().unwrap().kind(),
            ChartKind::Doughnut
        );
        assert!(ctx.category_chart().is_none());

        let _ = ctx.render_report(&summary);
        assert_eq!(ctx.destroyed(), 2);
    }

    #[test]
    fn test_dashboard_without_expenses_shows_placeholder() {
        let records: Vec<TransactionRecord> = records().into_iter().take(1).collect();
        let summary = Summary::new(&records);
        let mut ctx = RenderContext::default();
        let text = ctx.render_dashboard(&records, &summary, None);
        assert!(ctx.category_chart().unwrap().is_placeholder());
        assert!(text.contains(chart::PLACEHOLDER_LABEL));
    }
}
