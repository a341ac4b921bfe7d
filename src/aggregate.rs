//! Aggregation of a transaction snapshot into the views shown on the dashboard.
//!
//! Every function here is a single pass over the records with no I/O and no hidden state. The
//! output does not depend on the order of the input, and maps are `BTreeMap`s so that iterating
//! them is stable from one run to the next.

use crate::model::{MonthKey, TransactionRecord};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Expense totals keyed by category.
pub type CategoryTotals = BTreeMap<String, Decimal>;

/// Income and expense totals keyed by calendar month.
pub type MonthlyTotals = BTreeMap<MonthKey, MonthTotals>;

/// Overall income, expense and the difference between them.
///
/// Values are kept at full precision. Use `rounded` for display.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub income: Decimal,
    pub expense: Decimal,
    pub balance: Decimal,
}

impl Totals {
    /// A copy with every value rounded to two fractional digits.
    pub fn rounded(&self) -> Self {
        Self {
            income: self.income.round_dp(2),
            expense: self.expense.round_dp(2),
            balance: self.balance.round_dp(2),
        }
    }
}

/// One month bucket.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct MonthTotals {
    pub income: Decimal,
    pub expense: Decimal,
}

/// Sums income and expense over all records and derives the balance.
pub fn compute_totals(records: &[TransactionRecord]) -> Totals {
    let (income, expense) =
        records
            .iter()
            .fold((Decimal::ZERO, Decimal::ZERO), |(income, expense), r| {
                if r.transaction_type().is_income() {
                    (add(income, r.amount().value()), expense)
                } else {
                    (income, add(expense, r.amount().value()))
                }
            });
    Totals {
        income,
        expense,
        balance: income - expense,
    }
}

/// Sums expense amounts per category. Income records are ignored, so input without expenses
/// yields an empty map.
pub fn compute_category_totals(records: &[TransactionRecord]) -> CategoryTotals {
    let mut totals = CategoryTotals::new();
    for record in records
        .iter()
        .filter(|r| r.transaction_type().is_expense())
    {
        let total = totals.entry(record.category().to_string()).or_default();
        *total = add(*total, record.amount().value());
    }
    totals
}

/// Sums amounts per category across every record regardless of type.
pub fn compute_category_breakdown(records: &[TransactionRecord]) -> CategoryTotals {
    let mut totals = CategoryTotals::new();
    for record in records {
        let total = totals.entry(record.category().to_string()).or_default();
        *total = add(*total, record.amount().value());
    }
    totals
}

/// Buckets income and expense by calendar month.
///
/// Records whose date does not parse are left out of this view. They still count towards
/// `compute_totals` and the category sums.
pub fn compute_monthly_totals(records: &[TransactionRecord]) -> MonthlyTotals {
    let mut totals = MonthlyTotals::new();
    for record in records {
        let Some(month) = record.month() else {
            debug!(
                "Leaving transaction '{}' out of monthly totals, unparsable date '{}'",
                record.id(),
                record.date()
            );
            continue;
        };
        let bucket = totals.entry(month).or_default();
        if record.transaction_type().is_income() {
            bucket.income = add(bucket.income, record.amount().value());
        } else {
            bucket.expense = add(bucket.expense, record.amount().value());
        }
    }
    totals
}

/// Sums that would overflow saturate at `Decimal::MAX`. Amounts are never negative, so this is the
/// only direction a sum can overflow in.
fn add(sum: Decimal, amount: Decimal) -> Decimal {
    sum.checked_add(amount).unwrap_or_else(|| {
        warn!("A total exceeded the largest representable amount and was capped");
        Decimal::MAX
    })
}

/// All the derived views of one snapshot.
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub count: usize,
    pub totals: Totals,
    pub category_totals: CategoryTotals,
    pub monthly_totals: MonthlyTotals,
    pub category_breakdown: CategoryTotals,
}

impl Summary {
    pub fn new(records: &[TransactionRecord]) -> Self {
        Self {
            count: records.len(),
            totals: compute_totals(records),
            category_totals: compute_category_totals(records),
            monthly_totals: compute_monthly_totals(records),
            category_breakdown: compute_category_breakdown(records),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Amount, TransactionType};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn month(s: &str) -> MonthKey {
        MonthKey::from_str(s).unwrap()
    }

    fn record(
        id: &str,
        amount: &str,
        t: TransactionType,
        category: &str,
        date: &str,
    ) -> TransactionRecord {
        TransactionRecord::new(id, Amount::from_str(amount).unwrap(), t, category, date)
    }

    fn scenario() -> Vec<TransactionRecord> {
        vec![
            record("1", "50", TransactionType::Income, "", "2024-01-05"),
            record("2", "20", TransactionType::Expense, "food", "2024-01-10"),
            record("3", "10", TransactionType::Expense, "food", "2024-02-01"),
        ]
    }

    fn mixed() -> Vec<TransactionRecord> {
        vec![
            record("a", "1200.00", TransactionType::Income, "salary", "2024-03-01"),
            record("b", "87.43", TransactionType::Expense, "groceries", "2024-03-02"),
            record("c", "6.75", TransactionType::Expense, "coffee", "2024-03-15"),
            record("d", "0.10", TransactionType::Expense, "coffee", "2024-04-01"),
            record("e", "0.20", TransactionType::Expense, "groceries", "not a date"),
            record("f", "300", TransactionType::Income, "gift", "04/20/2024"),
            record(
                "g",
                "142.67",
                TransactionType::Expense,
                "utilities",
                "2024-04-16T06:00:00Z",
            ),
        ]
    }

    #[test]
    fn test_scenario_totals() {
        let totals = compute_totals(&scenario());
        assert_eq!(totals.income, dec("50"));
        assert_eq!(totals.expense, dec("30"));
        assert_eq!(totals.balance, dec("20"));
    }

    #[test]
    fn test_scenario_category_totals() {
        let categories = compute_category_totals(&scenario());
        assert_eq!(categories.len(), 1);
        assert_eq!(categories["food"], dec("30"));
    }

    #[test]
    fn test_scenario_monthly_totals() {
        let monthly = compute_monthly_totals(&scenario());
        assert_eq!(monthly.len(), 2);
        assert_eq!(
            monthly[&month("2024-01")],
            MonthTotals {
                income: dec("50"),
                expense: dec("20")
            }
        );
        assert_eq!(
            monthly[&month("2024-02")],
            MonthTotals {
                income: dec("0"),
                expense: dec("10")
            }
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(compute_totals(&[]), Totals::default());
        assert!(compute_category_totals(&[]).is_empty());
        assert!(compute_monthly_totals(&[]).is_empty());
        assert!(compute_category_breakdown(&[]).is_empty());
    }

    #[test]
    fn test_balance_identity() {
        let totals = compute_totals(&mixed());
        assert_eq!(totals.balance, totals.income - totals.expense);
        assert_eq!(totals.income, dec("1500.00"));
        assert_eq!(totals.expense, dec("237.15"));
    }

    #[test]
    fn test_income_only_has_no_categories() {
        let records = vec![
            record("1", "10", TransactionType::Income, "salary", "2024-01-01"),
            record("2", "15", TransactionType::Income, "gift", "2024-01-02"),
        ];
        assert!(compute_category_totals(&records).is_empty());
    }

    #[test]
    fn test_same_month_different_days_share_a_bucket() {
        let records = vec![
            record("1", "100", TransactionType::Income, "", "2024-03-01"),
            record("2", "40", TransactionType::Expense, "rent", "2024-03-31"),
        ];
        let monthly = compute_monthly_totals(&records);
        assert_eq!(monthly.len(), 1);
        assert_eq!(
            monthly[&month("2024-03")],
            MonthTotals {
                income: dec("100"),
                expense: dec("40")
            }
        );
    }

    #[test]
    fn test_unparsable_date_only_affects_monthly_view() {
        let records = mixed();
        let monthly = compute_monthly_totals(&records);
        let monthly_expense: Decimal = monthly.values().map(|m| m.expense).sum();
        assert_eq!(monthly_expense, dec("236.95"));
        assert_eq!(compute_totals(&records).expense, dec("237.15"));
        assert_eq!(compute_category_totals(&records)["groceries"], dec("87.63"));
    }

    #[test]
    fn test_mixed_date_layouts_bucket_together() {
        let monthly = compute_monthly_totals(&mixed());
        let april = monthly[&month("2024-04")];
        assert_eq!(april.income, dec("300"));
        assert_eq!(april.expense, dec("142.77"));
        let keys: Vec<String> = monthly.keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["2024-03", "2024-04"]);
    }

    #[test]
    fn test_category_breakdown_counts_all_types() {
        let breakdown = compute_category_breakdown(&mixed());
        assert_eq!(breakdown["salary"], dec("1200.00"));
        assert_eq!(breakdown["coffee"], dec("6.85"));
        assert_eq!(breakdown.len(), 5);
    }

    #[test]
    fn test_idempotent() {
        let records = mixed();
        assert_eq!(Summary::new(&records), Summary::new(&records));
    }

    #[test]
    fn test_order_independent() {
        let records = mixed();
        let mut reversed = records.clone();
        reversed.reverse();
        let mut rotated = records.clone();
        rotated.rotate_left(3);
        let expected = Summary::new(&records);
        assert_eq!(Summary::new(&reversed), expected);
        assert_eq!(Summary::new(&rotated), expected);
    }

    #[test]
    fn test_full_precision_then_rounded() {
        let records = vec![
            record("1", "0.005", TransactionType::Income, "", "2024-01-01"),
            record("2", "0.005", TransactionType::Income, "", "2024-01-01"),
        ];
        let totals = compute_totals(&records);
        assert_eq!(totals.income, dec("0.010"));
        assert_eq!(totals.rounded().income, dec("0.01"));
    }

    #[test]
    fn test_deletion_excludes_record() {
        let records = scenario();
        let remaining: Vec<TransactionRecord> = records
            .iter()
            .filter(|r| r.id().as_str() != "2")
            .cloned()
            .collect();
        assert_eq!(remaining.len(), 2);
        let totals = compute_totals(&remaining);
        assert_eq!(totals.expense, dec("10"));
        assert_eq!(compute_category_totals(&remaining)["food"], dec("10"));
    }

    #[test]
    fn test_huge_amounts_saturate() {
        let json = r#"[
            {"id": 1, "amount": "50000000000000000000000000000", "type": "expense", "category": "x", "date": "2024-01-01"},
            {"id": 2, "amount": "50000000000000000000000000000", "type": "expense", "category": "x", "date": "2024-01-02"}
        ]"#;
        let records: Vec<TransactionRecord> = serde_json::from_str(json).unwrap();
        let summary = Summary::new(&records);
        assert_eq!(summary.totals.expense, Decimal::MAX);
        assert_eq!(summary.totals.balance, -Decimal::MAX);
        assert_eq!(summary.category_totals["x"], Decimal::MAX);
        assert_eq!(summary.category_breakdown["x"], Decimal::MAX);
        assert_eq!(summary.monthly_totals[&month("2024-01")].expense, Decimal::MAX);
    }
}
