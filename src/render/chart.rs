//! Text renditions of the dashboard charts.

use crate::aggregate::{CategoryTotals, MonthlyTotals};
use crate::render::money;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::fmt::Write;
use tracing::trace;

/// Label of the single slice drawn when a category chart has nothing to show.
pub(crate) const PLACEHOLDER_LABEL: &str = "No expenses";

const BAR: char = '█';

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ChartKind {
    Pie,
    Doughnut,
    Bar,
}

/// One named list of values, aligned with the chart's labels.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Series {
    pub(crate) name: String,
    pub(crate) values: Vec<Decimal>,
}

/// A chart built from one snapshot. Charts are never updated in place; the `RenderContext`
/// destroys the old one and builds a new one on every refresh.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Chart {
    id: u64,
    kind: ChartKind,
    title: String,
    labels: Vec<String>,
    series: Vec<Series>,
    placeholder: bool,
}

impl Chart {
    /// A pie or doughnut of category sums. An empty map becomes a single placeholder slice.
    pub(crate) fn categories(
        id: u64,
        kind: ChartKind,
        title: impl Into<String>,
        totals: &CategoryTotals,
    ) -> Self {
        let placeholder = totals.is_empty();
        let (labels, values) = if placeholder {
            (vec![PLACEHOLDER_LABEL.to_string()], vec![Decimal::ONE])
        } else {
            totals
                .iter()
                .map(|(category, total)| (display_category(category), *total))
                .unzip()
        };
        Self {
            id,
            kind,
            title: title.into(),
            labels,
            series: vec![Series {
                name: String::new(),
                values,
            }],
            placeholder,
        }
    }

    /// A grouped bar chart of income against expense per month, oldest month first.
    pub(crate) fn monthly(id: u64, title: impl Into<String>, totals: &MonthlyTotals) -> Self {
        let labels = totals.keys().map(|m| m.label()).collect();
        let income = totals.values().map(|m| m.income).collect();
        let expense = totals.values().map(|m| m.expense).collect();
        Self {
            id,
            kind: ChartKind::Bar,
            title: title.into(),
            labels,
            series: vec![
                Series {
                    name: "Income".to_string(),
                    values: income,
                },
                Series {
                    name: "Expense".to_string(),
                    values: expense,
                },
            ],
            placeholder: false,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn kind(&self) -> ChartKind {
        self.kind
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn series(&self) -> &[Series] {
        &self.series
    }

    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    /// Tears the chart down. Called by the `RenderContext` before a replacement is assigned.
    pub(crate) fn destroy(self) {
        trace!("Destroying {:?} chart #{} '{}'", self.kind, self.id, self.title);
    }

    /// Draws the chart with bars at most `width` characters long.
    pub(crate) fn render(&self, width: usize) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.title);
        if self.placeholder {
            let _ = writeln!(out, "  {}", PLACEHOLDER_LABEL);
            return out;
        }
        if self.labels.is_empty() {
            let _ = writeln!(out, "  (no data)");
            return out;
        }
        match self.kind {
            ChartKind::Pie | ChartKind::Doughnut => self.render_shares(&mut out, width),
            ChartKind::Bar => self.render_bars(&mut out, width),
        }
        out
    }

    fn render_shares(&self, out: &mut String, width: usize) {
        let values = self
            .series
            .first()
            .map(|s| s.values.as_slice())
            .unwrap_or_default();
        let total = values.iter().fold(Decimal::ZERO, |sum, v| {
            sum.checked_add(*v).unwrap_or(Decimal::MAX)
        });
        let label_width = self.labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        for (label, value) in self.labels.iter().zip(values) {
            let share = if total.is_zero() {
                0.0
            } else {
                (value / total).to_f64().unwrap_or_default()
            };
            let _ = writeln!(
                out,
                "  {label:<label_width$}  {:<width$}  {:>12}  {:>5.1}%",
                bar(share, width),
                money(*value),
                share * 100.0,
            );
        }
    }

    fn render_bars(&self, out: &mut String, width: usize) {
        let max = self
            .series
            .iter()
            .flat_map(|s| s.values.iter())
            .max()
            .copied()
            .unwrap_or_default();
        let label_width = self.labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let name_width = self.series.iter().map(|s| s.name.len()).max().unwrap_or(0);
        for (ix, label) in self.labels.iter().enumerate() {
            for (n, series) in self.series.iter().enumerate() {
                let value = series.values.get(ix).copied().unwrap_or_default();
                let fraction = if max.is_zero() {
                    0.0
                } else {
                    (value / max).to_f64().unwrap_or_default()
                };
                let shown_label = if n == 0 { label.as_str() } else { "" };
                let _ = writeln!(
                    out,
                    "  {shown_label:<label_width$}  {:<name_width$}  {:<width$}  {:>12}",
                    series.name,
                    bar(fraction, width),
                    money(value),
                );
            }
        }
    }
}

fn display_category(category: &str) -> String {
    if category.trim().is_empty() {
        "(uncategorized)".to_string()
    } else {
        category.to_string()
    }
}

/// A bar of `fraction * width` blocks, at least one block for any non-zero fraction.
fn bar(fraction: f64, width: usize) -> String {
    if fraction <= 0.0 {
        return String::new();
    }
    let len = ((fraction * width as f64).round() as usize).clamp(1, width.max(1));
    std::iter::repeat(BAR).take(len).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::MonthTotals;
    use crate::model::MonthKey;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_empty_categories_use_placeholder() {
        let chart = Chart::categories(1, ChartKind::Pie, "Expenses", &CategoryTotals::new());
        assert!(chart.is_placeholder());
        assert_eq!(chart.labels(), &[PLACEHOLDER_LABEL.to_string()]);
        assert_eq!(chart.series()[0].values, vec![Decimal::ONE]);
        assert!(chart.render(10).contains(PLACEHOLDER_LABEL));
    }

    #[test]
    fn test_pie_shares() {
        let mut totals = CategoryTotals::new();
        totals.insert("food".to_string(), dec("30"));
        totals.insert("rent".to_string(), dec("90"));
        let chart = Chart::categories(1, ChartKind::Pie, "Expenses", &totals);
        let text = chart.render(20);
        let food = text.lines().find(|l| l.contains("food")).unwrap();
        let rent = text.lines().find(|l| l.contains("rent")).unwrap();
        assert!(food.contains("25.0%"));
        assert!(rent.contains("75.0%"));
        assert_eq!(rent.matches(BAR).count(), 15);
        assert_eq!(food.matches(BAR).count(), 5);
    }

    #[test]
    fn test_blank_category_label() {
        let mut totals = CategoryTotals::new();
        totals.insert(String::new(), dec("5"));
        let chart = Chart::categories(1, ChartKind::Doughnut, "Breakdown", &totals);
        assert_eq!(chart.labels(), &["(uncategorized)".to_string()]);
    }

    #[test]
    fn test_monthly_bars_in_order() {
        let mut totals = MonthlyTotals::new();
        totals.insert(
            MonthKey::from_str("2024-02").unwrap(),
            MonthTotals {
                income: dec("0"),
                expense: dec("10"),
            },
        );
        totals.insert(
            MonthKey::from_str("2024-01").unwrap(),
            MonthTotals {
                income: dec("50"),
                expense: dec("20"),
            },
        );
        let chart = Chart::monthly(2, "Monthly", &totals);
        assert_eq!(chart.labels(), &["Jan 2024".to_string(), "Feb 2024".to_string()]);
        assert_eq!(chart.series()[0].values, vec![dec("50"), dec("0")]);
        assert_eq!(chart.series()[1].values, vec![dec("20"), dec("10")]);

        let text = chart.render(10);
        let first_income = text.lines().nth(1).unwrap();
        assert!(first_income.contains("Jan 2024"));
        assert_eq!(first_income.matches(BAR).count(), 10);
    }

    #[test]
    fn test_bar_lengths() {
        assert_eq!(bar(0.0, 10), "");
        assert_eq!(bar(0.001, 10).chars().count(), 1);
        assert_eq!(bar(1.0, 10).chars().count(), 10);
        assert_eq!(bar(0.5, 10).chars().count(), 5);
    }

    #[test]
    fn test_shares_of_capped_totals() {
        let totals = CategoryTotals::from([
            ("a".to_string(), Decimal::MAX),
            ("b".to_string(), Decimal::MAX),
        ]);
        let chart = Chart::categories(3, ChartKind::Doughnut, "Breakdown", &totals);
        let text = chart.render(10);
        assert_eq!(text.lines().count(), 3);
        assert!(text.contains("100.0%"));
    }
}
