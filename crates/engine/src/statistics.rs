//! Per-category spending breakdown over a date range.

use chrono::{Datelike, Months, NaiveDate};

use crate::{EngineError, MoneyCents, ResultEngine};

/// Inclusive date range. `from` is never after `to`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
    from: NaiveDate,
    to: NaiveDate,
}

impl DateRange {
    /// Builds a range, swapping the bounds when they come in reverse order.
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        if from <= to {
            Self { from, to }
        } else {
            Self { from: to, to: from }
        }
    }

    /// First to last day of the month containing `today`.
    pub fn current_month(today: NaiveDate) -> ResultEngine<Self> {
        let invalid = || EngineError::InvalidDate(format!("no month boundary for {today}"));
        let from = today.with_day(1).ok_or_else(invalid)?;
        let to = from
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .ok_or_else(invalid)?;
        Ok(Self { from, to })
    }

    pub fn from(&self) -> NaiveDate {
        self.from
    }

    pub fn to(&self) -> NaiveDate {
        self.to
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryShare {
    pub category: String,
    pub amount: MoneyCents,
    /// Share of the total, e.g. `"42.50%"`.
    pub percentage: String,
}

/// Formats `amount / total` as a percentage with two decimals.
///
/// A zero total gives `"0.00%"`.
pub fn percentage_of(amount: MoneyCents, total: MoneyCents) -> String {
    if total.is_zero() {
        return "0.00%".to_string();
    }
    // Hundredths of a percent, rounded half away from zero.
    let scaled = i128::from(amount.cents()) * 10_000;
    let total = i128::from(total.cents());
    let mut basis = scaled / total;
    let rem = scaled % total;
    if rem.abs() * 2 >= total.abs() {
        basis += if (scaled < 0) == (total < 0) { 1 } else { -1 };
    }
    let sign = if basis < 0 { "-" } else { "" };
    let basis = basis.abs();
    format!("{sign}{}.{:02}%", basis / 100, basis % 100)
}

/// Rows for the statistics view, biggest spend first.
pub fn category_breakdown<I>(total: MoneyCents, sums: I) -> Vec<CategoryShare>
where
    I: IntoIterator<Item = (String, MoneyCents)>,
{
    let mut rows: Vec<CategoryShare> = sums
        .into_iter()
        .map(|(category, amount)| CategoryShare {
            percentage: percentage_of(amount, total),
            category,
            amount,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.amount
            .cmp(&a.amount)
            .then_with(|| a.category.cmp(&b.category))
    });
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn current_month_spans_whole_month() {
        let range = DateRange::current_month(date(2024, 2, 17)).unwrap();
        assert_eq!(range.from(), date(2024, 2, 1));
        assert_eq!(range.to(), date(2024, 2, 29));

        let range = DateRange::current_month(date(2025, 12, 31)).unwrap();
        assert_eq!(range.to(), date(2025, 12, 31));
    }

    #[test]
    fn reversed_range_is_swapped() {
        let range = DateRange::new(date(2025, 5, 10), date(2025, 5, 1));
        assert_eq!(range.from(), date(2025, 5, 1));
        assert_eq!(range.to(), date(2025, 5, 10));
    }

    #[test]
    fn percentages_use_two_decimals() {
        assert_eq!(percentage_of(MoneyCents::new(1), MoneyCents::new(3)), "33.33%");
        assert_eq!(percentage_of(MoneyCents::new(2), MoneyCents::new(3)), "66.67%");
        assert_eq!(percentage_of(MoneyCents::new(500), MoneyCents::new(500)), "100.00%");
    }

    #[test]
    fn zero_total_does_not_divide() {
        assert_eq!(percentage_of(MoneyCents::new(100), MoneyCents::ZERO), "0.00%");
    }

    #[test]
    fn breakdown_sorted_by_amount_then_name() {
        let rows = category_breakdown(
            MoneyCents::new(10_000),
            vec![
                ("transport".to_string(), MoneyCents::new(2_500)),
                ("food".to_string(), MoneyCents::new(5_000)),
                ("bills".to_string(), MoneyCents::new(2_500)),
            ],
        );
        let names: Vec<&str> = rows.iter().map(|r| r.category.as_str()).collect();
        assert_eq!(names, vec!["food", "bills", "transport"]);
        assert_eq!(rows[0].percentage, "50.00%");
        assert_eq!(rows[1].percentage, "25.00%");
    }
}
