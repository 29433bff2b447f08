//! Time-bucketed aggregation.
//!
//! A report window is chosen by exactly one selector (a month, a year, or the
//! rolling six year view). Movements inside the window are summed into two
//! parallel arrays, one for income and one for expense, indexed by bucket.
//! Amounts are summed unsigned; the array is picked by the kind.

use chrono::{DateTime, Datelike, Utc};

use crate::{
    EngineError, Money, MovementKind, ResultEngine,
    dates::{MONTH_NAMES, YearMonth, parse_year, utc_year_range},
};

/// Years covered by the rolling view, current year included.
pub const ROLLING_YEARS: usize = 6;
pub const DAY_BUCKETS: usize = 31;
pub const MONTH_BUCKETS: usize = 12;

/// Raw window selector as received from a caller.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WindowSelector {
    /// `YYYY-MM`, day buckets.
    pub month: Option<String>,
    /// `YYYY`, month buckets.
    pub year: Option<String>,
    /// Rolling six year view, year buckets.
    pub rolling: bool,
}

impl WindowSelector {
    pub fn month(token: impl Into<String>) -> Self {
        Self {
            month: Some(token.into()),
            ..Default::default()
        }
    }

    pub fn year(token: impl Into<String>) -> Self {
        Self {
            year: Some(token.into()),
            ..Default::default()
        }
    }

    pub fn rolling() -> Self {
        Self {
            rolling: true,
            ..Default::default()
        }
    }

    /// Checks that exactly one selector is set, then parses it.
    ///
    /// `now` anchors the rolling view.
    pub fn resolve(&self, now: DateTime<Utc>) -> ResultEngine<ReportWindow> {
        let month = self.month.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let year = self.year.as_deref().map(str::trim).filter(|s| !s.is_empty());

        let selected = usize::from(month.is_some()) + usize::from(year.is_some()) + usize::from(self.rolling);
        if selected != 1 {
            return Err(EngineError::InvalidRangeSpecification(
                "exactly one of month (YYYY-MM), year (YYYY) or the rolling year view must be given"
                    .to_string(),
            ));
        }

        if let Some(month) = month {
            return Ok(ReportWindow::Month(month.parse()?));
        }
        if let Some(year) = year {
            return Ok(ReportWindow::Year(parse_year(year)?));
        }
        Ok(ReportWindow::rolling_until(now.year()))
    }
}

/// A validated report window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportWindow {
    Month(YearMonth),
    Year(i32),
    /// `first..=last`, always [`ROLLING_YEARS`] long.
    RollingYears { first: i32, last: i32 },
}

impl ReportWindow {
    pub fn rolling_until(last: i32) -> Self {
        Self::RollingYears {
            first: last - (ROLLING_YEARS as i32 - 1),
            last,
        }
    }

    /// Half-open UTC range covered by the window.
    pub fn range(&self) -> ResultEngine<(DateTime<Utc>, DateTime<Utc>)> {
        match *self {
            Self::Month(month) => month.range(),
            Self::Year(year) => utc_year_range(year),
            Self::RollingYears { first, last } => {
                let (start, _) = utc_year_range(first)?;
                let (_, end) = utc_year_range(last)?;
                Ok((start, end))
            }
        }
    }

    fn bucket_count(&self) -> usize {
        match self {
            Self::Month(_) => DAY_BUCKETS,
            Self::Year(_) => MONTH_BUCKETS,
            Self::RollingYears { .. } => ROLLING_YEARS,
        }
    }

    fn bucket_index(&self, at: DateTime<Utc>) -> Option<usize> {
        let index = match self {
            Self::Month(_) => i64::from(at.day()) - 1,
            Self::Year(_) => i64::from(at.month0()),
            Self::RollingYears { first, .. } => i64::from(at.year()) - i64::from(*first),
        };
        usize::try_from(index)
            .ok()
            .filter(|i| *i < self.bucket_count())
    }

    fn labels(&self) -> Vec<String> {
        match self {
            Self::Month(_) => (1..=DAY_BUCKETS).map(|d| d.to_string()).collect(),
            Self::Year(_) => MONTH_NAMES.iter().map(ToString::to_string).collect(),
            Self::RollingYears { first, last } => (*first..=*last).map(|y| y.to_string()).collect(),
        }
    }

    /// Sums `entries` into this window's buckets.
    ///
    /// Entries outside the window, or whose bucket falls outside the arrays,
    /// are skipped.
    pub fn aggregate<I>(&self, entries: I) -> ResultEngine<Report>
    where
        I: IntoIterator<Item = (DateTime<Utc>, MovementKind, Money)>,
    {
        let (start, end) = self.range()?;
        let mut buckets = Buckets::empty(self.labels());
        for (at, kind, amount) in entries {
            if at < start || at >= end {
                continue;
            }
            let Some(index) = self.bucket_index(at) else {
                continue;
            };
            match kind {
                MovementKind::Income => accumulate(&mut buckets.income[index], amount)?,
                MovementKind::Expense => accumulate(&mut buckets.expense[index], amount)?,
            }
        }

        Ok(match *self {
            Self::Month(month) => Report::Daily { month, buckets },
            Self::Year(year) => Report::Monthly { year, buckets },
            Self::RollingYears { first, last } => Report::Yearly {
                first,
                last,
                buckets,
            },
        })
    }
}

/// Bucket labels with the two parallel accumulators.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Buckets {
    pub labels: Vec<String>,
    pub income: Vec<Money>,
    pub expense: Vec<Money>,
}

impl Buckets {
    fn empty(labels: Vec<String>) -> Self {
        let len = labels.len();
        Self {
            labels,
            income: vec![Money::ZERO; len],
            expense: vec![Money::ZERO; len],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Report {
    /// Day of month, 31 buckets. Days past the month's end stay zero.
    Daily { month: YearMonth, buckets: Buckets },
    /// Month of year, January first.
    Monthly { year: i32, buckets: Buckets },
    /// One bucket per year in `first..=last`.
    Yearly {
        first: i32,
        last: i32,
        buckets: Buckets,
    },
}

impl Report {
    pub fn buckets(&self) -> &Buckets {
        match self {
            Self::Daily { buckets, .. }
            | Self::Monthly { buckets, .. }
            | Self::Yearly { buckets, .. } => buckets,
        }
    }

    /// Income and expense summed across every bucket.
    pub fn totals(&self) -> Totals {
        let buckets = self.buckets();
        Totals {
            income: buckets.income.iter().sum(),
            expense: buckets.expense.iter().sum(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Totals {
    pub income: Money,
    pub expense: Money,
}

/// Adds `amount` into `slot`, failing instead of wrapping.
fn accumulate(slot: &mut Money, amount: Money) -> ResultEngine<()> {
    *slot = slot
        .checked_add(amount)
        .ok_or_else(|| EngineError::InvalidAmount("amount total overflows".to_string()))?;
    Ok(())
}

impl Totals {
    pub fn add(&mut self, kind: MovementKind, amount: Money) -> ResultEngine<()> {
        match kind {
            MovementKind::Income => accumulate(&mut self.income, amount),
            MovementKind::Expense => accumulate(&mut self.expense, amount),
        }
    }

    pub fn net(&self) -> Money {
        self.income - self.expense
    }
}

/// Global all-time balance: income minus expense.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Balance {
    pub balance: Money,
}

/// A month's totals next to the previous month's.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MonthSummary {
    pub month: YearMonth,
    pub current: Totals,
    pub previous: Totals,
}

impl MonthSummary {
    pub fn income_change_percent(&self) -> Option<i64> {
        percent_change(self.current.income, self.previous.income)
    }

    pub fn expense_change_percent(&self) -> Option<i64> {
        percent_change(self.current.expense, self.previous.expense)
    }
}

/// Whole percent change from `previous` to `current`, halves rounded up.
///
/// `None` when `previous` is zero and `current` is not: there is no
/// meaningful percentage.
pub fn percent_change(current: Money, previous: Money) -> Option<i64> {
    if previous.is_zero() {
        return current.is_zero().then_some(0);
    }
    let current = current.cents() as f64;
    let previous = previous.cents() as f64;
    Some(((current - previous) / previous * 100.0 + 0.5).floor() as i64)
}
