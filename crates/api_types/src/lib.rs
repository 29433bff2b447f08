use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error payload returned with every non-2xx response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    /// Stable machine code, e.g. `invalid_range_specification`.
    pub code: String,
}

/// Body returned by deletes.
#[derive(Debug, Serialize, Deserialize)]
pub struct Deleted {
    pub id: Uuid,
}

pub mod movement {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum MovementKind {
        #[serde(alias = "ingreso")]
        Income,
        #[serde(alias = "egreso")]
        Expense,
    }

    /// Amount as typed by a client: a JSON number or a decimal string
    /// (`"1500"`, `"12,50"`).
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(untagged)]
    pub enum AmountInput {
        Number(f64),
        Text(String),
    }

    /// Query string of `GET /movements`. Blank values are ignored.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct MovementListQuery {
        pub concept: Option<String>,
        pub kind: Option<String>,
        /// `YYYY-MM-DD`, inclusive.
        pub date_from: Option<String>,
        /// `YYYY-MM-DD`, inclusive.
        pub date_to: Option<String>,
        pub owner_user_id: Option<String>,
        /// Zero-based.
        pub page: Option<u64>,
        pub page_size: Option<u64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MovementNew {
        pub amount: AmountInput,
        pub concept: Option<String>,
        /// RFC 3339 or `YYYY-MM-DD`; defaults to now.
        pub occurred_at: Option<String>,
        /// Defaults to income.
        pub kind: Option<MovementKind>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct MovementUpdate {
        pub amount: Option<AmountInput>,
        pub concept: Option<String>,
        pub occurred_at: Option<String>,
        pub kind: Option<MovementKind>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Movement {
        pub id: Uuid,
        pub concept: String,
        /// Integer cents.
        pub amount_minor: i64,
        /// Plain decimal, as exported to CSV.
        pub amount: String,
        /// Rounded, grouped display string.
        pub amount_display: String,
        pub occurred_at: DateTime<Utc>,
        pub kind: MovementKind,
        pub owner_user_id: Uuid,
        pub owner_name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MovementPage {
        pub items: Vec<Movement>,
        pub total_count: u64,
        pub page: u64,
        pub page_size: u64,
        /// The page starts past the filtered set; request page 0 instead.
        pub past_end: bool,
        /// Why `items` is empty, when it is.
        pub empty_reason: Option<String>,
    }
}

pub mod report {
    use super::*;

    /// Query string shared by `GET /reports` and `GET /reports/csv`.
    ///
    /// Exactly one of `month`, `year` or `view=year` must be given.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ReportQuery {
        /// `YYYY-MM`: one bucket per day.
        pub month: Option<String>,
        /// `YYYY`: one bucket per month.
        pub year: Option<String>,
        /// `year`: one bucket per year over the last six.
        pub view: Option<String>,
        pub kind: Option<String>,
        pub owner_user_id: Option<String>,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Granularity {
        Day,
        Month,
        Year,
    }

    /// Two parallel arrays of integer cents, indexed like `labels`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct Report {
        pub granularity: Granularity,
        pub labels: Vec<String>,
        pub income: Vec<i64>,
        pub expense: Vec<i64>,
        pub income_total: i64,
        pub expense_total: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Balance {
        pub balance_minor: i64,
        pub balance_display: String,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct MonthSummaryQuery {
        pub month: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthSummary {
        pub month: String,
        pub label: String,
        pub income_total: i64,
        pub expense_total: i64,
        pub income_total_previous_month: i64,
        pub expense_total_previous_month: i64,
        /// `None` when the previous month is zero and this one is not.
        pub income_change_percent: Option<i64>,
        pub expense_change_percent: Option<i64>,
    }
}

pub mod user {
    use super::*;

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct UserListQuery {
        /// Substring of the display name or email.
        pub q: Option<String>,
        pub role: Option<String>,
        pub status: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserNew {
        pub email: String,
        pub display_name: Option<String>,
        pub phone: Option<String>,
        /// `ADMIN` or `USER` (other known spellings are accepted).
        pub role: Option<String>,
        /// `Active` or `Inactive`.
        pub status: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct UserUpdate {
        pub email: Option<String>,
        pub display_name: Option<String>,
        pub phone: Option<String>,
        pub role: Option<String>,
        pub status: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct User {
        pub id: Uuid,
        pub display_name: String,
        pub email: String,
        pub phone: Option<String>,
        pub role: String,
        pub status: String,
        pub created_at: DateTime<Utc>,
        /// Where this user lands after signing in.
        pub landing_path: String,
    }
}
