//! Report API endpoints

use api_types::report::{Balance, Granularity, MonthSummary, MonthSummaryQuery, Report, ReportQuery};
use axum::{
    Extension, Json,
    extract::{Query, State},
    http::header,
    response::IntoResponse,
};
use chrono::Utc;
use engine::{Actor, Money, MovementKind, WindowSelector, YearMonth, format_currency_display};
use uuid::Uuid;

use crate::{ServerError, params, server::ServerState};

const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

struct Scope {
    selector: WindowSelector,
    kind: Option<MovementKind>,
    owner_user_id: Option<Uuid>,
}

/// `view=year` (or the legacy `año`) selects the rolling year view; any other
/// non-blank view is rejected.
fn scope(query: ReportQuery) -> Result<Scope, ServerError> {
    let rolling = match params::non_blank(query.view).as_deref() {
        None => false,
        Some("year" | "año") => true,
        Some(other) => {
            return Err(ServerError::Engine(
                engine::EngineError::InvalidRangeSpecification(format!("unknown view: {other}")),
            ));
        }
    };
    Ok(Scope {
        selector: WindowSelector {
            month: params::non_blank(query.month),
            year: params::non_blank(query.year),
            rolling,
        },
        kind: params::kind(query.kind)?,
        owner_user_id: params::uuid(query.owner_user_id, "owner_user_id")?,
    })
}

fn cents(values: &[Money]) -> Vec<i64> {
    values.iter().map(|m| m.cents()).collect()
}

/// Handle requests for bucketed income/expense totals
pub async fn report(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<Report>, ServerError> {
    let scope = scope(query)?;
    let report = state
        .engine
        .get_report(&actor, &scope.selector, scope.kind, scope.owner_user_id)
        .await?;

    let granularity = match &report {
        engine::Report::Daily { .. } => Granularity::Day,
        engine::Report::Monthly { .. } => Granularity::Month,
        engine::Report::Yearly { .. } => Granularity::Year,
    };
    let totals = report.totals();
    let buckets = report.buckets();
    Ok(Json(Report {
        granularity,
        labels: buckets.labels.clone(),
        income: cents(&buckets.income),
        expense: cents(&buckets.expense),
        income_total: totals.income.cents(),
        expense_total: totals.expense.cents(),
    }))
}

/// Handle requests for the global balance
pub async fn balance(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
) -> Result<Json<Balance>, ServerError> {
    let balance = state.engine.get_balance(&actor).await?;
    Ok(Json(Balance {
        balance_minor: balance.balance.cents(),
        balance_display: format_currency_display(balance.balance),
    }))
}

/// Handle requests for a month compared with the previous one.
///
/// Defaults to the current UTC month.
pub async fn month_summary(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Query(query): Query<MonthSummaryQuery>,
) -> Result<Json<MonthSummary>, ServerError> {
    let month = params::non_blank(query.month)
        .unwrap_or_else(|| YearMonth::of(Utc::now()).to_string());
    let summary = state.engine.get_month_summary(&actor, &month).await?;

    Ok(Json(MonthSummary {
        month: summary.month.to_string(),
        label: summary.month.label(),
        income_total: summary.current.income.cents(),
        expense_total: summary.current.expense.cents(),
        income_total_previous_month: summary.previous.income.cents(),
        expense_total_previous_month: summary.previous.expense.cents(),
        income_change_percent: summary.income_change_percent(),
        expense_change_percent: summary.expense_change_percent(),
    }))
}

/// Handle requests for the CSV download
pub async fn csv(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, ServerError> {
    let scope = scope(query)?;
    let bytes = state
        .engine
        .export_csv(&actor, &scope.selector, scope.kind, scope.owner_user_id)
        .await?;

    let disposition = format!(
        "attachment; filename=\"report-{}.csv\"",
        Utc::now().format("%Y-%m-%d")
    );
    Ok((
        [
            (header::CONTENT_TYPE, CSV_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}
