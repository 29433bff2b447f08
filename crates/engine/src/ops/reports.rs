use chrono::Utc;
use sea_orm::{FromQueryResult, QuerySelect, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Actor, Balance, Money, Movement, MovementKind, MonthSummary, Operation, Report, ResultEngine,
    Totals, WindowSelector,
    access::authorize,
    csv_export::to_csv,
    dates::YearMonth,
    movements,
    repository::{ApplyMovementFilters, ApplyMovementOrder},
    users,
};

use super::{Engine, with_tx};

#[derive(Debug, FromQueryResult)]
struct KindTotal {
    kind: String,
    total: Option<i64>,
}

fn entry(model: &movements::Model) -> ResultEngine<(chrono::DateTime<Utc>, MovementKind, Money)> {
    Ok((
        model.occurred_at,
        MovementKind::try_from(model.kind.as_str())?,
        Money::new(model.amount_minor),
    ))
}

impl Engine {
    /// Bucketed income and expense totals for one window.
    ///
    /// Scoped to `owner_user_id` when given, otherwise to the caller.
    pub async fn get_report(
        &self,
        actor: &Actor,
        selector: &WindowSelector,
        kind: Option<MovementKind>,
        owner_user_id: Option<Uuid>,
    ) -> ResultEngine<Report> {
        authorize(actor, Operation::Report)?;
        let window = selector.resolve(Utc::now())?;
        let range = window.range()?;
        let owner = owner_user_id.unwrap_or(actor.user_id);

        let models = movements::Entity::find()
            .apply_window(range, kind, Some(owner))
            .all(&self.database)
            .await?;
        let entries = models.iter().map(entry).collect::<ResultEngine<Vec<_>>>()?;

        tracing::debug!(
            ?window,
            owner_user_id = %owner,
            movements = entries.len(),
            "report computed"
        );
        window.aggregate(entries)
    }

    /// All-time income minus expense over every owner.
    pub async fn get_balance(&self, actor: &Actor) -> ResultEngine<Balance> {
        authorize(actor, Operation::Balance)?;

        let rows = movements::Entity::find()
            .select_only()
            .column(movements::Column::Kind)
            .column_as(movements::Column::AmountMinor.sum(), "total")
            .group_by(movements::Column::Kind)
            .into_model::<KindTotal>()
            .all(&self.database)
            .await?;

        let mut totals = Totals::default();
        for row in rows {
            let kind = MovementKind::try_from(row.kind.as_str())?;
            totals.add(kind, Money::new(row.total.unwrap_or_default()))?;
        }
        Ok(Balance {
            balance: totals.net(),
        })
    }

    /// The caller's totals for `month` next to the previous month's.
    pub async fn get_month_summary(&self, actor: &Actor, month: &str) -> ResultEngine<MonthSummary> {
        authorize(actor, Operation::MonthSummary)?;
        let month: YearMonth = month.parse()?;
        let previous = month.previous();
        let (current_start, current_end) = month.range()?;
        let (previous_start, _) = previous.range()?;

        let models = movements::Entity::find()
            .apply_window((previous_start, current_end), None, Some(actor.user_id))
            .all(&self.database)
            .await?;

        let mut summary = MonthSummary {
            month,
            current: Totals::default(),
            previous: Totals::default(),
        };
        for model in &models {
            let (at, kind, amount) = entry(model)?;
            if at >= current_start {
                summary.current.add(kind, amount)?;
            } else {
                summary.previous.add(kind, amount)?;
            }
        }
        Ok(summary)
    }

    /// CSV bytes for every movement in the window, oldest first.
    ///
    /// Unlike [`Engine::get_report`] there is no implicit owner scope.
    pub async fn export_csv(
        &self,
        actor: &Actor,
        selector: &WindowSelector,
        kind: Option<MovementKind>,
        owner_user_id: Option<Uuid>,
    ) -> ResultEngine<Vec<u8>> {
        authorize(actor, Operation::ExportCsv)?;
        let window = selector.resolve(Utc::now())?;
        let range = window.range()?;

        with_tx!(self, |db_tx| {
            let rows: Vec<(movements::Model, Option<users::Model>)> = movements::Entity::find()
                .apply_window(range, kind, owner_user_id)
                .find_also_related(users::Entity)
                .oldest_first()
                .all(&db_tx)
                .await?;
            let records = rows
                .into_iter()
                .map(Movement::try_from)
                .collect::<ResultEngine<Vec<_>>>()?;

            tracing::info!(?window, rows = records.len(), "csv exported");
            to_csv(&records)
        })
    }
}
