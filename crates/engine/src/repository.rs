//! Translates movement criteria into storage conditions.

use chrono::{DateTime, Utc};
use sea_orm::{
    Condition, QueryFilter, QueryOrder, prelude::*,
    sea_query::{LikeExpr, SimpleExpr},
};
use uuid::Uuid;

use crate::{
    MovementFilter, MovementKind, ResultEngine,
    movements::{self, fold_concept},
    util::like_pattern,
};

/// Case-insensitive substring match on the concept.
///
/// Both sides are folded by [`fold_concept`]; the stored side lives in
/// `concept_folded`, so non-ASCII capitals match too.
fn concept_contains(needle: &str) -> SimpleExpr {
    movements::Column::ConceptFolded
        .like(LikeExpr::new(like_pattern(&fold_concept(needle))).escape('\\'))
}

/// Builds the conjunction of every present criterion.
///
/// Fails with `InvalidDate` on a malformed bound, before any query runs.
pub(crate) fn listing_condition(filter: &MovementFilter) -> ResultEngine<Condition> {
    let bounds = filter.date_bounds()?;
    let mut condition = Condition::all();
    if let Some(needle) = filter.concept_needle() {
        condition = condition.add(concept_contains(needle));
    }
    if let Some(kind) = filter.kind {
        condition = condition.add(movements::Column::Kind.eq(kind.as_str()));
    }
    if let Some(from) = bounds.from {
        condition = condition.add(movements::Column::OccurredAt.gte(from));
    }
    if let Some(to) = bounds.to {
        condition = condition.add(movements::Column::OccurredAt.lt(to));
    }
    if let Some(owner) = filter.owner_user_id {
        condition = condition.add(movements::Column::OwnerUserId.eq(owner.to_string()));
    }
    Ok(condition)
}

/// `[start, end)` window with optional kind and owner narrowing.
pub(crate) fn window_condition(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    kind: Option<MovementKind>,
    owner: Option<Uuid>,
) -> Condition {
    let mut condition = Condition::all()
        .add(movements::Column::OccurredAt.gte(start))
        .add(movements::Column::OccurredAt.lt(end));
    if let Some(kind) = kind {
        condition = condition.add(movements::Column::Kind.eq(kind.as_str()));
    }
    if let Some(owner) = owner {
        condition = condition.add(movements::Column::OwnerUserId.eq(owner.to_string()));
    }
    condition
}

pub(crate) trait ApplyMovementOrder: QueryOrder + Sized {
    /// Most recent first. Ids are time ordered, so `id` breaks ties by
    /// insertion order.
    fn newest_first(self) -> Self;

    /// Oldest first, used by exports.
    fn oldest_first(self) -> Self;
}

impl<T> ApplyMovementOrder for T
where
    T: QueryOrder + Sized,
{
    fn newest_first(self) -> Self {
        self.order_by_desc(movements::Column::OccurredAt)
            .order_by_asc(movements::Column::Id)
    }

    fn oldest_first(self) -> Self {
        self.order_by_asc(movements::Column::OccurredAt)
            .order_by_asc(movements::Column::Id)
    }
}

pub(crate) trait ApplyMovementFilters: QueryFilter + Sized {
    fn apply_window(
        self,
        range: (DateTime<Utc>, DateTime<Utc>),
        kind: Option<MovementKind>,
        owner: Option<Uuid>,
    ) -> Self;
}

impl<T> ApplyMovementFilters for T
where
    T: QueryFilter + Sized,
{
    fn apply_window(
        self,
        (start, end): (DateTime<Utc>, DateTime<Utc>),
        kind: Option<MovementKind>,
        owner: Option<Uuid>,
    ) -> Self {
        self.filter(window_condition(start, end, kind, owner))
    }
}
