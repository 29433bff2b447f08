use chrono::Utc;
use sea_orm::{
    ActiveValue, PaginatorTrait, QueryFilter, QuerySelect, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{
    Actor, CreateMovementCmd, Movement, MovementFilter, MovementKind, MovementPage, Operation,
    PageRequest, ResultEngine, UpdateMovementCmd,
    access::authorize,
    dates::parse_occurred_at,
    money::to_amount,
    movements::{self, DEFAULT_CONCEPT, fold_concept},
    repository::{ApplyMovementOrder, listing_condition},
    users,
};

use super::{Engine, with_tx};

fn normalize_concept(raw: Option<&str>) -> String {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_CONCEPT)
        .to_string()
}

fn parse_optional_instant(raw: Option<&str>) -> ResultEngine<Option<chrono::DateTime<Utc>>> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_occurred_at)
        .transpose()
}

impl Engine {
    /// Lists movements newest first, one page at a time.
    ///
    /// Every role may list, and sees every owner's movements unless the filter
    /// names one. `total_count` is the size of the filtered set. A page past
    /// the end comes back empty; see [`MovementPage::is_past_end`].
    pub async fn list_movements(
        &self,
        actor: &Actor,
        filter: &MovementFilter,
        page: PageRequest,
    ) -> ResultEngine<MovementPage> {
        authorize(actor, Operation::ListMovements)?;
        page.validate()?;
        let condition = listing_condition(filter)?;

        with_tx!(self, |db_tx| {
            let total_count = movements::Entity::find()
                .filter(condition.clone())
                .count(&db_tx)
                .await?;

            let rows: Vec<(movements::Model, Option<users::Model>)> = movements::Entity::find()
                .filter(condition)
                .find_also_related(users::Entity)
                .newest_first()
                .offset(page.offset())
                .limit(page.page_size)
                .all(&db_tx)
                .await?;
            let items = rows
                .into_iter()
                .map(Movement::try_from)
                .collect::<ResultEngine<Vec<_>>>()?;

            tracing::debug!(
                total_count,
                returned = items.len(),
                page = page.page,
                "movements listed"
            );
            Ok(MovementPage {
                items,
                total_count,
                page: page.page,
                page_size: page.page_size,
            })
        })
    }

    /// Records a movement owned by the caller.
    pub async fn create_movement(
        &self,
        actor: &Actor,
        cmd: CreateMovementCmd,
    ) -> ResultEngine<Movement> {
        authorize(actor, Operation::CreateMovement)?;
        let amount = to_amount(&cmd.amount)?;
        let occurred_at = parse_optional_instant(cmd.occurred_at.as_deref())?.unwrap_or_else(Utc::now);
        let concept = normalize_concept(cmd.concept.as_deref());
        let kind = cmd.kind.unwrap_or(MovementKind::Income);

        with_tx!(self, |db_tx| {
            let owner = self.require_user(&db_tx, actor.user_id).await?;
            let movement = Movement::new(
                concept,
                amount,
                occurred_at,
                kind,
                actor.user_id,
                users::owner_label(Some(&owner)),
            )?;
            movements::ActiveModel::from(&movement)
                .insert(&db_tx)
                .await?;

            tracing::info!(
                movement_id = %movement.id,
                owner_user_id = %actor.user_id,
                kind = kind.as_str(),
                "movement created"
            );
            Ok(movement)
        })
    }

    /// Replaces the supplied fields of a movement, leaving the rest untouched.
    ///
    /// Every supplied field is validated before the movement is looked up.
    pub async fn update_movement(
        &self,
        actor: &Actor,
        cmd: UpdateMovementCmd,
    ) -> ResultEngine<Movement> {
        authorize(actor, Operation::UpdateMovement)?;
        let amount = cmd.amount.as_ref().map(to_amount).transpose()?;
        let occurred_at = parse_optional_instant(cmd.occurred_at.as_deref())?;
        let concept = cmd
            .concept
            .as_deref()
            .map(|raw| normalize_concept(Some(raw)));

        with_tx!(self, |db_tx| {
            let model = self.require_movement(&db_tx, cmd.movement_id).await?;
            let mut active: movements::ActiveModel = model.into();
            if let Some(concept) = concept {
                active.concept_folded = ActiveValue::Set(fold_concept(&concept));
                active.concept = ActiveValue::Set(concept);
            }
            if let Some(amount) = amount {
                active.amount_minor = ActiveValue::Set(amount.cents());
            }
            if let Some(occurred_at) = occurred_at {
                active.occurred_at = ActiveValue::Set(occurred_at);
            }
            if let Some(kind) = cmd.kind {
                active.kind = ActiveValue::Set(kind.as_str().to_string());
            }
            let updated = active.update(&db_tx).await?;
            let owner = users::Entity::find_by_id(updated.owner_user_id.clone())
                .one(&db_tx)
                .await?;

            tracing::info!(movement_id = %cmd.movement_id, "movement updated");
            Movement::try_from((updated, owner))
        })
    }

    /// Permanently deletes a movement and returns its id.
    pub async fn delete_movement(&self, actor: &Actor, movement_id: Uuid) -> ResultEngine<Uuid> {
        authorize(actor, Operation::DeleteMovement)?;

        with_tx!(self, |db_tx| {
            self.require_movement(&db_tx, movement_id).await?;
            movements::Entity::delete_by_id(movement_id.to_string())
                .exec(&db_tx)
                .await?;

            tracing::info!(movement_id = %movement_id, "movement deleted");
            Ok(movement_id)
        })
    }
}
