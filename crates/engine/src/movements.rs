//! Movement primitives.
//!
//! A `Movement` is a single dated income or expense. Its amount is always
//! positive: the direction lives in [`MovementKind`], never in the sign.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine, util::parse_uuid};

/// Concept stored when the caller leaves it blank.
pub const DEFAULT_CONCEPT: &str = "No concept";

/// Case folding applied to stored concepts and to search needles alike.
pub(crate) fn fold_concept(concept: &str) -> String {
    concept.to_lowercase()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    Income,
    Expense,
}

impl MovementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl TryFrom<&str> for MovementKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "income" | "ingreso" => Ok(Self::Income),
            "expense" | "egreso" => Ok(Self::Expense),
            other => Err(EngineError::InvalidInput(format!(
                "invalid movement kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    pub id: Uuid,
    pub concept: String,
    pub amount: Money,
    pub occurred_at: DateTime<Utc>,
    pub kind: MovementKind,
    pub owner_user_id: Uuid,
    /// Owner display name, falling back to email, then a dash.
    pub owner_name: String,
}

impl Movement {
    /// Builds a new movement with a fresh, time ordered id.
    pub fn new(
        concept: String,
        amount: Money,
        occurred_at: DateTime<Utc>,
        kind: MovementKind,
        owner_user_id: Uuid,
        owner_name: String,
    ) -> ResultEngine<Self> {
        if !amount.is_positive() {
            return Err(EngineError::InvalidAmount(
                "amount must be greater than 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::now_v7(),
            concept,
            amount,
            occurred_at,
            kind,
            owner_user_id,
            owner_name,
        })
    }

}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "movements")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub concept: String,
    pub concept_folded: String,
    pub amount_minor: i64,
    pub occurred_at: DateTimeUtc,
    pub kind: String,
    pub owner_user_id: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::OwnerUserId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    Owner,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Movement> for ActiveModel {
    fn from(movement: &Movement) -> Self {
        Self {
            id: ActiveValue::Set(movement.id.to_string()),
            concept: ActiveValue::Set(movement.concept.clone()),
            concept_folded: ActiveValue::Set(fold_concept(&movement.concept)),
            amount_minor: ActiveValue::Set(movement.amount.cents()),
            occurred_at: ActiveValue::Set(movement.occurred_at),
            kind: ActiveValue::Set(movement.kind.as_str().to_string()),
            owner_user_id: ActiveValue::Set(movement.owner_user_id.to_string()),
            created_at: ActiveValue::Set(Utc::now()),
        }
    }
}

impl TryFrom<(Model, Option<super::users::Model>)> for Movement {
    type Error = EngineError;

    fn try_from(
        (model, owner): (Model, Option<super::users::Model>),
    ) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "movement")?,
            kind: MovementKind::try_from(model.kind.as_str())?,
            owner_user_id: parse_uuid(&model.owner_user_id, "user")?,
            owner_name: super::users::owner_label(owner.as_ref()),
            concept: model.concept,
            amount: Money::new(model.amount_minor),
            occurred_at: model.occurred_at,
        })
    }
}
