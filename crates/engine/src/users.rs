//! Users table and domain type.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Role, util::parse_uuid};

/// Placeholder shown when a movement owner has neither name nor email.
pub const UNKNOWN_OWNER: &str = "—";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserStatus {
    Active,
    Inactive,
}

impl UserStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
        }
    }
}

impl TryFrom<&str> for UserStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "Active" | "active" | "ACTIVE" | "Activo" => Ok(Self::Active),
            "Inactive" | "inactive" | "INACTIVE" | "Inactivo" => Ok(Self::Inactive),
            other => Err(EngineError::InvalidInput(format!(
                "invalid user status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub display_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }
}

/// Label used wherever a movement's owner is displayed: display name, then
/// email, then [`UNKNOWN_OWNER`].
pub(crate) fn owner_label(owner: Option<&Model>) -> String {
    owner
        .and_then(|m| {
            [m.display_name.as_str(), m.email.as_str()]
                .into_iter()
                .map(str::trim)
                .find(|s| !s.is_empty())
        })
        .unwrap_or(UNKNOWN_OWNER)
        .to_string()
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub display_name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub phone: Option<String>,
    pub role: String,
    pub status: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::movements::Entity")]
    Movements,
}

impl Related<super::movements::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Movements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&User> for ActiveModel {
    fn from(user: &User) -> Self {
        Self {
            id: ActiveValue::Set(user.id.to_string()),
            display_name: ActiveValue::Set(user.display_name.clone()),
            email: ActiveValue::Set(user.email.clone()),
            phone: ActiveValue::Set(user.phone.clone()),
            role: ActiveValue::Set(user.role.as_str().to_string()),
            status: ActiveValue::Set(user.status.as_str().to_string()),
            created_at: ActiveValue::Set(user.created_at),
        }
    }
}

impl TryFrom<Model> for User {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "user")?,
            role: Role::try_from(model.role.as_str())?,
            status: UserStatus::try_from(model.status.as_str())?,
            display_name: model.display_name,
            email: model.email,
            phone: model.phone,
            created_at: model.created_at,
        })
    }
}
