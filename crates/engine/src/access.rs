//! Role based access policy.
//!
//! Every engine operation declares the minimum [`Role`] it needs through
//! [`Operation::required_role`]. [`authorize`] runs before any storage or
//! aggregation work, so a refused call never touches the database.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Closed set of roles. Raw spellings are normalised once, at ingestion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    /// Canonical spelling used by the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::User => "USER",
        }
    }

    fn rank(self) -> u8 {
        match self {
            Self::User => 0,
            Self::Admin => 1,
        }
    }

    /// Returns `true` if this role grants at least `required`.
    pub fn satisfies(self, required: Role) -> bool {
        self.rank() >= required.rank()
    }
}

impl TryFrom<&str> for Role {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "ADMIN" | "Admin" | "admin" => Ok(Self::Admin),
            "USER" | "User" | "user" | "Usuario" | "usuario" => Ok(Self::User),
            other => Err(EngineError::InvalidRole(format!("unknown role: {other}"))),
        }
    }
}

impl FromStr for Role {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The authenticated caller attached to every operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Actor {
    pub user_id: Uuid,
    pub role: Role,
}

impl Actor {
    pub fn new(user_id: Uuid, role: Role) -> Self {
        Self { user_id, role }
    }
}

/// Operations exposed by the engine, used to look up the required role.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    ListMovements,
    CreateMovement,
    UpdateMovement,
    DeleteMovement,
    Report,
    Balance,
    MonthSummary,
    ExportCsv,
    ListUsers,
    CreateUser,
    UpdateUser,
    DeleteUser,
}

impl Operation {
    pub fn required_role(self) -> Role {
        match self {
            Self::ListMovements => Role::User,
            Self::CreateMovement
            | Self::UpdateMovement
            | Self::DeleteMovement
            | Self::Report
            | Self::Balance
            | Self::MonthSummary
            | Self::ExportCsv
            | Self::ListUsers
            | Self::CreateUser
            | Self::UpdateUser
            | Self::DeleteUser => Role::Admin,
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Self::ListMovements => "list movements",
            Self::CreateMovement => "create movements",
            Self::UpdateMovement => "update movements",
            Self::DeleteMovement => "delete movements",
            Self::Report => "view reports",
            Self::Balance => "view the balance",
            Self::MonthSummary => "view the month summary",
            Self::ExportCsv => "export CSV reports",
            Self::ListUsers => "list users",
            Self::CreateUser => "create users",
            Self::UpdateUser => "update users",
            Self::DeleteUser => "delete users",
        }
    }
}

/// Rejects the call unless `actor` holds the role `operation` requires.
pub fn authorize(actor: &Actor, operation: Operation) -> ResultEngine<()> {
    let required = operation.required_role();
    if !actor.role.satisfies(required) {
        tracing::warn!(
            user_id = %actor.user_id,
            role = %actor.role,
            ?operation,
            "access refused"
        );
        return Err(EngineError::Forbidden(format!(
            "only {} users can {}",
            required,
            operation.describe()
        )));
    }
    Ok(())
}

/// Where a role lands after signing in.
///
/// Non-admins never see the dashboard home and go straight to the movement
/// listing.
pub fn landing_path(role: Role) -> &'static str {
    match role {
        Role::Admin => "/",
        Role::User => "/movements",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(role: Role) -> Actor {
        Actor::new(Uuid::now_v7(), role)
    }

    #[test]
    fn role_spellings_normalise_to_two_values() {
        for raw in ["ADMIN", "Admin", "admin", " ADMIN "] {
            assert_eq!(Role::try_from(raw).unwrap(), Role::Admin);
        }
        for raw in ["USER", "User", "user", "Usuario"] {
            assert_eq!(Role::try_from(raw).unwrap(), Role::User);
        }
        assert!(matches!(
            Role::try_from("root"),
            Err(EngineError::InvalidRole(_))
        ));
    }

    #[test]
    fn users_may_only_list_movements() {
        let user = actor(Role::User);
        assert!(authorize(&user, Operation::ListMovements).is_ok());
        for op in [
            Operation::CreateMovement,
            Operation::UpdateMovement,
            Operation::DeleteMovement,
            Operation::Report,
            Operation::Balance,
            Operation::MonthSummary,
            Operation::ExportCsv,
            Operation::ListUsers,
            Operation::CreateUser,
            Operation::UpdateUser,
            Operation::DeleteUser,
        ] {
            assert!(
                matches!(authorize(&user, op), Err(EngineError::Forbidden(_))),
                "{op:?} should be admin only"
            );
        }
    }

    #[test]
    fn admins_may_do_everything() {
        let admin = actor(Role::Admin);
        for op in [
            Operation::ListMovements,
            Operation::CreateMovement,
            Operation::Report,
            Operation::ExportCsv,
            Operation::DeleteUser,
        ] {
            assert!(authorize(&admin, op).is_ok());
        }
    }

    #[test]
    fn landing_path_redirects_users_to_movements() {
        assert_eq!(landing_path(Role::Admin), "/");
        assert_eq!(landing_path(Role::User), "/movements");
    }
}
