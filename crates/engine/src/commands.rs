//! Command structs for engine operations.
//!
//! These types group parameters for write operations, keeping call sites
//! readable and avoiding long argument lists. Fields left as `None` are either
//! defaulted (on create) or left untouched (on update).

use uuid::Uuid;

use crate::{AmountInput, MovementKind, Role, UserStatus};

/// Create a movement owned by the caller.
#[derive(Clone, Debug)]
pub struct CreateMovementCmd {
    pub amount: AmountInput,
    /// Blank or missing becomes the placeholder concept.
    pub concept: Option<String>,
    /// RFC 3339 or `YYYY-MM-DD`; missing means now.
    pub occurred_at: Option<String>,
    /// Missing means income.
    pub kind: Option<MovementKind>,
}

impl CreateMovementCmd {
    #[must_use]
    pub fn new(amount: AmountInput) -> Self {
        Self {
            amount,
            concept: None,
            occurred_at: None,
            kind: None,
        }
    }

    #[must_use]
    pub fn concept(mut self, concept: impl Into<String>) -> Self {
        self.concept = Some(concept.into());
        self
    }

    #[must_use]
    pub fn occurred_at(mut self, occurred_at: impl Into<String>) -> Self {
        self.occurred_at = Some(occurred_at.into());
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: MovementKind) -> Self {
        self.kind = Some(kind);
        self
    }
}

/// Replace a subset of a movement's fields.
#[derive(Clone, Debug)]
pub struct UpdateMovementCmd {
    pub movement_id: Uuid,
    pub concept: Option<String>,
    pub amount: Option<AmountInput>,
    pub occurred_at: Option<String>,
    pub kind: Option<MovementKind>,
}

impl UpdateMovementCmd {
    #[must_use]
    pub fn new(movement_id: Uuid) -> Self {
        Self {
            movement_id,
            concept: None,
            amount: None,
            occurred_at: None,
            kind: None,
        }
    }

    #[must_use]
    pub fn concept(mut self, concept: impl Into<String>) -> Self {
        self.concept = Some(concept.into());
        self
    }

    #[must_use]
    pub fn amount(mut self, amount: AmountInput) -> Self {
        self.amount = Some(amount);
        self
    }

    #[must_use]
    pub fn occurred_at(mut self, occurred_at: impl Into<String>) -> Self {
        self.occurred_at = Some(occurred_at.into());
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: MovementKind) -> Self {
        self.kind = Some(kind);
        self
    }
}

/// Register a new user.
#[derive(Clone, Debug)]
pub struct CreateUserCmd {
    pub email: String,
    /// Blank or missing falls back to the email.
    pub display_name: Option<String>,
    pub phone: Option<String>,
    /// Missing means [`Role::User`].
    pub role: Option<Role>,
    /// Missing means [`UserStatus::Active`].
    pub status: Option<UserStatus>,
}

impl CreateUserCmd {
    #[must_use]
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            display_name: None,
            phone: None,
            role: None,
            status: None,
        }
    }

    #[must_use]
    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    #[must_use]
    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    #[must_use]
    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    #[must_use]
    pub fn status(mut self, status: UserStatus) -> Self {
        self.status = Some(status);
        self
    }
}

/// Partial user update.
#[derive(Clone, Debug)]
pub struct UpdateUserCmd {
    pub user_id: Uuid,
    /// Blank falls back to the (possibly new) email.
    pub display_name: Option<String>,
    /// Blank is ignored; a change is re-checked for uniqueness.
    pub email: Option<String>,
    /// Blank clears the phone.
    pub phone: Option<String>,
    pub role: Option<Role>,
    pub status: Option<UserStatus>,
}

impl UpdateUserCmd {
    #[must_use]
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            display_name: None,
            email: None,
            phone: None,
            role: None,
            status: None,
        }
    }

    #[must_use]
    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    #[must_use]
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    #[must_use]
    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    #[must_use]
    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    #[must_use]
    pub fn status(mut self, status: UserStatus) -> Self {
        self.status = Some(status);
        self
    }
}

/// User listing criteria.
#[derive(Clone, Debug, Default)]
pub struct UserFilter {
    /// Case-insensitive substring of the display name or the email.
    pub query: Option<String>,
    pub role: Option<Role>,
    pub status: Option<UserStatus>,
}
