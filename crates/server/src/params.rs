//! Query and body normalisation shared by the handlers.

use engine::{MovementKind, Role, UserStatus};
use uuid::Uuid;

use crate::ServerError;

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

pub(crate) fn kind(value: Option<String>) -> Result<Option<MovementKind>, ServerError> {
    non_blank(value)
        .map(|raw| MovementKind::try_from(raw.as_str()))
        .transpose()
        .map_err(ServerError::from)
}

pub(crate) fn uuid(value: Option<String>, label: &str) -> Result<Option<Uuid>, ServerError> {
    non_blank(value)
        .map(|raw| {
            Uuid::parse_str(&raw).map_err(|_| ServerError::Generic(format!("invalid {label}")))
        })
        .transpose()
}

pub(crate) fn role(value: Option<String>) -> Result<Option<Role>, ServerError> {
    non_blank(value)
        .map(|raw| Role::try_from(raw.as_str()))
        .transpose()
        .map_err(ServerError::from)
}

pub(crate) fn status(value: Option<String>) -> Result<Option<UserStatus>, ServerError> {
    non_blank(value)
        .map(|raw| UserStatus::try_from(raw.as_str()))
        .transpose()
        .map_err(ServerError::from)
}

pub(crate) fn wire_kind(kind: api_types::movement::MovementKind) -> MovementKind {
    match kind {
        api_types::movement::MovementKind::Income => MovementKind::Income,
        api_types::movement::MovementKind::Expense => MovementKind::Expense,
    }
}

pub(crate) fn amount(input: api_types::movement::AmountInput) -> engine::AmountInput {
    match input {
        api_types::movement::AmountInput::Number(value) => engine::AmountInput::Number(value),
        api_types::movement::AmountInput::Text(text) => engine::AmountInput::Text(text),
    }
}
