//! The module contains the errors the engine can throw.
//!
//! Every variant carries a human readable message and maps to a stable
//! machine code through [`EngineError::code`], so callers can decide the
//! presentation (inline form error, redirect, HTTP status) without parsing
//! strings.
//!
//! Validation errors are always raised before any storage mutation starts.
//! Storage failures surface as [`Database`] and are never retried here.
//!
//!  [`Database`]: EngineError::Database
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Not authenticated")]
    Unauthenticated,
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Invalid range specification: {0}")]
    InvalidRangeSpecification(String),
    #[error("Invalid pagination: {0}")]
    InvalidPagination(String),
    #[error("Invalid role: {0}")]
    InvalidRole(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("\"{0}\" is already registered")]
    DuplicateEmail(String),
    #[error("\"{0}\" not found")]
    NotFound(String),
    #[error("Users cannot delete their own account")]
    SelfDeletionForbidden,
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl EngineError {
    /// Stable, machine checkable error kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::Forbidden(_) => "forbidden",
            Self::InvalidAmount(_) => "invalid_amount",
            Self::InvalidDate(_) => "invalid_date",
            Self::InvalidRangeSpecification(_) => "invalid_range_specification",
            Self::InvalidPagination(_) => "invalid_pagination",
            Self::InvalidRole(_) => "invalid_role",
            Self::InvalidInput(_) => "invalid_input",
            Self::DuplicateEmail(_) => "duplicate_email",
            Self::NotFound(_) => "not_found",
            Self::SelfDeletionForbidden => "self_deletion_forbidden",
            Self::Database(_) => "internal",
        }
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Unauthenticated, Self::Unauthenticated) => true,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidDate(a), Self::InvalidDate(b)) => a == b,
            (Self::InvalidRangeSpecification(a), Self::InvalidRangeSpecification(b)) => a == b,
            (Self::InvalidPagination(a), Self::InvalidPagination(b)) => a == b,
            (Self::InvalidRole(a), Self::InvalidRole(b)) => a == b,
            (Self::InvalidInput(a), Self::InvalidInput(b)) => a == b,
            (Self::DuplicateEmail(a), Self::DuplicateEmail(b)) => a == b,
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::SelfDeletionForbidden, Self::SelfDeletionForbidden) => true,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
