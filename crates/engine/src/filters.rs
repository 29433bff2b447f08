//! Movement listing criteria and page slicing.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, Movement, MovementKind, ResultEngine,
    dates::{utc_day_start, utc_day_start_next},
};

pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 500;

/// Per-request listing criteria. Every present criterion narrows the result
/// (AND); absent or blank ones impose nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MovementFilter {
    /// Case-insensitive substring of the concept.
    pub concept: Option<String>,
    pub kind: Option<MovementKind>,
    /// Inclusive first day, `YYYY-MM-DD`.
    pub date_from: Option<String>,
    /// Inclusive last day, `YYYY-MM-DD`.
    pub date_to: Option<String>,
    pub owner_user_id: Option<Uuid>,
}

/// Resolved UTC bounds of a [`MovementFilter`], `[from, to)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct DateBounds {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}

impl MovementFilter {
    pub fn concept_needle(&self) -> Option<&str> {
        non_blank(self.concept.as_ref())
    }

    pub fn has_date_range(&self) -> bool {
        non_blank(self.date_from.as_ref()).is_some() || non_blank(self.date_to.as_ref()).is_some()
    }

    /// Validates and resolves the date bounds. `date_to` becomes the start
    /// of the following day so the range stays half-open.
    pub(crate) fn date_bounds(&self) -> ResultEngine<DateBounds> {
        Ok(DateBounds {
            from: non_blank(self.date_from.as_ref())
                .map(utc_day_start)
                .transpose()?,
            to: non_blank(self.date_to.as_ref())
                .map(utc_day_start_next)
                .transpose()?,
        })
    }
}

/// Zero-based page request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u64,
    pub page_size: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    pub fn new(page: u64, page_size: u64) -> ResultEngine<Self> {
        let request = Self { page, page_size };
        request.validate()?;
        Ok(request)
    }

    pub fn validate(&self) -> ResultEngine<()> {
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(EngineError::InvalidPagination(format!(
                "page size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        if self.page.checked_mul(self.page_size).is_none() {
            return Err(EngineError::InvalidPagination(
                "page is out of range".to_string(),
            ));
        }
        Ok(())
    }

    pub fn offset(&self) -> u64 {
        self.page.saturating_mul(self.page_size)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementPage {
    pub items: Vec<Movement>,
    /// Size of the filtered set, independent of the page.
    pub total_count: u64,
    pub page: u64,
    pub page_size: u64,
}

impl MovementPage {
    /// `true` when a non-first page starts past the filtered set, e.g. after a
    /// delete shrank it. The engine never clamps; callers go back to page 0.
    pub fn is_past_end(&self) -> bool {
        self.page > 0 && self.page.saturating_mul(self.page_size) >= self.total_count
    }
}

/// Why a listing came back empty, given the active criteria.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EmptyReason {
    Concept(String),
    KindOrDateRange,
    NoRecords,
}

impl fmt::Display for EmptyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Concept(concept) => {
                write!(f, "No movements found matching the text \"{concept}\".")
            }
            Self::KindOrDateRange => {
                f.write_str("No movements found for the selected type and/or date range.")
            }
            Self::NoRecords => f.write_str("There are no movements at all."),
        }
    }
}

/// Explains an empty result. The concept search wins over type and date
/// criteria.
pub fn empty_explanation(filter: &MovementFilter) -> EmptyReason {
    if let Some(concept) = filter.concept_needle() {
        return EmptyReason::Concept(concept.to_string());
    }
    if filter.kind.is_some() || filter.has_date_range() {
        return EmptyReason::KindOrDateRange;
    }
    EmptyReason::NoRecords
}
