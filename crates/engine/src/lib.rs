//! Cash movements engine.
//!
//! Records dated income and expense movements per user and turns them into
//! paginated listings, bucketed reports, month comparisons, a global balance
//! and CSV exports. Every public operation on [`Engine`] takes the calling
//! [`Actor`] and checks its role before touching storage.

pub use access::{Actor, Operation, Role, authorize, landing_path};
pub use commands::{CreateMovementCmd, CreateUserCmd, UpdateMovementCmd, UpdateUserCmd, UserFilter};
pub use csv_export::to_csv;
pub use dates::{
    YearMonth, parse_occurred_at, parse_year, utc_day_start, utc_day_start_next, utc_month_range,
    utc_year_range,
};
pub use debounce::Debouncer;
pub use error::EngineError;
pub use filters::{EmptyReason, MovementFilter, MovementPage, PageRequest, empty_explanation};
pub use money::{AmountInput, Money, format_currency_display, to_amount};
pub use movements::{Movement, MovementKind};
pub use ops::{Engine, EngineBuilder};
pub use reports::{
    Balance, Buckets, MonthSummary, Report, ReportWindow, Totals, WindowSelector, percent_change,
};
pub use users::{User, UserStatus};

mod access;
mod commands;
pub mod csv_export;
pub mod dates;
pub mod debounce;
mod error;
pub mod filters;
mod money;
mod movements;
mod ops;
mod repository;
pub mod reports;
mod users;
mod util;

pub type ResultEngine<T> = Result<T, EngineError>;
