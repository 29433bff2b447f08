//! Movement API endpoints

use api_types::{
    Deleted,
    movement::{Movement, MovementKind, MovementListQuery, MovementNew, MovementPage, MovementUpdate},
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{
    Actor, CreateMovementCmd, MovementFilter, PageRequest, UpdateMovementCmd, empty_explanation,
    filters::DEFAULT_PAGE_SIZE, format_currency_display,
};
use uuid::Uuid;

use crate::{ServerError, params, server::ServerState};

pub(crate) fn movement_view(movement: &engine::Movement) -> Movement {
    Movement {
        id: movement.id,
        concept: movement.concept.clone(),
        amount_minor: movement.amount.cents(),
        amount: movement.amount.raw_decimal(),
        amount_display: format_currency_display(movement.amount),
        occurred_at: movement.occurred_at,
        kind: match movement.kind {
            engine::MovementKind::Income => MovementKind::Income,
            engine::MovementKind::Expense => MovementKind::Expense,
        },
        owner_user_id: movement.owner_user_id,
        owner_name: movement.owner_name.clone(),
    }
}

/// Handle requests for listing movements, newest first
pub async fn list(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Query(query): Query<MovementListQuery>,
) -> Result<Json<MovementPage>, ServerError> {
    let filter = MovementFilter {
        concept: params::non_blank(query.concept),
        kind: params::kind(query.kind)?,
        date_from: params::non_blank(query.date_from),
        date_to: params::non_blank(query.date_to),
        owner_user_id: params::uuid(query.owner_user_id, "owner_user_id")?,
    };
    let page = PageRequest {
        page: query.page.unwrap_or(0),
        page_size: query.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
    };

    let result = state.engine.list_movements(&actor, &filter, page).await?;
    let empty_reason = result
        .items
        .is_empty()
        .then(|| empty_explanation(&filter).to_string());

    Ok(Json(MovementPage {
        items: result.items.iter().map(movement_view).collect(),
        total_count: result.total_count,
        page: result.page,
        page_size: result.page_size,
        past_end: result.is_past_end(),
        empty_reason,
    }))
}

/// Handle requests for recording a movement owned by the caller
pub async fn create(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Json(payload): Json<MovementNew>,
) -> Result<(StatusCode, Json<Movement>), ServerError> {
    let cmd = CreateMovementCmd {
        amount: params::amount(payload.amount),
        concept: payload.concept,
        occurred_at: payload.occurred_at,
        kind: payload.kind.map(params::wire_kind),
    };
    let movement = state.engine.create_movement(&actor, cmd).await?;
    Ok((StatusCode::CREATED, Json(movement_view(&movement))))
}

/// Handle requests for a partial movement update
pub async fn update(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Path(movement_id): Path<Uuid>,
    Json(payload): Json<MovementUpdate>,
) -> Result<Json<Movement>, ServerError> {
    let cmd = UpdateMovementCmd {
        movement_id,
        concept: payload.concept,
        amount: payload.amount.map(params::amount),
        occurred_at: payload.occurred_at,
        kind: payload.kind.map(params::wire_kind),
    };
    let movement = state.engine.update_movement(&actor, cmd).await?;
    Ok(Json(movement_view(&movement)))
}

/// Handle requests for deleting a movement
pub async fn delete(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Path(movement_id): Path<Uuid>,
) -> Result<Json<Deleted>, ServerError> {
    let id = state.engine.delete_movement(&actor, movement_id).await?;
    Ok(Json(Deleted { id }))
}
