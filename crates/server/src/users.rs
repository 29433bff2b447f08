//! User administration endpoints

use api_types::{
    Deleted,
    user::{User, UserListQuery, UserNew, UserUpdate},
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{Actor, CreateUserCmd, UpdateUserCmd, UserFilter, landing_path};
use uuid::Uuid;

use crate::{ServerError, params, server::ServerState};

fn user_view(user: &engine::User) -> User {
    User {
        id: user.id,
        display_name: user.display_name.clone(),
        email: user.email.clone(),
        phone: user.phone.clone(),
        role: user.role.as_str().to_string(),
        status: user.status.as_str().to_string(),
        created_at: user.created_at,
        landing_path: landing_path(user.role).to_string(),
    }
}

pub async fn list(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Query(query): Query<UserListQuery>,
) -> Result<Json<Vec<User>>, ServerError> {
    let filter = UserFilter {
        query: params::non_blank(query.q),
        role: params::role(query.role)?,
        status: params::status(query.status)?,
    };
    let users = state.engine.list_users(&actor, &filter).await?;
    Ok(Json(users.iter().map(user_view).collect()))
}

pub async fn create(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Json(payload): Json<UserNew>,
) -> Result<(StatusCode, Json<User>), ServerError> {
    let cmd = CreateUserCmd {
        email: payload.email,
        display_name: payload.display_name,
        phone: payload.phone,
        role: params::role(payload.role)?,
        status: params::status(payload.status)?,
    };
    let user = state.engine.create_user(&actor, cmd).await?;
    Ok((StatusCode::CREATED, Json(user_view(&user))))
}

pub async fn update(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<UserUpdate>,
) -> Result<Json<User>, ServerError> {
    let cmd = UpdateUserCmd {
        user_id,
        display_name: payload.display_name,
        email: payload.email,
        phone: payload.phone,
        role: params::role(payload.role)?,
        status: params::status(payload.status)?,
    };
    let user = state.engine.update_user(&actor, cmd).await?;
    Ok(Json(user_view(&user)))
}

/// Deletes a user and every movement they own
pub async fn delete(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Deleted>, ServerError> {
    let id = state.engine.delete_user(&actor, user_id).await?;
    Ok(Json(Deleted { id }))
}
