use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use time::OffsetDateTime;
use tracing::{info, instrument, warn};

use crate::{
    auth::services::authenticate,
    error::AppError,
    extract::{Json, Query},
    state::AppState,
    users::{
        dto::{
            CreateUserRequest, Credentials, ListQuery, PublicUser, UpdateUserRequest,
            MAX_PAGE_SIZE,
        },
        filter::UserFilter,
        seed::seed_demo_users,
        services::{merge_update, new_user, now_in},
    },
};

pub fn root_routes() -> Router<AppState> {
    Router::new().route("/", get(ping_and_seed))
}

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/users",
            post(create_user).get(list_users).delete(delete_all_users),
        )
        .route("/users/", get(list_users).delete(delete_all_users))
        .route("/users/:email", get(get_user).put(update_user))
}

#[instrument(skip(state))]
pub async fn ping_and_seed(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    seed_demo_users(state.store.as_ref(), now_in(state.config.utc_offset)).await?;
    Ok(Json(json!({ "Hello": "World" })))
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<Json<PublicUser>, AppError> {
    let user = match new_user(payload, now_in(state.config.utc_offset)) {
        Ok(u) => u,
        Err(e) => {
            warn!(error = %e, "create user rejected");
            return Err(e);
        }
    };

    let created = state.store.create(&user).await?;
    info!(email = %created.email, roles = ?created.roles, "user created");
    Ok(Json(PublicUser::new(created.into(), state.config.utc_offset)))
}

#[instrument(skip(state, creds))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(email): Path<String>,
    Query(creds): Query<Credentials>,
) -> Result<Json<PublicUser>, AppError> {
    let user = authenticate(state.store.as_ref(), &email, &creds.password).await?;
    Ok(Json(PublicUser::new(user.into(), state.config.utc_offset)))
}

#[instrument(skip(state, creds, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(email): Path<String>,
    Query(creds): Query<Credentials>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<StatusCode, AppError> {
    let mut user = authenticate(state.store.as_ref(), &email, &creds.password).await?;
    if let Err(e) = merge_update(&mut user, payload) {
        warn!(email = %user.email, error = %e, "update rejected");
        return Err(e);
    }
    state.store.update(&user).await?;
    info!(email = %user.email, "user updated");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<PublicUser>>, AppError> {
    if q.size == 0 || q.size > MAX_PAGE_SIZE {
        return Err(AppError::InvalidPagination(format!(
            "size must be between 1 and {MAX_PAGE_SIZE}"
        )));
    }
    let filter = UserFilter::select(
        q.criteria.as_deref(),
        q.value.as_deref(),
        OffsetDateTime::now_utc(),
    )?;

    let limit = i64::from(q.size);
    let offset = i64::from(q.page) * limit;
    let users = state.store.list(&filter, limit, offset).await?;

    let offset_tz = state.config.utc_offset;
    Ok(Json(
        users
            .into_iter()
            .map(|u| PublicUser::new(u, offset_tz))
            .collect(),
    ))
}

#[instrument(skip(state))]
pub async fn delete_all_users(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    let deleted = state.store.delete_all().await?;
    info!(deleted, "all users deleted");
    Ok(StatusCode::NO_CONTENT)
}
