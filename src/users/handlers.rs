use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::instrument;

use crate::{
    app::method_not_allowed,
    error::AppError,
    state::AppState,
    users::{
        dto::{CreateUserRequest, CreateUserResponse, USER_CREATED},
        services,
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new().route("/user", post(create_user).fallback(method_not_allowed))
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateUserResponse>), AppError> {
    let Json(payload) = payload?;
    let user = services::create_user(state.users.as_ref(), payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateUserResponse {
            message: USER_CREATED,
            user,
        }),
    ))
}
