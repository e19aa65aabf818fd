use std::sync::Arc;

use axum::{
    Extension, Json, Router, extract::rejection::JsonRejection, response::Redirect, routing::post,
};

use crate::app::dto::LoginInput;
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/reopen", post(reopen_account))
}

/// POST /account/reopen - reactivate a closed account, then send the user to the login page.
///
/// Anonymous: a closed account has no session to authenticate with.
pub async fn reopen_account(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<LoginInput>, JsonRejection>,
) -> Result<Redirect, ApiError> {
    let Json(model) = payload?;
    model.validate().map_err(ApiError::Validation)?;

    let username = model.username.trim();
    services
        .account
        .reopen_account(username, &model.password)
        .await?;

    tracing::info!(%username, "account reopened, redirecting to login");
    Ok(Redirect::to(services.login_url.as_str()))
}
