use axum::{Router, middleware::from_fn_with_state, routing::get};

use crate::middleware::{self, AuthState};

pub mod account;
pub mod geo;
pub mod system;

/// Router for everything under `/api/v1`.
pub fn router(auth: AuthState) -> Router {
    let whoami = Router::new()
        .route("/whoami", get(system::whoami))
        .route_layer(from_fn_with_state(auth.clone(), middleware::auth_middleware));

    Router::new()
        .nest("/account", account::router())
        .nest("/geo", geo::router(auth))
        .merge(whoami)
}
