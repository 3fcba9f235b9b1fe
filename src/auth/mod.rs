use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub mod dto;
pub mod guard;
pub mod handlers;
pub mod password;
pub mod service;
pub mod token;
pub mod validate;

/// Cookie carrying the session token.
pub const AUTH_COOKIE: &str = "Authorization";

/// Session token lifetime; also the cookie Max-Age.
pub const TOKEN_TTL: time::Duration = time::Duration::days(30);

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/signup", post(handlers::sign_up))
        .route("/login", post(handlers::login))
        .route(
            "/validate",
            get(handlers::validate)
                .route_layer(middleware::from_fn_with_state(state, guard::require_auth)),
        )
}
