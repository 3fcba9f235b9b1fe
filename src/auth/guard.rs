use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use time::OffsetDateTime;
use tracing::warn;

use crate::auth::AUTH_COOKIE;
use crate::state::AppState;
use crate::users::model::User;

/// Authenticated user attached to the request by [`require_auth`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Admits a request only with a live, well-signed token in the
/// `Authorization` cookie whose subject resolves to a user. Aborts on the
/// first failing step with a bodiless 401.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let jar = CookieJar::from_headers(req.headers());
    let Some(cookie) = jar.get(AUTH_COOKIE) else {
        return StatusCode::UNAUTHORIZED.into_response();
    };

    let claims = match state.codec.parse(cookie.value()) {
        Ok(claims) => claims,
        Err(e) => {
            warn!(error = %e, "rejected token");
            return StatusCode::UNAUTHORIZED.into_response();
        }
    };

    // Re-checked here so the guard contract does not lean on the codec's
    // internal expiry policy.
    if OffsetDateTime::now_utc().unix_timestamp() > claims.exp {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let user = match state.users.find_by_id(claims.sub).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            warn!(sub = claims.sub, "token subject has no user");
            return StatusCode::UNAUTHORIZED.into_response();
        }
        Err(e) => {
            warn!(error = %e, "user lookup failed");
            return StatusCode::UNAUTHORIZED.into_response();
        }
    };

    req.extensions_mut().insert(CurrentUser(user));
    next.run(req).await
}
