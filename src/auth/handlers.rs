use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::{error, instrument, warn};

use crate::auth::dto::{
    IdentityResponse, LoginRequest, SignUpRequest, StatusError, StatusMessage, TokenGrant,
    UserProjection, ValidationFailure,
};
use crate::auth::guard::CurrentUser;
use crate::auth::service::{self, LoginError, SignUpError};
use crate::auth::{AUTH_COOKIE, TOKEN_TTL};
use crate::state::AppState;

#[instrument(skip(state, payload))]
pub async fn sign_up(
    State(state): State<AppState>,
    Json(payload): Json<SignUpRequest>,
) -> Response {
    match service::sign_up(state.users.as_ref(), &payload).await {
        Ok(()) => (
            StatusCode::OK,
            Json(StatusMessage {
                success: true,
                message: "Signup Successful",
            }),
        )
            .into_response(),
        Err(SignUpError::Validation(errors)) => (
            StatusCode::BAD_REQUEST,
            Json(ValidationFailure {
                success: false,
                message: "Failed to create user",
                errors,
            }),
        )
            .into_response(),
        Err(SignUpError::Hash(e)) => {
            error!(error = %e, "sign-up hashing failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(StatusError {
                    success: false,
                    error: "Failed to hash password",
                }),
            )
                .into_response()
        }
        Err(SignUpError::Store(e)) => {
            warn!(error = %e, "sign-up insert failed");
            (
                StatusCode::BAD_REQUEST,
                Json(StatusError {
                    success: false,
                    error: "Failed to create user",
                }),
            )
                .into_response()
        }
    }
}

fn auth_cookie(token: String) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE, token))
        .path("/")
        .max_age(TOKEN_TTL)
        .http_only(true)
        .secure(false)
        .same_site(SameSite::Lax)
        .build()
}

#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Response {
    match service::login(state.users.as_ref(), &state.codec, &payload).await {
        Ok(token) => {
            let jar = jar.add(auth_cookie(token.clone()));
            (
                jar,
                Json(TokenGrant {
                    success: true,
                    message: "Cookie Passed",
                    token,
                }),
            )
                .into_response()
        }
        Err(LoginError::Validation(errors)) => (
            StatusCode::BAD_REQUEST,
            Json(ValidationFailure {
                success: false,
                message: "Failed to login",
                errors,
            }),
        )
            .into_response(),
        Err(LoginError::InvalidCredentials) => (
            StatusCode::BAD_REQUEST,
            Json(StatusError {
                success: false,
                error: "Invalid Email or Password",
            }),
        )
            .into_response(),
        Err(LoginError::Token(e)) => {
            error!(error = %e, "token signing failed");
            (
                StatusCode::BAD_REQUEST,
                Json(StatusError {
                    success: false,
                    error: "Failed to create token",
                }),
            )
                .into_response()
        }
    }
}

/// Identity endpoint behind the guard; the guard has already resolved the
/// user, this only projects it.
#[instrument(skip(user))]
pub async fn validate(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Response {
    (
        StatusCode::OK,
        Json(IdentityResponse {
            success: true,
            message: "Logged In",
            user: UserProjection::from(&user),
        }),
    )
        .into_response()
}
