use thiserror::Error;
use tracing::{error, info, warn};

use crate::auth::dto::{LoginRequest, SignUpRequest};
use crate::auth::password::{hash_password, verify_password, HashError};
use crate::auth::token::{TokenCodec, TokenError};
use crate::auth::validate::{validate_login, validate_sign_up, ValidationErrors};
use crate::auth::TOKEN_TTL;
use crate::users::repo::{NewUser, StoreError, UserStore};

#[derive(Debug, Error)]
pub enum SignUpError {
    #[error("validation failed")]
    Validation(ValidationErrors),
    #[error(transparent)]
    Hash(#[from] HashError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum LoginError {
    #[error("validation failed")]
    Validation(ValidationErrors),
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error(transparent)]
    Token(#[from] TokenError),
}

/// Validate, hash, persist. The request's `first_name` is checked but not
/// stored; the created row carries only email and digest plus defaults.
pub async fn sign_up(users: &dyn UserStore, req: &SignUpRequest) -> Result<(), SignUpError> {
    let valid = validate_sign_up(req).map_err(SignUpError::Validation)?;
    let password_hash = hash_password(&valid.password)?;
    let user = users
        .insert(NewUser {
            email: valid.email,
            password_hash,
        })
        .await?;
    info!(user_id = user.id, email = %user.email, "user signed up");
    Ok(())
}

/// Validate, look up, verify, mint a token.
///
/// An unknown email, a storage miss and a wrong password all collapse into
/// `InvalidCredentials` so the wire response cannot be used to enumerate
/// accounts.
pub async fn login(
    users: &dyn UserStore,
    codec: &TokenCodec,
    req: &LoginRequest,
) -> Result<String, LoginError> {
    let valid = validate_login(req).map_err(LoginError::Validation)?;

    let user = match users.find_by_email(&valid.email).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            warn!(email = %valid.email, "login with unknown email");
            return Err(LoginError::InvalidCredentials);
        }
        Err(e) => {
            error!(error = %e, "find_by_email failed");
            return Err(LoginError::InvalidCredentials);
        }
    };

    if !verify_password(&user.password_hash, &valid.password) {
        warn!(user_id = user.id, "login with invalid password");
        return Err(LoginError::InvalidCredentials);
    }

    let token = codec.issue_for(user.id, TOKEN_TTL)?;
    info!(user_id = user.id, "user logged in");
    Ok(token)
}
