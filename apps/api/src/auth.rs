//! Bearer-token extractors.
//!
//! Tokens are opaque strings issued at invite acceptance and resolved against
//! the `accounts` table on every request. Handlers take `AuthedAccount` for
//! any signed-in caller or `AdminAccount` for admin-only routes.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::errors::AppError;
use crate::models::account::AccountRow;
use crate::state::AppState;

/// Any authenticated, active account.
pub struct AuthedAccount(pub AccountRow);

/// An authenticated account holding the admin role.
pub struct AdminAccount(pub AccountRow);

#[async_trait]
impl FromRequestParts<AppState> for AuthedAccount {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AppError::Unauthorized)?;

        let account: Option<AccountRow> =
            sqlx::query_as("SELECT * FROM accounts WHERE auth_token = $1 AND active = TRUE")
                .bind(token)
                .fetch_optional(&state.db)
                .await?;

        account.map(AuthedAccount).ok_or(AppError::Unauthorized)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminAccount {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthedAccount(account) = AuthedAccount::from_request_parts(parts, state).await?;
        if !account.is_admin() {
            return Err(AppError::Unauthorized);
        }
        Ok(AdminAccount(account))
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}
