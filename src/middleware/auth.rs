//! Authentication middleware for admin API routes
//!
//! Requires a valid Bearer token; the resolved user is stored in request
//! extensions for extractors and the audit context.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use crate::error::{AppError, Result};
use crate::models::prelude::*;
use crate::models::user;
use crate::services::security::decode_token;
use crate::state::AppState;

/// Authenticated user stored in request extensions
#[derive(Clone, Debug)]
pub struct AuthenticatedUser(pub user::Model);

/// Auth middleware that validates Bearer tokens
///
/// Rejects with 401 when the token is missing, invalid, a refresh token, or
/// belongs to an unknown or inactive user. A failed user lookup is a 500.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let token = bearer_token(&req).map(str::to_owned);

    match authenticate(&state, token).await {
        Ok(user) => {
            req.extensions_mut().insert(AuthenticatedUser(user));
            next.run(req).await
        }
        Err(e) => {
            tracing::debug!(error = %e, path = %req.uri().path(), "Rejected admin request");
            e.into_response()
        }
    }
}

async fn authenticate(state: &AppState, token: Option<String>) -> Result<user::Model> {
    let token = token.ok_or_else(|| {
        AppError::Unauthorized("Missing or invalid Authorization header".to_string())
    })?;

    let claims = decode_token(&token)
        .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))?;

    if claims.token_type.as_deref() == Some("refresh") {
        return Err(AppError::Unauthorized(
            "Refresh tokens cannot be used for API access".to_string(),
        ));
    }

    User::find_by_id(claims.user_id()?)
        .filter(user::Column::IsActive.eq(true))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found or inactive".to_string()))
}

fn bearer_token(req: &Request) -> Option<&str> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}
