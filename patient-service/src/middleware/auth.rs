use crate::error_messages::ErrorMessage;
use crate::services::AccessTokenClaims;
use crate::startup::AppState;
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use service_core::error::AppError;

/// Rejects requests without a valid bearer token and stores the decoded
/// claims in the request extensions for [`AuthUser`].
pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or_else(|| {
        tracing::debug!("Missing or malformed Authorization header");
        AppError::Unauthorized(anyhow::anyhow!(ErrorMessage::Unauthorized))
    })?;

    let claims = state
        .jwt
        .validate_access_token(bearer.token())
        .map_err(|e| {
            tracing::debug!(error = %e, "Rejected access token");
            AppError::Unauthorized(anyhow::anyhow!(ErrorMessage::Unauthorized))
        })?;

    tracing::Span::current().record("user_id", claims.sub.as_str());
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// The authenticated caller.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims = parts
            .extensions
            .get::<AccessTokenClaims>()
            .ok_or_else(|| AppError::Unauthorized(anyhow::anyhow!(ErrorMessage::Unauthorized)))?;

        Ok(AuthUser {
            user_id: claims.sub.clone(),
        })
    }
}
