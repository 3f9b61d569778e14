//! Authentication middleware
//!
//! Extractors that verify the bearer token and hand handlers a caller
//! identity and role. Handlers trust this identity; credential checks
//! happen only here and in the auth service.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use tracing::debug;

use crate::models::user::UserRole;
use crate::state::AppState;
use crate::utils::errors::{EventifyError, Result};

/// A verified caller: who they are and what role their token carries
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: i64,
    pub role: UserRole,
}

impl AuthUser {
    /// Require the student role
    pub fn require_student(&self) -> Result<()> {
        if self.role == UserRole::Student {
            Ok(())
        } else {
            Err(EventifyError::PermissionDenied(
                "Only students can perform this action".to_string(),
            ))
        }
    }

    /// Require the club admin role
    pub fn require_club_admin(&self) -> Result<()> {
        if self.role == UserRole::ClubAdmin {
            Ok(())
        } else {
            Err(EventifyError::PermissionDenied(
                "Only club admins can perform this action".to_string(),
            ))
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = EventifyError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(EventifyError::AuthenticationRequired)?;
        let token = header
            .strip_prefix("Bearer ")
            .ok_or(EventifyError::AuthenticationRequired)?;

        let claims = state.services.auth_service.verify_token(token)?;
        let role: UserRole = claims
            .role
            .parse()
            .map_err(|_| EventifyError::AuthenticationRequired)?;

        debug!(user_id = claims.sub, role = %role, "Authenticated request");
        Ok(AuthUser {
            user_id: claims.sub,
            role,
        })
    }
}

/// Like [`AuthUser`] but absent instead of rejecting when the request
/// carries no (valid) token; for public endpoints that personalize output
#[derive(Debug, Clone, Copy)]
pub struct OptionalAuthUser(pub Option<AuthUser>);

#[async_trait]
impl FromRequestParts<AppState> for OptionalAuthUser {
    type Rejection = EventifyError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self> {
        Ok(Self(AuthUser::from_request_parts(parts, state).await.ok()))
    }
}
