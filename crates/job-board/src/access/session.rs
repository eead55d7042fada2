use std::sync::Arc;

use axum::http::{header, HeaderMap};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::directory::ProfileDirectory;
use super::domain::UserId;
use super::gate::SessionContext;
use crate::backend::RepositoryError;

/// Cookie written by the hosted auth client.
pub const ACCESS_TOKEN_COOKIE: &str = "sb-access-token";
/// Audience stamped on tokens issued to signed-in users.
pub const SESSION_AUDIENCE: &str = "authenticated";

/// Claims read from an access token issued by the auth service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub exp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("invalid session token: {0}")]
    InvalidToken(String),
    #[error("session token carries no subject")]
    MissingSubject,
    #[error("profile lookup failed: {0}")]
    Directory(#[from] RepositoryError),
}

/// HS256 verifier for access tokens signed with the backend's JWT secret.
#[derive(Clone)]
pub struct SessionVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl SessionVerifier {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[SESSION_AUDIENCE]);
        Self {
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn verify(&self, token: &str) -> Result<UserId, SessionError> {
        let data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|err| SessionError::InvalidToken(err.to_string()))?;
        let subject = data.claims.sub.trim();
        if subject.is_empty() {
            return Err(SessionError::MissingSubject);
        }
        Ok(UserId(subject.to_string()))
    }
}

/// Pull the access token from the `Authorization` header, falling back to the auth cookie.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let from_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| {
            let (scheme, token) = value.trim().split_once(' ')?;
            scheme
                .eq_ignore_ascii_case("bearer")
                .then(|| token.trim().to_string())
        })
        .filter(|token| !token.is_empty());
    if from_header.is_some() {
        return from_header;
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == ACCESS_TOKEN_COOKIE)
        .map(|(_, token)| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

/// Turns request headers into a [`SessionContext`].
#[derive(Clone)]
pub struct SessionResolver {
    verifier: SessionVerifier,
    profiles: Arc<dyn ProfileDirectory>,
}

impl SessionResolver {
    pub fn new(verifier: SessionVerifier, profiles: Arc<dyn ProfileDirectory>) -> Self {
        Self { verifier, profiles }
    }

    /// Unusable tokens and unknown users yield an anonymous context; only a failing
    /// profile lookup is reported as an error.
    pub async fn resolve(&self, headers: &HeaderMap) -> Result<SessionContext, SessionError> {
        let Some(token) = bearer_token(headers) else {
            return Ok(SessionContext::anonymous());
        };

        let user_id = match self.verifier.verify(&token) {
            Ok(user_id) => user_id,
            Err(err) => {
                debug!(error = %err, "discarding unusable session token");
                return Ok(SessionContext::anonymous());
            }
        };

        match self.profiles.fetch_profile(&user_id).await? {
            Some(profile) => Ok(SessionContext::authenticated(profile)),
            None => {
                debug!(%user_id, "session subject has no profile");
                Ok(SessionContext::anonymous())
            }
        }
    }
}
