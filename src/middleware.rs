use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use surrealdb::RecordId;

use crate::consts::db_const::USER_TABLE;
use crate::errors::{Error, Result as RResult};
use crate::state::AppState;
use crate::utils::{jwt::decode_jwt, record_id::record_id};

/// Requester identity, recovered from the bearer token. Handlers declare it
/// as an extractor argument so every core operation receives the requester
/// explicitly instead of reading ambient state.
#[derive(Debug, Clone)]
pub struct UserId(pub RecordId);

impl FromRequestParts<AppState> for UserId {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> RResult<Self> {
        check_auth_parts(parts, &state.config.jwt_secret)
    }
}

fn check_auth_parts(parts: &Parts, secret: &str) -> RResult<UserId> {
    let header_value = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or(Error::MissingToken)?
        .to_str()
        .map_err(|_| Error::InvalidToken)?;

    let mut parts = header_value.trim().splitn(2, ' ');

    let scheme = parts.next().ok_or(Error::MissingToken)?;
    let token = parts.next().ok_or(Error::MissingToken)?;

    if scheme != "Bearer" {
        tracing::warn!("Invalid auth scheme: {scheme}");
        return Err(Error::InvalidScheme);
    }

    let data = decode_jwt(token, secret).map_err(|err| match err {
        Error::JwTError(source)
            if matches!(
                source.kind(),
                jsonwebtoken::errors::ErrorKind::ExpiredSignature
            ) =>
        {
            Error::TokenExpired
        }
        Error::JwTError(_) => Error::InvalidToken,
        other => other,
    })?;

    Ok(UserId(record_id(USER_TABLE, &data.claims.id)))
}
