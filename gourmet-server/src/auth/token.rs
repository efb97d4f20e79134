//! Owner Token Extractors
//!
//! Two extractors over the same `x-user-cookie` header, differing only in
//! the rejection they produce:
//!
//! - [`OwnerToken`] — identity for review/bookmark operations; missing
//!   token is a 400 (`MissingIdentity`).
//! - [`ListingToken`] — presence-only gate for creating restaurants and
//!   menu items; missing token is a 401. Listings are crowd-sourced, so
//!   this checks existence, never ownership.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::utils::AppError;

/// Header carrying the caller-minted opaque token.
pub const OWNER_TOKEN_HEADER: &str = "x-user-cookie";

/// Owner identity for gated review/bookmark operations.
#[derive(Debug, Clone)]
pub struct OwnerToken(pub String);

/// Presence-only token gate for listing creation.
#[derive(Debug, Clone)]
pub struct ListingToken(pub String);

fn token_from_parts(parts: &Parts) -> Option<String> {
    let token = parts
        .headers
        .get(OWNER_TOKEN_HEADER)?
        .to_str()
        .ok()?
        .trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

impl<S> FromRequestParts<S> for OwnerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        token_from_parts(parts)
            .map(OwnerToken)
            .ok_or(AppError::MissingIdentity)
    }
}

impl<S> FromRequestParts<S> for ListingToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        token_from_parts(parts)
            .map(ListingToken)
            .ok_or(AppError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri("/");
        for (k, v) in headers {
            builder = builder.header(*k, *v);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn owner_token_extracts_header() {
        let mut parts = parts_with(&[(OWNER_TOKEN_HEADER, "user-abc")]);
        let token = OwnerToken::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(token.0, "user-abc");
    }

    #[tokio::test]
    async fn owner_token_rejects_missing_header() {
        let mut parts = parts_with(&[]);
        let err = OwnerToken::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MissingIdentity));
    }

    #[tokio::test]
    async fn owner_token_rejects_blank_header() {
        let mut parts = parts_with(&[(OWNER_TOKEN_HEADER, "   ")]);
        let err = OwnerToken::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MissingIdentity));
    }

    #[tokio::test]
    async fn listing_token_rejects_with_unauthorized() {
        let mut parts = parts_with(&[]);
        let err = ListingToken::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }
}
