//! Request extractors shared by the todo handlers.
//!
//! # Design
//! [`Username`] is the identity-resolution precondition: it maps the
//! `username` request header to a registered user before the handler (and
//! in particular the body extractor) runs, so an unknown user is a 404
//! regardless of what the payload contains. A missing or non-UTF-8 header
//! reports exactly like an unknown username. The store operations re-check
//! the user under their own lock; nothing can unregister a user in between,
//! as no such operation exists.
//!
//! [`Json`] and [`Path`] wrap their axum counterparts so extractor
//! rejections are routed through [`ApiError`] and every 4xx keeps the API's
//! error body shape instead of axum's plain-text default.

use axum::extract::{FromRef, FromRequest, FromRequestParts};
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::error::ApiError;
use crate::Db;

/// The resolved `username` request header: extraction succeeds only when a
/// user with that username is registered.
#[derive(Debug)]
pub struct Username(pub String);

impl<S> FromRequestParts<S> for Username
where
    Db: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let username = parts
            .headers
            .get("username")
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::UserNotFound)?;

        let db = Db::from_ref(state);
        db.read().await.resolve(username)?;
        Ok(Username(username.to_owned()))
    }
}

/// JSON body extractor whose rejection renders the API error body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

/// Path extractor whose rejection renders the API error body.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct Path<T>(pub T);
