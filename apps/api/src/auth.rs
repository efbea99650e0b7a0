//! Request identity middleware.
//!
//! Authentication itself happens upstream (login endpoint plus a fronting
//! auth proxy); this middleware only lifts the proxy-asserted login name
//! into a [`Principal`] request extension so handlers and services receive
//! the caller identity as an explicit value.

use axum::{extract::Request, middleware::Next, response::Response};
use domain_users::Principal;

/// Header carrying the authenticated login name, set by the auth proxy.
pub const PRINCIPAL_HEADER: &str = "x-forwarded-user";

pub async fn principal_middleware(mut req: Request, next: Next) -> Response {
    let username = req
        .headers()
        .get(PRINCIPAL_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string);

    if let Some(username) = username {
        req.extensions_mut().insert(Principal::new(username));
    }

    next.run(req).await
}
