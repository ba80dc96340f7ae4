use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{DecodingKey, Validation, decode};
use tracing::warn;

use simple_events_types::api::Claims;
use simple_events_types::models::Capability;

use crate::LOGIN_PAGE;
use crate::error::ApiError;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "simple_events_session";

/// Decode and validate the JWT held in the session cookie.
pub fn session_claims(state: &AppState, jar: &CookieJar) -> Option<Claims> {
    let token = jar.get(SESSION_COOKIE)?.value();

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .ok()
}

/// Pages: an anonymous visitor is sent to the login form.
pub async fn require_login(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    match session_claims(&state, &jar) {
        Some(claims) => {
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        None => Redirect::to(LOGIN_PAGE).into_response(),
    }
}

/// Form handlers: no session means the request stops here.
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = session_claims(&state, &jar).ok_or_else(|| {
        warn!("Rejected {} {}: no valid session", req.method(), req.uri().path());
        ApiError::Unauthorized
    })?;

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

pub fn authorize(claims: &Claims, cap: Capability) -> Result<(), ApiError> {
    if claims.role.can(cap) {
        Ok(())
    } else {
        warn!("User {} lacks {:?}", claims.username, cap);
        Err(ApiError::Unauthorized)
    }
}
