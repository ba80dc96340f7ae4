use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{EncodingKey, Header, encode};
use tracing::{info, warn};
use uuid::Uuid;

use simple_events_db::Database;
use simple_events_types::api::{Claims, LoginForm, TokenQuery};
use simple_events_types::models::Role;

use crate::error::{ApiError, join_error};
use crate::html;
use crate::middleware::{SESSION_COOKIE, session_claims};
use crate::nonce::LOG_OUT_ACTION;
use crate::state::AppState;
use crate::{ADMIN_PAGE, LOGIN_PAGE};

pub async fn login_page() -> Html<String> {
    Html(html::login_page(None))
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, ApiError> {
    let db = state.clone();
    let username = form.username.clone();
    let user = tokio::task::spawn_blocking(move || db.db.get_user_by_username(&username))
        .await
        .map_err(join_error)??;

    let Some(user) = user else {
        warn!("Login failed for unknown user {:?}", form.username);
        return Ok(login_failed());
    };

    // Verify password
    let parsed_hash = PasswordHash::new(&user.password)
        .map_err(|e| ApiError::Internal(format!("bad password hash for {}: {}", user.username, e)))?;

    if Argon2::default()
        .verify_password(form.password.as_bytes(), &parsed_hash)
        .is_err()
    {
        warn!("Login failed for {}", user.username);
        return Ok(login_failed());
    }

    let user_id: Uuid = user
        .id
        .parse()
        .map_err(|e| ApiError::Internal(format!("bad user id {}: {}", user.id, e)))?;

    let token = create_token(&state.secret, state.session_ttl, user_id, &user.username, user.role)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    info!("{} logged in", user.username);

    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);

    Ok((jar.add(cookie), Redirect::to(ADMIN_PAGE)).into_response())
}

fn login_failed() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Html(html::login_page(Some("Invalid username or password."))),
    )
        .into_response()
}

/// GET /logout?_token=…; the token keeps third-party pages from logging
/// the user out.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<TokenQuery>,
) -> Result<(CookieJar, Redirect), ApiError> {
    let Some(claims) = session_claims(&state, &jar) else {
        return Ok((jar, Redirect::to(LOGIN_PAGE)));
    };

    if !state.nonces.verify(&query.token, LOG_OUT_ACTION, claims.sub) {
        return Err(ApiError::InvalidToken);
    }

    info!("{} logged out", claims.username);
    Ok((
        jar.remove(Cookie::build(SESSION_COOKIE).path("/")),
        Redirect::to(LOGIN_PAGE),
    ))
}

pub fn create_token(
    secret: &str,
    ttl: chrono::Duration,
    user_id: Uuid,
    username: &str,
    role: Role,
) -> anyhow::Result<String> {
    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        role,
        exp: (chrono::Utc::now() + ttl).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Password hashing failed: {}", e))?
        .to_string();
    Ok(hash)
}

/// Creates the administrator account if the username is free.
/// Returns whether a user was created.
pub fn bootstrap_admin(db: &Database, username: &str, password: &str) -> anyhow::Result<bool> {
    if db.get_user_by_username(username)?.is_some() {
        return Ok(false);
    }

    let hash = hash_password(password)?;
    db.create_user(&Uuid::new_v4().to_string(), username, &hash, Role::Administrator)?;
    info!("Created administrator {}", username);
    Ok(true)
}
