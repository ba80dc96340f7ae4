pub mod auth;
pub mod error;
pub mod events;
pub mod flash;
pub mod html;
pub mod middleware;
pub mod nonce;
pub mod page;
pub mod sanitize;
pub mod state;

use axum::{
    Router,
    middleware::from_fn_with_state,
    response::Redirect,
    routing::{get, post},
};

use crate::middleware::{require_login, require_session};
use crate::state::AppState;

pub const ADMIN_PAGE: &str = "/admin/events";
pub const CREATE_PATH: &str = "/admin/events/create";
pub const DELETE_PATH: &str = "/admin/events/delete";
pub const LOGIN_PAGE: &str = "/login";
pub const LOGOUT_PATH: &str = "/logout";

/// Builds the full application router around an already-wired state.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(|| async { Redirect::to(ADMIN_PAGE) }))
        .route(LOGIN_PAGE, get(auth::login_page).post(auth::login))
        .route(LOGOUT_PATH, get(auth::logout));

    let admin_page = Router::new()
        .route(ADMIN_PAGE, get(page::admin_page))
        .route_layer(from_fn_with_state(state.clone(), require_login));

    let form_handlers = Router::new()
        .route(CREATE_PATH, post(events::submit_create))
        .route(DELETE_PATH, get(events::submit_delete))
        .route_layer(from_fn_with_state(state.clone(), require_session));

    Router::new()
        .merge(public_routes)
        .merge(admin_page)
        .merge(form_handlers)
        .with_state(state)
}
