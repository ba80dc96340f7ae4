//! Form handlers for creating and deleting events. Both end in a redirect
//! to the admin page carrying a one-shot notice; only authorization and
//! token failures stop the request early.

use axum::{
    Extension, Form,
    extract::{Query, State},
    response::Redirect,
};
use axum_extra::extract::cookie::SignedCookieJar;
use tracing::{error, info, warn};

use simple_events_types::api::{
    Claims, CreateEventForm, CreateEventRequest, DeleteEventQuery, DeleteEventRequest,
};
use simple_events_types::models::{Capability, Notice};

use crate::error::{ApiError, join_error};
use crate::middleware::authorize;
use crate::nonce::{CREATE_EVENT_ACTION, delete_event_action};
use crate::state::AppState;
use crate::{ADMIN_PAGE, flash, sanitize};

/// POST /admin/events/create
pub async fn submit_create(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    jar: SignedCookieJar,
    Form(form): Form<CreateEventForm>,
) -> Result<(SignedCookieJar, Redirect), ApiError> {
    authorize(&claims, Capability::ManageOptions)?;

    if !state.nonces.verify(&form.token, CREATE_EVENT_ACTION, claims.sub) {
        warn!("Invalid create token from {}", claims.username);
        return Err(ApiError::InvalidToken);
    }

    let name = sanitize::text_field(&form.event_name);
    let date = sanitize::text_field(&form.event_date);
    let description = sanitize::textarea_field(&form.event_description);

    let req = match CreateEventRequest::new(name, &date, description) {
        Ok(req) => req,
        Err(e) => {
            warn!("Rejected event from {}: {}", claims.username, e);
            return Ok((flash::set(jar, Notice::InvalidInput), Redirect::to(ADMIN_PAGE)));
        }
    };

    let db = state.clone();
    let result = tokio::task::spawn_blocking(move || {
        db.db.create_event(&req.name, req.date, &req.description)
    })
    .await
    .map_err(join_error)?;

    let notice = match result {
        Ok(id) => {
            info!("{} created event {}", claims.username, id);
            Notice::EventAdded
        }
        Err(e) => {
            error!("Failed to create event: {:#}", e);
            Notice::EventAddFailed
        }
    };

    Ok((flash::set(jar, notice), Redirect::to(ADMIN_PAGE)))
}

/// GET /admin/events/delete?event_id=…&_token=…
pub async fn submit_delete(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    jar: SignedCookieJar,
    Query(query): Query<DeleteEventQuery>,
) -> Result<(SignedCookieJar, Redirect), ApiError> {
    let req = DeleteEventRequest::from(&query);

    authorize(&claims, Capability::ManageOptions)?;

    // The token is bound to the id so it cannot be replayed against another row.
    if !state
        .nonces
        .verify(&query.token, &delete_event_action(req.event_id), claims.sub)
    {
        warn!("Invalid delete token for event {} from {}", req.event_id, claims.username);
        return Err(ApiError::InvalidToken);
    }

    let db = state.clone();
    let result = tokio::task::spawn_blocking(move || db.db.delete_event(req.event_id))
        .await
        .map_err(join_error)?;

    // Zero rows removed is still reported as success.
    let notice = match result {
        Ok(removed) => {
            info!("{} deleted event {} ({} row(s))", claims.username, req.event_id, removed);
            Notice::EventDeleted
        }
        Err(e) => {
            error!("Failed to delete event {}: {:#}", req.event_id, e);
            Notice::EventDeleteFailed
        }
    };

    Ok((flash::set(jar, notice), Redirect::to(ADMIN_PAGE)))
}
