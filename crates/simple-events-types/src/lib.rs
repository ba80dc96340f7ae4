/// Shared types for the Simple Events service.
///
/// `api` holds what crosses the HTTP boundary (forms, typed requests,
/// session claims); `models` holds roles and flash notices.
pub mod api;
pub mod models;
