use std::fmt::Write;

use axum::{Extension, extract::State, response::Html};
use axum_extra::extract::cookie::SignedCookieJar;

use simple_events_db::models::EventRow;
use simple_events_types::api::Claims;
use simple_events_types::models::{Capability, Notice, NoticeKind};

use crate::error::{ApiError, join_error};
use crate::html::{escape, layout};
use crate::middleware::authorize;
use crate::nonce::{CREATE_EVENT_ACTION, LOG_OUT_ACTION, NonceIssuer, delete_event_action};
use crate::state::AppState;
use crate::{CREATE_PATH, DELETE_PATH, LOGOUT_PATH, flash};

/// GET /admin/events: creation form, event table and any pending notice.
pub async fn admin_page(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    jar: SignedCookieJar,
) -> Result<(SignedCookieJar, Html<String>), ApiError> {
    authorize(&claims, Capability::ManageOptions)?;

    let db = state.clone();
    let events = tokio::task::spawn_blocking(move || db.db.list_events())
        .await
        .map_err(join_error)??;

    let (jar, notice) = flash::take(jar);
    let html = render_admin_page(&claims, &events, notice, &state.nonces);

    Ok((jar, Html(html)))
}

pub fn render_admin_page(
    claims: &Claims,
    events: &[EventRow],
    notice: Option<Notice>,
    nonces: &NonceIssuer,
) -> String {
    let mut body = String::from("<div class=\"wrap\">\n");

    let logout_href = format!(
        "{}?_token={}",
        LOGOUT_PATH,
        nonces.create(LOG_OUT_ACTION, claims.sub)
    );
    let _ = writeln!(
        body,
        "<div class=\"topbar\"><h1>Events</h1><p>{} &middot; <a href=\"{}\">Log Out</a></p></div>",
        escape(&claims.username),
        escape(&logout_href)
    );

    if let Some(notice) = notice {
        let class = match notice.kind() {
            NoticeKind::Success => "notice-success",
            NoticeKind::Error => "notice-error",
        };
        let _ = writeln!(
            body,
            "<div class=\"notice {}\"><p>{}</p></div>",
            class,
            escape(notice.message())
        );
    }

    render_form(&mut body, &nonces.create(CREATE_EVENT_ACTION, claims.sub));
    render_table(&mut body, events, |id| nonces.create(&delete_event_action(id), claims.sub));

    body.push_str("</div>");
    layout("Events", &body)
}

fn render_form(out: &mut String, token: &str) {
    let _ = write!(
        out,
        "<form method=\"post\" action=\"{action}\">
<input type=\"hidden\" name=\"_token\" value=\"{token}\">
<table class=\"form-table\">
<tr><th><label for=\"event_name\">Event name</label></th>
<td><input type=\"text\" id=\"event_name\" name=\"event_name\" maxlength=\"255\" required></td></tr>
<tr><th><label for=\"event_date\">Event date</label></th>
<td><input type=\"date\" id=\"event_date\" name=\"event_date\" required></td></tr>
<tr><th><label for=\"event_description\">Event description</label></th>
<td><textarea id=\"event_description\" name=\"event_description\" rows=\"5\" required></textarea></td></tr>
</table>
<p><input type=\"submit\" value=\"Add Event\"></p>
</form>
",
        action = escape(CREATE_PATH),
        token = escape(token)
    );
}

fn render_table(out: &mut String, events: &[EventRow], delete_token: impl Fn(i64) -> String) {
    out.push_str(
        "<h2>Event List</h2>
<table class=\"widefat\">
<thead><tr><th>Name</th><th>Date</th><th>Description</th><th>Actions</th></tr></thead>
<tbody>
",
    );

    if events.is_empty() {
        out.push_str("<tr><td colspan=\"4\">No events yet.</td></tr>\n");
    }

    for event in events {
        let href = format!(
            "{}?event_id={}&_token={}",
            DELETE_PATH,
            event.id,
            delete_token(event.id)
        );
        let _ = writeln!(
            out,
            "<tr><td>{}</td><td>{}</td><td class=\"description\">{}</td><td><a href=\"{}\">Delete</a></td></tr>",
            escape(&event.name),
            escape(&event.date.format("%Y-%m-%d").to_string()),
            escape(&event.description),
            escape(&href)
        );
    }

    out.push_str("</tbody>\n</table>\n");
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use simple_events_types::models::Role;

    use super::*;
    use crate::flash::FLASH_COOKIE;
    use crate::test_support::*;
    use crate::{ADMIN_PAGE, router};

    fn event(id: i64, name: &str, description: &str) -> EventRow {
        EventRow {
            id,
            name: name.into(),
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            description: description.into(),
            created_at: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn empty_list_renders_placeholder_row() {
        let state = test_state();
        let html = render_admin_page(&claims(Role::Administrator), &[], None, &state.nonces);
        assert!(html.contains("<td colspan=\"4\">No events yet.</td>"));
    }

    #[test]
    fn user_text_is_escaped() {
        let state = test_state();
        let events = [event(1, "<b>Launch</b>", "<script>alert(1)</script>")];
        let html = render_admin_page(&claims(Role::Administrator), &events, None, &state.nonces);

        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("&lt;b&gt;Launch&lt;/b&gt;"));
        assert!(!html.contains("<script>"));
        assert!(!html.contains("No events yet."));
    }

    #[test]
    fn rows_carry_scoped_delete_tokens() {
        let state = test_state();
        let claims = claims(Role::Administrator);
        let html = render_admin_page(&claims, &[event(7, "a", "b")], None, &state.nonces);

        let token = state.nonces.create(&delete_event_action(7), claims.sub);
        assert!(html.contains(&format!("{DELETE_PATH}?event_id=7&amp;_token={token}")));

        let create_token = state.nonces.create(CREATE_EVENT_ACTION, claims.sub);
        assert!(html.contains(&format!("name=\"_token\" value=\"{create_token}\"")));
    }

    #[test]
    fn notice_is_rendered_with_its_kind() {
        let state = test_state();
        let html = render_admin_page(
            &claims(Role::Administrator),
            &[],
            Some(Notice::EventAddFailed),
            &state.nonces,
        );
        assert!(html.contains("notice-error"));
        assert!(html.contains(Notice::EventAddFailed.message()));
    }

    #[tokio::test]
    async fn page_without_session_redirects_to_login() {
        let state = test_state();
        let resp = send(router(state), get(ADMIN_PAGE, None)).await;

        assert!(resp.status().is_redirection());
        assert_eq!(location(&resp), Some("/login"));
    }

    #[tokio::test]
    async fn page_with_forged_session_redirects_to_login() {
        let state = test_state();
        let cookie = "simple_events_session=not-a-jwt";
        let resp = send(router(state), get(ADMIN_PAGE, Some(cookie))).await;

        assert_eq!(location(&resp), Some("/login"));
    }

    #[tokio::test]
    async fn subscriber_cannot_view_page() {
        let state = test_state();
        let cookie = session_cookie(&state, &claims(Role::Subscriber));
        let resp = send(router(state), get(ADMIN_PAGE, Some(&cookie))).await;

        assert_eq!(resp.status(), 403);
    }

    #[tokio::test]
    async fn page_lists_events() {
        let state = test_state();
        state
            .db
            .create_event("Launch", NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(), "Kickoff")
            .unwrap();
        let cookie = session_cookie(&state, &claims(Role::Administrator));

        let resp = send(router(state), get(ADMIN_PAGE, Some(&cookie))).await;
        assert_eq!(resp.status(), 200);

        let body = body_text(resp).await;
        assert!(body.contains("<td>Launch</td><td>2025-06-01</td>"));
        assert!(body.contains("Kickoff"));
    }

    #[tokio::test]
    async fn page_without_notice_sets_no_cookie() {
        let state = test_state();
        let cookie = session_cookie(&state, &claims(Role::Administrator));
        let resp = send(router(state), get(ADMIN_PAGE, Some(&cookie))).await;

        assert!(set_cookie(&resp, FLASH_COOKIE).is_none());
    }
}
