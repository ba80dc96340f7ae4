//! Single-use status notices carried in a signed cookie between the
//! redirect that sets them and the page render that consumes them.

use axum_extra::extract::cookie::{Cookie, SameSite, SignedCookieJar};

use simple_events_types::models::Notice;

pub const FLASH_COOKIE: &str = "simple_events_notice";

pub fn set(jar: SignedCookieJar, notice: Notice) -> SignedCookieJar {
    jar.add(
        Cookie::build((FLASH_COOKIE, notice.code()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax),
    )
}

/// Reads the pending notice and clears it, so it shows exactly once.
pub fn take(jar: SignedCookieJar) -> (SignedCookieJar, Option<Notice>) {
    let Some(cookie) = jar.get(FLASH_COOKIE) else {
        return (jar, None);
    };

    let notice = Notice::from_code(cookie.value());
    (jar.remove(Cookie::build(FLASH_COOKIE).path("/")), notice)
}
