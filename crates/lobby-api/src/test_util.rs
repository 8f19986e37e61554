use std::sync::Arc;

use axum::http::header::{LOCATION, SET_COOKIE};
use axum::response::Response;
use axum_extra::extract::cookie::Cookie;

use lobby_db::Database;

use crate::auth::{AppState, AppStateInner};
use crate::flash;

pub(crate) fn test_state() -> AppState {
    Arc::new(AppStateInner {
        db: Database::open_in_memory().unwrap(),
        session_secret: "test-secret".into(),
    })
}

/// The flash message a handler queued on `resp`, if any.
pub(crate) fn flash_message(resp: &Response) -> Option<String> {
    set_cookie(resp, flash::FLASH_COOKIE).and_then(|value| flash::decode(&value))
}

/// Value of the named cookie set on `resp`, skipping removals.
pub(crate) fn set_cookie(resp: &Response, name: &str) -> Option<String> {
    resp.headers().get_all(SET_COOKIE).iter().find_map(|header| {
        let cookie = Cookie::parse(header.to_str().ok()?.to_owned()).ok()?;
        (cookie.name() == name && !cookie.value().is_empty())
            .then(|| cookie.value().to_owned())
    })
}

pub(crate) fn location(resp: &Response) -> &str {
    resp.headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}
