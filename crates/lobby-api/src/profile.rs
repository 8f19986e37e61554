use axum::{
    Extension, Form,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use tracing::error;

use lobby_db::models::{ContactRow, UserRow};

use crate::auth::AppState;
use crate::flash;
use crate::forms::ProfileEditForm;
use crate::pages::{self, escape};
use crate::session::Claims;

pub async fn profile(
    State(state): State<AppState>,
    jar: CookieJar,
    Extension(claims): Extension<Claims>,
) -> Response {
    let user = match state.db.user_by_id(claims.sub) {
        Ok(Some(user)) => user,
        // The session names a user that no longer resolves to a row.
        Ok(None) => {
            return (flash::set(jar, "User not found."), Redirect::to("/")).into_response();
        }
        Err(e) => {
            error!("Profile load failed: {e}");
            return (
                flash::set(jar, "Could not load your profile."),
                Redirect::to("/"),
            )
                .into_response();
        }
    };

    let history = match state.db.contacts_for_user(user.id) {
        Ok(history) => history,
        Err(e) => {
            error!("Contact history load failed: {e}");
            return (
                flash::set(jar, "Could not load your profile."),
                Redirect::to("/"),
            )
                .into_response();
        }
    };

    let (jar, message) = flash::take(jar);
    (jar, render_profile(&user, &history, message.as_deref())).into_response()
}

fn render_profile(
    user: &UserRow,
    history: &[ContactRow],
    flash_message: Option<&str>,
) -> Html<String> {
    let mut body = format!(
        "<h1>{}</h1>\n<ul>\n\
         <li>Email: {}</li>\n\
         <li>Phone: {}</li>\n\
         <li>Company: {}</li>\n\
         <li>Bio: {}</li>\n\
         <li>Member since: {}</li>\n</ul>\n\
         <p><a href=\"/profile/edit\">Edit profile</a> <a href=\"/logout\">Log out</a></p>\n\
         <h2>Your messages</h2>\n",
        escape(&user.username),
        escape(&user.email),
        escape(user.phone.as_deref().unwrap_or("")),
        escape(user.company.as_deref().unwrap_or("")),
        escape(user.bio.as_deref().unwrap_or("")),
        escape(&user.created_at),
    );

    if history.is_empty() {
        body.push_str("<p>No messages yet.</p>\n");
    } else {
        body.push_str("<ol>\n");
        for contact in history {
            body.push_str(&format!(
                "<li>{} ({}): {}</li>\n",
                escape(&contact.created_at),
                escape(&contact.email),
                escape(&contact.message),
            ));
        }
        body.push_str("</ol>\n");
    }

    pages::render("Profile", flash_message, &body)
}

pub async fn edit_page(
    State(state): State<AppState>,
    jar: CookieJar,
    Extension(claims): Extension<Claims>,
) -> Response {
    let user = match state.db.user_by_id(claims.sub) {
        Ok(Some(user)) => user,
        Ok(None) => {
            return (flash::set(jar, "User not found."), Redirect::to("/")).into_response();
        }
        Err(e) => {
            error!("Profile load failed: {e}");
            return (
                flash::set(jar, "Could not load your profile."),
                Redirect::to("/"),
            )
                .into_response();
        }
    };

    let body = format!(
        "<h1>Edit profile</h1>\n\
         <form method=\"post\" action=\"/profile/edit\">\n\
         <label>Phone <input name=\"phone\" value=\"{}\"></label>\n\
         <label>Company <input name=\"company\" value=\"{}\"></label>\n\
         <label>Bio <textarea name=\"bio\">{}</textarea></label>\n\
         <button type=\"submit\">Save</button>\n</form>",
        escape(user.phone.as_deref().unwrap_or("")),
        escape(user.company.as_deref().unwrap_or("")),
        escape(user.bio.as_deref().unwrap_or("")),
    );

    let (jar, message) = flash::take(jar);
    (jar, pages::render("Edit profile", message.as_deref(), &body)).into_response()
}

/// Updates phone, company, bio and the updated timestamp only; the
/// three fields may all be blank.
pub async fn update(
    State(state): State<AppState>,
    jar: CookieJar,
    Extension(claims): Extension<Claims>,
    Form(form): Form<ProfileEditForm>,
) -> (CookieJar, Redirect) {
    match state
        .db
        .update_profile(claims.sub, &form.phone, &form.company, &form.bio)
    {
        Ok(()) => (flash::set(jar, "Profile updated."), Redirect::to("/profile")),
        Err(e) => {
            error!("Profile update failed: {e}");
            (
                flash::set(jar, "Update failed. Please try again."),
                Redirect::to("/profile/edit"),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::test_util::{flash_message, location, test_state};

    use super::*;

    fn claims_for(id: i64, username: &str) -> Claims {
        Claims {
            sub: id,
            username: username.into(),
            exp: usize::MAX,
        }
    }

    #[tokio::test]
    async fn edit_roundtrip_shows_saved_values() {
        let state = test_state();
        let id = state.db.create_user("alice", "alice@x.com", "hash").unwrap();

        let resp = update(
            State(state.clone()),
            CookieJar::new(),
            Extension(claims_for(id, "alice")),
            Form(ProfileEditForm {
                phone: "555-0100".into(),
                company: "Acme".into(),
                bio: "hi".into(),
            }),
        )
        .await
        .into_response();
        assert_eq!(location(&resp), "/profile");
        assert_eq!(flash_message(&resp).as_deref(), Some("Profile updated."));

        let resp = profile(
            State(state.clone()),
            CookieJar::new(),
            Extension(claims_for(id, "alice")),
        )
        .await;
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("555-0100"));
        assert!(html.contains("Acme"));
        assert!(html.contains("hi"));

        // Credentials stay as registered.
        let row = state.db.user_by_id(id).unwrap().unwrap();
        assert_eq!(row.username, "alice");
        assert_eq!(row.email, "alice@x.com");
        assert_eq!(row.password, "hash");
    }

    #[tokio::test]
    async fn edit_form_shows_current_values() {
        let state = test_state();
        let id = state.db.create_user("alice", "alice@x.com", "hash").unwrap();
        state.db.update_profile(id, "555-0100", "Acme", "hi").unwrap();

        let resp = edit_page(
            State(state.clone()),
            CookieJar::new(),
            Extension(claims_for(id, "alice")),
        )
        .await;
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("value=\"555-0100\""));
        assert!(html.contains("value=\"Acme\""));
    }

    #[tokio::test]
    async fn stale_session_user_redirects_home() {
        let state = test_state();
        let resp = profile(
            State(state.clone()),
            CookieJar::new(),
            Extension(claims_for(42, "ghost")),
        )
        .await;
        assert_eq!(location(&resp), "/");
        assert_eq!(flash_message(&resp).as_deref(), Some("User not found."));
    }
}
