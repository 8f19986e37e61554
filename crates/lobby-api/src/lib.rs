pub mod auth;
pub mod contact;
pub mod flash;
pub mod forms;
pub mod pages;
pub mod profile;
pub mod session;

#[cfg(test)]
pub(crate) mod test_util;

use axum::{Router, middleware, routing::get};

/// Full route table for the contact/account service. The server binary
/// layers request tracing on top.
pub fn router(state: auth::AppState) -> Router {
    let public = Router::new()
        .route("/", get(pages::home))
        .route("/about", get(pages::about))
        .route("/services", get(pages::services))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/contact", get(contact::contact_page).post(contact::submit))
        .with_state(state.clone());

    let protected = Router::new()
        .route("/profile", get(profile::profile))
        .route("/profile/edit", get(profile::edit_page).post(profile::update))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            session::require_session,
        ))
        .with_state(state);

    public.merge(protected)
}
