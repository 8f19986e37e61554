use axum::{
    Form,
    extract::State,
    response::{Html, Redirect},
};
use axum_extra::extract::CookieJar;
use tracing::error;

use crate::auth::AppState;
use crate::flash;
use crate::forms::ContactForm;
use crate::pages;
use crate::session;

const CONTACT_BODY: &str = "<h1>Contact us</h1>\n\
    <form method=\"post\" action=\"/contact\">\n\
    <label>Name <input name=\"name\"></label>\n\
    <label>Email <input name=\"email\" type=\"email\"></label>\n\
    <label>Message <textarea name=\"message\"></textarea></label>\n\
    <button type=\"submit\">Send</button>\n</form>";

pub async fn contact_page(jar: CookieJar) -> (CookieJar, Html<String>) {
    let (jar, message) = flash::take(jar);
    (jar, pages::render("Contact", message.as_deref(), CONTACT_BODY))
}

pub async fn submit(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<ContactForm>,
) -> (CookieJar, Redirect) {
    if form.name.is_empty() || form.email.is_empty() || form.message.is_empty() {
        return (
            flash::set(jar, "All fields are required."),
            Redirect::to("/contact"),
        );
    }

    // Stamp the message with the sender's account when a valid session
    // cookie rides along; anonymous otherwise.
    let user_id = session::authenticate(&jar, &state.session_secret).map(|claims| claims.sub);

    match state
        .db
        .insert_contact(user_id, &form.name, &form.email, &form.message)
    {
        Ok(_) => (
            flash::set(jar, "Thanks for your message! We will be in touch soon."),
            Redirect::to("/contact"),
        ),
        Err(e) => {
            error!("Contact insert failed: {e}");
            (
                flash::set(jar, "Submission failed. Please try again."),
                Redirect::to("/contact"),
            )
        }
    }
}
