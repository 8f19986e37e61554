use std::sync::Arc;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{
    Form,
    extract::State,
    response::{Html, Redirect},
};
use axum_extra::extract::CookieJar;
use tracing::{error, info};

use lobby_db::{Database, UniqueField};

use crate::flash;
use crate::forms::{LoginForm, RegisterForm};
use crate::pages;
use crate::session;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub session_secret: String,
}

const INVALID_CREDENTIALS: &str = "Invalid username or password.";

const REGISTER_BODY: &str = "<h1>Create an account</h1>\n\
    <form method=\"post\" action=\"/register\">\n\
    <label>Username <input name=\"username\"></label>\n\
    <label>Email <input name=\"email\" type=\"email\"></label>\n\
    <label>Password <input name=\"password\" type=\"password\"></label>\n\
    <label>Confirm password <input name=\"confirm_password\" type=\"password\"></label>\n\
    <button type=\"submit\">Register</button>\n</form>\n\
    <p>Already have an account? <a href=\"/login\">Log in</a></p>";

const LOGIN_BODY: &str = "<h1>Log in</h1>\n\
    <form method=\"post\" action=\"/login\">\n\
    <label>Username <input name=\"username\"></label>\n\
    <label>Password <input name=\"password\" type=\"password\"></label>\n\
    <button type=\"submit\">Log in</button>\n</form>\n\
    <p>New here? <a href=\"/register\">Register</a></p>";

pub async fn register_page(jar: CookieJar) -> (CookieJar, Html<String>) {
    let (jar, message) = flash::take(jar);
    (jar, pages::render("Register", message.as_deref(), REGISTER_BODY))
}

pub async fn login_page(jar: CookieJar) -> (CookieJar, Html<String>) {
    let (jar, message) = flash::take(jar);
    (jar, pages::render("Log in", message.as_deref(), LOGIN_BODY))
}

/// Field checks, in order; the first failure wins and nothing touches
/// the database.
fn validate_registration(form: &RegisterForm) -> Result<(), &'static str> {
    if form.username.is_empty() || form.email.is_empty() || form.password.is_empty() {
        return Err("All fields are required.");
    }
    if form.username.chars().count() < 3 {
        return Err("Username must be at least 3 characters long.");
    }
    if form.password != form.confirm_password {
        return Err("Passwords do not match.");
    }
    if form.password.chars().count() < 6 {
        return Err("Password must be at least 6 characters long.");
    }
    // Intentionally loose check, kept for behavior compatibility.
    if !form.email.contains('@') || !form.email.contains('.') {
        return Err("Please enter a valid email address.");
    }
    Ok(())
}

pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<RegisterForm>,
) -> (CookieJar, Redirect) {
    if let Err(message) = validate_registration(&form) {
        return (flash::set(jar, message), Redirect::to("/register"));
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = match Argon2::default().hash_password(form.password.as_bytes(), &salt) {
        Ok(hash) => hash.to_string(),
        Err(e) => {
            error!("Password hashing failed: {e}");
            return (
                flash::set(jar, "Registration failed. Please try again."),
                Redirect::to("/register"),
            );
        }
    };

    match state.db.create_user(&form.username, &form.email, &password_hash) {
        Ok(id) => {
            info!("Registered user {} (id {id})", form.username);
            (
                flash::set(jar, "Registration successful. Please log in."),
                Redirect::to("/login"),
            )
        }
        Err(e) => {
            let message = match e.unique_field() {
                Some(UniqueField::Username) => "That username is already taken.",
                Some(UniqueField::Email) => "That email is already registered.",
                None => {
                    error!("Registration insert failed: {e}");
                    "Registration failed. Please try again."
                }
            };
            (flash::set(jar, message), Redirect::to("/register"))
        }
    }
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> (CookieJar, Redirect) {
    if form.username.is_empty() || form.password.is_empty() {
        return (
            flash::set(jar, "Username and password are required."),
            Redirect::to("/login"),
        );
    }

    let user = match state.db.user_by_username(&form.username) {
        Ok(user) => user,
        Err(e) => {
            error!("Login lookup failed: {e}");
            return (
                flash::set(jar, "Login failed. Please try again."),
                Redirect::to("/login"),
            );
        }
    };

    // Unknown user and wrong password take the same exit so the
    // message never reveals which it was.
    let verified = user.as_ref().is_some_and(|u| {
        PasswordHash::new(&u.password)
            .map(|hash| {
                Argon2::default()
                    .verify_password(form.password.as_bytes(), &hash)
                    .is_ok()
            })
            .unwrap_or(false)
    });

    let Some(user) = user.filter(|_| verified) else {
        return (flash::set(jar, INVALID_CREDENTIALS), Redirect::to("/login"));
    };

    match session::issue(&state.session_secret, user.id, &user.username) {
        Ok(cookie) => {
            info!("User {} logged in", user.username);
            let jar = flash::set(jar.add(cookie), &format!("Welcome, {}!", user.username));
            (jar, Redirect::to("/"))
        }
        Err(e) => {
            error!("Session issue failed: {e}");
            (
                flash::set(jar, "Login failed. Please try again."),
                Redirect::to("/login"),
            )
        }
    }
}

pub async fn logout(jar: CookieJar) -> (CookieJar, Redirect) {
    let jar = flash::set(session::clear(jar), "You have been logged out.");
    (jar, Redirect::to("/"))
}
